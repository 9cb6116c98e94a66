//! Printable string scanning over the raw file bytes.
//!
//! Two scans run over the whole image: one for runs of printable ASCII and
//! one for UTF-16LE, where every printable code unit is followed by a zero
//! byte. Both report the file offset the run starts at.

use widestring::U16Str;

/// Minimum run length, in characters, for a string to be reported.
pub const MIN_LENGTH: usize = 4;

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

/// Finds runs of printable ASCII of at least [`MIN_LENGTH`] characters.
#[must_use]
pub fn ascii_strings(data: &[u8]) -> Vec<(String, u32)> {
    let mut found = Vec::new();

    let mut start = None;
    for (position, &byte) in data.iter().enumerate() {
        if is_printable(byte) {
            if start.is_none() {
                start = Some(position);
            }
        } else if let Some(run_start) = start.take() {
            if position - run_start >= MIN_LENGTH {
                if let Ok(text) = std::str::from_utf8(&data[run_start..position]) {
                    found.push((text.to_string(), run_start as u32));
                }
            }
        }
    }

    if let Some(run_start) = start {
        if data.len() - run_start >= MIN_LENGTH {
            if let Ok(text) = std::str::from_utf8(&data[run_start..]) {
                found.push((text.to_string(), run_start as u32));
            }
        }
    }

    found
}

/// Finds runs of printable UTF-16LE of at least [`MIN_LENGTH`] characters.
///
/// Only the basic-latin subset is scanned for: pairs of a printable ASCII
/// byte followed by a zero byte.
#[must_use]
pub fn utf16_strings(data: &[u8]) -> Vec<(String, u32)> {
    let mut found = Vec::new();

    let mut units: Vec<u16> = Vec::new();
    let mut start = 0_usize;
    let mut position = 0_usize;

    while position + 1 < data.len() {
        if is_printable(data[position]) && data[position + 1] == 0 {
            if units.is_empty() {
                start = position;
            }
            units.push(u16::from(data[position]));
            position += 2;
        } else {
            if units.len() >= MIN_LENGTH {
                found.push((U16Str::from_slice(&units).to_string_lossy(), start as u32));
            }
            units.clear();
            // Resynchronize one byte at a time so unaligned strings are
            // still found.
            position += 1;
        }
    }

    if units.len() >= MIN_LENGTH {
        found.push((U16Str::from_slice(&units).to_string_lossy(), start as u32));
    }

    found
}
