//! Metadata root and stream directory parsing.
//!
//! The metadata root sits at the start of the physical metadata and begins
//! with the `BSJB` signature, followed by the version string and the stream
//! directory. Stream offsets are relative to the root itself.

use crate::{file::io::read_le_at, Result};

/// The `BSJB` magic at the start of the metadata root.
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// One entry of the stream directory.
#[derive(Debug, Clone)]
pub struct StreamHeader {
    /// Offset of the stream, relative to the metadata root.
    pub offset: u32,
    /// Size of the stream in bytes.
    pub size: u32,
    /// Stream name, e.g. `#~` or `#Strings`.
    pub name: String,
}

impl StreamHeader {
    /// Stream names defined by ECMA-335 plus the uncompressed `#-` variant.
    const VALID_NAMES: [&'static str; 6] = ["#~", "#-", "#Strings", "#US", "#Blob", "#GUID"];

    /// Parses one stream header at `offset`, advancing past it including the
    /// name padding.
    ///
    /// # Errors
    ///
    /// Returns an error on truncation, a non-UTF-8 name, or a name outside
    /// the set ECMA-335 defines.
    pub fn from(data: &[u8], offset: &mut usize) -> Result<StreamHeader> {
        let stream_offset = read_le_at::<u32>(data, offset)?;
        let stream_size = read_le_at::<u32>(data, offset)?;

        let name_start = *offset;
        let name_end = data[name_start..]
            .iter()
            .position(|&byte| byte == 0)
            .ok_or_else(|| malformed_error!("Stream header name is not terminated"))?
            + name_start;

        let name = std::str::from_utf8(&data[name_start..name_end])
            .map_err(|_| malformed_error!("Stream header name is not valid UTF-8"))?
            .to_string();

        if !Self::VALID_NAMES.contains(&name.as_str()) {
            return Err(malformed_error!("Stream header name is invalid - {}", name));
        }

        // Name storage is padded to the next 4-byte boundary.
        let name_len = name_end - name_start + 1;
        *offset = name_start
            .checked_add((name_len + 3) & !3)
            .ok_or(crate::Error::OutOfBounds)?;

        Ok(StreamHeader {
            offset: stream_offset,
            size: stream_size,
            name,
        })
    }
}

/// The parsed metadata root.
#[derive(Debug, Clone)]
pub struct Root {
    /// Magic signature, always `BSJB`.
    pub signature: u32,
    /// Major version of the metadata format.
    pub major_version: u16,
    /// Minor version of the metadata format.
    pub minor_version: u16,
    /// Reserved, always 0.
    pub reserved: u32,
    /// Stored length of the version string buffer, including padding.
    pub length: u32,
    /// Runtime version string with trailing nuls stripped, e.g. `v4.0.30319`.
    /// Decoded lossily, so damaged bytes show up as replacement characters.
    pub version: String,
    /// Reserved flags, always 0.
    pub flags: u16,
    /// Number of streams in the directory.
    pub stream_number: u16,
    /// The parsed stream directory.
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Parses the metadata root from `data`.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing `BSJB` signature, truncation, or a bad
    /// stream directory.
    pub fn read(data: &[u8]) -> Result<Root> {
        let mut offset = 0;

        let signature = read_le_at::<u32>(data, &mut offset)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "Metadata root signature is invalid - 0x{:X}",
                signature
            ));
        }

        let major_version = read_le_at::<u16>(data, &mut offset)?;
        let minor_version = read_le_at::<u16>(data, &mut offset)?;
        let reserved = read_le_at::<u32>(data, &mut offset)?;
        let length = read_le_at::<u32>(data, &mut offset)?;

        let version_end = offset
            .checked_add(length as usize)
            .ok_or(crate::Error::OutOfBounds)?;
        if version_end > data.len() {
            return Err(crate::Error::OutOfBounds);
        }

        // The version string is informational only. Invalid UTF-8 must not
        // reject the file, so undecodable bytes become replacement chars.
        let version = String::from_utf8_lossy(&data[offset..version_end])
            .trim_end_matches('\0')
            .to_string();
        offset = version_end;

        let flags = read_le_at::<u16>(data, &mut offset)?;
        let stream_number = read_le_at::<u16>(data, &mut offset)?;

        let mut stream_headers = Vec::with_capacity(stream_number as usize);
        for _ in 0..stream_number {
            stream_headers.push(StreamHeader::from(data, &mut offset)?);
        }

        Ok(Root {
            signature,
            major_version,
            minor_version,
            reserved,
            length,
            version,
            flags,
            stream_number,
            stream_headers,
        })
    }
}
