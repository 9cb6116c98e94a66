//! `#Strings` heap access.
//!
//! The heap holds nul-terminated UTF-8 strings referenced by offset from
//! table columns. Offset 0 is always the empty string.

use std::ffi::CStr;

use crate::Result;

/// The `#Strings` heap of a .NET binary.
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Wraps the heap bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the heap is empty or its first byte is not the
    /// mandatory nul.
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() {
            return Err(malformed_error!("Strings heap is empty"));
        }

        if data[0] != 0 {
            return Err(malformed_error!("Strings heap does not start with nul"));
        }

        Ok(Strings { data })
    }

    /// Returns the string starting at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds, the string is not
    /// terminated within the heap, or the bytes are not valid UTF-8.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index >= self.data.len() {
            return Err(crate::Error::OutOfBounds);
        }

        let cstr = CStr::from_bytes_until_nul(&self.data[index..])
            .map_err(|_| malformed_error!("String at heap index {} is not terminated", index))?;

        cstr.to_str()
            .map_err(|_| malformed_error!("String at heap index {} is not valid UTF-8", index))
    }
}
