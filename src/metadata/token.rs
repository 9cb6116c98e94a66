//! Metadata token representation.
//!
//! A token packs a table identifier and a 1-based row number into a single
//! `u32`: the table id occupies the high byte, the row the low three bytes.
//! Tokens are the stable addresses features are reported at, so every row a
//! feature is derived from carries one.

use std::fmt;

use crate::metadata::tables::TableId;

/// A metadata token, identifying one row of one metadata table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u32);

impl Token {
    /// Wraps a raw token value.
    #[must_use]
    pub fn new(value: u32) -> Token {
        Token(value)
    }

    /// Builds the token for `row` of `table`.
    ///
    /// Rows are 1-based; row numbers above 0x00FF_FFFF cannot be represented
    /// and are truncated to the low 24 bits, matching the on-disk encoding.
    #[must_use]
    pub fn from_table_row(table: TableId, row: u32) -> Token {
        Token(((table as u32) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw `u32` value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the table id byte (bits 24..32).
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Returns the 1-based row number (bits 0..24).
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns `true` if the row part is zero, the null reference encoding.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row() == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(0x{:08X})", self.0)
    }
}
