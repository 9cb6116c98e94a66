//! The `#~` tables stream.
//!
//! The stream starts with a 24-byte header (heap size flags, `valid` and
//! `sorted` bitvectors), followed by one `u32` row count per present table,
//! followed by the table data itself in ascending table order. Because row
//! sizes depend on the counts, walking to any table requires sizing every
//! table before it, including tables this crate never decodes.

mod coded;
mod id;
mod info;
mod raw;
mod row;

pub use coded::{CodedIndex, CodedIndexType};
pub use id::TableId;
pub use info::{TableInfo, TableInfoRef, TableRowInfo};
pub use raw::{ImplMapRaw, MemberRefRaw, MethodDefRaw, ModuleRefRaw, TypeDefRaw, TypeRefRaw};
pub use row::{MetadataTable, TableIterator, TableRow};

use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{file::io::read_le_at, Result};

struct TableSlice<'a> {
    data: &'a [u8],
    rows: u32,
}

/// The parsed `#~` (or `#-`) tables stream.
///
/// Holds the located byte range of every present table. Typed access is
/// through [`TablesStream::table`] and [`TablesStream::rows`] for the tables
/// that have a raw row type.
pub struct TablesStream<'a> {
    /// Major version of the tables schema.
    pub major_version: u8,
    /// Minor version of the tables schema.
    pub minor_version: u8,
    /// Bitvector of present tables.
    pub valid: u64,
    /// Bitvector of sorted tables.
    pub sorted: u64,
    info: TableInfoRef,
    slices: Vec<Option<TableSlice<'a>>>,
}

impl<'a> TablesStream<'a> {
    /// Parses the stream from its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is truncated, no table is present, an
    /// unknown table is claimed, or the stream is too short for its own row
    /// counts.
    pub fn from(data: &'a [u8]) -> Result<TablesStream<'a>> {
        if data.len() < 24 {
            return Err(malformed_error!("Tables stream is too short"));
        }

        let major_version = data[4];
        let minor_version = data[5];

        let mut offset = 8;
        let valid = read_le_at::<u64>(data, &mut offset)?;
        let sorted = read_le_at::<u64>(data, &mut offset)?;

        if valid == 0 {
            return Err(malformed_error!("Tables stream has no valid tables"));
        }

        let info = Arc::new(TableInfo::new(data, valid)?);

        let mut slices: Vec<Option<TableSlice<'a>>> = Vec::with_capacity(0x38);
        slices.resize_with(0x38, || None);

        // Table data begins right after the row count array.
        let mut offset = 24 + valid.count_ones() as usize * 4;
        for table in TableId::iter() {
            if valid & (1 << (table as u8)) == 0 {
                continue;
            }

            let rows = info.rows(table);
            let size = rows as usize * info.row_size(table) as usize;

            let end = offset
                .checked_add(size)
                .ok_or(crate::Error::OutOfBounds)?;
            if end > data.len() {
                return Err(malformed_error!(
                    "Tables stream is too short for table {:?} - need {} bytes at {}",
                    table,
                    size,
                    offset
                ));
            }

            if rows > 0 {
                slices[table as usize] = Some(TableSlice {
                    data: &data[offset..end],
                    rows,
                });
            }

            offset = end;
        }

        Ok(TablesStream {
            major_version,
            minor_version,
            valid,
            sorted,
            info,
            slices,
        })
    }

    /// Returns the sizing information of this stream.
    #[must_use]
    pub fn info(&self) -> &TableInfoRef {
        &self.info
    }

    /// Returns `true` if `table` is present with at least one row.
    #[must_use]
    pub fn has_table(&self, table: TableId) -> bool {
        self.slices[table as usize].is_some()
    }

    /// Returns the row count of `table`, 0 if absent.
    #[must_use]
    pub fn row_count(&self, table: TableId) -> u32 {
        self.info.rows(table)
    }

    /// Returns the typed table for `T`, or `None` if it is absent.
    #[must_use]
    pub fn table<T: TableRow>(&self) -> Option<MetadataTable<'a, T>> {
        let slice = self.slices[T::TABLE as usize].as_ref()?;
        MetadataTable::new(slice.data, slice.rows, self.info.clone()).ok()
    }

    /// Returns an iterator over the rows of `T`, empty if the table is
    /// absent.
    #[must_use]
    pub fn rows<T: TableRow>(&self) -> TableIterator<'a, T> {
        match self.table::<T>() {
            Some(table) => table.iter(),
            None => TableIterator::empty(),
        }
    }
}
