//! Generic table access.
//!
//! [`MetadataTable`] wraps the raw bytes of one table and parses rows on
//! demand through the [`TableRow`] trait. Iteration skips rows that fail to
//! parse instead of aborting, so one corrupt row cannot hide the rest of a
//! table.

use std::marker::PhantomData;

use tracing::debug;

use crate::{
    metadata::tables::{TableId, TableInfo, TableInfoRef},
    Result,
};

/// A typed metadata table row.
pub trait TableRow: Sized {
    /// The table this row type belongs to.
    const TABLE: TableId;

    /// On-disk row size for the given sizing information.
    fn row_size(info: &TableInfo) -> u32;

    /// Parses the row with 1-based row number `rid` from `data` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the row bytes cannot be decoded.
    fn read_row(data: &[u8], offset: &mut usize, rid: u32, info: &TableInfo) -> Result<Self>;
}

/// The raw bytes of one metadata table, typed by its row.
pub struct MetadataTable<'a, T: TableRow> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    info: TableInfoRef,
    _marker: PhantomData<T>,
}

impl<'a, T: TableRow> MetadataTable<'a, T> {
    /// Wraps `data` as a table of `row_count` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is too short for the claimed row count.
    pub fn new(data: &'a [u8], row_count: u32, info: TableInfoRef) -> Result<MetadataTable<'a, T>> {
        let row_size = T::row_size(&info);

        let needed = row_count as usize * row_size as usize;
        if needed > data.len() {
            return Err(crate::Error::OutOfBounds);
        }

        Ok(MetadataTable {
            data,
            row_count,
            row_size,
            info,
            _marker: PhantomData,
        })
    }

    /// Number of rows in the table.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Parses the row with 1-based number `rid`.
    ///
    /// Returns `None` for rid 0 (the null reference), an out-of-range rid,
    /// or a row that fails to parse.
    #[must_use]
    pub fn get(&self, rid: u32) -> Option<T> {
        if rid == 0 || rid > self.row_count {
            return None;
        }

        let mut offset = (rid - 1) as usize * self.row_size as usize;
        match T::read_row(self.data, &mut offset, rid, &self.info) {
            Ok(row) => Some(row),
            Err(error) => {
                debug!(table = ?T::TABLE, rid, %error, "skipping unparseable row");
                None
            }
        }
    }

    /// Returns an iterator over all parseable rows.
    #[must_use]
    pub fn iter(&self) -> TableIterator<'a, T> {
        TableIterator {
            data: self.data,
            row_count: self.row_count,
            row_size: self.row_size,
            info: self.info.clone(),
            rid: 0,
            _marker: PhantomData,
        }
    }
}

impl<'a, 'b, T: TableRow> IntoIterator for &'b MetadataTable<'a, T> {
    type Item = T;
    type IntoIter = TableIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the rows of a [`MetadataTable`].
///
/// Rows that fail to parse are logged and skipped.
pub struct TableIterator<'a, T: TableRow> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    info: TableInfoRef,
    rid: u32,
    _marker: PhantomData<T>,
}

impl<'a, T: TableRow> TableIterator<'a, T> {
    /// An iterator over no rows, for tables absent from the binary.
    #[must_use]
    pub fn empty() -> TableIterator<'a, T> {
        TableIterator {
            data: &[],
            row_count: 0,
            row_size: 0,
            info: TableInfoRef::default(),
            rid: 0,
            _marker: PhantomData,
        }
    }
}

impl<T: TableRow> Iterator for TableIterator<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while self.rid < self.row_count {
            self.rid += 1;

            let mut offset = (self.rid - 1) as usize * self.row_size as usize;
            match T::read_row(self.data, &mut offset, self.rid, &self.info) {
                Ok(row) => return Some(row),
                Err(error) => {
                    debug!(table = ?T::TABLE, rid = self.rid, %error, "skipping unparseable row");
                }
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some((self.row_count - self.rid) as usize))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::file::io::read_le_at;

    struct PairRow {
        rid: u32,
        first: u16,
        second: u16,
    }

    impl TableRow for PairRow {
        const TABLE: TableId = TableId::EncMap;

        fn row_size(_info: &TableInfo) -> u32 {
            4
        }

        fn read_row(data: &[u8], offset: &mut usize, rid: u32, _info: &TableInfo) -> Result<Self> {
            Ok(PairRow {
                rid,
                first: read_le_at::<u16>(data, offset)?,
                second: read_le_at::<u16>(data, offset)?,
            })
        }
    }

    #[test]
    fn get_and_iterate() {
        let data = [1_u8, 0, 2, 0, 3, 0, 4, 0];
        let table =
            MetadataTable::<PairRow>::new(&data, 2, Arc::new(TableInfo::default())).unwrap();

        assert_eq!(table.row_count(), 2);

        let row = table.get(2).unwrap();
        assert_eq!(row.rid, 2);
        assert_eq!(row.first, 3);
        assert_eq!(row.second, 4);

        assert!(table.get(0).is_none());
        assert!(table.get(3).is_none());

        let rows: Vec<_> = table.iter().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].first, 1);
        assert_eq!(rows[1].rid, 2);
    }

    #[test]
    fn rejects_short_data() {
        let data = [0_u8; 6];
        assert!(MetadataTable::<PairRow>::new(&data, 2, Arc::new(TableInfo::default())).is_err());
    }

    #[test]
    fn empty_iterator() {
        let mut iterator = TableIterator::<PairRow>::empty();
        assert!(iterator.next().is_none());
    }
}
