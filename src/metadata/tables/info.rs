//! Table sizing information.
//!
//! Row layouts in the `#~` stream are not fixed: heap indexes, table indexes
//! and coded indexes each shrink to 2 bytes when everything they can address
//! fits, and widen to 4 bytes otherwise. [`TableInfo`] captures the row
//! counts and heap size flags of one binary and answers all width questions
//! from them, including the full row size of every table.

use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{
    file::io::read_le_at,
    metadata::tables::{CodedIndex, CodedIndexType, TableId},
    Result,
};

/// Row count and index width of a single table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRowInfo {
    /// Number of rows present.
    pub rows: u32,
    /// Bits needed to address any row.
    pub bits: u8,
    /// `true` if plain indexes into this table need 4 bytes.
    pub is_large: bool,
}

/// Shared reference to a [`TableInfo`].
pub type TableInfoRef = Arc<TableInfo>;

/// Sizing data for all tables of one binary.
#[derive(Debug, Clone, Default)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    large_str: bool,
    large_guid: bool,
    large_blob: bool,
}

impl TableInfo {
    /// Builds sizing information from the tables stream header.
    ///
    /// `data` is the whole `#~` stream; `valid` is its table presence
    /// bitvector. Row counts are read from offset 24, one `u32` per set bit
    /// in ascending table order, and the heap size flags from byte 6.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is truncated or `valid` claims a table
    /// number this implementation does not know.
    pub fn new(data: &[u8], valid: u64) -> Result<TableInfo> {
        if data.len() < 24 {
            return Err(malformed_error!("Tables stream header is too short"));
        }

        let known: u64 = TableId::iter().fold(0, |acc, table| acc | 1 << (table as u8));
        if valid & !known != 0 {
            return Err(malformed_error!(
                "Tables stream claims unknown tables - 0x{:X}",
                valid & !known
            ));
        }

        let heap_sizes = data[6];

        let mut rows = vec![TableRowInfo::default(); 0x38];
        let mut offset = 24;
        for table in TableId::iter() {
            if valid & (1 << (table as u8)) != 0 {
                let count = read_le_at::<u32>(data, &mut offset)?;
                rows[table as usize] = TableRowInfo {
                    rows: count,
                    bits: Self::bits_for(count),
                    is_large: count > 0xFFFF,
                };
            }
        }

        Ok(TableInfo {
            rows,
            large_str: heap_sizes & 0x01 != 0,
            large_guid: heap_sizes & 0x02 != 0,
            large_blob: heap_sizes & 0x04 != 0,
        })
    }

    fn bits_for(rows: u32) -> u8 {
        if rows == 0 {
            1
        } else {
            (u32::BITS - rows.leading_zeros()) as u8
        }
    }

    /// Returns the row count of `table`, 0 if absent.
    #[must_use]
    pub fn rows(&self, table: TableId) -> u32 {
        self.rows.get(table as usize).map_or(0, |entry| entry.rows)
    }

    /// Returns `true` if plain indexes into `table` occupy 4 bytes.
    #[must_use]
    pub fn is_large(&self, table: TableId) -> bool {
        self.rows
            .get(table as usize)
            .is_some_and(|entry| entry.is_large)
    }

    /// `true` if `#Strings` indexes occupy 4 bytes.
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.large_str
    }

    /// `true` if `#GUID` indexes occupy 4 bytes.
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.large_guid
    }

    /// `true` if `#Blob` indexes occupy 4 bytes.
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.large_blob
    }

    /// Byte width of a `#Strings` heap index.
    #[must_use]
    pub fn str_bytes(&self) -> u32 {
        if self.large_str {
            4
        } else {
            2
        }
    }

    /// Byte width of a `#GUID` heap index.
    #[must_use]
    pub fn guid_bytes(&self) -> u32 {
        if self.large_guid {
            4
        } else {
            2
        }
    }

    /// Byte width of a `#Blob` heap index.
    #[must_use]
    pub fn blob_bytes(&self) -> u32 {
        if self.large_blob {
            4
        } else {
            2
        }
    }

    /// Byte width of a plain index into `table`.
    #[must_use]
    pub fn table_index_bytes(&self, table: TableId) -> u32 {
        if self.is_large(table) {
            4
        } else {
            2
        }
    }

    /// Byte width of a coded index of family `ci_type`.
    ///
    /// Two bytes when tag and maximum row number fit in 16 bits together.
    #[must_use]
    pub fn coded_index_bytes(&self, ci_type: CodedIndexType) -> u32 {
        let tag_bits = ci_type.tag_bits();
        let max_rows = ci_type
            .tables()
            .iter()
            .map(|&table| self.rows(table))
            .max()
            .unwrap_or(0);

        if max_rows >= 1_u32 << (16 - tag_bits) {
            4
        } else {
            2
        }
    }

    /// Decodes a raw coded index value of family `ci_type`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the tag exceeds the family.
    pub fn decode_coded_index(&self, raw: u32, ci_type: CodedIndexType) -> Result<CodedIndex> {
        let tables = ci_type.tables();
        let tag_bits = ci_type.tag_bits();
        let tag = (raw & ((1 << tag_bits) - 1)) as usize;

        let Some(&table) = tables.get(tag) else {
            return Err(crate::Error::OutOfBounds);
        };

        Ok(CodedIndex::new(table, raw >> tag_bits))
    }

    /// Returns the on-disk row size of `table` in bytes.
    ///
    /// Column layouts follow ECMA-335 II.22 and the Portable PDB format.
    #[must_use]
    pub fn row_size(&self, table: TableId) -> u32 {
        let str = self.str_bytes();
        let guid = self.guid_bytes();
        let blob = self.blob_bytes();
        let idx = |table| self.table_index_bytes(table);
        let coded = |family| self.coded_index_bytes(family);

        match table {
            TableId::Module => 2 + str + 3 * guid,
            TableId::TypeRef => coded(CodedIndexType::ResolutionScope) + 2 * str,
            TableId::TypeDef => {
                4 + 2 * str
                    + coded(CodedIndexType::TypeDefOrRef)
                    + idx(TableId::Field)
                    + idx(TableId::MethodDef)
            }
            TableId::FieldPtr => idx(TableId::Field),
            TableId::Field => 2 + str + blob,
            TableId::MethodPtr => idx(TableId::MethodDef),
            TableId::MethodDef => 4 + 2 + 2 + str + blob + idx(TableId::Param),
            TableId::ParamPtr => idx(TableId::Param),
            TableId::Param => 2 + 2 + str,
            TableId::InterfaceImpl => idx(TableId::TypeDef) + coded(CodedIndexType::TypeDefOrRef),
            TableId::MemberRef => coded(CodedIndexType::MemberRefParent) + str + blob,
            TableId::Constant => 1 + 1 + coded(CodedIndexType::HasConstant) + blob,
            TableId::CustomAttribute => {
                coded(CodedIndexType::HasCustomAttribute)
                    + coded(CodedIndexType::CustomAttributeType)
                    + blob
            }
            TableId::FieldMarshal => coded(CodedIndexType::HasFieldMarshal) + blob,
            TableId::DeclSecurity => 2 + coded(CodedIndexType::HasDeclSecurity) + blob,
            TableId::ClassLayout => 2 + 4 + idx(TableId::TypeDef),
            TableId::FieldLayout => 4 + idx(TableId::Field),
            TableId::StandAloneSig => blob,
            TableId::EventMap => idx(TableId::TypeDef) + idx(TableId::Event),
            TableId::EventPtr => idx(TableId::Event),
            TableId::Event => 2 + str + coded(CodedIndexType::TypeDefOrRef),
            TableId::PropertyMap => idx(TableId::TypeDef) + idx(TableId::Property),
            TableId::PropertyPtr => idx(TableId::Property),
            TableId::Property => 2 + str + blob,
            TableId::MethodSemantics => {
                2 + idx(TableId::MethodDef) + coded(CodedIndexType::HasSemantics)
            }
            TableId::MethodImpl => {
                idx(TableId::TypeDef) + 2 * coded(CodedIndexType::MethodDefOrRef)
            }
            TableId::ModuleRef => str,
            TableId::TypeSpec => blob,
            TableId::ImplMap => {
                2 + coded(CodedIndexType::MemberForwarded) + str + idx(TableId::ModuleRef)
            }
            TableId::FieldRVA => 4 + idx(TableId::Field),
            TableId::EncLog => 8,
            TableId::EncMap => 4,
            TableId::Assembly => 4 + 8 + 4 + blob + 2 * str,
            TableId::AssemblyProcessor => 4,
            TableId::AssemblyOS => 12,
            TableId::AssemblyRef => 8 + 4 + 2 * blob + 2 * str,
            TableId::AssemblyRefProcessor => 4 + idx(TableId::AssemblyRef),
            TableId::AssemblyRefOS => 12 + idx(TableId::AssemblyRef),
            TableId::File => 4 + str + blob,
            TableId::ExportedType => 4 + 4 + 2 * str + coded(CodedIndexType::Implementation),
            TableId::ManifestResource => 4 + 4 + str + coded(CodedIndexType::Implementation),
            TableId::NestedClass => 2 * idx(TableId::TypeDef),
            TableId::GenericParam => 2 + 2 + coded(CodedIndexType::TypeOrMethodDef) + str,
            TableId::MethodSpec => coded(CodedIndexType::MethodDefOrRef) + blob,
            TableId::GenericParamConstraint => {
                idx(TableId::GenericParam) + coded(CodedIndexType::TypeDefOrRef)
            }
            TableId::Document => blob + guid + blob + guid,
            TableId::MethodDebugInformation => idx(TableId::Document) + blob,
            TableId::LocalScope => {
                idx(TableId::MethodDef)
                    + idx(TableId::ImportScope)
                    + idx(TableId::LocalVariable)
                    + idx(TableId::LocalConstant)
                    + 8
            }
            TableId::LocalVariable => 2 + 2 + str,
            TableId::LocalConstant => str + blob,
            TableId::ImportScope => idx(TableId::ImportScope) + blob,
            TableId::StateMachineMethod => 2 * idx(TableId::MethodDef),
            TableId::CustomDebugInformation => {
                coded(CodedIndexType::HasCustomDebugInformation) + guid + blob
            }
        }
    }

    /// Builds a `TableInfo` directly from row counts, for crafted-bytes
    /// tests that bypass a real tables stream header.
    #[cfg(test)]
    #[must_use]
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> TableInfo {
        let mut rows = vec![TableRowInfo::default(); 0x38];
        for &(table, count) in valid_tables {
            rows[table as usize] = TableRowInfo {
                rows: count,
                bits: Self::bits_for(count),
                is_large: count > 0xFFFF,
            };
        }

        TableInfo {
            rows,
            large_str,
            large_guid,
            large_blob,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_row_sizes() {
        let info = TableInfo::new_test(
            &[
                (TableId::TypeRef, 2),
                (TableId::TypeDef, 2),
                (TableId::MethodDef, 2),
                (TableId::MemberRef, 2),
                (TableId::ModuleRef, 1),
                (TableId::ImplMap, 1),
            ],
            false,
            false,
            false,
        );

        assert_eq!(info.row_size(TableId::Module), 2 + 2 + 6);
        assert_eq!(info.row_size(TableId::TypeRef), 2 + 2 + 2);
        assert_eq!(info.row_size(TableId::TypeDef), 4 + 4 + 2 + 2 + 2);
        assert_eq!(info.row_size(TableId::MethodDef), 4 + 2 + 2 + 2 + 2 + 2);
        assert_eq!(info.row_size(TableId::MemberRef), 2 + 2 + 2);
        assert_eq!(info.row_size(TableId::ModuleRef), 2);
        assert_eq!(info.row_size(TableId::ImplMap), 2 + 2 + 2 + 2);
    }

    #[test]
    fn large_table_widens_indexes() {
        let info = TableInfo::new_test(&[(TableId::TypeRef, 0x1_0000)], false, false, false);

        assert!(info.is_large(TableId::TypeRef));
        assert_eq!(info.table_index_bytes(TableId::TypeRef), 4);
        // ResolutionScope has 2 tag bits, so TypeRef already widens it at
        // 0x4000 rows, well below the plain index threshold.
        assert_eq!(info.coded_index_bytes(CodedIndexType::ResolutionScope), 4);
    }

    #[test]
    fn coded_index_widens_at_tag_boundary() {
        let at_limit = TableInfo::new_test(&[(TableId::TypeRef, 0x3FFF)], false, false, false);
        assert_eq!(
            at_limit.coded_index_bytes(CodedIndexType::ResolutionScope),
            2
        );

        let over_limit = TableInfo::new_test(&[(TableId::TypeRef, 0x4000)], false, false, false);
        assert_eq!(
            over_limit.coded_index_bytes(CodedIndexType::ResolutionScope),
            4
        );
    }

    #[test]
    fn large_string_heap() {
        let info = TableInfo::new_test(&[(TableId::ModuleRef, 1)], true, false, false);
        assert_eq!(info.str_bytes(), 4);
        assert_eq!(info.row_size(TableId::ModuleRef), 4);
    }

    #[test]
    fn new_reads_header() {
        // Header with TypeRef (bit 1) and ModuleRef (bit 26) present.
        let mut data = vec![0_u8; 24];
        data[4] = 2; // major
        data[6] = 0x01; // large #Strings
        let valid: u64 = (1 << 1) | (1 << 26);
        data[8..16].copy_from_slice(&valid.to_le_bytes());
        data.extend_from_slice(&5_u32.to_le_bytes());
        data.extend_from_slice(&3_u32.to_le_bytes());

        let info = TableInfo::new(&data, valid).unwrap();
        assert_eq!(info.rows(TableId::TypeRef), 5);
        assert_eq!(info.rows(TableId::ModuleRef), 3);
        assert_eq!(info.rows(TableId::TypeDef), 0);
        assert!(info.is_large_str());
    }

    #[test]
    fn new_rejects_unknown_tables() {
        let mut data = vec![0_u8; 24];
        let valid: u64 = 1 << 0x2D;
        data[8..16].copy_from_slice(&valid.to_le_bytes());
        data.extend_from_slice(&1_u32.to_le_bytes());

        assert!(TableInfo::new(&data, valid).is_err());
    }

    #[test]
    fn decode_coded_index_tags() {
        let info = TableInfo::new_test(&[(TableId::TypeRef, 4)], false, false, false);

        let index = info
            .decode_coded_index((2 << 2) | 1, CodedIndexType::ResolutionScope)
            .unwrap();
        assert_eq!(index.tag, TableId::ModuleRef);
        assert_eq!(index.row, 2);

        let index = info
            .decode_coded_index((1 << 1) | 1, CodedIndexType::MemberForwarded)
            .unwrap();
        assert_eq!(index.tag, TableId::MethodDef);
        assert_eq!(index.row, 1);
    }
}
