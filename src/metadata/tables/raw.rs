//! Typed rows for the tables feature extraction reads.
//!
//! Only the columns are decoded here; heap indexes stay raw and are resolved
//! against the `#Strings` heap by the extraction layer. Each row carries its
//! own metadata token so features can be reported at the right address.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, TableId, TableInfo, TableRow},
        token::Token,
    },
    Result,
};

/// A row of the TypeRef table (0x01), a reference to a type defined in
/// another scope.
#[derive(Debug, Clone)]
pub struct TypeRefRaw {
    /// 1-based row number.
    pub rid: u32,
    /// Token of this row.
    pub token: Token,
    /// ResolutionScope coded index, the scope the reference resolves in.
    pub resolution_scope: CodedIndex,
    /// `#Strings` index of the type name.
    pub type_name: u32,
    /// `#Strings` index of the type namespace.
    pub type_namespace: u32,
}

impl TableRow for TypeRefRaw {
    const TABLE: TableId = TableId::TypeRef;

    fn row_size(info: &TableInfo) -> u32 {
        info.row_size(TableId::TypeRef)
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, info: &TableInfo) -> Result<Self> {
        Ok(TypeRefRaw {
            rid,
            token: Token::from_table_row(TableId::TypeRef, rid),
            resolution_scope: CodedIndex::read(
                data,
                offset,
                info,
                CodedIndexType::ResolutionScope,
            )?,
            type_name: read_le_at_dyn(data, offset, info.is_large_str())?,
            type_namespace: read_le_at_dyn(data, offset, info.is_large_str())?,
        })
    }
}

/// A row of the TypeDef table (0x02), a type defined in this module.
#[derive(Debug, Clone)]
pub struct TypeDefRaw {
    /// 1-based row number.
    pub rid: u32,
    /// Token of this row.
    pub token: Token,
    /// TypeAttributes bitmask.
    pub flags: u32,
    /// `#Strings` index of the type name.
    pub type_name: u32,
    /// `#Strings` index of the type namespace.
    pub type_namespace: u32,
    /// TypeDefOrRef coded index of the base type.
    pub extends: CodedIndex,
    /// First owned row in the Field table.
    pub field_list: u32,
    /// First owned row in the MethodDef table.
    pub method_list: u32,
}

impl TableRow for TypeDefRaw {
    const TABLE: TableId = TableId::TypeDef;

    fn row_size(info: &TableInfo) -> u32 {
        info.row_size(TableId::TypeDef)
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, info: &TableInfo) -> Result<Self> {
        Ok(TypeDefRaw {
            rid,
            token: Token::from_table_row(TableId::TypeDef, rid),
            flags: read_le_at::<u32>(data, offset)?,
            type_name: read_le_at_dyn(data, offset, info.is_large_str())?,
            type_namespace: read_le_at_dyn(data, offset, info.is_large_str())?,
            extends: CodedIndex::read(data, offset, info, CodedIndexType::TypeDefOrRef)?,
            field_list: read_le_at_dyn(data, offset, info.is_large(TableId::Field))?,
            method_list: read_le_at_dyn(data, offset, info.is_large(TableId::MethodDef))?,
        })
    }
}

/// A row of the MethodDef table (0x06), a method defined in this module.
#[derive(Debug, Clone)]
pub struct MethodDefRaw {
    /// 1-based row number.
    pub rid: u32,
    /// Token of this row.
    pub token: Token,
    /// RVA of the method body, 0 for abstract or P/Invoke methods.
    pub rva: u32,
    /// MethodImplAttributes bitmask.
    pub impl_flags: u16,
    /// MethodAttributes bitmask.
    pub flags: u16,
    /// `#Strings` index of the method name.
    pub name: u32,
    /// `#Blob` index of the method signature.
    pub signature: u32,
    /// First owned row in the Param table.
    pub param_list: u32,
}

impl TableRow for MethodDefRaw {
    const TABLE: TableId = TableId::MethodDef;

    fn row_size(info: &TableInfo) -> u32 {
        info.row_size(TableId::MethodDef)
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, info: &TableInfo) -> Result<Self> {
        Ok(MethodDefRaw {
            rid,
            token: Token::from_table_row(TableId::MethodDef, rid),
            rva: read_le_at::<u32>(data, offset)?,
            impl_flags: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, info.is_large_str())?,
            signature: read_le_at_dyn(data, offset, info.is_large_blob())?,
            param_list: read_le_at_dyn(data, offset, info.is_large(TableId::Param))?,
        })
    }
}

/// A row of the MemberRef table (0x0A), a reference to a field or method of
/// another type.
#[derive(Debug, Clone)]
pub struct MemberRefRaw {
    /// 1-based row number.
    pub rid: u32,
    /// Token of this row.
    pub token: Token,
    /// MemberRefParent coded index of the owning type or module.
    pub class: CodedIndex,
    /// `#Strings` index of the member name.
    pub name: u32,
    /// `#Blob` index of the member signature.
    pub signature: u32,
}

impl TableRow for MemberRefRaw {
    const TABLE: TableId = TableId::MemberRef;

    fn row_size(info: &TableInfo) -> u32 {
        info.row_size(TableId::MemberRef)
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, info: &TableInfo) -> Result<Self> {
        Ok(MemberRefRaw {
            rid,
            token: Token::from_table_row(TableId::MemberRef, rid),
            class: CodedIndex::read(data, offset, info, CodedIndexType::MemberRefParent)?,
            name: read_le_at_dyn(data, offset, info.is_large_str())?,
            signature: read_le_at_dyn(data, offset, info.is_large_blob())?,
        })
    }
}

/// A row of the ModuleRef table (0x1A), a reference to an external module.
#[derive(Debug, Clone)]
pub struct ModuleRefRaw {
    /// 1-based row number.
    pub rid: u32,
    /// Token of this row.
    pub token: Token,
    /// `#Strings` index of the module name.
    pub name: u32,
}

impl TableRow for ModuleRefRaw {
    const TABLE: TableId = TableId::ModuleRef;

    fn row_size(info: &TableInfo) -> u32 {
        info.row_size(TableId::ModuleRef)
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, info: &TableInfo) -> Result<Self> {
        Ok(ModuleRefRaw {
            rid,
            token: Token::from_table_row(TableId::ModuleRef, rid),
            name: read_le_at_dyn(data, offset, info.is_large_str())?,
        })
    }
}

/// A row of the ImplMap table (0x1C), a P/Invoke mapping of a managed
/// method onto a native import.
#[derive(Debug, Clone)]
pub struct ImplMapRaw {
    /// 1-based row number.
    pub rid: u32,
    /// Token of this row.
    pub token: Token,
    /// PInvokeAttributes bitmask.
    pub mapping_flags: u16,
    /// MemberForwarded coded index, in practice always a MethodDef.
    pub member_forwarded: CodedIndex,
    /// `#Strings` index of the imported symbol name.
    pub import_name: u32,
    /// ModuleRef row of the module the symbol comes from.
    pub import_scope: u32,
}

impl TableRow for ImplMapRaw {
    const TABLE: TableId = TableId::ImplMap;

    fn row_size(info: &TableInfo) -> u32 {
        info.row_size(TableId::ImplMap)
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, info: &TableInfo) -> Result<Self> {
        Ok(ImplMapRaw {
            rid,
            token: Token::from_table_row(TableId::ImplMap, rid),
            mapping_flags: read_le_at::<u16>(data, offset)?,
            member_forwarded: CodedIndex::read(data, offset, info, CodedIndexType::MemberForwarded)?,
            import_name: read_le_at_dyn(data, offset, info.is_large_str())?,
            import_scope: read_le_at_dyn(data, offset, info.is_large(TableId::ModuleRef))?,
        })
    }
}
