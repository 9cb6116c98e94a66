//! Coded index decoding.
//!
//! A coded index packs a table tag and a row number into one value: the tag
//! occupies the low bits, the row the rest. The number of tag bits depends
//! on how many tables the index can point at, and the on-disk width depends
//! on the largest of those tables.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{TableId, TableInfo},
        token::Token,
    },
    Result,
};

/// The coded index families defined by ECMA-335 II.24.2.6 plus the Portable
/// PDB `HasCustomDebugInformation` family.
///
/// The order of [`Self::tables`] is the tag order, so the slice position is
/// the tag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodedIndexType {
    /// TypeDef, TypeRef or TypeSpec
    TypeDefOrRef,
    /// Field, Param or Property holding a constant
    HasConstant,
    /// Any element a custom attribute can decorate
    HasCustomAttribute,
    /// Field or Param with marshaling information
    HasFieldMarshal,
    /// TypeDef, MethodDef or Assembly with security declarations
    HasDeclSecurity,
    /// Parent of a MemberRef row
    MemberRefParent,
    /// Event or Property a method is attached to
    HasSemantics,
    /// MethodDef or MemberRef
    MethodDefOrRef,
    /// Field or MethodDef forwarded to a native import
    MemberForwarded,
    /// File, AssemblyRef or ExportedType
    Implementation,
    /// Constructor of a custom attribute
    CustomAttributeType,
    /// Scope a type reference resolves in
    ResolutionScope,
    /// TypeDef or MethodDef owning a generic parameter
    TypeOrMethodDef,
    /// Portable PDB, element debug information is attached to
    HasCustomDebugInformation,
}

impl CodedIndexType {
    /// Returns the tables this family can reference, in tag order.
    #[must_use]
    pub fn tables(&self) -> &'static [TableId] {
        match self {
            CodedIndexType::TypeDefOrRef => {
                &[TableId::TypeDef, TableId::TypeRef, TableId::TypeSpec]
            }
            CodedIndexType::HasConstant => &[TableId::Field, TableId::Param, TableId::Property],
            CodedIndexType::HasCustomAttribute => &[
                TableId::MethodDef,
                TableId::Field,
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::Param,
                TableId::InterfaceImpl,
                TableId::MemberRef,
                TableId::Module,
                TableId::DeclSecurity,
                TableId::Property,
                TableId::Event,
                TableId::StandAloneSig,
                TableId::ModuleRef,
                TableId::TypeSpec,
                TableId::Assembly,
                TableId::AssemblyRef,
                TableId::File,
                TableId::ExportedType,
                TableId::ManifestResource,
                TableId::GenericParam,
                TableId::GenericParamConstraint,
                TableId::MethodSpec,
            ],
            CodedIndexType::HasFieldMarshal => &[TableId::Field, TableId::Param],
            CodedIndexType::HasDeclSecurity => {
                &[TableId::TypeDef, TableId::MethodDef, TableId::Assembly]
            }
            CodedIndexType::MemberRefParent => &[
                TableId::TypeDef,
                TableId::TypeRef,
                TableId::ModuleRef,
                TableId::MethodDef,
                TableId::TypeSpec,
            ],
            CodedIndexType::HasSemantics => &[TableId::Event, TableId::Property],
            CodedIndexType::MethodDefOrRef => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::MemberForwarded => &[TableId::Field, TableId::MethodDef],
            CodedIndexType::Implementation => {
                &[TableId::File, TableId::AssemblyRef, TableId::ExportedType]
            }
            // Tags 0, 1 and 4 are unused in this family, ECMA-335 reserves
            // them. The placeholder entries keep the slice position equal to
            // the tag value.
            CodedIndexType::CustomAttributeType => &[
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::MethodDef,
                TableId::MemberRef,
                TableId::TypeDef,
            ],
            CodedIndexType::ResolutionScope => &[
                TableId::Module,
                TableId::ModuleRef,
                TableId::AssemblyRef,
                TableId::TypeRef,
            ],
            CodedIndexType::TypeOrMethodDef => &[TableId::TypeDef, TableId::MethodDef],
            CodedIndexType::HasCustomDebugInformation => &[
                TableId::MethodDef,
                TableId::Field,
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::Param,
                TableId::InterfaceImpl,
                TableId::MemberRef,
                TableId::Module,
                TableId::DeclSecurity,
                TableId::Property,
                TableId::Event,
                TableId::StandAloneSig,
                TableId::ModuleRef,
                TableId::TypeSpec,
                TableId::Assembly,
                TableId::AssemblyRef,
                TableId::File,
                TableId::ExportedType,
                TableId::ManifestResource,
                TableId::GenericParam,
                TableId::GenericParamConstraint,
                TableId::MethodSpec,
                TableId::Document,
                TableId::LocalScope,
                TableId::LocalVariable,
                TableId::LocalConstant,
                TableId::ImportScope,
            ],
        }
    }

    /// Number of low bits used for the tag.
    #[must_use]
    pub fn tag_bits(&self) -> u8 {
        let count = self.tables().len();
        (usize::BITS - (count - 1).leading_zeros()) as u8
    }
}

/// A decoded coded index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodedIndex {
    /// The table the index points into.
    pub tag: TableId,
    /// The 1-based row number, 0 for a null reference.
    pub row: u32,
    /// The equivalent metadata token.
    pub token: Token,
}

impl CodedIndex {
    /// Builds a coded index from its decoded parts.
    #[must_use]
    pub fn new(tag: TableId, row: u32) -> CodedIndex {
        CodedIndex {
            tag,
            row,
            token: Token::from_table_row(tag, row),
        }
    }

    /// Reads and decodes a coded index of family `ci_type` at `offset`,
    /// advancing past it. The on-disk width comes from `info`.
    ///
    /// # Errors
    ///
    /// Returns an error on truncation or a tag value the family does not
    /// define.
    pub fn read(
        data: &[u8],
        offset: &mut usize,
        info: &TableInfo,
        ci_type: CodedIndexType,
    ) -> Result<CodedIndex> {
        let raw = read_le_at_dyn(data, offset, info.coded_index_bytes(ci_type) == 4)?;
        info.decode_coded_index(raw, ci_type)
    }
}
