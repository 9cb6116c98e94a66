//! Metadata table identifiers.

use strum::{EnumCount, EnumIter};

/// All metadata tables defined by ECMA-335 plus the Portable PDB tables.
///
/// The discriminant is the table number used in tokens and in the `valid`
/// bitvector of the tables stream header. Iteration order (via `EnumIter`)
/// is ascending table number, which is also the physical order of the row
/// count array and of the table data itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
#[repr(u8)]
pub enum TableId {
    /// Current assembly information
    Module = 0x00,
    /// References to types in other assemblies
    TypeRef = 0x01,
    /// Type definitions in this assembly
    TypeDef = 0x02,
    /// Indirection table for Field (uncompressed streams)
    FieldPtr = 0x03,
    /// Field definitions
    Field = 0x04,
    /// Indirection table for MethodDef (uncompressed streams)
    MethodPtr = 0x05,
    /// Method definitions
    MethodDef = 0x06,
    /// Indirection table for Param (uncompressed streams)
    ParamPtr = 0x07,
    /// Method parameter definitions
    Param = 0x08,
    /// Interfaces implemented by types
    InterfaceImpl = 0x09,
    /// References to members of other types
    MemberRef = 0x0A,
    /// Compile-time constant values
    Constant = 0x0B,
    /// Custom attribute instances
    CustomAttribute = 0x0C,
    /// Field marshaling information
    FieldMarshal = 0x0D,
    /// Declarative security attributes
    DeclSecurity = 0x0E,
    /// Class layout information
    ClassLayout = 0x0F,
    /// Field layout offsets
    FieldLayout = 0x10,
    /// Standalone signatures
    StandAloneSig = 0x11,
    /// Event map for types
    EventMap = 0x12,
    /// Indirection table for Event (uncompressed streams)
    EventPtr = 0x13,
    /// Event definitions
    Event = 0x14,
    /// Property map for types
    PropertyMap = 0x15,
    /// Indirection table for Property (uncompressed streams)
    PropertyPtr = 0x16,
    /// Property definitions
    Property = 0x17,
    /// Method semantics (getters, setters, event handlers)
    MethodSemantics = 0x18,
    /// Method implementation overrides
    MethodImpl = 0x19,
    /// References to external modules
    ModuleRef = 0x1A,
    /// Type specifications (generic instantiations)
    TypeSpec = 0x1B,
    /// P/Invoke mappings of managed methods to native imports
    ImplMap = 0x1C,
    /// Field RVAs for fields with initial data
    FieldRVA = 0x1D,
    /// Edit-and-continue log
    EncLog = 0x1E,
    /// Edit-and-continue map
    EncMap = 0x1F,
    /// Assembly manifest of this assembly
    Assembly = 0x20,
    /// Deprecated, processor-specific assembly data
    AssemblyProcessor = 0x21,
    /// Deprecated, OS-specific assembly data
    AssemblyOS = 0x22,
    /// References to external assemblies
    AssemblyRef = 0x23,
    /// Deprecated, processor-specific assembly reference data
    AssemblyRefProcessor = 0x24,
    /// Deprecated, OS-specific assembly reference data
    AssemblyRefOS = 0x25,
    /// Files in this assembly
    File = 0x26,
    /// Types exported from this assembly
    ExportedType = 0x27,
    /// Manifest resources
    ManifestResource = 0x28,
    /// Nested class relationships
    NestedClass = 0x29,
    /// Generic parameter definitions
    GenericParam = 0x2A,
    /// Generic method instantiations
    MethodSpec = 0x2B,
    /// Constraints on generic parameters
    GenericParamConstraint = 0x2C,
    /// Portable PDB, source documents
    Document = 0x30,
    /// Portable PDB, method debug information
    MethodDebugInformation = 0x31,
    /// Portable PDB, local scopes
    LocalScope = 0x32,
    /// Portable PDB, local variables
    LocalVariable = 0x33,
    /// Portable PDB, local constants
    LocalConstant = 0x34,
    /// Portable PDB, import scopes
    ImportScope = 0x35,
    /// Portable PDB, state machine methods
    StateMachineMethod = 0x36,
    /// Portable PDB, custom debug information
    CustomDebugInformation = 0x37,
}
