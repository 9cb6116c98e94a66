//! The feature vocabulary reported by extractors.
//!
//! A feature is a characteristic of the analyzed binary paired with the
//! address it was observed at. For .NET binaries the address is the
//! metadata token of the originating row, or 0 for file-global facts.

use std::fmt;

/// Instruction set architecture a binary is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 32-bit x86 only.
    I386,
    /// 64-bit x86 only.
    Amd64,
    /// No architecture restriction.
    Any,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::I386 => write!(f, "i386"),
            Arch::Amd64 => write!(f, "amd64"),
            Arch::Any => write!(f, "any"),
        }
    }
}

/// Operating system a binary targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Microsoft Windows.
    Windows,
    /// Linux.
    Linux,
    /// Apple macOS.
    Macos,
    /// No OS restriction, e.g. a CIL-only image.
    Any,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Windows => write!(f, "windows"),
            Os::Linux => write!(f, "linux"),
            Os::Macos => write!(f, "macos"),
            Os::Any => write!(f, "any"),
        }
    }
}

/// Executable container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Native portable executable.
    Pe,
    /// .NET managed executable.
    DotNet,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Pe => write!(f, "pe"),
            Format::DotNet => write!(f, "dotnet"),
        }
    }
}

/// One extracted feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Feature {
    /// An imported symbol, managed or native.
    Import(String),
    /// The qualified name of a defined function.
    FunctionName(String),
    /// A namespace in use.
    Namespace(String),
    /// A class in use.
    Class(String),
    /// A named structural property, e.g. `mixed mode`.
    Characteristic(String),
    /// The architecture restriction.
    Arch(Arch),
    /// The targeted operating system.
    Os(Os),
    /// The container format.
    Format(Format),
    /// A printable string found in the binary.
    String(String),
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Import(value) => write!(f, "import({value})"),
            Feature::FunctionName(value) => write!(f, "function-name({value})"),
            Feature::Namespace(value) => write!(f, "namespace({value})"),
            Feature::Class(value) => write!(f, "class({value})"),
            Feature::Characteristic(value) => write!(f, "characteristic({value})"),
            Feature::Arch(value) => write!(f, "arch({value})"),
            Feature::Os(value) => write!(f, "os({value})"),
            Feature::Format(value) => write!(f, "format({value})"),
            Feature::String(value) => write!(f, "string({value})"),
        }
    }
}
