//! Qualified name formatting.
//!
//! All names use dotted namespace separators and `::` before member names,
//! e.g. `System.IO.File::OpenRead`. Types in the empty namespace drop the
//! leading dot entirely.

use std::fmt;

use crate::metadata::token::Token;

/// Formats `namespace` and `name` as a qualified type name.
#[must_use]
pub fn format_type(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// Formats a fully qualified method name.
#[must_use]
pub fn format_method(namespace: &str, type_name: &str, method_name: &str) -> String {
    format!("{}::{}", format_type(namespace, type_name), method_name)
}

/// A resolved managed method or member reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedMethodRef {
    /// Namespace of the owning type, possibly empty.
    pub namespace: String,
    /// Name of the owning type.
    pub type_name: String,
    /// Name of the method.
    pub method_name: String,
    /// Token the reference is reported at.
    pub token: Token,
}

impl fmt::Display for ManagedMethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            format_method(&self.namespace, &self.type_name, &self.method_name)
        )
    }
}

/// A resolved native import reached through P/Invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmanagedImportRef {
    /// Name of the native module, as written in the binary.
    pub module: String,
    /// Name of the imported symbol, `#n` for ordinal imports.
    pub symbol: String,
    /// MethodDef token of the forwarded managed method.
    pub token: Token,
}

impl fmt::Display for UnmanagedImportRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(format_type("System.IO", "File"), "System.IO.File");
        assert_eq!(format_type("", "<Module>"), "<Module>");
    }

    #[test]
    fn method_names() {
        assert_eq!(
            format_method("System.IO", "File", "OpenRead"),
            "System.IO.File::OpenRead"
        );
        assert_eq!(format_method("", "Program", "Main"), "Program::Main");
    }

    #[test]
    fn managed_ref_display() {
        let reference = ManagedMethodRef {
            namespace: "System".to_string(),
            type_name: "Console".to_string(),
            method_name: "WriteLine".to_string(),
            token: Token::new(0x0A00_0001),
        };
        assert_eq!(reference.to_string(), "System.Console::WriteLine");
    }

    #[test]
    fn unmanaged_ref_display() {
        let reference = UnmanagedImportRef {
            module: "kernel32.dll".to_string(),
            symbol: "CreateFileA".to_string(),
            token: Token::new(0x0600_0002),
        };
        assert_eq!(reference.to_string(), "kernel32.dll.CreateFileA");
    }
}
