//! Cross-table resolution of imports and methods.
//!
//! All functions here degrade row by row: a reference that cannot be
//! resolved (dangling row index, bad heap offset) is logged and dropped,
//! never surfaced as an error. A damaged table therefore yields the subset
//! of rows that still make sense.

use tracing::debug;

use crate::{
    extract::naming::{ManagedMethodRef, UnmanagedImportRef},
    metadata::{
        strings::Strings,
        tables::{
            ImplMapRaw, MemberRefRaw, MethodDefRaw, ModuleRefRaw, TableId, TablesStream,
            TypeDefRaw, TypeRefRaw,
        },
    },
};

fn heap_str<'a>(strings: Option<&Strings<'a>>, index: u32, what: &str) -> Option<&'a str> {
    let strings = strings?;
    match strings.get(index as usize) {
        Ok(value) => Some(value),
        Err(error) => {
            debug!(index, what, %error, "unresolvable string heap index");
            None
        }
    }
}

/// Resolves all managed imports, i.e. MemberRef rows whose parent is a
/// TypeRef, joined with the referenced type for its namespace and name.
///
/// Rows with other parent kinds (TypeSpec, ModuleRef, MethodDef) are not
/// imports from another assembly in the sense rule matching needs, and are
/// skipped.
#[must_use]
pub fn managed_imports(
    tables: &TablesStream<'_>,
    strings: Option<&Strings<'_>>,
) -> Vec<ManagedMethodRef> {
    let type_refs = tables.table::<TypeRefRaw>();

    let mut imports = Vec::new();
    for member_ref in tables.rows::<MemberRefRaw>() {
        if member_ref.class.tag != TableId::TypeRef {
            continue;
        }

        let Some(type_ref) = type_refs
            .as_ref()
            .and_then(|table| table.get(member_ref.class.row))
        else {
            debug!(
                token = %member_ref.token,
                row = member_ref.class.row,
                "MemberRef parent points outside the TypeRef table"
            );
            continue;
        };

        let Some(method_name) = heap_str(strings, member_ref.name, "member name") else {
            continue;
        };
        let Some(type_name) = heap_str(strings, type_ref.type_name, "type name") else {
            continue;
        };
        let Some(namespace) = heap_str(strings, type_ref.type_namespace, "type namespace") else {
            continue;
        };

        imports.push(ManagedMethodRef {
            namespace: namespace.to_string(),
            type_name: type_name.to_string(),
            method_name: method_name.to_string(),
            token: member_ref.token,
        });
    }

    imports
}

/// Resolves all native imports reached through P/Invoke, i.e. ImplMap rows
/// joined with their ModuleRef for the module name.
///
/// The reported token is the forwarded MethodDef, the managed surface the
/// native call is reachable from.
#[must_use]
pub fn unmanaged_imports(
    tables: &TablesStream<'_>,
    strings: Option<&Strings<'_>>,
) -> Vec<UnmanagedImportRef> {
    let module_refs = tables.table::<ModuleRefRaw>();

    let mut imports = Vec::new();
    for impl_map in tables.rows::<ImplMapRaw>() {
        let Some(module_ref) = module_refs
            .as_ref()
            .and_then(|table| table.get(impl_map.import_scope))
        else {
            debug!(
                token = %impl_map.token,
                row = impl_map.import_scope,
                "ImplMap scope points outside the ModuleRef table"
            );
            continue;
        };

        let Some(module) = heap_str(strings, module_ref.name, "module name") else {
            continue;
        };
        let Some(symbol) = heap_str(strings, impl_map.import_name, "import name") else {
            continue;
        };

        if symbol.is_empty() {
            continue;
        }

        imports.push(UnmanagedImportRef {
            module: module.to_string(),
            symbol: symbol.to_string(),
            token: impl_map.member_forwarded.token,
        });
    }

    imports
}

/// Resolves all defined methods with their owning type's qualified name.
///
/// Ownership comes from the TypeDef `method_list` run: each type owns the
/// MethodDef rows from its own `method_list` up to the next type's, the
/// last type owning through the end of the table.
#[must_use]
pub fn managed_methods(
    tables: &TablesStream<'_>,
    strings: Option<&Strings<'_>>,
) -> Vec<ManagedMethodRef> {
    let Some(methods) = tables.table::<MethodDefRaw>() else {
        return Vec::new();
    };

    let type_defs: Vec<TypeDefRaw> = tables.rows::<TypeDefRaw>().collect();

    let mut resolved = Vec::new();
    for (position, type_def) in type_defs.iter().enumerate() {
        let Some(type_name) = heap_str(strings, type_def.type_name, "type name") else {
            continue;
        };
        let Some(namespace) = heap_str(strings, type_def.type_namespace, "type namespace") else {
            continue;
        };

        let start = type_def.method_list.max(1);
        let end = type_defs
            .get(position + 1)
            .map_or(methods.row_count() + 1, |next| next.method_list);

        for rid in start..end.max(start) {
            let Some(method) = methods.get(rid) else {
                continue;
            };
            let Some(method_name) = heap_str(strings, method.name, "method name") else {
                continue;
            };

            resolved.push(ManagedMethodRef {
                namespace: namespace.to_string(),
                type_name: type_name.to_string(),
                method_name: method_name.to_string(),
                token: method.token,
            });
        }
    }

    resolved
}

/// Strips a well-known library extension and lowercases a module name.
#[must_use]
pub fn normalize_module(module: &str) -> String {
    let lowered = module.to_lowercase();
    for extension in [".dll", ".drv", ".sys", ".ocx"] {
        if let Some(stripped) = lowered.strip_suffix(extension) {
            return stripped.to_string();
        }
    }
    lowered
}

/// Expands a native import into the name forms rules may match on.
///
/// Always yields `module.symbol` and the bare symbol. Symbols without an
/// explicit `A`/`W` suffix additionally yield both suffixed forms, so a
/// rule written against either ANSI or wide variant still matches. Ordinal
/// imports (`#n`) get no suffix variants.
#[must_use]
pub fn symbol_variants(module: &str, symbol: &str) -> Vec<String> {
    let module = normalize_module(module);

    let mut variants = vec![format!("{module}.{symbol}"), symbol.to_string()];

    let is_ordinal = symbol.starts_with('#');
    let has_suffix = symbol.ends_with('A') || symbol.ends_with('W');
    if !is_ordinal && !has_suffix {
        for suffix in ['A', 'W'] {
            variants.push(format!("{symbol}{suffix}"));
            variants.push(format!("{module}.{symbol}{suffix}"));
        }
    }

    variants
}
