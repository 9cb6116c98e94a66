//! File-level and global feature rules.
//!
//! Each rule is a plain function from a loaded binary to features, and the
//! rule tables [`FILE_RULES`] and [`GLOBAL_RULES`] fix the emission order.
//! Every feature is paired with the address it was observed at: a metadata
//! token, a file offset for scanned strings, or 0 for file-global facts.

pub mod headers;
pub mod naming;
pub mod resolve;
pub mod strings;

use std::collections::BTreeSet;

use crate::{
    features::{Feature, Format, Os},
    metadata::{
        tables::{TypeDefRaw, TypeRefRaw},
        view::DotnetFile,
    },
};

/// A rule emitting features for one aspect of the binary.
pub type Rule = fn(&DotnetFile, &mut Vec<(Feature, u32)>);

/// All file-scope rules, in emission order.
pub static FILE_RULES: &[Rule] = &[
    file_import_names,
    file_function_names,
    file_strings,
    file_format,
    file_mixed_mode,
    file_namespaces,
    file_classes,
];

/// All global-scope rules, in emission order.
pub static GLOBAL_RULES: &[Rule] = &[global_os, global_arch];

/// Runs every file-scope rule and collects the features.
#[must_use]
pub fn file_features(file: &DotnetFile) -> Vec<(Feature, u32)> {
    let mut features = Vec::new();
    for rule in FILE_RULES {
        rule(file, &mut features);
    }
    features
}

/// Runs every global-scope rule and collects the features.
#[must_use]
pub fn global_features(file: &DotnetFile) -> Vec<(Feature, u32)> {
    let mut features = Vec::new();
    for rule in GLOBAL_RULES {
        rule(file, &mut features);
    }
    features
}

/// Emits one Import feature per managed import and per name variant of
/// every native import.
pub fn file_import_names(file: &DotnetFile, features: &mut Vec<(Feature, u32)>) {
    let Some(tables) = file.tables() else {
        return;
    };
    let strings = file.strings();

    for import in resolve::managed_imports(tables, strings) {
        features.push((Feature::Import(import.to_string()), import.token.value()));
    }

    for import in resolve::unmanaged_imports(tables, strings) {
        for variant in resolve::symbol_variants(&import.module, &import.symbol) {
            features.push((Feature::Import(variant), import.token.value()));
        }
    }
}

/// Emits one FunctionName feature per defined method, at its MethodDef
/// token.
pub fn file_function_names(file: &DotnetFile, features: &mut Vec<(Feature, u32)>) {
    let Some(tables) = file.tables() else {
        return;
    };

    for method in resolve::managed_methods(tables, file.strings()) {
        features.push((
            Feature::FunctionName(method.to_string()),
            method.token.value(),
        ));
    }
}

/// Emits String features for printable ASCII and UTF-16LE runs in the raw
/// file bytes, at their file offset.
pub fn file_strings(file: &DotnetFile, features: &mut Vec<(Feature, u32)>) {
    let data = file.data();

    for (text, offset) in strings::ascii_strings(data) {
        features.push((Feature::String(text), offset));
    }
    for (text, offset) in strings::utf16_strings(data) {
        features.push((Feature::String(text), offset));
    }
}

/// Emits the container format.
pub fn file_format(file: &DotnetFile, features: &mut Vec<(Feature, u32)>) {
    let _ = file;
    features.push((Feature::Format(Format::DotNet), 0));
}

/// Emits the `mixed mode` characteristic when the image carries native
/// code alongside IL.
pub fn file_mixed_mode(file: &DotnetFile, features: &mut Vec<(Feature, u32)>) {
    if headers::is_mixed_mode(file.cor_flags()) {
        features.push((Feature::Characteristic("mixed mode".to_string()), 0));
    }
}

/// Emits one Namespace feature per distinct non-empty namespace across
/// TypeDef and TypeRef rows, at address 0.
///
/// Namespaces are properties of the whole file, not of any single row, so
/// they are deduplicated and carry no token.
pub fn file_namespaces(file: &DotnetFile, features: &mut Vec<(Feature, u32)>) {
    let Some(tables) = file.tables() else {
        return;
    };
    let Some(heap) = file.strings() else {
        return;
    };

    let mut namespaces = BTreeSet::new();
    for type_def in tables.rows::<TypeDefRaw>() {
        if let Ok(namespace) = heap.get(type_def.type_namespace as usize) {
            namespaces.insert(namespace.to_string());
        }
    }
    for type_ref in tables.rows::<TypeRefRaw>() {
        if let Ok(namespace) = heap.get(type_ref.type_namespace as usize) {
            namespaces.insert(namespace.to_string());
        }
    }

    for namespace in namespaces {
        if !namespace.is_empty() {
            features.push((Feature::Namespace(namespace), 0));
        }
    }
}

/// Emits one Class feature per TypeDef and TypeRef row, at the row's own
/// token.
pub fn file_classes(file: &DotnetFile, features: &mut Vec<(Feature, u32)>) {
    let Some(tables) = file.tables() else {
        return;
    };
    let Some(heap) = file.strings() else {
        return;
    };

    for type_def in tables.rows::<TypeDefRaw>() {
        let (Ok(namespace), Ok(name)) = (
            heap.get(type_def.type_namespace as usize),
            heap.get(type_def.type_name as usize),
        ) else {
            continue;
        };
        features.push((
            Feature::Class(naming::format_type(namespace, name)),
            type_def.token.value(),
        ));
    }

    for type_ref in tables.rows::<TypeRefRaw>() {
        let (Ok(namespace), Ok(name)) = (
            heap.get(type_ref.type_namespace as usize),
            heap.get(type_ref.type_name as usize),
        ) else {
            continue;
        };
        features.push((
            Feature::Class(naming::format_type(namespace, name)),
            type_ref.token.value(),
        ));
    }
}

/// Emits the OS feature. Managed images run wherever the runtime does.
pub fn global_os(file: &DotnetFile, features: &mut Vec<(Feature, u32)>) {
    let _ = file;
    features.push((Feature::Os(Os::Any), 0));
}

/// Emits the architecture restriction inferred from the headers.
pub fn global_arch(file: &DotnetFile, features: &mut Vec<(Feature, u32)>) {
    let arch = headers::infer_arch(file.cor_flags(), file.file().is_pe64());
    features.push((Feature::Arch(arch), 0));
}
