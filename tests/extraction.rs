//! End-to-end feature extraction over a crafted .NET image.

mod common;

use std::collections::HashSet;

use dotfeat::prelude::*;

fn extractor(flags: u32) -> DotnetFileExtractor {
    DotnetFileExtractor::from_bytes(common::build_dotnet_pe(flags)).unwrap()
}

fn imports(features: &[(Feature, u32)]) -> Vec<(String, u32)> {
    features
        .iter()
        .filter_map(|(feature, address)| match feature {
            Feature::Import(name) => Some((name.clone(), *address)),
            _ => None,
        })
        .collect()
}

#[test]
fn managed_imports() {
    let features = extractor(common::FLAGS_ILONLY_32BIT).file_features();
    let imports = imports(&features);

    assert!(imports.contains(&("System.IO.File::OpenRead".to_string(), 0x0A00_0001)));
    assert!(imports.contains(&("System.Console::WriteLine".to_string(), 0x0A00_0002)));
}

#[test]
fn unmanaged_import_variants() {
    let features = extractor(common::FLAGS_ILONLY_32BIT).file_features();

    // All variants report at the forwarded MethodDef token.
    let native: HashSet<String> = imports(&features)
        .into_iter()
        .filter(|(_, address)| *address == 0x0600_0002)
        .map(|(name, _)| name)
        .collect();

    let expected: HashSet<String> = [
        "kernel32.CreateFile",
        "CreateFile",
        "CreateFileA",
        "kernel32.CreateFileA",
        "CreateFileW",
        "kernel32.CreateFileW",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();

    assert_eq!(native, expected);
}

#[test]
fn function_names() {
    let features = extractor(common::FLAGS_ILONLY_32BIT).file_features();

    let functions: Vec<(String, u32)> = features
        .iter()
        .filter_map(|(feature, address)| match feature {
            Feature::FunctionName(name) => Some((name.clone(), *address)),
            _ => None,
        })
        .collect();

    assert_eq!(
        functions,
        vec![
            ("MyApp.Program::Main".to_string(), 0x0600_0001),
            ("MyApp.Program::CreateFile".to_string(), 0x0600_0002),
        ]
    );
}

#[test]
fn namespaces_are_deduplicated_and_non_empty() {
    let features = extractor(common::FLAGS_ILONLY_32BIT).file_features();

    let namespaces: Vec<(String, u32)> = features
        .iter()
        .filter_map(|(feature, address)| match feature {
            Feature::Namespace(name) => Some((name.clone(), *address)),
            _ => None,
        })
        .collect();

    // <Module> has an empty namespace which must not be reported.
    let names: HashSet<&str> = namespaces.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, HashSet::from(["MyApp", "System", "System.IO"]));
    assert!(namespaces.iter().all(|(_, address)| *address == 0));
}

#[test]
fn classes_at_their_tokens() {
    let features = extractor(common::FLAGS_ILONLY_32BIT).file_features();

    let classes: HashSet<(String, u32)> = features
        .iter()
        .filter_map(|(feature, address)| match feature {
            Feature::Class(name) => Some((name.clone(), *address)),
            _ => None,
        })
        .collect();

    let expected: HashSet<(String, u32)> = [
        ("<Module>".to_string(), 0x0200_0001),
        ("MyApp.Program".to_string(), 0x0200_0002),
        ("System.IO.File".to_string(), 0x0100_0001),
        ("System.Console".to_string(), 0x0100_0002),
    ]
    .into_iter()
    .collect();

    assert_eq!(classes, expected);
}

#[test]
fn format_feature() {
    let features = extractor(common::FLAGS_ILONLY_32BIT).file_features();
    assert!(features.contains(&(Feature::Format(Format::DotNet), 0)));
}

#[test]
fn strings_include_metadata_text() {
    let features = extractor(common::FLAGS_ILONLY_32BIT).file_features();

    let strings: Vec<&str> = features
        .iter()
        .filter_map(|(feature, _)| match feature {
            Feature::String(value) => Some(value.as_str()),
            _ => None,
        })
        .collect();

    assert!(strings.iter().any(|value| value.contains("v4.0.30319")));
    assert!(strings.iter().any(|value| value.contains("kernel32.dll")));
}

#[test]
fn mixed_mode_characteristic() {
    let ilonly = extractor(common::FLAGS_ILONLY_32BIT).file_features();
    assert!(!ilonly
        .iter()
        .any(|(feature, _)| matches!(feature, Feature::Characteristic(_))));

    let mixed = extractor(common::FLAGS_MIXED_MODE).file_features();
    assert!(mixed.contains(&(Feature::Characteristic("mixed mode".to_string()), 0)));
}

#[test]
fn global_features() {
    let features = extractor(common::FLAGS_ILONLY_32BIT).global_features();

    assert_eq!(
        features,
        vec![(Feature::Os(Os::Any), 0), (Feature::Arch(Arch::I386), 0)]
    );
}

#[test]
fn no_type_tables_yields_no_classes_or_namespaces() {
    let extractor =
        DotnetFileExtractor::from_bytes(common::build_dotnet_pe_no_types(common::FLAGS_ILONLY_32BIT))
            .unwrap();

    let features = extractor.file_features();
    assert!(!features.iter().any(|(feature, _)| matches!(
        feature,
        Feature::Class(_) | Feature::Namespace(_) | Feature::Import(_) | Feature::FunctionName(_)
    )));
    assert!(features.contains(&(Feature::Format(Format::DotNet), 0)));
}

#[test]
fn arch_any_without_32bit_required() {
    let features = extractor(0x1).global_features();
    assert!(features.contains(&(Feature::Arch(Arch::Any), 0)));
}
