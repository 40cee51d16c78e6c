//! Cross-package resolution tests.

use std::fs;

use gokit_model::base::Config;
use gokit_model::hir::{ExtractError, ReferenceResolver, TypeRef};
use gokit_model::project::MemoryLoader;
use tempfile::TempDir;

use crate::helpers::model_helpers::*;
use crate::helpers::source_fixtures::*;

// =============================================================================
// RESOLUTION
// =============================================================================

#[test]
fn test_request_reference_loads_package() {
    let config = Config::default();
    let resolver = ReferenceResolver::new(&config, pb_loader());
    let model = extract_resolving(&config, &resolver, SERVICE_SOURCE).unwrap();

    let table = model.struct_table();
    assert!(table.contains("pb", "Item"));
    assert!(table.contains("pb", "Filter"));
    // Every file of the package is merged
    assert!(table.contains("pb", "Page"));
    assert!(resolver.is_visited(PB_IMPORT_PATH));

    // Resolved structs stay out of the model's own package listing
    let own: Vec<_> = model.structs().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        own,
        vec!["DoRequest", "DoResponse", "Item", "ListRequest", "ListResponse", "Status", "service"]
    );

    let item = model.struct_by_name("DoRequest").unwrap().field("Item").unwrap();
    assert_eq!(item.ty, TypeRef::named("Item").with_qualifier("pb").pointer_to());
}

#[test]
fn test_resolved_package_keeps_its_own_name() {
    let config = Config::default().with_package_name("endpoint");
    let resolver = ReferenceResolver::new(&config, pb_loader());
    let model = extract_resolving(&config, &resolver, SERVICE_SOURCE).unwrap();
    assert_eq!(model.package_name(), "endpoint");
    assert!(model.struct_table().contains("pb", "Item"));
    assert!(model.struct_table().contains("endpoint", "DoRequest"));
}

#[test]
fn test_reference_outside_request_is_not_resolved() {
    let source = r#"package svc

import "example.com/gen/pb"

type Cache struct {
	Item *pb.Item
}
"#;
    let config = Config::default();
    let loader = CountingLoader::new(pb_loader());
    let resolver = ReferenceResolver::new(&config, &loader);
    let model = extract_resolving(&config, &resolver, source).unwrap();
    assert_eq!(loader.calls(), 0);
    assert!(!model.struct_table().contains("pb", "Item"));
}

#[test]
fn test_nested_struct_of_request_triggers_resolution() {
    let source = r#"package svc

import "example.com/gen/pb"

type GetRequest struct {
	Page Paging
}

type Paging struct {
	Page *pb.Page
}
"#;
    let config = Config::default();
    let resolver = ReferenceResolver::new(&config, pb_loader());
    let model = extract_resolving(&config, &resolver, source).unwrap();
    assert!(model.struct_table().contains("pb", "Page"));
}

#[test]
fn test_resolution_is_memoized() {
    let config = Config::default();
    let loader = CountingLoader::new(pb_loader());
    let resolver = ReferenceResolver::new(&config, &loader);

    // DoRequest and ListRequest both reference the pb package
    extract_resolving(&config, &resolver, SERVICE_SOURCE).unwrap();
    assert_eq!(loader.calls(), 1);

    // A second unit sharing the resolver does not scan again
    let second = extract_resolving(&config, &resolver, SERVICE_SOURCE).unwrap();
    assert_eq!(loader.calls(), 1);
    // but still sees the package's structs
    assert!(second.struct_table().contains("pb", "Item"));
    assert!(second.struct_table().contains("pb", "Filter"));
}

#[test]
fn test_remembered_package_serves_other_units() {
    let other = r#"package admin

import "example.com/gen/pb"

type PageRequest struct {
	Page *pb.Page
}
"#;
    let config = Config::default();
    let loader = CountingLoader::new(pb_loader());
    let resolver = ReferenceResolver::new(&config, &loader);
    extract_resolving(&config, &resolver, SERVICE_SOURCE).unwrap();
    let model = extract_resolving(&config, &resolver, other).unwrap();

    assert_eq!(loader.calls(), 1);
    assert!(model.struct_table().contains("pb", "Page"));
    assert!(model.struct_table().contains("admin", "PageRequest"));
}

// =============================================================================
// STRICTNESS
// =============================================================================

const MISSING_IMPORT: &str = r#"package svc

import "example.com/gone"

type GetRequest struct {
	Thing *gone.Thing
}
"#;

#[test]
fn test_missing_package_is_lenient_by_default() {
    let config = Config::default();
    let resolver = ReferenceResolver::new(&config, MemoryLoader::new());
    let model = extract_resolving(&config, &resolver, MISSING_IMPORT).unwrap();
    let thing = model.struct_by_name("GetRequest").unwrap().field("Thing").unwrap();
    assert_eq!(thing.ty.qualifier.as_deref(), Some("gone"));
}

#[test]
fn test_missing_package_fails_in_strict_mode() {
    let config = Config::default().with_strict_resolution(true);
    let resolver = ReferenceResolver::new(&config, MemoryLoader::new());
    let err = extract_resolving(&config, &resolver, MISSING_IMPORT).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::UnresolvedReference { ref package, ref name } if package == "gone" && name == "Thing"
    ));
}

#[test]
fn test_missing_import_fails_in_strict_mode() {
    let source = "package svc\n\ntype GetRequest struct {\n\tThing *gone.Thing\n}\n";
    let config = Config::default().with_strict_resolution(true);
    let resolver = ReferenceResolver::new(&config, pb_loader());
    assert!(extract_resolving(&config, &resolver, source).is_err());
}

#[test]
fn test_missing_struct_in_found_package_fails_in_strict_mode() {
    let source = r#"package svc

import "example.com/gen/pb"

type GetRequest struct {
	Thing *pb.Thing
}
"#;
    let config = Config::default().with_strict_resolution(true);
    let resolver = ReferenceResolver::new(&config, pb_loader());
    assert!(matches!(
        extract_resolving(&config, &resolver, source),
        Err(ExtractError::UnresolvedReference { .. })
    ));
}

#[test]
fn test_missing_struct_in_remembered_package_fails_in_strict_mode() {
    let source = r#"package svc

import "example.com/gen/pb"

type GetRequest struct {
	Thing *pb.Thing
}
"#;
    let config = Config::default().with_strict_resolution(true);
    let resolver = ReferenceResolver::new(&config, pb_loader());
    extract_resolving(&config, &resolver, SERVICE_SOURCE).unwrap();
    assert!(resolver.is_visited(PB_IMPORT_PATH));
    assert!(matches!(
        extract_resolving(&config, &resolver, source),
        Err(ExtractError::UnresolvedReference { ref name, .. }) if name == "Thing"
    ));
}

#[test]
fn test_missing_package_stays_missing_in_strict_mode() {
    let config = Config::default().with_strict_resolution(true);
    let loader = CountingLoader::new(MemoryLoader::new());
    let resolver = ReferenceResolver::new(&config, &loader);
    assert!(extract_resolving(&config, &resolver, MISSING_IMPORT).is_err());
    assert!(extract_resolving(&config, &resolver, MISSING_IMPORT).is_err());
    assert_eq!(loader.calls(), 1);
}

// =============================================================================
// FILESYSTEM
// =============================================================================

#[test]
fn test_filesystem_search_roots() {
    let root = TempDir::new().unwrap();
    let dir = root.path().join(PB_IMPORT_PATH);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("service.pb.go"), PB_SOURCE).unwrap();
    // Test files are not part of the package
    fs::write(dir.join("service_test.go"), "package pb\n\ntype Fixture struct{}\n").unwrap();

    let empty = TempDir::new().unwrap();
    let config = Config::default()
        .with_search_root(empty.path())
        .with_search_root(root.path());
    let resolver = ReferenceResolver::from_config(&config);
    let model = extract_resolving(&config, &resolver, SERVICE_SOURCE).unwrap();

    assert!(model.struct_table().contains("pb", "Item"));
    assert!(!model.struct_table().contains("pb", "Fixture"));
}

#[test]
fn test_filesystem_parse_error_names_file() {
    let root = TempDir::new().unwrap();
    let dir = root.path().join(PB_IMPORT_PATH);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("broken.go"), "type Item struct{}\n").unwrap();

    let config = Config::default().with_search_root(root.path());
    let resolver = ReferenceResolver::from_config(&config);
    let err = extract_resolving(&config, &resolver, SERVICE_SOURCE).unwrap_err();
    match err {
        ExtractError::Parse { message, .. } => assert!(message.contains("broken.go")),
        other => panic!("expected a parse error, got {:?}", other),
    }
}
