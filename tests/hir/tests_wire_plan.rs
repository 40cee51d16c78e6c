//! Wire message planning over extracted models.

use gokit_model::hir::{ConflictError, ExtractError, WireField, implements, plan_message};

use crate::helpers::model_helpers::extract;
use crate::helpers::source_fixtures::*;

fn wire(name: &str, seq: u32, wire_type: &str) -> WireField {
    WireField {
        name: name.to_string(),
        seq,
        wire_type: wire_type.to_string(),
    }
}

#[test]
fn test_tagged_struct_plan() {
    let model = extract(TAGGED_SOURCE);
    let user = model.struct_by_name("User").unwrap();
    let message = plan_message(user, model.struct_table()).unwrap();

    assert_eq!(message.name, "User");
    assert_eq!(
        message.fields,
        vec![
            wire("user_id", 1, "int64"),
            wire("Name", 2, "string"),
            wire("Roles", 5, "repeated string"),
            wire("Level", 3, "sint32"),
        ]
    );
}

#[test]
fn test_untagged_struct_numbers_in_order() {
    let model = extract(SERVICE_SOURCE);
    let request = model.struct_by_name("DoRequest").unwrap();
    let message = plan_message(request, model.struct_table()).unwrap();

    assert_eq!(message.field("Name"), Some(&wire("Name", 1, "string")));
    assert_eq!(message.field("Limit"), Some(&wire("Limit", 2, "int64")));
    // Enum-like fields use the aliased scalar
    assert_eq!(message.field("Status"), Some(&wire("Status", 3, "int32")));
    // Unresolved message types keep their name
    assert_eq!(message.field("Item"), Some(&wire("Item", 4, "Item")));
}

#[test]
fn test_duplicate_sequence_is_rejected() {
    let model = extract(TAGGED_SOURCE);
    let strc = model.struct_by_name("Conflicting").unwrap();
    let err = plan_message(strc, model.struct_table()).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::NameConflict(ConflictError::DuplicateSequence { seq: 1, .. })
    ));
}

#[test]
fn test_alias_has_no_message() {
    let model = extract(TAGGED_SOURCE);
    let level = model.struct_by_name("Level").unwrap();
    assert!(matches!(
        plan_message(level, model.struct_table()),
        Err(ExtractError::UnsupportedType { .. })
    ));
}

#[test]
fn test_service_struct_implements_interface() {
    let model = extract(SERVICE_SOURCE);
    let iface = model.interface("Service").unwrap();
    let service = model.struct_by_name("service").unwrap();
    assert!(implements(iface, service));

    // Request structs bind no methods
    let request = model.struct_by_name("DoRequest").unwrap();
    assert!(!implements(iface, request));
}
