//! Rendering an extracted struct and extracting it again is lossless.

use gokit_model::hir::{Struct, StructBody, TypeModel, render_struct};
use rstest::rstest;

use crate::helpers::model_helpers::extract;
use crate::helpers::source_fixtures::*;

fn shape(strc: &Struct) -> (String, StructBody) {
    let body = match &strc.body {
        StructBody::Record(fields) => StructBody::Record(
            fields
                .iter()
                .cloned()
                .map(|f| f.with_position(Default::default()))
                .collect(),
        ),
        alias => alias.clone(),
    };
    (strc.name.clone(), body)
}

fn rerender(model: &TypeModel) -> String {
    let mut source = format!("package {}\n\n", model.package_name());
    for strc in model.structs() {
        source.push_str(&render_struct(strc));
        source.push('\n');
    }
    source
}

#[rstest]
#[case::service(SERVICE_SOURCE)]
#[case::wire_schema(PB_SOURCE)]
#[case::tagged(TAGGED_SOURCE)]
fn test_render_then_extract_is_stable(#[case] source: &str) {
    let first = extract(source);
    let second = extract(&rerender(&first));

    let before: Vec<_> = first.structs().into_iter().map(shape).collect();
    let after: Vec<_> = second.structs().into_iter().map(shape).collect();
    assert!(!before.is_empty());
    assert_eq!(before, after);
}

#[test]
fn test_filtered_fields_stay_out_of_rendering() {
    let model = extract(PB_SOURCE);
    let rendered = render_struct(model.struct_by_name("DoRequest").unwrap());
    assert!(!rendered.contains("XXX_unrecognized"));
    assert!(rendered.contains("\tName string `protobuf:\"bytes,1,opt,name=name\" json:\"name,omitempty\"`\n"));
}

#[test]
fn test_rendered_alias() {
    let model = extract(SERVICE_SOURCE);
    assert_eq!(
        render_struct(model.struct_by_name("Status").unwrap()),
        "type Status int32\n"
    );
}
