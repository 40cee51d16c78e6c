//! End-to-end conversions over extracted models.

use gokit_model::codegen::{
    AccessPath, ConversionSynthesizer, ShapeAlias, SynthesisError, request_response_pairs,
};
use gokit_model::base::Config;

use crate::helpers::model_helpers::extract;
use crate::helpers::source_fixtures::*;

#[test]
fn test_identical_scalar_field() {
    let domain = extract("package svc\n\ntype T struct {\n\tName string\n}\n");
    let wire = extract("package pb\n\ntype T struct {\n\tName string\n}\n");
    let synth = ConversionSynthesizer::new([domain.struct_table(), wire.struct_table()]);

    let src = domain.struct_by_name("T").unwrap();
    let dest = wire.struct_by_name("T").unwrap();
    let out = synth
        .convert(dest, src, &ShapeAlias::for_struct("src", src, false))
        .unwrap();
    assert_eq!(out, "Name: src.Name,\n");
}

#[test]
fn test_pointer_source_into_value() {
    let domain = extract("package svc\n\ntype T struct {\n\tX *int\n}\n");
    let wire = extract("package pb\n\ntype T struct {\n\tX int\n}\n");
    let synth = ConversionSynthesizer::new([domain.struct_table(), wire.struct_table()]);

    let src = domain.struct_by_name("T").unwrap();
    let dest = wire.struct_by_name("T").unwrap();
    let out = synth
        .convert(dest, src, &ShapeAlias::for_struct("src", src, false))
        .unwrap();
    assert_eq!(
        out,
        "X: func() (v int) { if src.X != nil { v = *src.X }; return v }(),\n"
    );
}

#[test]
fn test_slice_of_structs() {
    let source = r#"package svc

type A struct {
	Items []Item
}

type B struct {
	Items []ItemB
}

type Item struct {
	V int32
}

type ItemB struct {
	V int64
}
"#;
    let model = extract(source);
    let synth = ConversionSynthesizer::new([model.struct_table()]);
    let src = model.struct_by_name("A").unwrap();
    let dest = model.struct_by_name("B").unwrap();
    let out = synth
        .convert(dest, src, &ShapeAlias::for_struct("src", src, false))
        .unwrap();

    let expected = "Items: func(src []svc.Item) (dst []svc.ItemB) {
dst = make([]svc.ItemB, len(src))
for i := range src {
temp := src[i]
dst[i] = func(src svc.Item) (dst svc.ItemB) {
dst = svc.ItemB{
V: int64(src.V),
}
return dst
}(temp)
}
return
}(src.Items),
";
    assert_eq!(out, expected);
}

#[test]
fn test_request_pairs_of_service() {
    let config = Config::default();
    let domain = extract(SERVICE_SOURCE);
    let iface = domain.interface("Service").unwrap();
    let pairs = request_response_pairs(&domain, iface, &config);

    let methods: Vec<_> = pairs.iter().map(|p| p.method.name.as_str()).collect();
    assert_eq!(methods, vec!["Do", "List"]);
    assert_eq!(pairs[0].request.unwrap().name, "DoRequest");
    assert_eq!(pairs[0].response.unwrap().name, "DoResponse");
    assert_eq!(pairs[1].request.unwrap().name, "ListRequest");
}

#[test]
fn test_generate_wire_request() {
    let config = Config::default();
    let domain = extract(SERVICE_SOURCE);
    let wire = extract(PB_SOURCE);
    let iface = domain.interface("Service").unwrap();
    let pairs = request_response_pairs(&domain, iface, &config);
    let synth = ConversionSynthesizer::new([domain.struct_table(), wire.struct_table()]);

    let src = domain.struct_by_name("DoRequest").unwrap();
    let dest = wire.struct_by_name("DoRequest").unwrap();
    let out = synth
        .generate(dest, &pairs, &ShapeAlias::for_struct("req", src, false))
        .unwrap();

    assert_eq!(
        out,
        "Name: req.Name,\n\
         Limit: func() (v int64) { if req.Limit != nil { v = int64(*req.Limit) }; return v }(),\n\
         Status: pb.Status(req.Status),\n"
    );
}

#[test]
fn test_generate_wire_response_through_pointer() {
    let config = Config::default();
    let domain = extract(SERVICE_SOURCE);
    let wire = extract(PB_SOURCE);
    let iface = domain.interface("Service").unwrap();
    let pairs = request_response_pairs(&domain, iface, &config);
    let synth = ConversionSynthesizer::new([domain.struct_table(), wire.struct_table()]);

    let src = domain.struct_by_name("DoResponse").unwrap();
    let dest = wire.struct_by_name("DoResponse").unwrap();
    let out = synth
        .generate(dest, &pairs, &ShapeAlias::for_struct("resp", src, true))
        .unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines[0],
        "Code: func() (v int64) { if resp != nil { v = int64(resp.Code) }; return v }(),"
    );
    assert!(out.contains("func() (v []*pb.Item) { if resp != nil { v = func(src []*svc.Item) (dst []*pb.Item) {\n"));
    assert!(out.contains("dst[i] = func(src *svc.Item) (dst *pb.Item) {\nif src != nil {\ndst = &pb.Item{\nV: int64(src.V),\n}\n}\nreturn dst\n}(temp)\n"));
    assert!(out.ends_with(
        "Err: func() (v string) { if resp != nil { v = resp.Err }; return v }(),\n"
    ));
}

#[test]
fn test_generate_without_candidate() {
    let config = Config::default();
    let domain = extract(SERVICE_SOURCE);
    let wire = extract(PB_EXTRA_SOURCE);
    let iface = domain.interface("Service").unwrap();
    let pairs = request_response_pairs(&domain, iface, &config);
    let synth = ConversionSynthesizer::new([domain.struct_table(), wire.struct_table()]);

    let dest = wire.struct_by_name("Page").unwrap();
    let alias = ShapeAlias::new("req", "svc", "DoRequest", false);
    assert_eq!(
        synth.generate(dest, &pairs, &alias).unwrap_err(),
        SynthesisError::unresolved("pb", "Page")
    );
}

#[test]
fn test_nested_alias_guards_every_pointer() {
    let domain = extract(
        "package svc\n\ntype Envelope struct {\n\tData *Data\n}\n\ntype Data struct {\n\tName string\n\tCount *int32\n}\n",
    );
    let wire = extract("package pb\n\ntype Data struct {\n\tName string\n\tCount int64\n}\n");
    let synth = ConversionSynthesizer::new([domain.struct_table(), wire.struct_table()]);

    let alias = ShapeAlias::new("resp", "svc", "Envelope", true).with_segment("Data");
    let src = domain.struct_by_name("Data").unwrap();
    let dest = wire.struct_by_name("Data").unwrap();
    let out = synth.convert(dest, src, &alias).unwrap();

    assert_eq!(
        out,
        "Name: func() (v string) { if resp != nil && resp.Data != nil { v = resp.Data.Name }; return v }(),\n\
         Count: func() (v int64) { if resp != nil && resp.Data != nil && resp.Data.Count != nil { v = int64(*resp.Data.Count) }; return v }(),\n"
    );
}
