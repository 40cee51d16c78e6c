//! Per-field conversion rules and nil-guard placement.

use gokit_model::codegen::{AccessPath, ConversionSynthesizer, ShapeAlias, SynthesisError};
use rstest::rstest;

use crate::helpers::model_helpers::extract;

const SHARED_TYPES: &str = r#"
type Item struct {
	V int32
}

type Mode int8
"#;

/// Convert field `X` of `svc.T` into field `X` of `pb.T`.
fn convert_field(dst_ty: &str, src_ty: &str) -> Result<String, SynthesisError> {
    let domain = extract(&format!(
        "package svc\n\ntype T struct {{\n\tX {}\n}}\n{}",
        src_ty, SHARED_TYPES
    ));
    let wire = extract(&format!(
        "package pb\n\ntype T struct {{\n\tX {}\n}}\n{}",
        dst_ty, SHARED_TYPES
    ));
    let synth = ConversionSynthesizer::new([domain.struct_table(), wire.struct_table()]);
    let src = domain.struct_by_name("T").unwrap();
    let dest = wire.struct_by_name("T").unwrap();
    synth
        .convert(dest, src, &ShapeAlias::for_struct("src", src, false))
        .map(|out| {
            out.strip_prefix("X: ")
                .and_then(|rest| rest.strip_suffix(",\n"))
                .unwrap()
                .to_string()
        })
}

// =============================================================================
// SCALARS
// =============================================================================

#[rstest]
#[case::same("string", "string", "src.X")]
#[case::widened("int64", "int32", "int64(src.X)")]
#[case::both_pointers("*string", "*string", "src.X")]
#[case::address_of("*string", "string", "&src.X")]
#[case::enum_to_enum("Mode", "Mode", "pb.Mode(src.X)")]
#[case::enum_from_basic("Mode", "int8", "pb.Mode(src.X)")]
#[case::basic_from_enum("int32", "Mode", "int32(src.X)")]
fn test_direct_scalar(#[case] dst: &str, #[case] src: &str, #[case] expected: &str) {
    assert_eq!(convert_field(dst, src).unwrap(), expected);
}

#[rstest]
#[case::deref("string", "*string", "func() (v string) { if src.X != nil { v = *src.X }; return v }()")]
#[case::deref_convert(
    "int64",
    "*int32",
    "func() (v int64) { if src.X != nil { v = int64(*src.X) }; return v }()"
)]
#[case::pointer_convert(
    "*int64",
    "*int32",
    "func() (v *int64) { if src.X != nil { k := int64(*src.X); v = &k }; return v }()"
)]
#[case::value_to_pointer_convert(
    "*int64",
    "int32",
    "func() (v *int64) { k := int64(src.X); v = &k; return v }()"
)]
fn test_closure_scalar(#[case] dst: &str, #[case] src: &str, #[case] expected: &str) {
    assert_eq!(convert_field(dst, src).unwrap(), expected);
}

// =============================================================================
// CONTAINERS
// =============================================================================

#[rstest]
#[case::slice("[]string", "[]string")]
#[case::fixed_array("[4]int", "[4]int")]
#[case::map("map[string]int", "map[string]int")]
fn test_container_passthrough(#[case] dst: &str, #[case] src: &str) {
    assert_eq!(convert_field(dst, src).unwrap(), "src.X");
}

#[test]
fn test_fixed_array_loop_skips_make() {
    assert_eq!(
        convert_field("[2]int64", "[2]int32").unwrap(),
        "func(src [2]int32) (dst [2]int64) {\nfor i := range src {\ntemp := src[i]\ndst[i] = int64(temp)\n}\nreturn\n}(src.X)"
    );
}

#[rstest]
#[case::from_slice("[2]int64", "[]int32", "func(src []int32) (dst [2]int64) {")]
#[case::from_longer_array("[2]int64", "[3]int32", "func(src [3]int32) (dst [2]int64) {")]
fn test_fixed_array_loop_stops_at_destination_length(
    #[case] dst: &str,
    #[case] src: &str,
    #[case] header: &str,
) {
    assert_eq!(
        convert_field(dst, src).unwrap(),
        format!(
            "{}\nfor i := range src {{\nif i >= len(dst) {{\nbreak\n}}\ntemp := src[i]\ndst[i] = int64(temp)\n}}\nreturn\n}}(src.X)",
            header
        )
    );
}

#[test]
fn test_map_key_conversion() {
    assert_eq!(
        convert_field("map[int64]string", "map[int32]string").unwrap(),
        "func(src map[int32]string) (dst map[int64]string) {\ndst = make(map[int64]string, len(src))\nfor k, temp := range src {\ndst[int64(k)] = temp\n}\nreturn\n}(src.X)"
    );
}

#[test]
fn test_map_of_structs() {
    let out = convert_field("map[string]Item", "map[string]Item").unwrap();
    assert!(out.starts_with("func(src map[string]svc.Item) (dst map[string]pb.Item) {\n"));
    assert!(out.contains("dst[k] = func(src svc.Item) (dst pb.Item) {\ndst = pb.Item{\nV: src.V,\n}\nreturn dst\n}(temp)\n"));
}

// =============================================================================
// REJECTIONS
// =============================================================================

#[rstest]
#[case::kind_mismatch("[]int", "map[string]int", "array from map")]
#[case::struct_from_scalar("Item", "int32", "struct from basic")]
#[case::scalar_from_struct("int32", "Item", "basic from struct")]
#[case::chan("chan int", "chan int", "chan")]
#[case::func("func()", "func()", "func")]
#[case::pointer_to_slice("*[]int", "*[]int32", "pointer to array")]
#[case::struct_map_key("map[Item]int", "map[Item]int", "non-scalar map key")]
fn test_unsupported(#[case] dst: &str, #[case] src: &str, #[case] kind: &str) {
    assert_eq!(
        convert_field(dst, src).unwrap_err(),
        SynthesisError::unsupported("src.X", kind)
    );
}

#[test]
fn test_recursive_struct_is_rejected() {
    let node = "type Node struct {\n\tNext *Node\n\tV int\n}\n";
    let domain = extract(&format!("package svc\n\n{}", node));
    let wire = extract(&format!("package pb\n\n{}", node));
    let synth = ConversionSynthesizer::new([domain.struct_table(), wire.struct_table()]);
    let src = domain.struct_by_name("Node").unwrap();
    let dest = wire.struct_by_name("Node").unwrap();

    let err = synth
        .convert(dest, src, &ShapeAlias::for_struct("src", src, false))
        .unwrap_err();
    assert!(matches!(err, SynthesisError::UnsupportedConversion { ref kind, .. } if kind.starts_with("recursive struct")));
}

// =============================================================================
// NIL GUARDS
// =============================================================================

/// `A0 -> *A1 -> ... -> *An { X int }`
fn chain(depth: usize) -> String {
    let mut source = String::from("package svc\n\n");
    for level in 0..depth {
        source.push_str(&format!("type A{} struct {{\n\tNext *A{}\n}}\n\n", level, level + 1));
    }
    source.push_str(&format!("type A{} struct {{\n\tX int\n}}\n", depth));
    source
}

#[rstest]
#[case(1, false, 1)]
#[case(1, true, 2)]
#[case(2, false, 2)]
#[case(3, false, 3)]
#[case(3, true, 4)]
fn test_guard_counts_each_intermediate_pointer(
    #[case] depth: usize,
    #[case] root_pointer: bool,
    #[case] expected: usize,
) {
    let model = extract(&chain(depth));
    let synth = ConversionSynthesizer::new([model.struct_table()]);
    let mut alias = ShapeAlias::new("a", "svc", "A0", root_pointer);
    for _ in 0..depth {
        alias = alias.with_segment("Next");
    }
    let guard = alias.with_segment("X").check_nil(synth.index()).unwrap();
    assert_eq!(guard.len(), expected);
    // The leaf is read, never checked
    assert!(!guard.exprs().iter().any(|expr| expr.ends_with(".X")));
}
