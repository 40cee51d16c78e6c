//! Go language constants and generator defaults.

/// Predeclared Go type identifiers (the universe scope types).
pub const BUILTIN_SCALARS: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Go source file extension
pub const GO_FILE_EXT: &str = "go";

/// Suffix of test files, never part of a package's importable API
pub const GO_TEST_FILE_SUFFIX: &str = "_test.go";

pub const DEFAULT_REQUEST_SUFFIX: &str = "Request";
pub const DEFAULT_RESPONSE_SUFFIX: &str = "Response";

/// protoc-gen-go bookkeeping fields (`XXX_unrecognized`, ...)
pub const DEFAULT_FILTERED_PREFIX: &str = "XXX_";

/// Struct tag key carrying wire-schema directives
pub const WIRE_TAG_KEY: &str = "pb";

/// Whether `name` is a predeclared Go type.
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}
