#[path = "helpers/mod.rs"]
mod helpers;

#[path = "hir/mod.rs"]
mod hir;

#[path = "codegen/mod.rs"]
mod codegen;
