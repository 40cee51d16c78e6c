//! Read-only struct lookup over several struct tables.

use crate::hir::{Struct, StructTable, TypeKind, TypeRef};

/// Struct lookup across the tables of the domain model and the wire-schema
/// model, searched in order.
#[derive(Clone, Debug, Default)]
pub struct StructIndex<'a> {
    tables: Vec<&'a StructTable>,
}

impl<'a> StructIndex<'a> {
    pub fn new(tables: impl IntoIterator<Item = &'a StructTable>) -> Self {
        Self {
            tables: tables.into_iter().collect(),
        }
    }

    /// Exact `(package, name)` match in the first table that has it.
    pub fn get(&self, package: &str, name: &str) -> Option<&'a Struct> {
        self.tables.iter().copied().find_map(|table| table.get(package, name))
    }

    /// Exact match, falling back to the first struct called `name` in any
    /// package.
    pub fn find(&self, package: &str, name: &str) -> Option<&'a Struct> {
        self.get(package, name).or_else(|| {
            self.tables
                .iter()
                .copied()
                .find_map(|table| table.find_by_name(name).next())
        })
    }

    /// The struct a Struct-kind reference points at. Unqualified references
    /// are looked up in `package`, the package of the declaring struct.
    pub fn lookup(&self, ty: &TypeRef, package: &str) -> Option<&'a Struct> {
        let TypeKind::Struct { name } = &ty.kind else {
            return None;
        };
        self.find(ty.qualifier.as_deref().unwrap_or(package), name)
    }
}
