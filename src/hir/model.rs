//! The extracted type model and its shared struct table.

use indexmap::IndexMap;
use std::path::PathBuf;

use super::types::{Import, Interface, Method, Struct, Value};

#[cfg(feature = "interchange")]
use serde::{Deserialize, Serialize};

/// Structs keyed by package name, then struct name.
///
/// Append-only and first-wins: inserting a `(package, name)` pair that is
/// already present leaves the existing entry untouched. Iteration follows
/// insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct StructTable {
    packages: IndexMap<String, IndexMap<String, Struct>>,
}

impl StructTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a struct under its own package. Returns `false` if an entry for
    /// the same package and name already existed.
    pub fn insert(&mut self, strc: Struct) -> bool {
        let entries = self.packages.entry(strc.package.clone()).or_default();
        if entries.contains_key(&strc.name) {
            return false;
        }
        entries.insert(strc.name.clone(), strc);
        true
    }

    pub fn get(&self, package: &str, name: &str) -> Option<&Struct> {
        self.packages.get(package)?.get(name)
    }

    pub(crate) fn get_mut(&mut self, package: &str, name: &str) -> Option<&mut Struct> {
        self.packages.get_mut(package)?.get_mut(name)
    }

    pub fn contains(&self, package: &str, name: &str) -> bool {
        self.get(package, name).is_some()
    }

    /// Structs of one package, in insertion order
    pub fn package(&self, package: &str) -> impl Iterator<Item = &Struct> {
        self.packages.get(package).into_iter().flat_map(|m| m.values())
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Struct> {
        self.packages.values().flat_map(|m| m.values())
    }

    /// Every struct called `name`, whatever its package
    pub fn find_by_name<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Struct> + use<'a, 'n> {
        self.packages.values().filter_map(move |m| m.get(name))
    }

    pub fn len(&self) -> usize {
        self.packages.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge `other` into this table entry by entry, first definition wins.
    /// Returns the number of entries added.
    pub fn merge(&mut self, other: StructTable) -> usize {
        let mut added = 0;
        for strc in other.packages.into_values().flat_map(IndexMap::into_values) {
            if self.insert(strc) {
                added += 1;
            }
        }
        added
    }
}

/// Read-only result of extracting one Go source file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct TypeModel {
    pub(crate) package_name: String,
    pub(crate) source_file: Option<PathBuf>,
    pub(crate) imports: Vec<Import>,
    pub(crate) interfaces: Vec<Interface>,
    pub(crate) structs: StructTable,
    pub(crate) methods: Vec<Method>,
    pub(crate) vars: Vec<Value>,
    pub(crate) consts: Vec<Value>,
}

impl TypeModel {
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn source_file(&self) -> Option<&PathBuf> {
        self.source_file.as_ref()
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// The import that provides package `qualifier`
    pub fn import_for(&self, qualifier: &str) -> Option<&Import> {
        self.imports.iter().find(|i| i.package_name() == qualifier)
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Functions, methods and named function types in declaration order
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn vars(&self) -> &[Value] {
        &self.vars
    }

    pub fn consts(&self) -> &[Value] {
        &self.consts
    }

    /// Structs declared in this model's own package, sorted by name
    pub fn structs(&self) -> Vec<&Struct> {
        let mut structs: Vec<_> = self.structs.package(&self.package_name).collect();
        structs.sort_by(|a, b| a.name.cmp(&b.name));
        structs
    }

    /// Every struct known to this model, including resolved packages
    pub fn struct_table(&self) -> &StructTable {
        &self.structs
    }

    /// Look up a struct in the model's own package
    pub fn struct_by_name(&self, name: &str) -> Option<&Struct> {
        self.structs.get(&self.package_name, name)
    }

    pub fn into_struct_table(self) -> StructTable {
        self.structs
    }

    /// Serialize the model for consumption by a templating layer
    #[cfg(feature = "interchange")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
