//! Type model extraction from a parsed Go file.
//!
//! [`TypeModelExtractor`] walks the typed AST of one source unit and builds a
//! [`TypeModel`]: package name, imports, interfaces, structs, functions and
//! methods, vars and consts.
//!
//! # Module structure
//!
//! - [`classify`] — type expression classification, field and signature lists
//! - [`values`] — var/const declarations and literal type inference
//!
//! Struct declarations are resolved on demand: a field that names another
//! type declared in the same file defines that type first, through an index
//! of the file's type specs built before the walk. A set of structs whose
//! fields are being extracted stops self-referential and mutually recursive
//! records from recursing.

mod classify;
mod values;


use std::path::PathBuf;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use super::error::ExtractError;
use super::model::{StructTable, TypeModel};
use super::resolve::ReferenceResolver;
use super::types::{Field, Import, Interface, Method, Struct, TypeRef, Value};
use crate::base::constants::is_builtin_scalar;
use crate::base::{Config, LineIndex, Position};
use crate::parser::{
    AstNode, Decl, FuncDecl, InterfaceType, Parse, Receiver, SyntaxNode, Type, TypeSpec,
};

/// Builds a [`TypeModel`] from one parsed source unit.
///
/// An extractor runs once: [`TypeModelExtractor::parse`] consumes it.
pub struct TypeModelExtractor<'a> {
    config: &'a Config,
    resolver: Option<&'a ReferenceResolver<'a>>,
    source_file: Option<PathBuf>,
    line_index: LineIndex,
    package: String,
    imports: Vec<Import>,
    /// Type specs of the file by name, first declaration wins
    declarations: FxHashMap<String, TypeSpec>,
    /// Structs whose fields are currently being extracted
    in_progress: FxHashSet<String>,
    /// Enclosing struct declarations, innermost last
    struct_stack: Vec<String>,
    structs: StructTable,
    interfaces: Vec<Interface>,
    methods: Vec<Method>,
    vars: Vec<Value>,
    consts: Vec<Value>,
}

impl<'a> TypeModelExtractor<'a> {
    /// Create an extractor. Without a resolver, qualified references stay
    /// unresolved.
    pub fn new(config: &'a Config, resolver: Option<&'a ReferenceResolver<'a>>) -> Self {
        Self {
            config,
            resolver,
            source_file: None,
            line_index: LineIndex::new(""),
            package: String::new(),
            imports: Vec::new(),
            declarations: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            struct_stack: Vec::new(),
            structs: StructTable::new(),
            interfaces: Vec::new(),
            methods: Vec::new(),
            vars: Vec::new(),
            consts: Vec::new(),
        }
    }

    /// Record the path of the file being extracted
    pub fn with_source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    /// Walk the syntax tree and build the model.
    pub fn parse(mut self, parse: &Parse) -> Result<TypeModel, ExtractError> {
        self.line_index = parse.line_index().clone();
        if let Some(error) = parse.errors.first() {
            let position = self.line_index.position(error.range.start());
            return Err(ExtractError::parse(error.message.clone(), position));
        }
        let file = parse
            .source_file()
            .ok_or_else(|| ExtractError::parse("missing source file", Position::default()))?;

        let declared = file
            .package_name()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ExtractError::parse("missing package clause", Position::default()))?;
        self.package = self.config.package_name.clone().unwrap_or(declared);

        self.imports = file
            .imports()
            .filter_map(|spec| {
                let path = spec.path()?;
                let alias = if spec.is_dot() {
                    Some(".".to_string())
                } else {
                    spec.alias().map(|name| name.text())
                };
                Some(Import::new(alias, path))
            })
            .collect();

        for spec in file.type_specs() {
            if let Some(name) = spec.name() {
                self.declarations.entry(name.text()).or_insert(spec);
            }
        }

        for decl in file.decls() {
            match decl {
                Decl::Type(decl) => {
                    for spec in decl.specs() {
                        self.declare_type(&spec)?;
                    }
                }
                Decl::Var(decl) => self.declare_values(decl.specs(), false)?,
                Decl::Const(decl) => self.declare_values(decl.specs(), true)?,
                Decl::Func(func) => self.declare_func(&func)?,
            }
        }

        self.bind_methods();

        debug!(
            package = %self.package,
            structs = self.structs.package(&self.package).count(),
            interfaces = self.interfaces.len(),
            methods = self.methods.len(),
            "extracted type model"
        );

        Ok(TypeModel {
            package_name: self.package,
            source_file: self.source_file,
            imports: self.imports,
            interfaces: self.interfaces,
            structs: self.structs,
            methods: self.methods,
            vars: self.vars,
            consts: self.consts,
        })
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn declare_type(&mut self, spec: &TypeSpec) -> Result<(), ExtractError> {
        let Some(name) = spec.name().map(|n| n.text()) else {
            return Ok(());
        };
        let position = self.position(spec.syntax());
        if spec.has_type_params() {
            return Err(ExtractError::unsupported(
                format!("generic type {}", name),
                position,
            ));
        }
        if spec.is_alias() {
            debug!(name = %name, "skipping type alias declaration");
            return Ok(());
        }
        let ty = spec
            .ty()
            .ok_or_else(|| ExtractError::parse(format!("type {} has no type", name), position))?;

        match ty {
            Type::Struct(_) | Type::Named(_) => self.define(&name),
            Type::Interface(iface) => {
                let iface = self.interface(name, &iface, position)?;
                self.interfaces.push(iface);
                Ok(())
            }
            Type::Func(func) => {
                let signature = self.signature(func.params(), func.result())?;
                self.methods.push(Method {
                    name,
                    receiver: Vec::new(),
                    signature,
                    position,
                });
                Ok(())
            }
            other => {
                debug!(
                    name = %name,
                    shape = %other.syntax().text(),
                    "skipping type definition"
                );
                Ok(())
            }
        }
    }

    /// Add the struct declared in this file as `name` to the table, unless it
    /// is already there or being extracted.
    fn define(&mut self, name: &str) -> Result<(), ExtractError> {
        if self.in_progress.contains(name) || self.structs.contains(&self.package, name) {
            return Ok(());
        }
        let Some(spec) = self.declarations.get(name).cloned() else {
            return Ok(());
        };
        if spec.has_type_params() || spec.is_alias() {
            return Ok(());
        }
        let position = self.position(spec.syntax());

        match spec.ty() {
            Some(Type::Struct(body)) => {
                self.in_progress.insert(name.to_string());
                self.struct_stack.push(name.to_string());
                let fields = self.fields(body.fields());
                self.struct_stack.pop();
                self.in_progress.remove(name);

                let fields = fields?;
                trace!(name, fields = fields.len(), "defined struct");
                self.structs
                    .insert(Struct::record(&self.package, name, fields).with_position(position));
            }
            Some(Type::Named(named)) => match named.name() {
                Some(basic) if is_builtin_scalar(&basic) => {
                    trace!(name, underlying = %basic, "defined enum-like type");
                    self.structs.insert(
                        Struct::alias(&self.package, name, TypeRef::basic(basic))
                            .with_position(position),
                    );
                }
                _ => debug!(name, "skipping definition over a named type"),
            },
            _ => {}
        }
        Ok(())
    }

    fn interface(
        &mut self,
        name: String,
        iface: &InterfaceType,
        position: Position,
    ) -> Result<Interface, ExtractError> {
        let mut methods = Vec::new();
        for spec in iface.methods() {
            let Some(method_name) = spec.name().map(|n| n.text()) else {
                continue;
            };
            let method_position = self.position(spec.syntax());
            let signature = self.signature(spec.params(), spec.result())?;
            methods.push(Method {
                name: method_name,
                receiver: Vec::new(),
                signature,
                position: method_position,
            });
        }
        let embeds = iface
            .embeds()
            .filter_map(|spec| spec.ty())
            .map(|ty| ty.syntax().text().to_string().trim().to_string())
            .collect();

        Ok(Interface {
            name,
            methods,
            embeds,
            position,
        })
    }

    fn declare_func(&mut self, func: &FuncDecl) -> Result<(), ExtractError> {
        let Some(name) = func.name().map(|n| n.text()) else {
            return Ok(());
        };
        let position = self.position(func.syntax());
        let receiver = func
            .receiver()
            .map(|r| self.receiver(&r))
            .unwrap_or_default();
        let signature = self.signature(func.params(), func.result())?;
        self.methods.push(Method {
            name,
            receiver,
            signature,
            position,
        });
        Ok(())
    }

    /// Receiver as a field referring to the base type by name. Type arguments
    /// of generic receivers are dropped.
    fn receiver(&self, receiver: &Receiver) -> Vec<Field> {
        let Some(base) = receiver.base_type_name() else {
            return Vec::new();
        };
        let Some(param) = receiver.param() else {
            return Vec::new();
        };
        let pointer = matches!(param.ty(), Some(Type::Pointer(_)));
        vec![Field {
            name: param.names().next().map(|n| n.text()),
            ty: TypeRef::named(base).with_pointer(pointer),
            tag: None,
            position: self.position(param.syntax()),
        }]
    }

    /// Append every method to the struct of this package named by its
    /// receiver type.
    fn bind_methods(&mut self) {
        for method in &self.methods {
            let Some(receiver) = method.receiver_type() else {
                continue;
            };
            if let Some(strc) = self.structs.get_mut(&self.package, receiver) {
                strc.methods.push(method.clone());
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Position of the first significant token of `node`
    fn position(&self, node: &SyntaxNode) -> Position {
        let offset = node
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
            .map(|t| t.text_range().start())
            .unwrap_or_else(|| node.text_range().start());
        self.line_index.position(offset)
    }

    /// Whether a request or response struct encloses the current position
    fn expanding_request_or_response(&self) -> bool {
        self.struct_stack
            .iter()
            .any(|name| self.config.is_request_or_response(name))
    }
}
