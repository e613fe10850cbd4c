//! Hand-authored type registries.
//!
//! Hosts without a reflection facility can describe their generic declarations in TOML or JSON
//! and load them into a [`TypeStore`]:
//!
//! ```toml
//! [[classes]]
//! name = "com.example.Box"
//! type_params = [{ name = "V" }]
//! fields = [{ name = "value", type = "V" }]
//!
//! [[classes]]
//! name = "com.example.StringBox"
//! extends = "com.example.Box<String>"
//! ```
//!
//! Type references use Java syntax. A name resolves to the innermost type variable in scope
//! (method, class, then enclosing classes), then to a class binary name, a class in the same
//! package, and finally `java.lang.<name>`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::type_ref::{parse_type_ref, TypeRef, TypeRefError, WildcardRef};
use crate::{
    ClassDef, ClassId, ClassKind, FieldDef, MethodDef, Type, TypeEnv, TypeParamDef, TypeStore,
    TypeVarId, WildcardBound,
};

const LOG_TARGET: &str = "nova.types";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct RegistryFile {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct ClassDecl {
    /// Binary name of the class.
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub type_params: Vec<TypeParamDecl>,
    /// Superclass. Classes default to `java.lang.Object`; for interfaces this is an additional
    /// superinterface.
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    /// Binary name of the lexically enclosing class.
    #[serde(default)]
    pub enclosing: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct TypeParamDecl {
    pub name: String,
    /// Upper bounds; empty means `java.lang.Object`.
    #[serde(default)]
    pub bounds: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub type_params: Vec<TypeParamDecl>,
    #[serde(default)]
    pub params: Vec<String>,
    /// Return type; omitted for `void`.
    #[serde(default)]
    pub returns: Option<String>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to parse registry toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse registry json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("in `{class}`: {source}")]
    Syntax {
        class: String,
        #[source]
        source: TypeRefError,
    },
    #[error("in `{class}`: unknown type `{name}`")]
    UnknownType { class: String, name: String },
    #[error("in `{class}`: `{name}` expects {expected} type arguments, found {found}")]
    WrongArgumentCount {
        class: String,
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("class `{0}` is declared more than once")]
    DuplicateClass(String),
}

/// JSON schema of the registry format.
pub fn json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(RegistryFile)
}

impl RegistryFile {
    pub fn from_toml_str(text: &str) -> Result<Self, RegistryError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a registry file; `.json` files are parsed as JSON, anything else as TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read registry {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let file = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        };
        file.with_context(|| format!("failed to parse registry {}", path.display()))
    }

    /// Define every declared class in `store`, returning their ids in declaration order.
    ///
    /// All ids and type variables are allocated before any signature is resolved, so classes may
    /// reference each other in any order and bounds may be self-referential
    /// (`E extends Comparable<E>`). The load runs against a copy of `store`, so a failed load
    /// leaves `store` untouched: no ids, type variables or definitions are added.
    pub fn load_into(&self, store: &mut TypeStore) -> Result<Vec<ClassId>, RegistryError> {
        let mut scratch = store.clone();
        let ids = self.load_unchecked(&mut scratch)?;
        *store = scratch;
        Ok(ids)
    }

    fn load_unchecked(&self, store: &mut TypeStore) -> Result<Vec<ClassId>, RegistryError> {
        let mut seen = HashSet::new();
        for decl in &self.classes {
            let already_defined = store
                .class_id(&decl.name)
                .is_some_and(|id| store.is_defined(id));
            if !seen.insert(decl.name.as_str()) || already_defined {
                return Err(RegistryError::DuplicateClass(decl.name.clone()));
            }
        }

        let ids: Vec<ClassId> = self
            .classes
            .iter()
            .map(|decl| store.intern_class_id(&decl.name))
            .collect();

        let object = Type::Class(store.well_known().object);
        let mut pending = Vec::with_capacity(self.classes.len());
        for (decl, id) in self.classes.iter().zip(&ids) {
            let type_params = allocate_type_params(store, &decl.type_params, &object);
            let method_type_params = decl
                .methods
                .iter()
                .map(|method| allocate_type_params(store, &method.type_params, &object))
                .collect();
            let enclosing = match &decl.enclosing {
                Some(name) => Some(lookup_class(store, &decl.name, name).ok_or_else(|| {
                    RegistryError::UnknownType {
                        class: decl.name.clone(),
                        name: name.clone(),
                    }
                })?),
                None => None,
            };
            pending.push(PendingClass {
                decl,
                id: *id,
                type_params,
                method_type_params,
                enclosing,
            });
        }

        let arity: HashMap<ClassId, usize> = pending
            .iter()
            .map(|class| (class.id, class.type_params.len()))
            .collect();

        let mut built = Vec::with_capacity(pending.len());
        for class in &pending {
            let resolver = SignatureResolver {
                store: &*store,
                arity: &arity,
                class: &class.decl.name,
                object: &object,
            };
            let scope = class_scope(&*store, &pending, class);
            built.push(resolver.build(class, &scope)?);
        }

        for (id, def, type_params) in built {
            for (tv, tp) in type_params {
                store.define_type_param(tv, tp);
            }
            tracing::debug!(
                target: LOG_TARGET,
                class = %def.name,
                type_params = def.type_params.len(),
                "registered class"
            );
            store.define_class(id, def);
        }

        Ok(ids)
    }
}

type Scope = Vec<(String, TypeVarId)>;

struct PendingClass<'d> {
    decl: &'d ClassDecl,
    id: ClassId,
    type_params: Scope,
    method_type_params: Vec<Scope>,
    enclosing: Option<ClassId>,
}

fn allocate_type_params(store: &mut TypeStore, decls: &[TypeParamDecl], object: &Type) -> Scope {
    decls
        .iter()
        .map(|tp| {
            let id = store.add_type_param(tp.name.clone(), vec![object.clone()]);
            (tp.name.clone(), id)
        })
        .collect()
}

/// Type variables visible in `start`, innermost first.
fn class_scope(store: &TypeStore, pending: &[PendingClass<'_>], start: &PendingClass<'_>) -> Scope {
    let mut scope = start.type_params.clone();
    let mut visited = HashSet::from([start.id]);
    let mut next = start.enclosing;
    while let Some(id) = next {
        if !visited.insert(id) {
            break;
        }
        if let Some(outer) = pending.iter().find(|class| class.id == id) {
            scope.extend(outer.type_params.iter().cloned());
            next = outer.enclosing;
        } else if let Some(def) = store.class(id) {
            scope.extend(def.type_params.iter().filter_map(|tv| {
                store.type_param(*tv).map(|tp| (tp.name.clone(), *tv))
            }));
            next = def.enclosing;
        } else {
            break;
        }
    }
    scope
}

fn lookup_class(store: &TypeStore, from_class: &str, name: &str) -> Option<ClassId> {
    if let Some(id) = store.class_id(name) {
        return Some(id);
    }
    if let Some((package, _)) = from_class.rsplit_once('.') {
        if let Some(id) = store.class_id(&format!("{package}.{name}")) {
            return Some(id);
        }
    }
    store.lookup_class(name)
}

struct SignatureResolver<'a> {
    store: &'a TypeStore,
    arity: &'a HashMap<ClassId, usize>,
    class: &'a str,
    object: &'a Type,
}

impl SignatureResolver<'_> {
    fn build(
        &self,
        class: &PendingClass<'_>,
        scope: &Scope,
    ) -> Result<(ClassId, ClassDef, Vec<(TypeVarId, TypeParamDef)>), RegistryError> {
        let decl = class.decl;
        let mut type_params = self.bounds(&decl.type_params, &class.type_params, scope)?;

        let mut interfaces = Vec::with_capacity(decl.implements.len() + 1);
        let super_class = match (decl.kind, &decl.extends) {
            (ClassKind::Class, Some(text)) => Some(self.parse(scope, text)?),
            (ClassKind::Class, None) if decl.name != "java.lang.Object" => {
                Some(self.object.clone())
            }
            (ClassKind::Class, None) => None,
            (ClassKind::Interface, extends) => {
                if let Some(text) = extends {
                    interfaces.push(self.parse(scope, text)?);
                }
                None
            }
        };
        for text in &decl.implements {
            interfaces.push(self.parse(scope, text)?);
        }

        let fields = decl
            .fields
            .iter()
            .map(|field| -> Result<FieldDef, RegistryError> {
                Ok(FieldDef {
                    name: field.name.clone(),
                    ty: self.parse(scope, &field.ty)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut methods = Vec::with_capacity(decl.methods.len());
        for (method, method_vars) in decl.methods.iter().zip(&class.method_type_params) {
            let mut method_scope = method_vars.clone();
            method_scope.extend(scope.iter().cloned());

            type_params.extend(self.bounds(&method.type_params, method_vars, &method_scope)?);
            let params = method
                .params
                .iter()
                .map(|text| self.parse(&method_scope, text))
                .collect::<Result<Vec<_>, _>>()?;
            let return_type = match &method.returns {
                Some(text) => self.parse(&method_scope, text)?,
                None => Type::Void,
            };
            methods.push(MethodDef {
                name: method.name.clone(),
                type_params: method_vars.iter().map(|(_, tv)| *tv).collect(),
                params,
                return_type,
            });
        }

        let def = ClassDef {
            name: decl.name.clone(),
            kind: decl.kind,
            type_params: class.type_params.iter().map(|(_, tv)| *tv).collect(),
            super_class,
            interfaces,
            enclosing: class.enclosing,
            fields,
            methods,
        };
        Ok((class.id, def, type_params))
    }

    fn bounds(
        &self,
        decls: &[TypeParamDecl],
        allocated: &Scope,
        scope: &Scope,
    ) -> Result<Vec<(TypeVarId, TypeParamDef)>, RegistryError> {
        decls
            .iter()
            .zip(allocated)
            .map(|(decl, (_, tv))| -> Result<(TypeVarId, TypeParamDef), RegistryError> {
                let upper_bounds = if decl.bounds.is_empty() {
                    vec![self.object.clone()]
                } else {
                    decl.bounds
                        .iter()
                        .map(|text| self.parse(scope, text))
                        .collect::<Result<Vec<_>, _>>()?
                };
                Ok((
                    *tv,
                    TypeParamDef {
                        name: decl.name.clone(),
                        owner: None,
                        upper_bounds,
                    },
                ))
            })
            .collect()
    }

    fn parse(&self, scope: &Scope, text: &str) -> Result<Type, RegistryError> {
        let type_ref = parse_type_ref(text).map_err(|source| RegistryError::Syntax {
            class: self.class.to_string(),
            source,
        })?;
        self.resolve(scope, &type_ref)
    }

    fn resolve(&self, scope: &Scope, type_ref: &TypeRef) -> Result<Type, RegistryError> {
        match type_ref {
            TypeRef::Named { name, args } => {
                if args.is_empty() {
                    if let Some((_, tv)) = scope.iter().find(|(var, _)| var == name) {
                        return Ok(Type::TypeVar(*tv));
                    }
                    if name == "void" {
                        return Ok(Type::Void);
                    }
                }

                let Some(def) = lookup_class(self.store, self.class, name) else {
                    return Err(RegistryError::UnknownType {
                        class: self.class.to_string(),
                        name: name.clone(),
                    });
                };
                let args = args
                    .iter()
                    .map(|arg| self.resolve(scope, arg))
                    .collect::<Result<Vec<_>, _>>()?;

                if !args.is_empty() {
                    let expected = self
                        .arity
                        .get(&def)
                        .copied()
                        .or_else(|| self.store.class(def).map(|c| c.type_params.len()));
                    if let Some(expected) = expected.filter(|expected| *expected != args.len()) {
                        return Err(RegistryError::WrongArgumentCount {
                            class: self.class.to_string(),
                            name: name.clone(),
                            expected,
                            found: args.len(),
                        });
                    }
                }
                Ok(Type::class(def, args))
            }
            TypeRef::Wildcard(WildcardRef::Unbounded) => {
                Ok(Type::Wildcard(WildcardBound::Unbounded))
            }
            TypeRef::Wildcard(WildcardRef::Extends(upper)) => Ok(Type::Wildcard(
                WildcardBound::Extends(Box::new(self.resolve(scope, upper)?)),
            )),
            TypeRef::Wildcard(WildcardRef::Super(lower)) => Ok(Type::Wildcard(
                WildcardBound::Super(Box::new(self.resolve(scope, lower)?)),
            )),
            TypeRef::Array(component) => {
                Ok(Type::Array(Box::new(self.resolve(scope, component)?)))
            }
        }
    }
}
