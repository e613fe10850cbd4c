//! Host-independent Java-like type model.
//!
//! This crate owns the raw facts the generics engine (`nova-generics`) consumes: classes with
//! their declared type parameters, direct supertypes, superinterfaces and enclosing classes, plus
//! the four shapes a generic type can take (concrete class, parameterized instantiation, type
//! variable, wildcard). Facts are read through the [`TypeEnv`] trait so a host can back it with
//! whatever reflection or metadata facility it has; [`TypeStore`] is the in-memory reference
//! implementation and [`registry`] populates one from a hand-authored description.

#![forbid(unsafe_code)]

mod format;
pub mod registry;
mod store;
pub mod type_ref;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use crate::format::{format_type, TypeDisplay};
pub use crate::registry::{RegistryError, RegistryFile};
pub use crate::store::{TypeStore, WellKnownTypes};

/// Handle to a class definition inside a [`TypeEnv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a declared type parameter.
///
/// Ids are allocated per declaration, so two parameters that share a name (e.g. an inner class
/// shadowing the outer class' `T`) never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(u32);

impl TypeVarId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
}

/// A generic class applied to actual type arguments, e.g. `Map<String, V>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassType {
    pub def: ClassId,
    pub args: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    /// `?`
    Unbounded,
    /// `? extends T`
    Extends(Box<Type>),
    /// `? super T`
    Super(Box<Type>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A nominal type used without type arguments. Generic classes used this way are raw.
    Class(ClassId),
    /// A generic class with its actual type arguments.
    Parameterized(ClassType),
    TypeVar(TypeVarId),
    Wildcard(WildcardBound),
    /// Generic array type (`T[]`, `List<String>[]`).
    Array(Box<Type>),
    /// The return "type" of a `void` method.
    Void,
}

impl Type {
    /// Build a class type, parameterized only when `args` is non-empty.
    pub fn class(def: ClassId, args: Vec<Type>) -> Type {
        if args.is_empty() {
            Type::Class(def)
        } else {
            Type::Parameterized(ClassType { def, args })
        }
    }

    /// The nominal class behind a concrete or parameterized type.
    pub fn raw_class(&self) -> Option<ClassId> {
        match self {
            Type::Class(id) => Some(*id),
            Type::Parameterized(ClassType { def, .. }) => Some(*def),
            _ => None,
        }
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, Type::Class(_))
    }

    pub fn as_type_var(&self) -> Option<TypeVarId> {
        match self {
            Type::TypeVar(id) => Some(*id),
            _ => None,
        }
    }

    /// Actual type arguments; empty for anything that is not parameterized.
    pub fn args(&self) -> &[Type] {
        match self {
            Type::Parameterized(ClassType { args, .. }) => args,
            _ => &[],
        }
    }
}

/// Where a type parameter was declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeParamOwner {
    Class(ClassId),
    Method { class: ClassId, method: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
    /// Attached by [`TypeStore::define_class`]; `None` while the declaring class is pending.
    pub owner: Option<TypeParamOwner>,
    pub upper_bounds: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Type>,
    pub return_type: Type,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.Map$Entry` or `com.example.Outer.Inner`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub enclosing: Option<ClassId>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// First method named `name`; overloads are not distinguished.
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Read-only access to the facts of a type model.
///
/// The required methods are the host's responsibility; the provided ones derive the individual
/// facts the resolution engine asks for. Missing metadata reads as "nothing declared".
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;

    fn declared_slots(&self, id: ClassId) -> &[TypeVarId] {
        self.class(id).map(|def| def.type_params.as_slice()).unwrap_or(&[])
    }

    fn direct_supertype(&self, id: ClassId) -> Option<&Type> {
        self.class(id).and_then(|def| def.super_class.as_ref())
    }

    fn direct_superinterfaces(&self, id: ClassId) -> &[Type] {
        self.class(id).map(|def| def.interfaces.as_slice()).unwrap_or(&[])
    }

    fn enclosing_type(&self, id: ClassId) -> Option<ClassId> {
        self.class(id).and_then(|def| def.enclosing)
    }

    /// Upper bounds of a type variable or wildcard, in declaration order.
    ///
    /// Unbounded and `super` wildcards are bounded by `java.lang.Object`. Other shapes have no
    /// upper bounds.
    fn upper_bounds(&self, ty: &Type) -> Vec<Type> {
        match ty {
            Type::TypeVar(id) => self
                .type_param(*id)
                .map(|tp| tp.upper_bounds.clone())
                .unwrap_or_default(),
            Type::Wildcard(WildcardBound::Extends(upper)) => vec![(**upper).clone()],
            Type::Wildcard(WildcardBound::Unbounded | WildcardBound::Super(_)) => {
                vec![Type::Class(self.well_known().object)]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_constructor_only_parameterizes_with_arguments() {
        let list = ClassId::from_raw(7);
        let string = ClassId::from_raw(2);

        assert_eq!(Type::class(list, vec![]), Type::Class(list));
        assert_eq!(
            Type::class(list, vec![Type::Class(string)]),
            Type::Parameterized(ClassType {
                def: list,
                args: vec![Type::Class(string)],
            })
        );
        assert_eq!(
            Type::class(list, vec![Type::Class(string)]).raw_class(),
            Some(list)
        );
    }

    #[test]
    fn wildcard_upper_bounds_default_to_object() {
        let env = TypeStore::new();
        let object = env.well_known().object;
        let integer = env.well_known().integer;

        assert_eq!(
            env.upper_bounds(&Type::Wildcard(WildcardBound::Unbounded)),
            vec![Type::Class(object)]
        );
        assert_eq!(
            env.upper_bounds(&Type::Wildcard(WildcardBound::Super(Box::new(Type::Class(
                integer
            ))))),
            vec![Type::Class(object)]
        );
        assert_eq!(
            env.upper_bounds(&Type::Wildcard(WildcardBound::Extends(Box::new(
                Type::Class(integer)
            )))),
            vec![Type::Class(integer)]
        );
        assert!(env.upper_bounds(&Type::Void).is_empty());
    }
}
