//! Resolution of generic type variables across a class hierarchy.
//!
//! A field, method parameter or method return is often declared with a type parameter of its
//! declaring class, while the concrete argument is supplied several levels away: by a subclass,
//! an implemented interface, an enclosing class, or the type of the field the member was reached
//! through. The engine works in three steps:
//!
//! 1. [`find_type_path`] collects the types connecting a starting type to the class whose slot
//!    is being resolved (superinterfaces first, then the superclass, then the enclosing class).
//! 2. [`trace_type`] walks that path backwards, carrying the slot position and the best type
//!    found so far, substituting type arguments at every hop.
//! 3. [`resolve_property_type`] re-roots the lookup on the class that declares a still-unresolved
//!    variable and repeats the process for the next member of the access chain.
//!
//! When nothing concrete can be found, [`guess_class`] falls back to upper bounds and finally to
//! `java.lang.Object`.
//!
//! The engine reads facts through [`nova_types::TypeEnv`] and never mutates them. It keeps no
//! state between calls.

#![forbid(unsafe_code)]

mod config;
mod error;
mod guess;
pub mod member;
pub mod path;
mod property;
pub mod trace;

use std::fmt;

use nova_types::{ClassDef, ClassId, Type, TypeEnv, TypeVarId};

pub use crate::config::{ConfigError, GenericsConfig};
pub use crate::error::{GenericsError, Result};
pub use crate::member::{FieldMember, Member, MethodMember, MethodSlot};
pub use crate::path::TypePath;
pub use crate::trace::Accumulator;

pub(crate) const TRACING_TARGET: &str = "nova.generics";

/// A resolution engine bound to one type environment.
///
/// The free functions of this crate are shorthands for `Resolver::new(env)`; construct a
/// resolver with [`Resolver::with_config`] to tune the search.
#[derive(Clone, Copy)]
pub struct Resolver<'env> {
    env: &'env dyn TypeEnv,
    config: GenericsConfig,
}

impl<'env> Resolver<'env> {
    pub fn new(env: &'env dyn TypeEnv) -> Self {
        Self::with_config(env, GenericsConfig::default())
    }

    pub fn with_config(env: &'env dyn TypeEnv, config: GenericsConfig) -> Self {
        Self { env, config }
    }

    pub fn env(&self) -> &'env dyn TypeEnv {
        self.env
    }

    pub fn config(&self) -> &GenericsConfig {
        &self.config
    }
}

impl fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// See [`Resolver::find_type_path`].
pub fn find_type_path(env: &dyn TypeEnv, start: &Type, target: ClassId) -> Result<TypePath> {
    Resolver::new(env).find_type_path(start, target)
}

/// See [`Resolver::trace_type`].
pub fn trace_type(
    env: &dyn TypeEnv,
    member: &dyn Member,
    path: &TypePath,
    slot: usize,
) -> Result<Option<Type>> {
    Resolver::new(env).trace_type(member, path, slot)
}

/// See [`Resolver::resolve_property_type`].
pub fn resolve_property_type(
    env: &dyn TypeEnv,
    class: ClassId,
    slot: usize,
    hierarchy: &[&dyn Member],
) -> Result<Option<Type>> {
    Resolver::new(env).resolve_property_type(class, slot, hierarchy)
}

/// See [`Resolver::resolve_entity_type`].
pub fn resolve_entity_type(
    env: &dyn TypeEnv,
    class: ClassId,
    slot: usize,
    target: ClassId,
) -> Result<Option<Type>> {
    Resolver::new(env).resolve_entity_type(class, slot, target)
}

/// See [`Resolver::resolve_real_type`].
pub fn resolve_real_type(env: &dyn TypeEnv, hierarchy: &[&dyn Member]) -> Result<Option<Type>> {
    Resolver::new(env).resolve_real_type(hierarchy)
}

/// See [`Resolver::declaring_class`].
pub fn declaring_class(env: &dyn TypeEnv, class: ClassId, var: TypeVarId) -> Option<ClassId> {
    Resolver::new(env).declaring_class(class, var)
}

/// See [`Resolver::real_parameter`].
pub fn real_parameter(env: &dyn TypeEnv, var: TypeVarId) -> Result<Option<usize>> {
    Resolver::new(env).real_parameter(var)
}

/// See [`Resolver::guess_class`].
pub fn guess_class(env: &dyn TypeEnv, ty: &Type) -> ClassId {
    Resolver::new(env).guess_class(ty)
}

pub(crate) fn class_def(env: &dyn TypeEnv, id: ClassId) -> Result<&ClassDef> {
    env.class(id).ok_or(GenericsError::UnknownClass(id))
}
