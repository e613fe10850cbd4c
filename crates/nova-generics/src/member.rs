//! Members whose declared type is resolved: fields, method parameters and method returns.

use nova_types::{ClassId, FieldDef, MethodDef, Type, TypeEnv};

/// A property declared on a class, seen through its generic (unerased) type.
pub trait Member {
    fn declaring_type(&self) -> ClassId;
    fn generic_type(&self) -> &Type;
}

#[derive(Debug, Clone, Copy)]
pub struct FieldMember<'a> {
    declaring: ClassId,
    field: &'a FieldDef,
}

impl<'a> FieldMember<'a> {
    pub fn new(declaring: ClassId, field: &'a FieldDef) -> Self {
        Self { declaring, field }
    }

    /// The field `name` declared directly on `class`.
    pub fn find(env: &'a dyn TypeEnv, class: ClassId, name: &str) -> Option<Self> {
        let field = env.class(class)?.field(name)?;
        Some(Self::new(class, field))
    }

    pub fn name(&self) -> &str {
        &self.field.name
    }
}

impl Member for FieldMember<'_> {
    fn declaring_type(&self) -> ClassId {
        self.declaring
    }

    fn generic_type(&self) -> &Type {
        &self.field.ty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodSlot {
    Param(usize),
    Return,
}

/// One parameter, or the return value, of a method.
#[derive(Debug, Clone, Copy)]
pub struct MethodMember<'a> {
    declaring: ClassId,
    method: &'a MethodDef,
    slot: MethodSlot,
}

impl<'a> MethodMember<'a> {
    pub fn new(declaring: ClassId, method: &'a MethodDef, slot: MethodSlot) -> Self {
        Self {
            declaring,
            method,
            slot,
        }
    }

    /// The first method named `name` declared directly on `class`.
    pub fn find(
        env: &'a dyn TypeEnv,
        class: ClassId,
        name: &str,
        slot: MethodSlot,
    ) -> Option<Self> {
        let method = env.class(class)?.method(name)?;
        Some(Self::new(class, method, slot))
    }

    pub fn name(&self) -> &str {
        &self.method.name
    }

    pub fn slot(&self) -> MethodSlot {
        self.slot
    }
}

impl Member for MethodMember<'_> {
    fn declaring_type(&self) -> ClassId {
        self.declaring
    }

    /// Parameter indices past the end fall back to the return type.
    fn generic_type(&self) -> &Type {
        match self.slot {
            MethodSlot::Param(idx) => self
                .method
                .params
                .get(idx)
                .unwrap_or(&self.method.return_type),
            MethodSlot::Return => &self.method.return_type,
        }
    }
}
