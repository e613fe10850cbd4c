use std::collections::HashSet;

use nova_types::{ClassId, Type, TypeDisplay, TypeParamOwner, TypeVarId};

use crate::member::Member;
use crate::{GenericsError, Resolver, Result, TRACING_TARGET};

impl Resolver<'_> {
    /// Resolve slot `slot` of `class` as seen through an access chain.
    ///
    /// `hierarchy[0]` is the member whose type is examined; every following member is the one
    /// the previous member was reached through (e.g. the field holding the enclosing instance).
    /// When the first member only yields a type variable, the lookup moves to the class that
    /// declares the variable and continues with the rest of the chain.
    pub fn resolve_property_type(
        &self,
        class: ClassId,
        slot: usize,
        hierarchy: &[&dyn Member],
    ) -> Result<Option<Type>> {
        let Some((first, rest)) = hierarchy.split_first() else {
            return Ok(None);
        };

        let path = self.find_type_path(first.generic_type(), class)?;
        if path.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET,
                class = %TypeDisplay::new(self.env, &Type::Class(class)),
                "member type is the class itself; nothing to resolve"
            );
            return Ok(None);
        }

        let traced = self.trace_type(*first, &path, slot)?;
        let Some(var) = traced
            .as_ref()
            .and_then(Type::as_type_var)
            .filter(|_| !rest.is_empty())
        else {
            return Ok(traced);
        };

        match self.declaring_slot(first.declaring_type(), var) {
            Some((declaring, index)) => self.resolve_property_type(declaring, index, rest),
            None => Ok(Some(Type::TypeVar(var))),
        }
    }

    /// The type a member originates from.
    ///
    /// Concrete and parameterized types yield their class. A variable of the member's class (or
    /// of one of its enclosing classes) is resolved against the rest of the chain; variables
    /// declared by a method, or not visible from the member's class, come back unresolved.
    pub fn resolve_real_type(&self, hierarchy: &[&dyn Member]) -> Result<Option<Type>> {
        let Some((first, rest)) = hierarchy.split_first() else {
            return Ok(None);
        };

        match first.generic_type() {
            Type::TypeVar(var) => {
                let Some(declaring) = self.declaring_class(first.declaring_type(), *var) else {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        var = %TypeDisplay::new(self.env, &Type::TypeVar(*var)),
                        "type variable is not declared by an enclosing class"
                    );
                    return Ok(Some(Type::TypeVar(*var)));
                };
                match self.real_parameter(*var)? {
                    Some(slot) => self.resolve_property_type(declaring, slot, rest),
                    None => Ok(Some(Type::TypeVar(*var))),
                }
            }
            Type::Class(id) => Ok(Some(Type::Class(*id))),
            Type::Parameterized(ct) => Ok(Some(Type::Class(ct.def))),
            Type::Wildcard(_) | Type::Array(_) | Type::Void => Ok(None),
        }
    }

    /// `class`, or the nearest class enclosing it, that declares `var`.
    pub fn declaring_class(&self, class: ClassId, var: TypeVarId) -> Option<ClassId> {
        self.declaring_slot(class, var).map(|(declaring, _)| declaring)
    }

    /// Position of `var` among the type parameters of its declaring class.
    ///
    /// `None` for variables declared by a method.
    pub fn real_parameter(&self, var: TypeVarId) -> Result<Option<usize>> {
        let def = self
            .env
            .type_param(var)
            .ok_or(GenericsError::UnknownTypeParam(var))?;
        match &def.owner {
            Some(TypeParamOwner::Class(class)) => Ok(self
                .env
                .declared_slots(*class)
                .iter()
                .position(|tv| *tv == var)),
            Some(TypeParamOwner::Method { .. }) | None => Ok(None),
        }
    }

    fn declaring_slot(&self, class: ClassId, var: TypeVarId) -> Option<(ClassId, usize)> {
        let mut seen = HashSet::new();
        let mut next = Some(class);
        while let Some(id) = next {
            if !seen.insert(id) {
                break;
            }
            if let Some(index) = self.env.declared_slots(id).iter().position(|tv| *tv == var) {
                return Some((id, index));
            }
            next = self.env.enclosing_type(id);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use nova_types::{ClassDef, TypeEnv, TypeStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{declaring_class, real_parameter, resolve_property_type, resolve_real_type};

    #[test]
    fn empty_hierarchy_resolves_to_nothing() {
        let env = TypeStore::with_minimal_jdk();
        let list = env.class_id("java.util.List").unwrap();
        assert_eq!(resolve_property_type(&env, list, 0, &[]), Ok(None));
        assert_eq!(resolve_real_type(&env, &[]), Ok(None));
    }

    #[test]
    fn declaring_class_walks_enclosing_classes() {
        let mut env = TypeStore::new();
        let object = Type::Class(env.well_known().object);
        let t = env.add_type_param("T", vec![object.clone()]);
        let outer = env.add_class(ClassDef {
            name: "com.example.Outer".to_string(),
            type_params: vec![t],
            super_class: Some(object.clone()),
            ..ClassDef::default()
        });
        let inner = env.add_class(ClassDef {
            name: "com.example.Outer.Inner".to_string(),
            super_class: Some(object),
            enclosing: Some(outer),
            ..ClassDef::default()
        });
        let comparable = env.well_known().comparable;
        let comparable_t = env.declared_slots(comparable)[0];

        assert_eq!(declaring_class(&env, inner, t), Some(outer));
        assert_eq!(declaring_class(&env, outer, t), Some(outer));
        assert_eq!(declaring_class(&env, inner, comparable_t), None);
        assert_eq!(real_parameter(&env, t), Ok(Some(0)));
    }

    #[test]
    fn method_variables_have_no_class_slot() {
        let mut env = TypeStore::new();
        let object = Type::Class(env.well_known().object);
        let u = env.add_type_param("U", vec![object]);
        env.add_class(ClassDef {
            name: "com.example.Util".to_string(),
            methods: vec![nova_types::MethodDef {
                name: "identity".to_string(),
                type_params: vec![u],
                params: vec![Type::TypeVar(u)],
                return_type: Type::TypeVar(u),
            }],
            ..ClassDef::default()
        });

        assert_eq!(real_parameter(&env, u), Ok(None));
        let ghost = TypeVarId::from_raw(9_999);
        assert_eq!(
            real_parameter(&env, ghost),
            Err(GenericsError::UnknownTypeParam(ghost))
        );
    }
}
