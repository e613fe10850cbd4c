//! Backwards substitution along a [`TypePath`].

use nova_types::{format_type, ClassId, ClassType, Type, TypeDisplay, TypeEnv};

use crate::member::Member;
use crate::path::TypePath;
use crate::{class_def, GenericsError, Resolver, Result, TRACING_TARGET};

/// State threaded through a path walk: the slot position being followed and the best type found
/// for it so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulator {
    pub index: usize,
    pub current: Option<Type>,
}

impl Accumulator {
    pub fn new(slot: usize) -> Self {
        Self {
            index: slot,
            current: None,
        }
    }

    /// A concrete class ends the walk.
    pub fn is_settled(&self) -> bool {
        self.current.as_ref().is_some_and(Type::is_concrete)
    }

    /// Fold one path node into the accumulator.
    ///
    /// Before anything was found, the node seeds `current` with its declared slot (raw class) or
    /// actual argument (parameterized type) at `index`. Afterwards the node re-positions `index`
    /// onto the slot or argument equal to `current`, and a parameterized node substitutes its
    /// argument. Out-of-range positions leave the accumulator untouched.
    pub fn step(self, env: &dyn TypeEnv, hop: &Type) -> Result<Self> {
        match self.current {
            None => seed(env, self.index, hop),
            Some(current) => refine(env, self.index, current, hop),
        }
    }
}

fn seed(env: &dyn TypeEnv, index: usize, hop: &Type) -> Result<Accumulator> {
    let current = match hop {
        Type::Class(id) => {
            class_def(env, *id)?;
            env.declared_slots(*id).get(index).map(|tv| Type::TypeVar(*tv))
        }
        Type::Parameterized(ct) => checked_args(env, ct)?.get(index).cloned(),
        _ => None,
    };
    Ok(Accumulator { index, current })
}

fn refine(env: &dyn TypeEnv, mut index: usize, mut current: Type, hop: &Type) -> Result<Accumulator> {
    match hop {
        Type::Class(id) => {
            class_def(env, *id)?;
            let slots = env.declared_slots(*id);
            if let Some(pos) = slots.iter().position(|tv| current == Type::TypeVar(*tv)) {
                index = pos;
            }
        }
        Type::Parameterized(ct) => {
            let args = checked_args(env, ct)?;
            let slots = env.declared_slots(ct.def);
            if let Some(pos) = slots.iter().position(|tv| current == Type::TypeVar(*tv)) {
                index = pos;
                if let Some(arg) = args.get(pos) {
                    current = arg.clone();
                }
            }
            if let Some(pos) = args.iter().rposition(|arg| *arg == current) {
                index = pos;
            }
            match args.get(index) {
                Some(arg @ Type::Class(_)) => current = arg.clone(),
                Some(Type::Parameterized(inner)) => current = Type::Class(inner.def),
                _ => {}
            }
        }
        _ => {}
    }
    Ok(Accumulator {
        index,
        current: Some(current),
    })
}

/// Arguments of `ct`, verified against the slot count of its raw class.
fn checked_args<'t>(env: &dyn TypeEnv, ct: &'t ClassType) -> Result<&'t [Type]> {
    class_def(env, ct.def)?;
    let expected = env.declared_slots(ct.def).len();
    if expected != ct.args.len() {
        return Err(GenericsError::ArityMismatch {
            class: format_type(env, &Type::Class(ct.def)),
            expected,
            found: ct.args.len(),
        });
    }
    Ok(&ct.args)
}

impl Resolver<'_> {
    /// Walk `path` from its back and return what slot `slot` of the path's last node is bound to.
    ///
    /// A result that is still a type variable is substituted with the member's own type argument
    /// when the member's type is parameterized.
    pub fn trace_type(
        &self,
        member: &dyn Member,
        path: &TypePath,
        slot: usize,
    ) -> Result<Option<Type>> {
        let Accumulator { index, current } = self.fold_path(path, slot)?;
        let current = match current {
            Some(ty) if ty.as_type_var().is_some() => Some(
                member
                    .generic_type()
                    .args()
                    .get(index)
                    .cloned()
                    .unwrap_or(ty),
            ),
            other => other,
        };
        tracing::debug!(
            target: TRACING_TARGET,
            slot,
            result = %current
                .as_ref()
                .map(|ty| format_type(self.env, ty))
                .unwrap_or_else(|| "<none>".to_string()),
            "traced type"
        );
        Ok(current)
    }

    /// What slot `slot` of `target` is bound to, seen from `class`.
    pub fn resolve_entity_type(
        &self,
        class: ClassId,
        slot: usize,
        target: ClassId,
    ) -> Result<Option<Type>> {
        let path = self.find_type_path(&Type::Class(class), target)?;
        Ok(self.fold_path(&path, slot)?.current)
    }

    pub(crate) fn fold_path(&self, path: &TypePath, slot: usize) -> Result<Accumulator> {
        let mut acc = Accumulator::new(slot);
        for hop in path.iter().rev() {
            if acc.is_settled() {
                break;
            }
            acc = acc.step(self.env, hop)?;
            tracing::trace!(
                target: TRACING_TARGET,
                hop = %TypeDisplay::new(self.env, hop),
                index = acc.index,
                current = ?acc.current.as_ref().map(|ty| format_type(self.env, ty)),
                "path step"
            );
        }
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use nova_types::{FieldDef, TypeStore, WildcardBound};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::member::FieldMember;

    #[test]
    fn seed_reads_declared_slot_or_argument() {
        let env = TypeStore::with_minimal_jdk();
        let map = env.class_id("java.util.Map").unwrap();
        let string = Type::Class(env.well_known().string);
        let integer = Type::Class(env.well_known().integer);
        let v = env.declared_slots(map)[1];

        let acc = Accumulator::new(1).step(&env, &Type::Class(map)).unwrap();
        assert_eq!(acc.current, Some(Type::TypeVar(v)));
        assert!(!acc.is_settled());

        let acc = Accumulator::new(1)
            .step(&env, &Type::class(map, vec![string, integer.clone()]))
            .unwrap();
        assert_eq!(acc.current, Some(integer));
        assert!(acc.is_settled());
    }

    #[test]
    fn out_of_range_slot_is_a_no_op() {
        let env = TypeStore::with_minimal_jdk();
        let list = env.class_id("java.util.List").unwrap();
        let string = Type::Class(env.well_known().string);

        let acc = Accumulator::new(4).step(&env, &Type::Class(list)).unwrap();
        assert_eq!(acc, Accumulator::new(4));
        let acc = acc.step(&env, &Type::class(list, vec![string])).unwrap();
        assert_eq!(acc, Accumulator::new(4));
    }

    #[test]
    fn refine_follows_the_variable_into_arguments() {
        let env = TypeStore::with_minimal_jdk();
        let array_list = env.class_id("java.util.ArrayList").unwrap();
        let list = env.class_id("java.util.List").unwrap();
        let list_e = env.declared_slots(list)[0];
        let array_list_e = env.declared_slots(array_list)[0];

        // List<E'> seen from ArrayList<E'>: List's `E` maps onto ArrayList's `E`.
        let acc = Accumulator::new(0)
            .step(&env, &Type::Class(list))
            .unwrap()
            .step(&env, &Type::class(list, vec![Type::TypeVar(array_list_e)]))
            .unwrap();
        assert_eq!(
            acc,
            Accumulator {
                index: 0,
                current: Some(Type::TypeVar(array_list_e)),
            }
        );
        assert_ne!(list_e, array_list_e);

        let acc = acc.step(&env, &Type::Class(array_list)).unwrap();
        assert_eq!(acc.current, Some(Type::TypeVar(array_list_e)));
    }

    #[test]
    fn parameterized_arguments_collapse_to_their_raw_class() {
        let env = TypeStore::with_minimal_jdk();
        let list = env.class_id("java.util.List").unwrap();
        let string = Type::Class(env.well_known().string);
        let e = env.declared_slots(list)[0];
        let inner = Type::class(list, vec![string]);

        let acc = Accumulator {
            index: 0,
            current: Some(Type::TypeVar(e)),
        }
        .step(&env, &Type::class(list, vec![inner]))
        .unwrap();
        assert_eq!(acc.current, Some(Type::Class(list)));
    }

    #[test]
    fn wildcard_arguments_stay_unresolved() {
        let env = TypeStore::with_minimal_jdk();
        let list = env.class_id("java.util.List").unwrap();
        let e = env.declared_slots(list)[0];
        let wildcard = Type::Wildcard(WildcardBound::Unbounded);

        let acc = Accumulator {
            index: 0,
            current: Some(Type::TypeVar(e)),
        }
        .step(&env, &Type::class(list, vec![wildcard.clone()]))
        .unwrap();
        assert_eq!(acc.current, Some(wildcard));
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let env = TypeStore::with_minimal_jdk();
        let map = env.class_id("java.util.Map").unwrap();
        let string = Type::Class(env.well_known().string);

        let err = Accumulator::new(0)
            .step(&env, &Type::class(map, vec![string]))
            .unwrap_err();
        assert_eq!(
            err,
            GenericsError::ArityMismatch {
                class: "java.util.Map".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn unresolved_variable_takes_the_member_argument() {
        let env = TypeStore::with_minimal_jdk();
        let list = env.class_id("java.util.List").unwrap();
        let string = Type::Class(env.well_known().string);
        let e = env.declared_slots(list)[0];

        let field = FieldDef {
            name: "names".to_string(),
            ty: Type::class(list, vec![string.clone()]),
        };
        let member = FieldMember::new(env.well_known().object, &field);
        let path = TypePath::from(vec![Type::Class(list)]);

        // The raw hop alone only yields `E`.
        let resolver = Resolver::new(&env);
        assert_eq!(resolver.fold_path(&path, 0).unwrap().current, Some(Type::TypeVar(e)));
        assert_eq!(resolver.trace_type(&member, &path, 0), Ok(Some(string)));
    }

    #[test]
    fn member_without_argument_at_index_keeps_the_variable() {
        let env = TypeStore::with_minimal_jdk();
        let list = env.class_id("java.util.List").unwrap();
        let map = env.class_id("java.util.Map").unwrap();
        let string = Type::Class(env.well_known().string);
        let v = env.declared_slots(map)[1];

        let field = FieldDef {
            name: "names".to_string(),
            ty: Type::class(list, vec![string]),
        };
        let member = FieldMember::new(env.well_known().object, &field);
        let path = TypePath::from(vec![Type::Class(map)]);

        assert_eq!(
            Resolver::new(&env).trace_type(&member, &path, 1),
            Ok(Some(Type::TypeVar(v)))
        );
    }
}
