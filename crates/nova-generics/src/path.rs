//! Type paths between a starting type and a target class.

use std::collections::VecDeque;

use nova_types::{ClassId, Type, TypeDisplay};

use crate::{class_def, Resolver, Result, TRACING_TARGET};

/// Types connecting a starting type to a target class, starting type first.
///
/// Consumed from the back: the last node is the one closest to the target.
pub type TypePath = VecDeque<Type>;

impl Resolver<'_> {
    /// Build the path from `start` to `target`.
    ///
    /// The search is greedy. A concrete class contributes every superinterface that
    /// parameterizes `target`, then, while the path holds fewer than
    /// [`path_hop_limit`](crate::GenericsConfig::path_hop_limit) nodes, the path from its
    /// superclass, then the path from its enclosing class. A parameterized type continues with
    /// its raw class. The path is empty only when `start` is `target` itself.
    pub fn find_type_path(&self, start: &Type, target: ClassId) -> Result<TypePath> {
        let mut visiting = Vec::new();
        let path = self.find_path_inner(start, target, &mut visiting)?;
        tracing::trace!(
            target: TRACING_TARGET,
            start = %TypeDisplay::new(self.env, start),
            target = %TypeDisplay::new(self.env, &Type::Class(target)),
            len = path.len(),
            "found type path"
        );
        Ok(path)
    }

    fn find_path_inner(
        &self,
        start: &Type,
        target: ClassId,
        visiting: &mut Vec<ClassId>,
    ) -> Result<TypePath> {
        let mut path = TypePath::new();
        if *start == Type::Class(target) {
            return Ok(path);
        }
        path.push_back(start.clone());

        match start {
            Type::Class(id) => {
                // Cyclic supertype or enclosing links in a malformed model.
                if visiting.contains(id) {
                    return Ok(path);
                }
                visiting.push(*id);

                class_def(self.env, *id)?;
                path.extend(
                    self.env
                        .direct_superinterfaces(*id)
                        .iter()
                        .filter(|iface| {
                            matches!(iface, Type::Parameterized(ct) if ct.def == target)
                        })
                        .cloned(),
                );
                if path.len() < self.config.path_hop_limit {
                    if let Some(super_class) = self.env.direct_supertype(*id) {
                        path.extend(self.find_path_inner(super_class, target, visiting)?);
                    }
                }
                if path.len() < self.config.path_hop_limit {
                    if let Some(enclosing) = self.env.enclosing_type(*id) {
                        path.extend(self.find_path_inner(
                            &Type::Class(enclosing),
                            target,
                            visiting,
                        )?);
                    }
                }

                visiting.pop();
            }
            Type::Parameterized(ct) => {
                path.extend(self.find_path_inner(&Type::Class(ct.def), target, visiting)?);
            }
            Type::TypeVar(_) | Type::Wildcard(_) | Type::Array(_) | Type::Void => {}
        }
        Ok(path)
    }
}
