use nova_types::{ClassId, Type, TypeDisplay};

use crate::{Resolver, TRACING_TARGET};

impl Resolver<'_> {
    /// Best-effort erasure of `ty` to a class.
    ///
    /// Parameterized types erase to their raw class; variables and wildcards to their first upper
    /// bound. Anything else, and any chain of bounds deeper than
    /// [`max_scan_depth`](crate::GenericsConfig::max_scan_depth), gives `java.lang.Object`.
    pub fn guess_class(&self, ty: &Type) -> ClassId {
        self.guess_at(ty, 0)
    }

    fn guess_at(&self, ty: &Type, loops: usize) -> ClassId {
        let looped = loops + 1;
        match ty {
            Type::Class(id) => *id,
            Type::Parameterized(ct) => self.decide(looped, &Type::Class(ct.def)),
            Type::TypeVar(_) | Type::Wildcard(_) => {
                match self.env.upper_bounds(ty).into_iter().next() {
                    Some(bound) => self.decide(looped, &bound),
                    None => self.object(),
                }
            }
            Type::Array(_) | Type::Void => self.object(),
        }
    }

    fn decide(&self, looped: usize, ty: &Type) -> ClassId {
        if looped > self.config.max_scan_depth {
            tracing::warn!(
                target: TRACING_TARGET,
                ty = %TypeDisplay::new(self.env, ty),
                depth = looped,
                "bound chain too deep, guessing java.lang.Object"
            );
            return self.object();
        }
        self.guess_at(ty, looped)
    }

    fn object(&self) -> ClassId {
        self.env.well_known().object
    }
}
