use nova_types::{ClassId, TypeVarId};
use thiserror::Error;

/// The host type model broke one of its guarantees.
///
/// Failing to resolve a variable is not an error; it surfaces as `Ok(None)` or as an unresolved
/// `Type::TypeVar`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenericsError {
    #[error("no metadata for class #{}", .0.to_raw())]
    UnknownClass(ClassId),
    #[error("no metadata for type variable #{}", .0.to_raw())]
    UnknownTypeParam(TypeVarId),
    #[error("`{class}` declares {expected} type parameters but was given {found} arguments")]
    ArityMismatch {
        class: String,
        expected: usize,
        found: usize,
    },
}

pub type Result<T, E = GenericsError> = std::result::Result<T, E>;
