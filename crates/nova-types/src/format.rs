use std::fmt;

use crate::{ClassType, Type, TypeEnv, WildcardBound};

/// Java-like rendering of a [`Type`] (`java.util.Map<K, java.util.List<? extends V>>`).
///
/// Classes render with their binary name and type variables with their declared name. Ids the
/// environment cannot resolve render as `<class #n>` / `<type var #n>`; formatting never fails.
pub struct TypeDisplay<'a> {
    env: &'a dyn TypeEnv,
    ty: &'a Type,
}

impl<'a> TypeDisplay<'a> {
    pub fn new(env: &'a dyn TypeEnv, ty: &'a Type) -> Self {
        Self { env, ty }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(self.env, self.ty, f)
    }
}

pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    TypeDisplay::new(env, ty).to_string()
}

fn write_type(env: &dyn TypeEnv, ty: &Type, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ty {
        Type::Class(id) => match env.class(*id) {
            Some(def) => f.write_str(&def.name),
            None => write!(f, "<class #{}>", id.to_raw()),
        },
        Type::Parameterized(ClassType { def, args }) => {
            write_type(env, &Type::Class(*def), f)?;
            f.write_str("<")?;
            for (idx, arg) in args.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write_type(env, arg, f)?;
            }
            f.write_str(">")
        }
        Type::TypeVar(id) => match env.type_param(*id) {
            Some(tp) => f.write_str(&tp.name),
            None => write!(f, "<type var #{}>", id.to_raw()),
        },
        Type::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
        Type::Wildcard(WildcardBound::Extends(upper)) => {
            f.write_str("? extends ")?;
            write_type(env, upper, f)
        }
        Type::Wildcard(WildcardBound::Super(lower)) => {
            f.write_str("? super ")?;
            write_type(env, lower, f)
        }
        Type::Array(component) => {
            write_type(env, component, f)?;
            f.write_str("[]")
        }
        Type::Void => f.write_str("void"),
    }
}
