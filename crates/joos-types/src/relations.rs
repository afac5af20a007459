use std::collections::HashSet;

use crate::{ClassId, Type, TypeEnv};

/// `id` and all its transitive supertypes, each once, nearest first.
///
/// Terminates on cyclic input so that it is safe to call before the hierarchy
/// has been checked.
pub fn supertypes(env: &dyn TypeEnv, id: ClassId) -> Vec<ClassId> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    let mut queue = std::collections::VecDeque::from([id]);
    while let Some(next) = queue.pop_front() {
        if !seen.insert(next) {
            continue;
        }
        order.push(next);
        queue.extend(env.class(next).direct_supertypes());
    }
    order
}

/// Reflexive, transitive subtyping between classes and interfaces. Every type
/// is a subtype of `java.lang.Object`, interfaces included.
pub fn is_subclass(env: &dyn TypeEnv, sub: ClassId, sup: ClassId) -> bool {
    if sub == sup || sup == env.well_known().object {
        return true;
    }
    supertypes(env, sub).contains(&sup)
}

/// Assignment conversion: identity, widening primitive, widening reference.
pub fn is_assignable(env: &dyn TypeEnv, from: &Type, to: &Type) -> bool {
    if from == to {
        return true;
    }
    let known = env.well_known();
    match (from, to) {
        (Type::Primitive(a), Type::Primitive(b)) => a.widens_to(*b),
        (Type::Null, to) => matches!(to, Type::Class(_) | Type::Array(_)),
        (Type::Class(a), Type::Class(b)) => is_subclass(env, *a, *b),
        (Type::Array(_), Type::Class(b)) => {
            *b == known.object || *b == known.cloneable || *b == known.serializable
        }
        (Type::Array(a), Type::Array(b)) => match (a.as_ref(), b.as_ref()) {
            (Type::Primitive(x), Type::Primitive(y)) => x == y,
            (a, b) if a.is_reference() && b.is_reference() => is_assignable(env, a, b),
            _ => false,
        },
        _ => false,
    }
}

/// Cast conversion. Numeric types cast among themselves, `boolean` only to
/// itself; reference casts must be possible in at least one direction, with
/// interfaces compatible with any class that is not final.
pub fn is_castable(env: &dyn TypeEnv, from: &Type, to: &Type) -> bool {
    match (from, to) {
        (Type::Void, _) | (_, Type::Void) => false,
        (Type::Primitive(a), Type::Primitive(b)) => {
            (a.is_numeric() && b.is_numeric()) || a == b
        }
        (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,
        (Type::Null, _) => to.is_reference(),
        (_, Type::Null) => false,
        _ if is_assignable(env, from, to) || is_assignable(env, to, from) => true,
        (Type::Class(a), Type::Class(b)) => {
            let (a, b) = (env.class(*a), env.class(*b));
            match (a.is_interface(), b.is_interface()) {
                (true, true) => true,
                (true, false) => !b.is_final(),
                (false, true) => !a.is_final(),
                (false, false) => false,
            }
        }
        (Type::Array(a), Type::Array(b)) => {
            a.is_reference() && b.is_reference() && is_castable(env, a, b)
        }
        _ => false,
    }
}

/// Subtypes of `Throwable` that are neither `RuntimeException` nor `Error`.
pub fn is_checked_exception(env: &dyn TypeEnv, id: ClassId) -> bool {
    let known = env.well_known();
    is_subclass(env, id, known.throwable)
        && !is_subclass(env, id, known.runtime_exception)
        && !is_subclass(env, id, known.error)
}
