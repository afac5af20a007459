use std::collections::{BTreeMap, HashSet};

use joos_core::{Location, SemanticError};
use joos_types::{display_signature, ConstructorRef, TypeEnv, TypeStore};

/// Find a cycle in the `this(...)` graph. Every constructor invokes at most
/// one other, so following the single outgoing edge from each unvisited
/// constructor finds every cycle.
pub(crate) fn check_constructor_cycles(
    store: &TypeStore,
    targets: &BTreeMap<ConstructorRef, ConstructorRef>,
) -> Result<(), SemanticError> {
    let mut done: HashSet<ConstructorRef> = HashSet::new();

    for &start in targets.keys() {
        let mut path = Vec::new();
        let mut on_path = HashSet::new();
        let mut current = Some(start);
        while let Some(ctor) = current {
            if done.contains(&ctor) {
                break;
            }
            if !on_path.insert(ctor) {
                return Err(cycle_error(store, ctor));
            }
            path.push(ctor);
            current = targets.get(&ctor).copied();
        }
        done.extend(path);
    }
    Ok(())
}

fn cycle_error(store: &TypeStore, ctor: ConstructorRef) -> SemanticError {
    let class = store.class(ctor.owner);
    let def = ctor.def(store);
    let ty = class.name.to_dotted();
    SemanticError::CircularConstructorInvocation {
        at: Location::in_type(ty.clone())
            .member(display_signature(store, class.simple_name(), &def.params))
            .at(def.span),
        ty,
    }
}
