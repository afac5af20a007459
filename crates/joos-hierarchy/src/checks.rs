use std::collections::HashSet;

use joos_core::{Location, SemanticError};
use joos_types::{display_signature, ClassId, TypeEnv, TypeStore};

fn location(store: &TypeStore, id: ClassId) -> Location {
    let def = store.class(id);
    Location::in_type(def.name.to_dotted()).at(def.span)
}

fn name_of(store: &TypeStore, id: ClassId) -> String {
    store.class(id).name.to_dotted()
}

/// A class extends a non-final class; classes implement and interfaces
/// extend only interfaces, each at most once.
pub(crate) fn check_supertype_edges(store: &TypeStore, id: ClassId) -> Result<(), SemanticError> {
    let def = store.class(id);

    if let Some(sup) = def.super_class {
        let sup_def = store.class(sup);
        if sup_def.is_interface() {
            return Err(SemanticError::ExtendsNonClass {
                target: name_of(store, sup),
                at: location(store, id),
            });
        }
        if sup_def.is_final() {
            return Err(SemanticError::ExtendsFinalClass {
                target: name_of(store, sup),
                at: location(store, id),
            });
        }
    }

    let mut seen = HashSet::new();
    for &iface in &def.interfaces {
        if !store.class(iface).is_interface() {
            return Err(SemanticError::ImplementsNonInterface {
                target: name_of(store, iface),
                at: location(store, id),
            });
        }
        if !seen.insert(iface) {
            return Err(SemanticError::RepeatedInterface {
                interface: name_of(store, iface),
                at: location(store, id),
            });
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first search over supertype edges with explicit in-progress
/// markers. On success returns every class with its supertypes before it.
pub(crate) fn dependency_order(store: &TypeStore) -> Result<Vec<ClassId>, SemanticError> {
    let mut marks = vec![Mark::Unvisited; store.len()];
    let mut order = Vec::with_capacity(store.len());

    for (root, _) in store.iter() {
        if marks[root.idx()] != Mark::Unvisited {
            continue;
        }
        // (class, whether its supertypes have been pushed)
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                marks[id.idx()] = Mark::Done;
                order.push(id);
                continue;
            }
            match marks[id.idx()] {
                Mark::Done => continue,
                Mark::InProgress => {
                    return Err(SemanticError::CircularInheritance {
                        ty: name_of(store, id),
                        at: location(store, id),
                    })
                }
                Mark::Unvisited => {}
            }
            marks[id.idx()] = Mark::InProgress;
            stack.push((id, true));
            for sup in store.class(id).direct_supertypes() {
                match marks[sup.idx()] {
                    Mark::InProgress => {
                        return Err(SemanticError::CircularInheritance {
                            ty: name_of(store, sup),
                            at: location(store, id),
                        })
                    }
                    Mark::Unvisited => stack.push((sup, false)),
                    Mark::Done => {}
                }
            }
        }
    }
    Ok(order)
}

/// No two fields share a name; no two methods (or constructors) share a
/// signature.
pub(crate) fn check_duplicates(store: &TypeStore, id: ClassId) -> Result<(), SemanticError> {
    let def = store.class(id);
    let owner = def.name.to_dotted();

    let mut fields = HashSet::new();
    for field in &def.fields {
        if !fields.insert(&field.name) {
            return Err(SemanticError::DuplicateField {
                name: field.name.to_string(),
                at: Location::in_type(owner.clone())
                    .member(field.name.to_string())
                    .at(field.span),
            });
        }
    }

    let mut methods = HashSet::new();
    for method in &def.methods {
        if !methods.insert((&method.name, &method.params)) {
            let signature = display_signature(store, method.name.as_str(), &method.params);
            return Err(SemanticError::DuplicateMember {
                at: Location::in_type(owner.clone())
                    .member(signature.clone())
                    .at(method.span),
                signature,
            });
        }
    }

    let mut constructors = HashSet::new();
    for ctor in &def.constructors {
        if !constructors.insert(&ctor.params) {
            let signature = display_signature(store, def.simple_name(), &ctor.params);
            return Err(SemanticError::DuplicateMember {
                at: Location::in_type(owner.clone())
                    .member(signature.clone())
                    .at(ctor.span),
                signature,
            });
        }
    }
    Ok(())
}
