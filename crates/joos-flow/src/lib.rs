//! Reachability analysis and constructor-cycle detection.
//!
//! Reachability is a structural fold over each method and constructor body
//! that computes whether a statement can complete normally. Loop conditions
//! that fold to a constant decide whether the loop body, or the code after
//! the loop, can be reached.

mod constant;
mod cycles;
mod reachability;

pub use crate::constant::{fold, Constant};
pub use crate::reachability::Completion;

use joos_core::{Location, SemanticError};
use joos_resolve::LinkedProgram;
use joos_typeck::TypeckResults;
use joos_types::{display_signature, ClassId, Type, TypeEnv, TypeStore};

use crate::reachability::Reachability;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowOptions {
    /// Keep checking other bodies after the first error.
    pub collect_all: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self { collect_all: true }
    }
}

/// Check constructor invocation cycles, then the reachability of every body
/// of every program type.
pub fn check_flow(
    linked: &LinkedProgram<'_>,
    typeck: &TypeckResults,
    options: &FlowOptions,
) -> Result<(), Vec<SemanticError>> {
    let _span = tracing::debug_span!("flow").entered();
    let store = &linked.store;

    if let Err(err) = cycles::check_constructor_cycles(store, typeck.constructor_targets()) {
        tracing::debug!(code = err.kind().code(), %err, "constructor cycle");
        return Err(vec![err]);
    }

    let mut errors = Vec::new();
    for class in linked.defs().program_ids() {
        let decl = &linked.defs().unit(class).decl;
        for err in check_class(store, class, decl) {
            tracing::debug!(code = err.kind().code(), %err, "body rejected");
            errors.push(err);
            if !options.collect_all {
                return Err(errors);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_class(store: &TypeStore, class: ClassId, decl: &joos_hir::TypeDecl) -> Vec<SemanticError> {
    let def = store.class(class);
    let location = Location::in_type(def.name.to_dotted());
    let mut errors = Vec::new();

    for (method, method_decl) in def.methods.iter().zip(&decl.methods) {
        let Some(body) = method_decl.body else {
            continue;
        };
        let signature = display_signature(store, method.name.as_str(), &method.params);
        let walker = Reachability::new(&decl.bodies, location.clone().member(signature.clone()));
        match walker.check(body) {
            Ok(completion) if completion.normal && method.return_type != Type::Void => {
                errors.push(SemanticError::MissingReturn {
                    method: signature,
                    at: location.clone().at(method.span),
                });
            }
            Ok(_) => {}
            Err(err) => errors.push(err),
        }
    }

    // Default constructors have no declaration and no body.
    for (ctor, ctor_decl) in def.constructors.iter().zip(&decl.constructors) {
        let signature = display_signature(store, def.simple_name(), &ctor.params);
        let walker = Reachability::new(&decl.bodies, location.clone().member(signature));
        if let Err(err) = walker.check(ctor_decl.body) {
            errors.push(err);
        }
    }
    errors
}
