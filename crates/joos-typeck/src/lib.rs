//! Type checking of method, constructor and field initializer bodies.
//!
//! Every body of every program type is checked by a single walk that infers a static type for each expression, classifies names,
//! selects overloads and enforces the static-context and checked-exception
//! rules. The first error in a body ends the check of that body; independent
//! bodies keep being checked unless [`TypeckOptions::collect_all`] is off.

mod body;
mod expr;
mod names;
mod scope;

pub use crate::scope::{Local, LocalId};

use std::collections::{BTreeMap, HashMap};

use joos_core::SemanticError;
use joos_hierarchy::Hierarchy;
use joos_hir::ExprId;
use joos_resolve::LinkedProgram;
use joos_types::{ClassId, ConstructorRef, FieldRef, MethodRef, Type, TypeEnv};

use crate::body::{BodyChecker, ClassContext};

/// The declaration a body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyOwner {
    Field(FieldRef),
    Method(MethodRef),
    Constructor(ConstructorRef),
}

/// What a name, field access, call or creation expression refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Local(LocalId),
    Field(FieldRef),
    /// The `length` of an array.
    ArrayLength,
    /// A type name used as the qualifier of a static member.
    Type(ClassId),
    Method(MethodRef),
    Constructor(ConstructorRef),
}

/// Results for the bodies of one type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassResults {
    /// Parameters and locals of every body, indexed by [`LocalId`].
    pub locals: Vec<Local>,
    pub expr_types: HashMap<ExprId, Type>,
    pub resolutions: HashMap<ExprId, Resolution>,
}

#[derive(Debug, Clone, Default)]
pub struct TypeckResults {
    classes: HashMap<ClassId, ClassResults>,
    constructor_targets: BTreeMap<ConstructorRef, ConstructorRef>,
}

impl TypeckResults {
    #[must_use]
    pub fn class(&self, id: ClassId) -> Option<&ClassResults> {
        self.classes.get(&id)
    }

    #[must_use]
    pub fn expr_type(&self, class: ClassId, expr: ExprId) -> Option<&Type> {
        self.classes.get(&class)?.expr_types.get(&expr)
    }

    #[must_use]
    pub fn resolution(&self, class: ClassId, expr: ExprId) -> Option<Resolution> {
        self.classes.get(&class)?.resolutions.get(&expr).copied()
    }

    /// The constructor each `this(...)` invocation resolved to, keyed by the
    /// invoking constructor.
    #[must_use]
    pub fn constructor_targets(&self) -> &BTreeMap<ConstructorRef, ConstructorRef> {
        &self.constructor_targets
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeckOptions {
    /// Keep checking other bodies after the first error.
    pub collect_all: bool,
}

impl Default for TypeckOptions {
    fn default() -> Self {
        Self { collect_all: true }
    }
}

/// Check every body of every program type. Library bodies are trusted.
pub fn check_program(
    linked: &LinkedProgram<'_>,
    hierarchy: &Hierarchy,
    options: &TypeckOptions,
) -> Result<TypeckResults, Vec<SemanticError>> {
    let _span = tracing::debug_span!("typeck").entered();
    let defs = linked.defs();
    let store = &linked.store;

    let mut results = TypeckResults::default();
    let mut errors = Vec::new();

    for class in defs.program_ids() {
        let decl = &defs.unit(class).decl;
        let cx = ClassContext {
            linker: &linked.linker,
            store,
            hierarchy,
            class,
            decl,
        };
        let mut class_results = ClassResults::default();

        for owner in bodies(store, class) {
            let checker =
                BodyChecker::new(cx, owner, &mut class_results, &mut results.constructor_targets);
            if let Err(err) = checker.check() {
                tracing::debug!(code = err.kind().code(), %err, "body rejected");
                errors.push(err);
                if !options.collect_all {
                    return Err(errors);
                }
            }
        }
        results.classes.insert(class, class_results);
    }

    if errors.is_empty() {
        tracing::debug!(classes = results.classes.len(), "bodies type checked");
        Ok(results)
    } else {
        Err(errors)
    }
}

/// Field initializers, methods and constructors of `class`, in declaration
/// order. Bodiless declarations are included; the checker skips what it
/// cannot see.
fn bodies(store: &joos_types::TypeStore, class: ClassId) -> Vec<BodyOwner> {
    let def = store.class(class);
    let fields = (0..def.fields.len()).map(|index| BodyOwner::Field(FieldRef { owner: class, index }));
    let methods =
        (0..def.methods.len()).map(|index| BodyOwner::Method(MethodRef { owner: class, index }));
    let constructors = (0..def.constructors.len())
        .map(|index| BodyOwner::Constructor(ConstructorRef { owner: class, index }));
    fields.chain(methods).chain(constructors).collect()
}
