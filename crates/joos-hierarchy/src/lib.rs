//! Class hierarchy checks and effective member sets.
//!
//! [`check_hierarchy`] validates the supertype graph of a linked
//! [`TypeStore`] and then computes, supertypes first, the
//! [`EffectiveMemberSet`] of every type: the method each signature resolves
//! to and the visible fields.

mod checks;
mod members;

pub use crate::members::{EffectiveMemberSet, MemberMethod, MethodKey};

use joos_core::SemanticError;
use joos_types::{ClassId, MethodRef, TypeStore};

/// Member sets of every class and interface, indexed by [`ClassId`].
#[derive(Debug, Clone)]
pub struct Hierarchy {
    members: Vec<EffectiveMemberSet>,
}

impl Hierarchy {
    #[must_use]
    pub fn members(&self, id: ClassId) -> &EffectiveMemberSet {
        &self.members[id.idx()]
    }

    /// Every method named `name` visible in `id`, one per signature.
    pub fn methods_named<'s>(
        &'s self,
        id: ClassId,
        name: &'s str,
    ) -> impl Iterator<Item = MethodRef> + 's {
        self.members(id).methods_named(name)
    }
}

pub fn check_hierarchy(store: &TypeStore) -> Result<Hierarchy, SemanticError> {
    let _span = tracing::debug_span!("hierarchy", classes = store.len()).entered();

    let result = run(store);
    if let Err(err) = &result {
        tracing::debug!(code = err.kind().code(), %err, "hierarchy check failed");
    }
    result
}

fn run(store: &TypeStore) -> Result<Hierarchy, SemanticError> {
    for (id, _) in store.iter() {
        checks::check_supertype_edges(store, id)?;
    }
    let order = checks::dependency_order(store)?;
    for (id, _) in store.iter() {
        checks::check_duplicates(store, id)?;
    }

    let mut computed: Vec<Option<EffectiveMemberSet>> = vec![None; store.len()];
    for id in order {
        let set = members::compute_members(store, id, &computed)?;
        computed[id.idx()] = Some(set);
    }
    let members = computed.into_iter().map(Option::unwrap_or_default).collect();
    Ok(Hierarchy { members })
}
