use std::collections::BTreeMap;

use joos_core::{Location, Name, SemanticError};
use joos_types::{
    display_signature, display_type, is_checked_exception, is_subclass, ClassId, FieldRef,
    MethodDef, MethodRef, Type, TypeEnv, TypeStore,
};

/// A method signature: name and parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodKey {
    pub name: Name,
    pub params: Vec<Type>,
}

impl MethodKey {
    #[must_use]
    pub fn of(def: &MethodDef) -> Self {
        Self {
            name: def.name.clone(),
            params: def.params.clone(),
        }
    }
}

/// The method a signature resolves to in some type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberMethod {
    pub method: MethodRef,
    /// Abstract in this type. Differs from the declaration for the implicit
    /// `Object` members of interfaces.
    pub is_abstract: bool,
}

/// The methods and fields visible in a type, declared or inherited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveMemberSet {
    methods: BTreeMap<MethodKey, MemberMethod>,
    fields: BTreeMap<Name, FieldRef>,
}

impl EffectiveMemberSet {
    #[must_use]
    pub fn method(&self, key: &MethodKey) -> Option<&MemberMethod> {
        self.methods.get(key)
    }

    pub fn methods(&self) -> impl Iterator<Item = (&MethodKey, &MemberMethod)> {
        self.methods.iter()
    }

    pub fn methods_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = MethodRef> + 's {
        self.methods
            .iter()
            .filter(move |(key, _)| key.name == name)
            .map(|(_, member)| member.method)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldRef> {
        self.fields.get(name).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&Name, FieldRef)> {
        self.fields.iter().map(|(name, field)| (name, *field))
    }

    pub fn abstract_methods(&self) -> impl Iterator<Item = MethodRef> + '_ {
        self.methods
            .values()
            .filter(|member| member.is_abstract)
            .map(|member| member.method)
    }
}

/// Compute the member set of `id` from the already computed sets of its
/// direct supertypes, checking every replacement on the way.
pub(crate) fn compute_members(
    store: &TypeStore,
    id: ClassId,
    computed: &[Option<EffectiveMemberSet>],
) -> Result<EffectiveMemberSet, SemanticError> {
    let def = store.class(id);
    let owner = def.name.to_dotted();

    // Superclass entries first, so a concrete inherited method is found
    // before the abstract ones of the same signature.
    let mut inherited: BTreeMap<MethodKey, Vec<MemberMethod>> = BTreeMap::new();
    let mut fields = BTreeMap::new();
    for sup in def.direct_supertypes() {
        let Some(set) = &computed[sup.idx()] else {
            continue;
        };
        for (key, member) in &set.methods {
            let group = inherited.entry(key.clone()).or_default();
            if !group.iter().any(|m| m.method == member.method) {
                group.push(*member);
            }
        }
        for (name, field) in &set.fields {
            fields.entry(name.clone()).or_insert(*field);
        }
    }

    if def.is_interface() && def.interfaces.is_empty() {
        let object = store.well_known().object;
        for (index, method) in store.class(object).methods.iter().enumerate() {
            if method.modifiers.is_public() && !method.is_static() {
                inherited
                    .entry(MethodKey::of(method))
                    .or_default()
                    .push(MemberMethod {
                        method: MethodRef {
                            owner: object,
                            index,
                        },
                        is_abstract: true,
                    });
            }
        }
    }

    let mut methods = BTreeMap::new();
    for (index, method) in def.methods.iter().enumerate() {
        let key = MethodKey::of(method);
        let declared = MethodRef { owner: id, index };
        if let Some(group) = inherited.remove(&key) {
            let at = Location::in_type(owner.clone())
                .member(display_signature(store, method.name.as_str(), &method.params))
                .at(method.span);
            for replaced in group {
                check_replace(store, declared, replaced.method, &at)?;
            }
        }
        methods.insert(
            key,
            MemberMethod {
                method: declared,
                is_abstract: method.is_abstract(),
            },
        );
    }

    for (key, group) in inherited {
        let at = Location::in_type(owner.clone())
            .member(display_signature(store, key.name.as_str(), &key.params))
            .at(def.span);
        let chosen = match group.iter().find(|m| !m.is_abstract) {
            Some(concrete) => {
                for other in group.iter().filter(|m| m.method != concrete.method) {
                    check_replace(store, concrete.method, other.method, &at)?;
                }
                *concrete
            }
            None => {
                let first = group[0];
                let expected = &first.method.def(store).return_type;
                for other in &group[1..] {
                    if other.method.def(store).return_type != *expected {
                        return Err(SemanticError::DifferentReturnType {
                            signature: display_signature(store, key.name.as_str(), &key.params),
                            replaced: store.class(other.method.owner).name.to_dotted(),
                            at,
                        });
                    }
                }
                first
            }
        };
        methods.insert(key, chosen);
    }

    for (index, field) in def.fields.iter().enumerate() {
        fields.insert(field.name.clone(), FieldRef { owner: id, index });
    }

    if !def.is_abstract() {
        if let Some((key, _)) = methods.iter().find(|(_, m)| m.is_abstract) {
            return Err(SemanticError::ClassMustBeAbstract {
                ty: owner.clone(),
                method: display_signature(store, key.name.as_str(), &key.params),
                at: Location::in_type(owner).at(def.span),
            });
        }
    }

    Ok(EffectiveMemberSet { methods, fields })
}

/// Rules for a method `new` taking the place of `old` in some type.
fn check_replace(
    store: &TypeStore,
    new: MethodRef,
    old: MethodRef,
    at: &Location,
) -> Result<(), SemanticError> {
    let new_def = new.def(store);
    let old_def = old.def(store);
    let signature = display_signature(store, new_def.name.as_str(), &new_def.params);
    let replaced = store.class(old.owner).name.to_dotted();

    if new_def.return_type != old_def.return_type {
        return Err(SemanticError::DifferentReturnType {
            signature,
            replaced,
            at: at.clone(),
        });
    }
    if old_def.modifiers.is_final() {
        return Err(SemanticError::ReplaceFinal {
            signature,
            replaced,
            at: at.clone(),
        });
    }
    if new_def.modifiers.is_protected() && old_def.modifiers.is_public() {
        return Err(SemanticError::ProtectedReplacePublic {
            signature,
            replaced,
            at: at.clone(),
        });
    }
    match (new_def.is_static(), old_def.is_static()) {
        (false, true) => {
            return Err(SemanticError::NonstaticReplaceStatic {
                signature,
                replaced,
                at: at.clone(),
            })
        }
        (true, false) => {
            return Err(SemanticError::StaticReplaceNonstatic {
                signature,
                replaced,
                at: at.clone(),
            })
        }
        _ => {}
    }
    for &thrown in &new_def.throws {
        if !is_checked_exception(store, thrown) {
            continue;
        }
        if !old_def.throws.iter().any(|&t| is_subclass(store, thrown, t)) {
            return Err(SemanticError::IllegalThrowsInReplace {
                signature,
                exception: display_type(store, &Type::Class(thrown)),
                at: at.clone(),
            });
        }
    }
    Ok(())
}
