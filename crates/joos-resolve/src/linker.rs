use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use joos_core::{Location, Name, PackageName, QualifiedName, SemanticError, Span};
use joos_hir::TypeSyntax;
use joos_types::{ClassId, Type};

use crate::def_map::DefMap;
use crate::import_map::ImportMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeLookup {
    Found(ClassId),
    Ambiguous(Vec<ClassId>),
    NotFound,
}

/// Resolves type names in the context of the compilation unit that contains
/// them.
///
/// Simple-name lookups are memoized per `(unit, name)`. The linker also
/// remembers which on-demand imports ended up supplying a type, which the
/// package clash check needs.
#[derive(Debug)]
pub struct Linker<'a> {
    defs: DefMap<'a>,
    imports: Vec<ImportMap>,
    memo: RefCell<HashMap<(ClassId, Name), Result<Option<ClassId>, SemanticError>>>,
    used_on_demand: RefCell<BTreeSet<PackageName>>,
}

impl<'a> Linker<'a> {
    pub fn new(defs: DefMap<'a>) -> Self {
        let imports = defs
            .ids()
            .map(|id| ImportMap::from_unit(defs.unit(id)))
            .collect();
        Self {
            defs,
            imports,
            memo: RefCell::new(HashMap::new()),
            used_on_demand: RefCell::new(BTreeSet::new()),
        }
    }

    #[must_use]
    pub fn defs(&self) -> &DefMap<'a> {
        &self.defs
    }

    #[must_use]
    pub fn imports(&self, ctx: ClassId) -> &ImportMap {
        &self.imports[ctx.idx()]
    }

    /// Packages of on-demand imports that supplied a type used by a program
    /// unit.
    #[must_use]
    pub fn used_on_demand_packages(&self) -> BTreeSet<PackageName> {
        self.used_on_demand.borrow().clone()
    }

    fn location(&self, ctx: ClassId, range: Span) -> Location {
        Location::in_type(self.defs.unit(ctx).type_name().to_dotted()).at(range)
    }

    /// Validate the import declarations of `ctx`, used or not.
    pub fn check_imports(&self, ctx: ClassId) -> Result<(), SemanticError> {
        let unit = self.defs.unit(ctx);
        let own_name = unit.type_name();
        let imports = self.imports(ctx);

        for (idx, import) in imports.single.iter().enumerate() {
            if self.defs.lookup(&import.path).is_none() {
                return Err(SemanticError::TypeNotFound {
                    name: import.path.to_dotted(),
                    at: self.location(ctx, import.range),
                });
            }
            if import.imported == unit.decl.name && import.path != own_name {
                return Err(SemanticError::SingleTypeImportClash {
                    import: import.path.to_dotted(),
                    at: self.location(ctx, import.range),
                });
            }
            let clash = imports.single[..idx]
                .iter()
                .find(|prev| prev.imported == import.imported && prev.path != import.path);
            if let Some(prev) = clash {
                return Err(SemanticError::AmbiguousImport {
                    name: import.imported.to_string(),
                    candidates: vec![prev.path.to_dotted(), import.path.to_dotted()],
                    at: self.location(ctx, import.range),
                });
            }
        }

        for import in imports.explicit_on_demand() {
            if !self.defs.package_exists(&import.package) {
                return Err(SemanticError::NonExistingPackage {
                    package: import.package.to_dotted(),
                    at: self.location(ctx, import.range),
                });
            }
        }
        Ok(())
    }

    /// Look a simple type name up in `ctx`. `Ok(None)` means no tier knows the
    /// name; errors are ambiguities.
    pub fn lookup_simple(
        &self,
        ctx: ClassId,
        name: &Name,
        range: Span,
    ) -> Result<Option<ClassId>, SemanticError> {
        let key = (ctx, name.clone());
        if let Some(hit) = self.memo.borrow().get(&key) {
            return hit.clone();
        }
        let result = self.lookup_simple_uncached(ctx, name, range);
        self.memo.borrow_mut().insert(key, result.clone());
        result
    }

    fn lookup_simple_uncached(
        &self,
        ctx: ClassId,
        name: &Name,
        range: Span,
    ) -> Result<Option<ClassId>, SemanticError> {
        let unit = self.defs.unit(ctx);
        if unit.decl.name == *name {
            return Ok(Some(ctx));
        }

        let imports = self.imports(ctx);
        let mut single = imports.single.iter().filter(|i| i.imported == *name);
        if let Some(first) = single.next() {
            if let Some(other) = single.find(|i| i.path != first.path) {
                return Err(SemanticError::AmbiguousImport {
                    name: name.to_string(),
                    candidates: vec![first.path.to_dotted(), other.path.to_dotted()],
                    at: self.location(ctx, range),
                });
            }
            return match self.defs.lookup(&first.path) {
                Some(id) => Ok(Some(id)),
                None => Err(SemanticError::TypeNotFound {
                    name: first.path.to_dotted(),
                    at: self.location(ctx, first.range),
                }),
            };
        }

        if let Some(id) = self
            .defs
            .package_types(&unit.package_name())
            .and_then(|types| types.get(name))
        {
            return Ok(Some(*id));
        }

        match self.lookup_on_demand(ctx, name) {
            TypeLookup::Found(id) => Ok(Some(id)),
            TypeLookup::NotFound => Ok(None),
            TypeLookup::Ambiguous(ids) => Err(SemanticError::AmbiguousOnDemandImport {
                name: name.to_string(),
                candidates: ids
                    .iter()
                    .map(|id| self.defs.unit(*id).type_name().to_dotted())
                    .collect(),
                at: self.location(ctx, range),
            }),
        }
    }

    fn lookup_on_demand(&self, ctx: ClassId, name: &Name) -> TypeLookup {
        let mut found: Vec<(ClassId, &PackageName)> = Vec::new();
        for import in &self.imports(ctx).on_demand {
            let hit = self
                .defs
                .package_types(&import.package)
                .and_then(|types| types.get(name));
            if let Some(id) = hit {
                found.push((*id, &import.package));
            }
        }

        let distinct: BTreeSet<ClassId> = found.iter().map(|(id, _)| *id).collect();
        match distinct.len() {
            0 => TypeLookup::NotFound,
            1 => {
                if !self.defs.is_library(ctx) {
                    let mut used = self.used_on_demand.borrow_mut();
                    for (_, package) in &found {
                        used.insert((*package).clone());
                    }
                }
                TypeLookup::Found(found[0].0)
            }
            _ => TypeLookup::Ambiguous(distinct.into_iter().collect()),
        }
    }

    pub fn resolve_simple(
        &self,
        ctx: ClassId,
        name: &Name,
        range: Span,
    ) -> Result<ClassId, SemanticError> {
        self.lookup_simple(ctx, name, range)?
            .ok_or_else(|| SemanticError::TypeNotFound {
                name: name.to_string(),
                at: self.location(ctx, range),
            })
    }

    /// Resolve a simple or qualified type name as written in `ctx`.
    ///
    /// No proper prefix of a qualified name may itself be a type: the first
    /// segment is looked up like a simple name, longer prefixes as fully
    /// qualified names.
    pub fn resolve_type_name(
        &self,
        ctx: ClassId,
        name: &QualifiedName,
        range: Span,
    ) -> Result<ClassId, SemanticError> {
        let Some(first) = name.first() else {
            return Err(SemanticError::TypeNotFound {
                name: String::new(),
                at: self.location(ctx, range),
            });
        };
        if name.is_simple() {
            return self.resolve_simple(ctx, first, range);
        }

        for len in 1..name.len() {
            let prefix_is_type = if len == 1 {
                matches!(self.lookup_simple(ctx, first, range), Ok(Some(_)))
            } else {
                self.defs.lookup(&name.prefix(len)).is_some()
            };
            if prefix_is_type {
                return Err(SemanticError::PrefixResolvesToType {
                    prefix: name.prefix(len).to_dotted(),
                    name: name.to_dotted(),
                    at: self.location(ctx, range),
                });
            }
        }

        self.defs
            .lookup(name)
            .ok_or_else(|| SemanticError::TypeNotFound {
                name: name.to_dotted(),
                at: self.location(ctx, range),
            })
    }

    pub fn resolve_type(&self, ctx: ClassId, ty: &TypeSyntax) -> Result<Type, SemanticError> {
        match ty {
            TypeSyntax::Primitive(p) => Ok(Type::Primitive(*p)),
            TypeSyntax::Named(r) => Ok(Type::Class(self.resolve_type_name(ctx, &r.name, r.range)?)),
            TypeSyntax::Array(elem) => Ok(Type::array(self.resolve_type(ctx, elem)?)),
        }
    }
}
