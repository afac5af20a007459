use std::collections::{BTreeMap, HashMap, HashSet};

use joos_core::{Location, Name, PackageName, QualifiedName, SemanticError};
use joos_hir::CompilationUnit;
use joos_types::ClassId;

/// The global symbol table: every declared type by fully qualified name and
/// every package by the simple names declared directly in it.
///
/// Program units come first, so a [`ClassId`] below [`DefMap::program_len`]
/// always denotes a program type.
#[derive(Debug, Clone)]
pub struct DefMap<'a> {
    units: Vec<&'a CompilationUnit>,
    program_len: usize,
    by_name: HashMap<QualifiedName, ClassId>,
    packages: HashMap<PackageName, BTreeMap<Name, ClassId>>,
    /// Packages that contain a type directly or in a subpackage.
    nonempty_packages: HashSet<PackageName>,
}

impl<'a> DefMap<'a> {
    pub fn new(
        program: &'a [CompilationUnit],
        library: &'a [CompilationUnit],
    ) -> Result<Self, SemanticError> {
        let mut map = DefMap {
            units: Vec::with_capacity(program.len() + library.len()),
            program_len: program.len(),
            by_name: HashMap::new(),
            packages: HashMap::new(),
            nonempty_packages: HashSet::new(),
        };

        for unit in program.iter().chain(library) {
            let id = ClassId::new(map.units.len() as u32);
            let name = unit.type_name();
            if map.by_name.contains_key(&name) {
                return Err(SemanticError::DuplicateType {
                    name: name.to_dotted(),
                    at: Location::in_type(name.to_dotted()).at(unit.decl.range),
                });
            }
            map.by_name.insert(name, id);

            let package = unit.package_name();
            for len in 0..=package.len() {
                map.nonempty_packages.insert(package.prefix(len));
            }
            map.packages
                .entry(package)
                .or_default()
                .insert(unit.decl.name.clone(), id);
            map.units.push(unit);
        }

        tracing::debug!(
            types = map.units.len(),
            packages = map.packages.len(),
            "symbol table built"
        );
        Ok(map)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn program_len(&self) -> usize {
        self.program_len
    }

    #[must_use]
    pub fn is_library(&self, id: ClassId) -> bool {
        id.idx() >= self.program_len
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.units.len()).map(|idx| ClassId::new(idx as u32))
    }

    pub fn program_ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.program_len).map(|idx| ClassId::new(idx as u32))
    }

    #[must_use]
    pub fn unit(&self, id: ClassId) -> &'a CompilationUnit {
        self.units[id.idx()]
    }

    #[must_use]
    pub fn lookup(&self, name: &QualifiedName) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Types declared directly in `package`.
    #[must_use]
    pub fn package_types(&self, package: &PackageName) -> Option<&BTreeMap<Name, ClassId>> {
        self.packages.get(package)
    }

    /// A package exists when it or one of its subpackages declares a type.
    #[must_use]
    pub fn package_exists(&self, package: &PackageName) -> bool {
        self.nonempty_packages.contains(package)
    }
}
