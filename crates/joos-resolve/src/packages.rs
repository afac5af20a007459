use std::collections::BTreeSet;

use joos_core::{Location, PackageName, SemanticError};

use crate::linker::Linker;

/// Packages the program refers to: package clauses of program units, the
/// packages of single-type imports and the packages of on-demand imports that
/// supplied a used type.
pub fn referenced_packages(linker: &Linker<'_>) -> BTreeSet<PackageName> {
    let defs = linker.defs();
    let mut packages = linker.used_on_demand_packages();
    for id in defs.program_ids() {
        packages.insert(defs.unit(id).package_name());
        for import in &linker.imports(id).single {
            packages.insert(import.path.parent());
        }
    }
    packages.remove(&PackageName::default());
    packages
}

/// No referenced package may have a prefix of two or more identifiers that
/// names a type.
pub fn check_package_clashes(linker: &Linker<'_>) -> Result<(), SemanticError> {
    let defs = linker.defs();
    for package in referenced_packages(linker) {
        for len in 2..=package.len() {
            let prefix = package.prefix(len);
            if let Some(id) = defs.lookup(&prefix) {
                let ty = defs.unit(id).type_name().to_dotted();
                return Err(SemanticError::PackageTypeClash {
                    package: package.to_dotted(),
                    at: Location::in_type(ty.clone()),
                    ty,
                });
            }
        }
    }
    Ok(())
}
