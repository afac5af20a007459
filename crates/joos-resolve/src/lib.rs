//! Symbol table construction and name/type linking.
//!
//! [`DefMap`] indexes every declared type; [`Linker`] resolves the type names
//! written in a unit using the enclosing type, single-type imports, the unit's
//! package and on-demand imports, in that order. [`link`] runs both and lowers
//! the result into a [`joos_types::TypeStore`].

mod def_map;
mod import_map;
mod linker;
mod lower;
mod packages;

pub use crate::def_map::DefMap;
pub use crate::import_map::{ImportMap, OnDemandImport, SingleImport};
pub use crate::linker::{Linker, TypeLookup};
pub use crate::lower::lower_program;
pub use crate::packages::{check_package_clashes, referenced_packages};

use joos_core::SemanticError;
use joos_types::TypeStore;

/// Output of the linking stage.
#[derive(Debug)]
pub struct LinkedProgram<'a> {
    pub linker: Linker<'a>,
    pub store: TypeStore,
}

impl<'a> LinkedProgram<'a> {
    #[must_use]
    pub fn defs(&self) -> &DefMap<'a> {
        self.linker.defs()
    }
}

/// Link every unit of `defs` and build the type universe.
pub fn link(defs: DefMap<'_>) -> Result<LinkedProgram<'_>, SemanticError> {
    let linker = Linker::new(defs);
    let store = lower_program(&linker)?;
    check_package_clashes(&linker)?;
    Ok(LinkedProgram { linker, store })
}
