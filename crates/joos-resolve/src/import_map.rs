use joos_core::{Name, PackageName, QualifiedName, Span};
use joos_hir::{CompilationUnit, ImportDecl};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMap {
    pub single: Vec<SingleImport>,
    /// Explicit on-demand imports in source order, followed by the implicit
    /// `java.lang.*`.
    pub on_demand: Vec<OnDemandImport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleImport {
    pub path: QualifiedName,
    pub imported: Name,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnDemandImport {
    pub package: PackageName,
    pub range: Span,
    pub implicit: bool,
}

impl ImportMap {
    #[must_use]
    pub fn from_unit(unit: &CompilationUnit) -> Self {
        let mut out = ImportMap::default();
        for import in &unit.imports {
            match import {
                ImportDecl::Single { path, range } => {
                    let Some(imported) = path.last().cloned() else {
                        continue;
                    };
                    out.single.push(SingleImport {
                        path: path.clone(),
                        imported,
                        range: *range,
                    });
                }
                ImportDecl::OnDemand { package, range } => {
                    out.on_demand.push(OnDemandImport {
                        package: package.clone(),
                        range: *range,
                        implicit: false,
                    });
                }
            }
        }
        out.on_demand.push(OnDemandImport {
            package: QualifiedName::from_dotted("java.lang"),
            range: Span::default(),
            implicit: true,
        });
        out
    }

    pub fn explicit_on_demand(&self) -> impl Iterator<Item = &OnDemandImport> {
        self.on_demand.iter().filter(|i| !i.implicit)
    }
}
