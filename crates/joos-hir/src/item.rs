use joos_core::{Modifiers, Name, PackageName, PrimitiveType, QualifiedName, Span};
use serde::{Deserialize, Serialize};

use crate::body::{BodyArena, ExprId, StmtId};

/// Every compilation unit handed to the analyzer. Library units are added
/// separately by the driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub units: Vec<CompilationUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Path of the source file, only used for reporting.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub package: Option<PackageName>,
    #[serde(default)]
    pub imports: Vec<ImportDecl>,
    pub decl: TypeDecl,
}

impl CompilationUnit {
    /// Fully qualified name of the unit's type declaration.
    #[must_use]
    pub fn type_name(&self) -> QualifiedName {
        match &self.package {
            Some(package) => package.child(&self.decl.name),
            None => QualifiedName::from(self.decl.name.clone()),
        }
    }

    /// The package clause, with the default package as the empty name.
    #[must_use]
    pub fn package_name(&self) -> PackageName {
        self.package.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportDecl {
    /// `import a.b.C;`
    Single {
        path: QualifiedName,
        #[serde(default)]
        range: Span,
    },
    /// `import a.b.*;`
    OnDemand {
        package: PackageName,
        #[serde(default)]
        range: Span,
    },
}

impl ImportDecl {
    #[must_use]
    pub fn range(&self) -> Span {
        match self {
            ImportDecl::Single { range, .. } | ImportDecl::OnDemand { range, .. } => *range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
}

/// A reference to a class or interface as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: QualifiedName,
    #[serde(default)]
    pub range: Span,
}

impl TypeRef {
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        Self {
            name: name.into(),
            range: Span::default(),
        }
    }
}

/// A type as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSyntax {
    Primitive(PrimitiveType),
    Named(TypeRef),
    Array(Box<TypeSyntax>),
}

impl TypeSyntax {
    #[must_use]
    pub fn range(&self) -> Span {
        match self {
            TypeSyntax::Primitive(_) => Span::default(),
            TypeSyntax::Named(r) => r.range,
            TypeSyntax::Array(elem) => elem.range(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: Name,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub superclass: Option<TypeRef>,
    /// `implements` for classes, `extends` for interfaces.
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub bodies: BodyArena,
    #[serde(default)]
    pub range: Span,
}

impl TypeDecl {
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Whether the body arena and every member's root id are consistent, and
    /// each member body is a tree of its own.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let stmts = self.bodies.stmts.len();
        let exprs = self.bodies.exprs.len();
        self.bodies.is_well_formed()
            && self
                .fields
                .iter()
                .filter_map(|f| f.initializer)
                .all(|e| e.idx() < exprs)
            && self.constructors.iter().all(|c| c.body.idx() < stmts)
            && self
                .methods
                .iter()
                .filter_map(|m| m.body)
                .all(|s| s.idx() < stmts)
            && self.bodies.forms_trees(
                self.constructors
                    .iter()
                    .map(|c| c.body)
                    .chain(self.methods.iter().filter_map(|m| m.body)),
                self.fields.iter().filter_map(|f| f.initializer),
            )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    #[serde(default)]
    pub modifiers: Modifiers,
    pub ty: TypeSyntax,
    pub name: Name,
    #[serde(default)]
    pub initializer: Option<ExprId>,
    #[serde(default)]
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub ty: TypeSyntax,
    pub name: Name,
    #[serde(default)]
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    #[serde(default)]
    pub modifiers: Modifiers,
    /// `None` for `void`.
    #[serde(default)]
    pub return_type: Option<TypeSyntax>,
    pub name: Name,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub throws: Vec<TypeRef>,
    /// Root block; absent for abstract and native methods.
    #[serde(default)]
    pub body: Option<StmtId>,
    #[serde(default)]
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub throws: Vec<TypeRef>,
    /// Root block.
    pub body: StmtId,
    #[serde(default)]
    pub range: Span,
}
