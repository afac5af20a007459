//! The abstract syntax the analyzer consumes.
//!
//! Parsing happens elsewhere; this crate only fixes the shape of a parsed
//! program. Every node is serde-serializable so that front ends written in
//! other tools can hand programs over as JSON.

mod body;
pub mod builder;
mod item;

pub use crate::body::{
    Arena, BinaryOp, BodyArena, ConstructorCallKind, Expr, ExprId, IncDecOp, Literal, Stmt,
    StmtId, UnaryOp,
};
pub use crate::item::{
    CompilationUnit, ConstructorDecl, FieldDecl, ImportDecl, MethodDecl, Param, Program,
    TypeDecl, TypeKind, TypeRef, TypeSyntax,
};
