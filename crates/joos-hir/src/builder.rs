//! A small DSL for writing programs by hand.
//!
//! Bodies are first written as owned trees ([`ExprTree`], [`StmtTree`]) and
//! lowered into the declaration's [`BodyArena`] when the type is built. Used
//! by the built-in library and by tests throughout the workspace.
//!
//! ```
//! use joos_hir::builder::{expr, stmt, ty, MethodSpec, TypeBuilder, UnitBuilder};
//!
//! let unit = UnitBuilder::new()
//!     .package("p")
//!     .decl(
//!         TypeBuilder::class("A").method(
//!             MethodSpec::new("m")
//!                 .returns(ty::int())
//!                 .body(vec![stmt::ret(expr::int(1))]),
//!         ),
//!     )
//!     .build();
//! assert_eq!(unit.type_name().to_dotted(), "p.A");
//! ```

use joos_core::{Modifiers, Name, QualifiedName, Span};

use crate::body::{
    BinaryOp, BodyArena, ConstructorCallKind, Expr, ExprId, IncDecOp, Literal, Stmt, StmtId,
    UnaryOp,
};
use crate::item::{
    CompilationUnit, ConstructorDecl, FieldDecl, ImportDecl, MethodDecl, Param, TypeDecl,
    TypeKind, TypeRef, TypeSyntax,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ExprTree {
    Literal(Literal),
    Name(QualifiedName),
    This,
    FieldAccess(Box<ExprTree>, Name),
    Call(Option<Box<ExprTree>>, Name, Vec<ExprTree>),
    New(TypeRef, Vec<ExprTree>),
    NewArray(TypeSyntax, Vec<ExprTree>),
    Index(Box<ExprTree>, Box<ExprTree>),
    Cast(TypeSyntax, Box<ExprTree>),
    InstanceOf(Box<ExprTree>, TypeSyntax),
    Binary(BinaryOp, Box<ExprTree>, Box<ExprTree>),
    Unary(UnaryOp, Box<ExprTree>),
    IncDec(IncDecOp, Box<ExprTree>),
    Assign(Box<ExprTree>, Box<ExprTree>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtTree {
    Block(Vec<StmtTree>),
    Local(TypeSyntax, Name, Option<ExprTree>),
    Expr(ExprTree),
    If(ExprTree, Box<StmtTree>, Option<Box<StmtTree>>),
    While(ExprTree, Box<StmtTree>),
    For(
        Option<Box<StmtTree>>,
        Option<ExprTree>,
        Option<ExprTree>,
        Box<StmtTree>,
    ),
    Return(Option<ExprTree>),
    Throw(ExprTree),
    Break,
    Empty,
    ConstructorCall(ConstructorCallKind, Vec<ExprTree>),
}

pub mod ty {
    use joos_core::PrimitiveType;

    use crate::item::{TypeRef, TypeSyntax};

    pub fn int() -> TypeSyntax {
        TypeSyntax::Primitive(PrimitiveType::Int)
    }

    pub fn boolean() -> TypeSyntax {
        TypeSyntax::Primitive(PrimitiveType::Boolean)
    }

    pub fn byte() -> TypeSyntax {
        TypeSyntax::Primitive(PrimitiveType::Byte)
    }

    pub fn short() -> TypeSyntax {
        TypeSyntax::Primitive(PrimitiveType::Short)
    }

    pub fn char() -> TypeSyntax {
        TypeSyntax::Primitive(PrimitiveType::Char)
    }

    /// A class or interface type, simple or dotted.
    pub fn named(name: &str) -> TypeSyntax {
        TypeSyntax::Named(TypeRef::new(name))
    }

    pub fn array(element: TypeSyntax) -> TypeSyntax {
        TypeSyntax::Array(Box::new(element))
    }
}

pub mod expr {
    use joos_core::QualifiedName;

    use super::ExprTree;
    use crate::body::{BinaryOp, IncDecOp, Literal, UnaryOp};
    use crate::item::{TypeRef, TypeSyntax};

    pub fn int(value: i32) -> ExprTree {
        ExprTree::Literal(Literal::Int(value))
    }

    pub fn boolean(value: bool) -> ExprTree {
        ExprTree::Literal(Literal::Bool(value))
    }

    pub fn character(value: char) -> ExprTree {
        ExprTree::Literal(Literal::Char(value))
    }

    pub fn string(value: &str) -> ExprTree {
        ExprTree::Literal(Literal::String(value.to_string()))
    }

    pub fn null() -> ExprTree {
        ExprTree::Literal(Literal::Null)
    }

    /// An ambiguous (possibly dotted) name.
    pub fn name(path: &str) -> ExprTree {
        ExprTree::Name(QualifiedName::from_dotted(path))
    }

    pub fn this() -> ExprTree {
        ExprTree::This
    }

    pub fn field(receiver: ExprTree, name: &str) -> ExprTree {
        ExprTree::FieldAccess(Box::new(receiver), name.into())
    }

    /// An unqualified call `name(args)`.
    pub fn call(name: &str, args: Vec<ExprTree>) -> ExprTree {
        ExprTree::Call(None, name.into(), args)
    }

    pub fn call_on(receiver: ExprTree, name: &str, args: Vec<ExprTree>) -> ExprTree {
        ExprTree::Call(Some(Box::new(receiver)), name.into(), args)
    }

    pub fn new_object(ty: &str, args: Vec<ExprTree>) -> ExprTree {
        ExprTree::New(TypeRef::new(ty), args)
    }

    pub fn new_array(element: TypeSyntax, dims: Vec<ExprTree>) -> ExprTree {
        ExprTree::NewArray(element, dims)
    }

    pub fn index(array: ExprTree, index: ExprTree) -> ExprTree {
        ExprTree::Index(Box::new(array), Box::new(index))
    }

    pub fn cast(ty: TypeSyntax, expr: ExprTree) -> ExprTree {
        ExprTree::Cast(ty, Box::new(expr))
    }

    pub fn instance_of(expr: ExprTree, ty: TypeSyntax) -> ExprTree {
        ExprTree::InstanceOf(Box::new(expr), ty)
    }

    pub fn binary(op: BinaryOp, lhs: ExprTree, rhs: ExprTree) -> ExprTree {
        ExprTree::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn add(lhs: ExprTree, rhs: ExprTree) -> ExprTree {
        binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn lt(lhs: ExprTree, rhs: ExprTree) -> ExprTree {
        binary(BinaryOp::Lt, lhs, rhs)
    }

    pub fn eq(lhs: ExprTree, rhs: ExprTree) -> ExprTree {
        binary(BinaryOp::Eq, lhs, rhs)
    }

    pub fn neg(expr: ExprTree) -> ExprTree {
        ExprTree::Unary(UnaryOp::Neg, Box::new(expr))
    }

    pub fn not(expr: ExprTree) -> ExprTree {
        ExprTree::Unary(UnaryOp::Not, Box::new(expr))
    }

    pub fn inc_dec(op: IncDecOp, expr: ExprTree) -> ExprTree {
        ExprTree::IncDec(op, Box::new(expr))
    }

    pub fn post_inc(expr: ExprTree) -> ExprTree {
        inc_dec(IncDecOp::PostInc, expr)
    }

    pub fn assign(lhs: ExprTree, rhs: ExprTree) -> ExprTree {
        ExprTree::Assign(Box::new(lhs), Box::new(rhs))
    }
}

pub mod stmt {
    use super::{ExprTree, StmtTree};
    use crate::body::ConstructorCallKind;
    use crate::item::TypeSyntax;

    pub fn block(stmts: Vec<StmtTree>) -> StmtTree {
        StmtTree::Block(stmts)
    }

    pub fn local(ty: TypeSyntax, name: &str, init: Option<ExprTree>) -> StmtTree {
        StmtTree::Local(ty, name.into(), init)
    }

    pub fn expr(expr: ExprTree) -> StmtTree {
        StmtTree::Expr(expr)
    }

    pub fn if_then(condition: ExprTree, then_branch: StmtTree) -> StmtTree {
        StmtTree::If(condition, Box::new(then_branch), None)
    }

    pub fn if_else(condition: ExprTree, then_branch: StmtTree, else_branch: StmtTree) -> StmtTree {
        StmtTree::If(
            condition,
            Box::new(then_branch),
            Some(Box::new(else_branch)),
        )
    }

    pub fn while_loop(condition: ExprTree, body: StmtTree) -> StmtTree {
        StmtTree::While(condition, Box::new(body))
    }

    pub fn for_loop(
        init: Option<StmtTree>,
        condition: Option<ExprTree>,
        update: Option<ExprTree>,
        body: StmtTree,
    ) -> StmtTree {
        StmtTree::For(init.map(Box::new), condition, update, Box::new(body))
    }

    pub fn ret(value: ExprTree) -> StmtTree {
        StmtTree::Return(Some(value))
    }

    pub fn ret_void() -> StmtTree {
        StmtTree::Return(None)
    }

    pub fn throw(expr: ExprTree) -> StmtTree {
        StmtTree::Throw(expr)
    }

    pub fn brk() -> StmtTree {
        StmtTree::Break
    }

    pub fn empty() -> StmtTree {
        StmtTree::Empty
    }

    pub fn this_call(args: Vec<ExprTree>) -> StmtTree {
        StmtTree::ConstructorCall(ConstructorCallKind::This, args)
    }

    pub fn super_call(args: Vec<ExprTree>) -> StmtTree {
        StmtTree::ConstructorCall(ConstructorCallKind::Super, args)
    }
}

fn lower_expr(arena: &mut BodyArena, tree: ExprTree) -> ExprId {
    let range = Span::default();
    let expr = match tree {
        ExprTree::Literal(value) => Expr::Literal { value, range },
        ExprTree::Name(path) => Expr::Name { path, range },
        ExprTree::This => Expr::This { range },
        ExprTree::FieldAccess(receiver, name) => Expr::FieldAccess {
            receiver: lower_expr(arena, *receiver),
            name,
            range,
        },
        ExprTree::Call(receiver, name, args) => {
            let receiver = receiver.map(|r| lower_expr(arena, *r));
            let args = lower_exprs(arena, args);
            Expr::MethodCall {
                receiver,
                name,
                args,
                range,
            }
        }
        ExprTree::New(ty, args) => Expr::New {
            ty,
            args: lower_exprs(arena, args),
            range,
        },
        ExprTree::NewArray(element, dims) => Expr::NewArray {
            element,
            dims: lower_exprs(arena, dims),
            range,
        },
        ExprTree::Index(array, index) => Expr::ArrayAccess {
            array: lower_expr(arena, *array),
            index: lower_expr(arena, *index),
            range,
        },
        ExprTree::Cast(ty, expr) => Expr::Cast {
            ty,
            expr: lower_expr(arena, *expr),
            range,
        },
        ExprTree::InstanceOf(expr, ty) => Expr::InstanceOf {
            expr: lower_expr(arena, *expr),
            ty,
            range,
        },
        ExprTree::Binary(op, lhs, rhs) => Expr::Binary {
            op,
            lhs: lower_expr(arena, *lhs),
            rhs: lower_expr(arena, *rhs),
            range,
        },
        ExprTree::Unary(op, expr) => Expr::Unary {
            op,
            expr: lower_expr(arena, *expr),
            range,
        },
        ExprTree::IncDec(op, expr) => Expr::IncDec {
            op,
            expr: lower_expr(arena, *expr),
            range,
        },
        ExprTree::Assign(lhs, rhs) => Expr::Assign {
            lhs: lower_expr(arena, *lhs),
            rhs: lower_expr(arena, *rhs),
            range,
        },
    };
    arena.alloc_expr(expr)
}

fn lower_exprs(arena: &mut BodyArena, trees: Vec<ExprTree>) -> Vec<ExprId> {
    trees.into_iter().map(|t| lower_expr(arena, t)).collect()
}

fn lower_stmt(arena: &mut BodyArena, tree: StmtTree) -> StmtId {
    let range = Span::default();
    let stmt = match tree {
        StmtTree::Block(stmts) => Stmt::Block {
            stmts: stmts.into_iter().map(|s| lower_stmt(arena, s)).collect(),
            range,
        },
        StmtTree::Local(ty, name, init) => Stmt::Local {
            ty,
            name,
            initializer: init.map(|e| lower_expr(arena, e)),
            range,
        },
        StmtTree::Expr(expr) => Stmt::Expr {
            expr: lower_expr(arena, expr),
            range,
        },
        StmtTree::If(condition, then_branch, else_branch) => {
            let condition = lower_expr(arena, condition);
            let then_branch = lower_stmt(arena, *then_branch);
            let else_branch = else_branch.map(|s| lower_stmt(arena, *s));
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                range,
            }
        }
        StmtTree::While(condition, body) => Stmt::While {
            condition: lower_expr(arena, condition),
            body: lower_stmt(arena, *body),
            range,
        },
        StmtTree::For(init, condition, update, body) => {
            let init = init.map(|s| lower_stmt(arena, *s));
            let condition = condition.map(|e| lower_expr(arena, e));
            let update = update.map(|e| lower_expr(arena, e));
            let body = lower_stmt(arena, *body);
            Stmt::For {
                init,
                condition,
                update,
                body,
                range,
            }
        }
        StmtTree::Return(value) => Stmt::Return {
            value: value.map(|e| lower_expr(arena, e)),
            range,
        },
        StmtTree::Throw(expr) => Stmt::Throw {
            expr: lower_expr(arena, expr),
            range,
        },
        StmtTree::Break => Stmt::Break { range },
        StmtTree::Empty => Stmt::Empty { range },
        StmtTree::ConstructorCall(call, args) => Stmt::ConstructorCall {
            call,
            args: lower_exprs(arena, args),
            range,
        },
    };
    arena.alloc_stmt(stmt)
}

fn params(specs: Vec<(TypeSyntax, Name)>) -> Vec<Param> {
    specs
        .into_iter()
        .map(|(ty, name)| Param {
            ty,
            name,
            range: Span::default(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    modifiers: Modifiers,
    ty: TypeSyntax,
    name: Name,
    initializer: Option<ExprTree>,
}

impl FieldSpec {
    /// A `public` field without initializer.
    pub fn new(ty: TypeSyntax, name: &str) -> Self {
        Self {
            modifiers: Modifiers::PUBLIC,
            ty,
            name: name.into(),
            initializer: None,
        }
    }

    /// Replace the modifier set.
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    pub fn init(mut self, initializer: ExprTree) -> Self {
        self.initializer = Some(initializer);
        self
    }
}

#[derive(Debug, Clone)]
pub struct MethodSpec {
    modifiers: Modifiers,
    return_type: Option<TypeSyntax>,
    name: Name,
    params: Vec<(TypeSyntax, Name)>,
    throws: Vec<TypeRef>,
    body: Option<Vec<StmtTree>>,
}

impl MethodSpec {
    /// A `public void` method without parameters or body.
    pub fn new(name: &str) -> Self {
        Self {
            modifiers: Modifiers::PUBLIC,
            return_type: None,
            name: name.into(),
            params: Vec::new(),
            throws: Vec::new(),
            body: None,
        }
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    pub fn returns(mut self, ty: TypeSyntax) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn param(mut self, ty: TypeSyntax, name: &str) -> Self {
        self.params.push((ty, name.into()));
        self
    }

    pub fn throws(mut self, ty: &str) -> Self {
        self.throws.push(TypeRef::new(ty));
        self
    }

    /// The statements of the root block.
    pub fn body(mut self, stmts: Vec<StmtTree>) -> Self {
        self.body = Some(stmts);
        self
    }
}

#[derive(Debug, Clone)]
pub struct CtorSpec {
    modifiers: Modifiers,
    params: Vec<(TypeSyntax, Name)>,
    throws: Vec<TypeRef>,
    body: Vec<StmtTree>,
}

impl Default for CtorSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl CtorSpec {
    /// A `public` constructor with an empty body.
    pub fn new() -> Self {
        Self {
            modifiers: Modifiers::PUBLIC,
            params: Vec::new(),
            throws: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn param(mut self, ty: TypeSyntax, name: &str) -> Self {
        self.params.push((ty, name.into()));
        self
    }

    pub fn throws(mut self, ty: &str) -> Self {
        self.throws.push(TypeRef::new(ty));
        self
    }

    pub fn body(mut self, stmts: Vec<StmtTree>) -> Self {
        self.body = stmts;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TypeBuilder {
    kind: TypeKind,
    name: Name,
    modifiers: Modifiers,
    superclass: Option<TypeRef>,
    interfaces: Vec<TypeRef>,
    fields: Vec<FieldSpec>,
    constructors: Vec<CtorSpec>,
    methods: Vec<MethodSpec>,
}

impl TypeBuilder {
    fn new(kind: TypeKind, name: &str) -> Self {
        Self {
            kind,
            name: name.into(),
            modifiers: Modifiers::PUBLIC,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// A `public` class.
    pub fn class(name: &str) -> Self {
        Self::new(TypeKind::Class, name)
    }

    /// A `public` interface.
    pub fn interface(name: &str) -> Self {
        Self::new(TypeKind::Interface, name)
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    pub fn extends(mut self, name: &str) -> Self {
        match self.kind {
            TypeKind::Class => self.superclass = Some(TypeRef::new(name)),
            TypeKind::Interface => self.interfaces.push(TypeRef::new(name)),
        }
        self
    }

    pub fn implements(mut self, name: &str) -> Self {
        self.interfaces.push(TypeRef::new(name));
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn constructor(mut self, ctor: CtorSpec) -> Self {
        self.constructors.push(ctor);
        self
    }

    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    pub fn build(self) -> TypeDecl {
        let mut bodies = BodyArena::default();
        let range = Span::default();

        let fields = self
            .fields
            .into_iter()
            .map(|f| FieldDecl {
                modifiers: f.modifiers,
                ty: f.ty,
                name: f.name,
                initializer: f.initializer.map(|e| lower_expr(&mut bodies, e)),
                range,
            })
            .collect();

        let constructors = self
            .constructors
            .into_iter()
            .map(|c| ConstructorDecl {
                modifiers: c.modifiers,
                params: params(c.params),
                throws: c.throws,
                body: lower_stmt(&mut bodies, StmtTree::Block(c.body)),
                range,
            })
            .collect();

        let methods = self
            .methods
            .into_iter()
            .map(|m| MethodDecl {
                modifiers: m.modifiers,
                return_type: m.return_type,
                name: m.name,
                params: params(m.params),
                throws: m.throws,
                body: m.body.map(|b| lower_stmt(&mut bodies, StmtTree::Block(b))),
                range,
            })
            .collect();

        TypeDecl {
            kind: self.kind,
            name: self.name,
            modifiers: self.modifiers,
            superclass: self.superclass,
            interfaces: self.interfaces,
            fields,
            constructors,
            methods,
            bodies,
            range,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnitBuilder {
    file: Option<String>,
    package: Option<QualifiedName>,
    imports: Vec<ImportDecl>,
}

impl UnitBuilder {
    /// A unit in the default package.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file: &str) -> Self {
        self.file = Some(file.to_string());
        self
    }

    pub fn package(mut self, package: &str) -> Self {
        self.package = Some(QualifiedName::from_dotted(package));
        self
    }

    /// `import a.b.C;`
    pub fn import(mut self, path: &str) -> Self {
        self.imports.push(ImportDecl::Single {
            path: QualifiedName::from_dotted(path),
            range: Span::default(),
        });
        self
    }

    /// `import a.b.*;`
    pub fn import_on_demand(mut self, package: &str) -> Self {
        self.imports.push(ImportDecl::OnDemand {
            package: QualifiedName::from_dotted(package),
            range: Span::default(),
        });
        self
    }

    pub fn decl(self, ty: TypeBuilder) -> UnitWithDecl {
        UnitWithDecl {
            unit: self,
            decl: ty.build(),
        }
    }
}

/// A [`UnitBuilder`] whose type declaration has been supplied.
#[derive(Debug, Clone)]
pub struct UnitWithDecl {
    unit: UnitBuilder,
    decl: TypeDecl,
}

impl UnitWithDecl {
    pub fn build(self) -> CompilationUnit {
        CompilationUnit {
            file: self.unit.file,
            package: self.unit.package,
            imports: self.unit.imports,
            decl: self.decl,
        }
    }
}
