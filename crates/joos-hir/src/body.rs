use std::fmt;

use joos_core::{Name, QualifiedName, Span};
use serde::{Deserialize, Serialize};

use crate::item::{TypeRef, TypeSyntax};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExprId(u32);

impl ExprId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        ExprId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StmtId(u32);

impl StmtId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        StmtId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StmtId({})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<T> {
    data: Vec<T>,
}

impl<T> Arena<T> {
    pub fn alloc(&mut self, value: T) -> u32 {
        let idx = self.data.len() as u32;
        self.data.push(value);
        idx
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.data.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (i as u32, v))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena { data: Vec::new() }
    }
}

/// Statements and expressions of every body in one type declaration.
///
/// Field initializers, method bodies and constructor bodies all allocate into
/// the same arena; declarations refer to their root node by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyArena {
    pub stmts: Arena<Stmt>,
    pub exprs: Arena<Expr>,
}

impl BodyArena {
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        StmtId::from_raw(self.stmts.alloc(stmt))
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        ExprId::from_raw(self.exprs.alloc(expr))
    }

    /// Panics if `id` was not allocated in this arena.
    #[must_use]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts.data[id.idx()]
    }

    /// Panics if `id` was not allocated in this arena.
    #[must_use]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs.data[id.idx()]
    }

    /// Whether every id reachable from the arena's nodes is in bounds.
    ///
    /// Deserialized input is not trusted; the analyzer validates arenas up
    /// front so that later stages may index freely.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let stmt_ok = |id: &StmtId| id.idx() < self.stmts.len();
        let expr_ok = |id: &ExprId| id.idx() < self.exprs.len();
        let stmts = self.stmts.data.iter().all(|stmt| {
            let mut children_ok = true;
            let mut exprs_ok = true;
            stmt.for_each_child(
                |child| children_ok &= stmt_ok(&child),
                |expr| exprs_ok &= expr_ok(&expr),
            );
            children_ok && exprs_ok
        });
        let exprs = self.exprs.data.iter().all(|expr| {
            let mut ok = true;
            expr.for_each_child(|child| ok &= expr_ok(&child));
            ok
        });
        stmts && exprs
    }

    /// Whether the nodes reachable from the given roots form disjoint trees.
    ///
    /// A node reached twice, through a cycle or a shared child, makes the
    /// arena unusable for the recursive walks of later stages. Assumes
    /// [`BodyArena::is_well_formed`] holds.
    #[must_use]
    pub fn forms_trees(
        &self,
        stmt_roots: impl IntoIterator<Item = StmtId>,
        expr_roots: impl IntoIterator<Item = ExprId>,
    ) -> bool {
        let mut seen_stmts = vec![false; self.stmts.len()];
        let mut seen_exprs = vec![false; self.exprs.len()];
        let mut stmt_stack: Vec<StmtId> = stmt_roots.into_iter().collect();
        let mut expr_stack: Vec<ExprId> = expr_roots.into_iter().collect();
        let mut ok = true;

        while ok {
            if let Some(id) = stmt_stack.pop() {
                ok = !std::mem::replace(&mut seen_stmts[id.idx()], true);
                self.stmt(id)
                    .for_each_child(|child| stmt_stack.push(child), |expr| expr_stack.push(expr));
            } else if let Some(id) = expr_stack.pop() {
                ok = !std::mem::replace(&mut seen_exprs[id.idx()], true);
                self.expr(id).for_each_child(|child| expr_stack.push(child));
            } else {
                break;
            }
        }
        ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorCallKind {
    This,
    Super,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    Block {
        stmts: Vec<StmtId>,
        #[serde(default)]
        range: Span,
    },
    Local {
        ty: TypeSyntax,
        name: Name,
        initializer: Option<ExprId>,
        #[serde(default)]
        range: Span,
    },
    Expr {
        expr: ExprId,
        #[serde(default)]
        range: Span,
    },
    If {
        condition: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
        #[serde(default)]
        range: Span,
    },
    While {
        condition: ExprId,
        body: StmtId,
        #[serde(default)]
        range: Span,
    },
    For {
        init: Option<StmtId>,
        condition: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
        #[serde(default)]
        range: Span,
    },
    Return {
        value: Option<ExprId>,
        #[serde(default)]
        range: Span,
    },
    Throw {
        expr: ExprId,
        #[serde(default)]
        range: Span,
    },
    Break {
        #[serde(default)]
        range: Span,
    },
    Empty {
        #[serde(default)]
        range: Span,
    },
    /// `this(...)` or `super(...)`.
    ConstructorCall {
        call: ConstructorCallKind,
        args: Vec<ExprId>,
        #[serde(default)]
        range: Span,
    },
}

impl Stmt {
    #[must_use]
    pub fn range(&self) -> Span {
        match self {
            Stmt::Block { range, .. }
            | Stmt::Local { range, .. }
            | Stmt::Expr { range, .. }
            | Stmt::If { range, .. }
            | Stmt::While { range, .. }
            | Stmt::For { range, .. }
            | Stmt::Return { range, .. }
            | Stmt::Throw { range, .. }
            | Stmt::Break { range }
            | Stmt::Empty { range }
            | Stmt::ConstructorCall { range, .. } => *range,
        }
    }

    /// Visit direct child statements and expressions.
    pub fn for_each_child(&self, mut on_stmt: impl FnMut(StmtId), mut on_expr: impl FnMut(ExprId)) {
        match self {
            Stmt::Block { stmts, .. } => stmts.iter().copied().for_each(on_stmt),
            Stmt::Local { initializer, .. } => initializer.iter().copied().for_each(on_expr),
            Stmt::Expr { expr, .. } | Stmt::Throw { expr, .. } => on_expr(*expr),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                on_expr(*condition);
                on_stmt(*then_branch);
                else_branch.iter().copied().for_each(on_stmt);
            }
            Stmt::While {
                condition, body, ..
            } => {
                on_expr(*condition);
                on_stmt(*body);
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                init.iter().copied().for_each(&mut on_stmt);
                condition.iter().copied().for_each(&mut on_expr);
                update.iter().copied().for_each(&mut on_expr);
                on_stmt(*body);
            }
            Stmt::Return { value, .. } => value.iter().copied().for_each(on_expr),
            Stmt::ConstructorCall { args, .. } => args.iter().copied().for_each(on_expr),
            Stmt::Break { .. } | Stmt::Empty { .. } => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Int(i32),
    Bool(bool),
    Char(char),
    String(String),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    /// Short-circuit `&&`.
    And,
    /// Short-circuit `||`.
    Or,
    /// Eager `&`.
    BitAnd,
    /// Eager `|`.
    BitOr,
}

impl BinaryOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncDecOp {
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Literal {
        value: Literal,
        #[serde(default)]
        range: Span,
    },
    /// A possibly qualified name whose meaning (local, field, type or
    /// package) is decided by the type checker.
    Name {
        path: QualifiedName,
        #[serde(default)]
        range: Span,
    },
    This {
        #[serde(default)]
        range: Span,
    },
    FieldAccess {
        receiver: ExprId,
        name: Name,
        #[serde(default)]
        range: Span,
    },
    MethodCall {
        receiver: Option<ExprId>,
        name: Name,
        args: Vec<ExprId>,
        #[serde(default)]
        range: Span,
    },
    New {
        ty: TypeRef,
        args: Vec<ExprId>,
        #[serde(default)]
        range: Span,
    },
    /// `new T[d1]...[dn]`; `element` is the non-array base type.
    NewArray {
        element: TypeSyntax,
        dims: Vec<ExprId>,
        #[serde(default)]
        range: Span,
    },
    ArrayAccess {
        array: ExprId,
        index: ExprId,
        #[serde(default)]
        range: Span,
    },
    Cast {
        ty: TypeSyntax,
        expr: ExprId,
        #[serde(default)]
        range: Span,
    },
    InstanceOf {
        expr: ExprId,
        ty: TypeSyntax,
        #[serde(default)]
        range: Span,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        #[serde(default)]
        range: Span,
    },
    Unary {
        op: UnaryOp,
        expr: ExprId,
        #[serde(default)]
        range: Span,
    },
    IncDec {
        op: IncDecOp,
        expr: ExprId,
        #[serde(default)]
        range: Span,
    },
    Assign {
        lhs: ExprId,
        rhs: ExprId,
        #[serde(default)]
        range: Span,
    },
}

impl Expr {
    #[must_use]
    pub fn range(&self) -> Span {
        match self {
            Expr::Literal { range, .. }
            | Expr::Name { range, .. }
            | Expr::This { range }
            | Expr::FieldAccess { range, .. }
            | Expr::MethodCall { range, .. }
            | Expr::New { range, .. }
            | Expr::NewArray { range, .. }
            | Expr::ArrayAccess { range, .. }
            | Expr::Cast { range, .. }
            | Expr::InstanceOf { range, .. }
            | Expr::Binary { range, .. }
            | Expr::Unary { range, .. }
            | Expr::IncDec { range, .. }
            | Expr::Assign { range, .. } => *range,
        }
    }

    pub fn for_each_child(&self, mut f: impl FnMut(ExprId)) {
        match self {
            Expr::Literal { .. } | Expr::Name { .. } | Expr::This { .. } => {}
            Expr::FieldAccess { receiver, .. } => f(*receiver),
            Expr::MethodCall { receiver, args, .. } => {
                receiver.iter().copied().for_each(&mut f);
                args.iter().copied().for_each(f);
            }
            Expr::New { args, .. } => args.iter().copied().for_each(f),
            Expr::NewArray { dims, .. } => dims.iter().copied().for_each(f),
            Expr::ArrayAccess { array, index, .. } => {
                f(*array);
                f(*index);
            }
            Expr::Cast { expr, .. }
            | Expr::InstanceOf { expr, .. }
            | Expr::Unary { expr, .. }
            | Expr::IncDec { expr, .. } => f(*expr),
            Expr::Binary { lhs, rhs, .. } | Expr::Assign { lhs, rhs, .. } => {
                f(*lhs);
                f(*rhs);
            }
        }
    }
}
