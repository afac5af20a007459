use joos_core::{Location, SemanticError};
use joos_hir::{BodyArena, Stmt, StmtId};

use crate::constant::{fold, Constant};

/// How control can leave a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The statement can complete normally.
    pub normal: bool,
    /// A reachable `break` leaves the statement towards an enclosing loop.
    pub breaks: bool,
}

impl Completion {
    pub const NORMAL: Completion = Completion {
        normal: true,
        breaks: false,
    };
    pub const ABRUPT: Completion = Completion {
        normal: false,
        breaks: false,
    };
}

/// Walks one body and reports the first statement that cannot be reached.
pub(crate) struct Reachability<'a> {
    bodies: &'a BodyArena,
    /// Owner of the body; every error is reported at this location.
    location: Location,
}

impl<'a> Reachability<'a> {
    pub(crate) fn new(bodies: &'a BodyArena, location: Location) -> Self {
        Self { bodies, location }
    }

    fn unreachable(&self, stmt: StmtId) -> SemanticError {
        SemanticError::UnreachableStatement {
            at: self.location.clone().at(self.bodies.stmt(stmt).range()),
        }
    }

    pub(crate) fn check(&self, stmt: StmtId) -> Result<Completion, SemanticError> {
        let completion = match self.bodies.stmt(stmt) {
            Stmt::Block { stmts, .. } => {
                let mut completion = Completion::NORMAL;
                for &next in stmts {
                    if !completion.normal {
                        return Err(self.unreachable(next));
                    }
                    let next = self.check(next)?;
                    completion = Completion {
                        normal: next.normal,
                        breaks: completion.breaks || next.breaks,
                    };
                }
                completion
            }
            Stmt::Local { .. }
            | Stmt::Expr { .. }
            | Stmt::Empty { .. }
            | Stmt::ConstructorCall { .. } => Completion::NORMAL,
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                let then_branch = self.check(*then_branch)?;
                match else_branch {
                    None => Completion {
                        normal: true,
                        breaks: then_branch.breaks,
                    },
                    Some(else_branch) => {
                        let else_branch = self.check(*else_branch)?;
                        Completion {
                            normal: then_branch.normal || else_branch.normal,
                            breaks: then_branch.breaks || else_branch.breaks,
                        }
                    }
                }
            }
            Stmt::While {
                condition, body, ..
            } => self.check_loop(fold(self.bodies, *condition), *body)?,
            Stmt::For {
                init,
                condition,
                body,
                ..
            } => {
                if let Some(init) = init {
                    self.check(*init)?;
                }
                let condition = match condition {
                    Some(condition) => fold(self.bodies, *condition),
                    None => Some(Constant::Bool(true)),
                };
                self.check_loop(condition, *body)?
            }
            Stmt::Return { .. } | Stmt::Throw { .. } => Completion::ABRUPT,
            Stmt::Break { .. } => Completion {
                normal: false,
                breaks: true,
            },
        };
        Ok(completion)
    }

    /// A loop consumes the breaks of its body.
    fn check_loop(
        &self,
        condition: Option<Constant>,
        body: StmtId,
    ) -> Result<Completion, SemanticError> {
        match condition {
            Some(Constant::Bool(false)) => Err(self.unreachable(body)),
            Some(Constant::Bool(true)) => {
                let body = self.check(body)?;
                Ok(Completion {
                    normal: body.breaks,
                    breaks: false,
                })
            }
            _ => {
                self.check(body)?;
                Ok(Completion::NORMAL)
            }
        }
    }
}
