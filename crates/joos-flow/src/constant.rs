use joos_hir::{BinaryOp, BodyArena, Expr, ExprId, Literal, UnaryOp};

/// Value of a constant expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Int(i32),
    Bool(bool),
}

/// Fold `expr` if it is built only from literals and operators. Integer
/// arithmetic wraps; division by zero is not constant.
#[must_use]
pub fn fold(bodies: &BodyArena, expr: ExprId) -> Option<Constant> {
    match bodies.expr(expr) {
        Expr::Literal { value, .. } => match value {
            Literal::Int(v) => Some(Constant::Int(*v)),
            Literal::Bool(b) => Some(Constant::Bool(*b)),
            Literal::Char(c) => Some(Constant::Int(*c as u32 as i32)),
            Literal::String(_) | Literal::Null => None,
        },
        Expr::Unary { op, expr, .. } => match (op, fold(bodies, *expr)?) {
            (UnaryOp::Neg, Constant::Int(v)) => Some(Constant::Int(v.wrapping_neg())),
            (UnaryOp::Not, Constant::Bool(b)) => Some(Constant::Bool(!b)),
            _ => None,
        },
        Expr::Binary { op, lhs, rhs, .. } => {
            let lhs = fold(bodies, *lhs)?;
            let rhs = fold(bodies, *rhs)?;
            match (lhs, rhs) {
                (Constant::Int(a), Constant::Int(b)) => fold_int(*op, a, b),
                (Constant::Bool(a), Constant::Bool(b)) => fold_bool(*op, a, b),
                _ => None,
            }
        }
        _ => None,
    }
}

fn fold_int(op: BinaryOp, a: i32, b: i32) -> Option<Constant> {
    let value = match op {
        BinaryOp::Add => Constant::Int(a.wrapping_add(b)),
        BinaryOp::Sub => Constant::Int(a.wrapping_sub(b)),
        BinaryOp::Mul => Constant::Int(a.wrapping_mul(b)),
        BinaryOp::Div if b == -1 => Constant::Int(a.wrapping_neg()),
        BinaryOp::Rem if b == -1 => Constant::Int(0),
        BinaryOp::Div => Constant::Int(a.checked_div(b)?),
        BinaryOp::Rem => Constant::Int(a.checked_rem(b)?),
        BinaryOp::Lt => Constant::Bool(a < b),
        BinaryOp::Le => Constant::Bool(a <= b),
        BinaryOp::Gt => Constant::Bool(a > b),
        BinaryOp::Ge => Constant::Bool(a >= b),
        BinaryOp::Eq => Constant::Bool(a == b),
        BinaryOp::Ne => Constant::Bool(a != b),
        BinaryOp::And | BinaryOp::Or | BinaryOp::BitAnd | BinaryOp::BitOr => return None,
    };
    Some(value)
}

fn fold_bool(op: BinaryOp, a: bool, b: bool) -> Option<Constant> {
    let value = match op {
        BinaryOp::And | BinaryOp::BitAnd => a && b,
        BinaryOp::Or | BinaryOp::BitOr => a || b,
        BinaryOp::Eq => a == b,
        BinaryOp::Ne => a != b,
        _ => return None,
    };
    Some(Constant::Bool(value))
}

#[cfg(test)]
mod tests {
    use joos_hir::builder::{expr, stmt, CtorSpec, ExprTree, TypeBuilder, UnitBuilder};
    use joos_hir::Stmt;

    use super::*;

    /// Fold the expression of `while (cond) ;` inside a constructor body.
    fn fold_condition(cond: ExprTree) -> Option<Constant> {
        let unit = UnitBuilder::new()
            .decl(
                TypeBuilder::class("A")
                    .constructor(CtorSpec::new().body(vec![stmt::while_loop(cond, stmt::empty())])),
            )
            .build();
        let bodies = &unit.decl.bodies;
        let condition = bodies
            .stmts
            .iter()
            .find_map(|(_, s)| match s {
                Stmt::While { condition, .. } => Some(*condition),
                _ => None,
            })
            .expect("while statement");
        fold(bodies, condition)
    }

    #[test]
    fn folds_literals_and_operators() {
        assert_eq!(fold_condition(expr::boolean(true)), Some(Constant::Bool(true)));
        assert_eq!(
            fold_condition(expr::lt(expr::int(1), expr::add(expr::int(1), expr::int(1)))),
            Some(Constant::Bool(true))
        );
        assert_eq!(
            fold_condition(expr::not(expr::eq(expr::character('a'), expr::int(97)))),
            Some(Constant::Bool(false))
        );
        assert_eq!(
            fold_condition(expr::binary(BinaryOp::Or, expr::boolean(false), expr::boolean(true))),
            Some(Constant::Bool(true))
        );
    }

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(
            fold_condition(expr::eq(
                expr::add(expr::int(i32::MAX), expr::int(1)),
                expr::int(i32::MIN)
            )),
            Some(Constant::Bool(true))
        );
        assert_eq!(
            fold_condition(expr::eq(
                expr::binary(BinaryOp::Div, expr::int(i32::MIN), expr::int(-1)),
                expr::int(i32::MIN)
            )),
            Some(Constant::Bool(true))
        );
    }

    #[test]
    fn non_constant_operands_do_not_fold() {
        assert_eq!(fold_condition(expr::lt(expr::name("x"), expr::int(1))), None);
        assert_eq!(
            fold_condition(expr::eq(
                expr::binary(BinaryOp::Div, expr::int(1), expr::int(0)),
                expr::int(0)
            )),
            None
        );
        assert_eq!(fold_condition(expr::eq(expr::null(), expr::null())), None);
    }
}
