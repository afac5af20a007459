use joos_core::{Name, SemanticError, Span};
use joos_hir::{BinaryOp, Expr, ExprId, Literal, TypeRef, UnaryOp};
use joos_types::{display_signature, is_castable, Type, TypeEnv};

use crate::body::BodyChecker;
use crate::names::Receiver;
use crate::Resolution;

/// How a method was named at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    /// `m(...)`, with an implicit `this` for instance methods.
    Unqualified,
    /// `Type.m(...)`.
    Static,
    /// `expr.m(...)`.
    Instance,
}

impl<'a, 'p> BodyChecker<'a, 'p> {
    pub(crate) fn infer_expr(&mut self, id: ExprId) -> Result<Type, SemanticError> {
        let ty = self.infer_expr_inner(id)?;
        self.record(id, &ty);
        Ok(ty)
    }

    pub(crate) fn infer_args(&mut self, args: &[ExprId]) -> Result<Vec<Type>, SemanticError> {
        args.iter().map(|arg| self.infer_expr(*arg)).collect()
    }

    fn infer_expr_inner(&mut self, id: ExprId) -> Result<Type, SemanticError> {
        let store = self.store();
        match self.expr(id) {
            Expr::Literal { value, .. } => Ok(match value {
                Literal::Int(_) => Type::INT,
                Literal::Bool(_) => Type::BOOLEAN,
                Literal::Char(_) => Type::CHAR,
                Literal::String(_) => Type::Class(store.well_known().string),
                Literal::Null => Type::Null,
            }),
            Expr::Name { path, range } => self.infer_name(id, path, *range),
            Expr::This { range } => {
                self.require_this(*range)?;
                Ok(Type::Class(self.cx.class))
            }
            Expr::FieldAccess {
                receiver,
                name,
                range,
            } => Ok(self.infer_field_access(id, *receiver, name, *range)?.0),
            Expr::MethodCall {
                receiver,
                name,
                args,
                range,
            } => self.infer_call(id, *receiver, name, args, *range),
            Expr::New { ty, args, range } => self.infer_new_expr(id, ty, args, *range),
            Expr::NewArray { element, dims, .. } => {
                let mut ty = self.cx.linker.resolve_type(self.cx.class, element)?;
                for dim in dims {
                    let found = self.infer_expr(*dim)?;
                    self.require_numeric(&found, self.expr(*dim).range())?;
                    ty = Type::array(ty);
                }
                Ok(ty)
            }
            Expr::ArrayAccess { array, index, range } => {
                let array_ty = self.infer_expr(*array)?;
                let index_ty = self.infer_expr(*index)?;
                let Some(element) = array_ty.element() else {
                    return Err(SemanticError::TypeMismatch {
                        expected: "an array".to_string(),
                        found: self.display(&array_ty),
                        at: self.at(*range),
                    });
                };
                self.require_numeric(&index_ty, self.expr(*index).range())?;
                Ok(element.clone())
            }
            Expr::Cast { ty, expr, range } => {
                let target = self.cx.linker.resolve_type(self.cx.class, ty)?;
                let found = self.infer_expr(*expr)?;
                if !is_castable(store, &found, &target) {
                    return Err(SemanticError::InvalidCast {
                        from: self.display(&found),
                        to: self.display(&target),
                        at: self.at(*range),
                    });
                }
                Ok(target)
            }
            Expr::InstanceOf { expr, ty, range } => {
                let found = self.infer_expr(*expr)?;
                let target = self.cx.linker.resolve_type(self.cx.class, ty)?;
                if !found.is_reference()
                    || !target.is_reference()
                    || !is_castable(store, &found, &target)
                {
                    return Err(SemanticError::InvalidCast {
                        from: self.display(&found),
                        to: self.display(&target),
                        at: self.at(*range),
                    });
                }
                Ok(Type::BOOLEAN)
            }
            Expr::Binary {
                op,
                lhs,
                rhs,
                range,
            } => {
                let lhs = self.infer_expr(*lhs)?;
                let rhs = self.infer_expr(*rhs)?;
                self.infer_binary(*op, &lhs, &rhs, *range)
            }
            Expr::Unary { op, expr, range } => {
                let found = self.infer_expr(*expr)?;
                match op {
                    UnaryOp::Neg => {
                        self.require_numeric(&found, *range)?;
                        Ok(Type::INT)
                    }
                    UnaryOp::Not => {
                        self.require_assignable(&found, &Type::BOOLEAN, *range)?;
                        Ok(Type::BOOLEAN)
                    }
                }
            }
            Expr::IncDec { expr, range, .. } => {
                let found = self.infer_lvalue(*expr)?;
                if !found.is_numeric() {
                    return Err(SemanticError::NonNumericIncDec {
                        found: self.display(&found),
                        at: self.at(*range),
                    });
                }
                Ok(found)
            }
            Expr::Assign { lhs, rhs, .. } => {
                let target = self.infer_lvalue(*lhs)?;
                let found = self.infer_expr(*rhs)?;
                self.require_assignable(&found, &target, self.expr(*rhs).range())?;
                Ok(target)
            }
        }
    }

    fn require_numeric(&self, found: &Type, range: Span) -> Result<(), SemanticError> {
        if found.is_numeric() {
            return Ok(());
        }
        Err(SemanticError::TypeMismatch {
            expected: "int".to_string(),
            found: self.display(found),
            at: self.at(range),
        })
    }

    fn infer_call(
        &mut self,
        id: ExprId,
        receiver: Option<ExprId>,
        name: &Name,
        args: &[ExprId],
        range: Span,
    ) -> Result<Type, SemanticError> {
        let store = self.store();
        let (class, kind) = match receiver {
            None => (self.cx.class, CallKind::Unqualified),
            Some(receiver) => match self.infer_receiver(receiver)? {
                Receiver::Type(class) => (class, CallKind::Static),
                Receiver::Value(Type::Class(class)) => (class, CallKind::Instance),
                // Arrays have the members of Object.
                Receiver::Value(Type::Array(_)) => (store.well_known().object, CallKind::Instance),
                Receiver::Value(other) => {
                    return Err(SemanticError::TypeMismatch {
                        expected: "a reference type".to_string(),
                        found: self.display(&other),
                        at: self.at(range),
                    })
                }
            },
        };

        let arg_types = self.infer_args(args)?;
        let method = self.resolve_method(class, name.as_str(), &arg_types, range)?;
        let def = method.def(store);
        let illegal_static = || SemanticError::IllegalStaticAccess {
            member: display_signature(store, def.name.as_str(), &def.params),
            at: self.at(range),
        };
        match kind {
            CallKind::Unqualified if !def.is_static() => self.require_this(range)?,
            CallKind::Static if !def.is_static() => return Err(illegal_static()),
            CallKind::Instance if def.is_static() => return Err(illegal_static()),
            _ => {}
        }
        self.check_throws(&def.throws, range)?;
        self.record_resolution(id, Resolution::Method(method));
        Ok(def.return_type.clone())
    }

    fn infer_new_expr(
        &mut self,
        id: ExprId,
        ty: &TypeRef,
        args: &[ExprId],
        range: Span,
    ) -> Result<Type, SemanticError> {
        let store = self.store();
        let class = self
            .cx
            .linker
            .resolve_type_name(self.cx.class, &ty.name, ty.range)?;
        let def = store.class(class);
        if def.is_abstract() {
            return Err(SemanticError::InstantiateAbstract {
                ty: def.name.to_dotted(),
                at: self.at(range),
            });
        }
        let arg_types = self.infer_args(args)?;
        let ctor = self.resolve_constructor(class, &arg_types, range)?;
        self.check_throws(&ctor.def(store).throws, range)?;
        self.record_resolution(id, Resolution::Constructor(ctor));
        Ok(Type::Class(class))
    }

    fn infer_binary(
        &self,
        op: BinaryOp,
        lhs: &Type,
        rhs: &Type,
        range: Span,
    ) -> Result<Type, SemanticError> {
        let store = self.store();
        let string = Type::Class(store.well_known().string);
        let result = match op {
            BinaryOp::Add if *lhs == string || *rhs == string => {
                (*lhs != Type::Void && *rhs != Type::Void).then(|| string.clone())
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                (lhs.is_numeric() && rhs.is_numeric()).then_some(Type::INT)
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                (lhs.is_numeric() && rhs.is_numeric()).then_some(Type::BOOLEAN)
            }
            BinaryOp::Eq | BinaryOp::Ne => {
                let comparable = (lhs.is_numeric() && rhs.is_numeric())
                    || (lhs.is_boolean() && rhs.is_boolean())
                    || (lhs.is_reference()
                        && rhs.is_reference()
                        && (is_castable(store, lhs, rhs) || is_castable(store, rhs, lhs)));
                comparable.then_some(Type::BOOLEAN)
            }
            BinaryOp::And | BinaryOp::Or | BinaryOp::BitAnd | BinaryOp::BitOr => {
                (lhs.is_boolean() && rhs.is_boolean()).then_some(Type::BOOLEAN)
            }
        };
        result.ok_or_else(|| SemanticError::TypeMismatch {
            expected: format!("operands of `{}`", op.symbol()),
            found: format!("{}, {}", self.display(lhs), self.display(rhs)),
            at: self.at(range),
        })
    }
}
