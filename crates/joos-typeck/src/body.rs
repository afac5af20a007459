use std::collections::BTreeMap;

use joos_core::{Location, SemanticError, Span};
use joos_hierarchy::Hierarchy;
use joos_hir::{ConstructorCallKind, Expr, ExprId, Param, Stmt, StmtId, TypeDecl};
use joos_resolve::Linker;
use joos_types::{
    display_signature, display_type, display_types, is_assignable, is_checked_exception,
    is_subclass, select_overload, ClassId, ConstructorRef, FieldRef, MethodRef,
    MethodResolution, Type, TypeEnv, TypeStore,
};

use crate::scope::{Local, Scopes};
use crate::{BodyOwner, ClassResults, Resolution};

/// Everything a body check needs to know about its enclosing type.
#[derive(Clone, Copy)]
pub(crate) struct ClassContext<'a, 'p> {
    pub(crate) linker: &'a Linker<'p>,
    pub(crate) store: &'a TypeStore,
    pub(crate) hierarchy: &'a Hierarchy,
    pub(crate) class: ClassId,
    pub(crate) decl: &'a TypeDecl,
}

pub(crate) struct BodyChecker<'a, 'p> {
    pub(crate) cx: ClassContext<'a, 'p>,
    owner: BodyOwner,
    /// Rendering of the owning member for error locations.
    member: String,
    pub(crate) is_static: bool,
    /// Set while checking the arguments of `this(...)`/`super(...)`.
    pub(crate) this_forbidden: bool,
    expected_return: Type,
    throws: Vec<ClassId>,
    pub(crate) scopes: Scopes,
    pub(crate) results: &'a mut ClassResults,
    constructor_targets: &'a mut BTreeMap<ConstructorRef, ConstructorRef>,
}

impl<'a, 'p> BodyChecker<'a, 'p> {
    pub(crate) fn new(
        cx: ClassContext<'a, 'p>,
        owner: BodyOwner,
        results: &'a mut ClassResults,
        constructor_targets: &'a mut BTreeMap<ConstructorRef, ConstructorRef>,
    ) -> Self {
        let store = cx.store;
        let (member, is_static, expected_return, throws) = match owner {
            BodyOwner::Field(field) => {
                let def = field.def(store);
                (def.name.to_string(), def.modifiers.is_static(), Type::Void, Vec::new())
            }
            BodyOwner::Method(method) => {
                let def = method.def(store);
                (
                    display_signature(store, def.name.as_str(), &def.params),
                    def.is_static(),
                    def.return_type.clone(),
                    def.throws.clone(),
                )
            }
            BodyOwner::Constructor(ctor) => {
                let def = ctor.def(store);
                (
                    display_signature(store, store.class(cx.class).simple_name(), &def.params),
                    false,
                    Type::Void,
                    def.throws.clone(),
                )
            }
        };
        Self {
            cx,
            owner,
            member,
            is_static,
            this_forbidden: false,
            expected_return,
            throws,
            scopes: Scopes::default(),
            results,
            constructor_targets,
        }
    }

    pub(crate) fn check(mut self) -> Result<(), SemanticError> {
        match self.owner {
            BodyOwner::Field(field) => self.check_field_initializer(field),
            BodyOwner::Method(method) => self.check_method(method),
            BodyOwner::Constructor(ctor) => self.check_constructor(ctor),
        }
    }

    pub(crate) fn store(&self) -> &'a TypeStore {
        self.cx.store
    }

    pub(crate) fn expr(&self, id: ExprId) -> &'a Expr {
        self.cx.decl.bodies.expr(id)
    }

    fn stmt(&self, id: StmtId) -> &'a Stmt {
        self.cx.decl.bodies.stmt(id)
    }

    pub(crate) fn at(&self, range: Span) -> Location {
        Location::in_type(self.store().class(self.cx.class).name.to_dotted())
            .member(self.member.clone())
            .at(range)
    }

    pub(crate) fn display(&self, ty: &Type) -> String {
        display_type(self.store(), ty)
    }

    pub(crate) fn record(&mut self, expr: ExprId, ty: &Type) {
        self.results.expr_types.insert(expr, ty.clone());
    }

    pub(crate) fn record_resolution(&mut self, expr: ExprId, resolution: Resolution) {
        self.results.resolutions.insert(expr, resolution);
    }

    fn check_field_initializer(&mut self, field: FieldRef) -> Result<(), SemanticError> {
        let type_decl = self.cx.decl;
        let Some(init) = type_decl.fields[field.index].initializer else {
            return Ok(());
        };
        let expected = field.def(self.store()).ty.clone();
        let found = self.infer_expr(init)?;
        self.require_assignable(&found, &expected, self.expr(init).range())
    }

    fn check_method(&mut self, method: MethodRef) -> Result<(), SemanticError> {
        let type_decl = self.cx.decl;
        let decl = &type_decl.methods[method.index];
        let Some(body) = decl.body else {
            return Ok(());
        };
        let params = method.def(self.store()).params.clone();
        self.scopes.push();
        self.declare_params(&decl.params, &params)?;
        self.check_stmt(body)
    }

    fn check_constructor(&mut self, ctor: ConstructorRef) -> Result<(), SemanticError> {
        let def = ctor.def(self.store());
        if def.is_default {
            return self.check_super_invocation(&[], def.span);
        }
        let type_decl = self.cx.decl;
        let decl = &type_decl.constructors[ctor.index];
        let params = def.params.clone();
        self.scopes.push();
        self.declare_params(&decl.params, &params)?;

        let stmts: &'a [StmtId] = match self.stmt(decl.body) {
            Stmt::Block { stmts, .. } => stmts,
            _ => std::slice::from_ref(&decl.body),
        };
        let explicit = stmts.first().and_then(|first| match self.stmt(*first) {
            Stmt::ConstructorCall { call, args, range } => Some((*call, args, *range)),
            _ => None,
        });
        let rest = match explicit {
            Some((call, args, range)) => {
                self.check_explicit_constructor_invocation(ctor, call, args, range)?;
                &stmts[1..]
            }
            None => {
                self.check_super_invocation(&[], self.stmt(decl.body).range())?;
                stmts
            }
        };

        self.scopes.push();
        for stmt in rest {
            self.check_stmt(*stmt)?;
        }
        self.scopes.pop();
        Ok(())
    }

    fn declare_params(&mut self, params: &[Param], types: &[Type]) -> Result<(), SemanticError> {
        for (param, ty) in params.iter().zip(types) {
            self.declare_local(param.name.clone(), ty.clone(), param.range, true)?;
        }
        Ok(())
    }

    fn declare_local(
        &mut self,
        name: joos_core::Name,
        ty: Type,
        span: Span,
        is_param: bool,
    ) -> Result<(), SemanticError> {
        let local = Local {
            name,
            ty,
            span,
            is_param,
        };
        let name = local.name.to_string();
        self.scopes
            .declare(&mut self.results.locals, local)
            .map(|_| ())
            .map_err(|_| SemanticError::DuplicateVariable {
                name,
                at: self.at(span),
            })
    }

    fn check_explicit_constructor_invocation(
        &mut self,
        ctor: ConstructorRef,
        call: ConstructorCallKind,
        args: &[ExprId],
        range: Span,
    ) -> Result<(), SemanticError> {
        match call {
            ConstructorCallKind::Super => self.check_super_invocation(args, range),
            ConstructorCallKind::This => {
                let arg_types = self.infer_constructor_args(args)?;
                let target = self.resolve_constructor(self.cx.class, &arg_types, range)?;
                self.check_throws(&target.def(self.store()).throws, range)?;
                self.constructor_targets.insert(ctor, target);
                Ok(())
            }
        }
    }

    /// `super(args)`, explicit or implicit.
    fn check_super_invocation(&mut self, args: &[ExprId], range: Span) -> Result<(), SemanticError> {
        let arg_types = self.infer_constructor_args(args)?;
        let Some(superclass) = self.store().class(self.cx.class).super_class else {
            if args.is_empty() {
                // java.lang.Object
                return Ok(());
            }
            return Err(SemanticError::NoMatchingMethod {
                name: "super".to_string(),
                args: display_types(self.store(), &arg_types),
                at: self.at(range),
            });
        };
        let target = self.resolve_constructor(superclass, &arg_types, range)?;
        self.check_throws(&target.def(self.store()).throws, range)
    }

    /// Arguments of an explicit constructor invocation may not use `this`.
    fn infer_constructor_args(&mut self, args: &[ExprId]) -> Result<Vec<Type>, SemanticError> {
        let saved = self.this_forbidden;
        self.this_forbidden = true;
        let types = self.infer_args(args);
        self.this_forbidden = saved;
        types
    }

    pub(crate) fn resolve_constructor(
        &self,
        class: ClassId,
        args: &[Type],
        range: Span,
    ) -> Result<ConstructorRef, SemanticError> {
        let store = self.store();
        let def = store.class(class);
        let candidates: Vec<(ConstructorRef, &[Type])> = def
            .constructors
            .iter()
            .enumerate()
            .map(|(index, c)| (ConstructorRef { owner: class, index }, c.params.as_slice()))
            .collect();
        match select_overload(store, &candidates, args) {
            MethodResolution::Found(ctor) => Ok(ctor),
            MethodResolution::NotFound => Err(SemanticError::NoMatchingMethod {
                name: def.simple_name().to_string(),
                args: display_types(store, args),
                at: self.at(range),
            }),
            MethodResolution::Ambiguous(_) => Err(SemanticError::AmbiguousOverload {
                name: def.simple_name().to_string(),
                args: display_types(store, args),
                at: self.at(range),
            }),
        }
    }

    pub(crate) fn resolve_method(
        &self,
        class: ClassId,
        name: &str,
        args: &[Type],
        range: Span,
    ) -> Result<MethodRef, SemanticError> {
        let store = self.store();
        let candidates: Vec<(MethodRef, &[Type])> = self
            .cx
            .hierarchy
            .methods_named(class, name)
            .map(|m| (m, m.def(store).params.as_slice()))
            .collect();
        match select_overload(store, &candidates, args) {
            MethodResolution::Found(method) => Ok(method),
            MethodResolution::NotFound => Err(SemanticError::NoMatchingMethod {
                name: name.to_string(),
                args: display_types(store, args),
                at: self.at(range),
            }),
            MethodResolution::Ambiguous(_) => Err(SemanticError::AmbiguousOverload {
                name: name.to_string(),
                args: display_types(store, args),
                at: self.at(range),
            }),
        }
    }

    /// Every checked exception in `thrown` must be covered by the enclosing
    /// throws clause.
    pub(crate) fn check_throws(&self, thrown: &[ClassId], range: Span) -> Result<(), SemanticError> {
        let store = self.store();
        for &exception in thrown {
            if !is_checked_exception(store, exception) {
                continue;
            }
            if !self.throws.iter().any(|&declared| is_subclass(store, exception, declared)) {
                return Err(SemanticError::UndeclaredCheckedException {
                    exception: store.class(exception).name.to_dotted(),
                    at: self.at(range),
                });
            }
        }
        Ok(())
    }

    /// `this` is needed, explicitly or through an unqualified instance member.
    pub(crate) fn require_this(&self, range: Span) -> Result<(), SemanticError> {
        if self.is_static || self.this_forbidden {
            return Err(SemanticError::IllegalThisReference { at: self.at(range) });
        }
        Ok(())
    }

    pub(crate) fn require_assignable(
        &self,
        found: &Type,
        expected: &Type,
        range: Span,
    ) -> Result<(), SemanticError> {
        if is_assignable(self.store(), found, expected) {
            return Ok(());
        }
        Err(SemanticError::TypeMismatch {
            expected: self.display(expected),
            found: self.display(found),
            at: self.at(range),
        })
    }

    fn require_boolean(&mut self, condition: ExprId) -> Result<(), SemanticError> {
        let found = self.infer_expr(condition)?;
        self.require_assignable(&found, &Type::BOOLEAN, self.expr(condition).range())
    }

    /// Check a nested statement in its own scope.
    fn check_scoped(&mut self, stmt: StmtId) -> Result<(), SemanticError> {
        self.scopes.push();
        let result = self.check_stmt(stmt);
        self.scopes.pop();
        result
    }

    fn check_stmt(&mut self, id: StmtId) -> Result<(), SemanticError> {
        match self.stmt(id) {
            Stmt::Block { stmts, .. } => {
                self.scopes.push();
                for stmt in stmts {
                    self.check_stmt(*stmt)?;
                }
                self.scopes.pop();
                Ok(())
            }
            Stmt::Local {
                ty,
                name,
                initializer,
                range,
            } => {
                let declared = self.cx.linker.resolve_type(self.cx.class, ty)?;
                if let Some(init) = initializer {
                    let found = self.infer_expr(*init)?;
                    self.require_assignable(&found, &declared, self.expr(*init).range())?;
                }
                self.declare_local(name.clone(), declared, *range, false)
            }
            Stmt::Expr { expr, .. } => self.infer_expr(*expr).map(|_| ()),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.require_boolean(*condition)?;
                self.check_scoped(*then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.check_scoped(*else_branch)?;
                }
                Ok(())
            }
            Stmt::While {
                condition, body, ..
            } => {
                self.require_boolean(*condition)?;
                self.check_scoped(*body)
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                self.scopes.push();
                let result = self.check_for(*init, *condition, *update, *body);
                self.scopes.pop();
                result
            }
            Stmt::Return { value, range } => self.check_return(*value, *range),
            Stmt::Throw { expr, range } => {
                let found = self.infer_expr(*expr)?;
                let throwable = self.store().well_known().throwable;
                match &found {
                    Type::Class(id) if is_subclass(self.store(), *id, throwable) => {
                        self.check_throws(&[*id], *range)
                    }
                    // `throw null` raises no checked exception.
                    Type::Null => Ok(()),
                    _ => Err(SemanticError::IllegalThrowType {
                        found: self.display(&found),
                        at: self.at(*range),
                    }),
                }
            }
            Stmt::Break { .. } | Stmt::Empty { .. } => Ok(()),
            Stmt::ConstructorCall { range, .. } => {
                Err(SemanticError::MisplacedConstructorInvocation { at: self.at(*range) })
            }
        }
    }

    fn check_for(
        &mut self,
        init: Option<StmtId>,
        condition: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    ) -> Result<(), SemanticError> {
        if let Some(init) = init {
            self.check_stmt(init)?;
        }
        if let Some(condition) = condition {
            self.require_boolean(condition)?;
        }
        if let Some(update) = update {
            self.infer_expr(update)?;
        }
        self.check_scoped(body)
    }

    fn check_return(&mut self, value: Option<ExprId>, range: Span) -> Result<(), SemanticError> {
        let expected = self.expected_return.clone();
        match (value, &expected) {
            (None, Type::Void) => Ok(()),
            (None, _) => Err(SemanticError::TypeMismatch {
                expected: self.display(&expected),
                found: "void".to_string(),
                at: self.at(range),
            }),
            (Some(value), Type::Void) => {
                let found = self.infer_expr(value)?;
                Err(SemanticError::TypeMismatch {
                    expected: "void".to_string(),
                    found: self.display(&found),
                    at: self.at(range),
                })
            }
            (Some(value), _) => {
                let found = self.infer_expr(value)?;
                self.require_assignable(&found, &expected, self.expr(value).range())
            }
        }
    }
}
