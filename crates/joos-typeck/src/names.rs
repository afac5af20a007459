use joos_core::{Name, QualifiedName, SemanticError, Span};
use joos_hir::{Expr, ExprId};
use joos_types::{ClassId, FieldRef, Type, TypeEnv};

use crate::body::BodyChecker;
use crate::scope::LocalId;
use crate::Resolution;

/// What a (prefix of a) name denotes.
#[derive(Debug, Clone)]
pub(crate) enum NameMeaning {
    Value(Type, ValueKind),
    Type(ClassId),
    Package(QualifiedName),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueKind {
    Local(LocalId),
    Field(FieldRef),
    ArrayLength,
}

impl ValueKind {
    pub(crate) fn resolution(self) -> Resolution {
        match self {
            ValueKind::Local(local) => Resolution::Local(local),
            ValueKind::Field(field) => Resolution::Field(field),
            ValueKind::ArrayLength => Resolution::ArrayLength,
        }
    }
}

/// The left side of `.` in a field access or method call.
#[derive(Debug, Clone)]
pub(crate) enum Receiver {
    Type(ClassId),
    Value(Type),
}

impl<'a, 'p> BodyChecker<'a, 'p> {
    /// Classify `path` left to right: the first segment as a local, a field
    /// of the enclosing type, a type, or else a package; every later segment
    /// as a field of what precedes it, or a type or subpackage of a package.
    pub(crate) fn classify_name(
        &mut self,
        path: &QualifiedName,
        range: Span,
    ) -> Result<NameMeaning, SemanticError> {
        let Some((first, rest)) = path.segments().split_first() else {
            return Err(SemanticError::UnresolvedName {
                name: String::new(),
                at: self.at(range),
            });
        };

        let mut meaning = self.classify_simple(first, range)?;
        for segment in rest {
            meaning = match meaning {
                NameMeaning::Value(ty, _) => {
                    let (ty, kind) = self.instance_field(&ty, segment, range)?;
                    NameMeaning::Value(ty, kind)
                }
                NameMeaning::Type(class) => {
                    let (ty, kind) = self.static_field(class, segment, range)?;
                    NameMeaning::Value(ty, kind)
                }
                NameMeaning::Package(package) => {
                    let name = package.child(segment);
                    match self.cx.linker.defs().lookup(&name) {
                        Some(class) => NameMeaning::Type(class),
                        None => NameMeaning::Package(name),
                    }
                }
            };
        }
        Ok(meaning)
    }

    fn classify_simple(&mut self, name: &Name, range: Span) -> Result<NameMeaning, SemanticError> {
        if let Some(local) = self.scopes.lookup(&self.results.locals, name.as_str()) {
            let ty = self.results.locals[local.idx()].ty.clone();
            return Ok(NameMeaning::Value(ty, ValueKind::Local(local)));
        }

        let store = self.store();
        if let Some(field) = self.cx.hierarchy.members(self.cx.class).field(name.as_str()) {
            let def = field.def(store);
            if !def.modifiers.is_static() {
                self.require_this(range)?;
            }
            return Ok(NameMeaning::Value(def.ty.clone(), ValueKind::Field(field)));
        }

        if let Some(class) = self.cx.linker.lookup_simple(self.cx.class, name, range)? {
            return Ok(NameMeaning::Type(class));
        }
        Ok(NameMeaning::Package(QualifiedName::from(name.clone())))
    }

    /// `receiver.name` where the receiver is a value of type `ty`.
    pub(crate) fn instance_field(
        &self,
        ty: &Type,
        name: &Name,
        range: Span,
    ) -> Result<(Type, ValueKind), SemanticError> {
        let store = self.store();
        match ty {
            Type::Array(_) if *name == "length" => Ok((Type::INT, ValueKind::ArrayLength)),
            Type::Class(class) => {
                let field = self.field_of(*class, name, range)?;
                let def = field.def(store);
                if def.modifiers.is_static() {
                    return Err(SemanticError::IllegalStaticAccess {
                        member: def.name.to_string(),
                        at: self.at(range),
                    });
                }
                Ok((def.ty.clone(), ValueKind::Field(field)))
            }
            _ => Err(SemanticError::UnresolvedName {
                name: format!("{}.{name}", self.display(ty)),
                at: self.at(range),
            }),
        }
    }

    /// `Type.name`.
    pub(crate) fn static_field(
        &self,
        class: ClassId,
        name: &Name,
        range: Span,
    ) -> Result<(Type, ValueKind), SemanticError> {
        let field = self.field_of(class, name, range)?;
        let def = field.def(self.store());
        if !def.modifiers.is_static() {
            return Err(SemanticError::IllegalStaticAccess {
                member: def.name.to_string(),
                at: self.at(range),
            });
        }
        Ok((def.ty.clone(), ValueKind::Field(field)))
    }

    fn field_of(&self, class: ClassId, name: &Name, range: Span) -> Result<FieldRef, SemanticError> {
        self.cx
            .hierarchy
            .members(class)
            .field(name.as_str())
            .ok_or_else(|| SemanticError::UnresolvedName {
                name: format!("{}.{name}", self.store().class(class).name.to_dotted()),
                at: self.at(range),
            })
    }

    /// A name in expression position must denote a variable.
    pub(crate) fn infer_name(
        &mut self,
        expr: ExprId,
        path: &QualifiedName,
        range: Span,
    ) -> Result<Type, SemanticError> {
        match self.classify_name(path, range)? {
            NameMeaning::Value(ty, kind) => {
                self.record_resolution(expr, kind.resolution());
                Ok(ty)
            }
            NameMeaning::Type(_) | NameMeaning::Package(_) => Err(SemanticError::UnresolvedName {
                name: path.to_dotted(),
                at: self.at(range),
            }),
        }
    }

    /// Like [`Self::infer_expr`], but a name may also denote a type.
    pub(crate) fn infer_receiver(&mut self, expr: ExprId) -> Result<Receiver, SemanticError> {
        let Expr::Name { path, range } = self.expr(expr) else {
            return Ok(Receiver::Value(self.infer_expr(expr)?));
        };
        match self.classify_name(path, *range)? {
            NameMeaning::Type(class) => {
                self.record_resolution(expr, Resolution::Type(class));
                Ok(Receiver::Type(class))
            }
            NameMeaning::Value(ty, kind) => {
                self.record_resolution(expr, kind.resolution());
                self.record(expr, &ty);
                Ok(Receiver::Value(ty))
            }
            NameMeaning::Package(package) => Err(SemanticError::UnresolvedName {
                name: package.to_dotted(),
                at: self.at(*range),
            }),
        }
    }

    /// `receiver.name` in expression position.
    pub(crate) fn infer_field_access(
        &mut self,
        expr: ExprId,
        receiver: ExprId,
        name: &Name,
        range: Span,
    ) -> Result<(Type, ValueKind), SemanticError> {
        let (ty, kind) = match self.infer_receiver(receiver)? {
            Receiver::Type(class) => self.static_field(class, name, range)?,
            Receiver::Value(ty) => self.instance_field(&ty, name, range)?,
        };
        self.record_resolution(expr, kind.resolution());
        Ok((ty, kind))
    }

    /// The type of an assignment target, which must be a variable that may
    /// be written.
    pub(crate) fn infer_lvalue(&mut self, expr: ExprId) -> Result<Type, SemanticError> {
        let kind = match self.expr(expr) {
            Expr::Name { path, range } => match self.classify_name(path, *range)? {
                NameMeaning::Value(ty, kind) => {
                    self.record_resolution(expr, kind.resolution());
                    Some((ty, kind, *range))
                }
                NameMeaning::Type(_) => {
                    return Err(SemanticError::NotLvalue { at: self.at(*range) })
                }
                NameMeaning::Package(_) => {
                    return Err(SemanticError::UnresolvedName {
                        name: path.to_dotted(),
                        at: self.at(*range),
                    })
                }
            },
            Expr::FieldAccess {
                receiver,
                name,
                range,
            } => {
                let (ty, kind) = self.infer_field_access(expr, *receiver, name, *range)?;
                Some((ty, kind, *range))
            }
            Expr::ArrayAccess { .. } => None,
            other => return Err(SemanticError::NotLvalue { at: self.at(other.range()) }),
        };

        let Some((ty, kind, range)) = kind else {
            return self.infer_expr(expr);
        };
        match kind {
            ValueKind::ArrayLength => {
                return Err(SemanticError::AssignToFinalField {
                    field: "length".to_string(),
                    at: self.at(range),
                })
            }
            ValueKind::Field(field) => {
                let def = field.def(self.store());
                if def.modifiers.is_final() {
                    return Err(SemanticError::AssignToFinalField {
                        field: def.name.to_string(),
                        at: self.at(range),
                    });
                }
            }
            ValueKind::Local(_) => {}
        }
        self.record(expr, &ty);
        Ok(ty)
    }
}
