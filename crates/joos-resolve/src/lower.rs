//! Lowering of linked declarations into the [`TypeStore`].

use joos_core::{Location, Modifiers, QualifiedName, SemanticError};
use joos_hir::{Expr, Stmt, TypeDecl, TypeKind};
use joos_types::{
    ClassDef, ClassId, ClassKind, ConstructorDef, FieldDef, MethodDef, Type, TypeStore,
};

use crate::linker::Linker;

/// Build the type universe from every unit known to `linker`.
///
/// Every syntactic type reference is resolved here, including those inside
/// method and constructor bodies, so that linking errors surface before any
/// later stage runs.
pub fn lower_program(linker: &Linker<'_>) -> Result<TypeStore, SemanticError> {
    let defs = linker.defs();
    let mut builder = TypeStore::builder();

    for id in defs.ids() {
        let unit = defs.unit(id);
        let kind = match unit.decl.kind {
            TypeKind::Class => ClassKind::Class,
            TypeKind::Interface => ClassKind::Interface,
        };
        let mut def = ClassDef::skeleton(unit.type_name(), kind, unit.decl.modifiers);
        def.span = unit.decl.range;
        let assigned = builder.add_class(def);
        debug_assert_eq!(assigned, id);
    }

    for id in defs.ids() {
        linker.check_imports(id)?;
    }

    let object_name = QualifiedName::from_dotted("java.lang.Object");
    for id in defs.ids() {
        let unit = defs.unit(id);
        let decl = &unit.decl;

        let super_class = match (&decl.kind, &decl.superclass) {
            (TypeKind::Interface, _) => None,
            (TypeKind::Class, Some(tref)) => {
                Some(linker.resolve_type_name(id, &tref.name, tref.range)?)
            }
            (TypeKind::Class, None) if unit.type_name() == object_name => None,
            (TypeKind::Class, None) => Some(defs.lookup(&object_name).ok_or_else(|| {
                SemanticError::TypeNotFound {
                    name: object_name.to_dotted(),
                    at: Location::in_type(unit.type_name().to_dotted()).at(decl.range),
                }
            })?),
        };
        let interfaces = decl
            .interfaces
            .iter()
            .map(|tref| linker.resolve_type_name(id, &tref.name, tref.range))
            .collect::<Result<Vec<_>, _>>()?;

        let fields = lower_fields(linker, id, decl)?;
        let methods = lower_methods(linker, id, decl)?;
        let constructors = lower_constructors(linker, id, decl)?;
        if !defs.is_library(id) {
            link_bodies(linker, id, decl)?;
        }

        let def = builder.class_mut(id);
        def.super_class = super_class;
        def.interfaces = interfaces;
        def.fields = fields;
        def.methods = methods;
        def.constructors = constructors;
    }

    let store = builder
        .finish()
        .map_err(|missing| SemanticError::TypeNotFound {
            name: missing.to_dotted(),
            at: Location::default(),
        })?;
    tracing::debug!(classes = store.len(), "type store lowered");
    Ok(store)
}

fn lower_fields(
    linker: &Linker<'_>,
    id: ClassId,
    decl: &TypeDecl,
) -> Result<Vec<FieldDef>, SemanticError> {
    decl.fields
        .iter()
        .map(|field| {
            Ok(FieldDef {
                name: field.name.clone(),
                ty: linker.resolve_type(id, &field.ty)?,
                modifiers: field.modifiers,
                span: field.range,
            })
        })
        .collect()
}

fn lower_methods(
    linker: &Linker<'_>,
    id: ClassId,
    decl: &TypeDecl,
) -> Result<Vec<MethodDef>, SemanticError> {
    decl.methods
        .iter()
        .map(|method| {
            let mut modifiers = method.modifiers;
            if decl.is_interface() {
                modifiers |= Modifiers::PUBLIC | Modifiers::ABSTRACT;
            }
            Ok(MethodDef {
                name: method.name.clone(),
                params: method
                    .params
                    .iter()
                    .map(|p| linker.resolve_type(id, &p.ty))
                    .collect::<Result<_, _>>()?,
                return_type: match &method.return_type {
                    Some(ty) => linker.resolve_type(id, ty)?,
                    None => Type::Void,
                },
                throws: method
                    .throws
                    .iter()
                    .map(|t| linker.resolve_type_name(id, &t.name, t.range))
                    .collect::<Result<_, _>>()?,
                modifiers,
                span: method.range,
            })
        })
        .collect()
}

fn lower_constructors(
    linker: &Linker<'_>,
    id: ClassId,
    decl: &TypeDecl,
) -> Result<Vec<ConstructorDef>, SemanticError> {
    if decl.is_interface() {
        return Ok(Vec::new());
    }
    if decl.constructors.is_empty() {
        return Ok(vec![ConstructorDef {
            params: Vec::new(),
            throws: Vec::new(),
            modifiers: Modifiers::PUBLIC,
            span: decl.range,
            is_default: true,
        }]);
    }
    decl.constructors
        .iter()
        .map(|ctor| {
            Ok(ConstructorDef {
                params: ctor
                    .params
                    .iter()
                    .map(|p| linker.resolve_type(id, &p.ty))
                    .collect::<Result<_, _>>()?,
                throws: ctor
                    .throws
                    .iter()
                    .map(|t| linker.resolve_type_name(id, &t.name, t.range))
                    .collect::<Result<_, _>>()?,
                modifiers: ctor.modifiers,
                span: ctor.range,
                is_default: false,
            })
        })
        .collect()
}

/// Resolve every type written inside bodies: local declarations, casts,
/// `instanceof` targets and creation expressions.
fn link_bodies(linker: &Linker<'_>, id: ClassId, decl: &TypeDecl) -> Result<(), SemanticError> {
    for (_, stmt) in decl.bodies.stmts.iter() {
        if let Stmt::Local { ty, .. } = stmt {
            linker.resolve_type(id, ty)?;
        }
    }
    for (_, expr) in decl.bodies.exprs.iter() {
        match expr {
            Expr::Cast { ty, .. } | Expr::InstanceOf { ty, .. } => {
                linker.resolve_type(id, ty)?;
            }
            Expr::NewArray { element, .. } => {
                linker.resolve_type(id, element)?;
            }
            Expr::New { ty, .. } => {
                linker.resolve_type_name(id, &ty.name, ty.range)?;
            }
            _ => {}
        }
    }
    Ok(())
}
