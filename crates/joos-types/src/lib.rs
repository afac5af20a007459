//! The Joos type universe.
//!
//! Class and interface signatures live in a [`TypeStore`] arena and are
//! addressed by [`ClassId`]. The store is written once (by the linker's
//! lowering pass) and read by every later stage. Subtyping, assignability,
//! castability and overload selection are free functions over [`TypeEnv`].

mod overload;
mod relations;

use std::collections::HashMap;
use std::fmt;

use joos_core::{Modifiers, Name, PrimitiveType, QualifiedName, Span};

pub use crate::overload::{select_overload, MethodResolution};
pub use crate::relations::{
    is_assignable, is_castable, is_checked_exception, is_subclass, supertypes,
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        ClassId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    Primitive(PrimitiveType),
    Class(ClassId),
    Array(Box<Type>),
    /// The type of the `null` literal.
    Null,
    /// Return type of `void` methods and of calls to them.
    Void,
}

impl Type {
    pub const INT: Type = Type::Primitive(PrimitiveType::Int);
    pub const BOOLEAN: Type = Type::Primitive(PrimitiveType::Boolean);
    pub const CHAR: Type = Type::Primitive(PrimitiveType::Char);

    #[must_use]
    pub fn array(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Primitive(p) if p.is_numeric())
    }

    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveType::Boolean))
    }

    /// Class, interface, array and null types.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Class(_) | Type::Array(_) | Type::Null)
    }

    #[must_use]
    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            Type::Class(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(elem) => Some(elem),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: Name,
    pub ty: Type,
    pub modifiers: Modifiers,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub name: Name,
    pub params: Vec<Type>,
    /// [`Type::Void`] for `void` methods.
    pub return_type: Type,
    pub throws: Vec<ClassId>,
    pub modifiers: Modifiers,
    pub span: Span,
}

impl MethodDef {
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract()
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDef {
    pub params: Vec<Type>,
    pub throws: Vec<ClassId>,
    pub modifiers: Modifiers,
    pub span: Span,
    /// Added because the class declares no constructor.
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: QualifiedName,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub super_class: Option<ClassId>,
    /// In declaration order, repeats included; the hierarchy checker reports
    /// them.
    pub interfaces: Vec<ClassId>,
    pub fields: Vec<FieldDef>,
    pub constructors: Vec<ConstructorDef>,
    pub methods: Vec<MethodDef>,
    pub span: Span,
}

impl ClassDef {
    /// An empty declaration, filled in by the lowering pass.
    #[must_use]
    pub fn skeleton(name: QualifiedName, kind: ClassKind, modifiers: Modifiers) -> Self {
        Self {
            name,
            kind,
            modifiers,
            super_class: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            span: Span::default(),
        }
    }

    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.is_interface() || self.modifiers.is_abstract()
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.modifiers.is_final()
    }

    /// Superclass followed by superinterfaces.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.super_class
            .into_iter()
            .chain(self.interfaces.iter().copied())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The simple name, as used for constructor signatures.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.last().map(|n| n.as_str()).unwrap_or_default()
    }
}

/// The `index`-th method declared by `owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodRef {
    pub owner: ClassId,
    pub index: usize,
}

impl MethodRef {
    #[must_use]
    pub fn def<'e>(self, env: &'e dyn TypeEnv) -> &'e MethodDef {
        &env.class(self.owner).methods[self.index]
    }
}

/// The `index`-th field declared by `owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldRef {
    pub owner: ClassId,
    pub index: usize,
}

impl FieldRef {
    #[must_use]
    pub fn def<'e>(self, env: &'e dyn TypeEnv) -> &'e FieldDef {
        &env.class(self.owner).fields[self.index]
    }
}

/// The `index`-th constructor of `owner`, the synthesized default one
/// included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstructorRef {
    pub owner: ClassId,
    pub index: usize,
}

impl ConstructorRef {
    #[must_use]
    pub fn def<'e>(self, env: &'e dyn TypeEnv) -> &'e ConstructorDef {
        &env.class(self.owner).constructors[self.index]
    }
}

/// Library types the typing rules refer to by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub throwable: ClassId,
    pub runtime_exception: ClassId,
    pub error: ClassId,
}

impl WellKnownTypes {
    pub const NAMES: [&'static str; 7] = [
        "java.lang.Object",
        "java.lang.String",
        "java.lang.Cloneable",
        "java.io.Serializable",
        "java.lang.Throwable",
        "java.lang.RuntimeException",
        "java.lang.Error",
    ];
}

pub trait TypeEnv {
    fn class(&self, id: ClassId) -> &ClassDef;
    fn lookup_class(&self, name: &QualifiedName) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;
}

#[derive(Debug, Clone)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    by_name: HashMap<QualifiedName, ClassId>,
    well_known: WellKnownTypes,
}

impl TypeStore {
    #[must_use]
    pub fn builder() -> TypeStoreBuilder {
        TypeStoreBuilder::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassDef)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(idx, def)| (ClassId::new(idx as u32), def))
    }

    /// Human readable rendering, with fully qualified class names.
    #[must_use]
    pub fn display(&self, ty: &Type) -> String {
        display_type(self, ty)
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.idx()]
    }

    fn lookup_class(&self, name: &QualifiedName) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

impl std::ops::Index<ClassId> for TypeStore {
    type Output = ClassDef;

    fn index(&self, index: ClassId) -> &Self::Output {
        &self.classes[index.idx()]
    }
}

/// Accumulates class definitions; [`TypeStoreBuilder::finish`] locates the
/// well-known library types.
#[derive(Debug, Default)]
pub struct TypeStoreBuilder {
    classes: Vec<ClassDef>,
    by_name: HashMap<QualifiedName, ClassId>,
}

impl TypeStoreBuilder {
    /// Ids are handed out densely in insertion order. A repeated name keeps
    /// the first id in the name index.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId::new(self.classes.len() as u32);
        self.by_name.entry(def.name.clone()).or_insert(id);
        self.classes.push(def);
        id
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassDef {
        &mut self.classes[id.idx()]
    }

    #[must_use]
    pub fn lookup_class(&self, name: &QualifiedName) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Fails with the name of the first missing well-known type.
    pub fn finish(self) -> Result<TypeStore, QualifiedName> {
        let lookup = |name: &str| {
            let name = QualifiedName::from_dotted(name);
            self.by_name.get(&name).copied().ok_or(name)
        };
        let [object, string, cloneable, serializable, throwable, runtime_exception, error] =
            WellKnownTypes::NAMES;
        let well_known = WellKnownTypes {
            object: lookup(object)?,
            string: lookup(string)?,
            cloneable: lookup(cloneable)?,
            serializable: lookup(serializable)?,
            throwable: lookup(throwable)?,
            runtime_exception: lookup(runtime_exception)?,
            error: lookup(error)?,
        };
        Ok(TypeStore {
            classes: self.classes,
            by_name: self.by_name,
            well_known,
        })
    }
}

pub fn display_type(env: &dyn TypeEnv, ty: &Type) -> String {
    match ty {
        Type::Primitive(p) => p.keyword().to_string(),
        Type::Class(id) => env.class(*id).name.to_dotted(),
        Type::Array(elem) => format!("{}[]", display_type(env, elem)),
        Type::Null => "null".to_string(),
        Type::Void => "void".to_string(),
    }
}

/// `name(T1, T2)` rendering used in diagnostics.
pub fn display_signature(env: &dyn TypeEnv, name: &str, params: &[Type]) -> String {
    format!("{name}({})", display_types(env, params))
}

pub fn display_types(env: &dyn TypeEnv, types: &[Type]) -> String {
    types
        .iter()
        .map(|t| display_type(env, t))
        .collect::<Vec<_>>()
        .join(", ")
}
