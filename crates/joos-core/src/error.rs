use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::Span;

/// The analysis stage a rule belongs to. Mirrors the grouping used by the
/// fixture corpus annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Environment,
    TypeLinking,
    Hierarchy,
    TypeChecking,
    Reachability,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Environment => "ENVIRONMENTS",
            Phase::TypeLinking => "TYPE_LINKING",
            Phase::Hierarchy => "HIERARCHY",
            Phase::TypeChecking => "TYPE_CHECKING",
            Phase::Reachability => "REACHABILITY",
        })
    }
}

/// Where an error was found: the owning type, the member inside it and the
/// span of the offending construct, as far as they are known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub ty: Option<String>,
    pub member: Option<String>,
    pub span: Option<Span>,
}

impl Location {
    #[must_use]
    pub fn in_type(ty: impl Into<String>) -> Self {
        Self {
            ty: Some(ty.into()),
            member: None,
            span: None,
        }
    }

    #[must_use]
    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ty.is_none() && self.member.is_none() && self.span.is_none() {
            return Ok(());
        }
        f.write_str(" (")?;
        match (&self.ty, &self.member) {
            (Some(ty), Some(member)) => write!(f, "in `{ty}.{member}`")?,
            (Some(ty), None) => write!(f, "in `{ty}`")?,
            (None, Some(member)) => write!(f, "in `{member}`")?,
            (None, None) => {}
        }
        if let Some(span) = self.span {
            if self.ty.is_some() || self.member.is_some() {
                f.write_str(" ")?;
            }
            write!(f, "at {}..{}", span.start, span.end)?;
        }
        f.write_str(")")
    }
}

/// Fieldless discriminant of [`SemanticError`], stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ErrorKind {
    DuplicateType,
    PackageTypeClash,
    DuplicateField,
    DuplicateVariable,
    AmbiguousImport,
    AmbiguousOnDemandImport,
    SingleTypeImportClash,
    PrefixResolvesToType,
    TypeNotFound,
    NonExistingPackage,
    CircularInheritance,
    RepeatedInterface,
    ExtendsNonClass,
    ExtendsFinalClass,
    ImplementsNonInterface,
    DuplicateMember,
    DifferentReturnType,
    ReplaceFinal,
    ProtectedReplacePublic,
    NonstaticReplaceStatic,
    StaticReplaceNonstatic,
    IllegalThrowsInReplace,
    ClassMustBeAbstract,
    TypeMismatch,
    AssignToFinalField,
    NoMatchingMethod,
    AmbiguousOverload,
    IllegalThisReference,
    MisplacedConstructorInvocation,
    CircularConstructorInvocation,
    IllegalThrowType,
    UndeclaredCheckedException,
    NotLvalue,
    NonNumericIncDec,
    UnresolvedName,
    InvalidCast,
    InstantiateAbstract,
    IllegalStaticAccess,
    UnreachableStatement,
    MissingReturn,
}

impl ErrorKind {
    /// Upper-snake code in the style of the corpus' expected-verdict
    /// annotations.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::DuplicateType => "DUPLICATE_TYPE",
            ErrorKind::PackageTypeClash => "PACKAGE_CLASH_WITH_TYPE",
            ErrorKind::DuplicateField => "DUPLICATE_FIELD",
            ErrorKind::DuplicateVariable => "DUPLICATE_VARIABLE",
            ErrorKind::AmbiguousImport => "TWO_SINGLE_TYPE_IMPORTS_CLASH",
            ErrorKind::AmbiguousOnDemandImport => "AMBIGUOUS_CLASS_NAME",
            ErrorKind::SingleTypeImportClash => "SINGLE_TYPE_IMPORT_CLASH_WITH_CLASS",
            ErrorKind::PrefixResolvesToType => "PREFIX_RESOLVES_TO_TYPE",
            ErrorKind::TypeNotFound => "UNRESOLVED_TYPE",
            ErrorKind::NonExistingPackage => "NON_EXISTING_PACKAGE",
            ErrorKind::CircularInheritance => "CIRCULAR_INHERITANCE",
            ErrorKind::RepeatedInterface => "REPEATED_INTERFACE",
            ErrorKind::ExtendsNonClass => "EXTENDS_NON_CLASS",
            ErrorKind::ExtendsFinalClass => "EXTENDS_FINAL_CLASS",
            ErrorKind::ImplementsNonInterface => "IMPLEMENTS_NON_INTERFACE",
            ErrorKind::DuplicateMember => "DUPLICATE_METHOD",
            ErrorKind::DifferentReturnType => "DIFFERENT_RETURN_TYPE",
            ErrorKind::ReplaceFinal => "REPLACE_FINAL",
            ErrorKind::ProtectedReplacePublic => "PROTECTED_REPLACE_PUBLIC",
            ErrorKind::NonstaticReplaceStatic => "NONSTATIC_REPLACE_STATIC",
            ErrorKind::StaticReplaceNonstatic => "STATIC_REPLACE_NONSTATIC",
            ErrorKind::IllegalThrowsInReplace => "ILLEGAL_THROWS_IN_REPLACE",
            ErrorKind::ClassMustBeAbstract => "CLASS_MUST_BE_ABSTRACT",
            ErrorKind::TypeMismatch => "ASSIGN_TYPE",
            ErrorKind::AssignToFinalField => "ASSIGN_TO_FINAL_FIELD",
            ErrorKind::NoMatchingMethod => "NO_MATCHING_METHOD_FOUND",
            ErrorKind::AmbiguousOverload => "AMBIGUOUS_OVERLOADING",
            ErrorKind::IllegalThisReference => "THIS_IN_STATIC_CONTEXT",
            ErrorKind::MisplacedConstructorInvocation => "MISPLACED_CONSTRUCTOR_INVOCATION",
            ErrorKind::CircularConstructorInvocation => "CIRCULAR_CONSTRUCTOR_INVOCATION",
            ErrorKind::IllegalThrowType => "ILLEGAL_THROW_TYPE",
            ErrorKind::UndeclaredCheckedException => "ILLEGAL_THROWS",
            ErrorKind::NotLvalue => "NOT_LVALUE",
            ErrorKind::NonNumericIncDec => "NON_NUMERIC_INC_DEC",
            ErrorKind::UnresolvedName => "VARIABLE_OR_TYPE_NOT_FOUND",
            ErrorKind::InvalidCast => "INVALID_CAST",
            ErrorKind::InstantiateAbstract => "INSTANTIATE_ABSTRACT_CLASS",
            ErrorKind::IllegalStaticAccess => "ILLEGAL_STATIC_ACCESS",
            ErrorKind::UnreachableStatement => "UNREACHABLE_STATEMENT",
            ErrorKind::MissingReturn => "MISSING_RETURN_STATEMENT",
        }
    }

    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            ErrorKind::DuplicateType
            | ErrorKind::PackageTypeClash
            | ErrorKind::DuplicateField
            | ErrorKind::DuplicateVariable => Phase::Environment,
            ErrorKind::AmbiguousImport
            | ErrorKind::AmbiguousOnDemandImport
            | ErrorKind::SingleTypeImportClash
            | ErrorKind::PrefixResolvesToType
            | ErrorKind::TypeNotFound
            | ErrorKind::NonExistingPackage => Phase::TypeLinking,
            ErrorKind::CircularInheritance
            | ErrorKind::RepeatedInterface
            | ErrorKind::ExtendsNonClass
            | ErrorKind::ExtendsFinalClass
            | ErrorKind::ImplementsNonInterface
            | ErrorKind::DuplicateMember
            | ErrorKind::DifferentReturnType
            | ErrorKind::ReplaceFinal
            | ErrorKind::ProtectedReplacePublic
            | ErrorKind::NonstaticReplaceStatic
            | ErrorKind::StaticReplaceNonstatic
            | ErrorKind::IllegalThrowsInReplace
            | ErrorKind::ClassMustBeAbstract => Phase::Hierarchy,
            ErrorKind::UnreachableStatement | ErrorKind::MissingReturn => Phase::Reachability,
            _ => Phase::TypeChecking,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A violated static-semantics rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("type `{name}` is declared more than once{at}")]
    DuplicateType { name: String, at: Location },
    #[error("package `{package}` clashes with type `{ty}`{at}")]
    PackageTypeClash {
        package: String,
        ty: String,
        at: Location,
    },
    #[error("field `{name}` is declared more than once{at}")]
    DuplicateField { name: String, at: Location },
    #[error("variable `{name}` is already defined in an enclosing scope{at}")]
    DuplicateVariable { name: String, at: Location },

    #[error("single-type imports of `{name}` clash: {}{at}", .candidates.join(", "))]
    AmbiguousImport {
        name: String,
        candidates: Vec<String>,
        at: Location,
    },
    #[error("`{name}` is ambiguous between on-demand imports: {}{at}", .candidates.join(", "))]
    AmbiguousOnDemandImport {
        name: String,
        candidates: Vec<String>,
        at: Location,
    },
    #[error("single-type import `{import}` clashes with the declared type{at}")]
    SingleTypeImportClash { import: String, at: Location },
    #[error("prefix `{prefix}` of `{name}` resolves to a type{at}")]
    PrefixResolvesToType {
        prefix: String,
        name: String,
        at: Location,
    },
    #[error("cannot find type `{name}`{at}")]
    TypeNotFound { name: String, at: Location },
    #[error("package `{package}` does not exist{at}")]
    NonExistingPackage { package: String, at: Location },

    #[error("`{ty}` depends on itself through its supertypes{at}")]
    CircularInheritance { ty: String, at: Location },
    #[error("interface `{interface}` is named more than once{at}")]
    RepeatedInterface { interface: String, at: Location },
    #[error("`{target}` is not a class and cannot be extended{at}")]
    ExtendsNonClass { target: String, at: Location },
    #[error("final class `{target}` cannot be extended{at}")]
    ExtendsFinalClass { target: String, at: Location },
    #[error("`{target}` is not an interface{at}")]
    ImplementsNonInterface { target: String, at: Location },
    #[error("`{signature}` is declared more than once{at}")]
    DuplicateMember { signature: String, at: Location },
    #[error("`{signature}` changes the return type of the method in `{replaced}`{at}")]
    DifferentReturnType {
        signature: String,
        replaced: String,
        at: Location,
    },
    #[error("`{signature}` replaces a final method of `{replaced}`{at}")]
    ReplaceFinal {
        signature: String,
        replaced: String,
        at: Location,
    },
    #[error("protected `{signature}` replaces a public method of `{replaced}`{at}")]
    ProtectedReplacePublic {
        signature: String,
        replaced: String,
        at: Location,
    },
    #[error("instance method `{signature}` replaces a static method of `{replaced}`{at}")]
    NonstaticReplaceStatic {
        signature: String,
        replaced: String,
        at: Location,
    },
    #[error("static method `{signature}` replaces an instance method of `{replaced}`{at}")]
    StaticReplaceNonstatic {
        signature: String,
        replaced: String,
        at: Location,
    },
    #[error("`{signature}` throws `{exception}`, which the replaced method does not{at}")]
    IllegalThrowsInReplace {
        signature: String,
        exception: String,
        at: Location,
    },
    #[error("`{ty}` must be declared abstract: `{method}` is abstract{at}")]
    ClassMustBeAbstract {
        ty: String,
        method: String,
        at: Location,
    },

    #[error("expected `{expected}`, found `{found}`{at}")]
    TypeMismatch {
        expected: String,
        found: String,
        at: Location,
    },
    #[error("cannot assign to final field `{field}`{at}")]
    AssignToFinalField { field: String, at: Location },
    #[error("no applicable `{name}({args})`{at}")]
    NoMatchingMethod {
        name: String,
        args: String,
        at: Location,
    },
    #[error("call `{name}({args})` is ambiguous{at}")]
    AmbiguousOverload {
        name: String,
        args: String,
        at: Location,
    },
    #[error("`this` is not available here{at}")]
    IllegalThisReference { at: Location },
    #[error("explicit constructor invocation must be the first statement of a constructor{at}")]
    MisplacedConstructorInvocation { at: Location },
    #[error("constructors of `{ty}` invoke each other circularly{at}")]
    CircularConstructorInvocation { ty: String, at: Location },
    #[error("cannot throw a value of type `{found}`{at}")]
    IllegalThrowType { found: String, at: Location },
    #[error("checked exception `{exception}` is not declared in the throws clause{at}")]
    UndeclaredCheckedException { exception: String, at: Location },
    #[error("operand is not a variable{at}")]
    NotLvalue { at: Location },
    #[error("cannot increment or decrement a value of type `{found}`{at}")]
    NonNumericIncDec { found: String, at: Location },
    #[error("cannot resolve `{name}`{at}")]
    UnresolvedName { name: String, at: Location },
    #[error("cannot cast `{from}` to `{to}`{at}")]
    InvalidCast {
        from: String,
        to: String,
        at: Location,
    },
    #[error("cannot instantiate abstract type `{ty}`{at}")]
    InstantiateAbstract { ty: String, at: Location },
    #[error("illegal static/instance access to `{member}`{at}")]
    IllegalStaticAccess { member: String, at: Location },

    #[error("unreachable statement{at}")]
    UnreachableStatement { at: Location },
    #[error("method `{method}` can complete without returning a value{at}")]
    MissingReturn { method: String, at: Location },
}

impl SemanticError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SemanticError::DuplicateType { .. } => ErrorKind::DuplicateType,
            SemanticError::PackageTypeClash { .. } => ErrorKind::PackageTypeClash,
            SemanticError::DuplicateField { .. } => ErrorKind::DuplicateField,
            SemanticError::DuplicateVariable { .. } => ErrorKind::DuplicateVariable,
            SemanticError::AmbiguousImport { .. } => ErrorKind::AmbiguousImport,
            SemanticError::AmbiguousOnDemandImport { .. } => ErrorKind::AmbiguousOnDemandImport,
            SemanticError::SingleTypeImportClash { .. } => ErrorKind::SingleTypeImportClash,
            SemanticError::PrefixResolvesToType { .. } => ErrorKind::PrefixResolvesToType,
            SemanticError::TypeNotFound { .. } => ErrorKind::TypeNotFound,
            SemanticError::NonExistingPackage { .. } => ErrorKind::NonExistingPackage,
            SemanticError::CircularInheritance { .. } => ErrorKind::CircularInheritance,
            SemanticError::RepeatedInterface { .. } => ErrorKind::RepeatedInterface,
            SemanticError::ExtendsNonClass { .. } => ErrorKind::ExtendsNonClass,
            SemanticError::ExtendsFinalClass { .. } => ErrorKind::ExtendsFinalClass,
            SemanticError::ImplementsNonInterface { .. } => ErrorKind::ImplementsNonInterface,
            SemanticError::DuplicateMember { .. } => ErrorKind::DuplicateMember,
            SemanticError::DifferentReturnType { .. } => ErrorKind::DifferentReturnType,
            SemanticError::ReplaceFinal { .. } => ErrorKind::ReplaceFinal,
            SemanticError::ProtectedReplacePublic { .. } => ErrorKind::ProtectedReplacePublic,
            SemanticError::NonstaticReplaceStatic { .. } => ErrorKind::NonstaticReplaceStatic,
            SemanticError::StaticReplaceNonstatic { .. } => ErrorKind::StaticReplaceNonstatic,
            SemanticError::IllegalThrowsInReplace { .. } => ErrorKind::IllegalThrowsInReplace,
            SemanticError::ClassMustBeAbstract { .. } => ErrorKind::ClassMustBeAbstract,
            SemanticError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            SemanticError::AssignToFinalField { .. } => ErrorKind::AssignToFinalField,
            SemanticError::NoMatchingMethod { .. } => ErrorKind::NoMatchingMethod,
            SemanticError::AmbiguousOverload { .. } => ErrorKind::AmbiguousOverload,
            SemanticError::IllegalThisReference { .. } => ErrorKind::IllegalThisReference,
            SemanticError::MisplacedConstructorInvocation { .. } => {
                ErrorKind::MisplacedConstructorInvocation
            }
            SemanticError::CircularConstructorInvocation { .. } => {
                ErrorKind::CircularConstructorInvocation
            }
            SemanticError::IllegalThrowType { .. } => ErrorKind::IllegalThrowType,
            SemanticError::UndeclaredCheckedException { .. } => {
                ErrorKind::UndeclaredCheckedException
            }
            SemanticError::NotLvalue { .. } => ErrorKind::NotLvalue,
            SemanticError::NonNumericIncDec { .. } => ErrorKind::NonNumericIncDec,
            SemanticError::UnresolvedName { .. } => ErrorKind::UnresolvedName,
            SemanticError::InvalidCast { .. } => ErrorKind::InvalidCast,
            SemanticError::InstantiateAbstract { .. } => ErrorKind::InstantiateAbstract,
            SemanticError::IllegalStaticAccess { .. } => ErrorKind::IllegalStaticAccess,
            SemanticError::UnreachableStatement { .. } => ErrorKind::UnreachableStatement,
            SemanticError::MissingReturn { .. } => ErrorKind::MissingReturn,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.kind().phase()
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            SemanticError::DuplicateType { at, .. }
            | SemanticError::PackageTypeClash { at, .. }
            | SemanticError::DuplicateField { at, .. }
            | SemanticError::DuplicateVariable { at, .. }
            | SemanticError::AmbiguousImport { at, .. }
            | SemanticError::AmbiguousOnDemandImport { at, .. }
            | SemanticError::SingleTypeImportClash { at, .. }
            | SemanticError::PrefixResolvesToType { at, .. }
            | SemanticError::TypeNotFound { at, .. }
            | SemanticError::NonExistingPackage { at, .. }
            | SemanticError::CircularInheritance { at, .. }
            | SemanticError::RepeatedInterface { at, .. }
            | SemanticError::ExtendsNonClass { at, .. }
            | SemanticError::ExtendsFinalClass { at, .. }
            | SemanticError::ImplementsNonInterface { at, .. }
            | SemanticError::DuplicateMember { at, .. }
            | SemanticError::DifferentReturnType { at, .. }
            | SemanticError::ReplaceFinal { at, .. }
            | SemanticError::ProtectedReplacePublic { at, .. }
            | SemanticError::NonstaticReplaceStatic { at, .. }
            | SemanticError::StaticReplaceNonstatic { at, .. }
            | SemanticError::IllegalThrowsInReplace { at, .. }
            | SemanticError::ClassMustBeAbstract { at, .. }
            | SemanticError::TypeMismatch { at, .. }
            | SemanticError::AssignToFinalField { at, .. }
            | SemanticError::NoMatchingMethod { at, .. }
            | SemanticError::AmbiguousOverload { at, .. }
            | SemanticError::IllegalThisReference { at }
            | SemanticError::MisplacedConstructorInvocation { at }
            | SemanticError::CircularConstructorInvocation { at, .. }
            | SemanticError::IllegalThrowType { at, .. }
            | SemanticError::UndeclaredCheckedException { at, .. }
            | SemanticError::NotLvalue { at }
            | SemanticError::NonNumericIncDec { at, .. }
            | SemanticError::UnresolvedName { at, .. }
            | SemanticError::InvalidCast { at, .. }
            | SemanticError::InstantiateAbstract { at, .. }
            | SemanticError::IllegalStaticAccess { at, .. }
            | SemanticError::UnreachableStatement { at }
            | SemanticError::MissingReturn { at, .. } => at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_includes_location() {
        let err = SemanticError::UnreachableStatement {
            at: Location::in_type("Main").member("test").at(Span::new(10, 12)),
        };
        assert_eq!(
            err.to_string(),
            "unreachable statement (in `Main.test` at 10..12)"
        );
        assert_eq!(err.kind().code(), "UNREACHABLE_STATEMENT");
        assert_eq!(err.phase(), Phase::Reachability);
    }

    #[test]
    fn empty_location_renders_nothing() {
        let err = SemanticError::TypeNotFound {
            name: "foo.Bar".to_string(),
            at: Location::default(),
        };
        assert_eq!(err.to_string(), "cannot find type `foo.Bar`");
        assert_eq!(err.phase(), Phase::TypeLinking);
    }
}
