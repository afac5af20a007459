//! Core shared types for the Joos analyzer.
//!
//! Everything in here is vocabulary shared by every stage of the pipeline:
//! identifiers, source spans, modifiers, primitive types and the error
//! taxonomy reported by the analyzer.

mod error;
mod modifiers;
mod name;

pub use crate::error::{ErrorKind, Location, Phase, SemanticError};
pub use crate::modifiers::Modifiers;
pub use crate::name::{Name, PackageName, QualifiedName};

use std::fmt;

use serde::{Deserialize, Serialize};

/// A byte-span into the original source of a compilation unit.
///
/// The analyzer never looks at source text; spans are carried through from the
/// AST producer purely so errors can be pinpointed.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

/// The primitive types of Joos. There is no `long`, `float` or `double`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
}

impl PrimitiveType {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Boolean)
    }

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
        }
    }

    /// Widening primitive conversion (JLS 5.1.2, restricted to Joos types).
    #[must_use]
    pub fn widens_to(self, target: PrimitiveType) -> bool {
        use PrimitiveType::*;
        if self == target {
            return true;
        }
        matches!(
            (self, target),
            (Byte, Short) | (Byte, Int) | (Short, Int) | (Char, Int)
        )
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
