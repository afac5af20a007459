use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A single Java identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(SmolStr);

impl Name {
    pub fn new(text: impl AsRef<str>) -> Self {
        Name(SmolStr::new(text))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name(SmolStr::from(value))
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dotted name such as `java.util.List` (or a single identifier).
///
/// Used for package names, fully qualified type names and the (still
/// ambiguous) qualified names that appear in expressions.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedName {
    segments: Vec<Name>,
}

/// Package names are plain qualified names; the alias documents intent.
pub type PackageName = QualifiedName;

impl QualifiedName {
    pub fn from_segments(segments: impl IntoIterator<Item = Name>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Split `text` on `.`; empty segments are dropped.
    pub fn from_dotted(text: &str) -> Self {
        Self {
            segments: text
                .split('.')
                .map(str::trim)
                .filter(|seg| !seg.is_empty())
                .map(Name::from)
                .collect(),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }

    #[must_use]
    pub fn first(&self) -> Option<&Name> {
        self.segments.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Name> {
        self.segments.last()
    }

    /// The first `len` segments.
    #[must_use]
    pub fn prefix(&self, len: usize) -> QualifiedName {
        QualifiedName {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }

    /// Everything but the last segment (the package part of a type name).
    #[must_use]
    pub fn parent(&self) -> QualifiedName {
        self.prefix(self.segments.len().saturating_sub(1))
    }

    #[must_use]
    pub fn child(&self, name: &Name) -> QualifiedName {
        let mut segments = self.segments.clone();
        segments.push(name.clone());
        QualifiedName { segments }
    }

    #[must_use]
    pub fn to_dotted(&self) -> String {
        let mut out = String::new();
        for (idx, seg) in self.segments.iter().enumerate() {
            if idx > 0 {
                out.push('.');
            }
            out.push_str(seg.as_str());
        }
        out
    }

    /// Whether `self` equals `other` or is a package/type prefix of it made of
    /// whole identifiers.
    #[must_use]
    pub fn is_prefix_of(&self, other: &QualifiedName) -> bool {
        self.segments.len() <= other.segments.len()
            && self.segments[..] == other.segments[..self.segments.len()]
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        QualifiedName::from_dotted(value)
    }
}

impl From<Name> for QualifiedName {
    fn from(value: Name) -> Self {
        QualifiedName {
            segments: vec![value],
        }
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedName({})", self.to_dotted())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}
