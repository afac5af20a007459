use std::fmt;

use joos_core::{Name, Span};
use joos_types::Type;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(u32);

impl LocalId {
    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalId({})", self.0)
    }
}

/// A parameter or local variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    pub name: Name,
    pub ty: Type,
    pub span: Span,
    pub is_param: bool,
}

/// Lexical scopes of one body. Locals are allocated into the class-wide
/// `locals` list so ids stay unique across bodies.
#[derive(Debug, Default)]
pub(crate) struct Scopes {
    stack: Vec<Vec<LocalId>>,
}

impl Scopes {
    pub(crate) fn push(&mut self) {
        self.stack.push(Vec::new());
    }

    pub(crate) fn pop(&mut self) {
        self.stack.pop();
    }

    /// Innermost visible local named `name`.
    pub(crate) fn lookup(&self, locals: &[Local], name: &str) -> Option<LocalId> {
        self.stack
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .copied()
            .find(|id| locals[id.idx()].name == name)
    }

    /// Declare a local in the innermost scope. Fails with the clashing local
    /// if the name is visible already.
    pub(crate) fn declare(&mut self, locals: &mut Vec<Local>, local: Local) -> Result<LocalId, LocalId> {
        if let Some(existing) = self.lookup(locals, local.name.as_str()) {
            return Err(existing);
        }
        let id = LocalId(locals.len() as u32);
        locals.push(local);
        if self.stack.is_empty() {
            self.push();
        }
        if let Some(scope) = self.stack.last_mut() {
            scope.push(id);
        }
        Ok(id)
    }
}
