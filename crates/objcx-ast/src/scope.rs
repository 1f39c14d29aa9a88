//! Lexical scopes.
//!
//! Scopes form a tree through parent links and are stored in the AST's scope
//! arena. Lookup walks outward; insertion only ever touches the innermost
//! scope.

use crate::decl::{ClassId, FuncId};
use objcx_mem::{Idx, Symbol};
use std::collections::HashMap;

/// Index of a scope.
pub type ScopeId = Idx<Scope>;

/// What a name in a scope refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeEntry {
    /// A class, interface or metaclass declaration
    Class(ClassId),
    /// A function declaration
    Func(FuncId),
    /// Parameter `index` of `func`
    Param {
        /// Owning function
        func: FuncId,
        /// Position in the function's parameter list
        index: usize,
    },
    /// A compile-time string constant
    StringConst(String),
}

/// A name was already declared in the same scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redeclared {
    /// The entry that was already there
    pub existing: ScopeEntry,
}

/// One lexical scope.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    parent: Option<ScopeId>,
    entries: HashMap<Symbol, ScopeEntry>,
}

impl Scope {
    /// A scope nested in `parent` (or a root scope).
    #[must_use]
    pub fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            entries: HashMap::new(),
        }
    }

    /// Enclosing scope.
    #[must_use]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Declares `name` in this scope.
    ///
    /// # Errors
    ///
    /// Returns [`Redeclared`] with the previous entry if `name` is already
    /// declared here; the scope is left unchanged.
    pub fn declare(&mut self, name: Symbol, entry: ScopeEntry) -> Result<(), Redeclared> {
        if let Some(existing) = self.entries.get(&name) {
            return Err(Redeclared {
                existing: existing.clone(),
            });
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Entry declared directly in this scope.
    #[must_use]
    pub fn local(&self, name: Symbol) -> Option<&ScopeEntry> {
        self.entries.get(&name)
    }

    /// Number of names declared directly in this scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is declared directly in this scope.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
