//! String interning with ID-based references.
//!
//! The interner keeps two structures:
//! - `strings`: Symbol → text (for resolving IDs back to strings)
//! - `symbols`: text → Symbol (for interning)
//!
//! Declaration names, parameter labels and selector text all go through one
//! interner per compilation, so equal text always compares as an equal
//! [`Symbol`].
//!
//! # Examples
//!
//! ```
//! use objcx_mem::StringInterner;
//!
//! let mut interner = StringInterner::new();
//!
//! let sym1 = interner.intern("initWithFrame:");
//! let sym2 = interner.intern("initWithFrame:");
//! let sym3 = interner.intern("init");
//!
//! assert_eq!(sym1, sym2);
//! assert_ne!(sym1, sym3);
//! assert_eq!(interner.resolve(sym1), Some("initWithFrame:"));
//! ```

use crate::symbol::Symbol;

// Use hashbrown if available (faster), otherwise std::collections::HashMap
#[cfg(feature = "symbols")]
use hashbrown::HashMap;

#[cfg(not(feature = "symbols"))]
use std::collections::HashMap;

/// Names the interop layer needs on every compilation, interned first so
/// their IDs are stable across sessions.
const RESERVED: &[&str] = &["_cmd", "self", "init", "alloc", "class"];

/// String interner with bidirectional mapping.
pub struct StringInterner {
    /// Map from Symbol ID to text
    strings: Vec<Box<str>>,

    /// Map from text to Symbol ID
    symbols: HashMap<Box<str>, Symbol>,
}

impl StringInterner {
    /// Creates a new interner with the reserved names pre-interned.
    ///
    /// # Examples
    ///
    /// ```
    /// use objcx_mem::StringInterner;
    ///
    /// let mut interner = StringInterner::new();
    /// assert_eq!(interner.intern("_cmd").as_u32(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let mut interner = Self {
            strings: Vec::new(),
            symbols: HashMap::new(),
        };

        for name in RESERVED {
            interner.intern(name);
        }

        interner
    }

    /// Interns a string, returning its Symbol.
    ///
    /// If the string has already been interned, returns the existing Symbol.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.symbols.get(s) {
            return sym;
        }

        let sym = Symbol::new(self.strings.len() as u32);
        let text: Box<str> = s.into();
        self.strings.push(text.clone());
        self.symbols.insert(text, sym);

        sym
    }

    /// Returns the symbol for `s` without interning it.
    #[must_use]
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.symbols.get(s).copied()
    }

    /// Resolves a Symbol to its string slice.
    ///
    /// Returns `None` if the Symbol was not produced by this interner.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.as_usize()).map(|s| &**s)
    }

    /// Returns true if `sym` is one of the pre-interned reserved names.
    #[must_use]
    pub const fn is_reserved(&self, sym: Symbol) -> bool {
        sym.as_usize() < RESERVED.len()
    }

    /// Returns the number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if no strings are interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
