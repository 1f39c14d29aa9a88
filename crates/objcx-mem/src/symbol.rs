//! Symbol type for interned strings.
//!
//! Symbols are lightweight identifiers that represent interned strings.
//! Each unique string is assigned a unique 32-bit ID, allowing efficient
//! comparison and storage of declaration names and selector text.
//!
//! # Examples
//!
//! ```
//! use objcx_mem::Symbol;
//!
//! let sym1 = Symbol::new(42);
//! let sym2 = Symbol::new(42);
//! let sym3 = Symbol::new(100);
//!
//! assert_eq!(sym1, sym2);
//! assert_ne!(sym1, sym3);
//! ```

use std::fmt;

/// A symbol representing an interned string.
///
/// Equality is a `u32` comparison; the text lives in the
/// [`StringInterner`](crate::StringInterner) that produced the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a new symbol from a raw ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the raw ID value as usize.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns true if this is the placeholder symbol.
    ///
    /// # Examples
    ///
    /// ```
    /// use objcx_mem::Symbol;
    ///
    /// assert!(Symbol::invalid().is_invalid());
    /// assert!(!Symbol::new(0).is_invalid());
    /// ```
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u32::MAX
    }

    /// The placeholder symbol (`u32::MAX`), used for anonymous declarations.
    #[must_use]
    pub const fn invalid() -> Self {
        Self(u32::MAX)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl From<u32> for Symbol {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_equality() {
        assert_eq!(Symbol::new(1), Symbol::new(1));
        assert_ne!(Symbol::new(1), Symbol::new(2));
    }

    #[test]
    fn test_symbol_invalid() {
        assert!(Symbol::invalid().is_invalid());
        assert_eq!(Symbol::invalid().as_u32(), u32::MAX);
        assert!(!Symbol::from(7).is_invalid());
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(format!("{}", Symbol::new(42)), "Symbol(42)");
    }
}
