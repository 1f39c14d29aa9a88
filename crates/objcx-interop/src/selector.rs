//! Selector interning and derivation.
//!
//! A selector is the runtime name of a method: either a bare identifier
//! (`count`) or one identifier per argument, each followed by a colon
//! (`insertObject:atIndex:`). The table hands out one [`Selector`] handle per
//! distinct (text, parameter count) pair, so handles compare by identity.
//!
//! # Examples
//!
//! ```
//! use objcx_interop::SelectorTable;
//! use objcx_ast::Span;
//!
//! let mut table = SelectorTable::new();
//! let a = table.intern("bar:baz:", 2);
//! let b = table.lookup("bar:baz:", Span::SYNTHESIZED).unwrap();
//!
//! assert_eq!(a, b);
//! assert_eq!(table.param_count(a), 2);
//! assert_eq!(table.name(a), "bar:baz:");
//! ```

use crate::error::{InteropError, Result};
use fxhash::FxHashMap;
use objcx_ast::{Ast, FuncId, Selector, Span};
use objcx_mem::{StringInterner, Symbol};

#[derive(Debug, Clone, Copy)]
struct SelectorData {
    name: Symbol,
    len: usize,
    param_count: usize,
}

/// Session-wide selector table.
pub struct SelectorTable {
    text: StringInterner,
    entries: Vec<SelectorData>,
    index: FxHashMap<(Symbol, usize), Selector>,
}

impl SelectorTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            text: StringInterner::new(),
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Returns the unique handle for `(name, param_count)`, creating it on
    /// first use. No validation; see [`lookup`](Self::lookup).
    pub fn intern(&mut self, name: &str, param_count: usize) -> Selector {
        let sym = self.text.intern(name);
        if let Some(&sel) = self.index.get(&(sym, param_count)) {
            return sel;
        }

        let raw = u32::try_from(self.entries.len()).unwrap_or(u32::MAX);
        let sel = Selector::from_raw(raw);
        self.entries.push(SelectorData {
            name: sym,
            len: name.len(),
            param_count,
        });
        self.index.insert((sym, param_count), sel);
        objcx_log::trace!("interned selector `{name}` ({param_count} args) as #{raw}");
        sel
    }

    /// Validates explicit selector text and interns it with one parameter
    /// per colon.
    ///
    /// # Errors
    ///
    /// Returns [`InteropError::InvalidSelectorSyntax`] if `text` does not
    /// follow the selector grammar.
    pub fn lookup(&mut self, text: &str, span: Span) -> Result<Selector> {
        let param_count = selector_arity(text).map_err(|reason| InteropError::InvalidSelectorSyntax {
            text: text.to_string(),
            reason,
            span,
        })?;
        Ok(self.intern(text, param_count))
    }

    /// Derives and interns the selector of `func` from its external
    /// signature.
    ///
    /// # Errors
    ///
    /// Returns [`InteropError::InvalidSelectorSyntax`] if the derived text
    /// is not a valid selector, e.g. when a later parameter has no label.
    pub fn create(&mut self, ast: &Ast, func: FuncId) -> Result<Selector> {
        let text = derive_selector_text(ast, func);
        self.lookup(&text, ast.func(func).span)
    }

    /// Finds an already interned selector without creating one.
    #[must_use]
    pub fn get(&self, name: &str, param_count: usize) -> Option<Selector> {
        let sym = self.text.get(name)?;
        self.index.get(&(sym, param_count)).copied()
    }

    /// Selector text.
    #[must_use]
    pub fn name(&self, sel: Selector) -> &str {
        self.entries
            .get(sel.as_usize())
            .and_then(|data| self.text.resolve(data.name))
            .unwrap_or("<unknown>")
    }

    /// Byte length of the selector text.
    #[must_use]
    pub fn text_len(&self, sel: Selector) -> usize {
        self.entries.get(sel.as_usize()).map_or(0, |data| data.len)
    }

    /// Number of arguments the selector takes.
    #[must_use]
    pub fn param_count(&self, sel: Selector) -> usize {
        self.entries
            .get(sel.as_usize())
            .map_or(0, |data| data.param_count)
    }

    /// Number of distinct selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All selectors in interning order.
    pub fn iter(&self) -> impl Iterator<Item = Selector> + '_ {
        (0..self.entries.len()).map(|i| Selector::from_raw(i as u32))
    }
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks `text` against the selector grammar and returns its parameter
/// count.
///
/// ```
/// use objcx_interop::selector::selector_arity;
///
/// assert_eq!(selector_arity("count"), Ok(0));
/// assert_eq!(selector_arity("insertObject:atIndex:"), Ok(2));
/// assert!(selector_arity("bar:baz").is_err());
/// ```
///
/// # Errors
///
/// Returns a short reason when the text is not a selector.
pub fn selector_arity(text: &str) -> std::result::Result<usize, &'static str> {
    if text.is_empty() {
        return Err("selector is empty");
    }
    if !text.contains(':') {
        return if is_identifier(text) {
            Ok(0)
        } else {
            Err("selector is not an identifier")
        };
    }

    let Some(body) = text.strip_suffix(':') else {
        return Err("keyword selector must end with ':'");
    };
    let mut count = 0;
    for segment in body.split(':') {
        if segment.is_empty() {
            return Err("selector has an empty segment");
        }
        if !is_identifier(segment) {
            return Err("selector segment is not an identifier");
        }
        count += 1;
    }
    Ok(count)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Text of the selector `func` gets when none is written.
///
/// The function name is the first segment and the labels of the second and
/// later parameters are the rest; every segment is followed by `:` unless the
/// function takes no arguments. A one-argument property accessor is a setter
/// and maps to `set<Name>:`.
#[must_use]
pub fn derive_selector_text(ast: &Ast, func: FuncId) -> String {
    let decl = ast.func(func);
    let name = ast.name(decl.name);
    let params: Vec<_> = decl.explicit_params().collect();

    if decl.is_property && params.len() == 1 {
        let mut chars = name.chars();
        let mut text = String::with_capacity(name.len() + 4);
        text.push_str("set");
        if let Some(first) = chars.next() {
            text.extend(first.to_uppercase());
            text.push_str(chars.as_str());
        }
        text.push(':');
        return text;
    }

    let mut text = name.to_string();
    if params.is_empty() {
        return text;
    }
    text.push(':');
    for param in &params[1..] {
        if let Some(label) = param.label {
            text.push_str(ast.name(label));
        }
        text.push(':');
    }
    text
}
