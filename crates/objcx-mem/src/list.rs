//! Append-only ordered sequences.
//!
//! [`AppendOnlyList`] exposes `push` and read access only: no insertion in
//! the middle, no removal, no sorting. Whatever order values were pushed in
//! is the order every reader observes.

use std::ops::Index;

/// An ordered sequence that can only grow at its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOnlyList<T> {
    items: Vec<T>,
}

impl<T> AppendOnlyList<T> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends `value` and returns its position.
    pub fn push(&mut self, value: T) -> usize {
        self.items.push(value);
        self.items.len() - 1
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the entry at `pos`.
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<&T> {
        self.items.get(pos)
    }

    /// Iterates in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Read-only view of the entries in append order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for AppendOnlyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for AppendOnlyList<T> {
    type Output = T;

    fn index(&self, pos: usize) -> &T {
        &self.items[pos]
    }
}

impl<'a, T> IntoIterator for &'a AppendOnlyList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
