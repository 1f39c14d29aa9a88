//! Typed index arenas for declaration storage.
//!
//! An [`Arena<T>`] owns every value allocated into it for its whole lifetime
//! and hands out [`Idx<T>`] handles instead of references. Handles are
//! `Copy`, compare by position, and cannot be confused across element types.
//!
//! Declarations refer to each other (class → metaclass, method → enclosing
//! class) through these handles, so cross-links can be rewritten and checked
//! without juggling borrowed pointers.
//!
//! # Lifetime
//!
//! Arenas never remove or move elements. An index issued by an arena stays
//! valid until the arena is dropped, which happens at the end of the
//! compilation together with the rest of the AST.
//!
//! # Examples
//!
//! ```
//! use objcx_mem::Arena;
//!
//! let mut arena = Arena::new();
//! let a = arena.alloc("NSObject");
//! let b = arena.alloc("NSView");
//!
//! assert_eq!(arena[a], "NSObject");
//! assert_ne!(a, b);
//! assert_eq!(arena.len(), 2);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Handle to a value stored in an [`Arena<T>`].
pub struct Idx<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Idx<T> {
    /// Creates an index from a raw position.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Returns the raw position.
    #[must_use]
    pub const fn into_raw(self) -> u32 {
        self.raw
    }

    /// Returns the raw position as usize.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.raw as usize
    }
}

// Manual impls: derives would require `T: Clone` etc.
impl<T> Clone for Idx<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Idx<T> {}

impl<T> PartialEq for Idx<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Idx<T> {}

impl<T> PartialOrd for Idx<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Idx<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Hash for Idx<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = std::any::type_name::<T>();
        let short = name.rsplit("::").next().unwrap_or(name);
        write!(f, "Idx::<{short}>({})", self.raw)
    }
}

/// Append-only storage addressed by [`Idx<T>`].
pub struct Arena<T> {
    data: Vec<T>,
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Moves `value` into the arena and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` elements.
    pub fn alloc(&mut self, value: T) -> Idx<T> {
        let raw = u32::try_from(self.data.len()).expect("arena index overflow");
        self.data.push(value);
        Idx::from_raw(raw)
    }

    /// Returns the value at `idx`, if this arena issued it.
    #[must_use]
    pub fn get(&self, idx: Idx<T>) -> Option<&T> {
        self.data.get(idx.as_usize())
    }

    /// Returns the value at `idx` mutably, if this arena issued it.
    pub fn get_mut(&mut self, idx: Idx<T>) -> Option<&mut T> {
        self.data.get_mut(idx.as_usize())
    }

    /// Returns true if `idx` points into this arena.
    #[must_use]
    pub fn contains(&self, idx: Idx<T>) -> bool {
        idx.as_usize() < self.data.len()
    }

    /// Number of allocated values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates over `(index, value)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (Idx<T>, &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Idx::from_raw(i as u32), v))
    }

    /// Iterates over all indices in allocation order.
    pub fn indices(&self) -> impl Iterator<Item = Idx<T>> + '_ {
        (0..self.data.len()).map(|i| Idx::from_raw(i as u32))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T> Index<Idx<T>> for Arena<T> {
    type Output = T;

    fn index(&self, idx: Idx<T>) -> &T {
        &self.data[idx.as_usize()]
    }
}

impl<T> IndexMut<Idx<T>> for Arena<T> {
    fn index_mut(&mut self, idx: Idx<T>) -> &mut T {
        &mut self.data[idx.as_usize()]
    }
}
