//! `objcx` memory infrastructure
//!
//! This crate provides the storage primitives shared by the declaration model
//! and the interop resolver:
//!
//! - **Symbols**: 32-bit handles for interned strings
//! - **String interning**: deduplicated identifier and selector text
//!   (requires the `string-interner` feature)
//! - **Index arenas**: append-only typed storage addressed by [`Idx`]
//! - **Append-only lists**: ordered sequences whose order cannot be rewritten
//!

pub mod arena;
pub mod list;
pub mod symbol;

#[cfg(feature = "string-interner")]
pub mod interner;

pub use arena::{Arena, Idx};
pub use list::AppendOnlyList;
pub use symbol::Symbol;

#[cfg(feature = "string-interner")]
pub use interner::StringInterner;
