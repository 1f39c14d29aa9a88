//! Objective-C interoperability for `objcx`.
//!
//! During semantic analysis this crate decides which declarations bind to
//! the Objective-C runtime and records what the code generator needs for
//! them: selectors, dispatch kinds, class/metaclass pairs and per-class
//! method lists.
//!
//! # Architecture
//!
//! - [`selector`] - Selector grammar, derivation and interning
//! - [`strategy`] - The [`Objc`] capability trait and process-wide selection
//! - [`supported`] - Functional strategy
//! - [`unsupported`] - Inert strategy for targets without the runtime
//! - [`session`] - Per-compilation state and error reporting
//! - [`emit`] - Read-only view for code generation
//! - [`target`] - Target triples and configuration
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```
//! use objcx_ast::{Ast, ClassDecl, ClassKind, FuncDecl, Linkage, Param, ParamType, Span};
//! use objcx_interop::{Session, Target};
//!
//! let mut session = Session::for_target(&Target::from_triple("x86_64-apple-darwin").unwrap());
//! let mut ast = Ast::new();
//! let scope = ast.new_scope(None);
//!
//! let foo = ast.intern("Foo");
//! let foo = ast.add_class(ClassDecl::new(foo, ClassKind::Class, Span::SYNTHESIZED));
//! let (bar, baz, a, b, id) = (
//!     ast.intern("bar"),
//!     ast.intern("baz"),
//!     ast.intern("a"),
//!     ast.intern("b"),
//!     ast.intern("id"),
//! );
//! let params = vec![
//!     Param::new(a, None, ParamType::Named(id), Span::SYNTHESIZED),
//!     Param::new(b, Some(baz), ParamType::Named(id), Span::SYNTHESIZED),
//! ];
//! let method = ast.add_method(
//!     foo,
//!     FuncDecl::new(bar, params, Span::SYNTHESIZED).with_linkage(Linkage::Objc),
//! );
//!
//! session.process_class(&mut ast, foo, scope).unwrap();
//!
//! let sel = ast.func(method).selector().unwrap();
//! assert_eq!(session.selectors().name(sel), "bar:baz:");
//! assert!(session.is_virtual(&ast, method));
//! ```

#![warn(missing_docs)]

pub mod emit;
pub mod error;
pub mod selector;
pub mod session;
pub mod strategy;
pub mod supported;
pub mod target;
pub mod unsupported;

pub use emit::{ClassRecord, MethodRecord, ModuleSymbols};
pub use error::{ConfigError, InteropError, Result};
pub use selector::SelectorTable;
pub use session::Session;
pub use strategy::{Context, Culprit, Objc, ParamRef, StrategyKind, SymbolSource};
pub use supported::Supported;
pub use target::{Arch, Os, SessionConfig, Target};
pub use unsupported::Unsupported;
