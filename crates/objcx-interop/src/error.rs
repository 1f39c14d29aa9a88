//! Interop errors.
//!
//! Every [`InteropError`] except [`BrokenInvariant`](InteropError::BrokenInvariant)
//! is recoverable at the declaration level: the session reports it once,
//! marks the offending declaration invalid, and analysis moves on.

use objcx_ast::{Linkage, Span};
use std::fmt;

/// Errors raised while resolving Objective-C interop metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteropError {
    /// Selector text does not follow the selector grammar.
    InvalidSelectorSyntax {
        /// The offending text
        text: String,
        /// What is wrong with it
        reason: &'static str,
        /// Source location
        span: Span,
    },

    /// The declaration already carries interop metadata.
    DuplicateAnnotation {
        /// Declaration name
        name: String,
        /// Source location
        span: Span,
    },

    /// The inheritance chain mixes Objective-C and native roots.
    UnsupportedBase {
        /// Declaration name
        name: String,
        /// What is wrong with the chain
        detail: String,
        /// Source location
        span: Span,
    },

    /// The selector's parameter count differs from the function's.
    SelectorArityMismatch {
        /// Selector text
        selector: String,
        /// Parameters encoded in the selector
        expected: usize,
        /// Non-implicit parameters of the function
        found: usize,
        /// Source location
        span: Span,
    },

    /// A selector on a function whose aggregate is not Objective-C.
    SelectorOnNonInteropType {
        /// Function name
        func: String,
        /// Source location
        span: Span,
    },

    /// The declared linkage cannot carry dynamic dispatch.
    LinkageConflict {
        /// Function name
        func: String,
        /// Declared linkage
        linkage: Linkage,
        /// Source location
        span: Span,
    },

    /// An extern class whose header supplied no usable metaclass.
    MissingExternMetaclass {
        /// Class name
        class: String,
        /// What is missing
        detail: &'static str,
        /// Source location
        span: Span,
    },

    /// The metaclass was requested before it was resolved.
    MetaclassNotResolved {
        /// Class name
        class: String,
        /// Source location
        span: Span,
    },

    /// The same selector is already in the class's own method list.
    SelectorCollision {
        /// Selector text
        selector: String,
        /// Class name
        class: String,
        /// Class-side (`true`) or instance-side list
        is_class_method: bool,
        /// Location of the new method
        span: Span,
        /// Location of the method already in the list
        previous: Span,
    },

    /// A method handed to a class it is not a member of.
    MethodNotMember {
        /// Function name
        func: String,
        /// Class whose list was asked for
        class: String,
        /// Source location
        span: Span,
    },

    /// More than one selector attribute on one function.
    MultipleSelectors {
        /// Function name
        func: String,
        /// Source location
        span: Span,
    },

    /// A selector attached to a template function.
    SelectorOnTemplate {
        /// Function name
        func: String,
        /// Source location
        span: Span,
    },

    /// An operation that needs an Objective-C declaration got a native one.
    NotInteropType {
        /// Declaration name
        name: String,
        /// Source location
        span: Span,
    },

    /// Internal corruption of interop state. Fatal.
    BrokenInvariant {
        /// Description of the corruption
        detail: String,
        /// Source location
        span: Span,
    },

    /// The session hit a fatal error earlier and refuses further work.
    SessionAborted,
}

impl InteropError {
    /// Get the span of this error.
    pub fn span(&self) -> Span {
        match self {
            InteropError::InvalidSelectorSyntax { span, .. }
            | InteropError::DuplicateAnnotation { span, .. }
            | InteropError::UnsupportedBase { span, .. }
            | InteropError::SelectorArityMismatch { span, .. }
            | InteropError::SelectorOnNonInteropType { span, .. }
            | InteropError::LinkageConflict { span, .. }
            | InteropError::MissingExternMetaclass { span, .. }
            | InteropError::MetaclassNotResolved { span, .. }
            | InteropError::SelectorCollision { span, .. }
            | InteropError::MethodNotMember { span, .. }
            | InteropError::MultipleSelectors { span, .. }
            | InteropError::SelectorOnTemplate { span, .. }
            | InteropError::NotInteropType { span, .. }
            | InteropError::BrokenInvariant { span, .. } => *span,
            InteropError::SessionAborted => Span::SYNTHESIZED,
        }
    }

    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            InteropError::InvalidSelectorSyntax { .. } => "O0001",
            InteropError::DuplicateAnnotation { .. } => "O0002",
            InteropError::UnsupportedBase { .. } => "O0003",
            InteropError::SelectorArityMismatch { .. } => "O0004",
            InteropError::SelectorOnNonInteropType { .. } => "O0005",
            InteropError::LinkageConflict { .. } => "O0006",
            InteropError::MissingExternMetaclass { .. } => "O0007",
            InteropError::MetaclassNotResolved { .. } => "O0008",
            InteropError::SelectorCollision { .. } => "O0009",
            InteropError::MultipleSelectors { .. } => "O0010",
            InteropError::SelectorOnTemplate { .. } => "O0011",
            InteropError::NotInteropType { .. } => "O0012",
            InteropError::MethodNotMember { .. } => "O0013",
            InteropError::BrokenInvariant { .. } => "O0900",
            InteropError::SessionAborted => "O0901",
        }
    }

    /// Get a short description of this error.
    pub fn description(&self) -> &'static str {
        match self {
            InteropError::InvalidSelectorSyntax { .. } => "invalid selector syntax",
            InteropError::DuplicateAnnotation { .. } => "duplicate Objective-C annotation",
            InteropError::UnsupportedBase { .. } => "unsupported base for Objective-C type",
            InteropError::SelectorArityMismatch { .. } => "selector arity mismatch",
            InteropError::SelectorOnNonInteropType { .. } => "selector on non-Objective-C type",
            InteropError::LinkageConflict { .. } => "linkage conflict",
            InteropError::MissingExternMetaclass { .. } => "missing extern metaclass",
            InteropError::MetaclassNotResolved { .. } => "metaclass not resolved",
            InteropError::SelectorCollision { .. } => "selector collision",
            InteropError::MultipleSelectors { .. } => "multiple selectors",
            InteropError::SelectorOnTemplate { .. } => "selector on template",
            InteropError::NotInteropType { .. } => "not an Objective-C type",
            InteropError::MethodNotMember { .. } => "method of another class",
            InteropError::BrokenInvariant { .. } => "internal invariant violated",
            InteropError::SessionAborted => "session aborted",
        }
    }

    /// True for errors that end the session.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            InteropError::BrokenInvariant { .. } | InteropError::SessionAborted
        )
    }

    /// Secondary location worth pointing at, if any.
    pub fn related_span(&self) -> Option<Span> {
        match self {
            InteropError::SelectorCollision { previous, .. } => Some(*previous),
            _ => None,
        }
    }
}

fn linkage_name(linkage: Linkage) -> &'static str {
    match linkage {
        Linkage::Native => "native",
        Linkage::Objc => "Objective-C",
        Linkage::C => "C",
    }
}

impl fmt::Display for InteropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteropError::InvalidSelectorSyntax { text, reason, .. } => {
                write!(f, "invalid Objective-C selector `{text}`: {reason}")
            }

            InteropError::DuplicateAnnotation { name, .. } => {
                write!(f, "`{name}` is already an Objective-C declaration")
            }

            InteropError::UnsupportedBase { name, detail, .. } => {
                write!(f, "`{name}` cannot be an Objective-C type: {detail}")
            }

            InteropError::SelectorArityMismatch {
                selector,
                expected,
                found,
                ..
            } => {
                write!(
                    f,
                    "selector `{selector}` takes {expected} argument(s) but the function has {found} parameter(s)"
                )
            }

            InteropError::SelectorOnNonInteropType { func, .. } => {
                write!(
                    f,
                    "`{func}` has a selector but is not a member of an Objective-C class or interface"
                )
            }

            InteropError::LinkageConflict { func, linkage, .. } => {
                write!(
                    f,
                    "`{func}` must have Objective-C linkage to carry a selector, found {} linkage",
                    linkage_name(*linkage)
                )
            }

            InteropError::MissingExternMetaclass { class, detail, .. } => {
                write!(f, "extern Objective-C class `{class}`: {detail}")
            }

            InteropError::MetaclassNotResolved { class, .. } => {
                write!(f, "metaclass of `{class}` requested before it was resolved")
            }

            InteropError::SelectorCollision {
                selector,
                class,
                is_class_method,
                ..
            } => {
                let side = if *is_class_method { "class" } else { "instance" };
                write!(
                    f,
                    "{side} method selector `{selector}` is already declared in `{class}`"
                )
            }

            InteropError::MethodNotMember { func, class, .. } => {
                write!(f, "`{func}` is not a member of `{class}` and cannot join its method list")
            }

            InteropError::MultipleSelectors { func, .. } => {
                write!(f, "`{func}` can only have one Objective-C selector")
            }

            InteropError::SelectorOnTemplate { func, .. } => {
                write!(f, "template `{func}` cannot have an Objective-C selector")
            }

            InteropError::NotInteropType { name, .. } => {
                write!(f, "`{name}` is not an Objective-C class or interface")
            }

            InteropError::BrokenInvariant { detail, .. } => {
                write!(f, "internal error: {detail}")
            }

            InteropError::SessionAborted => {
                write!(f, "interop session aborted by an earlier internal error")
            }
        }
    }
}

impl std::error::Error for InteropError {}

/// Errors in choosing or configuring the interop strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A target triple that could not be parsed.
    InvalidTriple {
        /// The triple as given
        triple: String,
    },

    /// A log level name that could not be parsed.
    InvalidLogLevel {
        /// The value as given
        value: String,
    },

    /// The process already runs with the other strategy.
    StrategyConflict {
        /// Strategy chosen first
        active: crate::strategy::StrategyKind,
        /// Strategy requested now
        requested: crate::strategy::StrategyKind,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTriple { triple } => {
                write!(f, "invalid target triple: {triple:?}")
            }
            ConfigError::InvalidLogLevel { value } => {
                write!(f, "invalid log level: {value:?}")
            }
            ConfigError::StrategyConflict { active, requested } => {
                write!(
                    f,
                    "Objective-C strategy already initialised as {active}, cannot switch to {requested}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// A result type for interop operations.
pub type Result<T> = std::result::Result<T, InteropError>;
