//! Declaration nodes.
//!
//! Only the parts of class, interface and function declarations that the
//! interop resolver reads or annotates are modelled here. Declarations live
//! in the arenas of an [`Ast`](crate::Ast) and refer to each other by index.

use crate::objc::{ObjcClassInfo, ObjcFuncInfo};
use crate::span::{Span, Spanned};
use objcx_mem::{Idx, Symbol};

/// Index of a class or interface declaration.
pub type ClassId = Idx<ClassDecl>;
/// Index of a function declaration.
pub type FuncId = Idx<FuncDecl>;
/// Index of a declaration group.
pub type AttribId = Idx<AttribDecl>;

/// Whether an aggregate is a class or an interface (protocol).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// Concrete class with instances
    Class,
    /// Interface; only method requirements
    Interface,
}

/// Declared linkage / calling convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Linkage {
    /// The source language's own convention
    #[default]
    Native,
    /// `extern(Objective-C)`: bound through the foreign object runtime
    Objc,
    /// `extern(C)`: foreign, statically linked, never dispatched
    C,
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible everywhere
    #[default]
    Public,
    /// Visible inside the defining module only
    Package,
    /// Visible inside the defining aggregate only
    Private,
}

/// Type of a parameter, as far as the interop layer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Any source-level type, by name
    Named(Symbol),
    /// The runtime selector type (`SEL`)
    Selector,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Internal name
    pub name: Symbol,
    /// External label (the selector segment for this argument)
    pub label: Option<Symbol>,
    /// Parameter type
    pub ty: ParamType,
    /// True for parameters the compiler adds (e.g. `_cmd`)
    pub implicit: bool,
    /// Source location
    pub span: Span,
}

impl Param {
    /// A user-written parameter.
    #[must_use]
    pub fn new(name: Symbol, label: Option<Symbol>, ty: ParamType, span: Span) -> Self {
        Self {
            name,
            label,
            ty,
            implicit: false,
            span,
        }
    }
}

/// Value of a selector attribute: `@selector("text")` or
/// `@selector(CONSTANT)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorValue {
    /// Selector text written inline
    Literal(String),
    /// Name of a string constant resolved through the scope
    Constant(Symbol),
}

/// A user-specified selector attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorAttr {
    /// Attribute argument
    pub value: SelectorValue,
    /// Source location
    pub span: Span,
}

/// A class or interface declaration.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    /// Declared name
    pub name: Symbol,
    /// Class or interface
    pub kind: ClassKind,
    /// Base class
    pub base: Option<ClassId>,
    /// Implemented (or, for interfaces, inherited) interfaces
    pub interfaces: Vec<ClassId>,
    /// Declared linkage
    pub linkage: Linkage,
    /// Defined in a foreign header rather than in this compilation
    pub is_extern: bool,
    /// Metaclass declared by the foreign header, for extern classes
    pub extern_metaclass: Option<ClassId>,
    /// Created by the compiler (e.g. a metaclass)
    pub synthesized: bool,
    /// Member functions in declaration order
    pub members: Vec<FuncId>,
    /// Source location
    pub span: Span,
    /// Set once an error has been reported against this declaration
    pub invalid: bool,
    /// Interop annotation slot
    pub objc: Option<ObjcClassInfo>,
}

impl ClassDecl {
    /// A native-linkage declaration with no bases and no members.
    #[must_use]
    pub fn new(name: Symbol, kind: ClassKind, span: Span) -> Self {
        Self {
            name,
            kind,
            base: None,
            interfaces: Vec::new(),
            linkage: Linkage::Native,
            is_extern: false,
            extern_metaclass: None,
            synthesized: false,
            members: Vec::new(),
            span,
            invalid: false,
            objc: None,
        }
    }

    /// Sets the base class.
    #[must_use]
    pub fn with_base(mut self, base: ClassId) -> Self {
        self.base = Some(base);
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn with_interface(mut self, interface: ClassId) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Sets the linkage.
    #[must_use]
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Marks the declaration as coming from a foreign header, optionally
    /// with the metaclass that header declares.
    #[must_use]
    pub fn external(mut self, metaclass: Option<ClassId>) -> Self {
        self.is_extern = true;
        self.extern_metaclass = metaclass;
        self
    }

    /// True for interfaces.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// True once the declaration carries interop metadata.
    #[must_use]
    pub fn is_objc(&self) -> bool {
        self.objc.is_some()
    }
}

impl Spanned for ClassDecl {
    fn span(&self) -> Span {
        self.span
    }
}

/// A function declaration (free function or member).
#[derive(Debug, Clone)]
pub struct FuncDecl {
    /// Declared name
    pub name: Symbol,
    /// Parameters, including any implicit ones added later
    pub params: Vec<Param>,
    /// Enclosing aggregate, `None` for free functions
    pub parent: Option<ClassId>,
    /// Declared linkage
    pub linkage: Linkage,
    /// Static member (class-side method for interop classes)
    pub is_static: bool,
    /// Cannot be overridden
    pub is_final: bool,
    /// Property accessor
    pub is_property: bool,
    /// Template (generic) function
    pub is_template: bool,
    /// Visibility
    pub visibility: Visibility,
    /// Selector attributes as written
    pub selector_attrs: Vec<SelectorAttr>,
    /// Source location
    pub span: Span,
    /// Set once an error has been reported against this declaration
    pub invalid: bool,
    /// Interop annotation slot
    pub objc: Option<ObjcFuncInfo>,
}

impl FuncDecl {
    /// A public, native-linkage function with the given parameters.
    #[must_use]
    pub fn new(name: Symbol, params: Vec<Param>, span: Span) -> Self {
        Self {
            name,
            params,
            parent: None,
            linkage: Linkage::Native,
            is_static: false,
            is_final: false,
            is_property: false,
            is_template: false,
            visibility: Visibility::Public,
            selector_attrs: Vec::new(),
            span,
            invalid: false,
            objc: None,
        }
    }

    /// Sets the linkage.
    #[must_use]
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Adds a literal selector attribute.
    #[must_use]
    pub fn with_selector(mut self, text: &str, span: Span) -> Self {
        self.selector_attrs.push(SelectorAttr {
            value: SelectorValue::Literal(text.to_string()),
            span,
        });
        self
    }

    /// Adds a selector attribute naming a string constant.
    #[must_use]
    pub fn with_selector_constant(mut self, name: Symbol, span: Span) -> Self {
        self.selector_attrs.push(SelectorAttr {
            value: SelectorValue::Constant(name),
            span,
        });
        self
    }

    /// Makes the function a static (class-side) member.
    #[must_use]
    pub fn class_side(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Non-implicit parameters, in order.
    pub fn explicit_params(&self) -> impl Iterator<Item = &Param> + '_ {
        self.params.iter().filter(|p| !p.implicit)
    }

    /// Number of non-implicit parameters.
    #[must_use]
    pub fn explicit_param_count(&self) -> usize {
        self.explicit_params().count()
    }

    /// Assigned selector, if any.
    #[must_use]
    pub fn selector(&self) -> Option<crate::objc::Selector> {
        self.objc.and_then(|info| info.selector)
    }
}

impl Spanned for FuncDecl {
    fn span(&self) -> Span {
        self.span
    }
}

/// What kind of grouping an [`AttribDecl`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttribKind {
    /// Conditionally compiled block; `enabled` is the evaluated condition
    Conditional {
        /// Whether the branch is compiled in
        enabled: bool,
    },
    /// Category / extension adding methods to an existing class
    Category {
        /// Category name
        name: Symbol,
    },
}

/// A group of member declarations contributed together.
#[derive(Debug, Clone)]
pub struct AttribDecl {
    /// Kind of group
    pub kind: AttribKind,
    /// Class receiving the members
    pub target: ClassId,
    /// Member functions in declaration order
    pub members: Vec<FuncId>,
    /// Source location
    pub span: Span,
}

impl AttribDecl {
    /// True unless this is a disabled conditional block.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.kind, AttribKind::Conditional { enabled: false })
    }
}

impl Spanned for AttribDecl {
    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_params_skip_implicit() {
        let span = Span::SYNTHESIZED;
        let mut func = FuncDecl::new(
            Symbol::new(10),
            vec![
                Param::new(Symbol::new(11), None, ParamType::Named(Symbol::new(12)), span),
                Param::new(Symbol::new(13), Some(Symbol::new(14)), ParamType::Named(Symbol::new(12)), span),
            ],
            span,
        );
        func.params.push(Param {
            implicit: true,
            ..Param::new(Symbol::new(0), None, ParamType::Selector, span)
        });

        assert_eq!(func.params.len(), 3);
        assert_eq!(func.explicit_param_count(), 2);
    }

    #[test]
    fn test_builders() {
        let span = Span::new(0, 3, 1, 1);
        let func = FuncDecl::new(Symbol::new(1), vec![], span)
            .with_linkage(Linkage::Objc)
            .with_selector("init", span)
            .class_side();

        assert_eq!(func.linkage, Linkage::Objc);
        assert!(func.is_static);
        assert_eq!(func.selector_attrs.len(), 1);
        assert!(func.selector().is_none());

        let class = ClassDecl::new(Symbol::new(2), ClassKind::Class, span).external(None);
        assert!(class.is_extern);
        assert!(!class.is_objc());
    }

    #[test]
    fn test_attrib_activity() {
        let target = ClassId::from_raw(0);
        let span = Span::SYNTHESIZED;
        let off = AttribDecl {
            kind: AttribKind::Conditional { enabled: false },
            target,
            members: vec![],
            span,
        };
        let category = AttribDecl {
            kind: AttribKind::Category { name: Symbol::new(3) },
            target,
            members: vec![],
            span,
        };

        assert!(!off.is_active());
        assert!(category.is_active());
    }
}
