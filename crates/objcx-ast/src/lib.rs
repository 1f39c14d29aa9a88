//! `objcx` declaration model.
//!
//! This crate holds what the interop resolver consumes from the rest of the
//! compiler: declaration nodes with their annotation slots, lexical scopes,
//! source spans and the diagnostic sink.
//!
//! # Modules
//!
//! - [`span`] - Source location tracking
//! - [`decl`] - Class, interface, function and group declarations
//! - [`scope`] - Lexical scopes
//! - [`objc`] - Interop annotation slots
//! - [`diagnostic`] - Diagnostics and sinks
//!
//! # Example
//!
//! ```
//! use objcx_ast::{Ast, ClassDecl, ClassKind, FuncDecl, Span};
//!
//! let mut ast = Ast::new();
//! let name = ast.intern("Foo");
//! let foo = ast.add_class(ClassDecl::new(name, ClassKind::Class, Span::new(0, 3, 1, 1)));
//!
//! let bar = ast.intern("bar");
//! let method = ast.add_method(foo, FuncDecl::new(bar, vec![], Span::new(10, 13, 2, 5)));
//!
//! assert_eq!(ast.func(method).parent, Some(foo));
//! assert_eq!(ast.class(foo).members, vec![method]);
//! ```

#![warn(missing_docs)]

pub mod decl;
pub mod diagnostic;
pub mod objc;
pub mod scope;
pub mod span;

pub use decl::{
    AttribDecl, AttribId, AttribKind, ClassDecl, ClassId, ClassKind, FuncDecl, FuncId, Linkage,
    Param, ParamType, SelectorAttr, SelectorValue, Visibility,
};
pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticLevel, DiagnosticSink, Diagnostics};
pub use objc::{Dispatch, MethodListEntry, ObjcClassInfo, ObjcFuncInfo, ObjcRole, Selector};
pub use scope::{Redeclared, Scope, ScopeEntry, ScopeId};
pub use span::{Span, Spanned};

use objcx_mem::{Arena, StringInterner, Symbol};

/// All declarations of one compilation, plus the identifier interner.
#[derive(Default)]
pub struct Ast {
    /// Identifier and selector text
    pub interner: StringInterner,
    /// Class and interface declarations (including synthesized metaclasses)
    pub classes: Arena<ClassDecl>,
    /// Function declarations
    pub funcs: Arena<FuncDecl>,
    /// Declaration groups
    pub attribs: Arena<AttribDecl>,
    /// Lexical scopes
    pub scopes: Arena<Scope>,
}

impl Ast {
    /// Creates an empty AST.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns an identifier.
    pub fn intern(&mut self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    /// Text of an interned identifier, `"<anonymous>"` for foreign symbols.
    #[must_use]
    pub fn name(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym).unwrap_or("<anonymous>")
    }

    /// Adds a class or interface declaration.
    pub fn add_class(&mut self, decl: ClassDecl) -> ClassId {
        self.classes.alloc(decl)
    }

    /// Adds a free function.
    pub fn add_function(&mut self, decl: FuncDecl) -> FuncId {
        self.funcs.alloc(decl)
    }

    /// Adds `decl` as a member of `class`, appending it to the member list.
    pub fn add_method(&mut self, class: ClassId, mut decl: FuncDecl) -> FuncId {
        decl.parent = Some(class);
        let id = self.funcs.alloc(decl);
        self.classes[class].members.push(id);
        id
    }

    /// Adds a declaration group.
    pub fn add_attrib(&mut self, decl: AttribDecl) -> AttribId {
        self.attribs.alloc(decl)
    }

    /// Adds a member function to a group. The function's parent is the
    /// group's target class, but it is not added to the class's own member
    /// list.
    pub fn add_group_member(&mut self, group: AttribId, mut decl: FuncDecl) -> FuncId {
        decl.parent = Some(self.attribs[group].target);
        let id = self.funcs.alloc(decl);
        self.attribs[group].members.push(id);
        id
    }

    /// Creates a scope nested in `parent`.
    pub fn new_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.scopes.alloc(Scope::new(parent))
    }

    /// Looks `name` up from `scope` outward.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: Symbol) -> Option<&ScopeEntry> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scopes.get(id)?;
            if let Some(entry) = scope.local(name) {
                return Some(entry);
            }
            current = scope.parent();
        }
        None
    }

    /// Class declaration by index.
    #[must_use]
    pub fn class(&self, id: ClassId) -> &ClassDecl {
        &self.classes[id]
    }

    /// Class declaration by index, mutably.
    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassDecl {
        &mut self.classes[id]
    }

    /// Function declaration by index.
    #[must_use]
    pub fn func(&self, id: FuncId) -> &FuncDecl {
        &self.funcs[id]
    }

    /// Function declaration by index, mutably.
    pub fn func_mut(&mut self, id: FuncId) -> &mut FuncDecl {
        &mut self.funcs[id]
    }

    /// Name of a class declaration.
    #[must_use]
    pub fn class_name(&self, id: ClassId) -> &str {
        self.name(self.classes[id].name)
    }

    /// Name of a function declaration.
    #[must_use]
    pub fn func_name(&self, id: FuncId) -> &str {
        self.name(self.funcs[id].name)
    }
}
