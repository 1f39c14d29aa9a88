// Shared fixtures for the interop integration tests.

#![allow(dead_code)]

use objcx_ast::{
    Ast, ClassDecl, ClassId, ClassKind, FuncDecl, FuncId, Linkage, Param, ParamType, ScopeId, Span,
};
use objcx_interop::{Arch, Os, Session, Target};

pub fn apple() -> Target {
    Target::new(Arch::Aarch64, Os::MacOs)
}

pub fn linux() -> Target {
    Target::new(Arch::X86_64, Os::Linux)
}

/// An AST, a root scope and a session over them.
pub struct Fixture {
    pub ast: Ast,
    pub scope: ScopeId,
    pub session: Session,
    next_line: usize,
}

impl Fixture {
    pub fn new(target: &Target) -> Self {
        let mut ast = Ast::new();
        let scope = ast.new_scope(None);
        Self {
            ast,
            scope,
            session: Session::for_target(target),
            next_line: 1,
        }
    }

    pub fn apple() -> Self {
        Self::new(&apple())
    }

    pub fn linux() -> Self {
        Self::new(&linux())
    }

    /// A fresh span on its own line, so diagnostics can be told apart.
    pub fn span(&mut self) -> Span {
        let line = self.next_line;
        self.next_line += 1;
        Span::new(line * 100, line * 100 + 10, line, 1)
    }

    pub fn class(&mut self, name: &str) -> ClassId {
        let span = self.span();
        let name = self.ast.intern(name);
        self.ast
            .add_class(ClassDecl::new(name, ClassKind::Class, span).with_linkage(Linkage::Objc))
    }

    pub fn subclass(&mut self, name: &str, base: ClassId) -> ClassId {
        let span = self.span();
        let name = self.ast.intern(name);
        self.ast.add_class(
            ClassDecl::new(name, ClassKind::Class, span)
                .with_base(base)
                .with_linkage(Linkage::Objc),
        )
    }

    pub fn interface(&mut self, name: &str) -> ClassId {
        let span = self.span();
        let name = self.ast.intern(name);
        self.ast.add_class(
            ClassDecl::new(name, ClassKind::Interface, span).with_linkage(Linkage::Objc),
        )
    }

    /// Creates and marks an Objective-C class with a resolved metaclass.
    pub fn objc_class(&mut self, name: &str, base: Option<ClassId>) -> ClassId {
        let class = match base {
            Some(base) => self.subclass(name, base),
            None => self.class(name),
        };
        self.session.set_objc_class(&mut self.ast, class).unwrap();
        self.session
            .set_metaclass(&mut self.ast, class, self.scope)
            .unwrap();
        class
    }

    /// Parameters named `arg0..`, the first unlabelled, the rest labelled
    /// as given.
    pub fn params(&mut self, labels: &[&str]) -> Vec<Param> {
        let ty = ParamType::Named(self.ast.intern("id"));
        let span = self.span();
        let mut params = Vec::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            let name = self.ast.intern(&format!("arg{i}"));
            let label = (i > 0 && !label.is_empty()).then(|| self.ast.intern(label));
            params.push(Param::new(name, label, ty, span));
        }
        params
    }

    /// An Objective-C linkage method of `class` whose selector is derived.
    pub fn method(&mut self, class: ClassId, name: &str, labels: &[&str]) -> FuncId {
        let span = self.span();
        let params = self.params(labels);
        let name = self.ast.intern(name);
        self.ast.add_method(
            class,
            FuncDecl::new(name, params, span).with_linkage(Linkage::Objc),
        )
    }

    /// An Objective-C linkage method of `class` with `arity` parameters and
    /// an explicit selector.
    pub fn method_with_selector(
        &mut self,
        class: ClassId,
        name: &str,
        arity: usize,
        selector: &str,
    ) -> FuncId {
        let span = self.span();
        let labels = vec![""; arity];
        let params = self.params(&labels);
        let name = self.ast.intern(name);
        self.ast.add_method(
            class,
            FuncDecl::new(name, params, span)
                .with_linkage(Linkage::Objc)
                .with_selector(selector, span),
        )
    }

    /// Runs the method pipeline on `func` as a member of `class`.
    pub fn process(&mut self, func: FuncId, class: ClassId) -> objcx_interop::Result<()> {
        self.session
            .process_method(&mut self.ast, func, class, self.scope)
    }

    pub fn selector_text(&self, func: FuncId) -> Option<&str> {
        let sel = self.ast.func(func).selector()?;
        Some(self.session.selectors().name(sel))
    }

    /// Diagnostic codes in report order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.session
            .sink()
            .iter()
            .filter_map(|diagnostic| diagnostic.code)
            .collect()
    }

    /// Functions of `class`'s method list on one side, in order.
    pub fn method_list(&self, class: ClassId, class_side: bool) -> Vec<FuncId> {
        self.ast
            .class(class)
            .objc
            .as_ref()
            .map(|info| {
                info.methods()
                    .iter()
                    .filter(|entry| entry.is_class_method == class_side)
                    .map(|entry| entry.func)
                    .collect()
            })
            .unwrap_or_default()
    }
}
