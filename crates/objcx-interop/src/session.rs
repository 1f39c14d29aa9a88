//! Interop session: one strategy, one selector table, one diagnostic sink.
//!
//! The semantic analyzer drives a [`Session`] declaration by declaration and
//! the code generator reads the result through [`Session::emission`].
//!
//! # Examples
//!
//! ```
//! use objcx_ast::{Ast, ClassDecl, ClassKind, FuncDecl, Linkage, Span};
//! use objcx_interop::{Session, Target};
//!
//! let target = Target::from_triple("aarch64-apple-darwin").unwrap();
//! let mut session = Session::for_target(&target);
//! let mut ast = Ast::new();
//! let scope = ast.new_scope(None);
//!
//! let name = ast.intern("Counter");
//! let counter = ast.add_class(ClassDecl::new(name, ClassKind::Class, Span::SYNTHESIZED));
//! let count = ast.intern("count");
//! ast.add_method(
//!     counter,
//!     FuncDecl::new(count, vec![], Span::SYNTHESIZED).with_linkage(Linkage::Objc),
//! );
//!
//! session.process_class(&mut ast, counter, scope).unwrap();
//!
//! let symbols = session.emission(&ast).unwrap();
//! assert_eq!(symbols.classes[0].symbol, "OBJC_CLASS_$_Counter");
//! assert_eq!(symbols.classes[0].instance_methods[0].selector, "count");
//! ```

use crate::emit::ModuleSymbols;
use crate::error::{ConfigError, InteropError, Result};
use crate::selector::SelectorTable;
use crate::strategy::{self, Context, Objc, ParamRef, StrategyKind, SymbolSource};
use crate::target::{SessionConfig, Target};
use objcx_ast::{
    Ast, AttribId, ClassId, ClassKind, DiagnosticSink, Diagnostics, FuncId, ScopeId, Selector,
};

/// Interop state of one compilation.
pub struct Session<S = Diagnostics> {
    strategy: &'static dyn Objc,
    selectors: SelectorTable,
    sink: S,
    aborted: bool,
}

impl Session<Diagnostics> {
    /// A session for `target` collecting diagnostics in memory.
    #[must_use]
    pub fn for_target(target: &Target) -> Self {
        Self::new(target, Diagnostics::new())
    }
}

impl<S: DiagnosticSink> Session<S> {
    /// A session for `target` reporting into `sink`.
    ///
    /// The strategy is chosen from the target alone and does not consult the
    /// process-wide choice made by [`strategy::init`].
    pub fn new(target: &Target, sink: S) -> Self {
        Self::with_strategy(strategy::select(target), sink)
    }

    /// A session using an explicit strategy.
    pub fn with_strategy(strategy: &'static dyn Objc, sink: S) -> Self {
        objcx_log::debug!("new interop session ({})", strategy.kind());
        Self {
            strategy,
            selectors: SelectorTable::new(),
            sink,
            aborted: false,
        }
    }

    /// A session using the process-wide strategy, initialising it from
    /// `config` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::StrategyConflict`] if the process already runs
    /// with the other strategy.
    pub fn from_config(config: &SessionConfig, sink: S) -> std::result::Result<Self, ConfigError> {
        config.apply_logging();
        let strategy = strategy::init(&config.target)?;
        Ok(Self::with_strategy(strategy, sink))
    }

    /// Which strategy this session uses.
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// True once a fatal error was reported.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// The selector table.
    #[must_use]
    pub fn selectors(&self) -> &SelectorTable {
        &self.selectors
    }

    /// The diagnostic sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the session, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn context<'a>(&'a mut self, ast: &'a mut Ast) -> Result<Context<'a>> {
        if self.aborted {
            return Err(InteropError::SessionAborted);
        }
        Ok(Context::new(
            ast,
            &mut self.selectors,
            &mut self.sink,
            &mut self.aborted,
        ))
    }

    /// Interns a selector, `None` under the inert strategy.
    ///
    /// # Errors
    ///
    /// Returns [`InteropError::SessionAborted`] after a fatal error.
    pub fn intern_selector(
        &mut self,
        ast: &mut Ast,
        name: &str,
        param_count: usize,
    ) -> Result<Option<Selector>> {
        let strategy = self.strategy;
        let mut cx = self.context(ast)?;
        Ok(strategy.intern_selector(&mut cx, name, param_count))
    }

    /// Marks `class` as an Objective-C class.
    ///
    /// # Errors
    ///
    /// [`DuplicateAnnotation`](InteropError::DuplicateAnnotation) or
    /// [`UnsupportedBase`](InteropError::UnsupportedBase), already reported.
    pub fn set_objc_class(&mut self, ast: &mut Ast, class: ClassId) -> Result<()> {
        let strategy = self.strategy;
        strategy.set_objc_class(&mut self.context(ast)?, class)
    }

    /// Marks `interface` as an Objective-C protocol.
    ///
    /// # Errors
    ///
    /// Same as [`set_objc_class`](Self::set_objc_class).
    pub fn set_objc_interface(&mut self, ast: &mut Ast, interface: ClassId) -> Result<()> {
        let strategy = self.strategy;
        strategy.set_objc_interface(&mut self.context(ast)?, interface)
    }

    /// Assigns `func`'s selector, resolving named constants through `scope`.
    ///
    /// # Errors
    ///
    /// [`InvalidSelectorSyntax`](InteropError::InvalidSelectorSyntax) or
    /// [`MultipleSelectors`](InteropError::MultipleSelectors), already
    /// reported.
    pub fn set_selector(
        &mut self,
        ast: &mut Ast,
        func: FuncId,
        scope: ScopeId,
    ) -> Result<Option<Selector>> {
        let strategy = self.strategy;
        strategy.set_selector(&mut self.context(ast)?, func, scope)
    }

    /// Checks `func`'s selector against its arity and aggregate.
    ///
    /// # Errors
    ///
    /// [`SelectorArityMismatch`](InteropError::SelectorArityMismatch),
    /// [`SelectorOnNonInteropType`](InteropError::SelectorOnNonInteropType)
    /// or [`SelectorOnTemplate`](InteropError::SelectorOnTemplate), already
    /// reported.
    pub fn validate_selector(&mut self, ast: &mut Ast, func: FuncId) -> Result<()> {
        let strategy = self.strategy;
        strategy.validate_selector(&mut self.context(ast)?, func)
    }

    /// Checks `func`'s linkage and records its dispatch.
    ///
    /// # Errors
    ///
    /// [`LinkageConflict`](InteropError::LinkageConflict), already reported.
    pub fn check_linkage(&mut self, ast: &mut Ast, func: FuncId) -> Result<()> {
        let strategy = self.strategy;
        strategy.check_linkage(&mut self.context(ast)?, func)
    }

    /// True iff calls to `func` are message sends.
    #[must_use]
    pub fn is_virtual(&self, ast: &Ast, func: FuncId) -> bool {
        self.strategy.is_virtual(ast, func)
    }

    /// Nearest class from `class` up already declaring `func`'s selector.
    #[must_use]
    pub fn get_parent(&self, ast: &Ast, func: FuncId, class: ClassId) -> Option<ClassId> {
        self.strategy.get_parent(ast, func, class)
    }

    /// Receiver type of `func`.
    #[must_use]
    pub fn is_this(&self, ast: &Ast, func: FuncId) -> Option<ClassId> {
        self.strategy.is_this(ast, func)
    }

    /// Appends `func` to `class`'s method list.
    ///
    /// # Errors
    ///
    /// [`SelectorCollision`](InteropError::SelectorCollision), already
    /// reported.
    pub fn add_to_class_method_list(
        &mut self,
        ast: &mut Ast,
        func: FuncId,
        class: ClassId,
    ) -> Result<()> {
        let strategy = self.strategy;
        strategy.add_to_class_method_list(&mut self.context(ast)?, func, class)
    }

    /// Appends methods contributed by a class body or group, returning how
    /// many entries were added.
    ///
    /// # Errors
    ///
    /// Only [`SessionAborted`](InteropError::SessionAborted); per-member
    /// failures are reported and skipped.
    pub fn add_symbols(
        &mut self,
        ast: &mut Ast,
        source: SymbolSource,
        instance_methods: &[FuncId],
        class_methods: &[FuncId],
    ) -> Result<usize> {
        let strategy = self.strategy;
        let mut cx = self.context(ast)?;
        Ok(strategy.add_symbols(&mut cx, source, instance_methods, class_methods))
    }

    /// Appends the members of a declaration group, split by side.
    ///
    /// # Errors
    ///
    /// Same as [`add_symbols`](Self::add_symbols).
    pub fn add_group(&mut self, ast: &mut Ast, group: AttribId) -> Result<usize> {
        let (class_side, instance_side): (Vec<FuncId>, Vec<FuncId>) = ast.attribs[group]
            .members
            .iter()
            .partition(|&&func| ast.func(func).is_static);
        self.add_symbols(ast, SymbolSource::Group(group), &instance_side, &class_side)
    }

    /// Adds the hidden `_cmd` parameter to `func` and declares it in `scope`.
    ///
    /// # Errors
    ///
    /// Only [`SessionAborted`](InteropError::SessionAborted).
    pub fn create_selector_parameter(
        &mut self,
        ast: &mut Ast,
        func: FuncId,
        scope: ScopeId,
    ) -> Result<Option<ParamRef>> {
        let strategy = self.strategy;
        strategy.create_selector_parameter(&mut self.context(ast)?, func, scope)
    }

    /// Links or synthesizes `class`'s metaclass.
    ///
    /// # Errors
    ///
    /// [`NotInteropType`](InteropError::NotInteropType) or
    /// [`MissingExternMetaclass`](InteropError::MissingExternMetaclass),
    /// already reported; [`BrokenInvariant`](InteropError::BrokenInvariant)
    /// aborts the session.
    pub fn set_metaclass(&mut self, ast: &mut Ast, class: ClassId, scope: ScopeId) -> Result<()> {
        let strategy = self.strategy;
        strategy.set_metaclass(&mut self.context(ast)?, class, scope)
    }

    /// The metaclass of `class`, or the root metaclass for a metaclass.
    ///
    /// # Errors
    ///
    /// [`MetaclassNotResolved`](InteropError::MetaclassNotResolved) before
    /// [`set_metaclass`](Self::set_metaclass), already reported.
    pub fn get_runtime_metaclass(&mut self, ast: &mut Ast, class: ClassId) -> Result<Option<ClassId>> {
        let strategy = self.strategy;
        strategy.get_runtime_metaclass(&mut self.context(ast)?, class)
    }

    /// Runs every method-level step on `func`: selector, validation,
    /// linkage, `_cmd` in a fresh body scope under `scope`, and the method
    /// list of `class`.
    ///
    /// # Errors
    ///
    /// The first error of any step; later steps are skipped.
    pub fn process_method(
        &mut self,
        ast: &mut Ast,
        func: FuncId,
        class: ClassId,
        scope: ScopeId,
    ) -> Result<()> {
        self.set_selector(ast, func, scope)?;
        self.validate_selector(ast, func)?;
        self.check_linkage(ast, func)?;
        let body = ast.new_scope(Some(scope));
        self.create_selector_parameter(ast, func, body)?;
        self.add_to_class_method_list(ast, func, class)
    }

    /// Marks `class` according to its kind, resolves its metaclass and
    /// processes its members in declaration order.
    ///
    /// # Errors
    ///
    /// An error marking the class or resolving its metaclass, or
    /// [`SessionAborted`](InteropError::SessionAborted). Member errors are
    /// reported against the member and do not stop the rest.
    pub fn process_class(&mut self, ast: &mut Ast, class: ClassId, scope: ScopeId) -> Result<()> {
        match ast.class(class).kind {
            ClassKind::Class => self.set_objc_class(ast, class)?,
            ClassKind::Interface => self.set_objc_interface(ast, class)?,
        }
        self.set_metaclass(ast, class, scope)?;

        let members = ast.class(class).members.clone();
        for func in members {
            if let Err(err) = self.process_method(ast, func, class, scope) {
                if self.aborted {
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Interop metadata for code generation.
    ///
    /// # Errors
    ///
    /// Returns [`InteropError::SessionAborted`] after a fatal error, so no
    /// partial metadata is ever emitted.
    pub fn emission(&self, ast: &Ast) -> Result<ModuleSymbols> {
        if self.aborted {
            return Err(InteropError::SessionAborted);
        }
        if self.kind() == StrategyKind::Inert {
            return Ok(ModuleSymbols::default());
        }
        Ok(ModuleSymbols::collect(ast, &self.selectors))
    }
}
