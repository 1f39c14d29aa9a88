//! The interop capability interface and its process-wide selection.
//!
//! Every interop operation goes through [`Objc`]. There are two
//! implementations: [`Supported`](crate::Supported) does the work and
//! [`Unsupported`](crate::Unsupported) accepts every call and records
//! nothing, for targets without the Objective-C runtime. Which one applies
//! is decided once from the [`Target`].

use crate::error::{ConfigError, InteropError, Result};
use crate::selector::SelectorTable;
use crate::supported::Supported;
use crate::target::Target;
use crate::unsupported::Unsupported;
use objcx_ast::{
    Ast, AttribId, ClassId, DiagnosticBuilder, DiagnosticLevel, DiagnosticSink, Dispatch, FuncId,
    ScopeId, Selector,
};
use std::fmt;
use std::sync::OnceLock;

/// Which strategy is in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// The runtime is available; operations take effect
    Functional,
    /// No runtime; operations are accepted and ignored
    Inert,
}

impl StrategyKind {
    /// The strategy `target` calls for.
    #[must_use]
    pub const fn for_target(target: &Target) -> Self {
        if target.supports_objc() {
            StrategyKind::Functional
        } else {
            StrategyKind::Inert
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Functional => write!(f, "functional"),
            StrategyKind::Inert => write!(f, "inert"),
        }
    }
}

/// The declaration a reported error is charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Culprit {
    /// A class, interface or metaclass
    Class(ClassId),
    /// A function
    Func(FuncId),
}

impl From<ClassId> for Culprit {
    fn from(id: ClassId) -> Self {
        Culprit::Class(id)
    }
}

impl From<FuncId> for Culprit {
    fn from(id: FuncId) -> Self {
        Culprit::Func(id)
    }
}

/// A reference to one parameter of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamRef {
    /// Owning function
    pub func: FuncId,
    /// Position in its parameter list
    pub index: usize,
}

/// Where symbols handed to [`Objc::add_symbols`] come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolSource {
    /// The class body itself
    Class(ClassId),
    /// A declaration group targeting a class
    Group(AttribId),
}

/// Mutable state one interop operation works against.
pub struct Context<'a> {
    /// Declarations being annotated
    pub ast: &'a mut Ast,
    /// Session selector table
    pub selectors: &'a mut SelectorTable,
    sink: &'a mut dyn DiagnosticSink,
    aborted: &'a mut bool,
}

impl<'a> Context<'a> {
    /// Bundles the state of one session.
    pub fn new(
        ast: &'a mut Ast,
        selectors: &'a mut SelectorTable,
        sink: &'a mut dyn DiagnosticSink,
        aborted: &'a mut bool,
    ) -> Self {
        Self {
            ast,
            selectors,
            sink,
            aborted,
        }
    }

    /// Reports a recoverable error, marks `culprit` invalid and returns the
    /// error.
    ///
    /// # Errors
    ///
    /// Always returns `Err(err)`.
    pub fn reject<T>(&mut self, culprit: impl Into<Culprit>, err: InteropError) -> Result<T> {
        match culprit.into() {
            Culprit::Class(id) => self.ast.class_mut(id).invalid = true,
            Culprit::Func(id) => {
                let func = self.ast.func_mut(id);
                func.invalid = true;
                if let Some(info) = func.objc.as_mut() {
                    info.dispatch = Dispatch::Unsupported;
                }
            }
        }
        objcx_log::debug!("rejected: {err}");
        self.report(&err);
        Err(err)
    }

    /// Reports a recoverable error without charging it to a declaration.
    ///
    /// Used when the request is wrong but the declarations involved are
    /// still sound.
    ///
    /// # Errors
    ///
    /// Always returns `Err(err)`.
    pub fn refuse<T>(&mut self, err: InteropError) -> Result<T> {
        objcx_log::debug!("refused: {err}");
        self.report(&err);
        Err(err)
    }

    /// Reports a fatal error and aborts the session.
    ///
    /// # Errors
    ///
    /// Always returns `Err(err)`.
    pub fn fatal<T>(&mut self, err: InteropError) -> Result<T> {
        *self.aborted = true;
        objcx_log::error!("{err} at {}", err.span());
        self.report(&err);
        Err(err)
    }

    fn report(&mut self, err: &InteropError) {
        let mut builder = DiagnosticBuilder::new(DiagnosticLevel::Error, err.to_string(), err.span())
            .code(err.code());
        if let Some(previous) = err.related_span() {
            builder = builder.note("previously declared here", previous);
        }
        self.sink.report(builder.build());
    }
}

/// Objective-C interop operations.
///
/// Methods taking a [`Context`] may annotate the AST and report; the rest
/// are pure queries. Errors returned by a `Context` method have already been
/// reported.
pub trait Objc: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Interns `(name, param_count)`, or `None` when inert.
    fn intern_selector(
        &self,
        cx: &mut Context<'_>,
        name: &str,
        param_count: usize,
    ) -> Option<Selector>;

    /// Marks a class declaration as an Objective-C class.
    fn set_objc_class(&self, cx: &mut Context<'_>, class: ClassId) -> Result<()>;

    /// Marks an interface declaration as an Objective-C protocol.
    fn set_objc_interface(&self, cx: &mut Context<'_>, interface: ClassId) -> Result<()>;

    /// Assigns the written or derived selector; `None` if the function gets
    /// none.
    fn set_selector(
        &self,
        cx: &mut Context<'_>,
        func: FuncId,
        scope: ScopeId,
    ) -> Result<Option<Selector>>;

    /// Checks an assigned selector against its function.
    fn validate_selector(&self, cx: &mut Context<'_>, func: FuncId) -> Result<()>;

    /// Checks that the declared linkage can carry the function's dispatch.
    fn check_linkage(&self, cx: &mut Context<'_>, func: FuncId) -> Result<()>;

    /// True iff calls to `func` go through the runtime's message send.
    fn is_virtual(&self, ast: &Ast, func: FuncId) -> bool;

    /// Nearest class, starting at `class`, whose own method list holds
    /// `func`'s selector on the same side; `class` if none does.
    fn get_parent(&self, ast: &Ast, func: FuncId, class: ClassId) -> Option<ClassId>;

    /// Appends `func` to `class`'s method list.
    fn add_to_class_method_list(
        &self,
        cx: &mut Context<'_>,
        func: FuncId,
        class: ClassId,
    ) -> Result<()>;

    /// The receiver type of `func`.
    fn is_this(&self, ast: &Ast, func: FuncId) -> Option<ClassId>;

    /// Adds the hidden `_cmd` parameter and declares it in `scope`.
    fn create_selector_parameter(
        &self,
        cx: &mut Context<'_>,
        func: FuncId,
        scope: ScopeId,
    ) -> Result<Option<ParamRef>>;

    /// Links or synthesizes the metaclass of `class`.
    fn set_metaclass(&self, cx: &mut Context<'_>, class: ClassId, scope: ScopeId) -> Result<()>;

    /// The metaclass of a class; the root metaclass for a metaclass.
    fn get_runtime_metaclass(&self, cx: &mut Context<'_>, class: ClassId)
    -> Result<Option<ClassId>>;

    /// Appends methods contributed by a class body or group and returns how
    /// many entries were added.
    fn add_symbols(
        &self,
        cx: &mut Context<'_>,
        source: SymbolSource,
        instance_methods: &[FuncId],
        class_methods: &[FuncId],
    ) -> usize;
}

static SUPPORTED: Supported = Supported;
static UNSUPPORTED: Unsupported = Unsupported;
static ACTIVE: OnceLock<StrategyKind> = OnceLock::new();

/// The strategy instance for `kind`.
#[must_use]
pub fn strategy_for(kind: StrategyKind) -> &'static dyn Objc {
    match kind {
        StrategyKind::Functional => &SUPPORTED,
        StrategyKind::Inert => &UNSUPPORTED,
    }
}

/// The strategy `target` calls for, without touching the process-wide
/// choice.
#[must_use]
pub fn select(target: &Target) -> &'static dyn Objc {
    strategy_for(StrategyKind::for_target(target))
}

/// Records the process-wide strategy for `target`.
///
/// The first call decides; later calls succeed only if they ask for the
/// same strategy.
///
/// # Errors
///
/// Returns [`ConfigError::StrategyConflict`] if a different strategy is
/// already in force.
pub fn init(target: &Target) -> std::result::Result<&'static dyn Objc, ConfigError> {
    let requested = StrategyKind::for_target(target);
    let active = *ACTIVE.get_or_init(|| {
        objcx_log::info!("Objective-C strategy for {target}: {requested}");
        requested
    });
    if active != requested {
        return Err(ConfigError::StrategyConflict { active, requested });
    }
    Ok(strategy_for(active))
}

/// The process-wide strategy, if [`init`] has run.
#[must_use]
pub fn active() -> Option<&'static dyn Objc> {
    ACTIVE.get().map(|kind| strategy_for(*kind))
}
