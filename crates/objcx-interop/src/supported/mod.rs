//! The functional strategy, used on targets with the Objective-C runtime.
//!
//! # Modules
//!
//! - [`annotate`] - Marking aggregates, selectors, linkage and `_cmd`
//! - [`metaclass`] - Class/metaclass pairing
//! - [`methods`] - Method lists and overrides

pub mod annotate;
pub mod metaclass;
pub mod methods;

use crate::error::Result;
use crate::strategy::{Context, Objc, ParamRef, StrategyKind, SymbolSource};
use objcx_ast::{Ast, ClassId, ClassKind, FuncId, ScopeId, Selector};

/// Strategy that records interop metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct Supported;

impl Objc for Supported {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Functional
    }

    fn intern_selector(
        &self,
        cx: &mut Context<'_>,
        name: &str,
        param_count: usize,
    ) -> Option<Selector> {
        Some(cx.selectors.intern(name, param_count))
    }

    fn set_objc_class(&self, cx: &mut Context<'_>, class: ClassId) -> Result<()> {
        annotate::mark(cx, class, ClassKind::Class)
    }

    fn set_objc_interface(&self, cx: &mut Context<'_>, interface: ClassId) -> Result<()> {
        annotate::mark(cx, interface, ClassKind::Interface)
    }

    fn set_selector(
        &self,
        cx: &mut Context<'_>,
        func: FuncId,
        scope: ScopeId,
    ) -> Result<Option<Selector>> {
        annotate::set_selector(cx, func, scope)
    }

    fn validate_selector(&self, cx: &mut Context<'_>, func: FuncId) -> Result<()> {
        annotate::validate_selector(cx, func)
    }

    fn check_linkage(&self, cx: &mut Context<'_>, func: FuncId) -> Result<()> {
        annotate::check_linkage(cx, func)
    }

    fn is_virtual(&self, ast: &Ast, func: FuncId) -> bool {
        annotate::is_virtual(ast, func)
    }

    fn get_parent(&self, ast: &Ast, func: FuncId, class: ClassId) -> Option<ClassId> {
        methods::get_parent(ast, func, class)
    }

    fn add_to_class_method_list(
        &self,
        cx: &mut Context<'_>,
        func: FuncId,
        class: ClassId,
    ) -> Result<()> {
        methods::add_to_class_method_list(cx, func, class)
    }

    fn is_this(&self, ast: &Ast, func: FuncId) -> Option<ClassId> {
        annotate::is_this(ast, func)
    }

    fn create_selector_parameter(
        &self,
        cx: &mut Context<'_>,
        func: FuncId,
        scope: ScopeId,
    ) -> Result<Option<ParamRef>> {
        annotate::create_selector_parameter(cx, func, scope)
    }

    fn set_metaclass(&self, cx: &mut Context<'_>, class: ClassId, scope: ScopeId) -> Result<()> {
        metaclass::set_metaclass(cx, class, scope)
    }

    fn get_runtime_metaclass(
        &self,
        cx: &mut Context<'_>,
        class: ClassId,
    ) -> Result<Option<ClassId>> {
        metaclass::get_runtime_metaclass(cx, class)
    }

    fn add_symbols(
        &self,
        cx: &mut Context<'_>,
        source: SymbolSource,
        instance_methods: &[FuncId],
        class_methods: &[FuncId],
    ) -> usize {
        methods::add_symbols(cx, source, instance_methods, class_methods)
    }
}
