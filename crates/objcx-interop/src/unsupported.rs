//! The inert strategy, for targets without the Objective-C runtime.
//!
//! Every operation succeeds without touching the AST, the selector table or
//! the diagnostic sink.

use crate::error::Result;
use crate::strategy::{Context, Objc, ParamRef, StrategyKind, SymbolSource};
use objcx_ast::{Ast, ClassId, FuncId, ScopeId, Selector};

/// Strategy that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl Objc for Unsupported {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Inert
    }

    fn intern_selector(&self, _: &mut Context<'_>, _: &str, _: usize) -> Option<Selector> {
        None
    }

    fn set_objc_class(&self, _: &mut Context<'_>, _: ClassId) -> Result<()> {
        Ok(())
    }

    fn set_objc_interface(&self, _: &mut Context<'_>, _: ClassId) -> Result<()> {
        Ok(())
    }

    fn set_selector(&self, _: &mut Context<'_>, _: FuncId, _: ScopeId) -> Result<Option<Selector>> {
        Ok(None)
    }

    fn validate_selector(&self, _: &mut Context<'_>, _: FuncId) -> Result<()> {
        Ok(())
    }

    fn check_linkage(&self, _: &mut Context<'_>, _: FuncId) -> Result<()> {
        Ok(())
    }

    fn is_virtual(&self, _: &Ast, _: FuncId) -> bool {
        false
    }

    fn get_parent(&self, _: &Ast, _: FuncId, _: ClassId) -> Option<ClassId> {
        None
    }

    fn add_to_class_method_list(&self, _: &mut Context<'_>, _: FuncId, _: ClassId) -> Result<()> {
        Ok(())
    }

    fn is_this(&self, _: &Ast, _: FuncId) -> Option<ClassId> {
        None
    }

    fn create_selector_parameter(
        &self,
        _: &mut Context<'_>,
        _: FuncId,
        _: ScopeId,
    ) -> Result<Option<ParamRef>> {
        Ok(None)
    }

    fn set_metaclass(&self, _: &mut Context<'_>, _: ClassId, _: ScopeId) -> Result<()> {
        Ok(())
    }

    fn get_runtime_metaclass(&self, _: &mut Context<'_>, _: ClassId) -> Result<Option<ClassId>> {
        Ok(None)
    }

    fn add_symbols(&self, _: &mut Context<'_>, _: SymbolSource, _: &[FuncId], _: &[FuncId]) -> usize {
        0
    }
}
