//! Declaration annotation: marking aggregates, assigning selectors, and
//! classifying dispatch.

use crate::error::{InteropError, Result};
use crate::strategy::{Context, ParamRef};
use objcx_ast::{
    Ast, ClassId, ClassKind, Dispatch, FuncId, Linkage, ObjcClassInfo, ObjcFuncInfo, Param,
    ParamType, ScopeEntry, ScopeId, Selector, SelectorValue, Visibility,
};

/// Name of the hidden selector parameter.
pub const SELECTOR_PARAM_NAME: &str = "_cmd";

pub(crate) fn mark(cx: &mut Context<'_>, id: ClassId, kind: ClassKind) -> Result<()> {
    let decl = cx.ast.class(id);
    let name = cx.ast.name(decl.name).to_string();
    let span = decl.span;
    let actual = decl.kind;
    let superclass = decl.base;

    // The first annotation stays valid.
    if decl.objc.is_some() {
        return cx.refuse(InteropError::DuplicateAnnotation { name, span });
    }

    if actual != kind {
        let detail = match actual {
            ClassKind::Class => "it is a class, not an interface",
            ClassKind::Interface => "it is an interface, not a class",
        };
        let err = InteropError::UnsupportedBase {
            name,
            detail: detail.to_string(),
            span,
        };
        return cx.reject(id, err);
    }

    if let Some(detail) = foreign_base(cx.ast, id) {
        return cx.reject(id, InteropError::UnsupportedBase { name, detail, span });
    }

    let decl = cx.ast.class_mut(id);
    decl.objc = Some(ObjcClassInfo::class(decl.name, decl.is_extern, superclass));
    objcx_log::debug!(
        "marked `{name}` as Objective-C {}",
        if kind == ClassKind::Interface { "protocol" } else { "class" }
    );
    Ok(())
}

/// Describes the first base of `id` that is not the right kind of interop
/// declaration.
fn foreign_base(ast: &Ast, id: ClassId) -> Option<String> {
    let decl = ast.class(id);

    if let Some(base) = decl.base {
        let base_decl = ast.class(base);
        let ok = base_decl.kind == ClassKind::Class
            && base_decl.objc.as_ref().is_some_and(|info| !info.is_meta());
        if !ok {
            return Some(format!(
                "base class `{}` is not an Objective-C class",
                ast.name(base_decl.name)
            ));
        }
    }

    decl.interfaces.iter().find_map(|&iface| {
        let iface_decl = ast.class(iface);
        let ok = iface_decl.kind == ClassKind::Interface && iface_decl.is_objc();
        (!ok).then(|| {
            format!(
                "interface `{}` is not an Objective-C protocol",
                ast.name(iface_decl.name)
            )
        })
    })
}

fn parent_is_objc(ast: &Ast, func: FuncId) -> bool {
    ast.func(func)
        .parent
        .is_some_and(|parent| ast.class(parent).is_objc())
}

fn dispatch_for(linkage: Linkage) -> Dispatch {
    match linkage {
        Linkage::Objc => Dispatch::Dynamic,
        Linkage::C => Dispatch::StaticForeign,
        Linkage::Native => Dispatch::Unsupported,
    }
}

pub(crate) fn set_selector(
    cx: &mut Context<'_>,
    func: FuncId,
    scope: ScopeId,
) -> Result<Option<Selector>> {
    let decl = cx.ast.func(func);
    if let Some(sel) = decl.selector() {
        return Ok(Some(sel));
    }
    if decl.invalid {
        return Ok(None);
    }

    let span = decl.span;
    let linkage = decl.linkage;
    let in_objc_aggregate = parent_is_objc(cx.ast, func);

    let attrs = decl.selector_attrs.clone();

    let selector = match attrs.as_slice() {
        [] => {
            if linkage != Linkage::Objc || !in_objc_aggregate {
                return Ok(None);
            }
            match cx.selectors.create(cx.ast, func) {
                Ok(sel) => sel,
                Err(err) => return cx.reject(func, err),
            }
        }
        [attr] => {
            let text = match &attr.value {
                SelectorValue::Literal(text) => text.clone(),
                SelectorValue::Constant(name) => {
                    let resolved = cx.ast.lookup(scope, *name).and_then(|entry| match entry {
                        ScopeEntry::StringConst(text) => Some(text.clone()),
                        _ => None,
                    });
                    match resolved {
                        Some(text) => text,
                        None => {
                            let err = InteropError::InvalidSelectorSyntax {
                                text: cx.ast.name(*name).to_string(),
                                reason: "does not name a string constant",
                                span: attr.span,
                            };
                            return cx.reject(func, err);
                        }
                    }
                }
            };
            match cx.selectors.lookup(&text, attr.span) {
                Ok(sel) => sel,
                Err(err) => return cx.reject(func, err),
            }
        }
        [_, second, ..] => {
            let err = InteropError::MultipleSelectors {
                func: cx.ast.func_name(func).to_string(),
                span: second.span,
            };
            return cx.reject(func, err);
        }
    };

    let needs_selector_param = linkage == Linkage::Objc && in_objc_aggregate;
    cx.ast.func_mut(func).objc = Some(ObjcFuncInfo::with_selector(
        selector,
        dispatch_for(linkage),
        needs_selector_param,
    ));
    objcx_log::trace!(
        "`{}` answers to `{}` at {span}",
        cx.ast.func_name(func),
        cx.selectors.name(selector)
    );
    Ok(Some(selector))
}

pub(crate) fn validate_selector(cx: &mut Context<'_>, func: FuncId) -> Result<()> {
    let decl = cx.ast.func(func);
    let Some(selector) = decl.selector() else {
        return Ok(());
    };
    if decl.invalid {
        return Ok(());
    }
    let name = cx.ast.name(decl.name).to_string();
    let span = decl.span;

    if decl.is_template {
        return cx.reject(func, InteropError::SelectorOnTemplate { func: name, span });
    }

    if !parent_is_objc(cx.ast, func) {
        return cx.reject(func, InteropError::SelectorOnNonInteropType { func: name, span });
    }

    let expected = cx.selectors.param_count(selector);
    let found = decl.explicit_param_count();
    if expected != found {
        let err = InteropError::SelectorArityMismatch {
            selector: cx.selectors.name(selector).to_string(),
            expected,
            found,
            span,
        };
        return cx.reject(func, err);
    }
    Ok(())
}

pub(crate) fn check_linkage(cx: &mut Context<'_>, func: FuncId) -> Result<()> {
    let decl = cx.ast.func(func);
    let Some(info) = decl.objc else {
        return Ok(());
    };
    if decl.invalid {
        return Ok(());
    }
    let linkage = decl.linkage;

    if info.selector.is_some() && linkage != Linkage::Objc {
        let err = InteropError::LinkageConflict {
            func: cx.ast.name(decl.name).to_string(),
            linkage,
            span: decl.span,
        };
        return cx.reject(func, err);
    }

    if let Some(info) = cx.ast.func_mut(func).objc.as_mut() {
        info.dispatch = dispatch_for(linkage);
    }
    Ok(())
}

pub(crate) fn is_virtual(ast: &Ast, func: FuncId) -> bool {
    let decl = ast.func(func);
    !decl.invalid
        && decl.linkage == Linkage::Objc
        && !decl.is_static
        && !decl.is_final
        && decl.visibility != Visibility::Private
        && decl
            .objc
            .is_some_and(|info| info.selector.is_some() && info.dispatch == Dispatch::Dynamic)
        && parent_is_objc(ast, func)
}

pub(crate) fn is_this(ast: &Ast, func: FuncId) -> Option<ClassId> {
    let decl = ast.func(func);
    let parent = decl.parent?;
    if !decl.is_static {
        return Some(parent);
    }

    let info = ast.class(parent).objc.as_ref()?;
    if info.is_meta() {
        return Some(parent);
    }
    Some(info.paired().unwrap_or(parent))
}

pub(crate) fn create_selector_parameter(
    cx: &mut Context<'_>,
    func: FuncId,
    scope: ScopeId,
) -> Result<Option<ParamRef>> {
    let decl = cx.ast.func(func);
    let needs = decl
        .objc
        .is_some_and(|info| info.needs_selector_param && info.selector.is_some());
    if !needs || decl.invalid {
        return Ok(None);
    }

    let existing = decl
        .params
        .iter()
        .position(|p| p.implicit && p.ty == ParamType::Selector);
    let span = decl.span;
    let cmd = cx.ast.intern(SELECTOR_PARAM_NAME);

    let index = match existing {
        Some(index) => index,
        None => {
            let params = &mut cx.ast.func_mut(func).params;
            params.push(Param {
                implicit: true,
                ..Param::new(cmd, None, ParamType::Selector, span)
            });
            params.len() - 1
        }
    };

    let entry = ScopeEntry::Param { func, index };
    if let Err(redeclared) = cx.ast.scopes[scope].declare(cmd, entry.clone()) {
        if redeclared.existing != entry {
            objcx_log::warn!(
                "`{SELECTOR_PARAM_NAME}` of `{}` is shadowed by an earlier declaration",
                cx.ast.func_name(func)
            );
        }
    }

    Ok(Some(ParamRef { func, index }))
}
