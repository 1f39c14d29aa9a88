//! Per-class method lists.

use super::annotate;
use crate::error::{InteropError, Result};
use crate::strategy::{Context, SymbolSource};
use objcx_ast::{Ast, ClassId, FuncId, MethodListEntry, Selector};

/// Walks the interop chain from `class` and returns the first class whose
/// own list holds `selector` on the given side for a function other than
/// `skip`.
fn declaring_class(
    ast: &Ast,
    selector: Selector,
    is_class_method: bool,
    class: Option<ClassId>,
    skip: FuncId,
) -> Option<ClassId> {
    let mut current = class;
    while let Some(id) = current {
        let info = ast.class(id).objc.as_ref()?;
        if info
            .find_method(selector, is_class_method)
            .is_some_and(|entry| entry.func != skip)
        {
            return Some(id);
        }
        current = info.superclass();
    }
    None
}

/// Class-side methods live in the class's own list, flagged; a metaclass
/// argument is redirected to the class it mirrors.
fn list_owner(ast: &Ast, class: ClassId) -> Option<ClassId> {
    let info = ast.class(class).objc.as_ref()?;
    if info.is_meta() {
        info.paired()
    } else {
        Some(class)
    }
}

pub(crate) fn get_parent(ast: &Ast, func: FuncId, class: ClassId) -> Option<ClassId> {
    let decl = ast.func(func);
    let Some(selector) = decl.selector() else {
        return Some(class);
    };
    let Some(owner) = list_owner(ast, class) else {
        return Some(class);
    };
    declaring_class(ast, selector, decl.is_static, Some(owner), func).or(Some(class))
}

/// Appends `func`; `Ok(false)` when it is skipped.
///
/// The function must be a member of the list owner and pass selector and
/// linkage validation before it is recorded.
fn append(
    cx: &mut Context<'_>,
    func: FuncId,
    class: ClassId,
    is_class_method: bool,
) -> Result<bool> {
    let decl = cx.ast.func(func);
    if decl.invalid {
        return Ok(false);
    }
    let Some(selector) = decl.selector() else {
        return Ok(false);
    };
    let span = decl.span;
    let parent = decl.parent;

    let Some(owner) = list_owner(cx.ast, class) else {
        return Ok(false);
    };
    let owner_decl = cx.ast.class(owner);
    if owner_decl.invalid || !owner_decl.is_objc() {
        return Ok(false);
    }

    if parent != Some(owner) {
        let err = InteropError::MethodNotMember {
            func: cx.ast.func_name(func).to_string(),
            class: cx.ast.name(owner_decl.name).to_string(),
            span,
        };
        return cx.refuse(err);
    }

    annotate::validate_selector(cx, func)?;
    annotate::check_linkage(cx, func)?;

    let Some(info) = cx.ast.class(owner).objc.as_ref() else {
        return Ok(false);
    };

    if let Some(existing) = info.find_method(selector, is_class_method) {
        if existing.func == func {
            return Ok(false);
        }
        let err = InteropError::SelectorCollision {
            selector: cx.selectors.name(selector).to_string(),
            class: cx.ast.class_name(owner).to_string(),
            is_class_method,
            span,
            previous: cx.ast.func(existing.func).span,
        };
        return cx.reject(func, err);
    }

    let overrides = declaring_class(
        cx.ast,
        selector,
        is_class_method,
        info.superclass(),
        func,
    );

    if let Some(info) = cx.ast.func_mut(func).objc.as_mut() {
        info.overrides = overrides;
    }
    let position = match cx.ast.class_mut(owner).objc.as_mut() {
        Some(info) => info.push_method(MethodListEntry {
            selector,
            func,
            is_class_method,
        }),
        None => return Ok(false),
    };

    objcx_log::trace!(
        "`{}` #{position}: {}{}{}",
        cx.ast.class_name(owner),
        if is_class_method { "+" } else { "-" },
        cx.selectors.name(selector),
        if overrides.is_some() { " (override)" } else { "" }
    );
    Ok(true)
}

pub(crate) fn add_to_class_method_list(
    cx: &mut Context<'_>,
    func: FuncId,
    class: ClassId,
) -> Result<()> {
    let is_class_method = cx.ast.func(func).is_static;
    append(cx, func, class, is_class_method).map(|_| ())
}

pub(crate) fn add_symbols(
    cx: &mut Context<'_>,
    source: SymbolSource,
    instance_methods: &[FuncId],
    class_methods: &[FuncId],
) -> usize {
    let target = match source {
        SymbolSource::Class(class) => class,
        SymbolSource::Group(group) => {
            let group = &cx.ast.attribs[group];
            if !group.is_active() {
                objcx_log::debug!("skipping disabled group at {}", group.span);
                return 0;
            }
            group.target
        }
    };

    let sides = instance_methods
        .iter()
        .map(|&func| (func, false))
        .chain(class_methods.iter().map(|&func| (func, true)));

    let mut added = 0;
    for (func, is_class_method) in sides {
        // Failures were reported against the member; keep going.
        if let Ok(true) = append(cx, func, target, is_class_method) {
            added += 1;
        }
    }
    added
}
