//! Class/metaclass pairing.
//!
//! Every Objective-C class has a metaclass holding its class-side methods.
//! Extern classes bring theirs from the foreign header; all others get one
//! synthesized here. Both halves point at each other and the pairing never
//! changes once made.

use crate::emit::metaclass_symbol;
use crate::error::{InteropError, Result};
use crate::strategy::Context;
use objcx_ast::{ClassDecl, ClassId, Linkage, ObjcClassInfo, ScopeEntry, ScopeId};

pub(crate) fn set_metaclass(cx: &mut Context<'_>, class: ClassId, scope: ScopeId) -> Result<()> {
    let decl = cx.ast.class(class);
    let span = decl.span;
    let Some(info) = decl.objc.as_ref() else {
        let name = cx.ast.name(decl.name).to_string();
        return cx.reject(class, InteropError::NotInteropType { name, span });
    };
    if info.is_meta() {
        return Ok(());
    }
    if let Some(meta) = info.paired() {
        verify_pair(cx, class, meta)?;
        return declare_in(cx, meta, scope);
    }

    if decl.is_extern {
        let extern_meta = decl.extern_metaclass;
        match extern_meta {
            Some(meta) => link_extern(cx, class, meta, scope),
            None => {
                let err = InteropError::MissingExternMetaclass {
                    class: cx.ast.name(decl.name).to_string(),
                    detail: "its header declares no metaclass",
                    span,
                };
                cx.reject(class, err)
            }
        }
    } else {
        synthesize(cx, class, scope)
    }
}

/// Resolves the metaclasses `class`'s own metaclass inherits from.
fn super_metaclasses(
    cx: &mut Context<'_>,
    class: ClassId,
    scope: ScopeId,
) -> Result<(Option<ClassId>, Vec<ClassId>)> {
    let decl = cx.ast.class(class);
    let superclass = decl.objc.as_ref().and_then(ObjcClassInfo::superclass);
    let interfaces = decl.interfaces.clone();

    let super_meta = match superclass {
        Some(sup) => {
            set_metaclass(cx, sup, scope)?;
            paired(cx, sup)
        }
        None => None,
    };

    let mut interface_metas = Vec::with_capacity(interfaces.len());
    for iface in interfaces {
        set_metaclass(cx, iface, scope)?;
        if let Some(meta) = paired(cx, iface) {
            interface_metas.push(meta);
        }
    }
    Ok((super_meta, interface_metas))
}

fn paired(cx: &Context<'_>, class: ClassId) -> Option<ClassId> {
    cx.ast.class(class).objc.as_ref().and_then(ObjcClassInfo::paired)
}

fn synthesize(cx: &mut Context<'_>, class: ClassId, scope: ScopeId) -> Result<()> {
    let (super_meta, interface_metas) = super_metaclasses(cx, class, scope)?;

    let decl = cx.ast.class(class);
    let kind = decl.kind;
    let span = decl.span;
    let symbol = metaclass_symbol(cx.ast.name(decl.name));
    let name = cx.ast.intern(&symbol);

    let mut meta = ClassDecl::new(name, kind, span).with_linkage(Linkage::Objc);
    meta.base = super_meta;
    meta.interfaces = interface_metas;
    meta.synthesized = true;
    meta.objc = Some(ObjcClassInfo::metaclass(name, false, class, super_meta));
    let meta = cx.ast.add_class(meta);

    declare_in(cx, meta, scope)?;
    link(cx, class, meta)?;
    objcx_log::debug!("synthesized `{symbol}`");
    Ok(())
}

/// Makes a synthesized metaclass visible from `scope`.
///
/// A metaclass resolved on behalf of a subclass is declared in the
/// subclass's scope; resolving the class itself later declares it in its
/// own scope too.
fn declare_in(cx: &mut Context<'_>, meta: ClassId, scope: ScopeId) -> Result<()> {
    let decl = cx.ast.class(meta);
    if !decl.synthesized {
        return Ok(());
    }
    let name = decl.name;
    let span = decl.span;
    if cx.ast.lookup(scope, name) == Some(&ScopeEntry::Class(meta)) {
        return Ok(());
    }

    if let Err(redeclared) = cx.ast.scopes[scope].declare(name, ScopeEntry::Class(meta)) {
        let err = InteropError::BrokenInvariant {
            detail: format!(
                "metaclass symbol `{}` is already declared as {:?}",
                cx.ast.name(name),
                redeclared.existing
            ),
            span,
        };
        return cx.fatal(err);
    }
    Ok(())
}

fn link_extern(cx: &mut Context<'_>, class: ClassId, meta: ClassId, scope: ScopeId) -> Result<()> {
    let meta_decl = cx.ast.class(meta);
    match meta_decl.objc.as_ref() {
        None => {}
        Some(info) if info.is_meta() && info.paired() == Some(class) => {
            return link(cx, class, meta);
        }
        Some(_) => {
            let decl = cx.ast.class(class);
            let err = InteropError::MissingExternMetaclass {
                class: cx.ast.name(decl.name).to_string(),
                detail: "its declared metaclass belongs to another class",
                span: decl.span,
            };
            return cx.reject(class, err);
        }
    }

    let (super_meta, _) = super_metaclasses(cx, class, scope)?;
    let meta_decl = cx.ast.class_mut(meta);
    meta_decl.objc = Some(ObjcClassInfo::metaclass(
        meta_decl.name,
        true,
        class,
        super_meta,
    ));
    link(cx, class, meta)?;
    objcx_log::debug!(
        "linked extern `{}` to `{}`",
        cx.ast.class_name(class),
        cx.ast.class_name(meta)
    );
    Ok(())
}

/// Records `meta` on `class` and checks the pair from both sides.
fn link(cx: &mut Context<'_>, class: ClassId, meta: ClassId) -> Result<()> {
    let result = match cx.ast.class_mut(class).objc.as_mut() {
        Some(info) => info.set_paired(meta),
        None => Ok(()),
    };
    if let Err(already) = result {
        let err = InteropError::BrokenInvariant {
            detail: format!(
                "`{}` is already paired with `{}`",
                cx.ast.class_name(class),
                cx.ast.class_name(already.existing)
            ),
            span: cx.ast.class(class).span,
        };
        return cx.fatal(err);
    }
    verify_pair(cx, class, meta)
}

/// Checks `class.paired == meta` and `meta.paired == class`.
fn verify_pair(cx: &mut Context<'_>, class: ClassId, meta: ClassId) -> Result<()> {
    let class_info = cx.ast.class(class).objc.as_ref();
    let meta_info = cx.ast.class(meta).objc.as_ref();

    let forward = class_info.is_some_and(|info| !info.is_meta() && info.paired() == Some(meta));
    let backward = meta_info.is_some_and(|info| info.is_meta() && info.paired() == Some(class));
    if forward && backward {
        return Ok(());
    }

    let err = InteropError::BrokenInvariant {
        detail: format!(
            "metaclass back-reference between `{}` and `{}` is not mutual",
            cx.ast.class_name(class),
            cx.ast.class_name(meta)
        ),
        span: cx.ast.class(class).span,
    };
    cx.fatal(err)
}

pub(crate) fn get_runtime_metaclass(
    cx: &mut Context<'_>,
    class: ClassId,
) -> Result<Option<ClassId>> {
    let decl = cx.ast.class(class);
    let Some(info) = decl.objc.as_ref() else {
        let err = InteropError::NotInteropType {
            name: cx.ast.name(decl.name).to_string(),
            span: decl.span,
        };
        return cx.reject(class, err);
    };

    let target = if info.is_meta() {
        // The root metaclass belongs to the root class of the mirrored chain.
        let Some(mut root) = info.paired() else {
            let err = InteropError::BrokenInvariant {
                detail: format!("metaclass `{}` mirrors no class", cx.ast.class_name(class)),
                span: decl.span,
            };
            return cx.fatal(err);
        };
        while let Some(sup) = cx.ast.class(root).objc.as_ref().and_then(ObjcClassInfo::superclass) {
            root = sup;
        }
        root
    } else {
        class
    };

    match paired(cx, target) {
        Some(meta) => Ok(Some(meta)),
        None => {
            let decl = cx.ast.class(target);
            let err = InteropError::MetaclassNotResolved {
                class: cx.ast.name(decl.name).to_string(),
                span: decl.span,
            };
            cx.reject(target, err)
        }
    }
}
