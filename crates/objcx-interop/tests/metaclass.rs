// Metaclass Integration Tests
//
// Class/metaclass pairing: synthesis, extern linking, the root metaclass,
// and what happens when the pairing is found corrupted.

mod common;

use common::Fixture;
use objcx_ast::{ClassDecl, ClassKind, Linkage, ObjcClassInfo, ScopeEntry};
use objcx_interop::InteropError;

/// Both halves point at each other after `set_metaclass`
#[test]
fn test_mutual_back_reference() {
    let mut fx = Fixture::apple();
    let foo = fx.class("Foo");
    fx.session.set_objc_class(&mut fx.ast, foo).unwrap();
    fx.session.set_metaclass(&mut fx.ast, foo, fx.scope).unwrap();

    let meta = fx.ast.class(foo).objc.as_ref().and_then(ObjcClassInfo::paired).unwrap();
    let meta_info = fx.ast.class(meta).objc.as_ref().unwrap();

    assert!(meta_info.is_meta());
    assert_eq!(meta_info.paired(), Some(foo));
    assert!(fx.ast.class(meta).synthesized);
    assert_eq!(fx.ast.class_name(meta), "OBJC_METACLASS_$_Foo");

    // Declared in the scope under its symbol name.
    let symbol = fx.ast.intern("OBJC_METACLASS_$_Foo");
    assert_eq!(fx.ast.lookup(fx.scope, symbol), Some(&ScopeEntry::Class(meta)));
}

#[test]
fn test_set_metaclass_is_idempotent() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);
    let classes_before = fx.ast.classes.len();
    let meta = fx.session.get_runtime_metaclass(&mut fx.ast, foo).unwrap();

    fx.session.set_metaclass(&mut fx.ast, foo, fx.scope).unwrap();
    fx.session.set_metaclass(&mut fx.ast, foo, fx.scope).unwrap();

    assert_eq!(fx.ast.classes.len(), classes_before);
    assert_eq!(fx.session.get_runtime_metaclass(&mut fx.ast, foo).unwrap(), meta);
    assert!(fx.session.sink().is_empty());
}

/// The metaclass hierarchy mirrors the class hierarchy
#[test]
fn test_metaclass_inherits_superclass_metaclass() {
    let mut fx = Fixture::apple();
    let base = fx.class("Base");
    let derived = fx.subclass("Derived", base);
    fx.session.set_objc_class(&mut fx.ast, base).unwrap();
    fx.session.set_objc_class(&mut fx.ast, derived).unwrap();

    // Resolving the subclass first resolves the superclass too.
    fx.session.set_metaclass(&mut fx.ast, derived, fx.scope).unwrap();

    let base_meta = fx.session.get_runtime_metaclass(&mut fx.ast, base).unwrap().unwrap();
    let derived_meta = fx.session.get_runtime_metaclass(&mut fx.ast, derived).unwrap().unwrap();

    assert_eq!(fx.ast.class(derived_meta).base, Some(base_meta));
    let info = fx.ast.class(derived_meta).objc.as_ref().unwrap();
    assert_eq!(info.superclass(), Some(base_meta));
    assert!(!info.is_root_class());
    assert!(fx.ast.class(base).objc.as_ref().unwrap().is_root_class());
}

/// Asking a metaclass for its metaclass gives the root metaclass
#[test]
fn test_root_metaclass() {
    let mut fx = Fixture::apple();
    let root = fx.objc_class("NSObject", None);
    let mid = fx.objc_class("NSResponder", Some(root));
    let leaf = fx.objc_class("NSView", Some(mid));

    let root_meta = fx.session.get_runtime_metaclass(&mut fx.ast, root).unwrap();
    let leaf_meta = fx.session.get_runtime_metaclass(&mut fx.ast, leaf).unwrap().unwrap();

    assert_eq!(fx.session.get_runtime_metaclass(&mut fx.ast, leaf_meta).unwrap(), root_meta);
}

#[test]
fn test_metaclass_not_resolved() {
    let mut fx = Fixture::apple();
    let foo = fx.class("Foo");
    fx.session.set_objc_class(&mut fx.ast, foo).unwrap();

    let err = fx.session.get_runtime_metaclass(&mut fx.ast, foo).unwrap_err();

    assert!(matches!(err, InteropError::MetaclassNotResolved { ref class, .. } if class == "Foo"));
    assert_eq!(fx.codes(), vec!["O0008"]);
}

#[test]
fn test_metaclass_of_native_class() {
    let mut fx = Fixture::apple();
    let native = fx.class("Native");

    let err = fx.session.set_metaclass(&mut fx.ast, native, fx.scope).unwrap_err();

    assert_eq!(err.code(), "O0012");
    assert!(fx.ast.class(native).invalid);
}

/// Extern classes link to the metaclass their header declares
#[test]
fn test_extern_metaclass_linking() {
    let mut fx = Fixture::apple();
    let span = fx.span();
    let meta_name = fx.ast.intern("OBJC_METACLASS_$_NSString");
    let meta = fx
        .ast
        .add_class(ClassDecl::new(meta_name, ClassKind::Class, span).with_linkage(Linkage::Objc));
    let name = fx.ast.intern("NSString");
    let class = fx.ast.add_class(
        ClassDecl::new(name, ClassKind::Class, span)
            .with_linkage(Linkage::Objc)
            .external(Some(meta)),
    );
    let classes_before = fx.ast.classes.len();

    fx.session.set_objc_class(&mut fx.ast, class).unwrap();
    fx.session.set_metaclass(&mut fx.ast, class, fx.scope).unwrap();

    let meta_info = fx.ast.class(meta).objc.as_ref().unwrap();
    assert!(meta_info.is_meta());
    assert!(meta_info.is_extern());
    assert_eq!(meta_info.paired(), Some(class));
    assert_eq!(
        fx.session.get_runtime_metaclass(&mut fx.ast, class).unwrap(),
        Some(meta)
    );
    // Nothing synthesized.
    assert_eq!(fx.ast.classes.len(), classes_before);
}

#[test]
fn test_missing_extern_metaclass() {
    let mut fx = Fixture::apple();
    let span = fx.span();
    let name = fx.ast.intern("NSData");
    let class = fx.ast.add_class(
        ClassDecl::new(name, ClassKind::Class, span)
            .with_linkage(Linkage::Objc)
            .external(None),
    );

    fx.session.set_objc_class(&mut fx.ast, class).unwrap();
    let err = fx.session.set_metaclass(&mut fx.ast, class, fx.scope).unwrap_err();

    assert!(matches!(err, InteropError::MissingExternMetaclass { ref class, .. } if class == "NSData"));
    assert!(!fx.session.is_aborted());
}

/// Interfaces get metaclasses too, and keep their kind
#[test]
fn test_interface_metaclass() {
    let mut fx = Fixture::apple();
    let copying = fx.interface("NSCopying");
    fx.session.set_objc_interface(&mut fx.ast, copying).unwrap();
    fx.session.set_metaclass(&mut fx.ast, copying, fx.scope).unwrap();

    let meta = fx.session.get_runtime_metaclass(&mut fx.ast, copying).unwrap().unwrap();
    assert!(fx.ast.class(meta).is_interface());
}

/// A corrupted pairing is fatal and the session refuses further work
#[test]
fn test_broken_pair_aborts_session() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);
    let bar = fx.class("Bar");
    let other = fx.objc_class("Other", None);
    let other_meta = fx.session.get_runtime_metaclass(&mut fx.ast, other).unwrap().unwrap();

    // Pair `Bar` with a metaclass that mirrors someone else.
    let bar_name = fx.ast.class(bar).name;
    let mut info = ObjcClassInfo::class(bar_name, false, None);
    info.set_paired(other_meta).unwrap();
    fx.ast.class_mut(bar).objc = Some(info);

    let err = fx.session.set_metaclass(&mut fx.ast, bar, fx.scope).unwrap_err();

    assert!(matches!(err, InteropError::BrokenInvariant { .. }));
    assert!(err.is_fatal());
    assert!(fx.session.is_aborted());
    assert_eq!(fx.codes(), vec!["O0900"]);

    // Everything afterwards is refused without reporting again.
    assert_eq!(
        fx.session.set_metaclass(&mut fx.ast, foo, fx.scope),
        Err(InteropError::SessionAborted)
    );
    let func = fx.method(foo, "late", &[]);
    assert_eq!(fx.process(func, foo), Err(InteropError::SessionAborted));
    assert!(fx.ast.func(func).selector().is_none());
    assert_eq!(fx.session.emission(&fx.ast), Err(InteropError::SessionAborted));
    assert_eq!(fx.session.sink().len(), 1);
}

#[test]
fn test_duplicate_annotation() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);

    let err = fx.session.set_objc_class(&mut fx.ast, foo).unwrap_err();

    assert!(matches!(err, InteropError::DuplicateAnnotation { ref name, .. } if name == "Foo"));
    assert_eq!(fx.codes(), vec!["O0002"]);

    // The class keeps its first annotation and is still emitted.
    assert!(!fx.ast.class(foo).invalid);
    let symbols = fx.session.emission(&fx.ast).unwrap();
    assert!(symbols.class("Foo").is_some());
}

/// Test that a superclass metaclass resolved for a nested subclass is
/// still declared where the superclass itself is resolved
#[test]
fn test_superclass_metaclass_visible_from_own_scope() {
    let mut fx = Fixture::apple();
    let base = fx.class("Base");
    let derived = fx.subclass("Derived", base);
    fx.session.set_objc_class(&mut fx.ast, base).unwrap();
    fx.session.set_objc_class(&mut fx.ast, derived).unwrap();
    let module = fx.scope;
    let inner = fx.ast.new_scope(Some(module));

    fx.session.set_metaclass(&mut fx.ast, derived, inner).unwrap();
    let base_meta = fx.session.get_runtime_metaclass(&mut fx.ast, base).unwrap().unwrap();
    let symbol = fx.ast.intern("OBJC_METACLASS_$_Base");
    assert_eq!(fx.ast.lookup(inner, symbol), Some(&ScopeEntry::Class(base_meta)));
    assert_eq!(fx.ast.lookup(module, symbol), None);

    fx.session.set_metaclass(&mut fx.ast, base, module).unwrap();

    assert_eq!(fx.ast.lookup(module, symbol), Some(&ScopeEntry::Class(base_meta)));
    // Resolving again from either scope changes nothing.
    fx.session.set_metaclass(&mut fx.ast, base, module).unwrap();
    fx.session.set_metaclass(&mut fx.ast, base, inner).unwrap();
    assert_eq!(fx.ast.scopes[inner].len(), 2);
    assert!(fx.session.sink().is_empty());
}

/// An Objective-C class cannot sit on a native root
#[test]
fn test_unsupported_base() {
    let mut fx = Fixture::apple();
    let native = fx.class("Native");
    let derived = fx.subclass("Derived", native);

    let err = fx.session.set_objc_class(&mut fx.ast, derived).unwrap_err();

    assert!(matches!(err, InteropError::UnsupportedBase { ref detail, .. } if detail.contains("`Native`")));
    assert!(fx.ast.class(derived).objc.is_none());
    assert!(fx.ast.class(derived).invalid);
}

#[test]
fn test_unsupported_interface() {
    let mut fx = Fixture::apple();
    let plain = fx.interface("Plain");
    let span = fx.span();
    let name = fx.ast.intern("Widget");
    let widget = fx.ast.add_class(
        ClassDecl::new(name, ClassKind::Class, span)
            .with_interface(plain)
            .with_linkage(Linkage::Objc),
    );

    let err = fx.session.set_objc_class(&mut fx.ast, widget).unwrap_err();
    assert_eq!(err.code(), "O0003");

    // Marking an interface as a class is refused the same way.
    let err = fx.session.set_objc_class(&mut fx.ast, plain).unwrap_err();
    assert_eq!(err.code(), "O0003");
}
