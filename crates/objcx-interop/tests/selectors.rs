// Selector Integration Tests
//
// Selector assignment, validation and linkage checks driven through a
// session, the way the semantic analyzer uses them.

mod common;

use common::Fixture;
use objcx_ast::{Dispatch, FuncDecl, Linkage, ScopeEntry};
use objcx_interop::InteropError;

/// Equal (name, count) pairs give the identical handle
#[test]
fn test_interning_identity() {
    let mut fx = Fixture::apple();

    let a = fx.session.intern_selector(&mut fx.ast, "bar:baz:", 2).unwrap();
    let b = fx.session.intern_selector(&mut fx.ast, "bar:baz:", 2).unwrap();
    let c = fx.session.intern_selector(&mut fx.ast, "bar:baz:", 1).unwrap();

    assert!(a.is_some());
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(fx.session.selectors().len(), 2);
}

/// Derived `bar:baz:` followed by an explicit `bar:baz:` on the same class
#[test]
fn test_bar_baz_collision() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);

    let first = fx.method(foo, "bar", &["", "baz"]);
    fx.session.set_selector(&mut fx.ast, first, fx.scope).unwrap();
    fx.session.validate_selector(&mut fx.ast, first).unwrap();
    assert_eq!(fx.selector_text(first), Some("bar:baz:"));
    fx.process(first, foo).unwrap();

    let second = fx.method_with_selector(foo, "other", 2, "bar:baz:");
    let err = fx.process(second, foo).unwrap_err();

    assert!(matches!(
        err,
        InteropError::SelectorCollision { ref selector, is_class_method: false, .. } if selector == "bar:baz:"
    ));
    assert_eq!(fx.codes(), vec!["O0009"]);
    assert_eq!(fx.method_list(foo, false), vec![first]);
    assert!(fx.ast.func(second).invalid);

    // Both handles are the same interned selector.
    assert_eq!(
        fx.ast.func(first).selector(),
        fx.ast.func(second).selector()
    );
}

/// One parameter cannot answer to a zero-argument selector
#[test]
fn test_only_one_arity_mismatch() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);
    let func = fx.method_with_selector(foo, "take", 1, "onlyOne");

    fx.session.set_selector(&mut fx.ast, func, fx.scope).unwrap();
    let err = fx.session.validate_selector(&mut fx.ast, func).unwrap_err();

    assert_eq!(
        err,
        InteropError::SelectorArityMismatch {
            selector: "onlyOne".to_string(),
            expected: 0,
            found: 1,
            span: fx.ast.func(func).span,
        }
    );
    assert_eq!(fx.codes(), vec!["O0004"]);
    assert_eq!(fx.ast.func(func).objc.map(|i| i.dispatch), Some(Dispatch::Unsupported));
}

#[test]
fn test_property_setter_selector() {
    let mut fx = Fixture::apple();
    let view = fx.objc_class("View", None);
    let setter = fx.method(view, "title", &[""]);
    let getter = fx.method(view, "title", &[]);
    fx.ast.func_mut(setter).is_property = true;
    fx.ast.func_mut(getter).is_property = true;

    fx.process(setter, view).unwrap();
    fx.process(getter, view).unwrap();

    assert_eq!(fx.selector_text(setter), Some("setTitle:"));
    assert_eq!(fx.selector_text(getter), Some("title"));
    assert!(fx.session.sink().is_empty());
}

/// `@selector(kRun)` resolves the constant through the scope
#[test]
fn test_selector_from_named_constant() {
    let mut fx = Fixture::apple();
    let runner = fx.objc_class("Runner", None);
    let constant = fx.ast.intern("kRun");
    fx.ast.scopes[fx.scope]
        .declare(constant, ScopeEntry::StringConst("runWith:".to_string()))
        .unwrap();

    let span = fx.span();
    let params = fx.params(&[""]);
    let name = fx.ast.intern("run");
    let func = fx.ast.add_method(
        runner,
        FuncDecl::new(name, params, span)
            .with_linkage(Linkage::Objc)
            .with_selector_constant(constant, span),
    );

    fx.process(func, runner).unwrap();
    assert_eq!(fx.selector_text(func), Some("runWith:"));
}

#[test]
fn test_unresolved_selector_constant() {
    let mut fx = Fixture::apple();
    let runner = fx.objc_class("Runner", None);
    let constant = fx.ast.intern("kMissing");
    let span = fx.span();
    let name = fx.ast.intern("run");
    let func = fx.ast.add_method(
        runner,
        FuncDecl::new(name, vec![], span)
            .with_linkage(Linkage::Objc)
            .with_selector_constant(constant, span),
    );

    let err = fx.session.set_selector(&mut fx.ast, func, fx.scope).unwrap_err();
    assert!(matches!(err, InteropError::InvalidSelectorSyntax { ref text, .. } if text == "kMissing"));
    assert!(fx.ast.func(func).invalid);
}

#[test]
fn test_invalid_selector_text() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);
    let func = fx.method_with_selector(foo, "bad", 2, "bar::");

    let err = fx.session.set_selector(&mut fx.ast, func, fx.scope).unwrap_err();

    assert_eq!(err.code(), "O0001");
    assert!(fx.ast.func(func).selector().is_none());
    assert!(fx.session.selectors().is_empty());

    // Reported once, even when the analyzer asks again.
    assert_eq!(fx.session.set_selector(&mut fx.ast, func, fx.scope), Ok(None));
    assert_eq!(fx.codes(), vec!["O0001"]);
}

#[test]
fn test_multiple_selectors() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);
    let func = fx.method_with_selector(foo, "run", 0, "run");
    let span = fx.span();
    fx.ast
        .func_mut(func)
        .selector_attrs
        .push(objcx_ast::SelectorAttr {
            value: objcx_ast::SelectorValue::Literal("go".to_string()),
            span,
        });

    let err = fx.session.set_selector(&mut fx.ast, func, fx.scope).unwrap_err();

    assert_eq!(err.code(), "O0010");
    assert_eq!(err.span(), span);
}

#[test]
fn test_selector_on_template() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);
    let func = fx.method_with_selector(foo, "map", 1, "map:");
    fx.ast.func_mut(func).is_template = true;

    let err = fx.process(func, foo).unwrap_err();

    assert_eq!(err.code(), "O0011");
    assert!(fx.method_list(foo, false).is_empty());
}

#[test]
fn test_selector_on_native_class() {
    let mut fx = Fixture::apple();
    let native = fx.class("Native");
    let func = fx.method_with_selector(native, "run", 0, "run");

    fx.session.set_selector(&mut fx.ast, func, fx.scope).unwrap();
    let err = fx.session.validate_selector(&mut fx.ast, func).unwrap_err();

    assert!(matches!(err, InteropError::SelectorOnNonInteropType { ref func, .. } if func == "run"));
}

#[test]
fn test_selector_on_free_function() {
    let mut fx = Fixture::apple();
    let span = fx.span();
    let name = fx.ast.intern("helper");
    let func = fx.ast.add_function(
        FuncDecl::new(name, vec![], span)
            .with_linkage(Linkage::Objc)
            .with_selector("helper", span),
    );

    fx.session.set_selector(&mut fx.ast, func, fx.scope).unwrap();
    let err = fx.session.validate_selector(&mut fx.ast, func).unwrap_err();

    assert_eq!(err.code(), "O0005");
    assert_eq!(fx.session.is_this(&fx.ast, func), None);
}

/// A selector forces dynamic dispatch, which C linkage cannot provide
#[test]
fn test_linkage_conflict() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);
    let func = fx.method_with_selector(foo, "draw", 0, "draw");
    fx.ast.func_mut(func).linkage = Linkage::C;

    let err = fx.process(func, foo).unwrap_err();

    assert!(matches!(err, InteropError::LinkageConflict { linkage: Linkage::C, .. }));
    assert_eq!(fx.ast.func(func).objc.map(|i| i.dispatch), Some(Dispatch::Unsupported));
    assert!(!fx.session.is_virtual(&fx.ast, func));
    assert!(fx.method_list(foo, false).is_empty());
}

/// Native members of an Objective-C class get no selector
#[test]
fn test_no_derivation_for_native_linkage() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);
    let func = fx.method(foo, "helper", &[]);
    fx.ast.func_mut(func).linkage = Linkage::Native;

    fx.process(func, foo).unwrap();

    assert!(fx.ast.func(func).selector().is_none());
    assert!(fx.method_list(foo, false).is_empty());
    assert!(fx.session.sink().is_empty());
}

#[test]
fn test_set_selector_keeps_first() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);
    let func = fx.method(foo, "count", &[]);

    let first = fx.session.set_selector(&mut fx.ast, func, fx.scope).unwrap();
    let renamed = fx.ast.intern("size");
    fx.ast.func_mut(func).name = renamed;
    let second = fx.session.set_selector(&mut fx.ast, func, fx.scope).unwrap();

    assert_eq!(first, second);
    assert_eq!(fx.selector_text(func), Some("count"));
}

#[test]
fn test_dynamic_dispatch_classification() {
    let mut fx = Fixture::apple();
    let foo = fx.objc_class("Foo", None);
    let open = fx.method(foo, "open", &[]);
    let sealed = fx.method(foo, "sealed", &[]);
    let hidden = fx.method(foo, "hidden", &[]);
    fx.ast.func_mut(sealed).is_final = true;
    fx.ast.func_mut(hidden).visibility = objcx_ast::Visibility::Private;

    for func in [open, sealed, hidden] {
        fx.process(func, foo).unwrap();
    }

    assert_eq!(fx.ast.func(open).objc.map(|i| i.dispatch), Some(Dispatch::Dynamic));
    assert!(fx.session.is_virtual(&fx.ast, open));
    assert!(!fx.session.is_virtual(&fx.ast, sealed));
    assert!(!fx.session.is_virtual(&fx.ast, hidden));
}
