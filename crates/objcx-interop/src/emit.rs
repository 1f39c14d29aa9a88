//! Read-only view of interop metadata for the code generator.
//!
//! Symbol names follow the Objective-C 2.0 non-fragile ABI:
//! `OBJC_CLASS_$_<Name>` for class objects and `OBJC_METACLASS_$_<Name>`
//! for metaclasses.

use crate::selector::SelectorTable;
use objcx_ast::{Ast, ClassId, FuncId, MethodListEntry, ObjcClassInfo};

/// Prefix of class object symbols.
pub const CLASS_SYMBOL_PREFIX: &str = "OBJC_CLASS_$_";
/// Prefix of metaclass symbols.
pub const METACLASS_SYMBOL_PREFIX: &str = "OBJC_METACLASS_$_";

/// Symbol of the class object for `class`.
#[must_use]
pub fn class_symbol(class: &str) -> String {
    format!("{CLASS_SYMBOL_PREFIX}{class}")
}

/// Symbol of the metaclass for `class`.
#[must_use]
pub fn metaclass_symbol(class: &str) -> String {
    format!("{METACLASS_SYMBOL_PREFIX}{class}")
}

/// One method list entry, resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRecord {
    /// Selector text
    pub selector: String,
    /// Implementing function
    pub func: FuncId,
    /// True if the method overrides an ancestor's
    pub overrides: bool,
}

/// Everything the code generator needs about one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    /// The class declaration
    pub class: ClassId,
    /// Source name
    pub name: String,
    /// Class object symbol
    pub symbol: String,
    /// Metaclass symbol, once resolved
    pub metaclass_symbol: Option<String>,
    /// Superclass name, `None` for root classes
    pub superclass: Option<String>,
    /// True for protocols
    pub is_interface: bool,
    /// Instance-side dispatch table
    pub instance_methods: Vec<MethodRecord>,
    /// Class-side dispatch table (the metaclass's)
    pub class_methods: Vec<MethodRecord>,
}

/// Interop metadata of one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSymbols {
    /// Defined classes and protocols in declaration order
    pub classes: Vec<ClassRecord>,
    /// Selector references in interning order
    pub selectors: Vec<String>,
}

impl ModuleSymbols {
    /// Collects records for every valid, non-extern interop class of `ast`.
    #[must_use]
    pub fn collect(ast: &Ast, selectors: &SelectorTable) -> Self {
        let classes = ast
            .classes
            .iter()
            .filter(|(_, decl)| !decl.invalid && !decl.is_extern && !decl.synthesized)
            .filter_map(|(id, decl)| {
                let info = decl.objc.as_ref().filter(|info| !info.is_meta())?;
                Some(class_record(ast, selectors, id, info))
            })
            .collect();

        Self {
            classes,
            selectors: selectors.iter().map(|sel| selectors.name(sel).to_string()).collect(),
        }
    }

    /// Record for the class named `name`.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.iter().find(|record| record.name == name)
    }

    /// Returns true if nothing is emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.selectors.is_empty()
    }
}

fn class_record(
    ast: &Ast,
    selectors: &SelectorTable,
    id: ClassId,
    info: &ObjcClassInfo,
) -> ClassRecord {
    let name = ast.class_name(id).to_string();
    let methods = |class_side: bool| -> Vec<MethodRecord> {
        info.methods()
            .iter()
            .filter(|entry| entry.is_class_method == class_side)
            .filter(|entry| !ast.func(entry.func).invalid)
            .map(|entry: &MethodListEntry| MethodRecord {
                selector: selectors.name(entry.selector).to_string(),
                func: entry.func,
                overrides: ast
                    .func(entry.func)
                    .objc
                    .is_some_and(|f| f.overrides.is_some()),
            })
            .collect()
    };

    ClassRecord {
        class: id,
        symbol: class_symbol(&name),
        metaclass_symbol: info.paired().map(|meta| ast.class_name(meta).to_string()),
        superclass: info.superclass().map(|sup| ast.class_name(sup).to_string()),
        is_interface: ast.class(id).is_interface(),
        instance_methods: methods(false),
        class_methods: methods(true),
        name,
    }
}
