//! Objective-C annotation slots carried by declarations.
//!
//! The interop resolver fills these in during semantic analysis; the code
//! generator only reads them. [`ObjcClassInfo`] exposes no way to rewrite a
//! class↔metaclass pairing once made, and its method list can only grow.

use crate::decl::{ClassId, FuncId};
use objcx_mem::{AppendOnlyList, Symbol};

/// Handle to an interned selector.
///
/// Handles are issued by the selector table of a compilation session; two
/// handles are equal exactly when they name the same (text, parameter count)
/// pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector(u32);

impl Selector {
    /// Wraps a raw table index.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw table index.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the raw table index as usize.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Which side of a class/metaclass pair an info object describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjcRole {
    /// A class or interface with instances
    Class,
    /// The runtime object holding class-side methods
    Metaclass,
}

/// One entry of a runtime dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodListEntry {
    /// Selector the method answers to
    pub selector: Selector,
    /// The implementing function
    pub func: FuncId,
    /// True for class-side (static) methods
    pub is_class_method: bool,
}

/// Error returned when a pairing would overwrite an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyPaired {
    /// The declaration the info is already paired with
    pub existing: ClassId,
}

/// Interop metadata of a class or interface declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjcClassInfo {
    name: Symbol,
    role: ObjcRole,
    is_extern: bool,
    paired: Option<ClassId>,
    superclass: Option<ClassId>,
    methods: AppendOnlyList<MethodListEntry>,
}

impl ObjcClassInfo {
    /// Info for a class or interface. `superclass` is its nearest interop
    /// superclass, if any.
    #[must_use]
    pub fn class(name: Symbol, is_extern: bool, superclass: Option<ClassId>) -> Self {
        Self {
            name,
            role: ObjcRole::Class,
            is_extern,
            paired: None,
            superclass,
            methods: AppendOnlyList::new(),
        }
    }

    /// Info for a metaclass that mirrors `class`. `superclass` is the
    /// metaclass of the class's superclass, if any.
    #[must_use]
    pub fn metaclass(
        name: Symbol,
        is_extern: bool,
        class: ClassId,
        superclass: Option<ClassId>,
    ) -> Self {
        Self {
            name,
            role: ObjcRole::Metaclass,
            is_extern,
            paired: Some(class),
            superclass,
            methods: AppendOnlyList::new(),
        }
    }

    /// Runtime-visible name.
    #[must_use]
    pub fn name(&self) -> Symbol {
        self.name
    }

    /// Class or metaclass.
    #[must_use]
    pub fn role(&self) -> ObjcRole {
        self.role
    }

    /// True for the metaclass side of a pair.
    #[must_use]
    pub fn is_meta(&self) -> bool {
        self.role == ObjcRole::Metaclass
    }

    /// True if the declaration comes from a foreign header.
    #[must_use]
    pub fn is_extern(&self) -> bool {
        self.is_extern
    }

    /// For a class: its metaclass. For a metaclass: the class it mirrors.
    #[must_use]
    pub fn paired(&self) -> Option<ClassId> {
        self.paired
    }

    /// Records the other half of the pair.
    ///
    /// Setting the same partner twice is accepted; replacing a partner is
    /// refused.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadyPaired`] if a different partner is already recorded.
    pub fn set_paired(&mut self, partner: ClassId) -> Result<(), AlreadyPaired> {
        match self.paired {
            Some(existing) if existing != partner => Err(AlreadyPaired { existing }),
            _ => {
                self.paired = Some(partner);
                Ok(())
            }
        }
    }

    /// Nearest interop superclass.
    #[must_use]
    pub fn superclass(&self) -> Option<ClassId> {
        self.superclass
    }

    /// True iff there is no interop superclass.
    #[must_use]
    pub fn is_root_class(&self) -> bool {
        self.superclass.is_none()
    }

    /// Method list in declaration order.
    #[must_use]
    pub fn methods(&self) -> &AppendOnlyList<MethodListEntry> {
        &self.methods
    }

    /// Instance-side entries in declaration order.
    pub fn instance_methods(&self) -> impl Iterator<Item = &MethodListEntry> + '_ {
        self.methods.iter().filter(|entry| !entry.is_class_method)
    }

    /// Class-side entries in declaration order.
    pub fn class_methods(&self) -> impl Iterator<Item = &MethodListEntry> + '_ {
        self.methods.iter().filter(|entry| entry.is_class_method)
    }

    /// Finds this class's own entry for `selector` on the given side.
    #[must_use]
    pub fn find_method(&self, selector: Selector, is_class_method: bool) -> Option<&MethodListEntry> {
        self.methods
            .iter()
            .find(|entry| entry.selector == selector && entry.is_class_method == is_class_method)
    }

    /// Appends an entry and returns its position.
    pub fn push_method(&mut self, entry: MethodListEntry) -> usize {
        self.methods.push(entry)
    }
}

/// How calls to a function are bound at the ABI level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// Direct call to a foreign-linked symbol
    StaticForeign,
    /// Message send through the runtime, looked up by selector
    Dynamic,
    /// The declaration cannot be bound; it was reported and is excluded
    Unsupported,
}

/// Interop metadata of a function declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjcFuncInfo {
    /// Assigned selector
    pub selector: Option<Selector>,
    /// True if the `_cmd` parameter is passed at the call boundary
    pub needs_selector_param: bool,
    /// Binding classification
    pub dispatch: Dispatch,
    /// Ancestor class whose method with the same selector this one overrides
    pub overrides: Option<ClassId>,
}

impl ObjcFuncInfo {
    /// Info for a function that carries `selector`.
    #[must_use]
    pub fn with_selector(selector: Selector, dispatch: Dispatch, needs_selector_param: bool) -> Self {
        Self {
            selector: Some(selector),
            needs_selector_param,
            dispatch,
            overrides: None,
        }
    }
}
