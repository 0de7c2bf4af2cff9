//! Type objects and their capability tables.
//!
//! A `TypeObject` is the representation a tag is bound to. It owns two member
//! tables: the instance surface (behavior of values of this kind) and the
//! static surface (behavior of the type itself, including generics).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::runtime::value::{Func, Value};
use crate::error::RuntimeError;
use crate::types::registry::Registry;

pub type TypeRef = Rc<TypeObject>;

// ─── Native kinds ─────────────────────────────────────────────────────────────

/// Built-in host kinds. Each has a type object from the moment a registry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    Boolean,
    Number,
    String,
    Function,
    Array,
    Object,
    Node,
}

impl NativeKind {
    pub const ALL: [NativeKind; 7] = [
        NativeKind::Boolean,
        NativeKind::Number,
        NativeKind::String,
        NativeKind::Function,
        NativeKind::Array,
        NativeKind::Object,
        NativeKind::Node,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NativeKind::Boolean  => "Boolean",
            NativeKind::Number   => "Number",
            NativeKind::String   => "String",
            NativeKind::Function => "Function",
            NativeKind::Array    => "Array",
            NativeKind::Object   => "Object",
            NativeKind::Node     => "Node",
        }
    }
}

// ─── Members ──────────────────────────────────────────────────────────────────

/// One named capability: the installed value plus its installation flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub value: Value,
    /// A later plain installation under the same name is a no-op.
    pub protected: bool,
    /// Installed on its own target only: never mirrored, never made generic.
    pub hidden: bool,
}

impl Member {
    pub fn new(value: impl Into<Value>) -> Self {
        Self { value: value.into(), protected: false, hidden: false }
    }

    pub fn function<F>(name: &str, body: F) -> Self
    where
        F: Fn(&Registry, &Value, &[Value]) -> Result<Value, RuntimeError> + 'static,
    {
        Self::new(Func::new(name, body))
    }

    pub fn protect(mut self) -> Self {
        self.protected = true;
        self
    }

    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn is_callable(&self) -> bool { self.value.is_callable() }

    pub fn as_func(&self) -> Option<&Func> { self.value.as_func() }
}

impl From<Value> for Member {
    fn from(value: Value) -> Self { Member::new(value) }
}

impl From<Func> for Member {
    fn from(f: Func) -> Self { Member::new(f) }
}

/// A member table. Either the instance or the static surface of a type.
#[derive(Debug, Default)]
pub struct Surface {
    slots: HashMap<String, Member>,
}

impl Surface {
    pub fn get(&self, name: &str) -> Option<&Member> { self.slots.get(name) }

    pub fn is_protected(&self, name: &str) -> bool {
        self.slots.get(name).is_some_and(|m| m.protected)
    }

    /// Unconditional write. Only hidden installs and explicit re-protection use this.
    pub(crate) fn put(&mut self, name: &str, member: Member) {
        self.slots.insert(name.to_string(), member);
    }

    /// Write unless the current occupant is protected. Returns whether it wrote.
    pub(crate) fn write(&mut self, name: &str, member: Member) -> bool {
        if self.is_protected(name) {
            return false;
        }
        self.slots.insert(name.to_string(), member);
        true
    }

    /// Returns false when there is nothing to protect.
    pub(crate) fn protect(&mut self, name: &str) -> bool {
        match self.slots.get_mut(name) {
            Some(m) => { m.protected = true; true }
            None => false,
        }
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize { self.slots.len() }
    pub fn is_empty(&self) -> bool { self.slots.is_empty() }
}

// ─── Tag reporting ────────────────────────────────────────────────────────────

/// Per-value override of a reported tag. `None` keeps the fixed tag.
pub type Refine = Rc<dyn Fn(&Value) -> Option<String>>;

/// The authoritative tag source attached by `define_type`.
#[derive(Clone)]
pub struct TagReporter {
    tag: String,
    refine: Option<Refine>,
}

impl TagReporter {
    pub fn fixed(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), refine: None }
    }

    pub fn refined(tag: impl Into<String>, refine: Refine) -> Self {
        Self { tag: tag.into(), refine: Some(refine) }
    }

    /// Tag reported for the type's own surface (its hook category).
    pub fn surface_tag(&self) -> &str { &self.tag }

    /// Tag reported for a value of this kind.
    pub fn report(&self, value: &Value) -> String {
        self.refine.as_ref()
            .and_then(|r| r(value))
            .unwrap_or_else(|| self.tag.clone())
    }
}

impl fmt::Debug for TagReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagReporter")
            .field("tag", &self.tag)
            .field("refined", &self.refine.is_some())
            .finish()
    }
}

// ─── Type object ──────────────────────────────────────────────────────────────

pub struct TypeObject {
    name: String,
    native: Option<NativeKind>,
    /// Host-native inheritance. Fixed at creation.
    base: Option<TypeRef>,
    /// Declared linkage, consulted first by `is_instance`.
    parent: RefCell<Option<TypeRef>>,
    tag: RefCell<Option<String>>,
    reporter: RefCell<Option<TagReporter>>,
    /// Set once the registry has constructed this type.
    registered: Cell<bool>,
    instance: RefCell<Surface>,
    statics: RefCell<Surface>,
}

impl TypeObject {
    fn build(name: &str, native: Option<NativeKind>, base: Option<TypeRef>) -> TypeRef {
        Rc::new(Self {
            name: name.to_string(),
            native,
            base,
            parent: RefCell::new(None),
            tag: RefCell::new(None),
            reporter: RefCell::new(None),
            registered: Cell::new(false),
            instance: RefCell::new(Surface::default()),
            statics: RefCell::new(Surface::default()),
        })
    }

    /// A fresh, untagged representation.
    pub fn new(name: &str) -> TypeRef { Self::build(name, None, None) }

    /// A representation that natively inherits from `base`.
    pub fn derived(name: &str, base: &TypeRef) -> TypeRef {
        Self::build(name, None, Some(base.clone()))
    }

    pub(crate) fn native(kind: NativeKind) -> TypeRef {
        Self::build(kind.name(), Some(kind), None)
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn native_kind(&self) -> Option<NativeKind> { self.native }

    pub fn base(&self) -> Option<&TypeRef> { self.base.as_ref() }

    pub fn parent(&self) -> Option<TypeRef> { self.parent.borrow().clone() }

    pub fn set_parent(&self, parent: Option<&TypeRef>) {
        *self.parent.borrow_mut() = parent.cloned();
    }

    pub fn tag(&self) -> Option<String> { self.tag.borrow().clone() }

    pub fn is_registered(&self) -> bool { self.registered.get() }

    pub fn instance_member(&self, name: &str) -> Option<Member> {
        self.instance.borrow().get(name).cloned()
    }

    pub fn static_member(&self, name: &str) -> Option<Member> {
        self.statics.borrow().get(name).cloned()
    }

    pub fn instance_names(&self) -> Vec<String> { self.instance.borrow().names() }

    pub fn static_names(&self) -> Vec<String> { self.statics.borrow().names() }

    pub(crate) fn instance_surface(&self) -> &RefCell<Surface> { &self.instance }

    pub(crate) fn static_surface(&self) -> &RefCell<Surface> { &self.statics }

    pub(crate) fn reporter(&self) -> Option<TagReporter> { self.reporter.borrow().clone() }

    pub(crate) fn set_reporter(&self, reporter: TagReporter) {
        *self.reporter.borrow_mut() = Some(reporter);
    }

    pub(crate) fn bind(&self, tag: Option<&str>) {
        if let Some(tag) = tag {
            *self.tag.borrow_mut() = Some(tag.to_string());
            self.set_reporter(TagReporter::fixed(tag));
        }
        self.registered.set(true);
    }
}

impl fmt::Debug for TypeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeObject")
            .field("name", &self.name)
            .field("tag", &self.tag.borrow())
            .field("registered", &self.registered.get())
            .finish_non_exhaustive()
    }
}
