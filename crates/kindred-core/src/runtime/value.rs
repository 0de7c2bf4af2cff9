//! Host value model.
//!
//! These are the "native kinds" the engine retrofits a type model onto. None of
//! them carries a tag of its own; tags come from the registry (authoritative)
//! or from shape sniffing (fallback).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::types::descriptor::TypeRef;
use crate::types::registry::Registry;

// ─── Callables ────────────────────────────────────────────────────────────────

/// Native body of a callable: `(registry, this, args)`.
pub type NativeFn = dyn Fn(&Registry, &Value, &[Value]) -> Result<Value, RuntimeError>;

/// A callable host value. Equality is identity.
#[derive(Clone)]
pub struct Func {
    name: Rc<str>,
    body: Rc<NativeFn>,
}

impl Func {
    pub fn new<F>(name: &str, body: F) -> Self
    where
        F: Fn(&Registry, &Value, &[Value]) -> Result<Value, RuntimeError> + 'static,
    {
        Self { name: Rc::from(name), body: Rc::new(body) }
    }

    /// A function ignoring its receiver and arguments.
    pub fn constant(value: Value) -> Self {
        Self::new("constant", move |_, _, _| Ok(value.clone()))
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn call(&self, registry: &Registry, this: &Value, args: &[Value]) -> Result<Value, RuntimeError> {
        (self.body)(registry, this, args)
    }

    pub fn ptr_eq(&self, other: &Func) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool { self.ptr_eq(other) }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name)
    }
}

// ─── Records ──────────────────────────────────────────────────────────────────

/// String-keyed record that iterates in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Insert or replace. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut r = Record::new();
        for (k, v) in iter {
            r.insert(k, v);
        }
        r
    }
}

// ─── Nodes ────────────────────────────────────────────────────────────────────

pub const ELEMENT_NODE: u8 = 1;
pub const TEXT_NODE: u8 = 3;
pub const COMMENT_NODE: u8 = 8;

/// Document-node-like host value. Never registered; classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub node_type: u8,
    pub content: Option<String>,
}

impl Node {
    pub fn element(name: impl Into<String>) -> Self {
        Self { name: name.into(), node_type: ELEMENT_NODE, content: None }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self { name: "#text".into(), node_type: TEXT_NODE, content: Some(content.into()) }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Self { name: "#comment".into(), node_type: COMMENT_NODE, content: Some(content.into()) }
    }
}

// ─── Instances ────────────────────────────────────────────────────────────────

/// A value built from a user-declared type object.
#[derive(Debug)]
pub struct Instance {
    pub constructor: TypeRef,
    pub fields: RefCell<Record>,
}

// ─── Value ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Rc<RefCell<Vec<Value>>>),
    Record(Rc<RefCell<Record>>),
    Function(Func),
    Node(Rc<Node>),
    Instance(Rc<Instance>),
    Type(TypeRef),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self { Value::Str(s.into()) }

    pub fn list(items: Vec<Value>) -> Self { Value::List(Rc::new(RefCell::new(items))) }

    pub fn record<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Record(Rc::new(RefCell::new(entries.into_iter().collect())))
    }

    pub fn empty_record() -> Self { Value::Record(Rc::new(RefCell::new(Record::new()))) }

    pub fn function<F>(name: &str, body: F) -> Self
    where
        F: Fn(&Registry, &Value, &[Value]) -> Result<Value, RuntimeError> + 'static,
    {
        Value::Function(Func::new(name, body))
    }

    pub fn node(node: Node) -> Self { Value::Node(Rc::new(node)) }

    /// Build an instance of `ty` with the given fields.
    pub fn instance<K: Into<String>>(ty: &TypeRef, fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Instance(Rc::new(Instance {
            constructor: ty.clone(),
            fields: RefCell::new(fields.into_iter().collect()),
        }))
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn is_callable(&self) -> bool { matches!(self, Value::Function(_)) }

    /// Bool, number and string: values the host never treats as objects.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Number(_) | Value::Str(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&Func> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Reference identity for shared kinds, equality for everything else.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            (Value::Node(a), Value::Node(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => self == other,
        }
    }

    // ── Field access (records and instances) ─────────────────────────────────

    pub fn field(&self, key: &str) -> Option<Value> {
        match self {
            Value::Record(r) => r.borrow().get(key).cloned(),
            Value::Instance(i) => i.fields.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Returns false when `self` has no fields to set.
    pub fn set_field(&self, key: impl Into<String>, value: Value) -> bool {
        match self {
            Value::Record(r) => { r.borrow_mut().insert(key, value); true }
            Value::Instance(i) => { i.fields.borrow_mut().insert(key, value); true }
            _ => false,
        }
    }

    /// Snapshot of `(key, value)` pairs, in insertion order.
    pub fn entries(&self) -> Option<Vec<(String, Value)>> {
        let snapshot = |r: &Record| r.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        match self {
            Value::Record(r) => Some(snapshot(&r.borrow())),
            Value::Instance(i) => Some(snapshot(&i.fields.borrow())),
            _ => None,
        }
    }

    /// Visit every entry of a record-like value. Other values are skipped.
    pub fn for_each_entry(&self, mut f: impl FnMut(&str, &Value)) {
        for (k, v) in self.entries().unwrap_or_default() {
            f(&k, &v);
        }
    }
}

impl PartialEq for Value {
    /// Lists and records compare by content; callables, nodes, instances and
    /// types by identity. NaN is unequal to itself, as on the host.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Type(a), Value::Type(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value { fn from(b: bool) -> Self { Value::Bool(b) } }
impl From<f64> for Value { fn from(n: f64) -> Self { Value::Number(n) } }
impl From<i32> for Value { fn from(n: i32) -> Self { Value::Number(n as f64) } }
impl From<&str> for Value { fn from(s: &str) -> Self { Value::Str(s.to_string()) } }
impl From<String> for Value { fn from(s: String) -> Self { Value::Str(s) } }
impl From<Func> for Value { fn from(f: Func) -> Self { Value::Function(f) } }
impl From<Node> for Value { fn from(n: Node) -> Self { Value::node(n) } }
impl From<TypeRef> for Value { fn from(t: TypeRef) -> Self { Value::Type(t) } }

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self { Value::list(items) }
}

// ─── Host stringification ─────────────────────────────────────────────────────

/// Render a number the way the host prints it: integral values without a
/// fractional part, very large or very small magnitudes in exponent form,
/// non-finite values by name.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else if n == 0.0 {
        "0".into()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let raw = format!("{n:e}");
        match raw.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => raw,
        }
    } else if n == n.trunc() {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null        => write!(f, "null"),
            Value::Bool(b)     => write!(f, "{b}"),
            Value::Number(n)   => write!(f, "{}", format_number(*n)),
            Value::Str(s)      => write!(f, "{s}"),
            Value::List(items) => {
                let parts: Vec<String> = items.borrow().iter()
                    .map(|v| if v.is_null() { String::new() } else { v.to_string() })
                    .collect();
                write!(f, "{}", parts.join(","))
            }
            Value::Record(_)   => write!(f, "[object Object]"),
            Value::Function(g) => write!(f, "function {}() {{ [native code] }}", g.name()),
            Value::Node(n)     => write!(f, "[object {}]", n.name),
            Value::Instance(i) => write!(f, "[object {}]", i.constructor.name()),
            Value::Type(t)     => write!(f, "function {}() {{ [native code] }}", t.name()),
        }
    }
}
