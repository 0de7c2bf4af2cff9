//! Type registry: the single owner of every type object, tag and hook.
//!
//! Consumed by:
//!   • The extension engine: implement / extend / alias / mirror
//!   • Tag resolution: resolve_tag / is_instance
//!   • Clone and merge: per-element dispatch on the resolved tag
//!
//! Adding a kind = `define_type` on its representation. There are no globals:
//! everything hangs off one `Registry` built at startup.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::error::RuntimeError;
use crate::runtime::value::Value;
use crate::types::descriptor::{Member, NativeKind, Refine, TagReporter, TypeObject, TypeRef};
use crate::types::hooks::Hook;
use crate::types::overload::{Keys, Lookup, lookup};

// ─── Predicates ───────────────────────────────────────────────────────────────

/// The `is<Name>` check generated for every named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPredicate {
    name: String,
    tag: String,
}

impl TagPredicate {
    /// `is` + the name as given, e.g. `isWidget`.
    pub fn name(&self) -> String { format!("is{}", self.name) }

    pub fn tag(&self) -> &str { &self.tag }

    pub fn test(&self, registry: &Registry, item: &Value) -> bool {
        registry.resolve_tag(item) == self.tag
    }
}

// ─── Registry ─────────────────────────────────────────────────────────────────

pub struct Registry {
    meta: TypeRef,
    natives: HashMap<NativeKind, TypeRef>,
    types: RefCell<HashMap<String, TypeRef>>,
    predicates: RefCell<HashMap<String, TagPredicate>>,
    pub(crate) hooks: RefCell<HashMap<String, Vec<Hook>>>,
    /// `(type, member name)` pairs currently being implemented.
    pub(crate) in_flight: RefCell<Vec<(TypeRef, String)>>,
}

impl Registry {
    /// Bare engine: native kinds exist but only the meta `Type` is registered.
    pub fn new() -> Self {
        let natives = NativeKind::ALL.iter()
            .map(|&k| (k, TypeObject::native(k)))
            .collect();
        let r = Self {
            meta: TypeObject::new("Type"),
            natives,
            types: RefCell::new(HashMap::new()),
            predicates: RefCell::new(HashMap::new()),
            hooks: RefCell::new(HashMap::new()),
            in_flight: RefCell::new(Vec::new()),
        };
        let meta = r.meta.clone();
        r.define_type(Some("Type"), Some(&meta));
        r
    }

    /// Engine with the default kinds registered and their native members protected.
    pub fn standard() -> Self {
        let r = Self::new();
        crate::builtins::install(&r);
        r
    }

    /// The type of registered types.
    pub fn meta(&self) -> &TypeRef { &self.meta }

    pub fn native(&self, kind: NativeKind) -> &TypeRef {
        &self.natives[&kind]
    }

    // ── Definition ────────────────────────────────────────────────────────────

    /// Register `representation` under `name`.
    ///
    /// * A name always yields an `is<Name>` predicate, even without a representation.
    /// * No representation → `None`: the tag exists for classification only.
    /// * No name → the representation is registered anonymously (no tag).
    ///
    /// Defining a name twice re-binds it. Members already installed are kept.
    pub fn define_type(&self, name: Option<&str>, representation: Option<&TypeRef>) -> Option<TypeRef> {
        let name = name.filter(|n| !n.is_empty());
        let lower = name.map(str::to_lowercase);

        if let (Some(name), Some(lower)) = (name, lower.as_ref()) {
            self.predicates.borrow_mut().insert(lower.clone(), TagPredicate {
                name: name.to_string(),
                tag: lower.clone(),
            });
        }

        let repr = representation?;
        repr.bind(lower.as_deref());
        if let Some(lower) = lower {
            debug!(tag = %lower, representation = repr.name(), "type defined");
            self.types.borrow_mut().insert(lower, repr.clone());
        }
        Some(repr.clone())
    }

    /// Replace the tag reporter of a defined type with a per-value refinement.
    /// Has no effect on untagged types.
    pub fn refine_tag(&self, ty: &TypeRef, refine: Refine) {
        if let Some(tag) = ty.tag() {
            ty.set_reporter(TagReporter::refined(tag, refine));
        }
    }

    /// Descriptor bound to `tag`, if any. Lookups are case-insensitive.
    pub fn type_of_tag(&self, tag: &str) -> Option<TypeRef> {
        self.types.borrow().get(&tag.to_lowercase()).cloned()
    }

    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.types.borrow().keys().cloned().collect();
        tags.sort();
        tags
    }

    // ── Predicates ────────────────────────────────────────────────────────────

    /// Look a predicate up by its generated name (`isWidget`), by the name
    /// the type was defined with, or by its tag.
    pub fn predicate(&self, name: &str) -> Option<TagPredicate> {
        let predicates = self.predicates.borrow();
        if let Some(p) = predicates.values().find(|p| p.name() == name) {
            return Some(p.clone());
        }
        let key = name.strip_prefix("is").filter(|rest| {
            rest.starts_with(|c: char| c.is_uppercase())
        }).unwrap_or(name);
        predicates.get(&key.to_lowercase()).cloned()
    }

    /// Run the predicate for `name`. Unknown names answer `false`.
    pub fn is(&self, name: &str, item: &Value) -> bool {
        self.predicate(name).is_some_and(|p| p.test(self, item))
    }

    pub fn predicates(&self) -> Vec<TagPredicate> {
        let mut all: Vec<TagPredicate> = self.predicates.borrow().values().cloned().collect();
        all.sort_by(|a, b| a.tag.cmp(&b.tag));
        all
    }

    // ── Representations ───────────────────────────────────────────────────────

    /// The type object a value was constructed by. `None` only for `Null`.
    pub fn constructor_of(&self, item: &Value) -> Option<TypeRef> {
        let kind = match item {
            Value::Null        => return None,
            Value::Instance(i) => return Some(i.constructor.clone()),
            Value::Type(t) if t.is_registered() => return Some(self.meta.clone()),
            Value::Type(_)     => NativeKind::Function,
            Value::Bool(_)     => NativeKind::Boolean,
            Value::Number(_)   => NativeKind::Number,
            Value::Str(_)      => NativeKind::String,
            Value::List(_)     => NativeKind::Array,
            Value::Record(_)   => NativeKind::Object,
            Value::Function(_) => NativeKind::Function,
            Value::Node(_)     => NativeKind::Node,
        };
        Some(self.native(kind).clone())
    }

    /// `ty`, its native bases, then `Object`, where every host chain ends.
    pub fn lineage(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let object = self.native(NativeKind::Object);
        let mut chain = vec![ty.clone()];
        let mut cursor = ty.base().cloned();
        while let Some(t) = cursor {
            cursor = t.base().cloned();
            chain.push(t);
        }
        if !chain.iter().any(|t| Rc::ptr_eq(t, object)) {
            chain.push(object.clone());
        }
        chain
    }

    // ── Member lookup ─────────────────────────────────────────────────────────

    /// Getter form over the instance surface of `ty`. Misses pass through as `None`.
    pub fn instance_members(&self, ty: &TypeRef, keys: impl Into<Keys>) -> Lookup<Member> {
        lookup(keys, |name| ty.instance_member(name))
    }

    /// Getter form over the static surface of `ty`. Misses pass through as `None`.
    pub fn static_members(&self, ty: &TypeRef, keys: impl Into<Keys>) -> Lookup<Member> {
        lookup(keys, |name| ty.static_member(name))
    }

    /// The member `item` answers to under `name`, searched along its lineage.
    pub fn member_of(&self, item: &Value, name: &str) -> Option<Member> {
        let ctor = self.constructor_of(item)?;
        self.lineage(&ctor).iter().find_map(|t| t.instance_member(name))
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    /// Call the instance member `name` with `item` as receiver.
    pub fn call_method(&self, item: &Value, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        let member = self.member_of(item, name)
            .ok_or_else(|| RuntimeError::member_not_found(self.resolve_tag(item), name))?;
        let func = member.as_func().ok_or_else(|| RuntimeError::NotCallable(name.to_string()))?;
        func.call(self, item, args)
    }

    /// Call the static member `name` of `ty`; the receiver is the type itself.
    pub fn call_static(&self, ty: &TypeRef, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        let member = ty.static_member(name)
            .ok_or_else(|| RuntimeError::member_not_found(ty.name(), name))?;
        let func = member.as_func().ok_or_else(|| RuntimeError::NotCallable(name.to_string()))?;
        func.call(self, &Value::Type(ty.clone()), args)
    }
}

impl Default for Registry {
    fn default() -> Self { Self::standard() }
}
