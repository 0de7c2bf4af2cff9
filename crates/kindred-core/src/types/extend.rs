//! Extension engine: `implement`, `extend`, `alias` and their helpers.
//!
//! Instance installs fire hooks, honor protection, then synthesize the
//! generic static form. Static installs only honor protection.

use tracing::{debug, trace};

use crate::runtime::value::{Func, Value};
use crate::types::descriptor::{Member, TypeRef};
use crate::types::hooks::Hook;
use crate::types::overload::Entries;
use crate::types::registry::Registry;

impl Registry {
    // ── Public entry points (setter form) ─────────────────────────────────────

    /// Install instance members on `target`.
    pub fn implement<'t>(&self, target: &'t TypeRef, entries: impl Into<Entries<Member>>) -> &'t TypeRef {
        entries.into().apply(|name, member| self.implement_one(target, name, member));
        target
    }

    /// Install static members on `target`.
    pub fn extend<'t>(&self, target: &'t TypeRef, entries: impl Into<Entries<Member>>) -> &'t TypeRef {
        entries.into().apply(|name, member| self.extend_one(target, name, member));
        target
    }

    /// Re-install the instance member `existing` under `new_name` (pairs are
    /// `(new_name, existing)`). A missing `existing` installs nothing.
    pub fn alias<'t, 'e>(&self, target: &'t TypeRef, entries: impl Into<Entries<&'e str>>) -> &'t TypeRef {
        entries.into().apply(|new_name, existing| {
            match target.instance_member(existing) {
                Some(member) => self.implement_one(target, new_name, member),
                None => trace!(ty = target.name(), existing, "alias of missing member"),
            }
        });
        target
    }

    /// Chaining handle over `target`.
    pub fn with<'a>(&'a self, target: &'a TypeRef) -> Extender<'a> {
        Extender { registry: self, target }
    }

    // ── Protection ────────────────────────────────────────────────────────────

    /// Install members as protected even over protected slots, then run the
    /// ordinary instance path for hooks and generics and protect the generics.
    pub fn force<'t>(&self, target: &'t TypeRef, entries: impl Into<Entries<Member>>) -> &'t TypeRef {
        entries.into().apply(|name, member| {
            let member = member.protect();
            target.instance_surface().borrow_mut().put(name, member.clone());
            self.implement_one(target, name, member);
            target.static_surface().borrow_mut().protect(name);
        });
        target
    }

    /// Mark the instance slot `name` protected. False if the slot is empty.
    pub fn protect_member(&self, target: &TypeRef, name: &str) -> bool {
        target.instance_surface().borrow_mut().protect(name)
    }

    /// Mark the static slot `name` protected. False if the slot is empty.
    pub fn protect_static(&self, target: &TypeRef, name: &str) -> bool {
        target.static_surface().borrow_mut().protect(name)
    }

    // ── Installers ────────────────────────────────────────────────────────────

    pub(crate) fn implement_one(&self, target: &TypeRef, name: &str, member: Member) {
        if member.hidden {
            trace!(ty = target.name(), name, "hidden instance member");
            target.instance_surface().borrow_mut().put(name, member);
            return;
        }

        self.in_flight.borrow_mut().push((target.clone(), name.to_string()));
        self.fire_hooks(target, name, &member);
        self.in_flight.borrow_mut().pop();

        let callable = member.is_callable();
        let written = target.instance_surface().borrow_mut().write(name, member);
        if written {
            trace!(ty = target.name(), name, "instance member installed");
        } else {
            debug!(ty = target.name(), name, "protected instance member kept");
        }

        if !callable {
            return;
        }
        if let Some(method) = target.instance_member(name).and_then(|m| m.as_func().cloned()) {
            self.extend_one(target, name, Member::new(generic(name, method)));
        }
    }

    pub(crate) fn extend_one(&self, target: &TypeRef, name: &str, member: Member) {
        if member.hidden {
            target.static_surface().borrow_mut().put(name, member);
            return;
        }
        if target.static_surface().borrow_mut().write(name, member) {
            trace!(ty = target.name(), name, "static member installed");
        } else {
            debug!(ty = target.name(), name, "protected static member kept");
        }
    }
}

/// Free-function form of `method`: the first argument becomes the receiver.
fn generic(name: &str, method: Func) -> Func {
    Func::new(name, move |registry, _this, args| {
        let (item, rest) = match args.split_first() {
            Some((item, rest)) => (item.clone(), rest),
            None => (Value::Null, args),
        };
        method.call(registry, &item, rest)
    })
}

// ─── Chaining ─────────────────────────────────────────────────────────────────

/// Borrowed `(registry, type)` pair whose methods return itself.
pub struct Extender<'a> {
    registry: &'a Registry,
    target: &'a TypeRef,
}

impl<'a> Extender<'a> {
    pub fn implement(self, entries: impl Into<Entries<Member>>) -> Self {
        self.registry.implement(self.target, entries);
        self
    }

    pub fn extend(self, entries: impl Into<Entries<Member>>) -> Self {
        self.registry.extend(self.target, entries);
        self
    }

    pub fn alias<'e>(self, entries: impl Into<Entries<&'e str>>) -> Self {
        self.registry.alias(self.target, entries);
        self
    }

    pub fn mirror(self, hook: impl Into<Hook>) -> Self {
        self.registry.mirror(self.target, hook);
        self
    }

    pub fn target(&self) -> &'a TypeRef { self.target }
}
