//! Mirror hooks: per-category callbacks replaying member installs elsewhere.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::runtime::value::Value;
use crate::types::descriptor::{Member, TypeRef};
use crate::types::registry::Registry;

/// Receives `(registry, source type, member name, member)` for every
/// non-hidden install on a type of the hooked category.
pub type HookFn = dyn Fn(&Registry, &TypeRef, &str, &Member);

#[derive(Clone)]
pub enum Hook {
    /// Re-run the install on another type, through its own `implement` path.
    Type(TypeRef),
    Callback(Rc<HookFn>),
}

impl Hook {
    pub fn callback(f: impl Fn(&Registry, &TypeRef, &str, &Member) + 'static) -> Self {
        Hook::Callback(Rc::new(f))
    }

    /// Copy each future member's value onto `object` (a record or instance)
    /// under the member's name.
    pub fn onto(object: Value) -> Self {
        Hook::callback(move |_, _, name, member| {
            object.set_field(name, member.value.clone());
        })
    }
}

impl From<&TypeRef> for Hook {
    fn from(ty: &TypeRef) -> Self { Hook::Type(ty.clone()) }
}

impl From<TypeRef> for Hook {
    fn from(ty: TypeRef) -> Self { Hook::Type(ty) }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Type(t)     => write!(f, "Hook::Type({})", t.name()),
            Hook::Callback(_) => write!(f, "Hook::Callback"),
        }
    }
}

impl Registry {
    /// Append `hook` to the list for `target`'s category. Hooks are permanent.
    pub fn mirror<'t>(&self, target: &'t TypeRef, hook: impl Into<Hook>) -> &'t TypeRef {
        let category = self.category_of(target);
        let hook = hook.into();
        debug!(category = %category, ?hook, "hook registered");
        self.hooks.borrow_mut().entry(category).or_default().push(hook);
        target
    }

    pub fn hook_count(&self, category: &str) -> usize {
        self.hooks.borrow().get(category).map_or(0, Vec::len)
    }

    /// Fire every hook of `target`'s category, in registration order.
    ///
    /// Iterates over a snapshot: hooks registered while firing only see later installs.
    pub(crate) fn fire_hooks(&self, target: &TypeRef, name: &str, member: &Member) {
        let category = self.category_of(target);
        let hooks = self.hooks.borrow().get(&category).cloned().unwrap_or_default();
        if hooks.is_empty() {
            return;
        }
        trace!(category = %category, name, count = hooks.len(), "firing hooks");

        for hook in hooks {
            match hook {
                Hook::Type(ty) => {
                    // A type already installing `name` further up this chain.
                    if self.is_in_flight(&ty, name) {
                        trace!(ty = ty.name(), name, "hook cycle skipped");
                        continue;
                    }
                    self.implement_one(&ty, name, member.clone());
                }
                Hook::Callback(f) => f(self, target, name, member),
            }
        }
    }

    fn is_in_flight(&self, ty: &TypeRef, name: &str) -> bool {
        self.in_flight.borrow().iter().any(|(t, n)| Rc::ptr_eq(t, ty) && n == name)
    }
}
