//! Runtime type tagging and extension for heterogeneous host values.
//!
//! Every `Value` can be asked for its tag, every kind can be extended with
//! instance and static members, installs propagate to related kinds through
//! mirror hooks, and every instance method doubles as a generic free function.
//!
//! ```
//! use kindred_core::{Member, Registry, TypeObject, Value};
//!
//! let registry = Registry::standard();
//! let widget = TypeObject::new("Widget");
//! registry.define_type(Some("Widget"), Some(&widget));
//! registry.implement(&widget, ("describe", Member::function("describe", |_, _, _| {
//!     Ok(Value::from("a widget"))
//! })));
//!
//! let w = Value::instance(&widget, [("size", Value::from(3))]);
//! assert_eq!(registry.resolve_tag(&w), "widget");
//! assert!(registry.is("Widget", &w));
//! assert_eq!(registry.call_static(&widget, "describe", &[w]).unwrap(), Value::from("a widget"));
//! ```

pub mod builtins;
pub mod convert;
pub mod error;
pub mod runtime;
pub mod types;

pub use error::RuntimeError;
pub use runtime::value::{Func, Node, Record, Value};
pub use types::descriptor::{Member, NativeKind, TypeObject, TypeRef};
pub use types::extend::Extender;
pub use types::hooks::Hook;
pub use types::overload::{Entries, Keys, Lookup};
pub use types::registry::{Registry, TagPredicate};

/// Engine release.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
