//! Standard types: the host kinds every registry built with
//! `Registry::standard()` knows about.
//!
//! Native members are forced in as protected, so later plain installs under
//! the same names are no-ops. Conveniences added on top (`each`, `clone`,
//! `merge`, `from`) stay unprotected.

mod array;
mod date;
mod function;
mod number;
mod object;
mod string;

use std::cell::RefCell;
use std::rc::Rc;

use crate::convert;
use crate::error::RuntimeError;
use crate::runtime::value::{Func, Value};
use crate::types::descriptor::{Member, NativeKind, TypeObject, TypeRef};
use crate::types::registry::Registry;
use crate::types::resolve::primitive_tag;

/// Tags that only ever come from shape sniffing.
pub const VIRTUAL_TYPES: [&str; 5] = ["Object", "WhiteSpace", "TextNode", "Collection", "Arguments"];

pub(crate) fn install(registry: &Registry) {
    let array = define_native(registry, "Array", NativeKind::Array);
    registry.force(&array, array::natives());

    let string = define_native(registry, "String", NativeKind::String);
    registry.force(&string, string::natives());

    let number = define_native(registry, "Number", NativeKind::Number);
    registry.force(&number, number::natives());

    let function = define_native(registry, "Function", NativeKind::Function);
    registry.force(&function, function::natives());

    define_native(registry, "Boolean", NativeKind::Boolean);

    let date = TypeObject::new("Date");
    registry.define_type(Some("Date"), Some(&date));
    registry.extend(&date, date::statics());

    // Non-finite numbers report as "null".
    registry.refine_tag(&number, Rc::new(|v: &Value| {
        v.as_number().filter(|n| !n.is_finite()).map(|_| "null".to_string())
    }));

    let object = registry.native(NativeKind::Object).clone();
    registry.extend(&object, object::statics());

    registry.implement(&array, array::extras());

    registry.extend(&function, ("from", Member::function("from", |_, _, args| {
        Ok(Value::Function(convert::function_from(&arg(args, 0))))
    })));
    registry.extend(&array, ("from", Member::function("from", |_, _, args| {
        Ok(convert::list_from(&arg(args, 0)))
    })));
    registry.extend(&number, ("from", Member::function("from", |_, _, args| {
        Ok(convert::number_from(&arg(args, 0)))
    })));
    registry.extend(&string, ("from", Member::function("from", |_, _, args| {
        Ok(Value::Str(convert::string_from(&arg(args, 0))))
    })));

    for name in VIRTUAL_TYPES {
        registry.define_type(Some(name), None);
    }
}

fn define_native(registry: &Registry, name: &str, kind: NativeKind) -> TypeRef {
    let native = registry.native(kind).clone();
    registry.define_type(Some(name), Some(&native));
    native
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// Positional argument, `Null` when absent.
pub(crate) fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or(Value::Null)
}

pub(crate) fn check_argc(name: &str, args: &[Value], n: usize) -> Result<(), RuntimeError> {
    if args.len() < n {
        Err(RuntimeError::Arity { name: name.to_string(), expected: n, got: args.len() })
    } else {
        Ok(())
    }
}

pub(crate) fn as_list(v: &Value, name: &str) -> Result<Rc<RefCell<Vec<Value>>>, RuntimeError> {
    match v {
        Value::List(items) => Ok(items.clone()),
        _ => Err(RuntimeError::bad_argument(name, "array", primitive_tag(v))),
    }
}

pub(crate) fn as_string(v: &Value, name: &str) -> Result<String, RuntimeError> {
    match v {
        Value::Str(s) => Ok(s.clone()),
        _ => Err(RuntimeError::bad_argument(name, "string", primitive_tag(v))),
    }
}

pub(crate) fn as_number(v: &Value, name: &str) -> Result<f64, RuntimeError> {
    match v {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError::bad_argument(name, "number", primitive_tag(v))),
    }
}

pub(crate) fn as_func(v: &Value, name: &str) -> Result<Func, RuntimeError> {
    match v {
        Value::Function(f) => Ok(f.clone()),
        _ => Err(RuntimeError::bad_argument(name, "function", primitive_tag(v))),
    }
}

/// Optional integer argument; `Null` means `default`.
pub(crate) fn int_arg(args: &[Value], i: usize, default: i64, name: &str) -> Result<i64, RuntimeError> {
    match arg(args, i) {
        Value::Null => Ok(default),
        v => Ok(as_number(&v, name)?.trunc() as i64),
    }
}

/// Clamp a possibly negative index into `0..=len`.
pub(crate) fn relative_index(i: i64, len: usize) -> usize {
    let len = len as i64;
    let i = if i < 0 { len + i } else { i };
    i.clamp(0, len) as usize
}
