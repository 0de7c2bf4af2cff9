//! `Array` members. Receivers are lists; callbacks get `(item, index, list)`.

use std::cmp::Ordering;

use crate::error::RuntimeError;
use crate::runtime::value::{Func, Value};
use crate::types::descriptor::Member;
use crate::types::registry::Registry;
use super::{arg, as_func, as_list, as_string, check_argc, int_arg, relative_index};

fn m<F>(name: &'static str, body: F) -> (&'static str, Member)
where
    F: Fn(&Registry, &Value, &[Value]) -> Result<Value, RuntimeError> + 'static,
{
    (name, Member::function(name, body))
}

/// Snapshot of the receiver's items, so callbacks may mutate the list.
fn items(this: &Value, name: &str) -> Result<Vec<Value>, RuntimeError> {
    Ok(as_list(this, name)?.borrow().clone())
}

/// Run `f(item, index, list)` through the callback in `args[0]`, bound to `args[1]`.
fn visit(
    registry: &Registry,
    this: &Value,
    args: &[Value],
    name: &str,
    mut f: impl FnMut(usize, Value, Value) -> Option<Value>,
) -> Result<Option<Value>, RuntimeError> {
    check_argc(name, args, 1)?;
    let callback: Func = as_func(&args[0], name)?;
    let bind = arg(args, 1);
    for (i, item) in items(this, name)?.into_iter().enumerate() {
        let out = callback.call(registry, &bind, &[item.clone(), Value::from(i as f64), this.clone()])?;
        if let Some(stop) = f(i, item, out) {
            return Ok(Some(stop));
        }
    }
    Ok(None)
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null      => false,
        Value::Bool(b)   => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::Str(s)    => !s.is_empty(),
        _                => true,
    }
}

fn position(list: &[Value], needle: &Value) -> Option<usize> {
    list.iter().position(|v| v.same(needle))
}

/// Host default order: by string form, `Null` last.
fn default_order(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.to_string().cmp(&b.to_string()),
    }
}

/// Stable merge sort with a comparator that may fail. A comparator need not
/// be a total order; the result is then some permutation of the input.
fn merge_sort(
    items: Vec<Value>,
    cmp: &mut impl FnMut(&Value, &Value) -> Result<Ordering, RuntimeError>,
) -> Result<Vec<Value>, RuntimeError> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = merge_sort(left, cmp)?;
    let right = merge_sort(right, cmp)?;

    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let next = if cmp(l, r)? == Ordering::Greater { right.next() } else { left.next() };
        out.extend(next);
    }
    out.extend(left);
    out.extend(right);
    Ok(out)
}

/// Shared body of `reduce` and `reduce_right`.
fn fold(
    registry: &Registry,
    this: &Value,
    args: &[Value],
    name: &str,
    from_right: bool,
) -> Result<Value, RuntimeError> {
    check_argc(name, args, 1)?;
    let callback = as_func(&args[0], name)?;
    let mut indexed: Vec<(usize, Value)> = items(this, name)?.into_iter().enumerate().collect();
    if from_right {
        indexed.reverse();
    }
    let mut list = indexed.into_iter();
    let mut acc = match args.get(1) {
        Some(init) => init.clone(),
        None => match list.next() {
            Some((_, first)) => first,
            None => return Err(RuntimeError::bad_argument(name, "initial value", "empty array")),
        },
    };
    for (i, item) in list {
        acc = callback.call(registry, &Value::Null, &[acc, item, Value::from(i as f64), this.clone()])?;
    }
    Ok(acc)
}

pub(super) fn natives() -> Vec<(&'static str, Member)> {
    vec![
        m("push", |_, this, args| {
            let list = as_list(this, "push")?;
            list.borrow_mut().extend(args.iter().cloned());
            Ok(Value::from(list.borrow().len() as f64))
        }),
        m("pop", |_, this, _| {
            Ok(as_list(this, "pop")?.borrow_mut().pop().unwrap_or(Value::Null))
        }),
        m("shift", |_, this, _| {
            let list = as_list(this, "shift")?;
            let mut list = list.borrow_mut();
            Ok(if list.is_empty() { Value::Null } else { list.remove(0) })
        }),
        m("unshift", |_, this, args| {
            let list = as_list(this, "unshift")?;
            list.borrow_mut().splice(0..0, args.iter().cloned());
            Ok(Value::from(list.borrow().len() as f64))
        }),
        m("reverse", |_, this, _| {
            as_list(this, "reverse")?.borrow_mut().reverse();
            Ok(this.clone())
        }),
        m("concat", |_, this, args| {
            let mut out = items(this, "concat")?;
            for a in args {
                match a {
                    Value::List(more) => out.extend(more.borrow().iter().cloned()),
                    other => out.push(other.clone()),
                }
            }
            Ok(Value::list(out))
        }),
        m("join", |_, this, args| {
            let sep = match arg(args, 0) {
                Value::Null => ",".to_string(),
                v => as_string(&v, "join")?,
            };
            let parts: Vec<String> = items(this, "join")?.iter()
                .map(|v| if v.is_null() { String::new() } else { v.to_string() })
                .collect();
            Ok(Value::Str(parts.join(&sep)))
        }),
        m("slice", |_, this, args| {
            let list = items(this, "slice")?;
            let start = relative_index(int_arg(args, 0, 0, "slice")?, list.len());
            let end = relative_index(int_arg(args, 1, list.len() as i64, "slice")?, list.len());
            Ok(Value::list(if start < end { list[start..end].to_vec() } else { Vec::new() }))
        }),
        m("index_of", |_, this, args| {
            let found = position(&items(this, "index_of")?, &arg(args, 0));
            Ok(Value::from(found.map_or(-1.0, |i| i as f64)))
        }),
        m("last_index_of", |_, this, args| {
            let list = items(this, "last_index_of")?;
            let needle = arg(args, 0);
            let found = list.iter().rposition(|v| v.same(&needle));
            Ok(Value::from(found.map_or(-1.0, |i| i as f64)))
        }),
        m("for_each", |reg, this, args| {
            visit(reg, this, args, "for_each", |_, _, _| None)?;
            Ok(Value::Null)
        }),
        m("map", |reg, this, args| {
            let mut out = Vec::new();
            visit(reg, this, args, "map", |_, _, mapped| { out.push(mapped); None })?;
            Ok(Value::list(out))
        }),
        m("filter", |reg, this, args| {
            let mut out = Vec::new();
            visit(reg, this, args, "filter", |_, item, keep| {
                if truthy(&keep) { out.push(item); }
                None
            })?;
            Ok(Value::list(out))
        }),
        m("every", |reg, this, args| {
            let failed = visit(reg, this, args, "every", |_, _, ok| (!truthy(&ok)).then_some(Value::Bool(false)))?;
            Ok(failed.unwrap_or(Value::Bool(true)))
        }),
        m("some", |reg, this, args| {
            let hit = visit(reg, this, args, "some", |_, _, ok| truthy(&ok).then_some(Value::Bool(true)))?;
            Ok(hit.unwrap_or(Value::Bool(false)))
        }),
        m("reduce", |reg, this, args| fold(reg, this, args, "reduce", false)),
        m("reduce_right", |reg, this, args| fold(reg, this, args, "reduce_right", true)),
        // sort(compare?) in place; `compare(a, b)` returns a number.
        m("sort", |reg, this, args| {
            let list = as_list(this, "sort")?;
            let snapshot = list.borrow().clone();
            let sorted = match arg(args, 0) {
                Value::Null => merge_sort(snapshot, &mut |a: &Value, b: &Value| Ok(default_order(a, b)))?,
                compare => {
                    let compare = as_func(&compare, "sort")?;
                    merge_sort(snapshot, &mut |a: &Value, b: &Value| {
                        if a.is_null() || b.is_null() {
                            return Ok(default_order(a, b));
                        }
                        let n = compare.call(reg, &Value::Null, &[a.clone(), b.clone()])?;
                        Ok(match n.as_number() {
                            Some(n) if n < 0.0 => Ordering::Less,
                            Some(n) if n > 0.0 => Ordering::Greater,
                            _ => Ordering::Equal,
                        })
                    })?
                }
            };
            *list.borrow_mut() = sorted;
            Ok(this.clone())
        }),
        // splice(start, delete_count?, ...items) returns the removed items.
        m("splice", |_, this, args| {
            let list = as_list(this, "splice")?;
            let len = list.borrow().len();
            let start = relative_index(int_arg(args, 0, 0, "splice")?, len);
            let count = match args.get(1) {
                None => len - start,
                Some(_) => int_arg(args, 1, 0, "splice")?.clamp(0, (len - start) as i64) as usize,
            };
            let inserted = args.get(2..).unwrap_or(&[]).to_vec();
            let removed: Vec<Value> = list.borrow_mut().splice(start..start + count, inserted).collect();
            Ok(Value::list(removed))
        }),
    ]
}

/// Unprotected conveniences layered over the natives.
pub(super) fn extras() -> Vec<(&'static str, Member)> {
    vec![
        m("each", |reg, this, args| {
            reg.call_method(this, "for_each", args)?;
            Ok(this.clone())
        }),
        m("clone", |reg, this, _| Ok(reg.clone_value(this))),
    ]
}
