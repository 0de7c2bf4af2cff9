//! `from`-family conversions between host kinds.

use crate::runtime::value::{Func, Value};

/// `None` for `Null`, the value otherwise.
pub fn nil(item: &Value) -> Option<&Value> {
    (!item.is_null()).then_some(item)
}

/// Functions pass through; anything else becomes a function returning it.
pub fn function_from(item: &Value) -> Func {
    match item {
        Value::Function(f) => f.clone(),
        other => Func::constant(other.clone()),
    }
}

/// Largest `length` an array-like may report.
pub const MAX_LENGTH: f64 = 4_294_967_295.0;

fn array_like_length(item: &Value) -> Option<f64> {
    match item.field("length") {
        Some(Value::Number(n)) if n <= MAX_LENGTH => Some(n),
        _ => None,
    }
}

/// Lists, and records or instances carrying a numeric `length` no larger
/// than `MAX_LENGTH`.
pub fn is_enumerable(item: &Value) -> bool {
    match item {
        Value::List(_) => true,
        Value::Record(_) | Value::Instance(_) => array_like_length(item).is_some(),
        _ => false,
    }
}

/// A new list: empty for `Null`, a shallow copy of anything enumerable,
/// otherwise a one-element list.
///
/// An array-like yields at most as many slots as it has fields, so a large
/// `length` over few entries is not materialized.
pub fn list_from(item: &Value) -> Value {
    match item {
        Value::Null => Value::list(Vec::new()),
        Value::List(items) => Value::list(items.borrow().clone()),
        _ if is_enumerable(item) => {
            let len = array_like_length(item).unwrap_or(0.0);
            let len = if len > 0.0 { len as usize } else { 0 };
            let fields = item.entries().map_or(0, |e| e.len());
            let items = (0..len.min(fields))
                .map(|i| item.field(&i.to_string()).unwrap_or(Value::Null))
                .collect();
            Value::list(items)
        }
        other => Value::list(vec![other.clone()]),
    }
}

/// Leading-float parse of the value's string form. Finite results only;
/// anything else is `Null`.
pub fn number_from(item: &Value) -> Value {
    let parsed = match item {
        Value::Number(n) => Some(*n),
        other => parse_float_prefix(&other.to_string()),
    };
    match parsed {
        Some(n) if n.is_finite() => Value::Number(n),
        _ => Value::Null,
    }
}

pub fn string_from(item: &Value) -> String {
    item.to_string()
}

/// Longest prefix of `s` (after leading whitespace) that reads as a float.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].replace("Infinity", "inf").parse().ok();
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}
