//! `String` members. Indices count characters, not bytes.

use crate::runtime::value::Value;
use crate::types::descriptor::Member;
use super::{arg, as_string, int_arg, relative_index};

fn chars(this: &Value, name: &str) -> Result<Vec<char>, crate::error::RuntimeError> {
    Ok(as_string(this, name)?.chars().collect())
}

fn char_index(haystack: &str, byte_idx: Option<usize>) -> f64 {
    byte_idx.map_or(-1.0, |b| haystack[..b].chars().count() as f64)
}

pub(super) fn natives() -> Vec<(&'static str, Member)> {
    vec![
        ("char_at", Member::function("char_at", |_, this, args| {
            let cs = chars(this, "char_at")?;
            let i = int_arg(args, 0, 0, "char_at")?;
            let c = usize::try_from(i).ok().and_then(|i| cs.get(i));
            Ok(Value::Str(c.map(|c| c.to_string()).unwrap_or_default()))
        })),
        ("concat", Member::function("concat", |_, this, args| {
            let mut s = as_string(this, "concat")?;
            for a in args {
                s.push_str(&a.to_string());
            }
            Ok(Value::Str(s))
        })),
        ("index_of", Member::function("index_of", |_, this, args| {
            let s = as_string(this, "index_of")?;
            let needle = arg(args, 0).to_string();
            Ok(Value::from(char_index(&s, s.find(&needle))))
        })),
        ("last_index_of", Member::function("last_index_of", |_, this, args| {
            let s = as_string(this, "last_index_of")?;
            let needle = arg(args, 0).to_string();
            Ok(Value::from(char_index(&s, s.rfind(&needle))))
        })),
        ("slice", Member::function("slice", |_, this, args| {
            let cs = chars(this, "slice")?;
            let start = relative_index(int_arg(args, 0, 0, "slice")?, cs.len());
            let end = relative_index(int_arg(args, 1, cs.len() as i64, "slice")?, cs.len());
            let out: String = if start < end { cs[start..end].iter().collect() } else { String::new() };
            Ok(Value::Str(out))
        })),
        ("split", Member::function("split", |_, this, args| {
            let s = as_string(this, "split")?;
            let parts: Vec<Value> = match arg(args, 0) {
                Value::Null => vec![Value::Str(s)],
                sep => {
                    let sep = as_string(&sep, "split")?;
                    if sep.is_empty() {
                        s.chars().map(|c| Value::Str(c.to_string())).collect()
                    } else {
                        s.split(sep.as_str()).map(Value::from).collect()
                    }
                }
            };
            Ok(Value::list(parts))
        })),
        ("char_code_at", Member::function("char_code_at", |_, this, args| {
            let cs = chars(this, "char_code_at")?;
            let i = int_arg(args, 0, 0, "char_code_at")?;
            let code = usize::try_from(i).ok().and_then(|i| cs.get(i)).map(|&c| c as u32 as f64);
            Ok(Value::from(code.unwrap_or(f64::NAN)))
        })),
        // replace(pattern, replacement): first occurrence only. A callable
        // replacement gets `(match, offset, string)`.
        ("replace", Member::function("replace", |reg, this, args| {
            let s = as_string(this, "replace")?;
            let pattern = arg(args, 0).to_string();
            let Some(at) = s.find(&pattern) else {
                return Ok(Value::Str(s));
            };
            let replacement = match arg(args, 1) {
                Value::Function(f) => {
                    let offset = char_index(&s, Some(at));
                    let args = [Value::from(pattern.as_str()), Value::from(offset), Value::from(s.as_str())];
                    f.call(reg, &Value::Null, &args)?.to_string()
                }
                other => other.to_string(),
            };
            Ok(Value::Str(format!("{}{}{}", &s[..at], replacement, &s[at + pattern.len()..])))
        })),
        ("search", Member::function("search", |_, this, args| {
            let s = as_string(this, "search")?;
            let needle = arg(args, 0).to_string();
            Ok(Value::from(char_index(&s, s.find(&needle))))
        })),
        // substr(start, length?)
        ("substr", Member::function("substr", |_, this, args| {
            let cs = chars(this, "substr")?;
            let start = relative_index(int_arg(args, 0, 0, "substr")?, cs.len());
            let rest = (cs.len() - start) as i64;
            let count = int_arg(args, 1, rest, "substr")?.clamp(0, rest) as usize;
            Ok(Value::Str(cs[start..start + count].iter().collect()))
        })),
        // substring(start, end?): negatives clamp to 0, bounds swap when reversed.
        ("substring", Member::function("substring", |_, this, args| {
            let cs = chars(this, "substring")?;
            let len = cs.len() as i64;
            let a = int_arg(args, 0, 0, "substring")?.clamp(0, len) as usize;
            let b = int_arg(args, 1, len, "substring")?.clamp(0, len) as usize;
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            Ok(Value::Str(cs[start..end].iter().collect()))
        })),
        ("to_lower_case", Member::function("to_lower_case", |_, this, _| {
            Ok(Value::Str(as_string(this, "to_lower_case")?.to_lowercase()))
        })),
        ("to_upper_case", Member::function("to_upper_case", |_, this, _| {
            Ok(Value::Str(as_string(this, "to_upper_case")?.to_uppercase()))
        })),
        ("trim", Member::function("trim", |_, this, _| {
            Ok(Value::Str(as_string(this, "trim")?.trim().to_string()))
        })),
    ]
}
