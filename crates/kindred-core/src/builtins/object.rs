//! Statics on `Object`: iteration, clone and merge over record-like values.

use crate::runtime::value::Value;
use crate::types::descriptor::Member;
use super::{arg, as_func, as_string, check_argc};

fn for_each(name: &'static str) -> Member {
    Member::function(name, move |reg, _, args| {
        check_argc(name, args, 2)?;
        let object = args[0].clone();
        let callback = as_func(&args[1], name)?;
        let bind = arg(args, 2);
        for (key, value) in object.entries().unwrap_or_default() {
            callback.call(reg, &bind, &[value, Value::Str(key), object.clone()])?;
        }
        Ok(Value::Null)
    })
}

pub(super) fn statics() -> Vec<(&'static str, Member)> {
    vec![
        ("for_each", for_each("for_each")),
        ("each", for_each("each")),
        // Copies fields whatever the value's tag.
        ("clone", Member::function("clone", |reg, _, args| Ok(reg.clone_fields(&arg(args, 0))))),
        // merge(dest, ...sources) or merge(dest, key, value)
        ("merge", Member::function("merge", |reg, _, args| {
            let dest = arg(args, 0);
            match args.get(1) {
                Some(Value::Str(_)) => {
                    let key = as_string(&args[1], "merge")?;
                    Ok(reg.merge_key(&dest, &key, &arg(args, 2)))
                }
                _ => Ok(reg.merge(&dest, args.get(1..).unwrap_or(&[]))),
            }
        })),
    ]
}
