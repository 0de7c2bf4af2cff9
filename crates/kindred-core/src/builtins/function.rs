use crate::runtime::value::Value;
use crate::types::descriptor::Member;
use super::{arg, as_func, as_list};

pub(super) fn natives() -> Vec<(&'static str, Member)> {
    vec![
        // call(this_arg, ...args)
        ("call", Member::function("call", |reg, this, args| {
            let f = as_func(this, "call")?;
            let rest = args.get(1..).unwrap_or(&[]);
            f.call(reg, &arg(args, 0), rest)
        })),
        // apply(this_arg, [args])
        ("apply", Member::function("apply", |reg, this, args| {
            let f = as_func(this, "apply")?;
            let list = match arg(args, 1) {
                Value::Null => Vec::new(),
                v => as_list(&v, "apply")?.borrow().clone(),
            };
            f.call(reg, &arg(args, 0), &list)
        })),
    ]
}
