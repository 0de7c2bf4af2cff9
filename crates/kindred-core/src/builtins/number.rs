use crate::runtime::value::{Value, format_number};
use crate::types::descriptor::Member;
use super::{arg, as_number, int_arg};

/// Host-style exponent suffix: `1.5e+3`, `2e-7`. Without `digits`, as many
/// as needed to round-trip.
fn exponential(n: f64, digits: Option<usize>) -> String {
    let raw = match digits {
        Some(digits) => format!("{n:.digits$e}"),
        None => format!("{n:e}"),
    };
    match raw.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{mantissa}e{exp}"),
        Some((mantissa, exp)) => format!("{mantissa}e+{exp}"),
        None => raw,
    }
}

fn to_precision(n: f64, precision: usize) -> String {
    if !n.is_finite() || n == 0.0 {
        return if n == 0.0 { format!("{:.*}", precision.saturating_sub(1), 0.0) } else { format_number(n) };
    }
    let e = n.abs().log10().floor() as i64;
    if e < -6 || e >= precision as i64 {
        exponential(n, Some(precision.saturating_sub(1)))
    } else {
        let decimals = (precision as i64 - 1 - e).max(0) as usize;
        format!("{n:.decimals$}")
    }
}

/// Thousands separators, at most three fraction digits.
fn to_locale(n: f64) -> String {
    if !n.is_finite() {
        return format_number(n);
    }
    let fixed = format!("{:.3}", n.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut grouped = String::new();
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if !frac.is_empty() {
        grouped.push('.');
        grouped.push_str(frac);
    }
    if n < 0.0 && grouped != "0" {
        grouped.insert(0, '-');
    }
    grouped
}

pub(super) fn natives() -> Vec<(&'static str, Member)> {
    vec![
        ("to_fixed", Member::function("to_fixed", |_, this, args| {
            let n = as_number(this, "to_fixed")?;
            let digits = int_arg(args, 0, 0, "to_fixed")?.clamp(0, 100) as usize;
            Ok(Value::Str(if n.is_finite() { format!("{n:.digits$}") } else { format_number(n) }))
        })),
        ("to_exponential", Member::function("to_exponential", |_, this, args| {
            let n = as_number(this, "to_exponential")?;
            if !n.is_finite() {
                return Ok(Value::Str(format_number(n)));
            }
            let digits = match arg(args, 0) {
                Value::Null => None,
                _ => Some(int_arg(args, 0, 0, "to_exponential")?.clamp(0, 100) as usize),
            };
            Ok(Value::Str(exponential(n, digits)))
        })),
        ("to_locale_string", Member::function("to_locale_string", |_, this, _| {
            Ok(Value::Str(to_locale(as_number(this, "to_locale_string")?)))
        })),
        ("to_precision", Member::function("to_precision", |_, this, args| {
            let n = as_number(this, "to_precision")?;
            let out = match int_arg(args, 0, 0, "to_precision")? {
                0 => format_number(n),
                p => to_precision(n, p.clamp(1, 100) as usize),
            };
            Ok(Value::Str(out))
        })),
    ]
}
