//! `Date`. The host model has no date values, only the clock.

use chrono::Utc;

use crate::runtime::value::Value;
use crate::types::descriptor::Member;

pub(super) fn statics() -> Vec<(&'static str, Member)> {
    vec![
        // Milliseconds since the Unix epoch.
        ("now", Member::function("now", |_, _, _| {
            Ok(Value::from(Utc::now().timestamp_millis() as f64))
        })),
    ]
}
