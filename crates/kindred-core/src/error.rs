use thiserror::Error;

/// Failure raised while *calling* an installed member.
///
/// Registration, lookup, tag resolution, clone and merge never fail: misses
/// come back as `None` and protected overwrites are silent no-ops. Only
/// dispatching into a member can go wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("`{name}` is not a member of `{tag}`")]
    MemberNotFound { tag: String, name: String },

    #[error("`{0}` is not callable")]
    NotCallable(String),

    #[error("`{name}` expects {expected} argument(s), got {got}")]
    Arity { name: String, expected: usize, got: usize },

    #[error("`{name}` expected {expected}, got {got}")]
    BadArgument { name: String, expected: &'static str, got: String },
}

impl RuntimeError {
    pub fn member_not_found(tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MemberNotFound { tag: tag.into(), name: name.into() }
    }

    pub fn bad_argument(name: impl Into<String>, expected: &'static str, got: impl Into<String>) -> Self {
        Self::BadArgument { name: name.into(), expected, got: got.into() }
    }
}
