//! Call-shape adapters for registration and lookup entry points.
//!
//! Setter form: one `(name, value)` pair or many, applied in order.
//! Getter form: one name gives one answer, several names give a name → answer list.

// ─── Setter ───────────────────────────────────────────────────────────────────

/// Ordered `name → value` pairs handed to a two-argument installer.
#[derive(Debug, Clone, PartialEq)]
pub struct Entries<V>(Vec<(String, V)>);

impl<V> Entries<V> {
    /// Feed every pair to `f`, in order.
    pub fn apply(self, mut f: impl FnMut(&str, V)) {
        for (name, value) in self.0 {
            f(&name, value);
        }
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<K: Into<String>, V> From<(K, V)> for Entries<V> {
    fn from((name, value): (K, V)) -> Self { Entries(vec![(name.into(), value)]) }
}

impl<K: Into<String>, V> From<Vec<(K, V)>> for Entries<V> {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Entries(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, V, const N: usize> From<[(K, V); N]> for Entries<V> {
    fn from(pairs: [(K, V); N]) -> Self {
        Entries(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Entries<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Entries(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ─── Getter ───────────────────────────────────────────────────────────────────

/// One name, or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keys {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Keys {
    fn from(name: &str) -> Self { Keys::One(name.to_string()) }
}

impl From<String> for Keys {
    fn from(name: String) -> Self { Keys::One(name) }
}

impl From<Vec<&str>> for Keys {
    fn from(names: Vec<&str>) -> Self { Keys::Many(names.into_iter().map(String::from).collect()) }
}

impl From<Vec<String>> for Keys {
    fn from(names: Vec<String>) -> Self { Keys::Many(names) }
}

impl From<&[&str]> for Keys {
    fn from(names: &[&str]) -> Self { Keys::Many(names.iter().map(|s| s.to_string()).collect()) }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(names: [&str; N]) -> Self { Keys::Many(names.iter().map(|s| s.to_string()).collect()) }
}

/// Result of a getter-form lookup. A miss is whatever the underlying getter
/// returned for it: `None`, kept in place rather than dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    One(String, Option<V>),
    Many(Vec<(String, Option<V>)>),
}

impl<V> Lookup<V> {
    /// The single answer. For a multi-name lookup, the first one.
    pub fn one(self) -> Option<V> {
        match self {
            Lookup::One(_, v) => v,
            Lookup::Many(list) => list.into_iter().next().and_then(|(_, v)| v),
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        match self {
            Lookup::One(key, v) if key == name => v.as_ref(),
            Lookup::One(..) => None,
            Lookup::Many(list) => list.iter().find(|(k, _)| k == name).and_then(|(_, v)| v.as_ref()),
        }
    }

    /// Every `(name, answer)` pair, in the order the names were given.
    pub fn into_many(self) -> Vec<(String, Option<V>)> {
        match self {
            Lookup::One(name, v) => vec![(name, v)],
            Lookup::Many(list) => list,
        }
    }
}

/// Run `f` in getter form over `keys`.
pub fn lookup<V>(keys: impl Into<Keys>, mut f: impl FnMut(&str) -> Option<V>) -> Lookup<V> {
    match keys.into() {
        Keys::One(name) => {
            let v = f(&name);
            Lookup::One(name, v)
        }
        Keys::Many(names) => Lookup::Many(names.into_iter().map(|n| {
            let v = f(&n);
            (n, v)
        }).collect()),
    }
}
