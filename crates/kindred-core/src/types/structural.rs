//! Structural clone and deep merge, dispatched on the resolved tag.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::value::{Instance, Record, Value};
use crate::types::registry::Registry;

impl Registry {
    /// Deep copy of `array`- and `object`-tagged values; everything else is
    /// returned by reference.
    pub fn clone_value(&self, item: &Value) -> Value {
        match self.resolve_tag(item).as_str() {
            "array" => match item {
                Value::List(items) => {
                    let copy = items.borrow().iter().map(|v| self.clone_value(v)).collect();
                    Value::list(copy)
                }
                _ => item.clone(),
            },
            "object" => self.clone_fields(item),
            _ => item.clone(),
        }
    }

    /// Fresh record (or instance of the same type) holding cloned fields,
    /// whatever `item`'s tag. Values without fields come back as-is.
    pub(crate) fn clone_fields(&self, item: &Value) -> Value {
        match item {
            Value::Record(r) => Value::Record(Rc::new(RefCell::new(self.clone_record(&r.borrow())))),
            Value::Instance(i) => Value::Instance(Rc::new(Instance {
                constructor: i.constructor.clone(),
                fields: RefCell::new(self.clone_record(&i.fields.borrow())),
            })),
            _ => item.clone(),
        }
    }

    fn clone_record(&self, record: &Record) -> Record {
        record.iter().map(|(k, v)| (k, self.clone_value(v))).collect()
    }

    /// Merge every source into `destination` in order, then return it.
    ///
    /// Objects meeting objects merge in place; incoming objects and arrays are
    /// cloned into their slot; anything else overwrites. A destination without
    /// fields is returned untouched.
    pub fn merge(&self, destination: &Value, sources: &[Value]) -> Value {
        for source in sources {
            for (key, incoming) in source.entries().unwrap_or_default() {
                self.merge_key(destination, &key, &incoming);
            }
        }
        destination.clone()
    }

    /// Merge a single `key → incoming` pair into `destination`.
    pub fn merge_key(&self, destination: &Value, key: &str, incoming: &Value) -> Value {
        match self.resolve_tag(incoming).as_str() {
            "object" => {
                match destination.field(key) {
                    Some(existing) if self.resolve_tag(&existing) == "object" => {
                        self.merge(&existing, std::slice::from_ref(incoming));
                    }
                    _ => { destination.set_field(key, self.clone_value(incoming)); }
                }
            }
            "array" => { destination.set_field(key, self.clone_value(incoming)); }
            _ => { destination.set_field(key, incoming.clone()); }
        }
        destination.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_registry_treats_lists_as_opaque() {
        // Without an `Array` type, lists resolve to "object" but are not records.
        let r = Registry::new();
        let list = Value::list(vec![Value::from(1)]);
        assert!(r.clone_value(&list).same(&list));
    }

    #[test]
    fn merge_into_non_record_is_a_no_op() {
        let r = Registry::standard();
        let dest = Value::from(5);
        let out = r.merge(&dest, &[Value::record([("a", Value::from(1))])]);
        assert_eq!(out, Value::from(5));
    }
}
