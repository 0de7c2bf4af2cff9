//! Dynamic type resolution: `resolve_tag` and `is_instance`.
//!
//! The registry's tag reporter is authoritative. Shape sniffing only runs for
//! values whose lineage carries no reporter.

use std::rc::Rc;

use crate::runtime::value::{ELEMENT_NODE, TEXT_NODE, Value};
use crate::types::descriptor::{NativeKind, TagReporter, TypeRef};
use crate::types::registry::Registry;

// ─── Shapes ───────────────────────────────────────────────────────────────────

/// Fallback classifications, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Element,
    TextNode,
    Whitespace,
    Arguments,
    Collection,
}

impl Shape {
    pub fn tag(self) -> &'static str {
        match self {
            Shape::Element    => "element",
            Shape::TextNode   => "textnode",
            Shape::Whitespace => "whitespace",
            Shape::Arguments  => "arguments",
            Shape::Collection => "collection",
        }
    }
}

type ShapeTest = fn(&Value) -> Option<Shape>;

const SHAPES: [ShapeTest; 3] = [node_shape, arguments_shape, collection_shape];

fn node_shape(item: &Value) -> Option<Shape> {
    let Value::Node(node) = item else { return None };
    if node.name.is_empty() {
        return None;
    }
    match node.node_type {
        ELEMENT_NODE => Some(Shape::Element),
        TEXT_NODE => {
            let text = node.content.as_deref().unwrap_or("");
            if text.chars().any(|c| !c.is_whitespace()) {
                Some(Shape::TextNode)
            } else {
                Some(Shape::Whitespace)
            }
        }
        _ => None,
    }
}

fn has_numeric_length(item: &Value) -> bool {
    matches!(item.field("length"), Some(Value::Number(_)))
}

fn has_field(item: &Value, key: &str) -> bool {
    item.field(key).is_some_and(|v| !v.is_null())
}

fn arguments_shape(item: &Value) -> Option<Shape> {
    (has_numeric_length(item) && has_field(item, "callee")).then_some(Shape::Arguments)
}

fn collection_shape(item: &Value) -> Option<Shape> {
    (has_numeric_length(item) && has_field(item, "item")).then_some(Shape::Collection)
}

/// First matching shape, if any.
pub fn sniff(item: &Value) -> Option<Shape> {
    SHAPES.iter().find_map(|test| test(item))
}

/// The host's own classification, used when nothing else applies.
pub fn primitive_tag(item: &Value) -> &'static str {
    match item {
        Value::Null         => "null",
        Value::Bool(_)      => "boolean",
        Value::Number(_)    => "number",
        Value::Str(_)       => "string",
        Value::Function(_)
        | Value::Type(_)    => "function",
        Value::List(_)
        | Value::Record(_)
        | Value::Node(_)
        | Value::Instance(_) => "object",
    }
}

// ─── Resolution ───────────────────────────────────────────────────────────────

impl Registry {
    /// First reporter along the lineage of `ty`.
    fn reporter_for(&self, ty: &TypeRef) -> Option<TagReporter> {
        self.lineage(ty).iter().find_map(|t| t.reporter())
    }

    /// Semantic tag of any value.
    pub fn resolve_tag(&self, item: &Value) -> String {
        let Some(ctor) = self.constructor_of(item) else {
            return "null".into();
        };
        if let Some(reporter) = self.reporter_for(&ctor) {
            return reporter.report(item);
        }
        match sniff(item) {
            Some(shape) => shape.tag().into(),
            None => primitive_tag(item).into(),
        }
    }

    /// Hook category of a type: the tag its own surface reports.
    pub fn category_of(&self, ty: &TypeRef) -> String {
        self.reporter_for(ty)
            .map(|r| r.surface_tag().to_string())
            .unwrap_or_else(|| "object".into())
    }

    /// Whether `item` descends from `representation`, by declared linkage or
    /// by host-native inheritance.
    pub fn is_instance(&self, item: &Value, representation: &TypeRef) -> bool {
        let Some(ctor) = self.constructor_of(item) else {
            return false;
        };

        let mut cursor = Some(ctor);
        while let Some(t) = cursor {
            if Rc::ptr_eq(&t, representation) {
                return true;
            }
            cursor = t.parent();
        }

        self.native_instance_of(item, representation)
    }

    /// The host's own instance check. Primitives are never instances; every
    /// other value is an instance of each type in its native lineage.
    fn native_instance_of(&self, item: &Value, representation: &TypeRef) -> bool {
        if item.is_primitive() {
            return false;
        }
        let host_ctor = match item {
            Value::Type(_) => Some(self.native(NativeKind::Function).clone()),
            _ => self.constructor_of(item),
        };
        host_ctor.is_some_and(|c| self.lineage(&c).iter().any(|t| Rc::ptr_eq(t, representation)))
    }
}
