//! Resolved shapes: what a schema-like value describes once every `$ref` is followed.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The fully resolved shape of a parameter, result or schema.
///
/// `Display` renders a compact type notation, e.g. `Array<{ id?: string }>` or
/// `"red" | "green"`.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String,
    /// A union of literal members, from `{type: "string", enum: [..]}`
    Enum(Vec<Value>),
    Number,
    Boolean,
    Null,
    Array(Box<Shape>),
    Union(Vec<Shape>),
    /// Every member is wrapped in [`Shape::Optional`]
    Object(BTreeMap<String, Shape>),
    /// The shape, or absent
    Optional(Box<Shape>),
    Unknown,
    /// No value at all: the result of a method that declares none
    Void,
}

impl Shape {
    pub fn array(items: Shape) -> Self {
        Shape::Array(Box::new(items))
    }

    pub fn optional(shape: Shape) -> Self {
        Shape::Optional(Box::new(shape))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Shape::Optional(_))
    }

    /// Build an object shape; every property becomes optional.
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, Shape)>,
        K: Into<String>,
    {
        Shape::Object(
            properties
                .into_iter()
                .map(|(key, shape)| (key.into(), Shape::optional(shape)))
                .collect(),
        )
    }

    /// Build a union, removing duplicate members and collapsing a single member.
    pub fn union(members: impl IntoIterator<Item = Shape>) -> Self {
        let mut unique: Vec<Shape> = Vec::new();
        for member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        if unique.len() == 1 {
            unique.remove(0)
        } else {
            Shape::Union(unique)
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, members: &[Shape]) -> fmt::Result {
    if members.is_empty() {
        return f.write_str("never");
    }
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(" | ")?;
        }
        write!(f, "{member}")?;
    }
    Ok(())
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::String => f.write_str("string"),
            Shape::Number => f.write_str("number"),
            Shape::Boolean => f.write_str("boolean"),
            Shape::Null => f.write_str("null"),
            Shape::Unknown => f.write_str("unknown"),
            Shape::Void => f.write_str("void"),
            Shape::Enum(members) if members.is_empty() => f.write_str("never"),
            Shape::Enum(members) => {
                let literals: Vec<String> = members.iter().map(Value::to_string).collect();
                f.write_str(&literals.join(" | "))
            }
            Shape::Array(items) => write!(f, "Array<{items}>"),
            Shape::Union(members) => write_joined(f, members),
            Shape::Object(properties) if properties.is_empty() => f.write_str("{}"),
            Shape::Object(properties) => {
                f.write_str("{ ")?;
                for (i, (key, shape)) in properties.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    match shape {
                        Shape::Optional(inner) => write!(f, "{key}?: {inner}")?,
                        other => write!(f, "{key}: {other}")?,
                    }
                }
                f.write_str(" }")
            }
            Shape::Optional(inner) => write!(f, "{inner} | undefined"),
        }
    }
}
