//! Schema type resolution.
//!
//! Schema positions in the document are raw JSON. [`SchemaForm::classify`] decides
//! once which of the supported forms a value takes, and [`resolve_type`] turns it
//! into a [`Shape`], following references through the document's components.

use crate::{
    Component, OpenRpcDocument, Shape,
    error::{OpenRpcError, OpenRpcResult},
    reference::resolve_ref,
};
use serde_json::{Map, Value};
use tracing::trace;

/// The supported forms of a schema-like value, in matching precedence order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaForm<'a> {
    /// `{"$ref": "..."}`
    Reference(&'a str),
    /// `{"type": "string", "enum": [..]}`
    StringEnum(&'a [Value]),
    /// `{"type": "string"}`
    String,
    /// `{"type": "integer"}` or `{"type": "number"}`
    Number,
    Boolean,
    Null,
    /// `{"type": "array", "items": ..}`
    Array(&'a Value),
    /// `{"type": [..]}` where every tag is a primitive
    Union(&'a [Value]),
    /// `{"type": "object", "properties": {..}}`
    Object(&'a Map<String, Value>),
    Unknown,
}

impl<'a> SchemaForm<'a> {
    pub fn classify(schema: &'a Value) -> Self {
        let Some(object) = schema.as_object() else {
            return SchemaForm::Unknown;
        };

        if let Some(Value::String(reference)) = object.get("$ref") {
            return SchemaForm::Reference(reference);
        }

        match object.get("type") {
            Some(Value::String(tag)) => match tag.as_str() {
                "string" => match object.get("enum") {
                    Some(Value::Array(members)) => SchemaForm::StringEnum(members),
                    _ => SchemaForm::String,
                },
                "integer" | "number" => SchemaForm::Number,
                "boolean" => SchemaForm::Boolean,
                "null" => SchemaForm::Null,
                "array" => object
                    .get("items")
                    .map_or(SchemaForm::Unknown, SchemaForm::Array),
                "object" => match object.get("properties") {
                    Some(Value::Object(properties)) => SchemaForm::Object(properties),
                    _ => SchemaForm::Unknown,
                },
                _ => SchemaForm::Unknown,
            },
            Some(Value::Array(tags))
                if !tags.is_empty() && tags.iter().all(|tag| primitive_tag(tag).is_some()) =>
            {
                SchemaForm::Union(tags)
            }
            _ => SchemaForm::Unknown,
        }
    }
}

/// Map a single `type` tag inside a union to its primitive shape.
fn primitive_tag(tag: &Value) -> Option<Shape> {
    match tag.as_str()? {
        "string" => Some(Shape::String),
        "integer" | "number" => Some(Shape::Number),
        "boolean" => Some(Shape::Boolean),
        "null" => Some(Shape::Null),
        _ => None,
    }
}

/// Resolve a schema-like value to its shape.
///
/// References are followed transitively. A reference to a non-schema component
/// resolves to [`Shape::Unknown`]. A reference that does not resolve, or one that
/// leads back into itself, is an error.
pub fn resolve_type(document: &OpenRpcDocument, schema: &Value) -> OpenRpcResult<Shape> {
    TypeResolver {
        document,
        active: Vec::new(),
    }
    .resolve(schema)
}

struct TypeResolver<'a> {
    document: &'a OpenRpcDocument,
    /// References currently being followed, outermost first
    active: Vec<String>,
}

impl TypeResolver<'_> {
    fn resolve(&mut self, schema: &Value) -> OpenRpcResult<Shape> {
        match SchemaForm::classify(schema) {
            SchemaForm::Reference(reference) => self.follow(reference),
            SchemaForm::StringEnum(members) => Ok(Shape::Enum(members.to_vec())),
            SchemaForm::String => Ok(Shape::String),
            SchemaForm::Number => Ok(Shape::Number),
            SchemaForm::Boolean => Ok(Shape::Boolean),
            SchemaForm::Null => Ok(Shape::Null),
            SchemaForm::Array(items) => Ok(Shape::array(self.resolve(items)?)),
            SchemaForm::Union(tags) => Ok(Shape::union(tags.iter().filter_map(primitive_tag))),
            SchemaForm::Object(properties) => {
                let resolved = properties
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), self.resolve(value)?)))
                    .collect::<OpenRpcResult<Vec<_>>>()?;
                Ok(Shape::object(resolved))
            }
            SchemaForm::Unknown => Ok(Shape::Unknown),
        }
    }

    fn follow(&mut self, reference: &str) -> OpenRpcResult<Shape> {
        if self.active.iter().any(|active| active == reference) {
            let mut chain = self.active.clone();
            chain.push(reference.to_string());
            return Err(OpenRpcError::reference_cycle(chain));
        }

        let document = self.document;
        let target = resolve_ref(document, reference)?;

        self.active.push(reference.to_string());
        let shape = match target {
            Component::Schema(schema) => self.resolve(schema),
            other => {
                trace!(reference, kind = %other.kind(), "reference to non-schema component");
                Ok(Shape::Unknown)
            }
        };
        self.active.pop();
        shape
    }
}
