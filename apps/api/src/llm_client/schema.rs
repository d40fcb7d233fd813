//! Schema descriptors for structured prompt inputs and outputs.
//!
//! Every invocation declares the shape of the record it sends and the record it
//! expects back. Records are checked against these descriptors at the boundary:
//! inputs before any network call, outputs before deserialisation.

use serde_json::{json, Map, Value};
use thiserror::Error;

/// Primitive type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
}

impl FieldKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
        }
    }

    /// Type name in the provider's OpenAPI-subset schema dialect.
    fn provider_type(self) -> &'static str {
        match self {
            FieldKind::String => "STRING",
            FieldKind::Number => "NUMBER",
            FieldKind::Boolean => "BOOLEAN",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
}

impl Field {
    pub const fn required_string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            required: true,
            description,
        }
    }
}

/// A flat object schema: field name → primitive type + required flag.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [Field],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("required field '{0}' is missing")]
    MissingField(&'static str),

    #[error("required field '{0}' is empty")]
    EmptyField(&'static str),

    #[error("field '{field}' must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

impl Schema {
    pub const fn new(fields: &'static [Field]) -> Self {
        Self { fields }
    }

    /// Checks `value` against this schema. The whole record is rejected on the
    /// first violation; nothing is partially accepted.
    ///
    /// Required string fields must also be non-blank.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaError> {
        let object = value.as_object().ok_or(SchemaError::NotAnObject)?;

        for field in self.fields {
            match object.get(field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(SchemaError::MissingField(field.name));
                }
                None | Some(Value::Null) => {}
                Some(v) if !field.kind.matches(v) => {
                    return Err(SchemaError::WrongType {
                        field: field.name,
                        expected: field.kind.as_str(),
                    });
                }
                Some(Value::String(s)) if field.required && s.trim().is_empty() => {
                    return Err(SchemaError::EmptyField(field.name));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Renders this schema as the provider's structured-output `responseSchema`.
    pub fn to_response_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields {
            properties.insert(
                field.name.to_string(),
                json!({
                    "type": field.kind.provider_type(),
                    "description": field.description,
                }),
            );
        }

        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": required,
        })
    }
}
