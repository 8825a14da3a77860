//! Host-side runtime values: shape samples and kernel arguments.

use std::collections::BTreeMap;

use crate::TypeError;

/// A host value as seen by the serializer.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Float32Array(Vec<f32>),
    Float64Array(Vec<f64>),
    Array(Vec<Value>),
    /// Plain object, fields in insertion order.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Build a plain object from `(key, value)` pairs.
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Float32Array(_) => "Float32Array",
            Value::Float64Array(_) => "Float64Array",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Fields of a plain object, deduplicated (last write wins) and sorted by name.
    pub(crate) fn sorted_fields(fields: &[(String, Value)]) -> BTreeMap<&str, &Value> {
        fields.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    /// Structural shape of a packable value; `None` for null/undefined.
    ///
    /// Arrays have no shape: they are only packable at the top level.
    pub fn shape(&self) -> Result<Option<Shape>, TypeError> {
        match self {
            Value::Undefined | Value::Null => Ok(None),
            Value::Bool(_) => Ok(Some(Shape::Bool)),
            Value::Number(_) => Ok(Some(Shape::Number)),
            Value::Object(fields) => {
                let mut shape = BTreeMap::new();
                for (key, field) in Value::sorted_fields(fields) {
                    if let Some(field_shape) = field.shape()? {
                        shape.insert(key.to_owned(), field_shape);
                    }
                }
                Ok(Some(Shape::Object(shape)))
            }
            Value::String(_)
            | Value::Float32Array(_)
            | Value::Float64Array(_)
            | Value::Array(_) => Err(TypeError::UnsupportedValueType(self.kind_name())),
        }
    }
}

/// Field layout of a value, independent of any struct table.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Shape {
    Bool,
    Number,
    Object(BTreeMap<String, Shape>),
}

impl Shape {
    /// Packed size in bytes.
    pub fn byte_len(&self) -> usize {
        match self {
            Shape::Bool => 4,
            Shape::Number => 8,
            Shape::Object(fields) => fields.values().map(Shape::byte_len).sum(),
        }
    }
}
