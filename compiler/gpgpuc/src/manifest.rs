//! JSON kernel manifests.
//!
//! ```json
//! {
//!   "entry": {
//!     "source": "function (a, out) { out[0] = a.x; }",
//!     "params": [
//!       { "type": "Object", "readWrite": "read", "shapeObj": { "x": 0 } },
//!       { "type": "Float32Array", "readWrite": "write" }
//!     ]
//!   },
//!   "functions": [
//!     { "source": "twice(v) { return v * 2; }", "returnObj": 0, "shapeObj": [0] }
//!   ]
//! }
//! ```
//!
//! JSON values map onto [`Value`] with object keys in document order;
//! `{"$float32": [..]}` and `{"$float64": [..]}` denote typed arrays.
//! Every `Object` and `Object[]` parameter needs a `shapeObj`.

use gpgpu_codegen::{AccessMode, HelperFunction, KernelDescriptor, KernelParam, ParamKind};
use gpgpu_types::Value;
use serde::Deserialize;
use serde_json::Value as Json;

use crate::DriverError;

#[derive(Clone, Debug, Deserialize)]
pub struct KernelManifest {
    pub entry: EntryManifest,
    #[serde(default)]
    pub functions: Vec<FunctionManifest>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EntryManifest {
    pub source: String,
    #[serde(default)]
    pub params: Vec<ParamManifest>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ParamManifest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "readWrite", default = "default_access")]
    pub access: String,
    #[serde(rename = "shapeObj", default)]
    pub shape: Option<Json>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FunctionManifest {
    #[serde(default)]
    pub name: Option<String>,
    pub source: String,
    #[serde(rename = "returnObj", default)]
    pub return_shape: Option<Json>,
    #[serde(rename = "shapeObj", default)]
    pub param_shapes: Option<Vec<Json>>,
}

fn default_access() -> String {
    AccessMode::ReadWrite.as_str().to_owned()
}

impl KernelManifest {
    pub fn from_json(text: &str) -> Result<Self, DriverError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Kernel parameters in declaration order.
    pub fn params(&self) -> Result<Vec<KernelParam>, DriverError> {
        self.entry
            .params
            .iter()
            .map(|param| {
                let kind = ParamKind::parse(&param.kind)
                    .ok_or_else(|| DriverError::UnknownParamKind(param.kind.clone()))?;
                let access = AccessMode::parse(&param.access)
                    .ok_or_else(|| DriverError::UnknownAccessMode(param.access.clone()))?;
                Ok(KernelParam::new(kind, access))
            })
            .collect()
    }

    pub fn descriptor(&self) -> Result<KernelDescriptor, DriverError> {
        let params = self.params()?;

        // Only parameters that take a shape contribute one.
        let mut shapes = Vec::new();
        for (index, (param, manifest)) in params.iter().zip(&self.entry.params).enumerate() {
            if !param.kind.needs_shape() {
                continue;
            }
            let shape = manifest.shape.as_ref().ok_or(DriverError::MissingShape {
                index,
                kind: param.kind,
            })?;
            shapes.push(value_from_json(shape)?);
        }

        let mut helpers = Vec::with_capacity(self.functions.len());
        for function in &self.functions {
            helpers.push(HelperFunction {
                name: function.name.clone(),
                source: function.source.clone(),
                return_shape: function.return_shape.as_ref().map(value_from_json).transpose()?,
                param_shapes: function
                    .param_shapes
                    .as_ref()
                    .map(|shapes| {
                        shapes
                            .iter()
                            .map(value_from_json)
                            .collect::<Result<Vec<_>, _>>()
                    })
                    .transpose()?,
            });
        }

        tracing::debug!(
            params = params.len(),
            shapes = shapes.len(),
            helpers = helpers.len(),
            "loaded manifest"
        );
        Ok(KernelDescriptor {
            source: self.entry.source.clone(),
            params,
            shapes,
            helpers,
        })
    }
}

/// Convert a JSON value to a host value.
pub fn value_from_json(json: &Json) -> Result<Value, DriverError> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Number(number(n)?),
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::Array(
            items
                .iter()
                .map(value_from_json)
                .collect::<Result<_, _>>()?,
        ),
        Json::Object(fields) => {
            if let Some(items) = typed_array(fields, "$float32")? {
                return Ok(Value::Float32Array(narrow(&items)));
            }
            if let Some(items) = typed_array(fields, "$float64")? {
                return Ok(Value::Float64Array(items));
            }
            let mut out = Vec::with_capacity(fields.len());
            for (key, value) in fields {
                out.push((key.clone(), value_from_json(value)?));
            }
            Value::Object(out)
        }
    })
}

#[allow(clippy::cast_possible_truncation)]
fn narrow(items: &[f64]) -> Vec<f32> {
    items.iter().map(|&x| x as f32).collect()
}

fn number(n: &serde_json::Number) -> Result<f64, DriverError> {
    n.as_f64()
        .ok_or_else(|| DriverError::UnrepresentableNumber(n.to_string()))
}

/// Elements of a `{"<tag>": [numbers]}` object, if `fields` is one.
fn typed_array(
    fields: &serde_json::Map<String, Json>,
    tag: &'static str,
) -> Result<Option<Vec<f64>>, DriverError> {
    let (1, Some(payload)) = (fields.len(), fields.get(tag)) else {
        return Ok(None);
    };
    let Json::Array(items) = payload else {
        return Err(DriverError::MalformedTypedArray { tag });
    };
    items
        .iter()
        .map(|item| match item {
            Json::Number(n) => number(n),
            _ => Err(DriverError::MalformedTypedArray { tag }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests;
