//! Call-time argument packing.

use gpgpu_codegen::{AccessMode, KernelParam, ParamKind};
use gpgpu_types::{ObjectSerializer, Value};

use crate::DriverError;

/// One packed kernel argument.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ArgBuffer {
    pub kind: ParamKind,
    pub access: AccessMode,
    pub bytes: Vec<u8>,
}

impl ArgBuffer {
    /// Payload as lowercase hex.
    pub fn hex(&self) -> String {
        use std::fmt::Write;

        let mut out = String::with_capacity(self.bytes.len() * 2);
        for byte in &self.bytes {
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

/// Pack `args` for a kernel declared with `params`.
///
/// Typed arrays are copied as little-endian elements; objects and object
/// arrays go through the serializer's packing mode, so their layout matches
/// the structs generated for the same shapes.
#[tracing::instrument(level = "debug", skip_all, fields(args = args.len()))]
pub fn pack_arguments(
    params: &[KernelParam],
    args: &[Value],
) -> Result<Vec<ArgBuffer>, DriverError> {
    if params.len() != args.len() {
        return Err(DriverError::ArgumentCount {
            expected: params.len(),
            found: args.len(),
        });
    }

    let mut buffers = Vec::with_capacity(args.len());
    for (index, (param, arg)) in params.iter().zip(args).enumerate() {
        let bytes = pack(index, param.kind, arg)?;
        tracing::trace!(index, kind = %param.kind, bytes = bytes.len(), "packed argument");
        buffers.push(ArgBuffer {
            kind: param.kind,
            access: param.access,
            bytes,
        });
    }
    Ok(buffers)
}

fn pack(index: usize, kind: ParamKind, arg: &Value) -> Result<Vec<u8>, DriverError> {
    match (kind, arg) {
        (ParamKind::Float32Array, Value::Float32Array(items)) => {
            Ok(items.iter().flat_map(|x| x.to_le_bytes()).collect())
        }
        (ParamKind::Float64Array, Value::Float64Array(items)) => {
            Ok(items.iter().flat_map(|x| x.to_le_bytes()).collect())
        }
        (ParamKind::Object, Value::Object(_)) => {
            Ok(ObjectSerializer::detached().serialize(arg, true)?.bytes())
        }
        (ParamKind::ObjectArray, Value::Array(_)) => {
            Ok(ObjectSerializer::detached().serialize(arg, false)?.bytes())
        }
        (ParamKind::ObjectArray, other) => Err(DriverError::ObjectArrayExpected {
            index,
            found: other.kind_name(),
        }),
        (expected, other) => Err(DriverError::ArgumentKindMismatch {
            index,
            expected,
            found: other.kind_name(),
        }),
    }
}

#[cfg(test)]
mod tests;
