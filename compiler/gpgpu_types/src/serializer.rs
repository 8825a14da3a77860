//! Object serializer: host value to (type, byte payload).
//!
//! Leaves are visited in the same byte-lexicographic field order the struct
//! interner sorts by, so the payload for a value is laid out exactly like
//! the struct generated for its shape.

use std::collections::BTreeMap;

use crate::{
    DeclarationTable, ObjectFlags, ObjectType, ScalarKind, Shape, TypeError, TypeInfo, Value,
};

/// One little-endian scalar leaf.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Chunk {
    bytes: [u8; 8],
    width: u8,
}

impl Chunk {
    pub fn u32(value: u32) -> Self {
        let mut bytes = [0; 8];
        bytes[..4].copy_from_slice(&value.to_le_bytes());
        Chunk { bytes, width: 4 }
    }

    pub fn f64(value: f64) -> Self {
        Chunk {
            bytes: value.to_le_bytes(),
            width: 8,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.width)]
    }
}

/// Serialization result.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Packed {
    /// Kernel type of the value; `None` for null/undefined or when no
    /// declaration table is attached.
    pub ty: Option<TypeInfo>,
    pub chunks: Vec<Chunk>,
}

impl Packed {
    /// Concatenated payload.
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        for chunk in &self.chunks {
            out.extend_from_slice(chunk.as_bytes());
        }
        out
    }

    pub fn byte_len(&self) -> usize {
        self.chunks.iter().map(|c| c.as_bytes().len()).sum()
    }
}

/// Serializes shape samples and arguments.
///
/// Attached to a [`DeclarationTable`] it also produces types and interns
/// struct names; detached it only packs bytes.
pub struct ObjectSerializer<'a> {
    decls: Option<&'a mut DeclarationTable>,
}

impl<'a> ObjectSerializer<'a> {
    pub fn new(decls: &'a mut DeclarationTable) -> Self {
        ObjectSerializer { decls: Some(decls) }
    }

    pub fn detached() -> Self {
        ObjectSerializer { decls: None }
    }

    /// Serialize a top-level value.
    ///
    /// `global` marks a top-level object as living in kernel memory (kernel
    /// parameters); helper shapes pass `false`. Arrays are only accepted here,
    /// as the sample of an array-of-objects parameter.
    pub fn serialize(&mut self, value: &Value, global: bool) -> Result<Packed, TypeError> {
        let mut chunks = Vec::new();
        let ty = match value {
            Value::Array(items) => self.array(items, &mut chunks)?,
            other => self.value(other, global, &mut chunks)?,
        };
        tracing::trace!(kind = value.kind_name(), leaves = chunks.len(), "serialized value");
        Ok(Packed { ty, chunks })
    }

    fn value(
        &mut self,
        value: &Value,
        global: bool,
        chunks: &mut Vec<Chunk>,
    ) -> Result<Option<TypeInfo>, TypeError> {
        match value {
            Value::Bool(b) => {
                chunks.push(Chunk::u32(u32::from(*b)));
                Ok(Some(TypeInfo::Scalar(ScalarKind::Int)))
            }
            Value::Number(n) => {
                chunks.push(Chunk::f64(*n));
                Ok(Some(TypeInfo::Double))
            }
            Value::Undefined | Value::Null => Ok(None),
            Value::Object(fields) => self.object(fields, global, chunks),
            Value::String(_)
            | Value::Float32Array(_)
            | Value::Float64Array(_)
            | Value::Array(_) => Err(TypeError::UnsupportedValueType(value.kind_name())),
        }
    }

    fn object(
        &mut self,
        fields: &[(String, Value)],
        global: bool,
        chunks: &mut Vec<Chunk>,
    ) -> Result<Option<TypeInfo>, TypeError> {
        let mut properties = BTreeMap::new();
        let mut signature = Vec::new();

        for (key, field) in Value::sorted_fields(fields) {
            if !is_c_identifier(key) {
                return Err(TypeError::InvalidFieldName(key.to_owned()));
            }
            // Nested objects are embedded by value.
            if let Some(ty) = self.value(field, false, chunks)? {
                signature.push((ty.c_type()?, key.to_owned()));
                properties.insert(key.to_owned(), ty);
            }
        }

        let Some(decls) = self.decls.as_deref_mut() else {
            return Ok(None);
        };
        let name = decls.get_object(signature);
        let mut flags = ObjectFlags::FRESH;
        flags.set(ObjectFlags::GLOBAL, global);
        Ok(Some(TypeInfo::Object(ObjectType {
            name,
            flags,
            properties,
        })))
    }

    /// Array-of-objects sample: element 0 gives the type, every element must
    /// share its shape, and all elements are packed.
    fn array(
        &mut self,
        items: &[Value],
        chunks: &mut Vec<Chunk>,
    ) -> Result<Option<TypeInfo>, TypeError> {
        let Some(first) = items.first() else {
            return Err(TypeError::EmptyArraySample);
        };
        let Value::Object(first_fields) = first else {
            return Err(TypeError::NonObjectArrayElement {
                index: 0,
                found: first.kind_name(),
            });
        };
        let expected = element_shape(first, 0)?;
        let element = self.object(first_fields, false, chunks)?;

        let mut rest = ObjectSerializer::detached();
        for (index, item) in items.iter().enumerate().skip(1) {
            if element_shape(item, index)? != expected {
                return Err(TypeError::HeterogeneousArray { index });
            }
            rest.value(item, false, chunks)?;
        }

        Ok(element.map(TypeInfo::array))
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn element_shape(item: &Value, index: usize) -> Result<Shape, TypeError> {
    if !matches!(item, Value::Object(_)) {
        return Err(TypeError::NonObjectArrayElement {
            index,
            found: item.kind_name(),
        });
    }
    item.shape()?
        .ok_or(TypeError::NonObjectArrayElement {
            index,
            found: item.kind_name(),
        })
}
