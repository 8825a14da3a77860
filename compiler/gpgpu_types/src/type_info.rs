//! Kernel-side types and their C rendering.

use std::collections::BTreeMap;
use std::fmt;

use crate::{ObjectFlags, TypeError};

/// Integer scalar kinds reachable through casts and builtins.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScalarKind {
    Int,
    Uint,
    Long,
    Ulong,
}

impl ScalarKind {
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Uint => "uint",
            ScalarKind::Long => "long",
            ScalarKind::Ulong => "ulong",
        }
    }
}

/// A generated struct type plus its storage state.
#[derive(Clone, PartialEq, Debug)]
pub struct ObjectType {
    /// Interned struct name, e.g. `GenClass0`.
    pub name: String,
    pub flags: ObjectFlags,
    /// Field types, ordered by field name.
    pub properties: BTreeMap<String, TypeInfo>,
}

impl ObjectType {
    #[inline]
    pub fn is(&self, flags: ObjectFlags) -> bool {
        self.flags.contains(flags)
    }

    #[must_use]
    pub fn with(mut self, flags: ObjectFlags) -> Self {
        self.flags.insert(flags);
        self
    }

    #[must_use]
    pub fn without(mut self, flags: ObjectFlags) -> Self {
        self.flags.remove(flags);
        self
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum TypeInfo {
    Scalar(ScalarKind),
    Double,
    /// A callable C function with the given return type.
    Function { return_type: Box<TypeInfo> },
    /// The `this.array` allocator. Only legal as a declaration initializer.
    GenericFunctionMarker,
    Array { content: Box<TypeInfo> },
    Object(ObjectType),
}

impl TypeInfo {
    pub const INT: TypeInfo = TypeInfo::Scalar(ScalarKind::Int);

    pub fn function(return_type: TypeInfo) -> Self {
        TypeInfo::Function {
            return_type: Box::new(return_type),
        }
    }

    pub fn array(content: TypeInfo) -> Self {
        TypeInfo::Array {
            content: Box::new(content),
        }
    }

    /// Variant name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeInfo::Scalar(kind) => kind.name(),
            TypeInfo::Double => "double",
            TypeInfo::Function { .. } => "function",
            TypeInfo::GenericFunctionMarker => "generic function",
            TypeInfo::Array { .. } => "array",
            TypeInfo::Object(_) => "object",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            TypeInfo::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Whether this is an object carrying all of `flags`.
    pub fn is_object_with(&self, flags: ObjectFlags) -> bool {
        self.as_object().is_some_and(|o| o.is(flags))
    }

    /// Clear `flags` if this is an object; other types pass through.
    #[must_use]
    pub fn without_flags(self, flags: ObjectFlags) -> Self {
        match self {
            TypeInfo::Object(object) => TypeInfo::Object(object.without(flags)),
            other => other,
        }
    }

    /// Set `flags` if this is an object; other types pass through.
    #[must_use]
    pub fn with_flags(self, flags: ObjectFlags) -> Self {
        match self {
            TypeInfo::Object(object) => TypeInfo::Object(object.with(flags)),
            other => other,
        }
    }

    /// Render as a C type.
    ///
    /// Global objects render as the bare struct name (the pointer lives in the
    /// parameter list), references as a pointer, arrays as a global pointer to
    /// their content.
    pub fn c_type(&self) -> Result<String, TypeError> {
        match self {
            TypeInfo::Scalar(kind) => Ok(kind.name().to_owned()),
            TypeInfo::Double => Ok("double".to_owned()),
            TypeInfo::Object(object) => {
                if object.is(ObjectFlags::REFERENCE) && !object.is(ObjectFlags::GLOBAL) {
                    Ok(format!("{}*", object.name))
                } else {
                    Ok(object.name.clone())
                }
            }
            TypeInfo::Array { content } => Ok(format!("global {}*", content.c_type()?)),
            TypeInfo::Function { .. } | TypeInfo::GenericFunctionMarker => {
                Err(TypeError::UnrenderableType(self.kind_name()))
            }
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.c_type() {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str(self.kind_name()),
        }
    }
}

#[cfg(test)]
mod tests;
