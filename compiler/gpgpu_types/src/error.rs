//! Type-level errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("cannot use undeclared variable `{0}`")]
    UndeclaredVariable(String),

    #[error("type `{0}` has no C representation")]
    UnrenderableType(&'static str),

    #[error("unsupported value type: {0} cannot be serialized")]
    UnsupportedValueType(&'static str),

    #[error("field name `{0}` is not a valid C identifier")]
    InvalidFieldName(String),

    #[error("array shape sample must contain at least one element")]
    EmptyArraySample,

    #[error("array element {index} must be an object, found {found}")]
    NonObjectArrayElement { index: usize, found: &'static str },

    #[error("array element {index} does not have the shape of element 0")]
    HeterogeneousArray { index: usize },
}
