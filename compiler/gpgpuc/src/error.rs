//! Driver errors.

use gpgpu_codegen::{CodegenError, ParamKind};
use gpgpu_parse::ParseError;
use gpgpu_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown parameter type `{0}`")]
    UnknownParamKind(String),

    #[error("unknown access mode `{0}` (expected read, write or readwrite)")]
    UnknownAccessMode(String),

    #[error("parameter {index} ({kind}) has no shapeObj")]
    MissingShape { index: usize, kind: ParamKind },

    #[error("`{tag}` must hold an array of numbers")]
    MalformedTypedArray { tag: &'static str },

    #[error("number {0} cannot be represented as a double")]
    UnrepresentableNumber(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("kernel takes {expected} arguments, got {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("argument {index}: expected an array of objects, found {found}")]
    ObjectArrayExpected { index: usize, found: &'static str },

    #[error("argument {index}: expected {expected}, found {found}")]
    ArgumentKindMismatch {
        index: usize,
        expected: ParamKind,
        found: &'static str,
    },

    #[error("work size must have 1 to 3 dimensions, got {0}")]
    WorkDimensions(usize),

    #[error("group size has {group} dimensions but work size has {work}")]
    GroupDimensions { work: usize, group: usize },

    #[error("kernel launched before set_size")]
    MissingWorkSize,

    #[error("kernel runtime: {0}")]
    Runtime(String),
}
