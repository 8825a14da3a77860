//! OpenCL C generation for the JavaScript kernel subset.
//!
//! - [`ExpressionParser`]: expressions to C text plus a [`TypeInfo`](gpgpu_types::TypeInfo)
//! - [`StatementParser`]: statements, with per-statement temporaries
//! - [`translate_function`]: entry function and helpers to one kernel source
//!
//! Objects are never copied implicitly. A value can be bound or assigned
//! only while it is an orphan (a literal, a call result, `this.copy(...)`
//! or a parameter read); everything else needs an explicit `this.copy`.

mod context;
mod error;
mod expr;
mod stmt;
mod translate;

pub use context::{ExpressionContext, TempNames};
pub use error::CodegenError;
pub use expr::{ExpressionParser, ParsedExpr};
pub use stmt::StatementParser;
pub use translate::{
    translate_function, translate_function_with, AccessMode, HelperFunction, InterningScope,
    KernelArtifact, KernelDescriptor, KernelParam, ParamKind, TranslateOptions,
};
