//! Code generation errors.
//!
//! Every variant is terminal for the translation that raised it. Variants
//! produced while walking a function body carry the `(line, column)` of the
//! offending node.

use gpgpu_ir::Loc;
use gpgpu_parse::ParseError;
use gpgpu_types::TypeError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("cannot use undeclared variable `{name}` at {loc}")]
    UndeclaredVariable { name: String, loc: Loc },

    #[error("expected array, found {found} at {loc}")]
    ExpectedArray { found: &'static str, loc: Loc },

    #[error("expected object, found {found} at {loc}")]
    ExpectedObject { found: &'static str, loc: Loc },

    #[error("called expression must be a function, found {found} at {loc}")]
    NotCallable { found: &'static str, loc: Loc },

    #[error("bad member expression: {message} at {loc}")]
    BadMemberExpression { message: String, loc: Loc },

    #[error("property must have an identifier as a key, found `{key}` at {loc}")]
    NonIdentifierKey { key: String, loc: Loc },

    #[error("helper function `{name}` is not defined at {loc}")]
    UndefinedHelperFunction { name: String, loc: Loc },

    #[error("cannot reassign objects (did you mean to use this.copy(obj)): for `{text}` at {loc}")]
    CannotReassignObject { text: String, loc: Loc },

    #[error("this.copy requires exactly 1 argument, found {found} at {loc}")]
    CopyArity { found: usize, loc: Loc },

    #[error("unhandled array creation at {loc}: this.array is only valid as a variable initializer")]
    UnsupportedArrayCreation { loc: Loc },

    #[error("malformed array declaration: {reason} at {loc}")]
    MalformedArrayDeclaration { reason: &'static str, loc: Loc },

    #[error("all declarations must be initialized at {loc}")]
    AllDeclarationsMustInitialize { loc: Loc },

    #[error("`this` is only valid as the object of a member expression at {loc}")]
    BareThis { loc: Loc },

    #[error("unsupported expression: {kind} at {loc}")]
    UnsupportedExpression { kind: &'static str, loc: Loc },

    #[error("unsupported operator `{op}` at {loc}")]
    UnsupportedOperator { op: &'static str, loc: Loc },

    #[error("unsupported expression statement: {kind} at {loc}")]
    UnsupportedStatementExpression { kind: &'static str, loc: Loc },

    #[error("unsupported statement: {kind} at {loc}")]
    UnsupportedStatement { kind: &'static str, loc: Loc },

    #[error("function parameters must be identifiers at {loc}")]
    UnsupportedParameter { loc: Loc },

    #[error("bad function construction: source must be a single function")]
    BadFunctionConstruction,

    #[error("declared function must have a name or identifier")]
    MissingFunctionName,

    #[error("function `{name}` has no parameter shapes")]
    MissingParameterShapes { name: String },

    #[error("function `{name}` has no return shape")]
    MissingReturnShape { name: String },

    #[error("kernel parameter `{param}` has no shape sample")]
    MissingKernelShape { param: String },

    #[error("function `{function}` declares {declared} parameters but {described} are described")]
    ParameterCountMismatch {
        function: String,
        declared: usize,
        described: usize,
    },
}
