//! Translation of a kernel entry function plus its helpers into one OpenCL C
//! translation unit.
//!
//! Output layout: struct typedefs, helper definitions, then the
//! `__kernel void kernelFunc(...)` entry point. Any error aborts the whole
//! translation; no partial source is produced.

use std::fmt;

use gpgpu_ir::{ExprKind, Function, Param, StmtKind};
use gpgpu_parse::{parse_program, ParseOutput};
use gpgpu_types::{
    DeclarationTable, ObjectFlags, ObjectSerializer, SharedStructInterner, TypeInfo, Value,
};

use crate::{CodegenError, StatementParser, TempNames};

/// Host-side type of a kernel parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParamKind {
    Float32Array,
    Float64Array,
    Object,
    /// `Object[]`: an array of same-shaped objects.
    ObjectArray,
}

impl ParamKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ParamKind::Float32Array => "Float32Array",
            ParamKind::Float64Array => "Float64Array",
            ParamKind::Object => "Object",
            ParamKind::ObjectArray => "Object[]",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "Float32Array" => Some(ParamKind::Float32Array),
            "Float64Array" => Some(ParamKind::Float64Array),
            "Object" => Some(ParamKind::Object),
            "Object[]" => Some(ParamKind::ObjectArray),
            _ => None,
        }
    }

    /// Whether the parameter consumes a shape sample.
    pub const fn needs_shape(self) -> bool {
        matches!(self, ParamKind::Object | ParamKind::ObjectArray)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the kernel uses a parameter's buffer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

impl AccessMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
            AccessMode::ReadWrite => "readwrite",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "read" => Some(AccessMode::Read),
            "write" => Some(AccessMode::Write),
            "readwrite" => Some(AccessMode::ReadWrite),
            _ => None,
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct KernelParam {
    pub kind: ParamKind,
    pub access: AccessMode,
}

impl KernelParam {
    pub const fn new(kind: ParamKind, access: AccessMode) -> Self {
        KernelParam { kind, access }
    }
}

/// A helper function callable from the kernel as `this.<name>(...)`.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct HelperFunction {
    /// C name; defaults to the function's own identifier.
    pub name: Option<String>,
    pub source: String,
    pub return_shape: Option<Value>,
    /// One sample per parameter. A null sample types the parameter as `int`.
    pub param_shapes: Option<Vec<Value>>,
}

/// Everything needed to translate one kernel.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct KernelDescriptor {
    /// Entry function source: `function (...) {...}` or `main(...) {...}`.
    pub source: String,
    pub params: Vec<KernelParam>,
    /// Shape samples, consumed in order by the `Object`/`Object[]` parameters.
    pub shapes: Vec<Value>,
    pub helpers: Vec<HelperFunction>,
}

/// Lifetime of struct-name interning.
#[derive(Clone, Debug, Default)]
pub enum InterningScope {
    /// A fresh interner per translation.
    #[default]
    PerTranslation,
    /// An interner shared with other translations: same shape, same name.
    Shared(SharedStructInterner),
}

#[derive(Clone, Debug, Default)]
pub struct TranslateOptions {
    pub interning: InterningScope,
}

/// Translated kernel, ready for the execution layer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct KernelArtifact {
    pub source: String,
    pub param_kinds: Vec<ParamKind>,
    pub access_modes: Vec<AccessMode>,
}

/// Translate with default options.
pub fn translate_function(kernel: &KernelDescriptor) -> Result<KernelArtifact, CodegenError> {
    translate_function_with(kernel, &TranslateOptions::default())
}

#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(params = kernel.params.len(), helpers = kernel.helpers.len())
)]
pub fn translate_function_with(
    kernel: &KernelDescriptor,
    options: &TranslateOptions,
) -> Result<KernelArtifact, CodegenError> {
    let decls = match &options.interning {
        InterningScope::PerTranslation => DeclarationTable::new(),
        InterningScope::Shared(interner) => DeclarationTable::with_interner(interner.clone()),
    };
    let mut translator = Translator {
        decls,
        temps: TempNames::new(),
    };

    let entry = parse_program(&normalize_entry(&kernel.source))?;
    let function = leading_function(&entry).ok_or(CodegenError::BadFunctionConstruction)?;

    let mut helpers = Vec::with_capacity(kernel.helpers.len());
    for helper in &kernel.helpers {
        helpers.push(translator.helper(helper)?);
    }
    let (params, body) = translator.entry(&entry, function, kernel)?;

    let classes = translator.decls.classes_definition();
    let source = format!(
        "{classes}\n\n{}\n\n__kernel void kernelFunc({params}) {{\n{body}\n}}",
        helpers.join("\n")
    );
    tracing::debug!(bytes = source.len(), "translated kernel");

    Ok(KernelArtifact {
        source,
        param_kinds: kernel.params.iter().map(|p| p.kind).collect(),
        access_modes: kernel.params.iter().map(|p| p.access).collect(),
    })
}

/// State of one translation.
struct Translator {
    decls: DeclarationTable,
    temps: TempNames,
}

impl Translator {
    fn helper(&mut self, helper: &HelperFunction) -> Result<String, CodegenError> {
        let ast = parse_program(&normalize_helper(&helper.source))?;
        let function = leading_function(&ast).ok_or(CodegenError::BadFunctionConstruction)?;

        let name = helper
            .name
            .clone()
            .or_else(|| function.name.clone())
            .ok_or(CodegenError::MissingFunctionName)?;
        let Some(shapes) = &helper.param_shapes else {
            return Err(CodegenError::MissingParameterShapes { name });
        };
        if shapes.len() != function.params.len() {
            return Err(CodegenError::ParameterCountMismatch {
                function: name,
                declared: function.params.len(),
                described: shapes.len(),
            });
        }

        // Helpers take objects by pointer.
        let mut param_types = Vec::with_capacity(shapes.len());
        for shape in shapes {
            let ty = match ObjectSerializer::new(&mut self.decls).serialize(shape, false)?.ty {
                Some(ty @ TypeInfo::Object(_)) => ty.with_flags(ObjectFlags::REFERENCE),
                Some(ty) => ty,
                None => TypeInfo::INT,
            };
            param_types.push(ty);
        }
        let return_type = match &helper.return_shape {
            Some(shape) => ObjectSerializer::new(&mut self.decls).serialize(shape, false)?.ty,
            None => None,
        };
        let Some(return_type) = return_type else {
            return Err(CodegenError::MissingReturnShape { name });
        };

        self.decls.reset_scope();
        self.decls.add_function(name.clone(), return_type.clone());

        let mut params = Vec::with_capacity(param_types.len());
        for (param, ty) in function.params.iter().zip(param_types) {
            let Param::Ident(param_name, _) = param else {
                return Err(CodegenError::UnsupportedParameter {
                    loc: ast.lines.span_loc(param.span()),
                });
            };
            params.push(format!("{} {param_name}", ty.c_type()?));
            self.decls.declare_variable(param_name.clone(), ty);
        }

        let body = StatementParser::new(&ast, &mut self.decls, &self.temps).parse(function.body)?;
        tracing::debug!(%name, params = params.len(), "registered helper");

        Ok(format!(
            "{} {name}({}) {{\n{body}\n}}",
            return_type.c_type()?,
            params.join(", ")
        ))
    }

    /// Kernel parameter list and body statements.
    fn entry(
        &mut self,
        ast: &ParseOutput,
        function: &Function,
        kernel: &KernelDescriptor,
    ) -> Result<(String, String), CodegenError> {
        if function.params.len() != kernel.params.len() {
            return Err(CodegenError::ParameterCountMismatch {
                function: "kernelFunc".to_owned(),
                declared: function.params.len(),
                described: kernel.params.len(),
            });
        }
        self.decls.reset_scope();

        let mut shapes = kernel.shapes.iter();
        let mut params = Vec::with_capacity(kernel.params.len());
        for (param, kernel_param) in function.params.iter().zip(&kernel.params) {
            let Param::Ident(name, span) = param else {
                return Err(CodegenError::UnsupportedParameter {
                    loc: ast.lines.span_loc(param.span()),
                });
            };
            let loc = ast.lines.span_loc(*span);

            let (decl, ty) = match kernel_param.kind {
                ParamKind::Float32Array => (
                    format!("__global float *{name}"),
                    TypeInfo::array(TypeInfo::Double),
                ),
                ParamKind::Float64Array => (
                    format!("__global double *{name}"),
                    TypeInfo::array(TypeInfo::Double),
                ),
                ParamKind::Object => match self.kernel_shape(name, shapes.next())? {
                    Some(TypeInfo::Object(object)) => (
                        format!("global {}* {name}", object.name),
                        TypeInfo::Object(object),
                    ),
                    other => {
                        return Err(CodegenError::ExpectedObject {
                            found: other.as_ref().map_or("null", TypeInfo::kind_name),
                            loc,
                        })
                    }
                },
                ParamKind::ObjectArray => match self.kernel_shape(name, shapes.next())? {
                    Some(ty @ TypeInfo::Array { .. }) => (format!("{} {name}", ty.c_type()?), ty),
                    other => {
                        return Err(CodegenError::ExpectedArray {
                            found: other.as_ref().map_or("null", TypeInfo::kind_name),
                            loc,
                        })
                    }
                },
            };
            self.decls.declare_variable(name.clone(), ty);
            params.push(decl);
        }
        tracing::debug!(params = params.len(), "bound kernel parameters");

        let StmtKind::Block(body) = &ast.arena.stmt(function.body).kind else {
            return Err(CodegenError::BadFunctionConstruction);
        };
        let mut parser = StatementParser::new(ast, &mut self.decls, &self.temps);
        let mut lines = Vec::with_capacity(body.len());
        for &stmt in body {
            lines.push(parser.parse(stmt)?);
        }

        Ok((params.join(", "), lines.join("\n")))
    }

    fn kernel_shape(
        &mut self,
        param: &str,
        shape: Option<&Value>,
    ) -> Result<Option<TypeInfo>, CodegenError> {
        let shape = shape.ok_or_else(|| CodegenError::MissingKernelShape {
            param: param.to_owned(),
        })?;
        Ok(ObjectSerializer::new(&mut self.decls)
            .serialize(shape, true)?
            .ty)
    }
}

/// The entry source as a parenthesised function expression.
fn normalize_entry(source: &str) -> String {
    format!("({})", source.trim()).replacen("(main", "(function", 1)
}

/// Helper sources as a function declaration or expression.
fn normalize_helper(source: &str) -> String {
    const FUNCTION_PREFIXES: [&str; 4] = ["function ", "function(", "(function ", "(function("];

    let source = source.trim();
    if FUNCTION_PREFIXES.iter().any(|p| source.starts_with(p)) {
        source.to_owned()
    } else if let Some(rest) = source.strip_prefix('(') {
        format!("(function {rest}")
    } else {
        format!("function {source}")
    }
}

/// The function a source consists of.
fn leading_function(ast: &ParseOutput) -> Option<&Function> {
    let first = *ast.program.body.first()?;
    match &ast.arena.stmt(first).kind {
        StmtKind::FunctionDecl(function) => Some(ast.arena.function(*function)),
        StmtKind::Expr(expr) => match &ast.arena.expr(*expr).kind {
            ExprKind::Function(function) => Some(ast.arena.function(*function)),
            _ => None,
        },
        _ => None,
    }
}
