//! Expression code generation.
//!
//! Turns one AST expression into C text plus its [`TypeInfo`]. Object values
//! follow two rules:
//!
//! - Global and reference objects are dereferenced where they are read, so
//!   everything built on top of an identifier sees a plain value type.
//! - Only orphan objects may be bound by assignment. Anything else must go
//!   through `this.copy(obj)`, which is the one place a struct copy is made.

use std::collections::BTreeMap;

use gpgpu_ir::stack::ensure_sufficient_stack;
use gpgpu_ir::{
    AssignOp, BinaryOp, Expr, ExprId, ExprKind, Literal, Loc, MemberProperty, Property,
    PropertyKeyKind, Span, UnaryOp,
};
use gpgpu_parse::ParseOutput;
use gpgpu_types::{
    is_c_identifier, DeclarationTable, ObjectFlags, ObjectType, ScalarKind, TypeInfo,
};

use crate::{CodegenError, ExpressionContext};

/// Generated C text and its type.
#[derive(Clone, PartialEq, Debug)]
pub struct ParsedExpr {
    pub text: String,
    pub ty: TypeInfo,
}

impl ParsedExpr {
    /// Dereference a global object that reached the top of a parse.
    fn deref_global(self) -> Self {
        if self.ty.is_object_with(ObjectFlags::GLOBAL) {
            ParsedExpr {
                text: format!("(*{})", self.text),
                ty: self.ty.without_flags(ObjectFlags::GLOBAL),
            }
        } else {
            self
        }
    }
}

/// Expression parser for one function body.
pub struct ExpressionParser<'a> {
    ast: &'a ParseOutput,
    pub(crate) decls: &'a mut DeclarationTable,
}

impl<'a> ExpressionParser<'a> {
    pub fn new(ast: &'a ParseOutput, decls: &'a mut DeclarationTable) -> Self {
        ExpressionParser { ast, decls }
    }

    #[inline]
    pub(crate) fn loc(&self, span: Span) -> Loc {
        self.ast.lines.span_loc(span)
    }

    #[inline]
    fn node(&self, id: ExprId) -> &'a Expr {
        self.ast.arena.expr(id)
    }

    /// Parse an expression, hoisting temporaries into `ctx`.
    pub fn parse(
        &mut self,
        id: ExprId,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<ParsedExpr, CodegenError> {
        self.parse_with(id, ctx, false)
    }

    /// Like [`parse`](Self::parse). With `ignore_type_resolution` a bare
    /// identifier is emitted as-is, typed `double`, without a scope lookup.
    pub fn parse_with(
        &mut self,
        id: ExprId,
        ctx: &mut ExpressionContext<'_>,
        ignore_type_resolution: bool,
    ) -> Result<ParsedExpr, CodegenError> {
        let parsed = match &self.node(id).kind {
            ExprKind::Ident(name) if ignore_type_resolution => ParsedExpr {
                text: name.clone(),
                ty: TypeInfo::Double,
            },
            _ => self.expr(id, ctx)?,
        };
        Ok(parsed.deref_global())
    }

    fn expr(
        &mut self,
        id: ExprId,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<ParsedExpr, CodegenError> {
        ensure_sufficient_stack(|| self.expr_inner(id, ctx))
    }

    fn expr_inner(
        &mut self,
        id: ExprId,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<ParsedExpr, CodegenError> {
        let node = self.node(id);
        tracing::trace!(kind = node.kind.name(), "expression");

        match &node.kind {
            ExprKind::Ident(name) => self.ident(name, node.span),
            ExprKind::Literal(literal) => self.literal(literal, node.span),
            ExprKind::This => Err(CodegenError::BareThis {
                loc: self.loc(node.span),
            }),
            ExprKind::Object(properties) => self.object(properties, ctx),
            ExprKind::Unary { op, operand } => {
                if matches!(op, UnaryOp::Typeof) {
                    return Err(CodegenError::UnsupportedOperator {
                        op: "typeof",
                        loc: self.loc(node.span),
                    });
                }
                let operand = self.expr(*operand, ctx)?;
                // `-(-x)` must not turn into `--x`.
                let text = if operand.text.starts_with(['-', '+']) {
                    format!("{}({})", op.as_symbol(), operand.text)
                } else {
                    format!("{}{}", op.as_symbol(), operand.text)
                };
                Ok(ParsedExpr {
                    text,
                    ty: operand.ty,
                })
            }
            ExprKind::Update {
                op,
                prefix,
                operand,
            } => {
                let operand = self.expr(*operand, ctx)?;
                let text = if *prefix {
                    format!("{}{}", op.as_symbol(), operand.text)
                } else {
                    format!("{}{}", operand.text, op.as_symbol())
                };
                Ok(ParsedExpr {
                    text,
                    ty: operand.ty,
                })
            }
            ExprKind::Binary { op, left, right } => {
                let symbol = binary_symbol(*op).ok_or_else(|| CodegenError::UnsupportedOperator {
                    op: op.as_symbol(),
                    loc: self.loc(node.span),
                })?;
                let left = self.expr(*left, ctx)?;
                let right = self.expr(*right, ctx)?;
                // No promotion: the left operand decides.
                Ok(ParsedExpr {
                    text: format!("({} {symbol} {})", left.text, right.text),
                    ty: left.ty,
                })
            }
            ExprKind::Logical { op, left, right } => {
                let left = self.expr(*left, ctx)?;
                let right = self.expr(*right, ctx)?;
                Ok(ParsedExpr {
                    text: format!("({} {} {})", left.text, op.as_symbol(), right.text),
                    ty: TypeInfo::INT,
                })
            }
            ExprKind::Assign { op, target, value } => {
                self.assign(*op, *target, *value, node.span, ctx)
            }
            ExprKind::Member { object, property } => self.member(*object, property, ctx),
            ExprKind::Call { callee, args } => self.call(*callee, args, ctx),
            ExprKind::Array(_)
            | ExprKind::Function(_)
            | ExprKind::Conditional { .. }
            | ExprKind::New { .. } => Err(CodegenError::UnsupportedExpression {
                kind: node.kind.name(),
                loc: self.loc(node.span),
            }),
        }
    }

    fn ident(&self, name: &str, span: Span) -> Result<ParsedExpr, CodegenError> {
        let ty = self
            .decls
            .var_type(name)
            .map_err(|_| CodegenError::UndeclaredVariable {
                name: name.to_owned(),
                loc: self.loc(span),
            })?
            .clone();

        if ty.is_object_with(ObjectFlags::GLOBAL) || ty.is_object_with(ObjectFlags::REFERENCE) {
            return Ok(ParsedExpr {
                text: format!("(*{name})"),
                ty: ty.without_flags(
                    ObjectFlags::GLOBAL | ObjectFlags::REFERENCE | ObjectFlags::RVALUE,
                ),
            });
        }
        Ok(ParsedExpr {
            text: name.to_owned(),
            ty: ty.without_flags(ObjectFlags::RVALUE),
        })
    }

    fn literal(&self, literal: &Literal, span: Span) -> Result<ParsedExpr, CodegenError> {
        let (text, ty) = match literal {
            Literal::Number(n) => (format_number(*n), TypeInfo::Double),
            Literal::Bool(b) => (if *b { "1" } else { "0" }.to_owned(), TypeInfo::INT),
            Literal::Null => ("0".to_owned(), TypeInfo::INT),
            Literal::String(_) => {
                return Err(CodegenError::UnsupportedExpression {
                    kind: "string literal",
                    loc: self.loc(span),
                })
            }
        };
        Ok(ParsedExpr { text, ty })
    }

    /// `{ k: v, ... }` as a compound literal of an interned struct.
    fn object(
        &mut self,
        properties: &'a [Property],
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<ParsedExpr, CodegenError> {
        // Later duplicates win, fields render in struct order.
        let mut fields: BTreeMap<&'a str, ParsedExpr> = BTreeMap::new();
        for property in properties {
            if property.key_kind != PropertyKeyKind::Ident || !is_c_identifier(&property.key) {
                return Err(CodegenError::NonIdentifierKey {
                    key: property.key.clone(),
                    loc: self.loc(property.key_span),
                });
            }
            let value = self.expr(property.value, ctx)?;
            fields.insert(property.key.as_str(), value);
        }

        let mut signature = Vec::with_capacity(fields.len());
        for (key, value) in &fields {
            signature.push((value.ty.c_type()?, (*key).to_owned()));
        }
        let name = self.decls.get_object(signature);

        let inits: Vec<String> = fields
            .iter()
            .map(|(key, value)| format!(".{key} = {}", value.text))
            .collect();
        let text = format!("({name}){{ {} }}", inits.join(", "));
        let properties = fields
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value.ty))
            .collect();

        Ok(ParsedExpr {
            text,
            ty: TypeInfo::Object(ObjectType {
                name,
                flags: ObjectFlags::FRESH,
                properties,
            }),
        })
    }

    fn assign(
        &mut self,
        op: AssignOp,
        target: ExprId,
        value: ExprId,
        span: Span,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<ParsedExpr, CodegenError> {
        let symbol = assign_symbol(op).ok_or_else(|| CodegenError::UnsupportedOperator {
            op: op.as_symbol(),
            loc: self.loc(span),
        })?;

        let right = self.expr(value, ctx)?;
        if right
            .ty
            .as_object()
            .is_some_and(|object| !object.is(ObjectFlags::ORPHAN))
        {
            return Err(CodegenError::CannotReassignObject {
                text: right.text,
                loc: self.loc(span),
            });
        }
        let left = self.expr(target, ctx)?;

        // The target now owns the value.
        Ok(ParsedExpr {
            text: format!("{} {symbol} {}", left.text, right.text),
            ty: right.ty.without_flags(ObjectFlags::ORPHAN),
        })
    }

    fn member(
        &mut self,
        object: ExprId,
        property: &'a MemberProperty,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<ParsedExpr, CodegenError> {
        let object_node = self.node(object);

        let (name, name_span) = match property {
            MemberProperty::Computed(index) => {
                if matches!(object_node.kind, ExprKind::This) {
                    return Err(CodegenError::BadMemberExpression {
                        message: "computed access on `this`".to_owned(),
                        loc: self.loc(object_node.span),
                    });
                }
                return self.index(object, *index, ctx);
            }
            MemberProperty::Named(name, span) => (name.as_str(), *span),
        };

        if matches!(object_node.kind, ExprKind::This) {
            return self.this_member(name, name_span);
        }
        if self.is_this_func(object_node) {
            return self.helper(name, name_span);
        }

        let left = self.expr(object, ctx)?;
        let Some(left_ty) = left.ty.as_object() else {
            return Err(CodegenError::BadMemberExpression {
                message: format!("`.{name}` on a value of type {}", left.ty.kind_name()),
                loc: self.loc(name_span),
            });
        };
        let Some(field) = left_ty.properties.get(name) else {
            return Err(CodegenError::BadMemberExpression {
                message: format!("`{}` has no field `{name}`", left_ty.name),
                loc: self.loc(name_span),
            });
        };
        let sep = if left_ty.is(ObjectFlags::GLOBAL) {
            "->"
        } else {
            "."
        };

        Ok(ParsedExpr {
            text: format!("{}{sep}{name}", left.text),
            ty: field.clone().without_flags(ObjectFlags::RVALUE),
        })
    }

    /// `array[index]`
    fn index(
        &mut self,
        object: ExprId,
        index: ExprId,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<ParsedExpr, CodegenError> {
        let array = self.expr(object, ctx)?;
        let content = match array.ty {
            TypeInfo::Array { content } => *content,
            other => {
                return Err(CodegenError::ExpectedArray {
                    found: other.kind_name(),
                    loc: self.loc(self.node(object).span),
                })
            }
        };
        let index = self.expr(index, ctx)?;

        Ok(ParsedExpr {
            text: format!("{}[(size_t)({})]", array.text, index.text),
            ty: content.without_flags(ObjectFlags::RVALUE),
        })
    }

    /// `this.<name>` outside of a call.
    fn this_member(&self, name: &str, span: Span) -> Result<ParsedExpr, CodegenError> {
        match builtin(name) {
            Some((_, TypeInfo::GenericFunctionMarker)) => Err(CodegenError::UnsupportedArrayCreation {
                loc: self.loc(span),
            }),
            Some((text, ty)) => Ok(ParsedExpr { text, ty }),
            None if name == "copy" || name == "func" => Err(CodegenError::BadMemberExpression {
                message: format!("`this.{name}` cannot be used as a value"),
                loc: self.loc(span),
            }),
            None => self.helper(name, span),
        }
    }

    fn helper(&self, name: &str, span: Span) -> Result<ParsedExpr, CodegenError> {
        match self.decls.lookup_function(name) {
            Some(return_type) => Ok(ParsedExpr {
                text: name.to_owned(),
                ty: TypeInfo::function(return_type.clone()),
            }),
            None => Err(CodegenError::UndefinedHelperFunction {
                name: name.to_owned(),
                loc: self.loc(span),
            }),
        }
    }

    /// Whether `expr` is `this.func`.
    fn is_this_func(&self, expr: &Expr) -> bool {
        match &expr.kind {
            ExprKind::Member {
                object,
                property: MemberProperty::Named(name, _),
            } => name == "func" && matches!(self.node(*object).kind, ExprKind::This),
            _ => false,
        }
    }

    /// Property name of a `this.<name>` expression.
    fn this_property(&self, expr: &'a Expr) -> Option<&'a str> {
        match &expr.kind {
            ExprKind::Member {
                object,
                property: MemberProperty::Named(name, _),
            } if matches!(self.node(*object).kind, ExprKind::This) => Some(name.as_str()),
            _ => None,
        }
    }

    fn call(
        &mut self,
        callee: ExprId,
        args: &'a [ExprId],
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<ParsedExpr, CodegenError> {
        let callee_node = self.node(callee);
        match self.this_property(callee_node) {
            Some("copy") => return self.copy(args, callee_node.span, ctx),
            Some("array") => {
                return Err(CodegenError::UnsupportedArrayCreation {
                    loc: self.loc(callee_node.span),
                })
            }
            _ => {}
        }

        let function = self.expr(callee, ctx)?;
        let return_type = match function.ty {
            TypeInfo::Function { return_type } => *return_type,
            other => {
                return Err(CodegenError::NotCallable {
                    found: other.kind_name(),
                    loc: self.loc(callee_node.span),
                })
            }
        };

        let mut rendered = Vec::with_capacity(args.len());
        for &arg in args {
            let parsed = self.expr(arg, ctx)?;
            rendered.push(pass_argument(parsed, ctx));
        }

        Ok(ParsedExpr {
            text: format!("{}({})", function.text, rendered.join(", ")),
            ty: return_type,
        })
    }

    /// `this.copy(obj)`: field-by-field construction of a new value.
    fn copy(
        &mut self,
        args: &[ExprId],
        span: Span,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<ParsedExpr, CodegenError> {
        let [arg] = args else {
            return Err(CodegenError::CopyArity {
                found: args.len(),
                loc: self.loc(span),
            });
        };
        let source = self.expr(*arg, ctx)?;
        let Some(object) = source.ty.as_object() else {
            return Err(CodegenError::ExpectedObject {
                found: source.ty.kind_name(),
                loc: self.loc(self.node(*arg).span),
            });
        };
        let text = deep_copy(object, &source.text);

        Ok(ParsedExpr {
            text,
            ty: source
                .ty
                .without_flags(ObjectFlags::GLOBAL | ObjectFlags::REFERENCE)
                .with_flags(ObjectFlags::FRESH),
        })
    }
}

/// Objects are passed by address. Values without storage go through a temporary.
fn pass_argument(arg: ParsedExpr, ctx: &mut ExpressionContext<'_>) -> String {
    let Some(object) = arg
        .ty
        .as_object()
        .filter(|object| !object.is(ObjectFlags::REFERENCE))
    else {
        return arg.text;
    };

    if object.is(ObjectFlags::RVALUE) {
        let name = ctx.declare_temp(arg.ty.without_flags(ObjectFlags::FRESH), Some(arg.text));
        format!("&{name}")
    } else {
        format!("&({})", arg.text)
    }
}

fn deep_copy(object: &ObjectType, source: &str) -> String {
    let fields: Vec<String> = object
        .properties
        .iter()
        .map(|(field, ty)| {
            let path = format!("{source}.{field}");
            match ty {
                TypeInfo::Object(inner) => format!(".{field} = {}", deep_copy(inner, &path)),
                _ => format!(".{field} = {path}"),
            }
        })
        .collect();
    format!("({}){{ {} }}", object.name, fields.join(", "))
}

/// Kernel built-ins reachable as `this.<name>`: C text and type.
fn builtin(name: &str) -> Option<(String, TypeInfo)> {
    let cast = |kind: ScalarKind| {
        Some((
            format!("({})", kind.name()),
            TypeInfo::function(TypeInfo::Scalar(kind)),
        ))
    };
    match name {
        "INFINITY" | "M_PI" => Some((name.to_owned(), TypeInfo::Double)),
        "get_global_id" => Some((name.to_owned(), TypeInfo::function(TypeInfo::INT))),
        "int" => cast(ScalarKind::Int),
        "uint" => cast(ScalarKind::Uint),
        "long" => cast(ScalarKind::Long),
        "ulong" => cast(ScalarKind::Ulong),
        "sqrt" | "pow" | "sin" | "cos" => {
            Some((name.to_owned(), TypeInfo::function(TypeInfo::Double)))
        }
        "array" => Some((name.to_owned(), TypeInfo::GenericFunctionMarker)),
        _ => None,
    }
}

fn binary_symbol(op: BinaryOp) -> Option<&'static str> {
    match op {
        BinaryOp::StrictEq => Some("=="),
        BinaryOp::StrictNotEq => Some("!="),
        // No C counterpart.
        BinaryOp::Exp | BinaryOp::UShr => None,
        other => Some(other.as_symbol()),
    }
}

fn assign_symbol(op: AssignOp) -> Option<&'static str> {
    match op {
        AssignOp::Exp | AssignOp::UShr => None,
        other => Some(other.as_symbol()),
    }
}

/// Render a number the way JavaScript prints it.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NAN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "INFINITY" } else { "-INFINITY" }.to_owned();
    }
    if n == 0.0 {
        return "0".to_owned();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{n}");
    }
    let text = format!("{n:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}
