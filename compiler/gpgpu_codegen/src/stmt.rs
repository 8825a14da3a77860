//! Statement code generation.

use gpgpu_ir::stack::ensure_sufficient_stack;
use gpgpu_ir::{Declarator, ExprId, ExprKind, ForInit, Literal, MemberProperty, Span, StmtId, StmtKind};
use gpgpu_parse::ParseOutput;
use gpgpu_types::{DeclarationTable, ObjectFlags, TypeInfo};

use crate::expr::format_number;
use crate::{CodegenError, ExpressionContext, ExpressionParser, TempNames};

/// Statement parser for one function body.
///
/// Each statement gets its own [`ExpressionContext`]; the temporaries it
/// collects are declared immediately before the statement text.
pub struct StatementParser<'a> {
    ast: &'a ParseOutput,
    exprs: ExpressionParser<'a>,
    temps: &'a TempNames,
}

impl<'a> StatementParser<'a> {
    pub fn new(
        ast: &'a ParseOutput,
        decls: &'a mut DeclarationTable,
        temps: &'a TempNames,
    ) -> Self {
        StatementParser {
            ast,
            exprs: ExpressionParser::new(ast, decls),
            temps,
        }
    }

    /// Generate one complete C statement, hoisted temporaries first.
    pub fn parse(&mut self, id: StmtId) -> Result<String, CodegenError> {
        let mut ctx = ExpressionContext::new(self.temps);
        let text = ensure_sufficient_stack(|| self.statement(id, &mut ctx))?;
        Ok(format!("{}{text}", ctx.render()?))
    }

    fn statement(
        &mut self,
        id: StmtId,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<String, CodegenError> {
        let ast = self.ast;
        let stmt = ast.arena.stmt(id);
        tracing::trace!(kind = stmt.kind.name(), "statement");

        match &stmt.kind {
            StmtKind::Block(body) => {
                let mut lines = Vec::with_capacity(body.len() + 2);
                lines.push("{".to_owned());
                for &child in body {
                    lines.push(self.parse(child)?);
                }
                lines.push("}".to_owned());
                Ok(lines.join("\n"))
            }
            StmtKind::VarDecl { declarators, .. } => self.var_decl(declarators, ctx),
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                let test = self.exprs.parse(*test, ctx)?;
                let mut text = format!("if ({}) {}", test.text, self.parse(*consequent)?);
                if let Some(alternate) = alternate {
                    text.push_str(" else ");
                    text.push_str(&self.parse(*alternate)?);
                }
                Ok(text)
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                // Temporaries of the header are hoisted in front of the loop.
                let init = match init {
                    None => ";".to_owned(),
                    Some(ForInit::Decl(decl)) => self.statement(*decl, ctx)?,
                    Some(ForInit::Expr(expr)) => format!("{};", self.exprs.parse(*expr, ctx)?.text),
                };
                let test = self.optional(*test, ctx)?;
                let update = self.optional(*update, ctx)?;
                let body = self.parse(*body)?;
                Ok(format!("for({init} {test}; {update}) {body}"))
            }
            StmtKind::Expr(expr) => {
                let node = ast.arena.expr(*expr);
                if !matches!(node.kind, ExprKind::Assign { .. }) {
                    return Err(CodegenError::UnsupportedStatementExpression {
                        kind: node.kind.name(),
                        loc: self.exprs.loc(node.span),
                    });
                }
                Ok(format!("{};", self.exprs.parse(*expr, ctx)?.text))
            }
            StmtKind::Return(argument) => match argument {
                Some(argument) => Ok(format!("return {};", self.exprs.parse(*argument, ctx)?.text)),
                None => Ok("return;".to_owned()),
            },
            StmtKind::While { .. }
            | StmtKind::DoWhile { .. }
            | StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Empty
            | StmtKind::FunctionDecl(_) => Err(CodegenError::UnsupportedStatement {
                kind: stmt.kind.name(),
                loc: self.exprs.loc(stmt.span),
            }),
        }
    }

    fn optional(
        &mut self,
        expr: Option<ExprId>,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<String, CodegenError> {
        match expr {
            Some(expr) => Ok(self.exprs.parse(expr, ctx)?.text),
            None => Ok(String::new()),
        }
    }

    fn var_decl(
        &mut self,
        declarators: &'a [Declarator],
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<String, CodegenError> {
        let mut initialized = Vec::with_capacity(declarators.len());
        for declarator in declarators {
            match declarator.init {
                Some(init) => initialized.push((declarator, init)),
                None => {
                    return Err(CodegenError::AllDeclarationsMustInitialize {
                        loc: self.exprs.loc(declarator.span),
                    })
                }
            }
        }

        let mut lines = Vec::with_capacity(initialized.len());
        for (declarator, init) in initialized {
            let line = match self.array_allocation(init) {
                Some((args, span)) => self.array_decl(&declarator.name, args, span, ctx)?,
                None => self.binding(declarator, init, ctx)?,
            };
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    /// Arguments and span of a `this.array(...)` initializer.
    fn array_allocation(&self, init: ExprId) -> Option<(&'a [ExprId], Span)> {
        let ast = self.ast;
        let node = ast.arena.expr(init);
        let ExprKind::Call { callee, args } = &node.kind else {
            return None;
        };
        match &ast.arena.expr(*callee).kind {
            ExprKind::Member {
                object,
                property: MemberProperty::Named(name, _),
            } if name == "array" && matches!(ast.arena.expr(*object).kind, ExprKind::This) => {
                Some((args.as_slice(), node.span))
            }
            _ => None,
        }
    }

    /// `const name = this.array(shape, length)` as a fixed-size C array.
    fn array_decl(
        &mut self,
        name: &str,
        args: &[ExprId],
        span: Span,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<String, CodegenError> {
        let ast = self.ast;
        let [shape, length] = args else {
            return Err(CodegenError::MalformedArrayDeclaration {
                reason: "this.array requires exactly 2 arguments",
                loc: self.exprs.loc(span),
            });
        };

        let shape_node = ast.arena.expr(*shape);
        if !matches!(shape_node.kind, ExprKind::Literal(_) | ExprKind::Object(_)) {
            return Err(CodegenError::MalformedArrayDeclaration {
                reason: "element type must be given by a literal or object expression",
                loc: self.exprs.loc(shape_node.span),
            });
        }
        let length_node = ast.arena.expr(*length);
        let length = match &length_node.kind {
            ExprKind::Literal(Literal::Number(n)) if *n >= 0.0 && n.fract() == 0.0 => *n,
            _ => {
                return Err(CodegenError::MalformedArrayDeclaration {
                    reason: "length must be a non-negative integer literal",
                    loc: self.exprs.loc(length_node.span),
                })
            }
        };

        let element = self.exprs.parse(*shape, ctx)?.ty;
        if !matches!(element, TypeInfo::Double | TypeInfo::Object(_)) {
            return Err(CodegenError::MalformedArrayDeclaration {
                reason: "elements must be numbers or objects",
                loc: self.exprs.loc(shape_node.span),
            });
        }

        let text = format!("{} {name}[{}];", element.c_type()?, format_number(length));
        self.exprs
            .decls
            .declare_variable(name, TypeInfo::array(element));
        Ok(text)
    }

    /// `const name = init`, enforcing the no-implicit-copy rule.
    fn binding(
        &mut self,
        declarator: &Declarator,
        init: ExprId,
        ctx: &mut ExpressionContext<'_>,
    ) -> Result<String, CodegenError> {
        let expr = self.exprs.parse(init, ctx)?;
        if expr
            .ty
            .as_object()
            .is_some_and(|object| !object.is(ObjectFlags::ORPHAN))
        {
            return Err(CodegenError::CannotReassignObject {
                text: expr.text,
                loc: self.exprs.loc(declarator.span),
            });
        }

        // The variable owns the value and gives it storage.
        let ty = expr.ty.without_flags(ObjectFlags::FRESH);
        let text = format!("{} {} = {};", ty.c_type()?, declarator.name, expr.text);
        self.exprs.decls.declare_variable(declarator.name.clone(), ty);
        Ok(text)
    }
}

#[cfg(test)]
mod tests;
