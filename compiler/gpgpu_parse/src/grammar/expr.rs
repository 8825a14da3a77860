//! Expression parsing.
//!
//! Precedence climbing over binary and logical operators; assignment and
//! `?:` sit above it, unary/postfix/call/member chains below it.

use gpgpu_ir::stack::ensure_sufficient_stack;
use gpgpu_ir::{
    AssignOp, BinaryOp, Expr, ExprId, ExprKind, Literal, LogicalOp, MemberProperty, Property,
    PropertyKeyKind, Span, TokenKind, UnaryOp, UpdateOp,
};

use crate::{ParseError, Parser};

/// Operator found in infix position.
#[derive(Copy, Clone)]
enum InfixOp {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

impl InfixOp {
    fn precedence(self) -> u8 {
        match self {
            InfixOp::Binary(op) => op.precedence(),
            InfixOp::Logical(op) => op.precedence(),
        }
    }

    fn is_right_associative(self) -> bool {
        matches!(self, InfixOp::Binary(op) if op.is_right_associative())
    }
}

fn infix_op(kind: &TokenKind) -> Option<InfixOp> {
    let op = match kind {
        TokenKind::PipePipe => return Some(InfixOp::Logical(LogicalOp::Or)),
        TokenKind::AmpAmp => return Some(InfixOp::Logical(LogicalOp::And)),
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::EqEqEq => BinaryOp::StrictEq,
        TokenKind::NotEqEq => BinaryOp::StrictNotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::UShr => BinaryOp::UShr,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::StarStar => BinaryOp::Exp,
        _ => return None,
    };
    Some(InfixOp::Binary(op))
}

fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::StarStarEq => AssignOp::Exp,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        TokenKind::ShlEq => AssignOp::Shl,
        TokenKind::ShrEq => AssignOp::Shr,
        TokenKind::UShrEq => AssignOp::UShr,
        _ => return None,
    })
}

/// Keywords are valid property names after `.` and as object keys.
fn keyword_name(kind: &TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::True
        | TokenKind::False
        | TokenKind::Null
        | TokenKind::This
        | TokenKind::Function
        | TokenKind::Const
        | TokenKind::Let
        | TokenKind::Var
        | TokenKind::If
        | TokenKind::Else
        | TokenKind::For
        | TokenKind::While
        | TokenKind::Do
        | TokenKind::Return
        | TokenKind::Break
        | TokenKind::Continue
        | TokenKind::New
        | TokenKind::Typeof => Some(kind.display_name()),
        _ => None,
    }
}

/// Property key text for a JavaScript number, matching `String(n)`.
fn number_key(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

impl Parser {
    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr { kind, span })
    }

    fn span_of(&self, id: ExprId) -> Span {
        self.arena.expr(id).span
    }

    pub(crate) fn parse_expression(&mut self) -> Result<ExprId, ParseError> {
        self.parse_assignment()
    }

    /// Assignment is right-associative and requires an identifier or member target.
    pub(crate) fn parse_assignment(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| {
            let target = self.parse_conditional()?;
            if self.cursor.check(&TokenKind::Arrow) {
                return Err(self.error(
                    "arrow functions are not supported",
                    self.cursor.current_span(),
                ));
            }
            let Some(op) = assign_op(self.cursor.current_kind()) else {
                return Ok(target);
            };

            let target_span = self.span_of(target);
            if !matches!(
                self.arena.expr(target).kind,
                ExprKind::Ident(_) | ExprKind::Member { .. }
            ) {
                return Err(self.error("invalid assignment target", target_span));
            }

            self.cursor.advance();
            let value = self.parse_assignment()?;
            let span = target_span.merge(self.span_of(value));
            Ok(self.alloc(ExprKind::Assign { op, target, value }, span))
        })
    }

    fn parse_conditional(&mut self) -> Result<ExprId, ParseError> {
        let test = self.parse_binary(1)?;
        if !self.cursor.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_assignment()?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_assignment()?;
        let span = self.span_of(test).merge(self.span_of(alternate));
        Ok(self.alloc(
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            },
            span,
        ))
    }

    /// Precedence climbing for operators binding at least `min_prec`.
    fn parse_binary(&mut self, min_prec: u8) -> Result<ExprId, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(op) = infix_op(self.cursor.current_kind()) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.cursor.advance();

            let next_min = if op.is_right_associative() {
                prec
            } else {
                prec + 1
            };
            let right = ensure_sufficient_stack(|| self.parse_binary(next_min))?;
            let span = self.span_of(left).merge(self.span_of(right));

            let kind = match op {
                InfixOp::Binary(op) => ExprKind::Binary { op, left, right },
                InfixOp::Logical(op) => ExprKind::Logical { op, left, right },
            };
            left = self.alloc(kind, span);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let op = match self.cursor.current_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Typeof => UnaryOp::Typeof,
            TokenKind::PlusPlus | TokenKind::MinusMinus => return self.parse_prefix_update(),
            _ => return self.parse_postfix(),
        };
        let start = self.cursor.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(self.span_of(operand));
        Ok(self.alloc(ExprKind::Unary { op, operand }, span))
    }

    fn parse_prefix_update(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.advance();
        let op = if token.kind == TokenKind::PlusPlus {
            UpdateOp::Increment
        } else {
            UpdateOp::Decrement
        };
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = token.span.merge(self.span_of(operand));
        Ok(self.alloc(
            ExprKind::Update {
                op,
                prefix: true,
                operand,
            },
            span,
        ))
    }

    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let operand = self.parse_call_member()?;
        let current = self.cursor.current();
        if current.newline_before {
            return Ok(operand);
        }
        let op = match current.kind {
            TokenKind::PlusPlus => UpdateOp::Increment,
            TokenKind::MinusMinus => UpdateOp::Decrement,
            _ => return Ok(operand),
        };
        let end = self.cursor.advance().span;
        let span = self.span_of(operand).merge(end);
        Ok(self.alloc(
            ExprKind::Update {
                op,
                prefix: false,
                operand,
            },
            span,
        ))
    }

    /// Primary expression followed by `.name`, `[index]` and `(args)` suffixes.
    fn parse_call_member(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = if self.cursor.check(&TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            match self.cursor.current_kind() {
                TokenKind::Dot | TokenKind::LBracket => {
                    expr = self.parse_member_suffix(expr)?;
                }
                TokenKind::LParen => {
                    let args = self.parse_arguments()?;
                    let span = self.span_of(expr).merge(self.cursor.previous_span());
                    expr = self.alloc(ExprKind::Call { callee: expr, args }, span);
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `new Callee(args)`; the callee takes member suffixes but not calls.
    fn parse_new(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect(&TokenKind::New)?;
        let mut callee = if self.cursor.check(&TokenKind::New) {
            ensure_sufficient_stack(|| self.parse_new())?
        } else {
            self.parse_primary()?
        };
        while matches!(
            self.cursor.current_kind(),
            TokenKind::Dot | TokenKind::LBracket
        ) {
            callee = self.parse_member_suffix(callee)?;
        }
        let args = if self.cursor.check(&TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        let span = start.merge(self.cursor.previous_span());
        Ok(self.alloc(ExprKind::New { callee, args }, span))
    }

    fn parse_member_suffix(&mut self, object: ExprId) -> Result<ExprId, ParseError> {
        let property = if self.cursor.eat(&TokenKind::Dot) {
            let token = self.cursor.current().clone();
            let name = match &token.kind {
                TokenKind::Ident(name) => name.clone(),
                other => match keyword_name(other) {
                    Some(name) => name.to_owned(),
                    None => return Err(self.unexpected("property name")),
                },
            };
            self.cursor.advance();
            MemberProperty::Named(name, token.span)
        } else {
            self.expect(&TokenKind::LBracket)?;
            let index = self.parse_expression()?;
            self.expect(&TokenKind::RBracket)?;
            MemberProperty::Computed(index)
        };
        let span = self.span_of(object).merge(self.cursor.previous_span());
        Ok(self.alloc(ExprKind::Member { object, property }, span))
    }

    fn parse_arguments(&mut self) -> Result<Vec<ExprId>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) {
            args.push(self.parse_assignment()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current().clone();
        let kind = match token.kind {
            TokenKind::Number(n) => ExprKind::Literal(Literal::Number(n)),
            TokenKind::Str(s) => ExprKind::Literal(Literal::String(s)),
            TokenKind::True => ExprKind::Literal(Literal::Bool(true)),
            TokenKind::False => ExprKind::Literal(Literal::Bool(false)),
            TokenKind::Null => ExprKind::Literal(Literal::Null),
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::This => ExprKind::This,
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBrace => return self.parse_object(),
            TokenKind::LBracket => return self.parse_array(),
            TokenKind::Function => {
                let function = self.parse_function()?;
                let span = self.arena.function(function).span;
                return Ok(self.alloc(ExprKind::Function(function), span));
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.cursor.advance();
        Ok(self.alloc(kind, token.span))
    }

    fn parse_object(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect(&TokenKind::LBrace)?;
        let mut properties = Vec::new();

        while !self.cursor.check(&TokenKind::RBrace) {
            let key_token = self.cursor.current().clone();
            let (key, key_kind) = match &key_token.kind {
                TokenKind::Ident(name) => (name.clone(), PropertyKeyKind::Ident),
                TokenKind::Str(name) => (name.clone(), PropertyKeyKind::String),
                TokenKind::Number(n) => (number_key(*n), PropertyKeyKind::Number),
                other => match keyword_name(other) {
                    Some(name) => (name.to_owned(), PropertyKeyKind::Ident),
                    None => return Err(self.unexpected("property key")),
                },
            };
            self.cursor.advance();

            let value = if self.cursor.eat(&TokenKind::Colon) {
                self.parse_assignment()?
            } else if matches!(key_token.kind, TokenKind::Ident(_))
                && matches!(
                    self.cursor.current_kind(),
                    TokenKind::Comma | TokenKind::RBrace
                )
            {
                // Shorthand `{ x }`.
                self.alloc(ExprKind::Ident(key.clone()), key_token.span)
            } else {
                return Err(self.unexpected("`:`"));
            };

            let span = key_token.span.merge(self.span_of(value));
            properties.push(Property {
                key,
                key_kind,
                key_span: key_token.span,
                value,
                span,
            });

            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }

        let end = self.expect(&TokenKind::RBrace)?;
        Ok(self.alloc(ExprKind::Object(properties), start.merge(end)))
    }

    fn parse_array(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.cursor.check(&TokenKind::RBracket) {
            elements.push(self.parse_assignment()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(&TokenKind::RBracket)?;
        Ok(self.alloc(ExprKind::Array(elements), start.merge(end)))
    }
}
