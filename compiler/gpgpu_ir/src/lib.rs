//! gpgpu IR - source model for the kernel translator
//!
//! This crate holds the data shared by every pipeline stage:
//! - Spans and line/column lookup for error locations
//! - Tokens produced by the lexer
//! - The flat, arena-allocated JavaScript AST (`ExprId`/`StmtId` indices)
//! - A stack guard for the recursive passes over that AST

mod arena;
pub mod ast;
mod line_index;
mod span;
pub mod stack;
mod token;

pub use arena::AstArena;
pub use ast::{
    AssignOp, BinaryOp, Declarator, Expr, ExprId, ExprKind, ForInit, Function, FunctionId,
    Literal, LogicalOp, MemberProperty, Param, Program, Property, PropertyKeyKind, Stmt, StmtId,
    StmtKind, UnaryOp, UpdateOp, VarKind,
};
pub use line_index::{LineIndex, Loc};
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind};
