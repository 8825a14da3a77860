//! Flat AST for the JavaScript kernel subset.
//!
//! Nodes live in an [`AstArena`](crate::AstArena) and refer to each other by
//! index. The node enums are closed: code generation matches on them
//! exhaustively, so every construct the parser accepts has an explicit
//! accept-or-reject arm downstream.

mod operators;

use std::fmt;

use crate::Span;

pub use operators::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// Index into the expression arena.
    ExprId
);
define_id!(
    /// Index into the statement arena.
    StmtId
);
define_id!(
    /// Index into the function arena.
    FunctionId
);

/// Literal values.
#[derive(Clone, PartialEq, Debug)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
}

/// How an object literal key was written.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PropertyKeyKind {
    /// `x` (keywords included).
    Ident,
    /// `"x"` or `'x'`.
    String,
    /// `0`, `1.5`
    Number,
}

impl PropertyKeyKind {
    pub const fn name(self) -> &'static str {
        match self {
            PropertyKeyKind::Ident => "identifier",
            PropertyKeyKind::String => "string",
            PropertyKeyKind::Number => "number",
        }
    }
}

/// Object literal property `key: value`.
#[derive(Clone, PartialEq, Debug)]
pub struct Property {
    pub key: String,
    pub key_kind: PropertyKeyKind,
    pub key_span: Span,
    pub value: ExprId,
    pub span: Span,
}

/// Right side of a member expression.
#[derive(Clone, PartialEq, Debug)]
pub enum MemberProperty {
    /// `obj.name`
    Named(String, Span),
    /// `obj[expr]`
    Computed(ExprId),
}

#[derive(Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    Ident(String),
    Literal(Literal),
    This,
    Object(Vec<Property>),
    Array(Vec<ExprId>),
    Function(FunctionId),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Logical {
        op: LogicalOp,
        left: ExprId,
        right: ExprId,
    },
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
    Conditional {
        test: ExprId,
        consequent: ExprId,
        alternate: ExprId,
    },
    Member {
        object: ExprId,
        property: MemberProperty,
    },
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    New {
        callee: ExprId,
        args: Vec<ExprId>,
    },
}

impl ExprKind {
    /// Node name used in "unsupported" diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Ident(_) => "Identifier",
            ExprKind::Literal(_) => "Literal",
            ExprKind::This => "ThisExpression",
            ExprKind::Object(_) => "ObjectExpression",
            ExprKind::Array(_) => "ArrayExpression",
            ExprKind::Function(_) => "FunctionExpression",
            ExprKind::Unary { .. } => "UnaryExpression",
            ExprKind::Update { .. } => "UpdateExpression",
            ExprKind::Binary { .. } => "BinaryExpression",
            ExprKind::Logical { .. } => "LogicalExpression",
            ExprKind::Assign { .. } => "AssignmentExpression",
            ExprKind::Conditional { .. } => "ConditionalExpression",
            ExprKind::Member { .. } => "MemberExpression",
            ExprKind::Call { .. } => "CallExpression",
            ExprKind::New { .. } => "NewExpression",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VarKind {
    Const,
    Let,
    Var,
}

/// One `name = init` entry of a variable declaration.
#[derive(Clone, PartialEq, Debug)]
pub struct Declarator {
    pub name: String,
    pub init: Option<ExprId>,
    pub span: Span,
}

/// Initializer clause of a `for` statement.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ForInit {
    /// A `VarDecl` statement.
    Decl(StmtId),
    Expr(ExprId),
}

#[derive(Clone, PartialEq, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    Block(Vec<StmtId>),
    VarDecl {
        kind: VarKind,
        declarators: Vec<Declarator>,
    },
    If {
        test: ExprId,
        consequent: StmtId,
        alternate: Option<StmtId>,
    },
    For {
        init: Option<ForInit>,
        test: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    },
    While {
        test: ExprId,
        body: StmtId,
    },
    DoWhile {
        body: StmtId,
        test: ExprId,
    },
    Expr(ExprId),
    Return(Option<ExprId>),
    Break,
    Continue,
    Empty,
    FunctionDecl(FunctionId),
}

impl StmtKind {
    /// Node name used in "unsupported" diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            StmtKind::Block(_) => "BlockStatement",
            StmtKind::VarDecl { .. } => "VariableDeclaration",
            StmtKind::If { .. } => "IfStatement",
            StmtKind::For { .. } => "ForStatement",
            StmtKind::While { .. } => "WhileStatement",
            StmtKind::DoWhile { .. } => "DoWhileStatement",
            StmtKind::Expr(_) => "ExpressionStatement",
            StmtKind::Return(_) => "ReturnStatement",
            StmtKind::Break => "BreakStatement",
            StmtKind::Continue => "ContinueStatement",
            StmtKind::Empty => "EmptyStatement",
            StmtKind::FunctionDecl(_) => "FunctionDeclaration",
        }
    }
}

/// A function parameter.
#[derive(Clone, PartialEq, Debug)]
pub enum Param {
    Ident(String, Span),
    /// `name = default`
    Default {
        name: String,
        default: ExprId,
        span: Span,
    },
    /// `...name`
    Rest(String, Span),
}

impl Param {
    pub fn span(&self) -> Span {
        match self {
            Param::Ident(_, span) | Param::Rest(_, span) | Param::Default { span, .. } => *span,
        }
    }
}

/// A function declaration or expression.
#[derive(Clone, PartialEq, Debug)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<Param>,
    /// Always a `StmtKind::Block`.
    pub body: StmtId,
    pub span: Span,
}

/// Top-level statement list of one parsed source.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Program {
    pub body: Vec<StmtId>,
}
