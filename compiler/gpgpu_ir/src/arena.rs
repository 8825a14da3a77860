//! Arena storage for the AST.

use crate::ast::{Expr, ExprId, Function, FunctionId, Stmt, StmtId};

/// Contiguous storage for every node of one parsed source.
#[derive(Clone, Debug, Default)]
pub struct AstArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    functions: Vec<Function>,
}

fn next_index(len: usize) -> u32 {
    // Sources are bounded by `Span`'s u32 offsets, so node counts are too.
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(next_index(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(next_index(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    pub fn alloc_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId::new(next_index(self.functions.len()));
        self.functions.push(function);
        id
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, Literal, StmtKind};
    use crate::Span;

    #[test]
    fn ids_are_sequential() {
        let mut arena = AstArena::new();
        let a = arena.alloc_expr(Expr {
            kind: ExprKind::Ident("a".into()),
            span: Span::new(0, 1),
        });
        let b = arena.alloc_expr(Expr {
            kind: ExprKind::Literal(Literal::Number(2.0)),
            span: Span::new(4, 5),
        });
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(arena.expr(b).kind, ExprKind::Literal(Literal::Number(2.0)));
        assert_eq!(arena.expr_count(), 2);
    }

    #[test]
    fn statements_reference_expressions() {
        let mut arena = AstArena::new();
        let value = arena.alloc_expr(Expr {
            kind: ExprKind::Ident("x".into()),
            span: Span::new(7, 8),
        });
        let ret = arena.alloc_stmt(Stmt {
            kind: StmtKind::Return(Some(value)),
            span: Span::new(0, 9),
        });
        assert_eq!(arena.stmt(ret).kind, StmtKind::Return(Some(value)));
        assert_eq!(format!("{ret:?}"), "StmtId(0)");
    }
}
