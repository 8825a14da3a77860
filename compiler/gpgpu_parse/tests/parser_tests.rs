#![allow(clippy::unwrap_used, clippy::expect_used)]

use gpgpu_ir::{
    AstArena, ExprId, ExprKind, ForInit, Literal, MemberProperty, Param, PropertyKeyKind, StmtId,
    StmtKind,
};
use gpgpu_parse::{parse_program, ParseOutput};
use pretty_assertions::assert_eq;

/// Compact s-expression rendering for structural assertions.
fn sexpr(arena: &AstArena, id: ExprId) -> String {
    match &arena.expr(id).kind {
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Literal(Literal::Number(n)) => format!("{n}"),
        ExprKind::Literal(Literal::String(s)) => format!("{s:?}"),
        ExprKind::Literal(Literal::Bool(b)) => format!("{b}"),
        ExprKind::Literal(Literal::Null) => "null".into(),
        ExprKind::This => "this".into(),
        ExprKind::Object(props) => {
            let inner: Vec<String> = props
                .iter()
                .map(|p| format!("{}: {}", p.key, sexpr(arena, p.value)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        ExprKind::Array(items) => {
            let inner: Vec<String> = items.iter().map(|e| sexpr(arena, *e)).collect();
            format!("[{}]", inner.join(", "))
        }
        ExprKind::Function(_) => "<fn>".into(),
        ExprKind::Unary { op, operand } => {
            format!("({}{})", op.as_symbol(), sexpr(arena, *operand))
        }
        ExprKind::Update {
            op,
            prefix,
            operand,
        } => {
            if *prefix {
                format!("({}{})", op.as_symbol(), sexpr(arena, *operand))
            } else {
                format!("({}{})", sexpr(arena, *operand), op.as_symbol())
            }
        }
        ExprKind::Binary { op, left, right } => format!(
            "({} {} {})",
            sexpr(arena, *left),
            op.as_symbol(),
            sexpr(arena, *right)
        ),
        ExprKind::Logical { op, left, right } => format!(
            "({} {} {})",
            sexpr(arena, *left),
            op.as_symbol(),
            sexpr(arena, *right)
        ),
        ExprKind::Assign { op, target, value } => format!(
            "({} {} {})",
            sexpr(arena, *target),
            op.as_symbol(),
            sexpr(arena, *value)
        ),
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => format!(
            "({} ? {} : {})",
            sexpr(arena, *test),
            sexpr(arena, *consequent),
            sexpr(arena, *alternate)
        ),
        ExprKind::Member { object, property } => match property {
            MemberProperty::Named(name, _) => format!("{}.{name}", sexpr(arena, *object)),
            MemberProperty::Computed(index) => {
                format!("{}[{}]", sexpr(arena, *object), sexpr(arena, *index))
            }
        },
        ExprKind::Call { callee, args } => {
            let inner: Vec<String> = args.iter().map(|e| sexpr(arena, *e)).collect();
            format!("{}({})", sexpr(arena, *callee), inner.join(", "))
        }
        ExprKind::New { callee, args } => {
            let inner: Vec<String> = args.iter().map(|e| sexpr(arena, *e)).collect();
            format!("new {}({})", sexpr(arena, *callee), inner.join(", "))
        }
    }
}

fn parse(source: &str) -> ParseOutput {
    parse_program(source).unwrap_or_else(|e| panic!("parse failed: {e}"))
}

fn single_expr(source: &str) -> String {
    let out = parse(source);
    assert_eq!(out.program.body.len(), 1);
    match &out.arena.stmt(out.program.body[0]).kind {
        StmtKind::Expr(id) => sexpr(&out.arena, *id),
        other => panic!("expected expression statement, got {other:?}"),
    }
}

fn stmt(out: &ParseOutput, id: StmtId) -> &StmtKind {
    &out.arena.stmt(id).kind
}

#[test]
fn binary_precedence() {
    assert_eq!(single_expr("a + b * c - d;"), "((a + (b * c)) - d)");
    assert_eq!(single_expr("a < b == c < d;"), "((a < b) == (c < d))");
    assert_eq!(single_expr("a | b ^ c & d;"), "(a | (b ^ (c & d)))");
}

#[test]
fn exponent_is_right_associative() {
    assert_eq!(single_expr("a ** b ** c;"), "(a ** (b ** c))");
}

#[test]
fn logical_binds_looser_than_comparison() {
    assert_eq!(single_expr("a < b && c || d;"), "(((a < b) && c) || d)");
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(single_expr("a = b += c;"), "(a = (b += c))");
}

#[test]
fn invalid_assignment_target() {
    let err = parse_program("a + b = c;").unwrap_err();
    assert_eq!(err.message, "invalid assignment target");
    assert_eq!((err.loc.line, err.loc.column), (1, 0));
}

#[test]
fn member_call_chains() {
    assert_eq!(
        single_expr("out[i] = this.sqrt(a.b[i + 1]);"),
        "(out[i] = this.sqrt(a.b[(i + 1)]))"
    );
    assert_eq!(single_expr("this.func.helper(x);"), "this.func.helper(x)");
}

#[test]
fn keyword_property_names() {
    assert_eq!(single_expr("x.new.for;"), "x.new.for");
}

#[test]
fn unary_and_update() {
    assert_eq!(single_expr("-x + !y;"), "((-x) + (!y))");
    assert_eq!(single_expr("i++;"), "(i++)");
    assert_eq!(single_expr("--i;"), "(--i)");
}

#[test]
fn conditional_and_new() {
    assert_eq!(single_expr("a ? b : c ? d : e;"), "(a ? b : (c ? d : e))");
    assert_eq!(single_expr("new Foo(1);"), "new Foo(1)");
}

#[test]
fn object_and_array_literals() {
    assert_eq!(
        single_expr("x = { b: 1, a: { c: true }, 'd': null, e };"),
        "(x = {b: 1, a: {c: true}, d: null, e: e})"
    );
    assert_eq!(single_expr("[1, 2, ];"), "[1, 2]");
}

#[test]
fn object_keys_remember_how_they_were_written() {
    let out = parse("({ a: 1, 'b c': 2, 3: 4, if: 5 });");
    let StmtKind::Expr(id) = stmt(&out, out.program.body[0]) else {
        panic!("expected expression statement");
    };
    let ExprKind::Object(props) = &out.arena.expr(*id).kind else {
        panic!("expected object literal");
    };
    let keys: Vec<(&str, PropertyKeyKind)> =
        props.iter().map(|p| (p.key.as_str(), p.key_kind)).collect();
    assert_eq!(
        keys,
        vec![
            ("a", PropertyKeyKind::Ident),
            ("b c", PropertyKeyKind::String),
            ("3", PropertyKeyKind::Number),
            ("if", PropertyKeyKind::Ident),
        ]
    );
    assert_eq!((props[1].key_span.start, props[1].key_span.end), (9, 14));
}

#[test]
fn var_declarations() {
    let out = parse("const a = 1, b = {x: 2};\nlet c;");
    let StmtKind::VarDecl { declarators, .. } = stmt(&out, out.program.body[0]) else {
        panic!("expected declaration");
    };
    assert_eq!(declarators.len(), 2);
    assert_eq!(declarators[1].name, "b");
    assert_eq!(sexpr(&out.arena, declarators[1].init.unwrap()), "{x: 2}");

    let StmtKind::VarDecl { declarators, .. } = stmt(&out, out.program.body[1]) else {
        panic!("expected declaration");
    };
    assert_eq!(declarators[0].init, None);
}

#[test]
fn for_statement_clauses() {
    let out = parse("for (let i = 0; i < 10; i++) { x = i; }");
    let StmtKind::For {
        init,
        test,
        update,
        body,
    } = stmt(&out, out.program.body[0])
    else {
        panic!("expected for");
    };
    assert!(matches!(init, Some(ForInit::Decl(_))));
    assert_eq!(sexpr(&out.arena, test.unwrap()), "(i < 10)");
    assert_eq!(sexpr(&out.arena, update.unwrap()), "(i++)");
    assert!(matches!(stmt(&out, *body), StmtKind::Block(b) if b.len() == 1));

    let out = parse("for (;;) {}");
    let StmtKind::For {
        init, test, update, ..
    } = stmt(&out, out.program.body[0])
    else {
        panic!("expected for");
    };
    assert_eq!((init, test, update), (&None, &None, &None));
}

#[test]
fn if_else_and_loops() {
    let out = parse("if (a) b = 1; else { b = 2; } while (x) {} do { } while (y);");
    assert_eq!(out.program.body.len(), 3);
    assert!(matches!(
        stmt(&out, out.program.body[0]),
        StmtKind::If {
            alternate: Some(_),
            ..
        }
    ));
    assert_eq!(stmt(&out, out.program.body[1]).name(), "WhileStatement");
    assert_eq!(stmt(&out, out.program.body[2]).name(), "DoWhileStatement");
}

#[test]
fn semicolon_insertion() {
    let out = parse("a = 1\nb = 2\n{ c = 3 }");
    assert_eq!(out.program.body.len(), 3);

    let err = parse_program("a = 1 b = 2").unwrap_err();
    assert_eq!(err.message, "expected `;`, found `identifier`");
}

#[test]
fn return_with_newline_has_no_argument() {
    let out = parse("function f() { return\n1; }");
    let StmtKind::FunctionDecl(f) = stmt(&out, out.program.body[0]) else {
        panic!("expected function");
    };
    let body = out.arena.function(*f).body;
    let StmtKind::Block(items) = stmt(&out, body) else {
        panic!("expected block");
    };
    assert_eq!(stmt(&out, items[0]), &StmtKind::Return(None));
    assert_eq!(items.len(), 2);
}

#[test]
fn parenthesized_function_expression() {
    let out = parse("(function (out, a) {\n  out[0] = a.x;\n})");
    let StmtKind::Expr(e) = stmt(&out, out.program.body[0]) else {
        panic!("expected expression statement");
    };
    let ExprKind::Function(f) = out.arena.expr(*e).kind else {
        panic!("expected function expression");
    };
    let function = out.arena.function(f);
    assert_eq!(function.name, None);
    assert_eq!(function.params.len(), 2);
    assert!(matches!(&function.params[0], Param::Ident(n, _) if n == "out"));
}

#[test]
fn default_and_rest_params() {
    let out = parse("function f(a = 1, ...rest) {}");
    let StmtKind::FunctionDecl(f) = stmt(&out, out.program.body[0]) else {
        panic!("expected function");
    };
    let params = &out.arena.function(*f).params;
    assert!(matches!(&params[0], Param::Default { name, .. } if name == "a"));
    assert!(matches!(&params[1], Param::Rest(name, _) if name == "rest"));
}

#[test]
fn error_locations_are_line_and_column() {
    let err = parse_program("let a = 1;\nlet b = ;").unwrap_err();
    assert_eq!(err.to_string(), "expected expression, found `;` at (2, 8)");
}

#[test]
fn lex_errors_surface_as_parse_errors() {
    let err = parse_program("x = @;").unwrap_err();
    assert_eq!(err.to_string(), "unexpected character `@` at (1, 4)");
}

#[test]
fn arrow_functions_rejected() {
    let err = parse_program("f = (x) => x;").unwrap_err();
    assert_eq!(err.message, "arrow functions are not supported");
}

#[test]
fn deeply_nested_expression() {
    let depth = 2_000;
    let source = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(single_expr(&source), "(x = 1)");
}
