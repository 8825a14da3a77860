use super::*;
use gpgpu_ir::Loc;
use gpgpu_parse::parse_program;
use pretty_assertions::assert_eq;

/// Generate every top-level statement of `source`, joined by newlines.
fn generate(decls: &mut DeclarationTable, source: &str) -> Result<String, CodegenError> {
    let ast = parse_program(source)?;
    let names = TempNames::new();
    let mut parser = StatementParser::new(&ast, decls, &names);
    let mut out = Vec::new();
    for &stmt in &ast.program.body {
        out.push(parser.parse(stmt)?);
    }
    Ok(out.join("\n"))
}

fn scalars() -> DeclarationTable {
    let mut decls = DeclarationTable::new();
    decls.declare_variable("i", TypeInfo::INT);
    decls.declare_variable("x", TypeInfo::Double);
    decls.declare_variable("out", TypeInfo::array(TypeInfo::Double));
    decls.add_function("h", TypeInfo::Double);
    decls
}

fn loc(line: u32, column: u32) -> Loc {
    Loc { line, column }
}

#[test]
fn block_puts_each_statement_on_its_own_line() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "{ x = 1; x = 2; }").unwrap(),
        "{\nx = 1;\nx = 2;\n}"
    );
}

#[test]
fn declarations_bind_their_types() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "let a = 1, b = this.int(a);").unwrap(),
        "double a = 1;\nint b = (int)(a);"
    );
    assert_eq!(decls.var_type("b"), Ok(&TypeInfo::INT));
}

#[test]
fn declarations_must_initialize() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "let a = 1, b;").unwrap_err(),
        CodegenError::AllDeclarationsMustInitialize { loc: loc(1, 11) }
    );
}

#[test]
fn array_allocation() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "const xs = this.array({ x: 0 }, 16);").unwrap(),
        "GenClass0 xs[16];"
    );
    let TypeInfo::Array { content } = decls.var_type("xs").unwrap() else {
        panic!("expected array binding");
    };
    assert_eq!(content.as_object().map(|o| o.name.as_str()), Some("GenClass0"));

    assert_eq!(
        generate(&mut decls, "const ys = this.array(0, 4);\nys[1] = xs[0].x;").unwrap(),
        "double ys[4];\nys[(size_t)(1)] = xs[(size_t)(0)].x;"
    );
}

#[test]
fn malformed_array_allocation() {
    let mut decls = scalars();
    let reason = |source: &str, decls: &mut DeclarationTable| match generate(decls, source) {
        Err(CodegenError::MalformedArrayDeclaration { reason, .. }) => reason,
        other => panic!("expected malformed array declaration, got {other:?}"),
    };
    assert_eq!(
        reason("const a = this.array(0);", &mut decls),
        "this.array requires exactly 2 arguments"
    );
    assert_eq!(
        reason("const a = this.array(x, 4);", &mut decls),
        "element type must be given by a literal or object expression"
    );
    assert_eq!(
        reason("const a = this.array(0, i);", &mut decls),
        "length must be a non-negative integer literal"
    );
    assert_eq!(
        reason("const a = this.array(0, 2.5);", &mut decls),
        "length must be a non-negative integer literal"
    );
    assert_eq!(
        reason("const a = this.array(true, 2);", &mut decls),
        "elements must be numbers or objects"
    );
}

#[test]
fn ownership_round_trip() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "let p = { x: 1 };").unwrap(),
        "GenClass0 p = (GenClass0){ .x = 1 };"
    );
    assert_eq!(
        generate(&mut decls, "let q = p;").unwrap_err(),
        CodegenError::CannotReassignObject {
            text: "p".into(),
            loc: loc(1, 4)
        }
    );
    assert_eq!(
        generate(&mut decls, "let q = this.copy(p);").unwrap(),
        "GenClass0 q = (GenClass0){ .x = p.x };"
    );
    assert!(matches!(
        generate(&mut decls, "q = p;"),
        Err(CodegenError::CannotReassignObject { .. })
    ));
}

#[test]
fn if_with_and_without_else() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "if (x > 1) x = 1; else x = 2;").unwrap(),
        "if ((x > 1)) x = 1; else x = 2;"
    );
    assert_eq!(
        generate(&mut decls, "if (x) { x = 0; }").unwrap(),
        "if (x) {\nx = 0;\n}"
    );
}

#[test]
fn for_clauses() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "for (let k = 0; k < 10; k++) { out[k] = k; }").unwrap(),
        "for(double k = 0; (k < 10); k++) {\nout[(size_t)(k)] = k;\n}"
    );
    assert_eq!(
        generate(&mut decls, "for (i = 0; i < 3; i = i + 1) x = i;").unwrap(),
        "for(i = 0; (i < 3); i = (i + 1)) x = i;"
    );
    assert_eq!(generate(&mut decls, "for (;;) x = 1;").unwrap(), "for(; ; ) x = 1;");
}

#[test]
fn temporaries_precede_their_statement() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "x = this.h({ x: 1 });").unwrap(),
        "GenClass0 ___builtin_temp_0 = (GenClass0){ .x = 1 };\nx = h(&___builtin_temp_0);"
    );
}

#[test]
fn nested_statements_keep_their_own_temporaries() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "if (x) { x = this.h({ x: 1 }); }").unwrap(),
        "if (x) {\nGenClass0 ___builtin_temp_0 = (GenClass0){ .x = 1 };\nx = h(&___builtin_temp_0);\n}"
    );
}

#[test]
fn for_header_temporaries_are_hoisted_before_the_loop() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "for (let y = this.h({ x: 1 }); y < 1; y++) x = 1;").unwrap(),
        "GenClass0 ___builtin_temp_0 = (GenClass0){ .x = 1 };\n\
         for(double y = h(&___builtin_temp_0); (y < 1); y++) x = 1;"
    );
}

#[test]
fn only_assignments_are_expression_statements() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "this.h(1);").unwrap_err(),
        CodegenError::UnsupportedStatementExpression {
            kind: "CallExpression",
            loc: loc(1, 0)
        }
    );
    assert_eq!(
        generate(&mut decls, "x++;").unwrap_err().to_string(),
        "unsupported expression statement: UpdateExpression at (1, 0)"
    );
}

#[test]
fn return_statements() {
    let mut decls = scalars();
    assert_eq!(generate(&mut decls, "return x * 2;").unwrap(), "return (x * 2);");
    assert_eq!(generate(&mut decls, "return;").unwrap(), "return;");
}

#[test]
fn unsupported_statements() {
    let mut decls = scalars();
    assert_eq!(
        generate(&mut decls, "while (x) x = 1;").unwrap_err(),
        CodegenError::UnsupportedStatement {
            kind: "WhileStatement",
            loc: loc(1, 0)
        }
    );
    assert_eq!(
        generate(&mut decls, "\n;").unwrap_err(),
        CodegenError::UnsupportedStatement {
            kind: "EmptyStatement",
            loc: loc(2, 0)
        }
    );
}
