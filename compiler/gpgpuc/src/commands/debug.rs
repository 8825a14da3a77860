//! Debug commands: `lex` and `parse` for inspecting the front end.

use gpgpu_ir::LineIndex;
use gpgpu_parse::{parse_program, ParseError};

use super::read_file;
use crate::DriverError;

/// Lex a file and display the token stream.
pub fn lex_file(path: &str) -> Result<(), DriverError> {
    let content = read_file(path)?;
    let lines = LineIndex::new(&content);
    let tokens = gpgpu_lexer::lex(&content).map_err(|e| ParseError::from_lex(&e, &lines))?;

    println!("Tokens for '{}' ({} tokens):", path, tokens.len());
    for token in &tokens {
        println!("  {:?} @ {}", token.kind, token.span);
    }
    Ok(())
}

/// Parse a file and display AST counts.
pub fn parse_file(path: &str) -> Result<(), DriverError> {
    let content = read_file(path)?;
    let output = parse_program(&content)?;

    println!("Parse result for '{path}':");
    println!("  Statements: {}", output.program.body.len());
    println!("  Expressions: {}", output.arena.expr_count());
    println!("  Lines: {}", output.lines.line_count());
    Ok(())
}
