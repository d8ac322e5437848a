//! Tests for statement parsing.

use cascade_parser::ast::*;
use cascade_parser::{Diagnostic, ErrorCode, Lexer, Parser};
use std::path::PathBuf;
use std::sync::Arc;

fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let tokens = Lexer::new(source, "test.cas").lex(&mut diagnostics);
    let program = Parser::new(tokens, Arc::new(PathBuf::from("test.cas")), &mut diagnostics).parse();
    (program, diagnostics)
}

/// Parse `fn test() { <source> }` and hand back the body's statements.
fn parse_body(source: &str) -> Vec<Statement> {
    let (program, diagnostics) = parse(&format!("fn test() {{ {source} }}"));
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");

    match program.declarations.into_iter().next() {
        Some(Declaration::Fn(f)) => match f.body {
            Expression::Block(block) => block.statements,
            other => panic!("expected block body, got {other:?}"),
        },
        other => panic!("expected fn declaration, got {other:?}"),
    }
}

#[test]
fn test_let_with_annotation() {
    let statements = parse_body("let x: i32 = 1;");

    let Statement::Let(s) = &statements[0] else {
        panic!("expected let");
    };

    assert_eq!(s.name, "x");
    assert!(matches!(
        &s.ty,
        Type::Builtin(b) if b.builtin == Builtin::I32
    ));
}

#[test]
fn test_let_without_annotation_is_implied() {
    let statements = parse_body("let x = 1;");

    let Statement::Let(s) = &statements[0] else {
        panic!("expected let");
    };
    assert!(s.ty.is_implied());
}

#[test]
fn test_mut_binding() {
    let statements = parse_body("mut counter = 0;");
    assert!(matches!(&statements[0], Statement::Mut(s) if s.name == "counter"));
}

#[test]
fn test_ret_with_and_without_value() {
    let statements = parse_body("ret 1;");
    assert!(matches!(&statements[0], Statement::Ret(s) if s.value.is_some()));

    let statements = parse_body("ret;");
    assert!(matches!(&statements[0], Statement::Ret(s) if s.value.is_none()));
}

#[test]
fn test_unconditional_loop() {
    let statements = parse_body("loop { break; }");

    let Statement::Loop(s) = &statements[0] else {
        panic!("expected loop");
    };
    assert!(matches!(s.kind, LoopKind::Forever));
}

#[test]
fn test_while_loop() {
    let statements = parse_body("while running { work(); }");

    let Statement::Loop(s) = &statements[0] else {
        panic!("expected loop");
    };
    assert!(matches!(
        &s.kind,
        LoopKind::While(Expression::Identifier(id)) if id.name == "running"
    ));
}

#[test]
fn test_for_in_loop() {
    let statements = parse_body("for item in items { use_item(item); }");

    let Statement::Loop(s) = &statements[0] else {
        panic!("expected loop");
    };

    match &s.kind {
        LoopKind::ForIn { binding, iterable } => {
            assert_eq!(binding, "item");
            assert!(matches!(iterable, Expression::Identifier(id) if id.name == "items"));
        }
        other => panic!("expected for-in, got {other:?}"),
    }
}

#[test]
fn test_break_and_continue() {
    let statements = parse_body("loop { break; } loop { continue; }");

    for statement in &statements {
        let Statement::Loop(s) = statement else {
            panic!("expected loop");
        };
        let Expression::Block(block) = &s.body else {
            panic!("expected block body");
        };
        assert!(matches!(
            &block.statements[0],
            Statement::Break(_) | Statement::Continue(_)
        ));
    }
}

#[test]
fn test_assert() {
    let statements = parse_body("assert x == 1;");
    assert!(matches!(
        &statements[0],
        Statement::Assert(s) if matches!(&s.condition, Expression::Binary(_))
    ));
}

#[test]
fn test_expression_statement() {
    let statements = parse_body("f(1);");
    assert!(matches!(
        &statements[0],
        Statement::Expression(s) if matches!(&s.expression, Expression::Call(_))
    ));
}

#[test]
fn test_missing_semicolon_is_reported() {
    let (_, diagnostics) = parse("fn test() { let x = 1 let y = 2; }");
    assert!(diagnostics.iter().any(|d| d.code() == ErrorCode::ExpectedSemi));
}

#[test]
fn test_statement_spans_run_keyword_to_semicolon() {
    let statements = parse_body("let x = 1;");
    let span = statements[0].span();

    // "fn test() { " is 12 bytes
    assert_eq!(span.position(), 12);
    assert_eq!(span.length(), "let x = 1;".len());
}
