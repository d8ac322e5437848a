//! Tests for type annotation parsing.

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

/// Parse `const x: <source> = 0;` and hand back the annotation.
fn parse_type(source: &str) -> Type {
    let (program, diagnostics) = parse(&format!("const x: {source} = 0;"));
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");

    match program.declarations.into_iter().next() {
        Some(Declaration::Const(d)) => d.ty,
        other => panic!("expected const, got {other:?}"),
    }
}

#[test]
fn test_every_builtin_word() {
    for (source, expected) in [
        ("bool", Builtin::Bool),
        ("i8", Builtin::I8),
        ("i16", Builtin::I16),
        ("i32", Builtin::I32),
        ("i64", Builtin::I64),
        ("u8", Builtin::U8),
        ("u16", Builtin::U16),
        ("u32", Builtin::U32),
        ("u64", Builtin::U64),
        ("f32", Builtin::F32),
        ("f64", Builtin::F64),
    ] {
        match parse_type(source) {
            Type::Builtin(b) => assert_eq!(b.builtin, expected, "for {source}"),
            other => panic!("expected builtin for {source}, got {other:?}"),
        }
    }
}

#[test]
fn test_near_miss_names_are_user_defined() {
    for source in ["i12", "u7", "f16", "int"] {
        match parse_type(source) {
            Type::UserDefined(u) => assert_eq!(u.name, source),
            other => panic!("expected user-defined for {source}, got {other:?}"),
        }
    }
}

#[test]
fn test_pointer_types() {
    let Type::Pointer(p) = parse_type("*i32") else {
        panic!("expected pointer");
    };
    assert!(!p.mutable);
    assert!(matches!(&*p.pointee, Type::Builtin(b) if b.builtin == Builtin::I32));

    let Type::Pointer(p) = parse_type("*mut i32") else {
        panic!("expected pointer");
    };
    assert!(p.mutable);
}

#[test]
fn test_reference_types() {
    let Type::Reference(r) = parse_type("&bool") else {
        panic!("expected reference");
    };
    assert!(!r.mutable);

    let Type::Reference(r) = parse_type("&mut bool") else {
        panic!("expected reference");
    };
    assert!(r.mutable);
}

#[test]
fn test_array_types() {
    let Type::Array(a) = parse_type("[]u8") else {
        panic!("expected array");
    };
    assert_eq!(a.length, None);

    let Type::Array(a) = parse_type("[16]u8") else {
        panic!("expected array");
    };
    assert_eq!(a.length, Some(16));
}

#[test]
fn test_modifiers_nest_outside_in() {
    // &mut *[]point
    let Type::Reference(r) = parse_type("&mut *[]point") else {
        panic!("expected reference");
    };
    assert!(r.mutable);

    let Type::Pointer(p) = &*r.referent else {
        panic!("expected pointer under the reference");
    };

    let Type::Array(a) = &*p.pointee else {
        panic!("expected array under the pointer");
    };

    assert!(matches!(&*a.element, Type::UserDefined(u) if u.name == "point"));
}

#[test]
fn test_references_may_not_nest() {
    let (_, diagnostics) = parse("const x: &&i32 = 0;");
    assert!(diagnostics.iter().any(|d| d.code() == ErrorCode::ExpectedType));
}

#[test]
fn test_pointers_may_nest() {
    let Type::Pointer(outer) = parse_type("**i32") else {
        panic!("expected pointer");
    };
    assert!(matches!(&*outer.pointee, Type::Pointer(_)));
}

#[test]
fn test_missing_type_after_colon() {
    let (_, diagnostics) = parse("const x: = 1;");
    assert!(diagnostics.iter().any(|d| d.code() == ErrorCode::ExpectedType));
}
