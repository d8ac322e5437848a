//! End-to-end type checker tests: source text through the lexer and parser,
//! then checked.

use cascade_checker::TypeChecker;
use cascade_parser::ast::*;
use cascade_parser::{Diagnostic, ErrorCode, Lexer, Parser};
use std::path::PathBuf;
use std::sync::Arc;

fn parse(source: &str) -> Program {
    let mut diagnostics = Vec::new();
    let tokens = Lexer::new(source, "test.cas").lex(&mut diagnostics);
    let program = Parser::new(tokens, Arc::new(PathBuf::from("test.cas")), &mut diagnostics).parse();
    assert!(diagnostics.is_empty(), "parse failed: {diagnostics:?}");
    program
}

fn check(source: &str) -> (Vec<Program>, Vec<Diagnostic>, bool) {
    let mut programs = vec![parse(source)];
    let mut diagnostics = Vec::new();
    let ok = TypeChecker::new(&mut diagnostics).check(&mut programs);
    (programs, diagnostics, ok)
}

fn check_ok(source: &str) -> Vec<Program> {
    let (programs, diagnostics, ok) = check(source);
    assert!(ok, "check failed: {diagnostics:?}");
    assert!(diagnostics.is_empty());
    programs
}

#[test]
fn test_annotated_const() {
    check_ok("const X: i32 = 42;");
}

#[test]
fn test_implied_const_is_filled_in() {
    let programs = check_ok("const X = 42;");

    let Declaration::Const(d) = &programs[0].declarations[0] else {
        panic!("expected const");
    };
    assert!(matches!(&d.ty, Type::Builtin(b) if b.builtin == Builtin::I32));
}

#[test]
fn test_annotation_narrower_than_literal() {
    let (_, diagnostics, ok) = check("const X: i8 = 300;");

    assert!(!ok);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), ErrorCode::MismatchedTypes);
    assert_eq!(diagnostics[0].note(), Some("Expected type 'i8', got type 'i32'"));
}

#[test]
fn test_declaration_types_are_strict() {
    // annotations require exact agreement; promotion applies only at returns
    let (_, diagnostics, ok) = check("const X: i64 = 42;");

    assert!(!ok);
    assert_eq!(diagnostics[0].note(), Some("Expected type 'i64', got type 'i32'"));
}

#[test]
fn test_fn_with_promoted_return() {
    check_ok("fn f(a: i32) i64 { ret a + 1; }");
}

#[test]
fn test_forward_reference_between_globals() {
    let programs = check_ok("const X = Y; const Y = 1;");

    let Declaration::Const(d) = &programs[0].declarations[0] else {
        panic!("expected const");
    };
    assert!(matches!(&d.ty, Type::Builtin(b) if b.builtin == Builtin::I32));
}

#[test]
fn test_self_reference_in_initializer() {
    let (programs, diagnostics, ok) = check("const X = X;");

    assert!(!ok);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), ErrorCode::UsingVariableInInitializer);

    let Declaration::Const(d) = &programs[0].declarations[0] else {
        panic!("expected const");
    };
    assert!(matches!(&d.ty, Type::Error(_)));
}

#[test]
fn test_self_reference_does_not_cascade() {
    // the poisoned X must not re-report where it is used
    let (_, diagnostics, _) = check("const X = X; const Z = X + 1;");
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_indirect_initializer_cycle() {
    let (_, diagnostics, ok) = check("const A = B; const B = A;");

    assert!(!ok);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), ErrorCode::UsingVariableInInitializer);
}

#[test]
fn test_mismatched_binary_operands() {
    let (_, diagnostics, ok) = check("const X = 1 + true;");

    assert!(!ok);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), ErrorCode::MismatchedTypes);
}

#[test]
fn test_binary_mismatch_reports_once() {
    let (_, diagnostics, _) = check("const X = (1 + true) + 2;");
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_binary_promotes_operands() {
    check_ok("fn f(a: i8, b: i64) i64 { ret a + b; }");
}

#[test]
fn test_comparison_yields_bool() {
    check_ok("fn f(a: i32, b: i32) bool { ret a <= b; }");
}

#[test]
fn test_dereference_of_pointer() {
    check_ok("fn f(p: *mut i32) i32 { ret *p; }");
}

#[test]
fn test_dereference_of_non_pointer() {
    let (_, diagnostics, ok) = check("fn f(x: i32) { let y = *x; }");

    assert!(!ok);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].code(),
        ErrorCode::DereferenceRequiresPointerType
    );
}

#[test]
fn test_address_of_adds_pointer() {
    check_ok("fn f(x: i32) *mut i32 { ret @x; }");
}

#[test]
fn test_reference_of_reference_is_rejected() {
    let (_, diagnostics, ok) = check("fn f(x: &i32) { let r = &x; }");

    assert!(!ok);
    assert_eq!(diagnostics[0].code(), ErrorCode::MismatchedTypes);
}

#[test]
fn test_type_alias_resolution() {
    check_ok("type word = u16; fn f(x: word) u16 { ret x; }");
}

#[test]
fn test_call_takes_the_callee_type() {
    check_ok("fn one() i32 { ret 1; } fn f() i32 { ret one(); }");
}

#[test]
fn test_assert_requires_bool() {
    let (_, diagnostics, ok) = check("fn f() { assert 1; }");

    assert!(!ok);
    assert_eq!(diagnostics[0].code(), ErrorCode::MismatchedTypes);
    assert_eq!(diagnostics[0].note(), Some("Expected type 'bool', got type 'i32'"));
}

#[test]
fn test_while_condition_requires_bool() {
    let (_, diagnostics, ok) = check("fn f() { while 1 { } }");

    assert!(!ok);
    assert_eq!(diagnostics[0].code(), ErrorCode::MismatchedTypes);
}

#[test]
fn test_for_in_binds_the_element_type() {
    check_ok("fn f(xs: []i32) { for x in xs { let y: i32 = x; } }");
}

#[test]
fn test_for_in_over_non_array() {
    let (_, diagnostics, ok) = check("fn f(x: i32) { for item in x { } }");

    assert!(!ok);
    assert_eq!(diagnostics[0].code(), ErrorCode::MismatchedTypes);
}

#[test]
fn test_indexing_strips_the_array_modifier() {
    check_ok("fn f(xs: []i32) i32 { ret xs[0]; }");
}

#[test]
fn test_indexing_a_non_array() {
    let (_, diagnostics, ok) = check("fn f(x: i32) { let y = x[0]; }");

    assert!(!ok);
    assert_eq!(diagnostics[0].code(), ErrorCode::MismatchedTypes);
}

#[test]
fn test_if_then_else_expression_type() {
    check_ok("const X: i32 = if true then 1 else 2;");
}

#[test]
fn test_if_branch_types_must_agree() {
    let (_, diagnostics, ok) = check("const X = if true then 1 else false;");

    assert!(!ok);
    assert_eq!(diagnostics[0].code(), ErrorCode::MismatchedTypes);
}

#[test]
fn test_if_condition_requires_bool() {
    let (_, diagnostics, ok) = check("const X = if 1 then 2 else 3;");

    assert!(!ok);
    assert_eq!(diagnostics[0].note(), Some("Expected type 'bool', got type 'i32'"));
}

#[test]
fn test_block_tail_promotes_to_return_type() {
    check_ok("fn f() i64 { 42 }");
}

#[test]
fn test_block_tail_mismatch() {
    let (_, diagnostics, ok) = check("fn f() bool { 42 }");

    assert!(!ok);
    assert_eq!(diagnostics[0].code(), ErrorCode::MismatchedTypes);
}

#[test]
fn test_ret_value_mismatch() {
    let (_, diagnostics, ok) = check("fn f() bool { ret 1; }");

    assert!(!ok);
    assert_eq!(diagnostics[0].note(), Some("Expected type 'bool', got type 'i32'"));
}

#[test]
fn test_char_literal_types_as_i8() {
    check_ok("const C: i8 = 'a';");
}

#[test]
fn test_string_literal_types_as_byte_array() {
    let programs = check_ok("const S = \"hi\";");

    let Declaration::Const(d) = &programs[0].declarations[0] else {
        panic!("expected const");
    };
    let Type::Array(a) = &d.ty else {
        panic!("expected inferred array type, got {:?}", d.ty);
    };
    assert!(matches!(&*a.element, Type::Builtin(b) if b.builtin == Builtin::I8));
}

#[test]
fn test_float_literal_types_as_f64() {
    let (_, diagnostics, ok) = check("const F: f32 = 1.5;");

    // float literals are f64; a narrower annotation does not match
    assert!(!ok);
    assert_eq!(diagnostics[0].note(), Some("Expected type 'f32', got type 'f64'"));
}

#[test]
fn test_array_elements_widen_to_a_common_type() {
    check_ok("fn f() []i32 { ret [1, 2, 3]; }");
}

#[test]
fn test_array_element_mismatch() {
    let (_, diagnostics, ok) = check("const A = [1, true];");

    assert!(!ok);
    assert_eq!(diagnostics[0].code(), ErrorCode::MismatchedTypes);
}

#[test]
fn test_unresolved_names_stay_silent() {
    // imports are parsed but never resolved, so unknown names poison quietly
    let (_, diagnostics, ok) = check("import core::mem; const X = imported_thing;");

    assert!(ok);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_export_is_checked_transparently() {
    let (_, diagnostics, ok) = check("export const X: i8 = 300;");

    assert!(!ok);
    assert_eq!(diagnostics[0].code(), ErrorCode::MismatchedTypes);
}

#[test]
fn test_locals_shadow_globals() {
    check_ok("const X = true; fn f() i32 { let X = 1; ret X; }");
}

#[test]
fn test_checking_twice_is_idempotent() {
    let mut programs = vec![parse("const X = 42; fn f(a: i32) i64 { ret a + 1; }")];

    let mut diagnostics = Vec::new();
    assert!(TypeChecker::new(&mut diagnostics).check(&mut programs));
    assert!(diagnostics.is_empty());

    let after_first = programs.clone();

    let mut diagnostics = Vec::new();
    assert!(TypeChecker::new(&mut diagnostics).check(&mut programs));
    assert!(diagnostics.is_empty());
    assert_eq!(programs, after_first);
}

#[test]
fn test_checker_instance_is_reusable() {
    let mut diagnostics = Vec::new();
    let mut checker = TypeChecker::new(&mut diagnostics);

    let mut first = vec![parse("const X = 1;")];
    assert!(checker.check(&mut first));

    let mut second = vec![parse("const X: bool = 1;")];
    assert!(!checker.check(&mut second));
}
