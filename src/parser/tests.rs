//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs including:
//! - Function declarations and parameters
//! - Variable declarations
//! - Expressions and precedence
//! - Control flow and print statements
//! - Syntax errors

use std::rc::Rc;

use super::parser::parse;
use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::{BinaryOperator, NodeKind, ARGUMENTS, BODY, CALLEE, LEFT, PARAMETERS, PREDICATE, RIGHT, THEN, TYPE, VALUE},
    },
    errors::errors::Error,
    lexer::lexer::tokenize,
};

fn parse_source(source: &str) -> Result<Ast, Error> {
    let tokens = tokenize(source.to_string(), Some("test.lang".to_string())).unwrap();
    parse(tokens, Rc::new("test.lang".to_string()))
}

/// Statements of the first function's body.
fn body_of_first(ast: &Ast) -> Vec<NodeId> {
    let function = ast.children(ast.root())[0];
    let body = ast.slot(function, BODY).unwrap();
    ast.children(body)
}

fn binary_op(ast: &Ast, id: NodeId) -> BinaryOperator {
    match ast.kind(id) {
        NodeKind::BinaryOp(op) => *op,
        other => panic!("expected a binary operator, found {:?}", other),
    }
}

#[test]
fn test_parse_empty_program() {
    let ast = parse_source("").unwrap();
    assert_eq!(ast.len(ast.root()), 0);
}

#[test]
fn test_parse_function_declaration() {
    let ast = parse_source("f() { } g(int32 a, int64 b) { print(a); }").unwrap();

    let functions = ast.children(ast.root());
    assert_eq!(functions.len(), 2);
    assert_eq!(ast.name(functions[0]), Some("f"));
    assert_eq!(ast.name(functions[1]), Some("g"));

    let parameters = ast.children(ast.slot(functions[1], PARAMETERS).unwrap());
    assert_eq!(parameters.len(), 2);
    assert_eq!(ast.name(parameters[0]), Some("a"));
    let type_ref = ast.slot(parameters[1], TYPE).unwrap();
    assert_eq!(ast.name(type_ref), Some("int64"));
    assert_eq!(ast.reference_target(type_ref), None);
}

#[test]
fn test_parse_variable_declaration() {
    let ast = parse_source("f() { let x = 42; }").unwrap();

    let statements = body_of_first(&ast);
    assert!(matches!(ast.kind(statements[0]), NodeKind::VarDecl { name } if name == "x"));
    let value = ast.slot(statements[0], VALUE).unwrap();
    assert!(matches!(ast.kind(value), NodeKind::Number { value: 42 }));
}

#[test]
fn test_parse_binary_precedence() {
    let ast = parse_source("f() { 5 + 3 * 2; }").unwrap();

    let sum = body_of_first(&ast)[0];
    assert_eq!(binary_op(&ast, sum), BinaryOperator::Sum);
    let product = ast.slot(sum, RIGHT).unwrap();
    assert_eq!(binary_op(&ast, product), BinaryOperator::Mul);
}

#[test]
fn test_parse_comparison_binds_tighter_than_sum() {
    let ast = parse_source("f() { a + b == c; }").unwrap();

    let sum = body_of_first(&ast)[0];
    assert_eq!(binary_op(&ast, sum), BinaryOperator::Sum);
    let comparison = ast.slot(sum, RIGHT).unwrap();
    assert_eq!(binary_op(&ast, comparison), BinaryOperator::Eq);
}

#[test]
fn test_parse_left_associative() {
    let ast = parse_source("f() { 1 - 2 - 3; }").unwrap();

    let outer = body_of_first(&ast)[0];
    let inner = ast.slot(outer, LEFT).unwrap();
    assert_eq!(binary_op(&ast, inner), BinaryOperator::Sub);
    assert!(matches!(ast.kind(ast.slot(outer, RIGHT).unwrap()), NodeKind::Number { value: 3 }));
}

#[test]
fn test_parse_parenthesized_expression() {
    let ast = parse_source("f() { (5 + 3) * 2; }").unwrap();

    let product = body_of_first(&ast)[0];
    assert_eq!(binary_op(&ast, product), BinaryOperator::Mul);
    assert_eq!(binary_op(&ast, ast.slot(product, LEFT).unwrap()), BinaryOperator::Sum);
}

#[test]
fn test_parse_call() {
    let ast = parse_source("f() { g(1, x + 1); int64(2); }").unwrap();

    let statements = body_of_first(&ast);
    let call = statements[0];
    assert!(matches!(ast.kind(call), NodeKind::Call));
    assert_eq!(ast.name(ast.slot(call, CALLEE).unwrap()), Some("g"));
    assert_eq!(ast.len(ast.slot(call, ARGUMENTS).unwrap()), 2);

    let cast_shaped = statements[1];
    assert!(matches!(ast.kind(cast_shaped), NodeKind::Call));
}

#[test]
fn test_parse_if_and_print() {
    let ast = parse_source("f(int32 x) { if x > 0 { print(x); print(1); } }").unwrap();

    let node = body_of_first(&ast)[0];
    assert!(matches!(ast.kind(node), NodeKind::If));
    assert_eq!(binary_op(&ast, ast.slot(node, PREDICATE).unwrap()), BinaryOperator::Gt);
    let then = ast.slot(node, THEN).unwrap();
    assert_eq!(ast.len(then), 2);
    assert!(matches!(ast.kind(ast.children(then)[0]), NodeKind::Print));
}

#[test]
fn test_parse_spans() {
    let ast = parse_source("f() {\n  print(1 + 2);\n}").unwrap();

    let print = body_of_first(&ast)[0];
    let sum = ast.slot(print, VALUE).unwrap();
    assert_eq!(ast.position(print).unwrap().0, 8);
    assert_eq!(ast.position(sum).unwrap().0, 14);
    assert_eq!(ast.node(sum).span.as_ref().unwrap().end.0, 19);
}

#[test]
fn test_parse_syntax_error_missing_semicolon() {
    let error = parse_source("f() { let x = 42 }").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_parse_syntax_error_missing_identifier() {
    let error = parse_source("f() { let = 42; }").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_unclosed_block() {
    let error = parse_source("f() { print(1);").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_statement_at_top_level() {
    let error = parse_source("print(1);").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_number_too_large() {
    let error = parse_source("f() { print(99999999999999999999); }").unwrap_err();
    assert_eq!(error.get_error_name(), "NumberParseError");
}
