//! Unit tests for the lowering.
//!
//! These compile small programs through the whole front end and assert on
//! the module LLVM prints.

use std::rc::Rc;

use inkwell::context::Context;

use super::compiler::compile;
use crate::{
    errors::errors::Error, lexer::lexer::tokenize, parser::parser::parse,
    type_checker::type_checker::type_check, CompileOptions,
};

fn lower_with(source: &str, options: &CompileOptions) -> Result<String, Error> {
    let tokens = tokenize(source.to_string(), Some("test.lang".to_string()))?;
    let mut ast = parse(tokens, Rc::new("test.lang".to_string()))?;
    type_check(&mut ast)?;

    let context = Context::create();
    let module = compile(&ast, &context, options)?;
    Ok(module.print_to_string().to_string())
}

fn lower(source: &str) -> String {
    lower_with(source, &CompileOptions::default()).unwrap()
}

#[test]
fn test_print_of_sum_keeps_constants() {
    let ir = lower("f() { print(1 + 2); }");

    assert!(ir.starts_with("; ModuleID = 'main'\nsource_filename = \"main\"\n"));
    assert!(ir.contains("@fstr = internal constant [7 x i8] c\"%lld \\0A\\00\"\n"));
    assert!(ir.contains("declare i32 @printf(i8*, ...)\n"));
    assert!(ir.contains(
        "define void @f() {\n\
         entry:\n  \
         %sum = add i32 1, 2\n  \
         %wide = sext i32 %sum to i64\n  \
         %printed = call i32 (i8*, ...) @printf(i8* "
    ));
    assert!(ir.contains("@fstr"));
    assert!(ir.contains(", i64 %wide)\n  ret void\n}\n"));
}

#[test]
fn test_constant_operands_leave_no_scratch() {
    let ir = lower("f() { if 1 < 2 { print(3); } }");

    assert!(ir.contains("  %cmp = icmp slt i32 1, 2\n  %flag = zext i1 %cmp to i32\n"));
    assert!(ir.contains("  %cond = icmp ne i32 %flag, 0\n"));
    assert!(ir.contains("  %wide = sext i32 3 to i64\n"));
    assert!(!ir.contains("alloca"));
    assert!(!ir.contains("load"));
}

#[test]
fn test_widening_cast_sign_extends() {
    let ir = lower("f(int32 x) { print(int64(x)); }");

    assert!(ir.contains("define void @f(i32 %x) {\n"));
    assert!(ir.contains("  %sext = sext i32 %x to i64\n"));
    assert!(ir.contains(", i64 %sext)\n"));
    assert!(!ir.contains("%wide"));
}

#[test]
fn test_narrowing_cast_truncates() {
    let ir = lower("f(int64 x) { print(int8(x)); }");

    assert!(ir.contains("  %trunc = trunc i64 %x to i8\n"));
    assert!(ir.contains("  %wide = sext i8 %trunc to i64\n"));
}

#[test]
fn test_same_width_cast_is_free() {
    let ir = lower("f(int32 x) { print(int32(x)); }");

    assert!(ir.contains("  %wide = sext i32 %x to i64\n"));
    assert!(!ir.contains("trunc"));
}

#[test]
fn test_variables_live_in_stack_slots() {
    let ir = lower("f() { let x = 5; print(x); }");

    assert!(ir.contains(
        "  %x = alloca i32, align 4\n  \
         store i32 5, i32* %x, align 4\n  \
         %x1 = load i32, i32* %x, align 4\n  \
         %wide = sext i32 %x1 to i64\n"
    ));
}

#[test]
fn test_shadowed_variables_get_their_own_slots() {
    let ir = lower("f() { let x = 1; let x = int64(2); print(x); }");

    assert!(ir.contains("  %x = alloca i32, align 4\n  store i32 1, i32* %x, align 4\n"));
    assert!(ir.contains("  %x1 = alloca i64"));
    assert!(ir.contains("  %sext = sext i32 2 to i64\n  store i64 %sext, i64* %x1"));
    assert!(ir.contains("  %x2 = load i64, i64* %x1"));
    assert_eq!(ir.matches("alloca").count(), 2);
}

#[test]
fn test_arithmetic_operators() {
    let ir = lower("f(int16 a, int16 b) { print(a / b % a - b * a); }");

    assert!(ir.contains(
        "  %quot = sdiv i16 %a, %b\n  \
         %rem = srem i16 %quot, %a\n  \
         %prod = mul i16 %b, %a\n  \
         %diff = sub i16 %rem, %prod\n"
    ));
}

#[test]
fn test_comparison_is_widened_to_operand_type() {
    let ir = lower("f(int32 a) { print(a < 3); }");

    assert!(ir.contains("  %cmp = icmp slt i32 %a, 3\n  %flag = zext i1 %cmp to i32\n"));
}

#[test]
fn test_if_branches_to_then_and_continuation() {
    let ir = lower("f(int32 a) { if a { print(a); } print(0); }");

    assert!(ir.contains(
        "  %cond = icmp ne i32 %a, 0\n  \
         br i1 %cond, label %then, label %endif\n"
    ));
    assert!(ir.contains("\nthen:"));
    assert!(ir.contains("  br label %endif\n"));
    assert!(ir.contains("\nendif:"));
    assert!(ir.contains("sext i32 0 to i64\n"));
    assert_eq!(ir.matches("ret void").count(), 1);
    assert!(ir.ends_with("  ret void\n}\n"));
}

#[test]
fn test_empty_body_is_declaration_only() {
    let ir = lower("g(int32 a) { } f() { g(1); }");

    assert!(ir.contains("declare void @g(i32)\n"));
    assert!(!ir.contains("define void @g"));
    assert!(ir.contains("define void @f() {\nentry:\n  call void @g(i32 1)\n  ret void\n}\n"));
}

#[test]
fn test_forward_calls() {
    let ir = lower("f() { g(int64(7)); } g(int64 a) { print(a); }");

    assert!(ir.contains("  %sext = sext i32 7 to i64\n  call void @g(i64 %sext)\n"));
    assert!(ir.contains("define void @g(i64 %a) {\n"));
}

#[test]
fn test_runtime_names_are_reserved() {
    let error = lower_with("printf() { }", &CompileOptions::default()).unwrap_err();
    assert_eq!(error.get_error_name(), "AlreadyDeclared");

    let error = lower_with("fstr() { }", &CompileOptions::default()).unwrap_err();
    assert_eq!(error.get_error_name(), "AlreadyDeclared");
}

#[test]
fn test_target_triple_is_emitted() {
    let options = CompileOptions {
        module_name: String::from("demo"),
        target_triple: Some(String::from("x86_64-unknown-linux-gnu")),
    };
    let ir = lower_with("f() { }", &options).unwrap();

    assert!(ir.starts_with("; ModuleID = 'demo'\nsource_filename = \"demo\"\n"));
    assert!(ir.contains("target triple = \"x86_64-unknown-linux-gnu\"\n"));
    assert!(ir.contains("declare void @f()\n"));
}

#[test]
fn test_untyped_tree_is_rejected() {
    let tokens = tokenize(String::from("f() { print(1); }"), None).unwrap();
    let ast = parse(tokens, Rc::new(String::from("shell"))).unwrap();

    let context = Context::create();
    let error = compile(&ast, &context, &CompileOptions::default()).unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownType");
}
