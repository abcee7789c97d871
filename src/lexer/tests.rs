//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Integer literals
//! - Operators and punctuation
//! - Comments
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};

#[test]
fn test_tokenize_keywords() {
    let source = "let if print".to_string();
    let tokens = tokenize(source, Some("test.lang".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Let);
    assert_eq!(tokens[1].kind, TokenKind::If);
    assert_eq!(tokens[2].kind, TokenKind::Print);
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo int32 _tmp letter printer".to_string();
    let tokens = tokenize(source, Some("test.lang".to_string())).unwrap();

    for token in &tokens[..5] {
        assert_eq!(token.kind, TokenKind::Identifier);
    }
    assert_eq!(tokens[1].value, "int32");
    assert_eq!(tokens[3].value, "letter");
}

#[test]
fn test_tokenize_numbers() {
    let source = "0 42 123456".to_string();
    let tokens = tokenize(source, Some("test.lang".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[1].value, "42");
    assert_eq!(tokens[2].value, "123456");
}

#[test]
fn test_tokenize_operators() {
    let source = "+ - * / % == != < <= > >= =".to_string();
    let tokens = tokenize(source, Some("test.lang".to_string())).unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    let source = "f(int32 x, int64 y) { }".to_string();
    let tokens = tokenize(source, Some("test.lang".to_string())).unwrap();

    assert_eq!(tokens[1].kind, TokenKind::OpenParen);
    assert_eq!(tokens[4].kind, TokenKind::Comma);
    assert_eq!(tokens[7].kind, TokenKind::CloseParen);
    assert_eq!(tokens[8].kind, TokenKind::OpenCurly);
    assert_eq!(tokens[9].kind, TokenKind::CloseCurly);
}

#[test]
fn test_tokenize_comments_and_whitespace() {
    let source = "// a comment\n  print(1); // trailing\n".to_string();
    let tokens = tokenize(source, Some("test.lang".to_string())).unwrap();

    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens[0].kind, TokenKind::Print);
    assert_eq!(tokens[4].kind, TokenKind::Semicolon);
}

#[test]
fn test_token_positions() {
    let source = "let x = 10;".to_string();
    let tokens = tokenize(source, Some("test.lang".to_string())).unwrap();

    assert_eq!(tokens[1].span.start.0, 4);
    assert_eq!(tokens[3].span.start.0, 8);
    assert_eq!(tokens[3].span.end.0, 10);
    assert_eq!(*tokens[3].span.start.1, "test.lang");
}

#[test]
fn test_unrecognised_token() {
    let source = "let x = #;".to_string();
    let error = tokenize(source, Some("test.lang".to_string())).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_default_file_name() {
    let tokens = tokenize("1".to_string(), None).unwrap();
    assert_eq!(*tokens[0].span.start.1, "shell");
}
