use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::Span;

lazy_static! {
    /// Words that lex as keywords instead of identifiers.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> =
        HashMap::from([("let", TokenKind::Let), ("if", TokenKind::If), ("print", TokenKind::Print)]);
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    Identifier,

    // Delimiters
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,
    Semicolon,
    Comma,

    // `=` binds a `let`, the rest compare
    Assignment,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    // Arithmetic
    Plus,
    Dash,
    Star,
    Slash,
    Percent,

    Let,
    If,
    Print,
}

/// A lexeme with its kind. `value` keeps the source text, so errors can
/// quote it back.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}
