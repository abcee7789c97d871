//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into the raw tree the semantic passes work on. It uses a Pratt parser
//! for expressions with operator precedence and handles:
//!
//! - Function declarations with typed parameters
//! - Statements (`let`, `print`, `if`, bare expressions)
//! - Expressions (binary ops, calls, literals, grouping)
//! - Error reporting with source positions
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
