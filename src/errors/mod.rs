//! Error types and error handling for the compiler.
//!
//! Every stage of the pipeline reports failures through the same `Error`
//! structure: a source position plus an `ErrorImpl` variant. The variants
//! cover:
//!
//! - Lexing and parsing errors
//! - Name lookup failures and duplicate declarations
//! - Type mismatches and operands whose type is not yet known
//! - Structural violations (malformed trees, internal defects)
//! - Backend failures reported by LLVM

pub mod errors;
