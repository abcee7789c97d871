//! Code generation module for the compiler.
//!
//! This module lowers the typed tree into an LLVM module in two phases:
//!
//! - Global: every function is declared with its parameter types, the
//!   parameters are bound, and the runtime (`printf` plus its format string)
//!   is declared
//! - Local: each function body with statements is lowered into basic blocks
//!
//! The finished module is checked with LLVM's verifier before it is returned.
//!
//! The lowering trusts the semantic passes: it reads types and bindings off
//! the tree and reports a `StructuralViolation` if they are missing.

pub mod compiler;
pub mod expr;
pub mod global;
pub mod stdlib;
pub mod stmt;

#[cfg(test)]
mod tests;
