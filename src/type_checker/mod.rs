//! Type checking and semantic analysis module.
//!
//! This module turns the parsed tree into a scoped, resolved and typed one.
//! Each pass is a `Visitor` that rewrites the tree in place:
//!
//! - Scoper: wraps declarations in `Scope` nodes and splits `let`s
//! - PrimitiveTyper: registers the builtin types
//! - Resolver: binds names to declarations and derives reference types
//! - Caster: reclassifies calls to types as casts
//! - TypePropagator: fixes variable types and checks operands
//!
//! The passes that care about scopes keep an explicit path of the scopes
//! they are in, pushed on entry and popped on exit.

pub mod caster;
pub mod primitive_typer;
pub mod resolver;
pub mod scope;
pub mod scoper;
pub mod type_checker;
pub mod type_propagator;
