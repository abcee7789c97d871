use log::trace;

use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::{
            NodeKind, ValueCategory, ARGUMENTS, CALLEE, LEFT, LHS, PARAMETERS, PREDICATE, RHS, RIGHT,
            TARGET, TYPE, VALUE,
        },
        visitor::{walk_children, Visitor},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::resolver::derive_reference_type;

/// Fixes variable types from their first assignment and checks that every
/// operation sees operands of one known integer type.
///
/// There is no implicit widening: `1 + int64(1)` is rejected until both
/// sides agree.
#[derive(Debug, Default)]
pub struct TypePropagator;

/// The concrete type of an expression, or `UnknownType` when it has none yet.
fn known_type(ast: &Ast, id: NodeId) -> Result<NodeId, Error> {
    ast.target_type(id).ok_or_else(|| {
        ast.error_at(
            id,
            ErrorImpl::UnknownType {
                node: ast.describe(id),
            },
        )
    })
}

/// Functions and types can be named where a value is expected, but they
/// have none.
fn expect_value(ast: &Ast, id: NodeId) -> Result<(), Error> {
    match ast.reference_target(id) {
        Some(target) if matches!(ast.kind(target), NodeKind::Function { .. } | NodeKind::Type(_)) => {
            Err(ast.error_at(
                id,
                ErrorImpl::TypeMismatch {
                    expected: String::from("a value"),
                    received: ast.describe(target),
                },
            ))
        }
        _ => Ok(()),
    }
}

/// Like `known_type`, but the type must also be an integer.
fn integer_type(ast: &Ast, id: NodeId) -> Result<NodeId, Error> {
    expect_value(ast, id)?;
    let type_id = known_type(ast, id)?;
    let is_integer = ast.basic_type(type_id).is_some_and(|basic| basic.is_integer());
    if !is_integer {
        return Err(ast.error_at(
            id,
            ErrorImpl::TypeMismatch {
                expected: String::from("an integer type"),
                received: ast.type_name(type_id),
            },
        ));
    }
    Ok(type_id)
}

/// The declared type of a parameter, which must name an integer type.
fn parameter_type(ast: &Ast, parameter: NodeId) -> Result<NodeId, Error> {
    let declared = ast
        .slot(parameter, TYPE)
        .and_then(|type_ref| ast.reference_target(type_ref));

    match declared {
        Some(type_id) if ast.basic_type(type_id).is_some_and(|basic| basic.is_integer()) => Ok(type_id),
        Some(other) => Err(ast.error_at(
            parameter,
            ErrorImpl::TypeMismatch {
                expected: String::from("an integer type"),
                received: ast.describe(other),
            },
        )),
        None => known_type(ast, parameter),
    }
}

fn expect_same_type(ast: &Ast, at: NodeId, expected: NodeId, received: NodeId) -> Result<(), Error> {
    if expected != received {
        return Err(ast.error_at(
            at,
            ErrorImpl::TypeMismatch {
                expected: ast.type_name(expected),
                received: ast.type_name(received),
            },
        ));
    }
    Ok(())
}

impl Visitor for TypePropagator {
    fn visit_reference(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        walk_children(self, ast, id)?;
        derive_reference_type(ast, id)?;

        // A reference standing alone as a statement is evaluated for its value.
        let is_statement = ast
            .parent(id)
            .is_some_and(|parent| matches!(ast.kind(parent), NodeKind::Scope(_) | NodeKind::Block));
        if is_statement {
            expect_value(ast, id)?;
        }
        Ok(())
    }

    fn visit_function(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        for parameter in ast.children(ast.expect_slot(id, PARAMETERS)?) {
            parameter_type(ast, parameter)?;
        }
        walk_children(self, ast, id)
    }

    fn visit_assignment(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        walk_children(self, ast, id)?;

        let lhs = ast.expect_slot(id, LHS)?;
        let rhs = ast.expect_slot(id, RHS)?;
        let target = ast.reference_target(lhs).ok_or_else(|| {
            Error::structural(format!("left side of an assignment must be a bound reference, found {}", ast.describe(lhs)))
                .or_position(ast.position(id))
        })?;
        ast.set_category(lhs, ValueCategory::Place)?;

        let rhs_type = integer_type(ast, rhs)?;
        let lhs_type = match ast.target_type(target) {
            Some(lhs_type) => {
                expect_same_type(ast, id, lhs_type, rhs_type)?;
                lhs_type
            }
            None => {
                trace!("`{}` takes its type from its first assignment", ast.describe(target));
                ast.set_type(target, rhs_type)?;
                rhs_type
            }
        };

        ast.set_type(lhs, lhs_type)?;
        ast.set_type(id, lhs_type)
    }

    fn visit_binary_op(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        walk_children(self, ast, id)?;

        let left = ast.expect_slot(id, LEFT)?;
        let right = ast.expect_slot(id, RIGHT)?;
        let left_type = integer_type(ast, left)?;
        let right_type = integer_type(ast, right)?;
        expect_same_type(ast, id, left_type, right_type)?;

        ast.set_type(id, left_type)
    }

    fn visit_cast(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        walk_children(self, ast, id)?;

        let value = ast.expect_slot(id, VALUE)?;
        integer_type(ast, value)?;

        let target = ast.expect_slot(id, TARGET)?;
        let target_type = ast
            .reference_target(target)
            .filter(|target| ast.basic_type(*target).is_some_and(|basic| basic.is_integer()))
            .ok_or_else(|| {
                ast.error_at(
                    id,
                    ErrorImpl::TypeMismatch {
                        expected: String::from("an integer type"),
                        received: ast.describe(target),
                    },
                )
            })?;

        ast.set_type(id, target_type)
    }

    fn visit_call(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        walk_children(self, ast, id)?;

        let callee = ast.expect_slot(id, CALLEE)?;
        let function = ast
            .reference_target(callee)
            .filter(|target| matches!(ast.kind(*target), NodeKind::Function { .. }))
            .ok_or_else(|| {
                ast.error_at(
                    id,
                    ErrorImpl::TypeMismatch {
                        expected: String::from("fn()"),
                        received: ast.describe(callee),
                    },
                )
            })?;

        let parameters = ast.children(ast.expect_slot(function, PARAMETERS)?);
        let arguments = ast.children(ast.expect_slot(id, ARGUMENTS)?);
        if parameters.len() != arguments.len() {
            return Err(ast.error_at(
                id,
                ErrorImpl::ArgumentCountMismatch {
                    expected: parameters.len(),
                    received: arguments.len(),
                },
            ));
        }

        for (parameter, argument) in parameters.into_iter().zip(arguments) {
            let expected = parameter_type(ast, parameter)?;
            let received = integer_type(ast, argument)?;
            expect_same_type(ast, argument, expected, received)?;
        }

        Ok(())
    }

    fn visit_print(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        walk_children(self, ast, id)?;
        integer_type(ast, ast.expect_slot(id, VALUE)?)?;
        Ok(())
    }

    fn visit_if(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        walk_children(self, ast, id)?;
        integer_type(ast, ast.expect_slot(id, PREDICATE)?)?;
        Ok(())
    }
}
