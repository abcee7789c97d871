use log::{debug, warn};

use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::{ARGUMENTS, CALLEE},
        visitor::{walk_children, Visitor},
    },
    errors::errors::Error,
};

/// Turns calls whose callee names a type into casts: `int64(x)` is a
/// conversion of `x`, not an invocation.
#[derive(Debug, Default)]
pub struct Caster;

impl Visitor for Caster {
    fn visit_call(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        walk_children(self, ast, id)?;

        let callee = ast.expect_slot(id, CALLEE)?;
        let names_a_type = ast
            .reference_target(callee)
            .is_some_and(|target| ast.is_type(target));
        if !names_a_type {
            return Ok(());
        }

        let arguments = ast.children(ast.expect_slot(id, ARGUMENTS)?);
        let value = match arguments.first() {
            Some(value) => *value,
            None => {
                return Err(Error::structural(format!(
                    "cast to `{}` needs an operand",
                    ast.name(callee).unwrap_or_default()
                ))
                .or_position(ast.position(id)))
            }
        };
        if arguments.len() > 1 {
            warn!(
                "cast to `{}` takes one operand, ignoring {} extra",
                ast.name(callee).unwrap_or_default(),
                arguments.len() - 1
            );
        }

        let span = ast.node(id).span.clone();
        let cast = ast.create_cast(callee, value, span)?;
        ast.replace(id, &[cast])?;

        debug!("call to `{}` is a cast", ast.name(callee).unwrap_or_default());
        Ok(())
    }
}
