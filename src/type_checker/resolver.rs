use log::trace;

use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::TYPE,
        visitor::{walk_children, Visitor},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::scope::{walk_scope, ScopePath, Scoped};

/// Binds every reference to the entity its name denotes and derives the
/// reference's type from the target's.
///
/// Bindings are write-once, so a second run only fills in the types that
/// were not known the first time.
#[derive(Debug, Default)]
pub struct Resolver {
    scopes: ScopePath,
}

impl Scoped for Resolver {
    fn scopes(&mut self) -> &mut ScopePath {
        &mut self.scopes
    }
}

/// Gives `reference` the type of its target, one level down. Targets that
/// are types themselves, or whose type is not known yet, are left alone.
pub fn derive_reference_type(ast: &mut Ast, reference: NodeId) -> Result<(), Error> {
    if ast.slot(reference, TYPE).is_some() {
        return Ok(());
    }

    let target = match ast.reference_target(reference) {
        Some(target) if !ast.is_type(target) => target,
        _ => return Ok(()),
    };

    if let Some(type_id) = ast.target_type(target) {
        ast.set_type(reference, type_id)?;
    }
    Ok(())
}

impl Visitor for Resolver {
    fn visit_scope(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        walk_scope(self, ast, id)
    }

    fn visit_reference(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        if ast.reference_target(id).is_none() {
            let scope = self.scopes.expect_current(ast, id)?;
            let name = ast.name(id).unwrap_or_default().to_string();

            let entity = ast
                .resolve(scope, &name)
                .ok_or_else(|| ast.error_at(id, ErrorImpl::LookupFailure { name: name.clone() }))?;
            ast.bind_reference(id, entity)?;

            trace!("resolved `{}` to {}", name, ast.describe(entity));
        }

        walk_children(self, ast, id)?;
        derive_reference_type(ast, id)
    }
}
