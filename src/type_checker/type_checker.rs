use log::{debug, trace};

use crate::{
    ast::{ast::Ast, printer::dump, visitor::Visitor},
    errors::errors::Error,
};

use super::{
    caster::Caster, primitive_typer::PrimitiveTyper, resolver::Resolver, scoper::Scoper,
    type_propagator::TypePropagator,
};

/// Runs the semantic passes over a freshly parsed tree, in place.
///
/// Stops at the first error. On success every reference is bound, every
/// expression that produces a value has a concrete type, and no `VarDecl`
/// is left in the tree.
pub fn type_check(ast: &mut Ast) -> Result<(), Error> {
    let root = ast.root();

    debug!("running scoper");
    Scoper::default().visit(ast, root)?;

    debug!("running primitive typer");
    PrimitiveTyper.visit(ast, root)?;
    trace!("tree before resolution:\n{}", dump(ast, root));

    debug!("running resolver");
    Resolver::default().visit(ast, root)?;

    debug!("running caster");
    Caster.visit(ast, root)?;

    debug!("running type propagator");
    TypePropagator.visit(ast, root)?;

    debug!("running resolver again");
    Resolver::default().visit(ast, root)?;
    trace!("typed tree:\n{}", dump(ast, root));

    Ok(())
}
