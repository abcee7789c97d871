use log::debug;

use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::{BODY, PARAMETERS, VALUE},
        visitor::{walk_children, Visitor},
    },
    errors::errors::Error,
};

use super::scope::{walk_scope, ScopePath, Scoped};

/// Encodes lexical scoping in the shape of the tree.
///
/// The whole module and every function body become `Scope` nodes, and each
/// `let` opens a new scope covering the rest of its block:
///
/// ```text
/// let x = E; S1; S2;   =>   Variable x, Scope { x = E; S1; S2; }
/// ```
#[derive(Debug, Default)]
pub struct Scoper {
    scopes: ScopePath,
}

impl Scoped for Scoper {
    fn scopes(&mut self) -> &mut ScopePath {
        &mut self.scopes
    }
}

impl Visitor for Scoper {
    fn visit_module(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        let span = ast.node(id).span.clone();
        let scope = ast.create_scope(span);
        let declarations = ast.children(id);
        ast.add_children(scope, &declarations)?;
        ast.add_child(id, scope)?;

        debug!("wrapped {} declarations in the module scope", declarations.len());
        self.visit(ast, scope)
    }

    fn visit_scope(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        let parent = self.scopes.current();
        ast.set_parent_scope(id, parent)?;
        walk_scope(self, ast, id)
    }

    fn visit_function(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        let enclosing = self.scopes.expect_current(ast, id)?;
        let name = ast.name(id).unwrap_or_default().to_string();
        ast.register(enclosing, &name, id)?;

        let body = ast.expect_slot(id, BODY)?;
        let span = ast.node(body).span.clone();
        let scope = ast.create_scope(span);
        let statements = ast.children(body);
        ast.add_children(scope, &statements)?;
        ast.replace(body, &[scope])?;

        let parameters = ast.expect_slot(id, PARAMETERS)?;
        for parameter in ast.children(parameters) {
            let parameter_name = ast.name(parameter).unwrap_or_default().to_string();
            ast.register(scope, &parameter_name, parameter)?;
        }

        debug!("scoped function `{}`", name);
        walk_children(self, ast, id)
    }

    fn visit_var_decl(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        let parent = ast.parent(id);
        if !parent.is_some_and(|parent| ast.is_sequence(parent)) {
            return Err(Error::structural(format!(
                "{} must be a statement of a block",
                ast.describe(id)
            ))
            .or_position(ast.position(id)));
        }

        let name = ast.name(id).unwrap_or_default().to_string();
        let span = ast.node(id).span.clone();
        let value = ast.expect_slot(id, VALUE)?;

        let variable = ast.create_variable(name.clone(), span.clone());
        let reference = ast.create_reference(name.clone(), span.clone());
        let assignment = ast.create_assignment(reference, value, span.clone())?;

        let scope = ast.create_scope(span);
        ast.add_child(scope, assignment)?;
        while let Some(next) = ast.next(id) {
            ast.add_child(scope, next)?;
        }
        ast.register(scope, &name, variable)?;

        ast.replace(id, &[variable, scope])?;

        debug!("split declaration of `{}` into a nested scope", name);
        self.visit(ast, scope)
    }
}
