use log::debug;

use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::{BasicType, NodeKind, TYPE},
        visitor::{walk_children, Visitor},
    },
    errors::errors::Error,
};

/// Registers the builtin types in the outermost scope and gives literals and
/// functions their provisional, still unresolved, type references.
#[derive(Debug, Default)]
pub struct PrimitiveTyper;

impl PrimitiveTyper {
    fn outermost_scope(ast: &Ast, module: NodeId) -> Result<NodeId, Error> {
        ast.children(module)
            .into_iter()
            .find(|child| matches!(ast.kind(*child), NodeKind::Scope(_)))
            .ok_or_else(|| Error::structural("module has no scope, run the scoper first"))
    }

    fn register_builtins(ast: &mut Ast, module: NodeId, scope: NodeId) -> Result<(), Error> {
        let already_registered = BasicType::BUILTINS.iter().all(|basic| {
            ast.resolve(scope, basic.name())
                .is_some_and(|entity| ast.basic_type(entity) == Some(*basic))
        });
        if already_registered {
            debug!("builtin types already registered");
            return Ok(());
        }

        for basic in BasicType::BUILTINS {
            let type_node = ast.create_type(basic);
            ast.register(scope, basic.name(), type_node)?;
            ast.add_child(module, type_node)?;
        }
        // Keep the types ahead of the scope.
        ast.add_child(module, scope)?;

        debug!("registered {} builtin types", BasicType::BUILTINS.len());
        Ok(())
    }

    fn provisional_type(ast: &mut Ast, id: NodeId, basic: BasicType) -> Result<(), Error> {
        if ast.slot(id, TYPE).is_none() {
            let reference = ast.create_reference(basic.name(), ast.node(id).span.clone());
            ast.set_slot(id, TYPE, Some(reference))?;
        }
        Ok(())
    }
}

impl Visitor for PrimitiveTyper {
    fn visit_module(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        let scope = Self::outermost_scope(ast, id)?;
        Self::register_builtins(ast, id, scope)?;
        walk_children(self, ast, id)
    }

    fn visit_number(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        Self::provisional_type(ast, id, BasicType::Int32)
    }

    fn visit_function(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        Self::provisional_type(ast, id, BasicType::Function)?;
        walk_children(self, ast, id)
    }
}
