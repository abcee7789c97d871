use log::trace;

use crate::{
    ast::{
        ast::{Ast, NodeId},
        visitor::{walk_children, Visitor},
    },
    errors::errors::Error,
};

/// The scopes enclosing the node being visited, outermost first.
#[derive(Debug, Default)]
pub struct ScopePath {
    path: Vec<NodeId>,
}

impl ScopePath {
    pub fn push(&mut self, scope: NodeId) {
        self.path.push(scope);
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.path.pop()
    }

    pub fn current(&self) -> Option<NodeId> {
        self.path.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The innermost scope; being outside any scope is a malformed tree.
    pub fn expect_current(&self, ast: &Ast, id: NodeId) -> Result<NodeId, Error> {
        self.current().ok_or_else(|| {
            Error::structural(format!("{} is not inside any scope", ast.describe(id)))
                .or_position(ast.position(id))
        })
    }
}

/// Passes that track the scope they are in.
pub trait Scoped: Visitor {
    fn scopes(&mut self) -> &mut ScopePath;
}

/// Visits the children of `scope` with `scope` as the current scope. The
/// scope is popped again whether or not the subtree succeeded.
pub fn walk_scope<V: Scoped>(visitor: &mut V, ast: &mut Ast, scope: NodeId) -> Result<(), Error> {
    visitor.scopes().push(scope);
    trace!("entering scope at depth {}", visitor.scopes().depth());

    let result = walk_children(visitor, ast, scope);

    visitor.scopes().pop();
    result
}
