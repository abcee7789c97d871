use crate::errors::errors::Error;

use super::{
    ast::{Ast, NodeId},
    nodes::{BinaryOperator, NodeKind},
};

/// Kind-based dispatch over the tree.
///
/// Every node kind has its own method. The defaults fall back to a broader
/// handler: each operator goes to `visit_arithmetic` or `visit_comparison`,
/// both of those go to `visit_binary_op`, and everything ends up in
/// `visit_node`, which walks the children without doing anything else. A pass
/// overrides the kinds it cares about and inherits the rest.
pub trait Visitor: Sized {
    fn visit(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        dispatch(self, ast, id)
    }

    fn visit_node(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        walk_children(self, ast, id)
    }

    fn visit_module(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_block(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_scope(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_parameter_list(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_argument_list(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_function(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_var_decl(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_variable(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_reference(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_type(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_number(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_assignment(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_call(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_cast(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_if(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_print(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_binary_op(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_node(ast, id)
    }

    fn visit_arithmetic(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_binary_op(ast, id)
    }

    fn visit_comparison(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_binary_op(ast, id)
    }

    fn visit_sum(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_arithmetic(ast, id)
    }

    fn visit_sub(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_arithmetic(ast, id)
    }

    fn visit_mul(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_arithmetic(ast, id)
    }

    fn visit_div(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_arithmetic(ast, id)
    }

    fn visit_mod(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_arithmetic(ast, id)
    }

    fn visit_eq(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_comparison(ast, id)
    }

    fn visit_neq(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_comparison(ast, id)
    }

    fn visit_gt(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_comparison(ast, id)
    }

    fn visit_lt(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_comparison(ast, id)
    }

    fn visit_geq(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_comparison(ast, id)
    }

    fn visit_leq(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
        self.visit_comparison(ast, id)
    }
}

/// Selects the handler for the node's current kind.
pub fn dispatch<V: Visitor>(visitor: &mut V, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
    match ast.kind(id) {
        NodeKind::Module => visitor.visit_module(ast, id),
        NodeKind::Block => visitor.visit_block(ast, id),
        NodeKind::Scope(_) => visitor.visit_scope(ast, id),
        NodeKind::ParameterList => visitor.visit_parameter_list(ast, id),
        NodeKind::ArgumentList => visitor.visit_argument_list(ast, id),
        NodeKind::Function { .. } => visitor.visit_function(ast, id),
        NodeKind::VarDecl { .. } => visitor.visit_var_decl(ast, id),
        NodeKind::Variable { .. } => visitor.visit_variable(ast, id),
        NodeKind::Reference { .. } => visitor.visit_reference(ast, id),
        NodeKind::Type(_) => visitor.visit_type(ast, id),
        NodeKind::Number { .. } => visitor.visit_number(ast, id),
        NodeKind::Assignment => visitor.visit_assignment(ast, id),
        NodeKind::Call => visitor.visit_call(ast, id),
        NodeKind::Cast => visitor.visit_cast(ast, id),
        NodeKind::If => visitor.visit_if(ast, id),
        NodeKind::Print => visitor.visit_print(ast, id),
        NodeKind::BinaryOp(op) => match op {
            BinaryOperator::Sum => visitor.visit_sum(ast, id),
            BinaryOperator::Sub => visitor.visit_sub(ast, id),
            BinaryOperator::Mul => visitor.visit_mul(ast, id),
            BinaryOperator::Div => visitor.visit_div(ast, id),
            BinaryOperator::Mod => visitor.visit_mod(ast, id),
            BinaryOperator::Eq => visitor.visit_eq(ast, id),
            BinaryOperator::Neq => visitor.visit_neq(ast, id),
            BinaryOperator::Gt => visitor.visit_gt(ast, id),
            BinaryOperator::Lt => visitor.visit_lt(ast, id),
            BinaryOperator::Geq => visitor.visit_geq(ast, id),
            BinaryOperator::Leq => visitor.visit_leq(ast, id),
        },
    }
}

/// Visits every child of `id` in order.
///
/// The child list is read up front. A child that an earlier sibling's handler
/// moved under another parent is skipped, since it will be visited there.
pub fn walk_children<V: Visitor>(visitor: &mut V, ast: &mut Ast, id: NodeId) -> Result<(), Error> {
    for child in ast.children(id) {
        if ast.parent(child) == Some(id) {
            visitor.visit(ast, child)?;
        }
    }
    Ok(())
}
