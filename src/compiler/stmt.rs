use inkwell::IntPredicate;
use log::trace;

use crate::{
    ast::{
        ast::NodeId,
        nodes::{NodeKind, BODY, LHS, PREDICATE, RHS, THEN},
    },
    errors::errors::Error,
};

use super::{
    compiler::{Compiler, NamedValue},
    expr::{gen_call, gen_expression, gen_place},
    stdlib::gen_print,
};

/// Lowers one function body. A body without statements leaves the function
/// as a declaration.
pub fn gen_function(compiler: &mut Compiler, function: NodeId) -> Result<(), Error> {
    let ast = compiler.ast;
    let body = ast.expect_slot(function, BODY)?;
    if ast.len(body) == 0 {
        trace!("`{}` has no body, keeping the declaration", ast.name(function).unwrap_or_default());
        return Ok(());
    }

    let value = *compiler.functions.get(&function).ok_or_else(|| {
        Error::structural(format!("`{}` was never declared", ast.describe(function)))
    })?;

    let entry = compiler.context.append_basic_block(value, "entry");
    compiler.builder.position_at_end(entry);

    gen_statement(compiler, body)?;

    if !compiler.is_terminated() {
        compiler.builder.build_return(None)?;
    }
    Ok(())
}

pub fn gen_statement(compiler: &mut Compiler, id: NodeId) -> Result<(), Error> {
    let ast = compiler.ast;

    let result = match ast.kind(id) {
        NodeKind::Scope(_) | NodeKind::Block => {
            for statement in ast.children(id) {
                gen_statement(compiler, statement)?;
            }
            Ok(())
        }
        NodeKind::Variable { name } => {
            let ty = compiler.node_type(id)?;
            let slot = compiler.builder.build_alloca(ty, name)?;
            compiler.named_values.insert(id, NamedValue::StackSlot(slot));
            Ok(())
        }
        NodeKind::Assignment => gen_assignment(compiler, id),
        NodeKind::Print => gen_print(compiler, id),
        NodeKind::If => gen_if(compiler, id),
        NodeKind::Call => gen_call(compiler, id).map(|_| ()),
        // Builtin types sit next to the module scope and lower to nothing.
        NodeKind::Type(_) => Ok(()),
        _ => gen_expression(compiler, id).map(|_| ()),
    };

    compiler.at(id, result)
}

fn gen_assignment(compiler: &mut Compiler, id: NodeId) -> Result<(), Error> {
    let ast = compiler.ast;

    let value = gen_expression(compiler, ast.expect_slot(id, RHS)?)?;
    let slot = gen_place(compiler, ast.expect_slot(id, LHS)?)?;

    compiler.builder.build_store(slot, value)?;
    Ok(())
}

/// `if` lowers to a `then` block and a continuation block. A predicate that
/// is not already an `i1` is compared against zero.
fn gen_if(compiler: &mut Compiler, id: NodeId) -> Result<(), Error> {
    let ast = compiler.ast;

    let predicate = gen_expression(compiler, ast.expect_slot(id, PREDICATE)?)?;
    let condition = if predicate.get_type().get_bit_width() == 1 {
        predicate
    } else {
        let zero = predicate.get_type().const_zero();
        compiler.build_unfolded(&[predicate, zero], |builder, operands| {
            builder.build_int_compare(IntPredicate::NE, operands[0], operands[1], "cond")
        })?
    };

    let function = compiler
        .builder
        .get_insert_block()
        .and_then(|block| block.get_parent())
        .ok_or_else(|| Error::structural("`if` outside of a function body"))?;
    let then_block = compiler.context.append_basic_block(function, "then");
    let end_block = compiler.context.append_basic_block(function, "endif");

    compiler
        .builder
        .build_conditional_branch(condition, then_block, end_block)?;

    compiler.builder.position_at_end(then_block);
    gen_statement(compiler, ast.expect_slot(id, THEN)?)?;
    if !compiler.is_terminated() {
        compiler.builder.build_unconditional_branch(end_block)?;
    }

    compiler.builder.position_at_end(end_block);
    Ok(())
}
