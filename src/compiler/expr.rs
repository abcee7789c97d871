use inkwell::{
    values::{BasicMetadataValueEnum, IntValue, PointerValue},
    IntPredicate,
};

use crate::{
    ast::{
        ast::NodeId,
        nodes::{BinaryOperator, NodeKind, ValueCategory, ARGUMENTS, CALLEE, LEFT, RIGHT, VALUE},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::compiler::{Compiler, NamedValue};

/// Generates the LLVM IR for an expression and returns the value it produces.
pub fn gen_expression<'ctx>(compiler: &mut Compiler<'_, 'ctx>, id: NodeId) -> Result<IntValue<'ctx>, Error> {
    let ast = compiler.ast;

    let result = match ast.kind(id) {
        NodeKind::Number { value } => {
            let ty = compiler.node_type(id)?;
            Ok(ty.const_int(*value as u64, true))
        }
        NodeKind::Reference { .. } => gen_reference(compiler, id),
        NodeKind::BinaryOp(op) => gen_binary(compiler, id, *op),
        NodeKind::Cast => gen_cast(compiler, id),
        NodeKind::Call => gen_call(compiler, id)?.ok_or_else(|| {
            ast.error_at(
                id,
                ErrorImpl::UnknownType {
                    node: ast.describe(id),
                },
            )
        }),
        _ => Err(Error::structural(format!(
            "{} is not an expression",
            ast.describe(id)
        ))),
    };

    compiler.at(id, result)
}

/// The value a `Value` reference reads: a parameter as is, a variable loaded
/// from its slot.
fn gen_reference<'ctx>(compiler: &mut Compiler<'_, 'ctx>, id: NodeId) -> Result<IntValue<'ctx>, Error> {
    let ast = compiler.ast;

    let target = ast
        .reference_target(id)
        .ok_or_else(|| Error::structural(format!("{} is unbound", ast.describe(id))))?;
    let name = ast.name(id).unwrap_or_default();

    match (compiler.named_values.get(&target).copied(), ast.category(id).unwrap_or_default()) {
        (Some(NamedValue::Parameter(value)), ValueCategory::Value) => Ok(value),
        (Some(NamedValue::StackSlot(slot)), ValueCategory::Value) => {
            Ok(compiler.builder.build_load(slot, name)?.into_int_value())
        }
        (Some(_), ValueCategory::Place) => Err(Error::structural(format!(
            "`{}` is assigned to, not read",
            name
        ))),
        (None, _) => Err(Error::structural(format!(
            "{} has no value",
            ast.describe(target)
        ))),
    }
}

/// The stack slot a `Place` reference writes to.
pub fn gen_place<'ctx>(compiler: &mut Compiler<'_, 'ctx>, id: NodeId) -> Result<PointerValue<'ctx>, Error> {
    let ast = compiler.ast;

    let target = ast
        .reference_target(id)
        .ok_or_else(|| Error::structural(format!("{} is unbound", ast.describe(id))))?;
    let name = ast.name(id).unwrap_or_default();

    let result = match compiler.named_values.get(&target) {
        Some(NamedValue::StackSlot(slot)) => Ok(*slot),
        Some(NamedValue::Parameter(_)) => Err(Error::structural(format!(
            "parameter `{}` cannot be assigned",
            name
        ))),
        None => Err(Error::structural(format!(
            "{} has no slot",
            ast.describe(target)
        ))),
    };

    compiler.at(id, result)
}

fn gen_binary<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    id: NodeId,
    op: BinaryOperator,
) -> Result<IntValue<'ctx>, Error> {
    let ast = compiler.ast;

    let lhs = gen_expression(compiler, ast.expect_slot(id, LEFT)?)?;
    let rhs = gen_expression(compiler, ast.expect_slot(id, RIGHT)?)?;
    let operands = [lhs, rhs];

    let predicate = match op {
        BinaryOperator::Sum => {
            return compiler.build_unfolded(&operands, |builder, o| builder.build_int_add(o[0], o[1], "sum"))
        }
        BinaryOperator::Sub => {
            return compiler.build_unfolded(&operands, |builder, o| builder.build_int_sub(o[0], o[1], "diff"))
        }
        BinaryOperator::Mul => {
            return compiler.build_unfolded(&operands, |builder, o| builder.build_int_mul(o[0], o[1], "prod"))
        }
        BinaryOperator::Div => {
            return compiler
                .build_unfolded(&operands, |builder, o| builder.build_int_signed_div(o[0], o[1], "quot"))
        }
        BinaryOperator::Mod => {
            return compiler
                .build_unfolded(&operands, |builder, o| builder.build_int_signed_rem(o[0], o[1], "rem"))
        }
        BinaryOperator::Eq => IntPredicate::EQ,
        BinaryOperator::Neq => IntPredicate::NE,
        BinaryOperator::Gt => IntPredicate::SGT,
        BinaryOperator::Lt => IntPredicate::SLT,
        BinaryOperator::Geq => IntPredicate::SGE,
        BinaryOperator::Leq => IntPredicate::SLE,
    };

    // Comparisons keep the operand width: 0 or 1 in the same integer type.
    let flag = compiler.build_unfolded(&operands, |builder, o| {
        builder.build_int_compare(predicate, o[0], o[1], "cmp")
    })?;
    Ok(compiler.builder.build_int_z_extend(flag, lhs.get_type(), "flag")?)
}

fn gen_cast<'ctx>(compiler: &mut Compiler<'_, 'ctx>, id: NodeId) -> Result<IntValue<'ctx>, Error> {
    let ast = compiler.ast;

    let value = gen_expression(compiler, ast.expect_slot(id, VALUE)?)?;
    let ty = compiler.node_type(id)?;

    let from = value.get_type().get_bit_width();
    let to = ty.get_bit_width();
    if from > to {
        compiler.build_unfolded(&[value], |builder, o| builder.build_int_truncate(o[0], ty, "trunc"))
    } else if from < to {
        compiler.build_unfolded(&[value], |builder, o| builder.build_int_s_extend(o[0], ty, "sext"))
    } else {
        Ok(value)
    }
}

/// Calls a function of the module. Returns `None`, as every function is `void`.
pub fn gen_call<'ctx>(compiler: &mut Compiler<'_, 'ctx>, id: NodeId) -> Result<Option<IntValue<'ctx>>, Error> {
    let ast = compiler.ast;

    let callee = ast.expect_slot(id, CALLEE)?;
    let function = ast
        .reference_target(callee)
        .and_then(|target| compiler.functions.get(&target).copied())
        .ok_or_else(|| Error::structural(format!("{} is not a function", ast.describe(callee))))?;

    let mut args: Vec<BasicMetadataValueEnum> = Vec::new();
    for argument in ast.children(ast.expect_slot(id, ARGUMENTS)?) {
        args.push(gen_expression(compiler, argument)?.into());
    }

    // Void results cannot carry a name.
    let call = compiler.builder.build_call(function, &args, "")?;
    Ok(call
        .try_as_basic_value()
        .left()
        .map(|value| value.into_int_value()))
}
