//! The runtime the generated code links against: `printf` and the format
//! string `print` uses.

use inkwell::{
    context::Context,
    module::{Linkage, Module},
    values::{FunctionValue, GlobalValue},
    AddressSpace,
};

use crate::{
    ast::{ast::NodeId, nodes::VALUE},
    errors::errors::Error,
};

use super::{compiler::Compiler, expr::gen_expression};

pub const PRINTF: &str = "printf";
pub const FORMAT_STRING_NAME: &str = "fstr";
/// Every printed value is widened to `i64` first, so one format serves all widths.
pub const FORMAT_STRING: &[u8] = b"%lld \n\0";

/// Declares `i32 printf(i8*, ...)` and the internal format string.
pub fn declare_runtime<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
) -> (FunctionValue<'ctx>, GlobalValue<'ctx>) {
    let i8_ptr_type = context.i8_type().ptr_type(AddressSpace::default());

    let printf_type = context.i32_type().fn_type(&[i8_ptr_type.into()], true);
    let printf = module.add_function(PRINTF, printf_type, Some(Linkage::External));

    let initializer = context.const_string(FORMAT_STRING, false);
    let format_string = module.add_global(
        initializer.get_type(),
        Some(AddressSpace::default()),
        FORMAT_STRING_NAME,
    );
    format_string.set_initializer(&initializer);
    format_string.set_constant(true);
    format_string.set_linkage(Linkage::Internal);

    (printf, format_string)
}

/// Lowers `print(value)` to a `printf` call with the shared format string.
pub fn gen_print(compiler: &mut Compiler, id: NodeId) -> Result<(), Error> {
    let operand = compiler.ast.expect_slot(id, VALUE)?;
    let value = gen_expression(compiler, operand)?;

    let i64_type = compiler.context.i64_type();
    let value = if value.get_type().get_bit_width() < 64 {
        compiler.build_unfolded(&[value], |builder, operands| {
            builder.build_int_s_extend(operands[0], i64_type, "wide")
        })?
    } else {
        value
    };

    let format = compiler.builder.build_pointer_cast(
        compiler.format_string.as_pointer_value(),
        compiler.context.i8_type().ptr_type(AddressSpace::default()),
        "fmt",
    )?;
    compiler
        .builder
        .build_call(compiler.printf, &[format.into(), value.into()], "printed")?;

    Ok(())
}
