//! Main compiler module.
//!
//! This module contains the core Compiler structure and drives the lowering
//! from the typed tree to an LLVM module. It owns the LLVM module and
//! builder, the values bound to parameters and variables, and the declared
//! functions.

use std::collections::HashMap;

use inkwell::{
    builder::{Builder, BuilderError},
    context::Context,
    module::Module,
    targets::{InitializationConfig, Target, TargetTriple},
    types::IntType,
    values::{FunctionValue, GlobalValue, IntValue, PointerValue},
    OptimizationLevel,
};
use log::debug;

use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::BasicType,
    },
    errors::errors::{Error, ErrorImpl},
    CompileOptions,
};

use super::{
    global::{declare_functions, function_nodes},
    stdlib::declare_runtime,
    stmt::gen_function,
};

/// What a `Variable` node lowers to.
#[derive(Debug, Clone, Copy)]
pub enum NamedValue<'ctx> {
    /// A parameter, used directly as an SSA value.
    Parameter(IntValue<'ctx>),
    /// The stack slot backing a `let` variable.
    StackSlot(PointerValue<'ctx>),
}

/// The main compiler structure that holds the state of the lowering.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the typed tree being lowered
/// * `'ctx` - Lifetime of the LLVM context
pub struct Compiler<'a, 'ctx> {
    /// The typed tree being compiled
    pub ast: &'a Ast,

    /// Reference to the LLVM context
    pub context: &'ctx Context,
    /// The LLVM module being built
    pub module: Module<'ctx>,
    /// The LLVM IR builder
    pub builder: Builder<'ctx>,

    /// Map of parameter and variable nodes to their LLVM values
    pub named_values: HashMap<NodeId, NamedValue<'ctx>>,
    /// Map of function nodes to their LLVM declarations
    pub functions: HashMap<NodeId, FunctionValue<'ctx>>,

    /// The `printf` declaration used by `print`
    pub printf: FunctionValue<'ctx>,
    /// The shared `print` format string
    pub format_string: GlobalValue<'ctx>,
}

impl<'a, 'ctx> Compiler<'a, 'ctx> {
    /// Creates a new Compiler instance with the runtime already declared.
    ///
    /// # Arguments
    ///
    /// * `ast` - The typed tree to compile
    /// * `context` - Reference to the LLVM context
    /// * `options` - Module name and target triple
    pub fn new(ast: &'a Ast, context: &'ctx Context, options: &CompileOptions) -> Self {
        let module = context.create_module(&options.module_name);
        if let Some(triple) = &options.target_triple {
            module.set_triple(&TargetTriple::create(triple));
        }

        let (printf, format_string) = declare_runtime(context, &module);

        Compiler {
            ast,
            context,
            module,
            builder: context.create_builder(),
            named_values: HashMap::new(),
            functions: HashMap::new(),
            printf,
            format_string,
        }
    }

    /// Converts a builtin type to its LLVM integer type.
    ///
    /// # Errors
    ///
    /// `fn()` has no value representation and yields a `StructuralViolation`.
    pub fn convert_type(&self, basic: BasicType) -> Result<IntType<'ctx>, Error> {
        match basic {
            BasicType::Int8 => Ok(self.context.i8_type()),
            BasicType::Int16 => Ok(self.context.i16_type()),
            BasicType::Int32 => Ok(self.context.i32_type()),
            BasicType::Int64 => Ok(self.context.i64_type()),
            BasicType::Function => Err(Error::structural(format!(
                "`{}` has no value representation",
                basic.name()
            ))),
        }
    }

    /// The LLVM type of a typed node.
    pub fn node_type(&self, id: NodeId) -> Result<IntType<'ctx>, Error> {
        let basic = self.ast.target_basic_type(id).ok_or_else(|| {
            self.ast.error_at(
                id,
                ErrorImpl::UnknownType {
                    node: self.ast.describe(id),
                },
            )
        })?;
        self.convert_type(basic)
            .map_err(|error| error.or_position(self.ast.position(id)))
    }

    /// Attaches the node's position to errors raised without one.
    pub fn at<T>(&self, id: NodeId, result: Result<T, Error>) -> Result<T, Error> {
        result.map_err(|error| error.or_position(self.ast.position(id)))
    }

    /// Whether the block the builder sits in already ends in a terminator.
    pub fn is_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_terminator())
            .is_some()
    }

    /// Builds an integer instruction that LLVM must not fold away.
    ///
    /// The builder folds instructions over constants only, so when every
    /// operand is a constant the instruction is built over loads from scratch
    /// slots. The constants are then patched in and the scratch removed.
    pub fn build_unfolded<F>(&self, operands: &[IntValue<'ctx>], build: F) -> Result<IntValue<'ctx>, Error>
    where
        F: FnOnce(&Builder<'ctx>, &[IntValue<'ctx>]) -> Result<IntValue<'ctx>, BuilderError>,
    {
        if !operands.iter().all(|operand| operand.is_const()) {
            return Ok(build(&self.builder, operands)?);
        }

        let mut scratch = Vec::with_capacity(operands.len());
        for operand in operands {
            let slot = self.builder.build_alloca(operand.get_type(), "")?;
            let load = self.builder.build_load(slot, "")?.into_int_value();
            scratch.push((slot, load));
        }
        let stand_ins: Vec<IntValue<'ctx>> = scratch.iter().map(|(_, load)| *load).collect();

        let value = build(&self.builder, &stand_ins)?;
        let instruction = value
            .as_instruction()
            .ok_or_else(|| Error::structural("instruction over scratch loads was folded"))?;
        for (index, operand) in operands.iter().enumerate() {
            instruction.set_operand(index as u32, *operand);
        }

        for (slot, load) in scratch {
            if let Some(load) = load.as_instruction() {
                load.erase_from_basic_block();
            }
            if let Some(slot) = slot.as_instruction() {
                slot.erase_from_basic_block();
            }
        }

        Ok(value)
    }
}

/// Lowers a type-checked tree into a verified LLVM module.
///
/// # Arguments
///
/// * `ast` - The tree, after `type_check` succeeded on it
/// * `context` - The LLVM context owning the module
/// * `options` - Module name and target triple
///
/// # Returns
///
/// The populated module, or the first error met.
pub fn compile<'ctx>(ast: &Ast, context: &'ctx Context, options: &CompileOptions) -> Result<Module<'ctx>, Error> {
    let mut compiler = Compiler::new(ast, context, options);

    debug!("declaring functions");
    declare_functions(&mut compiler)?;

    debug!("lowering function bodies");
    for function in function_nodes(ast) {
        gen_function(&mut compiler, function)?;
    }

    compiler.module.verify()?;
    Ok(compiler.module)
}

/// JIT-compiles `module` and calls the `void name()` function in it.
pub fn run_function(module: &Module, name: &str) -> Result<(), Error> {
    Target::initialize_native(&InitializationConfig::default()).map_err(Error::backend)?;
    let engine = module.create_jit_execution_engine(OptimizationLevel::None)?;

    unsafe {
        let function = engine
            .get_function::<unsafe extern "C" fn()>(name)
            .map_err(Error::backend)?;
        function.call();
    }

    debug!("ran `{}`", name);
    Ok(())
}
