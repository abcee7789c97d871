use inkwell::{module::Linkage, types::BasicMetadataTypeEnum};
use log::debug;

use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::{NodeKind, PARAMETERS},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::compiler::{Compiler, NamedValue};

/// Every function in the tree, in source order.
pub fn function_nodes(ast: &Ast) -> Vec<NodeId> {
    ast.descendants(ast.root())
        .into_iter()
        .filter(|id| matches!(ast.kind(*id), NodeKind::Function { .. }))
        .collect()
}

/// Declares every function as `void name(params...)` and binds its parameters.
///
/// Runs before any body is lowered, so calls may target functions defined
/// later in the file.
pub fn declare_functions(compiler: &mut Compiler) -> Result<(), Error> {
    let ast = compiler.ast;

    for function in function_nodes(ast) {
        let name = ast.name(function).unwrap_or_default();

        // Functions share the symbol namespace with the runtime.
        if compiler.module.get_function(name).is_some() || compiler.module.get_global(name).is_some() {
            return Err(ast.error_at(
                function,
                ErrorImpl::AlreadyDeclared {
                    name: name.to_string(),
                },
            ));
        }

        let parameters = ast.children(ast.expect_slot(function, PARAMETERS)?);
        let mut param_types: Vec<BasicMetadataTypeEnum> = Vec::with_capacity(parameters.len());
        for parameter in &parameters {
            param_types.push(compiler.node_type(*parameter)?.into());
        }

        let function_type = compiler.context.void_type().fn_type(&param_types, false);
        let value = compiler
            .module
            .add_function(name, function_type, Some(Linkage::External));

        for (index, parameter) in parameters.into_iter().enumerate() {
            let param = value
                .get_nth_param(index as u32)
                .ok_or_else(|| Error::structural(format!("`{}` lost parameter {}", name, index)))?
                .into_int_value();
            param.set_name(ast.name(parameter).unwrap_or_default());
            compiler
                .named_values
                .insert(parameter, NamedValue::Parameter(param));
        }

        compiler.functions.insert(function, value);
        debug!("declared `{}`", name);
    }

    Ok(())
}
