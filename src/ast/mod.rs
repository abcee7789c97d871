/// AST (Abstract Syntax Tree) module
/// Contains the mutable tree every compiler pass rewrites in place
///
/// Submodules:
/// - ast: the node arena, parent links and the structural rewrite primitives
/// - nodes: node kinds, builtin types and the semantic accessors passes rely on
/// - visitor: kind-based dispatch with fallback to grouped handlers
/// - printer: indented textual dump of a tree
pub mod ast;
pub mod nodes;
pub mod printer;
pub mod visitor;

#[cfg(test)]
mod tests;
