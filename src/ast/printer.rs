use super::{
    ast::{Ast, NodeId},
    nodes::{NodeKind, TYPE},
};

const INDENT_STEP: &str = "    ";

/// Renders `id` and its subtree, one node per line.
///
/// Each line holds the kind, the name or literal value in quotes, and for
/// typed nodes the type name in brackets (`[?]` while unknown). Type slots are
/// shown inline instead of as children.
pub fn dump(ast: &Ast, id: NodeId) -> String {
    let mut out = String::new();
    dump_node(ast, id, 0, &mut out);
    out
}

fn dump_node(ast: &Ast, id: NodeId, depth: usize, out: &mut String) {
    let kind = ast.kind(id);

    out.push_str(&INDENT_STEP.repeat(depth));
    out.push_str(kind.kind_name());

    match kind {
        NodeKind::Number { value } => out.push_str(&format!(" '{}'", value)),
        _ => {
            if let Some(name) = kind.name() {
                out.push_str(&format!(" '{}'", name));
            }
        }
    }

    let has_type_slot = kind.slots().is_some_and(|slots| slots.contains(&TYPE));
    let names_a_type = ast.reference_target(id).is_some_and(|target| ast.is_type(target));
    if has_type_slot && !names_a_type {
        match ast.slot(id, TYPE).and_then(|type_ref| ast.name(type_ref)) {
            Some(name) => out.push_str(&format!(" [{}]", name)),
            None => out.push_str(" [?]"),
        }
    }
    out.push('\n');

    for child in ast.children(id) {
        if ast.slot(id, TYPE) == Some(child) {
            continue;
        }
        dump_node(ast, child, depth + 1, out);
    }
}
