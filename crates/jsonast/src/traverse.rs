use indexmap::IndexMap;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::visitor_keys::KEYS;

/// Callbacks for [`traverse_nodes`]. `parent` is `None` for the starting node.
pub trait Visitor {
    fn enter_node(&mut self, _ast: &Ast, _node: NodeId, _parent: Option<NodeId>) {}

    fn leave_node(&mut self, _ast: &Ast, _node: NodeId, _parent: Option<NodeId>) {}

    /// Key table deciding which children are visited and in what order. Defaults to [`KEYS`].
    fn visitor_keys(&self) -> Option<&IndexMap<&'static str, Vec<&'static str>>> {
        None
    }
}

/// Walks the subtree at `root` depth-first, entering each node before its children and leaving
/// it after them.
pub fn traverse_nodes(ast: &Ast, root: NodeId, visitor: &mut impl Visitor) {
    traverse(ast, root, None, visitor);
}

fn traverse(ast: &Ast, node: NodeId, parent: Option<NodeId>, visitor: &mut impl Visitor) {
    visitor.enter_node(ast, node, parent);
    let type_name = ast[node].kind.type_name();
    let keys = visitor
        .visitor_keys()
        .unwrap_or(&*KEYS)
        .get(type_name)
        .cloned()
        .unwrap_or_default();
    for key in keys {
        for child in child_nodes(ast, node, key) {
            traverse(ast, child, Some(node), visitor);
        }
    }
    visitor.leave_node(ast, node, parent);
}

/// The nodes stored under the ESTree property `key` of `node`. Array holes are skipped.
pub fn child_nodes(ast: &Ast, node: NodeId, key: &str) -> Vec<NodeId> {
    match (&ast[node].kind, key) {
        (NodeKind::Program { body }, "body") => vec![*body],
        (NodeKind::ExpressionStatement { expression }, "expression") => vec![*expression],
        (NodeKind::ObjectExpression { properties }, "properties") => properties.clone(),
        (NodeKind::Property { key, .. }, "key") => vec![*key],
        (NodeKind::Property { value, .. }, "value") => vec![*value],
        (NodeKind::ArrayExpression { elements }, "elements") => {
            elements.iter().flatten().copied().collect()
        }
        (NodeKind::UnaryExpression { argument, .. }, "argument") => vec![*argument],
        (NodeKind::TemplateLiteral { quasi }, "quasis") => vec![*quasi],
        _ => Vec::new(),
    }
}
