use std::sync::LazyLock;

use indexmap::IndexMap;

/// Child property names per node type, for the JSON node set.
const JSON_KEYS: &[(&str, &[&str])] = &[
    ("Program", &["body"]),
    ("JSONExpressionStatement", &["expression"]),
    ("JSONArrayExpression", &["elements"]),
    ("JSONObjectExpression", &["properties"]),
    ("JSONProperty", &["key", "value"]),
    ("JSONIdentifier", &[]),
    ("JSONLiteral", &[]),
    ("JSONUnaryExpression", &["argument"]),
    ("JSONTemplateLiteral", &["quasis", "expressions"]),
    ("JSONTemplateElement", &[]),
];

/// The standard ESTree table that generic tree walkers start from.
const ESTREE_KEYS: &[(&str, &[&str])] = &[
    ("ArrayExpression", &["elements"]),
    ("ArrayPattern", &["elements"]),
    ("ArrowFunctionExpression", &["params", "body"]),
    ("AssignmentExpression", &["left", "right"]),
    ("AssignmentPattern", &["left", "right"]),
    ("AwaitExpression", &["argument"]),
    ("BinaryExpression", &["left", "right"]),
    ("BlockStatement", &["body"]),
    ("BreakStatement", &["label"]),
    ("CallExpression", &["callee", "arguments"]),
    ("CatchClause", &["param", "body"]),
    ("ChainExpression", &["expression"]),
    ("ClassBody", &["body"]),
    ("ClassDeclaration", &["id", "superClass", "body"]),
    ("ClassExpression", &["id", "superClass", "body"]),
    ("ConditionalExpression", &["test", "consequent", "alternate"]),
    ("ContinueStatement", &["label"]),
    ("DebuggerStatement", &[]),
    ("DoWhileStatement", &["body", "test"]),
    ("EmptyStatement", &[]),
    ("ExportAllDeclaration", &["exported", "source"]),
    ("ExportDefaultDeclaration", &["declaration"]),
    ("ExportNamedDeclaration", &["declaration", "specifiers", "source"]),
    ("ExportSpecifier", &["exported", "local"]),
    ("ExpressionStatement", &["expression"]),
    ("ForInStatement", &["left", "right", "body"]),
    ("ForOfStatement", &["left", "right", "body"]),
    ("ForStatement", &["init", "test", "update", "body"]),
    ("FunctionDeclaration", &["id", "params", "body"]),
    ("FunctionExpression", &["id", "params", "body"]),
    ("Identifier", &[]),
    ("IfStatement", &["test", "consequent", "alternate"]),
    ("ImportDeclaration", &["specifiers", "source"]),
    ("ImportDefaultSpecifier", &["local"]),
    ("ImportExpression", &["source"]),
    ("ImportNamespaceSpecifier", &["local"]),
    ("ImportSpecifier", &["imported", "local"]),
    ("LabeledStatement", &["label", "body"]),
    ("Literal", &[]),
    ("LogicalExpression", &["left", "right"]),
    ("MemberExpression", &["object", "property"]),
    ("MetaProperty", &["meta", "property"]),
    ("MethodDefinition", &["key", "value"]),
    ("NewExpression", &["callee", "arguments"]),
    ("ObjectExpression", &["properties"]),
    ("ObjectPattern", &["properties"]),
    ("PrivateIdentifier", &[]),
    ("Program", &["body"]),
    ("Property", &["key", "value"]),
    ("PropertyDefinition", &["key", "value"]),
    ("RestElement", &["argument"]),
    ("ReturnStatement", &["argument"]),
    ("SequenceExpression", &["expressions"]),
    ("SpreadElement", &["argument"]),
    ("StaticBlock", &["body"]),
    ("Super", &[]),
    ("SwitchCase", &["test", "consequent"]),
    ("SwitchStatement", &["discriminant", "cases"]),
    ("TaggedTemplateExpression", &["tag", "quasi"]),
    ("TemplateElement", &[]),
    ("TemplateLiteral", &["quasis", "expressions"]),
    ("ThisExpression", &[]),
    ("ThrowStatement", &["argument"]),
    ("TryStatement", &["block", "handler", "finalizer"]),
    ("UnaryExpression", &["argument"]),
    ("UpdateExpression", &["argument"]),
    ("VariableDeclaration", &["declarations"]),
    ("VariableDeclarator", &["id", "init"]),
    ("WhileStatement", &["test", "body"]),
    ("WithStatement", &["object", "body"]),
    ("YieldExpression", &["argument"]),
];

/// Visitor keys for every known node type: the ESTree table with the JSON node types added.
/// Where a type appears in both, the key lists are merged with ESTree order first.
pub static KEYS: LazyLock<IndexMap<&'static str, Vec<&'static str>>> = LazyLock::new(|| {
    let mut keys: IndexMap<&'static str, Vec<&'static str>> = ESTREE_KEYS
        .iter()
        .map(|&(node_type, children)| (node_type, children.to_vec()))
        .collect();
    for &(node_type, children) in JSON_KEYS {
        let entry = keys.entry(node_type).or_default();
        for child in children {
            if !entry.contains(child) {
                entry.push(child);
            }
        }
    }
    keys
});

/// Child property names for `node_type`, or an empty slice for unknown types.
pub fn keys_for(node_type: &str) -> &'static [&'static str] {
    KEYS.get(node_type).map_or(&[], Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_types_are_present() {
        assert_eq!(keys_for("JSONProperty"), ["key", "value"]);
        assert_eq!(keys_for("JSONTemplateLiteral"), ["quasis", "expressions"]);
        assert!(keys_for("JSONLiteral").is_empty());
        assert_eq!(keys_for("Program"), ["body"]);
    }

    #[test]
    fn estree_types_stay_available() {
        assert_eq!(keys_for("BinaryExpression"), ["left", "right"]);
        assert!(keys_for("NoSuchNode").is_empty());
    }
}
