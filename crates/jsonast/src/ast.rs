//! The JSON syntax tree.
//!
//! Nodes live in an arena owned by [`Ast`] and refer to each other by [`NodeId`]. Parent links are
//! filled in by a second pass once the whole tree exists.

use core::ops::Index;

use ecma_expr::{SourceLocation, Span};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::token::{Comment, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Minus,
    Plus,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Plus => "+",
        }
    }
}

/// Value of a `JSONLiteral`. Regex and bigint literals keep their source form.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    RegExp { pattern: String, flags: String },
    /// Digits as written, without the `n` suffix or separators, e.g. `0xff`.
    BigInt(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        body: NodeId,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    ObjectExpression {
        properties: Vec<NodeId>,
    },
    /// Always a plain `key: value` pair.
    Property {
        key: NodeId,
        value: NodeId,
    },
    ArrayExpression {
        elements: Vec<Option<NodeId>>,
    },
    Literal {
        value: LiteralValue,
        raw: String,
    },
    Identifier {
        name: String,
    },
    UnaryExpression {
        operator: UnaryOperator,
        argument: NodeId,
    },
    /// A template without substitutions.
    TemplateLiteral {
        quasi: NodeId,
    },
    TemplateElement {
        raw: String,
        cooked: String,
    },
}

impl NodeKind {
    /// The ESTree `type` of the node.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Program { .. } => "Program",
            Self::ExpressionStatement { .. } => "JSONExpressionStatement",
            Self::ObjectExpression { .. } => "JSONObjectExpression",
            Self::Property { .. } => "JSONProperty",
            Self::ArrayExpression { .. } => "JSONArrayExpression",
            Self::Literal { .. } => "JSONLiteral",
            Self::Identifier { .. } => "JSONIdentifier",
            Self::UnaryExpression { .. } => "JSONUnaryExpression",
            Self::TemplateLiteral { .. } => "JSONTemplateLiteral",
            Self::TemplateElement { .. } => "JSONTemplateElement",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: Span,
    pub loc: SourceLocation,
    pub parent: Option<NodeId>,
}

/// A parsed document: the `Program` node and everything below it, plus the token and comment
/// streams.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}

impl Ast {
    /// Takes ownership of built nodes and links every child to its parent.
    pub(crate) fn new(
        nodes: Vec<Node>,
        root: NodeId,
        tokens: Vec<Token>,
        comments: Vec<Comment>,
    ) -> Self {
        let mut ast = Self {
            nodes,
            root,
            tokens,
            comments,
        };
        ast.link_parents();
        ast
    }

    fn link_parents(&mut self) {
        let links: Vec<(NodeId, NodeId)> = (0..self.nodes.len())
            .map(NodeId)
            .flat_map(|parent| {
                self.children(parent)
                    .into_iter()
                    .map(move |child| (child, parent))
            })
            .collect();
        for (child, parent) in links {
            if let Some(node) = self.nodes.get_mut(child.0) {
                node.parent = Some(parent);
            }
        }
    }

    /// The `Program` node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// The single top-level value.
    pub fn expression(&self) -> Option<NodeId> {
        let NodeKind::Program { body } = self[self.root].kind else {
            return None;
        };
        match self[body].kind {
            NodeKind::ExpressionStatement { expression } => Some(expression),
            _ => None,
        }
    }

    /// Direct children in visiting order, skipping array holes.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        match &node.kind {
            NodeKind::Program { body } => vec![*body],
            NodeKind::ExpressionStatement { expression } => vec![*expression],
            NodeKind::ObjectExpression { properties } => properties.clone(),
            NodeKind::Property { key, value } => vec![*key, *value],
            NodeKind::ArrayExpression { elements } => elements.iter().flatten().copied().collect(),
            NodeKind::UnaryExpression { argument, .. } => vec![*argument],
            NodeKind::TemplateLiteral { quasi } => vec![*quasi],
            NodeKind::Literal { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::TemplateElement { .. } => Vec::new(),
        }
    }

    /// Whether the node is a value, as opposed to a property key or a structural node.
    pub fn is_expression(&self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        match node.kind {
            NodeKind::Identifier { .. } | NodeKind::Literal { .. } => {
                let is_key = node.parent.is_some_and(|parent| {
                    matches!(self[parent].kind, NodeKind::Property { key, .. } if key == id)
                });
                !is_key
            }
            NodeKind::ObjectExpression { .. }
            | NodeKind::ArrayExpression { .. }
            | NodeKind::UnaryExpression { .. }
            | NodeKind::TemplateLiteral { .. } => true,
            _ => false,
        }
    }

    /// `NaN` or `Infinity` in value position.
    pub fn is_number_identifier(&self, id: NodeId) -> bool {
        self.is_expression(id)
            && matches!(&self[id].kind, NodeKind::Identifier { name } if name == "Infinity" || name == "NaN")
    }

    /// `undefined` in value position.
    pub fn is_undefined_identifier(&self, id: NodeId) -> bool {
        self.is_expression(id)
            && matches!(&self[id].kind, NodeKind::Identifier { name } if name == "undefined")
    }

    /// Serializable view of one node and its subtree.
    pub fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { ast: self, id }
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

/// Serializes as the ESTree `Program`, including `tokens` and `comments`.
impl Serialize for Ast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.node_ref(self.root).serialize(serializer)
    }
}

/// A node borrowed together with its tree, serializing to ESTree JSON.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl NodeRef<'_> {
    fn child(&self, id: NodeId) -> Self {
        Self { ast: self.ast, id }
    }
}

struct Elements<'a>(NodeRef<'a>, &'a [Option<NodeId>]);

impl Serialize for Elements<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.1.len()))?;
        for element in self.1 {
            seq.serialize_element(&element.map(|id| self.0.child(id)))?;
        }
        seq.end()
    }
}

/// Serializes integral values as integers, the way JavaScript prints them.
pub(crate) fn serialize_number<S: Serializer>(value: f64, serializer: S) -> Result<S::Ok, S::Error> {
    match as_safe_integer(value) {
        Some(integer) => serializer.serialize_i64(integer),
        None => serializer.serialize_f64(value),
    }
}

/// `value` as an `i64` when it is integral and exactly representable.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn as_safe_integer(value: f64) -> Option<i64> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    let negative_zero = value == 0.0 && value.is_sign_negative();
    (value.fract() == 0.0 && value.abs() <= MAX_SAFE && !negative_zero).then_some(value as i64)
}

struct Number(f64);

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_number(self.0, serializer)
    }
}

#[derive(Serialize)]
struct TemplateValue<'a> {
    raw: &'a str,
    cooked: &'a str,
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = &self.ast[self.id];
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", node.kind.type_name())?;
        match &node.kind {
            NodeKind::Program { body } => {
                map.serialize_entry("body", &[self.child(*body)])?;
                map.serialize_entry("comments", &self.ast.comments)?;
                map.serialize_entry("tokens", &self.ast.tokens)?;
            }
            NodeKind::ExpressionStatement { expression } => {
                map.serialize_entry("expression", &self.child(*expression))?;
            }
            NodeKind::ObjectExpression { properties } => {
                let properties: Vec<_> = properties.iter().map(|&id| self.child(id)).collect();
                map.serialize_entry("properties", &properties)?;
            }
            NodeKind::Property { key, value } => {
                map.serialize_entry("key", &self.child(*key))?;
                map.serialize_entry("value", &self.child(*value))?;
                map.serialize_entry("kind", "init")?;
                map.serialize_entry("computed", &false)?;
                map.serialize_entry("method", &false)?;
                map.serialize_entry("shorthand", &false)?;
            }
            NodeKind::ArrayExpression { elements } => {
                map.serialize_entry("elements", &Elements(*self, elements))?;
            }
            NodeKind::Literal { value, raw } => {
                match value {
                    LiteralValue::String(value) => map.serialize_entry("value", value)?,
                    LiteralValue::Number(value) => map.serialize_entry("value", &Number(*value))?,
                    LiteralValue::Boolean(value) => map.serialize_entry("value", value)?,
                    LiteralValue::Null => map.serialize_entry("value", &())?,
                    LiteralValue::RegExp { pattern, flags } => {
                        map.serialize_entry("value", &())?;
                        let regex = serde_json::json!({ "pattern": pattern, "flags": flags });
                        map.serialize_entry("regex", &regex)?;
                    }
                    LiteralValue::BigInt(digits) => {
                        map.serialize_entry("value", &())?;
                        map.serialize_entry("bigint", digits)?;
                    }
                }
                map.serialize_entry("raw", raw)?;
            }
            NodeKind::Identifier { name } => map.serialize_entry("name", name)?,
            NodeKind::UnaryExpression { operator, argument } => {
                map.serialize_entry("operator", operator.as_str())?;
                map.serialize_entry("prefix", &true)?;
                map.serialize_entry("argument", &self.child(*argument))?;
            }
            NodeKind::TemplateLiteral { quasi } => {
                map.serialize_entry("quasis", &[self.child(*quasi)])?;
                map.serialize_entry("expressions", &[(); 0])?;
            }
            NodeKind::TemplateElement { raw, cooked } => {
                map.serialize_entry("tail", &true)?;
                map.serialize_entry("value", &TemplateValue { raw, cooked })?;
            }
        }
        map.serialize_entry("range", &node.range)?;
        map.serialize_entry("loc", &node.loc)?;
        map.end()
    }
}
