use ecma_expr::{ExprArena, ExprId, ExprKind, Span};

use crate::ast::{LiteralValue, Node, NodeId, NodeKind, UnaryOperator};
use crate::error::ParseError;
use crate::hooks::JsonHooks;
use crate::validate::is_static_value_identifier;

/// Rebuilds a validated expression tree as JSON nodes, wrapped in a `Program` covering the whole
/// source.
pub(crate) struct Convertor<'h, 'src> {
    hooks: &'h JsonHooks<'src>,
    arena: &'h ExprArena,
    nodes: Vec<Node>,
}

impl<'h, 'src> Convertor<'h, 'src> {
    pub(crate) fn new(hooks: &'h JsonHooks<'src>, arena: &'h ExprArena) -> Self {
        Self {
            hooks,
            arena,
            nodes: Vec::with_capacity(arena.len() + 2),
        }
    }

    /// Converts `root` and returns the node list with the `Program` id.
    pub(crate) fn convert_program(mut self, root: ExprId) -> Result<(Vec<Node>, NodeId), ParseError> {
        let arena = self.arena;
        if let ExprKind::Identifier { name } = &arena[root].kind
            && !is_static_value_identifier(name, &self.hooks.ctx)
        {
            return Err(self.hooks.validator().unexpected_node(self.arena, root));
        }
        let expression = self.convert(root)?;
        let expression_range = self.nodes[expression.0].range;
        let statement = self.push(
            NodeKind::ExpressionStatement { expression },
            expression_range,
        );
        let program = self.push(
            NodeKind::Program { body: statement },
            Span::new(0, self.hooks.source.len()),
        );
        Ok((self.nodes, program))
    }

    fn push(&mut self, kind: NodeKind, range: Span) -> NodeId {
        self.nodes.push(Node {
            kind,
            range,
            loc: self.hooks.lines.location(range),
            parent: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    fn convert(&mut self, id: ExprId) -> Result<NodeId, ParseError> {
        let arena = self.arena;
        let expr = &arena[id];
        let kind = match &expr.kind {
            ExprKind::Object { properties } => NodeKind::ObjectExpression {
                properties: self.convert_all(properties)?,
            },
            ExprKind::Property { key, value, .. } => NodeKind::Property {
                key: self.convert(*key)?,
                value: self.convert(*value)?,
            },
            ExprKind::Array { elements } => {
                let elements = elements
                    .iter()
                    .map(|element| element.map(|id| self.convert(id)).transpose())
                    .collect::<Result<_, _>>()?;
                NodeKind::ArrayExpression { elements }
            }
            ExprKind::Literal { value, raw } => NodeKind::Literal {
                value: convert_literal(value),
                raw: raw.clone(),
            },
            ExprKind::Identifier { name } => NodeKind::Identifier { name: name.clone() },
            ExprKind::Unary { operator, argument } => {
                let operator = match *operator {
                    "-" => UnaryOperator::Minus,
                    "+" => UnaryOperator::Plus,
                    _ => return Err(self.hooks.validator().unexpected_node(self.arena, id)),
                };
                NodeKind::UnaryExpression {
                    operator,
                    argument: self.convert(*argument)?,
                }
            }
            ExprKind::TemplateLiteral {
                quasis,
                expressions,
            } => {
                let [quasi] = quasis.as_slice() else {
                    return Err(self.hooks.validator().unexpected_node(self.arena, id));
                };
                if !expressions.is_empty() {
                    return Err(self.hooks.validator().unexpected_node(self.arena, id));
                }
                NodeKind::TemplateLiteral {
                    quasi: self.convert(*quasi)?,
                }
            }
            ExprKind::TemplateElement {
                raw,
                cooked: Some(cooked),
                tail: true,
            } => {
                // The element span covers the raw text only; widen it over both backquotes.
                let range = Span::new(expr.span.start.saturating_sub(1), expr.span.end + 1);
                let kind = NodeKind::TemplateElement {
                    raw: raw.clone(),
                    cooked: cooked.clone(),
                };
                return Ok(self.push(kind, range));
            }
            _ => return Err(self.hooks.validator().unexpected_node(self.arena, id)),
        };
        Ok(self.push(kind, expr.span))
    }

    fn convert_all(&mut self, ids: &[ExprId]) -> Result<Vec<NodeId>, ParseError> {
        ids.iter().map(|&id| self.convert(id)).collect()
    }
}

fn convert_literal(value: &ecma_expr::LiteralValue) -> LiteralValue {
    match value {
        ecma_expr::LiteralValue::String(value) => LiteralValue::String(value.clone()),
        ecma_expr::LiteralValue::Number(value) => LiteralValue::Number(*value),
        ecma_expr::LiteralValue::Boolean(value) => LiteralValue::Boolean(*value),
        ecma_expr::LiteralValue::Null => LiteralValue::Null,
        ecma_expr::LiteralValue::RegExp { pattern, flags } => LiteralValue::RegExp {
            pattern: pattern.clone(),
            flags: flags.clone(),
        },
        ecma_expr::LiteralValue::BigInt(digits) => LiteralValue::BigInt(digits.clone()),
    }
}
