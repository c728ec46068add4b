use core::ops::Index;

use crate::position::Span;

/// Handle to an [`Expr`] stored in an [`ExprArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub usize);

/// Owns every node produced by one parse. Children refer to each other by [`ExprId`].
#[derive(Debug, Clone, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn get(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.exprs.iter().enumerate().map(|(i, e)| (ExprId(i), e))
    }

    pub(crate) fn get_mut(&mut self, id: ExprId) -> Option<&mut Expr> {
        self.exprs.get_mut(id.0)
    }

    pub(crate) fn push(&mut self, expr: Expr) -> ExprId {
        self.exprs.push(expr);
        ExprId(self.exprs.len() - 1)
    }
}

impl Index<ExprId> for ExprArena {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    RegExp { pattern: String, flags: String },
    /// Source digits of a bigint, without the `n` suffix or separators.
    BigInt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

/// ESTree expression shapes the parser can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Identifier {
        name: String,
    },
    Literal {
        value: LiteralValue,
        raw: String,
    },
    Object {
        properties: Vec<ExprId>,
    },
    Property {
        key: ExprId,
        value: ExprId,
        kind: PropertyKind,
        computed: bool,
        method: bool,
        shorthand: bool,
    },
    Spread {
        argument: ExprId,
    },
    Rest {
        argument: ExprId,
    },
    AssignmentPattern {
        left: ExprId,
        right: ExprId,
    },
    Array {
        elements: Vec<Option<ExprId>>,
    },
    Unary {
        operator: &'static str,
        argument: ExprId,
    },
    Update {
        operator: &'static str,
        prefix: bool,
        argument: ExprId,
    },
    Binary {
        operator: &'static str,
        left: ExprId,
        right: ExprId,
    },
    Logical {
        operator: &'static str,
        left: ExprId,
        right: ExprId,
    },
    Assignment {
        operator: &'static str,
        left: ExprId,
        right: ExprId,
    },
    Conditional {
        test: ExprId,
        consequent: ExprId,
        alternate: ExprId,
    },
    Sequence {
        expressions: Vec<ExprId>,
    },
    Member {
        object: ExprId,
        property: ExprId,
        computed: bool,
        optional: bool,
    },
    Chain {
        expression: ExprId,
    },
    Call {
        callee: ExprId,
        arguments: Vec<ExprId>,
        optional: bool,
    },
    New {
        callee: ExprId,
        arguments: Vec<ExprId>,
    },
    TemplateLiteral {
        quasis: Vec<ExprId>,
        expressions: Vec<ExprId>,
    },
    TemplateElement {
        raw: String,
        cooked: Option<String>,
        tail: bool,
    },
    TaggedTemplate {
        tag: ExprId,
        quasi: ExprId,
    },
    This,
    /// A function expression. Only empty bodies are parsed.
    Function {
        id: Option<ExprId>,
        params: Vec<ExprId>,
        body: ExprId,
    },
    ArrowFunction {
        params: Vec<ExprId>,
        body: ExprId,
        expression: bool,
    },
    Class {
        id: Option<ExprId>,
        super_class: Option<ExprId>,
        body: ExprId,
    },
    /// An empty class body.
    ClassBody,
    /// An empty block statement.
    Block,
}

impl ExprKind {
    /// The ESTree `type` of the node.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Identifier { .. } => "Identifier",
            Self::Literal { .. } => "Literal",
            Self::Object { .. } => "ObjectExpression",
            Self::Property { .. } => "Property",
            Self::Spread { .. } => "SpreadElement",
            Self::Rest { .. } => "RestElement",
            Self::AssignmentPattern { .. } => "AssignmentPattern",
            Self::Array { .. } => "ArrayExpression",
            Self::Unary { .. } => "UnaryExpression",
            Self::Update { .. } => "UpdateExpression",
            Self::Binary { .. } => "BinaryExpression",
            Self::Logical { .. } => "LogicalExpression",
            Self::Assignment { .. } => "AssignmentExpression",
            Self::Conditional { .. } => "ConditionalExpression",
            Self::Sequence { .. } => "SequenceExpression",
            Self::Member { .. } => "MemberExpression",
            Self::Chain { .. } => "ChainExpression",
            Self::Call { .. } => "CallExpression",
            Self::New { .. } => "NewExpression",
            Self::TemplateLiteral { .. } => "TemplateLiteral",
            Self::TemplateElement { .. } => "TemplateElement",
            Self::TaggedTemplate { .. } => "TaggedTemplateExpression",
            Self::This => "ThisExpression",
            Self::Function { .. } => "FunctionExpression",
            Self::ArrowFunction { .. } => "ArrowFunctionExpression",
            Self::Class { .. } => "ClassExpression",
            Self::ClassBody => "ClassBody",
            Self::Block => "BlockStatement",
        }
    }
}
