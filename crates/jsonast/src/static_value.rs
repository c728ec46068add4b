//! Evaluation of a parsed tree into plain data.

use indexmap::IndexMap;
use num_bigint::BigInt;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::ast::{Ast, LiteralValue, NodeId, NodeKind, UnaryOperator, as_safe_integer};

/// The data a JSON tree denotes.
#[derive(Debug, Clone)]
pub enum StaticValue {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
    BigInt(BigInt),
    /// `compiled` is `None` when the pattern uses syntax the `regex` crate does not support.
    RegExp {
        pattern: String,
        flags: String,
        compiled: Option<Regex>,
    },
    /// Holes stay `None`.
    Array(Vec<Option<StaticValue>>),
    /// Later duplicate keys overwrite earlier values but keep the first key's position.
    Object(IndexMap<String, StaticValue>),
}

impl PartialEq for StaticValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) | (Self::Undefined, Self::Undefined) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            (
                Self::RegExp { pattern, flags, .. },
                Self::RegExp {
                    pattern: other_pattern,
                    flags: other_flags,
                    ..
                },
            ) => pattern == other_pattern && flags == other_flags,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StaticValueError {
    #[error("identifier '{0}' has no static value")]
    UnknownIdentifier(String),
    #[error("cannot negate a non-numeric value")]
    NonNumericOperand,
    #[error("node {0:?} does not exist")]
    MissingNode(NodeId),
}

/// Resolves the whole document.
///
/// # Errors
///
/// Fails only for trees the parser would not have produced, such as an identifier other than
/// `NaN`, `Infinity` or `undefined` in value position.
pub fn static_value(ast: &Ast) -> Result<StaticValue, StaticValueError> {
    static_value_of(ast, ast.root())
}

/// Resolves the subtree rooted at `id`.
///
/// # Errors
///
/// See [`static_value`].
pub fn static_value_of(ast: &Ast, id: NodeId) -> Result<StaticValue, StaticValueError> {
    let node = ast.get(id).ok_or(StaticValueError::MissingNode(id))?;
    match &node.kind {
        NodeKind::Program { body } => static_value_of(ast, *body),
        NodeKind::ExpressionStatement { expression } => static_value_of(ast, *expression),
        NodeKind::ObjectExpression { properties } => {
            let mut object = IndexMap::with_capacity(properties.len());
            for &property in properties {
                let NodeKind::Property { key, value } = ast[property].kind else {
                    continue;
                };
                object.insert(property_key(ast, key)?, static_value_of(ast, value)?);
            }
            Ok(StaticValue::Object(object))
        }
        NodeKind::Property { key, value } => {
            let mut object = IndexMap::with_capacity(1);
            object.insert(property_key(ast, *key)?, static_value_of(ast, *value)?);
            Ok(StaticValue::Object(object))
        }
        NodeKind::ArrayExpression { elements } => elements
            .iter()
            .map(|element| element.map(|id| static_value_of(ast, id)).transpose())
            .collect::<Result<_, _>>()
            .map(StaticValue::Array),
        NodeKind::Literal { value, .. } => Ok(literal_value(value)),
        NodeKind::UnaryExpression { operator, argument } => {
            let value = static_value_of(ast, *argument)?;
            match (*operator, value) {
                (UnaryOperator::Plus, value) => Ok(value),
                (UnaryOperator::Minus, StaticValue::Number(n)) => Ok(StaticValue::Number(-n)),
                (UnaryOperator::Minus, StaticValue::BigInt(n)) => Ok(StaticValue::BigInt(-n)),
                (UnaryOperator::Minus, StaticValue::Undefined) => Ok(StaticValue::Number(f64::NAN)),
                (UnaryOperator::Minus, _) => Err(StaticValueError::NonNumericOperand),
            }
        }
        NodeKind::Identifier { name } => match name.as_str() {
            "Infinity" => Ok(StaticValue::Number(f64::INFINITY)),
            "NaN" => Ok(StaticValue::Number(f64::NAN)),
            "undefined" => Ok(StaticValue::Undefined),
            _ => Err(StaticValueError::UnknownIdentifier(name.clone())),
        },
        NodeKind::TemplateLiteral { quasi } => static_value_of(ast, *quasi),
        NodeKind::TemplateElement { cooked, .. } => Ok(StaticValue::String(cooked.clone())),
    }
}

fn property_key(ast: &Ast, key: NodeId) -> Result<String, StaticValueError> {
    match &ast[key].kind {
        NodeKind::Identifier { name } => Ok(name.clone()),
        NodeKind::Literal { value, .. } => Ok(match value {
            LiteralValue::String(s) => s.clone(),
            LiteralValue::Number(n) => number_to_string(*n),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Null => "null".to_string(),
            LiteralValue::RegExp { pattern, flags } => format!("/{pattern}/{flags}"),
            LiteralValue::BigInt(digits) => {
                parse_bigint(digits).map_or_else(|| digits.clone(), |n| n.to_string())
            }
        }),
        _ => Err(StaticValueError::MissingNode(key)),
    }
}

fn literal_value(value: &LiteralValue) -> StaticValue {
    match value {
        LiteralValue::String(s) => StaticValue::String(s.clone()),
        LiteralValue::Number(n) => StaticValue::Number(*n),
        LiteralValue::Boolean(b) => StaticValue::Bool(*b),
        LiteralValue::Null => StaticValue::Null,
        LiteralValue::RegExp { pattern, flags } => StaticValue::RegExp {
            pattern: pattern.clone(),
            flags: flags.clone(),
            compiled: compile_regex(pattern, flags),
        },
        LiteralValue::BigInt(digits) => match parse_bigint(digits) {
            Some(n) => StaticValue::BigInt(n),
            None => StaticValue::String(digits.clone()),
        },
    }
}

fn compile_regex(pattern: &str, flags: &str) -> Option<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .ok()
}

/// Parses bigint digits, honouring `0x`, `0o` and `0b` prefixes.
fn parse_bigint(digits: &str) -> Option<BigInt> {
    let lower = digits.to_ascii_lowercase();
    let (body, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(octal) = lower.strip_prefix("0o") {
        (octal, 8)
    } else if let Some(binary) = lower.strip_prefix("0b") {
        (binary, 2)
    } else {
        (lower.as_str(), 10)
    };
    BigInt::parse_bytes(body.as_bytes(), radix)
}

/// Formats `value` the way JavaScript's `Number.prototype.toString` does.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    // Shortest round-trip digits, e.g. `1.2345e-7`.
    let scientific = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let Ok(exponent) = exponent.parse::<i64>() else {
        return scientific;
    };
    let k = i64::try_from(digits.len()).unwrap_or(i64::MAX);
    let n = exponent + 1;
    let body = if k <= n && n <= 21 {
        let zeros = usize::try_from(n - k).unwrap_or_default();
        format!("{digits}{}", "0".repeat(zeros))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(usize::try_from(n).unwrap_or_default());
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        let zeros = usize::try_from(-n).unwrap_or_default();
        format!("0.{}{digits}", "0".repeat(zeros))
    } else {
        let exp_sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{rest}")
        };
        format!("{first}{fraction}e{exp_sign}{}", (n - 1).abs())
    };
    format!("{sign}{body}")
}

impl StaticValue {
    /// Converts to JSON data, the way `JSON.stringify` would see it: `undefined`, holes and
    /// non-finite numbers become `null`, and regexes and bigints become strings.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Self::Null | Self::Undefined => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => match as_safe_integer(*n) {
                Some(i) => Value::from(i),
                None => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
            },
            Self::String(s) => Value::String(s.clone()),
            Self::BigInt(n) => Value::String(n.to_string()),
            Self::RegExp { pattern, flags, .. } => Value::String(format!("/{pattern}/{flags}")),
            Self::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.as_ref().map_or(Value::Null, Self::to_json))
                    .collect(),
            ),
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}
