//! Per-node rules deciding whether a completed expression node is legal data in the active
//! dialect.
//!
//! Nodes are checked as the parser completes them, so the innermost offending node is reported
//! first.

use ecma_expr::{Expr, ExprArena, ExprId, ExprKind, LineIndex, LiteralValue, Span};

use crate::error::{ErrorKind, LiteralKind, ParseError};
use crate::syntax_context::SyntaxContext;
use crate::token::Token;
use crate::token_store::{TokenStore, any_token};

pub(crate) struct Validator<'a, 'src> {
    pub(crate) ctx: &'a SyntaxContext,
    pub(crate) tokens: &'a TokenStore,
    pub(crate) lines: &'a LineIndex<'src>,
}

impl Validator<'_, '_> {
    pub(crate) fn validate(&self, arena: &ExprArena, id: ExprId) -> Result<(), ParseError> {
        let expr = &arena[id];
        match &expr.kind {
            ExprKind::Object { .. } => self.check_trailing_comma(expr.span),
            ExprKind::Property {
                key,
                value,
                computed,
                method,
                shorthand,
                kind,
            } => {
                if *computed {
                    return Err(self.unexpected_node(arena, id));
                }
                if *method {
                    return Err(self.unexpected_node(arena, *value));
                }
                if *shorthand {
                    return Err(self.error_at(ErrorKind::ExpectedToken(":".into()), expr.span.end));
                }
                if *kind != ecma_expr::PropertyKind::Init {
                    let end = self.tokens.first_token(expr.span).map_or(expr.span.end, |t| t.range.end);
                    return Err(self.error_at(ErrorKind::ExpectedToken(":".into()), end));
                }
                self.check_key(arena, *key)?;
                self.check_value_identifier(arena, *value)
            }
            ExprKind::Array { elements } => self.check_array(arena, expr, elements),
            ExprKind::Literal { value, raw } => self.check_literal(arena, id, value, raw),
            ExprKind::Unary { operator, argument } => {
                self.check_unary(arena, id, operator, *argument)
            }
            ExprKind::Identifier { name } => {
                if !self.ctx.escape_sequence_in_identifier && name.len() < expr.span.len() {
                    return Err(self.unexpected(ErrorKind::UnexpectedSyntax("escape sequence"), expr));
                }
                Ok(())
            }
            ExprKind::TemplateLiteral { quasis, expressions } => {
                self.check_template(arena, id, quasis, expressions)
            }
            ExprKind::TemplateElement { cooked: None, .. } => Err(self.unexpected_node(arena, id)),
            ExprKind::TemplateElement { .. } => Ok(()),
            _ => Err(self.unexpected_node(arena, id)),
        }
    }

    fn check_trailing_comma(&self, span: Span) -> Result<(), ParseError> {
        if self.ctx.trailing_commas {
            return Ok(());
        }
        let before_close = self
            .tokens
            .last_token(span)
            .and_then(|last| self.tokens.token_before(last.range, any_token));
        match before_close {
            Some(token) if token.is_comma() => Err(self.unexpected_token(",", token.range.start)),
            _ => Ok(()),
        }
    }

    fn check_key(&self, arena: &ExprArena, key: ExprId) -> Result<(), ParseError> {
        let allowed = match &arena[key].kind {
            ExprKind::Literal {
                value: LiteralValue::Number(_),
                ..
            } => self.ctx.number_properties,
            ExprKind::Literal {
                value: LiteralValue::String(_),
                ..
            } => true,
            ExprKind::Identifier { .. } => self.ctx.unquote_properties,
            _ => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(self.unexpected_node(arena, key))
        }
    }

    /// Bare identifiers in value position must name one of the allowed static values.
    fn check_value_identifier(&self, arena: &ExprArena, value: ExprId) -> Result<(), ParseError> {
        match &arena[value].kind {
            ExprKind::Identifier { name } if !is_static_value_identifier(name, self.ctx) => {
                Err(self.unexpected_node(arena, value))
            }
            _ => Ok(()),
        }
    }

    fn check_array(
        &self,
        arena: &ExprArena,
        array: &Expr,
        elements: &[Option<ExprId>],
    ) -> Result<(), ParseError> {
        self.check_trailing_comma(array.span)?;
        for (index, element) in elements.iter().enumerate() {
            let Some(element) = element else {
                if self.ctx.sparse_arrays {
                    continue;
                }
                return Err(self.hole_error(arena, array, elements, index));
            };
            self.check_value_identifier(arena, *element)?;
        }
        Ok(())
    }

    /// Reports a hole at the comma following the previous element, or the opening bracket.
    fn hole_error(
        &self,
        arena: &ExprArena,
        array: &Expr,
        elements: &[Option<ExprId>],
        index: usize,
    ) -> ParseError {
        let previous = index
            .checked_sub(1)
            .and_then(|previous| elements[previous])
            .and_then(|previous| self.tokens.last_token(arena[previous].span));
        let before = previous.or_else(|| self.tokens.first_token(array.span));
        let comma = before.and_then(|before| self.tokens.token_after(before.range, Token::is_comma));
        let index = comma.map_or(array.span.start, |comma| comma.range.start);
        self.unexpected_token(",", index)
    }

    fn check_literal(
        &self,
        arena: &ExprArena,
        id: ExprId,
        value: &LiteralValue,
        raw: &str,
    ) -> Result<(), ParseError> {
        let expr = &arena[id];
        match value {
            LiteralValue::RegExp { .. } if !self.ctx.reg_exp_literals => {
                Err(self.unexpected_node(arena, id))
            }
            LiteralValue::BigInt(_) if !self.ctx.bigint_literals => {
                Err(self.unexpected_node(arena, id))
            }
            LiteralValue::Number(_) => self.check_number(expr.span, raw),
            LiteralValue::String(_) => self.check_string(expr, raw),
            _ => Ok(()),
        }
    }

    fn check_number(&self, span: Span, text: &str) -> Result<(), ParseError> {
        let ctx = self.ctx;
        if ctx.invalid_json_numbers && ctx.leading_or_trailing_decimal_points && ctx.numeric_separators
        {
            return Ok(());
        }
        if !ctx.leading_or_trailing_decimal_points {
            if text.starts_with('.') {
                return Err(self.unexpected_token(".", span.start));
            }
            if text.ends_with('.') {
                return Err(self.unexpected_token(".", span.end - 1));
            }
        }
        if !ctx.numeric_separators
            && let Some(index) = text.find('_')
        {
            return Err(self.unexpected_token("_", span.start + index));
        }
        let bytes = text.as_bytes();
        let second = bytes.get(1).copied();
        let leading_zero = bytes.first() == Some(&b'0');
        let rejected = if !ctx.octal_numeric_literals
            && leading_zero
            && matches!(second, Some(b'o' | b'O'))
        {
            Some("octal numeric literal")
        } else if !ctx.legacy_octal_numeric_literals
            && leading_zero
            && second.is_some_and(|c| c.is_ascii_digit())
        {
            Some("legacy octal numeric literal")
        } else if !ctx.binary_numeric_literals && leading_zero && matches!(second, Some(b'b' | b'B'))
        {
            Some("binary numeric literal")
        } else {
            None
        };
        if let Some(what) = rejected {
            return Err(self.error_at(ErrorKind::UnexpectedSyntax(what), span.start));
        }
        if !ctx.invalid_json_numbers && !is_json_number(text) {
            return Err(self.error_at(ErrorKind::InvalidNumber(text.to_string()), span.start));
        }
        Ok(())
    }

    fn check_string(&self, expr: &Expr, raw: &str) -> Result<(), ParseError> {
        let ctx = self.ctx;
        if !ctx.single_quotes && raw.starts_with('\'') {
            return Err(self.unexpected(ErrorKind::UnexpectedSyntax("single quoted"), expr));
        }
        if !ctx.multiline_strings && raw.contains(['\n', '\r', '\u{2028}', '\u{2029}']) {
            return Err(self.unexpected(ErrorKind::UnexpectedSyntax("multiline string"), expr));
        }
        self.check_code_point_escape(expr, raw)
    }

    fn check_code_point_escape(&self, expr: &Expr, raw: &str) -> Result<(), ParseError> {
        if !self.ctx.unicode_codepoint_escapes && has_code_point_escape(raw) {
            return Err(self.unexpected(
                ErrorKind::UnexpectedSyntax("unicode codepoint escape"),
                expr,
            ));
        }
        Ok(())
    }

    fn check_unary(
        &self,
        arena: &ExprArena,
        id: ExprId,
        operator: &str,
        argument: ExprId,
    ) -> Result<(), ParseError> {
        let expr = &arena[id];
        match operator {
            "+" if !self.ctx.plus_signs => return Err(self.unexpected_token("+", expr.span.start)),
            "+" | "-" => {}
            _ => return Err(self.unexpected_node(arena, id)),
        }
        let numeric = match &arena[argument].kind {
            ExprKind::Literal { value, .. } => matches!(value, LiteralValue::Number(_)),
            ExprKind::Identifier { name } => is_number_identifier(name, self.ctx),
            _ => false,
        };
        if !numeric {
            return Err(self.unexpected_node(arena, argument));
        }
        if !self.ctx.spaced_signs && expr.span.start + 1 < arena[argument].span.start {
            let end = self.tokens.first_token(expr.span).map_or(expr.span.start + 1, |t| t.range.end);
            return Err(self.error_at(ErrorKind::UnexpectedWhitespace, end));
        }
        Ok(())
    }

    fn check_template(
        &self,
        arena: &ExprArena,
        id: ExprId,
        quasis: &[ExprId],
        expressions: &[ExprId],
    ) -> Result<(), ParseError> {
        if !self.ctx.template_literals {
            return Err(self.unexpected_node(arena, id));
        }
        let Some(&first) = quasis.first() else {
            return Err(self.unexpected_node(arena, id));
        };
        if !expressions.is_empty() {
            let first_token = self.tokens.first_token(arena[first].span);
            let end = first_token.map_or(arena[first].span.end + 2, |token| token.range.end);
            return Err(self.unexpected_token("$", end.saturating_sub(2)));
        }
        match &arena[first].kind {
            ExprKind::TemplateElement { raw, .. } => self.check_code_point_escape(&arena[id], raw),
            _ => Ok(()),
        }
    }

    fn error_at(&self, kind: ErrorKind, index: usize) -> ParseError {
        ParseError::at(kind, index, self.lines)
    }

    fn unexpected(&self, kind: ErrorKind, expr: &Expr) -> ParseError {
        self.error_at(kind, expr.span.start)
    }

    fn unexpected_token(&self, name: &str, index: usize) -> ParseError {
        self.error_at(ErrorKind::UnexpectedToken(name.to_string()), index)
    }

    /// The error for a node that has no place in data at all, named as precisely as possible.
    pub(crate) fn unexpected_node(&self, arena: &ExprArena, id: ExprId) -> ParseError {
        let expr = &arena[id];
        let kind = match &expr.kind {
            ExprKind::Identifier { name } => ErrorKind::UnexpectedIdentifier(name.clone()),
            ExprKind::Literal { value, .. } => ErrorKind::UnexpectedLiteral(literal_kind(value)),
            ExprKind::TemplateLiteral { .. } => ErrorKind::UnexpectedTemplateLiteral,
            kind if is_named_expression(kind.type_name()) => {
                ErrorKind::UnexpectedExpression(humanize(kind.type_name()))
            }
            _ => {
                return match self.tokens.find_token_by_offset(expr.span.start) {
                    Some(token) => self.unexpected_token(&token.value, token.range.start),
                    None => self.unexpected_token("unknown", expr.span.start),
                };
            }
        };
        self.unexpected(kind, expr)
    }
}

fn is_named_expression(type_name: &str) -> bool {
    type_name.ends_with("Expression") && type_name != "FunctionExpression"
}

fn literal_kind(value: &LiteralValue) -> LiteralKind {
    match value {
        LiteralValue::String(_) => LiteralKind::String,
        LiteralValue::Number(_) => LiteralKind::Number,
        LiteralValue::Boolean(_) => LiteralKind::Boolean,
        LiteralValue::Null => LiteralKind::Null,
        LiteralValue::RegExp { .. } => LiteralKind::Regex,
        LiteralValue::BigInt(_) => LiteralKind::BigInt,
    }
}

/// `BinaryExpression` becomes `binary expression`.
pub(crate) fn humanize(type_name: &str) -> String {
    let name = type_name.strip_prefix("JSON").unwrap_or(type_name);
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            out.push(' ');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// `NaN` or `Infinity`, when the dialect allows them.
pub(crate) fn is_number_identifier(name: &str, ctx: &SyntaxContext) -> bool {
    (name == "Infinity" && ctx.infinities) || (name == "NaN" && ctx.nans)
}

/// `NaN`, `Infinity` or `undefined`, when the dialect allows them.
pub(crate) fn is_static_value_identifier(name: &str, ctx: &SyntaxContext) -> bool {
    is_number_identifier(name, ctx) || (name == "undefined" && ctx.undefined_keywords)
}

/// Whether `text` is a number in the strict JSON grammar.
fn is_json_number(text: &str) -> bool {
    fn digits(bytes: &[u8], mut i: usize) -> usize {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    }

    let bytes = text.as_bytes();
    let mut i = usize::from(bytes.first() == Some(&b'-'));
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i = digits(bytes, i + 1),
        _ => return false,
    }
    if bytes.get(i) == Some(&b'.') {
        let end = digits(bytes, i + 1);
        if end == i + 1 {
            return false;
        }
        i = end;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let end = digits(bytes, i);
        if end == i {
            return false;
        }
        i = end;
    }
    i == bytes.len()
}

/// Whether `raw` holds a `\u{...}` escape that is not itself escaped by a preceding backslash.
fn has_code_point_escape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let run_start = i;
        while bytes.get(i) == Some(&b'\\') {
            i += 1;
        }
        // In a run of backslashes only an odd-length run leaves the last one unescaped.
        if (i - run_start) % 2 == 1 && is_code_point_body(&bytes[i..]) {
            return true;
        }
    }
    false
}

/// Matches `u{` hex digits `}` at the start of `rest`.
fn is_code_point_body(rest: &[u8]) -> bool {
    let Some(body) = rest.strip_prefix(b"u{") else {
        return false;
    };
    let hex = body.iter().take_while(|b| b.is_ascii_hexdigit()).count();
    hex > 0 && body.get(hex) == Some(&b'}')
}
