use super::{ParseHooks, Parser};
use crate::node::{ExprId, ExprKind, LiteralValue};
use crate::position::Span;
use crate::token::RawTokenKind;

impl<H: ParseHooks> Parser<'_, '_, H> {
    pub(super) fn parse_expr_atom(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        if let RawTokenKind::Keyword(word) = self.token.kind {
            return self.parse_keyword_atom(word, start);
        }
        match self.token.kind {
            RawTokenKind::Name { .. } => self.parse_name_atom(start),
            RawTokenKind::String(_)
            | RawTokenKind::Num(_)
            | RawTokenKind::BigInt(_)
            | RawTokenKind::Regex { .. } => self.parse_literal(),
            RawTokenKind::Punct("(") => self.parse_paren(start),
            RawTokenKind::Punct("[") => self.parse_array(start),
            RawTokenKind::Punct("{") => self.parse_object(start),
            RawTokenKind::BackQuote => self.parse_template(false),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_keyword_atom(&mut self, word: &'static str, start: usize) -> Result<ExprId, H::Error> {
        match word {
            "this" => {
                self.next()?;
                self.finish(start, ExprKind::This)
            }
            "true" | "false" | "null" => self.parse_literal(),
            "function" => self.parse_function(start),
            "class" => self.parse_class(start),
            "new" => self.parse_new(start),
            _ => Err(self.unexpected()),
        }
    }

    pub(super) fn parse_literal(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        let raw = self.token.text(self.source).to_string();
        let value = match &self.token.kind {
            RawTokenKind::String(value) => LiteralValue::String(value.clone()),
            RawTokenKind::Num(value) => LiteralValue::Number(*value),
            RawTokenKind::BigInt(digits) => LiteralValue::BigInt(digits.clone()),
            RawTokenKind::Regex { pattern, flags } => LiteralValue::RegExp {
                pattern: pattern.clone(),
                flags: flags.clone(),
            },
            RawTokenKind::Keyword("true") => LiteralValue::Boolean(true),
            RawTokenKind::Keyword("false") => LiteralValue::Boolean(false),
            RawTokenKind::Keyword("null") => LiteralValue::Null,
            _ => return Err(self.unexpected()),
        };
        self.next()?;
        self.finish(start, ExprKind::Literal { value, raw })
    }

    /// Parses an identifier. `liberal` also accepts reserved words, as in property names.
    pub(super) fn parse_ident(&mut self, liberal: bool) -> Result<ExprId, H::Error> {
        let start = self.start();
        let name = match &self.token.kind {
            RawTokenKind::Name { name, .. } => name.clone(),
            RawTokenKind::Keyword(word) if liberal => (*word).to_string(),
            _ => return Err(self.unexpected()),
        };
        self.next()?;
        self.finish(start, ExprKind::Identifier { name })
    }

    fn parse_name_atom(&mut self, start: usize) -> Result<ExprId, H::Error> {
        let can_be_arrow = self.potential_arrow_at == Some(start);
        let id = self.parse_ident(false)?;
        if can_be_arrow
            && self.ecma_version >= 2015
            && !self.can_insert_semicolon()
            && self.eat("=>")?
        {
            return self.parse_arrow(start, vec![id]);
        }
        Ok(id)
    }

    fn parse_arrow(&mut self, start: usize, params: Vec<ExprId>) -> Result<ExprId, H::Error> {
        let (body, expression) = if self.token.is_punct("{") {
            (self.parse_block()?, false)
        } else {
            (self.parse_maybe_assign()?, true)
        };
        self.finish(
            start,
            ExprKind::ArrowFunction {
                params,
                body,
                expression,
            },
        )
    }

    /// Parses `{}`. Statements are outside the expression grammar, so anything inside the braces
    /// is rejected at its first token.
    fn parse_block(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        self.expect("{")?;
        if !self.token.is_punct("}") {
            return Err(self.unexpected());
        }
        self.next()?;
        self.finish(start, ExprKind::Block)
    }

    fn parse_paren(&mut self, start: usize) -> Result<ExprId, H::Error> {
        let can_be_arrow = self.potential_arrow_at == Some(start);
        self.next()?;
        let inner_start = self.start();
        let mut items = Vec::new();
        let mut trailing_comma = false;
        let mut spread_start = None;
        while !self.token.is_punct(")") {
            if !items.is_empty() {
                self.expect(",")?;
            }
            if self.ecma_version >= 2017 && self.token.is_punct(")") {
                trailing_comma = true;
                break;
            }
            if self.token.is_punct("...") {
                spread_start = Some(self.start());
                items.push(self.parse_rest()?);
                self.reject_comma_after_rest()?;
                break;
            }
            items.push(self.parse_maybe_assign()?);
        }
        let inner_end = self.last_end;
        self.expect(")")?;
        if can_be_arrow && !self.can_insert_semicolon() && self.eat("=>")? {
            let params = self.to_params(items)?;
            return self.parse_arrow(start, params);
        }
        if items.is_empty() || trailing_comma {
            let pos = self.last_start;
            return Err(self.unexpected_at(pos));
        }
        if let Some(pos) = spread_start {
            return Err(self.unexpected_at(pos));
        }
        if items.len() > 1 {
            return self.finish_span(
                Span::new(inner_start, inner_end),
                ExprKind::Sequence { expressions: items },
            );
        }
        Ok(items[0])
    }

    /// Reinterprets parenthesized expressions as arrow parameters.
    fn to_params(&mut self, items: Vec<ExprId>) -> Result<Vec<ExprId>, H::Error> {
        for &item in &items {
            let expr = &self.arena[item];
            let pattern = match expr.kind {
                ExprKind::Identifier { .. } | ExprKind::Rest { .. } => continue,
                ExprKind::Assignment {
                    operator: "=",
                    left,
                    right,
                } if matches!(self.arena[left].kind, ExprKind::Identifier { .. }) => {
                    ExprKind::AssignmentPattern { left, right }
                }
                _ => {
                    let pos = expr.span.start;
                    return Err(self.hooks.raise(pos, "Assigning to rvalue"));
                }
            };
            if let Some(expr) = self.arena.get_mut(item) {
                expr.kind = pattern;
            }
        }
        Ok(items)
    }

    fn reject_comma_after_rest(&mut self) -> Result<(), H::Error> {
        if self.token.is_punct(",") {
            let pos = self.start();
            return Err(self
                .hooks
                .raise(pos, "Comma is not permitted after the rest element"));
        }
        Ok(())
    }

    fn parse_rest(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        self.next()?;
        let argument = self.parse_ident(false)?;
        self.finish(start, ExprKind::Rest { argument })
    }

    fn parse_params(&mut self) -> Result<Vec<ExprId>, H::Error> {
        self.expect("(")?;
        let mut params = Vec::new();
        while !self.eat(")")? {
            if !params.is_empty() {
                self.expect(",")?;
                if self.ecma_version >= 2017 && self.eat(")")? {
                    break;
                }
            }
            if self.token.is_punct("...") {
                params.push(self.parse_rest()?);
                self.reject_comma_after_rest()?;
                self.expect(")")?;
                break;
            }
            params.push(self.parse_param()?);
        }
        Ok(params)
    }

    fn parse_param(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        let left = self.parse_ident(false)?;
        if !self.eat("=")? {
            return Ok(left);
        }
        let right = self.parse_maybe_assign()?;
        self.finish(start, ExprKind::AssignmentPattern { left, right })
    }

    /// Parses the parameter list and body of a method; the node starts at `(`.
    pub(super) fn parse_method(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        self.finish(
            start,
            ExprKind::Function {
                id: None,
                params,
                body,
            },
        )
    }

    fn parse_function(&mut self, start: usize) -> Result<ExprId, H::Error> {
        self.next()?;
        self.eat("*")?;
        let id = if matches!(self.token.kind, RawTokenKind::Name { .. }) {
            Some(self.parse_ident(false)?)
        } else {
            None
        };
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        self.finish(start, ExprKind::Function { id, params, body })
    }

    fn parse_class(&mut self, start: usize) -> Result<ExprId, H::Error> {
        self.next()?;
        let id = if matches!(self.token.kind, RawTokenKind::Name { .. }) {
            Some(self.parse_ident(false)?)
        } else {
            None
        };
        let super_class = if self.token.is_keyword("extends") {
            self.next()?;
            Some(self.nested(Self::parse_expr_subscripts)?)
        } else {
            None
        };
        let body_start = self.start();
        self.expect("{")?;
        if !self.token.is_punct("}") {
            return Err(self.unexpected());
        }
        self.next()?;
        let body = self.finish(body_start, ExprKind::ClassBody)?;
        self.finish(
            start,
            ExprKind::Class {
                id,
                super_class,
                body,
            },
        )
    }

    fn parse_new(&mut self, start: usize) -> Result<ExprId, H::Error> {
        self.next()?;
        if self.token.is_punct(".") {
            return Err(self.unexpected());
        }
        let callee_start = self.start();
        let atom = self.nested(Self::parse_expr_atom)?;
        let callee = self.parse_subscripts(atom, callee_start, true)?;
        let arguments = if self.eat("(")? {
            self.parse_expr_list(")", self.ecma_version >= 2017, false)?
                .into_iter()
                .flatten()
                .collect()
        } else {
            Vec::new()
        };
        self.finish(start, ExprKind::New { callee, arguments })
    }
}
