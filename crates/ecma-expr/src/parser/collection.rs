use super::{ParseHooks, Parser};
use crate::node::{ExprId, ExprKind, LiteralValue, PropertyKind};
use crate::token::RawTokenKind;

/// Errors that only apply when an object literal turns out not to be an assignment target.
#[derive(Debug, Default)]
struct PatternErrors {
    shorthand_assign: Option<usize>,
    double_proto: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct PropertyHead {
    key: ExprId,
    computed: bool,
    generator: bool,
    is_async: bool,
    escaped: bool,
}

#[derive(Debug, Clone, Copy)]
enum PropertyShape {
    Init,
    Method,
    Accessor(PropertyKind),
    Shorthand,
}

impl<H: ParseHooks> Parser<'_, '_, H> {
    pub(super) fn parse_array(&mut self, start: usize) -> Result<ExprId, H::Error> {
        self.next()?;
        let elements = self.parse_expr_list("]", true, true)?;
        self.finish(start, ExprKind::Array { elements })
    }

    /// Parses comma-separated items up to `close`. The opening token is already consumed.
    pub(super) fn parse_expr_list(
        &mut self,
        close: &str,
        allow_trailing_comma: bool,
        allow_empty: bool,
    ) -> Result<Vec<Option<ExprId>>, H::Error> {
        let mut elements = Vec::new();
        let mut first = true;
        while !self.eat(close)? {
            if first {
                first = false;
            } else {
                self.expect(",")?;
                if allow_trailing_comma && self.eat(close)? {
                    break;
                }
            }
            let element = if allow_empty && self.token.is_punct(",") {
                None
            } else if self.token.is_punct("...") {
                Some(self.parse_spread()?)
            } else {
                Some(self.parse_maybe_assign()?)
            };
            elements.push(element);
        }
        Ok(elements)
    }

    fn parse_spread(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        self.next()?;
        let argument = self.parse_maybe_assign()?;
        self.finish(start, ExprKind::Spread { argument })
    }

    pub(super) fn parse_object(&mut self, start: usize) -> Result<ExprId, H::Error> {
        self.next()?;
        let mut properties = Vec::new();
        let mut errors = PatternErrors::default();
        let mut has_proto = false;
        while !self.eat("}")? {
            if !properties.is_empty() {
                self.expect(",")?;
                if self.eat("}")? {
                    break;
                }
            }
            let property = self.parse_property(&mut errors)?;
            if let Some(pos) = self.proto_key_start(property) {
                if has_proto {
                    errors.double_proto.get_or_insert(pos);
                }
                has_proto = true;
            }
            properties.push(property);
        }
        let object = self.finish(start, ExprKind::Object { properties })?;
        if self.token.is_punct("=") {
            return Ok(object);
        }
        if let Some(pos) = errors.shorthand_assign {
            return Err(self.hooks.raise(
                pos,
                "Shorthand property assignments are valid only in destructuring patterns",
            ));
        }
        if let Some(pos) = errors.double_proto {
            return Err(self.hooks.raise(pos, "Redefinition of __proto__ property"));
        }
        Ok(object)
    }

    /// Start of the key when `property` is a plain `__proto__: value` entry.
    fn proto_key_start(&self, property: ExprId) -> Option<usize> {
        let ExprKind::Property {
            key,
            kind: PropertyKind::Init,
            computed: false,
            method: false,
            shorthand: false,
            ..
        } = self.arena[property].kind
        else {
            return None;
        };
        let key = &self.arena[key];
        let is_proto = match &key.kind {
            ExprKind::Identifier { name } => name == "__proto__",
            ExprKind::Literal {
                value: LiteralValue::String(value),
                ..
            } => value == "__proto__",
            _ => false,
        };
        is_proto.then_some(key.span.start)
    }

    fn parse_property(&mut self, errors: &mut PatternErrors) -> Result<ExprId, H::Error> {
        let start = self.start();
        if self.ecma_version >= 2018 && self.token.is_punct("...") {
            return self.parse_spread();
        }
        let mut generator = self.ecma_version >= 2015 && self.eat("*")?;
        let escaped = matches!(self.token.kind, RawTokenKind::Name { escaped: true, .. });
        let (mut key, mut computed) = self.parse_property_name()?;
        let mut is_async = false;
        if !escaped && self.ecma_version >= 2017 && !generator && self.is_async_prop(key, computed)
        {
            is_async = true;
            generator = self.ecma_version >= 2018 && self.eat("*")?;
            (key, computed) = self.parse_property_name()?;
        }
        let head = PropertyHead {
            key,
            computed,
            generator,
            is_async,
            escaped,
        };
        self.parse_property_value(start, head, errors)
    }

    fn parse_property_name(&mut self) -> Result<(ExprId, bool), H::Error> {
        if self.ecma_version >= 2015 && self.eat("[")? {
            let key = self.parse_maybe_assign()?;
            self.expect("]")?;
            return Ok((key, true));
        }
        let key = match self.token.kind {
            RawTokenKind::String(_) | RawTokenKind::Num(_) | RawTokenKind::BigInt(_) => {
                self.parse_literal()?
            }
            _ => self.parse_ident(true)?,
        };
        Ok((key, false))
    }

    fn is_async_prop(&self, key: ExprId, computed: bool) -> bool {
        let named_async =
            matches!(&self.arena[key].kind, ExprKind::Identifier { name } if name == "async");
        let key_follows = match self.token.kind {
            RawTokenKind::Name { .. }
            | RawTokenKind::Num(_)
            | RawTokenKind::String(_)
            | RawTokenKind::BigInt(_)
            | RawTokenKind::Keyword(_)
            | RawTokenKind::Punct("[") => true,
            RawTokenKind::Punct("*") => self.ecma_version >= 2018,
            _ => false,
        };
        !computed && named_async && key_follows && !self.newline_before()
    }

    fn accessor_kind(&self, head: PropertyHead) -> Option<PropertyKind> {
        if head.escaped || head.computed {
            return None;
        }
        if self.token.is_punct(",") || self.token.is_punct("}") || self.token.is_punct("=") {
            return None;
        }
        match &self.arena[head.key].kind {
            ExprKind::Identifier { name } if name == "get" => Some(PropertyKind::Get),
            ExprKind::Identifier { name } if name == "set" => Some(PropertyKind::Set),
            _ => None,
        }
    }

    fn parse_property_value(
        &mut self,
        start: usize,
        head: PropertyHead,
        errors: &mut PatternErrors,
    ) -> Result<ExprId, H::Error> {
        let modified = head.generator || head.is_async;
        if modified && self.token.is_punct(":") {
            return Err(self.unexpected());
        }
        if self.eat(":")? {
            let value = self.parse_maybe_assign()?;
            return self.finish_property(start, head, value, PropertyShape::Init);
        }
        if self.ecma_version >= 2015 && self.token.is_punct("(") {
            let value = self.parse_method()?;
            return self.finish_property(start, head, value, PropertyShape::Method);
        }
        if let Some(kind) = self.accessor_kind(head) {
            if modified {
                return Err(self.unexpected());
            }
            let (key, computed) = self.parse_property_name()?;
            let value = self.parse_method()?;
            let head = PropertyHead {
                key,
                computed,
                ..head
            };
            return self.finish_property(start, head, value, PropertyShape::Accessor(kind));
        }
        let is_identifier = matches!(self.arena[head.key].kind, ExprKind::Identifier { .. });
        if self.ecma_version < 2015 || head.computed || !is_identifier || modified {
            return Err(self.unexpected());
        }
        self.check_unreserved(head.key)?;
        let copy = self.copy_node(head.key);
        let value = if self.token.is_punct("=") {
            errors.shorthand_assign.get_or_insert(self.start());
            self.next()?;
            let right = self.parse_maybe_assign()?;
            self.finish(start, ExprKind::AssignmentPattern { left: copy, right })?
        } else {
            copy
        };
        self.finish_property(start, head, value, PropertyShape::Shorthand)
    }

    fn check_unreserved(&mut self, key: ExprId) -> Result<(), H::Error> {
        let expr = &self.arena[key];
        if let ExprKind::Identifier { name } = &expr.kind
            && crate::token::keyword(name).is_some()
        {
            let message = format!("Unexpected keyword '{name}'");
            let pos = expr.span.start;
            return Err(self.hooks.raise(pos, &message));
        }
        Ok(())
    }

    fn finish_property(
        &mut self,
        start: usize,
        head: PropertyHead,
        value: ExprId,
        shape: PropertyShape,
    ) -> Result<ExprId, H::Error> {
        let (kind, method, shorthand) = match shape {
            PropertyShape::Init => (PropertyKind::Init, false, false),
            PropertyShape::Method => (PropertyKind::Init, true, false),
            PropertyShape::Accessor(kind) => (kind, false, false),
            PropertyShape::Shorthand => (PropertyKind::Init, false, true),
        };
        self.finish(
            start,
            ExprKind::Property {
                key: head.key,
                value,
                kind,
                computed: head.computed,
                method,
                shorthand,
            },
        )
    }

    /// Parses a template literal starting at its opening backquote.
    pub(super) fn parse_template(&mut self, tagged: bool) -> Result<ExprId, H::Error> {
        let start = self.start();
        self.next()?;
        let (element, mut tail) = self.parse_template_element(tagged)?;
        let mut quasis = vec![element];
        let mut expressions = Vec::new();
        while !tail {
            if !matches!(self.token.kind, RawTokenKind::DollarBraceL) {
                return Err(self.unexpected());
            }
            self.next()?;
            expressions.push(self.parse_expression()?);
            self.expect("}")?;
            let (element, is_tail) = self.parse_template_element(tagged)?;
            quasis.push(element);
            tail = is_tail;
        }
        self.next()?;
        self.finish(
            start,
            ExprKind::TemplateLiteral {
                quasis,
                expressions,
            },
        )
    }

    fn parse_template_element(&mut self, tagged: bool) -> Result<(ExprId, bool), H::Error> {
        let start = self.start();
        let RawTokenKind::Template { raw, cooked } = &self.token.kind else {
            return Err(self.unexpected());
        };
        let (raw, cooked) = (raw.clone(), cooked.clone());
        if cooked.is_none() && !tagged {
            return Err(self
                .hooks
                .raise(start, "Bad escape sequence in untagged template literal"));
        }
        self.next()?;
        let tail = matches!(self.token.kind, RawTokenKind::BackQuote);
        let element = self.finish(start, ExprKind::TemplateElement { raw, cooked, tail })?;
        Ok((element, tail))
    }
}
