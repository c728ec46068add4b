use super::{ParseHooks, Parser};
use crate::node::{ExprId, ExprKind};
use crate::token::RawTokenKind;

const ASSIGN_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=", "||=",
    "??=",
];

const COALESCE_MIX: &str =
    "Logical expressions and coalesce expressions cannot be mixed. Wrap either by parentheses";

fn binary_precedence(kind: &RawTokenKind) -> Option<(&'static str, u8)> {
    let operator = match kind {
        RawTokenKind::Punct(punct) => *punct,
        RawTokenKind::Keyword(word @ ("in" | "instanceof")) => *word,
        _ => return None,
    };
    let precedence = match operator {
        "||" => 1,
        "&&" | "??" => 2,
        "|" => 3,
        "^" => 4,
        "&" => 5,
        "==" | "!=" | "===" | "!==" => 6,
        "<" | ">" | "<=" | ">=" | "in" | "instanceof" => 7,
        "<<" | ">>" | ">>>" => 8,
        "+" | "-" => 9,
        "*" | "/" | "%" => 10,
        _ => return None,
    };
    Some((operator, precedence))
}

fn prefix_operator(kind: &RawTokenKind) -> Option<&'static str> {
    match kind {
        RawTokenKind::Punct(punct @ ("!" | "~" | "+" | "-" | "++" | "--")) => Some(*punct),
        RawTokenKind::Keyword(word @ ("typeof" | "void" | "delete")) => Some(*word),
        _ => None,
    }
}

impl<H: ParseHooks> Parser<'_, '_, H> {
    pub(super) fn parse_expression(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        let first = self.parse_maybe_assign()?;
        if !self.token.is_punct(",") {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(",")? {
            expressions.push(self.parse_maybe_assign()?);
        }
        self.finish(start, ExprKind::Sequence { expressions })
    }

    pub(super) fn parse_maybe_assign(&mut self) -> Result<ExprId, H::Error> {
        self.nested(Self::parse_assign)
    }

    fn parse_assign(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        if self.token.is_punct("(") || matches!(self.token.kind, RawTokenKind::Name { .. }) {
            self.potential_arrow_at = Some(start);
        }
        let left = self.parse_maybe_conditional()?;
        let RawTokenKind::Punct(operator) = self.token.kind else {
            return Ok(left);
        };
        if !ASSIGN_OPERATORS.contains(&operator) {
            return Ok(left);
        }
        self.check_assign_target(left, operator == "=")?;
        self.next()?;
        let right = self.parse_maybe_assign()?;
        self.finish(
            start,
            ExprKind::Assignment {
                operator,
                left,
                right,
            },
        )
    }

    fn check_assign_target(&mut self, target: ExprId, allow_pattern: bool) -> Result<(), H::Error> {
        let expr = &self.arena[target];
        let assignable = match expr.kind {
            ExprKind::Identifier { .. } | ExprKind::Member { .. } => true,
            ExprKind::Object { .. } | ExprKind::Array { .. } => allow_pattern,
            _ => false,
        };
        if assignable {
            return Ok(());
        }
        let pos = expr.span.start;
        Err(self.hooks.raise(pos, "Assigning to rvalue"))
    }

    fn parse_maybe_conditional(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        let test = self.parse_expr_ops()?;
        if !self.eat("?")? {
            return Ok(test);
        }
        let consequent = self.parse_maybe_assign()?;
        self.expect(":")?;
        let alternate = self.parse_maybe_assign()?;
        self.finish(
            start,
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            },
        )
    }

    fn parse_expr_ops(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        let expr = self.parse_maybe_unary(false, false)?;
        let node = &self.arena[expr];
        if node.span.start == start && matches!(node.kind, ExprKind::ArrowFunction { .. }) {
            return Ok(expr);
        }
        self.parse_expr_op(expr, start, 0)
    }

    fn parse_expr_op(
        &mut self,
        left: ExprId,
        left_start: usize,
        min_precedence: u8,
    ) -> Result<ExprId, H::Error> {
        let mut left = left;
        while let Some((operator, precedence)) = binary_precedence(&self.token.kind) {
            if precedence <= min_precedence {
                break;
            }
            let logical = matches!(operator, "||" | "&&");
            let coalesce = operator == "??";
            self.next()?;
            let right_start = self.start();
            let operand = self.parse_maybe_unary(false, false)?;
            let right = self.parse_expr_op(operand, right_start, precedence)?;
            let kind = if logical || coalesce {
                ExprKind::Logical {
                    operator,
                    left,
                    right,
                }
            } else {
                ExprKind::Binary {
                    operator,
                    left,
                    right,
                }
            };
            left = self.finish(left_start, kind)?;
            let mixed = (logical && self.token.is_punct("??"))
                || (coalesce && (self.token.is_punct("||") || self.token.is_punct("&&")));
            if mixed {
                let pos = self.start();
                return Err(self.hooks.raise(pos, COALESCE_MIX));
            }
        }
        Ok(left)
    }

    /// Parses a unary expression, including `**`, which binds tighter than any binary operator
    /// but may not follow an unparenthesized unary operator.
    pub(super) fn parse_maybe_unary(
        &mut self,
        saw_unary: bool,
        inc_dec: bool,
    ) -> Result<ExprId, H::Error> {
        let start = self.start();
        let mut saw_unary = saw_unary;
        let expr = match prefix_operator(&self.token.kind) {
            Some(operator @ ("++" | "--")) => {
                self.next()?;
                let argument = self.nested(|p| p.parse_maybe_unary(true, true))?;
                self.check_update_target(argument)?;
                self.finish(
                    start,
                    ExprKind::Update {
                        operator,
                        prefix: true,
                        argument,
                    },
                )?
            }
            Some(operator) => {
                self.next()?;
                let argument = self.nested(|p| p.parse_maybe_unary(true, false))?;
                saw_unary = true;
                self.finish(start, ExprKind::Unary { operator, argument })?
            }
            None => self.parse_postfix(start)?,
        };
        if inc_dec || !self.token.is_punct("**") {
            return Ok(expr);
        }
        if saw_unary {
            let pos = self.start();
            return Err(self.unexpected_at(pos));
        }
        self.next()?;
        let right = self.nested(|p| p.parse_maybe_unary(false, false))?;
        self.finish(
            start,
            ExprKind::Binary {
                operator: "**",
                left: expr,
                right,
            },
        )
    }

    fn parse_postfix(&mut self, start: usize) -> Result<ExprId, H::Error> {
        let mut expr = self.parse_expr_subscripts()?;
        while let RawTokenKind::Punct(operator @ ("++" | "--")) = self.token.kind {
            if self.newline_before() {
                break;
            }
            self.check_update_target(expr)?;
            self.next()?;
            expr = self.finish(
                start,
                ExprKind::Update {
                    operator,
                    prefix: false,
                    argument: expr,
                },
            )?;
        }
        Ok(expr)
    }

    fn check_update_target(&mut self, target: ExprId) -> Result<(), H::Error> {
        let expr = &self.arena[target];
        if matches!(
            expr.kind,
            ExprKind::Identifier { .. } | ExprKind::Member { .. }
        ) {
            return Ok(());
        }
        let pos = expr.span.start;
        Err(self.hooks.raise(pos, "Assigning to rvalue"))
    }

    pub(super) fn parse_expr_subscripts(&mut self) -> Result<ExprId, H::Error> {
        let start = self.start();
        let base = self.parse_expr_atom()?;
        if matches!(self.arena[base].kind, ExprKind::ArrowFunction { .. }) {
            return Ok(base);
        }
        self.parse_subscripts(base, start, false)
    }

    pub(super) fn parse_subscripts(
        &mut self,
        base: ExprId,
        start: usize,
        no_calls: bool,
    ) -> Result<ExprId, H::Error> {
        let mut base = base;
        let mut optional_chained = false;
        loop {
            let (element, optional) =
                self.parse_subscript(base, start, no_calls, optional_chained)?;
            optional_chained |= optional;
            if element == base {
                if optional_chained {
                    return self.finish(start, ExprKind::Chain { expression: element });
                }
                return Ok(element);
            }
            base = element;
        }
    }

    /// Parses at most one member access, call or tagged template applied to `base`.
    fn parse_subscript(
        &mut self,
        base: ExprId,
        start: usize,
        no_calls: bool,
        optional_chained: bool,
    ) -> Result<(ExprId, bool), H::Error> {
        let optional = self.eat("?.")?;
        if no_calls && optional {
            let pos = self.last_start;
            return Err(self.hooks.raise(
                pos,
                "Optional chaining cannot appear in the callee of new expressions",
            ));
        }
        let computed = self.eat("[")?;
        let continues_chain = optional
            && !self.token.is_punct("(")
            && !matches!(self.token.kind, RawTokenKind::BackQuote);
        if computed || continues_chain || self.eat(".")? {
            let property = if computed {
                let property = self.parse_expression()?;
                self.expect("]")?;
                property
            } else {
                self.parse_ident(true)?
            };
            let member = ExprKind::Member {
                object: base,
                property,
                computed,
                optional,
            };
            return Ok((self.finish(start, member)?, optional));
        }
        if !no_calls && self.eat("(")? {
            let arguments = self
                .parse_expr_list(")", self.ecma_version >= 2017, false)?
                .into_iter()
                .flatten()
                .collect();
            let call = ExprKind::Call {
                callee: base,
                arguments,
                optional,
            };
            return Ok((self.finish(start, call)?, optional));
        }
        if matches!(self.token.kind, RawTokenKind::BackQuote) {
            if optional || optional_chained {
                let pos = self.start();
                return Err(self.hooks.raise(
                    pos,
                    "Optional chaining cannot appear in the tag of tagged template expressions",
                ));
            }
            let quasi = self.parse_template(true)?;
            let tagged = ExprKind::TaggedTemplate { tag: base, quasi };
            return Ok((self.finish(start, tagged)?, false));
        }
        Ok((base, false))
    }
}
