//! Expression parser driven by [`ParseHooks`].
//!
//! The grammar is the ECMAScript expression grammar in non-strict script mode. Node spans run from
//! the first token of a production to the end of the last token it consumed.

mod atom;
mod collection;
mod expression;

use crate::error::SyntaxError;
use crate::lexer::Lexer;
use crate::node::{Expr, ExprArena, ExprId, ExprKind};
use crate::position::{Span, is_line_terminator};
use crate::token::{RawComment, RawToken, RawTokenKind};

/// Newest language edition the lexer and parser understand.
pub const LATEST_ECMA_VERSION: u32 = 2025;

/// Default for [`ParserOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

const NESTING_TOO_DEEP: &str = "Maximum nesting depth exceeded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Language edition as a year, e.g. `2015`.
    pub ecma_version: u32,
    /// How many expressions may be open inside one another. Each array element, property value,
    /// operand of a prefix operator and parenthesized item opens one level.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            ecma_version: LATEST_ECMA_VERSION,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Callbacks a caller supplies to observe and police a parse.
///
/// Every callback may fail; the first failure aborts the parse and is returned unchanged.
pub trait ParseHooks {
    type Error;

    /// Called for each token at the moment the parser consumes it.
    fn on_token(&mut self, _token: &RawToken) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for each comment as the lexer skips it.
    fn on_comment(&mut self, _comment: &RawComment) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once per node, right after the node and all of its children are complete.
    fn on_node(&mut self, _arena: &ExprArena, _id: ExprId) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Builds the error for a failure at `pos`.
    fn raise(&mut self, pos: usize, message: &str) -> Self::Error;

    /// Builds the error for a token that cannot continue the current production.
    fn unexpected(&mut self, token: &RawToken) -> Self::Error;
}

/// Hooks that accept everything and report plain [`SyntaxError`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl ParseHooks for NoopHooks {
    type Error = SyntaxError;

    fn raise(&mut self, pos: usize, message: &str) -> SyntaxError {
        SyntaxError::new(pos, message)
    }

    fn unexpected(&mut self, token: &RawToken) -> SyntaxError {
        SyntaxError::new(token.span.start, "Unexpected token")
    }
}

/// Result of [`parse_expression_at`].
#[derive(Debug, Clone)]
pub struct Parsed {
    pub arena: ExprArena,
    pub root: ExprId,
    /// End offset of the last token the expression consumed.
    pub end: usize,
}

/// Parses one expression starting at `offset`.
///
/// Parsing stops at the first token that cannot continue the expression; that token is lexed (so
/// comments before it are reported) but not consumed, and end of input is not required.
///
/// # Errors
///
/// Returns whatever error the hooks produce for the first rejected token, comment or node.
pub fn parse_expression_at<H: ParseHooks>(
    source: &str,
    offset: usize,
    options: &ParserOptions,
    hooks: &mut H,
) -> Result<Parsed, H::Error> {
    let mut parser = Parser::new(source, offset, options, hooks)?;
    let root = parser.parse_expression()?;
    Ok(Parsed {
        end: parser.last_end,
        root,
        arena: parser.arena,
    })
}

/// Lexes the first token at or after `offset`, reporting any comments skipped on the way.
///
/// # Errors
///
/// Returns the hooks' error for a rejected comment or malformed token text.
pub fn first_token_at<H: ParseHooks>(
    source: &str,
    offset: usize,
    options: &ParserOptions,
    hooks: &mut H,
) -> Result<RawToken, H::Error> {
    let parser = Parser::new(source, offset, options, hooks)?;
    Ok(parser.token)
}

/// Lexes the whole source, passing every token except the end marker to `on_token`.
///
/// # Errors
///
/// Returns the hooks' error for a rejected token or comment, or for malformed token text.
pub fn tokenize<H: ParseHooks>(
    source: &str,
    options: &ParserOptions,
    hooks: &mut H,
) -> Result<(), H::Error> {
    let mut parser = Parser::new(source, 0, options, hooks)?;
    while !parser.token.is_eof() {
        parser.next()?;
    }
    Ok(())
}

struct Parser<'src, 'h, H: ParseHooks> {
    source: &'src str,
    lexer: Lexer<'src>,
    hooks: &'h mut H,
    arena: ExprArena,
    /// The lookahead token, lexed but not yet consumed.
    token: RawToken,
    last_start: usize,
    last_end: usize,
    ecma_version: u32,
    depth: usize,
    max_depth: usize,
    /// Start offset at which an arrow function head may begin.
    potential_arrow_at: Option<usize>,
}

impl<'src, 'h, H: ParseHooks> Parser<'src, 'h, H> {
    fn new(
        source: &'src str,
        offset: usize,
        options: &ParserOptions,
        hooks: &'h mut H,
    ) -> Result<Self, H::Error> {
        let offset = offset.min(source.len());
        let mut parser = Self {
            source,
            lexer: Lexer::new(source, offset, options.ecma_version),
            hooks,
            arena: ExprArena::default(),
            token: RawToken {
                kind: RawTokenKind::Eof,
                span: Span::new(offset, offset),
            },
            last_start: offset,
            last_end: offset,
            ecma_version: options.ecma_version,
            depth: 0,
            max_depth: options.max_depth,
            potential_arrow_at: None,
        };
        parser.token = parser.lex()?;
        Ok(parser)
    }

    /// Pulls the next token, reporting skipped comments before any lexical error.
    fn lex(&mut self) -> Result<RawToken, H::Error> {
        let result = self.lexer.next_token();
        for comment in self.lexer.take_comments() {
            self.hooks.on_comment(&comment)?;
        }
        result.map_err(|error| self.hooks.raise(error.pos, &error.message))
    }

    /// Consumes the lookahead token.
    fn next(&mut self) -> Result<(), H::Error> {
        self.hooks.on_token(&self.token)?;
        self.last_start = self.token.span.start;
        self.last_end = self.token.span.end;
        self.token = self.lex()?;
        Ok(())
    }

    fn eat(&mut self, punct: &str) -> Result<bool, H::Error> {
        if self.token.is_punct(punct) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, punct: &str) -> Result<(), H::Error> {
        if self.eat(punct)? {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&mut self) -> H::Error {
        self.hooks.unexpected(&self.token)
    }

    fn unexpected_at(&mut self, pos: usize) -> H::Error {
        self.hooks.raise(pos, "Unexpected token.")
    }

    /// Runs `parse` one nesting level deeper, failing at the current token once the limit is hit.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, H::Error>,
    ) -> Result<T, H::Error> {
        if self.depth >= self.max_depth {
            let pos = self.start();
            return Err(self.hooks.raise(pos, NESTING_TOO_DEEP));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn start(&self) -> usize {
        self.token.span.start
    }

    fn finish(&mut self, start: usize, kind: ExprKind) -> Result<ExprId, H::Error> {
        self.finish_span(Span::new(start, self.last_end), kind)
    }

    fn finish_span(&mut self, span: Span, kind: ExprKind) -> Result<ExprId, H::Error> {
        let id = self.arena.push(Expr { kind, span });
        self.hooks.on_node(&self.arena, id)?;
        Ok(id)
    }

    /// Duplicates a node without reporting it, as shorthand properties do with their key.
    fn copy_node(&mut self, id: ExprId) -> ExprId {
        let expr = self.arena[id].clone();
        self.arena.push(expr)
    }

    fn newline_before(&self) -> bool {
        self.source
            .get(self.last_end..self.token.span.start)
            .is_some_and(|gap| gap.contains(is_line_terminator))
    }

    fn can_insert_semicolon(&self) -> bool {
        self.token.is_eof() || self.token.is_punct("}") || self.newline_before()
    }
}
