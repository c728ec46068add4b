#![doc = include_str!("../README.md")]

mod error;
mod lexer;
mod node;
mod parser;
mod position;
mod token;

pub use error::SyntaxError;
pub use lexer::Lexer;
pub use node::{Expr, ExprArena, ExprId, ExprKind, LiteralValue, PropertyKind};
pub use parser::{
    DEFAULT_MAX_DEPTH, LATEST_ECMA_VERSION, NoopHooks, ParseHooks, Parsed, ParserOptions, first_token_at,
    parse_expression_at, tokenize,
};
pub use position::{LineIndex, Position, SourceLocation, Span, is_line_terminator};
pub use token::{KEYWORDS, RawComment, RawToken, RawTokenKind, keyword};
