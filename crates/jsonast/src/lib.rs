#![doc = include_str!("../README.md")]
#![allow(unused_assignments)] // thiserror/miette derive macros trigger false positives

pub mod ast;
mod convert;
mod error;
mod hooks;
mod options;
mod parser;
pub mod static_value;
mod syntax_context;
mod token;
mod token_convert;
pub mod token_store;
pub mod traverse;
pub mod visitor_keys;
mod validate;

pub use ast::{Ast, LiteralValue, Node, NodeId, NodeKind, NodeRef, UnaryOperator};
pub use ecma_expr::{LATEST_ECMA_VERSION, Position, SourceLocation, Span};
pub use error::{ErrorKind, LiteralKind, ParseDiagnostic, ParseError};
pub use options::{EcmaVersion, InvalidEcmaVersion, ParseOptions, TokenizeOptions};
pub use parser::{ParseResult, Services, parse, parse_for_eslint, tokenize};
pub use static_value::{StaticValue, StaticValueError, static_value, static_value_of};
pub use syntax_context::{Dialect, SyntaxContext, UnknownDialect};
pub use token::{Comment, CommentType, RegexInfo, Token, TokenOrComment, TokenType};
pub use traverse::{Visitor, traverse_nodes};
pub use visitor_keys::{KEYS, keys_for};
