use ecma_expr::{ParserOptions, RawTokenKind};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::ast::Ast;
use crate::convert::Convertor;
use crate::error::{ErrorKind, ParseError};
use crate::hooks::JsonHooks;
use crate::options::{ParseOptions, TokenizeOptions};
use crate::token::TokenOrComment;
use crate::visitor_keys::KEYS;

/// Parses `source` as a single JSON value in the dialect `options` selects.
///
/// # Errors
///
/// Returns the first construct the dialect rejects, located by byte offset, line and column.
#[tracing::instrument(skip_all, fields(file = options.file_path(), len = source.len()))]
pub fn parse(source: &str, options: &ParseOptions) -> Result<Ast, ParseError> {
    let ctx = options.syntax_context();
    let parser_options = ParserOptions {
        ecma_version: options.ecma_version.normalize(),
        ..ParserOptions::default()
    };
    debug!(
        dialect = %options.dialect.unwrap_or_default(),
        ecma_version = parser_options.ecma_version,
        "parsing"
    );

    let mut hooks = JsonHooks::new(source, ctx);
    let parsed = ecma_expr::parse_expression_at(source, 0, &parser_options, &mut hooks)?;
    let (nodes, root) = Convertor::new(&hooks, &parsed.arena).convert_program(parsed.root)?;

    let root_end = parsed.arena[parsed.root].span.end;
    let mut last_index = root_end.max(hooks.consumed_end());
    let bytes = source.as_bytes();
    while matches!(bytes.get(last_index), Some(b'\n' | b'\r' | b' ' | b'\t')) {
        last_index += 1;
    }
    if last_index < source.len() {
        trace!(offset = last_index, "checking trailing content");
        let token = ecma_expr::first_token_at(source, last_index, &parser_options, &mut hooks)?;
        if !matches!(token.kind, RawTokenKind::Eof) {
            let text = token.text(source).to_string();
            return Err(hooks.error_at(ErrorKind::UnexpectedToken(text), token.span.start));
        }
    }

    let (tokens, comments) = hooks.into_parts();
    debug!(
        nodes = nodes.len(),
        tokens = tokens.len(),
        comments = comments.len(),
        "parsed"
    );
    Ok(Ast::new(nodes, root, tokens, comments))
}

/// What [`parse_for_eslint`] hands to a host linter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub ast: Ast,
    pub visitor_keys: &'static IndexMap<&'static str, Vec<&'static str>>,
    pub services: Services,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Services {
    #[serde(rename = "isJSON")]
    pub is_json: bool,
}

/// [`parse`], packaged with the visitor keys and parser services a linter host expects.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_for_eslint(source: &str, options: &ParseOptions) -> Result<ParseResult, ParseError> {
    Ok(ParseResult {
        ast: parse(source, options)?,
        visitor_keys: &KEYS,
        services: Services { is_json: true },
    })
}

/// Splits `source` into tokens, and comments when asked, without building a tree.
///
/// Tokens the data dialects never contain, such as `(` or `${`, are still rejected, and so are
/// comments when the dialect forbids them.
///
/// # Errors
///
/// Returns the first rejected token or comment, or malformed token text.
#[tracing::instrument(skip_all, fields(file = options.parse.file_path(), len = source.len()))]
pub fn tokenize(
    source: &str,
    options: &TokenizeOptions,
) -> Result<Vec<TokenOrComment>, ParseError> {
    let parser_options = ParserOptions {
        ecma_version: options.parse.ecma_version.normalize(),
        ..ParserOptions::default()
    };
    let mut hooks = JsonHooks::tokens_only(source, options.parse.syntax_context());
    ecma_expr::tokenize(source, &parser_options, &mut hooks)?;
    let (tokens, comments) = hooks.into_parts();
    debug!(tokens = tokens.len(), comments = comments.len(), "tokenized");

    if !options.include_comments {
        return Ok(tokens.into_iter().map(TokenOrComment::from).collect());
    }
    let mut result = Vec::with_capacity(tokens.len() + comments.len());
    let mut comments = comments.into_iter().peekable();
    for token in tokens {
        while let Some(comment) = comments.next_if(|c| c.range.start < token.range.start) {
            result.push(TokenOrComment::from(comment));
        }
        result.push(TokenOrComment::from(token));
    }
    result.extend(comments.map(TokenOrComment::from));
    Ok(result)
}
