use ecma_expr::{LineIndex, RawToken, RawTokenKind, Span};

use crate::error::{ErrorKind, ParseError};
use crate::token::{RegexInfo, Token, TokenType};

/// Turns raw lexer tokens into ESTree tokens.
///
/// The pieces of a template literal are held back until the closing backquote and emitted as a
/// single `Template` token. Parentheses and template substitutions never appear in data, so their
/// tokens are rejected here.
#[derive(Debug, Default)]
pub(crate) struct TokenConvertor {
    template_start: Option<usize>,
}

impl TokenConvertor {
    pub(crate) fn convert(
        &mut self,
        raw: &RawToken,
        source: &str,
        lines: &LineIndex<'_>,
    ) -> Result<Option<Token>, ParseError> {
        let text = raw.text(source);
        let token_type = match &raw.kind {
            RawTokenKind::BackQuote => {
                let Some(start) = self.template_start.take() else {
                    self.template_start = Some(raw.span.start);
                    return Ok(None);
                };
                let span = Span::new(start, raw.span.end);
                return Ok(Some(make_token(TokenType::Template, span, source, lines, None)));
            }
            RawTokenKind::Template { .. } | RawTokenKind::Eof => return Ok(None),
            RawTokenKind::DollarBraceL => {
                return Err(unexpected(text, raw.span.start, lines));
            }
            RawTokenKind::Punct(punct @ ("(" | ")")) => {
                return Err(unexpected(punct, raw.span.start, lines));
            }
            RawTokenKind::Punct(_) => TokenType::Punctuator,
            RawTokenKind::Keyword("true" | "false") => TokenType::Boolean,
            RawTokenKind::Keyword("null") => TokenType::Null,
            RawTokenKind::Keyword(_) => TokenType::Keyword,
            RawTokenKind::Name { .. } => TokenType::Identifier,
            RawTokenKind::String(_) => TokenType::String,
            RawTokenKind::Num(_) | RawTokenKind::BigInt(_) => TokenType::Numeric,
            RawTokenKind::Regex { pattern, flags } => {
                let regex = RegexInfo {
                    pattern: pattern.clone(),
                    flags: flags.clone(),
                };
                return Ok(Some(make_token(
                    TokenType::RegularExpression,
                    raw.span,
                    source,
                    lines,
                    Some(regex),
                )));
            }
        };
        Ok(Some(make_token(token_type, raw.span, source, lines, None)))
    }
}

fn make_token(
    token_type: TokenType,
    span: Span,
    source: &str,
    lines: &LineIndex<'_>,
    regex: Option<RegexInfo>,
) -> Token {
    Token {
        token_type,
        value: source.get(span.start..span.end).unwrap_or_default().to_string(),
        regex,
        range: span,
        loc: lines.location(span),
    }
}

fn unexpected(name: &str, index: usize, lines: &LineIndex<'_>) -> ParseError {
    ParseError::at(ErrorKind::UnexpectedToken(name.to_string()), index, lines)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecma_expr::{NoopHooks, ParseHooks, ParserOptions, SyntaxError};
    use pretty_assertions::assert_eq;

    use super::*;

    /// Runs every raw token of `source` through a convertor.
    fn convert_all(source: &str) -> Result<Vec<(TokenType, String)>, ParseError> {
        struct Collect<'a> {
            source: &'a str,
            lines: LineIndex<'a>,
            convertor: TokenConvertor,
            tokens: Vec<(TokenType, String)>,
            failure: Option<ParseError>,
        }

        impl ParseHooks for Collect<'_> {
            type Error = SyntaxError;

            fn on_token(&mut self, token: &RawToken) -> Result<(), SyntaxError> {
                match self.convertor.convert(token, self.source, &self.lines) {
                    Ok(Some(token)) => self.tokens.push((token.token_type, token.value)),
                    Ok(None) => {}
                    Err(error) => {
                        self.failure = Some(error);
                        return Err(SyntaxError::new(token.span.start, "rejected"));
                    }
                }
                Ok(())
            }

            fn raise(&mut self, pos: usize, message: &str) -> SyntaxError {
                NoopHooks.raise(pos, message)
            }

            fn unexpected(&mut self, token: &RawToken) -> SyntaxError {
                NoopHooks.unexpected(token)
            }
        }

        let mut hooks = Collect {
            source,
            lines: LineIndex::new(source),
            convertor: TokenConvertor::default(),
            tokens: Vec::new(),
            failure: None,
        };
        let result = ecma_expr::tokenize(source, &ParserOptions::default(), &mut hooks);
        if let Some(error) = hooks.failure {
            return Err(error);
        }
        result.unwrap();
        Ok(hooks.tokens)
    }

    #[test]
    fn tokens_are_reclassified() {
        let tokens = convert_all(r#"{"a": [true, null, 1, 2n, x, /re/g, typeof]}"#).unwrap();
        let types: Vec<_> = tokens.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            types,
            vec![
                TokenType::Punctuator,
                TokenType::String,
                TokenType::Punctuator,
                TokenType::Punctuator,
                TokenType::Boolean,
                TokenType::Punctuator,
                TokenType::Null,
                TokenType::Punctuator,
                TokenType::Numeric,
                TokenType::Punctuator,
                TokenType::Numeric,
                TokenType::Punctuator,
                TokenType::Identifier,
                TokenType::Punctuator,
                TokenType::RegularExpression,
                TokenType::Punctuator,
                TokenType::Keyword,
                TokenType::Punctuator,
                TokenType::Punctuator,
            ]
        );
        assert_eq!(tokens[1].1, "\"a\"");
        assert_eq!(tokens[14].1, "/re/g");
    }

    #[test]
    fn templates_merge_into_one_token() {
        let tokens = convert_all("[`ab`]").unwrap();
        assert_eq!(
            tokens,
            vec![
                (TokenType::Punctuator, "[".to_string()),
                (TokenType::Template, "`ab`".to_string()),
                (TokenType::Punctuator, "]".to_string()),
            ]
        );
    }

    #[test]
    fn parentheses_and_substitutions_are_rejected() {
        let error = convert_all("[(1)]").unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnexpectedToken("(".into()));
        assert_eq!(error.index, 1);

        let error = convert_all("`a${1}`").unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnexpectedToken("${".into()));
        assert_eq!(error.index, 2);
    }
}
