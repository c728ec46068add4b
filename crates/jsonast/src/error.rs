use core::fmt;

use ecma_expr::LineIndex;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Kind of literal named in an [`ErrorKind::UnexpectedLiteral`] message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    String,
    Number,
    Boolean,
    Null,
    BigInt,
    Regex,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::BigInt => "bigint",
            Self::Regex => "regex",
        })
    }
}

/// What went wrong. The `Display` form is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("Unexpected token '{0}'.")]
    UnexpectedToken(String),
    /// Reported immediately after the place the token was expected.
    #[error("Expected token '{0}'.")]
    ExpectedToken(String),
    #[error("Unexpected identifier '{0}'.")]
    UnexpectedIdentifier(String),
    #[error("Unexpected {0} literal.")]
    UnexpectedLiteral(LiteralKind),
    #[error("Unexpected template literal.")]
    UnexpectedTemplateLiteral,
    /// An expression kind no dialect accepts, e.g. `binary expression`.
    #[error("Unexpected {0}.")]
    UnexpectedExpression(String),
    /// A construct the active dialect disables, e.g. `single quoted` or `octal numeric literal`.
    #[error("Unexpected {0}.")]
    UnexpectedSyntax(&'static str),
    #[error("Unexpected whitespace.")]
    UnexpectedWhitespace,
    #[error("Invalid number {0}.")]
    InvalidNumber(String),
    #[error("Unexpected comment.")]
    UnexpectedComment,
    #[error("Expected to be an expression, but got empty.")]
    EmptyInput,
    #[error("Unexpected end of expression.")]
    UnexpectedEnd,
    /// Malformed token text or grammar errors reported by the expression parser.
    #[error("{0}")]
    Syntax(String),
}

/// The first construct in the input that the active dialect rejects.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic(code(jsonast::parse))]
pub struct ParseError {
    pub kind: ErrorKind,
    /// 0-based byte offset.
    pub index: usize,
    /// 1-based line.
    pub line_number: usize,
    /// 1-based column, counted in Unicode scalar values. ESLint and other ESTree tools count
    /// UTF-16 code units, so columns differ from theirs after an astral character such as an
    /// emoji.
    pub column: usize,
}

impl ParseError {
    /// Builds an error located at byte `index`.
    pub fn at(kind: ErrorKind, index: usize, lines: &LineIndex<'_>) -> Self {
        let position = lines.position(index);
        Self {
            kind,
            index,
            line_number: position.line,
            column: position.column + 1,
        }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Attaches the source text so the error renders with a labelled snippet.
    pub fn with_source(&self, name: impl AsRef<str>, source: &str) -> ParseDiagnostic {
        let offset = self.index.min(source.len());
        let len = source
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        ParseDiagnostic {
            src: NamedSource::new(name, source.to_string()),
            span: SourceSpan::new(offset.into(), len),
            message: self.message(),
        }
    }
}

/// A [`ParseError`] together with the source it points into.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(jsonast::parse))]
pub struct ParseDiagnostic {
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn messages_follow_the_taxonomy() {
        let cases = [
            (ErrorKind::UnexpectedToken(",".into()), "Unexpected token ','."),
            (ErrorKind::ExpectedToken(":".into()), "Expected token ':'."),
            (
                ErrorKind::UnexpectedIdentifier("foo".into()),
                "Unexpected identifier 'foo'.",
            ),
            (
                ErrorKind::UnexpectedLiteral(LiteralKind::BigInt),
                "Unexpected bigint literal.",
            ),
            (
                ErrorKind::UnexpectedExpression("binary expression".into()),
                "Unexpected binary expression.",
            ),
            (
                ErrorKind::UnexpectedSyntax("single quoted"),
                "Unexpected single quoted.",
            ),
            (ErrorKind::InvalidNumber("0x1".into()), "Invalid number 0x1."),
            (
                ErrorKind::EmptyInput,
                "Expected to be an expression, but got empty.",
            ),
        ];
        for (kind, message) in cases {
            assert_eq!(kind.to_string(), message);
        }
    }

    #[test]
    fn locations_are_one_based() {
        let lines = LineIndex::new("{\n  \"a\": x}");
        let error = ParseError::at(ErrorKind::UnexpectedComment, 9, &lines);
        assert_eq!((error.index, error.line_number, error.column), (9, 2, 8));
    }

    #[test]
    fn diagnostics_label_one_character() {
        let lines = LineIndex::new("[é]");
        let error = ParseError::at(ErrorKind::UnexpectedToken("é".into()), 1, &lines);
        let diagnostic = error.with_source("input.json", "[é]");
        assert_eq!(diagnostic.span, SourceSpan::new(1.into(), 2));
        assert_eq!(diagnostic.to_string(), "Unexpected token 'é'.");
    }
}
