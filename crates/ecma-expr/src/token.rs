use crate::position::Span;

/// What the lexer produced, with any decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTokenKind {
    /// An identifier name. `escaped` is set when the source spelled it with `\u` escapes.
    Name { name: String, escaped: bool },
    /// A reserved word, including `true`, `false` and `null`.
    Keyword(&'static str),
    /// A string literal with its cooked value.
    String(String),
    Num(f64),
    /// A bigint literal; holds the digits without the `n` suffix or separators.
    BigInt(String),
    Regex {
        pattern: String,
        flags: String,
    },
    BackQuote,
    /// One template chunk between backquotes and substitutions. `cooked` is `None`
    /// when the chunk holds an escape that is only legal in tagged templates.
    Template {
        raw: String,
        cooked: Option<String>,
    },
    DollarBraceL,
    Punct(&'static str),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawToken {
    pub kind: RawTokenKind,
    pub span: Span,
}

impl RawToken {
    /// The exact source text the token covers.
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        source.get(self.span.start..self.span.end).unwrap_or_default()
    }

    pub fn is_punct(&self, punct: &str) -> bool {
        matches!(self.kind, RawTokenKind::Punct(p) if p == punct)
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self.kind, RawTokenKind::Keyword(k) if k == keyword)
    }

    pub fn is_name(&self, expected: &str) -> bool {
        matches!(&self.kind, RawTokenKind::Name { name, escaped: false } if name == expected)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, RawTokenKind::Eof)
    }
}

/// A comment skipped by the lexer. `text` excludes the delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    pub block: bool,
    pub text: String,
    pub span: Span,
}

/// Reserved words that never lex as identifiers.
pub const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "null",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
];

/// The interned reserved word equal to `word`, if any.
pub fn keyword(word: &str) -> Option<&'static str> {
    KEYWORDS.iter().copied().find(|k| *k == word)
}
