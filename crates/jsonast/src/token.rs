use ecma_expr::{SourceLocation, Span};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    String,
    Numeric,
    Boolean,
    Null,
    Keyword,
    Punctuator,
    Identifier,
    RegularExpression,
    Template,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegexInfo {
    pub pattern: String,
    pub flags: String,
}

/// A token in the ESTree token stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Source text of the token.
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegexInfo>,
    pub range: Span,
    pub loc: SourceLocation,
}

impl Token {
    pub fn is_punctuator(&self, value: &str) -> bool {
        self.token_type == TokenType::Punctuator && self.value == value
    }

    pub fn is_comma(&self) -> bool {
        self.is_punctuator(",")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommentType {
    Block,
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    #[serde(rename = "type")]
    pub comment_type: CommentType,
    /// Comment text without its delimiters.
    pub value: String,
    pub range: Span,
    pub loc: SourceLocation,
}

/// One entry of [`tokenize`](crate::tokenize) output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TokenOrComment {
    Token(Token),
    Comment(Comment),
}

impl TokenOrComment {
    pub fn range(&self) -> Span {
        match self {
            Self::Token(token) => token.range,
            Self::Comment(comment) => comment.range,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            Self::Comment(_) => None,
        }
    }
}

impl From<Token> for TokenOrComment {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

impl From<Comment> for TokenOrComment {
    fn from(comment: Comment) -> Self {
        Self::Comment(comment)
    }
}
