use ecma_expr::Span;

use crate::token::Token;

/// Offset-ordered tokens with neighbour lookups.
///
/// Lookups take a [`Span`] so nodes and tokens can be passed alike; only its start (or, for
/// [`last_token`](Self::last_token), its end) matters.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: Vec<Token>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token. Tokens must arrive in source order.
    pub fn add(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Index of the token covering `offset`.
    pub fn find_index_by_offset(&self, offset: usize) -> Option<usize> {
        let index = self.tokens.partition_point(|token| token.range.end <= offset);
        self.tokens
            .get(index)
            .filter(|token| token.range.contains(offset))
            .map(|_| index)
    }

    pub fn find_token_by_offset(&self, offset: usize) -> Option<&Token> {
        self.find_index_by_offset(offset)
            .and_then(|index| self.tokens.get(index))
    }

    /// The token a node or token starts with.
    pub fn first_token(&self, span: Span) -> Option<&Token> {
        self.find_token_by_offset(span.start)
    }

    /// The token a node or token ends with.
    pub fn last_token(&self, span: Span) -> Option<&Token> {
        self.find_token_by_offset(span.end.checked_sub(1)?)
    }

    /// The nearest token before the one starting `span` that satisfies `filter`.
    pub fn token_before(&self, span: Span, filter: impl Fn(&Token) -> bool) -> Option<&Token> {
        let index = self.find_index_by_offset(span.start)?;
        self.tokens[..index].iter().rev().find(|&token| filter(token))
    }

    /// The nearest token after the one starting `span` that satisfies `filter`.
    pub fn token_after(&self, span: Span, filter: impl Fn(&Token) -> bool) -> Option<&Token> {
        let from = self.find_index_by_offset(span.start).map_or(0, |index| index + 1);
        self.tokens.get(from..)?.iter().find(|&token| filter(token))
    }
}

/// Accepts every token; the unfiltered form of [`TokenStore::token_before`] and
/// [`TokenStore::token_after`].
pub fn any_token(_: &Token) -> bool {
    true
}
