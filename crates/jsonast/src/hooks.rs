use ecma_expr::{ExprArena, ExprId, LineIndex, ParseHooks, RawComment, RawToken};

use crate::error::{ErrorKind, ParseError};
use crate::syntax_context::SyntaxContext;
use crate::token::{Comment, CommentType, Token};
use crate::token_convert::TokenConvertor;
use crate::token_store::TokenStore;
use crate::validate::Validator;

/// Collects tokens and comments while the expression parser runs, and rejects whatever the
/// dialect does not allow as soon as it is seen.
pub(crate) struct JsonHooks<'src> {
    pub(crate) source: &'src str,
    pub(crate) lines: LineIndex<'src>,
    pub(crate) ctx: SyntaxContext,
    pub(crate) tokens: TokenStore,
    pub(crate) comments: Vec<Comment>,
    convertor: TokenConvertor,
    validate_nodes: bool,
    accepted_nodes: usize,
}

impl<'src> JsonHooks<'src> {
    pub(crate) fn new(source: &'src str, ctx: SyntaxContext) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            ctx,
            tokens: TokenStore::new(),
            comments: Vec::new(),
            convertor: TokenConvertor::default(),
            validate_nodes: true,
            accepted_nodes: 0,
        }
    }

    /// Hooks that convert tokens and police comments but leave nodes alone.
    pub(crate) fn tokens_only(source: &'src str, ctx: SyntaxContext) -> Self {
        Self {
            validate_nodes: false,
            ..Self::new(source, ctx)
        }
    }

    pub(crate) fn validator(&self) -> Validator<'_, 'src> {
        Validator {
            ctx: &self.ctx,
            tokens: &self.tokens,
            lines: &self.lines,
        }
    }

    pub(crate) fn error_at(&self, kind: ErrorKind, index: usize) -> ParseError {
        ParseError::at(kind, index, &self.lines)
    }

    /// End offset of everything lexed so far.
    pub(crate) fn consumed_end(&self) -> usize {
        let token_end = self.tokens.last().map_or(0, |token| token.range.end);
        let comment_end = self.comments.last().map_or(0, |comment| comment.range.end);
        token_end.max(comment_end)
    }

    pub(crate) fn into_parts(self) -> (Vec<Token>, Vec<Comment>) {
        (self.tokens.into_tokens(), self.comments)
    }
}

impl ParseHooks for JsonHooks<'_> {
    type Error = ParseError;

    fn on_token(&mut self, token: &RawToken) -> Result<(), ParseError> {
        if let Some(token) = self.convertor.convert(token, self.source, &self.lines)? {
            self.tokens.add(token);
        }
        Ok(())
    }

    fn on_comment(&mut self, comment: &RawComment) -> Result<(), ParseError> {
        if !self.ctx.comments {
            return Err(self.error_at(ErrorKind::UnexpectedComment, comment.span.start));
        }
        self.comments.push(Comment {
            comment_type: if comment.block {
                CommentType::Block
            } else {
                CommentType::Line
            },
            value: comment.text.clone(),
            range: comment.span,
            loc: self.lines.location(comment.span),
        });
        Ok(())
    }

    fn on_node(&mut self, arena: &ExprArena, id: ExprId) -> Result<(), ParseError> {
        if self.validate_nodes {
            self.validator().validate(arena, id)?;
        }
        self.accepted_nodes += 1;
        Ok(())
    }

    fn raise(&mut self, pos: usize, message: &str) -> ParseError {
        let kind = if pos >= self.source.len() && !self.source.is_empty() {
            ErrorKind::UnexpectedEnd
        } else {
            ErrorKind::Syntax(message.to_string())
        };
        self.error_at(kind, pos)
    }

    fn unexpected(&mut self, token: &RawToken) -> ParseError {
        let text = token.text(self.source);
        if !text.is_empty() {
            return self.error_at(ErrorKind::UnexpectedToken(text.to_string()), token.span.start);
        }
        if self.accepted_nodes == 0 {
            return self.error_at(ErrorKind::EmptyInput, 0);
        }
        if let Some(last) = self.tokens.last() {
            let kind = ErrorKind::UnexpectedToken(last.value.clone());
            return self.error_at(kind, last.range.start);
        }
        self.raise(token.span.start, "Unexpected token.")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn failures_at_the_end_of_input_are_rewritten() {
        let mut hooks = JsonHooks::new("[1", SyntaxContext::default());
        let error = hooks.raise(2, "Unterminated thing");
        assert_eq!(error.kind, ErrorKind::UnexpectedEnd);
        assert_eq!((error.line_number, error.column), (1, 3));

        let error = hooks.raise(1, "Invalid number");
        assert_eq!(error.kind, ErrorKind::Syntax("Invalid number".into()));
    }

    #[test]
    fn comments_follow_the_dialect() {
        let comment = RawComment {
            block: true,
            text: " x ".into(),
            span: ecma_expr::Span::new(0, 7),
        };
        let mut hooks = JsonHooks::new("/* x */1", SyntaxContext::JSON);
        let error = hooks.on_comment(&comment).unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnexpectedComment);

        let mut hooks = JsonHooks::new("/* x */1", SyntaxContext::JSONC);
        assert!(hooks.on_comment(&comment).is_ok());
        assert_eq!(hooks.consumed_end(), 7);
        assert_eq!(hooks.comments[0].comment_type, CommentType::Block);
    }
}
