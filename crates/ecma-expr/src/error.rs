use thiserror::Error;

/// A lexical or grammatical failure at a byte offset.
///
/// The message wording follows the acorn family of parsers so that diagnostics stay familiar to
/// ESTree tooling users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({pos})")]
pub struct SyntaxError {
    pub pos: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(pos: usize, message: impl Into<String>) -> Self {
        Self {
            pos,
            message: message.into(),
        }
    }
}
