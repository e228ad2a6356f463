//! Front-end errors.

use protocol_mirror::Span;

use crate::lexer::LexError;

/// Why a source text could not be turned into declarations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found `{found}`")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: String, span: Span },

    /// An opening delimiter without its closing counterpart.
    #[error("unclosed `{delimiter}`")]
    Unclosed { delimiter: String, span: Span },
}

impl ParseError {
    /// Where the failure was detected.
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(err) => err.span,
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span, .. }
            | ParseError::Unclosed { span, .. } => *span,
        }
    }
}
