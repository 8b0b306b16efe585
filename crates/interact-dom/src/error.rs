#![forbid(unsafe_code)]

use thiserror::Error;

/// Failure to parse a markup fragment.
///
/// Offsets are byte positions into the input string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("unterminated tag starting at byte {0}")]
    UnterminatedTag(usize),

    #[error("unterminated quoted attribute value starting at byte {0}")]
    UnterminatedQuote(usize),

    #[error("unterminated comment starting at byte {0}")]
    UnterminatedComment(usize),

    #[error("invalid tag name at byte {0}")]
    InvalidTagName(usize),
}

/// Failure to parse a selector string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character {found:?} at byte {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("unterminated attribute selector starting at byte {0}")]
    UnterminatedAttribute(usize),
}

pub type MarkupResult<T> = Result<T, MarkupError>;
