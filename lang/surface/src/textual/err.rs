use stride_utils::span::Cursor2;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("Unknown fragment `{fragment}` at {cursor}")]
    UnknownFragment { fragment: String, cursor: Cursor2 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("At token {index} ({cursor}), expected {expected} but found {found}")]
    Unexpected { index: usize, cursor: Cursor2, expected: String, found: String },
    #[error("Number literal `{literal}` at {cursor} does not fit in 64 bits")]
    BadNumber { literal: String, cursor: Cursor2 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, SurfaceError>;
