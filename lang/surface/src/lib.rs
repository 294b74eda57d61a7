pub mod textual {
    /// Logos-based lexer and token definitions.
    pub mod lexer;
    pub use lexer::*;
    /// Hand-written recursive-descent parser.
    pub mod parser;
    pub use parser::*;
    /// Lex and parse error formatting.
    pub mod err;
    pub use err::*;

    #[cfg(test)]
    mod tests;
}

pub use textual::{Result, SurfaceError};

use std::{path::PathBuf, sync::Arc};
use stride_syntax::Term;
use stride_utils::span::FileInfo;

/// Lex and parse a whole program.
pub fn parse_source(source: &str, path: Option<PathBuf>) -> Result<Term> {
    let info = FileInfo::new(source, path.map(Arc::new));
    let tokens = textual::Lexer::new(source, &info).tokens()?;
    log::trace!("lexed {} tokens from {}", tokens.len(), info.path().display());
    let term = textual::Parser::new(tokens, &info).parse_program()?;
    Ok(term)
}
