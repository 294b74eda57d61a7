use super::err::LexError;
use logos::{Logos, SpannedIter};
use std::fmt::Display;
use stride_utils::span::FileInfo;

#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Tok<'input> {
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident(&'input str),

    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("function")]
    Function,
    #[token("import")]
    Import,
    #[token("do_nothing")]
    DoNothing,

    #[token("true")]
    #[token("True")]
    True,
    #[token("false")]
    #[token("False")]
    False,
    #[regex(r"[0-9]+")]
    NumLit(&'input str),
    #[regex(r#""[^"]*""#)]
    StrLit(&'input str),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("=")]
    Equals,

    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
}

impl Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | Tok::Ident(s) => write!(f, "Ident({})", s),
            | Tok::If => write!(f, "if"),
            | Tok::Then => write!(f, "then"),
            | Tok::Else => write!(f, "else"),
            | Tok::While => write!(f, "while"),
            | Tok::Return => write!(f, "return"),
            | Tok::Function => write!(f, "function"),
            | Tok::Import => write!(f, "import"),
            | Tok::DoNothing => write!(f, "do_nothing"),
            | Tok::True => write!(f, "true"),
            | Tok::False => write!(f, "false"),
            | Tok::NumLit(s) => write!(f, "NumLit({})", s),
            | Tok::StrLit(s) => write!(f, "StrLit({})", s),
            | Tok::Plus => write!(f, "+"),
            | Tok::Minus => write!(f, "-"),
            | Tok::Star => write!(f, "*"),
            | Tok::Slash => write!(f, "/"),
            | Tok::Percent => write!(f, "%"),
            | Tok::EqEq => write!(f, "=="),
            | Tok::NotEq => write!(f, "!="),
            | Tok::Lt => write!(f, "<"),
            | Tok::Gt => write!(f, ">"),
            | Tok::Le => write!(f, "<="),
            | Tok::Ge => write!(f, ">="),
            | Tok::Equals => write!(f, "="),
            | Tok::Semicolon => write!(f, ";"),
            | Tok::Comma => write!(f, ","),
            | Tok::ParenOpen => write!(f, "("),
            | Tok::ParenClose => write!(f, ")"),
            | Tok::BraceOpen => write!(f, "{{"),
            | Tok::BraceClose => write!(f, "}}"),
            | Tok::BracketOpen => write!(f, "["),
            | Tok::BracketClose => write!(f, "]"),
        }
    }
}

/// A token together with its byte range in the source.
pub type Spanned<'source> = (usize, Tok<'source>, usize);

pub struct Lexer<'source> {
    inner: SpannedIter<'source, Tok<'source>>,
    source: &'source str,
    info: &'source FileInfo,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str, info: &'source FileInfo) -> Self {
        Self { inner: Tok::lexer(source).spanned(), source, info }
    }
    /// Run the lexer to the end, stopping at the first unknown fragment.
    pub fn tokens(self) -> Result<Vec<Spanned<'source>>, LexError> {
        self.collect()
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Result<Spanned<'source>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            | (Ok(tok), range) => Some(Ok((range.start, tok, range.end))),
            | (Err(()), range) => Some(Err(LexError::UnknownFragment {
                fragment: self.source[range.clone()].to_string(),
                cursor: self.info.trans_span2(range.start),
            })),
        }
    }
}
