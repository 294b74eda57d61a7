//! Recursive-descent parser over the token stream.
//!
//! ```text
//! program    = statement EOF
//! statement  = single {single}
//! single     = "do_nothing" ";" | IDENT "=" expression ";"
//!            | "if" expression "then" block ["else" block]
//!            | "while" expression block | "return" expression ";"
//!            | "import" STR ";" | call ";"
//! block      = "{" [statement] "}"
//! expression = operand [(OP | COMP) expression]
//! operand    = primary {"(" [args] ")"}
//! primary    = NUM | BOOL | STR | IDENT | "[" [args] "]"
//!            | "(" expression ")" | "(" expression "," expression ")"
//!            | "function" "(" [params] ")" block
//! ```

use super::{
    err::ParseError,
    lexer::{Spanned, Tok},
};
use std::rc::Rc;
use stride_syntax::*;
use stride_utils::span::FileInfo;

type Result<T> = std::result::Result<T, ParseError>;

/// Cursor over a token stream; all parser state lives here.
pub struct Parser<'source> {
    tokens: Vec<Spanned<'source>>,
    pos: usize,
    info: &'source FileInfo,
}

impl<'source> Parser<'source> {
    pub fn new(tokens: Vec<Spanned<'source>>, info: &'source FileInfo) -> Self {
        Parser { tokens, pos: 0, info }
    }

    pub fn parse_program(mut self) -> Result<Term> {
        let program = self.statement()?;
        match self.peek() {
            | None => Ok(program),
            | Some(_) => Err(self.unexpected("end of file")),
        }
    }

    /* --------------------------------- cursor --------------------------------- */

    fn peek(&self) -> Option<&Tok<'source>> {
        self.peek_nth(0)
    }
    fn peek_nth(&self, n: usize) -> Option<&Tok<'source>> {
        self.tokens.get(self.pos + n).map(|(_, tok, _)| tok)
    }
    fn advance(&mut self) -> Option<Tok<'source>> {
        let tok = self.tokens.get(self.pos).map(|(_, tok, _)| tok.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }
    fn eat(&mut self, tok: &Tok<'_>) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
    fn expect(&mut self, tok: Tok<'static>) -> Result<()> {
        if self.eat(&tok) { Ok(()) } else { Err(self.unexpected(format!("`{}`", tok))) }
    }
    fn offset(&self) -> usize {
        match self.tokens.get(self.pos) {
            | Some((start, _, _)) => *start,
            | None => self.tokens.last().map(|(_, _, end)| *end).unwrap_or_default(),
        }
    }
    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let found = match self.peek() {
            | Some(tok) => format!("`{}`", tok),
            | None => "end of file".to_string(),
        };
        ParseError::Unexpected {
            index: self.pos,
            cursor: self.info.trans_span2(self.offset()),
            expected: expected.into(),
            found,
        }
    }

    /* ------------------------------- statements ------------------------------- */

    fn statement(&mut self) -> Result<Term> {
        let mut stmts = vec![self.single()?];
        while !matches!(self.peek(), None | Some(Tok::BraceClose)) {
            stmts.push(self.single()?);
        }
        Ok(Term::block(stmts))
    }

    fn single(&mut self) -> Result<Term> {
        match self.peek() {
            | Some(Tok::DoNothing) => {
                self.advance();
                self.expect(Tok::Semicolon)?;
                Ok(Term::do_nothing())
            }
            | Some(Tok::If) => {
                self.advance();
                let cond = self.expression()?;
                self.expect(Tok::Then)?;
                let thn = self.block()?;
                let els = if self.eat(&Tok::Else) { self.block()? } else { Term::do_nothing() };
                Ok(Term::if_(cond, thn, els))
            }
            | Some(Tok::While) => {
                self.advance();
                let cond = self.expression()?;
                let body = self.block()?;
                Ok(Term::while_(cond, body))
            }
            | Some(Tok::Return) => {
                self.advance();
                let value = self.expression()?;
                self.expect(Tok::Semicolon)?;
                Ok(Term::ret(value))
            }
            | Some(Tok::Import) => {
                self.advance();
                let path = match self.peek() {
                    | Some(Tok::StrLit(lit)) => unquote(lit),
                    | _ => Err(self.unexpected("a string literal"))?,
                };
                self.advance();
                self.expect(Tok::Semicolon)?;
                Ok(Term::import(path))
            }
            | Some(Tok::Ident(name)) if self.peek_nth(1) == Some(&Tok::Equals) => {
                let name = name.to_string();
                self.advance();
                self.advance();
                let value = self.expression()?;
                self.expect(Tok::Semicolon)?;
                Ok(Term::assign(name, value))
            }
            | Some(_) => {
                let start = self.pos;
                let call = self.expression()?;
                if !matches!(call, Term::Execute(_)) {
                    self.pos = start;
                    Err(self.unexpected("a statement"))?
                }
                self.expect(Tok::Semicolon)?;
                Ok(Term::exec(call))
            }
            | None => Err(self.unexpected("a statement")),
        }
    }

    fn block(&mut self) -> Result<Term> {
        self.expect(Tok::BraceOpen)?;
        if self.eat(&Tok::BraceClose) {
            return Ok(Term::do_nothing());
        }
        let body = self.statement()?;
        self.expect(Tok::BraceClose)?;
        Ok(body)
    }

    /* ------------------------------- expressions ------------------------------ */

    fn expression(&mut self) -> Result<Term> {
        let lhs = self.operand()?;
        let Some(tok) = self.peek() else { return Ok(lhs) };
        if let Some(op) = arith_op(tok) {
            self.advance();
            Ok(Term::op(lhs, op, self.expression()?))
        } else if let Some(op) = comp_op(tok) {
            self.advance();
            Ok(Term::comp(lhs, op, self.expression()?))
        } else {
            Ok(lhs)
        }
    }

    fn operand(&mut self) -> Result<Term> {
        let mut head = self.primary()?;
        while self.eat(&Tok::ParenOpen) {
            let args = self.items(Tok::ParenClose)?;
            head = Term::apply(head, args);
        }
        Ok(head)
    }

    fn primary(&mut self) -> Result<Term> {
        let cursor = self.info.trans_span2(self.offset());
        match self.peek().cloned() {
            | Some(Tok::NumLit(lit)) => {
                self.advance();
                let n = lit
                    .parse::<i64>()
                    .map_err(|_| ParseError::BadNumber { literal: lit.to_string(), cursor })?;
                Ok(Term::Number(n))
            }
            | Some(Tok::True) => {
                self.advance();
                Ok(Term::Boolean(true))
            }
            | Some(Tok::False) => {
                self.advance();
                Ok(Term::Boolean(false))
            }
            | Some(Tok::StrLit(lit)) => {
                self.advance();
                Ok(Term::str(unquote(lit)))
            }
            | Some(Tok::Ident(name)) => {
                self.advance();
                Ok(Term::var(name))
            }
            | Some(Tok::BracketOpen) => {
                self.advance();
                let items = self.items(Tok::BracketClose)?;
                Ok(Term::list(items))
            }
            | Some(Tok::ParenOpen) => {
                self.advance();
                let inner = self.expression()?;
                if self.eat(&Tok::Comma) {
                    let cdr = self.expression()?;
                    self.expect(Tok::ParenClose)?;
                    return Ok(Term::pair(inner, cdr));
                }
                self.expect(Tok::ParenClose)?;
                Ok(inner)
            }
            | Some(Tok::Function) => {
                self.advance();
                self.expect(Tok::ParenOpen)?;
                let params = self.params()?;
                let body = self.block()?;
                Ok(Function { params, body: Rc::new(body), closure: None }.into())
            }
            | _ => Err(self.unexpected("an expression")),
        }
    }

    /// comma separated expressions up to and including `close`
    fn items(&mut self, close: Tok<'static>) -> Result<Vec<Term>> {
        let mut items = Vec::new();
        if self.eat(&close) {
            return Ok(items);
        }
        loop {
            items.push(self.expression()?);
            if !self.eat(&Tok::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }

    /// comma separated parameter names up to and including `)`
    fn params(&mut self) -> Result<Vec<VarName>> {
        let mut params = Vec::new();
        if self.eat(&Tok::ParenClose) {
            return Ok(params);
        }
        loop {
            match self.peek() {
                | Some(Tok::Ident(name)) => {
                    params.push(VarName::from(name));
                    self.advance();
                }
                | _ => Err(self.unexpected("a parameter name"))?,
            }
            if !self.eat(&Tok::Comma) {
                break;
            }
        }
        self.expect(Tok::ParenClose)?;
        Ok(params)
    }
}

fn unquote(lit: &str) -> String {
    lit[1..lit.len() - 1].to_string()
}

fn arith_op(tok: &Tok<'_>) -> Option<ArithOp> {
    match tok {
        | Tok::Plus => Some(ArithOp::Add),
        | Tok::Minus => Some(ArithOp::Sub),
        | Tok::Star => Some(ArithOp::Mul),
        | Tok::Slash => Some(ArithOp::Div),
        | Tok::Percent => Some(ArithOp::Mod),
        | _ => None,
    }
}

fn comp_op(tok: &Tok<'_>) -> Option<CompOp> {
    match tok {
        | Tok::EqEq => Some(CompOp::Eq),
        | Tok::NotEq => Some(CompOp::Ne),
        | Tok::Lt => Some(CompOp::Lt),
        | Tok::Gt => Some(CompOp::Gt),
        | Tok::Le => Some(CompOp::Le),
        | Tok::Ge => Some(CompOp::Ge),
        | _ => None,
    }
}
