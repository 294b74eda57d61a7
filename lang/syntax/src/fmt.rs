//! Canonical source rendering of terms.
//!
//! `Display` renders a term the way it would be written; [`Term::plain`] is
//! the console form used by `print`, which drops the quotes around strings.

use crate::*;
use std::fmt::{self, Display};

fn join<T: Display>(items: &[T], sep: &str) -> String {
    items.iter().map(|item| item.to_string()).collect::<Vec<_>>().join(sep)
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            | Term::Number(n) => write!(f, "{}", n),
            | Term::Boolean(true) => write!(f, "True"),
            | Term::Boolean(false) => write!(f, "False"),
            | Term::Str(s) => write!(f, "\"{}\"", s),
            | Term::Null(Null) => write!(f, "null"),
            | Term::Pair(Pair(car, cdr)) => write!(f, "({}, {})", car, cdr),
            | Term::List(List(items)) => write!(f, "[{}]", join(items, ", ")),
            | Term::Function(Function { params, body, closure: _ }) => {
                write!(f, "function({}){{{}}}", join(params, ","), body)
            }
            | Term::Variable(Variable(name)) => write!(f, "{}", name),
            | Term::Op(Op(lhs, op, rhs)) => write!(f, "{}{}{}", lhs, op.symbol(), rhs),
            | Term::Comp(Comp(lhs, op, rhs)) => write!(f, "{}{}{}", lhs, op.symbol(), rhs),
            | Term::Execute(Execute { callee, args }) => match callee.as_ref() {
                | Term::Variable(_) | Term::Execute(_) => {
                    write!(f, "{}({})", callee, join(args, ","))
                }
                | _ => write!(f, "({})({})", callee, join(args, ",")),
            },
            | Term::DoNothing(DoNothing) => write!(f, "do_nothing;"),
            | Term::Assign(Assign(name, value)) => write!(f, "{}={};", name, value),
            | Term::Sequence(seq) => {
                // walk the right spine in a loop; programs can be long
                let mut seq = seq;
                loop {
                    let Sequence(first, second) = seq;
                    write!(f, "{} ", first)?;
                    match second.as_ref() {
                        | Term::Sequence(next) => seq = next,
                        | last => break write!(f, "{}", last),
                    }
                }
            }
            | Term::If(If { cond, thn, els }) => {
                write!(f, "if {} then {{{}}} else {{{}}}", cond, thn, els)
            }
            | Term::While(While { cond, body }) => write!(f, "while {} {{{}}}", cond, body),
            | Term::Return(Return(value)) => write!(f, "return {};", value),
            | Term::ExecStmt(ExecStmt(call)) => write!(f, "{};", call),
            | Term::Import(Import(path)) => write!(f, "import \"{}\";", path),
        }
    }
}

impl Term {
    /// Console rendering: strings without their delimiters, everything else
    /// as [`Display`].
    pub fn plain(&self) -> String {
        match self {
            | Term::Str(s) => s.clone(),
            | _ => self.to_string(),
        }
    }
}

/// Renders a flattened environment as `[a:1, b:"x"]`.
pub struct EnvDisplay<'a>(pub &'a Bindings);

impl Display for EnvDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let EnvDisplay(bindings) = self;
        let entries =
            bindings.iter().map(|(name, value)| format!("{}:{}", name, value)).collect::<Vec<_>>();
        write!(f, "[{}]", entries.join(", "))
    }
}
