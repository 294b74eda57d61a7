use crate::{
    err::{EvalError, Result},
    syntax::Runtime,
};
use std::rc::Rc;
use stride_syntax::*;

type Args = Vec<Term>;

fn take<const N: usize>(name: &str, args: Args) -> Result<[Term; N]> {
    let found = args.len();
    args.try_into().map_err(|_| EvalError::ArityMismatch {
        callee: name.to_string(),
        expected: N,
        found,
    })
}

fn wrong(name: &str, expected: &'static str, found: &Term) -> EvalError {
    EvalError::TypeMismatch {
        context: format!("`{}`", name),
        expected,
        found: found.kind().to_string(),
    }
}

/* ---------------------------------- Pairs --------------------------------- */

fn pair(name: &str, term: Term) -> Result<(Term, Term)> {
    match term {
        | Term::Pair(Pair(car, cdr)) => Ok((*car, *cdr)),
        | other => Err(wrong(name, "a pair", &other)),
    }
}

pub fn car(args: Args, _: &mut Runtime<'_>) -> Result<Term> {
    let [p] = take("car", args)?;
    Ok(pair("car", p)?.0)
}

pub fn cdr(args: Args, _: &mut Runtime<'_>) -> Result<Term> {
    let [p] = take("cdr", args)?;
    Ok(pair("cdr", p)?.1)
}

pub fn setcar(args: Args, _: &mut Runtime<'_>) -> Result<Term> {
    let [p, v] = take("setcar", args)?;
    let (_, cdr) = pair("setcar", p)?;
    Ok(Term::pair(v, cdr))
}

pub fn setcdr(args: Args, _: &mut Runtime<'_>) -> Result<Term> {
    let [p, v] = take("setcdr", args)?;
    let (car, _) = pair("setcdr", p)?;
    Ok(Term::pair(car, v))
}

/* ---------------------------------- Lists --------------------------------- */

fn list_index(name: &str, list: Term, index: Term) -> Result<(Vec<Term>, usize)> {
    let items = match list {
        | Term::List(List(items)) => items,
        | other => Err(wrong(name, "a list", &other))?,
    };
    let index = match index {
        | Term::Number(n) => n,
        | other => Err(wrong(name, "a number index", &other))?,
    };
    match usize::try_from(index) {
        | Ok(idx) if idx < items.len() => Ok((items, idx)),
        | _ => Err(EvalError::IndexOutOfRange { index, len: items.len() }),
    }
}

pub fn elem(args: Args, _: &mut Runtime<'_>) -> Result<Term> {
    let [list, index] = take("elem", args)?;
    let (mut items, idx) = list_index("elem", list, index)?;
    Ok(items.swap_remove(idx))
}

pub fn setelem(args: Args, _: &mut Runtime<'_>) -> Result<Term> {
    let [list, index, value] = take("setelem", args)?;
    let (mut items, idx) = list_index("setelem", list, index)?;
    items[idx] = value;
    Ok(Term::List(List(items)))
}

/* ----------------------------------- I/O ---------------------------------- */

pub fn print(args: Args, rt: &mut Runtime<'_>) -> Result<Term> {
    let [value] = take("print", args)?;
    writeln!(rt.output, "{}", value.plain())?;
    Ok(Term::Number(0))
}

pub fn input(args: Args, rt: &mut Runtime<'_>) -> Result<Term> {
    let [prompt] = take("input", args)?;
    write!(rt.output, "{}", prompt.plain())?;
    rt.output.flush()?;
    let mut line = String::new();
    rt.input.read_line(&mut line)?;
    let trimmed = line.strip_suffix('\n').unwrap_or(&line);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    Ok(Term::str(trimmed))
}

/* -------------------------------- Functions ------------------------------- */

/// `function(a, b, c){body}` becomes
/// `function(a){return function(b){return function(c){body};};}`, the
/// outermost keeping the original closure.
pub fn curry(args: Args, _: &mut Runtime<'_>) -> Result<Term> {
    let [f] = take("curry", args)?;
    let Function { params, body, closure } = match f {
        | Term::Function(f) if f.params.len() >= 2 => f,
        | Term::Function(f) => return Ok(f.into()),
        | other => Err(wrong("curry", "a function", &other))?,
    };
    let mut params = params.into_iter().rev();
    let mut acc = Function { params: params.next().into_iter().collect(), body, closure: None };
    for param in params {
        acc = Function { params: vec![param], body: Rc::new(Term::ret(acc)), closure: None };
    }
    acc.closure = closure;
    Ok(acc.into())
}
