//! Single-step rewrite rules and the machine that drives them.

use crate::{
    builtin::BUILTINS,
    env::{RETURN_SLOT, Scope},
    err::{EvalError, Result},
    syntax::{Runtime, UnboundPolicy},
};
use log::{debug, warn};
use std::{
    mem,
    ops::{Deref, DerefMut},
};
use stride_syntax::*;

pub trait Reduce: Sized {
    /// Whether [`Reduce::reduce`] would rewrite the term.
    fn reducible(&self) -> bool;
    /// One rewrite step.
    fn reduce(self, rt: &mut Runtime<'_>) -> Result<Self>;
}

pub enum Step<T, Out> {
    Done(Out),
    Step(T),
}

/// A reduction run over one term: the whole program, a function body or an
/// imported file.
pub struct Machine {
    term: Term,
}

impl Machine {
    pub fn new(term: Term) -> Self {
        Machine { term }
    }
    fn halted(&self, rt: &Runtime<'_>) -> bool {
        !self.term.reducible() || rt.env.top().ret.is_some()
    }
    pub fn step(self, rt: &mut Runtime<'_>) -> Result<Step<Self, Term>> {
        rt.trace_step(&self.term)?;
        if self.halted(rt) {
            return Ok(Step::Done(self.term));
        }
        Ok(Step::Step(Machine { term: self.term.reduce(rt)? }))
    }
    /// Steps until the term is irreducible or the top scope has returned.
    pub fn run(self, rt: &mut Runtime<'_>) -> Result<Term> {
        debug!("run started at depth {}", rt.env.depth());
        let mut machine = self;
        loop {
            match machine.step(rt)? {
                | Step::Done(term) => {
                    debug!("run halted at depth {}", rt.env.depth());
                    break Ok(term);
                }
                | Step::Step(next) => machine = next,
            }
        }
    }
}

impl Runtime<'_> {
    /// Runs a whole program in the global scope.
    pub fn run(&mut self, program: Term) -> Result<Term> {
        Machine::new(program).run(self)
    }
}

/// A pushed call frame; popped when dropped, so a failing body still leaves
/// the caller's stack intact.
struct Frame<'a, 'rt> {
    rt: &'a mut Runtime<'rt>,
    live: bool,
}

impl<'a, 'rt> Frame<'a, 'rt> {
    fn enter(rt: &'a mut Runtime<'rt>, scope: Scope) -> Self {
        rt.env.push_scope(scope);
        Frame { rt, live: true }
    }
    fn leave(mut self) -> Option<Scope> {
        self.live = false;
        self.rt.env.pop_scope()
    }
}

impl<'rt> Deref for Frame<'_, 'rt> {
    type Target = Runtime<'rt>;
    fn deref(&self) -> &Self::Target {
        self.rt
    }
}

impl<'rt> DerefMut for Frame<'_, 'rt> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.rt
    }
}

impl Drop for Frame<'_, '_> {
    fn drop(&mut self) {
        if self.live {
            self.rt.env.pop_scope();
        }
    }
}

fn reserved(name: &VarName) -> Result<()> {
    if name.as_str() == RETURN_SLOT { Err(EvalError::ReservedName(name.clone())) } else { Ok(()) }
}

/* ---------------------------------- Term ---------------------------------- */

impl Reduce for Term {
    fn reducible(&self) -> bool {
        match self {
            | Term::Number(_) | Term::Boolean(_) | Term::Str(_) | Term::Null(_) => false,
            | Term::Pair(Pair(car, cdr)) => car.reducible() || cdr.reducible(),
            | Term::List(List(items)) => items.iter().any(Reduce::reducible),
            | Term::Function(Function { closure, .. }) => closure.is_none(),
            | Term::Variable(_) | Term::Op(_) | Term::Comp(_) | Term::Execute(_) => true,
            | Term::DoNothing(_) => false,
            | Term::Assign(_)
            | Term::Sequence(_)
            | Term::If(_)
            | Term::While(_)
            | Term::Return(_)
            | Term::ExecStmt(_)
            | Term::Import(_) => true,
        }
    }

    fn reduce(self, rt: &mut Runtime<'_>) -> Result<Self> {
        match self {
            | Term::Number(_) | Term::Boolean(_) | Term::Str(_) | Term::Null(_) => Ok(self),
            | Term::Pair(Pair(car, cdr)) => {
                if car.reducible() {
                    Ok(Term::pair((*car).reduce(rt)?, *cdr))
                } else {
                    Ok(Term::pair(*car, (*cdr).reduce(rt)?))
                }
            }
            | Term::List(List(mut items)) => {
                if let Some(idx) = items.iter().position(Reduce::reducible) {
                    let item = mem::replace(&mut items[idx], Term::null());
                    items[idx] = item.reduce(rt)?;
                }
                Ok(Term::List(List(items)))
            }
            | Term::Function(Function { params, body, closure: None }) => {
                for param in &params {
                    reserved(param)?;
                }
                let closure = rt.env.top().bindings.clone();
                Ok(Function { params, body, closure: Some(closure) }.into())
            }
            | Term::Function(_) => Ok(self),
            | Term::Variable(Variable(name)) => match rt.env.get(&name) {
                | Some(value) => Ok(value.clone()),
                | None => unbound(name, rt),
            },
            | Term::Op(Op(lhs, op, rhs)) => {
                if lhs.reducible() {
                    Ok(Term::op((*lhs).reduce(rt)?, op, *rhs))
                } else if rhs.reducible() {
                    Ok(Term::op(*lhs, op, (*rhs).reduce(rt)?))
                } else {
                    arith(*lhs, op, *rhs)
                }
            }
            | Term::Comp(Comp(lhs, op, rhs)) => {
                if lhs.reducible() {
                    Ok(Term::comp((*lhs).reduce(rt)?, op, *rhs))
                } else if rhs.reducible() {
                    Ok(Term::comp(*lhs, op, (*rhs).reduce(rt)?))
                } else {
                    compare(*lhs, op, *rhs)
                }
            }
            | Term::Execute(Execute { callee, mut args }) => {
                if !matches!(callee.as_ref(), Term::Variable(_)) && callee.reducible() {
                    return Ok(Term::apply((*callee).reduce(rt)?, args));
                }
                if let Some(idx) = args.iter().position(Reduce::reducible) {
                    let arg = mem::replace(&mut args[idx], Term::null());
                    args[idx] = arg.reduce(rt)?;
                    return Ok(Term::apply(*callee, args));
                }
                call(*callee, args, rt)
            }
            | Term::DoNothing(_) => Ok(self),
            | Term::Assign(Assign(name, value)) => {
                reserved(&name)?;
                if value.reducible() {
                    Ok(Term::assign(name, (*value).reduce(rt)?))
                } else {
                    rt.env.put(name, *value);
                    Ok(Term::do_nothing())
                }
            }
            | Term::Sequence(mut seq) => {
                let Sequence(first, second) = &mut seq;
                if first.reducible() {
                    let stepped = mem::replace(first.as_mut(), Term::do_nothing()).reduce(rt)?;
                    **first = stepped;
                    Ok(Term::Sequence(seq))
                } else {
                    Ok(mem::replace(second.as_mut(), Term::do_nothing()))
                }
            }
            | Term::If(If { cond, thn, els }) => {
                if cond.reducible() {
                    Ok(Term::if_((*cond).reduce(rt)?, *thn, *els))
                } else if truthy(&cond) {
                    Ok(*thn)
                } else {
                    Ok(*els)
                }
            }
            | Term::While(While { cond, body }) => {
                // the unrolled body is an owned copy; `body` stays the template
                let unrolled = Term::seq(body.as_ref().clone(), While { cond: cond.clone(), body });
                Ok(Term::if_(*cond, unrolled, Term::do_nothing()))
            }
            | Term::Return(Return(value)) => {
                if value.reducible() {
                    Ok(Term::ret((*value).reduce(rt)?))
                } else {
                    rt.env.top_mut().ret = Some(*value);
                    Ok(Term::do_nothing())
                }
            }
            | Term::ExecStmt(ExecStmt(call)) => {
                if call.reducible() { Ok(Term::exec((*call).reduce(rt)?)) } else { Ok(Term::do_nothing()) }
            }
            | Term::Import(Import(path)) => {
                import(path, rt)?;
                Ok(Term::do_nothing())
            }
        }
    }
}

fn unbound(name: VarName, rt: &Runtime<'_>) -> Result<Term> {
    match rt.options.unbound {
        | UnboundPolicy::Strict => Err(EvalError::UnboundName(name)),
        | UnboundPolicy::Permissive => {
            warn!("unbound name `{}` reduced to null", name);
            Ok(Term::null())
        }
    }
}

/// `Boolean` itself, non-zero numbers, non-empty strings and lists, and every
/// pair and function are true.
pub fn truthy(term: &Term) -> bool {
    match term {
        | Term::Boolean(b) => *b,
        | Term::Number(n) => *n != 0,
        | Term::Str(s) => !s.is_empty(),
        | Term::List(List(items)) => !items.is_empty(),
        | Term::Pair(_) | Term::Function(_) => true,
        | _ => false,
    }
}

/* ------------------------------- Operators -------------------------------- */

fn mismatch(context: impl ToString, expected: &'static str, lhs: &Term, rhs: &Term) -> EvalError {
    EvalError::TypeMismatch {
        context: context.to_string(),
        expected,
        found: format!("{} and {}", lhs.kind(), rhs.kind()),
    }
}

fn arith(lhs: Term, op: ArithOp, rhs: Term) -> Result<Term> {
    match (lhs, rhs) {
        | (Term::Number(a), Term::Number(b)) => Ok(Term::Number(int_arith(a, op, b)?)),
        | (Term::Str(a), Term::Str(b)) if op == ArithOp::Add => Ok(Term::Str(a + &b)),
        | (Term::Str(a), b) if op == ArithOp::Add => Ok(Term::Str(a + &b.to_string())),
        | (a, Term::Str(b)) if op == ArithOp::Add => Ok(Term::Str(a.to_string() + &b)),
        | (a, b) => Err(mismatch(format!("`{}`", op.symbol()), "two numbers", &a, &b)),
    }
}

fn int_arith(a: i64, op: ArithOp, b: i64) -> Result<i64> {
    let overflow = || EvalError::Overflow(op.symbol());
    match op {
        | ArithOp::Add => a.checked_add(b).ok_or_else(overflow),
        | ArithOp::Sub => a.checked_sub(b).ok_or_else(overflow),
        | ArithOp::Mul => a.checked_mul(b).ok_or_else(overflow),
        | ArithOp::Div => {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            let q = a.checked_div(b).ok_or_else(overflow)?;
            // round toward negative infinity
            if a % b != 0 && (a < 0) != (b < 0) { Ok(q - 1) } else { Ok(q) }
        }
        | ArithOp::Mod => {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            // `i64::MIN % -1` overflows in the host but is 0
            let r = if b == -1 { 0 } else { a % b };
            // remainder takes the sign of the divisor
            if r != 0 && (r < 0) != (b < 0) { Ok(r + b) } else { Ok(r) }
        }
    }
}

fn compare(lhs: Term, op: CompOp, rhs: Term) -> Result<Term> {
    let ord = match (op, &lhs, &rhs) {
        | (CompOp::Eq, _, _) => return Ok(Term::Boolean(lhs == rhs)),
        | (CompOp::Ne, _, _) => return Ok(Term::Boolean(lhs != rhs)),
        | (_, Term::Number(a), Term::Number(b)) => a.cmp(b),
        | (_, Term::Str(a), Term::Str(b)) => a.cmp(b),
        | (_, a, b) => {
            Err(mismatch(format!("`{}`", op.symbol()), "two numbers or two strings", a, b))?
        }
    };
    let res = match op {
        | CompOp::Eq => ord.is_eq(),
        | CompOp::Ne => ord.is_ne(),
        | CompOp::Lt => ord.is_lt(),
        | CompOp::Gt => ord.is_gt(),
        | CompOp::Le => ord.is_le(),
        | CompOp::Ge => ord.is_ge(),
    };
    Ok(Term::Boolean(res))
}

/* ---------------------------------- Calls --------------------------------- */

fn call(callee: Term, args: Vec<Term>, rt: &mut Runtime<'_>) -> Result<Term> {
    let name = match callee {
        | Term::Variable(Variable(name)) => name,
        | Term::Function(f) => return invoke("function".to_string(), f, args, rt),
        | other => {
            return Err(EvalError::NotCallable { callee: other.to_string(), kind: other.kind() });
        }
    };
    if let Some(builtin) = BUILTINS.get(name.as_str()) {
        return builtin.apply(args, rt);
    }
    match rt.env.get(&name) {
        | Some(Term::Function(f)) => {
            let f = f.clone();
            invoke(name.to_string(), f, args, rt)
        }
        | Some(other) => Err(EvalError::NotCallable { callee: name.to_string(), kind: other.kind() }),
        | None => unbound(name, rt),
    }
}

/// Runs `f` in a fresh frame built from its closure and the arguments, and
/// yields whatever the body returned, or `null`.
fn invoke(callee: String, f: Function, args: Vec<Term>, rt: &mut Runtime<'_>) -> Result<Term> {
    let Function { params, body, closure } = f;
    if params.len() != args.len() {
        return Err(EvalError::ArityMismatch { callee, expected: params.len(), found: args.len() });
    }
    let mut scope = Scope::new(closure.unwrap_or_default());
    for (param, arg) in params.into_iter().zip(args) {
        scope.bindings.insert(param, arg);
    }
    debug!("enter `{}` at depth {}", callee, rt.env.depth() + 1);
    let mut frame = Frame::enter(rt, scope);
    Machine::new(body.as_ref().clone()).run(&mut frame)?;
    let ret = frame.leave().and_then(|scope| scope.ret);
    debug!("leave `{}`", callee);
    Ok(ret.unwrap_or_else(Term::null))
}

/* --------------------------------- Import --------------------------------- */

/// Runs the file at `path` against a fresh environment and splices its global
/// bindings into the current top scope.
fn import(path: String, rt: &mut Runtime<'_>) -> Result<()> {
    if rt.imports.contains(&path) {
        return Err(EvalError::ImportCycle(path));
    }
    let program = rt.loader.load(&path)?;
    let saved = mem::take(&mut rt.env);
    rt.imports.push(path.clone());
    let res = Machine::new(program).run(rt);
    rt.imports.pop();
    let imported = mem::replace(&mut rt.env, saved);
    res?;
    let bindings = imported.top().bindings.clone();
    debug!("spliced {} binding(s) from `{}`", bindings.len(), path);
    rt.env.merge(bindings);
    Ok(())
}
