//! Names that are dispatched before any user function lookup.

use crate::{
    err::{EvalError, Result},
    impls::*,
    syntax::Runtime,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use stride_syntax::Term;

pub type PrimFn = fn(Vec<Term>, &mut Runtime<'_>) -> Result<Term>;

pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub body: PrimFn,
}

impl Builtin {
    pub fn new(name: &'static str, arity: usize, body: PrimFn) -> Self {
        Builtin { name, arity, body }
    }
    /// Checks the argument count and runs the builtin.
    pub fn apply(&self, args: Vec<Term>, rt: &mut Runtime<'_>) -> Result<Term> {
        if args.len() != self.arity {
            return Err(EvalError::ArityMismatch {
                callee: self.name.to_string(),
                expected: self.arity,
                found: args.len(),
            });
        }
        (self.body)(args, rt)
    }
}

// to add a builtin, register it here and implement it in `impls`
fn std_library() -> Vec<Builtin> {
    vec![
        Builtin::new("car", 1, car),
        Builtin::new("cdr", 1, cdr),
        Builtin::new("setcar", 2, setcar),
        Builtin::new("setcdr", 2, setcdr),
        Builtin::new("elem", 2, elem),
        Builtin::new("setelem", 3, setelem),
        Builtin::new("print", 1, print),
        Builtin::new("input", 1, input),
        Builtin::new("curry", 1, curry),
    ]
}

pub static BUILTINS: Lazy<HashMap<&'static str, Builtin>> =
    Lazy::new(|| std_library().into_iter().map(|builtin| (builtin.name, builtin)).collect());
