//! The closed set of terms rewritten by the stride machine.

pub mod fmt;
pub use fmt::*;

mod impls;


use derive_more::From;
use std::rc::Rc;

/* --------------------------------- Binder --------------------------------- */

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarName(pub String);

/// A snapshot of one scope: what a function closes over.
pub type Bindings = im::OrdMap<VarName, Term>;

/* -------------------------------- Operators ------------------------------- */

/// `+ - * / %`
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// `== != < > <= >=`
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum CompOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/* ---------------------------------- Value --------------------------------- */

/// the unit value, also what a call without `return` produces
#[derive(Clone, Debug, PartialEq)]
pub struct Null;

/// `(a, b)`
#[derive(Clone, Debug, PartialEq)]
pub struct Pair(pub Box<Term>, pub Box<Term>);

/// `[a, b, ...]`
#[derive(Clone, Debug, PartialEq)]
pub struct List(pub Vec<Term>);

/// `function(p, ...) { body }`
///
/// `closure` stays `None` until the function is first reduced, at which point
/// it holds a snapshot of the defining scope.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub params: Vec<VarName>,
    pub body: Rc<Term>,
    pub closure: Option<Bindings>,
}

/* ------------------------------- Expression ------------------------------- */

#[derive(Clone, Debug, PartialEq)]
pub struct Variable(pub VarName);

/// arithmetic `a op b`
#[derive(Clone, Debug, PartialEq)]
pub struct Op(pub Box<Term>, pub ArithOp, pub Box<Term>);

/// comparison `a op b`
#[derive(Clone, Debug, PartialEq)]
pub struct Comp(pub Box<Term>, pub CompOp, pub Box<Term>);

/// `f(a, ...)`; the callee is usually a [`Variable`]
#[derive(Clone, Debug, PartialEq)]
pub struct Execute {
    pub callee: Box<Term>,
    pub args: Vec<Term>,
}

/* -------------------------------- Statement ------------------------------- */

/// `do_nothing;`
#[derive(Clone, Debug, PartialEq)]
pub struct DoNothing;

/// `x = e;`
#[derive(Clone, Debug, PartialEq)]
pub struct Assign(pub VarName, pub Box<Term>);

/// `s1 s2`
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence(pub Box<Term>, pub Box<Term>);

/// `if c then { s1 } else { s2 }`
#[derive(Clone, Debug, PartialEq)]
pub struct If {
    pub cond: Box<Term>,
    pub thn: Box<Term>,
    pub els: Box<Term>,
}

/// `while c { s }`
#[derive(Clone, Debug, PartialEq)]
pub struct While {
    pub cond: Box<Term>,
    pub body: Box<Term>,
}

/// `return e;`
#[derive(Clone, Debug, PartialEq)]
pub struct Return(pub Box<Term>);

/// a call used as a statement, `f(a);`
#[derive(Clone, Debug, PartialEq)]
pub struct ExecStmt(pub Box<Term>);

/// `import "path";`
#[derive(Clone, Debug, PartialEq)]
pub struct Import(pub String);

/* ---------------------------------- Term ---------------------------------- */

#[derive(From, Clone, Debug, PartialEq)]
pub enum Term {
    // values
    Number(i64),
    Boolean(bool),
    Str(String),
    Null(Null),
    Pair(Pair),
    List(List),
    Function(Function),
    // expressions
    Variable(Variable),
    Op(Op),
    Comp(Comp),
    Execute(Execute),
    // statements
    DoNothing(DoNothing),
    Assign(Assign),
    Sequence(Sequence),
    If(If),
    While(While),
    Return(Return),
    ExecStmt(ExecStmt),
    Import(Import),
}
