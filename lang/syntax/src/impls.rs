use crate::*;
use std::fmt;

macro_rules! impl_name {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                let $name(name) = self;
                name.as_str()
            }
        }
        impl<T: AsRef<str>> From<T> for $name {
            fn from(name: T) -> Self {
                $name(name.as_ref().to_string())
            }
        }
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

impl_name!(VarName);

impl ArithOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            | ArithOp::Add => "+",
            | ArithOp::Sub => "-",
            | ArithOp::Mul => "*",
            | ArithOp::Div => "/",
            | ArithOp::Mod => "%",
        }
    }
}

impl CompOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            | CompOp::Eq => "==",
            | CompOp::Ne => "!=",
            | CompOp::Lt => "<",
            | CompOp::Gt => ">",
            | CompOp::Le => "<=",
            | CompOp::Ge => ">=",
        }
    }
}

/* ------------------------------ Constructors ------------------------------ */

fn bx(t: impl Into<Term>) -> Box<Term> {
    Box::new(t.into())
}

impl Term {
    pub fn null() -> Self {
        Null.into()
    }
    pub fn str(s: impl Into<String>) -> Self {
        Term::Str(s.into())
    }
    pub fn var(name: impl Into<VarName>) -> Self {
        Variable(name.into()).into()
    }
    pub fn pair(car: impl Into<Term>, cdr: impl Into<Term>) -> Self {
        Pair(bx(car), bx(cdr)).into()
    }
    pub fn list(items: impl IntoIterator<Item = Term>) -> Self {
        List(items.into_iter().collect()).into()
    }
    pub fn function(params: &[&str], body: impl Into<Term>) -> Self {
        Function {
            params: params.iter().map(VarName::from).collect(),
            body: Rc::new(body.into()),
            closure: None,
        }
        .into()
    }
    pub fn op(lhs: impl Into<Term>, op: ArithOp, rhs: impl Into<Term>) -> Self {
        Op(bx(lhs), op, bx(rhs)).into()
    }
    pub fn comp(lhs: impl Into<Term>, op: CompOp, rhs: impl Into<Term>) -> Self {
        Comp(bx(lhs), op, bx(rhs)).into()
    }
    /// a call of the function bound to `name`
    pub fn call(name: impl Into<VarName>, args: impl IntoIterator<Item = Term>) -> Self {
        Term::apply(Term::var(name), args)
    }
    /// a call of an arbitrary callee term
    pub fn apply(callee: impl Into<Term>, args: impl IntoIterator<Item = Term>) -> Self {
        Execute { callee: bx(callee), args: args.into_iter().collect() }.into()
    }
    pub fn do_nothing() -> Self {
        DoNothing.into()
    }
    pub fn assign(name: impl Into<VarName>, value: impl Into<Term>) -> Self {
        Assign(name.into(), bx(value)).into()
    }
    pub fn seq(first: impl Into<Term>, second: impl Into<Term>) -> Self {
        Sequence(bx(first), bx(second)).into()
    }
    /// right-nested sequence of statements; empty is `do_nothing;`
    pub fn block(stmts: impl IntoIterator<Item = Term>) -> Self {
        let mut stmts: Vec<Term> = stmts.into_iter().collect();
        let Some(mut acc) = stmts.pop() else { return Term::do_nothing() };
        while let Some(stmt) = stmts.pop() {
            acc = Term::seq(stmt, acc);
        }
        acc
    }
    pub fn if_(cond: impl Into<Term>, thn: impl Into<Term>, els: impl Into<Term>) -> Self {
        If { cond: bx(cond), thn: bx(thn), els: bx(els) }.into()
    }
    pub fn while_(cond: impl Into<Term>, body: impl Into<Term>) -> Self {
        While { cond: bx(cond), body: bx(body) }.into()
    }
    pub fn ret(value: impl Into<Term>) -> Self {
        Return(bx(value)).into()
    }
    pub fn exec(call: impl Into<Term>) -> Self {
        ExecStmt(bx(call)).into()
    }
    pub fn import(path: impl Into<String>) -> Self {
        Import(path.into()).into()
    }
}

/* ---------------------------------- Drop ---------------------------------- */

// Unlinks the right spine one node at a time, so dropping a long program
// does not recurse once per statement.
impl Drop for Sequence {
    fn drop(&mut self) {
        let mut rest = std::mem::replace(self.1.as_mut(), Term::do_nothing());
        while let Term::Sequence(seq) = &mut rest {
            let next = std::mem::replace(seq.1.as_mut(), Term::do_nothing());
            rest = next;
        }
    }
}

/* --------------------------------- Queries -------------------------------- */

impl Term {
    /// Name of the term's kind, as used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            | Term::Number(_) => "number",
            | Term::Boolean(_) => "boolean",
            | Term::Str(_) => "string",
            | Term::Null(_) => "null",
            | Term::Pair(_) => "pair",
            | Term::List(_) => "list",
            | Term::Function(_) => "function",
            | Term::Variable(_) => "variable",
            | Term::Op(_) => "arithmetic",
            | Term::Comp(_) => "comparison",
            | Term::Execute(_) => "call",
            | Term::DoNothing(_) => "do_nothing",
            | Term::Assign(_) => "assignment",
            | Term::Sequence(_) => "sequence",
            | Term::If(_) => "if",
            | Term::While(_) => "while",
            | Term::Return(_) => "return",
            | Term::ExecStmt(_) => "call statement",
            | Term::Import(_) => "import",
        }
    }
}
