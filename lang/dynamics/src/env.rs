//! Scope stack read and written by the reduction rules.

use stride_syntax::{Bindings, Term, VarName};

/// Name of the slot a `return` writes to; no program may bind it.
pub const RETURN_SLOT: &str = "_return_";

/// One level of the environment: a function frame, or the global scope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scope {
    pub bindings: Bindings,
    /// set by `return`; a run halts as soon as its top scope has one
    pub ret: Option<Term>,
}

impl Scope {
    pub fn new(bindings: Bindings) -> Self {
        Scope { bindings, ret: None }
    }
}

/// Stack of scopes. The bottom (global) scope is always present.
#[derive(Clone, Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment { scopes: vec![Scope::default()] }
    }

    /// Binds `name` in the top scope.
    pub fn put(&mut self, name: VarName, value: Term) {
        self.top_mut().bindings.insert(name, value);
    }
    /// Innermost binding of `name`.
    pub fn get(&self, name: &VarName) -> Option<&Term> {
        self.scopes.iter().rev().find_map(|scope| scope.bindings.get(name))
    }
    pub fn contains(&self, name: &VarName) -> bool {
        self.get(name).is_some()
    }

    pub fn push_scope(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }
    /// Pops the top scope; the global scope is never popped.
    pub fn pop_scope(&mut self) -> Option<Scope> {
        if self.scopes.len() > 1 { self.scopes.pop() } else { None }
    }
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn top(&self) -> &Scope {
        // never empty
        &self.scopes[self.scopes.len() - 1]
    }
    pub fn top_mut(&mut self) -> &mut Scope {
        let idx = self.scopes.len() - 1;
        &mut self.scopes[idx]
    }

    /// All visible bindings; inner scopes shadow outer ones.
    pub fn flatten(&self) -> Bindings {
        self.scopes.iter().fold(Bindings::new(), |acc, scope| scope.bindings.clone().union(acc))
    }

    /// Splices `bindings` into the top scope, overwriting on clashes.
    pub fn merge(&mut self, bindings: Bindings) {
        let top = self.top_mut();
        top.bindings = bindings.union(std::mem::take(&mut top.bindings));
    }
}
