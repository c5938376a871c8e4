// src/env.rs

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Expr;

// --- Primitives ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Add,
    Sub,
    Mul,
    Eq,
    Else,
    /// Placeholder so `define` resolves in operator position; the real
    /// behavior lives in the definition handler.
    Define,
}

pub static PRIMITIVES: phf::Map<&'static str, Builtin> = phf::phf_map! {
    "+" => Builtin::Add,
    "-" => Builtin::Sub,
    "*" => Builtin::Mul,
    "=" => Builtin::Eq,
    "else" => Builtin::Else,
    "define" => Builtin::Define,
};

// --- Bindings ---

/// What a symbol can be bound to.
#[derive(Debug, Clone)]
pub enum Binding {
    Number(f64),
    /// A raw substitution string; how a NaN-valued actual parameter is
    /// carried through a symbolic trace.
    Text(String),
    Builtin(Builtin),
    Function(Rc<UserFn>),
    /// Formal parameters are registered up front so later lookups of a free
    /// variable resolve to a placeholder instead of nothing.
    Unbound,
}

/// A user-defined cond-bodied function: the formal parameter names and the
/// captured (test, result) subtrees, in source order.
#[derive(Debug)]
pub struct UserFn {
    pub name: String,
    pub formals: Vec<String>,
    pub clauses: Vec<CondClause>,
}

#[derive(Debug, Clone)]
pub struct CondClause {
    pub test: Expr,
    pub result: Expr,
}

// --- The symbol table ---

#[derive(Debug, Default)]
pub struct Environment {
    table: HashMap<String, Binding>,
}

impl Environment {
    /// An empty table; the symbolic explain table starts this way.
    pub fn empty() -> Self {
        Environment { table: HashMap::new() }
    }

    /// A table pre-seeded with the arithmetic and comparison primitives.
    pub fn prelude() -> Self {
        let mut env = Environment::empty();
        for (name, op) in PRIMITIVES.entries() {
            env.bind(name, Binding::Builtin(*op));
        }
        env
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.table.get(name)
    }

    pub fn bind(&mut self, name: &str, binding: Binding) {
        self.table.insert(name.to_string(), binding);
    }
}

// --- The session ---

/// One interpreter session: the numeric environment and its parallel
/// symbolic twin. Every `define` writes the numeric table and every
/// `define_explain` the symbolic one; the tables intentionally diverge in
/// what they store (evaluated values vs. unevaluated bodies). Definitions
/// persist for the lifetime of the session, across independent `build`
/// calls.
#[derive(Debug)]
pub struct Interpreter {
    pub env: Environment,
    pub explain: Environment,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            env: Environment::prelude(),
            explain: Environment::empty(),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
