// src/evaluator.rs

use std::fmt;

use crate::ast::{Atom, Expr};
use crate::env::{Binding, Builtin, Interpreter};
use crate::error::EvalError;
use crate::parser::build;

/// The result of evaluating an expression. `Unspecified` is what a bare
/// `define` form evaluates to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Unspecified,
}

impl Value {
    /// Numeric reading of any value; booleans coerce to 1/0, everything
    /// without a numeric reading is NaN.
    pub fn as_number(self) -> f64 {
        match self {
            Value::Number(n) => n,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::Unspecified => f64::NAN,
        }
    }

    pub fn is_truthy(self) -> bool {
        match self {
            Value::Number(n) => n != 0.0 && !n.is_nan(),
            Value::Bool(b) => b,
            Value::Unspecified => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Unspecified => write!(f, "undefined"),
        }
    }
}

// --- The Evaluator ---

impl Expr {
    pub fn eval(&self, interp: &mut Interpreter) -> Result<Value, EvalError> {
        match self {
            Expr::Literal { value, .. } => Ok(Value::Number(literal_number(value, interp))),

            // An operator node resolves through the environment like a
            // symbol. A callable in test position is true; that is what
            // makes a bare `else` the catch-all cond guard.
            Expr::Operator { name, .. } => match interp.env.lookup(name) {
                Some(Binding::Number(n)) => Ok(Value::Number(*n)),
                Some(Binding::Builtin(_) | Binding::Function(_)) => Ok(Value::Bool(true)),
                _ => Ok(Value::Number(f64::NAN)),
            },

            Expr::Expression { children, .. } => {
                let name = self
                    .head_name()
                    .ok_or_else(|| EvalError::FunctionNotFound(self.to_string()))?
                    .to_string();

                let callable = match interp.env.lookup(&name) {
                    Some(b @ (Binding::Builtin(_) | Binding::Function(_))) => b.clone(),
                    _ => return Err(EvalError::FunctionNotFound(name)),
                };

                let mut args = Vec::with_capacity(children.len().saturating_sub(1));
                for child in &children[1..] {
                    args.push(child.eval(interp)?);
                }

                apply_function(&callable, &args, interp)
            }
        }
    }
}

/// The numeric coercion a literal goes through: a previously defined symbol
/// resolves to its binding, anything else to the literal text itself. A
/// symbol with no numeric reading yields NaN rather than an error; the step
/// expander relies on that to degrade gracefully.
fn literal_number(atom: &Atom, interp: &Interpreter) -> f64 {
    match atom {
        Atom::Number(n) => *n,
        Atom::Symbol(s) => match interp.env.lookup(s) {
            Some(Binding::Number(n)) => *n,
            Some(Binding::Text(t)) => t.parse().unwrap_or(f64::NAN),
            _ => f64::NAN,
        },
    }
}

/// Applies a callable binding to already-evaluated arguments. A cond-bodied
/// function binds each formal parameter to its actual value in the numeric
/// environment, then evaluates the clause tests in order and returns the
/// first truthy clause's evaluated result.
pub fn apply_function(
    callable: &Binding,
    args: &[Value],
    interp: &mut Interpreter,
) -> Result<Value, EvalError> {
    match callable {
        Binding::Builtin(op) => execute_builtin(*op, args),

        Binding::Function(f) => {
            // Clone the Rc so the function body outlives the rebinding of
            // its own formals below.
            let f = f.clone();
            for (i, formal) in f.formals.iter().enumerate() {
                let bound = match args.get(i) {
                    Some(v) => Binding::Number(v.as_number()),
                    None => Binding::Unbound,
                };
                interp.env.bind(formal, bound);
            }
            for clause in &f.clauses {
                if clause.test.eval(interp)?.is_truthy() {
                    return clause.result.eval(interp);
                }
            }
            Err(EvalError::CondFallthrough(f.name.clone()))
        }

        _ => Err(EvalError::FunctionNotFound("<not callable>".to_string())),
    }
}

pub fn execute_builtin(op: Builtin, args: &[Value]) -> Result<Value, EvalError> {
    let nums = || args.iter().map(|v| v.as_number());
    match op {
        Builtin::Add => Ok(Value::Number(nums().sum())),
        Builtin::Sub => {
            let first = nums().next().unwrap_or(0.0);
            let rest: f64 = nums().skip(1).sum();
            Ok(Value::Number(first - rest))
        }
        Builtin::Mul => Ok(Value::Number(nums().product())),
        Builtin::Eq => {
            let x = args.first().map_or(f64::NAN, |v| v.as_number());
            let y = args.get(1).map_or(f64::NAN, |v| v.as_number());
            Ok(Value::Bool(x == y))
        }
        // The catch-all guard of a cond body.
        Builtin::Else => Ok(Value::Bool(true)),
        Builtin::Define => Ok(Value::Unspecified),
    }
}

impl Interpreter {
    /// Build-then-evaluate convenience for a whole source string.
    pub fn evaluate(&mut self, input: &str) -> Result<Value, EvalError> {
        match build(input)? {
            Some(tree) => tree.eval(self),
            None => Ok(Value::Unspecified),
        }
    }
}
