// src/expander.rs
//
// The step expander: partial-evaluation views of a tree (`explain`) and
// one-step / run-to-fixpoint substitution traces (`expand`, `expand_to_end`)
// driven by the symbolic explain table.

use crate::ast::{Atom, Expr};
use crate::env::{Binding, Interpreter, UserFn};
use crate::error::{EvalError, ParseError};
use crate::evaluator::{apply_function, Value};
use crate::parser::build;

/// Safety cap on run-to-fixpoint traces.
const MAX_EXPANSION_STEPS: usize = 100;

impl Expr {
    /// Renders the tree with every sub-expression at nesting `level` or
    /// deeper reduced to its value. `explain(1)` is the fully evaluated
    /// form; `explain(height + 1)` is the original unreduced text.
    pub fn explain(&self, level: usize, interp: &mut Interpreter) -> Result<String, EvalError> {
        match self {
            Expr::Literal { value, .. } => Ok(render_literal(value, &interp.env)),
            Expr::Operator { name, .. } => Ok(name.clone()),
            Expr::Expression { children, depth, .. } => {
                if level <= depth + 1 {
                    return Ok(self.eval(interp)?.to_string());
                }
                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    match child {
                        Expr::Literal { value, .. } => parts.push(value.to_string()),
                        Expr::Operator { name, .. } => parts.push(name.clone()),
                        Expr::Expression { .. } => parts.push(child.explain(level, interp)?),
                    }
                }
                if parts.is_empty() {
                    return Ok("(-)".to_string());
                }
                Ok(format!("({})", parts.join(" ")))
            }
        }
    }

    /// The full substitution trace: the unreduced form first, then one line
    /// per level down to the final value.
    pub fn explain_step_by_step(&self, interp: &mut Interpreter) -> Result<Vec<String>, EvalError> {
        let mut steps = vec![self.explain(usize::MAX, interp)?];
        for level in (1..=self.height()).rev() {
            steps.push(self.explain(level, interp)?);
        }
        Ok(steps)
    }

    /// Textual rendering through the symbolic table: symbols the explain
    /// table binds to a number or text render as that substitution, unbound
    /// formals render as their own name.
    pub fn flatten(&self, interp: &Interpreter) -> String {
        match self {
            Expr::Literal { value, .. } => render_literal(value, &interp.explain),
            Expr::Operator { name, .. } => name.clone(),
            Expr::Expression { children, .. } => {
                let parts: Vec<String> = children.iter().map(|c| c.flatten(interp)).collect();
                format!("({})", parts.join(" "))
            }
        }
    }

    /// Performs exactly one substitution step and returns the resulting
    /// text. Compound arguments are reduced in place first: sub-calls to
    /// symbolically defined operations expand recursively, anything else
    /// collapses to its evaluated value (NaN included; that is the
    /// deliberate degradation for unresolvable symbols, not an error).
    pub fn expand(&mut self, interp: &mut Interpreter) -> Result<String, EvalError> {
        if !matches!(self, Expr::Expression { .. }) {
            return Ok(self.flatten(interp));
        }

        if self
            .children()
            .iter()
            .skip(1)
            .all(|c| matches!(c, Expr::Literal { .. }))
        {
            return self.expand_leaf_call(interp);
        }

        if let Expr::Expression { children, .. } = self {
            for i in 1..children.len() {
                if matches!(children[i], Expr::Literal { .. }) {
                    continue;
                }
                let symbolic = children[i]
                    .head_name()
                    .map_or(false, |op| {
                        matches!(interp.explain.lookup(op), Some(Binding::Function(_)))
                    });
                if symbolic {
                    let text = children[i].expand(interp)?;
                    let rebuilt = build(&text)?.ok_or_else(|| {
                        EvalError::Parse(ParseError::MalformedExpression(text.clone()))
                    })?;
                    children[i] = rebuilt;
                } else {
                    // Collapse through the value's own rendering so a
                    // boolean sub-result stays `true`/`false` in the trace.
                    let value = children[i].eval(interp)?;
                    children[i] = Expr::Literal {
                        value: Atom::parse(&value.to_string()),
                        depth: 1,
                    };
                }
            }
        }

        Ok(self.flatten(interp))
    }

    // The all-arguments-literal case: apply the symbolic definition if one
    // exists, otherwise fall back to the real operation and stringify.
    fn expand_leaf_call(&self, interp: &mut Interpreter) -> Result<String, EvalError> {
        let name = self
            .head_name()
            .ok_or_else(|| EvalError::FunctionNotFound(self.to_string()))?
            .to_string();

        let mut actuals = Vec::new();
        for child in self.children().iter().skip(1) {
            actuals.push(literal_actual(child, interp)?);
        }

        if let Some(Binding::Function(f)) = interp.explain.lookup(&name) {
            let f = f.clone();
            let branch = apply_symbolic(&f, &actuals, interp)?;
            return Ok(branch.flatten(interp));
        }

        let callable = match interp.env.lookup(&name) {
            Some(b @ (Binding::Builtin(_) | Binding::Function(_))) => b.clone(),
            _ => return Err(EvalError::FunctionNotFound(name)),
        };
        let args: Vec<Value> = actuals
            .iter()
            .map(|b| match b {
                Binding::Number(n) => Value::Number(*n),
                _ => Value::Number(f64::NAN),
            })
            .collect();
        Ok(apply_function(&callable, &args, interp)?.to_string())
    }

    /// Repeatedly expands and re-parses until the result is no longer a
    /// call expression or the step cap is hit. A NaN result stops the trace
    /// early, returning what was collected so far.
    pub fn expand_to_end(&self, interp: &mut Interpreter) -> Result<Vec<String>, EvalError> {
        let mut steps = Vec::new();
        let mut current = self.clone();
        let mut count = 1;

        while matches!(current, Expr::Expression { .. }) && count < MAX_EXPANSION_STEPS {
            let expanded = current.expand(interp)?;
            if expanded == "NaN" {
                return Ok(steps);
            }
            steps.push(expanded.clone());

            match build(&expanded)? {
                Some(tree) => current = tree,
                None => break,
            }
            count += 1;
        }

        Ok(steps)
    }
}

/// Applies a symbolic function: actual parameters are written into both
/// tables (the numeric one so clause tests evaluate, the symbolic one so
/// `flatten` substitutes them), and the matching clause's result subtree is
/// returned unevaluated.
fn apply_symbolic(
    f: &UserFn,
    actuals: &[Binding],
    interp: &mut Interpreter,
) -> Result<Expr, EvalError> {
    for (i, formal) in f.formals.iter().enumerate() {
        let bound = actuals.get(i).cloned().unwrap_or(Binding::Unbound);
        interp.env.bind(formal, bound.clone());
        interp.explain.bind(formal, bound);
    }
    for clause in &f.clauses {
        if clause.test.eval(interp)?.is_truthy() {
            return Ok(clause.result.clone());
        }
    }
    Err(EvalError::CondFallthrough(f.name.clone()))
}

// Evaluates a literal argument for substitution. A NaN result degrades to
// the literal's own text so the trace can still be displayed; that is the
// one diagnostic the expander swallows.
fn literal_actual(child: &Expr, interp: &mut Interpreter) -> Result<Binding, EvalError> {
    let value = child.eval(interp)?.as_number();
    if value.is_nan() {
        eprintln!("expand: no numeric value for '{}', keeping it symbolic", child);
        return Ok(match child {
            Expr::Literal { value: Atom::Symbol(s), .. } => Binding::Text(s.clone()),
            _ => Binding::Text(child.to_string()),
        });
    }
    Ok(Binding::Number(value))
}

// Literal rendering against a table: numbers print themselves, a bound
// symbol prints its substitution, an unbound or callable one its own name.
fn render_literal(atom: &Atom, table: &crate::env::Environment) -> String {
    match atom {
        Atom::Number(n) => n.to_string(),
        Atom::Symbol(s) => match table.lookup(s) {
            Some(Binding::Number(n)) => n.to_string(),
            Some(Binding::Text(t)) => t.clone(),
            _ => s.clone(),
        },
    }
}
