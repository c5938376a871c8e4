// src/definition.rs
//
// The `define` handler. Two shapes are meaningful:
//
//   (define <symbol> <literal>)            constant binding
//   (define (<name> <formals...>) <body>)  function binding
//
// A cond body is captured as a real function. Any other body binds the name
// to a copy of the current binding of the body's own operator, i.e. a plain
// alias; argument plumbing is deliberately not generalized beyond cond.

use std::rc::Rc;

use crate::ast::{Atom, Expr};
use crate::env::{Binding, CondClause, Environment, Interpreter, UserFn};

impl Expr {
    /// Installs a definition into the numeric environment. A no-op unless
    /// this is an expression whose operator is `define`.
    pub fn define(&self, interp: &mut Interpreter) {
        install(self, &mut interp.env);
    }

    /// The symbolic twin of `define`: the same binding written into the
    /// explain table, whose functions substitute rather than compute.
    pub fn define_explain(&self, interp: &mut Interpreter) {
        install(self, &mut interp.explain);
    }
}

fn install(node: &Expr, table: &mut Environment) {
    if !node.is_define() {
        return;
    }
    let children = node.children();
    let (Some(target), Some(body)) = (children.get(1), children.get(2)) else {
        return;
    };

    // Constant binding.
    if let (Expr::Literal { value: name, .. }, Expr::Literal { value, .. }) = (target, body) {
        let binding = match value {
            Atom::Number(n) => Binding::Number(*n),
            Atom::Symbol(s) => Binding::Text(s.clone()),
        };
        table.bind(&name.to_string(), binding);
        return;
    }

    // Function binding: (<name> <formals...>) in target position.
    let Expr::Expression { children: signature, .. } = target else {
        return;
    };
    let Some(Expr::Operator { name, .. }) = signature.first() else {
        return;
    };
    let formals: Vec<String> = signature[1..]
        .iter()
        .filter_map(|p| match p {
            Expr::Literal { value, .. } => Some(value.to_string()),
            _ => None,
        })
        .collect();

    // Register the formals as placeholders so free-variable lookups made
    // before any application resolve instead of exploding.
    for formal in &formals {
        table.bind(formal, Binding::Unbound);
    }

    if body.head_name() == Some("cond") {
        let clauses: Vec<CondClause> = body.children()[1..]
            .iter()
            .filter_map(|clause| {
                let parts = clause.children();
                match (parts.first(), parts.get(1)) {
                    (Some(test), Some(result)) => Some(CondClause {
                        test: test.clone(),
                        result: result.clone(),
                    }),
                    _ => None,
                }
            })
            .collect();
        let function = UserFn {
            name: name.clone(),
            formals,
            clauses,
        };
        table.bind(name, Binding::Function(Rc::new(function)));
        return;
    }

    // Alias: whatever the body's own operator is bound to right now.
    let alias = body
        .head_name()
        .and_then(|op| table.lookup(op).cloned())
        .unwrap_or(Binding::Unbound);
    table.bind(name, alias);
}
