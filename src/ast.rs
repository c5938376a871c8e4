// src/ast.rs

use std::fmt;

/// An atomic value as it appears in the source text: a number if the text
/// parses as one, otherwise a symbol to be resolved against the environment
/// at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Number(f64),
    Symbol(String),
}

impl Atom {
    pub fn parse(text: &str) -> Atom {
        match text.parse::<f64>() {
            Ok(n) => Atom::Number(n),
            Err(_) => Atom::Symbol(text.to_string()),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Number(n) => write!(f, "{}", n),
            Atom::Symbol(s) => write!(f, "{}", s),
        }
    }
}

// The expression tree. Atoms never have children; an Expression's first
// child, if present, denotes the operator being applied and the rest are
// its arguments. `depth` is the nesting level at which the node was created
// (0 = outermost); `height` is the maximum nesting depth of the whole tree
// and is only meaningful on the root.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal { value: Atom, depth: usize },
    Operator { name: String, depth: usize },
    Expression { children: Vec<Expr>, depth: usize, height: usize },
}

impl Expr {
    pub fn depth(&self) -> usize {
        match self {
            Expr::Literal { depth, .. }
            | Expr::Operator { depth, .. }
            | Expr::Expression { depth, .. } => *depth,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Expr::Expression { height, .. } => *height,
            _ => 1,
        }
    }

    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::Expression { children, .. } => children,
            _ => &[],
        }
    }

    /// The name in operator position: the first child of a call, whether it
    /// was parsed as an `Operator` or re-entered the tree as a symbol.
    pub fn head_name(&self) -> Option<&str> {
        match self.children().first() {
            Some(Expr::Operator { name, .. }) => Some(name),
            Some(Expr::Literal { value: Atom::Symbol(s), .. }) => Some(s),
            _ => None,
        }
    }

    pub fn is_define(&self) -> bool {
        matches!(self, Expr::Expression { .. }) && self.head_name() == Some("define")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { value, .. } => write!(f, "{}", value),
            Expr::Operator { name, .. } => write!(f, "{}", name),
            Expr::Expression { children, .. } => {
                let parts: Vec<String> = children.iter().map(|c| c.to_string()).collect();
                write!(f, "({})", parts.join(" "))
            }
        }
    }
}
