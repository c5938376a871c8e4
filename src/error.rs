// src/error.rs

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A character the tokenizer could not classify. Unreachable under the
    /// classification rules, but the scan loop checks for it anyway.
    Tokenization(char),
    /// Unbalanced parentheses, or content that produced no tree root.
    MalformedExpression(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Tokenization(c) => write!(f, "Unexpected character: '{}'", c),
            ParseError::MalformedExpression(input) => {
                write!(f, "Malformed expression: {}", input)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The operator position of a call resolved to nothing callable.
    FunctionNotFound(String),
    /// No clause of a cond body matched, including the mandatory else.
    CondFallthrough(String),
    /// The step expander re-parses its own textual output; a parse failure
    /// there surfaces as an evaluation error.
    Parse(ParseError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::FunctionNotFound(name) => write!(f, "Function not found: '{}'", name),
            EvalError::CondFallthrough(name) => {
                write!(f, "No cond clause matched in '{}'", name)
            }
            EvalError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl From<ParseError> for EvalError {
    fn from(err: ParseError) -> Self {
        EvalError::Parse(err)
    }
}
