// src/parser.rs

use crate::ast::{Atom, Expr};
use crate::error::ParseError;
use crate::tokenizer::{tokenize, Token, TokenKind};

// A bare literal is a single content token followed by EndOfInput.
fn only_a_literal(tokens: &[Token]) -> bool {
    tokens.len() == 2
}

/// Builds the expression tree for the input. Returns `Ok(None)` only for
/// the empty string; any other input either yields a tree or fails with
/// `MalformedExpression`.
pub fn build(input: &str) -> Result<Option<Expr>, ParseError> {
    if input.is_empty() {
        return Ok(None);
    }

    let tokens = tokenize(input)?;

    if only_a_literal(&tokens) {
        return Ok(Some(Expr::Literal {
            value: Atom::parse(&tokens[0].text),
            depth: 1,
        }));
    }

    // Stack of open expression nodes: each '(' pushes a level, each ')'
    // pops one and attaches it to the level below (or makes it the root).
    let mut levels: Vec<Expr> = Vec::new();
    let mut root: Option<Expr> = None;
    let mut height = 0;

    for token in &tokens {
        match token.kind {
            TokenKind::LeftParen => {
                levels.push(Expr::Expression {
                    children: Vec::new(),
                    depth: levels.len(),
                    height: 1,
                });
                height = height.max(levels.len());
            }
            TokenKind::OperatorName => {
                let node = Expr::Operator {
                    name: token.text.clone(),
                    depth: levels.len(),
                };
                attach(&mut levels, node, input)?;
            }
            TokenKind::Argument => {
                let node = Expr::Literal {
                    value: Atom::parse(&token.text),
                    depth: levels.len(),
                };
                attach(&mut levels, node, input)?;
            }
            TokenKind::RightParen => {
                let current = levels
                    .pop()
                    .ok_or_else(|| ParseError::MalformedExpression(input.to_string()))?;
                if levels.is_empty() {
                    root = Some(current);
                } else {
                    attach(&mut levels, current, input)?;
                }
            }
            TokenKind::Space | TokenKind::EndOfInput => {}
        }
    }

    match root {
        Some(Expr::Expression { children, depth, .. }) => Ok(Some(Expr::Expression {
            children,
            depth,
            height,
        })),
        Some(node) => Ok(Some(node)),
        None => Err(ParseError::MalformedExpression(input.to_string())),
    }
}

fn attach(levels: &mut [Expr], node: Expr, input: &str) -> Result<(), ParseError> {
    match levels.last_mut() {
        Some(Expr::Expression { children, .. }) => {
            children.push(node);
            Ok(())
        }
        // Content outside any parenthesis, e.g. a stray trailing token.
        _ => Err(ParseError::MalformedExpression(input.to_string())),
    }
}
