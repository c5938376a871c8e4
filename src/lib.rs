// src/lib.rs

// --- Module Declarations ---
pub mod ast;
pub mod definition;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod expander;
pub mod parser;
pub mod tokenizer;

// --- Public API Re-exports ---
pub use ast::{Atom, Expr};
pub use env::{Binding, Builtin, CondClause, Environment, Interpreter, UserFn};
pub use error::{EvalError, ParseError};
pub use evaluator::Value;
pub use parser::build;
pub use tokenizer::{classify, read_run, tokenize, Token, TokenKind};

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_ok(interp: &mut Interpreter, input: &str) -> Value {
        interp.evaluate(input).unwrap()
    }

    fn num(interp: &mut Interpreter, input: &str) -> f64 {
        eval_ok(interp, input).as_number()
    }

    // --- classify ---

    #[test]
    fn classify_left_paren() {
        assert_eq!(classify(Some('('), None), TokenKind::LeftParen);
    }

    #[test]
    fn classify_right_paren() {
        assert_eq!(classify(Some(')'), None), TokenKind::RightParen);
    }

    #[test]
    fn classify_space_and_newline() {
        assert_eq!(classify(Some(' '), None), TokenKind::Space);
        assert_eq!(classify(Some('\n'), None), TokenKind::Space);
    }

    #[test]
    fn classify_operator_after_paren() {
        assert_eq!(classify(Some('A'), Some('(')), TokenKind::OperatorName);
    }

    #[test]
    fn classify_argument() {
        assert_eq!(classify(Some('1'), Some(' ')), TokenKind::Argument);
    }

    #[test]
    fn classify_end_of_input() {
        assert_eq!(classify(None, None), TokenKind::EndOfInput);
    }

    // --- read_run ---

    #[test]
    fn read_run_reads_to_end() {
        assert_eq!(read_run("1234", 0, TokenKind::Argument, None), "1234");
    }

    #[test]
    fn read_run_stops_at_space() {
        assert_eq!(read_run("1 34", 0, TokenKind::Argument, None), "1");
    }

    #[test]
    fn read_run_stops_at_right_paren() {
        assert_eq!(read_run("(A 1 10)", 5, TokenKind::Argument, None), "10");
    }

    #[test]
    fn read_run_reads_operator_name() {
        assert_eq!(
            read_run("(define (A x y) (+ x y))", 1, TokenKind::OperatorName, Some('(')),
            "define"
        );
    }

    // --- tokenize ---

    #[test]
    fn tokenize_call() {
        let kinds_and_texts: Vec<(String, TokenKind)> = tokenize("(A 1 10)")
            .unwrap()
            .into_iter()
            .map(|t| (t.text, t.kind))
            .collect();
        assert_eq!(
            kinds_and_texts,
            vec![
                ("(".to_string(), TokenKind::LeftParen),
                ("A".to_string(), TokenKind::OperatorName),
                (" ".to_string(), TokenKind::Space),
                ("1".to_string(), TokenKind::Argument),
                (" ".to_string(), TokenKind::Space),
                ("10".to_string(), TokenKind::Argument),
                (")".to_string(), TokenKind::RightParen),
                ("".to_string(), TokenKind::EndOfInput),
            ]
        );
    }

    #[test]
    fn tokenize_addition() {
        let tokens = tokenize("(+ 1 1)").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LeftParen,
                TokenKind::OperatorName,
                TokenKind::Space,
                TokenKind::Argument,
                TokenKind::Space,
                TokenKind::Argument,
                TokenKind::RightParen,
                TokenKind::EndOfInput,
            ]
        );
        assert_eq!(tokens[1].text, "+");
    }

    #[test]
    fn tokenize_nested_define() {
        let texts: Vec<String> = tokenize("(define (A x y) (+ x y))")
            .unwrap()
            .into_iter()
            .filter(|t| {
                matches!(t.kind, TokenKind::OperatorName | TokenKind::Argument)
            })
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["define", "A", "x", "y", "+", "x", "y"]);
    }

    // --- build ---

    #[test]
    fn build_empty_input_is_no_tree() {
        assert_eq!(build("").unwrap(), None);
    }

    #[test]
    fn build_bare_literal() {
        let tree = build("1").unwrap().unwrap();
        assert_eq!(
            tree,
            Expr::Literal { value: Atom::Number(1.0), depth: 1 }
        );
    }

    #[test]
    fn build_bare_symbol() {
        let tree = build("x").unwrap().unwrap();
        assert_eq!(
            tree,
            Expr::Literal { value: Atom::Symbol("x".to_string()), depth: 1 }
        );
    }

    #[test]
    fn build_flat_call() {
        let tree = build("(+ 1 1)").unwrap().unwrap();
        assert_eq!(tree.children().len(), 3);
        assert!(matches!(tree.children()[0], Expr::Operator { .. }));
        assert_eq!(tree.head_name(), Some("+"));
    }

    #[test]
    fn build_nested_call() {
        let tree = build("(+ 1 (- 1 1))").unwrap().unwrap();
        assert_eq!(tree.children().len(), 3);
        let nested = &tree.children()[2];
        assert!(matches!(nested, Expr::Expression { .. }));
        assert_eq!(nested.children().len(), 3);
        assert_eq!(nested.depth(), 1);
    }

    #[test]
    fn build_unbalanced_fails() {
        assert!(matches!(
            build("(+ 1 1"),
            Err(ParseError::MalformedExpression(_))
        ));
        assert!(matches!(
            build("(+ 1 1))"),
            Err(ParseError::MalformedExpression(_))
        ));
    }

    #[test]
    fn build_round_trips_through_display() {
        let tree = build("(+ 1 (- 1 1))").unwrap().unwrap();
        assert_eq!(tree.to_string(), "(+ 1 (- 1 1))");
    }

    // --- height ---

    #[test]
    fn height_of_literal() {
        assert_eq!(build("1").unwrap().unwrap().height(), 1);
    }

    #[test]
    fn height_of_flat_expression() {
        assert_eq!(build("(+ 1 1)").unwrap().unwrap().height(), 1);
    }

    #[test]
    fn height_of_nested_expression() {
        assert_eq!(build("(+ 1 (- 1 1))").unwrap().unwrap().height(), 2);
    }

    #[test]
    fn height_of_two_nested_siblings() {
        assert_eq!(build("(+ (- 1 1) (- 1 1))").unwrap().unwrap().height(), 2);
    }

    // --- eval ---

    #[test]
    fn eval_bare_number() {
        let mut interp = Interpreter::new();
        assert_eq!(num(&mut interp, "1"), 1.0);
    }

    #[test]
    fn eval_arithmetic() {
        let mut interp = Interpreter::new();
        assert_eq!(num(&mut interp, "(+ 1 1)"), 2.0);
        assert_eq!(num(&mut interp, "(- 1 1)"), 0.0);
        assert_eq!(num(&mut interp, "(+ 1 (- 1 1))"), 1.0);
        assert_eq!(num(&mut interp, "(* 2 (+ 1 1))"), 4.0);
    }

    #[test]
    fn eval_subtraction_takes_first_minus_rest() {
        let mut interp = Interpreter::new();
        assert_eq!(num(&mut interp, "(- 10 1 2)"), 7.0);
    }

    #[test]
    fn eval_equality_is_boolean() {
        let mut interp = Interpreter::new();
        assert_eq!(eval_ok(&mut interp, "(= 1 1)"), Value::Bool(true));
        assert_eq!(eval_ok(&mut interp, "(= 1 2)"), Value::Bool(false));
    }

    #[test]
    fn eval_unknown_operator_fails() {
        let mut interp = Interpreter::new();
        assert_eq!(
            interp.evaluate("(nosuch 1 2)").unwrap_err(),
            EvalError::FunctionNotFound("nosuch".to_string())
        );
    }

    #[test]
    fn eval_unbound_symbol_is_nan() {
        let mut interp = Interpreter::new();
        assert!(num(&mut interp, "q").is_nan());
    }

    // --- explain ---

    #[test]
    fn explain_level_one_is_the_value() {
        let mut interp = Interpreter::new();
        let tree = build("(+ 1 1)").unwrap().unwrap();
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.explain(1, &mut interp).unwrap(), "2");
    }

    #[test]
    fn explain_level_two_reduces_inner_call() {
        let mut interp = Interpreter::new();
        let tree = build("(+ 1 (- 1 1))").unwrap().unwrap();
        assert_eq!(tree.explain(2, &mut interp).unwrap(), "(+ 1 0)");
    }

    #[test]
    fn explain_past_height_is_the_original_form() {
        let mut interp = Interpreter::new();
        let tree = build("(+ 1 (- 1 1))").unwrap().unwrap();
        let level = tree.height() + 1;
        assert_eq!(tree.explain(level, &mut interp).unwrap(), "(+ 1 (- 1 1))");
    }

    #[test]
    fn explain_step_by_step_walks_down_the_levels() {
        let mut interp = Interpreter::new();
        let tree = build("(+ 1 (- 1 1))").unwrap().unwrap();
        assert_eq!(
            tree.explain_step_by_step(&mut interp).unwrap(),
            vec!["(+ 1 (- 1 1))", "(+ 1 0)", "1"]
        );
    }

    // --- define ---

    #[test]
    fn define_tree_shape() {
        let tree = build("(define (A x y) (+ x y))").unwrap().unwrap();
        assert_eq!(tree.children().len(), 3);
        assert!(matches!(tree.children()[0], Expr::Operator { .. }));
        assert!(tree.is_define());
    }

    #[test]
    fn define_constant_then_evaluate_it() {
        let mut interp = Interpreter::new();
        let tree = build("(define x 1)").unwrap().unwrap();
        tree.define(&mut interp);
        assert_eq!(num(&mut interp, "x"), 1.0);
    }

    #[test]
    fn define_alias_then_call_it() {
        let mut interp = Interpreter::new();
        assert!(interp.env.lookup("A").is_none());
        let tree = build("(define (A x y) (+ x y))").unwrap().unwrap();
        tree.define(&mut interp);
        assert!(interp.env.lookup("A").is_some());
        assert_eq!(num(&mut interp, "(A 1 1)"), 2.0);
    }

    #[test]
    fn definitions_persist_across_evaluations() {
        let mut interp = Interpreter::new();
        build("(define (double x) (* x 2))")
            .unwrap()
            .unwrap()
            .define(&mut interp);
        // Alias semantics: `double` is `*` itself, so extra arguments fold in.
        assert_eq!(num(&mut interp, "(double 3 2)"), 6.0);
        assert_eq!(num(&mut interp, "(double 5 2)"), 10.0);
    }
}
