// src/main.rs

// SubScheme
// A tiny S-expression interpreter that can show the substitution model of
// evaluation step by step.

use clap::Parser as ClapParser;
use std::path::{Path, PathBuf};

use subscheme::{build, Interpreter, Value};

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The script file to run. If not provided, launches the REPL.
    file: Option<PathBuf>,
}

fn show_examples() {
    println!("\n--- SubScheme Examples ---\n");

    let examples = [
        ("Simple arithmetic", "(+ 1 (- 1 1))"),
        ("Constant definition", "(define size 2)"),
        ("Alias definition", "(define (double x y) (* x y))"),
        (
            "Recursive definition (Ackermann-style)",
            "(define (A x y) (cond ((= y 0) 0) ((= x 0) (* 2 y)) ((= y 1) 2) (else (A (- x 1) (A x (- y 1))))))",
        ),
        ("Step-by-step reduction", ":steps (* 2 (+ 1 1))"),
        ("Substitution trace", ":trace (A 1 10)"),
    ];

    for (description, code) in examples.iter() {
        println!("; {}", description);
        println!("{}\n", code);
    }
    println!("--------------------------\n");
}

// Orchestrates parsing and evaluation for one input. Definition forms
// update the session's tables for the *next* input instead of evaluating.
fn process_input(input: &str, interp: &mut Interpreter) -> Result<Option<Value>, String> {
    let tree = build(input).map_err(|e| format!("Parse error: {}", e))?;
    let Some(tree) = tree else { return Ok(None) };

    if tree.is_define() {
        tree.define(interp);
        tree.define_explain(interp);
        return Ok(None);
    }

    tree.eval(interp)
        .map(Some)
        .map_err(|e| format!("Eval error: {}", e))
}

// Splits a REPL line into its command word and the remainder, so a bare
// `:steps` still reaches the command handler instead of the tokenizer.
fn split_command(input: &str) -> (&str, &str) {
    match input.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    }
}

fn show_steps(input: &str, interp: &mut Interpreter) -> Result<Vec<String>, String> {
    let tree = build(input)
        .map_err(|e| format!("Parse error: {}", e))?
        .ok_or_else(|| "Nothing to explain".to_string())?;
    tree.explain_step_by_step(interp)
        .map_err(|e| format!("Eval error: {}", e))
}

fn show_trace(input: &str, interp: &mut Interpreter) -> Result<Vec<String>, String> {
    let tree = build(input)
        .map_err(|e| format!("Parse error: {}", e))?
        .ok_or_else(|| "Nothing to expand".to_string())?;
    tree.expand_to_end(interp)
        .map_err(|e| format!("Eval error: {}", e))
}

// Simple REPL
pub fn repl() {
    println!("SubScheme REPL");
    println!("Enter expressions, 'quit', ':examples', ':steps EXPR', or ':trace EXPR'");

    let mut interp = Interpreter::new();

    loop {
        print!("> ");
        std::io::Write::flush(&mut std::io::stdout()).unwrap();
        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err() {
            break;
        }
        let input_str = input.trim();

        if input_str == "quit" || input_str == "exit" {
            break;
        }
        if input_str.is_empty() {
            continue;
        }
        if input_str == ":examples" {
            show_examples();
            continue;
        }
        let (command, rest) = split_command(input_str);
        if command == ":steps" || command == ":trace" {
            let result = if command == ":steps" {
                show_steps(rest, &mut interp)
            } else {
                show_trace(rest, &mut interp)
            };
            match result {
                Ok(steps) => {
                    for step in steps {
                        println!("{}", step);
                    }
                }
                Err(e) => println!("Error: {}", e),
            }
            continue;
        }

        match process_input(input_str, &mut interp) {
            Ok(Some(result)) => print_result(result),
            Ok(None) => println!("ok"),
            Err(e) => println!("Error: {}", e),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Some(path) = cli.file {
        if let Err(e) = run_script(&path) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    } else {
        repl();
    }
}

/// Runs the interpreter on a script file, one expression per line. The
/// result of the last non-definition line is printed.
fn run_script(path: &Path) -> Result<(), String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file '{}': {}", path.display(), e))?;

    let mut interp = Interpreter::new();
    let mut last_result = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        if let Some(result) = process_input(line, &mut interp)? {
            last_result = Some(result);
        }
    }

    if let Some(result) = last_result {
        print_result(result);
    }
    Ok(())
}

fn print_result(result: Value) {
    println!("Result: {}", result);
}

#[cfg(test)]
mod tests {
    use super::split_command;

    #[test]
    fn split_command_separates_word_and_argument() {
        assert_eq!(split_command(":steps (+ 1 1)"), (":steps", "(+ 1 1)"));
        assert_eq!(split_command(":trace  (A 1 4)"), (":trace", "(A 1 4)"));
    }

    #[test]
    fn split_command_without_argument() {
        assert_eq!(split_command(":steps"), (":steps", ""));
        assert_eq!(split_command(":trace"), (":trace", ""));
    }
}
