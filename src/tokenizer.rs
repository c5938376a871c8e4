// src/tokenizer.rs

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    /// A token in function position, i.e. immediately after '('.
    OperatorName,
    Space,
    Argument,
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Token { text: text.into(), kind }
    }
}

/// Classifies a single character. `prev` is the previous character in the
/// input; a character directly after '(' starts an operator name, anything
/// else unreserved is argument material.
pub fn classify(c: Option<char>, prev: Option<char>) -> TokenKind {
    match c {
        Some('(') => TokenKind::LeftParen,
        Some(')') => TokenKind::RightParen,
        Some(' ') | Some('\n') => TokenKind::Space,
        None => TokenKind::EndOfInput,
        Some(_) if prev == Some('(') => TokenKind::OperatorName,
        Some(_) => TokenKind::Argument,
    }
}

/// Greedily reads consecutive characters of the same kind starting at the
/// char index `start`. `prev` is held fixed for the whole run, so a name in
/// function position stays an operator name until a delimiter.
pub fn read_run(input: &str, start: usize, kind: TokenKind, prev: Option<char>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut run = String::new();
    let mut i = start;
    while classify(chars.get(i).copied(), prev) == kind {
        run.push(chars[i]);
        i += 1;
    }
    run
}

/// Scans the input left to right into a token sequence, always terminated by
/// a single `EndOfInput` token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut last: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let kind = classify(Some(c), last);
        last = Some(c);

        match kind {
            TokenKind::LeftParen | TokenKind::RightParen | TokenKind::Space => {
                tokens.push(Token::new(c, kind));
                i += 1;
            }
            TokenKind::Argument => {
                let run = read_run(input, i, TokenKind::Argument, None);
                i += run.chars().count();
                tokens.push(Token::new(run, kind));
            }
            TokenKind::OperatorName => {
                let run = read_run(input, i, TokenKind::OperatorName, Some('('));
                i += run.chars().count();
                tokens.push(Token::new(run, kind));
            }
            // classify never yields EndOfInput for an actual character.
            TokenKind::EndOfInput => return Err(ParseError::Tokenization(c)),
        }
    }

    tokens.push(Token::new("", TokenKind::EndOfInput));
    Ok(tokens)
}
