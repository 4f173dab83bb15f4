//! Tokenizer for calculator expressions.

use super::evaluation::EvalError;

/// A lexical token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    LParen,
    RParen,
    Comma,
}

/// Split an expression into tokens.
///
/// Numbers accept an optional fraction (`1.5`, `.5`, `5.`) and an optional
/// exponent (`1e10`, `2.5E-3`). An `e` that is not followed by exponent digits
/// ends the number, so `1e` lexes as `1` followed by the identifier `e`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let ch = bytes[i];

        if ch.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let fraction_start = ch == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        if ch.is_ascii_digit() || fraction_start {
            let end = scan_number(bytes, i);
            let literal = &input[i..end];
            let value = literal
                .parse::<f64>()
                .map_err(|_| EvalError::new(format!("invalid number literal '{}'", literal)))?;
            tokens.push(Token::Number(value));
            i = end;
            continue;
        }

        if ch.is_ascii_alphabetic() || ch == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Token::Ident(input[start..i].to_string()));
            continue;
        }

        let next = bytes.get(i + 1).copied();
        let (token, width) = match (ch, next) {
            (b'*', Some(b'*')) => (Token::DoubleStar, 2),
            (b'/', Some(b'/')) => (Token::DoubleSlash, 2),
            (b'+', _) => (Token::Plus, 1),
            (b'-', _) => (Token::Minus, 1),
            (b'*', _) => (Token::Star, 1),
            (b'/', _) => (Token::Slash, 1),
            (b'%', _) => (Token::Percent, 1),
            (b'(', _) => (Token::LParen, 1),
            (b')', _) => (Token::RParen, 1),
            (b',', _) => (Token::Comma, 1),
            _ => {
                let unexpected = input[i..].chars().next().unwrap_or('?');
                return Err(EvalError::new(format!("unexpected character '{}'", unexpected)));
            }
        };
        tokens.push(token);
        i += width;
    }

    Ok(tokens)
}

/// Return the end offset of the number literal starting at `start`.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}
