use std::fmt;

use super::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Integer(i64),
    Decimal(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
    Equals,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(i) => write!(f, "{i}"),
            Token::Decimal(v) => write!(f, "{v}"),
            Token::Ident(s) => f.write_str(s),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::DoubleStar => f.write_str("**"),
            Token::Slash => f.write_str("/"),
            Token::Caret => f.write_str("^"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Equals => f.write_str("="),
        }
    }
}

/// A token and the byte offset where it starts.
pub type Spanned = (Token, usize);

pub fn tokenize(src: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                number_token(&src[start..i])?
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                Token::Ident(src[start..i].to_string())
            }
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                Token::DoubleStar
            }
            _ => {
                let token = match c {
                    b'+' => Token::Plus,
                    b'-' => Token::Minus,
                    b'*' => Token::Star,
                    b'/' => Token::Slash,
                    b'^' => Token::Caret,
                    b'(' => Token::LParen,
                    b')' => Token::RParen,
                    b',' => Token::Comma,
                    b'=' => Token::Equals,
                    _ => {
                        // Report the whole (possibly multi-byte) character.
                        let ch = src[start..].chars().next().unwrap_or('?');
                        return Err(ParseError::UnexpectedChar { ch, pos: start });
                    }
                };
                i += 1;
                token
            }
        };
        tokens.push((token, start));
    }

    Ok(tokens)
}

/// End offset of the numeric literal starting at `i`: digits, an optional
/// fraction and an optional exponent.
fn scan_number(bytes: &[u8], mut i: usize) -> usize {
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

/// Digit-only literals are integers; ones too large for `i64` fall back to a
/// decimal, like any literal with a fraction or exponent. Literals that
/// overflow `f64` are rejected.
fn number_token(text: &str) -> Result<Token, ParseError> {
    let invalid = || ParseError::InvalidNumber(text.to_string());
    if text.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Token::Integer(i));
        }
    } else if text == "." {
        return Err(invalid());
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Token::Decimal(v)),
        _ => Err(invalid()),
    }
}
