//! Tokenizer for derived-column expressions.

use super::ExprError;

/// Expression token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// Bare identifier (column, constant or function name)
    Ident(String),
    /// Backtick-quoted column name
    Quoted(String),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `**`
    Power,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
}

/// Token with its starting byte offset
pub type Spanned = (usize, Token);

/// Split an expression into tokens
pub fn lex(input: &str) -> Result<Vec<Spanned>, ExprError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        let token = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                pos += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 1;
                Token::Power
            }
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'%' => Token::Percent,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b',' => Token::Comma,
            b'^' => {
                return Err(ExprError::parse(
                    start,
                    "'^' is not an operator, use '**' for powers",
                ))
            }
            b'`' => {
                let end = input[pos + 1..]
                    .find('`')
                    .map(|i| pos + 1 + i)
                    .ok_or_else(|| ExprError::parse(start, "unterminated quoted name"))?;
                let name = &input[pos + 1..end];
                if name.is_empty() {
                    return Err(ExprError::parse(start, "empty quoted name"));
                }
                pos = end;
                Token::Quoted(name.to_string())
            }
            b'0'..=b'9' | b'.' => {
                let (value, end) = lex_number(input, pos)?;
                tokens.push((start, Token::Number(value)));
                pos = end;
                continue;
            }
            c if c == b'_' || c.is_ascii_alphabetic() => {
                let end = input[pos..]
                    .find(|ch: char| !(ch == '_' || ch.is_ascii_alphanumeric()))
                    .map_or(input.len(), |i| pos + i);
                tokens.push((start, Token::Ident(input[pos..end].to_string())));
                pos = end;
                continue;
            }
            _ => {
                let ch = input[pos..].chars().next().unwrap_or('?');
                return Err(ExprError::parse(
                    start,
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        tokens.push((start, token));
        pos += 1;
    }

    Ok(tokens)
}

/// Scan `digits [. digits] [(e|E) [+|-] digits]` starting at `start`
fn lex_number(input: &str, start: usize) -> Result<(f64, usize), ExprError> {
    let bytes = input.as_bytes();
    let mut pos = start;

    let digits = |pos: &mut usize| {
        let begin = *pos;
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
        *pos - begin
    };

    let mut mantissa = digits(&mut pos);
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        mantissa += digits(&mut pos);
    }
    if mantissa == 0 {
        return Err(ExprError::parse(start, "expected digits"));
    }

    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if digits(&mut exp) == 0 {
            return Err(ExprError::parse(pos, "malformed exponent"));
        }
        pos = exp;
    }

    let text = &input[start..pos];
    text.parse::<f64>()
        .map(|value| (value, pos))
        .map_err(|_| ExprError::parse(start, format!("invalid number '{}'", text)))
}
