use serde_json::Number;

use super::error::{ParseError, ParseErrorKind};
use super::types::CompareOp;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Number(Number),
    Str(String),
    Op(CompareOp),
    And,
    Or,
    LParen,
    RParen,
}

/// Token plus the byte offset where it starts, for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub position: usize,
}

/// Split a filter expression into tokens: identifiers, quoted strings,
/// numbers, comparators, AND/OR keywords and parentheses. Whitespace is
/// insignificant; keywords are case-insensitive.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '(' {
            chars.next();
            tokens.push(SpannedToken { token: Token::LParen, position: pos });
            continue;
        }
        if c == ')' {
            chars.next();
            tokens.push(SpannedToken { token: Token::RParen, position: pos });
            continue;
        }

        if c == '\'' || c == '"' {
            chars.next();
            let mut literal = String::new();
            let mut terminated = false;
            for (_, sc) in chars.by_ref() {
                if sc == c {
                    terminated = true;
                    break;
                }
                literal.push(sc);
            }
            if !terminated {
                return Err(ParseError::new(ParseErrorKind::UnterminatedString, pos));
            }
            tokens.push(SpannedToken { token: Token::Str(literal), position: pos });
            continue;
        }

        if c.is_ascii_digit() || (c == '-' && next_is_digit(bytes, pos)) {
            let mut end = pos + 1;
            chars.next();
            while let Some(&(p, nc)) = chars.peek() {
                if nc.is_ascii_digit() || nc == '.' {
                    end = p + 1;
                    chars.next();
                } else {
                    break;
                }
            }
            let text = &input[pos..end];
            let number = parse_number(text)
                .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidNumber(text.to_string()), pos))?;
            tokens.push(SpannedToken { token: Token::Number(number), position: pos });
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            // end is the byte offset one past the last accepted char, so
            // multibyte identifiers slice on a char boundary
            let mut end = pos + c.len_utf8();
            chars.next();
            while let Some(&(p, nc)) = chars.peek() {
                if nc.is_alphanumeric() || nc == '_' {
                    end = p + nc.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let word = &input[pos..end];
            let token = match word.to_ascii_uppercase().as_str() {
                "AND" => Token::And,
                "OR" => Token::Or,
                _ => Token::Ident(word.to_string()),
            };
            tokens.push(SpannedToken { token, position: pos });
            continue;
        }

        if matches!(c, '=' | '>' | '<' | '!') {
            chars.next();
            let two_char = matches!(chars.peek(), Some(&(_, '=')));
            let op = match (c, two_char) {
                ('=', _) => Some(CompareOp::Eq),
                ('>', true) => Some(CompareOp::Gte),
                ('>', false) => Some(CompareOp::Gt),
                ('<', true) => Some(CompareOp::Lte),
                ('<', false) => Some(CompareOp::Lt),
                ('!', true) => Some(CompareOp::Ne),
                _ => None,
            };
            if two_char && c != '=' {
                chars.next();
            }
            match op {
                Some(op) => {
                    tokens.push(SpannedToken { token: Token::Op(op), position: pos });
                    continue;
                }
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnknownOperator(c.to_string()),
                        pos,
                    ));
                }
            }
        }

        return Err(ParseError::new(ParseErrorKind::UnexpectedChar(c), pos));
    }

    Ok(tokens)
}

fn next_is_digit(bytes: &[u8], pos: usize) -> bool {
    bytes.get(pos + 1).is_some_and(|b| b.is_ascii_digit())
}

fn parse_number(text: &str) -> Option<Number> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::from(i));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}
