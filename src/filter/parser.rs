use serde_json::Value;

use super::error::{ParseError, ParseErrorKind};
use super::lexer::{tokenize, SpannedToken, Token};
use super::types::{FilterNode, LogicalOp};

/// Parse a filter expression into a [`FilterNode`] tree.
///
/// Grammar (AND binds tighter than OR, parentheses override):
///
/// ```text
/// expr       := or_expr
/// or_expr    := and_expr (OR and_expr)*
/// and_expr   := primary (AND primary)*
/// primary    := '(' expr ')' | IDENT COMPARATOR (NUMBER | STRING)
/// ```
///
/// Identifiers are not interpreted here; column validation belongs to the
/// query builder.
pub fn parse(input: &str) -> Result<FilterNode, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::new(ParseErrorKind::EmptyExpression, 0));
    }
    let mut parser = Parser { tokens, index: 0, end: input.len() };
    let node = parser.parse_or()?;
    if let Some(tok) = parser.peek() {
        return Err(ParseError::new(ParseErrorKind::TrailingInput, tok.position));
    }
    Ok(node)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    index: usize,
    /// Byte length of the input, used as the position of end-of-input errors.
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.index).cloned();
        if tok.is_some() {
            self.index += 1;
        }
        tok
    }

    fn parse_or(&mut self) -> Result<FilterNode, ParseError> {
        let mut node = self.parse_and()?;
        while matches!(self.peek().map(|t| &t.token), Some(Token::Or)) {
            self.advance();
            let right = self.parse_and()?;
            node = FilterNode::logical(LogicalOp::Or, node, right);
        }
        Ok(node)
    }

    fn parse_and(&mut self) -> Result<FilterNode, ParseError> {
        let mut node = self.parse_primary()?;
        while matches!(self.peek().map(|t| &t.token), Some(Token::And)) {
            self.advance();
            let right = self.parse_primary()?;
            node = FilterNode::logical(LogicalOp::And, node, right);
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<FilterNode, ParseError> {
        let tok = match self.advance() {
            Some(tok) => tok,
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::Expected("expression"),
                    self.end,
                ))
            }
        };

        match tok.token {
            Token::LParen => {
                let node = self.parse_or()?;
                match self.advance() {
                    Some(SpannedToken { token: Token::RParen, .. }) => Ok(node),
                    Some(other) => {
                        Err(ParseError::new(ParseErrorKind::UnbalancedParens, other.position))
                    }
                    None => Err(ParseError::new(ParseErrorKind::UnbalancedParens, self.end)),
                }
            }
            Token::Ident(column) => {
                let op = match self.advance() {
                    Some(SpannedToken { token: Token::Op(op), .. }) => op,
                    Some(other) => {
                        return Err(ParseError::new(
                            ParseErrorKind::Expected("comparison operator"),
                            other.position,
                        ))
                    }
                    None => {
                        return Err(ParseError::new(
                            ParseErrorKind::Expected("comparison operator"),
                            self.end,
                        ))
                    }
                };
                let value = match self.advance() {
                    Some(SpannedToken { token: Token::Number(n), .. }) => Value::Number(n),
                    Some(SpannedToken { token: Token::Str(s), .. }) => Value::String(s),
                    Some(other) => {
                        return Err(ParseError::new(
                            ParseErrorKind::Expected("number or string literal"),
                            other.position,
                        ))
                    }
                    None => {
                        return Err(ParseError::new(
                            ParseErrorKind::Expected("number or string literal"),
                            self.end,
                        ))
                    }
                };
                Ok(FilterNode::comparison(column, op, value))
            }
            _ => Err(ParseError::new(ParseErrorKind::Expected("expression"), tok.position)),
        }
    }
}
