//! Parser for the store's wire grammar.
//!
//! Grammar (precedence low to high):
//!
//! ```text
//! expr    := or
//! or      := and ("||" and)*
//! and     := unary ("&&" unary)*
//! unary   := "!" unary | "(" expr ")" | cmp
//! cmp     := IDENT op value
//! op      := "=" | ">" | ">=" | "<" | "<="
//! value   := INT | STRING
//! ```
//!
//! The production deployment executes expressions server-side; this parser
//! exists so [`crate::memory::MemoryStore`] can evaluate the exact grammar
//! the serializer emits.

use crate::expr::{CmpOp, Expr, Value};
use pool_metrics_core::StoreError;

/// Parses a wire-grammar expression back into an [`Expr`].
///
/// # Errors
/// Returns [`StoreError::MalformedExpression`] on any syntax error.
pub fn parse(input: &str) -> Result<Expr, StoreError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.or_expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(malformed(format!(
            "trailing input at token {}",
            parser.pos
        )));
    }
    Ok(expr)
}

fn malformed(message: impl Into<String>) -> StoreError {
    StoreError::MalformedExpression(message.into())
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Str(String),
    Op(CmpOp),
    AndAnd,
    OrOr,
    Bang,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, StoreError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '&' => {
                chars.next();
                if chars.next() != Some('&') {
                    return Err(malformed("expected &&"));
                }
                tokens.push(Token::AndAnd);
            }
            '|' => {
                chars.next();
                if chars.next() != Some('|') {
                    return Err(malformed("expected ||"));
                }
                tokens.push(Token::OrOr);
            }
            '!' => {
                chars.next();
                // `!=` is not part of the grammar; a bare `!` is negation.
                if chars.peek() == Some(&'=') {
                    return Err(malformed("operator != is not supported"));
                }
                tokens.push(Token::Bang);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Op(CmpOp::Eq));
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Op(CmpOp::Ge));
                } else {
                    tokens.push(Token::Op(CmpOp::Gt));
                }
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Op(CmpOp::Le));
                } else {
                    tokens.push(Token::Op(CmpOp::Lt));
                }
            }
            '"' => {
                chars.next();
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some('"') => literal.push('"'),
                            Some('\\') => literal.push('\\'),
                            other => {
                                return Err(malformed(format!(
                                    "bad escape in string literal: {other:?}"
                                )))
                            }
                        },
                        Some('"') => break,
                        Some(c) => literal.push(c),
                        None => return Err(malformed("unterminated string literal")),
                    }
                }
                tokens.push(Token::Str(literal));
            }
            '-' | '0'..='9' => {
                let mut digits = String::new();
                digits.push(c);
                chars.next();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n = digits
                    .parse::<i64>()
                    .map_err(|e| malformed(format!("bad integer literal {digits}: {e}")))?;
                tokens.push(Token::Int(n));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' {
                        ident.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => return Err(malformed(format!("unexpected character: {other}"))),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn or_expr(&mut self) -> Result<Expr, StoreError> {
        let mut clauses = vec![self.and_expr()?];
        while self.peek() == Some(&Token::OrOr) {
            self.next();
            clauses.push(self.and_expr()?);
        }
        Ok(if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            Expr::Or(clauses)
        })
    }

    fn and_expr(&mut self) -> Result<Expr, StoreError> {
        let mut clauses = vec![self.unary_expr()?];
        while self.peek() == Some(&Token::AndAnd) {
            self.next();
            clauses.push(self.unary_expr()?);
        }
        Ok(if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            Expr::And(clauses)
        })
    }

    fn unary_expr(&mut self) -> Result<Expr, StoreError> {
        match self.peek() {
            Some(Token::Bang) => {
                self.next();
                Ok(Expr::Not(Box::new(self.unary_expr()?)))
            }
            Some(Token::LParen) => {
                self.next();
                let inner = self.or_expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(malformed("expected closing parenthesis")),
                }
            }
            _ => self.comparison(),
        }
    }

    fn comparison(&mut self) -> Result<Expr, StoreError> {
        let field = match self.next() {
            Some(Token::Ident(name)) => name,
            other => return Err(malformed(format!("expected field name, got {other:?}"))),
        };
        let op = match self.next() {
            Some(Token::Op(op)) => op,
            other => return Err(malformed(format!("expected comparison operator, got {other:?}"))),
        };
        let value = match self.next() {
            Some(Token::Int(n)) => Value::Int(n),
            Some(Token::Str(s)) => Value::Str(s),
            other => return Err(malformed(format!("expected literal, got {other:?}"))),
        };
        Ok(Expr::Cmp { field, op, value })
    }
}
