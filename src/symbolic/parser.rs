//! Recursive-descent parser for normalized expressions.
//!
//! Grammar (lowest to highest binding):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('+' | '-') unary | power
//! power  := atom (('**' | '^') unary)?
//! atom   := number | ident | ident '(' args ')' | '(' expr ')'
//! ```
//!
//! There is no implicit multiplication: `2 alpha` is a syntax error.
//!
//! Nesting (parentheses, unary operators, right-nested powers) and the length
//! of binary operator chains share one depth budget of [`MAX_DEPTH`], which
//! also bounds the depth of the resulting [`Expr`] tree.

use super::error::ParseError;
use super::expr::Expr;
use super::lexer::{tokenize, Spanned, Token};
use super::rational::Rational;
use super::symbols::{is_builtin_constant, is_known_function, SymbolTable};

pub const MAX_DEPTH: usize = 256;

/// How bare identifiers are resolved.
#[derive(Debug, Clone, Copy)]
pub enum Vocabulary<'a> {
    /// Any identifier becomes a free [`Expr::Symbol`]; unknown calls are kept.
    Free,
    /// Identifiers must be declared in the table, built in, or known functions.
    Closed(&'a SymbolTable),
}

pub fn parse_expr(src: &str, vocabulary: Vocabulary<'_>) -> Result<Expr, ParseError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        vocabulary,
    };
    let expr = parser.expr()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some((token, offset)) => Err(ParseError::UnexpectedToken {
            found: token.to_string(),
            pos: *offset,
        }),
    }
}

struct Parser<'a> {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
    vocabulary: Vocabulary<'a>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn next(&mut self) -> Result<Spanned, ParseError> {
        let spanned = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ParseError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(spanned)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        let (token, pos) = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                found: token.to_string(),
                pos,
            })
        }
    }

    /// Take one level of the depth budget.
    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(ParseError::TooDeep(MAX_DEPTH))
        } else {
            Ok(())
        }
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.depth;
        let mut lhs = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                self.enter()?;
                lhs = Expr::add(lhs, self.term()?);
            } else if self.eat(&Token::Minus) {
                self.enter()?;
                lhs = Expr::sub(lhs, self.term()?);
            } else {
                self.depth = start;
                return Ok(lhs);
            }
        }
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let start = self.depth;
        let mut lhs = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                self.enter()?;
                lhs = Expr::mul(lhs, self.unary()?);
            } else if self.eat(&Token::Slash) {
                self.enter()?;
                lhs = Expr::div(lhs, self.unary()?)?;
            } else {
                self.depth = start;
                return Ok(lhs);
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let expr = if self.eat(&Token::Minus) {
            Expr::neg(self.unary()?)
        } else if self.eat(&Token::Plus) {
            self.unary()?
        } else {
            self.power()?
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.atom()?;
        if self.eat(&Token::DoubleStar) || self.eat(&Token::Caret) {
            let exp = self.unary()?;
            Expr::pow(base, exp)
        } else {
            Ok(base)
        }
    }

    fn atom(&mut self) -> Result<Expr, ParseError> {
        let (token, pos) = self.next()?;
        match token {
            Token::Integer(i) => Ok(Expr::Number(Rational::integer(i))),
            Token::Decimal(v) => Ok(Expr::Float(v)),
            Token::LParen => {
                self.enter()?;
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                self.depth -= 1;
                Ok(inner)
            }
            Token::Ident(name) => {
                if self.eat(&Token::LParen) {
                    let args = self.args()?;
                    self.call(name, args)
                } else {
                    self.identifier(name)
                }
            }
            other => Err(ParseError::UnexpectedToken {
                found: other.to_string(),
                pos,
            }),
        }
    }

    /// Comma-separated arguments up to and including the closing paren.
    fn args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen)?;
            return Ok(args);
        }
    }

    fn call(&self, name: String, args: Vec<Expr>) -> Result<Expr, ParseError> {
        match self.vocabulary {
            Vocabulary::Closed(_) if !is_known_function(&name) => {
                Err(ParseError::UnknownFunction(name))
            }
            _ => Ok(Expr::call(name, args)),
        }
    }

    fn identifier(&self, name: String) -> Result<Expr, ParseError> {
        if is_builtin_constant(&name) {
            return Ok(Expr::Constant(name));
        }
        match self.vocabulary {
            Vocabulary::Free => Ok(Expr::Symbol(name)),
            Vocabulary::Closed(table) if table.contains(&name) => Ok(Expr::Constant(name)),
            Vocabulary::Closed(_) => Err(ParseError::UnknownSymbol(name)),
        }
    }
}
