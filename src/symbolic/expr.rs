use std::collections::BTreeSet;
use std::fmt;

use super::error::ParseError;
use super::rational::Rational;

/// Expression tree produced by the parser.
///
/// Literal subtrees are folded while the tree is built (see the `add`, `mul`,
/// ... constructors), so `1/137` is stored as a single [`Rational`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Rational),
    Float(f64),
    /// Free variable, as produced on the left-hand side of an equation.
    Symbol(String),
    /// Named constant resolved through a [`super::SymbolTable`] or built in (`pi`, `E`).
    Constant(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

// Binding strength used for rendering.
const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_NEG: u8 = 3;
const PREC_POW: u8 = 4;
const PREC_ATOM: u8 = 5;

impl Expr {
    pub fn integer(value: i64) -> Self {
        Expr::Number(Rational::integer(value))
    }

    pub fn neg(inner: Expr) -> Expr {
        match inner {
            Expr::Number(r) => match r.checked_neg() {
                Some(n) => Expr::Number(n),
                None => Expr::Neg(Box::new(Expr::Number(r))),
            },
            Expr::Float(v) => Expr::Float(-v),
            other => Expr::Neg(Box::new(other)),
        }
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Expr {
        match (&lhs, &rhs) {
            (Expr::Number(a), Expr::Number(b)) => match a.checked_add(*b) {
                Some(r) => Expr::Number(r),
                None => Expr::Add(Box::new(lhs), Box::new(rhs)),
            },
            _ => match fold_float(&lhs, &rhs, |a, b| a + b) {
                Some(folded) => folded,
                None => Expr::Add(Box::new(lhs), Box::new(rhs)),
            },
        }
    }

    pub fn sub(lhs: Expr, rhs: Expr) -> Expr {
        match (&lhs, &rhs) {
            (Expr::Number(a), Expr::Number(b)) => match a.checked_sub(*b) {
                Some(r) => Expr::Number(r),
                None => Expr::Sub(Box::new(lhs), Box::new(rhs)),
            },
            _ => match fold_float(&lhs, &rhs, |a, b| a - b) {
                Some(folded) => folded,
                None => Expr::Sub(Box::new(lhs), Box::new(rhs)),
            },
        }
    }

    pub fn mul(lhs: Expr, rhs: Expr) -> Expr {
        match (&lhs, &rhs) {
            (Expr::Number(a), Expr::Number(b)) => match a.checked_mul(*b) {
                Some(r) => Expr::Number(r),
                None => Expr::Mul(Box::new(lhs), Box::new(rhs)),
            },
            _ => match fold_float(&lhs, &rhs, |a, b| a * b) {
                Some(folded) => folded,
                None => Expr::Mul(Box::new(lhs), Box::new(rhs)),
            },
        }
    }

    /// Division by a literal zero is an error whatever the numerator is.
    pub fn div(lhs: Expr, rhs: Expr) -> Result<Expr, ParseError> {
        if rhs.is_zero_literal() {
            return Err(ParseError::DivisionByZero);
        }
        let folded = match (&lhs, &rhs) {
            (Expr::Number(a), Expr::Number(b)) => a.checked_div(*b).map(Expr::Number),
            _ => fold_float(&lhs, &rhs, |a, b| a / b),
        };
        Ok(folded.unwrap_or_else(|| Expr::Div(Box::new(lhs), Box::new(rhs))))
    }

    /// Integer powers of rationals fold exactly; `0` to a negative power is an error.
    pub fn pow(base: Expr, exp: Expr) -> Result<Expr, ParseError> {
        if let (Expr::Number(b), Expr::Number(e)) = (&base, &exp) {
            if e.is_integer() {
                if b.is_zero() && e.numer() < 0 {
                    return Err(ParseError::DivisionByZero);
                }
                if let Some(r) = b.checked_pow(e.numer()) {
                    return Ok(Expr::Number(r));
                }
            }
        } else if let (Some(b), Some(e)) = (base.as_f64_literal(), exp.as_f64_literal()) {
            let value = b.powf(e);
            if b == 0.0 && e < 0.0 {
                return Err(ParseError::DivisionByZero);
            }
            if value.is_finite() {
                return Ok(Expr::Float(value));
            }
        }
        Ok(Expr::Pow(Box::new(base), Box::new(exp)))
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Call(name.into(), args)
    }

    fn is_float(&self) -> bool {
        matches!(self, Expr::Float(_))
    }

    fn as_f64_literal(&self) -> Option<f64> {
        match self {
            Expr::Number(r) => Some(r.to_f64()),
            Expr::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn is_zero_literal(&self) -> bool {
        match self {
            Expr::Number(r) => r.is_zero(),
            Expr::Float(v) => *v == 0.0,
            _ => false,
        }
    }

    /// Names of the table-resolved constants referenced by this expression.
    pub fn constants(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.walk(&mut |e| {
            if let Expr::Constant(name) = e {
                out.insert(name.as_str());
            }
        });
        out
    }

    /// Names of the free variables in this expression.
    pub fn free_symbols(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.walk(&mut |e| {
            if let Expr::Symbol(name) = e {
                out.insert(name.as_str());
            }
        });
        out
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match self {
            Expr::Neg(inner) => inner.walk(visit),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => {
                a.walk(visit);
                b.walk(visit);
            }
            Expr::Call(_, args) => {
                for arg in args {
                    arg.walk(visit);
                }
            }
            Expr::Number(_) | Expr::Float(_) | Expr::Symbol(_) | Expr::Constant(_) => {}
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => PREC_ADD,
            Expr::Mul(..) | Expr::Div(..) => PREC_MUL,
            Expr::Number(r) if !r.is_integer() => PREC_MUL,
            Expr::Number(r) if r.numer() < 0 => PREC_NEG,
            Expr::Float(v) if v.is_sign_negative() => PREC_NEG,
            Expr::Neg(_) => PREC_NEG,
            Expr::Pow(..) => PREC_POW,
            _ => PREC_ATOM,
        }
    }

    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, min_prec: u8) -> fmt::Result {
        let prec = self.precedence();
        if prec < min_prec {
            f.write_str("(")?;
        }
        match self {
            Expr::Number(r) => write!(f, "{r}")?,
            Expr::Float(v) => write!(f, "{v:?}")?,
            Expr::Symbol(name) | Expr::Constant(name) => f.write_str(name)?,
            Expr::Neg(inner) => {
                f.write_str("-")?;
                inner.fmt_with(f, PREC_NEG)?;
            }
            Expr::Add(a, b) => {
                a.fmt_with(f, PREC_ADD)?;
                f.write_str(" + ")?;
                b.fmt_with(f, PREC_ADD)?;
            }
            Expr::Sub(a, b) => {
                a.fmt_with(f, PREC_ADD)?;
                f.write_str(" - ")?;
                b.fmt_with(f, PREC_ADD + 1)?;
            }
            Expr::Mul(a, b) => {
                a.fmt_with(f, PREC_MUL)?;
                f.write_str("*")?;
                b.fmt_with(f, PREC_MUL)?;
            }
            Expr::Div(a, b) => {
                a.fmt_with(f, PREC_MUL)?;
                f.write_str("/")?;
                b.fmt_with(f, PREC_MUL + 1)?;
            }
            Expr::Pow(a, b) => {
                // Right associative.
                a.fmt_with(f, PREC_POW + 1)?;
                f.write_str("**")?;
                b.fmt_with(f, PREC_POW)?;
            }
            Expr::Call(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    arg.fmt_with(f, 0)?;
                }
                f.write_str(")")?;
            }
        }
        if prec < min_prec {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Fold two literals when at least one is a float and the result is finite.
fn fold_float(lhs: &Expr, rhs: &Expr, op: impl Fn(f64, f64) -> f64) -> Option<Expr> {
    if !(lhs.is_float() || rhs.is_float()) {
        return None;
    }
    let value = op(lhs.as_f64_literal()?, rhs.as_f64_literal()?);
    value.is_finite().then_some(Expr::Float(value))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, 0)
    }
}
