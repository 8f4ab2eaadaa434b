use std::fmt;

use super::error::ParseError;
use super::expr::Expr;
use super::normalize::normalize;
use super::parser::{parse_expr, Vocabulary};
use super::symbols::SymbolTable;

/// Unevaluated equality between two expression trees.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Eq({}, {})", self.lhs, self.rhs)
    }
}

/// Result of parsing one equation string.
#[derive(Debug, Clone, PartialEq)]
pub enum EquationOutcome {
    Parsed(Equation),
    Failed { text: String, reason: ParseError },
}

impl EquationOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, EquationOutcome::Parsed(_))
    }

    /// Rendered equality, or the original text when parsing failed.
    pub fn rendered(&self) -> String {
        match self {
            EquationOutcome::Parsed(eq) => eq.to_string(),
            EquationOutcome::Failed { text, .. } => text.clone(),
        }
    }
}

/// Split on the first `=`; anything after it stays on the right-hand side.
pub fn split_equation(text: &str) -> Option<(&str, &str)> {
    text.split_once('=')
}

/// Normalize and parse `text` as `lhs = rhs`.
///
/// The left side is parsed with free symbols. The right side is parsed against
/// `symbols`, so names there must be declared constants. Failures never
/// escape: they come back as [`EquationOutcome::Failed`] with the raw text.
pub fn parse_equation(text: &str, symbols: &SymbolTable) -> EquationOutcome {
    match try_parse(text, symbols) {
        Ok(eq) => EquationOutcome::Parsed(eq),
        Err(reason) => EquationOutcome::Failed {
            text: text.to_string(),
            reason,
        },
    }
}

fn try_parse(text: &str, symbols: &SymbolTable) -> Result<Equation, ParseError> {
    let (lhs, rhs) = split_equation(text).ok_or(ParseError::MissingEquals)?;
    let lhs = parse_expr(&normalize(lhs), Vocabulary::Free)?;
    let rhs = parse_expr(&normalize(rhs), Vocabulary::Closed(symbols))?;
    Ok(Equation { lhs, rhs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parser::MAX_DEPTH;
    use crate::symbolic::Rational;

    #[test]
    fn known_good_equation_round_trips() {
        let outcome = parse_equation("alpha = 1/137", &SymbolTable::basic());
        let EquationOutcome::Parsed(eq) = &outcome else {
            panic!("expected a parsed equation, got {outcome:?}");
        };
        assert_eq!(eq.lhs, Expr::Symbol("alpha".into()));
        assert_eq!(eq.rhs, Expr::Number(Rational::new(1, 137).unwrap()));

        let rendered = outcome.rendered();
        assert!(rendered.contains("alpha"));
        assert!(rendered.contains("1/137"));
        assert_eq!(rendered, "Eq(alpha, 1/137)");
    }

    #[test]
    fn splits_on_first_equals_only() {
        assert_eq!(split_equation("a = b = c"), Some(("a ", " b = c")));
        let (_, rhs) = split_equation("a = b = c").unwrap();
        assert_eq!(rhs.trim(), "b = c");

        let outcome = parse_equation("a = b = c", &SymbolTable::new());
        match outcome {
            EquationOutcome::Failed { text, .. } => assert_eq!(text, "a = b = c"),
            other => panic!("embedded '=' should fail cleanly, got {other:?}"),
        }
    }

    #[test]
    fn missing_equals_is_reported() {
        let outcome = parse_equation("m_Z^{2}", &SymbolTable::basic());
        assert_eq!(
            outcome,
            EquationOutcome::Failed {
                text: "m_Z^{2}".into(),
                reason: ParseError::MissingEquals,
            }
        );
    }

    #[test]
    fn latex_on_both_sides_is_normalized() {
        let outcome = parse_equation(
            "\\sin^{2}\\theta_{W} = 1 - m_{W}^{2}/m_{Z}^{2}",
            &SymbolTable::extended(),
        );
        // `sin**(2)theta_W` has no operator between the pieces.
        assert!(!outcome.is_parsed());

        let outcome = parse_equation(
            "s_W = 1 - m_{W}^{2}/m_{Z}^{2}",
            &SymbolTable::extended(),
        );
        assert_eq!(outcome.rendered(), "Eq(s_W, 1 - m_W**2/m_Z**2)");
    }

    #[test]
    fn rhs_uses_closed_vocabulary_lhs_does_not() {
        let table = SymbolTable::basic();
        let ok = parse_equation("x_{1} = alpha*m_{Z}", &table);
        let EquationOutcome::Parsed(eq) = ok else {
            panic!("expected parse");
        };
        assert_eq!(eq.lhs.free_symbols().into_iter().collect::<Vec<_>>(), ["x_1"]);
        assert_eq!(eq.rhs.constants().into_iter().collect::<Vec<_>>(), ["alpha", "m_Z"]);

        let failed = parse_equation("alpha = m_{W}", &table);
        assert!(matches!(
            failed,
            EquationOutcome::Failed { reason: ParseError::UnknownSymbol(ref s), .. } if s == "m_W"
        ));
    }

    #[test]
    fn unmatched_braces_fail_without_panicking() {
        let outcome = parse_equation("m_Z = \\frac{alpha", &SymbolTable::basic());
        assert!(!outcome.is_parsed());
        assert_eq!(outcome.rendered(), "m_Z = \\frac{alpha");
    }

    #[test]
    fn deeply_nested_input_fails_cleanly() {
        let table = SymbolTable::basic();
        let depth = 100_000;

        let parens = format!("x = {}alpha{}", "(".repeat(depth), ")".repeat(depth));
        assert!(matches!(
            parse_equation(&parens, &table),
            EquationOutcome::Failed { reason: ParseError::TooDeep(MAX_DEPTH), .. }
        ));

        let groups = format!("x = alpha{}2{}", "^{".repeat(depth), "}".repeat(depth));
        assert!(!parse_equation(&groups, &table).is_parsed());
    }

    #[test]
    fn integer_literals_past_i64_still_parse() {
        let outcome = parse_equation("N = 602214076000000000000000*alpha", &SymbolTable::basic());
        let EquationOutcome::Parsed(eq) = outcome else {
            panic!("expected parse, got {outcome:?}");
        };
        assert_eq!(
            eq.rhs,
            Expr::Mul(
                Box::new(Expr::Float(6.02214076e23)),
                Box::new(Expr::Constant("alpha".into()))
            )
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let table = SymbolTable::extended();
        let text = "m_{\\mu}/m_{Z} = \\sqrt(alpha)*delta^{2}";
        let first = parse_equation(text, &table).rendered();
        assert_eq!(first, "Eq(m_mu/m_Z, sqrt(alpha)*delta**2)");
        for _ in 0..10 {
            assert_eq!(parse_equation(text, &table).rendered(), first);
        }
    }
}
