/// Symbolic layer: LaTeX cleanup, expression parsing, equalities.
///
/// Architecture:
/// ```text
///   "m_{Z}^{2} = \alpha ..."
///        │
///        ▼
///   ┌────────────┐
///   │ normalize  │  ^{..} → **(..), _{..} → _.., strip '\'
///   └────────────┘
///        │
///        ▼
///   ┌────────────┐
///   │   parser   │  tokens → Expr, literal folding, SymbolTable lookup
///   └────────────┘
///        │
///        ▼
///   ┌────────────┐
///   │  equation  │  split on first '=', Parsed(Eq) | Failed{text, reason}
///   └────────────┘
/// ```

pub mod equation;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod normalize;
pub mod parser;
pub mod rational;
pub mod symbols;

pub use equation::{parse_equation, split_equation, Equation, EquationOutcome};
pub use error::ParseError;
pub use expr::Expr;
pub use normalize::normalize;
pub use rational::Rational;
pub use symbols::SymbolTable;
