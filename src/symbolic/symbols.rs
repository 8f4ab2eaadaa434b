use std::collections::BTreeSet;

/// Mathematical constants every expression may reference.
pub const BUILTIN_CONSTANTS: &[&str] = &["pi", "E"];

/// Functions the parser accepts as calls in either equation side.
pub const KNOWN_FUNCTIONS: &[&str] = &[
    "sqrt", "exp", "log", "ln", "sin", "cos", "tan", "arcsin", "arccos", "arctan", "sinh",
    "cosh", "tanh", "Abs", "abs",
];

const BASIC: &[&str] = &["alpha", "m_Z", "m_mu", "delta"];

const EXTENDED: &[&str] = &[
    "alpha", "m_Z", "m_mu", "delta", "theta_12", "theta_13", "theta_23", "m_d", "m_c", "m_b",
    "m_s", "m_W", "alpha_S",
];

/// Closed vocabulary of named physical constants.
///
/// Right-hand sides are parsed against a table: an identifier that is not in
/// it (and is not a built-in constant or function) fails the parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    names: BTreeSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `alpha`, `m_Z`, `m_mu`, `delta`.
    pub fn basic() -> Self {
        Self::from_names(BASIC.iter().copied())
    }

    /// The basic set plus mixing angles, quark masses, `m_W` and `alpha_S`.
    pub fn extended() -> Self {
        Self::from_names(EXTENDED.iter().copied())
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SymbolTable {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub fn is_builtin_constant(name: &str) -> bool {
    BUILTIN_CONSTANTS.contains(&name)
}

pub fn is_known_function(name: &str) -> bool {
    KNOWN_FUNCTIONS.contains(&name)
}
