//! Run configuration.
//!
//! Values come from, in increasing priority:
//! 1. Built-in defaults (section `"6"`, extended vocabulary)
//! 2. An optional TOML file passed with `--config`
//! 3. Command-line flags

use std::path::Path;

use serde::Deserialize;

use crate::error::{SnippetError, SnippetResult};
use crate::symbolic::SymbolTable;

pub const DEFAULT_INPUT: &str = "standard_model_snippets.json.gz";
pub const DEFAULT_SECTION: &str = "6";

/// Named constant vocabulary presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Vocabulary {
    /// alpha, m_Z, m_mu, delta
    Basic,
    /// basic plus mixing angles, quark masses, m_W and alpha_S
    #[default]
    Extended,
}

impl Vocabulary {
    pub fn symbol_table(self) -> SymbolTable {
        match self {
            Vocabulary::Basic => SymbolTable::basic(),
            Vocabulary::Extended => SymbolTable::extended(),
        }
    }
}

/// Contents of a `--config` file. Every field is optional.
///
/// ```toml
/// section = "7"
/// vocabulary = "basic"
/// extra_symbols = ["m_t", "G_F"]
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub section: Option<String>,
    pub vocabulary: Option<Vocabulary>,
    pub extra_symbols: Vec<String>,
}

impl FileConfig {
    pub fn from_toml(text: &str) -> SnippetResult<Self> {
        toml::from_str(text).map_err(|e| SnippetError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> SnippetResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SnippetError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml(&text)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub section: String,
    pub symbols: SymbolTable,
}

impl Settings {
    /// Merge file values with flag overrides (`None` means "flag not given").
    pub fn resolve(
        file: FileConfig,
        section: Option<String>,
        vocabulary: Option<Vocabulary>,
    ) -> Self {
        let section = section
            .or(file.section)
            .unwrap_or_else(|| DEFAULT_SECTION.to_string());
        let mut symbols = vocabulary
            .or(file.vocabulary)
            .unwrap_or_default()
            .symbol_table();
        for name in file.extra_symbols {
            symbols.insert(name);
        }
        Settings { section, symbols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_flags() {
        let s = Settings::resolve(FileConfig::default(), None, None);
        assert_eq!(s.section, "6");
        assert_eq!(s.symbols, SymbolTable::extended());
    }

    #[test]
    fn file_values_apply() {
        let file = FileConfig::from_toml(
            r#"
            section = "7"
            vocabulary = "basic"
            extra_symbols = ["G_F"]
            "#,
        )
        .unwrap();
        let s = Settings::resolve(file, None, None);
        assert_eq!(s.section, "7");
        assert_eq!(s.symbols.len(), 5);
        assert!(s.symbols.contains("G_F"));
        assert!(!s.symbols.contains("m_W"));
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig::from_toml("section = \"7\"\nvocabulary = \"basic\"").unwrap();
        let s = Settings::resolve(file, Some("6".into()), Some(Vocabulary::Extended));
        assert_eq!(s.section, "6");
        assert!(s.symbols.contains("alpha_S"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            FileConfig::from_toml("sectoin = \"7\""),
            Err(SnippetError::Config(_))
        ));
        assert!(FileConfig::from_toml("vocabulary = \"huge\"").is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippets.toml");
        std::fs::write(&path, "extra_symbols = [\"m_t\"]").unwrap();
        let file = FileConfig::load(&path).unwrap();
        assert_eq!(file.extra_symbols, ["m_t"]);
        assert!(FileConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
