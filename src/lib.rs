//! Reader for the Standard Model equation snippet dataset.
//!
//! Loads `standard_model_snippets.json.gz`, turns each LaTeX-like equation
//! into a symbolic equality, and renders a table with summary statistics.

pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod symbolic;

pub use data::loader::load_file;
pub use data::model::{Dataset, Record, ReportRow, SectionReport};
pub use data::section::process_section;
pub use error::{SnippetError, SnippetResult};
