/// Data layer: dataset types, loading, and per-section processing.
///
/// Architecture:
/// ```text
///  standard_model_snippets.json.gz
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  gunzip + parse JSON → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  section key → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ section  │  validate records, parse equations → SectionReport
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod section;
