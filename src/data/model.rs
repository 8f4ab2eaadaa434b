use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::{SnippetError, SnippetResult};

// ---------------------------------------------------------------------------
// RawRecord / Record – one entry of a section
// ---------------------------------------------------------------------------

/// A record exactly as it appears in the JSON file. Length and field types are
/// checked later by [`Record::from_raw`], so a malformed record only costs
/// itself and not the whole load.
pub type RawRecord = Vec<JsonValue>;

/// Typed view of `[equation_text, error, predicted, target]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub equation: String,
    pub error: f64,
    pub predicted: f64,
    pub target: f64,
}

impl Record {
    /// Validate a raw record. Extra trailing fields are ignored; `null`
    /// numbers are read as `NaN` and excluded from statistics.
    pub fn from_raw(index: usize, raw: &[JsonValue]) -> SnippetResult<Self> {
        if raw.len() < 4 {
            return Err(SnippetError::RecordTooShort {
                index,
                len: raw.len(),
            });
        }
        let equation = raw[0]
            .as_str()
            .ok_or_else(|| SnippetError::InvalidRecord {
                index,
                reason: format!("equation is not a string: {}", raw[0]),
            })?
            .to_string();

        let number = |pos: usize, name: &str| -> SnippetResult<f64> {
            match &raw[pos] {
                JsonValue::Null => Ok(f64::NAN),
                v => v.as_f64().ok_or_else(|| SnippetError::InvalidRecord {
                    index,
                    reason: format!("{name} is not a number: {v}"),
                }),
            }
        };

        Ok(Record {
            equation,
            error: number(1, "error")?,
            predicted: number(2, "predicted")?,
            target: number(3, "target")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded file
// ---------------------------------------------------------------------------

/// Section key → ordered records. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    sections: BTreeMap<String, Vec<RawRecord>>,
}

impl Dataset {
    pub fn from_sections(sections: BTreeMap<String, Vec<RawRecord>>) -> Self {
        Dataset { sections }
    }

    pub fn section(&self, key: &str) -> Option<&[RawRecord]> {
        self.sections.get(key).map(Vec::as_slice)
    }

    pub fn section_keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of records across all sections.
    pub fn record_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }
}

// ---------------------------------------------------------------------------
// ReportRow / SectionReport – processed output
// ---------------------------------------------------------------------------

/// One row of the report. `equation` holds the rendered equality, or the
/// original text when the equation could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Index")]
    pub index: usize,
    #[serde(rename = "Equation")]
    pub equation: String,
    #[serde(rename = "Error")]
    pub error: f64,
    #[serde(rename = "Predicted")]
    pub predicted: f64,
    #[serde(rename = "Target")]
    pub target: f64,
    #[serde(rename = "Parsed")]
    pub parsed: bool,
}

/// Everything produced by one pass over a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionReport {
    pub section: String,
    pub rows: Vec<ReportRow>,
    /// Records kept with their raw text because parsing failed.
    pub failures: usize,
    /// Records dropped because they were too short or mistyped.
    pub skipped: usize,
    /// Records present in the section before validation.
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_from_full_array() {
        let raw = vec![json!("alpha = 1/137"), json!(0.1), json!(1.0), json!(1.1)];
        let record = Record::from_raw(0, &raw).unwrap();
        assert_eq!(record.equation, "alpha = 1/137");
        assert_eq!(record.error, 0.1);
        assert_eq!(record.predicted, 1.0);
        assert_eq!(record.target, 1.1);
    }

    #[test]
    fn short_record_is_rejected() {
        let raw = vec![json!("alpha = 1/137"), json!(0.1), json!(1.0)];
        assert!(matches!(
            Record::from_raw(3, &raw),
            Err(SnippetError::RecordTooShort { index: 3, len: 3 })
        ));
    }

    #[test]
    fn mistyped_fields_are_rejected() {
        let raw = vec![json!(12), json!(0.1), json!(1.0), json!(1.1)];
        assert!(matches!(
            Record::from_raw(0, &raw),
            Err(SnippetError::InvalidRecord { index: 0, .. })
        ));
        let raw = vec![json!("a = b"), json!("x"), json!(1.0), json!(1.1)];
        assert!(matches!(
            Record::from_raw(1, &raw),
            Err(SnippetError::InvalidRecord { index: 1, .. })
        ));
    }

    #[test]
    fn null_numbers_become_nan() {
        let raw = vec![json!("a = b"), json!(null), json!(2), json!(3)];
        let record = Record::from_raw(0, &raw).unwrap();
        assert!(record.error.is_nan());
        assert_eq!(record.predicted, 2.0);
    }

    #[test]
    fn dataset_accessors() {
        let mut sections = BTreeMap::new();
        sections.insert("6".to_string(), vec![vec![json!("a = 1")]; 2]);
        sections.insert("7".to_string(), vec![]);
        let ds = Dataset::from_sections(sections);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.record_count(), 2);
        assert_eq!(ds.section_keys().collect::<Vec<_>>(), ["6", "7"]);
        assert!(ds.section("99").is_none());
    }
}
