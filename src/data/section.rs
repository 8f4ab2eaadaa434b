use super::model::{Dataset, Record, ReportRow, SectionReport};
use crate::error::{SnippetError, SnippetResult};
use crate::symbolic::{parse_equation, EquationOutcome, SymbolTable};

/// Parse every record of section `key` into a report row.
///
/// A missing section fails before any record is touched. Inside the section
/// nothing is fatal:
/// * records that are too short or mistyped are skipped with a warning
/// * equations that fail to parse keep their original text
///
/// Rows keep the order of the input records.
pub fn process_section(
    dataset: &Dataset,
    key: &str,
    symbols: &SymbolTable,
) -> SnippetResult<SectionReport> {
    let records = dataset
        .section(key)
        .ok_or_else(|| SnippetError::SectionNotFound(key.to_string()))?;

    let mut rows = Vec::with_capacity(records.len());
    let mut failures = 0;
    let mut skipped = 0;

    for (index, raw) in records.iter().enumerate() {
        let record = match Record::from_raw(index, raw) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("section {key}: skipping {e}");
                skipped += 1;
                continue;
            }
        };

        let outcome = parse_equation(&record.equation, symbols);
        if let EquationOutcome::Failed { text, reason } = &outcome {
            log::warn!("section {key}, record {index}: cannot parse {text:?}: {reason}");
            failures += 1;
        }

        rows.push(ReportRow {
            index,
            equation: outcome.rendered(),
            error: record.error,
            predicted: record.predicted,
            target: record.target,
            parsed: outcome.is_parsed(),
        });
    }

    log::info!(
        "section {key}: {failures}/{} equations failed to parse, {skipped} records skipped",
        records.len()
    );

    Ok(SectionReport {
        section: key.to_string(),
        rows,
        failures,
        skipped,
        total: records.len(),
    })
}
