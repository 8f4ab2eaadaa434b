use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::{max, min, sum};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use crate::data::model::{ReportRow, SectionReport};

const NUMERIC_COLUMNS: [&str; 3] = ["Error", "Predicted", "Target"];
const STAT_NAMES: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

// ---------------------------------------------------------------------------
// Arrow conversion
// ---------------------------------------------------------------------------

/// Build the `Index | Equation | Error | Predicted | Target` batch.
///
/// `NaN` values are stored as nulls so the aggregate kernels skip them.
pub fn rows_to_batch(rows: &[ReportRow]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Index", DataType::Int64, false),
        Field::new("Equation", DataType::Utf8, false),
        Field::new("Error", DataType::Float64, true),
        Field::new("Predicted", DataType::Float64, true),
        Field::new("Target", DataType::Float64, true),
    ]));

    let index = Int64Array::from_iter_values(rows.iter().map(|r| r.index as i64));
    let equation = StringArray::from_iter_values(rows.iter().map(|r| r.equation.as_str()));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(index),
        Arc::new(equation),
        Arc::new(float_column(rows, |r| r.error)),
        Arc::new(float_column(rows, |r| r.predicted)),
        Arc::new(float_column(rows, |r| r.target)),
    ];

    RecordBatch::try_new(schema, columns).context("building report batch")
}

fn float_column(rows: &[ReportRow], field: impl Fn(&ReportRow) -> f64) -> Float64Array {
    rows.iter()
        .map(|r| Some(field(r)).filter(|v| !v.is_nan()))
        .collect()
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Summary of one numeric column. Undefined values (empty column, `std` of a
/// single value) are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStats {
    fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

/// Statistics for the `Error`, `Predicted` and `Target` columns.
pub fn describe(rows: &[ReportRow]) -> Result<Vec<ColumnStats>> {
    let batch = rows_to_batch(rows)?;
    NUMERIC_COLUMNS
        .iter()
        .map(|name| {
            let column = batch
                .column_by_name(name)
                .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
                .with_context(|| format!("missing numeric column {name}"))?;
            Ok(column_stats(name, column))
        })
        .collect()
}

fn column_stats(name: &str, column: &Float64Array) -> ColumnStats {
    let count = column.len() - column.null_count();
    let mut sorted: Vec<f64> = column.iter().flatten().collect();
    sorted.sort_by(f64::total_cmp);

    let mean = sum(column).map_or(f64::NAN, |s| s / count as f64);
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    };

    ColumnStats {
        name: name.to_string(),
        count,
        mean,
        std,
        min: min(column).unwrap_or(f64::NAN),
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.50),
        q75: quantile(&sorted, 0.75),
        max: max(column).unwrap_or(f64::NAN),
    }
}

/// Linear interpolation between closest ranks over sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Mean of `|error / target| * 100` over rows with a finite, non-zero target.
pub fn mean_relative_error(rows: &[ReportRow]) -> Option<f64> {
    let values: Vec<f64> = rows
        .iter()
        .filter(|r| r.target != 0.0 && r.target.is_finite() && r.error.is_finite())
        .map(|r| (r.error / r.target).abs() * 100.0)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn stats_batch(stats: &[ColumnStats]) -> Result<RecordBatch> {
    let mut fields = vec![Field::new("", DataType::Utf8, false)];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from_iter_values(STAT_NAMES))];
    for col in stats {
        fields.push(Field::new(col.name.as_str(), DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from_iter_values(col.values())));
    }
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).context("building statistics batch")
}

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

/// Human-readable report: row table, totals, statistics, relative error.
pub fn render_text(report: &SectionReport) -> Result<String> {
    let rows = pretty_format_batches(&[rows_to_batch(&report.rows)?])
        .context("formatting report table")?;
    let stats = pretty_format_batches(&[stats_batch(&describe(&report.rows)?)?])
        .context("formatting statistics table")?;

    let mut out = String::new();
    out.push_str(&format!(
        "Standard Model equations and values (section {}):\n",
        report.section
    ));
    out.push_str(&"=".repeat(80));
    out.push('\n');
    out.push_str(&format!("{rows}\n"));
    out.push_str(&format!("\nTotal equations processed: {}\n", report.rows.len()));
    out.push_str(&format!(
        "Parse failures: {}, skipped records: {}\n",
        report.failures, report.skipped
    ));
    out.push_str(&format!("\nValue statistics:\n{stats}\n"));
    if let Some(mre) = mean_relative_error(&report.rows) {
        out.push_str(&format!("\nMean relative error: {mre:.4}%\n"));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a SectionReport,
    statistics: Vec<ColumnStats>,
    mean_relative_error: Option<f64>,
}

/// Pretty JSON document with the rows, counters and statistics.
pub fn to_json(report: &SectionReport) -> Result<String> {
    let doc = JsonReport {
        report,
        statistics: describe(&report.rows)?,
        mean_relative_error: mean_relative_error(&report.rows),
    };
    serde_json::to_string_pretty(&doc).context("serializing JSON report")
}

pub fn write_csv(rows: &[ReportRow], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

pub fn write_parquet(rows: &[ReportRow], path: &Path) -> Result<()> {
    let batch = rows_to_batch(rows)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
