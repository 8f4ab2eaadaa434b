use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a dataset or walking one of its sections.
///
/// `NotFound`, `Decode` and `SectionNotFound` abort a run. The record-level
/// variants are recovered by the section processor, which skips the record.
#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("section '{0}' not found in dataset")]
    SectionNotFound(String),

    #[error("record {index} has {len} fields, expected at least 4")]
    RecordTooShort { index: usize, len: usize },

    #[error("record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type SnippetResult<T> = Result<T, SnippetError>;
