use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use super::model::{Dataset, RawRecord};
use crate::error::{SnippetError, SnippetResult};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a snippet dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.json.gz` / `.gz` – gzip-compressed JSON (the canonical input)
/// * `.json`            – plain JSON, same schema
///
/// Anything else is assumed to be gzip-compressed.
///
/// Expected schema:
///
/// ```json
/// {
///   "6": [ ["\\alpha = 1/137", 0.01, 0.0073, 0.0072], ... ],
///   "7": [ ... ]
/// }
/// ```
pub fn load_file(path: &Path) -> SnippetResult<Dataset> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SnippetError::NotFound(path.to_path_buf()),
        _ => SnippetError::Io(e),
    })?;
    let reader = BufReader::new(file);

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "json" => load_json(reader, path)?,
        _ => load_json(MultiGzDecoder::new(reader), path)?,
    };

    log::debug!(
        "loaded {} sections ({} records) from {}",
        dataset.len(),
        dataset.record_count(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON decoding
// ---------------------------------------------------------------------------

/// Decode the full stream, then parse it. Both gzip and UTF-8 failures show up
/// as read errors and are reported as [`SnippetError::Decode`].
fn load_json<R: Read>(mut reader: R, path: &Path) -> SnippetResult<Dataset> {
    let decode_err = |reason: String| SnippetError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| decode_err(format!("reading stream: {e}")))?;

    let sections: BTreeMap<String, Vec<RawRecord>> =
        serde_json::from_str(&text).map_err(|e| decode_err(format!("parsing JSON: {e}")))?;

    Ok(Dataset::from_sections(sections))
}
