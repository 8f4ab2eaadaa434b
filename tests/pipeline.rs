use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;

use smsnippets::config::{FileConfig, Settings, Vocabulary};
use smsnippets::symbolic::SymbolTable;
use smsnippets::{load_file, process_section, report, SnippetError};

fn write_dataset(dir: &Path) -> PathBuf {
    let data = json!({
        "6": [
            ["\\alpha = 1/137", 0.0001, 0.0073, 0.0072],
            ["m_{Z}^{2} = m_{\\mu} \\cdot 863", 0.5, 91.0, 91.2],
            ["r = m_{\\mu}^{2}/m_{Z}^{2}", 0.0, 1.3e-6, 1.3e-6],
            ["truncated = 1", 0.1, 0.2],
            ["d = \\delta^{-1}", 1.0, 11.0, 10.0]
        ],
        "7": [
            ["w = m_{W}/m_{Z}", 0.01, 0.88, 0.87],
            ["q = \\theta_{12} + \\theta_{13} + \\theta_{23}", 0.2, 1.6, 1.4]
        ]
    });
    let path = dir.join("standard_model_snippets.json.gz");
    let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    enc.write_all(data.to_string().as_bytes()).unwrap();
    enc.finish().unwrap();
    path
}

#[test]
fn section_six_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load_file(&write_dataset(dir.path())).unwrap();

    let section = process_section(&dataset, "6", &SymbolTable::basic()).unwrap();
    assert_eq!(section.total, 5);
    assert_eq!(section.skipped, 1);
    assert_eq!(section.failures, 1);

    let equations: Vec<&str> = section.rows.iter().map(|r| r.equation.as_str()).collect();
    assert_eq!(
        equations,
        [
            "Eq(alpha, 1/137)",
            "m_{Z}^{2} = m_{\\mu} \\cdot 863",
            "Eq(r, m_mu**2/m_Z**2)",
            "Eq(d, delta**(-1))",
        ]
    );

    let text = report::render_text(&section).unwrap();
    assert!(text.contains("Total equations processed: 4"));
    assert!(text.contains("Parse failures: 1, skipped records: 1"));
    assert!(text.contains("Eq(alpha, 1/137)"));
}

#[test]
fn section_seven_needs_extended_vocabulary() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load_file(&write_dataset(dir.path())).unwrap();

    let basic = process_section(&dataset, "7", &SymbolTable::basic()).unwrap();
    assert_eq!(basic.failures, 2);

    let settings = Settings::resolve(
        FileConfig::default(),
        Some("7".into()),
        Some(Vocabulary::Extended),
    );
    let extended = process_section(&dataset, &settings.section, &settings.symbols).unwrap();
    assert_eq!(extended.failures, 0);
    assert_eq!(
        extended.rows[1].equation,
        "Eq(q, theta_12 + theta_13 + theta_23)"
    );
}

#[test]
fn missing_section_processes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load_file(&write_dataset(dir.path())).unwrap();
    let err = process_section(&dataset, "99", &SymbolTable::extended()).unwrap_err();
    assert!(matches!(err, SnippetError::SectionNotFound(_)));
    assert_eq!(err.to_string(), "section '99' not found in dataset");
}

#[test]
fn missing_input_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_file(&dir.path().join("standard_model_snippets.json.gz")).unwrap_err();
    assert!(matches!(err, SnippetError::NotFound(_)));
}
