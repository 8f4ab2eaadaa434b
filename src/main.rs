use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use smsnippets::config::{FileConfig, Settings, Vocabulary, DEFAULT_INPUT};
use smsnippets::{load_file, process_section, report};

#[derive(Parser)]
#[command(
    name = "smsnippets",
    version,
    about = "Parse Standard Model equation snippets and report their values"
)]
struct Cli {
    /// Gzip-compressed (or plain) JSON dataset
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Section key to process [default: 6]
    #[arg(short, long)]
    section: Option<String>,

    /// Constant vocabulary for right-hand sides [default: extended]
    #[arg(short, long, value_enum)]
    vocabulary: Option<Vocabulary>,

    /// TOML file with section, vocabulary and extra_symbols
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format on stdout
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Also write the rows as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Also write the rows as Parquet
    #[arg(long)]
    parquet: Option<PathBuf>,

    /// Print the section keys present in the dataset and exit
    #[arg(long)]
    list_sections: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file_config, cli.section, cli.vocabulary);

    let dataset = load_file(&cli.input)?;

    if cli.list_sections {
        for key in dataset.section_keys() {
            let count = dataset.section(key).map_or(0, |s| s.len());
            println!("{key}\t{count}");
        }
        return Ok(());
    }

    log::info!(
        "processing section {} with {} named constants",
        settings.section,
        settings.symbols.len()
    );
    let section = process_section(&dataset, &settings.section, &settings.symbols)?;

    match cli.format {
        Format::Text => print!("{}", report::render_text(&section)?),
        Format::Json => println!("{}", report::to_json(&section)?),
    }

    if let Some(path) = &cli.csv {
        report::write_csv(&section.rows, path)
            .with_context(|| format!("exporting CSV to {}", path.display()))?;
        log::info!("wrote {} rows to {}", section.rows.len(), path.display());
    }
    if let Some(path) = &cli.parquet {
        report::write_parquet(&section.rows, path)
            .with_context(|| format!("exporting Parquet to {}", path.display()))?;
        log::info!("wrote {} rows to {}", section.rows.len(), path.display());
    }

    Ok(())
}
