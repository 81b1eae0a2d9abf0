use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use centris_core::CanonicalRecord;
use centris_pdf_mupdf::MupdfBackend;

/// Centris report extractor - Pull property listings out of Centris PDF reports
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract property records from a Centris PDF report
    Extract {
        /// Path to the PDF report
        file_path: PathBuf,

        /// Write an XLSX workbook to this path (default: input name with .xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print records as JSON instead of writing a workbook
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract {
            file_path,
            output,
            json,
        } => extract(&file_path, output, json),
    }
}

fn extract(file_path: &Path, output: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let backend = MupdfBackend::new();
    let extraction = centris_parsing::extract_listings(file_path, &backend)
        .with_context(|| format!("failed to extract {}", file_path.display()))?;

    let records: Vec<CanonicalRecord> = extraction
        .records
        .iter()
        .map(CanonicalRecord::from_raw)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        if !extraction.errors.is_empty() {
            eprintln!(
                "{} record(s) could not be assembled",
                extraction.errors.len()
            );
        }
        return Ok(());
    }

    let out_path = output.unwrap_or_else(|| file_path.with_extension("xlsx"));
    centris_xlsx::write_workbook(&records, &extraction.errors, &out_path)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    println!(
        "{}: {} record(s), {} error(s) -> {}",
        file_path.display(),
        records.len(),
        extraction.errors.len(),
        out_path.display()
    );
    for err in &extraction.errors {
        match &err.centris_no {
            Some(no) => eprintln!("  [{}] {}", no, err.message),
            None => eprintln!("  {}", err.message),
        }
    }

    Ok(())
}
