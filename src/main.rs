use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use folio::core::{FolioError, RunConfig};
use folio::pipeline::{self, RunOutcome};
use folio::report::ReportPaths;

/// Reconcile archived invoice and credit note bundles.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the archive bundles.
    #[arg(long)]
    archives: Option<PathBuf>,

    /// Directory the CSV reports are written to.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Target document count, reported against the unique count.
    #[arg(long)]
    expected_total: Option<i64>,

    /// Literal archive name prefix.
    #[arg(long)]
    prefix: Option<String>,

    /// Archive extension, without the dot.
    #[arg(long)]
    extension: Option<String>,

    /// Also export credit note line items.
    #[arg(long)]
    credit_note_lines: bool,
}

impl Cli {
    fn into_config(self) -> Result<RunConfig, FolioError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(dir) = self.archives {
            config.archive_directory = dir;
        }
        if let Some(dir) = self.output {
            config.output_directory = dir;
        }
        if let Some(total) = self.expected_total {
            config.expected_total = total;
        }
        if let Some(prefix) = self.prefix {
            config.filename_pattern.prefix = prefix;
        }
        if let Some(extension) = self.extension {
            config.filename_pattern.extension = extension;
        }
        if self.credit_note_lines {
            config.credit_note_lines = true;
        }
        Ok(config)
    }
}

fn print_summary(outcome: &RunOutcome, paths: &ReportPaths) {
    println!("Archives found: {}", outcome.archives.len());
    for s in &outcome.reconciliation.summaries {
        println!(
            "Series {} | unique={} | expected={} | diff={} | missing_in_range={} | duplicates={} | unparseable={}",
            s.series,
            s.unique_count,
            s.expected_total,
            s.expected_minus_unique,
            s.missing_count,
            s.duplicate_count,
            s.unparseable
        );
    }
    println!("Documents extracted: {}", outcome.documents.len());
    println!("Cancellation credit notes: {}", outcome.links.len());
    println!("Invoices marked voided: {}", outcome.voided_invoices());
    println!("Errors: {}", outcome.errors.len());
    println!("Control summary -> {}", paths.control_summary.display());
    println!("Documents -> {}", paths.documents.display());
    println!("Errors -> {}", paths.errors.display());
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = Cli::parse()
        .into_config()
        .and_then(|config| pipeline::run(&config));

    match result {
        Ok((outcome, paths)) => {
            print_summary(&outcome, &paths);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("run aborted: {e}");
            ExitCode::FAILURE
        }
    }
}
