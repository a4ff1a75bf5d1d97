//! Check command - reconcile a ledger against a directory of declarations.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use pebcheck_core::ledger::Ledger;
use pebcheck_core::{
    FileIndex, MatchStatus, PdfTextSource, ReconcileConfig, ReconciliationRecord, Reconciler,
    TextExtractor,
};

use crate::ledger::CsvLedger;
use crate::ocr::OcrMyPdf;

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Ledger CSV holding the invoice-number column
    #[arg(required = true)]
    ledger: PathBuf,

    /// Directory of declaration PDFs
    #[arg(required = true)]
    documents: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "checked.csv")]
    output: PathBuf,

    /// Name of the invoice-number column in the ledger
    #[arg(long, default_value = "INV NO")]
    column: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Directory for OCR-processed copies (default: "OCR" beside the documents)
    #[arg(long)]
    ocr_dir: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Require textual confirmation before accepting batch documents
    #[arg(long)]
    strict_batch: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV table
    Csv,
    /// JSON array of records
    Json,
}

pub async fn run(args: CheckArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let mut config = if let Some(path) = config_path {
        ReconcileConfig::from_file(std::path::Path::new(path))?
    } else {
        ReconcileConfig::default()
    };
    if args.strict_batch {
        config.reconcile.strict_batch_confirmation = true;
    }

    // Setup-phase validation: these are the only fatal errors of a run.
    if !args.ledger.exists() {
        anyhow::bail!("ledger file not found: {}", args.ledger.display());
    }
    if !args.documents.is_dir() {
        anyhow::bail!("document directory not found: {}", args.documents.display());
    }

    let ocr_dir = args.ocr_dir.clone().unwrap_or_else(|| {
        args.documents
            .parent()
            .unwrap_or(std::path::Path::new("."))
            .join(&config.ocr.cache_dir)
    });
    fs::create_dir_all(&ocr_dir)?;

    let ledger = CsvLedger::new();
    let identifiers = ledger.read_identifiers(&args.ledger, &args.column)?;
    if identifiers.is_empty() {
        anyhow::bail!(
            "no identifiers in column {:?} of {}",
            args.column,
            args.ledger.display()
        );
    }

    let index = FileIndex::scan(&args.documents)?;
    println!(
        "{} {} identifiers against {} documents",
        style("ℹ").blue(),
        identifiers.len(),
        index.len()
    );

    let ocr = OcrMyPdf::new();
    if !ocr.is_available() {
        warn!("ocrmypdf not found; scanned documents without a text layer will come up empty");
    }

    let extractor = TextExtractor::new(Box::new(PdfTextSource::new()), Box::new(ocr), ocr_dir)
        .with_cache_reuse(config.ocr.reuse_cache);
    let reconciler = Arc::new(Reconciler::new(index, extractor, &config));

    let pb = ProgressBar::new(identifiers.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} invoices")
            .unwrap()
            .progress_chars("=>-"),
    );

    let records = if args.jobs <= 1 {
        // Sequential pass: deterministic and skips work for identifiers a
        // batch expansion already answered.
        let records = reconciler.reconcile_all(&identifiers);
        pb.inc(identifiers.len() as u64);
        records
    } else {
        reconcile_parallel(reconciler.clone(), &identifiers, args.jobs, &pb).await?
    };

    pb.finish_with_message("Complete");

    // Write output, overwriting any previous run.
    match args.format {
        OutputFormat::Csv => ledger.write_records(&args.output, &records)?,
        OutputFormat::Json => fs::write(&args.output, serde_json::to_string_pretty(&records)?)?,
    }

    let ok = records.iter().filter(|r| r.status == MatchStatus::Ok).count();
    let no = records.len() - ok;
    let split = records.iter().filter(|r| r.split_from.is_some()).count();

    println!();
    println!(
        "{} Checked {} identifiers in {:?}",
        style("✓").green(),
        identifiers.len(),
        start.elapsed()
    );
    println!(
        "   {} confirmed, {} unconfirmed, {} from batch documents",
        style(ok).green(),
        style(no).red(),
        split
    );
    println!(
        "{} Results written to {}",
        style("✓").green(),
        args.output.display()
    );

    info!("run complete: {} records", records.len());
    Ok(())
}

/// Fan identifiers out across workers; each worker returns local rows that
/// are merged at a single point, in input order.
async fn reconcile_parallel(
    reconciler: Arc<Reconciler>,
    identifiers: &[String],
    jobs: usize,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<ReconciliationRecord>> {
    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut set = JoinSet::new();

    for (i, identifier) in identifiers.iter().cloned().enumerate() {
        let reconciler = reconciler.clone();
        let semaphore = semaphore.clone();
        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let records =
                tokio::task::spawn_blocking(move || reconciler.reconcile_one(&identifier)).await?;
            Ok::<_, anyhow::Error>((i, records))
        });
    }

    let mut slots: Vec<Vec<ReconciliationRecord>> = vec![Vec::new(); identifiers.len()];
    while let Some(joined) = set.join_next().await {
        let (i, records) = joined??;
        slots[i] = records;
        pb.inc(1);
    }

    Ok(Reconciler::merge_results(identifiers, slots))
}
