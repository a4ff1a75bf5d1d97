//! Inspect command - run extraction and escalation on a single document.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use pebcheck_core::declaration::parse_registration;
use pebcheck_core::{PdfTextSource, ReconcileConfig, TextExtractor, Tier};

use crate::ocr::OcrMyPdf;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Declaration PDF to inspect
    #[arg(required = true)]
    input: PathBuf,

    /// Directory for OCR-processed copies
    #[arg(long, default_value = "OCR")]
    ocr_dir: PathBuf,

    /// Skip OCR escalation and report raw extraction only
    #[arg(long)]
    text_only: bool,

    /// Print the selected declaration text
    #[arg(long)]
    show_text: bool,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = if let Some(path) = config_path {
        ReconcileConfig::from_file(std::path::Path::new(path))?
    } else {
        ReconcileConfig::default()
    };

    if !args.input.exists() {
        anyhow::bail!("input file not found: {}", args.input.display());
    }
    std::fs::create_dir_all(&args.ocr_dir)?;

    info!("inspecting {}", args.input.display());

    let (doc, show_text) = tokio::task::spawn_blocking(move || {
        let ocr = OcrMyPdf::new();
        let mut extractor =
            TextExtractor::new(Box::new(PdfTextSource::new()), Box::new(ocr), args.ocr_dir)
                .with_cache_reuse(config.ocr.reuse_cache);
        if args.text_only {
            extractor = extractor.with_ocr_disabled();
        }
        (extractor.extract(&args.input), args.show_text)
    })
    .await?;

    let tier = match doc.tier {
        Tier::Raw => "raw text",
        Tier::OcrBasic => "basic OCR",
        Tier::OcrAggressive => "aggressive OCR",
    };

    println!("{} source: {}", style("ℹ").blue(), doc.source.display());
    println!("{} tier reached: {}", style("ℹ").blue(), tier);
    println!(
        "{} pages: {} total, {} with declaration signature",
        style("ℹ").blue(),
        doc.pages.len(),
        doc.declaration_pages.len()
    );

    if doc.succeeded() {
        let text = doc.declaration_text();
        match parse_registration(&text) {
            Some(registration) => println!(
                "{} registration number: {}",
                style("✓").green(),
                registration
            ),
            None => println!("{} no registration number found", style("!").yellow()),
        }
        if show_text {
            println!();
            println!("{}", text);
        }
    } else {
        println!(
            "{} no declaration content found (would be reported as NO)",
            style("✗").red()
        );
    }

    Ok(())
}
