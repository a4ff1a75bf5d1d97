//! Core library for PEB export-declaration reconciliation.
//!
//! This crate provides:
//! - Filename matching of invoice identifiers against a document set
//! - Batch-range detection in filenames (`VAM-100-120` style)
//! - Text extraction with staged OCR escalation (raw -> basic -> aggressive)
//! - Declaration page filtering and registration-number parsing
//! - Expansion of batch documents into per-invoice records

pub mod error;
pub mod models;
pub mod index;
pub mod range;
pub mod pdf;
pub mod ocr;
pub mod declaration;
pub mod expand;
pub mod ledger;
pub mod reconcile;

pub use error::{PebError, Result};
pub use models::record::{DocumentRange, MatchStatus, ReconciliationRecord};
pub use models::config::ReconcileConfig;
pub use index::FileIndex;
pub use range::RangeParser;
pub use pdf::{PdfTextSource, TextSource};
pub use ocr::{DocumentText, OcrBackend, OcrMode, TextExtractor, Tier};
pub use expand::{RecordExpander, Verdict};
pub use ledger::Ledger;
pub use reconcile::Reconciler;
