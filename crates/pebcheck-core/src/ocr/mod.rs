//! OCR collaborator seam and escalation state machine.

mod escalation;

pub use escalation::{DocumentText, TextExtractor, Tier};

use std::path::Path;

use crate::error::OcrError;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// OCR invocation mode, in escalation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrMode {
    /// Default pass; existing text layers are left alone.
    Basic,
    /// Adds deskew and page-rotation correction.
    Aggressive,
}

/// Collaborator that rewrites a scanned PDF into a searchable copy at
/// `output`. A failed pass is tolerated by the escalation machine: the tier
/// simply yields no text.
pub trait OcrBackend {
    fn run(&self, input: &Path, output: &Path, mode: OcrMode) -> Result<()>;
}
