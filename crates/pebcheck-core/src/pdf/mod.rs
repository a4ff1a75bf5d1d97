//! PDF text extraction module.

mod extractor;

pub use extractor::PdfTextSource;

use std::path::Path;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Collaborator that turns a document into machine-readable text, split by
/// page. Pages without extractable text yield empty strings.
pub trait TextSource {
    /// Extract per-page text from the file at `path`.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// True when at least one page carries non-whitespace text.
pub fn has_text(pages: &[String]) -> bool {
    pages.iter().any(|p| !p.trim().is_empty())
}
