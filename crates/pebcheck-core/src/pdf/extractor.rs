//! PDF text extraction using lopdf and pdf-extract.

use std::path::Path;

use lopdf::Document;
use tracing::debug;

use super::{Result, TextSource};
use crate::error::PdfError;

/// Text source backed by pdf-extract, with lopdf handling structure checks
/// and empty-password decryption.
pub struct PdfTextSource;

impl PdfTextSource {
    pub fn new() -> Self {
        Self
    }

    /// Validate the document and return bytes pdf-extract can read. PDFs
    /// encrypted with an empty password are decrypted and re-saved.
    fn prepare(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let mut doc = Document::load_mem(&data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            return Ok(decrypted);
        }

        Ok(data)
    }
}

impl Default for PdfTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for PdfTextSource {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let data = std::fs::read(path).map_err(|e| PdfError::Parse(e.to_string()))?;
        let data = self.prepare(data)?;

        let pages = pdf_extract::extract_text_from_mem_by_pages(&data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        debug!(
            "extracted {} pages ({} chars) from {}",
            pages.len(),
            pages.iter().map(String::len).sum::<usize>(),
            path.display()
        );
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_input_is_a_parse_error() {
        let source = PdfTextSource::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-pdf.pdf");
        std::fs::write(&path, b"plain text, no PDF header").unwrap();

        match source.extract_pages(&path) {
            Err(PdfError::Parse(_)) => {}
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_a_parse_error() {
        let source = PdfTextSource::new();
        assert!(source.extract_pages(Path::new("/nonexistent/x.pdf")).is_err());
    }
}
