//! Error types for the pebcheck-core library.

use thiserror::Error;

/// Main error type for the pebcheck library.
#[derive(Error, Debug)]
pub enum PebError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR collaborator error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Ledger read/write error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to the OCR collaborator.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR command could not be started at all.
    #[error("failed to run OCR command: {0}")]
    Spawn(String),

    /// The OCR command exited with a non-zero status.
    #[error("OCR exited with status {code}: {stderr}")]
    Failed { code: i32, stderr: String },

    /// The OCR command reported success but wrote no output file.
    #[error("OCR produced no output file: {0}")]
    MissingOutput(String),
}

/// Errors related to the tabular ledger collaborator.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The identifier column is absent from the input table.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Failed to read the input table.
    #[error("failed to read ledger: {0}")]
    Read(String),

    /// Failed to write the output table.
    #[error("failed to write ledger: {0}")]
    Write(String),
}

/// Result type for the pebcheck library.
pub type Result<T> = std::result::Result<T, PebError>;
