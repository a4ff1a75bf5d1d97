//! Configuration structures for the reconciliation pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for a reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Filename/identifier matching configuration.
    pub matching: MatchingConfig,

    /// OCR escalation configuration.
    pub ocr: OcrConfig,

    /// Driver configuration.
    pub reconcile: DriverConfig,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            matching: MatchingConfig::default(),
            ocr: OcrConfig::default(),
            reconcile: DriverConfig::default(),
        }
    }
}

/// Matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Prefix of the invoice-number token family (`VAM` in `VAM-100-120`).
    pub invoice_prefix: String,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            invoice_prefix: "VAM".to_string(),
        }
    }
}

/// OCR escalation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory holding OCR-processed copies, one per source filename.
    pub cache_dir: PathBuf,

    /// Reuse an existing OCR copy instead of re-running the basic pass.
    /// Cheap across repeated runs, but a replaced source PDF keeps serving
    /// the stale OCR text until the copy is deleted.
    pub reuse_cache: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("OCR"),
            reuse_cache: true,
        }
    }
}

/// Driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Require textual confirmation before accepting a located batch
    /// document. The historical behavior (false) accepts a located batch
    /// file even when no declaration line names its invoices.
    pub strict_batch_confirmation: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            strict_batch_confirmation: false,
        }
    }
}

impl ReconcileConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
