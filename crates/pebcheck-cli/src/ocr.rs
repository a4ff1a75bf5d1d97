//! `ocrmypdf` subprocess collaborator.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use pebcheck_core::error::OcrError;
use pebcheck_core::ocr::{OcrBackend, OcrMode, Result};

/// Runs `ocrmypdf` to rewrite a scanned PDF into a searchable copy.
///
/// Basic mode passes `--skip-text` so pages that already carry a text layer
/// are left alone; aggressive mode adds `--deskew --rotate-pages` for
/// crooked or rotated scans.
pub struct OcrMyPdf {
    program: String,
}

impl OcrMyPdf {
    pub fn new() -> Self {
        Self {
            program: "ocrmypdf".to_string(),
        }
    }

    /// Override the executable name/path.
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    /// Check whether the OCR executable can be invoked at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Default for OcrMyPdf {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for OcrMyPdf {
    fn run(&self, input: &Path, output: &Path, mode: OcrMode) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--skip-text");
        if mode == OcrMode::Aggressive {
            cmd.arg("--deskew").arg("--rotate-pages");
        }
        cmd.arg(input).arg(output);

        debug!("invoking {:?}", cmd);
        let out = cmd.output().map_err(|e| OcrError::Spawn(e.to_string()))?;

        if !out.status.success() {
            return Err(OcrError::Failed {
                code: out.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            });
        }
        if !output.exists() {
            return Err(OcrError::MissingOutput(output.display().to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_a_spawn_error() {
        let ocr = OcrMyPdf::new().with_program("pebcheck-no-such-binary");
        assert!(!ocr.is_available());

        let dir = tempfile::tempdir().unwrap();
        let result = ocr.run(
            &dir.path().join("in.pdf"),
            &dir.path().join("out.pdf"),
            OcrMode::Basic,
        );
        assert!(matches!(result, Err(OcrError::Spawn(_))));
    }
}
