//! CSV ledger collaborator.

use std::path::Path;

use tracing::debug;

use pebcheck_core::error::LedgerError;
use pebcheck_core::ledger::{Ledger, Result};
use pebcheck_core::ReconciliationRecord;

/// Ledger backed by CSV files: the input table carries the identifier
/// column (other columns are ignored), the output table is written fresh
/// each run.
pub struct CsvLedger;

impl CsvLedger {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for CsvLedger {
    fn read_identifiers(&self, path: &Path, column: &str) -> Result<Vec<String>> {
        let mut reader =
            csv::Reader::from_path(path).map_err(|e| LedgerError::Read(e.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|e| LedgerError::Read(e.to_string()))?;
        let col = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| LedgerError::MissingColumn(column.to_string()))?;

        let mut identifiers = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| LedgerError::Read(e.to_string()))?;
            if let Some(value) = row.get(col) {
                let value = value.trim();
                if !value.is_empty() {
                    identifiers.push(value.to_string());
                }
            }
        }

        debug!(
            "read {} identifiers from {} (column {:?})",
            identifiers.len(),
            path.display(),
            column
        );
        Ok(identifiers)
    }

    fn write_records(&self, path: &Path, records: &[ReconciliationRecord]) -> Result<()> {
        let mut writer =
            csv::Writer::from_path(path).map_err(|e| LedgerError::Write(e.to_string()))?;

        writer
            .write_record(["invoice_number", "registration", "source_file", "split_from", "status"])
            .map_err(|e| LedgerError::Write(e.to_string()))?;

        for record in records {
            writer
                .write_record([
                    record.invoice_number.as_str(),
                    record.registration.as_deref().unwrap_or(""),
                    record.source_file.as_deref().unwrap_or(""),
                    record.split_from.as_deref().unwrap_or(""),
                    &record.status.to_string(),
                ])
                .map_err(|e| LedgerError::Write(e.to_string()))?;
        }

        writer.flush().map_err(|e| LedgerError::Write(e.to_string()))?;
        Ok(())
    }
}
