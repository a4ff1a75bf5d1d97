//! Tabular ledger collaborator seam.

use std::path::Path;

use crate::error::LedgerError;
use crate::models::record::ReconciliationRecord;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Collaborator reading the invoice-identifier column of an input table and
/// writing result rows back out. The output table is written fresh each run.
pub trait Ledger {
    /// Read the identifiers from `column`, in row order. Blank cells are
    /// skipped; all other columns are ignored.
    fn read_identifiers(&self, path: &Path, column: &str) -> Result<Vec<String>>;

    /// Write the result table, overwriting any previous output.
    fn write_records(&self, path: &Path, records: &[ReconciliationRecord]) -> Result<()>;
}
