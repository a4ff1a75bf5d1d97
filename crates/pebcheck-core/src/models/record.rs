//! Output records of a reconciliation run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an invoice identifier was confirmed against a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchStatus {
    /// The identifier (or a member of its range) was textually confirmed.
    Ok,
    /// No confirmation: missing file, unreadable document, or absent identifier.
    No,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Ok => write!(f, "OK"),
            MatchStatus::No => write!(f, "NO"),
        }
    }
}

/// Inclusive numeric range encoded in a batch filename, e.g. `VAM-100-120`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRange {
    /// First invoice number covered by the document.
    pub start: u32,
    /// Last invoice number covered by the document.
    pub end: u32,
}

impl DocumentRange {
    /// Create a range, rejecting inverted bounds.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Number of invoice identifiers the range covers.
    pub fn count(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    /// Iterate the covered invoice numbers in ascending order.
    pub fn numbers(self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    pub fn contains(&self, n: u32) -> bool {
        self.start <= n && n <= self.end
    }
}

/// One output row of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationRecord {
    /// Invoice identifier the row answers for.
    pub invoice_number: String,

    /// Registration number parsed from the declaration, when one was found.
    /// Populated even on `NO` rows so partial information is preserved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,

    /// Filename the row was resolved from, if any candidate matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    /// Originating batch filename, set only on rows synthesized from a range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_from: Option<String>,

    /// Confirmation verdict.
    pub status: MatchStatus,
}

impl ReconciliationRecord {
    /// A `NO` row with nothing but the identifier, used when no candidate
    /// file exists.
    pub fn unmatched(invoice_number: impl Into<String>) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            registration: None,
            source_file: None,
            split_from: None,
            status: MatchStatus::No,
        }
    }
}
