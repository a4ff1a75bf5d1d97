//! Expansion of per-identifier verdicts into output records.

use crate::models::record::{DocumentRange, MatchStatus, ReconciliationRecord};

/// Parsed verdict for one identifier, ready for expansion into rows.
#[derive(Debug, Clone)]
pub struct Verdict {
    /// The ledger identifier being answered for.
    pub identifier: String,
    /// Batch range, from the matched filename or the identifier itself.
    pub range: Option<DocumentRange>,
    /// Authoritative candidate filename, if any matched.
    pub source_file: Option<String>,
    /// Registration number parsed from the declaration, if found.
    pub registration: Option<String>,
    /// Whether the identifier (or a range member) was textually confirmed.
    pub confirmed: bool,
}

/// Turns verdicts into one or more [`ReconciliationRecord`] rows.
///
/// A confirmed batch expands into one row per range member. A located but
/// unconfirmed batch is historically still accepted as `OK`; strict mode
/// keeps the expansion but demotes those rows to `NO`.
pub struct RecordExpander {
    prefix: String,
    strict_batch_confirmation: bool,
}

impl RecordExpander {
    pub fn new(prefix: &str, strict_batch_confirmation: bool) -> Self {
        Self {
            prefix: prefix.to_string(),
            strict_batch_confirmation,
        }
    }

    pub fn expand(&self, verdict: &Verdict) -> Vec<ReconciliationRecord> {
        match verdict.range {
            Some(range) => {
                let status = if verdict.confirmed
                    || (verdict.source_file.is_some() && !self.strict_batch_confirmation)
                {
                    MatchStatus::Ok
                } else {
                    MatchStatus::No
                };
                range
                    .numbers()
                    .map(|n| ReconciliationRecord {
                        invoice_number: format!("{}-{}", self.prefix, n),
                        registration: verdict.registration.clone(),
                        source_file: verdict.source_file.clone(),
                        split_from: verdict.source_file.clone(),
                        status,
                    })
                    .collect()
            }
            None => vec![ReconciliationRecord {
                invoice_number: verdict.identifier.clone(),
                registration: verdict.registration.clone(),
                source_file: verdict.source_file.clone(),
                split_from: None,
                status: if verdict.confirmed {
                    MatchStatus::Ok
                } else {
                    MatchStatus::No
                },
            }],
        }
    }
}
