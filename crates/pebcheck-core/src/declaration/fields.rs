//! Registration-number parsing and invoice-presence verification.

use super::patterns::{INVOICE_LABEL, PACKING_LIST_LABEL, REGISTRATION_LABEL};
use crate::models::record::DocumentRange;

/// Extract the registration number: the trailing segment after the last
/// colon on the first line labelled "Nomor Pendaftaran". `None` when no such
/// line exists or the segment is blank.
pub fn parse_registration(text: &str) -> Option<String> {
    let line = text.lines().find(|l| REGISTRATION_LABEL.is_match(l))?;
    let value = line.rsplit(':').next().unwrap_or("").trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check whether the declaration text names the invoice.
///
/// A line confirms when it carries one of the two section labels ("Nomor &
/// Tgl Invoice" or "Packing List"; layouts vary, either counts) and, for a
/// plain identifier, the identifier itself. For a batch range the line must
/// instead name at least one in-range member as `PREFIX-<n>`.
pub fn verify_presence(
    text: &str,
    identifier: &str,
    range: Option<DocumentRange>,
    prefix: &str,
) -> bool {
    let needle = identifier.to_lowercase();
    let prefix = prefix.to_lowercase();

    for line in text.lines() {
        if !INVOICE_LABEL.is_match(line) && !PACKING_LIST_LABEL.is_match(line) {
            continue;
        }
        let line = line.to_lowercase();
        match range {
            None => {
                if line.contains(&needle) {
                    return true;
                }
            }
            Some(range) => {
                if range
                    .numbers()
                    .any(|n| line.contains(&format!("{}-{}", prefix, n)))
                {
                    return true;
                }
            }
        }
    }
    false
}
