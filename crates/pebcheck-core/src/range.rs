//! Batch-range detection in filenames and identifiers.

use regex::Regex;

use crate::models::record::DocumentRange;

/// Recognizes the `PREFIX-<digits>` token family, optionally followed by a
/// second `-<digits>` group (`VAM-100-120`).
pub struct RangeParser {
    pattern: Regex,
    prefix: String,
}

impl RangeParser {
    /// Build a parser for the given token prefix (`VAM` by default).
    pub fn new(prefix: &str) -> Self {
        let pattern =
            Regex::new(&format!(r"(?i){}-(\d+)(?:-(\d+))?", regex::escape(prefix))).unwrap();
        Self {
            pattern,
            prefix: prefix.to_string(),
        }
    }

    /// Detect a batch range in a filename or identifier.
    ///
    /// Only the first token of the family governs: a leading single-number
    /// token yields `None` even if a later token carries a full range.
    /// Inverted bounds are treated as not-a-range.
    pub fn parse(&self, name: &str) -> Option<DocumentRange> {
        let caps = self.pattern.captures(name)?;
        let start: u32 = caps[1].parse().ok()?;
        let end: u32 = caps.get(2)?.as_str().parse().ok()?;
        DocumentRange::new(start, end)
    }

    /// The configured token prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Render a full invoice number for a range member.
    pub fn invoice_number(&self, n: u32) -> String {
        format!("{}-{}", self.prefix, n)
    }
}

impl Default for RangeParser {
    fn default() -> Self {
        Self::new("VAM")
    }
}
