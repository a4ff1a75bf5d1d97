//! Per-identifier reconciliation and run-level aggregation.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::declaration::{parse_registration, verify_presence};
use crate::expand::{RecordExpander, Verdict};
use crate::index::FileIndex;
use crate::models::config::ReconcileConfig;
use crate::models::record::ReconciliationRecord;
use crate::ocr::TextExtractor;
use crate::range::RangeParser;

/// Drives one reconciliation run: match, extract, verify, expand.
///
/// `reconcile_one` is pure per-identifier work with no shared mutable state,
/// so callers may fan identifiers out across workers; results then flow back
/// through [`Reconciler::merge_results`], the single deterministic merge
/// point. `reconcile_all` is the sequential equivalent that also skips work
/// for identifiers a prior batch expansion already answered.
pub struct Reconciler {
    index: FileIndex,
    extractor: TextExtractor,
    ranges: RangeParser,
    expander: RecordExpander,
}

impl Reconciler {
    pub fn new(index: FileIndex, extractor: TextExtractor, config: &ReconcileConfig) -> Self {
        let prefix = config.matching.invoice_prefix.as_str();
        Self {
            index,
            extractor,
            ranges: RangeParser::new(prefix),
            expander: RecordExpander::new(prefix, config.reconcile.strict_batch_confirmation),
        }
    }

    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// Resolve a single identifier into its output rows.
    pub fn reconcile_one(&self, identifier: &str) -> Vec<ReconciliationRecord> {
        let Some(name) = self.index.first_match(identifier).map(str::to_string) else {
            // No candidate file. The identifier itself may still encode a
            // batch range, which expands into per-member NO rows.
            debug!("{}: no candidate file", identifier);
            return self.expander.expand(&Verdict {
                identifier: identifier.to_string(),
                range: self.ranges.parse(identifier),
                source_file: None,
                registration: None,
                confirmed: false,
            });
        };

        let range = self.ranges.parse(&name);
        let doc = self.extractor.extract(&self.index.path_of(&name));

        if !doc.succeeded() {
            debug!("{}: no declaration page in {}", identifier, name);
            return self.expander.expand(&Verdict {
                identifier: identifier.to_string(),
                range,
                source_file: Some(name),
                registration: None,
                confirmed: false,
            });
        }

        let text = doc.declaration_text();
        let registration = parse_registration(&text);
        let confirmed = verify_presence(&text, identifier, range, self.ranges.prefix());
        debug!(
            "{}: source={} tier={:?} registration={:?} confirmed={}",
            identifier, name, doc.tier, registration, confirmed
        );

        self.expander.expand(&Verdict {
            identifier: identifier.to_string(),
            range,
            source_file: Some(name),
            registration,
            confirmed,
        })
    }

    /// Sequential run over all identifiers, in input order.
    ///
    /// Identifiers whose lowercase form was already emitted as an output
    /// invoice number (by a prior batch expansion, or a duplicate ledger
    /// row) are skipped before any extraction work happens.
    pub fn reconcile_all(&self, identifiers: &[String]) -> Vec<ReconciliationRecord> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::new();

        for identifier in identifiers {
            if seen.contains(&identifier.to_lowercase()) {
                debug!("{}: already answered, skipping", identifier);
                continue;
            }
            let records = self.reconcile_one(identifier);
            for record in &records {
                seen.insert(record.invoice_number.to_lowercase());
            }
            out.extend(records);
        }

        info!(
            "reconciled {} identifiers into {} records",
            identifiers.len(),
            out.len()
        );
        out
    }

    /// Merge per-identifier results produced by independent workers.
    ///
    /// `results[i]` must hold the rows `reconcile_one(&identifiers[i])`
    /// produced. Merging walks the input order and applies the same skip
    /// rule as [`Reconciler::reconcile_all`], so a parallel run yields the
    /// same record set as a sequential one.
    pub fn merge_results(
        identifiers: &[String],
        results: Vec<Vec<ReconciliationRecord>>,
    ) -> Vec<ReconciliationRecord> {
        debug_assert_eq!(identifiers.len(), results.len());

        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::new();

        for (identifier, records) in identifiers.iter().zip(results) {
            if seen.contains(&identifier.to_lowercase()) {
                continue;
            }
            for record in &records {
                seen.insert(record.invoice_number.to_lowercase());
            }
            out.extend(records);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;
    use crate::models::record::MatchStatus;
    use crate::ocr::{OcrBackend, OcrMode};
    use crate::pdf::TextSource;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::Path;

    /// Text source keyed by filename; files never touch disk.
    struct MapSource {
        docs: HashMap<String, Vec<String>>,
    }

    impl TextSource for MapSource {
        fn extract_pages(&self, path: &Path) -> crate::pdf::Result<Vec<String>> {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.docs
                .get(&name)
                .cloned()
                .ok_or_else(|| PdfError::Parse(format!("no such document: {}", name)))
        }
    }

    /// OCR stub for flows that must never escalate.
    struct NoOcr;

    impl OcrBackend for NoOcr {
        fn run(&self, _: &Path, _: &Path, _: OcrMode) -> crate::ocr::Result<()> {
            panic!("OCR must not run in this test");
        }
    }

    fn reconciler(docs: &[(&str, &str)], strict: bool) -> Reconciler {
        let names: Vec<String> = docs.iter().map(|(n, _)| n.to_string()).collect();
        let index = FileIndex::from_names(Path::new("/docs"), names);
        let source = MapSource {
            docs: docs
                .iter()
                .map(|(n, text)| (n.to_string(), vec![text.to_string()]))
                .collect(),
        };
        let extractor = TextExtractor::new(
            Box::new(source),
            Box::new(NoOcr),
            Path::new("/tmp/pebcheck-ocr-unused").to_path_buf(),
        );
        let mut config = ReconcileConfig::default();
        config.reconcile.strict_batch_confirmation = strict;
        Reconciler::new(index, extractor, &config)
    }

    const BATCH_PAGE: &str = "BC 3.0 PEMBERITAHUAN EKSPOR BARANG\n\
        Nomor Pendaftaran: 000123\n\
        22. Nomor & Tgl Invoice : VAM-101 12/05/2022";

    #[test]
    fn test_unmatched_identifier_yields_no_row() {
        // Scenario A: nothing in the document set contains "vam-1050".
        let r = reconciler(&[("Invoice_VAM-100-102.pdf", BATCH_PAGE)], false);
        let records = r.reconcile_one("VAM-1050");

        assert_eq!(records, vec![ReconciliationRecord::unmatched("VAM-1050")]);
    }

    #[test]
    fn test_confirmed_batch_expands() {
        // Scenario B: one batch file answers for VAM-100..VAM-102. Only
        // VAM-100 matches the filename by substring; the expansion covers
        // the other two.
        let r = reconciler(&[("Invoice_VAM-100-102.pdf", BATCH_PAGE)], false);
        let records = r.reconcile_one("VAM-100");

        assert_eq!(records.len(), 3);
        for (record, n) in records.iter().zip(100..) {
            assert_eq!(record.invoice_number, format!("VAM-{}", n));
            assert_eq!(record.source_file.as_deref(), Some("Invoice_VAM-100-102.pdf"));
            assert_eq!(record.split_from.as_deref(), Some("Invoice_VAM-100-102.pdf"));
            assert_eq!(record.status, MatchStatus::Ok);
            assert_eq!(record.registration.as_deref(), Some("000123"));
        }
    }

    #[test]
    fn test_confirmation_failure_keeps_registration() {
        let page = "BC 3.0 PEMBERITAHUAN EKSPOR BARANG\n\
            Nomor Pendaftaran: 000777\n\
            22. Nomor & Tgl Invoice : VAM-900";
        let r = reconciler(&[("PEB VAM-7.pdf", page)], false);
        let records = r.reconcile_one("VAM-7");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, MatchStatus::No);
        assert_eq!(records[0].registration.as_deref(), Some("000777"));
        assert_eq!(records[0].source_file.as_deref(), Some("PEB VAM-7.pdf"));
    }

    #[test]
    fn test_reconcile_all_skips_expanded_identifiers() {
        let r = reconciler(&[("Invoice_VAM-100-102.pdf", BATCH_PAGE)], false);
        let ids = vec!["VAM-100-102".to_string(), "VAM-101".to_string()];
        let records = r.reconcile_all(&ids);

        // VAM-101 was answered by the batch expansion; no extra rows.
        assert_eq!(records.len(), 3);
        assert_eq!(
            records.iter().filter(|r| r.invoice_number == "VAM-101").count(),
            1
        );
    }

    #[test]
    fn test_every_identifier_yields_at_least_one_record() {
        let r = reconciler(&[("Invoice_VAM-100-102.pdf", BATCH_PAGE)], false);
        let ids = vec!["VAM-100-102".to_string(), "VAM-555".to_string()];
        let records = r.reconcile_all(&ids);

        assert_eq!(records.len(), 4);
        assert!(records.iter().any(|rec| rec.invoice_number == "VAM-555"
            && rec.status == MatchStatus::No
            && rec.source_file.is_none()));
    }

    #[test]
    fn test_merge_matches_sequential_run() {
        let r = reconciler(&[("Invoice_VAM-100-102.pdf", BATCH_PAGE)], false);
        let ids = vec![
            "VAM-100-102".to_string(),
            "VAM-101".to_string(),
            "VAM-555".to_string(),
        ];

        let sequential = r.reconcile_all(&ids);
        let per_id: Vec<_> = ids.iter().map(|id| r.reconcile_one(id)).collect();
        let merged = Reconciler::merge_results(&ids, per_id);

        assert_eq!(merged, sequential);
    }

    #[test]
    fn test_strict_mode_rejects_unconfirmed_batch() {
        let page = "BC 3.0 PEMBERITAHUAN EKSPOR BARANG\n\
            Nomor Pendaftaran: 000123\n\
            22. Nomor & Tgl Invoice : VAM-999";
        let records_default = reconciler(&[("Invoice_VAM-100-102.pdf", page)], false)
            .reconcile_one("VAM-100");
        let records_strict = reconciler(&[("Invoice_VAM-100-102.pdf", page)], true)
            .reconcile_one("VAM-100");

        assert!(records_default.iter().all(|r| r.status == MatchStatus::Ok));
        assert!(records_strict.iter().all(|r| r.status == MatchStatus::No));
        assert_eq!(records_strict.len(), 3);
    }
}
