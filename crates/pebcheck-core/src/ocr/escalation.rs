//! Staged text extraction: raw, then basic OCR, then aggressive OCR.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{OcrBackend, OcrMode};
use crate::declaration::filter::select_pages;
use crate::pdf::{has_text, TextSource};

/// Escalation tier for a single source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Extraction straight from the original file.
    Raw,
    /// Extraction from the basic OCR copy.
    OcrBasic,
    /// Extraction from the aggressive (deskew + rotate) OCR copy.
    OcrAggressive,
}

/// Terminal result of text extraction for one document.
#[derive(Debug)]
pub struct DocumentText {
    /// Per-page text from the last source consulted.
    pub pages: Vec<String>,
    /// Pages matching the declaration signature, in page order.
    pub declaration_pages: Vec<String>,
    /// Highest tier reached.
    pub tier: Tier,
    /// Path text was last read from (original file or OCR copy).
    pub source: PathBuf,
}

impl DocumentText {
    /// SUCCEEDED terminal state: at least one declaration page was found.
    pub fn succeeded(&self) -> bool {
        !self.declaration_pages.is_empty()
    }

    /// Full text, pages joined with newlines.
    pub fn text(&self) -> String {
        self.pages.join("\n")
    }

    /// Working text for field parsing: the declaration pages in page order.
    pub fn declaration_text(&self) -> String {
        self.declaration_pages.join("\n")
    }
}

/// Walks a document through the escalation tiers until a declaration page is
/// found or the tiers are exhausted.
///
/// OCR output is cached under one fixed path per source filename. The basic
/// pass runs at most once per file: an existing copy is reused. The
/// aggressive pass always overwrites the copy, since it only runs when the
/// current copy was not good enough.
pub struct TextExtractor {
    source: Box<dyn TextSource + Send + Sync>,
    ocr: Box<dyn OcrBackend + Send + Sync>,
    cache_dir: PathBuf,
    reuse_cache: bool,
    escalate: bool,
}

impl TextExtractor {
    pub fn new(
        source: Box<dyn TextSource + Send + Sync>,
        ocr: Box<dyn OcrBackend + Send + Sync>,
        cache_dir: PathBuf,
    ) -> Self {
        Self {
            source,
            ocr,
            cache_dir,
            reuse_cache: true,
            escalate: true,
        }
    }

    /// Disable reuse of pre-existing OCR copies (forces a fresh basic pass).
    pub fn with_cache_reuse(mut self, reuse: bool) -> Self {
        self.reuse_cache = reuse;
        self
    }

    /// Disable the OCR tiers entirely: raw extraction and page filtering only.
    pub fn with_ocr_disabled(mut self) -> Self {
        self.escalate = false;
        self
    }

    /// Cache path for a source document: same filename, under the cache dir.
    pub fn cache_path(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        self.cache_dir.join(name)
    }

    /// Run the escalation machine on one document.
    ///
    /// Failures below this point (unreadable file, failed OCR pass) are
    /// contained: the affected tier yields no text and the machine moves on,
    /// so an exhausted document surfaces as a `NO` row rather than an error.
    pub fn extract(&self, input: &Path) -> DocumentText {
        let cache = self.cache_path(input);

        // RAW
        let mut tier = Tier::Raw;
        let mut source_path = input.to_path_buf();
        let mut pages = self.read_pages(&source_path);

        // RAW -> OCR_BASIC when the original has no usable text at all.
        if self.escalate && !has_text(&pages) {
            tier = Tier::OcrBasic;
            if self.reuse_cache && cache.exists() {
                debug!("reusing OCR copy {}", cache.display());
            } else {
                self.run_ocr(input, &cache, OcrMode::Basic);
            }
            source_path = cache.clone();
            pages = self.read_pages(&source_path);
        }

        let mut declaration_pages = select_pages(&pages);

        // -> OCR_AGGRESSIVE: one attempt when text exists but no page
        // carries the declaration signature (or the basic copy stayed empty).
        if self.escalate && declaration_pages.is_empty() && tier < Tier::OcrAggressive {
            tier = Tier::OcrAggressive;
            self.run_ocr(input, &cache, OcrMode::Aggressive);
            source_path = cache.clone();
            pages = self.read_pages(&source_path);
            declaration_pages = select_pages(&pages);
        }

        if declaration_pages.is_empty() {
            debug!("{}: exhausted at {:?}", input.display(), tier);
        }

        DocumentText {
            pages,
            declaration_pages,
            tier,
            source: source_path,
        }
    }

    fn read_pages(&self, path: &Path) -> Vec<String> {
        match self.source.extract_pages(path) {
            Ok(pages) => pages,
            Err(e) => {
                warn!("text extraction failed for {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    fn run_ocr(&self, input: &Path, output: &Path, mode: OcrMode) {
        debug!("running {:?} OCR: {} -> {}", mode, input.display(), output.display());
        if let Err(e) = self.ocr.run(input, output, mode) {
            warn!("{:?} OCR pass failed for {}: {}", mode, input.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;
    use crate::ocr::Result as OcrResult;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    const DECLARATION: &str = "BC 3.0 PEMBERITAHUAN EKSPOR BARANG\nNomor Pendaftaran: 000123";

    /// Maps a marker written by [`StubOcr`] (file contents) to page text, so
    /// the cache-file mechanics are exercised for real.
    struct StubSource {
        raw: Vec<String>,
        basic: Vec<String>,
        aggressive: Vec<String>,
    }

    impl TextSource for StubSource {
        fn extract_pages(&self, path: &Path) -> crate::pdf::Result<Vec<String>> {
            let content =
                std::fs::read_to_string(path).map_err(|e| PdfError::Parse(e.to_string()))?;
            Ok(match content.as_str() {
                "basic" => self.basic.clone(),
                "aggressive" => self.aggressive.clone(),
                _ => self.raw.clone(),
            })
        }
    }

    struct StubOcr {
        calls: Arc<Mutex<Vec<OcrMode>>>,
    }

    impl OcrBackend for StubOcr {
        fn run(&self, _input: &Path, output: &Path, mode: OcrMode) -> OcrResult<()> {
            self.calls.lock().unwrap().push(mode);
            let marker = match mode {
                OcrMode::Basic => "basic",
                OcrMode::Aggressive => "aggressive",
            };
            std::fs::write(output, marker).unwrap();
            Ok(())
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        calls: Arc<Mutex<Vec<OcrMode>>>,
        extractor: TextExtractor,
        input: PathBuf,
    }

    fn fixture(raw: &[&str], basic: &[&str], aggressive: &[&str]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        std::fs::write(&input, "raw").unwrap();
        let cache_dir = dir.path().join("OCR");
        std::fs::create_dir(&cache_dir).unwrap();

        let calls = Arc::new(Mutex::new(Vec::new()));
        let source = StubSource {
            raw: raw.iter().map(|s| s.to_string()).collect(),
            basic: basic.iter().map(|s| s.to_string()).collect(),
            aggressive: aggressive.iter().map(|s| s.to_string()).collect(),
        };
        let ocr = StubOcr {
            calls: calls.clone(),
        };
        let extractor = TextExtractor::new(Box::new(source), Box::new(ocr), cache_dir);
        Fixture {
            _dir: dir,
            calls,
            extractor,
            input,
        }
    }

    #[test]
    fn test_raw_text_with_declaration_skips_ocr() {
        let f = fixture(&["cover page", DECLARATION], &[], &[]);
        let doc = f.extractor.extract(&f.input);

        assert_eq!(doc.tier, Tier::Raw);
        assert!(doc.succeeded());
        assert_eq!(doc.declaration_pages.len(), 1);
        assert!(f.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_raw_escalates_to_basic() {
        let f = fixture(&["", "  "], &[DECLARATION], &[]);
        let doc = f.extractor.extract(&f.input);

        assert_eq!(doc.tier, Tier::OcrBasic);
        assert!(doc.succeeded());
        assert_eq!(*f.calls.lock().unwrap(), vec![OcrMode::Basic]);
        assert_eq!(doc.source, f.extractor.cache_path(&f.input));
    }

    #[test]
    fn test_basic_without_declaration_escalates_to_aggressive() {
        // Scenario: zero raw text, basic OCR yields unrelated text, the
        // aggressive pass finally surfaces the declaration page.
        let f = fixture(&[""], &["smudged, unrelated text"], &[DECLARATION]);
        let doc = f.extractor.extract(&f.input);

        assert_eq!(doc.tier, Tier::OcrAggressive);
        assert!(doc.succeeded());
        assert_eq!(
            *f.calls.lock().unwrap(),
            vec![OcrMode::Basic, OcrMode::Aggressive]
        );
    }

    #[test]
    fn test_raw_text_without_declaration_gets_one_aggressive_attempt() {
        let f = fixture(&["some other document"], &[], &["still not it"]);
        let doc = f.extractor.extract(&f.input);

        assert_eq!(doc.tier, Tier::OcrAggressive);
        assert!(!doc.succeeded());
        // Basic is skipped: raw text existed, so only the aggressive retry runs.
        assert_eq!(*f.calls.lock().unwrap(), vec![OcrMode::Aggressive]);
    }

    #[test]
    fn test_existing_cache_suppresses_basic_ocr() {
        let f = fixture(&[""], &[DECLARATION], &[]);
        std::fs::write(f.extractor.cache_path(&f.input), "basic").unwrap();
        let doc = f.extractor.extract(&f.input);

        assert_eq!(doc.tier, Tier::OcrBasic);
        assert!(doc.succeeded());
        assert!(f.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cache_reuse_can_be_disabled() {
        let f = fixture(&[""], &[DECLARATION], &[]);
        std::fs::write(f.extractor.cache_path(&f.input), "stale").unwrap();
        let extractor = f.extractor.with_cache_reuse(false);
        let doc = extractor.extract(&f.input);

        assert!(doc.succeeded());
        assert_eq!(*f.calls.lock().unwrap(), vec![OcrMode::Basic]);
    }

    #[test]
    fn test_exhausted_when_aggressive_finds_nothing() {
        let f = fixture(&[""], &["noise"], &["more noise"]);
        let doc = f.extractor.extract(&f.input);

        assert_eq!(doc.tier, Tier::OcrAggressive);
        assert!(!doc.succeeded());
        assert!(doc.declaration_pages.is_empty());
        assert_eq!(doc.text(), "more noise");
    }

    #[test]
    fn test_ocr_disabled_stops_at_raw() {
        let f = fixture(&["no declaration here"], &[DECLARATION], &[DECLARATION]);
        let extractor = f.extractor.with_ocr_disabled();
        let doc = extractor.extract(&f.input);

        assert_eq!(doc.tier, Tier::Raw);
        assert!(!doc.succeeded());
        assert!(f.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failed_ocr_yields_exhausted_not_error() {
        struct FailingOcr;
        impl OcrBackend for FailingOcr {
            fn run(&self, _: &Path, _: &Path, _: OcrMode) -> OcrResult<()> {
                Err(crate::error::OcrError::Spawn("no ocrmypdf".into()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        std::fs::write(&input, "raw").unwrap();
        let source = StubSource {
            raw: vec![String::new()],
            basic: vec![],
            aggressive: vec![],
        };
        let extractor = TextExtractor::new(
            Box::new(source),
            Box::new(FailingOcr),
            dir.path().join("OCR"),
        );

        let doc = extractor.extract(&input);
        assert!(!doc.succeeded());
        assert_eq!(doc.tier, Tier::OcrAggressive);
    }
}
