//! Case-insensitive filename index over a document-set directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Precomputed lowercase index of the PDF filenames in a document set.
///
/// Matching is exact substring containment of the lowercased identifier in
/// the lowercased filename. When several files match, the first one in
/// listing order is authoritative (`firstListedCandidate`); entries are
/// sorted by filename at scan time so the policy does not depend on the
/// filesystem's enumeration order.
pub struct FileIndex {
    root: PathBuf,
    entries: Vec<IndexEntry>,
}

struct IndexEntry {
    name: String,
    lower: String,
}

impl FileIndex {
    /// Scan a directory for PDF files and build the index.
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.to_lowercase().ends_with(".pdf") {
                names.push(name);
            }
        }
        debug!("indexed {} PDF files under {}", names.len(), dir.display());
        Ok(Self::from_names(dir, names))
    }

    /// Build an index from an explicit name list (test seam).
    pub fn from_names(root: &Path, mut names: Vec<String>) -> Self {
        names.sort();
        let entries = names
            .into_iter()
            .map(|name| IndexEntry {
                lower: name.to_lowercase(),
                name,
            })
            .collect();
        Self {
            root: root.to_path_buf(),
            entries,
        }
    }

    /// Directory the index was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All filenames containing `identifier`, case-insensitively, in listing
    /// order. Empty when nothing matches.
    pub fn matches(&self, identifier: &str) -> Vec<&str> {
        let needle = identifier.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.lower.contains(&needle))
            .map(|e| e.name.as_str())
            .collect()
    }

    /// First candidate under the `firstListedCandidate` policy.
    pub fn first_match(&self, identifier: &str) -> Option<&str> {
        let needle = identifier.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.lower.contains(&needle))
            .map(|e| e.name.as_str())
    }

    /// Absolute path of an indexed filename.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}
