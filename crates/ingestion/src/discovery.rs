//! Input file discovery
//!
//! Lists the root directory (non-recursive) and flags each entry as a
//! candidate CSV file or not. Non-candidates are skipped with a warning.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use contracts::{ContractError, IoOp};
use regex::Regex;
use tracing::{debug, info, instrument, warn};

/// File names accepted as input: ASCII letters, digits, `_` and `+`, then `.csv`
pub const CANDIDATE_PATTERN: &str = r"^[A-Za-z0-9_+]+\.csv$";

static CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CANDIDATE_PATTERN).expect("candidate file pattern is valid"));

/// One directory entry and its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredEntry {
    /// File name (lossy for non UTF-8 names)
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Entry is a directory
    pub is_dir: bool,
    /// Entry will be parsed
    pub valid: bool,
}

/// Result of listing the root directory
#[derive(Debug, Clone)]
pub struct Discovery {
    entries: Vec<DiscoveredEntry>,
}

impl Discovery {
    /// Every entry, sorted by name
    pub fn entries(&self) -> &[DiscoveredEntry] {
        &self.entries
    }

    /// Entries to parse, in discovery order
    pub fn candidates(&self) -> impl Iterator<Item = &DiscoveredEntry> {
        self.entries.iter().filter(|e| e.valid)
    }

    /// Number of entries to parse
    pub fn candidate_count(&self) -> usize {
        self.candidates().count()
    }

    /// Number of skipped entries
    pub fn skipped_count(&self) -> usize {
        self.entries.len() - self.candidate_count()
    }
}

/// Whether a file name matches the input pattern
pub fn is_candidate_name(name: &str) -> bool {
    CANDIDATE.is_match(name)
}

/// List and classify the entries of `root`
///
/// # Errors
/// `ContractError::Io` with `IoOp::ReadDir` if the directory cannot be listed.
#[instrument(name = "discovery_scan", skip(root), fields(root = %root.display()))]
pub fn discover(root: &Path) -> Result<Discovery, ContractError> {
    let read_dir = fs::read_dir(root).map_err(|e| ContractError::io(IoOp::ReadDir, root, e))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| ContractError::io(IoOp::ReadDir, root, e))?;
        let path = entry.path();
        let is_dir = path.is_dir();
        let (name, utf8) = match entry.file_name().into_string() {
            Ok(name) => (name, true),
            Err(raw) => (raw.to_string_lossy().into_owned(), false),
        };
        let valid = utf8 && !is_dir && is_candidate_name(&name);

        entries.push(DiscoveredEntry {
            name,
            path,
            is_dir,
            valid,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    for entry in &entries {
        if entry.valid {
            debug!(file = %entry.name, "Discovered input file");
        } else if entry.is_dir {
            warn!(entry = %entry.name, "Skipping directory");
        } else {
            warn!(entry = %entry.name, pattern = CANDIDATE_PATTERN, "Skipping file, name does not match");
        }
    }

    let discovery = Discovery { entries };

    info!(
        entries = discovery.entries.len(),
        candidates = discovery.candidate_count(),
        skipped = discovery.skipped_count(),
        "Discovery complete"
    );

    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_candidate_pattern_compiles() {
        assert!(is_candidate_name("a.csv"));
    }

    #[test]
    fn test_candidate_names() {
        for ok in ["good.csv", "My_Playlist.csv", "rock+roll.csv", "2024.csv"] {
            assert!(is_candidate_name(ok), "rejected {ok}");
        }
        for bad in ["readme.txt", ".csv", "a.csv.bak", "my playlist.csv", "a-b.csv", "a.CSV", "a.tsv"] {
            assert!(!is_candidate_name(bad), "accepted {bad}");
        }
    }

    #[test]
    fn test_discover_flags_entries() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("good.csv"), "h\n").unwrap();
        fs::write(dir.path().join("readme.txt"), "hello").unwrap();
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let discovery = discover(dir.path()).unwrap();
        assert_eq!(discovery.entries().len(), 3);
        assert_eq!(discovery.candidate_count(), 1);
        assert_eq!(discovery.skipped_count(), 2);

        let names: Vec<_> = discovery.candidates().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["good.csv"]);

        let nested = discovery
            .entries()
            .iter()
            .find(|e| e.name == "nested.csv")
            .unwrap();
        assert!(nested.is_dir);
        assert!(!nested.valid);
    }

    #[test]
    fn test_discover_sorted_order() {
        let dir = tempdir().unwrap();
        for name in ["c.csv", "a.csv", "b.csv"] {
            fs::write(dir.path().join(name), "h\n").unwrap();
        }
        let discovery = discover(dir.path()).unwrap();
        let names: Vec<_> = discovery.candidates().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "c.csv"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = discover(&missing).unwrap_err();
        assert!(matches!(
            err,
            ContractError::Io {
                op: IoOp::ReadDir,
                ..
            }
        ));
    }

    #[test]
    fn test_discover_empty_dir() {
        let dir = tempdir().unwrap();
        let discovery = discover(dir.path()).unwrap();
        assert!(discovery.entries().is_empty());
        assert_eq!(discovery.candidate_count(), 0);
    }
}
