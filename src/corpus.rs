/*!
 * In-memory set of loaded subtitle files.
 *
 * The corpus owns every `SubtitleFile`, keyed by identifier. Iteration is in
 * ascending identifier order, so listings and search results never depend on
 * the order files were loaded in. Files are shared behind `Arc`, which makes
 * cloning the corpus a cheap read-only snapshot for worker tasks.
 */

use log::{info, warn};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::{SubtitleFile, SubtitleParser};

/// Outcome of one successful load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub identifier: String,
    pub encoding: &'static str,
    pub entry_count: usize,
}

/// One file that could not be loaded
#[derive(Debug)]
pub struct LoadFailure {
    pub identifier: String,
    pub error: SubtitleError,
}

/// Aggregated report of a multi-file load
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub loaded: Vec<LoadedFile>,
    pub failures: Vec<LoadFailure>,
}

impl LoadSummary {
    /// True when every file loaded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures that only report an already loaded file
    pub fn skipped(&self) -> impl Iterator<Item = &LoadFailure> {
        self.failures.iter().filter(|f| f.error.is_duplicate())
    }

    /// One line per failed file
    pub fn failure_report(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("{} ({})", f.identifier, f.error))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Loaded {} file(s)", self.loaded.len())?;
        if !self.failures.is_empty() {
            write!(f, ", {} failed", self.failures.len())?;
        }
        Ok(())
    }
}

/// The set of currently loaded subtitle files
#[derive(Debug, Clone, Default)]
pub struct SubtitleCorpus {
    files: BTreeMap<String, Arc<SubtitleFile>>,
}

impl SubtitleCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode, parse and store a file under `identifier`
    ///
    /// An identifier that is already present is rejected with
    /// `SubtitleError::Duplicate` before the content is looked at; the stored
    /// file is left as it was.
    pub fn load(&mut self, identifier: &str, raw: &[u8]) -> Result<LoadedFile, SubtitleError> {
        if self.files.contains_key(identifier) {
            return Err(SubtitleError::Duplicate {
                identifier: identifier.to_string(),
            });
        }

        let parsed = SubtitleParser::parse_bytes(identifier, raw)?;
        let file = SubtitleFile::new(identifier, parsed.encoding, parsed.entries)?;
        let loaded = LoadedFile {
            identifier: identifier.to_string(),
            encoding: file.encoding(),
            entry_count: file.entries().len(),
        };

        self.files.insert(identifier.to_string(), Arc::new(file));
        Ok(loaded)
    }

    /// Load a file from disk, keyed by its file name
    pub fn load_path<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadedFile, SubtitleError> {
        let path = path.as_ref();
        let identifier = FileManager::identifier_for(path);

        // Checked before reading so a duplicate never touches the disk
        if self.files.contains_key(&identifier) {
            return Err(SubtitleError::Duplicate { identifier });
        }

        let raw = FileManager::read_bytes(path).map_err(|source| SubtitleError::Io {
            identifier: identifier.clone(),
            source,
        })?;
        self.load(&identifier, &raw)
    }

    /// Load several files, collecting per-file failures instead of stopping
    pub fn load_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> LoadSummary {
        let mut summary = LoadSummary::default();
        let total = paths.len();

        for (i, path) in paths.iter().enumerate() {
            let path = path.as_ref();
            match self.load_path(path) {
                Ok(loaded) => {
                    info!(
                        "Loaded ({}/{}): {} [{} entries, {}]",
                        i + 1, total, loaded.identifier, loaded.entry_count, loaded.encoding
                    );
                    summary.loaded.push(loaded);
                }
                Err(error) if error.is_duplicate() => {
                    info!("Skipping already loaded file: {}", error.identifier());
                    summary.failures.push(LoadFailure {
                        identifier: error.identifier().to_string(),
                        error,
                    });
                }
                Err(error) => {
                    warn!("Failed to load {}: {}", error.identifier(), error);
                    summary.failures.push(LoadFailure {
                        identifier: error.identifier().to_string(),
                        error,
                    });
                }
            }
        }

        summary
    }

    /// Remove the given identifiers; absent ones are ignored
    ///
    /// # Returns
    /// * `usize` - How many files were actually removed
    pub fn remove<I, S>(&mut self, identifiers: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        identifiers
            .into_iter()
            .filter(|id| self.files.remove(id.as_ref()).is_some())
            .count()
    }

    /// Remove every file
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// `(identifier, entry count)` pairs in ascending identifier order
    pub fn list(&self) -> Vec<(String, usize)> {
        self.files
            .iter()
            .map(|(id, file)| (id.clone(), file.entries().len()))
            .collect()
    }

    /// Files in ascending identifier order
    pub fn files(&self) -> impl Iterator<Item = &SubtitleFile> {
        self.files.values().map(|file| file.as_ref())
    }

    pub fn get(&self, identifier: &str) -> Option<&SubtitleFile> {
        self.files.get(identifier).map(|file| file.as_ref())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.files.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total entries across all files
    pub fn total_entries(&self) -> usize {
        self.files.values().map(|file| file.entries().len()).sum()
    }
}
