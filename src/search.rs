use log::debug;
use std::fmt;

use crate::corpus::SubtitleCorpus;
use crate::errors::SearchError;

// @module: Case-insensitive substring search over the corpus

// @struct: One search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    // @field: Identifier of the file the entry came from
    pub file_identifier: String,

    // @field: Entry start timestamp
    pub timestamp: String,

    // @field: Entry text as parsed
    pub original_text: String,
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} [{}] {}", self.file_identifier, self.timestamp, self.original_text)
    }
}

/// The complete result of one search call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Trimmed query that produced the matches
    pub query: String,
    /// Matches grouped by file in identifier order, entry order within a file
    pub matches: Vec<MatchRecord>,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Consecutive runs of matches sharing a file identifier
    pub fn grouped(&self) -> Vec<(&str, &[MatchRecord])> {
        let mut groups = Vec::new();
        let mut start = 0;
        for i in 1..=self.matches.len() {
            let boundary = i == self.matches.len()
                || self.matches[i].file_identifier != self.matches[start].file_identifier;
            if boundary {
                groups.push((self.matches[start].file_identifier.as_str(), &self.matches[start..i]));
                start = i;
            }
        }
        groups
    }
}

// @struct: Linear substring search
pub struct SearchEngine;

impl SearchEngine {
    /// Find every entry whose text contains `query`, ignoring case
    ///
    /// An empty or whitespace-only query is rejected rather than treated as
    /// "no results". An empty corpus yields an empty result set.
    pub fn search(corpus: &SubtitleCorpus, query: &str) -> Result<SearchResults, SearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SearchError::InvalidQuery {
                query: query.to_string(),
            });
        }

        let needle = trimmed.to_lowercase();
        let mut matches = Vec::new();

        for file in corpus.files() {
            for entry in file.entries() {
                if entry.text().to_lowercase().contains(&needle) {
                    matches.push(MatchRecord {
                        file_identifier: file.identifier().to_string(),
                        timestamp: entry.timestamp().to_string(),
                        original_text: entry.text().to_string(),
                    });
                }
            }
        }

        debug!("Search for {:?} matched {} entries in {} files", trimmed, matches.len(), corpus.len());

        Ok(SearchResults {
            query: trimmed.to_string(),
            matches,
        })
    }
}
