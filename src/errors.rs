/*!
 * Error types for the subseek application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while loading and parsing subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The file could not be read from disk
    #[error("Failed to read subtitle file {identifier}: {source}")]
    Io {
        /// Identifier of the file being loaded
        identifier: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// None of the supported encodings could decode the file
    #[error("Unable to decode {identifier} with any supported encoding (tried {tried})")]
    Encoding {
        /// Identifier of the file being loaded
        identifier: String,
        /// Comma separated list of the encodings that were attempted
        tried: String,
    },

    /// The content decoded but yielded zero usable entries
    #[error("No usable subtitle entries found in {identifier}")]
    Parse {
        /// Identifier of the file being loaded
        identifier: String,
    },

    /// A file with the same identifier is already loaded
    #[error("Subtitle file {identifier} is already loaded")]
    Duplicate {
        /// Identifier that collided
        identifier: String,
    },
}

impl SubtitleError {
    /// Identifier of the file the error refers to
    pub fn identifier(&self) -> &str {
        match self {
            Self::Io { identifier, .. }
            | Self::Encoding { identifier, .. }
            | Self::Parse { identifier }
            | Self::Duplicate { identifier } => identifier,
        }
    }

    /// Whether the error only reports an already loaded file
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Errors that can occur when running a search
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The query was empty or whitespace only
    #[error("Search query must not be empty (got {query:?})")]
    InvalidQuery {
        /// The rejected query, untrimmed
        query: String,
    },
}

/// Errors that can occur when working with provider APIs
///
/// These three kinds are the only failures a provider exposes; transport
/// library errors are mapped onto them before leaving the provider.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// The request did not complete within the fixed timeout
    #[error("{provider} request timed out after {seconds}s")]
    Timeout {
        /// Provider display name
        provider: String,
        /// Timeout that was exceeded
        seconds: u64,
    },

    /// Any other transport failure, including non-2xx HTTP statuses
    #[error("{provider} request failed: {message}")]
    Network {
        /// Provider display name
        provider: String,
        /// Description of the failure
        message: String,
    },

    /// The response did not contain the expected fields
    #[error("{provider} returned an unexpected response: {body}")]
    Format {
        /// Provider display name
        provider: String,
        /// Raw response body
        body: String,
    },
}

/// Errors that can occur during translation
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// No provider selected or a mandatory credential is missing
    #[error("Translation is not configured: {0}")]
    Configuration(String),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// A task of the same kind is still running
    #[error("A {0} task is already in progress")]
    Busy(&'static str),

    /// Translate-all was requested without a result set
    #[error("There are no search results to translate")]
    NoResults,

    /// The worker side of the hand-off channel went away
    #[error("Worker hand-off channel closed unexpectedly")]
    ChannelClosed,

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle loading
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from searching
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
