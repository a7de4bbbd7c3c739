/*!
 * # subseek - Subtitle search with optional translation
 *
 * A Rust library for loading SRT subtitle files, searching their text and
 * translating matched lines through a web translation service.
 *
 * ## Features
 *
 * - Load `.srt` files in UTF-8, GBK or UTF-16 (with or without BOM)
 * - Case-insensitive substring search across every loaded file
 * - Translate single texts or a whole result set through one of:
 *   - Azure Translator
 *   - Google Cloud Translation
 *   - Google's free public endpoint
 *   - DeepL
 * - Probe a provider's credentials before saving them
 * - Background search and translation with a single-writer controller
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_processor`: Decoding and parsing of subtitle files
 * - `corpus`: The set of loaded files, keyed by identifier
 * - `search`: Substring search producing match records
 * - `providers`: Client implementations for the translation services:
 *   - `providers::azure`: Microsoft Translator v3
 *   - `providers::google`: Google Cloud Translation v2
 *   - `providers::google_free`: Google public endpoint
 *   - `providers::deepl`: DeepL API
 * - `translation_service`: Routing to the active provider and sentinel strings
 * - `app_controller`: Owner of corpus and results, runs worker tasks
 * - `app_config`: Persisted provider choice and credentials
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod corpus;
pub mod search;
pub mod translation_service;
pub mod app_controller;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, ProviderKind, TranslationCredentials};
pub use app_controller::{Controller, ControllerEvent, TranslatedMatch};
pub use corpus::{LoadSummary, SubtitleCorpus};
pub use search::{MatchRecord, SearchEngine, SearchResults};
pub use subtitle_processor::{SubtitleEntry, SubtitleFile, SubtitleParser};
pub use translation_service::TranslationService;
pub use errors::{AppError, ProviderError, SearchError, SubtitleError, TranslationError};
