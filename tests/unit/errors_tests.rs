/*!
 * Tests for error types and conversions
 */

use subseek::errors::{AppError, ProviderError, SearchError, SubtitleError, TranslationError};

#[test]
fn test_subtitleError_encoding_shouldNameFileAndEncodings() {
    let error = SubtitleError::Encoding {
        identifier: "movie.srt".to_string(),
        tried: "UTF-8, GBK".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("movie.srt"));
    assert!(display.contains("UTF-8, GBK"));
    assert_eq!(error.identifier(), "movie.srt");
    assert!(!error.is_duplicate());
}

#[test]
fn test_subtitleError_duplicate_shouldBeFlaggedAsDuplicate() {
    let error = SubtitleError::Duplicate { identifier: "a.srt".to_string() };
    assert!(error.is_duplicate());
    assert!(format!("{}", error).contains("already loaded"));
}

#[test]
fn test_subtitleError_io_shouldExposeSource() {
    let error = SubtitleError::Io {
        identifier: "gone.srt".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
    };
    assert!(std::error::Error::source(&error).is_some());
    assert!(format!("{}", error).contains("File not found"));
}

#[test]
fn test_providerError_timeout_shouldDisplaySeconds() {
    let error = ProviderError::Timeout { provider: "DeepL".to_string(), seconds: 10 };
    let display = format!("{}", error);
    assert!(display.contains("DeepL"));
    assert!(display.contains("10s"));
}

#[test]
fn test_providerError_format_shouldCarryBody() {
    let error = ProviderError::Format {
        provider: "Google".to_string(),
        body: "{\"oops\":true}".to_string(),
    };
    assert!(format!("{}", error).contains("{\"oops\":true}"));
}

#[test]
fn test_translationError_fromProviderError_shouldWrapCorrectly() {
    let provider_error = ProviderError::Network {
        provider: "Azure".to_string(),
        message: "HTTP 401".to_string(),
    };
    let translation_error: TranslationError = provider_error.into();
    let display = format!("{}", translation_error);
    assert!(display.contains("Provider error"));
    assert!(display.contains("HTTP 401"));
}

#[test]
fn test_appError_fromSearchError_shouldWrapCorrectly() {
    let app_error: AppError = SearchError::InvalidQuery { query: " ".to_string() }.into();
    assert!(matches!(app_error, AppError::Search(_)));
    assert!(format!("{}", app_error).contains("Search error"));
}

#[test]
fn test_appError_busy_shouldNameTaskKind() {
    let error = AppError::Busy("search");
    assert_eq!(format!("{}", error), "A search task is already in progress");
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_appError_fromAnyhow_shouldWrapAsUnknown() {
    let app_error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(app_error, AppError::Unknown(ref msg) if msg == "something odd"));
}
