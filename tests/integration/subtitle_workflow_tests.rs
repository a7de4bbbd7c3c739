/*!
 * Integration tests for the load, search and translate workflow
 */

use std::fs;
use anyhow::Result;
use httpmock::Method::GET;
use httpmock::MockServer;
use serde_json::json;

use subseek::app_config::{Config, ProviderKind};
use subseek::app_controller::Controller;
use subseek::errors::SubtitleError;
use crate::common;

/// Mixed-encoding library with one broken file and one non-subtitle file
fn create_library(dir: &std::path::Path) -> Result<()> {
    let season = dir.join("season1");
    fs::create_dir_all(&season)?;

    common::create_test_subtitle(dir, "english.srt")?;

    let chinese = common::srt_from(&[("00:00:02,000", "你好，朋友"), ("00:00:04,000", "hello 再见")]);
    let (gbk, _, _) = encoding_rs::GBK.encode(&chinese);
    common::create_test_bytes(&season, "chinese.srt", &gbk)?;

    let windows = common::srt_from(&[("0:00:07.500", "Hello from Windows")]).replace('\n', "\r\n");
    common::create_test_bytes(&season, "windows.srt", &common::utf16le_bytes(&windows, true))?;

    common::create_test_file(dir, "broken.srt", "this is not a subtitle file\n")?;
    common::create_test_file(dir, "readme.txt", "ignored")?;
    Ok(())
}

#[tokio::test]
async fn test_workflow_withMixedLibrary_shouldLoadSearchAndTranslate() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    create_library(temp_dir.path())?;

    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(GET).path("/translate_a/single").query_param("client", "gtx");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([[["你好", "Hello", null]]]));
    }).await;

    let mut config = Config::default();
    config.active_provider = Some(ProviderKind::GoogleFree);
    config.endpoints.insert(ProviderKind::GoogleFree, server.url("/translate_a/single"));
    let mut controller = Controller::with_config(config);

    // 1. Load the directory
    let summary = controller.load_files(&[temp_dir.path()])?;
    assert_eq!(summary.loaded.len(), 3);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].identifier, "broken.srt");
    assert!(matches!(summary.failures[0].error, SubtitleError::Parse { .. }));

    let encodings: Vec<(&str, &str)> = summary
        .loaded
        .iter()
        .map(|l| (l.identifier.as_str(), l.encoding))
        .collect();
    assert!(encodings.contains(&("chinese.srt", "GBK")));
    assert!(encodings.contains(&("english.srt", "UTF-8")));
    assert!(encodings.contains(&("windows.srt", "UTF-16LE")));

    // 2. List in identifier order
    assert_eq!(
        controller.list_files(),
        vec![
            ("chinese.srt".to_string(), 2),
            ("english.srt".to_string(), 3),
            ("windows.srt".to_string(), 1),
        ]
    );

    // 3. Search across every file
    let results = controller.search("HELLO").await?;
    let hits: Vec<(&str, &str)> = results
        .matches
        .iter()
        .map(|m| (m.file_identifier.as_str(), m.timestamp.as_str()))
        .collect();
    assert_eq!(
        hits,
        vec![
            ("chinese.srt", "00:00:04,000"),
            ("english.srt", "00:00:01,000"),
            ("english.srt", "00:00:10,000"),
            ("windows.srt", "00:00:07,500"),
        ]
    );

    // 4. Translate every match
    let translated = controller.translate_all().await?;
    assert_eq!(translated.len(), 4);
    assert!(translated.iter().all(|t| t.translation == "你好"));
    assert_eq!(translated[3].record.original_text, "Hello from Windows");
    Ok(())
}

#[tokio::test]
async fn test_workflow_withMissingFileAndDuplicate_shouldReportBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let missing = temp_dir.path().join("gone.srt");

    let mut controller = Controller::with_config(Config::default());
    let summary = controller.load_files(&[file.clone(), missing, file])?;

    assert_eq!(summary.loaded.len(), 1);
    assert_eq!(summary.failures.len(), 2);
    assert!(matches!(summary.failures[0].error, SubtitleError::Io { .. }));
    assert!(summary.failures[1].error.is_duplicate());
    Ok(())
}

#[tokio::test]
async fn test_workflow_withoutProvider_shouldFillSentinels() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let mut controller = Controller::with_config(Config::default());
    controller.load_files(&[temp_dir.path()])?;
    controller.search("you").await?;

    let translated = controller.translate_all().await?;
    assert_eq!(translated.len(), 1);
    assert_eq!(translated[0].translation, "[no provider configured]");
    Ok(())
}
