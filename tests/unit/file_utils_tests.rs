/*!
 * Tests for file utility functions
 */

use std::fs;
use anyhow::Result;
use subseek::file_utils::FileManager;
use crate::common;

#[test]
fn test_identifierFor_withNestedPath_shouldUseFileName() {
    assert_eq!(FileManager::identifier_for("/movies/season1/ep01.srt"), "ep01.srt");
}

#[test]
fn test_findSubtitleFiles_withNestedDirectories_shouldFindSrtOnlySorted() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    fs::create_dir_all(&nested)?;

    common::create_test_subtitle(temp_dir.path(), "b.srt")?;
    common::create_test_subtitle(&nested, "a.SRT")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "not a subtitle")?;

    let found = FileManager::find_subtitle_files(temp_dir.path())?;
    let names: Vec<String> = found.iter().map(FileManager::identifier_for).collect();

    assert_eq!(found.len(), 2);
    assert!(names.contains(&"b.srt".to_string()));
    assert!(names.contains(&"a.SRT".to_string()));
    assert!(!names.contains(&"notes.txt".to_string()));
    Ok(())
}

#[test]
fn test_expandInputs_withFileAndDirectory_shouldKeepExplicitFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let subs = temp_dir.path().join("subs");
    fs::create_dir_all(&subs)?;
    common::create_test_subtitle(&subs, "one.srt")?;
    let explicit = common::create_test_file(temp_dir.path(), "two.txt", common::SAMPLE_SRT)?;

    let expanded = FileManager::expand_inputs(&[subs.clone(), explicit.clone()])?;

    assert_eq!(expanded, vec![subs.join("one.srt"), explicit]);
    Ok(())
}

#[test]
fn test_fileExists_withDirectory_shouldBeFalse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(FileManager::dir_exists(temp_dir.path()));
    Ok(())
}
