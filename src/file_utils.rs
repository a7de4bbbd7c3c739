use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Extensions picked up when scanning a directory
pub const SUBTITLE_EXTENSIONS: [&str; 1] = ["srt"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    /// Corpus identifier for a path: its file name
    pub fn identifier_for<P: AsRef<Path>>(path: P) -> String {
        let path = path.as_ref();
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    }

    /// Read a file to raw bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<u8>> {
        fs::read(path)
    }

    /// Find subtitle files below a directory, sorted by path
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_subtitle_file(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Expand a mix of files and directories into the files to load
    ///
    /// Files are kept as given whatever their extension; directories contribute
    /// their subtitle files.
    pub fn expand_inputs<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        for input in inputs {
            let input = input.as_ref();
            if Self::dir_exists(input) {
                result.extend(Self::find_subtitle_files(input)?);
            } else {
                result.push(input.to_path_buf());
            }
        }
        Ok(result)
    }

    fn is_subtitle_file(path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                SUBTITLE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false)
    }
}
