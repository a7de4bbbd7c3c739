use std::fmt;
use encoding_rs::{Encoding, GBK, UTF_16BE, UTF_16LE, UTF_8};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;

// @module: Subtitle decoding and parsing

// @const: Timing line, start timestamp captured as hours/minutes/seconds/millis.
// The block index may share the line.
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+\s+)?(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->").unwrap()
});

// @const: Markup tags such as <i>, </b> or <font color="...">
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]*>").unwrap()
});

/// Encodings tried in order when a file carries no byte order mark.
///
/// GBK also covers GB2312 content.
pub fn supported_encodings() -> [&'static Encoding; 4] {
    [UTF_8, GBK, UTF_16LE, UTF_16BE]
}

// @struct: Single timestamped caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Start time, HH:MM:SS,mmm
    timestamp: String,

    // @field: Cleaned, single-line caption text
    text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(timestamp: impl Into<String>, text: impl Into<String>) -> Self {
        SubtitleEntry {
            timestamp: timestamp.into(),
            text: text.into(),
        }
    }

    /// Start timestamp in `HH:MM:SS,mmm` form
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Caption text with tags stripped and whitespace collapsed
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.text)
    }
}

/// A parsed subtitle file as held by the corpus
#[derive(Debug, Clone)]
pub struct SubtitleFile {
    identifier: String,
    encoding: &'static str,
    entries: Vec<SubtitleEntry>,
}

impl SubtitleFile {
    /// Create a subtitle file, rejecting an empty entry list
    pub fn new(identifier: impl Into<String>, encoding: &'static str, entries: Vec<SubtitleEntry>) -> Result<Self, SubtitleError> {
        let identifier = identifier.into();
        if entries.is_empty() {
            return Err(SubtitleError::Parse { identifier });
        }
        Ok(SubtitleFile {
            identifier,
            encoding,
            entries,
        })
    }

    /// Unique key of the file inside the corpus
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Name of the encoding the file was decoded with
    pub fn encoding(&self) -> &'static str {
        self.encoding
    }

    /// Entries in original file order
    pub fn entries(&self) -> &[SubtitleEntry] {
        &self.entries
    }
}

impl fmt::Display for SubtitleFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle File")?;
        writeln!(f, "Identifier: {}", self.identifier)?;
        writeln!(f, "Encoding: {}", self.encoding)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}

/// Result of decoding and parsing raw file bytes
#[derive(Debug, Clone)]
pub struct ParsedSubtitle {
    /// Encoding that decoded the whole byte stream
    pub encoding: &'static str,
    /// Entries in file order
    pub entries: Vec<SubtitleEntry>,
}

// Block under construction while scanning lines
struct PendingBlock {
    timestamp: String,
    lines: Vec<String>,
}

// @struct: Timed-text parser
pub struct SubtitleParser;

impl SubtitleParser {
    /// Decode raw bytes and parse them into entries
    pub fn parse_bytes(identifier: &str, bytes: &[u8]) -> Result<ParsedSubtitle, SubtitleError> {
        let (content, encoding) = Self::decode(identifier, bytes)?;
        let entries = Self::parse_content(identifier, &content)?;
        debug!("Parsed {} entries from {} ({})", entries.len(), identifier, encoding);
        Ok(ParsedSubtitle { encoding, entries })
    }

    /// Decode bytes with the first encoding that accepts the entire stream
    ///
    /// A byte order mark, when present, is honoured before the fixed list is tried.
    /// Decoded text containing NUL characters is treated as a failed decode.
    pub fn decode(identifier: &str, bytes: &[u8]) -> Result<(String, &'static str), SubtitleError> {
        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            if let Some(text) = Self::try_decode(encoding, &bytes[bom_len..]) {
                return Ok((text, encoding.name()));
            }
            warn!("{} starts with a {} byte order mark but does not decode as such", identifier, encoding.name());
        }

        for encoding in supported_encodings() {
            if let Some(text) = Self::try_decode(encoding, bytes) {
                return Ok((text, encoding.name()));
            }
        }

        let tried: Vec<&str> = supported_encodings().iter().map(|e| e.name()).collect();
        Err(SubtitleError::Encoding {
            identifier: identifier.to_string(),
            tried: tried.join(", "),
        })
    }

    fn try_decode(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
        let text = encoding.decode_without_bom_handling_and_without_replacement(bytes)?;
        if text.contains('\0') {
            return None;
        }
        Some(text.into_owned())
    }

    /// Parse decoded timed-text content into entries
    ///
    /// Blocks are `[index] start --> end`, caption lines, then a blank line or
    /// end of input. The index line is optional and a trailing block without a
    /// terminating blank line is still accepted.
    pub fn parse_content(identifier: &str, content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let normalized = content
            .trim_start_matches('\u{feff}')
            .replace("\r\n", "\n")
            .replace('\r', "\n");

        let mut entries = Vec::new();
        let mut current: Option<PendingBlock> = None;

        for (line_no, line) in normalized.lines().enumerate() {
            let trimmed = line.trim();

            if let Some(timestamp) = Self::parse_timing_line(trimmed) {
                if let Some(mut block) = current.take() {
                    // Index of this block, written without a separating blank line
                    if block.lines.last().is_some_and(|l| Self::is_index_line(l)) {
                        block.lines.pop();
                    }
                    Self::finish_block(block, &mut entries);
                }
                current = Some(PendingBlock { timestamp, lines: Vec::new() });
                continue;
            }

            if trimmed.is_empty() {
                // A blank line right after the timing line does not end the block
                if current.as_ref().is_some_and(|b| !b.lines.is_empty()) {
                    if let Some(block) = current.take() {
                        Self::finish_block(block, &mut entries);
                    }
                }
                continue;
            }

            match current.as_mut() {
                Some(block) => block.lines.push(trimmed.to_string()),
                None => {
                    if !Self::is_index_line(trimmed) {
                        debug!("{}: ignoring line {} outside of a subtitle block", identifier, line_no + 1);
                    }
                }
            }
        }

        if let Some(block) = current.take() {
            Self::finish_block(block, &mut entries);
        }

        if entries.is_empty() {
            warn!("No valid subtitle entries found in {}", identifier);
            return Err(SubtitleError::Parse {
                identifier: identifier.to_string(),
            });
        }

        Ok(entries)
    }

    /// Canonical start timestamp of a timing line, if the line is one
    fn parse_timing_line(line: &str) -> Option<String> {
        let caps = TIMING_LINE_REGEX.captures(line)?;
        let hours: u32 = caps.get(1)?.as_str().parse().ok()?;
        Some(format!(
            "{:02}:{}:{},{}",
            hours,
            caps.get(2)?.as_str(),
            caps.get(3)?.as_str(),
            caps.get(4)?.as_str()
        ))
    }

    fn is_index_line(line: &str) -> bool {
        !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
    }

    fn finish_block(block: PendingBlock, entries: &mut Vec<SubtitleEntry>) {
        let text = Self::clean_text(&block.lines);
        if text.is_empty() {
            debug!("Skipping empty subtitle block at {}", block.timestamp);
            return;
        }
        entries.push(SubtitleEntry {
            timestamp: block.timestamp,
            text,
        });
    }

    /// Join caption lines, strip markup tags and collapse whitespace
    pub fn clean_text(lines: &[String]) -> String {
        let joined = lines.join(" ");
        let stripped = TAG_REGEX.replace_all(&joined, "");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
