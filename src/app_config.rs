use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the persisted translator settings: the active provider,
/// per-provider credentials, optional endpoint overrides and the log level.
/// Loading never fails; a missing or malformed file yields the defaults.

const CONFIG_DIR_NAME: &str = "subseek";
const CONFIG_FILE_NAME: &str = "translator_config.json";

/// Translation backend
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    // @provider: Microsoft Translator (key + region headers)
    #[serde(alias = "Azure")]
    Azure,
    // @provider: Google Cloud Translation v2 (query key)
    #[serde(alias = "Google")]
    Google,
    // @provider: Public Google endpoint, no credentials
    #[serde(alias = "Google_Free")]
    GoogleFree,
    // @provider: DeepL API (form auth key)
    #[serde(rename = "deepl", alias = "DeepL", alias = "deep_l")]
    DeepL,
}

impl ProviderKind {
    /// All provider variants in display order
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Azure,
        ProviderKind::Google,
        ProviderKind::GoogleFree,
        ProviderKind::DeepL,
    ];

    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Azure => "Azure",
            Self::Google => "Google",
            Self::GoogleFree => "Google (free)",
            Self::DeepL => "DeepL",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Azure => "azure".to_string(),
            Self::Google => "google".to_string(),
            Self::GoogleFree => "google_free".to_string(),
            Self::DeepL => "deepl".to_string(),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "azure" => Ok(Self::Azure),
            "google" => Ok(Self::Google),
            "google_free" | "googlefree" => Ok(Self::GoogleFree),
            "deepl" => Ok(Self::DeepL),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Credentials for every provider, kept together so a switch of the active
/// provider never loses what was typed for the others
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TranslationCredentials {
    /// Azure subscription key
    #[serde(default)]
    pub azure_key: String,

    /// Azure resource region
    #[serde(default)]
    pub azure_region: String,

    /// Google Cloud Translation API key
    #[serde(default)]
    pub google_key: String,

    /// Unused, the free endpoint takes no key
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub google_free_key: String,

    /// DeepL authentication key
    #[serde(default)]
    pub deepl_key: String,
}

/// Length up to which a secret is hidden entirely
const FULLY_MASKED_MAX_LEN: usize = 8;

/// Secret shown as its last four characters, or fully hidden when short
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= FULLY_MASKED_MAX_LEN {
        return "*".repeat(chars.len().max(4));
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Represents the persisted translator configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Active translation provider, if any
    #[serde(default, rename = "current_service")]
    pub active_provider: Option<ProviderKind>,

    /// Provider credentials
    #[serde(flatten)]
    pub credentials: TranslationCredentials,

    /// Base URL overrides per provider (e.g. the DeepL Pro host)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub endpoints: BTreeMap<ProviderKind, String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Load the configuration, falling back to defaults on any problem
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No configuration at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load translator configuration: {:#}", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Save the configuration as pretty printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Endpoint override for a provider, if one is configured
    pub fn endpoint_for(&self, kind: ProviderKind) -> Option<&str> {
        self.endpoints.get(&kind).map(String::as_str).filter(|e| !e.trim().is_empty())
    }
}
