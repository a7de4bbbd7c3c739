use log::{debug, warn};
use std::sync::Arc;

use crate::app_config::{Config, ProviderKind, TranslationCredentials};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{ProbeOutcome, TranslationProvider};

// @module: Translation orchestration over the active provider

/// Returned when no provider is selected
pub const NO_PROVIDER_SENTINEL: &str = "[no provider configured]";

/// Returned for empty or whitespace-only input
pub const NOTHING_TO_TRANSLATE_SENTINEL: &str = "[nothing to translate]";

/// Routes translation requests to the active provider
///
/// Cloning is cheap and yields an independent copy of the credentials, which
/// is what worker tasks receive at submission time.
#[derive(Debug, Clone, Default)]
pub struct TranslationService {
    // @field: Active provider, if one is selected
    active: Option<Arc<dyn TranslationProvider>>,

    // @field: Credentials for every provider
    credentials: TranslationCredentials,
}

impl TranslationService {
    /// Create a service with no provider and empty credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service from the persisted configuration
    pub fn from_config(config: &Config) -> Self {
        let active = config
            .active_provider
            .map(|kind| kind.create(config.endpoint_for(kind)));
        Self {
            active,
            credentials: config.credentials.clone(),
        }
    }

    /// Create a service around an already built provider
    pub fn with_provider(provider: Arc<dyn TranslationProvider>, credentials: TranslationCredentials) -> Self {
        Self {
            active: Some(provider),
            credentials,
        }
    }

    /// Select the active provider, or none
    pub fn set_active_provider(&mut self, kind: Option<ProviderKind>, endpoint: Option<&str>) {
        self.active = kind.map(|kind| kind.create(endpoint));
    }

    /// Replace the credential set
    pub fn set_credentials(&mut self, credentials: TranslationCredentials) {
        self.credentials = credentials;
    }

    pub fn active_provider(&self) -> Option<ProviderKind> {
        self.active.as_ref().map(|p| p.kind())
    }

    pub fn credentials(&self) -> &TranslationCredentials {
        &self.credentials
    }

    /// Translate text, reporting failures as typed errors
    ///
    /// Empty input is not an error here; callers that want the sentinel use
    /// `translate`.
    pub async fn try_translate(&self, text: &str) -> Result<String, TranslationError> {
        let provider = self.active.as_ref().ok_or_else(|| {
            TranslationError::Configuration("no translation provider selected".to_string())
        })?;

        if let Some(missing) = provider.missing_credentials(&self.credentials) {
            return Err(TranslationError::Configuration(format!("{} not configured", missing)));
        }

        let translated = provider.translate_one(text, &self.credentials).await?;
        Ok(translated)
    }

    /// Translate text; every failure becomes an inline diagnostic string
    pub async fn translate(&self, text: &str) -> String {
        if self.active.is_none() {
            return NO_PROVIDER_SENTINEL.to_string();
        }
        if text.trim().is_empty() {
            return NOTHING_TO_TRANSLATE_SENTINEL.to_string();
        }

        match self.try_translate(text).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!("Translation failed: {}", e);
                Self::sentinel_for(&e)
            }
        }
    }

    /// Translate each text in order, one request at a time
    ///
    /// The output has the same length and order as the input.
    pub async fn translate_many<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        self.translate_many_with_progress(texts, |_, _| {}).await
    }

    /// Like `translate_many`, calling `progress(completed, total)` after each text
    pub async fn translate_many_with_progress<S, F>(&self, texts: &[S], mut progress: F) -> Vec<String>
    where
        S: AsRef<str>,
        F: FnMut(usize, usize),
    {
        let total = texts.len();
        let mut translated = Vec::with_capacity(total);
        for (i, text) in texts.iter().enumerate() {
            translated.push(self.translate(text.as_ref()).await);
            progress(i + 1, total);
        }
        debug!("Translated {} texts", total);
        translated
    }

    /// Probe a provider with explicit credentials, e.g. values not yet saved
    pub async fn probe_provider(kind: ProviderKind, credentials: &TranslationCredentials, endpoint: Option<&str>) -> ProbeOutcome {
        let provider = kind.create(endpoint);
        provider.probe(credentials).await
    }

    /// Probe the active provider with the stored credentials
    pub async fn probe_active(&self) -> ProbeOutcome {
        match &self.active {
            Some(provider) => provider.probe(&self.credentials).await,
            None => ProbeOutcome::failure("No translation provider selected"),
        }
    }

    /// Display string for a translation failure
    pub fn sentinel_for(error: &TranslationError) -> String {
        match error {
            TranslationError::Configuration(message) => format!("[{}]", message),
            TranslationError::Provider(e @ ProviderError::Format { .. }) => {
                format!("[translation service returned an error: {}]", e)
            }
            TranslationError::Provider(e) => format!("[translation network error: {}]", e),
        }
    }
}
