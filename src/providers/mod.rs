/*!
 * Provider implementations for the supported translation services.
 *
 * This module contains client implementations for each backend:
 * - Azure: Microsoft Translator v3, key and region headers
 * - Google: Cloud Translation v2, key as query parameter
 * - GoogleFree: public `translate_a/single` endpoint, no key
 * - DeepL: DeepL API, form encoded auth key
 *
 * Every HTTP call carries a fixed timeout and every failure is reported as one
 * of the three `ProviderError` kinds.
 */

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::app_config::{ProviderKind, TranslationCredentials};
use crate::errors::ProviderError;

pub mod azure;
pub mod deepl;
pub mod google;
pub mod google_free;

pub use azure::Azure;
pub use deepl::DeepL;
pub use google::Google;
pub use google_free::GoogleFree;

/// Fixed bound on every outbound request
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Phrase sent by connectivity probes
pub const PROBE_PHRASE: &str = "Hello, world!";

/// Result of a probe call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Whether the provider answered with a usable translation
    pub ok: bool,
    /// Human readable description of the outcome
    pub message: String,
}

impl ProbeOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self { ok: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { ok: false, message: message.into() }
    }
}

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the translation service.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Which backend this is
    fn kind(&self) -> ProviderKind;

    /// Describe the first mandatory credential that is missing, if any
    fn missing_credentials(&self, credentials: &TranslationCredentials) -> Option<String>;

    /// Translate a single text
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or one of the three failure kinds
    async fn translate_one(&self, text: &str, credentials: &TranslationCredentials) -> Result<String, ProviderError>;

    /// Send the probe phrase and report the outcome; never fails
    async fn probe(&self, credentials: &TranslationCredentials) -> ProbeOutcome {
        let name = self.kind().display_name();
        if let Some(missing) = self.missing_credentials(credentials) {
            return ProbeOutcome::failure(format!("Please fill in the {}", missing));
        }

        match self.translate_one(PROBE_PHRASE, credentials).await {
            Ok(translated) if !translated.trim().is_empty() && translated != PROBE_PHRASE => {
                ProbeOutcome::success(format!("{} API test succeeded", name))
            }
            Ok(_) => ProbeOutcome::failure(format!(
                "{} API answered but returned no usable translation",
                name
            )),
            Err(e) => ProbeOutcome::failure(format!("{} API test failed: {}", name, e)),
        }
    }
}

impl ProviderKind {
    /// Build the provider for this kind, optionally against a custom endpoint
    pub fn create(self, endpoint: Option<&str>) -> Arc<dyn TranslationProvider> {
        let endpoint = endpoint.and_then(|e| match Url::parse(e) {
            Ok(url) => Some(url.to_string()),
            Err(err) => {
                warn!("Ignoring invalid {} endpoint {:?}: {}", self.display_name(), e, err);
                None
            }
        });

        match (self, endpoint) {
            (Self::Azure, Some(endpoint)) => Arc::new(Azure::with_endpoint(endpoint)),
            (Self::Azure, None) => Arc::new(Azure::new()),
            (Self::Google, Some(endpoint)) => Arc::new(Google::with_endpoint(endpoint)),
            (Self::Google, None) => Arc::new(Google::new()),
            (Self::GoogleFree, Some(endpoint)) => Arc::new(GoogleFree::with_endpoint(endpoint)),
            (Self::GoogleFree, None) => Arc::new(GoogleFree::new()),
            (Self::DeepL, Some(endpoint)) => Arc::new(DeepL::with_endpoint(endpoint)),
            (Self::DeepL, None) => Arc::new(DeepL::new()),
        }
    }
}

/// Build the HTTP client shared by a provider's calls
///
/// `send_json` sets the timeout on every request as well, so the bound holds
/// even for the fallback client.
pub(crate) fn build_client() -> Client {
    match Client::builder().timeout(request_timeout()).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build HTTP client, using defaults: {}", e);
            Client::default()
        }
    }
}

fn request_timeout() -> Duration {
    Duration::from_secs(REQUEST_TIMEOUT_SECS)
}

/// Send a request and decode its JSON body
///
/// Timeouts map to `Timeout`, every other transport failure and any non-2xx
/// status to `Network`, and an undecodable body to `Format`.
pub(crate) async fn send_json(provider: ProviderKind, request: RequestBuilder) -> Result<Value, ProviderError> {
    let name = provider.display_name();
    let response = request
        .timeout(request_timeout())
        .send()
        .await
        .map_err(|e| map_transport_error(provider, e))?;

    let status = response.status();
    let body = response.text().await.map_err(|e| map_transport_error(provider, e))?;

    if !status.is_success() {
        warn!("{} API error ({}): {}", name, status, body);
        return Err(ProviderError::Network {
            provider: name.to_string(),
            message: format!("HTTP {}: {}", status, body),
        });
    }

    debug!("{} API responded with {} bytes", name, body.len());
    serde_json::from_str(&body).map_err(|_| format_error(provider, &body))
}

fn map_transport_error(provider: ProviderKind, error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout {
            provider: provider.display_name().to_string(),
            seconds: REQUEST_TIMEOUT_SECS,
        }
    } else {
        ProviderError::Network {
            provider: provider.display_name().to_string(),
            message: error.to_string(),
        }
    }
}

/// Format failure carrying the raw response for diagnostics
pub(crate) fn format_error(provider: ProviderKind, body: impl ToString) -> ProviderError {
    ProviderError::Format {
        provider: provider.display_name().to_string(),
        body: body.to_string(),
    }
}

/// Look up a string at a JSON pointer path
pub(crate) fn extract_str(provider: ProviderKind, value: &Value, pointer: &str) -> Result<String, ProviderError> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format_error(provider, value))
}
