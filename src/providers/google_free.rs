use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::app_config::{ProviderKind, TranslationCredentials};
use crate::errors::ProviderError;
use super::{build_client, format_error, send_json, TranslationProvider};

const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Client for the public Google endpoint used by browser widgets
///
/// No credentials are needed, but the endpoint is unofficial and may change
/// or throttle without notice.
#[derive(Debug)]
pub struct GoogleFree {
    /// HTTP client for API requests
    client: Client,
    /// Translate endpoint URL
    endpoint: String,
}

impl GoogleFree {
    /// Create a client against the public endpoint
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: build_client(),
            endpoint: endpoint.into(),
        }
    }

    /// Join the first element of every segment in `response[0]`
    ///
    /// The response looks like `[[["你好", "Hello", ...], ["世界", "world", ...]], ...]`.
    pub fn extract_text(response: &Value) -> Result<String, ProviderError> {
        let segments = response
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| format_error(ProviderKind::GoogleFree, response))?;

        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if translated.is_empty() {
            return Err(format_error(ProviderKind::GoogleFree, response));
        }
        Ok(translated)
    }
}

impl Default for GoogleFree {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for GoogleFree {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoogleFree
    }

    fn missing_credentials(&self, _credentials: &TranslationCredentials) -> Option<String> {
        None
    }

    async fn translate_one(&self, text: &str, _credentials: &TranslationCredentials) -> Result<String, ProviderError> {
        let request = self.client.get(&self.endpoint)
            .query(&[("client", "gtx"), ("sl", "en"), ("tl", "zh-CN"), ("dt", "t"), ("q", text)]);

        let response = send_json(self.kind(), request).await?;
        Self::extract_text(&response)
    }
}
