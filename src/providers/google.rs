use async_trait::async_trait;
use reqwest::Client;

use crate::app_config::{ProviderKind, TranslationCredentials};
use crate::errors::ProviderError;
use super::{build_client, extract_str, send_json, TranslationProvider};

const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";
const SOURCE_LANGUAGE: &str = "en";
const TARGET_LANGUAGE: &str = "zh-CN";

/// Google Cloud Translation v2 client (paid API key)
#[derive(Debug)]
pub struct Google {
    /// HTTP client for API requests
    client: Client,
    /// Translate endpoint URL
    endpoint: String,
}

impl Google {
    /// Create a client against the public endpoint
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom translate endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: build_client(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for Google {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn missing_credentials(&self, credentials: &TranslationCredentials) -> Option<String> {
        if credentials.google_key.trim().is_empty() {
            Some("Google API key".to_string())
        } else {
            None
        }
    }

    async fn translate_one(&self, text: &str, credentials: &TranslationCredentials) -> Result<String, ProviderError> {
        let request = self.client.post(&self.endpoint)
            .query(&[
                ("source", SOURCE_LANGUAGE),
                ("target", TARGET_LANGUAGE),
                ("key", credentials.google_key.as_str()),
                ("q", text),
            ]);

        let response = send_json(self.kind(), request).await?;
        extract_str(self.kind(), &response, "/data/translations/0/translatedText")
    }
}
