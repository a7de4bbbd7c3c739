use async_trait::async_trait;
use reqwest::Client;

use crate::app_config::{ProviderKind, TranslationCredentials};
use crate::errors::ProviderError;
use super::{build_client, extract_str, send_json, TranslationProvider};

const DEFAULT_ENDPOINT: &str = "https://api-free.deepl.com/v2/translate";
const SOURCE_LANGUAGE: &str = "EN";
const TARGET_LANGUAGE: &str = "ZH";

/// DeepL API client
///
/// The default endpoint is the free tier host; Pro keys need an endpoint
/// override pointing at `api.deepl.com`.
#[derive(Debug)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// Translate endpoint URL
    endpoint: String,
}

impl DeepL {
    /// Create a client against the free tier endpoint
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

impl Default for DeepL {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for DeepL {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DeepL
    }

    fn missing_credentials(&self, credentials: &TranslationCredentials) -> Option<String> {
        if credentials.deepl_key.trim().is_empty() {
            Some("DeepL API key".to_string())
        } else {
            None
        }
    }

    async fn translate_one(&self, text: &str, credentials: &TranslationCredentials) -> Result<String, ProviderError> {
        let request = self.client.post(&self.endpoint)
            .form(&[
                ("source_lang", SOURCE_LANGUAGE),
                ("target_lang", TARGET_LANGUAGE),
                ("auth_key", credentials.deepl_key.as_str()),
                ("text", text),
            ]);

        let response = send_json(self.kind(), request).await?;
        extract_str(self.kind(), &response, "/translations/0/text")
    }
}
