use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::app_config::{ProviderKind, TranslationCredentials};
use crate::errors::ProviderError;
use super::{build_client, extract_str, send_json, TranslationProvider};

const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com/translate";
const API_VERSION: &str = "3.0";
const SOURCE_LANGUAGE: &str = "en";
const TARGET_LANGUAGE: &str = "zh-Hans";

/// Microsoft Translator client
#[derive(Debug)]
pub struct Azure {
    /// HTTP client for API requests
    client: Client,
    /// Translate endpoint URL
    endpoint: String,
}

/// One element of the request body array
#[derive(Debug, Serialize)]
pub struct AzureTextItem<'a> {
    /// Text to translate
    pub text: &'a str,
}

impl Azure {
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

impl Default for Azure {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for Azure {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Azure
    }

    fn missing_credentials(&self, credentials: &TranslationCredentials) -> Option<String> {
        if credentials.azure_key.trim().is_empty() || credentials.azure_region.trim().is_empty() {
            Some("Azure key/region".to_string())
        } else {
            None
        }
    }

    async fn translate_one(&self, text: &str, credentials: &TranslationCredentials) -> Result<String, ProviderError> {
        let body = [AzureTextItem { text }];
        let request = self.client.post(&self.endpoint)
            .query(&[("api-version", API_VERSION), ("from", SOURCE_LANGUAGE), ("to", TARGET_LANGUAGE)])
            .header("Ocp-Apim-Subscription-Key", &credentials.azure_key)
            .header("Ocp-Apim-Subscription-Region", &credentials.azure_region)
            .json(&body);

        let response = send_json(self.kind(), request).await?;
        extract_str(self.kind(), &response, "/0/translations/0/text")
    }
}
