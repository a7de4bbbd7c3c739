/*!
 * Mock provider implementation for testing
 *
 * The mock implements the TranslationProvider trait without any HTTP traffic.
 * It records every call, can be told to fail with one of the provider error
 * kinds, and can be gated so a translation stays in flight until the test
 * releases it.
 */

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use subseek::app_config::{ProviderKind, TranslationCredentials};
use subseek::errors::ProviderError;
use subseek::providers::TranslationProvider;

/// Prefix the mock puts in front of every translated text
pub const MOCK_PREFIX: &str = "译:";

/// Tracks calls so tests can check what reached the provider
#[derive(Debug, Default)]
pub struct ApiCallTracker {
    /// Count of mock API calls made
    pub call_count: usize,
    /// Texts received, in order
    pub requests: Vec<String>,
}

/// Type of error to simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockErrorType {
    Network,
    Timeout,
    Format,
}

/// Mock translation provider
#[derive(Debug)]
pub struct MockProvider {
    kind: ProviderKind,
    tracker: Arc<Mutex<ApiCallTracker>>,
    failure: Option<MockErrorType>,
    requires_key: bool,
    gate: Option<Arc<Semaphore>>,
}

impl MockProvider {
    /// Create a mock that translates successfully and needs no credentials
    pub fn new() -> Self {
        MockProvider {
            kind: ProviderKind::GoogleFree,
            tracker: Arc::new(Mutex::new(ApiCallTracker::default())),
            failure: None,
            requires_key: false,
            gate: None,
        }
    }

    /// Fail every call with the given error kind
    pub fn failing(mut self, error_type: MockErrorType) -> Self {
        self.failure = Some(error_type);
        self
    }

    /// Report a missing key unless `deepl_key` is set
    pub fn requiring_key(mut self) -> Self {
        self.kind = ProviderKind::DeepL;
        self.requires_key = true;
        self
    }

    /// Hold every call until a permit is added to the returned semaphore
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Get the API call tracker
    pub fn tracker(&self) -> Arc<Mutex<ApiCallTracker>> {
        self.tracker.clone()
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn missing_credentials(&self, credentials: &TranslationCredentials) -> Option<String> {
        if self.requires_key && credentials.deepl_key.is_empty() {
            Some("Mock API key".to_string())
        } else {
            None
        }
    }

    async fn translate_one(&self, text: &str, _credentials: &TranslationCredentials) -> Result<String, ProviderError> {
        {
            let mut tracker = self.tracker.lock().unwrap();
            tracker.call_count += 1;
            tracker.requests.push(text.to_string());
        }

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let provider = self.kind.display_name().to_string();
        match self.failure {
            None => Ok(format!("{}{}", MOCK_PREFIX, text)),
            Some(MockErrorType::Network) => Err(ProviderError::Network {
                provider,
                message: "HTTP 503 Service Unavailable: down".to_string(),
            }),
            Some(MockErrorType::Timeout) => Err(ProviderError::Timeout { provider, seconds: 10 }),
            Some(MockErrorType::Format) => Err(ProviderError::Format {
                provider,
                body: "{}".to_string(),
            }),
        }
    }
}
