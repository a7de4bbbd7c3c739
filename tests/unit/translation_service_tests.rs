/*!
 * Tests for translation routing and sentinel strings
 */

use std::sync::Arc;
use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

use subseek::app_config::{Config, ProviderKind, TranslationCredentials};
use subseek::errors::TranslationError;
use subseek::translation_service::{TranslationService, NOTHING_TO_TRANSLATE_SENTINEL, NO_PROVIDER_SENTINEL};
use crate::common::mock_providers::{MockErrorType, MockProvider, MOCK_PREFIX};

fn service_with(provider: MockProvider) -> TranslationService {
    TranslationService::with_provider(Arc::new(provider), TranslationCredentials::default())
}

#[tokio::test]
async fn test_translate_withNoProvider_shouldReturnSentinel() {
    let service = TranslationService::new();
    assert_eq!(service.translate("Hello").await, NO_PROVIDER_SENTINEL);
    // Checked before the empty-text rule
    assert_eq!(service.translate("   ").await, NO_PROVIDER_SENTINEL);
}

#[tokio::test]
async fn test_translate_withBlankText_shouldNotCallProvider() {
    let provider = MockProvider::new();
    let tracker = provider.tracker();
    let service = service_with(provider);

    assert_eq!(service.translate(" \t ").await, NOTHING_TO_TRANSLATE_SENTINEL);
    assert_eq!(tracker.lock().unwrap().call_count, 0);
}

#[tokio::test]
async fn test_translate_withMissingCredentials_shouldNameMissingKey() {
    let provider = MockProvider::new().requiring_key();
    let tracker = provider.tracker();
    let service = service_with(provider);

    assert_eq!(service.translate("Hello").await, "[Mock API key not configured]");
    assert_eq!(tracker.lock().unwrap().call_count, 0);
}

#[tokio::test]
async fn test_translate_withWorkingProvider_shouldReturnTranslation() {
    let service = service_with(MockProvider::new());
    assert_eq!(service.translate("Hello").await, format!("{}Hello", MOCK_PREFIX));
}

#[tokio::test]
async fn test_translate_withNetworkFailure_shouldReturnNetworkSentinel() {
    let service = service_with(MockProvider::new().failing(MockErrorType::Network));
    let result = service.translate("Hello").await;
    assert!(result.starts_with("[translation network error:"), "{}", result);
    assert!(result.ends_with(']'));
}

#[tokio::test]
async fn test_translate_withTimeout_shouldReturnNetworkSentinel() {
    let service = service_with(MockProvider::new().failing(MockErrorType::Timeout));
    let result = service.translate("Hello").await;
    assert!(result.starts_with("[translation network error:"), "{}", result);
    assert!(result.contains("timed out"));
}

#[tokio::test]
async fn test_translate_withFormatFailure_shouldReturnServiceErrorSentinel() {
    let service = service_with(MockProvider::new().failing(MockErrorType::Format));
    let result = service.translate("Hello").await;
    assert!(result.starts_with("[translation service returned an error:"), "{}", result);
}

#[tokio::test]
async fn test_tryTranslate_withNoProvider_shouldReturnConfigurationError() {
    let result = TranslationService::new().try_translate("Hello").await;
    assert!(matches!(result, Err(TranslationError::Configuration(_))));
}

#[tokio::test]
async fn test_translateMany_withMixedInput_shouldPreserveOrderAndLength() {
    let provider = MockProvider::new();
    let tracker = provider.tracker();
    let service = service_with(provider);

    let translated = service.translate_many(&["one", "", "three"]).await;

    assert_eq!(
        translated,
        vec![
            format!("{}one", MOCK_PREFIX),
            NOTHING_TO_TRANSLATE_SENTINEL.to_string(),
            format!("{}three", MOCK_PREFIX),
        ]
    );
    assert_eq!(tracker.lock().unwrap().requests, vec!["one", "three"]);
}

#[tokio::test]
async fn test_translateManyWithProgress_shouldReportEachStep() {
    let service = service_with(MockProvider::new());
    let mut steps = Vec::new();

    service
        .translate_many_with_progress(&["a", "b"], |done, total| steps.push((done, total)))
        .await;

    assert_eq!(steps, vec![(1, 2), (2, 2)]);
}

#[tokio::test]
async fn test_fromConfig_withEndpointOverride_shouldUseIt() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
        when.method(POST).path("/v2/translate");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"translations": [{"text": "再见"}]}));
    }).await;

    let mut config = Config::default();
    config.active_provider = Some(ProviderKind::DeepL);
    config.credentials.deepl_key = "key".to_string();
    config.endpoints.insert(ProviderKind::DeepL, server.url("/v2/translate"));

    let service = TranslationService::from_config(&config);
    assert_eq!(service.active_provider(), Some(ProviderKind::DeepL));
    assert_eq!(service.translate("Goodbye").await, "再见");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_setActiveProvider_withNone_shouldFallBackToSentinel() {
    let mut service = service_with(MockProvider::new());
    service.set_active_provider(None, None);
    assert_eq!(service.active_provider(), None);
    assert_eq!(service.translate("Hello").await, NO_PROVIDER_SENTINEL);
}

#[tokio::test]
async fn test_probeProvider_withExplicitMissingCredentials_shouldFail() {
    let outcome = TranslationService::probe_provider(
        ProviderKind::Google,
        &TranslationCredentials::default(),
        Some("http://127.0.0.1:1/"),
    ).await;
    assert!(!outcome.ok);
    assert!(outcome.message.contains("Google API key"));
}

#[tokio::test]
async fn test_probeActive_withNoProvider_shouldFail() {
    let outcome = TranslationService::new().probe_active().await;
    assert!(!outcome.ok);
}
