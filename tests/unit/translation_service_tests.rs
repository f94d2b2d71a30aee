/*!
 * Tests for the LLM-backed translation service
 */

use plotlingo::app_config::{TranslationConfig, TranslationProvider};
use plotlingo::errors::{ProviderError, TranslationError};
use plotlingo::providers::mock::MockProvider;
use plotlingo::translation::prompts::{self, ReportSection};
use plotlingo::translation::response::{parse_translation_reply, strip_code_fence};
use plotlingo::translation::{TextCollaborator, TranslationService, TranslationTable};

use crate::common;

fn batch(keys: &[&str]) -> TranslationTable {
    keys.iter().map(|k| (k.to_string(), k.to_string())).collect()
}

#[tokio::test]
async fn test_batchTranslate_withJsonReply_shouldReturnMapping() {
    let (service, mock) = common::mock_service([r#"{"Sine Wave": "正弦波", "Plot the data": "绘制数据"}"#]);

    let mapping = service.batch_translate(&batch(&["Sine Wave", "Plot the data"])).await.unwrap();

    assert_eq!(mapping.get("Sine Wave").map(String::as_str), Some("正弦波"));
    assert_eq!(mapping.len(), 2);

    let request = mock.last_request().unwrap();
    assert!(request.json_mode);
    assert!(request.prompt.contains("Simplified Chinese"));
    assert!(request.prompt.contains("\"Sine Wave\": \"Sine Wave\""));
}

#[tokio::test]
async fn test_batchTranslate_withFencedReply_shouldStillParse() {
    let (service, _) = common::mock_service(["Sure!\n```json\n{\"Time\": \"时间\"}\n```"]);
    let mapping = service.batch_translate(&batch(&["Time"])).await.unwrap();
    assert_eq!(mapping.get("Time").map(String::as_str), Some("时间"));
}

#[tokio::test]
async fn test_batchTranslate_withProseReply_shouldBeUnavailable() {
    let (service, _) = common::mock_service(["I cannot help with that."]);
    let result = service.batch_translate(&batch(&["Time"])).await;
    assert!(matches!(result, Err(TranslationError::Unavailable(_))));
}

#[tokio::test]
async fn test_batchTranslate_withFailingProvider_shouldSurfaceProviderError() {
    let service = TranslationService::with_mock(TranslationConfig::default(), "Simplified Chinese", MockProvider::failing());
    let result = service.batch_translate(&batch(&["Time"])).await;
    assert!(matches!(result, Err(TranslationError::Provider(_))));
}

#[tokio::test]
async fn test_rewriteWhole_withEmptyReply_shouldBeUnavailable() {
    let service = TranslationService::with_mock(TranslationConfig::default(), "Simplified Chinese", MockProvider::empty());
    let result = service.rewrite_whole("import matplotlib.pyplot as plt\n").await;
    assert!(matches!(result, Err(TranslationError::Unavailable(_))));
}

#[tokio::test]
async fn test_rewriteWhole_shouldSendBeautifyPromptWithCode() {
    let (service, mock) = common::mock_service(["plt.show()"]);
    let reply = service.rewrite_whole("plt.show()\n").await.unwrap();

    assert_eq!(reply, "plt.show()");
    let request = mock.last_request().unwrap();
    assert!(!request.json_mode);
    assert!(request.prompt.contains("compact grid"));
    assert!(request.prompt.contains("plt.show()"));
}

#[tokio::test]
async fn test_generate_withExhaustedScript_shouldFail() {
    let (service, mock) = common::mock_service(["first"]);

    assert_eq!(service.generate("one").await.unwrap(), "first");
    let second = service.generate("two").await;
    assert!(matches!(
        second,
        Err(TranslationError::Provider(ProviderError::ApiError { status_code: 500, .. }))
    ));
    assert_eq!(mock.request_count(), 2);
}

#[test]
fn test_new_withInvalidEndpoint_shouldFail() {
    let mut config = TranslationConfig::default();
    config.provider = TranslationProvider::Ollama;
    config.active_provider_config_mut().endpoint = "not a url".to_string();

    assert!(TranslationService::new(config, "Simplified Chinese").is_err());
}

#[test]
fn test_new_withEveryProvider_shouldBuildClient() {
    for provider in [
        TranslationProvider::DeepSeek,
        TranslationProvider::OpenAI,
        TranslationProvider::Anthropic,
        TranslationProvider::Ollama,
    ] {
        let mut config = TranslationConfig::default();
        config.provider = provider.clone();
        let service = TranslationService::new(config, "Simplified Chinese");
        assert!(service.is_ok(), "{} should build", provider);
        assert_eq!(service.unwrap().target_language(), "Simplified Chinese");
    }
}

#[test]
fn test_parseTranslationReply_withArray_shouldBeUnavailable() {
    assert!(parse_translation_reply("[\"a\", \"b\"]").is_err());
}

#[test]
fn test_stripCodeFence_shouldReturnFenceBody() {
    assert_eq!(strip_code_fence("```python\nx = 1\ny = 2\n```"), "x = 1\ny = 2");
    assert_eq!(strip_code_fence("  x = 1  \n"), "  x = 1");
    assert_eq!(strip_code_fence("  ```py\nx = 1\n```\n"), "x = 1");
    assert_eq!(strip_code_fence("Here:\n```\nprint(1)\n```\nThanks"), "print(1)");
}

#[test]
fn test_analysisPrompt_shouldIncludeRequestedSectionsOnly() {
    let prompt = prompts::analysis_prompt("Simplified Chinese", &[ReportSection::Math], "y = a * x");

    assert!(prompt.contains(ReportSection::Math.instruction()));
    assert!(!prompt.contains(ReportSection::Summary.instruction()));
    assert!(prompt.contains("y = a * x"));
    assert!(prompt.contains("Simplified Chinese"));
}

#[test]
fn test_reportSection_fromStr_shouldAcceptKnownNames() {
    assert_eq!("math".parse::<ReportSection>().unwrap(), ReportSection::Math);
    assert_eq!("Summary".parse::<ReportSection>().unwrap(), ReportSection::Summary);
    assert!("appendix".parse::<ReportSection>().is_err());
}

#[tokio::test]
async fn test_usage_shouldCountRequests() {
    let (service, _) = common::mock_service(["a", "b"]);
    service.generate("x").await.unwrap();
    service.generate("y").await.unwrap();

    let usage = service.usage();
    assert_eq!(usage.requests, 2);
    assert!(usage.summary().contains("DeepSeek"));
}
