/*!
 * Tests for the OpenAI-compatible chat client
 */

use plotlingo::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse};
use plotlingo::providers::Provider;

#[test]
fn test_openaiRequest_chained_shouldSerializeAllFields() {
    let request = OpenAIRequest::new("gpt-4o-mini")
        .add_message("system", "Translate")
        .add_message("user", "Hello")
        .temperature(0.3)
        .max_tokens(500);
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["model"], "gpt-4o-mini");
    assert_eq!(json["messages"][1]["role"], "user");
    assert_eq!(json["messages"][1]["content"], "Hello");
    assert_eq!(json["max_tokens"], 500);
    assert!(json.get("response_format").is_none());
}

#[test]
fn test_extractText_withChoices_shouldReturnFirstMessage() {
    let response: OpenAIResponse = serde_json::from_str(r#"{
        "choices": [
            {"message": {"role": "assistant", "content": "{\"Title\": \"标题\"}"}},
            {"message": {"role": "assistant", "content": "ignored"}}
        ],
        "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
    }"#).unwrap();

    assert_eq!(OpenAI::extract_text(&response), "{\"Title\": \"标题\"}");
    assert_eq!(response.usage.unwrap().total_tokens, 17);
}

#[test]
fn test_extractText_withNoChoices_shouldReturnEmpty() {
    let response: OpenAIResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
    assert_eq!(OpenAI::extract_text(&response), "");
    assert!(response.usage.is_none());
}
