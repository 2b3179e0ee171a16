//! Integration tests for stsopenai

use serde_json::json;
use stsopenai::{Error, OpenAiClient};
use stswatcher::{SuggestionProvider, SuggestionRequest, WatchError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content, "refusal": null},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 80, "completion_tokens": 30, "total_tokens": 110}
    })
}

fn request() -> SuggestionRequest {
    SuggestionRequest {
        track_name: "Get Lucky".to_string(),
        artists: vec!["Daft Punk".to_string()],
        key: Some("F# Minor".to_string()),
        bpm: Some("116".to_string()),
    }
}

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::builder()
        .api_base(format!("{}/v1", server.uri()))
        .api_key("sk-test")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_suggestions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"suggestions": ["Lose Yourself to Dance - Daft Punk", "Redbone - Childish Gambino", "Happy - Pharrell Williams"]}"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let list = client.suggestions(&request()).await.unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[2], "Happy - Pharrell Williams");
}

#[tokio::test]
async fn test_free_text_answer_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "Lose Yourself to Dance, Redbone, Happy",
        )))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(matches!(
        client.similar_songs(&request()).await,
        Err(Error::InvalidShape(_))
    ));
    assert!(matches!(
        client.suggestions(&request()).await,
        Err(WatchError::Parse(_))
    ));
}

#[tokio::test]
async fn test_no_choices() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock_server)
        .await;

    assert!(matches!(
        client_for(&mock_server).similar_songs(&request()).await,
        Err(Error::EmptyCompletion)
    ));
}

#[tokio::test]
async fn test_quota_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "You exceeded your current quota", "type": "insufficient_quota"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    match client.similar_songs(&request()).await {
        Err(Error::Status { status, message }) => {
            assert_eq!(status, 429);
            assert!(message.contains("quota"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(
        client.suggestions(&request()).await,
        Err(WatchError::Fetch(_))
    ));
}
