//! Integration tests for the Ollama advice client

mod common;

use common::profile_input;
use serde_json::json;
use vitality_engine::advisor::{
    AdviceClient, Advisor, OllamaClient, ADVICE_FAILURE, CHAT_EMPTY, CHAT_SYSTEM_PROMPT,
};
use vitality_engine::config::AiConfig;
use vitality_engine::EngineError;
use vitality_shared::{classify_bmi, ChatMessage};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ai_config(server: &MockServer) -> AiConfig {
    AiConfig {
        enabled: true,
        ollama_url: format!("{}/", server.uri()),
        model: "llama3.2".to_string(),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_generate_sends_non_streaming_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_json(json!({
            "model": "llama3.2",
            "prompt": "Plan my week",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "response": "Walk 30 minutes a day.",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(&ai_config(&server)).unwrap();
    let text = client.generate("Plan my week").await.unwrap();
    assert_eq!(text, "Walk 30 minutes a day.");
}

#[tokio::test]
async fn test_chat_sends_system_history_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "stream": false,
            "messages": [
                {"role": "system", "content": CHAT_SYSTEM_PROMPT},
                {"role": "assistant", "content": "Hi Ana!"},
                {"role": "user", "content": "Is yoga cardio?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "Some styles are."},
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(&ai_config(&server)).unwrap();
    let history = vec![ChatMessage::model("Hi Ana!")];
    let text = client
        .chat(CHAT_SYSTEM_PROMPT, &history, "Is yoga cardio?")
        .await
        .unwrap();
    assert_eq!(text, "Some styles are.");
}

#[tokio::test]
async fn test_server_error_maps_to_collaborator_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&ai_config(&server)).unwrap();
    let err = client.generate("anything").await.unwrap_err();
    assert!(matches!(err, EngineError::Collaborator(ref msg) if msg.contains("model not loaded")));
}

#[tokio::test]
async fn test_advisor_falls_back_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let advisor = Advisor::from_config(&ai_config(&server)).unwrap();
    let profile = profile_input().into_profile();
    let bmi = classify_bmi(profile.height_cm, profile.weight_kg);
    assert_eq!(advisor.advice(&profile, &bmi).await, ADVICE_FAILURE);
}

#[tokio::test]
async fn test_advisor_falls_back_on_empty_chat_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
        .mount(&server)
        .await;

    let advisor = Advisor::from_config(&ai_config(&server)).unwrap();
    assert_eq!(advisor.chat(&[], "hello?").await, CHAT_EMPTY);
}

#[tokio::test]
async fn test_advice_prompt_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Plan"})))
        .expect(1)
        .mount(&server)
        .await;

    let advisor = Advisor::from_config(&ai_config(&server)).unwrap();
    let profile = profile_input().into_profile();
    let bmi = classify_bmi(profile.height_cm, profile.weight_kg);
    assert_eq!(advisor.advice(&profile, &bmi).await, "Plan");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains(&format!("- Name: {}", profile.name)));
    assert!(prompt.contains("- BMI: 28.4 (Overweight)"));
    assert!(prompt.contains("lose_weight"));
}
