//! HTTP-level tests for the study assistant.
//!
//! A mockito server stands in for the Gemini REST API so the request shape
//! and the fallback behaviour can be checked without credentials.

use capystudy_core::assistant::{ChatSession, STUDY_HELP_FALLBACK, WELLNESS_FALLBACK};
use capystudy_core::storage::AssistantConfig;
use capystudy_core::wellness::WellnessLog;
use capystudy_core::{AssistantError, GeminiClient, StudyAssistant};
use chrono::NaiveDate;
use mockito::{Matcher, Server};
use serde_json::json;

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn assistant_for(server: &Server) -> StudyAssistant {
    let config = AssistantConfig {
        endpoint: server.url(),
        ..AssistantConfig::default()
    };
    StudyAssistant::new(GeminiClient::with_api_key(&config, "test-key").unwrap())
}

fn reply(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
    .to_string()
}

fn logs(n: u32) -> Vec<WellnessLog> {
    (1..=n)
        .map(|d| WellnessLog::empty(NaiveDate::from_ymd_opt(2024, 1, d).unwrap()))
        .collect()
}

#[tokio::test]
async fn test_study_help_sends_context_and_system_instruction() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("Context: Biology".into()),
            Matcher::Regex("User Question: What is osmosis\\?".into()),
            Matcher::Regex("system_instruction".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(reply("Water moves across a membrane."))
        .create_async()
        .await;

    let assistant = assistant_for(&server);
    let answer = assistant.get_study_help("What is osmosis?", Some("Biology")).await;

    assert_eq!(answer, "Water moves across a membrane.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_study_help_defaults_context() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::Regex("Context: General Study Help".into()))
        .with_status(200)
        .with_body(reply("ok"))
        .create_async()
        .await;

    let assistant = assistant_for(&server);
    assert_eq!(assistant.get_study_help("hi", None).await, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_yields_fallback() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(500)
        .with_body("internal")
        .create_async()
        .await;

    let assistant = assistant_for(&server);
    let err = assistant.try_study_help("hi", None).await.unwrap_err();
    assert!(matches!(err, AssistantError::Status { status: 500, .. }));
    assert_eq!(assistant.get_study_help("hi", None).await, STUDY_HELP_FALLBACK);
    assert_eq!(assistant.get_wellness_insights(&logs(3)).await, WELLNESS_FALLBACK);
}

#[tokio::test]
async fn test_empty_candidates_yield_fallback() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(json!({ "candidates": [] }).to_string())
        .create_async()
        .await;

    let assistant = assistant_for(&server);
    assert_eq!(assistant.get_study_help("hi", None).await, STUDY_HELP_FALLBACK);
}

#[tokio::test]
async fn test_wellness_sends_only_last_seven_logs() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("2024-01-04".into()),
            Matcher::Regex("2024-01-10".into()),
        ]))
        .with_status(200)
        .with_body(reply("- Drink water, capy-bara-ly enough!"))
        .create_async()
        .await;

    let assistant = assistant_for(&server);
    let prompt_logs = logs(10);
    let text = assistant.try_wellness_insights(&prompt_logs).await.unwrap();
    assert!(text.starts_with("- Drink water"));
    mock.assert_async().await;

    // The three oldest entries must not be in the request.
    let strict = server
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::Regex("2024-01-03".into()))
        .expect(0)
        .create_async()
        .await;
    assistant.get_wellness_insights(&prompt_logs).await;
    strict.assert_async().await;
}

#[tokio::test]
async fn test_chat_appends_model_reply() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(reply("Try the Feynman technique."))
        .create_async()
        .await;

    let assistant = assistant_for(&server);
    let mut chat = ChatSession::new();
    let last = chat.send(&assistant, "How do I memorize faster?").await.unwrap();
    assert_eq!(last.text, "Try the Feynman technique.");
    assert_eq!(chat.messages().len(), 3);
}
