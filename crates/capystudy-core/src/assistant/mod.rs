//! "Capy" study assistant backed by a hosted language model.
//!
//! Every public operation returns displayable text: failures are logged and
//! replaced by a fixed fallback message. The `try_*` variants expose the
//! underlying error.

mod gemini;

pub use gemini::GeminiClient;

use chrono::{DateTime, Utc};
use indoc::{formatdoc, indoc};
use serde::Serialize;

use crate::error::AssistantError;
use crate::storage::AssistantConfig;
use crate::wellness::WellnessLog;

pub const STUDY_HELP_FALLBACK: &str =
    "Squeak! I'm having trouble connecting to the brain waves right now. Try again later!";
pub const WELLNESS_FALLBACK: &str = "I need more data to give you proper insights! Keep tracking your stats.";
pub const CHAT_GREETING: &str = "Hi! I'm Capy. How can I help you study today?";

const DEFAULT_CONTEXT: &str = "General Study Help";
const WELLNESS_WINDOW: usize = 7;

const STUDY_SYSTEM_INSTRUCTION: &str = indoc! {"
    You are a friendly, encouraging Capybara named \"Capy\" who helps students study.
    You provide clear, concise explanations and helpful study tips.
    Always maintain a supportive and calm tone.
    If the user asks about a specific subject, provide a summary or answer.
"};

pub struct StudyAssistant {
    client: GeminiClient,
}

impl StudyAssistant {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        Ok(Self::new(GeminiClient::from_config(config)?))
    }

    pub async fn try_study_help(&self, query: &str, context: Option<&str>) -> Result<String, AssistantError> {
        let context = context.filter(|c| !c.trim().is_empty()).unwrap_or(DEFAULT_CONTEXT);
        let prompt = format!("Context: {context}\n\nUser Question: {query}");
        self.client.generate(Some(STUDY_SYSTEM_INSTRUCTION), &prompt).await
    }

    /// Answer a study question, or the fallback text on any failure.
    pub async fn get_study_help(&self, query: &str, context: Option<&str>) -> String {
        match self.try_study_help(query, context).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "study help request failed");
                STUDY_HELP_FALLBACK.to_string()
            }
        }
    }

    /// Only the last seven logs are sent.
    pub async fn try_wellness_insights(&self, logs: &[WellnessLog]) -> Result<String, AssistantError> {
        let recent = &logs[logs.len().saturating_sub(WELLNESS_WINDOW)..];
        let summary = serde_json::to_string(recent)?;
        let prompt = formatdoc!(
            "
            Here is my wellness data for the last week: {}.
            Please analyze this and give me 3 specific, actionable, and friendly tips to improve my routine, sleep, or hydration.
            Keep it short and formatted as a bulleted list. Add a Capybara pun.
            ",
            summary
        );
        self.client.generate(None, &prompt).await
    }

    pub async fn get_wellness_insights(&self, logs: &[WellnessLog]) -> String {
        match self.try_wellness_insights(logs).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "wellness insights request failed");
                WELLNESS_FALLBACK.to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// In-memory conversation with the assistant. Not persisted.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Model,
                text: CHAT_GREETING.into(),
                at: Utc::now(),
            }],
        }
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send a question and append both sides. Blank input is ignored.
    pub async fn send(&mut self, assistant: &StudyAssistant, input: &str) -> Option<&ChatMessage> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        self.push(ChatRole::User, input.to_string());
        let reply = assistant.get_study_help(input, None).await;
        self.push(ChatRole::Model, reply);
        self.messages.last()
    }

    fn push(&mut self, role: ChatRole, text: String) {
        self.messages.push(ChatMessage {
            role,
            text,
            at: Utc::now(),
        });
    }
}
