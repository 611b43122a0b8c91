//! Minimal Gemini `generateContent` client.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::error::AssistantError;
use crate::storage::AssistantConfig;

pub struct GeminiClient {
    http: Client,
    endpoint: Url,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Build a client, reading the API key from the configured environment
    /// variable. A missing key is reported on the first request.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::build(config, api_key)
    }

    /// Build a client with an explicit key.
    pub fn with_api_key(config: &AssistantConfig, api_key: impl Into<String>) -> Result<Self, AssistantError> {
        Self::build(config, Some(api_key.into()))
    }

    fn build(config: &AssistantConfig, api_key: Option<String>) -> Result<Self, AssistantError> {
        let mut endpoint = config.endpoint.clone();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: Url::parse(&endpoint)?,
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> Result<Url, AssistantError> {
        Ok(self
            .endpoint
            .join(&format!("models/{}:generateContent", self.model))?)
    }

    /// Send one prompt and return the concatenated text of the first candidate.
    pub async fn generate(&self, system_instruction: Option<&str>, prompt: &str) -> Result<String, AssistantError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AssistantError::MissingCredentials {
                env_var: self.api_key_env.clone(),
            })?;

        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });
        if let Some(system) = system_instruction {
            body["system_instruction"] = json!({ "parts": [{ "text": system }] });
        }

        let url = self.generate_url()?;
        tracing::debug!(model = %self.model, %url, "generateContent request");
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        extract_text(parsed)
    }
}

fn extract_text(resp: GenerateResponse) -> Result<String, AssistantError> {
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        Err(AssistantError::EmptyResponse)
    } else {
        Ok(text)
    }
}
