//! Ollama HTTP client
//!
//! Talks to a local Ollama server with non-streaming `/api/generate` and
//! `/api/chat` requests.

use super::AdviceClient;
use crate::config::AiConfig;
use crate::error::{EngineError, EngineResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};
use vitality_shared::{ChatMessage, ChatRole};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OllamaMessage {
    fn from(msg: &ChatMessage) -> Self {
        let role = match msg.role {
            ChatRole::User => "user",
            ChatRole::Model => "assistant",
        };
        Self {
            role: role.to_string(),
            content: msg.text.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<OllamaMessage>,
}

pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &AiConfig) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Collaborator(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint)
    }

    async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> EngineResult<R> {
        let response = self
            .client
            .post(self.api_url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach Ollama at {}: {}", self.base_url, e);
                EngineError::Collaborator(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Collaborator(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| EngineError::Collaborator(format!("Failed to parse Ollama response: {}", e)))
    }
}

#[async_trait]
impl AdviceClient for OllamaClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> EngineResult<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        let response: GenerateResponse = self.post("generate", &request).await?;
        debug!(chars = response.response.len(), "Received advice");
        Ok(response.response)
    }

    #[instrument(skip_all, fields(model = %self.model, turns = history.len()))]
    async fn chat(&self, system: &str, history: &[ChatMessage], message: &str) -> EngineResult<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(OllamaMessage {
            role: "system".to_string(),
            content: system.to_string(),
        });
        messages.extend(history.iter().map(OllamaMessage::from));
        messages.push(OllamaMessage::from(&ChatMessage::user(message)));

        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };
        let response: ChatResponse = self.post("chat", &request).await?;
        Ok(response.message.map(|m| m.content).unwrap_or_default())
    }
}
