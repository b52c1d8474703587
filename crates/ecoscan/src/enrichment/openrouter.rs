use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::generator::{GenerationError, MessageGenerator, MessagePrompt};

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";

/// Chat-completions client for OpenRouter.
///
/// The deadline is enforced by the caller, so the client itself carries no timeout.
#[derive(Clone)]
pub struct OpenRouterGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenRouterGenerator {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl MessageGenerator for OpenRouterGenerator {
    async fn generate(&self, prompt: &MessagePrompt) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.render(),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("X-Title", "ecoScanAi")
            .json(&request)
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "generation service responded");
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        extract_message(&body)
    }
}

fn extract_message(body: &[u8]) -> Result<String, GenerationError> {
    let parsed: ChatResponse =
        serde_json::from_slice(body).map_err(|err| GenerationError::Malformed(err.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(GenerationError::Empty)
}
