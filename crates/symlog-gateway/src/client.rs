use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{Completion, CompletionRequest, GatewayConfig, GatewayError};

const USER_AGENT: &str = concat!("symlog/", env!("CARGO_PKG_VERSION"));

/// OpenAI-compatible chat-completion client.
pub struct ChatCompletionClient {
    client: Client,
    config: GatewayConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl ChatCompletionClient {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Completion for ChatCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(
            model = %self.config.model,
            max_tokens = request.max_tokens,
            prompt_len = request.prompt.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout {
                        secs: request.timeout.as_secs(),
                    }
                } else {
                    GatewayError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Completion endpoint returned an error");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: Value = response.json().await.map_err(GatewayError::Decode)?;
        Ok(extract_reply(&parsed))
    }
}

/// Pull the reply text out of a completion response.
///
/// Tries `choices[0].message.content`, then `choices[0].text`, then a
/// top-level `message`; empty strings fall through. Defaults to `""`.
pub fn extract_reply(body: &Value) -> String {
    let choice = body.get("choices").and_then(|c| c.get(0));

    [
        choice.and_then(|c| c.pointer("/message/content")),
        choice.and_then(|c| c.get("text")),
        body.get("message"),
    ]
    .into_iter()
    .flatten()
    .filter_map(Value::as_str)
    .find(|s| !s.is_empty())
    .unwrap_or_default()
    .to_string()
}
