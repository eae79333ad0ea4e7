//! Client for the external chat-completion API ("the gateway").
//!
//! Handlers depend on the [`Completion`] trait so tests can swap in a stub
//! that records calls instead of reaching the network.

pub mod client;
pub mod error;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

pub use client::{ChatCompletionClient, extract_reply};
pub use error::GatewayError;

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Process-wide gateway settings, loaded once at startup.
#[derive(Clone)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// One system + user exchange sent to the gateway.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

#[async_trait]
pub trait Completion: Send + Sync {
    /// Send the request and return the reply text (possibly empty).
    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError>;
}
