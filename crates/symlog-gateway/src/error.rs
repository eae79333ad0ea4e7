use thiserror::Error;

/// Failure talking to the chat-completion endpoint. Never retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },
    #[error("request to completion endpoint failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    Decode(#[source] reqwest::Error),
}
