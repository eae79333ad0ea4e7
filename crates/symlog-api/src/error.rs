use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use symlog_gateway::GatewayError;
use symlog_types::api::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("invalid JSON body")]
    InvalidBody(#[source] JsonRejection),
    #[error("{0}")]
    Auth(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    /// Gateway failures are reported to the client with the underlying cause.
    #[error("{context}: {source}")]
    Gateway {
        context: &'static str,
        #[source]
        source: GatewayError,
    },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Gateway { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Gateway { context, source } => {
                warn!("{}: {}", context, source);
                ErrorBody {
                    error: context.to_string(),
                    details: Some(source.to_string()),
                }
            }
            Self::InvalidBody(rejection) => {
                warn!("Rejected request body: {}", rejection.body_text());
                ErrorBody {
                    error: "invalid JSON body".to_string(),
                    details: Some(rejection.body_text()),
                }
            }
            Self::Internal(e) => {
                error!("Internal error: {:#}", e);
                ErrorBody {
                    error: "internal server error".to_string(),
                    details: None,
                }
            }
            other => ErrorBody {
                error: other.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ApiError::Validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Auth("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Gateway {
                context: "x",
                source: GatewayError::Timeout { secs: 20 },
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
