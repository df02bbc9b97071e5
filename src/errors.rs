use axum::http::StatusCode;
use thiserror::Error;

/// Shown when a failure carries no server-provided message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Failures surfaced by the client layer.
///
/// `Validation` covers bad input caught locally or rejected by the server (400/422).
/// `Auth` is a 401/403. Everything else is transient: it is logged, prior state is
/// kept, and nothing is retried.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not authorized (HTTP {status})")]
    Auth { status: u16, detail: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    #[error("server error (HTTP {status})")]
    Server { status: u16, detail: Option<String> },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn network(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }

    pub fn decode(err: impl std::error::Error) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match status {
            400 | 422 => Self::Validation(detail.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.into())),
            401 | 403 => Self::Auth { status, detail },
            _ => Self::Server { status, detail },
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. } | Self::Decode(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Auth { detail, .. } | Self::Server { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            Self::Network(_) | Self::Decode(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Pulls the human-readable `detail` out of an API error body.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg")?.as_str())
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Validation(message) => Self::bad_request(message),
            ClientError::Server { status: 404, .. } => Self::not_found(err.user_message()),
            ClientError::Auth { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.user_message(),
            },
            _ => Self {
                status: StatusCode::BAD_GATEWAY,
                message: err.user_message(),
            },
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
