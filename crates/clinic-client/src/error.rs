use clinic_core::{CoreError, ErrorCategory};
use thiserror::Error;

/// Errors surfaced by the client layer
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Store task has shut down")]
    StoreClosed,
}

impl ClientError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Message shown to a person: the backend's own wording for HTTP errors.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status when the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http { status, .. } => match *status {
                401 | 403 => ErrorCategory::Authorization,
                404 => ErrorCategory::NotFound,
                409 => ErrorCategory::Conflict,
                400..=499 => ErrorCategory::Validation,
                _ => ErrorCategory::Server,
            },
            Self::Network(_) => ErrorCategory::Network,
            Self::Decode(_) => ErrorCategory::Serialization,
            Self::Validation(err) => err.category(),
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::StoreClosed => ErrorCategory::Internal,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
