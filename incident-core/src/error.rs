use thiserror::Error;

/// Failure of a backend call.
///
/// Transport errors, non-2xx statuses and undecodable bodies all collapse
/// into `RequestFailed`; callers only ever show the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("request failed: {message}")]
    RequestFailed { message: String },
}

impl ClientError {
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ClientError::RequestFailed { message } => message,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let message = match err.status() {
            Some(status) => format!("{status}: {err}"),
            None => err.to_string(),
        };
        Self::request_failed(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base url {value:?}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

pub type ClientResult<T> = Result<T, ClientError>;
