use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{context} failed with HTTP {status}")]
    Status { status: u16, context: String },
    #[error("transport error: {0}")]
    Transport(String),
    /// The body could not be decoded into the expected type.
    #[error("decode error: {0}")]
    Decode(String),
    /// A store refused the request without reaching any server.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return ApiError::Decode(e.to_string());
        }
        match e.status() {
            Some(status) => ApiError::Status {
                status: status.as_u16(),
                context: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
            },
            None => ApiError::Transport(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
