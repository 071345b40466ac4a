use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrendsError>;

#[derive(Debug, Error)]
pub enum TrendsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited by trends service (status 429)")]
    RateLimited,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TrendsError {
    fn from(err: reqwest::Error) -> Self {
        TrendsError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for TrendsError {
    fn from(err: serde_json::Error) -> Self {
        TrendsError::Parse(err.to_string())
    }
}
