use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No trend data found for topic {topic:?}")]
    NoDataFound { topic: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Scrape failed: {0}")]
    ScrapeFailed(String),

    #[error("No heading elements found at {url}")]
    EmptyScrapeResult { url: String },

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Failure category, for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    NoDataFound,
    Transport,
    ScrapeFailed,
    EmptyScrapeResult,
    GenerationFailed,
    Validation,
}

impl StrategistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrategistError::Config(_) => ErrorKind::Config,
            StrategistError::NoDataFound { .. } => ErrorKind::NoDataFound,
            StrategistError::Transport(_) => ErrorKind::Transport,
            StrategistError::ScrapeFailed(_) => ErrorKind::ScrapeFailed,
            StrategistError::EmptyScrapeResult { .. } => ErrorKind::EmptyScrapeResult,
            StrategistError::GenerationFailed(_) => ErrorKind::GenerationFailed,
            StrategistError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Message for the person at the form, not for the log.
    pub fn user_message(&self) -> String {
        match self {
            StrategistError::Config(msg) => format!("The service is misconfigured: {msg}"),
            StrategistError::NoDataFound { topic } => format!(
                "Could not find enough related trend data for \"{topic}\". Please try a broader topic."
            ),
            StrategistError::Transport(cause) => {
                format!("An error occurred while fetching trends: {cause}")
            }
            StrategistError::ScrapeFailed(cause) => {
                format!("Could not reach the competitor site: {cause}")
            }
            StrategistError::EmptyScrapeResult { url } => {
                format!("The page at {url} was fetched, but it has no extractable headings.")
            }
            StrategistError::GenerationFailed(cause) => {
                format!("An error occurred while generating the strategy: {cause}")
            }
            StrategistError::Validation(msg) => msg.clone(),
        }
    }
}
