use thiserror::Error;
use serde::Serialize;

/// Shown when the translation service could not be reached at all.
pub const MSG_NETWORK_FAILURE: &str = "Unable to reach the translation service. Please try again.";

/// Shown when the service failed without telling us why.
pub const MSG_UPSTREAM_FALLBACK: &str = "An error occurred during translation. Please try again.";

#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "type", content = "detail")]
pub enum AppError {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Network Error: {0}")]
    Network(String),

    #[error("Upstream Error ({status}): {message}")]
    Upstream {
        status: u16,
        message: String,
        details: Option<String>,
    },

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Unknown Error: {0}")]
    Unknown(String),
}

impl AppError {
    /// The single string the page shows for a failed request.
    ///
    /// Upstream messages are passed through verbatim; transport and
    /// internal failures collapse into generic wording.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Upstream { message, .. } if !message.trim().is_empty() => message.clone(),
            AppError::Upstream { .. } => MSG_UPSTREAM_FALLBACK.to_string(),
            AppError::Network(_) => MSG_NETWORK_FAILURE.to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Io(_) | AppError::Config(_) | AppError::Unknown(_) => MSG_UPSTREAM_FALLBACK.to_string(),
        }
    }
}

// Implement conversion from standard errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Serialization error: {}", err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Unknown(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
