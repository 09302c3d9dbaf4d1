// Error handling module
// Contains custom error types and error handling utilities

use serde::Serialize;
use thiserror::Error;

// Application error type
#[derive(Debug, Error, Serialize)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("API error: {0}")]
    ApiError(String),

    /// Shown verbatim to the user when stage 1 cannot produce any text.
    #[error("Không thể lấy phụ đề video. Video có thể không có phụ đề hoặc bị hạn chế.")]
    TranscriptUnavailable,

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    #[serde(serialize_with = "serialize_io_error")]
    IoError(#[from] std::io::Error),

    #[error("Task cancelled")]
    Cancelled,

    #[error("Other error: {0}")]
    Other(String),
}

// std::io::Error does not implement serde::Serialize
fn serialize_io_error<S>(err: &std::io::Error, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&err.to_string())
}

impl AppError {
    /// Short machine-readable category, used in logs and usage counters.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ConfigurationError(_) => "configuration",
            AppError::ApiError(_) => "api",
            AppError::TranscriptUnavailable => "transcript",
            AppError::AudioProcessingError(_) => "audio",
            AppError::SerializationError(_) => "serialization",
            AppError::IoError(_) => "io",
            AppError::Cancelled => "cancelled",
            AppError::Other(_) => "other",
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ApiError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<hound::Error> for AppError {
    fn from(err: hound::Error) -> Self {
        AppError::AudioProcessingError(err.to_string())
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        AppError::AudioProcessingError(format!("invalid base64 audio payload: {}", err))
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Other(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Other(err.to_string())
    }
}

// Result type alias for application
pub type AppResult<T> = Result<T, AppError>;
