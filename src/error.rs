use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(calpilot::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calpilot::config))]
    Config(String),

    #[error("Command extraction error: {0}")]
    #[diagnostic(code(calpilot::extraction))]
    Extraction(String),

    #[error("Transcription error: {0}")]
    #[diagnostic(code(calpilot::transcription))]
    Transcription(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(calpilot::google_calendar))]
    GoogleCalendar(String),

    #[error(transparent)]
    #[diagnostic(code(calpilot::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calpilot::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(calpilot::other))]
    Other(String),
}

// Implement From for JSON serialization errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create extraction errors
pub fn extraction_error(message: &str) -> Error {
    Error::Extraction(message.to_string())
}

/// Helper to create transcription errors
pub fn transcription_error(message: &str) -> Error {
    Error::Transcription(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}
