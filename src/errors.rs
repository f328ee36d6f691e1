//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Slack Web API failure.
    Slack(String),
    /// State store (memory or Redis) failure.
    State(String),
    /// Correlation metadata attached to a modal was missing or invalid.
    Correlation(String),
    /// Button action identifier outside the known intake categories.
    UnknownAction(String),
    /// Modal callback identifier not produced by this bot.
    UnknownCallback(String),
    /// Modal submission lacked a required field or carried an invalid value.
    InvalidSubmission(String),
    /// Webhook request signature could not be verified.
    Signature(String),
    /// Inbound webhook payload could not be decoded.
    Payload(String),
    /// File-system or socket I/O failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Slack(msg) => write!(f, "slack: {msg}"),
            Self::State(msg) => write!(f, "state: {msg}"),
            Self::Correlation(msg) => write!(f, "correlation: {msg}"),
            Self::UnknownAction(msg) => write!(f, "unknown action: {msg}"),
            Self::UnknownCallback(msg) => write!(f, "unknown callback: {msg}"),
            Self::InvalidSubmission(msg) => write!(f, "invalid submission: {msg}"),
            Self::Signature(msg) => write!(f, "signature: {msg}"),
            Self::Payload(msg) => write!(f, "payload: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        Self::State(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err.to_string())
    }
}
