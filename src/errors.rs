//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Signature or timestamp header absent from the webhook request.
    MissingSignatureHeaders,
    /// Ed25519 verification ran cleanly but the signature did not match.
    InvalidSignature,
    /// Malformed key, signature, or header prevented verification itself.
    SignatureVerification(String),
    /// Interaction type or command name not recognized.
    UnknownInteraction(String),
    /// Required option or guild context absent from an otherwise valid command.
    MissingInput(String),
    /// Discord REST API call failure.
    Discord(String),
    /// Queue publish or delivery failure.
    Queue(String),
    /// JSON encode/decode failure.
    Json(String),
    /// Deferred-response edit failure; always swallowed by callers.
    Edit(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::MissingSignatureHeaders => {
                write!(f, "signature: missing signature or timestamp header")
            }
            Self::InvalidSignature => write!(f, "signature: verification failed"),
            Self::SignatureVerification(msg) => write!(f, "signature error: {msg}"),
            Self::UnknownInteraction(msg) => write!(f, "unknown interaction: {msg}"),
            Self::MissingInput(msg) => write!(f, "missing input: {msg}"),
            Self::Discord(msg) => write!(f, "discord: {msg}"),
            Self::Queue(msg) => write!(f, "queue: {msg}"),
            Self::Json(msg) => write!(f, "json: {msg}"),
            Self::Edit(msg) => write!(f, "edit: {msg}"),
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

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(format!("invalid channel config: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Discord(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
