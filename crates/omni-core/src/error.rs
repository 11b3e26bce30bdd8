//! Error types for the Omni label-to-text engine.
//!
//! Errors are split by concern so a boundary layer can tell a bad request
//! (invalid input) apart from a feature that is not available yet
//! (model-backed inference).

use thiserror::Error;

/// Top-level error type for Omni operations.
#[derive(Error, Debug)]
pub enum OmniError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Engine errors (description or question answering)
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised by the engine and its backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Precondition violation: empty labels, empty or out-of-range question
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The selected backend cannot serve the request (no model present)
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Backend call exceeded the inference timeout
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },
}

impl EngineError {
    /// Whether this error means "service unavailable" rather than "bad request".
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::NotImplemented(_) | Self::Timeout { .. })
    }
}

/// Convenience type alias for Omni results.
pub type Result<T> = std::result::Result<T, OmniError>;

/// Convenience type alias for engine-level results.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
