//! Error types for the Compass application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Compass application.
///
/// The first four variants form the failure taxonomy of a coaching session:
/// transport failures, empty model output, unparseable model output and
/// storage failures. Each flow decides separately whether a variant is
/// surfaced to the user or swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassError {
    /// Transport or HTTP failure while talking to the completion service
    #[error("Network error{}: {message}", status_suffix(.status_code))]
    Network {
        status_code: Option<u16>,
        message: String,
    },

    /// The completion service answered without any usable text
    #[error("Completion service returned no text")]
    EmptyResponse,

    /// Model output did not contain the expected JSON payload
    #[error("Parse error: {0}")]
    Parse(String),

    /// Key-value store read or write failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Prompt template failed to render
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A command was issued in a state that does not allow it
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl CompassError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Network error without an HTTP status
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            status_code: None,
            message: message.into(),
        }
    }

    /// Creates a Network error carrying the HTTP status
    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        Self::Network {
            status_code: Some(status_code),
            message: message.into(),
        }
    }

    /// Creates a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Check if this is an EmptyResponse error
    pub fn is_empty_response(&self) -> bool {
        matches!(self, Self::EmptyResponse)
    }

    /// Check if this is a Parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Check if this is a Persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Check if this is an InvalidState error
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

impl From<serde_json::Error> for CompassError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<minijinja::Error> for CompassError {
    fn from(err: minijinja::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

fn status_suffix(status_code: &Option<u16>) -> String {
    status_code
        .map(|code| format!(" (HTTP {code})"))
        .unwrap_or_default()
}

/// Result type alias for Compass operations.
pub type Result<T> = std::result::Result<T, CompassError>;
