//! Completion gateway abstraction.
//!
//! The application layer talks to the language model only through
//! [`CompletionGateway`]; `compass-interaction` provides the HTTP
//! implementation and tests provide scripted ones.

use crate::error::Result;
use crate::session::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One message of the history sent with a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Single request/response call to a text-generation service.
///
/// Implementations return the concatenation of every text segment of the
/// response. They fail with [`CompassError::Network`] on transport failure
/// and [`CompassError::EmptyResponse`] when no text came back. No retries.
///
/// [`CompassError::Network`]: crate::error::CompassError::Network
/// [`CompassError::EmptyResponse`]: crate::error::CompassError::EmptyResponse
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String>;
}
