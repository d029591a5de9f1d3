//! Conversation turn types.

use crate::phase::Phase;
use serde::{Deserialize, Serialize};

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire name used by the completion API.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Speaker label used when rendering transcripts.
    pub fn speaker_label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "COMPASS",
        }
    }
}

/// A single user or assistant message, tagged with the phase it was
/// created in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub phase: Phase,
}

impl Turn {
    pub fn user(text: impl Into<String>, phase: Phase) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            phase,
        }
    }

    pub fn assistant(text: impl Into<String>, phase: Phase) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            phase,
        }
    }
}
