//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: Turn types (`Role`, `Turn`)
//! - `conversation`: Ordered turn store for the active session (`Conversation`)

mod conversation;
mod message;

pub use conversation::{Conversation, TranscriptStyle};
pub use message::{Role, Turn};
