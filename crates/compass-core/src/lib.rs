//! Domain layer of COMPASS.
//!
//! Holds everything that does not touch the network or the filesystem:
//! phases, turns, insights, reports, history lists, prompt text, the JSON
//! extraction boundary and the traits the outer layers implement.

pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod insight;
pub mod json;
pub mod phase;
pub mod prompt;
pub mod report;
pub mod repository;
pub mod session;

// Re-export common types
pub use error::{CompassError, Result};
pub use gateway::{ChatMessage, CompletionGateway};
pub use history::{GrowthSnapshot, GrowthTrend, HistoryLists, SessionRecord};
pub use insight::{Insight, Scores};
pub use phase::Phase;
pub use report::Report;
pub use repository::{HistoryRepository, KeyValueStore};
pub use session::{Conversation, Role, Turn};
