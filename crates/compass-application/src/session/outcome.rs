use compass_core::error::CompassError;
use compass_core::phase::Phase;

/// Why a send was refused without touching the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The message was empty after trimming.
    Empty,
    /// A previous send has not resolved yet.
    InFlight,
    /// No session has been started.
    NoActiveSession,
    /// The session already has its report; only a new session continues.
    SessionComplete,
}

/// Result of [`SessionController::send`](super::SessionController::send).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Rejected(RejectReason),
    /// The model replied and the turn was counted.
    Replied {
        turn_count: u32,
        phase: Phase,
        /// Whether this turn spawned an insight extraction.
        insight_triggered: bool,
    },
    /// The gateway failed; the fallback reply was appended and nothing was counted.
    Fallback { error: CompassError },
    /// The session was replaced while the request was outstanding.
    Discarded,
}

impl SendOutcome {
    pub fn is_replied(&self) -> bool {
        matches!(self, SendOutcome::Replied { .. })
    }
}
