mod controller;
mod insight_task;
mod outcome;
mod state;

pub use controller::{FALLBACK_REPLY, GREETING, INSIGHT_INTERVAL, REPORT_MIN_TURNS, SessionController};
pub use outcome::{RejectReason, SendOutcome};
pub use state::{ReportStatus, SessionSnapshot, View};
