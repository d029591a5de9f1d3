use compass_core::insight::Insight;
use compass_core::phase::Phase;
use compass_core::report::Report;
use compass_core::session::{Conversation, Turn};

/// Which screen the front-end should present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Welcome,
    Chat,
    History,
    Report,
}

/// Progress of report synthesis for the active session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportStatus {
    #[default]
    Idle,
    /// A report request is outstanding. There is no progress fraction.
    Generating,
    Ready,
}

/// Mutable state of the active session.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    /// `None` until the first `start_session`.
    pub session_id: Option<String>,
    pub conversation: Conversation,
    pub phase: Phase,
    /// Completed user/assistant exchanges. The greeting and fallback replies
    /// are not counted.
    pub turn_count: u32,
    pub insight: Insight,
    /// Turn count that triggered the currently applied insight, 0 if none.
    pub insight_source_turn: u32,
    pub report: Option<Report>,
    pub report_status: ReportStatus,
    pub view: View,
}

impl SessionState {
    pub fn is_current(&self, session_id: &str) -> bool {
        self.session_id.as_deref() == Some(session_id)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            turns: self.conversation.turns().to_vec(),
            phase: self.phase,
            turn_count: self.turn_count,
            insight: self.insight.clone(),
            report: self.report.clone(),
            report_status: self.report_status,
            view: self.view,
        }
    }
}

/// Read-only copy of the session state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: Option<String>,
    pub turns: Vec<Turn>,
    pub phase: Phase,
    pub turn_count: u32,
    pub insight: Insight,
    pub report: Option<Report>,
    pub report_status: ReportStatus,
    pub view: View,
}
