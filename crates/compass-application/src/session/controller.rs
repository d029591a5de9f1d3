use super::insight_task::InsightTask;
use super::outcome::{RejectReason, SendOutcome};
use super::state::{ReportStatus, SessionSnapshot, SessionState, View};
use compass_core::config::CompassConfig;
use compass_core::error::{CompassError, Result};
use compass_core::gateway::{ChatMessage, CompletionGateway};
use compass_core::history::{
    GrowthSnapshot, GrowthTrend, HistoryLists, MAX_GROWTH_SNAPSHOTS, MAX_SESSION_RECORDS,
    RECORD_MESSAGE_TAIL, SessionRecord,
};
use compass_core::insight::Insight;
use compass_core::phase::Phase;
use compass_core::prompt::{build_reply_prompt, build_report_prompt, build_report_request};
use compass_core::report::Report;
use compass_core::repository::HistoryRepository;
use compass_core::session::{Conversation, TranscriptStyle, Turn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Opening assistant turn of every session. Not counted as a turn.
pub const GREETING: &str = "Nice to meet you. I'm COMPASS, a coach who helps you find the answers that are already inside you.\n\nTo begin, tell me what is on your mind right now. Anything at all, however small.";

/// Assistant turn appended when the reply request fails.
pub const FALLBACK_REPLY: &str =
    "I got a little lost in thought there. Could you say that to me once more?";

/// Insight extraction fires when the turn count is a multiple of this.
pub const INSIGHT_INTERVAL: u32 = 3;

/// Turn count from which a report can be generated.
pub const REPORT_MIN_TURNS: u32 = 8;

/// Resets an in-flight flag when the owning operation ends, including on
/// cancellation of the future.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives a coaching session.
///
/// `SessionController` is responsible for:
/// - The conversation, phase, turn count and insight of the active session
/// - Reply, insight and report calls through the [`CompletionGateway`]
/// - The capped session and growth lists, persisted through the [`HistoryRepository`]
///
/// At most one reply and one report request are outstanding at any time.
/// No lock is held across a network call; results that come back after
/// `start_session` replaced the session are dropped.
pub struct SessionController {
    config: CompassConfig,
    gateway: Arc<dyn CompletionGateway>,
    repository: Arc<dyn HistoryRepository>,
    state: Arc<RwLock<SessionState>>,
    history: RwLock<HistoryLists>,
    sending: AtomicBool,
    generating_report: AtomicBool,
    background: Mutex<Vec<JoinHandle<()>>>,
}

impl SessionController {
    /// Creates a controller on the Welcome view with no active session and
    /// empty history. Call [`restore_history`](Self::restore_history) to load
    /// persisted lists.
    pub fn new(
        config: CompassConfig,
        gateway: Arc<dyn CompletionGateway>,
        repository: Arc<dyn HistoryRepository>,
    ) -> Self {
        Self {
            config,
            gateway,
            repository,
            state: Arc::new(RwLock::new(SessionState::default())),
            history: RwLock::new(HistoryLists::default()),
            sending: AtomicBool::new(false),
            generating_report: AtomicBool::new(false),
            background: Mutex::new(Vec::new()),
        }
    }

    // ============================================================================
    // Commands
    // ============================================================================

    /// Loads both history lists. A list that cannot be read starts empty.
    pub async fn restore_history(&self) {
        let mut sessions = self.repository.load_sessions().await.unwrap_or_else(|e| {
            tracing::warn!("Could not load session history, starting empty: {}", e);
            Vec::new()
        });
        let mut growth = self.repository.load_growth().await.unwrap_or_else(|e| {
            tracing::warn!("Could not load growth history, starting empty: {}", e);
            Vec::new()
        });

        sessions.truncate(MAX_SESSION_RECORDS);
        if growth.len() > MAX_GROWTH_SNAPSHOTS {
            let excess = growth.len() - MAX_GROWTH_SNAPSHOTS;
            growth.drain(..excess);
        }

        tracing::info!(
            "Restored {} session record(s), {} growth snapshot(s)",
            sessions.len(),
            growth.len()
        );

        let mut history = self.history.write().await;
        history.sessions = sessions;
        history.growth = growth;
    }

    /// Discards the current conversation and begins a new session.
    ///
    /// Returns the new session id.
    pub async fn start_session(&self) -> String {
        let session_id = uuid::Uuid::now_v7().to_string();

        let mut conversation = Conversation::new();
        conversation.push(Turn::assistant(GREETING, Phase::Listening));

        let mut state = self.state.write().await;
        *state = SessionState {
            session_id: Some(session_id.clone()),
            conversation,
            view: View::Chat,
            ..SessionState::default()
        };

        tracing::info!("Started session {}", session_id);
        session_id
    }

    /// Sends a user message and waits for the coaching reply.
    ///
    /// The user turn is appended before the request goes out. On failure a
    /// fixed fallback reply is appended instead and neither the turn count
    /// nor the phase changes. Once the session has its report, sends are
    /// refused until a new session starts.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Rejected(RejectReason::Empty);
        }
        let Some(_in_flight) = InFlightGuard::acquire(&self.sending) else {
            return SendOutcome::Rejected(RejectReason::InFlight);
        };

        let (session_id, phase, history, insight) = {
            let mut state = self.state.write().await;
            let Some(session_id) = state.session_id.clone() else {
                return SendOutcome::Rejected(RejectReason::NoActiveSession);
            };
            if state.report.is_some() {
                return SendOutcome::Rejected(RejectReason::SessionComplete);
            }
            let phase = state.phase;
            state.conversation.push(Turn::user(text, phase));
            (
                session_id,
                phase,
                state.conversation.to_chat_messages(),
                state.insight.clone(),
            )
        };

        let result = self.request_reply(phase, &insight, &history).await;

        let mut state = self.state.write().await;
        if !state.is_current(&session_id) {
            tracing::debug!("Discarding reply for replaced session {}", session_id);
            return SendOutcome::Discarded;
        }

        match result {
            Ok(reply) => {
                state.turn_count += 1;
                state.conversation.push(Turn::assistant(reply, phase));
                state.phase = Phase::advance(state.turn_count, state.phase);

                let turn_count = state.turn_count;
                let new_phase = state.phase;
                if new_phase != phase {
                    tracing::info!(
                        "Phase advanced to {} ({}) at turn {}",
                        new_phase.number(),
                        new_phase.name(),
                        turn_count
                    );
                }

                let insight_triggered = turn_count % INSIGHT_INTERVAL == 0;
                if insight_triggered {
                    let task = InsightTask {
                        gateway: self.gateway.clone(),
                        state: self.state.clone(),
                        max_tokens: self.config.insight_max_tokens,
                        session_id,
                        trigger_turn: turn_count,
                        transcript: state.conversation.transcript(TranscriptStyle::Compact),
                    };
                    drop(state);
                    self.spawn_background(task).await;
                }

                SendOutcome::Replied {
                    turn_count,
                    phase: new_phase,
                    insight_triggered,
                }
            }
            Err(error) => {
                tracing::warn!("Reply request failed: {}", error);
                state
                    .conversation
                    .push(Turn::assistant(FALLBACK_REPLY, phase));
                SendOutcome::Fallback { error }
            }
        }
    }

    /// Synthesizes the report for the active session.
    ///
    /// On success the session is recorded in history, both lists are
    /// persisted (write failures are logged, not returned) and the view
    /// switches to Report.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if no session is active, fewer than
    ///   [`REPORT_MIN_TURNS`] turns were completed, a report is already
    ///   being generated, or the session already has its report
    /// - `Network` / `EmptyResponse` / `Parse` from the request itself; the
    ///   status returns to Idle and nothing is recorded
    pub async fn generate_report(&self) -> Result<Report> {
        let Some(_in_flight) = InFlightGuard::acquire(&self.generating_report) else {
            return Err(CompassError::invalid_state(
                "A report is already being generated",
            ));
        };

        let (session_id, turn_count, insight, transcript, tail) = {
            let mut state = self.state.write().await;
            let Some(session_id) = state.session_id.clone() else {
                return Err(CompassError::invalid_state("No active session"));
            };
            if state.report.is_some() {
                return Err(CompassError::invalid_state(
                    "This session already has its report",
                ));
            }
            if state.turn_count < REPORT_MIN_TURNS {
                return Err(CompassError::invalid_state(format!(
                    "A report needs {} turns, only {} completed",
                    REPORT_MIN_TURNS, state.turn_count
                )));
            }
            state.report_status = ReportStatus::Generating;
            (
                session_id,
                state.turn_count,
                state.insight.clone(),
                state.conversation.transcript(TranscriptStyle::Spaced),
                state.conversation.tail(RECORD_MESSAGE_TAIL),
            )
        };

        tracing::info!(
            "Generating report for session {} ({} turns)",
            session_id,
            turn_count
        );

        let report = match self.request_report(&transcript).await {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!("Report generation failed: {}", err);
                let mut state = self.state.write().await;
                if state.is_current(&session_id) {
                    state.report_status = ReportStatus::Idle;
                }
                return Err(err);
            }
        };

        let date = today();
        let record = SessionRecord {
            id: session_id.clone(),
            date: date.clone(),
            turn_count,
            insights: insight.clone(),
            report: report.clone(),
            messages: tail,
        };
        let snapshot = GrowthSnapshot {
            date,
            scores: insight.scores,
        };
        self.record_history(record, snapshot).await;

        let mut state = self.state.write().await;
        if state.is_current(&session_id) {
            state.report = Some(report.clone());
            state.report_status = ReportStatus::Ready;
            state.view = View::Report;
        } else {
            tracing::debug!(
                "Session {} was replaced during report generation; view unchanged",
                session_id
            );
        }

        Ok(report)
    }

    pub async fn show_history(&self) {
        self.state.write().await.view = View::History;
    }

    pub async fn show_welcome(&self) {
        self.state.write().await.view = View::Welcome;
    }

    /// Waits for every spawned insight extraction to finish.
    pub async fn settle_background_tasks(&self) {
        let handles: Vec<JoinHandle<()>> = self.background.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(err) = handle.await {
                tracing::warn!("Background task ended abnormally: {}", err);
            }
        }
    }

    // ============================================================================
    // Queries
    // ============================================================================

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn view(&self) -> View {
        self.state.read().await.view
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase
    }

    pub async fn turn_count(&self) -> u32 {
        self.state.read().await.turn_count
    }

    pub async fn turns(&self) -> Vec<Turn> {
        self.state.read().await.conversation.turns().to_vec()
    }

    pub async fn insight(&self) -> Insight {
        self.state.read().await.insight.clone()
    }

    pub async fn report(&self) -> Option<Report> {
        self.state.read().await.report.clone()
    }

    pub async fn report_status(&self) -> ReportStatus {
        self.state.read().await.report_status
    }

    /// Whether the active session has enough turns and no report yet.
    pub async fn can_generate_report(&self) -> bool {
        let state = self.state.read().await;
        state.session_id.is_some()
            && state.report.is_none()
            && state.turn_count >= REPORT_MIN_TURNS
    }

    /// Turns still needed before a report can be generated.
    pub async fn turns_until_report(&self) -> u32 {
        REPORT_MIN_TURNS.saturating_sub(self.state.read().await.turn_count)
    }

    /// Session records, newest first.
    pub async fn sessions(&self) -> Vec<SessionRecord> {
        self.history.read().await.sessions.clone()
    }

    /// Growth snapshots, oldest first.
    pub async fn growth(&self) -> Vec<GrowthSnapshot> {
        self.history.read().await.growth.clone()
    }

    /// Trend of the last two growth snapshots, `None` with fewer than two.
    pub async fn growth_trend(&self) -> Option<GrowthTrend> {
        let history = self.history.read().await;
        GrowthTrend::is_comparable(&history.growth).then(|| history.growth_trend())
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    // ============================================================================
    // Internals
    // ============================================================================

    async fn request_reply(
        &self,
        phase: Phase,
        insight: &Insight,
        history: &[ChatMessage],
    ) -> Result<String> {
        let system_prompt = build_reply_prompt(phase, insight)?;
        self.gateway
            .complete(&system_prompt, history, self.config.reply_max_tokens)
            .await
    }

    async fn request_report(&self, transcript: &str) -> Result<Report> {
        let raw = self
            .gateway
            .complete(
                &build_report_prompt(),
                &[ChatMessage::user(build_report_request(transcript))],
                self.config.report_max_tokens,
            )
            .await?;
        Report::from_model_output(&raw)
    }

    async fn spawn_background(&self, task: InsightTask) {
        tracing::debug!("Spawning insight extraction for turn {}", task.trigger_turn);
        let handle = tokio::spawn(task.run());

        let mut background = self.background.lock().await;
        background.retain(|handle| !handle.is_finished());
        background.push(handle);
    }

    /// Updates the in-memory lists, then writes both. Write failures are
    /// logged and swallowed.
    async fn record_history(&self, record: SessionRecord, snapshot: GrowthSnapshot) {
        let (sessions, growth) = {
            let mut history = self.history.write().await;
            history.push_session(record);
            history.push_growth(snapshot);
            (history.sessions.clone(), history.growth.clone())
        };

        if let Err(err) = self.repository.save_sessions(&sessions).await {
            tracing::warn!("Failed to persist session history: {}", err);
        }
        if let Err(err) = self.repository.save_growth(&growth).await {
            tracing::warn!("Failed to persist growth history: {}", err);
        }
    }
}

/// Local calendar date as `YYYY-MM-DD`.
fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
