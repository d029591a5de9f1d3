use super::state::SessionState;
use compass_core::error::Result;
use compass_core::gateway::{ChatMessage, CompletionGateway};
use compass_core::insight::Insight;
use compass_core::prompt::build_insight_prompt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One background extraction, bound to the session and turn that fired it.
pub(crate) struct InsightTask {
    pub gateway: Arc<dyn CompletionGateway>,
    pub state: Arc<RwLock<SessionState>>,
    pub max_tokens: u32,
    pub session_id: String,
    pub trigger_turn: u32,
    pub transcript: String,
}

impl InsightTask {
    /// Extracts and applies. Failures leave the current insight untouched.
    pub async fn run(self) {
        let insight = match self.extract().await {
            Ok(insight) => insight,
            Err(err) => {
                tracing::warn!(
                    "Insight extraction for turn {} failed, keeping previous insight: {}",
                    self.trigger_turn,
                    err
                );
                return;
            }
        };

        let mut state = self.state.write().await;
        if !state.is_current(&self.session_id) {
            tracing::debug!(
                "Dropping insight for replaced session {}",
                self.session_id
            );
            return;
        }
        if self.trigger_turn <= state.insight_source_turn {
            tracing::debug!(
                "Dropping stale insight from turn {} (applied: turn {})",
                self.trigger_turn,
                state.insight_source_turn
            );
            return;
        }

        tracing::debug!(
            "Applying insight from turn {}: {} keyword(s)",
            self.trigger_turn,
            insight.keywords.len()
        );
        state.insight = insight;
        state.insight_source_turn = self.trigger_turn;
    }

    async fn extract(&self) -> Result<Insight> {
        let raw = self
            .gateway
            .complete(
                &build_insight_prompt(),
                &[ChatMessage::user(self.transcript.clone())],
                self.max_tokens,
            )
            .await?;
        Insight::from_model_output(&raw)
    }
}
