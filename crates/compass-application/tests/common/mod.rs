#![allow(dead_code)]

use async_trait::async_trait;
use compass_application::SessionController;
use compass_core::config::CompassConfig;
use compass_core::error::{CompassError, Result};
use compass_core::gateway::{ChatMessage, CompletionGateway};
use compass_core::history::{GrowthSnapshot, SessionRecord};
use compass_core::prompt::{build_insight_prompt, build_report_prompt};
use compass_core::repository::{HistoryRepository, KeyValueStore};
use compass_infrastructure::{KvHistoryRepository, MemoryKeyValueStore};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const DEFAULT_REPLY: &str = "Tell me more about that.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Reply,
    Insight,
    Report,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub system_prompt: String,
    pub history: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// Insight answer for the extraction fired after a given number of user turns.
#[derive(Clone)]
pub struct InsightScript {
    pub delay: Duration,
    pub response: Result<String>,
}

/// Gateway double that answers by call kind and records every request.
///
/// - Replies pop from a queue, falling back to [`DEFAULT_REPLY`]
/// - Insights are looked up by the number of `User:` lines in the transcript
/// - Reports pop from a queue, falling back to a valid report payload
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String>>>,
    insights: Mutex<HashMap<usize, InsightScript>>,
    reports: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
    reply_gate: Option<Arc<Notify>>,
    report_gate: Option<Arc<Notify>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every reply request waits for one `notify_one` on the returned gate.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let gateway = Self {
            reply_gate: Some(gate.clone()),
            ..Self::default()
        };
        (gateway, gate)
    }

    /// Every report request waits for one `notify_one` on the returned gate.
    pub fn report_gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let gateway = Self {
            report_gate: Some(gate.clone()),
            ..Self::default()
        };
        (gateway, gate)
    }

    pub fn push_reply(&self, response: Result<String>) {
        self.replies.lock().unwrap().push_back(response);
    }

    pub fn push_report(&self, response: Result<String>) {
        self.reports.lock().unwrap().push_back(response);
    }

    pub fn script_insight(&self, user_turns: usize, delay: Duration, response: Result<String>) {
        self.insights
            .lock()
            .unwrap()
            .insert(user_turns, InsightScript { delay, response });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, kind: CallKind) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.kind == kind)
            .collect()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String> {
        let kind = if system_prompt == build_insight_prompt() {
            CallKind::Insight
        } else if system_prompt == build_report_prompt() {
            CallKind::Report
        } else {
            CallKind::Reply
        };

        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            system_prompt: system_prompt.to_string(),
            history: history.to_vec(),
            max_tokens,
        });

        match kind {
            CallKind::Reply => {
                if let Some(gate) = &self.reply_gate {
                    gate.notified().await;
                }
                self.replies
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Ok(DEFAULT_REPLY.to_string()))
            }
            CallKind::Insight => {
                let transcript = history
                    .first()
                    .map(|message| message.content.clone())
                    .unwrap_or_default();
                let user_turns = transcript
                    .lines()
                    .filter(|line| line.starts_with("User: "))
                    .count();
                let script = self.insights.lock().unwrap().get(&user_turns).cloned();
                match script {
                    Some(script) => {
                        tokio::time::sleep(script.delay).await;
                        script.response
                    }
                    None => Ok(insight_json(&["default"], "default", 10)),
                }
            }
            CallKind::Report => {
                if let Some(gate) = &self.report_gate {
                    gate.notified().await;
                }
                self.reports
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Ok(report_json()))
            }
        }
    }
}

/// History repository whose every operation fails.
pub struct FailingRepository;

#[async_trait]
impl HistoryRepository for FailingRepository {
    async fn load_sessions(&self) -> Result<Vec<SessionRecord>> {
        Err(CompassError::persistence("store unavailable"))
    }

    async fn load_growth(&self) -> Result<Vec<GrowthSnapshot>> {
        Err(CompassError::persistence("store unavailable"))
    }

    async fn save_sessions(&self, _sessions: &[SessionRecord]) -> Result<()> {
        Err(CompassError::persistence("store unavailable"))
    }

    async fn save_growth(&self, _growth: &[GrowthSnapshot]) -> Result<()> {
        Err(CompassError::persistence("store unavailable"))
    }
}

pub struct Harness {
    pub controller: Arc<SessionController>,
    pub gateway: Arc<ScriptedGateway>,
    pub store: Arc<MemoryKeyValueStore>,
}

pub fn harness_with(gateway: ScriptedGateway) -> Harness {
    let gateway = Arc::new(gateway);
    let store = Arc::new(MemoryKeyValueStore::new());
    let repository = Arc::new(KvHistoryRepository::new(store.clone()));
    let controller = Arc::new(SessionController::new(
        CompassConfig::default(),
        gateway.clone(),
        repository,
    ));
    Harness {
        controller,
        gateway,
        store,
    }
}

pub fn harness() -> Harness {
    harness_with(ScriptedGateway::new())
}

/// Reads a persisted list straight from the store.
pub async fn stored_json(store: &MemoryKeyValueStore, key: &str) -> Option<serde_json::Value> {
    store
        .get(key)
        .await
        .expect("Memory store never fails")
        .map(|raw| serde_json::from_str(&raw).expect("Stored value should be JSON"))
}

/// Sends `count` plain messages and asserts each was answered.
pub async fn send_turns(controller: &SessionController, count: usize) {
    for i in 0..count {
        let outcome = controller.send(&format!("message {}", i)).await;
        assert!(outcome.is_replied(), "send {} was not replied: {:?}", i, outcome);
    }
}

pub fn insight_json(keywords: &[&str], core_value: &str, score: u8) -> String {
    serde_json::json!({
        "keywords": keywords,
        "coreValue": core_value,
        "phase": 2,
        "scores": {
            "selfAwareness": score,
            "clarity": score,
            "motivation": score,
            "actionReady": score
        },
        "insight": "You light up when you talk about building things."
    })
    .to_string()
}

pub fn report_json() -> String {
    let roadmap: Vec<serde_json::Value> = ["Year 1", "Years 2-3", "Years 4-5", "Years 6-10"]
        .iter()
        .map(|period| {
            serde_json::json!({
                "period": period,
                "theme": "Foundation",
                "actions": ["Read", "Write", "Ship"],
                "milestone": "First release"
            })
        })
        .collect();
    let top5: Vec<serde_json::Value> = (1..=5)
        .map(|rank| {
            serde_json::json!({
                "rank": rank,
                "action": format!("Action {}", rank),
                "detail": "Small and concrete",
                "by": "this week"
            })
        })
        .collect();

    let report = serde_json::json!({
        "personalityType": "Quiet Builder",
        "summary": "Thoughtful and steady.",
        "vision": "A calm life spent making useful things.",
        "swot": {
            "strengths": ["curious", "patient", "honest", "kind"],
            "weaknesses": ["overthinks", "hesitant", "perfectionist"],
            "opportunities": ["new role", "community", "mentoring"],
            "threats": ["burnout", "isolation"]
        },
        "roadmap": roadmap,
        "top5": top5,
        "message": "You already know the way."
    });
    format!("Here is your report:\n```json\n{}\n```", report)
}
