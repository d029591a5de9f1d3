//! Persisted session history and growth tracking.
//!
//! Both lists are owned by process-wide state and outlive individual
//! sessions. They are always read and written wholesale.

use crate::insight::{Insight, Scores};
use crate::report::Report;
use crate::session::Turn;
use serde::{Deserialize, Serialize};

/// Maximum number of retained session records (newest first).
pub const MAX_SESSION_RECORDS: usize = 10;
/// Maximum number of retained growth snapshots (oldest first).
pub const MAX_GROWTH_SNAPSHOTS: usize = 12;
/// Number of trailing turns kept in a session record.
pub const RECORD_MESSAGE_TAIL: usize = 6;

/// Historical summary of one completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub date: String,
    #[serde(alias = "turns")]
    pub turn_count: u32,
    pub insights: Insight,
    pub report: Report,
    /// Last few turns of the conversation.
    #[serde(default)]
    pub messages: Vec<Turn>,
}

/// Point-in-time copy of the four insight scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthSnapshot {
    pub date: String,
    #[serde(flatten)]
    pub scores: Scores,
}

/// The persisted pair of capped lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLists {
    /// Newest first.
    pub sessions: Vec<SessionRecord>,
    /// Oldest first.
    pub growth: Vec<GrowthSnapshot>,
}

impl HistoryLists {
    /// Inserts a record at the head, evicting the oldest beyond the cap.
    pub fn push_session(&mut self, record: SessionRecord) {
        self.sessions.insert(0, record);
        self.sessions.truncate(MAX_SESSION_RECORDS);
    }

    /// Appends a snapshot, evicting the oldest beyond the cap.
    pub fn push_growth(&mut self, snapshot: GrowthSnapshot) {
        self.growth.push(snapshot);
        if self.growth.len() > MAX_GROWTH_SNAPSHOTS {
            let excess = self.growth.len() - MAX_GROWTH_SNAPSHOTS;
            self.growth.drain(..excess);
        }
    }

    pub fn growth_trend(&self) -> GrowthTrend {
        GrowthTrend::from_snapshots(&self.growth)
    }
}

/// Latest value of one score and its change against the previous snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreTrend {
    pub key: &'static str,
    pub latest: u8,
    pub delta: i16,
}

/// Per-score trend across the last two growth snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowthTrend {
    pub scores: [ScoreTrend; 4],
}

impl GrowthTrend {
    /// Deltas are 0 until a previous snapshot exists; with no snapshots the
    /// latest values are 0 as well.
    pub fn from_snapshots(snapshots: &[GrowthSnapshot]) -> Self {
        let latest = snapshots.last().map(|s| s.scores).unwrap_or_default();
        let previous = snapshots
            .len()
            .checked_sub(2)
            .map_or(latest, |idx| snapshots[idx].scores);

        let latest_entries = latest.entries();
        let previous_entries = previous.entries();
        let scores = std::array::from_fn(|i| {
            let (key, value) = latest_entries[i];
            ScoreTrend {
                key,
                latest: value,
                delta: i16::from(value) - i16::from(previous_entries[i].1),
            }
        });

        Self { scores }
    }

    /// Whether at least two snapshots exist to compare.
    pub fn is_comparable(snapshots: &[GrowthSnapshot]) -> bool {
        snapshots.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::report_json;

    fn record(id: &str) -> SessionRecord {
        SessionRecord {
            id: id.to_string(),
            date: "2026-10-19".to_string(),
            turn_count: 8,
            insights: Insight::default(),
            report: Report::from_model_output(&report_json()).unwrap(),
            messages: Vec::new(),
        }
    }

    fn snapshot(clarity: u8) -> GrowthSnapshot {
        GrowthSnapshot {
            date: "2026-10-19".to_string(),
            scores: Scores {
                clarity,
                ..Scores::default()
            },
        }
    }

    #[test]
    fn test_session_cap_evicts_oldest() {
        let mut lists = HistoryLists::default();
        for i in 0..11 {
            lists.push_session(record(&i.to_string()));
        }
        assert_eq!(lists.sessions.len(), MAX_SESSION_RECORDS);
        assert_eq!(lists.sessions[0].id, "10");
        assert_eq!(lists.sessions[9].id, "1");
        assert!(lists.sessions.iter().all(|r| r.id != "0"));
    }

    #[test]
    fn test_growth_cap_evicts_oldest() {
        let mut lists = HistoryLists::default();
        for i in 0..13 {
            lists.push_growth(snapshot(i));
        }
        assert_eq!(lists.growth.len(), MAX_GROWTH_SNAPSHOTS);
        assert_eq!(lists.growth[0].scores.clarity, 1);
        assert_eq!(lists.growth[11].scores.clarity, 12);
    }

    #[test]
    fn test_growth_snapshot_json_is_flat() {
        let value = serde_json::to_value(snapshot(42)).unwrap();
        assert_eq!(value["clarity"], 42);
        assert_eq!(value["selfAwareness"], 0);
        assert_eq!(value["date"], "2026-10-19");
    }

    #[test]
    fn test_record_accepts_legacy_turns_key() {
        let mut value = serde_json::to_value(record("legacy")).unwrap();
        let turns = value
            .as_object_mut()
            .unwrap()
            .remove("turnCount")
            .unwrap();
        value["turns"] = turns;
        let parsed: SessionRecord = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.turn_count, 8);
    }

    #[test]
    fn test_growth_trend() {
        let trend = GrowthTrend::from_snapshots(&[snapshot(30), snapshot(45)]);
        let clarity = trend.scores.iter().find(|s| s.key == "clarity").unwrap();
        assert_eq!(clarity.latest, 45);
        assert_eq!(clarity.delta, 15);

        let single = GrowthTrend::from_snapshots(&[snapshot(20)]);
        assert_eq!(single.scores[1].latest, 20);
        assert!(single.scores.iter().all(|s| s.delta == 0));
        assert!(!GrowthTrend::is_comparable(&[snapshot(20)]));

        let empty = GrowthTrend::from_snapshots(&[]);
        assert!(empty.scores.iter().all(|s| s.latest == 0 && s.delta == 0));
    }
}
