//! End-of-session life-planning report.

use crate::error::{CompassError, Result};
use crate::json::parse_embedded_json;
use serde::{Deserialize, Serialize};

/// Number of roadmap periods a report must contain.
pub const ROADMAP_PERIODS: usize = 4;
/// Number of ranked actions a report must contain.
pub const TOP_ACTIONS: usize = 5;

/// Strengths / weaknesses / opportunities / threats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swot {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub threats: Vec<String>,
}

/// One period of the ten-year roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPeriod {
    /// Label such as "Year 1" or "Years 2-3".
    pub period: String,
    pub theme: String,
    pub actions: Vec<String>,
    pub milestone: String,
}

/// One of the five ranked next actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedAction {
    pub rank: u8,
    pub action: String,
    pub detail: String,
    #[serde(rename = "by")]
    pub deadline: String,
}

/// Structured report synthesized from the full transcript.
///
/// Immutable once created; attached to the session record that persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub personality_type: String,
    pub summary: String,
    pub vision: String,
    #[serde(default)]
    pub swot: Swot,
    pub roadmap: Vec<RoadmapPeriod>,
    pub top5: Vec<RankedAction>,
    pub message: String,
}

impl Report {
    /// Parses and validates the first JSON object embedded in model output.
    pub fn from_model_output(raw: &str) -> Result<Self> {
        let report: Report = parse_embedded_json(raw)?;
        report.validate()?;
        Ok(report)
    }

    /// Checks the fixed cardinalities of the report contract.
    pub fn validate(&self) -> Result<()> {
        if self.roadmap.len() != ROADMAP_PERIODS {
            return Err(CompassError::parse(format!(
                "report roadmap must have {ROADMAP_PERIODS} periods, got {}",
                self.roadmap.len()
            )));
        }
        if let Some(period) = self.roadmap.iter().find(|p| p.actions.is_empty()) {
            return Err(CompassError::parse(format!(
                "roadmap period '{}' has no actions",
                period.period
            )));
        }
        if self.top5.len() != TOP_ACTIONS {
            return Err(CompassError::parse(format!(
                "report must rank {TOP_ACTIONS} actions, got {}",
                self.top5.len()
            )));
        }
        Ok(())
    }

    /// Ranked actions ordered by rank.
    pub fn ranked_actions(&self) -> Vec<&RankedAction> {
        let mut actions: Vec<&RankedAction> = self.top5.iter().collect();
        actions.sort_by_key(|action| action.rank);
        actions
    }
}
