//! Periodically extracted summary of the user's self-understanding.

use crate::error::Result;
use crate::json::parse_embedded_json;
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound of every score.
pub const MAX_SCORE: u8 = 100;

/// The four numeric signals tracked across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    #[serde(default, deserialize_with = "lenient_score")]
    pub self_awareness: u8,
    #[serde(default, deserialize_with = "lenient_score")]
    pub clarity: u8,
    #[serde(default, deserialize_with = "lenient_score")]
    pub motivation: u8,
    #[serde(default, deserialize_with = "lenient_score")]
    pub action_ready: u8,
}

impl Scores {
    /// `(json key, value)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, u8); 4] {
        [
            ("selfAwareness", self.self_awareness),
            ("clarity", self.clarity),
            ("motivation", self.motivation),
            ("actionReady", self.action_ready),
        ]
    }
}

/// Accepts integers, floats and numeric strings; anything else reads as 0.
/// Values are rounded and clamped to `0..=100`.
fn lenient_score<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(0.0, f64::from(MAX_SCORE)) as u8)
        .unwrap_or(0))
}

/// Keeps the phase hint only when it is a stage number in `1..=5`.
fn lenient_phase<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| (1..=5).contains(n))
        .and_then(|n| u8::try_from(n).ok()))
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Structured insight extracted from the conversation.
///
/// Replaced wholesale on every successful extraction, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Keywords in the order the model returned them.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub core_value: String,
    /// Phase number the model believes the conversation is in.
    #[serde(
        default,
        deserialize_with = "lenient_phase",
        skip_serializing_if = "Option::is_none"
    )]
    pub phase: Option<u8>,
    #[serde(default)]
    pub scores: Scores,
    /// One-line insight addressed to the user.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub insight: String,
}

impl Insight {
    /// Parses the first JSON object embedded in raw model output.
    pub fn from_model_output(raw: &str) -> Result<Self> {
        parse_embedded_json(raw)
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.core_value.trim().is_empty()
    }

    /// Keywords shown in the compact insight panel.
    pub fn headline_keywords(&self) -> &[String] {
        let end = self.keywords.len().min(3);
        &self.keywords[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let raw = r#"Sure! {
            "keywords": ["freedom", "family", "craft"],
            "coreValue": "autonomy",
            "phase": 2,
            "scores": {"selfAwareness": 40, "clarity": 35, "motivation": 70, "actionReady": 20},
            "insight": "You light up when you talk about building things."
        }"#;
        let insight = Insight::from_model_output(raw).unwrap();
        assert_eq!(insight.keywords, vec!["freedom", "family", "craft"]);
        assert_eq!(insight.core_value, "autonomy");
        assert_eq!(insight.phase, Some(2));
        assert_eq!(insight.scores.motivation, 70);
        assert_eq!(insight.headline_keywords().len(), 3);
    }

    #[test]
    fn test_missing_scores_default_to_zero() {
        let insight = Insight::from_model_output(r#"{"keywords":["a"],"scores":{"clarity":55}}"#).unwrap();
        assert_eq!(insight.scores.clarity, 55);
        assert_eq!(insight.scores.self_awareness, 0);
        assert_eq!(insight.scores.motivation, 0);
        assert_eq!(insight.scores.action_ready, 0);
        assert!(insight.core_value.is_empty());

        let insight = Insight::from_model_output(r#"{"coreValue": null}"#).unwrap();
        assert!(insight.core_value.is_empty());
    }

    #[test]
    fn test_scores_are_clamped_and_rounded() {
        let insight = Insight::from_model_output(
            r#"{"scores":{"selfAwareness":140,"clarity":-3,"motivation":"62","actionReady":49.6}}"#,
        )
        .unwrap();
        assert_eq!(insight.scores.self_awareness, 100);
        assert_eq!(insight.scores.clarity, 0);
        assert_eq!(insight.scores.motivation, 62);
        assert_eq!(insight.scores.action_ready, 50);
    }

    #[test]
    fn test_out_of_range_phase_is_dropped() {
        let insight = Insight::from_model_output(r#"{"phase": 9}"#).unwrap();
        assert_eq!(insight.phase, None);
        let insight = Insight::from_model_output(r#"{"phase": "4"}"#).unwrap();
        assert_eq!(insight.phase, Some(4));
    }

    #[test]
    fn test_malformed_payload_is_parse_error() {
        assert!(Insight::from_model_output("I could not analyse that.").unwrap_err().is_parse());
        assert!(Insight::from_model_output(r#"{"keywords": "not a list"}"#).unwrap_err().is_parse());
    }

    #[test]
    fn test_is_empty() {
        assert!(Insight::default().is_empty());
        let insight = Insight {
            core_value: "growth".into(),
            ..Insight::default()
        };
        assert!(!insight.is_empty());
    }
}
