//! Instruction text for the three model calls of a session.
//!
//! The transcript is never embedded here; callers send it as the user
//! message so the instructions stay static.

use crate::error::Result;
use crate::insight::Insight;
use crate::phase::Phase;
use minijinja::{Environment, context};
use serde::Serialize;

/// Frameworks the coaching method rests on, with a one-line description each.
pub const METHODOLOGY: [(&str, &str); 4] = [
    (
        "ICF coaching model",
        "The International Coaching Federation's listening and questioning framework",
    ),
    (
        "Self-Determination Theory",
        "Ryan & Deci (1985): the psychology of intrinsic motivation",
    ),
    (
        "Maslow's hierarchy of needs",
        "How needs are structured on the way to self-actualization",
    ),
    (
        "Super's career development theory",
        "Career as something shaped across the whole of a life",
    ),
];

const REPLY_TEMPLATE: &str = r#"You are COMPASS, a world-class life coach AI.
Guide the conversation with the ICF coaching model, Self-Determination Theory (Ryan & Deci) and Maslow's hierarchy of needs.

[Current phase] Phase {{ phase_number }} "{{ phase_name }}"
{% for p in phases %}
{{ "* " if p.current else "- " }}Phase {{ p.number }} "{{ p.name }}": {{ p.guidance }}
{% endfor %}
{% if keywords or core_value %}

[Insights so far]
{% if keywords %}
Keywords: {{ keywords|join(", ") }}
{% endif %}
{% if core_value %}
Core value: {{ core_value }}
{% endif %}
{% endif %}

[Conversation style]
- Speak as an intelligent, polished professional coach. Never push, but get to the heart of things.
- Keep each reply to three to five sentences and always close with exactly one question.
- Reflect the user's own words back, capturing their essence rather than parroting.
- Weave in empathy naturally.
- Go deeper and more future-oriented as the phases progress.

[Important]
- Reply in natural conversational prose only. No JSON.
- Never lecture, advise or impose answers.
- The goal is to create moments where the user notices something for themselves."#;

const INSIGHT_PROMPT: &str = r#"Extract the user's insights from the following conversation.
Respond with ONLY this JSON object and no other text:
{
  "keywords": ["keyword 1", "keyword 2", "keyword 3"],
  "coreValue": "the single most important value (one phrase)",
  "phase": current phase number (1-5),
  "scores": {
    "selfAwareness": number from 0 to 100,
    "clarity": number from 0 to 100,
    "motivation": number from 0 to 100,
    "actionReady": number from 0 to 100
  },
  "insight": "one sentence for the user that prompts a realisation"
}"#;

const REPORT_PROMPT: &str = r#"Analyse the entire coaching session below and produce a life-planning report in JSON.
Respond with ONLY this JSON object and no other text. Keep exactly these cardinalities:
4 strengths, 3 weaknesses, 3 opportunities, 2 threats, exactly 4 roadmap periods and exactly 5 ranked actions.
{
  "personalityType": "name of the personality type (e.g. Passionate Pioneer)",
  "summary": "personality analysis of about 200 characters",
  "vision": "vision statement for ten years from now (200-300 characters, concrete, using the user's own words)",
  "swot": {
    "strengths": ["strength 1", "strength 2", "strength 3", "strength 4"],
    "weaknesses": ["challenge 1", "challenge 2", "challenge 3"],
    "opportunities": ["opportunity 1", "opportunity 2", "opportunity 3"],
    "threats": ["risk 1", "risk 2"]
  },
  "roadmap": [
    {"period": "Year 1", "theme": "theme", "actions": ["action 1", "action 2", "action 3"], "milestone": "milestone"},
    {"period": "Years 2-3", "theme": "theme", "actions": ["action 1", "action 2", "action 3"], "milestone": "milestone"},
    {"period": "Years 4-5", "theme": "theme", "actions": ["action 1", "action 2", "action 3"], "milestone": "milestone"},
    {"period": "Years 6-10", "theme": "theme", "actions": ["action 1", "action 2", "action 3"], "milestone": "milestone"}
  ],
  "top5": [
    {"rank": 1, "action": "action name", "detail": "details and reason", "by": "deadline"},
    {"rank": 2, "action": "action name", "detail": "details and reason", "by": "deadline"},
    {"rank": 3, "action": "action name", "detail": "details and reason", "by": "deadline"},
    {"rank": 4, "action": "action name", "detail": "details and reason", "by": "deadline"},
    {"rank": 5, "action": "action name", "detail": "details and reason", "by": "deadline"}
  ],
  "message": "a warm message to the user (about 100 characters)"
}"#;

/// Prefix of the user message that carries the transcript for a report.
pub const REPORT_REQUEST_PREFIX: &str = "Analyse the following conversation and generate the report:";

#[derive(Serialize)]
struct PhaseLine {
    number: u8,
    name: &'static str,
    guidance: &'static str,
    current: bool,
}

/// System prompt for a coaching reply in `phase`, folding in what has been
/// learned so far. Sections with no data are left out entirely.
pub fn build_reply_prompt(phase: Phase, insight: &Insight) -> Result<String> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("reply", REPLY_TEMPLATE)?;

    let phases: Vec<PhaseLine> = Phase::ALL
        .into_iter()
        .map(|p| PhaseLine {
            number: p.number(),
            name: p.name(),
            guidance: p.guidance(),
            current: p == phase,
        })
        .collect();

    let keywords: Vec<&str> = insight
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();

    let rendered = env.get_template("reply")?.render(context! {
        phase_number => phase.number(),
        phase_name => phase.name(),
        phases => phases,
        keywords => keywords,
        core_value => insight.core_value.trim(),
    })?;

    Ok(rendered.trim().to_string())
}

/// System prompt for insight extraction.
pub fn build_insight_prompt() -> String {
    INSIGHT_PROMPT.to_string()
}

/// System prompt for report synthesis.
pub fn build_report_prompt() -> String {
    REPORT_PROMPT.to_string()
}

/// User message wrapping the transcript for report synthesis.
pub fn build_report_request(transcript: &str) -> String {
    format!("{REPORT_REQUEST_PREFIX}\n\n{transcript}")
}
