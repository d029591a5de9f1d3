//! Coaching phases and the turn-count driven phase controller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five fixed coaching stages.
///
/// Serialized as its stage number (1-5) so persisted turns stay compact and
/// readable by other clients.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Phase {
    /// Receive the user's current state without judgement.
    #[default]
    Listening,
    /// Ask why and since when.
    Exploring,
    /// Surface the values behind the words.
    Values,
    /// Draw the ideal future together.
    Vision,
    /// Commit to one concrete next step.
    Action,
}

impl Phase {
    /// All phases in ascending order.
    pub const ALL: [Phase; 5] = [
        Phase::Listening,
        Phase::Exploring,
        Phase::Values,
        Phase::Vision,
        Phase::Action,
    ];

    /// Stage number in `1..=5`.
    pub fn number(self) -> u8 {
        match self {
            Phase::Listening => 1,
            Phase::Exploring => 2,
            Phase::Values => 3,
            Phase::Vision => 4,
            Phase::Action => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Listening => "Listening",
            Phase::Exploring => "Exploring",
            Phase::Values => "Values",
            Phase::Vision => "Vision",
            Phase::Action => "Action",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Phase::Listening => "Talk about where you are now",
            Phase::Exploring => "Look for the why",
            Phase::Values => "Bring what matters to the surface",
            Phase::Vision => "Picture the ideal",
            Phase::Action => "Decide on tomorrow",
        }
    }

    /// Behavioural guidance for the coach while in this phase.
    pub fn guidance(self) -> &'static str {
        match self {
            Phase::Listening => {
                "Take in the user's current state and concerns exactly as they are. Do not evaluate; listen deeply."
            }
            Phase::Exploring => {
                "Explore why they feel this way and since when it has been like this."
            }
            Phase::Values => {
                "Bring out the values and beliefs behind their words. Mirror back what they care about."
            }
            Phase::Vision => {
                "Draw the future together: if anything were possible, what would ten years from now look like?"
            }
            Phase::Action => {
                "Settle on one concrete step: if they did just one thing tomorrow, what would it be?"
            }
        }
    }

    /// Cumulative turn count at which this phase becomes reachable.
    pub fn entry_threshold(self) -> u32 {
        match self {
            Phase::Listening => 0,
            Phase::Exploring => 4,
            Phase::Values => 8,
            Phase::Vision => 13,
            Phase::Action => 18,
        }
    }

    /// The phase after this one, `None` for the final phase.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Listening => Some(Phase::Exploring),
            Phase::Exploring => Some(Phase::Values),
            Phase::Values => Some(Phase::Vision),
            Phase::Vision => Some(Phase::Action),
            Phase::Action => None,
        }
    }

    /// Evaluates one phase transition for the given turn count.
    ///
    /// Moves at most one step forward per call, and only when the next
    /// phase's threshold has been reached. Never moves backwards.
    pub fn advance(turn_count: u32, current: Phase) -> Phase {
        match current.next() {
            Some(next) if turn_count >= next.entry_threshold() => next,
            _ => current,
        }
    }

    /// Highest phase whose threshold `turn_count` meets.
    pub fn for_turn_count(turn_count: u32) -> Phase {
        Phase::ALL
            .into_iter()
            .rev()
            .find(|phase| turn_count >= phase.entry_threshold())
            .unwrap_or(Phase::Listening)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> Self {
        phase.number()
    }
}

impl TryFrom<u8> for Phase {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Phase::Listening),
            2 => Ok(Phase::Exploring),
            3 => Ok(Phase::Values),
            4 => Ok(Phase::Vision),
            5 => Ok(Phase::Action),
            other => Err(format!("phase must be between 1 and 5, got {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_after_turns(turns: u32) -> Phase {
        let mut phase = Phase::Listening;
        for count in 1..=turns {
            phase = Phase::advance(count, phase);
        }
        phase
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(phase_after_turns(0), Phase::Listening);
        assert_eq!(phase_after_turns(3), Phase::Listening);
        assert_eq!(phase_after_turns(4), Phase::Exploring);
        assert_eq!(phase_after_turns(8), Phase::Values);
        assert_eq!(phase_after_turns(12), Phase::Values);
        assert_eq!(phase_after_turns(13), Phase::Vision);
        assert_eq!(phase_after_turns(18), Phase::Action);
        assert_eq!(phase_after_turns(25), Phase::Action);
    }

    #[test]
    fn test_stepwise_matches_highest_threshold() {
        let mut phase = Phase::Listening;
        for count in 0..40 {
            let next = Phase::advance(count, phase);
            assert!(next >= phase, "phase decreased at turn {count}");
            phase = next;
            assert_eq!(phase, Phase::for_turn_count(count));
        }
    }

    #[test]
    fn test_advance_moves_one_step_when_overshooting() {
        // A jump straight to 20 turns still only moves one phase.
        assert_eq!(Phase::advance(20, Phase::Listening), Phase::Exploring);
        assert_eq!(Phase::advance(20, Phase::Exploring), Phase::Values);
    }

    #[test]
    fn test_default_is_first_phase() {
        assert_eq!(Phase::default(), Phase::Listening);
        assert_eq!(Phase::default().entry_threshold(), 0);
    }

    #[test]
    fn test_advance_never_goes_back() {
        assert_eq!(Phase::advance(0, Phase::Vision), Phase::Vision);
        assert_eq!(Phase::advance(100, Phase::Action), Phase::Action);
    }

    #[test]
    fn test_serde_as_number() {
        assert_eq!(serde_json::to_string(&Phase::Values).unwrap(), "3");
        let phase: Phase = serde_json::from_str("5").unwrap();
        assert_eq!(phase, Phase::Action);
        assert!(serde_json::from_str::<Phase>("6").is_err());
        assert!(serde_json::from_str::<Phase>("0").is_err());
    }
}
