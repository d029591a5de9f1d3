//! Ordered turn store for the active session.

use super::message::{Role, Turn};
use crate::gateway::ChatMessage;

/// How transcript lines are separated when a conversation is rendered for
/// an analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptStyle {
    /// One line per turn (insight extraction).
    Compact,
    /// Blank line between turns (report synthesis).
    Spaced,
}

impl TranscriptStyle {
    fn separator(self) -> &'static str {
        match self {
            TranscriptStyle::Compact => "\n",
            TranscriptStyle::Spaced => "\n\n",
        }
    }
}

/// Append-only sequence of turns in conversation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The last `n` turns, oldest first.
    pub fn tail(&self, n: usize) -> Vec<Turn> {
        let start = self.turns.len().saturating_sub(n);
        self.turns[start..].to_vec()
    }

    /// History in completion-API form.
    ///
    /// Leading assistant turns (the session greeting) are skipped: the
    /// Messages API expects the first message to come from the user.
    pub fn to_chat_messages(&self) -> Vec<ChatMessage> {
        self.turns
            .iter()
            .skip_while(|turn| turn.role == Role::Assistant)
            .map(|turn| ChatMessage::new(turn.role, turn.text.clone()))
            .collect()
    }

    /// Renders every turn as a `Speaker: text` line.
    pub fn transcript(&self, style: TranscriptStyle) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role.speaker_label(), turn.text))
            .collect::<Vec<_>>()
            .join(style.separator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    fn sample() -> Conversation {
        let mut conversation = Conversation::new();
        conversation.push(Turn::assistant("Welcome.", Phase::Listening));
        conversation.push(Turn::user("I feel stuck", Phase::Listening));
        conversation.push(Turn::assistant("Tell me more.", Phase::Listening));
        conversation
    }

    #[test]
    fn test_chat_messages_skip_leading_greeting() {
        let messages = sample().to_chat_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "I feel stuck");
        assert_eq!(messages[1].role, Role::Assistant);
    }

    #[test]
    fn test_transcript_styles() {
        let conversation = sample();
        assert_eq!(
            conversation.transcript(TranscriptStyle::Compact),
            "COMPASS: Welcome.\nUser: I feel stuck\nCOMPASS: Tell me more."
        );
        assert_eq!(
            conversation.transcript(TranscriptStyle::Spaced),
            "COMPASS: Welcome.\n\nUser: I feel stuck\n\nCOMPASS: Tell me more."
        );
    }

    #[test]
    fn test_tail() {
        let conversation = sample();
        assert_eq!(conversation.tail(2).len(), 2);
        assert_eq!(conversation.tail(2)[0].text, "I feel stuck");
        assert_eq!(conversation.tail(10).len(), 3);
    }
}
