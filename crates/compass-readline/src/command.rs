/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Report,
    History,
    Insight,
    Status,
    Home,
    Help,
    Quit,
    Unknown(String),
    /// Anything that is not a slash command goes to the coach.
    Message(String),
}

impl Command {
    /// Slash commands offered for completion.
    pub const NAMES: [&'static str; 9] = [
        "/start", "/report", "/history", "/insight", "/status", "/home", "/help", "/quit",
        "/exit",
    ];

    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return Command::Message(trimmed.to_string());
        }

        match trimmed {
            "/start" | "/new" => Command::Start,
            "/report" => Command::Report,
            "/history" => Command::History,
            "/insight" => Command::Insight,
            "/status" => Command::Status,
            "/home" => Command::Home,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("  /report "), Command::Report);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(
            Command::parse("/unknown"),
            Command::Unknown("/unknown".to_string())
        );
    }

    #[test]
    fn test_plain_text_is_message() {
        assert_eq!(
            Command::parse("  I feel stuck  "),
            Command::Message("I feel stuck".to_string())
        );
        assert_eq!(Command::parse(""), Command::Message(String::new()));
    }

    #[test]
    fn test_every_listed_name_parses() {
        for name in Command::NAMES {
            assert!(!matches!(
                Command::parse(name),
                Command::Unknown(_) | Command::Message(_)
            ));
        }
    }
}
