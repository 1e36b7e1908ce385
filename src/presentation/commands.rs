//! Bot command parsing

/// Commands the bot understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    /// `/activate <token>`. `token` is `None` when the argument count is
    /// wrong, so the handler can answer with a usage hint.
    Activate { token: Option<String> },
    Status,
    Update,
}

impl Command {
    /// Parse a message text. Returns `None` for plain text and unknown
    /// commands, which the dispatcher treats as an unrecognized message.
    pub fn parse(text: &str) -> Option<Command> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?;
        // Group chats address commands as /cmd@BotName.
        let head = head.split('@').next().unwrap_or(head);

        match head {
            "/start" => Some(Command::Start),
            "/activate" => {
                let args: Vec<&str> = parts.collect();
                let token = match args.as_slice() {
                    [token] => Some((*token).to_string()),
                    _ => None,
                };
                Some(Command::Activate { token })
            }
            "/status" => Some(Command::Status),
            "/update" => Some(Command::Update),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/status"), Some(Command::Status));
        assert_eq!(Command::parse("/update"), Some(Command::Update));
    }

    #[test]
    fn parses_activate_with_token() {
        assert_eq!(
            Command::parse("/activate s3cret"),
            Some(Command::Activate {
                token: Some("s3cret".to_string())
            })
        );
    }

    #[test]
    fn activate_with_wrong_arity_has_no_token() {
        assert_eq!(
            Command::parse("/activate"),
            Some(Command::Activate { token: None })
        );
        assert_eq!(
            Command::parse("/activate one two"),
            Some(Command::Activate { token: None })
        );
    }

    #[test]
    fn strips_bot_mention_suffix() {
        assert_eq!(Command::parse("/start@vulnwatch_bot"), Some(Command::Start));
    }

    #[test]
    fn plain_text_and_unknown_commands_are_none() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
    }
}
