//! Slash commands typed into chat.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/new player`: spawn a fake player entity where the sender stands.
    NewPlayer,
    /// Anything else, without the leading slash.
    Unknown(String),
}

/// Parses a chat line. Returns `None` for ordinary chat.
pub fn parse(input: &str) -> Option<Command> {
    let line = input.strip_prefix('/')?;
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["new", "player"] => Command::NewPlayer,
        _ => Command::Unknown(line.trim().to_owned()),
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_chat_is_not_a_command() {
        assert_eq!(parse("hello /new player"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_new_player() {
        assert_eq!(parse("/new player"), Some(Command::NewPlayer));
        assert_eq!(parse("/new   player "), Some(Command::NewPlayer));
    }

    #[test]
    fn test_unknown_commands() {
        assert_eq!(parse("/new"), Some(Command::Unknown("new".to_owned())));
        assert_eq!(
            parse("/new zombie"),
            Some(Command::Unknown("new zombie".to_owned()))
        );
        assert_eq!(parse("/"), Some(Command::Unknown(String::new())));
    }
}
