//! Terminal input mapped onto component messages.

use userdesk_model::{User, UserId};

use crate::domains::user_change::Message;

pub const HELP: &str = "commands: list | show | hide | draft <name> | \
                        add [name] | rename <id> <name> | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show,
    Hide,
    Draft(String),
    Add(Option<String>),
    Rename { id: UserId, username: String },
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "list" | "reload" => Ok(Command::List),
        "show" => Ok(Command::Show),
        "hide" => Ok(Command::Hide),
        "draft" => Ok(Command::Draft(rest.to_string())),
        "add" if rest.is_empty() => Ok(Command::Add(None)),
        "add" => Ok(Command::Add(Some(rest.to_string()))),
        "rename" => {
            let Some((id, username)) = rest.split_once(char::is_whitespace)
            else {
                return Err("usage: rename <id> <name>".to_string());
            };
            Ok(Command::Rename {
                id: UserId::parse(id),
                username: username.trim().to_string(),
            })
        }
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err(HELP.to_string()),
        other => Err(format!("unknown command '{}'; {}", other, HELP)),
    }
}

impl Command {
    /// Messages that carry out this command, in dispatch order.
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            Self::List => vec![Message::LoadUsers],
            Self::Show => vec![Message::SetShowUsers(true)],
            Self::Hide => vec![Message::SetShowUsers(false)],
            Self::Draft(name) => vec![Message::UsernameChanged(name)],
            Self::Add(None) => vec![Message::AddUser],
            Self::Add(Some(name)) => {
                vec![Message::UsernameChanged(name), Message::AddUser]
            }
            Self::Rename { id, username } => vec![
                Message::EditUsername {
                    id: id.clone(),
                    username: username.clone(),
                },
                Message::UpdateUser(User { id, username }),
            ],
            Self::Help | Self::Quit => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rename_with_spaces_in_name() {
        assert_eq!(
            parse_command("rename 4  Grace Hopper"),
            Ok(Command::Rename {
                id: UserId::Number(4),
                username: "Grace Hopper".into()
            })
        );
    }

    #[test]
    fn add_with_name_sets_draft_first() {
        let messages = parse_command("add bob")
            .map(Command::into_messages)
            .unwrap_or_default();
        assert!(matches!(
            messages.as_slice(),
            [Message::UsernameChanged(name), Message::AddUser] if name == "bob"
        ));
    }

    #[test]
    fn rejects_incomplete_rename_and_unknown_words() {
        assert!(parse_command("rename 4").is_err());
        assert!(parse_command("frobnicate").is_err());
        assert_eq!(parse_command("QUIT"), Ok(Command::Quit));
    }
}
