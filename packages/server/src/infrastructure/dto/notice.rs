//! Text notices the server sends to clients.

use std::fmt;

use tertulia_shared::protocol::{CHANGE_USER_NAME, GLOBAL_MSG, QUIT, SEND_MSG};

/// One server → client message. `Display` renders the exact wire text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice<'a> {
    Welcome { name: &'a str },
    CommandList,
    Joined { name: &'a str },
    Left { name: &'a str },
    RenameAccepted { name: &'a str },
    Renamed { previous: &'a str, current: &'a str },
    InvalidName { requested: &'a str },
    NameTaken { name: &'a str },
    UserNotFound { name: &'a str },
    Private { from: &'a str, body: &'a str },
    PrivateSent { to: &'a str, body: &'a str },
    Global { from: &'a str, body: &'a str },
    GlobalSent,
    Unrecognized,
    Usage { usage: &'a str },
}

impl fmt::Display for Notice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome { name } => write!(f, "Welcome. Your initial user name is '{name}'."),
            Self::CommandList => write!(
                f,
                "Commands: {CHANGE_USER_NAME} <newName>, {SEND_MSG} <user> <message>, {GLOBAL_MSG} <message>, {QUIT}"
            ),
            Self::Joined { name } => write!(f, "{name} joined the chat."),
            Self::Left { name } => write!(f, "{name} left the chat."),
            Self::RenameAccepted { name } => write!(f, "Name changed to: {name}"),
            Self::Renamed { previous, current } => write!(f, "{previous} is now {current}."),
            Self::InvalidName { requested } => write!(
                f,
                "Invalid name '{requested}': use at least one character and no whitespace."
            ),
            Self::NameTaken { name } => write!(f, "The name '{name}' is already in use."),
            Self::UserNotFound { name } => write!(f, "User not found: {name}"),
            Self::Private { from, body } => write!(f, "[private from {from}]: {body}"),
            Self::PrivateSent { to, body } => write!(f, "Sent to {to}: {body}"),
            Self::Global { from, body } => write!(f, "[{from}]: {body}"),
            Self::GlobalSent => f.write_str("Global message sent."),
            Self::Unrecognized => write!(
                f,
                "Command not understood. Use: {CHANGE_USER_NAME}, {SEND_MSG}, {GLOBAL_MSG}, {QUIT}"
            ),
            Self::Usage { usage } => write!(f, "Usage: {usage}"),
        }
    }
}
