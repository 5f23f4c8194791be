//! Text command grammar spoken between the client shell and the server.
//!
//! Every command is a single line: a case-sensitive keyword followed by
//! arguments separated from it by the first run of whitespace. The quit
//! keyword is the only one matched case-insensitively.

use std::fmt;

use thiserror::Error;

/// TCP port the server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 8080;

pub const START_CONNECTION: &str = "start-conection";
pub const CHANGE_USER_NAME: &str = "change-userName";
pub const SEND_MSG: &str = "send-msg";
pub const GLOBAL_MSG: &str = "global-msg";
pub const QUIT: &str = "salir";

pub const START_CONNECTION_USAGE: &str = "start-conection <ip>";
pub const CHANGE_USER_NAME_USAGE: &str = "change-userName <newName> (no whitespace)";
pub const SEND_MSG_USAGE: &str = "send-msg <targetName> <message>";
pub const GLOBAL_MSG_USAGE: &str = "global-msg <message>";

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Client-side only: open a connection to a server.
    StartConnection { address: String },
    /// Claim a new display name. The name is not validated here.
    ChangeUserName { new_name: String },
    /// Private message to one display name.
    SendPrivate { target: String, body: String },
    /// Message to every other connected session.
    SendGlobal { body: String },
    Quit,
    /// Anything that is not a known keyword, kept verbatim.
    Unrecognized(String),
}

/// Errors produced while parsing a command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A known keyword was given too few arguments.
    #[error("Usage: {usage}")]
    Usage { usage: &'static str },
}

impl Command {
    /// Parse one line into a command.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Usage` naming the expected form when a known
    /// keyword is missing required arguments.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().eq_ignore_ascii_case(QUIT) {
            return Ok(Self::Quit);
        }

        let (keyword, rest) = split_first_token(line.trim_start());
        match keyword {
            CHANGE_USER_NAME => {
                let new_name = rest.trim();
                if new_name.is_empty() {
                    return Err(usage(CHANGE_USER_NAME_USAGE));
                }
                Ok(Self::ChangeUserName {
                    new_name: new_name.to_string(),
                })
            }
            SEND_MSG => {
                let (target, body) = split_first_token(rest);
                if target.is_empty() || body.is_empty() {
                    return Err(usage(SEND_MSG_USAGE));
                }
                Ok(Self::SendPrivate {
                    target: target.to_string(),
                    body: body.to_string(),
                })
            }
            GLOBAL_MSG => {
                if rest.is_empty() {
                    return Err(usage(GLOBAL_MSG_USAGE));
                }
                Ok(Self::SendGlobal {
                    body: rest.to_string(),
                })
            }
            START_CONNECTION => {
                let address = rest.trim();
                if address.is_empty() {
                    return Err(usage(START_CONNECTION_USAGE));
                }
                Ok(Self::StartConnection {
                    address: address.to_string(),
                })
            }
            _ => Ok(Self::Unrecognized(line.to_string())),
        }
    }

    /// Canonical single-line form, as sent over the wire.
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartConnection { address } => write!(f, "{START_CONNECTION} {address}"),
            Self::ChangeUserName { new_name } => write!(f, "{CHANGE_USER_NAME} {new_name}"),
            Self::SendPrivate { target, body } => write!(f, "{SEND_MSG} {target} {body}"),
            Self::SendGlobal { body } => write!(f, "{GLOBAL_MSG} {body}"),
            Self::Quit => f.write_str(QUIT),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

fn usage(usage: &'static str) -> ParseError {
    ParseError::Usage { usage }
}

/// Split off the first whitespace-delimited token; the remainder has its
/// leading whitespace run removed and is otherwise untouched.
fn split_first_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}
