//! Maps one line typed at the prompt to what the shell should do with it.

use tertulia_shared::{Command, ParseError};

pub const NOT_CONNECTED: &str = "Not connected. Use 'start-conection <ip>' first.";
pub const ALREADY_CONNECTED: &str = "Already connected.";
pub const UNRECOGNIZED: &str = "Unrecognized command. Type 'help' to see the options.";

const HELP: &str = "help";

/// What the shell does with one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    /// Nothing to do (blank line)
    Skip,
    /// Open a connection to the given address
    Connect(String),
    /// Leave the shell
    Quit,
    /// Print the command list
    Help,
    /// Send this line to the server
    Send(String),
    /// Print this text locally; nothing goes over the wire
    Report(String),
}

/// Decide what to do with `line` given whether a connection is open.
pub fn plan(line: &str, connected: bool) -> ShellAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellAction::Skip;
    }
    if trimmed.eq_ignore_ascii_case(HELP) {
        return ShellAction::Help;
    }

    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(err @ ParseError::Usage { .. }) => return ShellAction::Report(err.to_string()),
    };

    match command {
        Command::StartConnection { .. } if connected => {
            ShellAction::Report(ALREADY_CONNECTED.to_string())
        }
        Command::StartConnection { address } => ShellAction::Connect(address),
        Command::Quit => ShellAction::Quit,
        Command::ChangeUserName { .. }
        | Command::SendPrivate { .. }
        | Command::SendGlobal { .. } => {
            if connected {
                ShellAction::Send(command.to_wire())
            } else {
                ShellAction::Report(NOT_CONNECTED.to_string())
            }
        }
        Command::Unrecognized(raw) => {
            if connected {
                ShellAction::Send(raw)
            } else {
                ShellAction::Report(UNRECOGNIZED.to_string())
            }
        }
    }
}
