//! Interactive prompt.
//!
//! Line editing is blocking, so the shell runs on the calling thread and
//! drives the connection's async work through its own Tokio runtime.

use rustyline::{DefaultEditor, error::ReadlineError};
use tertulia_shared::protocol::QUIT;
use tokio::runtime::Runtime;

use crate::{
    action::{ShellAction, plan},
    connection::{Connection, ServerEvent},
    error::ClientError,
};

const PROMPT: &str = "you> ";

const HELP_TEXT: &str = "\
Available commands:
  start-conection <ip>                 connect to a server (port 8080 unless given)
  change-userName <newName>            change your name (no whitespace)
  send-msg <targetName> <message>      send a private message
  global-msg <message>                 send a message to everyone
  salir                                close the session and exit
  help                                 show this list";

pub struct Shell {
    runtime: Runtime,
    connection: Option<Connection>,
}

impl Shell {
    /// # Errors
    ///
    /// `ClientError::Runtime` if the Tokio runtime cannot be started.
    pub fn new() -> Result<Self, ClientError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(ClientError::Runtime)?;
        Ok(Self {
            runtime,
            connection: None,
        })
    }

    /// Read lines until `salir` or end of input.
    ///
    /// # Errors
    ///
    /// Only line-editor failures end the shell with an error; connection
    /// problems are printed and the prompt continues.
    pub fn run(mut self) -> Result<(), ClientError> {
        let mut editor = DefaultEditor::new()?;
        println!("Tertulia chat client");
        println!("{HELP_TEXT}");

        loop {
            let line = match editor.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    self.disconnect();
                    return Err(e.into());
                }
            };
            if !line.trim().is_empty() {
                if let Err(e) = editor.add_history_entry(line.as_str()) {
                    tracing::debug!(error = %e, "failed to record history entry");
                }
            }

            match plan(&line, self.is_connected()) {
                ShellAction::Skip => {}
                ShellAction::Help => println!("{HELP_TEXT}"),
                ShellAction::Report(text) => println!("{text}"),
                ShellAction::Connect(address) => self.connect(&address),
                ShellAction::Send(line) => self.send(&line),
                ShellAction::Quit => break,
            }
        }

        self.disconnect();
        println!("Goodbye.");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(Connection::is_connected)
    }

    fn connect(&mut self, address: &str) {
        // A previous connection the server already closed.
        if let Some(stale) = self.connection.take() {
            self.runtime.block_on(stale.close());
        }

        match self
            .runtime
            .block_on(Connection::connect(address, print_event))
        {
            Ok(connection) => {
                println!("Connected to {}", connection.peer_addr());
                self.connection = Some(connection);
            }
            Err(e) => println!("Could not connect: {e}"),
        }
    }

    fn send(&self, line: &str) {
        let result = match &self.connection {
            Some(connection) => connection.send(line),
            None => Err(ClientError::NotConnected),
        };
        if let Err(e) = result {
            println!("{e}");
        }
    }

    fn disconnect(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };
        if connection.is_connected() && connection.send(QUIT).is_err() {
            tracing::debug!("connection closed before quit was sent");
        }
        self.runtime.block_on(connection.close());
    }
}

fn print_event(event: ServerEvent) {
    match event {
        ServerEvent::Message(text) => println!("\nServer: {text}"),
        ServerEvent::Closed => println!("\nConnection closed."),
    }
}
