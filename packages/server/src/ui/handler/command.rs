//! Command interpreter: turns one inbound line into registry operations and
//! outbound notices.

use tertulia_shared::{Command, ParseError};

use crate::{
    domain::{OutboundChannel, Session},
    infrastructure::dto::Notice,
    ui::state::AppState,
    usecase::{
        ChangeUserNameError, ChangeUserNameUseCase, SendGlobalMessageUseCase,
        SendPrivateMessageError, SendPrivateMessageUseCase,
    },
};

/// What the dispatcher loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Executes parsed commands on behalf of one session.
pub struct CommandInterpreter {
    change_user_name: ChangeUserNameUseCase,
    send_private: SendPrivateMessageUseCase,
    send_global: SendGlobalMessageUseCase,
}

impl CommandInterpreter {
    pub fn new(state: &AppState) -> Self {
        Self {
            change_user_name: ChangeUserNameUseCase::new(state.registry.clone()),
            send_private: SendPrivateMessageUseCase::new(state.registry.clone()),
            send_global: SendGlobalMessageUseCase::new(state.registry.clone()),
        }
    }

    /// Parse and execute one line sent by `session`.
    ///
    /// Errors are reported to the issuing session only and never end the
    /// loop; only `salir` returns [`Flow::Quit`].
    pub async fn interpret(
        &self,
        session: &mut Session,
        channel: &OutboundChannel,
        line: &str,
    ) -> Flow {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(ParseError::Usage { usage }) => {
                reply(channel, Notice::Usage { usage });
                return Flow::Continue;
            }
        };

        match command {
            Command::Quit => return Flow::Quit,
            Command::ChangeUserName { new_name } => {
                self.change_user_name(session, channel, &new_name).await;
            }
            Command::SendPrivate { target, body } => {
                self.send_private(session, channel, &target, &body).await;
            }
            Command::SendGlobal { body } => {
                self.send_global(session, channel, &body).await;
            }
            Command::StartConnection { .. } | Command::Unrecognized(_) => {
                tracing::debug!(name = %session.display_name, line, "unrecognized command");
                reply(channel, Notice::Unrecognized);
            }
        }
        Flow::Continue
    }

    async fn change_user_name(
        &self,
        session: &mut Session,
        channel: &OutboundChannel,
        new_name: &str,
    ) {
        match self
            .change_user_name
            .execute(session, channel, new_name)
            .await
        {
            Ok(renamed) => {
                let current = session.display_name.as_str();
                tracing::info!(previous = %renamed.previous, current, "user renamed");
                reply(channel, Notice::RenameAccepted { name: current });
                broadcast(
                    &renamed.peers,
                    Notice::Renamed {
                        previous: renamed.previous.as_str(),
                        current,
                    },
                );
            }
            Err(ChangeUserNameError::InvalidName { requested, .. }) => {
                reply(
                    channel,
                    Notice::InvalidName {
                        requested: &requested,
                    },
                );
            }
            Err(ChangeUserNameError::NameTaken(name)) => {
                reply(channel, Notice::NameTaken { name: &name });
            }
            Err(err @ ChangeUserNameError::SessionNotActive) => {
                tracing::warn!(name = %session.display_name, error = %err, "rename rejected");
            }
        }
    }

    async fn send_private(
        &self,
        session: &Session,
        channel: &OutboundChannel,
        target: &str,
        body: &str,
    ) {
        match self.send_private.execute(target).await {
            Ok(target_channel) => {
                let from = session.display_name.as_str();
                if !target_channel.deliver(Notice::Private { from, body }.to_string()) {
                    tracing::debug!(from, target, "private message dropped, target closing");
                }
                reply(channel, Notice::PrivateSent { to: target, body });
                tracing::info!(from, target, len = body.len(), "private message");
            }
            Err(SendPrivateMessageError::UserNotFound(name)) => {
                reply(channel, Notice::UserNotFound { name: &name });
            }
        }
    }

    async fn send_global(&self, session: &Session, channel: &OutboundChannel, body: &str) {
        let peers = self.send_global.execute(session).await;
        let from = session.display_name.as_str();
        broadcast(&peers, Notice::Global { from, body });
        reply(channel, Notice::GlobalSent);
        tracing::info!(from, recipients = peers.len(), len = body.len(), "global message");
    }
}

fn reply(channel: &OutboundChannel, notice: Notice<'_>) {
    if !channel.deliver(notice.to_string()) {
        tracing::debug!(session = %channel.session_id(), "reply dropped, session closing");
    }
}

/// Deliver `notice` to every channel in `peers`. Closed channels are
/// skipped silently.
pub(crate) fn broadcast(peers: &[OutboundChannel], notice: Notice<'_>) {
    let text = notice.to_string();
    for peer in peers {
        if !peer.deliver(text.clone()) {
            tracing::debug!(session = %peer.session_id(), "broadcast skipped closing session");
        }
    }
}
