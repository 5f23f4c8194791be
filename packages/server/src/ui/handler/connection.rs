//! Per-connection dispatcher loop.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tertulia_shared::{TransportError, frame, read_message, write_message};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
    task::JoinHandle,
};

use super::command::{CommandInterpreter, Flow, broadcast};
use crate::{
    domain::{
        OUTBOUND_QUEUE_CAPACITY, OutboundChannel, Session, SessionIdFactory, SessionState,
        Timestamp,
    },
    infrastructure::dto::Notice,
    ui::state::AppState,
    usecase::{ConnectSessionUseCase, ConnectedSession, DisconnectSessionUseCase},
};

/// How long teardown waits for queued messages to reach the socket
const WRITER_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Why a dispatcher loop stopped reading
#[derive(Debug)]
enum CloseReason {
    Quit,
    PeerClosed,
    WriterGone,
    Transport(TransportError),
}

/// Serve one accepted stream until the client quits or the stream fails.
///
/// Never returns an error: every failure of this session is logged and ends
/// only this session.
pub async fn handle_connection<S>(stream: S, peer: SocketAddr, state: Arc<AppState>)
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (mut sink, mut lines) = frame(stream).split();
    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_QUEUE_CAPACITY);
    let channel = OutboundChannel::new(SessionIdFactory::generate(), tx);

    // Sole owner of the write half: one queued message is one frame.
    let mut writer: JoinHandle<()> = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if let Err(e) = write_message(&mut sink, &text).await {
                tracing::debug!(%peer, error = %e, "write failed, stopping writer");
                return;
            }
        }
        if let Err(e) = sink.close().await {
            tracing::debug!(%peer, error = %e, "failed to shut down write half");
        }
    });

    let connect_usecase = ConnectSessionUseCase::new(state.registry.clone(), state.names.clone());
    let ConnectedSession { mut session, peers } = match connect_usecase
        .execute(channel.clone())
        .await
    {
        Ok(connected) => connected,
        Err(e) => {
            tracing::error!(%peer, error = %e, "failed to register session");
            drop(channel);
            finish_writer(&mut writer, peer).await;
            return;
        }
    };

    let name = session.display_name.as_str();
    tracing::info!(%peer, session = %session.id, name, "session active");
    channel.deliver(Notice::Welcome { name }.to_string());
    channel.deliver(Notice::CommandList.to_string());
    broadcast(&peers, Notice::Joined { name });

    let interpreter = CommandInterpreter::new(&state);
    let reason = loop {
        tokio::select! {
            frame = read_message(&mut lines) => match frame {
                Ok(line) => {
                    if interpreter.interpret(&mut session, &channel, &line).await == Flow::Quit {
                        break CloseReason::Quit;
                    }
                }
                Err(TransportError::ConnectionClosed) => break CloseReason::PeerClosed,
                Err(e) => break CloseReason::Transport(e),
            },
            _ = channel.closed() => break CloseReason::WriterGone,
        }
    };

    match &reason {
        CloseReason::Transport(e) => {
            tracing::warn!(%peer, name = %session.display_name, error = %e, "session read failed");
        }
        other => {
            tracing::debug!(%peer, name = %session.display_name, reason = ?other, "session ending");
        }
    }

    teardown(&state, &mut session, channel, &mut writer, peer).await;
}

/// Release the name, tell the others, then let the writer drain.
async fn teardown(
    state: &AppState,
    session: &mut Session,
    channel: OutboundChannel,
    writer: &mut JoinHandle<()>,
    peer: SocketAddr,
) {
    let disconnect_usecase = DisconnectSessionUseCase::new(state.registry.clone());
    let Some(peers) = disconnect_usecase.execute(session).await else {
        return;
    };
    broadcast(
        &peers,
        Notice::Left {
            name: session.display_name.as_str(),
        },
    );

    drop(channel);
    finish_writer(writer, peer).await;

    if let Err(e) = session.transition(SessionState::Closed) {
        tracing::warn!(%peer, error = %e, "unexpected session state at close");
    }
    let remaining = disconnect_usecase.count_remaining_sessions().await;
    tracing::info!(
        %peer,
        name = %session.display_name,
        duration_ms = Timestamp::now().millis_since(session.connected_at),
        remaining,
        "session closed"
    );
}

async fn finish_writer(writer: &mut JoinHandle<()>, peer: SocketAddr) {
    if tokio::time::timeout(WRITER_FLUSH_TIMEOUT, &mut *writer)
        .await
        .is_err()
    {
        tracing::debug!(%peer, "writer did not drain in time, aborting");
        writer.abort();
    }
}
