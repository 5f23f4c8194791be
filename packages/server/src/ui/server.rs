//! TCP accept loop.

use std::{future::Future, net::SocketAddr, sync::Arc};

use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use super::{handler::handle_connection, signal::shutdown_signal, state::AppState};
use crate::error::ServerError;

/// A bound chat server. Every accepted connection runs on its own task.
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind a listener on `addr` with a fresh in-memory registry.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` when the address cannot be bound.
    pub async fn bind<A>(addr: A) -> Result<Self, ServerError>
    where
        A: ToSocketAddrs + std::fmt::Display,
    {
        Self::bind_with_state(addr, Arc::new(AppState::in_memory())).await
    }

    /// Bind a listener on `addr` serving `state`.
    pub async fn bind_with_state<A>(addr: A, state: Arc<AppState>) -> Result<Self, ServerError>
    where
        A: ToSocketAddrs + std::fmt::Display,
    {
        let display = addr.to_string();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: display,
                source,
            })?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    /// Shared state, mainly for inspecting the registry from tests
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Sessions already running keep going after the loop stops.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let addr = self.local_addr()?;
        let Server { listener, state } = self;
        tracing::info!("listening on {}", addr);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    let sessions = state.registry.count().await;
                    tracing::info!(sessions, "accept loop stopped");
                    break;
                }
                accepted = listener.accept() => handle_accept_result(accepted, &state),
            }
        }

        Ok(())
    }

    /// Accept connections until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }
}

fn handle_accept_result(result: std::io::Result<(TcpStream, SocketAddr)>, state: &Arc<AppState>) {
    match result {
        Ok((stream, peer)) => {
            tracing::info!(%peer, "accepted connection");
            if let Err(e) = stream.set_nodelay(true) {
                tracing::debug!(%peer, error = %e, "failed to set TCP_NODELAY");
            }
            tokio::spawn(handle_connection(stream, peer, Arc::clone(state)));
        }
        Err(e) => tracing::warn!(error = %e, "failed to accept connection"),
    }
}
