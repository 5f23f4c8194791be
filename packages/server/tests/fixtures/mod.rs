//! Shared helpers for integration tests: a real server on an ephemeral port
//! and a line-framed TCP test client.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tertulia_server::{AppState, Server};
use tertulia_shared::{FramedLines, frame};
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};

/// How long a test waits for an expected line before failing
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// Chat server running in the background on 127.0.0.1
pub struct TestServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Bind to an ephemeral port and start accepting
    pub async fn start() -> Self {
        let server = Server::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = server.local_addr().expect("Failed to read local address");
        let state = server.state();
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            server
                .run_until(async {
                    let _ = rx.await;
                })
                .await
                .expect("Server loop failed");
        });

        Self {
            addr,
            state,
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Connect a client and consume its welcome and command list
    pub async fn connect(&self) -> TestClient {
        let mut client = TestClient::connect(self.addr).await;
        let welcome = client.recv().await;
        assert!(
            welcome.starts_with("Welcome."),
            "unexpected first message: {welcome}"
        );
        let commands = client.recv().await;
        assert!(
            commands.starts_with("Commands:"),
            "unexpected second message: {commands}"
        );
        client.name = welcome
            .split('\'')
            .nth(1)
            .expect("welcome should quote the name")
            .to_string();
        client
    }

    /// Poll until the registry holds exactly `expected` sessions
    pub async fn wait_for_count(&self, expected: usize) {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        loop {
            let count = self.state.registry.count().await;
            if count == expected {
                return;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "registry count stayed at {count}, expected {expected}"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// One TCP client speaking the line protocol
pub struct TestClient {
    /// Name announced in the welcome message
    pub name: String,
    framed: FramedLines<TcpStream>,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to test server");
        Self {
            name: String::new(),
            framed: frame(stream),
        }
    }

    pub async fn send(&mut self, line: &str) {
        self.framed
            .send(line.to_string())
            .await
            .expect("Failed to send line");
    }

    /// Next line from the server; panics after [`RECV_TIMEOUT`]
    pub async fn recv(&mut self) -> String {
        tokio::time::timeout(RECV_TIMEOUT, self.framed.next())
            .await
            .expect("Timed out waiting for a message")
            .expect("Connection closed while waiting for a message")
            .expect("Failed to decode frame")
    }

    /// Next line, or `None` if nothing arrives within `wait`
    pub async fn try_recv(&mut self, wait: Duration) -> Option<String> {
        match tokio::time::timeout(wait, self.framed.next()).await {
            Ok(Some(Ok(line))) => Some(line),
            _ => None,
        }
    }

    /// Send `line`, then return the next reply
    pub async fn request(&mut self, line: &str) -> String {
        self.send(line).await;
        self.recv().await
    }

    /// Whether the server closed the connection within [`RECV_TIMEOUT`]
    pub async fn is_closed_by_server(&mut self) -> bool {
        loop {
            match tokio::time::timeout(RECV_TIMEOUT, self.framed.next()).await {
                Ok(None) | Ok(Some(Err(_))) => return true,
                Ok(Some(Ok(_))) => continue,
                Err(_) => return false,
            }
        }
    }
}
