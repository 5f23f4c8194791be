//! Client side of one TCP connection to a chat server.

use std::{
    net::{IpAddr, SocketAddr},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use futures_util::{SinkExt, StreamExt};
use tertulia_shared::{DEFAULT_PORT, TransportError, frame, read_message, write_message};
use tokio::{net::TcpStream, sync::mpsc, task::JoinHandle};

use crate::error::ClientError;

/// How long `close` waits for queued lines to reach the server
const FLUSH_TIMEOUT: Duration = Duration::from_millis(500);

/// Something the server side of the connection did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// One message from the server
    Message(String),
    /// The connection ended; no more events follow
    Closed,
}

/// An open connection. Outgoing lines are queued to a writer task; incoming
/// messages are handed to the callback given to [`Connection::connect`] from
/// a reader task.
pub struct Connection {
    peer: SocketAddr,
    outbound: mpsc::UnboundedSender<String>,
    open: Arc<AtomicBool>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl Connection {
    /// Connect to `address` and start pumping frames.
    ///
    /// `address` may be a bare IP or host name (port 8080 is used), or an
    /// explicit `host:port` / `[v6]:port`.
    ///
    /// # Errors
    ///
    /// `ClientError::Connect` when the TCP connection cannot be established.
    pub async fn connect<F>(address: &str, mut on_event: F) -> Result<Self, ClientError>
    where
        F: FnMut(ServerEvent) + Send + 'static,
    {
        let target = with_default_port(address);
        let stream = TcpStream::connect(target.as_str())
            .await
            .map_err(|source| ClientError::Connect {
                address: target.clone(),
                source,
            })?;
        let peer = stream.peer_addr().map_err(|source| ClientError::Connect {
            address: target.clone(),
            source,
        })?;
        tracing::debug!(%peer, "connected");

        let (mut sink, mut lines) = frame(stream).split();
        let (outbound, mut rx) = mpsc::unbounded_channel::<String>();
        let open = Arc::new(AtomicBool::new(true));

        let writer = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                if let Err(e) = write_message(&mut sink, &line).await {
                    tracing::warn!(%peer, error = %e, "failed to send line");
                    return;
                }
            }
            if let Err(e) = sink.close().await {
                tracing::debug!(%peer, error = %e, "failed to shut down write half");
            }
        });

        let reader_open = Arc::clone(&open);
        let reader = tokio::spawn(async move {
            loop {
                match read_message(&mut lines).await {
                    Ok(line) => on_event(ServerEvent::Message(line)),
                    Err(TransportError::ConnectionClosed) => break,
                    Err(e) => {
                        tracing::warn!(%peer, error = %e, "connection failed");
                        break;
                    }
                }
            }
            reader_open.store(false, Ordering::SeqCst);
            on_event(ServerEvent::Closed);
        });

        Ok(Self {
            peer,
            outbound,
            open,
            writer,
            reader,
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Whether the server side is still reachable
    pub fn is_connected(&self) -> bool {
        self.open.load(Ordering::SeqCst) && !self.outbound.is_closed()
    }

    /// Queue one line for the server.
    ///
    /// # Errors
    ///
    /// `ClientError::NotConnected` once the connection has ended.
    pub fn send(&self, line: &str) -> Result<(), ClientError> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }
        self.outbound
            .send(line.to_string())
            .map_err(|_| ClientError::NotConnected)
    }

    /// Flush queued lines, then shut the connection down.
    pub async fn close(self) {
        let Self {
            outbound,
            mut writer,
            reader,
            ..
        } = self;
        drop(outbound);
        if tokio::time::timeout(FLUSH_TIMEOUT, &mut writer)
            .await
            .is_err()
        {
            writer.abort();
        }
        reader.abort();
    }
}

/// Append the default port unless `address` already names one.
pub fn with_default_port(address: &str) -> String {
    let address = address.trim();
    if address.parse::<SocketAddr>().is_ok() {
        return address.to_string();
    }
    let unbracketed = address.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = unbracketed.parse::<IpAddr>() {
        return SocketAddr::new(ip, DEFAULT_PORT).to_string();
    }
    match address.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
            address.to_string()
        }
        _ => format!("{address}:{DEFAULT_PORT}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_ip_gets_default_port() {
        // テスト項目: ポート指定のない IP にはデフォルトポート 8080 が付く
        assert_eq!(with_default_port("127.0.0.1"), "127.0.0.1:8080");
        assert_eq!(with_default_port(" 10.0.0.5 "), "10.0.0.5:8080");
        assert_eq!(with_default_port("::1"), "[::1]:8080");
        assert_eq!(with_default_port("[::1]"), "[::1]:8080");
    }

    #[test]
    fn test_explicit_port_is_kept() {
        // テスト項目: 明示されたポートはそのまま使われる
        assert_eq!(with_default_port("127.0.0.1:9000"), "127.0.0.1:9000");
        assert_eq!(with_default_port("[::1]:9000"), "[::1]:9000");
        assert_eq!(with_default_port("chat.local:9000"), "chat.local:9000");
    }

    #[test]
    fn test_host_name_gets_default_port() {
        // テスト項目: ホスト名のみの場合もデフォルトポートが付く
        assert_eq!(with_default_port("localhost"), "localhost:8080");
    }

    #[tokio::test]
    async fn test_connect_failure_is_reported() {
        // テスト項目: 接続できないアドレスは ClientError::Connect になる
        // given (前提条件):
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        // when (操作):
        let result = Connection::connect(&addr.to_string(), |_| {}).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::Connect { .. })));
    }
}
