//! Newline-delimited text framing over any duplex byte stream.
//!
//! One `write_message` produces exactly one line on the wire and one
//! `read_message` on the other side yields it back, so message boundaries
//! survive the trip.

use std::io;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};

/// Longest accepted frame, in bytes, excluding the delimiter.
pub const MAX_FRAME_LENGTH: usize = 64 * 1024;

/// A stream framed into text lines.
pub type FramedLines<S> = Framed<S, LinesCodec>;

/// Errors raised while moving frames over a stream.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer closed the stream.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// The peer sent a line longer than [`MAX_FRAME_LENGTH`].
    #[error("frame exceeds {max} bytes")]
    FrameTooLong { max: usize },

    /// Underlying socket failure.
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
}

impl From<LinesCodecError> for TransportError {
    fn from(err: LinesCodecError) -> Self {
        match err {
            LinesCodecError::MaxLineLengthExceeded => Self::FrameTooLong {
                max: MAX_FRAME_LENGTH,
            },
            LinesCodecError::Io(err) => Self::Io(err),
        }
    }
}

/// Wrap a stream with the line codec used by both ends.
pub fn frame<S>(stream: S) -> FramedLines<S>
where
    S: AsyncRead + AsyncWrite,
{
    Framed::new(stream, LinesCodec::new_with_max_length(MAX_FRAME_LENGTH))
}

/// Block until one complete message is available.
///
/// # Errors
///
/// `ConnectionClosed` on end of stream, `FrameTooLong` or `Io` otherwise.
pub async fn read_message<R>(reader: &mut R) -> Result<String, TransportError>
where
    R: Stream<Item = Result<String, LinesCodecError>> + Unpin,
{
    match reader.next().await {
        Some(Ok(line)) => Ok(line),
        Some(Err(err)) => Err(err.into()),
        None => Err(TransportError::ConnectionClosed),
    }
}

/// Write one message and flush it.
///
/// Embedded line breaks are replaced with spaces so the text stays a single
/// frame.
pub async fn write_message<W>(writer: &mut W, text: &str) -> Result<(), TransportError>
where
    W: Sink<String, Error = LinesCodecError> + Unpin,
{
    let line = if text.contains(['\r', '\n']) {
        text.replace(['\r', '\n'], " ")
    } else {
        text.to_string()
    };
    writer.send(line).await.map_err(Into::into)
}
