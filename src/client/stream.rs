use bytes::{Buf, BufMut, BytesMut};
use futures_util::{Stream, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{Receiver, Sender};
use tracing::{debug, error, trace};

use super::{errors::GenerationError, gemini::GenerateResponse};

const DATA_PREFIX: &[u8] = b"data:";

/// Handle a server-sent events stream from Gemini. Use channels to communicate with the
/// caller and write the content to the `writer`.
pub trait Streamer: Clone + Send {
    /// Write the received text until the channel closes
    fn write_at_end(
        &self,
        writer: &mut (impl tokio::io::AsyncWrite + Unpin + Send),
        receiver: Receiver<String>,
    ) -> impl std::future::Future<Output = Result<(), GenerationError>> + Send;

    /// Collect the whole answer while forwarding every text delta through `sender`.
    /// Bytes of an event that is not complete yet stay in the buffer until the rest arrives.
    async fn handle_stream(
        &self,
        mut stream: impl Stream<Item = reqwest::Result<bytes::Bytes>> + Unpin,
        sender: Sender<String>,
    ) -> Result<String, GenerationError> {
        let mut response = String::new();

        debug!("Opening stream");
        let mut buffer = BytesMut::with_capacity(8192);
        while let Some(chunk) = stream.next().await {
            trace!(?chunk, "processing");
            let chunk = chunk?;
            buffer.put_slice(&chunk);

            if let Some((deltas, advance)) = self.process_buffer(&buffer)? {
                buffer.advance(advance);
                for delta in deltas {
                    response.push_str(&delta);
                    sender
                        .send(delta)
                        .await
                        .map_err(|e| GenerationError::Stream(e.to_string()))?;
                }
            }
        }

        // The last event may come without a trailing separator
        if !buffer.is_empty() {
            if let Some(delta) = parse_event(&buffer)? {
                response.push_str(&delta);
                sender
                    .send(delta)
                    .await
                    .map_err(|e| GenerationError::Stream(e.to_string()))?;
            }
        }

        if response.is_empty() {
            return Err(GenerationError::Empty);
        }

        Ok(response)
    }

    /// Process the complete events of the buffer.
    /// Return their text deltas and how many bytes were consumed.
    fn process_buffer(&self, buffer: &[u8]) -> Result<Option<(Vec<String>, usize)>, GenerationError> {
        if buffer.is_empty() {
            return Ok(None);
        }

        let mut deltas = Vec::new();
        let mut pos = 0;

        while let Some((event_end, separator_len)) = find_separator(&buffer[pos..]) {
            if let Some(delta) = parse_event(&buffer[pos..pos + event_end])? {
                deltas.push(delta);
            }
            pos += event_end + separator_len;
        }

        if pos == 0 {
            Ok(None)
        } else {
            Ok(Some((deltas, pos)))
        }
    }
}

/// Position and length of the first blank line (`\n\n` or `\r\n\r\n`)
fn find_separator(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|p| (p, 2));
    let crlf = buffer.windows(4).position(|w| w == b"\r\n\r\n").map(|p| (p, 4));

    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 < b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Text delta of one event; `None` for comments, keep-alives and empty deltas
fn parse_event(event: &[u8]) -> Result<Option<String>, GenerationError> {
    let mut data = Vec::new();
    for line in event.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
            data.extend_from_slice(payload.strip_prefix(b" ").unwrap_or(payload));
        }
    }

    if data.is_empty() {
        return Ok(None);
    }

    match serde_json::from_slice::<GenerateResponse>(&data) {
        Ok(resp) => {
            let text = resp.text();
            if text.is_empty() {
                if let Some(reason) = resp.block_reason() {
                    return Err(GenerationError::Blocked(reason.to_string()));
                }
                return Ok(None);
            }
            Ok(Some(text))
        }
        Err(e) => {
            error!("Failed to parse event as JSON: {}", String::from_utf8_lossy(&data));
            Err(e.into())
        }
    }
}

/// Write the stream to the terminal as it arrives
#[derive(Clone)]
pub struct ResponseStreamer;

impl Streamer for ResponseStreamer {
    async fn write_at_end(
        &self,
        writer: &mut (impl tokio::io::AsyncWrite + Unpin + Send),
        mut receiver: Receiver<String>,
    ) -> Result<(), GenerationError> {
        while let Some(content) = receiver.recv().await {
            writer
                .write_all(content.as_bytes())
                .await
                .map_err(|e| GenerationError::Stream(e.to_string()))?;
            writer
                .flush()
                .await
                .map_err(|e| GenerationError::Stream(e.to_string()))?;
        }

        debug!("End of streaming");
        Ok(())
    }
}
