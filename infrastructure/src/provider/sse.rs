//! Upstream SSE parsing.
//!
//! The provider streams `data: <json>` lines separated by blank lines and
//! ends with `data: [DONE]`. Network chunks do not line up with those lines:
//! one chunk may carry several events, and one event (or one multi-byte
//! character) may be split across chunks. [`SseLineBuffer`] buffers raw bytes
//! and only decodes complete lines.

use super::types::StreamChunkBody;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use relay_application::{FragmentStream, GatewayError};
use std::fmt::Display;
use std::time::Duration;
use tracing::trace;

/// A parsed SSE event from the upstream stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A `data:` payload (prefix stripped)
    Data(String),
    /// The `[DONE]` end-of-turn signal
    Done,
}

/// Line buffer that turns raw network chunks into SSE events.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buffer: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk, returning every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = parse_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Parse whatever is left once the upstream body has ended.
    pub fn flush(&mut self) -> Vec<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        parse_line(&rest).into_iter().collect()
    }
}

fn parse_line(raw: &[u8]) -> Option<SseEvent> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim();

    // Blank separators, comments and non-data fields (event:, id:, retry:)
    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() {
        return None;
    }
    if data == "[DONE]" {
        return Some(SseEvent::Done);
    }
    Some(SseEvent::Data(data.to_string()))
}

/// What one upstream data event means for the fragment stream.
enum ChunkAction {
    Emit(String),
    EmitAndFinish(Option<String>),
    Skip,
}

fn interpret(data: &str) -> Result<ChunkAction, GatewayError> {
    let chunk: StreamChunkBody = serde_json::from_str(data)
        .map_err(|e| GatewayError::Parse(format!("{e}: {data}")))?;

    if let Some(error) = chunk.error {
        return Err(GatewayError::Stream(error.message));
    }

    let Some(choice) = chunk.choices.into_iter().next() else {
        return Ok(ChunkAction::Skip);
    };
    let content = choice.delta.content.filter(|c| !c.is_empty());

    Ok(match (content, choice.finish_reason.is_some()) {
        (content, true) => ChunkAction::EmitAndFinish(content),
        (Some(content), false) => ChunkAction::Emit(content),
        (None, false) => ChunkAction::Skip,
    })
}

/// Turn an upstream SSE byte stream into a stream of text fragments.
///
/// Each wait for the next network chunk is bounded by `idle_timeout`.
/// The stream ends on `[DONE]`, on a `finish_reason`, or when the body ends;
/// any failure is yielded once as a terminal error.
pub(crate) fn fragment_stream<S, E>(bytes: S, idle_timeout: Duration) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let fragments = async_stream::stream! {
        let mut bytes = Box::pin(bytes);
        let mut buffer = SseLineBuffer::new();

        loop {
            let next = match tokio::time::timeout(idle_timeout, bytes.next()).await {
                Ok(next) => next,
                Err(_) => {
                    yield Err(GatewayError::Timeout);
                    return;
                }
            };

            let (events, body_ended) = match next {
                Some(Ok(chunk)) => (buffer.feed(&chunk), false),
                Some(Err(e)) => {
                    yield Err(GatewayError::Stream(e.to_string()));
                    return;
                }
                None => (buffer.flush(), true),
            };

            for event in events {
                let data = match event {
                    SseEvent::Done => {
                        trace!("Upstream signalled [DONE]");
                        return;
                    }
                    SseEvent::Data(data) => data,
                };

                match interpret(&data) {
                    Ok(ChunkAction::Emit(content)) => yield Ok(content),
                    Ok(ChunkAction::EmitAndFinish(content)) => {
                        if let Some(content) = content {
                            yield Ok(content);
                        }
                        return;
                    }
                    Ok(ChunkAction::Skip) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }

            if body_ended {
                return;
            }
        }
    };

    Box::pin(fragments)
}
