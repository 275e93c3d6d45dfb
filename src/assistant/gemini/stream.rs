//! Server-sent event stream for `streamGenerateContent?alt=sse`

use anyhow::Result;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader};

use super::types::GenerateResponse;
use crate::assistant::fallback;
use crate::assistant::{ChatChunk, ToolCall};

/// Iterator over the `data:` payloads of an SSE response
pub(super) struct SseStream<R: std::io::Read> {
    reader: BufReader<R>,
    buffer: String,
}

impl<R: std::io::Read> SseStream<R> {
    pub(super) fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buffer: String::new(),
        }
    }
}

impl<R: std::io::Read> Iterator for SseStream<R> {
    type Item = Result<GenerateResponse>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();

            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {
                    let trimmed = self.buffer.trim();
                    // Blank separators, comments and `event:` lines carry nothing
                    let Some(data) = trimmed.strip_prefix("data:") else {
                        continue;
                    };
                    let data = data.trim();
                    if data.is_empty() || data == "[DONE]" {
                        continue;
                    }

                    return match serde_json::from_str::<GenerateResponse>(data) {
                        Ok(event) => Some(Ok(event)),
                        Err(e) => Some(Err(anyhow::anyhow!(
                            "Failed to parse event: {} (line: {})",
                            e,
                            data
                        ))),
                    };
                }
                Err(e) => return Some(Err(anyhow::anyhow!("Failed to read from stream: {}", e))),
            }
        }
    }
}

/// Flattens streamed responses into chat chunks.
///
/// Only the first function call of each event is surfaced, ahead of that
/// event's text. A broken stream ends with the connection error notice.
pub(super) struct ChunkStream<I> {
    events: I,
    pending: VecDeque<ChatChunk>,
    done: bool,
}

impl<I> ChunkStream<I>
where
    I: Iterator<Item = Result<GenerateResponse>>,
{
    pub(super) fn new(events: I) -> Self {
        Self {
            events,
            pending: VecDeque::new(),
            done: false,
        }
    }
}

impl<I> Iterator for ChunkStream<I>
where
    I: Iterator<Item = Result<GenerateResponse>>,
{
    type Item = ChatChunk;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(chunk) = self.pending.pop_front() {
                return Some(chunk);
            }
            if self.done {
                return None;
            }

            match self.events.next() {
                None => self.done = true,
                Some(Ok(event)) => {
                    if let Some(call) = event.function_calls().first() {
                        self.pending.push_back(ChatChunk::ToolCall(ToolCall {
                            name: call.name.clone(),
                            args: call.args.clone(),
                        }));
                    }
                    if let Some(text) = event.text() {
                        self.pending.push_back(ChatChunk::Text(text));
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Chat stream failed, using fallback");
                    self.done = true;
                    self.pending
                        .push_back(ChatChunk::Text(fallback::CHAT_ERROR.to_string()));
                }
            }
        }
    }
}
