use debate_protocol::Side;
use serde_json::Value;

use crate::events::ProtocolEvent;

const UNKNOWN_ERROR_MESSAGE: &str = "unknown error";

/// Incremental newline framer over a UTF-8 byte stream.
///
/// Only the current undelivered partial line is retained. A line is split on
/// `\n` at the byte level, so a multi-byte character cut by a chunk boundary is
/// reassembled before decoding.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: Vec<u8>,
}

impl LineFramer {
    /// Feed one chunk and drain every line it completes, in arrival order.
    /// Blank lines are skipped.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(split) = rest.iter().position(|byte| *byte == b'\n') {
            self.pending.extend_from_slice(&rest[..split]);
            rest = &rest[split + 1..];

            let line = decode_line(std::mem::take(&mut self.pending));
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }

        self.pending.extend_from_slice(rest);
        lines
    }

    /// Ends the stream, discarding any unterminated residue. Returns the number
    /// of discarded bytes.
    pub fn finish(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        discarded
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn decode_line(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(error) => String::from_utf8_lossy(error.as_bytes()).into_owned(),
    }
}

/// Parse one framed line into a protocol event.
///
/// Lines that are not JSON objects, or whose `type` is not recognized, yield
/// `None`. Never fails.
pub fn parse_event_line(line: &str) -> Option<ProtocolEvent> {
    let value = match serde_json::from_str::<Value>(line) {
        Ok(value) => value,
        Err(error) => {
            tracing::debug!(%error, line_len = line.len(), "dropping malformed stream line");
            return None;
        }
    };

    let event = map_event(&value);
    if event.is_none() {
        tracing::debug!(event_type = ?value.get("type"), "dropping unrecognized stream event");
    }
    event
}

fn map_event(value: &Value) -> Option<ProtocolEvent> {
    let event_type = value.get("type")?.as_str()?;

    match event_type {
        "message" => {
            let side = value
                .get("side")
                .and_then(|value| value.as_str())
                .and_then(Side::parse)?;
            let content = value.get("content")?.as_str()?;
            Some(ProtocolEvent::Message {
                side,
                content: content.to_owned(),
            })
        }
        "error" => {
            let message = value
                .get("message")
                .and_then(|value| value.as_str())
                .filter(|message| !message.trim().is_empty())
                .unwrap_or(UNKNOWN_ERROR_MESSAGE);
            Some(ProtocolEvent::Error {
                message: message.to_owned(),
            })
        }
        "done" => {
            let count = value.get("count").and_then(|value| value.as_u64());
            Some(ProtocolEvent::Done { count })
        }
        _ => None,
    }
}
