use debate_protocol::Side;
use serde::{Deserialize, Serialize};

/// One protocol event decoded from a single NDJSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    /// A completed turn from one side.
    Message { side: Side, content: String },
    /// Service-reported failure; the session stays resumable.
    Error { message: String },
    /// Normal completion. `count` is the service's transcript length, when sent.
    Done {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u64>,
    },
}

impl ProtocolEvent {
    pub fn message(side: Side, content: impl Into<String>) -> Self {
        Self::Message {
            side,
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn done() -> Self {
        Self::Done { count: None }
    }
}
