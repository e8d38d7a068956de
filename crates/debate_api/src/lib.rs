//! Transport-only client primitives for the debate streaming endpoint.
//!
//! This crate owns request building, response status handling, NDJSON line
//! framing and protocol event parsing. It contains no session lifecycle and no
//! rendering.
//!
//! The inbound body is newline-delimited JSON; each complete line is one
//! [`ProtocolEvent`]. Malformed or unrecognized lines are dropped without
//! interrupting the stream.

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod ndjson;
pub mod payload;
pub mod transport;
pub mod url;

pub use client::DebateApiClient;
pub use config::DebateApiConfig;
pub use error::DebateApiError;
pub use events::ProtocolEvent;
pub use ndjson::{parse_event_line, LineFramer};
pub use payload::DebateRequest;
pub use transport::{ChunkStream, DebateTransport, OpenFuture};
pub use url::normalize_debate_url;
