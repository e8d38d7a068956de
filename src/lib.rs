//! Client-side controller for streamed two-party debates.
//!
//! A [`SessionController`] opens one NDJSON stream at a time through a
//! [`DebateTransport`](debate_api::DebateTransport), appends each decoded turn
//! to its [`TranscriptStore`](transcript_store::TranscriptStore) and reports
//! through a [`SessionSink`]. Sessions can be stopped and later continued by
//! resubmitting the transcript. [`ArchiveViewer`] replays exported documents
//! without a connection.

pub mod archive;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod render;
pub mod sink;
pub mod state;
pub mod status;

pub use archive::ArchiveViewer;
pub use config::EnvConfig;
pub use controller::SessionController;
pub use error::SessionError;
pub use sink::{NullSink, RenderMode, RenderSink, SessionSink, StatusSink, StatusTone};
pub use state::{Controls, SessionState};
