use debate_api::DebateApiError;
use debate_protocol::ConfigError;
use thiserror::Error;
use transcript_store::DocumentError;

/// Message recorded when the body ends without a `done` or `error` event.
pub const INCOMPLETE_STREAM_MESSAGE: &str = "stream ended before the debate finished";

#[derive(Debug, Error)]
pub enum SessionError {
    /// An operation was requested from a state that does not permit it.
    #[error("{0}")]
    Precondition(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("transport error: {0}")]
    Transport(#[from] DebateApiError),

    /// Failure reported by the service through an `error` event.
    #[error("debate service error: {0}")]
    Protocol(String),

    #[error("{INCOMPLETE_STREAM_MESSAGE}")]
    IncompleteStream,

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl SessionError {
    /// One-line text suitable for the status surface.
    pub fn user_message(&self) -> String {
        match self {
            Self::Precondition(message) => (*message).to_string(),
            Self::Transport(error) => error.user_message(),
            Self::Protocol(message) => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Transport(error) if error.is_cancelled())
    }
}
