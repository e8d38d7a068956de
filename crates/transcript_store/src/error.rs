use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no JSON content provided")]
    EmptyInput,

    #[error("malformed JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("transcript is empty")]
    EmptyTranscript,

    #[error("failed to serialize export document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub fn is_malformed_json(&self) -> bool {
        matches!(self, Self::MalformedJson(_))
    }
}
