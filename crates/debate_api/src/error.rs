use std::fmt;

use reqwest::StatusCode;
use serde_json::Error as JsonError;

/// Fallback shown when a failed response carries no body text.
pub const GENERIC_FAILURE_MESSAGE: &str = "debate service returned an unexpected response";

#[derive(Debug)]
pub enum DebateApiError {
    InvalidBaseUrl(String),
    InvalidHeader(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    Serde(JsonError),
    /// The caller cancelled the request or stream. Not a transport failure.
    Cancelled,
}

impl DebateApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// User-facing one-line message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status(_, message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for DebateApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(value) => write!(f, "invalid base URL: {value}"),
            Self::InvalidHeader(message) => write!(f, "invalid header: {message}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::Serde(error) => write!(f, "serialization error: {error}"),
            Self::Cancelled => write!(f, "request was cancelled"),
        }
    }
}

impl std::error::Error for DebateApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(error) => Some(error),
            Self::Serde(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DebateApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for DebateApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

/// Message for a non-success response: the body text when present, otherwise
/// a generic fallback.
pub fn parse_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        trimmed.to_string()
    }
}
