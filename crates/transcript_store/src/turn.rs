use debate_protocol::{Side, TranscriptEntry};
use serde::{Deserialize, Serialize};

/// One side's single contribution to the debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub side: Side,
    pub content: String,
    /// RFC 3339 time the turn was received. Always set for live turns; may be
    /// absent on turns normalized from archives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Turn {
    #[must_use]
    pub fn new(side: Side, content: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            side,
            content: content.into(),
            timestamp,
        }
    }

    /// The `{side, content}` pair resubmitted on continuation.
    #[must_use]
    pub fn to_entry(&self) -> TranscriptEntry {
        TranscriptEntry::new(self.side, self.content.clone())
    }
}
