use debate_protocol::{SessionConfig, TranscriptEntry};
use serde::{Deserialize, Serialize};

/// Request body for session start and continuation.
///
/// Model fields are always serialized (as `null` when unset); `transcript` is
/// present only on continuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateRequest {
    pub topic: String,
    pub pro_system: String,
    pub con_system: String,
    pub rounds: u32,
    pub temperature: f64,
    pub pro_model: Option<String>,
    pub con_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Vec<TranscriptEntry>>,
}

impl DebateRequest {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            topic: config.topic.clone(),
            pro_system: config.pro_system.clone(),
            con_system: config.con_system.clone(),
            rounds: config.rounds,
            temperature: config.temperature,
            pro_model: config.pro_model.clone(),
            con_model: config.con_model.clone(),
            transcript: None,
        }
    }

    /// Continuation payload carrying every prior turn in order.
    pub fn continuation(
        config: &SessionConfig,
        transcript: impl IntoIterator<Item = TranscriptEntry>,
    ) -> Self {
        Self {
            transcript: Some(transcript.into_iter().collect()),
            ..Self::new(config)
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.transcript.is_some()
    }

    pub fn prior_turns(&self) -> usize {
        self.transcript.as_ref().map_or(0, Vec::len)
    }
}
