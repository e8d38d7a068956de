//! Shared contract types for a two-party debate session.
//!
//! This crate defines only the participant identity, the immutable session
//! configuration and the wire-level transcript pair. It excludes transport,
//! framing and persistence concerns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of rounds requested from the debate service.
pub const DEFAULT_ROUNDS: u32 = 4;
/// Default sampling temperature requested from the debate service.
pub const DEFAULT_TEMPERATURE: f64 = 1.0;
/// Inclusive temperature range accepted by the debate service.
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 2.0);

/// Participant identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Affirmative.
    Pro,
    /// Opposing.
    Con,
}

impl Side {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "pro" => Self::Pro,
            "con" => Self::Con,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pro => "pro",
            Self::Con => "con",
        }
    }

    /// Role label used in exported transcripts.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Pro => "正方",
            Self::Con => "反方",
        }
    }

    /// Single-glyph avatar shown next to a rendered turn.
    pub fn avatar(&self) -> &'static str {
        match self {
            Self::Pro => "正",
            Self::Con => "反",
        }
    }

    /// Side that speaks at a zero-based position when turns strictly alternate.
    #[must_use]
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Pro
        } else {
            Self::Con
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prior turn resubmitted on continuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub side: Side,
    pub content: String,
}

impl TranscriptEntry {
    #[must_use]
    pub fn new(side: Side, content: impl Into<String>) -> Self {
        Self {
            side,
            content: content.into(),
        }
    }
}

/// Reason a [`SessionConfig`] cannot start a session.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyTopic,
    InvalidRounds(u32),
    InvalidTemperature(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTopic => write!(f, "Please enter a debate topic."),
            Self::InvalidRounds(value) => write!(f, "rounds must be at least 1, got {value}"),
            Self::InvalidTemperature(value) => write!(
                f,
                "temperature must be between {} and {}, got {value}",
                TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Session parameters, immutable once a session starts and reused verbatim on
/// continuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub topic: String,
    #[serde(default)]
    pub pro_system: String,
    #[serde(default)]
    pub con_system: String,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default)]
    pub pro_model: Option<String>,
    #[serde(default)]
    pub con_model: Option<String>,
}

fn default_rounds() -> u32 {
    DEFAULT_ROUNDS
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

impl SessionConfig {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            pro_system: String::new(),
            con_system: String::new(),
            rounds: DEFAULT_ROUNDS,
            temperature: DEFAULT_TEMPERATURE,
            pro_model: None,
            con_model: None,
        }
    }

    pub fn with_pro_system(mut self, prompt: impl Into<String>) -> Self {
        self.pro_system = prompt.into();
        self
    }

    pub fn with_con_system(mut self, prompt: impl Into<String>) -> Self {
        self.con_system = prompt.into();
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_pro_model(mut self, model: impl Into<String>) -> Self {
        self.pro_model = Some(model.into());
        self
    }

    pub fn with_con_model(mut self, model: impl Into<String>) -> Self {
        self.con_model = Some(model.into());
        self
    }

    /// Trims free-text fields and maps blank model names to `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            topic: self.topic.trim().to_owned(),
            pro_system: self.pro_system.trim().to_owned(),
            con_system: self.con_system.trim().to_owned(),
            rounds: self.rounds,
            temperature: self.temperature,
            pro_model: non_blank(self.pro_model),
            con_model: non_blank(self.con_model),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topic.trim().is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        if self.rounds == 0 {
            return Err(ConfigError::InvalidRounds(self.rounds));
        }
        let (min, max) = TEMPERATURE_RANGE;
        if !self.temperature.is_finite() || self.temperature < min || self.temperature > max {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        Ok(())
    }

    /// Number of turns the service produces for the configured rounds.
    #[must_use]
    pub fn total_turns(&self) -> usize {
        self.rounds as usize * 2
    }

    /// Model configured for one side, if any.
    pub fn model_for(&self, side: Side) -> Option<&str> {
        match side {
            Side::Pro => self.pro_model.as_deref(),
            Side::Con => self.con_model.as_deref(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
