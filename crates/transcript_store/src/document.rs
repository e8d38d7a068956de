use std::fs;
use std::path::Path;

use debate_protocol::{SessionConfig, Side};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::archive::{ArchiveImporter, NormalizeReport};
use crate::clock::now_rfc3339;
use crate::error::DocumentError;
use crate::turn::Turn;

/// File name used when re-exporting a loaded archive.
pub const ARCHIVE_EXPORT_FILE_NAME: &str = "debate_replay.json";

/// Turn as written to an export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedTurn {
    pub side: Side,
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<&Turn> for ExportedTurn {
    fn from(turn: &Turn) -> Self {
        Self {
            side: turn.side,
            role: turn.side.marker().to_string(),
            content: turn.content.clone(),
            timestamp: turn.timestamp.clone(),
        }
    }
}

/// Portable `{config, transcript}` snapshot.
///
/// `total_rounds` is the number of exported turns, not the configured round
/// count; existing readers depend on that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub config: Value,
    pub transcript: Vec<ExportedTurn>,
    pub export_time: String,
    pub total_rounds: usize,
}

pub struct DocumentCodec;

impl DocumentCodec {
    /// Snapshot of a live session. `start_time` is recorded inside `config`.
    pub fn export(
        config: &SessionConfig,
        start_time: Option<&str>,
        transcript: &[Turn],
    ) -> Result<ExportDocument, DocumentError> {
        let mut config = serde_json::to_value(config).map_err(DocumentError::Serialize)?;
        if let (Some(start_time), Value::Object(map)) = (start_time, &mut config) {
            map.insert("start_time".to_string(), Value::String(start_time.to_string()));
        }
        Self::export_with_config(config, transcript)
    }

    /// Snapshot with an arbitrary config object, as carried by a loaded archive.
    pub fn export_with_config(
        config: Value,
        transcript: &[Turn],
    ) -> Result<ExportDocument, DocumentError> {
        if transcript.is_empty() {
            return Err(DocumentError::EmptyTranscript);
        }

        Ok(ExportDocument {
            config,
            transcript: transcript.iter().map(ExportedTurn::from).collect(),
            export_time: now_rfc3339(),
            total_rounds: transcript.len(),
        })
    }

    pub fn to_json_pretty(document: &ExportDocument) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(document).map_err(DocumentError::Serialize)
    }

    /// Parses document text. Shape is not validated here; see
    /// [`ImportedDocument::normalize`].
    pub fn import(text: &str) -> Result<ImportedDocument, DocumentError> {
        if text.trim().is_empty() {
            return Err(DocumentError::EmptyInput);
        }
        let value = serde_json::from_str::<Value>(text).map_err(DocumentError::MalformedJson)?;
        Ok(ImportedDocument::from_value(value))
    }

    pub fn write_to(path: &Path, document: &ExportDocument) -> Result<(), DocumentError> {
        let json = Self::to_json_pretty(document)?;
        fs::write(path, json)
            .map_err(|source| DocumentError::io("writing export document", path, source))
    }

    pub fn read_from(path: &Path) -> Result<ImportedDocument, DocumentError> {
        let text = fs::read_to_string(path)
            .map_err(|source| DocumentError::io("reading document", path, source))?;
        Self::import(&text)
    }
}

/// Parsed, not yet normalized, document. A bare array is held as
/// `{"transcript": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedDocument {
    value: Value,
}

impl ImportedDocument {
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let value = match value {
            Value::Array(items) => {
                let mut map = Map::new();
                map.insert("transcript".to_string(), Value::Array(items));
                Value::Object(map)
            }
            other => other,
        };
        Self { value }
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn config(&self) -> Option<&Map<String, Value>> {
        self.value.get("config").and_then(Value::as_object)
    }

    /// The config object as loaded, or `{}`.
    #[must_use]
    pub fn config_value(&self) -> Value {
        self.config()
            .map(|config| Value::Object(config.clone()))
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    pub fn export_time(&self) -> Option<&str> {
        self.value
            .get("export_time")
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    #[must_use]
    pub fn normalize(&self) -> NormalizeReport {
        ArchiveImporter::normalize_report(&self.value)
    }
}

/// Download name for a live export: `debate_<topic>_<millis>.json`.
pub fn export_file_name(topic: &str, unix_millis: i128) -> String {
    let topic = topic.trim();
    let topic = if topic.is_empty() { "record" } else { topic };
    let sanitized: String = topic
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect();
    format!("debate_{sanitized}_{unix_millis}.json")
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, ImportedDocument};
    use serde_json::json;

    #[test]
    fn export_file_name_sanitizes_path_separators() {
        assert_eq!(
            export_file_name("AI/ML: good?", 1700000000000),
            "debate_AI_ML_ good__1700000000000.json"
        );
        assert_eq!(export_file_name("  ", 5), "debate_record_5.json");
    }

    #[test]
    fn bare_arrays_are_wrapped_as_transcript() {
        let document = ImportedDocument::from_value(json!([{"text": "Hello"}]));
        assert_eq!(document.value(), &json!({"transcript": [{"text": "Hello"}]}));
        assert_eq!(document.config_value(), json!({}));
        assert_eq!(document.export_time(), None);
    }
}
