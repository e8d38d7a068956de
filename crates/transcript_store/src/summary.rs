use serde_json::Value;

use crate::document::ImportedDocument;

const NOT_PROVIDED: &str = "(not provided)";

/// Header shown above a loaded archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub topic: Option<String>,
    pub rounds: Option<u64>,
    pub message_count: usize,
    pub export_time: Option<String>,
    pub pro_model: Option<String>,
    pub con_model: Option<String>,
}

impl ArchiveSummary {
    /// Summary of `document` given the number of turns it normalized to.
    ///
    /// Missing or zero rounds fall back to `ceil(message_count / 2)`; missing export
    /// time falls back to the config's `start_time`.
    #[must_use]
    pub fn from_document(document: &ImportedDocument, message_count: usize) -> Self {
        let config = document.config();
        let config_str = |key: &str| {
            config
                .and_then(|config| config.get(key))
                .and_then(non_empty_str)
        };

        let topic = config_str("topic")
            .or_else(|| document.value().get("topic").and_then(non_empty_str));
        let rounds = config
            .and_then(|config| config.get("rounds"))
            .and_then(Value::as_u64)
            .filter(|rounds| *rounds > 0)
            .or_else(|| (message_count > 0).then(|| message_count.div_ceil(2) as u64));
        let export_time = document
            .export_time()
            .map(ToString::to_string)
            .or_else(|| config_str("start_time"));

        Self {
            topic,
            rounds,
            message_count,
            export_time,
            pro_model: config_str("pro_model"),
            con_model: config_str("con_model"),
        }
    }

    /// `label: value` rows in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Topic", display_or_missing(self.topic.as_deref())),
            (
                "Rounds",
                display_or_missing(self.rounds.map(|rounds| rounds.to_string()).as_deref()),
            ),
            ("Messages", self.message_count.to_string()),
            ("Exported", display_or_missing(self.export_time.as_deref())),
            ("Pro model", display_or_missing(self.pro_model.as_deref())),
            ("Con model", display_or_missing(self.con_model.as_deref())),
        ]
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

fn display_or_missing(value: Option<&str>) -> String {
    value.unwrap_or(NOT_PROVIDED).to_string()
}
