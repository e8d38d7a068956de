//! Normalization of externally supplied transcripts.
//!
//! Each field is resolved by an ordered list of pure extraction rules; the
//! first rule that yields a value wins. Entries that cannot produce a turn are
//! reported as skipped rather than failing the batch.

use debate_protocol::Side;
use serde_json::{Map, Value};

use crate::turn::Turn;

/// Keys searched, in order, for the transcript array of a document object.
pub const TRANSCRIPT_KEYS: [&str; 3] = ["transcript", "messages", "history"];

const CONTENT_KEYS: [&str; 3] = ["content", "text", "message"];

const PRO_WORDS: [&str; 2] = ["pro", "affirmative"];
const CON_WORDS: [&str; 4] = ["con", "opposing", "opposition", "negative"];
const PRO_GLYPH: char = '正';
const CON_GLYPH: char = '反';

type SideRule = fn(&Map<String, Value>, usize) -> Option<Side>;

const SIDE_RULES: [SideRule; 4] = [explicit_side, role_marker, speaker_marker, alternating_side];

/// Why an entry produced no turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotAnObject,
    MissingContent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub turns: Vec<Turn>,
    /// `(entry index, reason)` for each dropped entry.
    pub skipped: Vec<(usize, SkipReason)>,
}

pub struct ArchiveImporter;

impl ArchiveImporter {
    /// Normalized turns in input order. Never fails.
    pub fn normalize(value: &Value) -> Vec<Turn> {
        Self::normalize_report(value).turns
    }

    pub fn normalize_report(value: &Value) -> NormalizeReport {
        let mut report = NormalizeReport::default();
        let Some(entries) = Self::transcript_candidate(value) else {
            return report;
        };

        for (index, entry) in entries.iter().enumerate() {
            match Self::normalize_entry(entry, index) {
                Ok(turn) => report.turns.push(turn),
                Err(reason) => report.skipped.push((index, reason)),
            }
        }

        if !report.skipped.is_empty() {
            tracing::debug!(
                kept = report.turns.len(),
                skipped = report.skipped.len(),
                "archive entries skipped during normalization"
            );
        }
        report
    }

    /// The candidate transcript: the array itself, or the first array found
    /// under [`TRANSCRIPT_KEYS`].
    pub fn transcript_candidate(value: &Value) -> Option<&[Value]> {
        match value {
            Value::Array(items) => Some(items),
            Value::Object(map) => TRANSCRIPT_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
                .map(Vec::as_slice),
            _ => None,
        }
    }

    pub fn normalize_entry(entry: &Value, index: usize) -> Result<Turn, SkipReason> {
        let map = entry.as_object().ok_or(SkipReason::NotAnObject)?;
        let content = Self::resolve_content(map).ok_or(SkipReason::MissingContent)?;
        let side = Self::resolve_side(map, index);
        let timestamp = map
            .get("timestamp")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        Ok(Turn::new(side, content, timestamp))
    }

    pub fn resolve_side(entry: &Map<String, Value>, index: usize) -> Side {
        SIDE_RULES
            .iter()
            .find_map(|rule| rule(entry, index))
            .unwrap_or_else(|| Side::for_index(index))
    }

    /// First non-empty string among `content`, `text`, `message`.
    pub fn resolve_content(entry: &Map<String, Value>) -> Option<&str> {
        CONTENT_KEYS.iter().find_map(|key| {
            entry
                .get(*key)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
        })
    }

    /// Side named by a free-text label such as `正方`, `反方`, `Pro` or
    /// `Opposition speaker`. Affirmative markers are checked first.
    pub fn side_from_marker(label: &str) -> Option<Side> {
        let words: Vec<String> = label
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect();
        let has_word = |candidates: &[&str]| {
            words
                .iter()
                .any(|word| candidates.contains(&word.as_str()))
        };

        if label.contains(PRO_GLYPH) || has_word(&PRO_WORDS) {
            return Some(Side::Pro);
        }
        if label.contains(CON_GLYPH) || has_word(&CON_WORDS) {
            return Some(Side::Con);
        }
        None
    }
}

fn explicit_side(entry: &Map<String, Value>, _index: usize) -> Option<Side> {
    entry.get("side").and_then(Value::as_str).and_then(Side::parse)
}

fn role_marker(entry: &Map<String, Value>, _index: usize) -> Option<Side> {
    marker_field(entry, "role")
}

fn speaker_marker(entry: &Map<String, Value>, _index: usize) -> Option<Side> {
    marker_field(entry, "speaker")
}

fn alternating_side(_entry: &Map<String, Value>, index: usize) -> Option<Side> {
    Some(Side::for_index(index))
}

fn marker_field(entry: &Map<String, Value>, key: &str) -> Option<Side> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .and_then(ArchiveImporter::side_from_marker)
}
