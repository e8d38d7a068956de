use debate_protocol::{Side, TranscriptEntry};

use crate::clock::now_rfc3339;
use crate::turn::Turn;

/// Append-only ordered log of turns.
///
/// Insertion order is the only ordering. The store is owned by exactly one
/// live session or one loaded archive; `clear` and `replace` swap the whole
/// contents at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptStore {
    turns: Vec<Turn>,
}

impl TranscriptStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    /// Appends a turn stamped with the current time.
    pub fn append(&mut self, side: Side, content: impl Into<String>) -> &Turn {
        self.push(Turn::new(side, content, Some(now_rfc3339())))
    }

    pub fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        let last = self.turns.len() - 1;
        &self.turns[last]
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn replace(&mut self, turns: Vec<Turn>) {
        self.turns = turns;
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Ordered `{side, content}` pairs for a continuation request.
    #[must_use]
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.turns.iter().map(Turn::to_entry).collect()
    }
}

impl<'a> IntoIterator for &'a TranscriptStore {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
