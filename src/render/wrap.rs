//! Width-aware wrapping. ANSI SGR sequences occupy no columns.

use unicode_width::UnicodeWidthChar;

const ESC: char = '\u{1b}';

/// Terminal columns occupied by `text`, ignoring escape sequences.
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut escape = EscapeState::default();
    for ch in text.chars() {
        if escape.consume(ch) {
            continue;
        }
        width += ch.width().unwrap_or(0);
    }
    width
}

/// Greedy word wrap of a single line. Words wider than `width` are broken at
/// character boundaries, which also covers scripts written without spaces.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    if visible_width(line) <= width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split(' ') {
        let word_width = visible_width(word);
        let separator = usize::from(!current.is_empty());

        if current_width + separator + word_width <= width {
            if separator == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += separator + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        let mut pieces = split_by_width(word, width);
        if let Some(last) = pieces.pop() {
            lines.extend(pieces);
            current_width = visible_width(&last);
            current = last;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wraps every `\n`-separated line of `text`.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

fn split_by_width(word: &str, width: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    let mut escape = EscapeState::default();

    for ch in word.chars() {
        if escape.consume(ch) {
            current.push(ch);
            continue;
        }
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > width && current_width > 0 {
            pieces.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

#[derive(Default)]
struct EscapeState {
    in_escape: bool,
    in_csi: bool,
}

impl EscapeState {
    /// Returns true when `ch` belongs to an escape sequence.
    fn consume(&mut self, ch: char) -> bool {
        if self.in_csi {
            if ('@'..='~').contains(&ch) {
                self.in_csi = false;
            }
            return true;
        }
        if self.in_escape {
            self.in_escape = false;
            self.in_csi = ch == '[';
            return true;
        }
        if ch == ESC {
            self.in_escape = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{visible_width, wrap_line, wrap_text};

    #[test]
    fn visible_width_skips_sgr_and_counts_wide_glyphs() {
        assert_eq!(visible_width("\u{1b}[1mbold\u{1b}[0m"), 4);
        assert_eq!(visible_width("正方"), 4);
    }

    #[test]
    fn wraps_on_spaces() {
        assert_eq!(
            wrap_line("the quick brown fox", 10),
            vec!["the quick".to_string(), "brown fox".to_string()]
        );
    }

    #[test]
    fn breaks_text_without_spaces_by_column() {
        assert_eq!(
            wrap_line("人工智能将取代人类", 8),
            vec!["人工智能".to_string(), "将取代人".to_string(), "类".to_string()]
        );
    }

    #[test]
    fn keeps_empty_lines() {
        assert_eq!(wrap_text("a\n\nb", 5), vec!["a", "", "b"]);
    }
}
