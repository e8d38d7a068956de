//! Terminal presentation of turns and status lines.

pub mod bubble;
pub mod markdown;
pub mod wrap;

use std::io::Write;

use debate_protocol::Side;

use crate::sink::{RenderMode, RenderSink, StatusSink, StatusTone};

pub use bubble::render_bubble;
pub use markdown::{render_markdown, MarkdownTheme};

pub const DEFAULT_WIDTH: usize = 80;

/// [`SessionSink`](crate::sink::SessionSink) that writes to a terminal or any
/// other writer. Write failures are logged and otherwise ignored.
pub struct TerminalSink<W> {
    out: W,
    width: usize,
    theme: MarkdownTheme,
    color: bool,
    rendered: usize,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: DEFAULT_WIDTH,
            theme: MarkdownTheme::plain(),
            color: false,
            rendered: 0,
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Enables SGR styling for markdown and status lines.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self.theme = if color {
            MarkdownTheme::ansi()
        } else {
            MarkdownTheme::plain()
        };
        self
    }

    /// Turns rendered since the last clear.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines(&mut self, lines: &[String]) {
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(self.out, "{line}"))
            .and_then(|()| self.out.flush());
        if let Err(error) = result {
            tracing::warn!(%error, "failed to write to terminal");
        }
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn render(&mut self, side: Side, content: &str, mode: RenderMode) {
        let mut lines = render_bubble(side, content, mode, self.width, &self.theme);
        lines.push(String::new());
        self.write_lines(&lines);
        self.rendered += 1;
    }

    fn clear(&mut self) {
        if self.rendered > 0 {
            self.write_lines(&["─".repeat(self.width.min(DEFAULT_WIDTH))]);
        }
        self.rendered = 0;
    }
}

impl<W: Write> StatusSink for TerminalSink<W> {
    fn report_status(&mut self, text: &str, tone: Option<StatusTone>) {
        let line = match (tone, self.color) {
            (Some(StatusTone::Error), true) => format!("\u{1b}[31m» {text}\u{1b}[0m"),
            (Some(StatusTone::Running), true) => format!("\u{1b}[36m» {text}\u{1b}[0m"),
            _ => format!("» {text}"),
        };
        self.write_lines(&[line]);
    }
}
