//! Collaborator interfaces the controller and viewer report through.

use debate_protocol::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Plain,
    Markdown,
}

impl RenderMode {
    pub fn from_flag(markdown: bool) -> Self {
        if markdown {
            Self::Markdown
        } else {
            Self::Plain
        }
    }

    pub fn is_markdown(&self) -> bool {
        matches!(self, Self::Markdown)
    }

    #[must_use]
    pub fn toggled(&self) -> Self {
        match self {
            Self::Plain => Self::Markdown,
            Self::Markdown => Self::Plain,
        }
    }
}

/// Visual emphasis attached to a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Running,
    Error,
}

/// Draws one turn. Implementations decide what a displayed turn looks like.
pub trait RenderSink {
    fn render(&mut self, side: Side, content: &str, mode: RenderMode);

    /// Drops everything drawn so far.
    fn clear(&mut self) {}
}

pub trait StatusSink {
    fn report_status(&mut self, text: &str, tone: Option<StatusTone>);
}

/// Both surfaces a session reports to.
pub trait SessionSink: RenderSink + StatusSink {}

impl<T: RenderSink + StatusSink> SessionSink for T {}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&mut self, _side: Side, _content: &str, _mode: RenderMode) {}
}

impl StatusSink for NullSink {
    fn report_status(&mut self, _text: &str, _tone: Option<StatusTone>) {}
}
