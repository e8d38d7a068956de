use debate_protocol::Side;

use crate::render::markdown::{render_markdown, MarkdownTheme};
use crate::render::wrap::{visible_width, wrap_text};
use crate::sink::RenderMode;

const GUTTER: &str = "│ ";
const GUTTER_WIDTH: usize = 2;

/// Lines for one turn: a header naming the side, then the body behind a
/// gutter. The pro header is right-aligned, the con header left-aligned.
pub fn render_bubble(
    side: Side,
    content: &str,
    mode: RenderMode,
    width: usize,
    theme: &MarkdownTheme,
) -> Vec<String> {
    let body_width = width.saturating_sub(GUTTER_WIDTH).max(1);
    let body = match mode {
        RenderMode::Plain => wrap_text(content, body_width),
        RenderMode::Markdown => render_markdown(content, body_width, theme),
    };

    let mut lines = Vec::with_capacity(body.len() + 1);
    lines.push(header(side, width));
    lines.extend(body.into_iter().map(|line| format!("{GUTTER}{line}")));
    lines
}

fn header(side: Side, width: usize) -> String {
    let label = format!("[{}] {}", side.avatar(), side.marker());
    match side {
        Side::Con => label,
        Side::Pro => {
            let pad = width.saturating_sub(visible_width(&label));
            format!("{}{label}", " ".repeat(pad))
        }
    }
}
