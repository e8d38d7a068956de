//! Markdown to terminal lines, via the `markdown` crate's mdast.

use markdown::{mdast, to_mdast, ParseOptions};

use crate::render::wrap::wrap_text;

pub type StyleFn = fn(&str) -> String;

/// Styling applied to markdown constructs.
#[derive(Clone, Copy)]
pub struct MarkdownTheme {
    pub heading: StyleFn,
    pub bold: StyleFn,
    pub italic: StyleFn,
    pub strikethrough: StyleFn,
    pub code: StyleFn,
    pub link_url: StyleFn,
    pub quote_border: StyleFn,
    pub rule: StyleFn,
}

impl MarkdownTheme {
    /// No escape sequences; output is plain text.
    pub fn plain() -> Self {
        Self {
            heading: identity,
            bold: identity,
            italic: identity,
            strikethrough: identity,
            code: identity,
            link_url: identity,
            quote_border: identity,
            rule: identity,
        }
    }

    /// SGR styling for color terminals.
    pub fn ansi() -> Self {
        Self {
            heading: |text| sgr("1;36", text),
            bold: |text| sgr("1", text),
            italic: |text| sgr("3", text),
            strikethrough: |text| sgr("9", text),
            code: |text| sgr("33", text),
            link_url: |text| sgr("2", text),
            quote_border: |text| sgr("2", text),
            rule: |text| sgr("2", text),
        }
    }
}

impl Default for MarkdownTheme {
    fn default() -> Self {
        Self::plain()
    }
}

fn identity(text: &str) -> String {
    text.to_string()
}

fn sgr(code: &str, text: &str) -> String {
    format!("\u{1b}[{code}m{text}\u{1b}[0m")
}

/// Renders `text` as markdown wrapped to `width` columns. Unparseable input is
/// wrapped as plain text.
pub fn render_markdown(text: &str, width: usize, theme: &MarkdownTheme) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let normalized = text.replace('\t', "   ");
    let nodes = match to_mdast(&normalized, &ParseOptions::gfm()) {
        Ok(mdast::Node::Root(root)) => root.children,
        Ok(other) => vec![other],
        Err(error) => {
            tracing::debug!(%error, "markdown parse failed; rendering as plain text");
            return wrap_text(&normalized, width);
        }
    };

    let renderer = BlockRenderer { theme, width };
    let mut lines = Vec::new();
    for (index, node) in nodes.iter().enumerate() {
        if index > 0 && !matches!(node, mdast::Node::List(_)) {
            lines.push(String::new());
        }
        lines.extend(renderer.render_block(node));
    }

    lines
        .iter()
        .flat_map(|line| wrap_text(line, width))
        .collect()
}

struct BlockRenderer<'a> {
    theme: &'a MarkdownTheme,
    width: usize,
}

impl BlockRenderer<'_> {
    fn render_block(&self, node: &mdast::Node) -> Vec<String> {
        match node {
            mdast::Node::Heading(heading) => {
                let text = self.render_inline(&heading.children);
                let text = if heading.depth <= 2 {
                    text
                } else {
                    format!("{} {text}", "#".repeat(heading.depth as usize))
                };
                vec![(self.theme.heading)(&text)]
            }
            mdast::Node::Paragraph(paragraph) => split_lines(&self.render_inline(&paragraph.children)),
            mdast::Node::Code(code) => {
                let mut lines = vec![format!("```{}", code.lang.as_deref().unwrap_or_default())];
                lines.extend(
                    code.value
                        .split('\n')
                        .map(|line| format!("  {}", (self.theme.code)(line))),
                );
                lines.push("```".to_string());
                lines
            }
            mdast::Node::List(list) => self.render_list(list, 0),
            mdast::Node::Blockquote(quote) => {
                let border = (self.theme.quote_border)("│ ");
                quote
                    .children
                    .iter()
                    .flat_map(|child| self.render_block(child))
                    .map(|line| format!("{border}{line}"))
                    .collect()
            }
            mdast::Node::ThematicBreak(_) => vec![(self.theme.rule)(&"─".repeat(self.width.min(80)))],
            mdast::Node::Table(table) => table
                .children
                .iter()
                .filter_map(|row| match row {
                    mdast::Node::TableRow(row) => Some(
                        row.children
                            .iter()
                            .map(|cell| match cell {
                                mdast::Node::TableCell(cell) => self.render_inline(&cell.children),
                                _ => String::new(),
                            })
                            .collect::<Vec<_>>()
                            .join(" | "),
                    ),
                    _ => None,
                })
                .collect(),
            mdast::Node::Html(html) => split_lines(html.value.trim()),
            other => split_lines(&self.render_inline(std::slice::from_ref(other))),
        }
    }

    fn render_list(&self, list: &mdast::List, depth: usize) -> Vec<String> {
        let indent = "  ".repeat(depth);
        let start = list.start.unwrap_or(1);
        let mut lines = Vec::new();

        for (offset, node) in list.children.iter().enumerate() {
            let mdast::Node::ListItem(item) = node else {
                continue;
            };
            let bullet = if list.ordered {
                format!("{}. ", start + offset as u32)
            } else {
                "- ".to_string()
            };

            let mut first = true;
            for child in &item.children {
                if let mdast::Node::List(nested) = child {
                    lines.extend(self.render_list(nested, depth + 1));
                    continue;
                }
                for line in self.render_block(child) {
                    if first {
                        lines.push(format!("{indent}{bullet}{line}"));
                        first = false;
                    } else {
                        lines.push(format!("{indent}  {line}"));
                    }
                }
            }
            if first {
                lines.push(format!("{indent}{}", bullet.trim_end()));
            }
        }

        lines
    }

    fn render_inline(&self, nodes: &[mdast::Node]) -> String {
        let mut out = String::new();
        for node in nodes {
            match node {
                mdast::Node::Text(text) => out.push_str(&text.value),
                mdast::Node::Strong(strong) => {
                    out.push_str(&(self.theme.bold)(&self.render_inline(&strong.children)));
                }
                mdast::Node::Emphasis(emphasis) => {
                    out.push_str(&(self.theme.italic)(&self.render_inline(&emphasis.children)));
                }
                mdast::Node::Delete(delete) => {
                    out.push_str(&(self.theme.strikethrough)(&self.render_inline(&delete.children)));
                }
                mdast::Node::InlineCode(code) => out.push_str(&(self.theme.code)(&code.value)),
                mdast::Node::Link(link) => {
                    let label = self.render_inline(&link.children);
                    let href = link.url.strip_prefix("mailto:").unwrap_or(&link.url);
                    out.push_str(&label);
                    if label != link.url && label != href {
                        out.push_str(&(self.theme.link_url)(&format!(" ({})", link.url)));
                    }
                }
                mdast::Node::Image(image) => {
                    out.push_str(if image.alt.is_empty() { &image.url } else { &image.alt });
                }
                mdast::Node::Break(_) => out.push('\n'),
                mdast::Node::Html(html) => out.push_str(&html.value),
                mdast::Node::InlineMath(math) => out.push_str(&math.value),
                mdast::Node::Paragraph(paragraph) => out.push_str(&self.render_inline(&paragraph.children)),
                _ => {}
            }
        }
        out
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(ToString::to_string).collect()
}
