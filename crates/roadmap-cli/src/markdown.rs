//! Markdown to styled terminal text.
//!
//! Walks `pulldown-cmark` events and builds ratatui [`Line`]s. The same output
//! backs the detail modal and, flattened with [`to_plain`], `roadmap show`.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const QUOTE_PREFIX: &str = "│ ";
const CODE_INDENT: &str = "    ";

/// Render `source` as styled lines. `rule_width` sizes horizontal rules.
#[must_use]
pub fn render(source: &str, rule_width: u16) -> Text<'static> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let mut state = RenderState::new(rule_width);
    state.process(Parser::new_ext(source, options));
    Text::from(state.finish())
}

/// Flatten styled text to plain lines.
#[must_use]
pub fn to_plain(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy)]
struct ListState {
    next_number: Option<u64>,
}

struct RenderState {
    rule_width: u16,
    lines: Vec<Line<'static>>,
    current_spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListState>,
    link_stack: Vec<String>,
    in_code_block: bool,
    blockquote_depth: usize,
    needs_blank: bool,
    pending_list_prefix: bool,
}

impl RenderState {
    fn new(rule_width: u16) -> Self {
        Self {
            rule_width,
            lines: Vec::new(),
            current_spans: Vec::new(),
            style_stack: Vec::new(),
            list_stack: Vec::new(),
            link_stack: Vec::new(),
            in_code_block: false,
            blockquote_depth: 0,
            needs_blank: false,
            pending_list_prefix: false,
        }
    }

    fn process<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag) => self.end_tag(tag),
                Event::Text(text) => self.text(&text),
                Event::Code(code) => {
                    self.push_span(code.to_string(), Style::default().fg(Color::Yellow));
                }
                Event::SoftBreak => self.push_span(" ".to_string(), self.current_style()),
                Event::HardBreak => self.flush_line(),
                Event::Rule => {
                    self.flush_blank();
                    let width = usize::from(self.rule_width.max(1));
                    self.lines.push(Line::styled(
                        "─".repeat(width),
                        Style::default().fg(Color::DarkGray),
                    ));
                    self.needs_blank = true;
                }
                Event::TaskListMarker(checked) => {
                    self.pending_list_prefix = false;
                    self.push_list_indent();
                    let marker = if checked { "[x] " } else { "[ ] " };
                    self.push_span(marker.to_string(), Style::default().fg(Color::Cyan));
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    self.push_span(html.to_string(), Style::default().fg(Color::DarkGray));
                }
                _ => {}
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_blank();
                self.style_stack.push(heading_style(level));
            }
            Tag::Paragraph => {
                if self.list_stack.is_empty() {
                    self.flush_blank();
                }
            }
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::CodeBlock(kind) => {
                self.flush_blank();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind
                    && !lang.is_empty()
                {
                    self.lines.push(Line::styled(
                        format!("{CODE_INDENT}[{lang}]"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                self.style_stack.push(Style::default().fg(Color::Yellow));
            }
            Tag::BlockQuote(_) => {
                self.flush_blank();
                self.blockquote_depth += 1;
                self.style_stack.push(
                    self.current_style()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::ITALIC),
                );
            }
            Tag::Link { dest_url, .. } => {
                self.link_stack.push(dest_url.to_string());
                self.style_stack.push(
                    self.current_style()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            Tag::List(start) => {
                if self.list_stack.is_empty() {
                    self.flush_blank();
                } else {
                    self.flush_line();
                }
                self.list_stack.push(ListState { next_number: start });
            }
            Tag::Item => {
                self.flush_line();
                self.pending_list_prefix = true;
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.style_stack.pop();
                self.flush_line();
                self.needs_blank = true;
            }
            TagEnd::Paragraph => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.needs_blank = true;
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.style_stack.pop();
            }
            TagEnd::CodeBlock => {
                self.style_stack.pop();
                self.flush_line();
                self.in_code_block = false;
                self.needs_blank = true;
            }
            TagEnd::BlockQuote(_) => {
                self.style_stack.pop();
                self.flush_line();
                self.blockquote_depth = self.blockquote_depth.saturating_sub(1);
                self.needs_blank = true;
            }
            TagEnd::Link => {
                self.style_stack.pop();
                if let Some(url) = self.link_stack.pop() {
                    let shown: String = self
                        .current_spans
                        .iter()
                        .map(|s| s.content.as_ref())
                        .collect();
                    if !url.is_empty() && !shown.ends_with(&url) {
                        self.push_span(format!(" <{url}>"), Style::default().fg(Color::DarkGray));
                    }
                }
            }
            TagEnd::List(_) => {
                self.list_stack.pop();
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.needs_blank = true;
                }
            }
            TagEnd::Item => self.flush_line(),
            TagEnd::TableCell => {
                self.push_span(" │ ".to_string(), Style::default().fg(Color::DarkGray));
            }
            TagEnd::TableHead | TagEnd::TableRow => self.flush_line(),
            TagEnd::Table => {
                self.flush_line();
                self.needs_blank = true;
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            let style = self.current_style();
            for line in text.lines() {
                self.push_span(format!("{CODE_INDENT}{line}"), style);
                self.flush_line();
            }
            return;
        }
        self.push_span(text.to_string(), self.current_style());
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        self.style_stack
            .push(self.current_style().add_modifier(modifier));
    }

    fn push_list_indent(&mut self) {
        let depth = self.list_stack.len().saturating_sub(1);
        if depth > 0 {
            self.push_span("  ".repeat(depth), Style::default());
        }
    }

    fn take_list_prefix(&mut self) {
        if !self.pending_list_prefix {
            return;
        }
        self.pending_list_prefix = false;
        self.push_list_indent();
        let bullet = match self.list_stack.last_mut() {
            Some(ListState {
                next_number: Some(n),
            }) => {
                let label = format!("{n}. ");
                *n += 1;
                label
            }
            _ => "• ".to_string(),
        };
        self.push_span(bullet, Style::default().fg(Color::Cyan));
    }

    fn push_span(&mut self, content: String, style: Style) {
        if self.current_spans.is_empty() && self.blockquote_depth > 0 {
            self.current_spans.push(Span::styled(
                QUOTE_PREFIX.repeat(self.blockquote_depth),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if self.pending_list_prefix {
            self.take_list_prefix();
        }
        self.current_spans.push(Span::styled(content, style));
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            let spans = std::mem::take(&mut self.current_spans);
            self.lines.push(Line::from(spans));
        }
    }

    fn flush_blank(&mut self) {
        self.flush_line();
        if self.needs_blank && !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.needs_blank = false;
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        self.lines
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => base.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => base.fg(Color::Cyan),
        _ => base.fg(Color::White),
    }
}
