//! Detail modal: one record's markdown document over the timeline.
//!
//! While a modal is open it holds a [`ScrollGuard`]; the timeline checks
//! [`ScrollGate::is_locked`] before scrolling its lanes. Dropping the modal
//! releases the guard on every exit path.

use crate::markdown;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::border;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use roadmap_core::document::DocumentState;
use roadmap_core::view::DetailRequest;
use std::cell::Cell;
use std::rc::Rc;

const PAGE: i32 = 10;

/// Shared count of open modals.
#[derive(Debug, Clone, Default)]
pub struct ScrollGate {
    holders: Rc<Cell<usize>>,
}

impl ScrollGate {
    /// Suppress background scrolling until the returned guard is dropped.
    #[must_use]
    pub fn lock(&self) -> ScrollGuard {
        self.holders.set(self.holders.get() + 1);
        ScrollGuard {
            holders: Rc::clone(&self.holders),
        }
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }
}

#[derive(Debug)]
pub struct ScrollGuard {
    holders: Rc<Cell<usize>>,
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        self.holders.set(self.holders.get().saturating_sub(1));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    Stay,
    Close,
}

#[derive(Debug)]
pub struct DetailModal {
    request: DetailRequest,
    scroll: u16,
    max_scroll: u16,
    _guard: ScrollGuard,
}

impl DetailModal {
    #[must_use]
    pub fn open(request: DetailRequest, gate: &ScrollGate) -> Self {
        Self {
            request,
            scroll: 0,
            max_scroll: u16::MAX,
            _guard: gate.lock(),
        }
    }

    #[must_use]
    pub const fn request(&self) -> &DetailRequest {
        &self.request
    }

    #[cfg(test)]
    pub const fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DetailAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return DetailAction::Close,
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
            KeyCode::Char('d') if ctrl => self.scroll_by(PAGE),
            KeyCode::Char('u') if ctrl => self.scroll_by(-PAGE),
            KeyCode::Char('f' | ' ') | KeyCode::PageDown => self.scroll_by(PAGE),
            KeyCode::Char('b') | KeyCode::PageUp => self.scroll_by(-PAGE),
            KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
            KeyCode::Char('G') | KeyCode::End => self.scroll = self.max_scroll,
            _ => {}
        }
        DetailAction::Stay
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.scroll).saturating_add(delta).max(0);
        self.scroll = u16::try_from(next)
            .unwrap_or(u16::MAX)
            .min(self.max_scroll);
    }

    /// Draw the modal centered in `area`, clamping scroll to the content.
    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect, document: &DocumentState) {
        let popup_w = area.width.saturating_sub(8).min(100);
        let popup_h = area.height.saturating_sub(4);
        let popup = Rect::new(
            area.x + area.width.saturating_sub(popup_w) / 2,
            area.y + area.height.saturating_sub(popup_h) / 2,
            popup_w,
            popup_h,
        );

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.request.title))
            .title_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .title_bottom(Line::from(vec![
                Span::styled(" Esc", Style::default().fg(Color::Cyan)),
                Span::styled(" close  ", Style::default().fg(Color::DarkGray)),
                Span::styled("j/k", Style::default().fg(Color::Cyan)),
                Span::styled(" scroll ", Style::default().fg(Color::DarkGray)),
            ]));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let body = Paragraph::new(body_text(document, inner.width)).wrap(Wrap { trim: false });
        // Scroll limit counts screen rows after wrapping, not source lines.
        let total = u16::try_from(body.line_count(inner.width)).unwrap_or(u16::MAX);
        self.max_scroll = total.saturating_sub(inner.height);
        self.scroll = self.scroll.min(self.max_scroll);

        frame.render_widget(body.scroll((self.scroll, 0)), inner);
    }
}

fn body_text(document: &DocumentState, width: u16) -> Text<'static> {
    match document {
        DocumentState::Loading => Text::from(Line::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )),
        DocumentState::Failed(message) => Text::from(Line::styled(
            format!("Error: {message}"),
            Style::default().fg(Color::Red),
        )),
        DocumentState::Ready(source) => markdown::render(source, width),
        DocumentState::Idle => Text::from(Line::styled(
            "No document for this item",
            Style::default().fg(Color::DarkGray),
        )),
    }
}
