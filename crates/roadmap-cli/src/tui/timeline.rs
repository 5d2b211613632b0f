//! Interactive timeline: owner lanes, month axis, filters and the detail
//! modal.
//!
//! All state lives in the [`TimelineView`]; every frame reads a fresh
//! snapshot, so key handlers only mutate state and never touch layout.

use super::detail::{DetailAction, DetailModal, ScrollGate};
use crate::gantt::{bar_columns, short_date, status_color, tick_column};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::border;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use roadmap_core::document::DocumentLoader;
use roadmap_core::filter::Selection;
use roadmap_core::layout::PositionedItem;
use roadmap_core::model::Status;
use roadmap_core::view::{EMPTY_MESSAGE, TimelineSnapshot, TimelineView};
use std::time::{Duration, Instant};
use tracing::debug;

/// Days moved by one pan or zoom step.
const WINDOW_STEP_DAYS: i64 = 7;
/// Row spacing change per key press, and the pixels that make one line.
const SPACING_STEP: u32 = 40;
const MIN_LANE_LINES: u32 = 3;
const LABEL_MAX: usize = 20;
const WHEEL_LINES: i32 = 3;
const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Normal,
    /// Status/owner filter popup is open.
    FilterPopup,
    /// Typing window start/end dates.
    WindowEditor,
    /// Help overlay is open.
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FilterField {
    #[default]
    Status,
    Owner,
}

impl FilterField {
    const fn toggle(self) -> Self {
        match self {
            Self::Status => Self::Owner,
            Self::Owner => Self::Status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum WindowField {
    #[default]
    Start,
    End,
}

impl WindowField {
    const fn toggle(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Terminal lines per lane for a row spacing in pixels.
fn lane_lines(row_spacing: u32) -> u16 {
    u16::try_from((row_spacing / SPACING_STEP).max(MIN_LANE_LINES)).unwrap_or(u16::MAX)
}

/// Item indices ordered by lane, then left edge.
fn display_order(snapshot: &TimelineSnapshot) -> Vec<usize> {
    let mut order: Vec<usize> = (0..snapshot.items.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&snapshot.items[a], &snapshot.items[b]);
        a.row
            .cmp(&b.row)
            .then_with(|| a.left_percent.total_cmp(&b.left_percent))
    });
    order
}

#[derive(Debug)]
pub struct TimelineApp {
    view: TimelineView,
    loader: DocumentLoader,
    gate: ScrollGate,
    detail: Option<DetailModal>,
    selected: Option<String>,
    lane_scroll: usize,
    visible_lanes: usize,
    input_mode: InputMode,
    filter_field: FilterField,
    window_field: WindowField,
    start_buf: String,
    end_buf: String,
    status_msg: Option<(String, Instant)>,
    should_quit: bool,
}

impl TimelineApp {
    #[must_use]
    pub fn new(view: TimelineView, loader: DocumentLoader) -> Self {
        let mut app = Self {
            view,
            loader,
            gate: ScrollGate::default(),
            detail: None,
            selected: None,
            lane_scroll: 0,
            visible_lanes: 0,
            input_mode: InputMode::Normal,
            filter_field: FilterField::Status,
            window_field: WindowField::Start,
            start_buf: String::new(),
            end_buf: String::new(),
            status_msg: None,
            should_quit: false,
        };
        app.sync_selection();
        app
    }

    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_msg = Some((msg, Instant::now()));
    }

    /// Per-frame housekeeping: collect finished document fetches.
    pub fn tick(&mut self) {
        if self.loader.poll() {
            debug!("detail document updated");
        }
        if self
            .status_msg
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= STATUS_TTL)
        {
            self.status_msg = None;
        }
    }

    // -----------------------------------------------------------------------
    // Selection and scrolling
    // -----------------------------------------------------------------------

    /// Keep the selection on a shown item, falling back to the first one.
    fn sync_selection(&mut self) {
        let snapshot = self.view.snapshot();
        let still_shown = self
            .selected
            .as_ref()
            .is_some_and(|id| snapshot.items.iter().any(|i| &i.record.id == id));
        if !still_shown {
            self.selected = display_order(&snapshot)
                .first()
                .map(|&i| snapshot.items[i].record.id.clone());
        }
        let max_scroll = snapshot
            .row_labels
            .len()
            .saturating_sub(self.visible_lanes.max(1));
        self.lane_scroll = self.lane_scroll.min(max_scroll);
    }

    fn move_selection(&mut self, delta: isize) {
        let snapshot = self.view.snapshot();
        let order = display_order(&snapshot);
        let Some(last) = order.len().checked_sub(1) else {
            self.selected = None;
            return;
        };
        let current = self.selected.as_ref().and_then(|id| {
            order
                .iter()
                .position(|&i| &snapshot.items[i].record.id == id)
        });
        let next = current.map_or(0, |p| p.saturating_add_signed(delta).min(last));
        let item = &snapshot.items[order[next]];
        self.selected = Some(item.record.id.clone());
        self.ensure_lane_visible(item.row);
    }

    fn ensure_lane_visible(&mut self, row: usize) {
        let visible = self.visible_lanes.max(1);
        if row < self.lane_scroll {
            self.lane_scroll = row;
        } else if row >= self.lane_scroll + visible {
            self.lane_scroll = row + 1 - visible;
        }
    }

    /// Scroll the lane area. Does nothing while a modal holds the gate.
    fn scroll_lanes(&mut self, delta: isize) {
        if self.gate.is_locked() {
            debug!("background scroll suppressed by open modal");
            return;
        }
        let rows = self.view.snapshot().row_labels.len();
        let max_scroll = rows.saturating_sub(self.visible_lanes.max(1));
        self.lane_scroll = self
            .lane_scroll
            .saturating_add_signed(delta)
            .min(max_scroll);
    }

    fn half_page(&self) -> isize {
        isize::try_from((self.visible_lanes / 2).max(1)).unwrap_or(1)
    }

    // -----------------------------------------------------------------------
    // Detail modal
    // -----------------------------------------------------------------------

    fn open_detail(&mut self) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        match self.view.select(&id) {
            Ok(request) => {
                self.loader.request(&request.reference);
                self.detail = Some(DetailModal::open(request, &self.gate));
            }
            Err(err) => self.set_status(err.to_string()),
        }
    }

    fn close_detail(&mut self) {
        if let Some(modal) = self.detail.take() {
            debug!(id = %modal.request().id, "detail modal closed");
        }
        self.view.close_detail();
        self.loader.cancel();
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(modal) = self.detail.as_mut() {
            if modal.handle_key(key) == DetailAction::Close {
                self.close_detail();
            }
            return;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::FilterPopup => self.handle_filter_popup_key(key),
            InputMode::WindowEditor => self.handle_window_editor_key(key),
            InputMode::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('?' | 'q') | KeyCode::Enter
                ) {
                    self.input_mode = InputMode::Normal;
                }
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,

            KeyCode::Char('d') if ctrl => self.scroll_lanes(self.half_page()),
            KeyCode::Char('u') if ctrl => self.scroll_lanes(-self.half_page()),
            KeyCode::PageDown => self.scroll_lanes(self.half_page() * 2),
            KeyCode::PageUp => self.scroll_lanes(-self.half_page() * 2),

            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.move_selection(isize::MIN),
            KeyCode::Char('G') | KeyCode::End => self.move_selection(isize::MAX),
            KeyCode::Enter | KeyCode::Char('o') => self.open_detail(),

            KeyCode::Char('F' | 'f') => self.input_mode = InputMode::FilterPopup,
            KeyCode::Char('w') => self.open_window_editor(),
            KeyCode::Char('?') => self.input_mode = InputMode::Help,

            KeyCode::Char('[' | 'h') | KeyCode::Left => {
                self.view.state_mut().shift_window(-WINDOW_STEP_DAYS);
                self.sync_selection();
            }
            KeyCode::Char(']' | 'l') | KeyCode::Right => {
                self.view.state_mut().shift_window(WINDOW_STEP_DAYS);
                self.sync_selection();
            }
            KeyCode::Char('-') => {
                self.view.state_mut().zoom_window(WINDOW_STEP_DAYS);
                self.sync_selection();
            }
            KeyCode::Char('+' | '=') => {
                self.view.state_mut().zoom_window(-WINDOW_STEP_DAYS);
                self.sync_selection();
            }
            KeyCode::Char('<') => self.step_spacing(false),
            KeyCode::Char('>') => self.step_spacing(true),
            KeyCode::Char('r') => {
                self.view.state_mut().reset();
                self.lane_scroll = 0;
                self.sync_selection();
                self.set_status("View reset".to_string());
            }
            _ => {}
        }
    }

    fn step_spacing(&mut self, wider: bool) {
        let state = self.view.state_mut();
        let current = state.row_spacing();
        let target = if wider {
            current.saturating_add(SPACING_STEP)
        } else {
            current.saturating_sub(SPACING_STEP)
        };
        let px = state.set_row_spacing(target);
        self.sync_selection();
        self.set_status(format!("Row spacing {px}px"));
    }

    fn handle_filter_popup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('F' | 'f' | 'q') => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Char('j' | 'k') => {
                self.filter_field = self.filter_field.toggle();
            }
            KeyCode::Right | KeyCode::Char('l' | ' ') => self.cycle_filter(true),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_filter(false),
            KeyCode::Backspace | KeyCode::Char('x') => {
                match self.filter_field {
                    FilterField::Status => self.view.state_mut().set_status_selection(Selection::All),
                    FilterField::Owner => self.view.state_mut().set_owner_selection(Selection::All),
                }
                self.sync_selection();
            }
            _ => {}
        }
    }

    fn cycle_filter(&mut self, forward: bool) {
        let state = self.view.state_mut();
        match self.filter_field {
            FilterField::Status => {
                let options: Vec<String> = state
                    .statuses()
                    .into_iter()
                    .map(|s| s.as_str().to_string())
                    .collect();
                let current = &state.filter().status;
                let next = if forward {
                    current.cycle_next(&options)
                } else {
                    current.cycle_prev(&options)
                };
                state.set_status_selection(next);
            }
            FilterField::Owner => {
                let options = state.owners();
                let current = &state.filter().owner;
                let next = if forward {
                    current.cycle_next(&options)
                } else {
                    current.cycle_prev(&options)
                };
                state.set_owner_selection(next);
            }
        }
        self.sync_selection();
    }

    fn open_window_editor(&mut self) {
        let window = self.view.state().window();
        self.start_buf = window.start.to_string();
        self.end_buf = window.end.to_string();
        self.window_field = WindowField::Start;
        self.input_mode = InputMode::WindowEditor;
    }

    fn handle_window_editor_key(&mut self, key: KeyEvent) {
        let buf = match self.window_field {
            WindowField::Start => &mut self.start_buf,
            WindowField::End => &mut self.end_buf,
        };
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.window_field = self.window_field.toggle();
            }
            KeyCode::Backspace => {
                buf.pop();
            }
            KeyCode::Char(c) if c.is_ascii_alphanumeric() || c == '-' => buf.push(c),
            KeyCode::Enter => {
                // Malformed dates leave that bound unchanged.
                let state = self.view.state_mut();
                state.set_window_start_input(&self.start_buf);
                state.set_window_end_input(&self.end_buf);
                self.input_mode = InputMode::Normal;
                self.sync_selection();
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (lines, lanes) = match mouse.kind {
            MouseEventKind::ScrollDown => (WHEEL_LINES, 1),
            MouseEventKind::ScrollUp => (-WHEEL_LINES, -1),
            _ => return,
        };
        if let Some(modal) = self.detail.as_mut() {
            modal.scroll_by(lines);
        }
        // The wheel also reaches the lanes; the gate keeps them still while a
        // modal is open.
        self.scroll_lanes(lanes);
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let snapshot = self.view.snapshot();
        let [header, axis, lanes, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let label_w = label_width(&snapshot);
        frame.render_widget(Paragraph::new(header_line(&snapshot, self)), header);
        render_axis(frame.buffer_mut(), axis, label_w, &snapshot);
        self.render_lanes(frame.buffer_mut(), lanes, label_w, &snapshot);
        frame.render_widget(Paragraph::new(self.footer_line()), footer);

        match self.input_mode {
            InputMode::FilterPopup => render_filter_popup(frame, self, area),
            InputMode::WindowEditor => render_window_editor(frame, self, area),
            InputMode::Help => render_help_overlay(frame, area),
            InputMode::Normal => {}
        }

        if let Some(modal) = self.detail.as_mut() {
            modal.render(frame, area, self.loader.state());
        }
    }

    fn render_lanes(
        &mut self,
        buf: &mut Buffer,
        area: Rect,
        label_w: u16,
        snapshot: &TimelineSnapshot,
    ) {
        if area.height == 0 {
            return;
        }
        if snapshot.is_empty() {
            self.visible_lanes = 1;
            let middle = Rect {
                y: area.y + area.height / 2,
                height: 1,
                ..area
            };
            Paragraph::new(Span::styled(
                EMPTY_MESSAGE,
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center)
            .render(middle, buf);
            return;
        }

        // One lane never exceeds the area, however wide the spacing.
        let lane_h = lane_lines(snapshot.row_spacing).min(area.height);
        let rows = snapshot.row_labels.len();
        self.visible_lanes = usize::from((area.height / lane_h).max(1));
        self.lane_scroll = self
            .lane_scroll
            .min(rows.saturating_sub(self.visible_lanes));

        let track = Rect {
            x: area.x + label_w + 1,
            width: area.width.saturating_sub(label_w + 1),
            ..area
        };
        let order = display_order(snapshot);
        let item_lines = usize::from(lane_h.saturating_sub(1).max(1));

        for (slot, row) in (self.lane_scroll..rows).take(self.visible_lanes).enumerate() {
            let Ok(slot) = u16::try_from(slot) else { break };
            let y0 = area.y.saturating_add(slot.saturating_mul(lane_h));
            if y0 >= area.bottom() {
                break;
            }
            buf.set_stringn(
                area.x,
                y0,
                truncate(&snapshot.row_labels[row], usize::from(label_w)),
                usize::from(label_w),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            );

            let separator_y = y0.saturating_add(lane_h - 1);
            if lane_h > 1 && separator_y < area.bottom() {
                buf.set_stringn(
                    track.x,
                    separator_y,
                    "┈".repeat(usize::from(track.width)),
                    usize::from(track.width),
                    Style::default().fg(Color::DarkGray),
                );
            }

            let lane_items = order
                .iter()
                .map(|&i| &snapshot.items[i])
                .filter(|item| item.row == row);
            for (k, item) in lane_items.enumerate() {
                let line = u16::try_from(k % item_lines).unwrap_or(0);
                let selected = self.selected.as_deref() == Some(item.record.id.as_str());
                draw_bar(buf, track, y0.saturating_add(line), item, selected);
            }
        }
    }

    fn footer_line(&self) -> Line<'static> {
        if let Some((msg, at)) = &self.status_msg
            && at.elapsed() < STATUS_TTL
        {
            return Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Cyan)));
        }

        let key_style = Style::default().fg(Color::Cyan);
        let dim_style = Style::default().fg(Color::DarkGray);
        let mut spans: Vec<Span<'static>> = Vec::new();

        for status in Status::ALL {
            spans.push(Span::styled("■ ", Style::default().fg(status_color(status))));
            spans.push(Span::styled(format!("{}  ", status.label()), dim_style));
        }
        spans.push(Span::styled("│ ", dim_style));

        let hints: &[(&str, &str)] = match self.input_mode {
            InputMode::Normal if self.detail.is_some() => &[("esc", "close"), ("j/k", "scroll")],
            InputMode::Normal => &[
                ("enter", "open"),
                ("F", "filter"),
                ("w", "window"),
                ("[/]", "pan"),
                ("-/+", "zoom"),
                ("?", "help"),
                ("q", "quit"),
            ],
            InputMode::FilterPopup => &[("tab", "field"), ("←/→", "change"), ("x", "clear"), ("enter", "done")],
            InputMode::WindowEditor => &[("tab", "field"), ("enter", "apply"), ("esc", "cancel")],
            InputMode::Help => &[("esc", "close")],
        };
        for (key, desc) in hints {
            spans.push(Span::styled((*key).to_string(), key_style));
            spans.push(Span::styled(format!(" {desc}  "), dim_style));
        }
        Line::from(spans)
    }
}

fn label_width(snapshot: &TimelineSnapshot) -> u16 {
    let widest = snapshot
        .row_labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(LABEL_MAX);
    u16::try_from(widest).unwrap_or(0)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn header_line(snapshot: &TimelineSnapshot, app: &TimelineApp) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            "Roadmap ",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} → {} ", snapshot.window.start, snapshot.window.end),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(snapshot.summary(), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("  spacing {}px", snapshot.row_spacing),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    let filter = app.view.state().filter();
    if !filter.is_empty() {
        spans.push(Span::styled(
            format!("  status={} owner={}", filter.status, filter.owner),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

/// Month labels on the first line, a tick rule on the second.
fn render_axis(buf: &mut Buffer, area: Rect, label_w: u16, snapshot: &TimelineSnapshot) {
    if area.height < 2 {
        return;
    }
    let x0 = area.x + label_w + 1;
    let cols = usize::from(area.width.saturating_sub(label_w + 1));
    if cols == 0 {
        return;
    }
    let rule_style = Style::default().fg(Color::DarkGray);
    buf.set_stringn(x0, area.y + 1, "─".repeat(cols), cols, rule_style);

    let mut free_from = 0;
    for tick in &snapshot.ticks {
        let col = tick_column(tick.position_percent, cols);
        let Ok(col_u16) = u16::try_from(col) else {
            continue;
        };
        buf.set_string(x0 + col_u16, area.y + 1, "┬", rule_style);

        let label_len = tick.label.chars().count();
        if col >= free_from && col + label_len <= cols {
            buf.set_string(
                x0 + col_u16,
                area.y,
                &tick.label,
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            );
            free_from = col + label_len + 1;
        }
    }
}

fn draw_bar(buf: &mut Buffer, track: Rect, y: u16, item: &PositionedItem, selected: bool) {
    let cols = bar_columns(item.left_percent, item.width_percent, usize::from(track.width));
    let (Ok(start), Ok(width)) = (u16::try_from(cols.start), u16::try_from(cols.len())) else {
        return;
    };
    if width == 0 || y >= track.bottom() {
        return;
    }

    let color = status_color(item.record.status);
    let style = if selected {
        Style::default()
            .bg(Color::White)
            .fg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(color).fg(Color::Black)
    };
    let rect = Rect::new(track.x + start, y, width, 1);
    buf.set_style(rect, style);

    let record = &item.record;
    let with_dates = format!(
        "{} {} - {}",
        record.name,
        short_date(record.start_date),
        short_date(record.end_date)
    );
    let text = if with_dates.chars().count() <= usize::from(width) {
        with_dates
    } else {
        truncate(&record.name, usize::from(width))
    };
    buf.set_stringn(rect.x, y, text, usize::from(width), style);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn popup_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
}

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::styled(format!("{label:<8}"), label_style),
        Span::styled(value, Style::default().fg(Color::Green)),
    ])
}

fn render_filter_popup(frame: &mut Frame<'_>, app: &TimelineApp, area: Rect) {
    let popup = centered(area, 48, 6);
    frame.render_widget(Clear, popup);
    let block = popup_block(" Filter ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let filter = app.view.state().filter();
    let lines = vec![
        field_line(
            "Status",
            format!("‹ {} ›", filter.status),
            app.filter_field == FilterField::Status,
        ),
        field_line(
            "Owner",
            format!("‹ {} ›", filter.owner),
            app.filter_field == FilterField::Owner,
        ),
        Line::default(),
        Line::styled(
            "←/→ change  tab field  x clear  enter done",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_window_editor(frame: &mut Frame<'_>, app: &TimelineApp, area: Rect) {
    let popup = centered(area, 40, 6);
    frame.render_widget(Clear, popup);
    let block = popup_block(" Window ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let with_cursor = |buf: &str, focused: bool| {
        if focused {
            format!("{buf}█")
        } else {
            buf.to_string()
        }
    };
    let lines = vec![
        field_line(
            "Start",
            with_cursor(&app.start_buf, app.window_field == WindowField::Start),
            app.window_field == WindowField::Start,
        ),
        field_line(
            "End",
            with_cursor(&app.end_buf, app.window_field == WindowField::End),
            app.window_field == WindowField::End,
        ),
        Line::default(),
        Line::styled(
            "YYYY-MM-DD  enter apply  esc cancel",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn help_hotkeys() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("j/k", "timeline", "select next/previous item"),
        ("g/G", "timeline", "first/last item"),
        ("enter", "timeline", "open item details"),
        ("F", "timeline", "status and owner filters"),
        ("w", "timeline", "edit window dates"),
        ("[/]", "timeline", "pan window one week"),
        ("-/+", "timeline", "widen/narrow window one week"),
        ("</>", "timeline", "row spacing down/up"),
        ("ctrl+d/u", "timeline", "scroll lanes"),
        ("r", "timeline", "reset filters, window, spacing"),
        ("q", "global", "quit"),
        ("j/k", "detail", "scroll document"),
        ("f/b", "detail", "page document"),
        ("esc", "detail", "close details"),
    ]
}

fn render_help_overlay(frame: &mut Frame<'_>, area: Rect) {
    let keys = help_hotkeys();
    let height = u16::try_from(keys.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup = centered(area, 60, height);
    frame.render_widget(Clear, popup);
    let block = popup_block(" Hotkeys ").border_style(Style::default().fg(Color::Green));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines: Vec<Line<'static>> = keys
        .into_iter()
        .map(|(key, ctx, desc)| {
            Line::from(vec![
                Span::styled(format!("{key:10}"), Style::default().fg(Color::Cyan)),
                Span::styled(format!("{ctx:10}"), Style::default().fg(Color::Cyan)),
                Span::styled(desc, Style::default().fg(Color::White)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use roadmap_core::document::{DocumentError, DocumentSource, DocumentState};
    use roadmap_core::filter::{SpacingBounds, ViewState};
    use roadmap_core::store::RecordStore;
    use roadmap_core::window::parse_date;
    use std::sync::Arc;

    struct MapSource;

    impl DocumentSource for MapSource {
        fn fetch(&self, reference: &str) -> Result<String, DocumentError> {
            match reference {
                "/markdown/project-foundation.md" => {
                    Ok("# Foundation\n\n- repo setup\n- CI pipeline".to_string())
                }
                _ => Err(DocumentError::Status(404)),
            }
        }
    }

    fn app() -> TimelineApp {
        let state = ViewState::new(
            RecordStore::seed(),
            SpacingBounds::default(),
            parse_date("2026-01-01").unwrap(),
        );
        TimelineApp::new(
            TimelineView::new(state),
            DocumentLoader::new(Arc::new(MapSource)),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn press(app: &mut TimelineApp, codes: &[KeyCode]) {
        for code in codes {
            app.handle_key(key(*code));
        }
    }

    fn type_text(app: &mut TimelineApp, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn wheel(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn screen(app: &mut TimelineApp, w: u16, h: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal
            .draw(|frame| app.render(frame, frame.area()))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(usize::from(w))
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn date(s: &str) -> chrono::NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn lane_height_follows_spacing() {
        assert_eq!(lane_lines(200), 5);
        assert_eq!(lane_lines(160), 4);
        assert_eq!(lane_lines(480), 12);
        assert_eq!(lane_lines(40), 3);
    }

    #[test]
    fn huge_spacing_fits_one_lane_on_screen() {
        let spacing = SpacingBounds {
            default: u32::MAX,
            min: 160,
            max: u32::MAX,
        };
        let state = ViewState::new(RecordStore::seed(), spacing, date("2026-01-01"));
        let mut app = TimelineApp::new(
            TimelineView::new(state),
            DocumentLoader::new(Arc::new(MapSource)),
        );
        assert_eq!(lane_lines(u32::MAX), u16::MAX);

        let text = screen(&mut app, 100, 20);
        assert!(text.contains("Engineering Team"));
        assert!(!text.contains("Design Team"));
        assert_eq!(app.visible_lanes, 1);
    }

    #[test]
    fn renders_header_axis_lanes_and_legend() {
        let mut app = app();
        let text = screen(&mut app, 100, 40);
        assert!(text.contains("(6 of 6 items shown)"));
        assert!(text.contains("2025-09-01 → 2025-12-31"));
        assert!(text.contains("Sep 2025"));
        assert!(text.contains("Engineering Team"));
        assert!(text.contains("AI Team"));
        assert!(text.contains("Completed"));
        assert!(text.contains("Planned"));
    }

    #[test]
    fn empty_filter_shows_message() {
        let mut app = app();
        app.view.state_mut().set_owner_filter("Nobody");
        app.sync_selection();
        let text = screen(&mut app, 100, 30);
        assert!(text.contains(EMPTY_MESSAGE));
        assert!(text.contains("(0 of 6 items shown)"));
        assert!(app.selected.is_none());
    }

    #[test]
    fn selection_follows_lane_order() {
        let mut app = app();
        assert_eq!(app.selected.as_deref(), Some("1"));
        press(&mut app, &[KeyCode::Char('j')]);
        assert_eq!(app.selected.as_deref(), Some("2"));
        press(&mut app, &[KeyCode::Char('G')]);
        assert_eq!(app.selected.as_deref(), Some("6"));
        press(&mut app, &[KeyCode::Char('k'), KeyCode::Char('g')]);
        assert_eq!(app.selected.as_deref(), Some("1"));
    }

    #[test]
    fn filter_popup_cycles_choices() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('F'), KeyCode::Right]);
        assert_eq!(app.input_mode, InputMode::FilterPopup);
        assert_eq!(
            app.view.state().filter().status,
            Selection::Only("completed".into())
        );
        assert_eq!(app.view.snapshot().shown, 2);

        press(&mut app, &[KeyCode::Tab, KeyCode::Right]);
        assert_eq!(
            app.view.state().filter().owner,
            Selection::Only("Engineering Team".into())
        );
        assert_eq!(app.view.snapshot().shown, 1);

        press(&mut app, &[KeyCode::Char('x'), KeyCode::Enter]);
        assert!(app.view.state().filter().owner.is_all());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn selection_moves_off_filtered_items() {
        let mut app = app();
        app.view.state_mut().set_status_filter("planned");
        app.sync_selection();
        assert_eq!(app.selected.as_deref(), Some("5"));
    }

    #[test]
    fn pan_and_zoom_move_the_window() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char(']')]);
        let w = app.view.state().window();
        assert_eq!((w.start, w.end), (date("2025-09-08"), date("2026-01-07")));

        press(&mut app, &[KeyCode::Char('['), KeyCode::Char('-')]);
        let w = app.view.state().window();
        assert_eq!((w.start, w.end), (date("2025-08-25"), date("2026-01-07")));

        press(&mut app, &[KeyCode::Char('+')]);
        let w = app.view.state().window();
        assert_eq!((w.start, w.end), (date("2025-09-01"), date("2025-12-31")));
    }

    #[test]
    fn spacing_steps_and_clamps() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('>')]);
        assert_eq!(app.view.state().row_spacing(), 240);
        for _ in 0..20 {
            press(&mut app, &[KeyCode::Char('>')]);
        }
        assert_eq!(app.view.state().row_spacing(), 480);
        for _ in 0..20 {
            press(&mut app, &[KeyCode::Char('<')]);
        }
        assert_eq!(app.view.state().row_spacing(), 160);
    }

    #[test]
    fn reset_restores_everything() {
        let mut app = app();
        press(
            &mut app,
            &[
                KeyCode::Char(']'),
                KeyCode::Char('>'),
                KeyCode::Char('F'),
                KeyCode::Right,
                KeyCode::Esc,
                KeyCode::Char('r'),
            ],
        );
        let state = app.view.state();
        assert_eq!(state.window(), state.initial_window());
        assert!(state.filter().is_empty());
        assert_eq!(state.row_spacing(), 200);
    }

    #[test]
    fn window_editor_applies_typed_dates() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('w')]);
        assert_eq!(app.start_buf, "2025-09-01");
        for _ in 0..10 {
            press(&mut app, &[KeyCode::Backspace]);
        }
        type_text(&mut app, "2025-10-01");
        press(&mut app, &[KeyCode::Tab]);
        for _ in 0..10 {
            press(&mut app, &[KeyCode::Backspace]);
        }
        type_text(&mut app, "2025-10-31");
        press(&mut app, &[KeyCode::Enter]);

        let w = app.view.state().window();
        assert_eq!((w.start, w.end), (date("2025-10-01"), date("2025-10-31")));
        assert_eq!(app.view.snapshot().shown, 3);
        assert_eq!(app.selected.as_deref(), Some("2"));
    }

    #[test]
    fn window_editor_ignores_malformed_dates() {
        let mut app = app();
        let before = app.view.state().window();
        press(&mut app, &[KeyCode::Char('w')]);
        type_text(&mut app, "x");
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.view.state().window(), before);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn detail_opens_loads_and_closes() {
        let mut app = app();
        press(&mut app, &[KeyCode::Enter]);
        assert!(app.gate.is_locked());
        assert_eq!(app.view.detail().map(|d| d.id.as_str()), Some("1"));

        let state = app.loader.wait(Duration::from_secs(2)).clone();
        assert!(matches!(state, DocumentState::Ready(_)));
        let text = screen(&mut app, 100, 30);
        assert!(text.contains("Project Foundation"));
        assert!(text.contains("• repo setup"));

        press(&mut app, &[KeyCode::Esc]);
        assert!(app.detail.is_none());
        assert!(app.view.detail().is_none());
        assert!(!app.gate.is_locked());
        assert_eq!(app.loader.state(), &DocumentState::Idle);
    }

    #[test]
    fn failed_document_is_shown_inline() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('j'), KeyCode::Enter]);
        app.loader.wait(Duration::from_secs(2));
        let text = screen(&mut app, 100, 30);
        assert!(text.contains("Core Features Development"));
        assert!(text.contains("Error: Failed to load markdown: 404"));
        assert!(!app.should_quit());
    }

    #[test]
    fn wheel_scrolls_lanes_only_without_modal() {
        let mut app = app();
        // 14 rows: header, axis, footer leave 10 lines, two 5-line lanes.
        screen(&mut app, 100, 14);
        assert_eq!(app.visible_lanes, 2);

        press(&mut app, &[KeyCode::Enter]);
        app.handle_mouse(wheel(MouseEventKind::ScrollDown));
        assert_eq!(app.lane_scroll, 0);

        press(&mut app, &[KeyCode::Esc]);
        app.handle_mouse(wheel(MouseEventKind::ScrollDown));
        assert_eq!(app.lane_scroll, 1);
        app.handle_mouse(wheel(MouseEventKind::ScrollUp));
        assert_eq!(app.lane_scroll, 0);
    }

    #[test]
    fn selection_keeps_its_lane_visible() {
        let mut app = app();
        screen(&mut app, 100, 14);
        press(&mut app, &[KeyCode::Char('G')]);
        assert_eq!(app.lane_scroll, 4);
        let text = screen(&mut app, 100, 14);
        assert!(text.contains("AI Team"));
        assert!(!text.contains("Engineering Team"));
    }

    #[test]
    fn help_overlay_toggles() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('?')]);
        assert!(screen(&mut app, 100, 30).contains("Hotkeys"));
        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.input_mode, InputMode::Normal);
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(app.should_quit());
    }
}
