//! Filter and window state for one view session.
//!
//! [`ViewState`] owns the record store plus every user-adjustable setting
//! (status filter, owner filter, visible window, row spacing). Derived values
//! are recomputed on read; nothing derived is cached, so a mutation can never
//! leave a stale projection behind.

use crate::model::{RoadmapRecord, Status};
use crate::store::RecordStore;
use crate::window::{self, VisibleWindow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A filter choice: everything, or one specific value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// `"all"` (any case) or an empty string selects everything; any other
    /// text selects that exact value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }

    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(value) => value,
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Step to the next choice in `options`, wrapping through `All`.
    #[must_use]
    pub fn cycle_next(&self, options: &[String]) -> Self {
        match self {
            Self::All => options.first().map_or(Self::All, |o| Self::Only(o.clone())),
            Self::Only(current) => match options.iter().position(|o| o == current) {
                Some(p) if p + 1 < options.len() => Self::Only(options[p + 1].clone()),
                _ => Self::All,
            },
        }
    }

    /// Step to the previous choice in `options`, wrapping through `All`.
    #[must_use]
    pub fn cycle_prev(&self, options: &[String]) -> Self {
        match self {
            Self::All => options.last().map_or(Self::All, |o| Self::Only(o.clone())),
            Self::Only(current) => match options.iter().position(|o| o == current) {
                Some(p) if p > 0 => Self::Only(options[p - 1].clone()),
                _ => Self::All,
            },
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Selection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Status and owner criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub status: Selection,
    pub owner: Selection,
}

impl FilterState {
    /// Returns true if no filter criteria are active.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_all() && self.owner.is_all()
    }

    #[must_use]
    pub fn matches(&self, record: &RoadmapRecord) -> bool {
        self.status.matches(record.status.as_str()) && self.owner.matches(&record.owner)
    }
}

/// Allowed row-spacing range and its reset value, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingBounds {
    pub default: u32,
    pub min: u32,
    pub max: u32,
}

impl Default for SpacingBounds {
    fn default() -> Self {
        Self {
            default: 200,
            min: 160,
            max: 480,
        }
    }
}

impl SpacingBounds {
    /// Swap inverted bounds and pull the default inside them.
    #[must_use]
    pub fn normalized(self) -> Self {
        let (min, max) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        Self {
            default: self.default.clamp(min, max),
            min,
            max,
        }
    }

    #[must_use]
    pub fn clamp(self, px: u32) -> u32 {
        px.clamp(self.min, self.max)
    }
}

/// Mutable state of a timeline session.
#[derive(Debug, Clone)]
pub struct ViewState {
    store: RecordStore,
    filter: FilterState,
    window: VisibleWindow,
    initial_window: VisibleWindow,
    row_spacing: u32,
    spacing: SpacingBounds,
}

impl ViewState {
    /// Start a session over `store` with the full-span window.
    ///
    /// `today` only matters for an empty store, which has no span.
    #[must_use]
    pub fn new(store: RecordStore, spacing: SpacingBounds, today: NaiveDate) -> Self {
        let spacing = spacing.normalized();
        let initial_window = store.full_span(today);
        Self {
            store,
            filter: FilterState::default(),
            window: initial_window,
            initial_window,
            row_spacing: spacing.default,
            spacing,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn window(&self) -> VisibleWindow {
        self.window
    }

    #[must_use]
    pub const fn initial_window(&self) -> VisibleWindow {
        self.initial_window
    }

    #[must_use]
    pub const fn row_spacing(&self) -> u32 {
        self.row_spacing
    }

    #[must_use]
    pub const fn spacing_bounds(&self) -> SpacingBounds {
        self.spacing
    }

    /// Distinct owners across the whole record source, for filter choices.
    #[must_use]
    pub fn owners(&self) -> Vec<String> {
        self.store.owners()
    }

    /// Distinct statuses across the whole record source, for filter choices.
    #[must_use]
    pub fn statuses(&self) -> Vec<Status> {
        self.store.statuses()
    }

    /// Records passing the status and owner filters that overlap the window,
    /// in source order.
    #[must_use]
    pub fn filtered_records(&self) -> Vec<RoadmapRecord> {
        let window = self.window.normalized();
        self.store
            .records()
            .iter()
            .filter(|r| self.filter.matches(r) && r.overlaps(window.start, window.end))
            .cloned()
            .collect()
    }

    pub fn set_status_filter(&mut self, value: &str) {
        self.filter.status = Selection::parse(value);
        debug!(status = %self.filter.status, "status filter changed");
    }

    pub fn set_owner_filter(&mut self, value: &str) {
        self.filter.owner = Selection::parse(value);
        debug!(owner = %self.filter.owner, "owner filter changed");
    }

    pub fn set_status_selection(&mut self, selection: Selection) {
        self.filter.status = selection;
    }

    pub fn set_owner_selection(&mut self, selection: Selection) {
        self.filter.owner = selection;
    }

    /// Move the window start; a start past the end drags the end with it.
    pub fn set_window_start(&mut self, date: NaiveDate) {
        self.window.start = date;
        if date > self.window.end {
            self.window.end = date;
        }
        debug!(start = %self.window.start, end = %self.window.end, "window start changed");
    }

    /// Move the window end; an end before the start drags the start with it.
    pub fn set_window_end(&mut self, date: NaiveDate) {
        self.window.end = date;
        if date < self.window.start {
            self.window.start = date;
        }
        debug!(start = %self.window.start, end = %self.window.end, "window end changed");
    }

    /// Parse and apply a typed start date. Malformed input leaves the state
    /// untouched and returns `false`.
    pub fn set_window_start_input(&mut self, raw: &str) -> bool {
        match window::parse_date(raw) {
            Ok(date) => {
                self.set_window_start(date);
                true
            }
            Err(err) => {
                debug!("ignoring window start input: {err}");
                false
            }
        }
    }

    /// Parse and apply a typed end date. Malformed input leaves the state
    /// untouched and returns `false`.
    pub fn set_window_end_input(&mut self, raw: &str) -> bool {
        match window::parse_date(raw) {
            Ok(date) => {
                self.set_window_end(date);
                true
            }
            Err(err) => {
                debug!("ignoring window end input: {err}");
                false
            }
        }
    }

    /// Pan the window by `days`, keeping its length.
    pub fn shift_window(&mut self, days: i64) {
        if let Some(shifted) = self.window.shifted(days) {
            self.window = shifted;
        }
    }

    /// Widen (positive) or narrow (negative) the window by `days` on each
    /// side. Narrowing that would collapse the window past a single day is
    /// ignored.
    pub fn zoom_window(&mut self, days: i64) {
        let (Some(start), Some(end)) = (
            window::add_days(self.window.start, -days),
            window::add_days(self.window.end, days),
        ) else {
            return;
        };
        if start > end {
            return;
        }
        self.window = VisibleWindow::new(start, end);
    }

    /// Set row spacing, clamped to the configured range. Returns the stored
    /// value.
    pub fn set_row_spacing(&mut self, px: u32) -> u32 {
        self.row_spacing = self.spacing.clamp(px);
        self.row_spacing
    }

    /// Restore filters, window and spacing to their session-start values.
    pub fn reset(&mut self) {
        self.filter = FilterState::default();
        self.window = self.initial_window;
        self.row_spacing = self.spacing.default;
        debug!("view state reset");
    }
}
