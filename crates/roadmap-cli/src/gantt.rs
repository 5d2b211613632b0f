//! Percent-to-column scaling and status styling shared by the text chart and
//! the terminal timeline.

use ratatui::style::Color;
use roadmap_core::model::Status;
use std::ops::Range;

/// Columns covered by a bar at `left`/`width` percent of a `cols`-wide track.
///
/// Every bar gets at least one column so zero-width items (a record that
/// only touches the window edge) stay visible and selectable.
#[must_use]
pub fn bar_columns(left_percent: f64, width_percent: f64, cols: usize) -> Range<usize> {
    if cols == 0 {
        return 0..0;
    }
    let to_col = |percent: f64| percent * cols as f64 / 100.0;
    let start = (to_col(left_percent).floor().max(0.0) as usize).min(cols - 1);
    let end = (to_col(left_percent + width_percent).ceil() as usize).clamp(start + 1, cols);
    start..end
}

/// Column for an axis tick at `percent` of a `cols`-wide track.
#[must_use]
pub fn tick_column(percent: f64, cols: usize) -> usize {
    if cols == 0 {
        return 0;
    }
    ((percent * cols as f64 / 100.0).round().max(0.0) as usize).min(cols - 1)
}

/// Fill character for plain-text bars.
#[must_use]
pub const fn status_glyph(status: Status) -> char {
    match status {
        Status::Completed => '=',
        Status::InProgress => '#',
        Status::Planned => '~',
    }
}

#[must_use]
pub const fn status_color(status: Status) -> Color {
    match status {
        Status::Completed => Color::Green,
        Status::InProgress => Color::Blue,
        Status::Planned => Color::Magenta,
    }
}

/// Human date as shown on bars and in detail headers, e.g. `Sep 1, 2025`.
#[must_use]
pub fn short_date(date: chrono::NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
