//! Visible date window and the day-offset arithmetic shared by the projector
//! and the axis.

use crate::error::RoadmapError;
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Date format accepted by the window editors and CLI flags.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`RoadmapError::InvalidDate`] for anything else.
pub fn parse_date(raw: &str) -> Result<NaiveDate, RoadmapError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| RoadmapError::InvalidDate(raw.to_string()))
}

/// The date range currently shown on the timeline axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VisibleWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl VisibleWindow {
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Same window with `start <= end`, swapping the bounds if inverted.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }

    /// Number of days between the normalized bounds, never less than 1.
    #[must_use]
    pub fn span_days(self) -> i64 {
        let w = self.normalized();
        (w.end - w.start).num_days().max(1)
    }

    /// Signed whole-day offset of `date` from the normalized start.
    #[must_use]
    pub fn offset_days(self, date: NaiveDate) -> i64 {
        (date - self.normalized().start).num_days()
    }

    /// Clamp a raw day offset into `[0, span_days]`.
    #[must_use]
    pub fn clip_offset(self, offset: i64) -> i64 {
        offset.clamp(0, self.span_days())
    }

    /// Convert a day offset into a percentage of the span.
    #[must_use]
    pub fn percent(self, offset: i64) -> f64 {
        offset as f64 / self.span_days() as f64 * 100.0
    }

    /// Inclusive containment test on the normalized window.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        let w = self.normalized();
        date >= w.start && date <= w.end
    }

    /// Move both bounds by `days` (negative moves earlier).
    ///
    /// Returns `None` if either bound would leave the representable range.
    #[must_use]
    pub fn shifted(self, days: i64) -> Option<Self> {
        Some(Self {
            start: add_days(self.start, days)?,
            end: add_days(self.end, days)?,
        })
    }
}

pub(crate) fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}
