//! Month-boundary tick marks for the timeline axis.

use crate::window::VisibleWindow;
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// One month marker on the axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    /// First day of the month this tick marks.
    pub date: NaiveDate,
    /// Position using the same clipped offset-to-percent rule as the items.
    pub position_percent: f64,
    /// Short month and year, e.g. `Sep 2025`.
    pub label: String,
}

/// Lazy iterator over month starts in a window.
///
/// Begins at the first day of the window's start month and stops once past
/// the window end. Create a fresh one per render.
#[derive(Debug, Clone)]
pub struct MonthTicks {
    window: VisibleWindow,
    next: Option<NaiveDate>,
}

impl Iterator for MonthTicks {
    type Item = AxisTick;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if current > self.window.end {
            self.next = None;
            return None;
        }
        self.next = current.checked_add_months(Months::new(1));

        let offset = self.window.clip_offset(self.window.offset_days(current));
        Some(AxisTick {
            date: current,
            position_percent: self.window.percent(offset),
            label: current.format("%b %Y").to_string(),
        })
    }
}

/// Month ticks for `window` (normalized first).
#[must_use]
pub fn month_ticks(window: VisibleWindow) -> MonthTicks {
    let window = window.normalized();
    MonthTicks {
        window,
        next: window.start.with_day(1),
    }
}
