//! Date-range-to-layout projection.
//!
//! Maps records onto a percentage-based horizontal axis for a visible window
//! and groups them into owner rows. Callers must pass only records that
//! overlap the window (see [`crate::filter::ViewState::filtered_records`]);
//! anything fully outside comes back with zero width rather than being
//! dropped here.

use crate::model::RoadmapRecord;
use crate::window::VisibleWindow;
use serde::Serialize;

/// A record placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedItem {
    pub record: RoadmapRecord,
    /// Offset of the bar's left edge, as a percentage of the window span.
    pub left_percent: f64,
    /// Bar width as a percentage of the window span; never negative.
    pub width_percent: f64,
    /// Owner lane index.
    pub row: usize,
}

impl PositionedItem {
    #[must_use]
    pub fn right_percent(&self) -> f64 {
        self.left_percent + self.width_percent
    }
}

/// Owner to lane mapping, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowAssignment {
    owners: Vec<String>,
}

impl RowAssignment {
    /// Assign each distinct owner the next unused row, starting at 0.
    #[must_use]
    pub fn from_records(records: &[RoadmapRecord]) -> Self {
        let mut owners: Vec<String> = Vec::new();
        for record in records {
            if !owners.contains(&record.owner) {
                owners.push(record.owner.clone());
            }
        }
        Self { owners }
    }

    #[must_use]
    pub fn row_of(&self, owner: &str) -> Option<usize> {
        self.owners.iter().position(|o| o == owner)
    }

    /// Owner labels indexed by row.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.owners
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Horizontal extent of one record within `window`, as `(left, width)`.
///
/// Start offsets round down and end offsets round up; with date-only inputs
/// both are exact day counts. Offsets are clipped to `[0, span]` so items
/// crossing a window edge are truncated instead of disappearing.
#[must_use]
pub fn horizontal_extent(record: &RoadmapRecord, window: VisibleWindow) -> (f64, f64) {
    let raw_start = window.offset_days(record.start_date);
    let raw_end = window.offset_days(record.end_date);

    let clipped_start = raw_start.max(0);
    let clipped_end = raw_end.min(window.span_days());

    let left = window.percent(clipped_start);
    let width = window.percent(clipped_end - clipped_start).max(0.0);
    (left, width)
}

/// Position every record and assign owner rows.
///
/// Pure: identical inputs always give identical output.
#[must_use]
pub fn project(records: &[RoadmapRecord], window: VisibleWindow) -> Vec<PositionedItem> {
    let window = window.normalized();
    let rows = RowAssignment::from_records(records);

    records
        .iter()
        .map(|record| {
            let (left_percent, width_percent) = horizontal_extent(record, window);
            PositionedItem {
                record: record.clone(),
                left_percent,
                width_percent,
                row: rows.row_of(&record.owner).unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::window::parse_date;

    fn rec(id: &str, start: &str, end: &str, owner: &str) -> RoadmapRecord {
        RoadmapRecord {
            id: id.into(),
            name: format!("Record {id}"),
            start_date: parse_date(start).unwrap(),
            end_date: parse_date(end).unwrap(),
            status: Status::Planned,
            owner: owner.into(),
            details: format!("/markdown/{id}.md"),
        }
    }

    fn window(start: &str, end: &str) -> VisibleWindow {
        VisibleWindow::new(parse_date(start).unwrap(), parse_date(end).unwrap())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fully_contained_record_is_not_clipped() {
        let items = project(
            &[rec("a", "2025-09-11", "2025-09-21", "X")],
            window("2025-09-01", "2025-10-01"),
        );
        assert!(approx(items[0].left_percent, 10.0 / 30.0 * 100.0));
        assert!(approx(items[0].width_percent, 10.0 / 30.0 * 100.0));
    }

    #[test]
    fn record_crossing_both_edges_fills_the_window() {
        let items = project(
            &[rec("a", "2025-01-01", "2026-01-01", "X")],
            window("2025-06-01", "2025-06-30"),
        );
        assert!(approx(items[0].left_percent, 0.0));
        assert!(approx(items[0].width_percent, 100.0));
    }

    #[test]
    fn record_outside_window_gets_zero_width() {
        let items = project(
            &[rec("a", "2025-01-01", "2025-01-31", "X")],
            window("2025-06-01", "2025-06-30"),
        );
        assert!(approx(items[0].width_percent, 0.0));
    }

    #[test]
    fn rows_follow_first_appearance() {
        let records = [
            rec("a", "2025-09-01", "2025-09-10", "Design"),
            rec("b", "2025-09-01", "2025-09-10", "Data"),
            rec("c", "2025-09-01", "2025-09-10", "Design"),
            rec("d", "2025-09-01", "2025-09-10", "Mobile"),
        ];
        let items = project(&records, window("2025-09-01", "2025-09-30"));
        let rows: Vec<usize> = items.iter().map(|item| item.row).collect();
        assert_eq!(rows, [0, 1, 0, 2]);

        let assignment = RowAssignment::from_records(&records);
        assert_eq!(assignment.labels(), ["Design", "Data", "Mobile"]);
        assert_eq!(assignment.row_of("Mobile"), Some(2));
        assert_eq!(assignment.row_of("Nobody"), None);
    }

    #[test]
    fn inverted_window_projects_like_normalized() {
        let records = [rec("a", "2025-09-05", "2025-09-15", "X")];
        let forward = project(&records, window("2025-09-01", "2025-09-30"));
        let inverted = project(&records, window("2025-09-30", "2025-09-01"));
        assert_eq!(forward, inverted);
    }

    #[test]
    fn empty_input_projects_to_nothing() {
        assert!(project(&[], window("2025-09-01", "2025-09-30")).is_empty());
        assert!(RowAssignment::from_records(&[]).is_empty());
    }
}
