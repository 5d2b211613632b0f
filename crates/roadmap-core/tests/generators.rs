#![allow(dead_code)]

use chrono::NaiveDate;
use proptest::prelude::*;
use roadmap_core::model::{RoadmapRecord, Status};
use roadmap_core::window::VisibleWindow;

const OWNERS: [&str; 4] = ["Engineering Team", "Design Team", "Data Team", "AI Team"];

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

/// A date within roughly three years of 2025-01-01.
pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..1100).prop_map(|d| base() + chrono::Days::new(d))
}

pub fn arb_status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Completed),
        Just(Status::InProgress),
        Just(Status::Planned),
    ]
}

pub fn arb_record(id: usize) -> impl Strategy<Value = RoadmapRecord> {
    (arb_date(), 0u64..200, arb_status(), 0..OWNERS.len()).prop_map(
        move |(start, len, status, owner)| RoadmapRecord {
            id: id.to_string(),
            name: format!("Record {id}"),
            start_date: start,
            end_date: start + chrono::Days::new(len),
            status,
            owner: OWNERS[owner].to_string(),
            details: format!("/markdown/{id}.md"),
        },
    )
}

pub fn arb_records() -> impl Strategy<Value = Vec<RoadmapRecord>> {
    (0usize..12).prop_flat_map(|n| {
        (0..n)
            .map(arb_record)
            .collect::<Vec<_>>()
    })
}

/// A window with `start <= end`.
pub fn arb_window() -> impl Strategy<Value = VisibleWindow> {
    (arb_date(), 0u64..400)
        .prop_map(|(start, len)| VisibleWindow::new(start, start + chrono::Days::new(len)))
}
