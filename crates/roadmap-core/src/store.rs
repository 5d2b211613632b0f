//! Immutable, ordered record source.
//!
//! The store is built once at startup, either from the bundled seed records
//! or from a TOML/JSON records file, and is read-only afterwards.

use crate::error::RoadmapError;
use crate::model::{RoadmapRecord, Status};
use crate::window::VisibleWindow;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Ordered, read-only sequence of roadmap records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<RoadmapRecord>,
}

#[derive(Deserialize)]
struct RecordsFile {
    records: Vec<RoadmapRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonRecords {
    Bare(Vec<RoadmapRecord>),
    Wrapped(RecordsFile),
}

impl RecordStore {
    #[must_use]
    pub const fn new(records: Vec<RoadmapRecord>) -> Self {
        Self { records }
    }

    /// The bundled roadmap used when no records file is configured.
    #[must_use]
    pub fn seed() -> Self {
        let rows: [(&str, &str, (i32, u32, u32), (i32, u32, u32), &str, Status, &str); 6] = [
            (
                "1",
                "Project Foundation",
                (2025, 9, 1),
                (2025, 9, 30),
                "/markdown/project-foundation.md",
                Status::Completed,
                "Engineering Team",
            ),
            (
                "2",
                "Core Features Development",
                (2025, 9, 15),
                (2025, 10, 31),
                "/markdown/core-features.md",
                Status::Completed,
                "Product Team",
            ),
            (
                "3",
                "User Experience Enhancement",
                (2025, 10, 1),
                (2025, 11, 15),
                "/markdown/ux-enhancement.md",
                Status::InProgress,
                "Design Team",
            ),
            (
                "4",
                "Advanced Analytics",
                (2025, 10, 15),
                (2025, 12, 1),
                "/markdown/advanced-analytics.md",
                Status::InProgress,
                "Data Team",
            ),
            (
                "5",
                "Mobile Application",
                (2025, 11, 1),
                (2025, 12, 31),
                "/markdown/mobile-app.md",
                Status::Planned,
                "Mobile Team",
            ),
            (
                "6",
                "AI Integration",
                (2025, 11, 15),
                (2025, 12, 31),
                "/markdown/ai-integration.md",
                Status::Planned,
                "AI Team",
            ),
        ];

        let records = rows
            .into_iter()
            .filter_map(|(id, name, start, end, details, status, owner)| {
                Some(RoadmapRecord {
                    id: id.to_string(),
                    name: name.to_string(),
                    start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2)?,
                    end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2)?,
                    status,
                    owner: owner.to_string(),
                    details: details.to_string(),
                })
            })
            .collect();
        Self { records }
    }

    /// Load records from a `.toml` or `.json` file.
    ///
    /// TOML files hold a `[[records]]` array. JSON files hold either a bare
    /// array or an object with a `records` array.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::RecordSourceUnreadable`] if the file cannot be
    /// read and [`RoadmapError::RecordSourceInvalid`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, RoadmapError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| RoadmapError::RecordSourceUnreadable {
                path: path.to_path_buf(),
                source,
            })?;

        let invalid = |reason: String| RoadmapError::RecordSourceInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let records = if is_json {
            match serde_json::from_str::<JsonRecords>(&content) {
                Ok(JsonRecords::Bare(records)) => records,
                Ok(JsonRecords::Wrapped(file)) => file.records,
                Err(err) => return Err(invalid(err.to_string())),
            }
        } else {
            toml::from_str::<RecordsFile>(&content)
                .map_err(|err| invalid(err.to_string()))?
                .records
        };

        tracing::info!(path = %path.display(), count = records.len(), "loaded roadmap records");
        Ok(Self { records })
    }

    #[must_use]
    pub fn records(&self) -> &[RoadmapRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RoadmapRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Look up a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::RecordNotFound`] when no record has this id.
    pub fn require(&self, id: &str) -> Result<&RoadmapRecord, RoadmapError> {
        self.get(id)
            .ok_or_else(|| RoadmapError::RecordNotFound(id.to_string()))
    }

    /// Distinct owners in order of first appearance.
    #[must_use]
    pub fn owners(&self) -> Vec<String> {
        let mut owners: Vec<String> = Vec::new();
        for record in &self.records {
            if !owners.iter().any(|owner| *owner == record.owner) {
                owners.push(record.owner.clone());
            }
        }
        owners
    }

    /// Distinct statuses in order of first appearance.
    #[must_use]
    pub fn statuses(&self) -> Vec<Status> {
        let mut statuses = Vec::new();
        for record in &self.records {
            if !statuses.contains(&record.status) {
                statuses.push(record.status);
            }
        }
        statuses
    }

    /// Window spanning the earliest start to the latest end.
    ///
    /// An empty store yields a single-day window on `fallback`.
    #[must_use]
    pub fn full_span(&self, fallback: NaiveDate) -> VisibleWindow {
        let start = self.records.iter().map(|r| r.start_date).min();
        let end = self.records.iter().map(|r| r.end_date).max();
        match (start, end) {
            (Some(start), Some(end)) => VisibleWindow::new(start, end).normalized(),
            _ => VisibleWindow::new(fallback, fallback),
        }
    }
}
