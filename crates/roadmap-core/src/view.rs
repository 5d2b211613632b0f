//! View composition: one snapshot per render.
//!
//! [`TimelineView`] wraps a [`ViewState`] and the open-detail selection.
//! Front ends read a [`TimelineSnapshot`] each frame and never cache layout
//! between mutations.

use crate::axis::{AxisTick, month_ticks};
use crate::error::RoadmapError;
use crate::filter::ViewState;
use crate::layout::{PositionedItem, RowAssignment, project};
use crate::window::VisibleWindow;
use serde::Serialize;
use tracing::debug;

/// Vertical allowance above the lanes for the axis and header.
pub const HEADER_ALLOWANCE: u32 = 150;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSnapshot {
    pub window: VisibleWindow,
    pub items: Vec<PositionedItem>,
    /// Owner label per row, indexed by row number.
    pub row_labels: Vec<String>,
    pub ticks: Vec<AxisTick>,
    pub shown: usize,
    pub total: usize,
    pub row_spacing: u32,
    /// Lane area height: rows times spacing plus the header allowance. An
    /// empty view still reserves one row.
    pub container_height: u32,
}

impl TimelineSnapshot {
    /// True when no record passes the filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `(N of M items shown)` header text.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("({} of {} items shown)", self.shown, self.total)
    }
}

/// Message shown in place of the lanes when nothing matches.
pub const EMPTY_MESSAGE: &str = "No items match your filters";

/// What the document collaborator should fetch for an opened record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRequest {
    pub id: String,
    pub reference: String,
    pub title: String,
}

/// A view session: mutable state plus the open detail, if any.
#[derive(Debug, Clone)]
pub struct TimelineView {
    state: ViewState,
    detail: Option<DetailRequest>,
}

impl TimelineView {
    #[must_use]
    pub const fn new(state: ViewState) -> Self {
        Self {
            state,
            detail: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Mutable access for filter and window changes.
    pub const fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    /// Compose the current frame from state.
    #[must_use]
    pub fn snapshot(&self) -> TimelineSnapshot {
        let window = self.state.window().normalized();
        let records = self.state.filtered_records();
        let rows = RowAssignment::from_records(&records);
        let items = project(&records, window);
        let ticks = month_ticks(window).collect();
        let row_spacing = self.state.row_spacing();
        let lanes = u32::try_from(rows.len().max(1)).unwrap_or(u32::MAX);

        debug!(shown = items.len(), rows = rows.len(), "timeline recomputed");

        TimelineSnapshot {
            window,
            shown: items.len(),
            total: self.state.store().len(),
            items,
            row_labels: rows.labels().to_vec(),
            ticks,
            row_spacing,
            container_height: lanes
                .saturating_mul(row_spacing)
                .saturating_add(HEADER_ALLOWANCE),
        }
    }

    /// Open the detail for record `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::RecordNotFound`] if no record has that id.
    pub fn select(&mut self, id: &str) -> Result<DetailRequest, RoadmapError> {
        let record = self.state.store().require(id)?;
        let request = DetailRequest {
            id: record.id.clone(),
            reference: record.details.clone(),
            title: record.name.clone(),
        };
        debug!(id, reference = %request.reference, "detail opened");
        self.detail = Some(request.clone());
        Ok(request)
    }

    pub fn close_detail(&mut self) {
        if self.detail.take().is_some() {
            debug!("detail closed");
        }
    }

    #[must_use]
    pub const fn detail(&self) -> Option<&DetailRequest> {
        self.detail.as_ref()
    }
}
