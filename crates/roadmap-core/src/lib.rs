//! roadmap-core library.
//!
//! Record model, filter/window state, layout projection and the month axis
//! for the `roadmap` timeline, plus the detail-document collaborator.
//!
//! # Conventions
//!
//! - **Errors**: `RoadmapError` for domain failures, `anyhow::Result` where
//!   files are read at startup.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Dates**: calendar days only (`chrono::NaiveDate`); offsets are whole
//!   days.

pub mod axis;
pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod layout;
pub mod model;
pub mod store;
pub mod view;
pub mod window;
