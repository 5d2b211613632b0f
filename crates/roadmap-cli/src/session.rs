//! Per-invocation setup shared by every command: project config, the record
//! store, and the document source.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use roadmap_core::config::{ProjectConfig, load_project_config};
use roadmap_core::document::RoutedDocuments;
use roadmap_core::filter::ViewState;
use roadmap_core::store::RecordStore;
use roadmap_core::view::TimelineView;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the records came from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOrigin {
    Seed,
    File(PathBuf),
}

impl std::fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seed => f.write_str("bundled seed"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    pub project_root: PathBuf,
    pub config: ProjectConfig,
    pub origin: RecordOrigin,
    store: RecordStore,
}

impl Session {
    /// Load project config and records.
    ///
    /// `records_flag` wins over `[data] records`; with neither, the bundled
    /// seed roadmap is used.
    ///
    /// # Errors
    ///
    /// Fails if the config file or the chosen records file is unreadable or
    /// malformed.
    pub fn open(project_root: &Path, records_flag: Option<&Path>) -> Result<Self> {
        let config = load_project_config(project_root)?;

        let records_path = records_flag
            .map(Path::to_path_buf)
            .or_else(|| config.records_path(project_root));

        let (store, origin) = match records_path {
            Some(path) => (RecordStore::load(&path)?, RecordOrigin::File(path)),
            None => (RecordStore::seed(), RecordOrigin::Seed),
        };
        info!(records = store.len(), origin = %origin, "records loaded");

        Ok(Self {
            project_root: project_root.to_path_buf(),
            config,
            origin,
            store,
        })
    }

    /// Build a session over an in-memory store.
    #[cfg(test)]
    pub fn from_store(project_root: &Path, store: RecordStore) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: ProjectConfig::default(),
            origin: RecordOrigin::Seed,
            store,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Fresh view state with the configured spacing range.
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        ViewState::new(
            self.store.clone(),
            self.config.layout.spacing_bounds(),
            today(),
        )
    }

    #[must_use]
    pub fn timeline(&self) -> TimelineView {
        TimelineView::new(self.view_state())
    }

    /// Document source rooted at the configured docs directory.
    #[must_use]
    pub fn documents(&self) -> RoutedDocuments {
        RoutedDocuments::new(
            self.config.docs_root(&self.project_root),
            self.config.documents.timeout(),
        )
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
