//! `roadmap owners`: the choices offered by the owner and status filters.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::session::Session;
use roadmap_core::layout::RowAssignment;
use roadmap_core::store::RecordStore;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OwnerEntry {
    pub owner: String,
    /// Lane the owner lands in with no filters and the full window.
    pub row: usize,
    pub items: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusEntry {
    pub status: String,
    pub items: usize,
}

#[derive(Debug, Serialize)]
pub struct FilterChoices {
    pub owners: Vec<OwnerEntry>,
    pub statuses: Vec<StatusEntry>,
}

impl FilterChoices {
    #[must_use]
    pub fn from_store(store: &RecordStore) -> Self {
        let rows = RowAssignment::from_records(store.records());
        let owners = store
            .owners()
            .into_iter()
            .map(|owner| OwnerEntry {
                row: rows.row_of(&owner).unwrap_or_default(),
                items: store.records().iter().filter(|r| r.owner == owner).count(),
                owner,
            })
            .collect();
        let statuses = store
            .statuses()
            .into_iter()
            .map(|status| StatusEntry {
                status: status.as_str().to_string(),
                items: store.records().iter().filter(|r| r.status == status).count(),
            })
            .collect();
        Self { owners, statuses }
    }
}

/// Execute `roadmap owners`.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub fn run_owners(output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let choices = FilterChoices::from_store(session.store());
    render_mode(output, &choices, render_text, render_human)
}

fn render_human(choices: &FilterChoices, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Owners")?;
    for entry in &choices.owners {
        pretty_kv(
            w,
            &entry.owner,
            format!("row {}, {} item(s)", entry.row, entry.items),
        )?;
    }
    writeln!(w)?;
    pretty_section(w, "Statuses")?;
    for entry in &choices.statuses {
        pretty_kv(w, &entry.status, format!("{} item(s)", entry.items))?;
    }
    Ok(())
}

fn render_text(choices: &FilterChoices, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "KIND  NAME  ROW  ITEMS")?;
    for entry in &choices.owners {
        writeln!(w, "owner  {}  {}  {}", entry.owner, entry.row, entry.items)?;
    }
    for entry in &choices.statuses {
        writeln!(w, "status  {}  -  {}", entry.status, entry.items)?;
    }
    Ok(())
}
