//! `roadmap list`: positioned records for the current filters and window.

use crate::cmd::{FilterArgs, WindowArgs};
use crate::gantt::short_date;
use crate::output::{OutputMode, Renderable, pretty_kv, pretty_rule, render_list};
use crate::session::Session;
use chrono::NaiveDate;
use clap::Args;
use roadmap_core::layout::PositionedItem;
use roadmap_core::view::{EMPTY_MESSAGE, TimelineView};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub window: WindowArgs,
}

/// One positioned record as printed by `roadmap list`.
#[derive(Debug, Serialize)]
pub struct ListRow {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub status: String,
    pub row: usize,
    pub left_percent: f64,
    pub width_percent: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<&PositionedItem> for ListRow {
    fn from(item: &PositionedItem) -> Self {
        Self {
            id: item.record.id.clone(),
            name: item.record.name.clone(),
            owner: item.record.owner.clone(),
            status: item.record.status.as_str().to_string(),
            row: item.row,
            left_percent: item.left_percent,
            width_percent: item.width_percent,
            start_date: item.record.start_date,
            end_date: item.record.end_date,
        }
    }
}

impl Renderable for ListRow {
    const HEADERS: &'static [&'static str] = &[
        "ID", "STATUS", "ROW", "OWNER", "NAME", "LEFT%", "WIDTH%", "START", "END",
    ];

    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}", self.id, self.name)?;
        pretty_kv(w, "Owner", format!("{} (row {})", self.owner, self.row))?;
        pretty_kv(w, "Status", &self.status)?;
        pretty_kv(
            w,
            "Dates",
            format!(
                "{} to {}",
                short_date(self.start_date),
                short_date(self.end_date)
            ),
        )?;
        pretty_kv(
            w,
            "Position",
            format!("{:.2}% + {:.2}%", self.left_percent, self.width_percent),
        )?;
        pretty_rule(w)
    }

    fn render_row(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}  {}  {}  {}  {}  {:.2}  {:.2}  {}  {}",
            self.id,
            self.status,
            self.row,
            self.owner,
            self.name,
            self.left_percent,
            self.width_percent,
            self.start_date,
            self.end_date
        )
    }
}

/// Execute `roadmap list`.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub fn run_list(args: &ListArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let mut state = session.view_state();
    args.filter.apply(&mut state);
    args.window.apply(&mut state);

    let view = TimelineView::new(state);
    let snapshot = view.snapshot();
    let rows: Vec<ListRow> = snapshot.items.iter().map(ListRow::from).collect();

    if output == OutputMode::Pretty {
        let mut out = io::stdout().lock();
        writeln!(
            out,
            "Roadmap {} to {} {}",
            snapshot.window.start,
            snapshot.window.end,
            snapshot.summary()
        )?;
        pretty_rule(&mut out)?;
        if rows.is_empty() {
            writeln!(out, "{EMPTY_MESSAGE}")?;
            return Ok(());
        }
    }

    render_list(&rows, output)?;
    Ok(())
}
