//! `roadmap chart`: the timeline drawn as plain text.

use crate::cmd::{FilterArgs, WindowArgs};
use crate::gantt::{bar_columns, status_glyph, tick_column};
use crate::output::OutputMode;
use crate::session::Session;
use clap::Args;
use roadmap_core::model::Status;
use roadmap_core::view::{EMPTY_MESSAGE, TimelineSnapshot, TimelineView};
use std::io::{self, Write};

const LABEL_MAX: usize = 20;
const MIN_TRACK: usize = 10;

#[derive(Args, Debug)]
pub struct ChartArgs {
    /// Total line width in columns.
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub window: WindowArgs,
}

impl Default for ChartArgs {
    fn default() -> Self {
        Self {
            width: 80,
            filter: FilterArgs::default(),
            window: WindowArgs::default(),
        }
    }
}

/// Lay out `snapshot` as text lines no wider than `width` on the track.
///
/// Each item gets its own line; the owner label is printed on the first line
/// of its lane only. Item names trail the track.
#[must_use]
pub fn render_chart(snapshot: &TimelineSnapshot, width: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "Roadmap {} to {} {}",
        snapshot.window.start,
        snapshot.window.end,
        snapshot.summary()
    )];

    if snapshot.is_empty() {
        lines.push(EMPTY_MESSAGE.to_string());
        return lines;
    }

    let label_width = snapshot
        .row_labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(LABEL_MAX);
    let track = width.saturating_sub(label_width + 3).max(MIN_TRACK);
    let gutter = " ".repeat(label_width);

    lines.push(format!("{gutter} |{}|", tick_line(snapshot, track)));
    lines.push(format!("{gutter}  {}", tick_labels(snapshot, track)));

    for (row, owner) in snapshot.row_labels.iter().enumerate() {
        let label = truncate(owner, label_width);
        let mut first = true;
        for item in snapshot.items.iter().filter(|i| i.row == row) {
            let mut cells = vec![' '; track];
            let glyph = status_glyph(item.record.status);
            for col in bar_columns(item.left_percent, item.width_percent, track) {
                cells[col] = glyph;
            }
            let shown_label = if first { label.as_str() } else { "" };
            first = false;
            lines.push(format!(
                "{shown_label:<label_width$} |{}| {} {}",
                cells.into_iter().collect::<String>(),
                item.record.id,
                item.record.name
            ));
        }
    }

    lines.push(legend());
    lines
}

fn tick_line(snapshot: &TimelineSnapshot, track: usize) -> String {
    let mut cells = vec!['-'; track];
    for tick in &snapshot.ticks {
        cells[tick_column(tick.position_percent, track)] = '+';
    }
    cells.into_iter().collect()
}

/// Month labels placed at their tick columns, skipping any that would
/// collide with the previous label.
fn tick_labels(snapshot: &TimelineSnapshot, track: usize) -> String {
    let mut cells = vec![' '; track];
    let mut free_from = 0;
    for tick in &snapshot.ticks {
        let col = tick_column(tick.position_percent, track);
        let label: Vec<char> = tick.label.chars().collect();
        if col < free_from || col + label.len() > track {
            continue;
        }
        cells[col..col + label.len()].copy_from_slice(&label);
        free_from = col + label.len() + 1;
    }
    cells.into_iter().collect::<String>().trim_end().to_string()
}

fn legend() -> String {
    Status::ALL
        .iter()
        .map(|s| format!("{} {}", status_glyph(*s), s.as_str()))
        .collect::<Vec<_>>()
        .join("  ")
}

fn truncate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    let mut out: String = label.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Execute `roadmap chart`.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub fn run_chart(args: &ChartArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let mut state = session.view_state();
    args.filter.apply(&mut state);
    args.window.apply(&mut state);
    let snapshot = TimelineView::new(state).snapshot();

    let mut out = io::stdout().lock();
    if output.is_json() {
        serde_json::to_writer_pretty(&mut out, &snapshot)?;
        writeln!(out)?;
        return Ok(());
    }
    for line in render_chart(&snapshot, args.width) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
