//! `roadmap axis`: month ticks for a window.

use crate::cmd::WindowArgs;
use crate::output::{OutputMode, Renderable, render_list};
use crate::session::Session;
use clap::Args;
use roadmap_core::axis::{AxisTick, month_ticks};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Args, Debug, Default)]
pub struct AxisArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}

#[derive(Serialize)]
#[serde(transparent)]
struct TickRow(AxisTick);

impl Renderable for TickRow {
    const HEADERS: &'static [&'static str] = &["DATE", "POSITION%", "LABEL"];

    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{:<10} {:>7.2}%  {}",
            self.0.label, self.0.position_percent, self.0.date
        )
    }

    fn render_row(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}  {:.2}  {}",
            self.0.date, self.0.position_percent, self.0.label
        )
    }
}

/// Execute `roadmap axis`.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub fn run_axis(args: &AxisArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let mut state = session.view_state();
    args.window.apply(&mut state);

    let ticks: Vec<TickRow> = month_ticks(state.window()).map(TickRow).collect();
    render_list(&ticks, output)?;
    Ok(())
}
