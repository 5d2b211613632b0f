pub mod axis;
pub mod chart;
pub mod completions;
pub mod config;
pub mod list;
pub mod owners;
pub mod show;

use clap::Args;
use roadmap_core::filter::ViewState;
use tracing::warn;

/// `--status` / `--owner` filters shared by the read commands.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Only show records with this status (completed, in-progress, planned).
    #[arg(short, long)]
    pub status: Option<String>,

    /// Only show records owned by this team.
    #[arg(short, long)]
    pub owner: Option<String>,
}

impl FilterArgs {
    pub fn apply(&self, state: &mut ViewState) {
        if let Some(status) = &self.status {
            state.set_status_filter(status);
        }
        if let Some(owner) = &self.owner {
            state.set_owner_filter(owner);
        }
    }
}

/// `--from` / `--to` window bounds. Unparseable dates are ignored.
#[derive(Args, Debug, Default, Clone)]
pub struct WindowArgs {
    /// First visible day (YYYY-MM-DD). Defaults to the earliest record start.
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Last visible day (YYYY-MM-DD). Defaults to the latest record end.
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,
}

impl WindowArgs {
    pub fn apply(&self, state: &mut ViewState) {
        if let Some(raw) = &self.from
            && !state.set_window_start_input(raw)
        {
            warn!("ignoring unparseable --from value '{raw}'");
        }
        if let Some(raw) = &self.to
            && !state.set_window_end_input(raw)
        {
            warn!("ignoring unparseable --to value '{raw}'");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_core::filter::SpacingBounds;
    use roadmap_core::store::RecordStore;
    use roadmap_core::window::parse_date;

    fn state() -> ViewState {
        ViewState::new(
            RecordStore::seed(),
            SpacingBounds::default(),
            parse_date("2026-01-01").unwrap(),
        )
    }

    #[test]
    fn window_args_apply_in_order() {
        let mut s = state();
        WindowArgs {
            from: Some("2025-10-01".into()),
            to: Some("2025-10-31".into()),
        }
        .apply(&mut s);
        assert_eq!(s.window().start, parse_date("2025-10-01").unwrap());
        assert_eq!(s.window().end, parse_date("2025-10-31").unwrap());
    }

    #[test]
    fn bad_window_args_are_ignored() {
        let mut s = state();
        let before = s.window();
        WindowArgs {
            from: Some("next week".into()),
            to: Some("2025-02-30".into()),
        }
        .apply(&mut s);
        assert_eq!(s.window(), before);
    }

    #[test]
    fn filter_args_apply_both() {
        let mut s = state();
        FilterArgs {
            status: Some("planned".into()),
            owner: Some("AI Team".into()),
        }
        .apply(&mut s);
        assert_eq!(s.filtered_records().len(), 1);
    }
}
