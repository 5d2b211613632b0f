//! Terminal user interface (TUI) for the roadmap timeline.
//!
//! ## Entry points
//!
//! - [`run_timeline_tui`]: owner lanes over a month axis, with filters,
//!   window controls and a markdown detail modal.

pub mod detail;
pub mod timeline;

use crate::session::Session;
use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use roadmap_core::document::DocumentLoader;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use timeline::TimelineApp;
use tracing::info;

/// Roughly 30 redraws per second while idle.
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Run the interactive timeline until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or restored, or if
/// drawing fails.
pub fn run_timeline_tui(session: &Session) -> Result<()> {
    let loader = DocumentLoader::new(Arc::new(session.documents()));
    let mut app = TimelineApp::new(session.timeline(), loader);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(err).context("failed to enter alternate screen");
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    info!("timeline started");

    let result = event_loop(&mut terminal, &mut app);

    // Restore the terminal even when the loop failed.
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut TimelineApp) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|frame| app.render(frame, frame.area()))?;

        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
