//! Output layer shared by every subcommand.
//!
//! Each handler gets an [`OutputMode`]: `pretty` for people at a terminal,
//! `text` for pipes (one row per line, two-space separated, header first),
//! `json` for scripts.
//!
//! # Mode resolution
//!
//! Highest wins:
//! 1. `--format`, then the hidden `--json` flag
//! 2. `ROADMAP_FORMAT` env var
//! 3. `output` in the user config file
//! 4. `pretty` when stdout is a TTY, `text` otherwise

use clap::ValueEnum;
use roadmap_core::error::RoadmapError;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Width of separators in pretty output.
pub const PRETTY_RULE_WIDTH: usize = 72;

pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", "-".repeat(PRETTY_RULE_WIDTH))
}

/// Heading line plus separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// `Key:` padded to a fixed column, then the value.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    let label = format!("{key}:");
    writeln!(w, "{label:<12} {}", value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Sections and friendly dates.
    Pretty,
    /// Plain rows for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    /// Lenient parse for env and config values. Accepts `human` and `table`
    /// as aliases; anything else is `None`.
    fn from_setting(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some(Self::Pretty),
            "text" | "table" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Every input that can pick an output mode.
#[derive(Debug, Default, Clone, Copy)]
struct ModeSources<'a> {
    format_flag: Option<OutputMode>,
    json_flag: bool,
    env: Option<&'a str>,
    user: Option<&'a str>,
    is_tty: bool,
}

impl ModeSources<'_> {
    fn resolve(self) -> OutputMode {
        if let Some(mode) = self.format_flag {
            return mode;
        }
        if self.json_flag {
            return OutputMode::Json;
        }
        // Unrecognized env or config values fall through to the next layer.
        self.env
            .and_then(OutputMode::from_setting)
            .or_else(|| self.user.and_then(OutputMode::from_setting))
            .unwrap_or(if self.is_tty {
                OutputMode::Pretty
            } else {
                OutputMode::Text
            })
    }
}

/// Pick the output mode from flags, `ROADMAP_FORMAT`, the user config and
/// whether stdout is a terminal.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    user_output: Option<&str>,
) -> OutputMode {
    let env = std::env::var("ROADMAP_FORMAT").ok();
    ModeSources {
        format_flag,
        json_flag,
        env: env.as_deref(),
        user: user_output,
        is_tty: io::stdout().is_terminal(),
    }
    .resolve()
}

/// A row type printed by list-style commands.
///
/// JSON comes from `Serialize`; the other two modes are hand-written.
pub trait Renderable: Serialize {
    /// Column names for text mode, in [`Renderable::render_row`] order.
    const HEADERS: &'static [&'static str];

    /// Multi-line human block for one item.
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()>;

    /// One text-mode row, no header.
    fn render_row(&self, w: &mut dyn Write) -> io::Result<()>;
}

/// Print `items` to stdout in `mode`.
pub fn render_list<R: Renderable>(items: &[R], mode: OutputMode) -> io::Result<()> {
    write_list(items, mode, &mut io::stdout().lock())
}

/// Write `items` in `mode`: a JSON array, a header plus rows (no header when
/// empty), or human blocks back to back.
pub fn write_list<R: Renderable>(
    items: &[R],
    mode: OutputMode,
    out: &mut dyn Write,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, items)?;
            writeln!(out)
        }
        OutputMode::Text => {
            if !items.is_empty() {
                writeln!(out, "{}", R::HEADERS.join("  "))?;
            }
            items.iter().try_for_each(|item| item.render_row(out))
        }
        OutputMode::Pretty => items.iter().try_for_each(|item| item.render_human(out)),
    }
}

type RenderFn<T> = fn(&T, &mut dyn Write) -> io::Result<()>;

/// Print a single value: JSON via serde, otherwise the matching renderer.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text: RenderFn<T>,
    pretty: RenderFn<T>,
) -> anyhow::Result<()> {
    write_value(mode, value, text, pretty, &mut io::stdout().lock())?;
    Ok(())
}

fn write_value<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text: RenderFn<T>,
    pretty: RenderFn<T>,
    out: &mut dyn Write,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)
        }
        OutputMode::Text => text(value, out),
        OutputMode::Pretty => pretty(value, out),
    }
}

/// What a failed command prints on stderr.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    /// How to fix it, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Stable `E####` code for scripts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl From<&RoadmapError> for CliError {
    fn from(err: &RoadmapError) -> Self {
        Self {
            message: err.to_string(),
            hint: Some(err.suggestion()),
            error_code: Some(err.error_code().to_string()),
        }
    }
}

impl From<&anyhow::Error> for CliError {
    fn from(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<RoadmapError>() {
            Some(typed) => Self::from(typed),
            None => Self {
                message: format!("{err:#}"),
                hint: None,
                error_code: None,
            },
        }
    }
}

/// Write `error` as `{"error": {...}}` in JSON mode, otherwise as an
/// `error:` line plus an optional `hint:` line.
pub fn write_error(mode: OutputMode, error: &CliError, out: &mut dyn Write) -> io::Result<()> {
    if mode.is_json() {
        serde_json::to_writer_pretty(&mut *out, &serde_json::json!({ "error": error }))?;
        return writeln!(out);
    }
    writeln!(out, "error: {}", error.message)?;
    if let Some(hint) = &error.hint {
        writeln!(out, "  hint: {hint}")?;
    }
    Ok(())
}

/// Print `error` to stderr.
pub fn render_error(mode: OutputMode, error: &CliError) -> io::Result<()> {
    write_error(mode, error, &mut io::stderr().lock())
}
