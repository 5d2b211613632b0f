#![forbid(unsafe_code)]

mod cmd;
mod gantt;
mod markdown;
mod output;
mod session;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use roadmap_core::config::{UserConfig, load_user_config};
use session::Session;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "roadmap: timeline view of a project roadmap",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output (same as --format json).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Records file (TOML or JSON). Overrides `[data] records`.
    #[arg(long, global = true, value_name = "PATH")]
    records: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    const fn is_tui(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }

    /// Log filter used when `ROADMAP_LOG` is unset.
    fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "roadmap=debug,info"
        } else if self.quiet {
            "error"
        } else if self.is_tui() {
            "warn"
        } else if env::var("DEBUG").is_ok() {
            "roadmap=debug,info"
        } else {
            "roadmap=info,warn"
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Interactive",
        about = "Open the interactive timeline",
        long_about = "Open the terminal timeline. This is the default when no subcommand is given.",
        after_help = "EXAMPLES:\n    # Browse the bundled roadmap\n    roadmap\n\n    # Browse a records file\n    roadmap tui --records plan/roadmap.toml"
    )]
    Tui,

    #[command(
        next_help_heading = "Read",
        about = "List positioned records",
        long_about = "List records that pass the filters and overlap the window, with their row and horizontal position.",
        after_help = "EXAMPLES:\n    # Everything in the full span\n    roadmap list\n\n    # One team in October\n    roadmap list --owner \"Data Team\" --from 2025-10-01 --to 2025-10-31\n\n    # Emit machine-readable output\n    roadmap list --format json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show month ticks for a window",
        after_help = "EXAMPLES:\n    # Ticks for the full span\n    roadmap axis\n\n    # Ticks for one quarter\n    roadmap axis --from 2025-10-01 --to 2025-12-31"
    )]
    Axis(cmd::axis::AxisArgs),

    #[command(
        next_help_heading = "Read",
        about = "Draw the timeline as text",
        long_about = "Draw a static text Gantt chart: one lane per owner, month ticks and a status legend.",
        after_help = "EXAMPLES:\n    # Default 80 columns\n    roadmap chart\n\n    # Wider chart of planned work\n    roadmap chart --width 120 --status planned"
    )]
    Chart(cmd::chart::ChartArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one record and its document",
        long_about = "Show a record's fields and its markdown document. A document that fails to load is reported inline.",
        after_help = "EXAMPLES:\n    # Show a record\n    roadmap show 3\n\n    # Print the markdown source\n    roadmap show 3 --raw\n\n    # Emit machine-readable output\n    roadmap show 3 --format json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Read",
        about = "List owners and statuses",
        after_help = "EXAMPLES:\n    # Filter choices\n    roadmap owners"
    )]
    Owners,

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Show or edit configuration",
        after_help = "EXAMPLES:\n    # Effective configuration\n    roadmap config show\n\n    # Wider lanes by default\n    roadmap config set layout.row_spacing 280\n\n    # Always emit JSON\n    roadmap config set --scope user output json"
    )]
    Config(cmd::config::ConfigArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    roadmap completions bash\n\n    # Generate zsh completions\n    roadmap completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_env("ROADMAP_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));

    let format = env::var("ROADMAP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: Cli, output: OutputMode) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;

    let command = match cli.command {
        Some(Commands::Completions(args)) => {
            return cmd::completions::run_completions(args.shell, &mut Cli::command());
        }
        Some(Commands::Config(args)) => {
            return cmd::config::run_config(&args, &project_root, output);
        }
        other => other.unwrap_or(Commands::Tui),
    };

    let session = Session::open(&project_root, cli.records.as_deref())?;

    match command {
        Commands::Tui => tui::run_timeline_tui(&session),
        Commands::List(args) => cmd::list::run_list(&args, output, &session),
        Commands::Axis(args) => cmd::axis::run_axis(&args, output, &session),
        Commands::Chart(args) => cmd::chart::run_chart(&args, output, &session),
        Commands::Show(args) => cmd::show::run_show(&args, output, &session),
        Commands::Owners => cmd::owners::run_owners(output, &session),
        Commands::Completions(_) | Commands::Config(_) => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.default_log_filter());

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let user = load_user_config().unwrap_or_else(|err| {
        warn!("ignoring user config: {err:#}");
        UserConfig::default()
    });
    let output = resolve_output_mode(cli.format, cli.json, user.output.as_deref());

    match run(cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(render_err) = render_error(output, &CliError::from(&err)) {
                eprintln!("error: {err:#} ({render_err})");
            }
            ExitCode::FAILURE
        }
    }
}
