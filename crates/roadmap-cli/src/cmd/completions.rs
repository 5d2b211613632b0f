//! `roadmap completions`: shell completion scripts.

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::{Shell, generate};
use std::io::Write;

const BIN_NAME: &str = "roadmap";

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Print the completion script for `shell` to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout().lock();
    write_script(shell, command, &mut out)?;
    out.flush().context("failed to flush completion script")
}

fn write_script(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) -> Result<()> {
    generate(shell, command, BIN_NAME, out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    fn demo() -> Command {
        Command::new("roadmap-cli")
            .subcommand(Command::new("chart"))
            .subcommand(Command::new("tui"))
    }

    #[test]
    fn scripts_name_every_subcommand() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let mut buf = Vec::new();
            write_script(shell, &mut demo(), &mut buf).unwrap();
            let script = String::from_utf8(buf).unwrap();
            assert!(script.contains("roadmap"), "{shell}");
            assert!(script.contains("chart"), "{shell}");
            assert!(script.contains("tui"), "{shell}");
        }
    }
}
