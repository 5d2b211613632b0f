//! `roadmap config`: inspect and edit project and user configuration.

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Subcommand, ValueEnum};
use roadmap_core::config::{EffectiveConfig, PROJECT_DIR, resolve_config};
use serde::Serialize;
use std::path::{Path, PathBuf};
use toml::Value;
use tracing::info;

use crate::output::OutputMode;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show the effective configuration, or one raw file
    Show(ShowArgs),
    /// Set a key in the project or user config
    Set(SetArgs),
    /// Remove a key from the project or user config
    Unset(UnsetArgs),
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Print the raw project file only
    #[arg(long, conflicts_with = "user")]
    project: bool,

    /// Print the raw user file only
    #[arg(long)]
    user: bool,
}

#[derive(Args, Debug)]
struct SetArgs {
    #[arg(long, default_value = "project")]
    scope: ConfigScope,

    /// Key, e.g. layout.row_spacing, documents.root or output
    key: String,

    value: String,
}

#[derive(Args, Debug)]
struct UnsetArgs {
    #[arg(long, default_value = "project")]
    scope: ConfigScope,

    /// Key, e.g. layout.row_spacing, documents.root or output
    key: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum ConfigScope {
    Project,
    User,
}

impl ConfigScope {
    fn path(self, project_root: &Path) -> Result<PathBuf> {
        match self {
            Self::Project => Ok(project_root.join(PROJECT_DIR).join("config.toml")),
            Self::User => dirs::config_dir()
                .map(|dir| dir.join("roadmap").join("config.toml"))
                .ok_or_else(|| anyhow!("no user config directory on this system")),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::User => "user",
        }
    }
}

/// What a key accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Path,
    Count,
    OutputMode,
}

/// One editable key: where it lives and what it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConfigKey {
    scope: ConfigScope,
    section: Option<&'static str>,
    leaf: &'static str,
    kind: ValueKind,
}

const KNOWN_KEYS: &[ConfigKey] = &[
    ConfigKey::project("data", "records", ValueKind::Path),
    ConfigKey::project("documents", "root", ValueKind::Path),
    ConfigKey::project("documents", "timeout_secs", ValueKind::Count),
    ConfigKey::project("layout", "row_spacing", ValueKind::Count),
    ConfigKey::project("layout", "row_spacing_min", ValueKind::Count),
    ConfigKey::project("layout", "row_spacing_max", ValueKind::Count),
    ConfigKey {
        scope: ConfigScope::User,
        section: None,
        leaf: "output",
        kind: ValueKind::OutputMode,
    },
];

impl ConfigKey {
    const fn project(section: &'static str, leaf: &'static str, kind: ValueKind) -> Self {
        Self {
            scope: ConfigScope::Project,
            section: Some(section),
            leaf,
            kind,
        }
    }

    fn lookup(scope: ConfigScope, dotted: &str) -> Result<Self> {
        let (section, leaf) = match dotted.split_once('.') {
            Some((section, leaf)) => (Some(section), leaf),
            None => (None, dotted),
        };
        KNOWN_KEYS
            .iter()
            .find(|k| k.scope == scope && k.section == section && k.leaf == leaf)
            .copied()
            .ok_or_else(|| anyhow!("unknown {} config key `{dotted}`", scope.as_str()))
    }

    fn parse(self, raw: &str) -> Result<Value> {
        let raw = raw.trim();
        match self.kind {
            ValueKind::Path => Ok(Value::String(raw.to_string())),
            ValueKind::Count => {
                let n: u32 = raw
                    .parse()
                    .with_context(|| format!("`{}` expects a whole number", self.leaf))?;
                Ok(Value::Integer(i64::from(n)))
            }
            ValueKind::OutputMode => match raw.to_ascii_lowercase().as_str() {
                mode @ ("pretty" | "text" | "json") => Ok(Value::String(mode.to_string())),
                _ => bail!("`{}` expects pretty, text or json", self.leaf),
            },
        }
    }

    /// Write `value` into `doc`, creating the section if needed.
    fn set(self, doc: &mut toml::Table, value: Value) -> Result<()> {
        let table = match self.section {
            None => doc,
            Some(section) => doc
                .entry(section)
                .or_insert_with(|| Value::Table(toml::Table::new()))
                .as_table_mut()
                .ok_or_else(|| anyhow!("`{section}` is not a table"))?,
        };
        table.insert(self.leaf.to_string(), value);
        Ok(())
    }

    /// Remove the key; an emptied section goes too.
    fn unset(self, doc: &mut toml::Table) {
        match self.section {
            None => {
                doc.remove(self.leaf);
            }
            Some(section) => {
                let emptied = doc
                    .get_mut(section)
                    .and_then(Value::as_table_mut)
                    .is_some_and(|table| {
                        table.remove(self.leaf);
                        table.is_empty()
                    });
                if emptied {
                    doc.remove(section);
                }
            }
        }
    }
}

/// Execute `roadmap config`.
///
/// # Errors
///
/// Returns an error for unknown keys, badly typed values, or unreadable or
/// unwritable config files.
pub fn run_config(args: &ConfigArgs, project_root: &Path, output: OutputMode) -> Result<()> {
    match &args.command {
        ConfigCommand::Show(show) => run_show(show, project_root, output),
        ConfigCommand::Set(set) => {
            let key = ConfigKey::lookup(set.scope, &set.key)?;
            let value = key.parse(&set.value)?;
            edit(set.scope, project_root, |doc| key.set(doc, value))?;
            info!(key = %set.key, scope = set.scope.as_str(), "config key set");
            print_ack(output, "set", set.scope, &set.key)
        }
        ConfigCommand::Unset(unset) => {
            let key = ConfigKey::lookup(unset.scope, &unset.key)?;
            edit(unset.scope, project_root, |doc| {
                key.unset(doc);
                Ok(())
            })?;
            info!(key = %unset.key, scope = unset.scope.as_str(), "config key unset");
            print_ack(output, "unset", unset.scope, &unset.key)
        }
    }
}

fn run_show(args: &ShowArgs, project_root: &Path, output: OutputMode) -> Result<()> {
    let raw_scope = if args.project {
        Some(ConfigScope::Project)
    } else if args.user {
        Some(ConfigScope::User)
    } else {
        None
    };

    if let Some(scope) = raw_scope {
        let doc = read_table(&scope.path(project_root)?)?;
        if output.is_json() {
            println!("{}", serde_json::to_string_pretty(&doc)?);
        } else {
            print!("{}", toml::to_string_pretty(&doc)?);
        }
        return Ok(());
    }

    let effective = resolve_config(project_root, output.as_str())?;
    print_effective(&effective, output)
}

/// Load the scope's file (or an empty table), apply `change`, write it back.
fn edit(
    scope: ConfigScope,
    project_root: &Path,
    change: impl FnOnce(&mut toml::Table) -> Result<()>,
) -> Result<()> {
    let path = scope.path(project_root)?;
    let mut doc = read_table(&path)?;
    change(&mut doc)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, toml::to_string_pretty(&doc)?)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn read_table(path: &Path) -> Result<toml::Table> {
    if !path.exists() {
        return Ok(toml::Table::new());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_effective(value: &EffectiveConfig, output: OutputMode) -> Result<()> {
    if output.is_json() {
        println!("{}", serde_json::to_string_pretty(value)?);
        return Ok(());
    }

    let project = &value.project;
    let records = project
        .data
        .records
        .as_ref()
        .map_or_else(|| "(bundled seed)".to_string(), |p| p.display().to_string());
    let entries = [
        ("data.records", records),
        ("documents.root", project.documents.root.display().to_string()),
        ("documents.timeout_secs", project.documents.timeout_secs.to_string()),
        ("layout.row_spacing", project.layout.row_spacing.to_string()),
        ("layout.row_spacing_min", project.layout.row_spacing_min.to_string()),
        ("layout.row_spacing_max", project.layout.row_spacing_max.to_string()),
    ];

    let separator = if output == OutputMode::Text { "=" } else { " = " };
    println!("resolved_output{separator}{}", value.resolved_output);
    for (key, val) in entries {
        println!("{key}{separator}{val}");
    }
    if let Some(out) = &value.user.output {
        println!("output{separator}{out}");
    }
    Ok(())
}

#[derive(Serialize)]
struct Ack<'a> {
    ok: bool,
    action: &'a str,
    scope: ConfigScope,
    key: &'a str,
}

fn print_ack(output: OutputMode, action: &str, scope: ConfigScope, key: &str) -> Result<()> {
    match output {
        OutputMode::Json => {
            let ack = Ack {
                ok: true,
                action,
                scope,
                key,
            };
            println!("{}", serde_json::to_string_pretty(&ack)?);
        }
        OutputMode::Text => println!("ok=true action={action} scope={} key={key}", scope.as_str()),
        OutputMode::Pretty => println!("{action} {key} in {} config", scope.as_str()),
    }
    Ok(())
}
