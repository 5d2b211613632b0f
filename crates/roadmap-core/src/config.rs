use crate::error::RoadmapError;
use crate::filter::SpacingBounds;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Project config directory, relative to the project root.
pub const PROJECT_DIR: &str = ".roadmap";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Records file; the bundled seed roadmap is used when unset.
    #[serde(default)]
    pub records: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_docs_root")]
    pub root: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            root: default_docs_root(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DocumentsConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_row_spacing")]
    pub row_spacing: u32,
    #[serde(default = "default_row_spacing_min")]
    pub row_spacing_min: u32,
    #[serde(default = "default_row_spacing_max")]
    pub row_spacing_max: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_spacing: default_row_spacing(),
            row_spacing_min: default_row_spacing_min(),
            row_spacing_max: default_row_spacing_max(),
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn spacing_bounds(&self) -> SpacingBounds {
        SpacingBounds {
            default: self.row_spacing,
            min: self.row_spacing_min,
            max: self.row_spacing_max,
        }
        .normalized()
    }
}

impl ProjectConfig {
    /// Records file resolved against `project_root`, if one is configured.
    #[must_use]
    pub fn records_path(&self, project_root: &Path) -> Option<PathBuf> {
        self.data.records.as_ref().map(|p| project_root.join(p))
    }

    /// Document root resolved against `project_root`.
    #[must_use]
    pub fn docs_root(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.documents.root)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

/// Load `.roadmap/config.toml` under `project_root`, or defaults if absent.
///
/// # Errors
///
/// Fails if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(PROJECT_DIR).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content).map_err(|err| {
        RoadmapError::ConfigInvalid {
            path,
            reason: err.message().to_string(),
        }
        .into()
    })
}

/// Load the per-user config from the platform config directory.
///
/// # Errors
///
/// Fails if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("roadmap/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content).map_err(|err| {
        RoadmapError::ConfigInvalid {
            path,
            reason: err.message().to_string(),
        }
        .into()
    })
}

/// Load both config layers alongside the output mode the caller settled on.
///
/// # Errors
///
/// Propagates config load failures.
pub fn resolve_config(project_root: &Path, resolved_output: &str) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    tracing::info!(output = resolved_output, "configuration resolved");

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output: resolved_output.to_string(),
    })
}

fn default_docs_root() -> PathBuf {
    PathBuf::from("public")
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_row_spacing() -> u32 {
    200
}

const fn default_row_spacing_min() -> u32 {
    160
}

const fn default_row_spacing_max() -> u32 {
    480
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Temp project root with `.roadmap/config.toml` holding `body`.
    fn project_with_config(body: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(PROJECT_DIR)).unwrap();
        std::fs::write(dir.path().join(PROJECT_DIR).join("config.toml"), body).unwrap();
        dir
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = load_project_config(dir.path()).unwrap();
        assert_eq!(cfg.data.records, None);
        assert_eq!(cfg.documents.root, PathBuf::from("public"));
        assert_eq!(cfg.documents.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.layout.spacing_bounds(), SpacingBounds::default());
    }

    #[test]
    fn project_config_sections_parse() {
        let dir = project_with_config(
            r#"
[data]
records = "plan/records.toml"

[documents]
root = "docs"
timeout_secs = 3

[layout]
row_spacing = 240
"#,
        );
        let root = dir.path();

        let cfg = load_project_config(root).unwrap();
        assert_eq!(
            cfg.records_path(root),
            Some(root.join("plan/records.toml"))
        );
        assert_eq!(cfg.docs_root(root), root.join("docs"));
        assert_eq!(cfg.documents.timeout_secs, 3);
        let bounds = cfg.layout.spacing_bounds();
        assert_eq!((bounds.default, bounds.min, bounds.max), (240, 160, 480));
    }

    #[test]
    fn malformed_project_config_is_an_error() {
        let dir = project_with_config("[layout\nrow_spacing = ");

        let err = load_project_config(dir.path()).unwrap_err();
        let typed = err.downcast_ref::<RoadmapError>().expect("typed error");
        assert_eq!(typed.error_code(), crate::error::ErrorCode::ConfigParseError);
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn user_config_parses_output() {
        let cfg: UserConfig = toml::from_str("output = \"json\"\n").expect("parse");
        assert_eq!(cfg.output, Some("json".to_string()));
        let empty: UserConfig = toml::from_str("").expect("parse");
        assert_eq!(empty.output, None);
    }
}
