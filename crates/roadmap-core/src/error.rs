use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes surfaced by the CLI in JSON mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    RecordSourceUnreadable,
    RecordSourceInvalid,
    RecordNotFound,
    InvalidDate,
    DocumentFetchFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::RecordSourceUnreadable => "E1101",
            Self::RecordSourceInvalid => "E1102",
            Self::RecordNotFound => "E2001",
            Self::InvalidDate => "E2005",
            Self::DocumentFetchFailed => "E6101",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::RecordSourceUnreadable => "Records file could not be read",
            Self::RecordSourceInvalid => "Records file is not valid",
            Self::RecordNotFound => "Record not found",
            Self::InvalidDate => "Invalid date",
            Self::DocumentFetchFailed => "Document fetch failed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .roadmap/config.toml and retry."),
            Self::RecordSourceUnreadable => {
                Some("Check the path given by --records or [data] records.")
            }
            Self::RecordSourceInvalid => Some(
                "Records need id, name, start_date, end_date, status, owner and details fields.",
            ),
            Self::RecordNotFound => Some("Run `roadmap list` to see known record IDs."),
            Self::InvalidDate => Some("Use the YYYY-MM-DD format."),
            Self::DocumentFetchFailed => {
                Some("Check [documents] root or that the document URL is reachable.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Typed failures raised by the core library.
#[derive(Debug, thiserror::Error)]
pub enum RoadmapError {
    #[error("failed to parse config {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("failed to read records from {path}: {source}")]
    RecordSourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse records from {path}: {reason}")]
    RecordSourceInvalid { path: PathBuf, reason: String },

    #[error("record '{0}' not found")]
    RecordNotFound(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),
}

impl RoadmapError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::ConfigInvalid { .. } => ErrorCode::ConfigParseError,
            Self::RecordSourceUnreadable { .. } => ErrorCode::RecordSourceUnreadable,
            Self::RecordSourceInvalid { .. } => ErrorCode::RecordSourceInvalid,
            Self::RecordNotFound(_) => ErrorCode::RecordNotFound,
            Self::InvalidDate(_) => ErrorCode::InvalidDate,
        }
    }

    /// Remediation text; falls back to the code's summary.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or_else(|| code.message()).to_string()
    }
}
