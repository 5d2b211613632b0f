//! `roadmap show`: one record with its markdown document.
//!
//! The document is fetched the same way the detail modal fetches it. A failed
//! fetch is reported inline; the record itself still prints and the command
//! succeeds.

use crate::gantt::short_date;
use crate::markdown;
use crate::output::{
    OutputMode, PRETTY_RULE_WIDTH, pretty_kv, pretty_rule, pretty_section, render_mode,
};
use crate::session::Session;
use clap::Args;
use roadmap_core::document::{DocumentLoader, DocumentState};
use roadmap_core::error::ErrorCode;
use roadmap_core::model::RoadmapRecord;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record ID to display.
    pub id: String,

    /// Print the markdown source instead of rendering it.
    #[arg(long)]
    pub raw: bool,
}

/// Outcome of the document fetch as printed by `roadmap show`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ShowDocument {
    pub reference: String,
    /// `ready`, `failed` or `none` (the record has no document).
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl ShowDocument {
    fn from_state(reference: &str, state: &DocumentState) -> Self {
        let mut doc = Self {
            reference: reference.to_string(),
            state: "none",
            content: None,
            error: None,
            error_code: None,
        };
        match state {
            DocumentState::Ready(content) => {
                doc.state = "ready";
                doc.content = Some(content.clone());
            }
            DocumentState::Failed(message) => {
                doc.state = "failed";
                doc.error = Some(message.clone());
                doc.error_code = Some(ErrorCode::DocumentFetchFailed.to_string());
            }
            DocumentState::Idle | DocumentState::Loading => {}
        }
        doc
    }
}

#[derive(Debug, Serialize)]
pub struct ShowRecord {
    pub record: RoadmapRecord,
    pub document: ShowDocument,
    #[serde(skip)]
    raw: bool,
}

/// Execute `roadmap show <id>`.
///
/// # Errors
///
/// Returns [`roadmap_core::error::RoadmapError::RecordNotFound`] for an
/// unknown id, or an error if writing output fails.
pub fn run_show(args: &ShowArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let mut view = session.timeline();
    let request = view.select(&args.id)?;
    let record = session.store().require(&request.id)?.clone();

    let mut loader = DocumentLoader::new(Arc::new(session.documents()));
    loader.request(&request.reference);
    let wait = session.config.documents.timeout() + Duration::from_secs(1);
    let document = ShowDocument::from_state(&request.reference, loader.wait(wait));
    view.close_detail();

    let shown = ShowRecord {
        record,
        document,
        raw: args.raw,
    };
    render_mode(output, &shown, render_show_text, render_show_human)
}

fn document_body(shown: &ShowRecord) -> Vec<String> {
    let doc = &shown.document;
    if let Some(error) = &doc.error {
        return vec![format!("Error: {error}")];
    }
    let Some(content) = &doc.content else {
        return Vec::new();
    };
    if shown.raw {
        return content.lines().map(str::to_string).collect();
    }
    let width = u16::try_from(PRETTY_RULE_WIDTH).unwrap_or(u16::MAX);
    markdown::to_plain(&markdown::render(content, width))
        .lines()
        .map(str::to_string)
        .collect()
}

fn render_show_human(shown: &ShowRecord, w: &mut dyn Write) -> std::io::Result<()> {
    let record = &shown.record;
    pretty_section(w, &format!("Record {}", record.id))?;
    writeln!(w, "{}", record.name)?;
    pretty_rule(w)?;
    pretty_kv(w, "Owner", &record.owner)?;
    pretty_kv(w, "Status", record.status.label())?;
    pretty_kv(
        w,
        "Dates",
        format!(
            "{} to {}",
            short_date(record.start_date),
            short_date(record.end_date)
        ),
    )?;
    pretty_kv(w, "Details", &record.details)?;

    let body = document_body(shown);
    if !body.is_empty() {
        writeln!(w)?;
        for line in body {
            writeln!(w, "{line}")?;
        }
    }
    Ok(())
}

fn render_show_text(shown: &ShowRecord, w: &mut dyn Write) -> std::io::Result<()> {
    let record = &shown.record;
    writeln!(w, "id:       {}", record.id)?;
    writeln!(w, "name:     {}", record.name)?;
    writeln!(w, "owner:    {}", record.owner)?;
    writeln!(w, "status:   {}", record.status)?;
    writeln!(w, "start:    {}", record.start_date)?;
    writeln!(w, "end:      {}", record.end_date)?;
    writeln!(w, "details:  {}", record.details)?;
    writeln!(w, "document: {}", shown.document.state)?;
    let body = document_body(shown);
    if !body.is_empty() {
        writeln!(w)?;
        for line in body {
            writeln!(w, "{line}")?;
        }
    }
    Ok(())
}
