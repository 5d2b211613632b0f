//! Detail-document retrieval.
//!
//! A record's `details` field is an opaque reference: a path served from a
//! local docs root, or an `http(s)://` URL. Fetches run on a worker thread
//! and report back through [`DocumentLoader::poll`], so a slow or failing
//! document never blocks the view or touches filter/window state.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Why a document could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to load markdown: {0}")]
    Status(u16),

    #[error("Failed to load markdown: {path} ({reason})")]
    Io { path: PathBuf, reason: String },

    #[error("Failed to load content: {0}")]
    Transport(String),

    #[error("Unsupported document reference '{0}'")]
    UnsupportedReference(String),

    #[error("Document load timed out")]
    TimedOut,
}

/// Anything that can turn a document reference into markdown text.
pub trait DocumentSource: Send + Sync {
    /// Fetch the document behind `reference`.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] describing the failure; callers show it
    /// inline rather than aborting.
    fn fetch(&self, reference: &str) -> Result<String, DocumentError>;
}

/// Serves references from a directory, treating a leading `/` as the
/// directory root.
#[derive(Debug, Clone)]
pub struct LocalDocuments {
    root: PathBuf,
}

impl LocalDocuments {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `reference` under the root. References that climb out of the
    /// root with `..` are rejected.
    #[must_use]
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let relative = Path::new(reference.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl DocumentSource for LocalDocuments {
    fn fetch(&self, reference: &str) -> Result<String, DocumentError> {
        let path = self
            .resolve(reference)
            .ok_or_else(|| DocumentError::UnsupportedReference(reference.to_string()))?;
        std::fs::read_to_string(&path).map_err(|err| DocumentError::Io {
            path,
            reason: err.to_string(),
        })
    }
}

/// Fetches `http://` and `https://` references.
#[derive(Debug, Clone)]
pub struct HttpDocuments {
    agent: ureq::Agent,
}

impl HttpDocuments {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl DocumentSource for HttpDocuments {
    fn fetch(&self, reference: &str) -> Result<String, DocumentError> {
        match self.agent.get(reference).call() {
            Ok(response) => response
                .into_string()
                .map_err(|err| DocumentError::Transport(err.to_string())),
            Err(ureq::Error::Status(code, _)) => Err(DocumentError::Status(code)),
            Err(err) => Err(DocumentError::Transport(err.to_string())),
        }
    }
}

/// Dispatches URLs to HTTP and everything else to the local root.
#[derive(Debug, Clone)]
pub struct RoutedDocuments {
    local: LocalDocuments,
    http: HttpDocuments,
}

impl RoutedDocuments {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            local: LocalDocuments::new(root),
            http: HttpDocuments::new(timeout),
        }
    }
}

fn is_url(reference: &str) -> bool {
    let lower = reference.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl DocumentSource for RoutedDocuments {
    fn fetch(&self, reference: &str) -> Result<String, DocumentError> {
        if is_url(reference) {
            self.http.fetch(reference)
        } else {
            self.local.fetch(reference)
        }
    }
}

/// Progress of the current detail document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentState {
    #[default]
    Idle,
    Loading,
    Failed(String),
    Ready(String),
}

impl DocumentState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Debug)]
struct Delivery {
    generation: u64,
    result: Result<String, DocumentError>,
}

/// Runs document fetches off the caller's thread.
///
/// Each request bumps a generation counter; results from older generations
/// are discarded, so closing or re-selecting while a fetch is in flight is
/// always safe.
pub struct DocumentLoader {
    source: Arc<dyn DocumentSource>,
    tx: Sender<Delivery>,
    rx: Receiver<Delivery>,
    generation: u64,
    state: DocumentState,
}

impl std::fmt::Debug for DocumentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentLoader")
            .field("generation", &self.generation)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DocumentLoader {
    #[must_use]
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            generation: 0,
            state: DocumentState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &DocumentState {
        &self.state
    }

    /// Start loading `reference`. An empty reference leaves the loader idle.
    pub fn request(&mut self, reference: &str) {
        self.generation += 1;
        if reference.trim().is_empty() {
            self.state = DocumentState::Idle;
            return;
        }

        self.state = DocumentState::Loading;
        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let reference = reference.to_string();
        debug!(%reference, generation, "document fetch started");

        std::thread::spawn(move || {
            let result = source.fetch(&reference);
            // The loader may be gone already; nothing to report to.
            let _ = tx.send(Delivery { generation, result });
        });
    }

    /// Forget the in-flight request, if any.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.state = DocumentState::Idle;
    }

    /// Apply any finished fetch for the current request. Returns true if the
    /// state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(delivery) = self.rx.try_recv() {
            changed |= self.apply(delivery);
        }
        changed
    }

    /// Block until the current request settles or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> &DocumentState {
        let deadline = Instant::now() + timeout;
        while self.state.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(delivery) => {
                    self.apply(delivery);
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                    self.state = DocumentState::Failed(DocumentError::TimedOut.to_string());
                }
            }
        }
        &self.state
    }

    fn apply(&mut self, delivery: Delivery) -> bool {
        if delivery.generation != self.generation {
            debug!(generation = delivery.generation, "dropping stale document result");
            return false;
        }
        self.state = match delivery.result {
            Ok(content) => DocumentState::Ready(content),
            Err(err) => {
                warn!("document load failed: {err}");
                DocumentState::Failed(err.to_string())
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::mpsc::SyncSender;

    struct StaticSource(Result<String, DocumentError>);

    impl DocumentSource for StaticSource {
        fn fetch(&self, _reference: &str) -> Result<String, DocumentError> {
            self.0.clone()
        }
    }

    /// Blocks each fetch until the test releases it.
    struct GatedSource {
        gate: Mutex<Receiver<()>>,
    }

    impl DocumentSource for GatedSource {
        fn fetch(&self, reference: &str) -> Result<String, DocumentError> {
            let gate = self.gate.lock().map_err(|_| DocumentError::TimedOut)?;
            gate.recv().map_err(|_| DocumentError::TimedOut)?;
            Ok(format!("# {reference}"))
        }
    }

    fn gated() -> (Arc<GatedSource>, SyncSender<()>) {
        let (tx, rx) = mpsc::sync_channel(4);
        (
            Arc::new(GatedSource {
                gate: Mutex::new(rx),
            }),
            tx,
        )
    }

    #[test]
    fn local_resolve_strips_leading_slash() {
        let docs = LocalDocuments::new("/srv/public");
        assert_eq!(
            docs.resolve("/markdown/mobile-app.md"),
            Some(PathBuf::from("/srv/public/markdown/mobile-app.md"))
        );
        assert_eq!(docs.resolve("../etc/passwd"), None);
        assert_eq!(docs.resolve("/markdown/../../secret"), None);
    }

    #[test]
    fn local_fetch_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("markdown")).unwrap();
        std::fs::write(dir.path().join("markdown/a.md"), "# A").unwrap();

        let docs = LocalDocuments::new(dir.path());
        assert_eq!(docs.fetch("/markdown/a.md").unwrap(), "# A");
        let err = docs.fetch("/markdown/missing.md").unwrap_err();
        assert!(err.to_string().starts_with("Failed to load markdown"));
    }

    #[test]
    fn status_error_message_matches_ui_text() {
        assert_eq!(
            DocumentError::Status(404).to_string(),
            "Failed to load markdown: 404"
        );
    }

    #[test]
    fn url_detection() {
        assert!(is_url("https://example.com/a.md"));
        assert!(is_url("HTTP://example.com/a.md"));
        assert!(!is_url("/markdown/a.md"));
    }

    #[test]
    fn loader_reports_ready() {
        let mut loader = DocumentLoader::new(Arc::new(StaticSource(Ok("# Title".into()))));
        loader.request("/markdown/a.md");
        assert_eq!(loader.state(), &DocumentState::Loading);
        let state = loader.wait(Duration::from_secs(5));
        assert_eq!(state, &DocumentState::Ready("# Title".into()));
    }

    #[test]
    fn loader_reports_failure_inline() {
        let mut loader =
            DocumentLoader::new(Arc::new(StaticSource(Err(DocumentError::Status(500)))));
        loader.request("/markdown/a.md");
        let state = loader.wait(Duration::from_secs(5));
        assert_eq!(
            state,
            &DocumentState::Failed("Failed to load markdown: 500".into())
        );
    }

    #[test]
    fn empty_reference_stays_idle() {
        let mut loader = DocumentLoader::new(Arc::new(StaticSource(Ok(String::new()))));
        loader.request("  ");
        assert_eq!(loader.state(), &DocumentState::Idle);
    }

    #[test]
    fn stale_results_are_dropped_after_cancel() {
        let (source, release) = gated();
        let mut loader = DocumentLoader::new(source);
        loader.request("first");
        loader.cancel();
        release.send(()).unwrap();

        // Give the worker time to deliver, then confirm nothing was applied.
        std::thread::sleep(Duration::from_millis(50));
        assert!(!loader.poll());
        assert_eq!(loader.state(), &DocumentState::Idle);
    }

    #[test]
    fn reselect_keeps_only_latest_result() {
        let (source, release) = gated();
        let mut loader = DocumentLoader::new(source);
        loader.request("first");
        loader.request("second");
        release.send(()).unwrap();
        release.send(()).unwrap();

        let state = loader.wait(Duration::from_secs(5)).clone();
        // The first delivery is stale; only "second" may land.
        assert_eq!(state, DocumentState::Ready("# second".into()));
    }
}
