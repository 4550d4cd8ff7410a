// outagekit/src/flows/retrieval.rs
//
// Report and comparison pages: fetch one named artifact on entry.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{BusyFlag, FlowScope};
use crate::client::OutageBackend;
use crate::types::{AnalysisReport, ComparisonReport};

#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactView<T> {
    Loading,
    Loaded(Box<T>),
    Failed(String),
}

impl<T> ArtifactView<T> {
    pub fn document(&self) -> Option<&T> {
        match self {
            ArtifactView::Loaded(doc) => Some(doc.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ArtifactView::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed(String),
    /// Already fetched (or fetching) for this entry.
    Skipped,
    Cancelled,
}

pub struct ArtifactController<T, B: OutageBackend + ?Sized> {
    backend: Arc<B>,
    filename: String,
    state: watch::Sender<ArtifactView<T>>,
    busy: BusyFlag,
    started: AtomicBool,
    scope: FlowScope,
    _doc: PhantomData<fn() -> T>,
}

pub type ReportController<B> = ArtifactController<AnalysisReport, B>;
pub type ComparisonController<B> = ArtifactController<ComparisonReport, B>;

impl<T, B> ArtifactController<T, B>
where
    T: DeserializeOwned + Clone + Send + Sync,
    B: OutageBackend + ?Sized,
{
    pub fn new(backend: Arc<B>, filename: &str) -> Self {
        let (state, _) = watch::channel(ArtifactView::Loading);
        Self {
            backend,
            filename: filename.to_string(),
            state,
            busy: BusyFlag::new(),
            started: AtomicBool::new(false),
            scope: FlowScope::new(),
            _doc: PhantomData,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn subscribe(&self) -> watch::Receiver<ArtifactView<T>> {
        self.state.subscribe()
    }

    pub fn view(&self) -> ArtifactView<T> {
        self.state.borrow().clone()
    }

    pub fn unmount(&self) {
        self.scope.cancel();
    }

    /// Fetch the artifact. Runs once per controller; there is no retry and
    /// the view stays `Loading` until the single fetch resolves.
    pub async fn load(&self) -> LoadOutcome {
        let Some(_busy) = self.busy.try_acquire() else {
            return LoadOutcome::Skipped;
        };
        if self.started.swap(true, Ordering::SeqCst) {
            return LoadOutcome::Skipped;
        }

        let result = match self.backend.get_report(&self.filename).await {
            Ok(value) => serde_json::from_value::<T>(value)
                .map_err(|e| format!("Failed to load report: {}", e)),
            Err(e) => Err(e.to_string()),
        };

        if self.scope.is_cancelled() {
            debug!(filename = %self.filename, "Page unmounted, dropping artifact");
            return LoadOutcome::Cancelled;
        }

        match result {
            Ok(document) => {
                debug!(filename = %self.filename, "Artifact loaded");
                self.state.send_replace(ArtifactView::Loaded(Box::new(document)));
                LoadOutcome::Loaded
            }
            Err(message) => {
                warn!(filename = %self.filename, error = %message, "Artifact unavailable");
                self.state.send_replace(ArtifactView::Failed(message.clone()));
                LoadOutcome::Failed(message)
            }
        }
    }
}
