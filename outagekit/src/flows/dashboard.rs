// outagekit/src/flows/dashboard.rs
//
// Landing-route refresh: discard generated artifacts, then scrape fresh data.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{BusyFlag, FlowScope, Route};
use crate::artifacts::ArtifactNames;
use crate::client::OutageBackend;
use crate::types::{Problem, ScrapedOutageDataset};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Deleting stale artifacts.
    Clearing,
    /// Waiting on the scrape, which can take several seconds.
    Scraping,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardMetrics {
    pub active_reports: usize,
    pub affected_cities: usize,
    pub top_issue: Option<Problem>,
}

impl DashboardMetrics {
    pub fn from_dataset(dataset: &ScrapedOutageDataset) -> Self {
        Self {
            active_reports: dataset.active_reports(),
            affected_cities: dataset.affected_cities(),
            top_issue: dataset.top_problem().cloned(),
        }
    }

    pub fn top_issue_label(&self) -> &str {
        self.top_issue
            .as_ref()
            .map_or(NOT_AVAILABLE, |p| p.label.as_str())
    }

    pub fn top_issue_share(&self) -> Option<String> {
        self.top_issue
            .as_ref()
            .map(|p| format!("{}% of reports", p.percent))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub dataset: ScrapedOutageDataset,
    pub metrics: DashboardMetrics,
    /// Artifact deletions that failed for a reason other than absence.
    pub cleanup_warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Idle,
    Loading(LoadPhase),
    Ready(Box<DashboardSnapshot>),
    Failed(String),
}

impl DashboardView {
    pub fn is_loading(&self) -> bool {
        matches!(self, DashboardView::Loading(_))
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            DashboardView::Ready(snapshot) => Some(snapshot.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DashboardView::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    NotLanding,
    AlreadyRunning,
    Cancelled,
    Refreshed,
    Failed(String),
}

pub struct DashboardController<B: OutageBackend + ?Sized> {
    backend: Arc<B>,
    provider: String,
    artifacts: ArtifactNames,
    state: watch::Sender<DashboardView>,
    busy: BusyFlag,
    scope: FlowScope,
}

impl<B: OutageBackend + ?Sized> DashboardController<B> {
    pub fn new(backend: Arc<B>, provider: &str, artifacts: ArtifactNames) -> Self {
        let (state, _) = watch::channel(DashboardView::Idle);
        Self {
            backend,
            provider: provider.to_string(),
            artifacts,
            state,
            busy: BusyFlag::new(),
            scope: FlowScope::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.state.subscribe()
    }

    pub fn view(&self) -> DashboardView {
        self.state.borrow().clone()
    }

    pub fn unmount(&self) {
        self.scope.cancel();
    }

    /// Run the refresh for an entry into `route`. Only the landing route
    /// refreshes; every step after the deletions runs even if they fail.
    pub async fn enter(&self, route: Route) -> RefreshOutcome {
        if !route.is_landing() {
            return RefreshOutcome::NotLanding;
        }
        if self.scope.is_cancelled() {
            return RefreshOutcome::Cancelled;
        }
        let Some(_busy) = self.busy.try_acquire() else {
            debug!("Dashboard refresh already running");
            return RefreshOutcome::AlreadyRunning;
        };

        self.transition(DashboardView::Loading(LoadPhase::Clearing));

        let mut cleanup_warnings = Vec::new();
        for filename in [&self.artifacts.report, &self.artifacts.comparison] {
            if let Some(warning) = self.discard(filename).await {
                cleanup_warnings.push(warning);
            }
        }

        if self.scope.is_cancelled() {
            return RefreshOutcome::Cancelled;
        }
        self.transition(DashboardView::Loading(LoadPhase::Scraping));

        info!(provider = %self.provider, "Requesting fresh scrape");
        let result = self
            .backend
            .ensure_scraped_data(&self.provider)
            .await
            .map_err(|e| e.to_string())
            .and_then(decode_dataset);

        if self.scope.is_cancelled() {
            debug!("Dashboard unmounted, dropping scrape result");
            return RefreshOutcome::Cancelled;
        }

        match result {
            Ok(dataset) => {
                let metrics = DashboardMetrics::from_dataset(&dataset);
                info!(
                    active_reports = metrics.active_reports,
                    affected_cities = metrics.affected_cities,
                    "Dashboard data refreshed"
                );
                self.transition(DashboardView::Ready(Box::new(DashboardSnapshot {
                    dataset,
                    metrics,
                    cleanup_warnings,
                })));
                RefreshOutcome::Refreshed
            }
            Err(message) => {
                warn!(provider = %self.provider, error = %message, "Dashboard refresh failed");
                self.transition(DashboardView::Failed(message.clone()));
                RefreshOutcome::Failed(message)
            }
        }
    }

    fn transition(&self, view: DashboardView) {
        if !self.scope.is_cancelled() {
            self.state.send_replace(view);
        }
    }

    async fn discard(&self, filename: &str) -> Option<String> {
        match self.backend.delete_report(filename).await {
            Ok(outcome) => {
                debug!(filename = %filename, deleted = outcome.deleted, message = %outcome.message, "Artifact cleanup");
                None
            }
            Err(e) if e.is_not_found() => {
                debug!(filename = %filename, "Artifact already absent");
                None
            }
            Err(e) => {
                warn!(filename = %filename, error = %e, "Could not delete artifact, continuing with refresh");
                Some(format!("Could not delete {}: {}", filename, e))
            }
        }
    }
}

fn decode_dataset(value: Value) -> Result<ScrapedOutageDataset, String> {
    if value.is_null() {
        return Err("No data available".to_string());
    }
    serde_json::from_value(value).map_err(|e| format!("Decode error: {}", e))
}
