// outagekit/src/flows/navigation.rs
//
// Header state: which generated artifacts exist, which links are visible,
// and what the primary action button does.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{BusyFlag, BusyGuard, FlowScope, Notice, Route};
use crate::artifacts::ArtifactNames;
use crate::client::OutageBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    GenerateReport,
    CompareCompetitors,
}

impl PrimaryAction {
    pub fn label(self) -> &'static str {
        match self {
            PrimaryAction::GenerateReport => "Generate Report",
            PrimaryAction::CompareCompetitors => "Compare Competitors",
        }
    }

    pub fn progress_label(self) -> &'static str {
        match self {
            PrimaryAction::GenerateReport => "Generating...",
            PrimaryAction::CompareCompetitors => "Comparing...",
        }
    }

    /// Where a successful run navigates to.
    pub fn destination(self) -> Route {
        match self {
            PrimaryAction::GenerateReport => Route::Report,
            PrimaryAction::CompareCompetitors => Route::Comparison,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub route: Route,
    pub report_exists: bool,
    pub comparison_exists: bool,
    /// Existence checks for the current route are still pending.
    pub checking: bool,
    pub in_flight: Option<PrimaryAction>,
}

impl NavigationState {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            report_exists: false,
            comparison_exists: false,
            checking: true,
            in_flight: None,
        }
    }

    pub fn primary_action(&self) -> PrimaryAction {
        if self.report_exists {
            PrimaryAction::CompareCompetitors
        } else {
            PrimaryAction::GenerateReport
        }
    }

    pub fn action_enabled(&self) -> bool {
        !self.checking && self.in_flight.is_none()
    }

    pub fn button_label(&self) -> &'static str {
        match self.in_flight {
            Some(action) => action.progress_label(),
            None => self.primary_action().label(),
        }
    }

    pub fn link_visible(&self, route: Route) -> bool {
        match route {
            Route::Dashboard => true,
            Route::Report => self.report_exists,
            Route::Comparison => self.report_exists && self.comparison_exists,
        }
    }

    pub fn visible_links(&self) -> Vec<Route> {
        Route::ALL
            .into_iter()
            .filter(|r| self.link_visible(*r))
            .collect()
    }

    fn begin_check(&mut self, route: Route) {
        self.route = route;
        self.checking = true;
    }

    /// The landing refresh deletes both artifacts; nothing it had is valid.
    fn begin_refresh(&mut self, route: Route) {
        self.begin_check(route);
        self.report_exists = false;
        self.comparison_exists = false;
    }

    fn finish_check(&mut self, report_exists: bool, comparison_exists: bool) {
        self.report_exists = report_exists;
        self.comparison_exists = comparison_exists;
        self.checking = false;
    }

    fn begin_action(&mut self, action: PrimaryAction) {
        self.in_flight = Some(action);
    }

    fn action_succeeded(&mut self, action: PrimaryAction) {
        match action {
            PrimaryAction::GenerateReport => self.report_exists = true,
            PrimaryAction::CompareCompetitors => self.comparison_exists = true,
        }
    }

    fn end_action(&mut self) {
        self.in_flight = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Control was disabled: checks pending or another run in flight.
    Ignored,
    Completed { action: PrimaryAction, navigate_to: Route },
    Failed { action: PrimaryAction, message: String },
    /// The header was unmounted while the call was in flight.
    Cancelled,
}

impl ActionOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            ActionOutcome::Completed { action: PrimaryAction::GenerateReport, .. } => Some(Notice::info(
                "Report Generated",
                "The provider report has been generated successfully.",
            )),
            ActionOutcome::Completed { action: PrimaryAction::CompareCompetitors, .. } => Some(Notice::info(
                "Comparison Complete",
                "Competitor comparison has been generated successfully.",
            )),
            ActionOutcome::Failed { message, .. } => Some(Notice::error(message.clone())),
            ActionOutcome::Ignored | ActionOutcome::Cancelled => None,
        }
    }
}

/// Clears `in_flight` however the action future ends, including when it is
/// dropped mid-await.
struct InFlight<'a> {
    state: &'a watch::Sender<NavigationState>,
    scope: &'a FlowScope,
    _busy: BusyGuard,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.scope.is_cancelled() {
            self.state.send_modify(NavigationState::end_action);
        }
    }
}

pub struct NavigationController<B: OutageBackend + ?Sized> {
    backend: Arc<B>,
    provider: String,
    artifacts: ArtifactNames,
    state: watch::Sender<NavigationState>,
    busy: BusyFlag,
    epoch: AtomicU64,
    scope: FlowScope,
}

impl<B: OutageBackend + ?Sized> NavigationController<B> {
    pub fn new(backend: Arc<B>, provider: &str, artifacts: ArtifactNames, route: Route) -> Self {
        let (state, _) = watch::channel(NavigationState::new(route));
        Self {
            backend,
            provider: provider.to_string(),
            artifacts,
            state,
            busy: BusyFlag::new(),
            epoch: AtomicU64::new(0),
            scope: FlowScope::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> NavigationState {
        self.state.borrow().clone()
    }

    pub fn unmount(&self) {
        self.scope.cancel();
    }

    /// Hold the header for the landing refresh: both artifacts read as absent
    /// and the action stays disabled until [`Self::on_route_change`] runs once
    /// the refresh has finished. Checks still in flight are invalidated.
    pub fn begin_refresh(&self, route: Route) {
        if self.scope.is_cancelled() {
            return;
        }
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|s| s.begin_refresh(route));
    }

    /// Re-check both artifacts for a newly active route. Results from an
    /// older route change that finish late are discarded.
    pub async fn on_route_change(&self, route: Route) {
        if self.scope.is_cancelled() {
            return;
        }

        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| s.begin_check(route));

        let (report_exists, comparison_exists) = tokio::join!(
            self.backend.report_exists(&self.artifacts.report),
            self.backend.report_exists(&self.artifacts.comparison),
        );

        if self.scope.is_cancelled() {
            debug!(route = route.path(), "Header unmounted, dropping existence results");
            return;
        }
        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!(route = route.path(), "Newer route change in progress, dropping existence results");
            return;
        }

        debug!(
            route = route.path(),
            report_exists,
            comparison_exists,
            "Artifact existence refreshed"
        );
        self.state
            .send_modify(|s| s.finish_check(report_exists, comparison_exists));
    }

    /// Run whatever the primary button currently offers.
    pub async fn trigger_primary(&self) -> ActionOutcome {
        let snapshot = self.snapshot();
        if self.scope.is_cancelled() || snapshot.checking {
            return ActionOutcome::Ignored;
        }

        let Some(busy) = self.busy.try_acquire() else {
            debug!("Primary action already in flight, ignoring trigger");
            return ActionOutcome::Ignored;
        };

        let action = snapshot.primary_action();
        self.state.send_modify(|s| s.begin_action(action));
        let _in_flight = InFlight {
            state: &self.state,
            scope: &self.scope,
            _busy: busy,
        };

        info!(action = ?action, provider = %self.provider, "Primary action started");
        let result = match action {
            PrimaryAction::GenerateReport => self.backend.analyze(&self.provider).await.map(|_| ()),
            PrimaryAction::CompareCompetitors => self.backend.compare_metrics().await.map(|_| ()),
        };

        if self.scope.is_cancelled() {
            return ActionOutcome::Cancelled;
        }

        match result {
            Ok(()) => {
                self.state.send_modify(|s| s.action_succeeded(action));
                info!(action = ?action, "Primary action completed");
                ActionOutcome::Completed {
                    action,
                    navigate_to: action.destination(),
                }
            }
            Err(e) => {
                warn!(action = ?action, error = %e, "Primary action failed");
                ActionOutcome::Failed {
                    action,
                    message: e.to_string(),
                }
            }
        }
    }
}
