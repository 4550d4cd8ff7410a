// services/outage-tui/src/app.rs
//
// Routing and event plumbing between the terminal loop and the flow
// controllers. Flows run on the tokio runtime and report back through an
// unbounded channel drained once per tick.

use std::sync::Arc;

use crossterm::event::KeyCode;
use outagekit::artifacts::ArtifactNames;
use outagekit::config::DashboardConfig;
use outagekit::flows::{
    ActionOutcome, ArtifactController, ComparisonController, DashboardController, LoadOutcome,
    NavigationController, RefreshOutcome, ReportController, Route,
};
use outagekit::OutageBackend;
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::state::{Level, ShellState};
use crate::ui::header::{route_key, route_label};
use crate::ui::widgets::display_name;
use crate::ui::{PageView, ViewModel};

type Backend = dyn OutageBackend;

#[derive(Debug)]
pub enum AppEvent {
    Action(ActionOutcome),
    Refresh {
        outcome: RefreshOutcome,
        cleanup_warnings: Vec<String>,
    },
    Load {
        filename: String,
        outcome: LoadOutcome,
    },
}

/// Controller for the page on screen. Replaced, and the old one unmounted,
/// on every route change or reload.
enum Page {
    Dashboard(Arc<DashboardController<Backend>>),
    Report(Arc<ReportController<Backend>>),
    Comparison(Arc<ComparisonController<Backend>>),
}

impl Page {
    fn unmount(&self) {
        match self {
            Page::Dashboard(c) => c.unmount(),
            Page::Report(c) => c.unmount(),
            Page::Comparison(c) => c.unmount(),
        }
    }

    fn view(&self) -> PageView {
        match self {
            Page::Dashboard(c) => PageView::Dashboard(c.view()),
            Page::Report(c) => PageView::Report(c.view()),
            Page::Comparison(c) => PageView::Comparison(c.view()),
        }
    }
}

/// Everything needed to start flows for a route.
struct Flows {
    runtime: Handle,
    backend: Arc<Backend>,
    provider: String,
    artifacts: ArtifactNames,
    nav: Arc<NavigationController<Backend>>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl Flows {
    /// Build the page controller for `route`, start its entry flow and
    /// re-run the header's existence checks. On the landing route the checks
    /// wait for the refresh, which deletes both artifacts first.
    fn mount(&self, route: Route) -> Page {
        match route {
            Route::Dashboard => {
                let controller = Arc::new(DashboardController::new(
                    self.backend.clone(),
                    &self.provider,
                    self.artifacts.clone(),
                ));
                self.nav.begin_refresh(route);
                let flow = controller.clone();
                let nav = self.nav.clone();
                let tx = self.events.clone();
                self.runtime.spawn(async move {
                    let outcome = flow.enter(route).await;
                    if outcome != RefreshOutcome::Cancelled {
                        nav.on_route_change(route).await;
                    }
                    let cleanup_warnings = flow
                        .view()
                        .snapshot()
                        .map(|s| s.cleanup_warnings.clone())
                        .unwrap_or_default();
                    let _ = tx.send(AppEvent::Refresh {
                        outcome,
                        cleanup_warnings,
                    });
                });
                Page::Dashboard(controller)
            }
            Route::Report => {
                let controller = Arc::new(ReportController::new(self.backend.clone(), &self.artifacts.report));
                self.spawn_load(controller.clone());
                self.spawn_checks(route);
                Page::Report(controller)
            }
            Route::Comparison => {
                let controller = Arc::new(ComparisonController::new(
                    self.backend.clone(),
                    &self.artifacts.comparison,
                ));
                self.spawn_load(controller.clone());
                self.spawn_checks(route);
                Page::Comparison(controller)
            }
        }
    }

    fn spawn_checks(&self, route: Route) {
        let nav = self.nav.clone();
        self.runtime.spawn(async move { nav.on_route_change(route).await });
    }

    fn spawn_load<T>(&self, controller: Arc<ArtifactController<T, Backend>>)
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let tx = self.events.clone();
        self.runtime.spawn(async move {
            let outcome = controller.load().await;
            let _ = tx.send(AppEvent::Load {
                filename: controller.filename().to_string(),
                outcome,
            });
        });
    }
}

pub struct App {
    flows: Flows,
    route: Route,
    page: Page,
    events: mpsc::UnboundedReceiver<AppEvent>,
    source: String,
    pub shell: ShellState,
    pub should_quit: bool,
}

impl App {
    /// Mounts the landing route, which starts its refresh immediately.
    pub fn new(runtime: Handle, backend: Arc<Backend>, config: &DashboardConfig, source: &str) -> Self {
        let artifacts = config.artifacts();
        let route = Route::Dashboard;
        let (tx, events) = mpsc::unbounded_channel();
        let flows = Flows {
            runtime,
            nav: Arc::new(NavigationController::new(
                backend.clone(),
                &config.provider,
                artifacts.clone(),
                route,
            )),
            backend,
            provider: config.provider.clone(),
            artifacts,
            events: tx,
        };
        let page = flows.mount(route);

        let mut shell = ShellState::new();
        shell.add_log(Level::Info, &format!("Dashboard started ({})", source));

        Self {
            flows,
            route,
            page,
            events,
            source: source.to_string(),
            shell,
            should_quit: false,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('g') | KeyCode::Enter => self.trigger_primary(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Up => self.shell.scroll_up(),
            KeyCode::Down => self.shell.scroll_down(),
            KeyCode::Char(c) => {
                if let Some(route) = Route::ALL.into_iter().find(|r| route_key(*r) == c) {
                    self.follow_link(route);
                }
            }
            _ => {}
        }
    }

    /// Navigate only through a link the header currently shows.
    pub fn follow_link(&mut self, route: Route) {
        if self.flows.nav.snapshot().link_visible(route) {
            self.navigate(route);
        }
    }

    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        debug!(from = self.route.path(), to = route.path(), "Route change");
        self.page.unmount();
        self.route = route;
        self.page = self.flows.mount(route);
        self.shell.reset_scroll();
    }

    /// Re-enter the current route. On the landing route this runs the full
    /// refresh again.
    pub fn reload(&mut self) {
        self.page.unmount();
        self.page = self.flows.mount(self.route);
        let label = route_label(self.route, &display_name(&self.flows.provider));
        self.shell.add_log(Level::Info, &format!("Reloading {}", label));
    }

    pub fn trigger_primary(&mut self) {
        if !self.flows.nav.snapshot().action_enabled() {
            return;
        }
        let nav = self.flows.nav.clone();
        let tx = self.flows.events.clone();
        self.flows.runtime.spawn(async move {
            let outcome = nav.trigger_primary().await;
            let _ = tx.send(AppEvent::Action(outcome));
        });
    }

    /// Apply every flow result that arrived since the last tick.
    pub fn tick(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
        }
        self.shell.expire_toast();
    }

    fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Action(outcome) => {
                if let Some(notice) = outcome.notice() {
                    self.shell.notify(notice);
                }
                if let ActionOutcome::Completed { navigate_to, .. } = outcome {
                    self.navigate(navigate_to);
                }
            }
            AppEvent::Refresh {
                outcome,
                cleanup_warnings,
            } => {
                for warning in &cleanup_warnings {
                    self.shell.add_log(Level::Warn, warning);
                }
                match outcome {
                    RefreshOutcome::Refreshed => self.shell.add_log(Level::Info, "Dashboard data refreshed"),
                    RefreshOutcome::Failed(message) => self
                        .shell
                        .add_log(Level::Error, &format!("Dashboard refresh failed: {}", message)),
                    RefreshOutcome::NotLanding | RefreshOutcome::AlreadyRunning | RefreshOutcome::Cancelled => {}
                }
            }
            AppEvent::Load { filename, outcome } => match outcome {
                LoadOutcome::Loaded => self.shell.add_log(Level::Info, &format!("Loaded {}", filename)),
                LoadOutcome::Failed(message) => self
                    .shell
                    .add_log(Level::Error, &format!("Could not load {}: {}", filename, message)),
                LoadOutcome::Skipped | LoadOutcome::Cancelled => {}
            },
        }
    }

    pub fn view_model(&self) -> ViewModel<'_> {
        ViewModel {
            route: self.route,
            nav: self.flows.nav.snapshot(),
            page: self.page.view(),
            shell: &self.shell,
            provider: display_name(&self.flows.provider),
            source: &self.source,
        }
    }

    /// Cancel every flow so late results are dropped.
    pub fn shutdown(&self) {
        self.page.unmount();
        self.flows.nav.unmount();
        info!("Dashboard shutting down");
    }
}
