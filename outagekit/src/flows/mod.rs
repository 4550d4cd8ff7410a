// outagekit/src/flows/mod.rs
//
// View-state controllers. Each controller owns its state record in a
// `watch` channel, changes it only through named transitions, guards
// against re-entry with a `BusyFlag`, and drops late results once its
// `FlowScope` is cancelled.

pub mod dashboard;
pub mod navigation;
pub mod retrieval;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use dashboard::{DashboardController, DashboardMetrics, DashboardSnapshot, DashboardView, LoadPhase, RefreshOutcome};
pub use navigation::{ActionOutcome, NavigationController, NavigationState, PrimaryAction};
pub use retrieval::{ArtifactController, ArtifactView, ComparisonController, LoadOutcome, ReportController};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Report,
    Comparison,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Dashboard, Route::Report, Route::Comparison];

    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Report => "/tmobile-report",
            Route::Comparison => "/comparison",
        }
    }

    pub fn is_landing(self) -> bool {
        self == Route::Dashboard
    }
}

/// Cancellation token shared by every flow a controller starts.
#[derive(Debug, Clone, Default)]
pub struct FlowScope {
    cancelled: Arc<AtomicBool>,
}

impl FlowScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Re-entry guard. Holding the returned [`BusyGuard`] marks the flow busy;
/// dropping it clears the flag on every exit path.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                busy: self.busy.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// User-facing message raised by a flow (the toast in the UI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            is_error: false,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            is_error: true,
        }
    }
}
