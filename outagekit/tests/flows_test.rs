use std::sync::Arc;
use std::time::Duration;

use outagekit::artifacts::ArtifactNames;
use outagekit::flows::{
    ActionOutcome, ArtifactView, ComparisonController, DashboardController, DashboardView, LoadOutcome, LoadPhase,
    NavigationController, PrimaryAction, RefreshOutcome, ReportController, Route,
};
use outagekit::memory::{Endpoint, InMemoryBackend};
use outagekit::ApiError;
use serde_json::{json, Value};

const PROVIDER: &str = "t-mobile";

fn dataset() -> Value {
    json!({
        "latest_reports": [
            {"city": "Dallas", "reason": "Mobile Internet", "time_human": "3 minutes ago", "time_iso": "2025-11-08T10:00:00Z"},
            {"city": "Houston", "reason": "No Signal", "time_human": "9 minutes ago", "time_iso": "2025-11-08T09:54:00Z"}
        ],
        "last_15_days_status": [{"location": "Dallas, TX", "reports": 31}],
        "most_reported_problems": [{"label": "Mobile Internet", "percent": 64}, {"label": "No Signal", "percent": 21}],
        "star_rating": {"current": "2.58 out of 5", "count": "1,204 ratings"}
    })
}

fn analysis() -> Value {
    json!({
        "header": {"provider": "T-Mobile", "status": "minor issues", "status_color": "yellow", "star_rating": 2.6},
        "critical_insights": ["Mobile data failures concentrated in Texas"],
        "pain_index": 6.1
    })
}

fn comparison() -> Value {
    json!({
        "baseline": "T-Mobile",
        "tmobile": {"star_rating": 2.6, "total_reports": 812, "locations": 14, "total_blackout_pct": 12.0, "internet_pct": 60.0, "phone_pct": 18.0},
        "providers": [{
            "name": "Verizon", "star_rating": 3.1, "total_reports": 300, "locations": 9,
            "total_blackout_pct": 8.0, "internet_pct": 45.0, "phone_pct": 22.0,
            "better_than_tmobile": ["star_rating", "total_reports"], "worse_than_tmobile": ["phone_pct"],
            "reasoning": "Fewer reports in the last day"
        }]
    })
}

fn backend() -> Arc<InMemoryBackend> {
    Arc::new(InMemoryBackend::new(dataset(), analysis(), comparison()))
}

fn server_error(detail: &str) -> ApiError {
    ApiError::Backend {
        status: 500,
        detail: detail.to_string(),
    }
}

fn dashboard(backend: &Arc<InMemoryBackend>) -> DashboardController<InMemoryBackend> {
    DashboardController::new(backend.clone(), PROVIDER, ArtifactNames::for_provider(PROVIDER))
}

fn navigation(backend: &Arc<InMemoryBackend>) -> NavigationController<InMemoryBackend> {
    NavigationController::new(
        backend.clone(),
        PROVIDER,
        ArtifactNames::for_provider(PROVIDER),
        Route::Dashboard,
    )
}

// --- dashboard refresh ------------------------------------------------------

#[tokio::test]
async fn landing_entry_deletes_artifacts_before_scraping() {
    let backend = backend();
    backend.seed_report("t-mobile.json", analysis()).await;
    backend.seed_report("comparison_tmobile.json", comparison()).await;

    let controller = dashboard(&backend);
    assert_eq!(controller.enter(Route::Dashboard).await, RefreshOutcome::Refreshed);

    assert_eq!(
        backend.journal().await,
        vec!["DELETE t-mobile.json", "DELETE comparison_tmobile.json", "ENSURE t-mobile"]
    );
    assert!(!backend.has_report("t-mobile.json").await);
    assert!(!backend.has_report("comparison_tmobile.json").await);

    let view = controller.view();
    let snapshot = view.snapshot().expect("dashboard should be ready");
    assert_eq!(snapshot.metrics.active_reports, 2);
    assert_eq!(snapshot.metrics.affected_cities, 1);
    assert_eq!(snapshot.metrics.top_issue_label(), "Mobile Internet");
    assert!(snapshot.cleanup_warnings.is_empty());
}

#[tokio::test]
async fn deletes_are_issued_when_nothing_exists() {
    let backend = backend();
    let controller = dashboard(&backend);

    controller.enter(Route::Dashboard).await;
    assert_eq!(backend.count("DELETE").await, 2);
    assert_eq!(backend.count("ENSURE").await, 1);
}

#[tokio::test]
async fn other_routes_do_not_refresh() {
    let backend = backend();
    let controller = dashboard(&backend);

    assert_eq!(controller.enter(Route::Report).await, RefreshOutcome::NotLanding);
    assert_eq!(controller.enter(Route::Comparison).await, RefreshOutcome::NotLanding);
    assert!(backend.journal().await.is_empty());
    assert_eq!(controller.view(), DashboardView::Idle);
}

#[tokio::test]
async fn failed_deletes_do_not_abort_refresh() {
    let backend = backend();
    backend.fail(Endpoint::DeleteReport, server_error("read-only filesystem")).await;

    let controller = dashboard(&backend);
    assert_eq!(controller.enter(Route::Dashboard).await, RefreshOutcome::Refreshed);

    let view = controller.view();
    let snapshot = view.snapshot().unwrap();
    assert_eq!(snapshot.cleanup_warnings.len(), 2);
    assert!(snapshot.cleanup_warnings[0].contains("read-only filesystem"));
}

#[tokio::test]
async fn not_found_deletes_are_silent() {
    let backend = backend();
    backend
        .fail(Endpoint::DeleteReport, ApiError::NotFound("Report not found".to_string()))
        .await;

    let controller = dashboard(&backend);
    controller.enter(Route::Dashboard).await;

    assert!(controller.view().snapshot().unwrap().cleanup_warnings.is_empty());
}

#[tokio::test]
async fn empty_dataset_renders_placeholder() {
    let backend = Arc::new(InMemoryBackend::new(json!({"latest_reports": []}), analysis(), comparison()));
    let controller = dashboard(&backend);

    assert_eq!(controller.enter(Route::Dashboard).await, RefreshOutcome::Refreshed);
    let view = controller.view();
    let metrics = &view.snapshot().unwrap().metrics;
    assert_eq!(metrics.active_reports, 0);
    assert_eq!(metrics.affected_cities, 0);
    assert_eq!(metrics.top_issue_label(), "N/A");
}

#[tokio::test]
async fn scrape_failure_replaces_previous_data() {
    let backend = backend();
    let controller = dashboard(&backend);
    controller.enter(Route::Dashboard).await;
    assert!(controller.view().snapshot().is_some());

    backend
        .fail(Endpoint::EnsureScrapedData, server_error("Failed to scrape data: timeout"))
        .await;
    let outcome = controller.enter(Route::Dashboard).await;

    assert_eq!(outcome, RefreshOutcome::Failed("Failed to scrape data: timeout".to_string()));
    let view = controller.view();
    assert_eq!(view.error(), Some("Failed to scrape data: timeout"));
    assert!(view.snapshot().is_none());
}

#[tokio::test]
async fn refresh_is_not_reentrant() {
    let backend = Arc::new(
        InMemoryBackend::new(dataset(), analysis(), comparison()).with_latency(Duration::from_millis(30)),
    );
    let controller = dashboard(&backend);

    let (first, second) = tokio::join!(controller.enter(Route::Dashboard), controller.enter(Route::Dashboard));
    assert_eq!(first, RefreshOutcome::Refreshed);
    assert_eq!(second, RefreshOutcome::AlreadyRunning);
    assert_eq!(backend.count("ENSURE").await, 1);
}

#[tokio::test]
async fn unmounted_dashboard_ignores_late_scrape() {
    let backend = Arc::new(
        InMemoryBackend::new(dataset(), analysis(), comparison()).with_latency(Duration::from_millis(100)),
    );
    let controller = Arc::new(dashboard(&backend));
    let mut view = controller.subscribe();

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.enter(Route::Dashboard).await })
    };
    view.wait_for(|v| *v == DashboardView::Loading(LoadPhase::Scraping))
        .await
        .unwrap();
    controller.unmount();

    assert_eq!(task.await.unwrap(), RefreshOutcome::Cancelled);
    assert_eq!(backend.count("ENSURE").await, 1);
    assert!(controller.view().is_loading());
}

// --- navigation -------------------------------------------------------------

#[tokio::test]
async fn action_is_disabled_until_checks_finish() {
    let backend = backend();
    let nav = navigation(&backend);

    assert!(nav.snapshot().checking);
    assert_eq!(nav.trigger_primary().await, ActionOutcome::Ignored);
    assert_eq!(backend.count("ANALYZE").await, 0);
}

#[tokio::test]
async fn generate_then_compare() {
    let backend = backend();
    let nav = navigation(&backend);

    nav.on_route_change(Route::Dashboard).await;
    let state = nav.snapshot();
    assert_eq!(state.button_label(), "Generate Report");
    assert_eq!(state.visible_links(), vec![Route::Dashboard]);

    let outcome = nav.trigger_primary().await;
    assert_eq!(
        outcome,
        ActionOutcome::Completed {
            action: PrimaryAction::GenerateReport,
            navigate_to: Route::Report,
        }
    );
    assert!(nav.snapshot().report_exists);
    assert_eq!(outcome.notice().unwrap().title, "Report Generated");

    nav.on_route_change(Route::Report).await;
    let state = nav.snapshot();
    assert_eq!(state.button_label(), "Compare Competitors");
    assert_eq!(state.visible_links(), vec![Route::Dashboard, Route::Report]);

    let outcome = nav.trigger_primary().await;
    assert_eq!(
        outcome,
        ActionOutcome::Completed {
            action: PrimaryAction::CompareCompetitors,
            navigate_to: Route::Comparison,
        }
    );

    nav.on_route_change(Route::Comparison).await;
    assert_eq!(nav.snapshot().visible_links(), Route::ALL.to_vec());
}

#[tokio::test]
async fn failed_generation_leaves_flags_unchanged() {
    let backend = backend();
    backend.fail(Endpoint::Analyze, server_error("Report not generated")).await;
    let nav = navigation(&backend);
    nav.on_route_change(Route::Dashboard).await;

    let outcome = nav.trigger_primary().await;
    assert_eq!(
        outcome,
        ActionOutcome::Failed {
            action: PrimaryAction::GenerateReport,
            message: "Report not generated".to_string(),
        }
    );
    assert!(outcome.notice().unwrap().is_error);

    let state = nav.snapshot();
    assert!(!state.report_exists);
    assert!(state.in_flight.is_none());
    assert!(state.action_enabled());
}

#[tokio::test]
async fn loosely_typed_analysis_still_counts_as_generated() {
    let loose = json!({
        "header": {"total_reports_24h": 812.0, "star_rating": null},
        "pain_index": "7.8"
    });
    let backend = Arc::new(InMemoryBackend::new(dataset(), loose, comparison()));
    let nav = navigation(&backend);
    nav.on_route_change(Route::Dashboard).await;

    let outcome = nav.trigger_primary().await;
    assert!(matches!(outcome, ActionOutcome::Completed { .. }));
    assert!(nav.snapshot().report_exists);
    assert!(backend.has_report("t-mobile.json").await);
}

#[tokio::test]
async fn refresh_hold_discards_earlier_checks() {
    let backend = Arc::new(
        InMemoryBackend::new(dataset(), analysis(), comparison()).with_latency(Duration::from_millis(30)),
    );
    backend.seed_report("t-mobile.json", analysis()).await;
    let nav = Arc::new(navigation(&backend));

    let early = {
        let nav = nav.clone();
        tokio::spawn(async move { nav.on_route_change(Route::Report).await })
    };
    while backend.count("CHECK").await == 0 {
        tokio::task::yield_now().await;
    }
    nav.begin_refresh(Route::Dashboard);
    early.await.unwrap();

    let state = nav.snapshot();
    assert_eq!(state.route, Route::Dashboard);
    assert!(state.checking);
    assert!(!state.report_exists);
}

#[tokio::test]
async fn rapid_triggers_run_once() {
    let backend = Arc::new(
        InMemoryBackend::new(dataset(), analysis(), comparison()).with_latency(Duration::from_millis(30)),
    );
    let nav = navigation(&backend);
    nav.on_route_change(Route::Dashboard).await;

    let (first, second) = tokio::join!(nav.trigger_primary(), nav.trigger_primary());
    assert!(matches!(first, ActionOutcome::Completed { .. }));
    assert_eq!(second, ActionOutcome::Ignored);
    assert_eq!(backend.count("ANALYZE").await, 1);
    assert!(nav.snapshot().action_enabled());
}

#[tokio::test]
async fn failed_checks_read_as_absent() {
    let backend = backend();
    backend.seed_report("t-mobile.json", analysis()).await;
    backend.fail(Endpoint::CheckReport, server_error("boom")).await;
    let nav = navigation(&backend);

    nav.on_route_change(Route::Report).await;
    let state = nav.snapshot();
    assert!(!state.report_exists);
    assert!(!state.checking);
    assert_eq!(state.button_label(), "Generate Report");
}

#[tokio::test]
async fn every_route_change_rechecks() {
    let backend = backend();
    let nav = navigation(&backend);

    nav.on_route_change(Route::Dashboard).await;
    assert_eq!(nav.snapshot().button_label(), "Generate Report");

    backend.seed_report("t-mobile.json", analysis()).await;
    nav.on_route_change(Route::Report).await;
    assert_eq!(nav.snapshot().button_label(), "Compare Competitors");
    assert_eq!(backend.count("CHECK").await, 4);
}

#[tokio::test]
async fn unmounted_header_drops_action_result() {
    let backend = Arc::new(
        InMemoryBackend::new(dataset(), analysis(), comparison()).with_latency(Duration::from_millis(80)),
    );
    let nav = Arc::new(navigation(&backend));
    nav.on_route_change(Route::Dashboard).await;

    let task = {
        let nav = nav.clone();
        tokio::spawn(async move { nav.trigger_primary().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    nav.unmount();

    assert_eq!(task.await.unwrap(), ActionOutcome::Cancelled);
    assert!(!nav.snapshot().report_exists);
}

// --- artifact retrieval -----------------------------------------------------

#[tokio::test]
async fn missing_comparison_is_an_error_state() {
    let backend = backend();
    let page: ComparisonController<InMemoryBackend> =
        ComparisonController::new(backend.clone(), "comparison_tmobile.json");

    assert_eq!(page.view(), ArtifactView::Loading);
    assert_eq!(page.load().await, LoadOutcome::Failed("Report not found".to_string()));
    assert_eq!(page.view().error(), Some("Report not found"));
}

#[tokio::test]
async fn report_loads_once() {
    let backend = backend();
    backend.seed_report("t-mobile.json", analysis()).await;
    let page: ReportController<InMemoryBackend> = ReportController::new(backend.clone(), "t-mobile.json");

    assert_eq!(page.load().await, LoadOutcome::Loaded);
    assert_eq!(page.load().await, LoadOutcome::Skipped);
    assert_eq!(backend.count("GET t-mobile.json").await, 1);

    let view = page.view();
    let report = view.document().unwrap();
    assert_eq!(report.header.provider, "T-Mobile");
    assert_eq!(report.pain_index, Some(6.1));
}

#[tokio::test]
async fn comparison_document_is_typed() {
    let backend = backend();
    backend.seed_report("comparison_tmobile.json", comparison()).await;
    let page: ComparisonController<InMemoryBackend> =
        ComparisonController::new(backend.clone(), "comparison_tmobile.json");

    page.load().await;
    let view = page.view();
    let doc = view.document().unwrap();
    assert_eq!(doc.baseline_metrics.total_reports, 812.0);
    assert_eq!(doc.providers[0].name, "Verizon");
    assert!(doc.providers[0].overall_better());
}

#[tokio::test]
async fn malformed_document_fails_without_partial_render() {
    let backend = backend();
    backend
        .seed_report("comparison_tmobile.json", json!({"providers": "not a list"}))
        .await;
    let page: ComparisonController<InMemoryBackend> =
        ComparisonController::new(backend.clone(), "comparison_tmobile.json");

    let outcome = page.load().await;
    assert!(matches!(outcome, LoadOutcome::Failed(ref m) if m.starts_with("Failed to load report")));
    assert!(page.view().document().is_none());
}

#[tokio::test]
async fn generic_failure_surfaces_detail() {
    let backend = backend();
    backend.fail(Endpoint::GetReport, server_error("Storage offline")).await;
    let page: ReportController<InMemoryBackend> = ReportController::new(backend.clone(), "t-mobile.json");

    assert_eq!(page.load().await, LoadOutcome::Failed("Storage offline".to_string()));
}
