// services/stub-backend/src/api.rs
//
// HTTP contract served to the dashboard: analyze, compare, artifact
// existence/retrieval/deletion and scraped snapshots. Errors carry a
// `{"detail": ...}` body.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::store::{FileStore, StoreError};

pub fn router(store: Arc<FileStore>) -> Router {
    Router::new()
        .route("/analyze", get(handle_analyze))
        .route("/compare_metrics", get(handle_compare))
        .route("/check_report", get(handle_check_report))
        .route("/get_report", get(handle_get_report))
        .route("/get_scraped_data", get(handle_get_scraped_data))
        .route("/ensure_scraped_data", get(handle_ensure_scraped_data))
        .route("/delete_report", delete(handle_delete_report))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}

pub async fn start_server(store: Arc<FileStore>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Stub analysis service listening on {}", addr);

    axum::serve(listener, router(store)).await?;
    Ok(())
}

#[derive(Deserialize)]
struct ServiceParams {
    service: Option<String>,
}

#[derive(Deserialize)]
struct FilenameParams {
    filename: Option<String>,
}

struct ApiFailure {
    status: StatusCode,
    detail: String,
}

impl ApiFailure {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn missing(param: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, format!("Missing '{}' parameter", param))
    }

    /// Store failure while serving an operation; not-found is mapped by the caller.
    fn internal(e: StoreError) -> Self {
        match e {
            StoreError::InvalidName(_) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            other => {
                error!(error = %other, "Store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiFailure>;

fn required(value: Option<String>, param: &str) -> Result<String, ApiFailure> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiFailure::missing(param))
}

async fn handle_analyze(State(store): State<Arc<FileStore>>, Query(params): Query<ServiceParams>) -> ApiResult {
    let service = required(params.service, "service")?;
    info!(service = %service, "Generating analysis report");

    match store.generate_report(&service).await {
        Ok(report) => Ok(Json(report)),
        Err(StoreError::MissingFixture(_)) => {
            warn!(service = %service, "No analysis fixture");
            Err(ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, "Report not generated"))
        }
        Err(e) => Err(ApiFailure::internal(e)),
    }
}

async fn handle_compare(State(store): State<Arc<FileStore>>) -> ApiResult {
    info!("Generating competitor comparison");
    store
        .generate_comparison()
        .await
        .map(Json)
        .map_err(ApiFailure::internal)
}

async fn handle_check_report(
    State(store): State<Arc<FileStore>>,
    Query(params): Query<FilenameParams>,
) -> ApiResult {
    let filename = required(params.filename, "filename")?;
    let exists = store.report_exists(&filename).await.map_err(ApiFailure::internal)?;
    Ok(Json(json!({ "exists": exists })))
}

async fn handle_get_report(State(store): State<Arc<FileStore>>, Query(params): Query<FilenameParams>) -> ApiResult {
    let filename = required(params.filename, "filename")?;
    match store.read_report(&filename).await {
        Ok(report) => Ok(Json(report)),
        Err(StoreError::NotFound(_)) => Err(ApiFailure::new(StatusCode::NOT_FOUND, "Report not found")),
        Err(e) => Err(ApiFailure::internal(e)),
    }
}

async fn handle_get_scraped_data(
    State(store): State<Arc<FileStore>>,
    Query(params): Query<FilenameParams>,
) -> ApiResult {
    let filename = required(params.filename, "filename")?;
    match store.read_scraped(&filename).await {
        Ok(data) => Ok(Json(data)),
        Err(StoreError::NotFound(_)) => Err(ApiFailure::new(StatusCode::NOT_FOUND, "Scraped data not found")),
        Err(e) => Err(ApiFailure::internal(e)),
    }
}

async fn handle_ensure_scraped_data(
    State(store): State<Arc<FileStore>>,
    Query(params): Query<ServiceParams>,
) -> ApiResult {
    let service = required(params.service, "service")?;
    info!(service = %service, "Refreshing scraped data");

    store.refresh_scraped(&service).await.map(Json).map_err(|e| {
        warn!(service = %service, error = %e, "Scrape failed");
        ApiFailure::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to scrape data: {}", e),
        )
    })
}

async fn handle_delete_report(
    State(store): State<Arc<FileStore>>,
    Query(params): Query<FilenameParams>,
) -> ApiResult {
    let filename = required(params.filename, "filename")?;
    let deleted = store.delete_report(&filename).await.map_err(ApiFailure::internal)?;

    let message = if deleted {
        format!("Report {} deleted successfully", filename)
    } else {
        format!("Report {} does not exist", filename)
    };
    Ok(Json(json!({ "message": message, "deleted": deleted })))
}

async fn handle_health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "stub-backend",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use outagekit::{ApiError, OutageBackend, OutageClient};
    use tempfile::TempDir;

    use crate::store::{REPORTS_DIR, SCRAPED_DIR};

    async fn serve() -> (TempDir, OutageClient) {
        let dir = TempDir::new().unwrap();
        let fixtures = dir.path().join("fixtures");
        std::fs::create_dir_all(fixtures.join(REPORTS_DIR)).unwrap();
        std::fs::create_dir_all(fixtures.join(SCRAPED_DIR)).unwrap();
        std::fs::write(
            fixtures.join(REPORTS_DIR).join("t-mobile.json"),
            json!({"header": {"provider": "T-Mobile", "total_reports_24h": 812}}).to_string(),
        )
        .unwrap();
        std::fs::write(
            fixtures.join(SCRAPED_DIR).join("t-mobile.json"),
            json!({"latest_reports": [{"city": "Dallas", "reason": "No Signal"}]}).to_string(),
        )
        .unwrap();

        let store = FileStore::open(&dir.path().join("data"), &fixtures).await.unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(Arc::new(store))).await.unwrap();
        });

        (dir, OutageClient::new(&format!("http://{}", addr)))
    }

    #[tokio::test]
    async fn analyze_creates_checkable_report() {
        let (_dir, client) = serve().await;
        assert!(!client.report_exists("t-mobile.json").await);

        let report = client.analyze("t-mobile").await.unwrap();
        assert_eq!(report["header"]["total_reports_24h"], 812);
        assert!(client.report_exists("t-mobile.json").await);

        let doc = client.get_report("t-mobile.json").await.unwrap();
        assert_eq!(doc["header"]["provider"], "T-Mobile");
    }

    #[tokio::test]
    async fn delete_reports_both_outcomes() {
        let (_dir, client) = serve().await;
        client.analyze("t-mobile").await.unwrap();

        let outcome = client.delete_report("t-mobile.json").await.unwrap();
        assert!(outcome.deleted);
        assert_eq!(outcome.message, "Report t-mobile.json deleted successfully");

        let outcome = client.delete_report("t-mobile.json").await.unwrap();
        assert!(!outcome.deleted);
        assert_eq!(outcome.message, "Report t-mobile.json does not exist");
    }

    #[tokio::test]
    async fn missing_artifacts_are_not_found() {
        let (_dir, client) = serve().await;

        let err = client.get_report("comparison_tmobile.json").await.unwrap_err();
        assert_eq!(err, ApiError::NotFound("Report not found".to_string()));

        let err = client.get_scraped_data("t-mobile.json").await.unwrap_err();
        assert_eq!(err, ApiError::NotFound("Scraped data not found".to_string()));
    }

    #[tokio::test]
    async fn ensure_then_get_scraped_data() {
        let (_dir, client) = serve().await;

        let fresh = client.ensure_scraped_data("t-mobile").await.unwrap();
        assert_eq!(fresh["latest_reports"][0]["city"], "Dallas");
        assert_eq!(client.get_scraped_data("t-mobile.json").await.unwrap(), fresh);
    }

    #[tokio::test]
    async fn missing_fixtures_surface_detail() {
        let (_dir, client) = serve().await;

        let err = client.analyze("verizon").await.unwrap_err();
        assert_eq!(err.to_string(), "Report not generated");
        assert_eq!(err.status(), Some(500));

        let err = client.ensure_scraped_data("verizon").await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to scrape data: No fixture for"));

        let err = client.compare_metrics().await.unwrap_err();
        assert!(err.to_string().starts_with("No fixture for"));
    }

    #[tokio::test]
    async fn escaping_filenames_are_bad_requests() {
        let (_dir, client) = serve().await;
        let err = client.get_report("../Cargo.toml").await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(!client.report_exists("../Cargo.toml").await);
    }
}
