// outagekit/src/client.rs
//
// HTTP client for the outage analysis service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DashboardConfig;
use crate::errors::{ApiError, Result, UNKNOWN_ERROR};
use crate::types::{DeleteOutcome, ErrorBody, ExistsResponse};

/// Everything the views need from the analysis service.
///
/// `report_exists` is infallible by contract: any failure reads as "absent".
#[async_trait]
pub trait OutageBackend: Send + Sync {
    /// Generates and stores the provider's report. Any 2xx JSON body counts
    /// as success; the typed view is only decoded when the report is fetched.
    async fn analyze(&self, service: &str) -> Result<Value>;

    async fn compare_metrics(&self) -> Result<Value>;

    async fn report_exists(&self, filename: &str) -> bool;

    async fn get_report(&self, filename: &str) -> Result<Value>;

    async fn get_scraped_data(&self, filename: &str) -> Result<Value>;

    /// May scrape server-side; expect this to take seconds.
    async fn ensure_scraped_data(&self, service: &str) -> Result<Value>;

    async fn delete_report(&self, filename: &str) -> Result<DeleteOutcome>;
}

/// Which endpoint a response belongs to. Decides the fallback message and
/// whether a 404 is reported as [`ApiError::NotFound`].
#[derive(Debug, Clone, Copy)]
enum Call<'a> {
    Analyze(&'a str),
    Compare,
    GetReport,
    GetScrapedData,
    EnsureScrapedData,
    DeleteReport,
}

impl Call<'_> {
    fn fallback_message(&self) -> String {
        match self {
            Call::Analyze(service) => format!("Failed to analyze {}", service),
            Call::Compare => "Failed to compare metrics".to_string(),
            Call::GetReport => "Failed to get report".to_string(),
            Call::GetScrapedData => "Failed to get scraped data".to_string(),
            Call::EnsureScrapedData => "Failed to ensure scraped data".to_string(),
            Call::DeleteReport => "Failed to delete report".to_string(),
        }
    }

    fn not_found_message(&self) -> Option<&'static str> {
        match self {
            Call::GetReport => Some("Report not found"),
            Call::GetScrapedData => Some("Scraped data not found"),
            _ => None,
        }
    }
}

pub struct OutageClient {
    client: reqwest::Client,
    base_url: String,
}

impl OutageClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self::with_client(&config.api_url, client))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, call: Call<'_>) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            warn!(call = ?call, error = %e, "Request to analysis service failed");
            ApiError::from(e)
        })?;

        if !response.status().is_success() {
            return Err(error_from_response(response, call).await);
        }

        Ok(response.json::<T>().await?)
    }
}

async fn error_from_response(response: Response, call: Call<'_>) -> ApiError {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        if let Some(message) = call.not_found_message() {
            debug!(call = ?call, "Artifact not found");
            return ApiError::NotFound(message.to_string());
        }
    }

    let detail = match response.json::<ErrorBody>().await {
        Ok(body) => body.message().unwrap_or_else(|| call.fallback_message()),
        Err(_) => UNKNOWN_ERROR.to_string(),
    };

    warn!(call = ?call, status = status.as_u16(), detail = %detail, "Analysis service returned an error");
    ApiError::Backend {
        status: status.as_u16(),
        detail,
    }
}

#[async_trait]
impl OutageBackend for OutageClient {
    async fn analyze(&self, service: &str) -> Result<Value> {
        debug!(service = %service, "Requesting analysis");
        let request = self.client.get(self.url("/analyze")).query(&[("service", service)]);
        self.send_json(request, Call::Analyze(service)).await
    }

    async fn compare_metrics(&self) -> Result<Value> {
        debug!("Requesting provider comparison");
        let request = self.client.get(self.url("/compare_metrics"));
        self.send_json(request, Call::Compare).await
    }

    async fn report_exists(&self, filename: &str) -> bool {
        let request = self
            .client
            .get(self.url("/check_report"))
            .query(&[("filename", filename)]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(filename = %filename, error = %e, "Existence check failed, treating as absent");
                return false;
            }
        };

        if !response.status().is_success() {
            debug!(filename = %filename, status = response.status().as_u16(), "Existence check rejected, treating as absent");
            return false;
        }

        match response.json::<ExistsResponse>().await {
            Ok(body) => body.exists,
            Err(e) => {
                debug!(filename = %filename, error = %e, "Existence check body unreadable, treating as absent");
                false
            }
        }
    }

    async fn get_report(&self, filename: &str) -> Result<Value> {
        let request = self
            .client
            .get(self.url("/get_report"))
            .query(&[("filename", filename)]);
        self.send_json(request, Call::GetReport).await
    }

    async fn get_scraped_data(&self, filename: &str) -> Result<Value> {
        let request = self
            .client
            .get(self.url("/get_scraped_data"))
            .query(&[("filename", filename)]);
        self.send_json(request, Call::GetScrapedData).await
    }

    async fn ensure_scraped_data(&self, service: &str) -> Result<Value> {
        debug!(service = %service, "Ensuring scraped data");
        let request = self
            .client
            .get(self.url("/ensure_scraped_data"))
            .query(&[("service", service)]);
        self.send_json(request, Call::EnsureScrapedData).await
    }

    async fn delete_report(&self, filename: &str) -> Result<DeleteOutcome> {
        let request = self
            .client
            .delete(self.url("/delete_report"))
            .query(&[("filename", filename)]);
        self.send_json(request, Call::DeleteReport).await
    }
}
