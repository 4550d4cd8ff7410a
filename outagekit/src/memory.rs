// outagekit/src/memory.rs
//
// In-process implementation of the backend contract. Powers demo mode and
// the flow tests: canned documents, optional latency, injectable failures
// and a journal of every call made.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::artifacts::{report_filename, scraped_filename, COMPARISON_FILENAME};
use crate::client::OutageBackend;
use crate::errors::{ApiError, Result};
use crate::types::DeleteOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Analyze,
    Compare,
    CheckReport,
    GetReport,
    GetScrapedData,
    EnsureScrapedData,
    DeleteReport,
}

#[derive(Default)]
struct Store {
    reports: HashMap<String, Value>,
    scraped: HashMap<String, Value>,
    failures: HashMap<Endpoint, ApiError>,
    journal: Vec<String>,
}

pub struct InMemoryBackend {
    dataset: Value,
    analysis: Value,
    comparison: Value,
    latency: Duration,
    store: Mutex<Store>,
}

impl InMemoryBackend {
    pub fn new(dataset: Value, analysis: Value, comparison: Value) -> Self {
        Self {
            dataset,
            analysis,
            comparison,
            latency: Duration::ZERO,
            store: Mutex::new(Store::default()),
        }
    }

    /// Empty documents everywhere.
    pub fn empty() -> Self {
        Self::new(
            Value::Object(Default::default()),
            Value::Object(Default::default()),
            Value::Object(Default::default()),
        )
    }

    /// Every call sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Pre-populate the reports store as if a previous session generated it.
    pub async fn seed_report(&self, filename: &str, document: Value) {
        self.store.lock().await.reports.insert(filename.to_string(), document);
    }

    /// Every later call to `endpoint` fails with `error`.
    pub async fn fail(&self, endpoint: Endpoint, error: ApiError) {
        self.store.lock().await.failures.insert(endpoint, error);
    }

    pub async fn recover(&self, endpoint: Endpoint) {
        self.store.lock().await.failures.remove(&endpoint);
    }

    pub async fn has_report(&self, filename: &str) -> bool {
        self.store.lock().await.reports.contains_key(filename)
    }

    /// Calls made so far, e.g. `"DELETE t-mobile.json"`.
    pub async fn journal(&self) -> Vec<String> {
        self.store.lock().await.journal.clone()
    }

    pub async fn count(&self, prefix: &str) -> usize {
        self.store
            .lock()
            .await
            .journal
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .count()
    }

    async fn enter(&self, endpoint: Endpoint, entry: String) -> Result<()> {
        {
            let mut store = self.store.lock().await;
            store.journal.push(entry);
        }

        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }

        match self.store.lock().await.failures.get(&endpoint) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OutageBackend for InMemoryBackend {
    async fn analyze(&self, service: &str) -> Result<Value> {
        self.enter(Endpoint::Analyze, format!("ANALYZE {}", service)).await?;
        self.store
            .lock()
            .await
            .reports
            .insert(report_filename(service), self.analysis.clone());
        Ok(self.analysis.clone())
    }

    async fn compare_metrics(&self) -> Result<Value> {
        self.enter(Endpoint::Compare, "COMPARE".to_string()).await?;
        self.store
            .lock()
            .await
            .reports
            .insert(COMPARISON_FILENAME.to_string(), self.comparison.clone());
        Ok(self.comparison.clone())
    }

    async fn report_exists(&self, filename: &str) -> bool {
        if self.enter(Endpoint::CheckReport, format!("CHECK {}", filename)).await.is_err() {
            return false;
        }
        self.has_report(filename).await
    }

    async fn get_report(&self, filename: &str) -> Result<Value> {
        self.enter(Endpoint::GetReport, format!("GET {}", filename)).await?;
        self.store
            .lock()
            .await
            .reports
            .get(filename)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Report not found".to_string()))
    }

    async fn get_scraped_data(&self, filename: &str) -> Result<Value> {
        self.enter(Endpoint::GetScrapedData, format!("GET_SCRAPED {}", filename)).await?;
        self.store
            .lock()
            .await
            .scraped
            .get(filename)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Scraped data not found".to_string()))
    }

    async fn ensure_scraped_data(&self, service: &str) -> Result<Value> {
        self.enter(Endpoint::EnsureScrapedData, format!("ENSURE {}", service)).await?;
        self.store
            .lock()
            .await
            .scraped
            .insert(scraped_filename(service), self.dataset.clone());
        Ok(self.dataset.clone())
    }

    async fn delete_report(&self, filename: &str) -> Result<DeleteOutcome> {
        self.enter(Endpoint::DeleteReport, format!("DELETE {}", filename)).await?;
        let removed = self.store.lock().await.reports.remove(filename).is_some();
        Ok(if removed {
            DeleteOutcome {
                deleted: true,
                message: format!("Report {} deleted successfully", filename),
            }
        } else {
            DeleteOutcome {
                deleted: false,
                message: format!("Report {} does not exist", filename),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn analyze_promotes_report() {
        let backend = InMemoryBackend::new(json!({}), json!({"pain_index": 7.5}), json!({}));

        assert!(!backend.report_exists("t-mobile.json").await);
        let report = backend.analyze("t-mobile").await.unwrap();
        assert_eq!(report["pain_index"], 7.5);
        assert!(backend.report_exists("t-mobile.json").await);

        let outcome = backend.delete_report("t-mobile.json").await.unwrap();
        assert!(outcome.deleted);
        let outcome = backend.delete_report("t-mobile.json").await.unwrap();
        assert!(!outcome.deleted);
        assert_eq!(outcome.message, "Report t-mobile.json does not exist");
    }

    #[tokio::test]
    async fn injected_failure_sticks_until_recovered() {
        let backend = InMemoryBackend::empty();
        backend
            .fail(
                Endpoint::Compare,
                ApiError::Backend { status: 500, detail: "boom".to_string() },
            )
            .await;

        assert!(backend.compare_metrics().await.is_err());
        backend.recover(Endpoint::Compare).await;
        assert!(backend.compare_metrics().await.is_ok());
        assert_eq!(backend.count("COMPARE").await, 2);
    }
}
