// services/stub-backend/src/store.rs
//
// JSON documents on disk: generated reports under `reports/`, scraped
// snapshots under `scraped-data/`, and the canned documents that stand in
// for analysis and scraping under `fixtures/`.

use std::path::{Path, PathBuf};

use outagekit::artifacts::{report_filename, scraped_filename, COMPARISON_FILENAME};
use serde_json::Value;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

pub const REPORTS_DIR: &str = "reports";
pub const SCRAPED_DIR: &str = "scraped-data";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid filename: {0}")]
    InvalidName(String),

    #[error("No fixture for {0}")]
    MissingFixture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct FileStore {
    reports: PathBuf,
    scraped: PathBuf,
    fixtures: PathBuf,
}

impl FileStore {
    /// Creates the two store directories under `data_dir` if missing.
    pub async fn open(data_dir: &Path, fixtures_dir: &Path) -> Result<Self> {
        let store = Self {
            reports: data_dir.join(REPORTS_DIR),
            scraped: data_dir.join(SCRAPED_DIR),
            fixtures: fixtures_dir.to_path_buf(),
        };
        fs::create_dir_all(&store.reports).await?;
        fs::create_dir_all(&store.scraped).await?;
        Ok(store)
    }

    pub async fn report_exists(&self, filename: &str) -> Result<bool> {
        let path = self.reports.join(checked(filename)?);
        Ok(fs::try_exists(path).await?)
    }

    pub async fn read_report(&self, filename: &str) -> Result<Value> {
        read_json(&self.reports.join(checked(filename)?)).await
    }

    pub async fn read_scraped(&self, filename: &str) -> Result<Value> {
        read_json(&self.scraped.join(checked(filename)?)).await
    }

    /// `Ok(false)` when there was nothing to delete.
    pub async fn delete_report(&self, filename: &str) -> Result<bool> {
        match fs::remove_file(self.reports.join(checked(filename)?)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the provider's analysis fixture as its generated report.
    pub async fn generate_report(&self, service: &str) -> Result<Value> {
        let filename = checked(&report_filename(service))?.to_string();
        self.promote(&self.fixtures.join(REPORTS_DIR).join(&filename), &self.reports.join(&filename))
            .await
    }

    pub async fn generate_comparison(&self) -> Result<Value> {
        self.promote(
            &self.fixtures.join(REPORTS_DIR).join(COMPARISON_FILENAME),
            &self.reports.join(COMPARISON_FILENAME),
        )
        .await
    }

    /// Refresh the provider's scraped snapshot from its fixture.
    pub async fn refresh_scraped(&self, service: &str) -> Result<Value> {
        let filename = checked(&scraped_filename(service))?.to_string();
        self.promote(&self.fixtures.join(SCRAPED_DIR).join(&filename), &self.scraped.join(&filename))
            .await
    }

    async fn promote(&self, fixture: &Path, target: &Path) -> Result<Value> {
        let document = match read_json(fixture).await {
            Err(StoreError::NotFound(_)) => {
                return Err(StoreError::MissingFixture(fixture.display().to_string()))
            }
            other => other?,
        };
        fs::write(target, serde_json::to_vec_pretty(&document)?).await?;
        debug!(fixture = %fixture.display(), target = %target.display(), "Fixture promoted");
        Ok(document)
    }
}

/// Plain file names only; anything that could leave the store is rejected.
fn checked(filename: &str) -> Result<&str> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(StoreError::InvalidName(filename.to_string()));
    }
    Ok(filename)
}

async fn read_json(path: &Path) -> Result<Value> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.display().to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn store_with_fixtures() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let fixtures = dir.path().join("fixtures");
        std::fs::create_dir_all(fixtures.join(REPORTS_DIR)).unwrap();
        std::fs::create_dir_all(fixtures.join(SCRAPED_DIR)).unwrap();
        std::fs::write(
            fixtures.join(REPORTS_DIR).join("t-mobile.json"),
            json!({"pain_index": 7.2}).to_string(),
        )
        .unwrap();
        std::fs::write(
            fixtures.join(SCRAPED_DIR).join("t-mobile.json"),
            json!({"latest_reports": []}).to_string(),
        )
        .unwrap();

        let store = FileStore::open(&dir.path().join("data"), &fixtures).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn generated_report_lands_in_reports_dir() {
        let (_dir, store) = store_with_fixtures().await;
        assert!(!store.report_exists("t-mobile.json").await.unwrap());

        let report = store.generate_report("T-Mobile").await.unwrap();
        assert_eq!(report["pain_index"], 7.2);
        assert!(store.report_exists("t-mobile.json").await.unwrap());
        assert_eq!(store.read_report("t-mobile.json").await.unwrap(), report);
    }

    #[tokio::test]
    async fn delete_reports_absence() {
        let (_dir, store) = store_with_fixtures().await;
        store.generate_report("t-mobile").await.unwrap();

        assert!(store.delete_report("t-mobile.json").await.unwrap());
        assert!(!store.delete_report("t-mobile.json").await.unwrap());
    }

    #[tokio::test]
    async fn missing_fixture_is_distinct_from_missing_report() {
        let (_dir, store) = store_with_fixtures().await;

        assert!(matches!(
            store.generate_comparison().await,
            Err(StoreError::MissingFixture(_))
        ));
        assert!(matches!(
            store.read_report(COMPARISON_FILENAME).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn path_escapes_are_rejected() {
        let (_dir, store) = store_with_fixtures().await;
        assert!(matches!(
            store.read_report("../secrets.json").await,
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(store.delete_report("").await, Err(StoreError::InvalidName(_))));
    }

    #[test]
    fn shipped_fixtures_decode() {
        use outagekit::types::{AnalysisReport, ComparisonReport, ScrapedOutageDataset};

        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let read = |name: &str| -> Value {
            serde_json::from_slice(&std::fs::read(dir.join(name)).unwrap()).unwrap()
        };

        let report: AnalysisReport = serde_json::from_value(read("reports/t-mobile.json")).unwrap();
        assert_eq!(report.header.total_reports_24h, 812);

        let comparison: ComparisonReport =
            serde_json::from_value(read("reports/comparison_tmobile.json")).unwrap();
        assert_eq!(comparison.providers.len(), 2);
        assert!(comparison.providers[0].overall_better());

        let dataset: ScrapedOutageDataset = serde_json::from_value(read("scraped-data/t-mobile.json")).unwrap();
        assert_eq!(dataset.active_reports(), 5);
        assert_eq!(dataset.top_problem().map(|p| p.label.as_str()), Some("Mobile Internet"));
    }

    #[tokio::test]
    async fn scraped_snapshot_is_refreshed() {
        let (_dir, store) = store_with_fixtures().await;
        assert!(matches!(
            store.read_scraped("t-mobile.json").await,
            Err(StoreError::NotFound(_))
        ));

        store.refresh_scraped("t-mobile").await.unwrap();
        assert_eq!(
            store.read_scraped("t-mobile.json").await.unwrap(),
            json!({"latest_reports": []})
        );
    }
}
