use serde::{Deserialize, Serialize};

pub const DEFAULT_PROVIDER: &str = "t-mobile";

/// The comparison artifact is always produced against the tracked provider
/// under this fixed name.
pub const COMPARISON_FILENAME: &str = "comparison_tmobile.json";

/// Filenames of the two generated artifacts whose existence gates navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactNames {
    pub report: String,
    pub comparison: String,
}

impl ArtifactNames {
    pub fn for_provider(provider: &str) -> Self {
        Self {
            report: report_filename(provider),
            comparison: COMPARISON_FILENAME.to_string(),
        }
    }
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self::for_provider(DEFAULT_PROVIDER)
    }
}

/// `"<provider>.json"` in the reports store.
pub fn report_filename(provider: &str) -> String {
    format!("{}.json", provider.to_lowercase())
}

/// `"<service>.json"` in the scraped-data store.
pub fn scraped_filename(service: &str) -> String {
    format!("{}.json", service.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_provider() {
        let names = ArtifactNames::for_provider("T-Mobile");
        assert_eq!(names.report, "t-mobile.json");
        assert_eq!(names.comparison, "comparison_tmobile.json");
        assert_eq!(ArtifactNames::default(), names);
    }
}
