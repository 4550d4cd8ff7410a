// outagekit/src/types.rs
//
// Typed views over the JSON documents served by the analysis service.
// Every field is optional or defaulted: the documents are produced elsewhere
// and only the parts the views render are modelled here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Snapshot of current outage data for one provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrapedOutageDataset {
    pub latest_reports: Option<Vec<OutageReport>>,
    pub last_15_days_status: Option<Vec<LocationStatus>>,
    pub most_reported_problems: Option<Vec<Problem>>,
    pub chart: Option<ChartRef>,
    pub star_rating: Option<StarRatingData>,
    pub issues_reports: Option<Vec<IssueReport>>,
    pub company_posts: Option<Vec<CompanyPost>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScrapedOutageDataset {
    pub fn active_reports(&self) -> usize {
        self.latest_reports.as_ref().map_or(0, Vec::len)
    }

    pub fn affected_cities(&self) -> usize {
        self.last_15_days_status.as_ref().map_or(0, Vec::len)
    }

    /// The collection is ranked by the backend, so the first entry is the top one.
    pub fn top_problem(&self) -> Option<&Problem> {
        self.most_reported_problems.as_ref().and_then(|p| p.first())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutageReport {
    pub city: String,
    pub reason: String,
    pub time_human: String,
    pub time_iso: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocationStatus {
    pub location: String,
    pub reports: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Problem {
    pub label: String,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartRef {
    pub image_src: Option<String>,
    pub alt_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarRatingData {
    pub current: Option<RatingValue>,
    pub count: Option<String>,
}

/// Ratings arrive either as a number or as text like `"2.58 out of 5"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RatingValue {
    Number(f64),
    Text(String),
}

impl RatingValue {
    pub fn display(&self) -> String {
        match self {
            RatingValue::Number(n) => format!("{:.2}", n),
            RatingValue::Text(s) => s.split_whitespace().next().unwrap_or("N/A").to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IssueReport {
    pub user: String,
    pub text: String,
    pub time_iso: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompanyPost {
    pub url: String,
    pub name: String,
    pub reply_context: String,
    pub text: String,
    pub timestamp: String,
}

/// Enriched report generated by `/analyze`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisReport {
    pub header: ReportHeader,
    pub key_metrics: Vec<KeyMetric>,
    pub critical_insights: Vec<String>,
    pub sentiment: Sentiment,
    pub trend_analysis: TrendAnalysis,
    pub geographic_hotspots: Vec<Hotspot>,
    pub pain_index: Option<f64>,
    pub recommendations: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportHeader {
    pub provider: String,
    pub status: String,
    pub status_color: String,
    pub star_rating: f64,
    pub rating_count: String,
    pub total_reports_24h: u64,
    pub last_updated: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyMetric {
    pub title: String,
    pub value: String,
    pub icon: String,
    pub trend: Trend,
    pub trend_value: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    #[serde(other)]
    Stable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Sentiment {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub samples: Vec<SentimentSample>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SentimentSample {
    pub user: String,
    pub tone: String,
    pub text: String,
    pub time_ago: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrendAnalysis {
    pub direction: String,
    pub description: String,
    pub chart_insights: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Hotspot {
    pub city: String,
    pub severity: String,
    pub reports_count: u64,
    pub top_issue: String,
}

/// Cross-provider comparison generated by `/compare_metrics`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ComparisonReport {
    pub baseline: String,
    #[serde(rename = "tmobile")]
    pub baseline_metrics: ProviderMetrics,
    pub providers: Vec<ProviderComparison>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderMetrics {
    pub star_rating: f64,
    pub total_reports: f64,
    pub locations: f64,
    pub total_blackout_pct: f64,
    pub internet_pct: f64,
    pub phone_pct: f64,
}

impl ProviderMetrics {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::StarRating => self.star_rating,
            Metric::TotalReports => self.total_reports,
            Metric::Locations => self.locations,
            Metric::TotalBlackoutPct => self.total_blackout_pct,
            Metric::InternetPct => self.internet_pct,
            Metric::PhonePct => self.phone_pct,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderComparison {
    pub name: String,
    #[serde(flatten)]
    pub metrics: ProviderMetrics,
    pub better_than_tmobile: Vec<String>,
    pub worse_than_tmobile: Vec<String>,
    pub reasoning: String,
}

impl ProviderComparison {
    pub fn better_count(&self) -> usize {
        self.better_than_tmobile.len()
    }

    pub fn worse_count(&self) -> usize {
        self.worse_than_tmobile.len()
    }

    pub fn overall_better(&self) -> bool {
        self.better_count() > self.worse_count()
    }

    /// Backend verdict for one metric, if it gave one.
    pub fn verdict(&self, metric: Metric) -> Option<Verdict> {
        let key = metric.key();
        if self.better_than_tmobile.iter().any(|m| m == key) {
            Some(Verdict::Better)
        } else if self.worse_than_tmobile.iter().any(|m| m == key) {
            Some(Verdict::Worse)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Better,
    Worse,
}

/// Metrics compared across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    StarRating,
    TotalReports,
    Locations,
    TotalBlackoutPct,
    InternetPct,
    PhonePct,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::StarRating,
        Metric::TotalReports,
        Metric::Locations,
        Metric::TotalBlackoutPct,
        Metric::InternetPct,
        Metric::PhonePct,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Metric::StarRating => "star_rating",
            Metric::TotalReports => "total_reports",
            Metric::Locations => "locations",
            Metric::TotalBlackoutPct => "total_blackout_pct",
            Metric::InternetPct => "internet_pct",
            Metric::PhonePct => "phone_pct",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::StarRating => "Star Rating",
            Metric::TotalReports => "Total Reports",
            Metric::Locations => "Locations",
            Metric::TotalBlackoutPct => "Blackout %",
            Metric::InternetPct => "Internet %",
            Metric::PhonePct => "Phone %",
        }
    }

    /// Higher is better only for the star rating.
    pub fn is_better(self, provider_value: f64, baseline_value: f64) -> bool {
        match self {
            Metric::StarRating => provider_value > baseline_value,
            _ => provider_value < baseline_value,
        }
    }
}

/// `GET /check_report` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// `DELETE /delete_report` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeleteOutcome {
    pub deleted: bool,
    pub message: String,
}

/// Error payload shape used by the analysis service for non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Validation failures carry a structured `detail`; it is shown as JSON text.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
