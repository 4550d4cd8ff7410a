// services/outage-tui/src/mock.rs
//
// Demo-mode data: randomised outage documents served by an in-memory backend

use std::time::Duration;

use chrono::Utc;
use outagekit::memory::InMemoryBackend;
use outagekit::types::{
    AnalysisReport, CompanyPost, ComparisonReport, Hotspot, IssueReport, KeyMetric, LocationStatus, Metric,
    OutageReport, Problem, ProviderComparison, ProviderMetrics, RatingValue, ReportHeader, ScrapedOutageDataset,
    Sentiment, SentimentSample, StarRatingData, Trend, TrendAnalysis,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

const CITIES: [&str; 10] = [
    "Dallas, TX",
    "Houston, TX",
    "Atlanta, GA",
    "Chicago, IL",
    "Seattle, WA",
    "Phoenix, AZ",
    "Miami, FL",
    "Denver, CO",
    "New York, NY",
    "Los Angeles, CA",
];

const PROBLEMS: [&str; 4] = ["Mobile Internet", "No Signal", "Mobile Phone", "Total Blackout"];

const COMPETITORS: [&str; 3] = ["Verizon", "AT&T", "US Cellular"];

/// Backend for `--demo`. Latency makes the loading phases visible.
pub fn demo_backend(latency: Duration) -> InMemoryBackend {
    InMemoryBackend::new(dataset(), analysis(), comparison()).with_latency(latency)
}

fn to_value<T: serde::Serialize>(doc: &T) -> Value {
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

pub fn dataset() -> Value {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    let latest_reports = (0..rng.gen_range(8..16))
        .map(|i| {
            let minutes = i * rng.gen_range(2..7) + 1;
            OutageReport {
                city: CITIES[rng.gen_range(0..CITIES.len())]
                    .split(',')
                    .next()
                    .unwrap_or_default()
                    .to_string(),
                reason: PROBLEMS[rng.gen_range(0..PROBLEMS.len())].to_string(),
                time_human: format!("{} minutes ago", minutes),
                time_iso: (now - chrono::Duration::minutes(minutes as i64)).to_rfc3339(),
            }
        })
        .collect();

    let mut cities = CITIES.to_vec();
    cities.shuffle(&mut rng);
    let last_15_days_status = cities
        .iter()
        .take(rng.gen_range(5..CITIES.len()))
        .map(|city| LocationStatus {
            location: city.to_string(),
            reports: rng.gen_range(3..240),
        })
        .collect();

    // Shares sum to 100 and are ranked high to low.
    let mut weights: Vec<u32> = PROBLEMS.iter().map(|_| rng.gen_range(5..60)).collect();
    weights.sort_unstable_by(|a, b| b.cmp(a));
    let total: u32 = weights.iter().sum();
    let most_reported_problems = PROBLEMS
        .iter()
        .zip(weights)
        .map(|(label, w)| Problem {
            label: label.to_string(),
            percent: (w * 100 / total) as f64,
        })
        .collect();

    let issues_reports = ["@nightshift_dev", "@dallas_commuter", "@kaylee_r", "@ops_mike"]
        .iter()
        .map(|user| IssueReport {
            user: user.to_string(),
            text: "No data since this morning, calls drop after a few seconds".to_string(),
            time_iso: (now - chrono::Duration::minutes(rng.gen_range(5..600))).to_rfc3339(),
            location: Some(CITIES[rng.gen_range(0..CITIES.len())].to_string()),
        })
        .collect();

    let company_posts = vec![CompanyPost {
        url: "https://x.com/TMobileHelp".to_string(),
        name: "T-Mobile Help".to_string(),
        reply_context: "Replying to @dallas_commuter".to_string(),
        text: "We're sorry for the trouble. Please send us a DM so we can look into your area.".to_string(),
        timestamp: (now - chrono::Duration::minutes(rng.gen_range(10..120))).to_rfc3339(),
    }];

    to_value(&ScrapedOutageDataset {
        latest_reports: Some(latest_reports),
        last_15_days_status: Some(last_15_days_status),
        most_reported_problems: Some(most_reported_problems),
        chart: None,
        star_rating: Some(StarRatingData {
            current: Some(RatingValue::Text(format!("{:.2} out of 5", rng.gen_range(1.8..3.4)))),
            count: Some(format!("{} ratings", rng.gen_range(800..2400))),
        }),
        issues_reports: Some(issues_reports),
        company_posts: Some(company_posts),
        extra: Default::default(),
    })
}

pub fn analysis() -> Value {
    let mut rng = rand::thread_rng();
    let trends = [Trend::Up, Trend::Down, Trend::Stable];

    let key_metrics = [
        ("Total Blackout", "⚡"),
        ("Phone Issues", "📞"),
        ("Critical Reports", "🚨"),
        ("Signal Loss", "📶"),
        ("Frustration", "😠"),
    ]
    .iter()
    .map(|(title, icon)| {
        let trend = trends[rng.gen_range(0..trends.len())];
        KeyMetric {
            title: title.to_string(),
            value: format!("{}%", rng.gen_range(4..70)),
            icon: icon.to_string(),
            trend,
            trend_value: match trend {
                Trend::Up => format!("+{}% vs yesterday", rng.gen_range(1..20)),
                Trend::Down => format!("-{}% vs yesterday", rng.gen_range(1..20)),
                Trend::Stable => "No change".to_string(),
            },
        }
    })
    .collect();

    let geographic_hotspots = CITIES
        .iter()
        .take(4)
        .map(|city| Hotspot {
            city: city.to_string(),
            severity: (if rng.gen_bool(0.5) { "high" } else { "medium" }).to_string(),
            reports_count: rng.gen_range(20..300),
            top_issue: PROBLEMS[rng.gen_range(0..PROBLEMS.len())].to_string(),
        })
        .collect();

    let negative = rng.gen_range(50.0..80.0_f64).round();
    let positive = rng.gen_range(2.0..10.0_f64).round();

    to_value(&AnalysisReport {
        header: ReportHeader {
            provider: "T-Mobile".to_string(),
            status: "possible problems".to_string(),
            status_color: (if negative > 65.0 { "red" } else { "yellow" }).to_string(),
            star_rating: rng.gen_range(1.8..3.4),
            rating_count: format!("{} ratings", rng.gen_range(800..2400)),
            total_reports_24h: rng.gen_range(200..1500),
            last_updated: Utc::now().to_rfc3339(),
        },
        key_metrics,
        critical_insights: vec![
            "Mobile data failures dominate reports in the South".to_string(),
            "Report volume doubled over the last three hours".to_string(),
        ],
        sentiment: Sentiment {
            negative,
            neutral: 100.0 - negative - positive,
            positive,
            samples: vec![SentimentSample {
                user: "@kaylee_r".to_string(),
                tone: "frustrated".to_string(),
                text: "Third outage this week, support keeps saying it's resolved".to_string(),
                time_ago: "12m ago".to_string(),
            }],
        },
        trend_analysis: TrendAnalysis {
            direction: "increasing".to_string(),
            description: "Reports are climbing since early morning".to_string(),
            chart_insights: "Peak at 09:00 local time".to_string(),
        },
        geographic_hotspots,
        pain_index: Some((rng.gen_range(4.0..9.5_f64) * 10.0).round() / 10.0),
        recommendations: vec![
            "Publish a status update for affected Texas markets".to_string(),
            "Route mobile data complaints to the network operations queue".to_string(),
        ],
        extra: Default::default(),
    })
}

fn random_metrics(rng: &mut impl Rng) -> ProviderMetrics {
    ProviderMetrics {
        star_rating: (rng.gen_range(1.5..4.0_f64) * 100.0).round() / 100.0,
        total_reports: rng.gen_range(50..1500) as f64,
        locations: rng.gen_range(3..30) as f64,
        total_blackout_pct: rng.gen_range(2..30) as f64,
        internet_pct: rng.gen_range(20..70) as f64,
        phone_pct: rng.gen_range(5..40) as f64,
    }
}

pub fn comparison() -> Value {
    let mut rng = rand::thread_rng();
    let baseline = random_metrics(&mut rng);

    let providers = COMPETITORS
        .iter()
        .map(|name| {
            let metrics = random_metrics(&mut rng);
            let (better, worse): (Vec<Metric>, Vec<Metric>) = Metric::ALL
                .into_iter()
                .filter(|m| metrics.get(*m) != baseline.get(*m))
                .partition(|m| m.is_better(metrics.get(*m), baseline.get(*m)));

            ProviderComparison {
                name: name.to_string(),
                metrics,
                reasoning: format!(
                    "{} outperforms the baseline on {} of {} metrics",
                    name,
                    better.len(),
                    Metric::ALL.len()
                ),
                better_than_tmobile: better.iter().map(|m| m.key().to_string()).collect(),
                worse_than_tmobile: worse.iter().map(|m| m.key().to_string()).collect(),
            }
        })
        .collect();

    to_value(&ComparisonReport {
        baseline: "T-Mobile".to_string(),
        baseline_metrics: baseline,
        providers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_documents_decode_into_views() {
        let data: ScrapedOutageDataset = serde_json::from_value(dataset()).unwrap();
        assert!(data.active_reports() >= 8);
        assert!(data.top_problem().is_some());

        let report: AnalysisReport = serde_json::from_value(analysis()).unwrap();
        assert_eq!(report.key_metrics.len(), 5);

        let comparison: ComparisonReport = serde_json::from_value(comparison()).unwrap();
        assert_eq!(comparison.providers.len(), COMPETITORS.len());
    }

    #[test]
    fn problems_are_ranked() {
        let data: ScrapedOutageDataset = serde_json::from_value(dataset()).unwrap();
        let problems = data.most_reported_problems.unwrap();
        assert!(problems.windows(2).all(|w| w[0].percent >= w[1].percent));
    }
}
