// services/outage-tui/src/ui/comparison.rs
//
// Competitor comparison against the tracked provider

use outagekit::flows::ArtifactView;
use outagekit::types::{ComparisonReport, Metric, ProviderComparison, ProviderMetrics, Verdict};
use ratatui::{prelude::*, widgets::*};

use super::colors;
use super::widgets::{draw_status, panel};

pub fn draw(frame: &mut Frame, area: Rect, view: &ArtifactView<ComparisonReport>, provider: &str) {
    match view {
        ArtifactView::Loading => draw_status(frame, area, "Loading comparison...", &[], colors::GOLD),
        ArtifactView::Failed(message) => draw_status(
            frame,
            area,
            "Error loading comparison",
            &[message.clone()],
            colors::RED,
        ),
        ArtifactView::Loaded(report) => draw_comparison(frame, area, report, provider),
    }
}

/// Star rating with two decimals, percentages with one, counts as integers.
pub fn format_metric(metric: Metric, value: f64) -> String {
    match metric {
        Metric::StarRating => format!("{:.2}", value),
        Metric::TotalReports | Metric::Locations => format!("{:.0}", value),
        Metric::TotalBlackoutPct | Metric::InternetPct | Metric::PhonePct => format!("{:.1}%", value),
    }
}

/// The backend's verdict when it gave one, otherwise derived from the values.
pub fn cell_verdict(provider: &ProviderComparison, baseline: &ProviderMetrics, metric: Metric) -> Option<Verdict> {
    provider.verdict(metric).or_else(|| {
        let (value, base) = (provider.metrics.get(metric), baseline.get(metric));
        if value == base {
            None
        } else if metric.is_better(value, base) {
            Some(Verdict::Better)
        } else {
            Some(Verdict::Worse)
        }
    })
}

fn draw_comparison(frame: &mut Frame, area: Rect, report: &ComparisonReport, provider: &str) {
    if report.providers.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No competitor data", Style::default().fg(colors::SILVER)))
                .block(panel("COMPETITOR COMPARISON")),
            area,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(8)])
        .split(area);

    draw_summaries(frame, rows[0], &report.providers);
    draw_metric_table(frame, rows[1], report, provider);
}

fn draw_summaries(frame: &mut Frame, area: Rect, providers: &[ProviderComparison]) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, providers.len() as u32); providers.len()])
        .split(area);

    for (p, card) in providers.iter().zip(cards.iter()) {
        let (verdict, color) = if p.overall_better() {
            ("Better overall", colors::SUCCESS)
        } else {
            ("Worse overall", colors::RED)
        };
        let lines = vec![
            Line::from(Span::styled(verdict, Style::default().fg(color).bold())),
            Line::from(vec![
                Span::styled(format!("{} better", p.better_count()), Style::default().fg(colors::SUCCESS)),
                Span::styled(" · ", Style::default().fg(colors::SILVER)),
                Span::styled(format!("{} worse", p.worse_count()), Style::default().fg(colors::RED)),
            ]),
            Line::from(Span::styled(p.reasoning.clone(), Style::default().fg(colors::SILVER))),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(panel(&p.name.to_uppercase())),
            *card,
        );
    }
}

fn draw_metric_table(frame: &mut Frame, area: Rect, report: &ComparisonReport, provider: &str) {
    let baseline_name = if report.baseline.is_empty() {
        provider.to_string()
    } else {
        report.baseline.clone()
    };

    let rows: Vec<Row> = Metric::ALL
        .into_iter()
        .map(|metric| {
            let mut cells = vec![
                Cell::from(Span::styled(metric.label(), Style::default().fg(colors::WHITE))),
                Cell::from(Span::styled(
                    format_metric(metric, report.baseline_metrics.get(metric)),
                    Style::default().fg(colors::MAGENTA).bold(),
                )),
            ];
            cells.extend(report.providers.iter().map(|p| {
                let color = match cell_verdict(p, &report.baseline_metrics, metric) {
                    Some(Verdict::Better) => colors::SUCCESS,
                    Some(Verdict::Worse) => colors::RED,
                    None => colors::SILVER,
                };
                Cell::from(Span::styled(
                    format_metric(metric, p.metrics.get(metric)),
                    Style::default().fg(color),
                ))
            }));
            Row::new(cells)
        })
        .collect();

    let mut header = vec![
        Cell::from(Span::styled("METRIC", Style::default().fg(colors::GOLD).bold())),
        Cell::from(Span::styled(baseline_name.to_uppercase(), Style::default().fg(colors::GOLD).bold())),
    ];
    header.extend(report.providers.iter().map(|p| {
        Cell::from(Span::styled(p.name.to_uppercase(), Style::default().fg(colors::GOLD).bold()))
    }));

    let mut widths = vec![Constraint::Length(16), Constraint::Length(14)];
    widths.extend(report.providers.iter().map(|_| Constraint::Length(14)));

    let table = Table::new(rows, widths)
        .header(Row::new(header).bottom_margin(1))
        .block(panel(&format!("METRICS VS {}", baseline_name.to_uppercase())));

    frame.render_widget(table, area);
}
