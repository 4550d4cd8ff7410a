// services/outage-tui/src/ui/report.rs
//
// Generated analysis report for the tracked provider

use outagekit::flows::ArtifactView;
use outagekit::types::{AnalysisReport, KeyMetric, Trend};
use ratatui::{prelude::*, widgets::*};

use super::colors;
use super::widgets::{bar, draw_status, format_number, panel};

pub fn draw(frame: &mut Frame, area: Rect, view: &ArtifactView<AnalysisReport>) {
    match view {
        ArtifactView::Loading => draw_status(frame, area, "Loading report...", &[], colors::GOLD),
        ArtifactView::Failed(message) => draw_status(
            frame,
            area,
            "Error loading report",
            &[message.clone()],
            colors::RED,
        ),
        ArtifactView::Loaded(report) => draw_report(frame, area, report),
    }
}

fn status_color(name: &str) -> Color {
    match name.to_lowercase().as_str() {
        "red" => colors::RED,
        "yellow" | "orange" => colors::GOLD,
        "green" => colors::SUCCESS,
        _ => colors::SILVER,
    }
}

/// Arrow and color for a metric trend. Rising outage numbers are bad news.
fn trend_marker(trend: Trend) -> (&'static str, Color) {
    match trend {
        Trend::Up => ("▲", colors::RED),
        Trend::Down => ("▼", colors::SUCCESS),
        Trend::Stable => ("■", colors::SILVER),
    }
}

fn draw_report(frame: &mut Frame, area: Rect, report: &AnalysisReport) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Summary
            Constraint::Length(5), // Key metrics
            Constraint::Min(6),    // Insights and sentiment
            Constraint::Length(7), // Hotspots and recommendations
        ])
        .split(area);

    draw_summary(frame, rows[0], report);
    draw_key_metrics(frame, rows[1], &report.key_metrics);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);
    draw_insights(frame, middle[0], report);
    draw_sentiment(frame, middle[1], report);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[3]);
    draw_hotspots(frame, bottom[0], report);
    draw_recommendations(frame, bottom[1], &report.recommendations);
}

fn draw_summary(frame: &mut Frame, area: Rect, report: &AnalysisReport) {
    let header = &report.header;
    let mut first = vec![
        Span::styled(format!("{} ", header.provider), Style::default().fg(colors::WHITE).bold()),
        Span::styled(
            format!(" {} ", header.status.to_uppercase()),
            Style::default().fg(colors::BG_DARK).bg(status_color(&header.status_color)),
        ),
        Span::raw("   "),
        Span::styled(
            format!("★ {:.2} ({})", header.star_rating, header.rating_count),
            Style::default().fg(colors::GOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} reports in 24h", format_number(header.total_reports_24h)),
            Style::default().fg(colors::SILVER),
        ),
    ];
    if let Some(pain) = report.pain_index {
        first.push(Span::raw("   "));
        first.push(Span::styled(
            format!("Pain index {:.1}/10", pain),
            Style::default().fg(colors::RED).bold(),
        ));
    }
    let second = Line::from(Span::styled(
        format!("Last updated {}", header.last_updated),
        Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
    ));

    frame.render_widget(
        Paragraph::new(vec![Line::from(first), second]).block(panel("ANALYSIS REPORT")),
        area,
    );
}

fn draw_key_metrics(frame: &mut Frame, area: Rect, metrics: &[KeyMetric]) {
    if metrics.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No key metrics", Style::default().fg(colors::SILVER)))
                .block(panel("KEY METRICS")),
            area,
        );
        return;
    }

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, metrics.len() as u32); metrics.len()])
        .split(area);

    for (metric, card) in metrics.iter().zip(cards.iter()) {
        let (arrow, color) = trend_marker(metric.trend);
        let lines = vec![
            Line::from(Span::styled(metric.value.clone(), Style::default().fg(colors::WHITE).bold())),
            Line::from(Span::styled(
                format!("{} {}", arrow, metric.trend_value),
                Style::default().fg(color),
            )),
        ];
        let title = format!("{} {}", metric.icon, metric.title.to_uppercase());
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(panel(title.trim())),
            *card,
        );
    }
}

fn draw_insights(frame: &mut Frame, area: Rect, report: &AnalysisReport) {
    let mut lines: Vec<Line> = report
        .critical_insights
        .iter()
        .map(|insight| {
            Line::from(vec![
                Span::styled("! ", Style::default().fg(colors::RED).bold()),
                Span::styled(insight.clone(), Style::default().fg(colors::WHITE)),
            ])
        })
        .collect();

    let trend = &report.trend_analysis;
    if !trend.direction.is_empty() || !trend.description.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Trend: ", Style::default().fg(colors::GOLD).bold()),
            Span::styled(trend.direction.clone(), Style::default().fg(colors::WHITE)),
        ]));
        lines.push(Line::from(Span::styled(
            trend.description.clone(),
            Style::default().fg(colors::SILVER),
        )));
        if !trend.chart_insights.is_empty() {
            lines.push(Line::from(Span::styled(
                trend.chart_insights.clone(),
                Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
            )));
        }
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel("CRITICAL INSIGHTS")),
        area,
    );
}

fn draw_sentiment(frame: &mut Frame, area: Rect, report: &AnalysisReport) {
    let sentiment = &report.sentiment;
    let bar_width = (area.width as usize).saturating_sub(20).clamp(4, 30);
    let row = |label: &'static str, pct: f64, color: Color| {
        Line::from(vec![
            Span::styled(format!("{:<9}", label), Style::default().fg(colors::WHITE)),
            Span::styled(bar(pct / 100.0, bar_width), Style::default().fg(color)),
            Span::styled(format!(" {:>3.0}%", pct), Style::default().fg(color).bold()),
        ])
    };

    let mut lines = vec![
        row("Negative", sentiment.negative, colors::RED),
        row("Neutral", sentiment.neutral, colors::SILVER),
        row("Positive", sentiment.positive, colors::SUCCESS),
    ];
    for sample in &sentiment.samples {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", sample.user), Style::default().fg(colors::WHITE).bold()),
            Span::styled(format!("({}) ", sample.tone), Style::default().fg(colors::GOLD)),
            Span::styled(sample.time_ago.clone(), Style::default().fg(colors::SILVER)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("\"{}\"", sample.text),
            Style::default().fg(colors::SILVER),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel("SENTIMENT")),
        area,
    );
}

fn draw_hotspots(frame: &mut Frame, area: Rect, report: &AnalysisReport) {
    let rows: Vec<Row> = report
        .geographic_hotspots
        .iter()
        .map(|h| {
            let severity_color = match h.severity.to_lowercase().as_str() {
                "critical" | "high" => colors::RED,
                "medium" => colors::GOLD,
                _ => colors::SUCCESS,
            };
            Row::new(vec![
                Cell::from(Span::styled(h.city.clone(), Style::default().fg(colors::WHITE))),
                Cell::from(Span::styled(h.severity.to_uppercase(), Style::default().fg(severity_color))),
                Cell::from(Span::styled(format_number(h.reports_count), Style::default().fg(colors::SILVER))),
                Cell::from(Span::styled(h.top_issue.clone(), Style::default().fg(colors::SILVER))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Min(14),
        ],
    )
    .header(Row::new(vec![
        Cell::from(Span::styled("CITY", Style::default().fg(colors::GOLD).bold())),
        Cell::from(Span::styled("SEVERITY", Style::default().fg(colors::GOLD).bold())),
        Cell::from(Span::styled("REPORTS", Style::default().fg(colors::GOLD).bold())),
        Cell::from(Span::styled("TOP ISSUE", Style::default().fg(colors::GOLD).bold())),
    ]))
    .block(panel("GEOGRAPHIC HOTSPOTS"));

    frame.render_widget(table, area);
}

fn draw_recommendations(frame: &mut Frame, area: Rect, recommendations: &[String]) {
    let lines: Vec<Line> = recommendations
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(colors::MAGENTA).bold()),
                Span::styled(r.clone(), Style::default().fg(colors::WHITE)),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel("RECOMMENDATIONS")),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ShellState;
    use crate::ui::tests::{render, view_model};
    use crate::ui::PageView;
    use outagekit::flows::{NavigationState, Route};
    use outagekit::types::{Hotspot, ReportHeader};

    fn render_view(view: ArtifactView<AnalysisReport>) -> String {
        let shell = ShellState::new();
        let vm = view_model(
            &shell,
            Route::Report,
            NavigationState::new(Route::Report),
            PageView::Report(view),
        );
        render(&vm)
    }

    #[test]
    fn missing_report_shows_error() {
        let text = render_view(ArtifactView::Failed("Report not found".to_string()));
        assert!(text.contains("Error loading report"));
        assert!(text.contains("Report not found"));
    }

    #[test]
    fn loaded_report_renders_sections() {
        let report = AnalysisReport {
            header: ReportHeader {
                provider: "T-Mobile".to_string(),
                status: "major outage".to_string(),
                status_color: "red".to_string(),
                star_rating: 2.4,
                rating_count: "1,532 ratings".to_string(),
                total_reports_24h: 8120,
                last_updated: "2025-11-08T10:00:00Z".to_string(),
            },
            key_metrics: vec![KeyMetric {
                title: "Signal Loss".to_string(),
                value: "61%".to_string(),
                icon: String::new(),
                trend: Trend::Up,
                trend_value: "+12% vs yesterday".to_string(),
            }],
            geographic_hotspots: vec![Hotspot {
                city: "Dallas, TX".to_string(),
                severity: "high".to_string(),
                reports_count: 240,
                top_issue: "No Signal".to_string(),
            }],
            pain_index: Some(7.8),
            recommendations: vec!["Publish a status update".to_string()],
            ..Default::default()
        };
        let text = render_view(ArtifactView::Loaded(Box::new(report)));

        assert!(text.contains("MAJOR OUTAGE"));
        assert!(text.contains("8,120 reports in 24h"));
        assert!(text.contains("Pain index 7.8/10"));
        assert!(text.contains("SIGNAL LOSS"));
        assert!(text.contains("▲ +12% vs yesterday"));
        assert!(text.contains("Dallas, TX"));
        assert!(text.contains("1. Publish a status update"));
    }

    #[test]
    fn rising_trend_is_alarming() {
        assert_eq!(trend_marker(Trend::Up).1, colors::RED);
        assert_eq!(trend_marker(Trend::Down).1, colors::SUCCESS);
    }
}
