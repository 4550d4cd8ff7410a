// services/outage-tui/src/ui/dashboard.rs
//
// Landing page: metric cards, latest reports, problem breakdown, affected
// locations, user reports and company posts

use chrono::Utc;
use outagekit::flows::{DashboardSnapshot, DashboardView, LoadPhase};
use outagekit::types::ScrapedOutageDataset;
use ratatui::{prelude::*, widgets::*};

use super::colors;
use super::widgets::{
    bar, draw_card, draw_status, format_number, format_time_ago, heat_color, heat_ratio, panel,
    star_rating_display,
};

pub fn draw(frame: &mut Frame, area: Rect, view: &DashboardView, provider: &str) {
    match view {
        DashboardView::Idle | DashboardView::Loading(LoadPhase::Clearing) => draw_status(
            frame,
            area,
            &format!("Loading {} data...", provider),
            &[],
            colors::GOLD,
        ),
        DashboardView::Loading(LoadPhase::Scraping) => draw_status(
            frame,
            area,
            &format!("Scraping {} data...", provider),
            &["This may take a few moments...".to_string()],
            colors::GOLD,
        ),
        DashboardView::Failed(message) => draw_status(
            frame,
            area,
            "Error loading data",
            &[message.clone()],
            colors::RED,
        ),
        DashboardView::Ready(snapshot) => draw_ready(frame, area, snapshot),
    }
}

fn draw_ready(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Cards
            Constraint::Min(6),    // Reports, problems, locations
            Constraint::Length(8), // Chart, user reports, posts
        ])
        .split(area);

    draw_cards(frame, rows[0], snapshot);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(36),
            Constraint::Percentage(30),
            Constraint::Percentage(34),
        ])
        .split(rows[1]);
    draw_latest_reports(frame, middle[0], &snapshot.dataset);
    draw_problems(frame, middle[1], &snapshot.dataset);
    draw_locations(frame, middle[2], &snapshot.dataset);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(26),
            Constraint::Percentage(40),
            Constraint::Percentage(34),
        ])
        .split(rows[2]);
    draw_chart(frame, bottom[0], &snapshot.dataset);
    draw_issue_reports(frame, bottom[1], &snapshot.dataset);
    draw_company_posts(frame, bottom[2], &snapshot.dataset);
}

fn draw_cards(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let metrics = &snapshot.metrics;
    draw_card(
        frame,
        cards[0],
        "ACTIVE REPORTS",
        &format_number(metrics.active_reports as u64),
        None,
        colors::RED,
    );
    draw_card(
        frame,
        cards[1],
        "AFFECTED CITIES",
        &format_number(metrics.affected_cities as u64),
        None,
        colors::GOLD,
    );
    draw_card(
        frame,
        cards[2],
        "TOP ISSUE",
        metrics.top_issue_label(),
        metrics.top_issue_share().as_deref(),
        colors::MAGENTA,
    );

    let (rating, count) = star_rating_display(snapshot.dataset.star_rating.as_ref());
    draw_card(
        frame,
        cards[3],
        "USER RATING",
        &format!("★ {}", rating),
        Some(&count),
        colors::GOLD,
    );
}

fn draw_latest_reports(frame: &mut Frame, area: Rect, dataset: &ScrapedOutageDataset) {
    let reports = dataset.latest_reports.as_deref().unwrap_or_default();
    let items: Vec<ListItem> = reports
        .iter()
        .map(|r| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<16}", r.time_human), Style::default().fg(colors::SILVER)),
                Span::styled(format!("{:<14}", r.city), Style::default().fg(colors::WHITE).bold()),
                Span::styled(r.reason.clone(), Style::default().fg(colors::GOLD)),
            ]))
        })
        .collect();

    let title = format!("LATEST REPORTS ({})", reports.len());
    if items.is_empty() {
        frame.render_widget(empty(&title, "No recent reports"), area);
    } else {
        frame.render_widget(List::new(items).block(panel(&title)), area);
    }
}

fn draw_problems(frame: &mut Frame, area: Rect, dataset: &ScrapedOutageDataset) {
    let problems = dataset.most_reported_problems.as_deref().unwrap_or_default();
    if problems.is_empty() {
        frame.render_widget(empty("MOST REPORTED PROBLEMS", "No problem breakdown"), area);
        return;
    }

    let bar_width = (area.width as usize).saturating_sub(26).clamp(4, 30);
    let lines: Vec<Line> = problems
        .iter()
        .enumerate()
        .flat_map(|(i, p)| {
            let color = if i == 0 { colors::RED } else { colors::MAGENTA };
            [
                Line::from(vec![
                    Span::styled(format!("{:<18}", p.label), Style::default().fg(colors::WHITE)),
                    Span::styled(format!("{:>3}%", p.percent), Style::default().fg(color).bold()),
                ]),
                Line::from(Span::styled(bar(p.percent / 100.0, bar_width), Style::default().fg(color))),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(panel("MOST REPORTED PROBLEMS")), area);
}

fn draw_locations(frame: &mut Frame, area: Rect, dataset: &ScrapedOutageDataset) {
    let mut locations = dataset.last_15_days_status.clone().unwrap_or_default();
    if locations.is_empty() {
        frame.render_widget(empty("AFFECTED LOCATIONS", "No locations reporting"), area);
        return;
    }
    locations.sort_by(|a, b| b.reports.cmp(&a.reports));
    let max = locations.first().map_or(0, |l| l.reports);

    let rows: Vec<Row> = locations
        .iter()
        .map(|l| {
            let ratio = heat_ratio(l.reports, max);
            Row::new(vec![
                Cell::from(Span::styled(l.location.clone(), Style::default().fg(colors::WHITE))),
                Cell::from(Span::styled(format_number(l.reports), Style::default().fg(colors::SILVER))),
                Cell::from(Span::styled(bar(ratio, 10), Style::default().fg(heat_color(ratio)))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Min(16), Constraint::Length(8), Constraint::Length(10)],
    )
    .header(Row::new(vec![
        Cell::from(Span::styled("LOCATION", Style::default().fg(colors::GOLD).bold())),
        Cell::from(Span::styled("REPORTS", Style::default().fg(colors::GOLD).bold())),
        Cell::from(Span::styled("HEAT", Style::default().fg(colors::GOLD).bold())),
    ]))
    .block(panel(&format!("AFFECTED LOCATIONS ({} cities)", locations.len())));

    frame.render_widget(table, area);
}

fn draw_chart(frame: &mut Frame, area: Rect, dataset: &ScrapedOutageDataset) {
    let chart = dataset.chart.as_ref().filter(|c| c.image_src.is_some());
    let lines = match chart {
        Some(chart) => vec![
            Line::from(Span::styled("Report volume snapshot", Style::default().fg(colors::WHITE))),
            Line::from(Span::styled(
                chart.alt_time.clone().unwrap_or_default(),
                Style::default().fg(colors::SILVER),
            )),
            Line::from(Span::styled(
                chart.image_src.clone().unwrap_or_default(),
                Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "Chart data not available",
            Style::default().fg(colors::SILVER),
        ))],
    };

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel("OUTAGE CHART")),
        area,
    );
}

fn draw_issue_reports(frame: &mut Frame, area: Rect, dataset: &ScrapedOutageDataset) {
    let reports = dataset.issues_reports.as_deref().unwrap_or_default();
    if reports.is_empty() {
        frame.render_widget(empty("USER REPORTS", "No user reports"), area);
        return;
    }

    let now = Utc::now();
    let lines: Vec<Line> = reports
        .iter()
        .map(|r| {
            let mut spans = vec![
                Span::styled(format!("{} ", r.user), Style::default().fg(colors::WHITE).bold()),
                Span::styled(
                    format!("{} ", format_time_ago(&r.time_iso, now)),
                    Style::default().fg(colors::SILVER),
                ),
            ];
            if let Some(location) = &r.location {
                spans.push(Span::styled(format!("@ {} ", location), Style::default().fg(colors::GOLD)));
            }
            spans.push(Span::styled(r.text.clone(), Style::default().fg(colors::SILVER)));
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(panel("USER REPORTS")), area);
}

fn draw_company_posts(frame: &mut Frame, area: Rect, dataset: &ScrapedOutageDataset) {
    let posts = dataset.company_posts.as_deref().unwrap_or_default();
    if posts.is_empty() {
        frame.render_widget(empty("COMPANY POSTS", "No company posts"), area);
        return;
    }

    let lines: Vec<Line> = posts
        .iter()
        .flat_map(|p| {
            [
                Line::from(vec![
                    Span::styled(format!("{} ", p.name), Style::default().fg(colors::MAGENTA).bold()),
                    Span::styled(p.reply_context.clone(), Style::default().fg(colors::SILVER)),
                ]),
                Line::from(Span::styled(p.text.clone(), Style::default().fg(colors::WHITE))),
            ]
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel("COMPANY POSTS")),
        area,
    );
}

fn empty<'a>(title: &'a str, message: &'a str) -> Paragraph<'a> {
    Paragraph::new(Span::styled(message, Style::default().fg(colors::SILVER))).block(panel(title))
}
