// services/outage-tui/src/ui/mod.rs
//
// Frame layout: header, active page, activity log, footer, toast overlay.
// Rendering reads a `ViewModel` snapshot only, never the controllers.

pub mod comparison;
pub mod dashboard;
pub mod header;
pub mod report;
pub mod widgets;

use outagekit::flows::{ArtifactView, DashboardView, NavigationState, Notice, Route};
use outagekit::types::{AnalysisReport, ComparisonReport};
use ratatui::{prelude::*, widgets::*};

use crate::state::{Level, ShellState};

// Palette: magenta accent on the dark panels
pub mod colors {
    use ratatui::style::Color;

    pub const MAGENTA: Color = Color::Rgb(226, 0, 116);
    pub const DARK_MAGENTA: Color = Color::Rgb(134, 0, 70);
    pub const WHITE: Color = Color::Rgb(253, 246, 227);
    pub const SILVER: Color = Color::Rgb(147, 161, 161);
    pub const GOLD: Color = Color::Rgb(255, 193, 37);
    pub const RED: Color = Color::Rgb(220, 50, 47);
    pub const SUCCESS: Color = Color::Rgb(133, 153, 0);
    pub const BG_DARK: Color = Color::Rgb(0, 20, 30);
    pub const BG_PANEL: Color = Color::Rgb(7, 30, 41);
}

/// What the active route shows.
#[derive(Debug, Clone)]
pub enum PageView {
    Dashboard(DashboardView),
    Report(ArtifactView<AnalysisReport>),
    Comparison(ArtifactView<ComparisonReport>),
}

pub struct ViewModel<'a> {
    pub route: Route,
    pub nav: NavigationState,
    pub page: PageView,
    pub shell: &'a ShellState,
    /// Tracked provider, display form (`"T-Mobile"`).
    pub provider: String,
    /// `"DEMO"` or the backend URL.
    pub source: &'a str,
}

pub fn draw(frame: &mut Frame, vm: &ViewModel) {
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(colors::BG_DARK)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Page
            Constraint::Length(7), // Activity
            Constraint::Length(3), // Footer
        ])
        .split(area);

    header::draw_header(frame, chunks[0], vm);
    match &vm.page {
        PageView::Dashboard(view) => dashboard::draw(frame, chunks[1], view, &vm.provider),
        PageView::Report(view) => report::draw(frame, chunks[1], view),
        PageView::Comparison(view) => comparison::draw(frame, chunks[1], view, &vm.provider),
    }
    draw_activity(frame, chunks[2], vm.shell);
    draw_footer(frame, chunks[3], &vm.nav);

    if let Some(notice) = vm.shell.active_toast() {
        draw_toast(frame, area, notice);
    }
}

fn draw_activity(frame: &mut Frame, area: Rect, shell: &ShellState) {
    let visible = area.height.saturating_sub(2) as usize;
    let logs: Vec<Line> = shell
        .activity_log
        .iter()
        .rev()
        .skip(shell.scroll_offset)
        .take(visible)
        .map(|entry| {
            let (prefix, color) = match entry.level {
                Level::Error => ("[ERR]", colors::RED),
                Level::Warn => ("[WRN]", colors::GOLD),
                Level::Info => ("[INF]", colors::SUCCESS),
            };

            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
                ),
                Span::styled(format!("{} ", prefix), Style::default().fg(color)),
                Span::styled(entry.message.clone(), Style::default().fg(colors::WHITE)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(logs).block(widgets::panel("ACTIVITY LOG")), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, nav: &NavigationState) {
    let key = |k: &'static str, bg: Color| Span::styled(k, Style::default().fg(colors::BG_DARK).bg(bg));
    let label = |l: &'static str| Span::styled(l, Style::default().fg(colors::SILVER));

    let mut help = vec![
        key(" [Q] ", colors::RED),
        label(" Quit "),
        Span::raw("  "),
        key(" [1-3] ", colors::WHITE),
        label(" Navigate "),
        Span::raw("  "),
    ];
    if nav.action_enabled() {
        help.push(key(" [G] ", colors::MAGENTA));
        help.push(label(" Primary action "));
        help.push(Span::raw("  "));
    }
    help.extend([
        key(" [R] ", colors::GOLD),
        label(" Reload "),
        Span::raw("  "),
        key(" [UP/DOWN] ", colors::SILVER),
        label(" Scroll log "),
    ]);

    let footer = Paragraph::new(Line::from(help))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(colors::DARK_MAGENTA))
                .style(Style::default().bg(colors::BG_DARK)),
        );

    frame.render_widget(footer, area);
}

fn draw_toast(frame: &mut Frame, area: Rect, notice: &Notice) {
    let width = 48.min(area.width);
    let rect = Rect {
        x: area.x + area.width - width,
        y: area.y + 3.min(area.height),
        width,
        height: 5.min(area.height.saturating_sub(3)),
    };
    let accent = if notice.is_error { colors::RED } else { colors::SUCCESS };

    let toast = Paragraph::new(notice.description.clone())
        .style(Style::default().fg(colors::WHITE))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {} ", notice.title),
                    Style::default().fg(accent).bold(),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(accent))
                .style(Style::default().bg(colors::BG_DARK)),
        );

    frame.render_widget(Clear, rect);
    frame.render_widget(toast, rect);
}
