// services/outage-tui/src/ui/header.rs
//
// Title bar: navigation links gated on artifact existence and the primary
// action button

use outagekit::flows::{NavigationState, Route};
use ratatui::{prelude::*, widgets::*};

use super::{colors, ViewModel};

pub fn route_label(route: Route, provider: &str) -> String {
    match route {
        Route::Dashboard => "Dashboard".to_string(),
        Route::Report => format!("{} Report", provider),
        Route::Comparison => "Comparison".to_string(),
    }
}

/// Key that jumps to `route`.
pub fn route_key(route: Route) -> char {
    match route {
        Route::Dashboard => '1',
        Route::Report => '2',
        Route::Comparison => '3',
    }
}

pub fn draw_header(frame: &mut Frame, area: Rect, vm: &ViewModel) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(colors::DARK_MAGENTA))
        .style(Style::default().bg(colors::BG_DARK));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let button = button_text(&vm.nav);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),
            Constraint::Length(button.chars().count() as u16 + 2),
            Constraint::Length(vm.source.chars().count() as u16 + 4),
        ])
        .split(inner);

    let mut spans = vec![
        Span::styled(" ◆ ", Style::default().fg(colors::MAGENTA).bold()),
        Span::styled(
            format!("{} OUTAGE MONITOR", vm.provider.to_uppercase()),
            Style::default().fg(colors::WHITE).bold(),
        ),
        Span::raw("   "),
    ];
    for route in vm.nav.visible_links() {
        let style = if route == vm.route {
            Style::default().fg(colors::BG_DARK).bg(colors::MAGENTA).bold()
        } else {
            Style::default().fg(colors::SILVER)
        };
        spans.push(Span::styled(
            format!(" [{}] {} ", route_key(route), route_label(route, &vm.provider)),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let button_style = if vm.nav.action_enabled() {
        Style::default().fg(colors::BG_DARK).bg(colors::MAGENTA).bold()
    } else {
        Style::default().fg(colors::SILVER).bg(colors::BG_PANEL).add_modifier(Modifier::DIM)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(button, button_style)).alignment(Alignment::Center),
        chunks[1],
    );

    let source_color = if vm.source == "DEMO" { colors::GOLD } else { colors::SUCCESS };
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("● {}", vm.source),
            Style::default().fg(source_color),
        ))
        .alignment(Alignment::Right),
        chunks[2],
    );
}

fn button_text(nav: &NavigationState) -> String {
    format!(" {} ", nav.button_label())
}
