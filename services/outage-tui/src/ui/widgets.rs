// services/outage-tui/src/ui/widgets.rs
//
// Formatting helpers and the panel/card building blocks shared by every page

use chrono::{DateTime, Utc};
use outagekit::flows::dashboard::NOT_AVAILABLE;
use outagekit::types::StarRatingData;
use ratatui::{prelude::*, widgets::*};

use super::colors;

/// Rounded panel in the dashboard palette.
pub fn panel(title: &str) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(colors::WHITE).bold(),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::SILVER))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL))
}

/// `"t-mobile"` -> `"T-Mobile"`.
pub fn display_name(provider: &str) -> String {
    provider
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Thousands separated with commas.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Coarse relative time: minutes under an hour, hours under a day, then days.
/// Unparsable timestamps are shown as-is.
pub fn format_time_ago(iso: &str, now: DateTime<Utc>) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(iso) else {
        return iso.to_string();
    };
    let minutes = (now - then.with_timezone(&Utc)).num_minutes().max(0);
    if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

/// Rating value and count line for the user-rating card.
pub fn star_rating_display(rating: Option<&StarRatingData>) -> (String, String) {
    let value = rating
        .and_then(|r| r.current.as_ref())
        .map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.display());
    let count = rating
        .and_then(|r| r.count.clone())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "No ratings".to_string());
    (value, count)
}

/// Share of the busiest location, in `0.0..=1.0`.
pub fn heat_ratio(reports: u64, max: u64) -> f64 {
    if max == 0 {
        0.0
    } else {
        (reports as f64 / max as f64).clamp(0.0, 1.0)
    }
}

pub fn heat_color(ratio: f64) -> Color {
    if ratio >= 0.66 {
        colors::RED
    } else if ratio >= 0.33 {
        colors::GOLD
    } else {
        colors::SUCCESS
    }
}

/// Horizontal bar of `width` cells filled to `ratio`.
pub fn bar(ratio: f64, width: usize) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn draw_card(frame: &mut Frame, area: Rect, title: &str, value: &str, subtitle: Option<&str>, accent: Color) {
    let mut lines = vec![Line::from(Span::styled(
        value.to_string(),
        Style::default().fg(accent).bold(),
    ))];
    if let Some(subtitle) = subtitle {
        lines.push(Line::from(Span::styled(
            subtitle.to_string(),
            Style::default().fg(colors::SILVER),
        )));
    }

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(panel(title));
    frame.render_widget(card, area);
}

/// Centered message used for loading and error states.
pub fn draw_status(frame: &mut Frame, area: Rect, title: &str, lines: &[String], accent: Color) {
    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled(title.to_string(), Style::default().fg(accent).bold())),
    ];
    text.extend(
        lines
            .iter()
            .map(|l| Line::from(Span::styled(l.clone(), Style::default().fg(colors::SILVER)))),
    );

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel(""));
    frame.render_widget(paragraph, area);
}
