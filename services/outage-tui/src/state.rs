// services/outage-tui/src/state.rs
//
// Activity log and toast state owned by the dashboard shell

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use outagekit::flows::Notice;

const MAX_LOG_ENTRIES: usize = 100;
const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct ShellState {
    pub activity_log: Vec<LogEntry>,
    pub toast: Option<Toast>,
    pub scroll_offset: usize,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_log(&mut self, level: Level, message: &str) {
        self.activity_log.push(LogEntry {
            timestamp: Local::now(),
            level,
            message: message.to_string(),
        });

        if self.activity_log.len() > MAX_LOG_ENTRIES {
            self.activity_log.remove(0);
        }
    }

    /// Show a toast and mirror it into the activity log.
    pub fn notify(&mut self, notice: Notice) {
        let level = if notice.is_error { Level::Error } else { Level::Info };
        self.add_log(level, &format!("{}: {}", notice.title, notice.description));
        self.toast = Some(Toast {
            notice,
            shown_at: Instant::now(),
        });
    }

    pub fn active_toast(&self) -> Option<&Notice> {
        self.toast
            .as_ref()
            .filter(|t| t.shown_at.elapsed() < TOAST_TTL)
            .map(|t| &t.notice)
    }

    pub fn expire_toast(&mut self) {
        if self.active_toast().is_none() {
            self.toast = None;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset += 1;
    }

    pub fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded() {
        let mut state = ShellState::new();
        for i in 0..150 {
            state.add_log(Level::Info, &format!("entry {}", i));
        }
        assert_eq!(state.activity_log.len(), 100);
        assert_eq!(state.activity_log[0].message, "entry 50");
    }

    #[test]
    fn error_notice_is_logged_as_error() {
        let mut state = ShellState::new();
        state.notify(Notice::error("Failed to compare metrics"));

        assert_eq!(state.activity_log.last().map(|e| e.level), Some(Level::Error));
        assert_eq!(state.active_toast().map(|n| n.title.as_str()), Some("Error"));
    }

    #[test]
    fn scroll_stops_at_top() {
        let mut state = ShellState::new();
        state.scroll_up();
        assert_eq!(state.scroll_offset, 0);
        state.scroll_down();
        state.scroll_down();
        state.scroll_up();
        assert_eq!(state.scroll_offset, 1);
    }
}
