/// ANSI color helper utilities for terminal output.
use crate::models::health::FeedHealth;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Wrap `value` in `color` .. RESET, or return it untouched when colours
/// are disabled.
pub fn paint(color: &str, value: &str, enabled: bool) -> String {
    if enabled && !value.is_empty() {
        format!("{color}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// Health colour:
/// on time → green
/// too soon → yellow
/// overdue → red
pub fn color_for_health(health: FeedHealth) -> &'static str {
    match health {
        FeedHealth::Ideal => GREEN,
        FeedHealth::TooSoon => YELLOW,
        FeedHealth::TooLate => RED,
        FeedHealth::None => RESET,
    }
}
