/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Returns GREY for an empty duration ("0:00") and RESET otherwise.
pub fn color_for_minutes(minutes: i64) -> &'static str {
    if minutes == 0 { GREY } else { RESET }
}

/// Day total color against the expected daily hours:
/// below → yellow, reached → green, nothing booked → grey.
pub fn color_for_day_total(minutes: i64, expected_minutes: i64) -> &'static str {
    if minutes == 0 {
        GREY
    } else if minutes < expected_minutes {
        YELLOW
    } else {
        GREEN
    }
}

pub fn colorize_duration(value: &str, minutes: i64) -> String {
    format!("{}{value}{RESET}", color_for_minutes(minutes))
}
