//! Formatting utilities used for CLI and export outputs.

use super::colors::{GREEN, GREY, MAGENTA, RESET, YELLOW};
use crate::models::role::Role;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Short textual marker for an entry's submission state.
pub fn lock_marker(final_submit: bool) -> String {
    if final_submit {
        format!("{YELLOW}🔒 submitted{RESET}")
    } else {
        format!("{GREEN}open{RESET}")
    }
}

pub fn describe_role(role: Role) -> String {
    match role {
        Role::Admin => format!("{MAGENTA}admin{RESET}"),
        Role::Employee => "employee".to_string(),
    }
}

pub fn yes_no(v: bool) -> &'static str {
    if v { "yes" } else { "no" }
}

/// Truncate a free-text field for table output.
pub fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

pub fn dim(s: &str) -> String {
    format!("{GREY}{s}{RESET}")
}
