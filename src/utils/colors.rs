/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Status color:
/// COMPLETED → green
/// CANCELLED → grey
/// IN_PROGRESS → yellow
/// anything else → reset
pub fn color_for_status(status: &str) -> &'static str {
    match status {
        "COMPLETED" => GREEN,
        "CANCELLED" => GREY,
        "IN_PROGRESS" => YELLOW,
        _ => RESET,
    }
}

/// Greys out placeholders, returns anything else untouched.
///
/// Example:
/// `colorize_optional("-")` → "<grey>-<reset>"
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--:--" || value.trim() == "-" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
