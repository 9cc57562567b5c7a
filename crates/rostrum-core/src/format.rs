//! Display formatting helpers

use chrono::{Datelike, NaiveDateTime};

/// `December 8th 2023`
pub fn format_date(at: &NaiveDateTime) -> String {
    let day = at.day();
    format!("{} {}{} {}", at.format("%B"), day, ordinal_suffix(day), at.year())
}

fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Elapsed seconds as `m:ss`
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Text shown in place of the debaters' arguments while a turn is generated
pub fn thinking_message(elapsed_seconds: u64) -> String {
    format!(
        "Thinking... ({})\n\nThis usually takes about a minute.",
        format_elapsed(elapsed_seconds)
    )
}
