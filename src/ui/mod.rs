// UI formatting helpers

/// Format a count with a pluralized noun, e.g. "1 item" / "3 items".
pub fn format_count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
