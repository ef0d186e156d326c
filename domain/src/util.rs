//! Shared utility functions.

/// Shorten `s` to at most `max_bytes` for log output, without splitting a
/// UTF-8 character. Appends `...` when something was cut.
pub fn preview(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
