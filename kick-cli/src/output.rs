//! Live status line rendering.
//!
//! Formatting here is cosmetic only; the durable snapshot records carry
//! raw numeric fields.

use chat_stats::{TopUser, WindowStats};
use colored::Colorize;

const VIEWERS_WIDTH: usize = 9;
const RATE_WIDTH: usize = 6;
const TOTAL_WIDTH: usize = 9;
const TOP_WIDTH: usize = 32;

/// Format an optional count with thousands separators; `None` renders as
/// the `n/a` sentinel.
pub fn format_number(value: Option<u64>) -> String {
    match value {
        Some(value) => group_thousands(value),
        None => "n/a".to_string(),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Pad or truncate to a fixed column width.
pub fn pad(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

/// Render the top-chatters column, `n/a` when the window is empty.
pub fn format_top_users(top: &[TopUser]) -> String {
    if top.is_empty() {
        return "n/a".to_string();
    }
    top.iter()
        .map(|user| format!("{}({})", user.username, user.message_count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the `\r`-rewritten status line for one snapshot tick.
pub fn render_status_line(stats: &WindowStats, viewers: Option<u64>) -> String {
    format!(
        "{}={}  {}={}  {}={}  {}={}  {}={}  {}={}  {}={}  {}={}",
        "viewers".cyan(),
        pad(&format_number(viewers), VIEWERS_WIDTH).bright_cyan(),
        "msg/s".yellow(),
        pad(&format!("{:.1}", stats.per_second as f64), RATE_WIDTH).bright_yellow(),
        "msg/min".yellow(),
        pad(&stats.per_minute.to_string(), RATE_WIDTH).bright_yellow(),
        "uniq/s".magenta(),
        pad(&stats.unique_per_second.to_string(), RATE_WIDTH).bright_magenta(),
        "uniq/min".magenta(),
        pad(&stats.unique_per_minute.to_string(), RATE_WIDTH).bright_magenta(),
        "total".green(),
        pad(&stats.total_messages.to_string(), TOTAL_WIDTH).bright_green(),
        "uniq_total".green(),
        pad(&stats.unique_total.to_string(), TOTAL_WIDTH).bright_green(),
        "top".blue(),
        pad(&format_top_users(&stats.top_users), TOP_WIDTH).bright_blue(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_stats() -> WindowStats {
        WindowStats {
            per_minute: 0,
            per_second: 0,
            unique_per_minute: 0,
            unique_per_second: 0,
            total_messages: 0,
            unique_total: 0,
            top_users: Vec::new(),
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(None), "n/a");
        assert_eq!(format_number(Some(0)), "0");
        assert_eq!(format_number(Some(999)), "999");
        assert_eq!(format_number(Some(1000)), "1,000");
        assert_eq!(format_number(Some(1234567)), "1,234,567");
    }

    #[test]
    fn test_pad_truncates_and_fills() {
        assert_eq!(pad("abc", 5), "abc  ");
        assert_eq!(pad("abcdef", 4), "abcd");
        // Multibyte usernames must not split a char boundary.
        assert_eq!(pad("日本語テスト", 3), "日本語");
    }

    #[test]
    fn test_format_top_users_sentinel() {
        assert_eq!(format_top_users(&[]), "n/a");

        let top = vec![
            TopUser {
                username: "A".to_string(),
                message_count: 2,
            },
            TopUser {
                username: "B".to_string(),
                message_count: 1,
            },
        ];
        assert_eq!(format_top_users(&top), "A(2), B(1)");
    }

    #[test]
    fn test_status_line_fields() {
        colored::control::set_override(false);
        let line = render_status_line(&empty_stats(), None);
        assert!(line.contains("viewers=n/a"));
        assert!(line.contains("msg/s=0.0"));
        assert!(line.contains("top=n/a"));
    }
}
