use crate::models::QuizResult;
use chrono::{DateTime, Local, NaiveDateTime};
use unicode_width::UnicodeWidthChar;

/// Truncate to at most `max_width` display columns, appending "..." when cut.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("...");
    out
}

/// Whole seconds as `MM:SS`. Minutes are not wrapped at the hour.
pub fn format_time_ms(value: u64) -> String {
    let total_seconds = value / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

pub fn format_score(entry: &QuizResult) -> String {
    format!("{}/{}", entry.correct, entry.total)
}

const DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Local date and time for an RFC 3339 timestamp. Timestamps without an
/// offset are shown as given; anything unparseable is returned unchanged.
pub fn format_created_at(created_at: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(created_at) {
        return parsed.with_timezone(&Local).format(DISPLAY_FORMAT).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(created_at, fmt).ok())
        .map(|naive| naive.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| created_at.to_string())
}

pub fn percent(current: usize, total: usize) -> u16 {
    if total == 0 {
        return 0;
    }
    ((current as f64 / total as f64) * 100.0).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    #[test]
    fn test_truncate_string_no_truncation() {
        assert_eq!(truncate_string("Short string", 20), "Short string");
    }

    #[test]
    fn test_truncate_string_with_truncation() {
        let result = truncate_string("This is a very long string that should be truncated", 20);
        assert_eq!(result, "This is a very lo...");
        assert!(result.len() <= 20);
    }

    #[test]
    fn test_truncate_string_multibyte() {
        let result = truncate_string("Löwith über Geschichte und Heilsgeschehen", 12);
        assert_eq!(result, "Löwith üb...");
    }

    #[test]
    fn test_truncate_string_empty() {
        assert_eq!(truncate_string("", 20), "");
    }

    #[test]
    fn test_format_time_ms() {
        assert_eq!(format_time_ms(0), "00:00");
        assert_eq!(format_time_ms(999), "00:00");
        assert_eq!(format_time_ms(65_000), "01:05");
        assert_eq!(format_time_ms(125_000), "02:05");
        assert_eq!(format_time_ms(3_600_000), "60:00");
    }

    #[test]
    fn test_format_score() {
        let entry = fixtures::result("r1", "Anna", 4, 5, 125_000, 1);
        assert_eq!(format_score(&entry), "4/5");
    }

    #[test]
    fn test_format_created_at_has_date_and_time() {
        let entry = fixtures::result("r1", "Anna", 4, 5, 125_000, 1);
        let formatted = format_created_at(&entry.created_at);
        assert_eq!(formatted.len(), "01.03.2025 10:15".len());
        assert!(formatted.contains(".2025"));
    }

    #[test]
    fn test_format_created_at_without_offset() {
        assert_eq!(format_created_at("2025-03-01T10:15:00"), "01.03.2025 10:15");
        assert_eq!(format_created_at("2025-03-01 10:15:42.5"), "01.03.2025 10:15");
    }

    #[test]
    fn test_format_created_at_passes_unknown_text_through() {
        assert_eq!(format_created_at("gestern"), "gestern");
        assert_eq!(format_created_at(""), "");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(1, 0), 0);
    }
}
