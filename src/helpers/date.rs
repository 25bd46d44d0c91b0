//! Date helper functions

use chrono::{Datelike, Local, NaiveDate};

/// Current calendar year in local time
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Format an item date for display.
///
/// `YYYY-MM-DD` and `YYYY-MM` become `Mon YYYY`; anything else is
/// returned trimmed, as given.
pub fn display_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
        return date.format("%b %Y").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-03-15"), "Mar 2024");
        assert_eq!(display_date("2023-11"), "Nov 2023");
        assert_eq!(display_date(" Spring 2022 "), "Spring 2022");
    }

    #[test]
    fn test_current_year() {
        assert!(current_year() >= 2024);
    }
}
