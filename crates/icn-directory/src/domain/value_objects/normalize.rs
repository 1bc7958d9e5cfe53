//! Field normalization
//!
//! The dataset marks missing values with a handful of spreadsheet sentinels.
//! They are recognized here and nowhere else; past this point a missing value
//! is an `Option::None`.

use chrono::NaiveDate;

const INVALID_SENTINELS: &[&str] = &["", "n/a", "#n/a", "0", "null", "undefined"];

/// True for values the dataset uses to mean "no value"
pub fn is_invalid_sentinel(raw: &str) -> bool {
    let trimmed = raw.trim();
    INVALID_SENTINELS
        .iter()
        .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

/// Trimmed value, or `None` if it is a sentinel
pub fn clean_field(raw: &str) -> Option<String> {
    if is_invalid_sentinel(raw) {
        None
    } else {
        Some(raw.trim().to_string())
    }
}

/// Parse a `DD/MM/YYYY` validation date. Unpadded day and month are accepted;
/// anything else, including impossible calendar dates, yields `None`.
pub fn parse_validation_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = clean_field(raw)?;
    let mut parts = cleaned.split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    if !(1..=2).contains(&day.len()) || !(1..=2).contains(&month.len()) || year.len() != 4 {
        return None;
    }

    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `DD/MM/YYYY` → `YYYY-MM-DD`
pub fn convert_date(raw: &str) -> Option<String> {
    parse_validation_date(raw).map(|date| date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        for raw in ["", "  ", "N/A", "#N/A", "n/a", "0", "NULL", "null", "UNDEFINED", " Undefined "] {
            assert!(is_invalid_sentinel(raw), "{raw:?} should be a sentinel");
            assert_eq!(clean_field(raw), None);
        }
        assert_eq!(clean_field("  Acme Pty Ltd "), Some("Acme Pty Ltd".to_string()));
        assert_eq!(clean_field("00"), Some("00".to_string()));
    }

    #[test]
    fn test_convert_date() {
        assert_eq!(convert_date("15/06/2024"), Some("2024-06-15".to_string()));
        assert_eq!(convert_date("5/6/2024"), Some("2024-06-05".to_string()));
        assert_eq!(convert_date("#N/A"), None);
        assert_eq!(convert_date("2024-06-15"), None);
        assert_eq!(convert_date("31/02/2024"), None);
        assert_eq!(convert_date("15/06/24"), None);
        assert_eq!(convert_date("15/06/2024/1"), None);
    }
}
