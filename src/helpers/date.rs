//! Date helper functions

use chrono::NaiveDateTime;

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMMM DD, YYYY") // -> "February 06, 2021"
/// ```
pub fn format_date(date: &NaiveDateTime, format: &str) -> String {
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a date in RFC 3339 form for feeds; dates carry no zone and are
/// published as UTC
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.and_utc().to_rfc3339()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each family
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("M", "%-m"),
        // Day of month
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("D", "%-d"),
        // Hour
        ("HH", "%H"),
        ("hh", "%I"),
        // Minute (after every M is gone)
        ("mm", "%M"),
        ("ss", "%S"),
        // Day of week
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_display_pattern() {
        assert_eq!(
            format_date(&date(2021, 2, 6), "MMMM DD, YYYY"),
            "February 06, 2021"
        );
        assert_eq!(
            format_date(&date(2020, 12, 25), "MMMM DD, YYYY"),
            "December 25, 2020"
        );
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&date(2024, 1, 15), "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_date(&date(2024, 1, 15), "YYYY/MM/DD HH:mm"), "2024/01/15 10:30");
    }

    #[test]
    fn test_unpadded_tokens() {
        assert_eq!(
            format_date(&date(2021, 2, 6), "MMMM D, YYYY"),
            "February 6, 2021"
        );
        assert_eq!(format_date(&date(2021, 2, 6), "M/D/YYYY HH:mm"), "2/6/2021 10:30");
        assert_eq!(format_date(&date(2021, 12, 25), "D MMM"), "25 Dec");
    }

    #[test]
    fn test_date_xml() {
        assert_eq!(date_xml(&date(2021, 2, 6)), "2021-02-06T10:30:00+00:00");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("MMMM DD, YYYY"), "%B %d, %Y");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("M/D/YYYY"), "%-m/%-d/%Y");
    }
}
