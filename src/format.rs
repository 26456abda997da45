use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Display presets for show start times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `Monday May, 21, 2035 at 9:30PM`
    Full,
    /// `Mon 05, 21, 2035 9:30PM`
    #[default]
    Medium,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
            DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
        }
    }
}

pub fn format_datetime(value: &DateTime<Utc>, format: DateFormat) -> String {
    value.format(format.pattern()).to_string()
}

/// The raw form a start time is handed to pages in.
pub fn display_start_time(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a submitted start time. Values without an offset are taken as UTC.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2035, 5, 21, 21, 30, 0).unwrap()
    }

    #[test]
    fn test_full_format() {
        assert_eq!(
            format_datetime(&sample(), DateFormat::Full),
            "Monday May, 21, 2035 at 9:30PM"
        );
    }

    #[test]
    fn test_medium_format() {
        assert_eq!(
            format_datetime(&sample(), DateFormat::Medium),
            "Mon 05, 21, 2035 9:30PM"
        );
    }

    #[test]
    fn test_display_start_time() {
        assert_eq!(display_start_time(&sample()), "2035-05-21 21:30:00");
    }

    #[test]
    fn test_parse_start_time_accepts_form_formats() {
        for raw in [
            "2035-05-21 21:30:00",
            "2035-05-21 21:30",
            "2035-05-21T21:30",
            "2035-05-21T21:30:00Z",
            "2035-05-21T23:30:00+02:00",
            " 2035-05-21 21:30:00 ",
        ] {
            assert_eq!(parse_start_time(raw), Some(sample()), "{raw}");
        }
    }

    #[test]
    fn test_parse_start_time_rejects_garbage() {
        assert_eq!(parse_start_time(""), None);
        assert_eq!(parse_start_time("next friday"), None);
        assert_eq!(parse_start_time("2035-13-01 10:00:00"), None);
    }
}
