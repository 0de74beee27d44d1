//! The feed service's `time` format: `YYYY-MM-DDTHH:MM:SS[.ffffff]`.
//!
//! Values carry no offset. They are written and read as UTC wall-clock time.

use std::sync::LazyLock;

use jiff::tz::TimeZone;
use jiff::{Timestamp, civil};
use regex::Regex;

static WIRE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-5][0-9])(\.[0-9]+)?$").unwrap()
});

/// Formats with microsecond precision. Sub-microsecond digits are truncated,
/// trailing zeros are trimmed and a zero fraction is left out entirely.
pub(crate) fn format_time(timestamp: Timestamp) -> String {
    let dt = timestamp.to_zoned(TimeZone::UTC).datetime();
    let mut time = format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second()
    );
    let micros = dt.subsec_nanosecond() / 1_000;
    if micros > 0 {
        let fraction = format!("{micros:06}");
        time.push('.');
        time.push_str(fraction.trim_end_matches('0'));
    }
    time
}

pub(crate) fn parse_time(time: &str) -> Option<Timestamp> {
    let captures = WIRE_TIME.captures(time)?;
    let mut wire = captures[1].to_string();
    // Digits past nanoseconds are accepted and dropped.
    if let Some(fraction) = captures.get(2) {
        let fraction = fraction.as_str();
        wire.push_str(&fraction[..fraction.len().min(10)]);
    }
    let dt: civil::DateTime = wire.parse().ok()?;
    let zoned = dt.to_zoned(TimeZone::UTC).ok()?;
    Some(zoned.timestamp())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use jiff::Timestamp;

    use super::{format_time, parse_time};

    #[test]
    fn format_trims_fraction() -> Result<()> {
        let ts: Timestamp = "2024-05-01T12:00:00.250Z".parse()?;
        assert_eq!(format_time(ts), "2024-05-01T12:00:00.25");
        let ts: Timestamp = "2024-05-01T12:00:00.123456Z".parse()?;
        assert_eq!(format_time(ts), "2024-05-01T12:00:00.123456");
        Ok(())
    }

    #[test]
    fn format_whole_seconds_without_dot() -> Result<()> {
        let ts: Timestamp = "2015-02-10T15:04:55Z".parse()?;
        assert_eq!(format_time(ts), "2015-02-10T15:04:55");
        Ok(())
    }

    #[test]
    fn format_truncates_nanoseconds() -> Result<()> {
        let ts: Timestamp = "2024-05-01T12:00:00.000001999Z".parse()?;
        assert_eq!(format_time(ts), "2024-05-01T12:00:00.000001");
        let ts: Timestamp = "2024-05-01T12:00:00.000000999Z".parse()?;
        assert_eq!(format_time(ts), "2024-05-01T12:00:00");
        Ok(())
    }

    #[test]
    fn parse_wire_time() -> Result<()> {
        let expected: Timestamp = "2024-05-01T12:00:00.25Z".parse()?;
        assert_eq!(parse_time("2024-05-01T12:00:00.25"), Some(expected));
        let expected: Timestamp = "2015-02-10T15:04:55Z".parse()?;
        assert_eq!(parse_time("2015-02-10T15:04:55"), Some(expected));
        Ok(())
    }

    #[test]
    fn reject_other_formats() {
        for time in [
            "not-a-date",
            "",
            "2024-05-01",
            "2024-05-01T12:00:00Z",
            "2024-05-01T12:00:00+02:00",
            "2024-05-01 12:00:00",
            "2024-05-01T12:00:00.",
            "2024-13-01T12:00:00",
            "2016-12-31T23:59:60",
            "2016-12-31T23:59:61.5",
        ] {
            assert_eq!(parse_time(time), None, "{time}");
        }
    }

    #[test]
    fn parse_truncates_long_fractions() -> Result<()> {
        let expected: Timestamp = "2024-05-01T12:00:59.123456789Z".parse()?;
        assert_eq!(parse_time("2024-05-01T12:00:59.1234567891"), Some(expected));
        assert_eq!(parse_time("2024-05-01T12:00:59.123456789999"), Some(expected));
        Ok(())
    }

    #[test]
    fn format_then_parse() -> Result<()> {
        let ts: Timestamp = "2023-12-31T23:59:59.999999Z".parse()?;
        assert_eq!(parse_time(&format_time(ts)), Some(ts));
        Ok(())
    }
}
