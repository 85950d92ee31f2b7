//! Small value grammars shared by the manifest formats.
//!
//! All functions are total: malformed input yields `None` and the caller
//! decides which diagnostic to emit.

use chrono::{DateTime, NaiveDateTime, Utc};
use winnow::ascii::{digit1, float};
use winnow::combinator::{opt, preceded, separated_pair, terminated};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::one_of;

/// An inclusive byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Range of `length` bytes starting at `start`.
    ///
    /// `None` for an empty range or one that runs past `u64::MAX`.
    pub fn from_length(start: u64, length: u64) -> Option<Self> {
        let end = start.checked_add(length.checked_sub(1)?)?;
        Some(Self { start, end })
    }

    /// Range of `length` bytes starting right after this one.
    pub fn followed_by(&self, length: u64) -> Option<Self> {
        Self::from_length(self.end.checked_add(1)?, length)
    }
}

/// A `WIDTHxHEIGHT` resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

fn number(input: &mut &str) -> PResult<u64> {
    digit1.parse_to().parse_next(input)
}

fn length_and_offset(input: &mut &str) -> PResult<(u64, Option<u64>)> {
    (number, opt(preceded('@', number))).parse_next(input)
}

/// Parse an HLS `length[@offset]` byte range. A zero length is rejected.
pub fn parse_byte_range(value: &str) -> Option<(u64, Option<u64>)> {
    length_and_offset
        .parse(value.trim())
        .ok()
        .filter(|(length, _)| *length > 0)
}

/// Parse a DASH `first-last` byte range.
pub fn parse_dash_range(value: &str) -> Option<ByteRange> {
    let (start, end) = separated_pair(number, '-', number)
        .parse(value.trim())
        .ok()?;
    (end >= start).then_some(ByteRange { start, end })
}

/// Parse a `WIDTHxHEIGHT` resolution.
pub fn parse_resolution(value: &str) -> Option<Resolution> {
    let (width, height) = separated_pair(number, one_of(['x', 'X']), number)
        .parse(value.trim())
        .ok()?;
    Some(Resolution {
        width: u32::try_from(width).ok()?,
        height: u32::try_from(height).ok()?,
    })
}

fn component<'i>(unit: char) -> impl Parser<&'i str, f64, ContextError> {
    terminated(float, unit)
}

type DatePart = (Option<f64>, Option<f64>, Option<f64>, Option<f64>);
type TimePart = (Option<f64>, Option<f64>, Option<f64>);

fn date_part(input: &mut &str) -> PResult<DatePart> {
    (
        opt(component('Y')),
        opt(component('M')),
        opt(component('W')),
        opt(component('D')),
    )
        .parse_next(input)
}

fn time_part(input: &mut &str) -> PResult<TimePart> {
    (
        opt(component('H')),
        opt(component('M')),
        opt(component('S')),
    )
        .parse_next(input)
}

fn iso_duration(input: &mut &str) -> PResult<f64> {
    const DAY: f64 = 86_400.0;
    preceded('P', (date_part, opt(preceded('T', time_part))))
        .map(|((years, months, weeks, days), time)| {
            let (hours, minutes, seconds) = time.unwrap_or_default();
            years.unwrap_or(0.0) * 365.0 * DAY
                + months.unwrap_or(0.0) * 30.0 * DAY
                + weeks.unwrap_or(0.0) * 7.0 * DAY
                + days.unwrap_or(0.0) * DAY
                + hours.unwrap_or(0.0) * 3_600.0
                + minutes.unwrap_or(0.0) * 60.0
                + seconds.unwrap_or(0.0)
        })
        .parse_next(input)
}

/// Parse an ISO 8601 duration (`PT1H2M3.5S`) into seconds.
///
/// Years count as 365 days and months as 30 days.
pub fn parse_iso8601_duration(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.len() <= 1 {
        return None;
    }
    iso_duration.parse(value).ok()
}

/// Parse an ISO 8601 / RFC 3339 date-time.
///
/// A value without an offset is taken as UTC.
pub fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse a date-time into milliseconds since the Unix epoch.
pub fn date_time_millis(value: &str) -> Option<f64> {
    parse_date_time(value).map(|dt| dt.timestamp_micros() as f64 / 1_000.0)
}

/// Parse an enumerated `YES`/`NO` attribute.
pub fn parse_yes_no(value: &str) -> Option<bool> {
    match value {
        "YES" => Some(true),
        "NO" => Some(false),
        _ => None,
    }
}

/// Split a separated list, dropping empty items.
pub fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_range() {
        assert_eq!(parse_byte_range("10"), Some((10, None)));
        assert_eq!(parse_byte_range("75232@0"), Some((75232, Some(0))));
        assert_eq!(parse_byte_range("10@"), None);
        assert_eq!(parse_byte_range("abc"), None);
        assert_eq!(parse_byte_range(""), None);
        assert_eq!(parse_byte_range("0@10"), None);
    }

    #[test]
    fn test_byte_range_bounds() {
        let range = ByteRange::from_length(10, 10).unwrap();
        assert_eq!(range, ByteRange { start: 10, end: 19 });
        assert_eq!(range.followed_by(5), Some(ByteRange { start: 20, end: 24 }));

        assert_eq!(ByteRange::from_length(10, 0), None);
        assert_eq!(ByteRange::from_length(10, u64::MAX), None);
        assert_eq!(ByteRange::from_length(0, u64::MAX), Some(ByteRange { start: 0, end: u64::MAX - 1 }));
        let last = ByteRange { start: 0, end: u64::MAX };
        assert_eq!(last.followed_by(1), None);
    }

    #[test]
    fn test_dash_range() {
        assert_eq!(
            parse_dash_range("0-862"),
            Some(ByteRange { start: 0, end: 862 })
        );
        assert_eq!(parse_dash_range("10-5"), None);
        assert_eq!(parse_dash_range("10"), None);
    }

    #[test]
    fn test_resolution() {
        assert_eq!(
            parse_resolution("1920x1080"),
            Some(Resolution {
                width: 1920,
                height: 1080
            })
        );
        assert_eq!(parse_resolution("1920"), None);
        assert_eq!(parse_resolution("x1080"), None);
    }

    #[test]
    fn test_iso8601_duration() {
        assert_eq!(parse_iso8601_duration("PT10S"), Some(10.0));
        assert_eq!(parse_iso8601_duration("PT1H2M3.5S"), Some(3723.5));
        assert_eq!(parse_iso8601_duration("PT0H10M54.00S"), Some(654.0));
        assert_eq!(parse_iso8601_duration("P1DT1S"), Some(86_401.0));
        assert_eq!(parse_iso8601_duration("P1M"), Some(30.0 * 86_400.0));
        assert_eq!(parse_iso8601_duration("P"), None);
        assert_eq!(parse_iso8601_duration("10S"), None);
        assert_eq!(parse_iso8601_duration("PT10X"), None);
    }

    #[test]
    fn test_date_time_formats() {
        let expected = 1_577_836_800_000.0;
        assert_eq!(date_time_millis("2020-01-01T00:00:00Z"), Some(expected));
        assert_eq!(date_time_millis("2020-01-01T00:00:00.000+00:00"), Some(expected));
        assert_eq!(date_time_millis("2020-01-01T01:00:00+0100"), Some(expected));
        assert_eq!(date_time_millis("2020-01-01T00:00:00"), Some(expected));
        assert_eq!(date_time_millis("2020-01-01T00:00:00.500Z"), Some(expected + 500.0));
        assert_eq!(date_time_millis("yesterday"), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("avc1.4d401f, mp4a.40.2,", ','),
            vec!["avc1.4d401f".to_string(), "mp4a.40.2".to_string()]
        );
        assert_eq!(parse_yes_no("YES"), Some(true));
        assert_eq!(parse_yes_no("yes"), None);
    }
}
