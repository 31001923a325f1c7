// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! Parsing of the timestamps used in dav properties.
//!
//! Two grammars are in use:
//!
//! - `DAV:getlastmodified` holds an HTTP-date as defined in [rfc2616 section-3.3.1], which has
//!   three historical variants.
//! - `DAV:creationdate` holds a `date-time` as defined in [rfc3339 section-5.6].
//!
//! Both are converted into seconds since the Unix epoch, in UTC. Calendar arithmetic is
//! proleptic Gregorian and ignores leap seconds; the local time zone database is never consulted.
//!
//! [rfc2616 section-3.3.1]: https://www.rfc-editor.org/rfc/rfc2616#section-3.3.1
//! [rfc3339 section-5.6]: https://www.rfc-editor.org/rfc/rfc3339#section-5.6

use chrono::NaiveDate;

/// The grammar in which a timestamp is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// HTTP-date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
    Rfc2616,
    /// Internet date-time, e.g. `1985-04-12T23:20:50.52Z`.
    Rfc3339,
}

/// An error parsing a timestamp.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("invalid number '{0}' in timestamp")]
    InvalidNumber(String),

    #[error("unknown month name '{0}'")]
    UnknownMonth(String),

    #[error("expected {expected} fields in timestamp, found {found}")]
    TokenCount { expected: usize, found: usize },

    #[error("unknown time zone '{0}'")]
    UnknownZone(String),

    #[error("timestamp fields are out of range")]
    OutOfRange,
}

/// Parses a timestamp into seconds since the Unix epoch.
///
/// # Errors
///
/// If the text does not match the given grammar, or describes an impossible date.
pub fn parse(text: &str, format: Format) -> Result<i64, TimestampError> {
    match format {
        Format::Rfc2616 => parse_rfc2616(text),
        Format::Rfc3339 => parse_rfc3339(text),
    }
}

/// Wall-clock time, as written in a timestamp.
#[derive(Debug, Default, PartialEq, Eq)]
struct CalendarFields {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl CalendarFields {
    /// Converts the fields into epoch seconds, as if they were expressed in UTC.
    ///
    /// A `second` of 60 is accepted and rolls over into the next minute.
    fn to_epoch_utc(&self) -> Result<i64, TimestampError> {
        if self.hour > 23 || self.minute > 59 || self.second > 60 {
            return Err(TimestampError::OutOfRange);
        }
        let midnight = NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or(TimestampError::OutOfRange)?
            .and_utc()
            .timestamp();

        Ok(midnight
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second))
    }
}

/// Parses a run of ASCII digits.
///
/// Unlike `str::parse`, this rejects a leading `+`.
fn parse_number(token: &str) -> Result<u32, TimestampError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampError::InvalidNumber(token.to_string()));
    }
    token
        .parse()
        .map_err(|_| TimestampError::InvalidNumber(token.to_string()))
}

// HTTP-date

#[derive(Debug, Clone, Copy)]
enum Token {
    Weekday,
    Day,
    Month,
    Year,
    Hour,
    Minute,
    Second,
    Zone,
}

/// `Sun, 06 Nov 1994 08:49:37 GMT` and `Sunday, 06-Nov-94 08:49:37 GMT`.
const RFC1123_ORDER: [Token; 8] = [
    Token::Weekday,
    Token::Day,
    Token::Month,
    Token::Year,
    Token::Hour,
    Token::Minute,
    Token::Second,
    Token::Zone,
];

/// `Sun Nov  6 08:49:37 1994`.
const ASCTIME_ORDER: [Token; 7] = [
    Token::Weekday,
    Token::Month,
    Token::Day,
    Token::Hour,
    Token::Minute,
    Token::Second,
    Token::Year,
];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const HTTP_DATE_DELIMITERS: [char; 4] = [' ', ',', '-', ':'];

fn parse_rfc2616(text: &str) -> Result<i64, TimestampError> {
    let text = text.trim();
    // Only the variants with a zone designator end in "GMT".
    let order: &[Token] = if text.ends_with("GMT") {
        &RFC1123_ORDER
    } else {
        &ASCTIME_ORDER
    };

    let tokens = text
        .split(&HTTP_DATE_DELIMITERS[..])
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>();
    if tokens.len() != order.len() {
        return Err(TimestampError::TokenCount {
            expected: order.len(),
            found: tokens.len(),
        });
    }

    let mut fields = CalendarFields::default();
    for (token, kind) in tokens.into_iter().zip(order) {
        match kind {
            Token::Weekday => {}
            Token::Day => fields.day = parse_number(token)?,
            Token::Month => {
                fields.month = MONTHS
                    .iter()
                    .position(|m| *m == token)
                    .and_then(|i| u32::try_from(i + 1).ok())
                    .ok_or_else(|| TimestampError::UnknownMonth(token.to_string()))?;
            }
            Token::Year => {
                let year = parse_number(token)?;
                let year = if year > 99 { year } else { year + 1900 };
                fields.year = i32::try_from(year).map_err(|_| TimestampError::OutOfRange)?;
            }
            Token::Hour => fields.hour = parse_number(token)?,
            Token::Minute => fields.minute = parse_number(token)?,
            Token::Second => fields.second = parse_number(token)?,
            Token::Zone => {
                if token != "GMT" {
                    return Err(TimestampError::UnknownZone(token.to_string()));
                }
            }
        }
    }

    fields.to_epoch_utc()
}

// date-time

/// Splits `text` on `delimiter` and checks that exactly `N` parts are present.
fn split_exact<const N: usize>(text: &str, delimiter: char) -> Result<[&str; N], TimestampError> {
    let parts = text.split(delimiter).collect::<Vec<_>>();
    let found = parts.len();
    parts
        .try_into()
        .map_err(|_| TimestampError::TokenCount { expected: N, found })
}

/// Parses a `time-offset` into seconds east of UTC.
fn parse_offset(zone: &str) -> Result<i64, TimestampError> {
    let (sign, hhmm) = match zone.as_bytes().first() {
        Some(b'Z' | b'z') if zone.len() == 1 => return Ok(0),
        Some(b'+') => (1, &zone[1..]),
        Some(b'-') => (-1, &zone[1..]),
        _ => return Err(TimestampError::UnknownZone(zone.to_string())),
    };
    let [hours, minutes] = split_exact::<2>(hhmm, ':')?;
    let hours = parse_number(hours)?;
    let minutes = parse_number(minutes)?;
    if hours > 23 || minutes > 59 {
        return Err(TimestampError::OutOfRange);
    }

    Ok(sign * (i64::from(hours) * 3600 + i64::from(minutes) * 60))
}

fn parse_rfc3339(text: &str) -> Result<i64, TimestampError> {
    let text = text.trim();
    let (date, time) = text
        .split_once(&['T', 't'][..])
        .ok_or(TimestampError::TokenCount {
            expected: 2,
            found: 1,
        })?;

    let [year, month, day] = split_exact::<3>(date, '-')?;

    let zone_start = time
        .find(&['Z', 'z', '+', '-'][..])
        .ok_or_else(|| TimestampError::UnknownZone(String::new()))?;
    let (clock, zone) = time.split_at(zone_start);
    let offset = parse_offset(zone)?;

    let [hour, minute, second] = split_exact::<3>(clock, ':')?;
    let (second, rounding) = match second.split_once('.') {
        Some((second, fraction)) => {
            // Any precision is allowed; only the first digit matters for rounding.
            if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TimestampError::InvalidNumber(fraction.to_string()));
            }
            // Round half up to the nearest second.
            let round_up = fraction.as_bytes()[0] >= b'5';
            (second, u32::from(round_up))
        }
        None => (second, 0),
    };

    let fields = CalendarFields {
        year: i32::try_from(parse_number(year)?).map_err(|_| TimestampError::OutOfRange)?,
        month: parse_number(month)?,
        day: parse_number(day)?,
        hour: parse_number(hour)?,
        minute: parse_number(minute)?,
        second: parse_number(second)?,
    };

    Ok(fields.to_epoch_utc()? + i64::from(rounding) - offset)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Datelike, Timelike, Utc};

    use super::{parse, CalendarFields, Format, TimestampError};

    fn utc(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    fn fields(seconds: i64) -> (i32, u32, u32, u32, u32, u32) {
        let t = utc(seconds);
        (t.year(), t.month(), t.day(), t.hour(), t.minute(), t.second())
    }

    #[test]
    fn test_http_date_variants_agree() {
        let expected = 784_111_777;
        for text in [
            "Sun, 06 Nov 1994 08:49:37 GMT",
            "Sunday, 06-Nov-94 08:49:37 GMT",
            "Sun Nov 6 08:49:37 1994",
            "Sun Nov  6 08:49:37 1994",
        ] {
            assert_eq!(parse(text, Format::Rfc2616), Ok(expected), "{text}");
        }
    }

    #[test]
    fn test_http_date_two_digit_years() {
        for year in 0..=99 {
            let text = format!("Sunday, 06-Nov-{year:02} 08:49:37 GMT");
            let parsed = parse(&text, Format::Rfc2616).unwrap();
            assert_eq!(utc(parsed).year(), 1900 + year, "{text}");
        }
        let parsed = parse("Sun, 06 Nov 2024 08:49:37 GMT", Format::Rfc2616).unwrap();
        assert_eq!(fields(parsed), (2024, 11, 6, 8, 49, 37));
    }

    #[test]
    fn test_http_date_four_digit_year_in_rfc850_form() {
        let parsed = parse("Wednesday, 16-Jul-2025 23:59:58 GMT", Format::Rfc2616).unwrap();
        assert_eq!(fields(parsed), (2025, 7, 16, 23, 59, 58));
    }

    #[test]
    fn test_http_date_errors() {
        assert_eq!(
            parse("Sun, 06 nov 1994 08:49:37 GMT", Format::Rfc2616),
            Err(TimestampError::UnknownMonth("nov".to_string()))
        );
        assert_eq!(
            parse("Sun, 06 Nov 1994 08:49 GMT", Format::Rfc2616),
            Err(TimestampError::TokenCount {
                expected: 8,
                found: 7
            })
        );
        assert_eq!(
            parse("Sun Nov 6 08:49:37 1994 extra", Format::Rfc2616),
            Err(TimestampError::TokenCount {
                expected: 7,
                found: 8
            })
        );
        assert_eq!(
            parse("Sun, 0x Nov 1994 08:49:37 GMT", Format::Rfc2616),
            Err(TimestampError::InvalidNumber("0x".to_string()))
        );
        assert_eq!(
            parse("Sun, 31 Nov 1994 08:49:37 GMT", Format::Rfc2616),
            Err(TimestampError::OutOfRange)
        );
        assert!(parse("", Format::Rfc2616).is_err());
    }

    #[test]
    fn test_date_time_fraction_rounds_half_up() {
        let parsed = parse("1985-04-12T23:20:50.52Z", Format::Rfc3339).unwrap();
        assert_eq!(fields(parsed), (1985, 4, 12, 23, 20, 51));

        let parsed = parse("1985-04-12T23:20:50.49Z", Format::Rfc3339).unwrap();
        assert_eq!(fields(parsed), (1985, 4, 12, 23, 20, 50));

        let parsed = parse("1985-04-12T23:59:59.5Z", Format::Rfc3339).unwrap();
        assert_eq!(fields(parsed), (1985, 4, 13, 0, 0, 0));
    }

    #[test]
    fn test_date_time_long_fraction() {
        assert_eq!(
            parse("1985-04-12T23:20:50.520000000000Z", Format::Rfc3339),
            Ok(482_196_051)
        );
        assert_eq!(
            parse("1985-04-12T23:20:50.4999999999999999Z", Format::Rfc3339),
            Ok(482_196_050)
        );
        assert_eq!(
            parse("1985-04-12T23:20:50.52x0Z", Format::Rfc3339),
            Err(TimestampError::InvalidNumber("52x0".to_string()))
        );
    }

    #[test]
    fn test_date_time_offsets() {
        let parsed = parse("1996-12-19T16:39:57.473-08:21", Format::Rfc3339).unwrap();
        assert_eq!(fields(parsed), (1996, 12, 20, 1, 0, 57));

        let parsed = parse("1996-12-19T16:29:57+08:30", Format::Rfc3339).unwrap();
        assert_eq!(fields(parsed), (1996, 12, 19, 7, 59, 57));

        assert_eq!(
            parse("1994-11-06t08:49:37z", Format::Rfc3339),
            Ok(784_111_777)
        );
    }

    #[test]
    fn test_date_time_errors() {
        assert_eq!(
            parse("1996-12-19 16:29:57Z", Format::Rfc3339),
            Err(TimestampError::TokenCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            parse("1996-12-19T16:29:57", Format::Rfc3339),
            Err(TimestampError::UnknownZone(String::new()))
        );
        assert_eq!(
            parse("1996-12-19T16:29:57+0830", Format::Rfc3339),
            Err(TimestampError::TokenCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            parse("1996-12-19T16:29Z", Format::Rfc3339),
            Err(TimestampError::TokenCount {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            parse("1996-12-19T16:29:57.Z", Format::Rfc3339),
            Err(TimestampError::InvalidNumber(String::new()))
        );
        assert_eq!(
            parse("1996-13-19T16:29:57Z", Format::Rfc3339),
            Err(TimestampError::OutOfRange)
        );
        // An HTTP-date is not a valid date-time.
        assert!(parse("Sun, 06 Nov 1994 08:49:37 GMT", Format::Rfc3339).is_err());
    }

    #[test]
    fn test_calendar_fields_leap_second_rolls_over() {
        let fields = CalendarFields {
            year: 1998,
            month: 12,
            day: 31,
            hour: 23,
            minute: 59,
            second: 60,
        };
        assert_eq!(fields.to_epoch_utc(), Ok(915_148_800));
    }
}
