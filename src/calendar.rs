// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil (calendar) text on a naive UTC axis.
//!
//! Parsing and rendering here know nothing about leap seconds: a
//! [`CivilTime`] is a date plus seconds into that day, where a value of
//! `86_400.0` or more denotes the inserted `23:59:60` second.  Callers that
//! need the atomic axis apply ΔAT themselves.
//!
//! Accepted input layouts (an optional `Z` or ` UTC` suffix is ignored):
//!
//! | Layout | Example |
//! |--------|---------|
//! | ISO ordinal | `2020-123T01:02:03.456` |
//! | ISO calendar | `2020-05-02T01:02:03`, `2020-05-02 01:02` |
//! | Month name | `2020 MAY 02 01:02:03`, `2020-May-02` |
//! | Julian Date | `JD 2458971.543` |

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::formats::MAX_PRECISION;

/// Output layouts for UTC text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UtcFormat {
    /// `YYYY-DDDTHH:MM:SS.fff`
    IsoOrdinal,
    /// `YYYY-MM-DDTHH:MM:SS.fff`
    IsoCalendar,
    /// `YYYY MON DD HH:MM:SS.fff`
    Calendar,
    /// `JD nnnnnnn.fff`
    Julian,
}

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const TIME_OF_DAY: &str =
    r"(?:[T ]+(?P<hour>\d{1,2}):(?P<minute>\d{2})(?::(?P<second>\d{2}(?:\.\d*)?))?)?";
const SUFFIX: &str = r"(?:\s*(?:Z|UTC))?";

static ISO_ORDINAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?P<year>\d{{4}})-(?P<doy>\d{{3}}){TIME_OF_DAY}{SUFFIX}$"))
        .expect("static iso ordinal regex")
});

static ISO_CALENDAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<year>\d{{4}})-(?P<month>\d{{1,2}})-(?P<day>\d{{1,2}}){TIME_OF_DAY}{SUFFIX}$"
    ))
    .expect("static iso calendar regex")
});

static MONTH_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<year>\d{{4}})[ -](?P<month_name>[A-Za-z]{{3}})[ -](?P<day>\d{{1,2}}){TIME_OF_DAY}{SUFFIX}$"
    ))
    .expect("static month name regex")
});

static JULIAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:JD)\s*(?P<jd>\d+(?:\.\d*)?)(?:\s*(?:UTC))?$").expect("static julian regex")
});

/// A date and the seconds elapsed in it on the UTC clock face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CivilTime {
    pub date: NaiveDate,
    pub seconds_of_day: f64,
}

/// Midnight starting 2000-01-01, the day of J2000.
fn j2000_midnight() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

impl CivilTime {
    /// Parse any accepted layout.  The error message is suitable for a
    /// provider failure and carries the `malformed time string` marker.
    pub fn parse(text: &str) -> Result<Self, String> {
        let trimmed = text.trim();
        let malformed = |why: &str| format!("malformed time string '{text}': {why}");

        if let Some(caps) = JULIAN_REGEX.captures(trimmed) {
            let jd: f64 = caps["jd"].parse().map_err(|_| malformed("bad Julian Date"))?;
            return Ok(Self::from_naive_seconds((jd - 2_451_545.0) * 86_400.0));
        }

        let (date, caps) = if let Some(caps) = ISO_ORDINAL_REGEX.captures(trimmed) {
            let year = int(&caps, "year");
            let doy = int(&caps, "doy");
            let date = NaiveDate::from_yo_opt(year, doy as u32)
                .ok_or_else(|| malformed("day of year out of range"))?;
            (date, caps)
        } else if let Some(caps) = ISO_CALENDAR_REGEX.captures(trimmed) {
            let date = NaiveDate::from_ymd_opt(
                int(&caps, "year"),
                int(&caps, "month") as u32,
                int(&caps, "day") as u32,
            )
            .ok_or_else(|| malformed("calendar date out of range"))?;
            (date, caps)
        } else if let Some(caps) = MONTH_NAME_REGEX.captures(trimmed) {
            let name = caps["month_name"].to_ascii_uppercase();
            let month = MONTHS
                .iter()
                .position(|m| *m == name)
                .ok_or_else(|| malformed("unknown month name"))?;
            let date = NaiveDate::from_ymd_opt(int(&caps, "year"), month as u32 + 1, int(&caps, "day") as u32)
                .ok_or_else(|| malformed("calendar date out of range"))?;
            (date, caps)
        } else {
            return Err(malformed("unrecognised layout"));
        };

        let hour = int(&caps, "hour");
        let minute = int(&caps, "minute");
        let second: f64 = match caps.name("second") {
            Some(m) => m.as_str().parse().map_err(|_| malformed("bad seconds"))?,
            None => 0.0,
        };
        if hour > 23 || minute > 59 || second >= 61.0 {
            return Err(malformed("clock field out of range"));
        }
        if second >= 60.0 && !(hour == 23 && minute == 59) {
            return Err(malformed("second 60 is only valid at 23:59"));
        }
        Ok(Self {
            date,
            seconds_of_day: f64::from(hour * 3_600 + minute * 60) + second,
        })
    }

    /// Civil time at a naive UTC second (seconds past 2000-01-01T12:00:00,
    /// every day exactly 86 400 s long).
    pub fn from_naive_seconds(seconds: f64) -> Self {
        let since_midnight = seconds + 43_200.0;
        let days = (since_midnight / 86_400.0).floor();
        let date = shift_days(j2000_midnight(), days as i64);
        Self {
            date,
            seconds_of_day: since_midnight - days * 86_400.0,
        }
    }

    /// Naive UTC second of this civil time.  A `23:59:60.x` value maps onto
    /// the first second of the next day.
    pub fn naive_seconds(&self) -> f64 {
        let days = (self.date - j2000_midnight()).num_days();
        days as f64 * 86_400.0 - 43_200.0 + self.seconds_of_day
    }

    /// Naive UTC second of the start of this day.
    pub fn day_start_seconds(&self) -> i64 {
        (self.date - j2000_midnight()).num_days() * 86_400 - 43_200
    }

    /// Build from a chrono value; its fractional part is kept to the
    /// nanosecond.
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        let time = datetime.time();
        Self {
            date: datetime.date(),
            seconds_of_day: f64::from(time.num_seconds_from_midnight())
                + f64::from(time.nanosecond()) / 1e9,
        }
    }

    /// `true` for a reading inside an inserted `23:59:60` second.
    pub fn is_leap_second(&self) -> bool {
        self.seconds_of_day >= 86_400.0
    }

    /// Chrono view, `None` for the `23:59:60` second.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        if self.seconds_of_day >= 86_400.0 || self.seconds_of_day < 0.0 {
            return None;
        }
        let whole = self.seconds_of_day.floor();
        let nanos = ((self.seconds_of_day - whole) * 1e9).round().min(999_999_999.0) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(whole as u32, nanos).map(|t| self.date.and_time(t))
    }
}

fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    if days >= 0 {
        date.checked_add_days(chrono::Days::new(days as u64)).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(chrono::Days::new(days.unsigned_abs())).unwrap_or(NaiveDate::MIN)
    }
}

fn int(caps: &Captures<'_>, name: &str) -> i32 {
    caps.name(name)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Render a day plus a tick count into the day (`10^-precision` s units).
/// A tick count of a full day or more renders as second 60.
pub fn render(date: NaiveDate, ticks_of_day: u64, precision: usize, format: UtcFormat) -> String {
    let precision = precision.min(MAX_PRECISION);
    let scale = 10u64.pow(precision as u32);
    let whole = ticks_of_day / scale;
    let fraction = ticks_of_day % scale;
    let (hour, minute, second) = if whole >= 86_400 {
        (23, 59, 60 + (whole - 86_400))
    } else {
        (whole / 3_600, whole % 3_600 / 60, whole % 60)
    };
    let mut clock = format!("{hour:02}:{minute:02}:{second:02}");
    if precision > 0 {
        clock.push_str(&format!(".{fraction:0precision$}"));
    }
    match format {
        UtcFormat::IsoOrdinal => format!("{:04}-{:03}T{clock}", date.year(), date.ordinal()),
        UtcFormat::IsoCalendar => format!(
            "{:04}-{:02}-{:02}T{clock}",
            date.year(),
            date.month(),
            date.day()
        ),
        UtcFormat::Calendar => format!(
            "{:04} {} {:02} {clock}",
            date.year(),
            MONTHS[date.month0() as usize],
            date.day()
        ),
        UtcFormat::Julian => {
            let day = CivilTime {
                date,
                seconds_of_day: 0.0,
            };
            let seconds = day.naive_seconds() + ticks_of_day as f64 / scale as f64;
            format!("JD {:.precision$}", 2_451_545.0 + seconds / 86_400.0)
        }
    }
}

/// Render a naive UTC second (no leap seconds).
pub fn render_naive(seconds: f64, precision: usize, format: UtcFormat) -> String {
    let precision = precision.min(MAX_PRECISION);
    let scale = 10i128.pow(precision as u32);
    render_naive_ticks((seconds * scale as f64).round() as i128, precision, format)
}

/// Render a naive UTC instant counted in `10^-precision` s ticks.
pub fn render_naive_ticks(ticks: i128, precision: usize, format: UtcFormat) -> String {
    let precision = precision.min(MAX_PRECISION);
    let scale = 10i128.pow(precision as u32);
    let ticks = ticks + 43_200 * scale;
    let per_day = 86_400 * scale;
    let days = ticks.div_euclid(per_day);
    let ticks_of_day = ticks.rem_euclid(per_day) as u64;
    render(shift_days(j2000_midnight(), days as i64), ticks_of_day, precision, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> CivilTime {
        CivilTime::parse(text).expect("valid civil time")
    }

    #[test]
    fn parses_every_layout_to_the_same_instant() {
        let expected = parse("2020-123T01:02:03.5");
        for text in [
            "2020-05-02T01:02:03.5",
            "2020-05-02 01:02:03.500",
            "2020 MAY 02 01:02:03.5",
            "2020-may-02T01:02:03.5Z",
            " 2020-123T01:02:03.500 UTC ",
        ] {
            assert_eq!(parse(text), expected, "{text}");
        }
        assert_eq!(expected.date, NaiveDate::from_ymd_opt(2020, 5, 2).expect("date"));
        assert!((expected.seconds_of_day - 3_723.5).abs() < 1e-9);
    }

    #[test]
    fn date_only_is_midnight() {
        let t = parse("2021-001");
        assert_eq!(t.seconds_of_day, 0.0);
        assert_eq!(parse("2021-01-01"), t);
    }

    #[test]
    fn julian_dates() {
        let t = parse("JD 2451545.0");
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2000, 1, 1).expect("date"));
        assert!((t.seconds_of_day - 43_200.0).abs() < 1e-6);
        assert!(t.naive_seconds().abs() < 1e-6);
    }

    #[test]
    fn rejects_bad_text() {
        for bad in ["2020-366T25:00:00", "2021-366", "2020-13-01", "2020 FOO 01", "next tuesday", "2020-001T12:00:60"] {
            let err = CivilTime::parse(bad).expect_err(bad);
            assert!(err.contains("malformed time string"), "{err}");
        }
    }

    #[test]
    fn leap_second_text_is_accepted() {
        let t = parse("2016-366T23:59:60.250");
        assert!((t.seconds_of_day - 86_400.25).abs() < 1e-9);
        assert!(t.is_leap_second());
        assert!(t.to_datetime().is_none());
        assert!(!parse("2016-366T23:59:59.999").is_leap_second());
    }

    #[test]
    fn naive_seconds_roundtrip() {
        for seconds in [-630_763_200.0, -43_200.0, 0.0, 1.5, 7.2e8] {
            let civil = CivilTime::from_naive_seconds(seconds);
            assert!((civil.naive_seconds() - seconds).abs() < 1e-6, "{seconds}");
        }
    }

    #[test]
    fn renders_layouts() {
        let date = NaiveDate::from_ymd_opt(2020, 2, 29).expect("date");
        let ticks = 3_723_456; // 01:02:03.456
        assert_eq!(render(date, ticks, 3, UtcFormat::IsoOrdinal), "2020-060T01:02:03.456");
        assert_eq!(render(date, ticks, 3, UtcFormat::IsoCalendar), "2020-02-29T01:02:03.456");
        assert_eq!(render(date, ticks, 3, UtcFormat::Calendar), "2020 FEB 29 01:02:03.456");
        assert_eq!(render(date, 3_723, 0, UtcFormat::IsoOrdinal), "2020-060T01:02:03");
        assert_eq!(render(date, 86_400_500, 3, UtcFormat::IsoOrdinal), "2020-060T23:59:60.500");
    }

    #[test]
    fn renders_naive_seconds() {
        assert_eq!(render_naive(0.0, 3, UtcFormat::IsoOrdinal), "2000-001T12:00:00.000");
        assert_eq!(render_naive(-630_763_200.0, 0, UtcFormat::IsoCalendar), "1980-01-06T00:00:00");
        assert_eq!(render_naive(0.0, 1, UtcFormat::Julian), "JD 2451545.0");
    }
}
