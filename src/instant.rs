// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The absolute instant.
//!
//! [`Time`] stores ephemeris seconds past J2000 (ET) together with the
//! matching TAI value.  Arithmetic and differences run on TAI, which is
//! continuous, so a span that straddles a leap second keeps its true SI
//! length.  Text and calendar conversions go through the installed
//! [`EphemerisProvider`](crate::EphemerisProvider).
//!
//! Scale-specific families live next to their collaborators:
//!
//! | Family | Module |
//! |--------|--------|
//! | LMST / LTST / sols | [`solar`](crate::solar) |
//! | SCLK / SCLKD / GST | [`sclk`](crate::sclk) |
//! | ERT / ETT / OWLT | [`light_time`](crate::light_time) |
//! | named time zones | [`timezone`](crate::timezone) |

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc, Weekday};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calendar::{self, CivilTime, UtcFormat};
use crate::duration::{epsilon_cmp, Duration};
use crate::error::{TimeError, TimeResult};
use crate::formats::{is_lmst, UTC_YEAR_REGEX};
use crate::provider;
use crate::scales::{self, GPS_EPOCH_TAI, GPS_EPOCH_UTC_SECONDS};
use crate::settings;

// ═══════════════════════════════════════════════════════════════════════════
// TimeSource
// ═══════════════════════════════════════════════════════════════════════════

/// Every value a [`Time`] can be built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeSource<'a> {
    /// UTC/SCET text in any layout the provider accepts, or LMST text.
    Text(&'a str),
    DateTime(NaiveDateTime),
    /// Midnight UTC of the date.
    Date(NaiveDate),
    Utc(DateTime<Utc>),
    /// ET seconds past J2000.
    Et(f64),
    Time(Time),
    /// J2000 (ET zero).
    Empty,
}

impl<'a> From<&'a str> for TimeSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for TimeSource<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text.as_str())
    }
}

impl From<NaiveDateTime> for TimeSource<'_> {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::DateTime(datetime)
    }
}

impl From<NaiveDate> for TimeSource<'_> {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<DateTime<Utc>> for TimeSource<'_> {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::Utc(datetime)
    }
}

impl From<f64> for TimeSource<'_> {
    fn from(et: f64) -> Self {
        Self::Et(et)
    }
}

impl From<Time> for TimeSource<'_> {
    fn from(time: Time) -> Self {
        Self::Time(time)
    }
}

impl From<()> for TimeSource<'_> {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Time
// ═══════════════════════════════════════════════════════════════════════════

/// An absolute instant; see the module documentation.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    et: f64,
    tai: f64,
}

impl Time {
    // ── constructors ──────────────────────────────────────────────────

    /// Instant at `et` ephemeris seconds past J2000.
    #[inline]
    pub fn from_et(et: f64) -> Self {
        Self {
            et,
            tai: scales::et_to_tai(et),
        }
    }

    /// Instant at `tai` atomic seconds past J2000.
    #[inline]
    pub fn from_tai(tai: f64) -> Self {
        Self {
            et: scales::tai_to_et(tai),
            tai,
        }
    }

    /// Build from any accepted [`TimeSource`].
    pub fn new<'a>(source: impl Into<TimeSource<'a>>) -> TimeResult<Self> {
        match source.into() {
            TimeSource::Text(text) => Self::parse(text),
            TimeSource::DateTime(datetime) => Self::from_datetime(datetime),
            TimeSource::Date(date) => Self::from_date(date),
            TimeSource::Utc(datetime) => Self::from_datetime(datetime.naive_utc()),
            TimeSource::Et(et) if et.is_finite() => Ok(Self::from_et(et)),
            TimeSource::Et(et) => Err(TimeError::Time(format!("{et} is not a finite ET"))),
            TimeSource::Time(time) => Ok(time),
            TimeSource::Empty => Ok(Self::from_et(0.0)),
        }
    }

    /// Parse UTC/SCET or LMST text.  Blank text is J2000.
    ///
    /// LMST text (`Sol-NNNNMHH:MM:SS[.fff]`) is recognised by shape and
    /// resolved with the configured LMST clock; anything else is handed to
    /// the provider as UTC.
    pub fn parse(text: &str) -> TimeResult<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Self::from_et(0.0));
        }
        if is_lmst(trimmed) {
            return Self::from_lmst(trimmed);
        }
        let et = provider::current()?.utc_to_continuous(trimmed)?;
        Ok(Self::from_et(et))
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> TimeResult<Self> {
        Self::parse(&datetime.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }

    pub fn from_date(date: NaiveDate) -> TimeResult<Self> {
        Self::parse(&date.format("%Y-%m-%d").to_string())
    }

    /// Current wall-clock instant.
    pub fn now() -> TimeResult<Self> {
        Self::from_datetime(Utc::now().naive_utc())
    }

    /// Parse UTC text with a `chrono` format string; date-only formats
    /// resolve to midnight.
    pub fn strptime(text: &str, format: &str) -> TimeResult<Self> {
        match NaiveDateTime::parse_from_str(text, format) {
            Ok(datetime) => Self::from_datetime(datetime),
            Err(err) => match NaiveDate::parse_from_str(text, format) {
                Ok(date) => Self::from_date(date),
                Err(_) => Err(TimeError::TimeFormat(format!(
                    "'{text}' does not match '{format}': {err}"
                ))),
            },
        }
    }

    /// Midnight UTC of an ISO week date; `weekday` runs 1 (Monday) to 7.
    pub fn from_iso_week_day(year: i32, week: u32, weekday: u32) -> TimeResult<Self> {
        let day = match weekday {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            7 => Weekday::Sun,
            other => {
                return Err(TimeError::TimeFormat(format!("ISO weekday {other} is not in 1..=7")))
            }
        };
        let date = NaiveDate::from_isoywd_opt(year, week, day)
            .ok_or_else(|| TimeError::TimeFormat(format!("{year}-W{week:02}-{weekday} is not a valid ISO week date")))?;
        Self::from_date(date)
    }

    // ── process-wide defaults ─────────────────────────────────────────

    /// Instants closer than `precision` (minus a thousandth of it) compare
    /// equal.
    pub fn set_comparison_precision(precision: Duration) {
        let epsilon = settings::epsilon_for(precision.to_seconds());
        settings::update(|s| s.time_epsilon = epsilon);
    }

    pub fn set_output_decimal_precision(precision: usize) {
        settings::update(|s| s.time_precision = precision);
    }

    pub fn set_spacecraft_id(spacecraft_id: i32) {
        settings::update(|s| s.spacecraft_id = Some(spacecraft_id));
    }

    pub fn set_lmst_sclk_id(lmst_sclk_id: i32) {
        settings::update(|s| s.lmst_sclk_id = Some(lmst_sclk_id));
    }

    /// Set the spacecraft and its conventional LMST clock (`id` with `900`
    /// appended).  Nothing changes when the paired id is out of range.
    pub fn set_spacecraft_id_and_lmst_id(spacecraft_id: i32) -> TimeResult<()> {
        let lmst = settings::lmst_sclk_id_for(spacecraft_id)?;
        settings::update(|s| {
            s.spacecraft_id = Some(spacecraft_id);
            s.lmst_sclk_id = Some(lmst);
        });
        Ok(())
    }

    /// Ticks per second used when building LMST clock strings.
    pub fn set_lmst_fractional_part(ticks: u32) {
        settings::update(|s| s.lmst_fractional_part = ticks);
    }

    // ── continuous scales ─────────────────────────────────────────────

    #[inline]
    pub const fn to_et(&self) -> f64 {
        self.et
    }

    #[inline]
    pub const fn to_tai(&self) -> f64 {
        self.tai
    }

    // ── civil text ────────────────────────────────────────────────────

    /// UTC text in `format` with `precision` decimals (configured default
    /// when `None`).
    pub fn format_utc(&self, precision: Option<usize>, format: UtcFormat) -> TimeResult<String> {
        let precision = precision.unwrap_or_else(settings::time_precision);
        Ok(provider::current()?.continuous_to_utc(self.et, precision, format)?)
    }

    /// `YYYY-DDDTHH:MM:SS.fff`
    pub fn to_utc(&self) -> TimeResult<String> {
        self.format_utc(None, UtcFormat::IsoOrdinal)
    }

    pub fn to_utc_with_precision(&self, precision: usize) -> TimeResult<String> {
        self.format_utc(Some(precision), UtcFormat::IsoOrdinal)
    }

    /// Spacecraft event time; the same text as [`Time::to_utc`].
    pub fn to_scet(&self) -> TimeResult<String> {
        self.to_utc()
    }

    /// `YYYY-MM-DDTHH:MM:SS.fff`
    pub fn to_isoc(&self) -> TimeResult<String> {
        self.format_utc(None, UtcFormat::IsoCalendar)
    }

    /// `JD nnnnnnn.fff` (UTC Julian Date).
    pub fn to_julian(&self) -> TimeResult<String> {
        self.format_utc(None, UtcFormat::Julian)
    }

    /// `YYYY MON DD HH:MM:SS.fff`
    pub fn to_calendar(&self) -> TimeResult<String> {
        self.format_utc(None, UtcFormat::Calendar)
    }

    /// Calendar value at microsecond resolution.  The inserted `23:59:60`
    /// second has no chrono counterpart and maps one second earlier.
    pub fn to_datetime(&self) -> TimeResult<NaiveDateTime> {
        let text = self.to_utc_with_precision(6)?;
        let civil = CivilTime::parse(&text).map_err(TimeError::TimeConversion)?;
        if civil.is_leap_second() {
            return (*self - Duration::from_seconds(1.0)).to_datetime();
        }
        civil
            .to_datetime()
            .ok_or_else(|| TimeError::TimeConversion(format!("'{text}' has no calendar equivalent")))
    }

    pub fn to_date(&self) -> TimeResult<NaiveDate> {
        Ok(self.to_datetime()?.date())
    }

    /// Start of the UTC year containing this instant.
    pub fn year_start(&self) -> TimeResult<Self> {
        let text = self.to_utc()?;
        let caps = UTC_YEAR_REGEX
            .captures(&text)
            .ok_or_else(|| TimeError::TimeConversion(format!("no year in '{text}'")))?;
        Self::parse(&format!("{}-001T00:00:00", &caps["year"]))
    }

    // ── GPS ───────────────────────────────────────────────────────────

    /// GPS seconds since 1980-01-06T00:00:00 UTC.
    #[inline]
    pub fn to_gps_seconds(&self) -> f64 {
        self.tai - GPS_EPOCH_TAI
    }

    /// GPS time on an ISO ordinal clock face.  GPS never inserts leap
    /// seconds, so the text is the GPS epoch advanced by plain calendar
    /// arithmetic.
    pub fn to_gps(&self, precision: Option<usize>) -> String {
        let precision = precision.unwrap_or_else(settings::time_precision);
        calendar::render_naive(
            GPS_EPOCH_UTC_SECONDS + self.to_gps_seconds(),
            precision,
            UtcFormat::IsoOrdinal,
        )
    }

    #[inline]
    pub fn from_gps_seconds(gps_seconds: f64) -> Self {
        Self::from_tai(gps_seconds + GPS_EPOCH_TAI)
    }

    /// Inverse of [`Time::to_gps`]; accepts any civil layout.
    pub fn from_gps(text: &str) -> TimeResult<Self> {
        let civil = CivilTime::parse(text).map_err(TimeError::TimeFormat)?;
        if civil.is_leap_second() {
            return Err(TimeError::TimeFormat(format!("GPS time '{text}' has no leap seconds")));
        }
        Ok(Self::from_gps_seconds(civil.naive_seconds() - GPS_EPOCH_UTC_SECONDS))
    }

    // ── intervals and rounding ────────────────────────────────────────

    /// Strictly between `start` and `end`.
    pub fn is_between(&self, start: &Time, end: &Time) -> TimeResult<bool> {
        if start > end {
            return Err(TimeError::Time(format!(
                "interval start (ET {}) is after its end (ET {})",
                start.et, end.et
            )));
        }
        Ok(start < self && self < end)
    }

    /// Round to a multiple of `resolution` counted from `reference`
    /// (start of the UTC year when `None`).
    pub fn round(&self, resolution: Duration, reference: Option<Time>) -> TimeResult<Self> {
        self.snap(resolution, reference, Duration::round)
    }

    pub fn ceil(&self, resolution: Duration, reference: Option<Time>) -> TimeResult<Self> {
        self.snap(resolution, reference, Duration::ceil)
    }

    pub fn floor(&self, resolution: Duration, reference: Option<Time>) -> TimeResult<Self> {
        self.snap(resolution, reference, Duration::floor)
    }

    pub(crate) fn snap(
        &self,
        resolution: Duration,
        reference: Option<Time>,
        op: fn(&Duration, Duration) -> TimeResult<Duration>,
    ) -> TimeResult<Self> {
        let reference = match reference {
            Some(reference) => reference,
            None => self.year_start()?,
        };
        Ok(reference + op(&(*self - reference), resolution)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Trait implementations
// ═══════════════════════════════════════════════════════════════════════════

// ── Display / FromStr ─────────────────────────────────────────────────────

/// `ET <seconds>`; use [`Time::to_utc`] for civil text.
impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(3);
        write!(f, "ET {:.precision$}", self.et)
    }
}

impl FromStr for Time {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Comparison ────────────────────────────────────────────────────────────

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        (self.tai - other.tai).abs() < settings::time_epsilon()
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        epsilon_cmp(self.tai, other.tai, settings::time_epsilon())
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl Add<Duration> for Time {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self::from_tai(self.tai + rhs.to_seconds())
    }
}

impl AddAssign<Duration> for Time {
    #[inline]
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl Sub<Duration> for Time {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Duration) -> Self {
        Self::from_tai(self.tai - rhs.to_seconds())
    }
}

impl SubAssign<Duration> for Time {
    #[inline]
    fn sub_assign(&mut self, rhs: Duration) {
        *self = *self - rhs;
    }
}

impl Sub for Time {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration::from_seconds(self.tai - rhs.tai)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.et)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let et = f64::deserialize(deserializer)?;
        Ok(Self::from_et(et))
    }
}
