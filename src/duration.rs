// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Signed time spans on the Earth and Mars clocks.
//!
//! A [`Duration`] stores SI seconds.  Text goes through two layouts:
//!
//! | Layout | Day letter | Unit of the fields |
//! |--------|------------|--------------------|
//! | Earth  | `T` (only when days > 0) | SI day / hour / minute / second |
//! | Mars   | `M` (always present)     | sol and Mars hour / minute / second |
//!
//! Equality and ordering tolerate a process-wide epsilon (see
//! [`Duration::set_comparison_precision`]), so two spans a few microseconds
//! apart compare equal.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Rem, Sub, SubAssign};
use std::str::FromStr;

use chrono::TimeDelta;
use qtty::{Day, Days, Second, Seconds};
use regex::Captures;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{TimeError, TimeResult};
use crate::formats::{
    capture_f64, EARTH_DURATION_REGEX, MARS_DURATION_REGEX, MARS_TIME_SCALE, MAX_PRECISION,
    SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE, SECONDS_PER_SOL,
};
use crate::settings;

// ═══════════════════════════════════════════════════════════════════════════
// DurationSource
// ═══════════════════════════════════════════════════════════════════════════

/// Every value a [`Duration`] can be built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationSource<'a> {
    /// Earth or Mars duration text.
    Text(&'a str),
    /// SI seconds.
    Seconds(f64),
    Duration(Duration),
    Span(TimeDelta),
    StdSpan(std::time::Duration),
    /// Zero length.
    Empty,
}

impl<'a> From<&'a str> for DurationSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for DurationSource<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text.as_str())
    }
}

impl From<f64> for DurationSource<'_> {
    fn from(seconds: f64) -> Self {
        Self::Seconds(seconds)
    }
}

impl From<i64> for DurationSource<'_> {
    fn from(seconds: i64) -> Self {
        Self::Seconds(seconds as f64)
    }
}

impl From<i32> for DurationSource<'_> {
    fn from(seconds: i32) -> Self {
        Self::Seconds(f64::from(seconds))
    }
}

impl From<Duration> for DurationSource<'_> {
    fn from(duration: Duration) -> Self {
        Self::Duration(duration)
    }
}

impl From<TimeDelta> for DurationSource<'_> {
    fn from(span: TimeDelta) -> Self {
        Self::Span(span)
    }
}

impl From<std::time::Duration> for DurationSource<'_> {
    fn from(span: std::time::Duration) -> Self {
        Self::StdSpan(span)
    }
}

impl From<()> for DurationSource<'_> {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl<'a, T: Into<DurationSource<'a>>> From<Option<T>> for DurationSource<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DurationParts
// ═══════════════════════════════════════════════════════════════════════════

/// Broken-down fields of a duration, already rounded to `precision`
/// decimals.  Days are sols when produced by [`Duration::mars_components`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParts {
    pub negative: bool,
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Fractional seconds as an integer count of `10^-precision` units.
    pub fraction: u64,
    pub precision: usize,
}

impl DurationParts {
    fn split(seconds: f64, precision: usize) -> Self {
        let precision = precision.min(MAX_PRECISION);
        let scale = 10u128.pow(precision as u32);
        let ticks = (seconds.abs() * scale as f64).round() as u128;
        let whole = ticks / scale;
        let days = whole / 86_400;
        let in_day = (whole % 86_400) as u32;
        Self {
            negative: seconds < 0.0 && ticks > 0,
            days: days as u64,
            hours: in_day / 3_600,
            minutes: in_day % 3_600 / 60,
            seconds: in_day % 60,
            fraction: (ticks % scale) as u64,
            precision,
        }
    }

    /// Seconds field including its fraction.
    pub fn fractional_seconds(&self) -> f64 {
        f64::from(self.seconds) + self.fraction as f64 / 10f64.powi(self.precision as i32)
    }

    /// Seconds elapsed since the start of the (Earth or Mars) day.
    pub fn time_of_day(&self) -> f64 {
        f64::from(self.hours) * 3_600.0 + f64::from(self.minutes) * 60.0 + self.fractional_seconds()
    }

    /// `HH:MM:SS[.fff]` without sign or day prefix.
    pub fn clock(&self) -> String {
        let mut out = format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds);
        if self.precision > 0 {
            out.push_str(&format!(".{:0width$}", self.fraction, width = self.precision));
        }
        out
    }

    fn render(&self, day_letter: char, always_letter: bool) -> String {
        let sign = if self.negative { "-" } else { "" };
        let prefix = match (self.days, always_letter) {
            (0, false) => String::new(),
            (0, true) => day_letter.to_string(),
            (days, _) => format!("{days}{day_letter}"),
        };
        format!("{sign}{prefix}{}", self.clock())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Duration
// ═══════════════════════════════════════════════════════════════════════════

/// A signed span of SI seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Duration {
    seconds: f64,
}

impl Duration {
    pub const ZERO: Self = Self { seconds: 0.0 };

    // ── constructors ──────────────────────────────────────────────────

    #[inline]
    pub const fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    #[inline]
    pub fn from_minutes(minutes: f64) -> Self {
        Self::from_seconds(minutes * SECONDS_PER_MINUTE)
    }

    #[inline]
    pub fn from_hours(hours: f64) -> Self {
        Self::from_seconds(hours * SECONDS_PER_HOUR)
    }

    #[inline]
    pub fn from_days(days: f64) -> Self {
        Self::from_seconds(days * SECONDS_PER_DAY)
    }

    /// Build from any accepted [`DurationSource`].
    ///
    /// ```
    /// use mission_time::Duration;
    /// let d = Duration::new("1T01:00:00").unwrap();
    /// assert_eq!(d.to_seconds(), 90_000.0);
    /// assert_eq!(Duration::new(()).unwrap(), Duration::ZERO);
    /// ```
    pub fn new<'a>(source: impl Into<DurationSource<'a>>) -> TimeResult<Self> {
        match source.into() {
            DurationSource::Text(text) => Self::parse(text),
            DurationSource::Seconds(seconds) if seconds.is_finite() => Ok(Self::from_seconds(seconds)),
            DurationSource::Seconds(seconds) => {
                Err(TimeError::Duration(format!("{seconds} is not a finite number of seconds")))
            }
            DurationSource::Duration(d) => Ok(d),
            DurationSource::Span(span) => Ok(Self::from_timedelta(span)),
            DurationSource::StdSpan(span) => Ok(Self::from_seconds(span.as_secs_f64())),
            DurationSource::Empty => Ok(Self::ZERO),
        }
    }

    /// Parse Earth (`[-][DDDT]HH:MM:SS[.fff]`) or Mars
    /// (`[-][SSS]MHH:MM:SS[.fff]`) text.  Blank text is zero.
    pub fn parse(text: &str) -> TimeResult<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Self::ZERO);
        }
        if let Some(caps) = EARTH_DURATION_REGEX.captures(trimmed) {
            return clock_fields(&caps, text).map(Self::from_seconds);
        }
        if let Some(caps) = MARS_DURATION_REGEX.captures(trimmed) {
            return clock_fields(&caps, text).map(|s| Self::from_seconds(s * MARS_TIME_SCALE));
        }
        Err(TimeError::DurationFormat(format!(
            "'{text}' matches neither [-][DDDT]HH:MM:SS[.fff] nor [-][SSS]MHH:MM:SS[.fff]"
        )))
    }

    pub fn from_timedelta(span: TimeDelta) -> Self {
        Self::from_seconds(span.num_seconds() as f64 + f64::from(span.subsec_nanos()) / 1e9)
    }

    // ── process-wide defaults ─────────────────────────────────────────

    /// Compare durations to within `seconds` (minus a thousandth of it).
    pub fn set_comparison_precision(seconds: f64) {
        let epsilon = settings::epsilon_for(seconds);
        settings::update(|s| s.duration_epsilon = epsilon);
    }

    /// Decimals used by `to_string` when no precision is given.
    pub fn set_output_decimal_precision(precision: usize) {
        settings::update(|s| s.duration_precision = precision);
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn to_seconds(&self) -> f64 {
        self.seconds
    }

    #[inline]
    pub fn to_minutes(&self) -> f64 {
        self.seconds / SECONDS_PER_MINUTE
    }

    #[inline]
    pub fn to_hours(&self) -> f64 {
        self.seconds / SECONDS_PER_HOUR
    }

    #[inline]
    pub fn to_days(&self) -> f64 {
        self.seconds / SECONDS_PER_DAY
    }

    /// Length in Mars sols.
    #[inline]
    pub fn to_sols(&self) -> f64 {
        self.seconds / SECONDS_PER_SOL
    }

    /// Typed seconds quantity.
    #[inline]
    pub fn to_quantity(&self) -> Seconds {
        Seconds::new(self.seconds)
    }

    /// Convert to a `chrono::TimeDelta` at nanosecond resolution.
    pub fn to_timedelta(&self) -> TimeResult<TimeDelta> {
        let whole = self.seconds.trunc();
        let nanos = ((self.seconds - whole) * 1e9).round() as i64;
        if !whole.is_finite() || whole.abs() > i64::MAX as f64 / 1000.0 {
            return Err(TimeError::Duration(format!(
                "{} s does not fit a calendar time span",
                self.seconds
            )));
        }
        TimeDelta::try_seconds(whole as i64)
            .map(|d| d + TimeDelta::nanoseconds(nanos))
            .ok_or_else(|| TimeError::Duration(format!("{} s does not fit a calendar time span", self.seconds)))
    }

    #[inline]
    pub fn abs(&self) -> Self {
        Self::from_seconds(self.seconds.abs())
    }

    // ── formatting ────────────────────────────────────────────────────

    /// Fields of the Earth layout rounded to `precision` decimals.
    pub fn components(&self, precision: usize) -> DurationParts {
        DurationParts::split(self.seconds, precision)
    }

    /// Fields of the Mars layout (sols and Mars hours) rounded to `precision`.
    pub fn mars_components(&self, precision: usize) -> DurationParts {
        DurationParts::split(self.seconds / MARS_TIME_SCALE, precision)
    }

    /// Earth layout with `precision` decimals (`0` drops the decimal point).
    ///
    /// ```
    /// use mission_time::Duration;
    /// assert_eq!(Duration::from_seconds(90_000.0).to_string_with_precision(0), "1T01:00:00");
    /// ```
    pub fn to_string_with_precision(&self, precision: usize) -> String {
        self.components(precision).render('T', false)
    }

    /// Mars layout; the `M` marker is always emitted so the text cannot be
    /// mistaken for an Earth duration.
    pub fn to_mars_string(&self, precision: Option<usize>) -> String {
        let precision = precision.unwrap_or_else(settings::duration_precision);
        self.mars_components(precision).render('M', true)
    }

    // ── rounding ──────────────────────────────────────────────────────

    /// Nearest multiple of `resolution`.
    pub fn round(&self, resolution: Duration) -> TimeResult<Self> {
        self.snap(resolution, f64::round)
    }

    /// Smallest multiple of `resolution` not below `self`.
    pub fn ceil(&self, resolution: Duration) -> TimeResult<Self> {
        self.snap(resolution, f64::ceil)
    }

    /// Largest multiple of `resolution` not above `self`.
    pub fn floor(&self, resolution: Duration) -> TimeResult<Self> {
        self.snap(resolution, f64::floor)
    }

    fn snap(&self, resolution: Duration, op: fn(f64) -> f64) -> TimeResult<Self> {
        if resolution.seconds == 0.0 || !resolution.seconds.is_finite() {
            return Err(TimeError::Duration(format!(
                "cannot round to a resolution of {} s",
                resolution.seconds
            )));
        }
        let scale = op(self.seconds / resolution.seconds);
        Ok(Self::from_seconds(scale * resolution.seconds))
    }

    /// Euclidean remainder computed on whole microseconds: the result is
    /// always in `[0, |divisor|)`.
    pub fn modulo(&self, divisor: Duration) -> TimeResult<Self> {
        let lhs = whole_microseconds(self.seconds)?;
        let rhs = whole_microseconds(divisor.seconds)?;
        if rhs == 0 {
            return Err(TimeError::Duration("modulus by a zero-length duration".into()));
        }
        lhs.checked_rem_euclid(rhs)
            .map(|rem| Self::from_seconds(rem as f64 / 1e6))
            .ok_or_else(|| TimeError::Duration(format!("{} s mod {} s overflows", self.seconds, divisor.seconds)))
    }
}

/// `seconds` as whole microseconds; fails outside the `i64` range.
fn whole_microseconds(seconds: f64) -> TimeResult<i64> {
    let micros = (seconds * 1e6).round();
    // i64::MAX is not representable in f64; 2^63 is the first value past it
    if !micros.is_finite() || micros >= 9_223_372_036_854_775_808.0 || micros < -9_223_372_036_854_775_808.0 {
        return Err(TimeError::Duration(format!(
            "{seconds} s is outside the microsecond range of a modulus"
        )));
    }
    Ok(micros as i64)
}

fn clock_fields(caps: &Captures<'_>, text: &str) -> TimeResult<f64> {
    let field = |name| {
        capture_f64(caps, name)
            .ok_or_else(|| TimeError::DurationFormat(format!("bad {name} field in '{text}'")))
    };
    let magnitude = field("days")? * SECONDS_PER_DAY
        + field("hours")? * SECONDS_PER_HOUR
        + field("minutes")? * SECONDS_PER_MINUTE
        + field("seconds")?;
    let negative = caps.name("sign").is_some_and(|m| m.as_str() == "-");
    Ok(if negative { -magnitude } else { magnitude })
}

// ═══════════════════════════════════════════════════════════════════════════
// Trait implementations
// ═══════════════════════════════════════════════════════════════════════════

// ── Display / FromStr ─────────────────────────────────────────────────────

/// Earth layout; honours `{:.N}`, otherwise the configured precision.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or_else(settings::duration_precision);
        f.write_str(&self.to_string_with_precision(precision))
    }
}

impl FromStr for Duration {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Comparison ────────────────────────────────────────────────────────────

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        (self.seconds - other.seconds).abs() < settings::duration_epsilon()
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        epsilon_cmp(self.seconds, other.seconds, settings::duration_epsilon())
    }
}

/// Three-way comparison that treats values closer than `epsilon` as equal.
pub(crate) fn epsilon_cmp(lhs: f64, rhs: f64, epsilon: f64) -> Option<Ordering> {
    if lhs.is_nan() || rhs.is_nan() {
        return None;
    }
    let delta = lhs - rhs;
    Some(if delta.abs() < epsilon {
        Ordering::Equal
    } else if delta < 0.0 {
        Ordering::Less
    } else {
        Ordering::Greater
    })
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_seconds(self.seconds + rhs.seconds)
    }
}

impl AddAssign for Duration {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.seconds += rhs.seconds;
    }
}

impl Sub for Duration {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_seconds(self.seconds - rhs.seconds)
    }
}

impl SubAssign for Duration {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.seconds -= rhs.seconds;
    }
}

impl Neg for Duration {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_seconds(-self.seconds)
    }
}

impl Mul<f64> for Duration {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::from_seconds(self.seconds * rhs)
    }
}

impl Mul<Duration> for f64 {
    type Output = Duration;

    #[inline]
    fn mul(self, rhs: Duration) -> Duration {
        rhs * self
    }
}

impl Div<f64> for Duration {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::from_seconds(self.seconds / rhs)
    }
}

/// Ratio of two spans.
impl Div for Duration {
    type Output = f64;

    #[inline]
    fn div(self, rhs: Self) -> f64 {
        self.seconds / rhs.seconds
    }
}

/// See [`Duration::modulo`].
impl Rem for Duration {
    type Output = TimeResult<Duration>;

    fn rem(self, rhs: Self) -> TimeResult<Duration> {
        self.modulo(rhs)
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

// ── qtty interop ──────────────────────────────────────────────────────────

impl From<Seconds> for Duration {
    fn from(quantity: Seconds) -> Self {
        Self::from_seconds(quantity.value())
    }
}

impl From<Days> for Duration {
    fn from(quantity: Days) -> Self {
        Self::from_seconds(quantity.to::<Second>().value())
    }
}

impl From<Duration> for Days {
    fn from(duration: Duration) -> Self {
        duration.to_quantity().to::<Day>()
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.seconds)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let seconds = f64::deserialize(deserializer)?;
        Ok(Self::from_seconds(seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> Duration {
        Duration::parse(text).expect("valid duration")
    }

    #[test]
    fn parses_earth_layout() {
        assert_eq!(d("01:00:00").to_seconds(), 3_600.0);
        assert_eq!(d("1T01:00:00").to_seconds(), 90_000.0);
        assert_eq!(d("-00:00:01.5").to_seconds(), -1.5);
        assert_eq!(d("  +00:01:00  ").to_seconds(), 60.0);
        assert_eq!(d("48:00:00").to_seconds(), 172_800.0);
    }

    #[test]
    fn parses_mars_layout() {
        let one_mars_hour = d("M01:00:00");
        assert!((one_mars_hour.to_seconds() - 3_600.0 * MARS_TIME_SCALE).abs() < 1e-9);
        let sol = d("1M00:00:00");
        assert!((sol.to_seconds() - SECONDS_PER_SOL).abs() < 1e-6);
        assert!(d("-M00:30:00").to_seconds() < 0.0);
    }

    #[test]
    fn blank_and_empty_sources_are_zero() {
        assert_eq!(d("   ").to_seconds(), 0.0);
        assert_eq!(Duration::new(()).expect("empty"), Duration::ZERO);
        assert_eq!(Duration::new(None::<f64>).expect("none"), Duration::ZERO);
    }

    #[test]
    fn rejects_unknown_layouts() {
        for bad in ["1 hour", "01:00", "1D01:00:00", "T01:00:00", "01:00:00xyz"] {
            let err = Duration::parse(bad).expect_err(bad);
            assert!(matches!(err, TimeError::DurationFormat(_)), "{bad}: {err:?}");
        }
        assert!(matches!(
            Duration::new(f64::NAN),
            Err(TimeError::Duration(_))
        ));
    }

    #[test]
    fn accepts_native_spans() {
        let span = TimeDelta::milliseconds(-2_500);
        assert_eq!(Duration::new(span).expect("span").to_seconds(), -2.5);
        let std_span = std::time::Duration::from_millis(1_250);
        assert_eq!(Duration::new(std_span).expect("std span").to_seconds(), 1.25);
        assert_eq!(Duration::new(42_i64).expect("int").to_seconds(), 42.0);
    }

    #[test]
    fn formats_earth_layout() {
        assert_eq!(Duration::from_seconds(90_000.0).to_string_with_precision(0), "1T01:00:00");
        assert_eq!(Duration::from_seconds(90_000.0).to_string_with_precision(3), "1T01:00:00.000");
        assert_eq!(Duration::from_seconds(-3_661.25).to_string_with_precision(2), "-01:01:01.25");
        assert_eq!(Duration::from_seconds(59.9996).to_string_with_precision(3), "00:01:00.000");
        assert_eq!(format!("{:.1}", Duration::from_seconds(0.04)), "00:00:00.0");
    }

    #[test]
    fn tiny_negative_rounds_to_unsigned_zero() {
        assert_eq!(Duration::from_seconds(-0.0001).to_string_with_precision(3), "00:00:00.000");
    }

    #[test]
    fn formats_mars_layout() {
        assert_eq!(d("02:00:00").to_mars_string(Some(3)), "M01:56:47.359");
        let sols = Duration::from_seconds(2.0 * SECONDS_PER_SOL + 3_600.0 * MARS_TIME_SCALE);
        assert_eq!(sols.to_mars_string(Some(0)), "2M01:00:00");
        assert_eq!((-sols).to_mars_string(Some(0)), "-2M01:00:00");
    }

    #[test]
    fn round_trips_text_at_matching_precision() {
        for text in ["00:00:00", "12:34:56", "3T23:59:59", "-1T00:00:01"] {
            assert_eq!(d(text).to_string_with_precision(0), text);
        }
        for text in ["00:00:00.001", "-05:06:07.890", "10T00:00:00.500"] {
            assert_eq!(d(text).to_string_with_precision(3), text);
        }
    }

    #[test]
    fn arithmetic() {
        let sum = d("02:00:00") + d("01:30:00");
        assert_eq!(sum.to_string_with_precision(0), "03:30:00");
        let a = d("05:00:00.250");
        let b = d("-1T00:00:00");
        assert_eq!((a + b) - b, a);
        assert_eq!(d("01:00:00") * 2.0, d("02:00:00"));
        assert_eq!(0.5 * d("01:00:00"), d("00:30:00"));
        assert_eq!(d("01:00:00") / 4.0, d("00:15:00"));
        assert_eq!(d("03:00:00") / d("01:00:00"), 3.0);
        assert_eq!(-d("01:00:00"), d("-01:00:00"));
        let total: Duration = [d("00:00:10"), d("00:00:20")].into_iter().sum();
        assert_eq!(total, d("00:00:30"));
    }

    #[test]
    fn modulo_is_euclidean() {
        let hour = d("01:00:00");
        assert_eq!(d("02:30:00").modulo(hour).expect("mod"), d("00:30:00"));
        assert_eq!((d("-00:30:00") % hour).expect("mod"), d("00:30:00"));
        assert_eq!((d("02:30:00") % -hour).expect("mod"), d("00:30:00"));
        assert!(matches!(hour % Duration::ZERO, Err(TimeError::Duration(_))));
    }

    #[test]
    fn modulo_rejects_out_of_range_operands() {
        let micro = Duration::from_seconds(-1e-6);
        assert!(matches!(Duration::from_seconds(-1e300).modulo(micro), Err(TimeError::Duration(_))));
        assert!(matches!(Duration::from_seconds(1e20).modulo(d("00:00:07")), Err(TimeError::Duration(_))));
        assert!(matches!(d("00:00:07").modulo(Duration::from_seconds(f64::INFINITY)), Err(TimeError::Duration(_))));
        // large but representable operands keep an exact remainder
        let big = Duration::from_seconds(1e12 + 3.0);
        assert_eq!(big.modulo(d("00:00:07")).expect("mod"), d("00:00:04"));
        assert_eq!(big.modulo(micro).expect("mod"), Duration::ZERO);
    }

    #[test]
    fn epsilon_comparison() {
        let a = Duration::from_seconds(10.0);
        let b = Duration::from_seconds(10.0005);
        assert_eq!(a, b);
        assert!(!(a < b));
        assert!(a <= b && a >= b);
        let c = Duration::from_seconds(10.002);
        assert!(a < c);
        assert!(c > a);
        assert_ne!(a, c);
    }

    #[test]
    fn abs() {
        assert_eq!(d("-01:00:00").abs().to_string_with_precision(0), "01:00:00");
    }

    #[test]
    fn rounding_brackets_value() {
        let value = d("01:07:31.400");
        for res in ["00:00:01", "00:05:00", "00:15:00", "01:00:00"] {
            let r = d(res);
            let lo = value.floor(r).expect("floor");
            let hi = value.ceil(r).expect("ceil");
            let mid = value.round(r).expect("round");
            assert!(lo <= value && value <= hi, "{res}");
            let closer = if (value - lo).abs() <= (hi - value).abs() { lo } else { hi };
            assert_eq!(mid, closer, "{res}");
        }
        assert_eq!(value.round(d("00:15:00")).expect("round"), d("01:15:00"));
        assert!(value.round(Duration::ZERO).is_err());
    }

    #[test]
    fn unit_views() {
        let day = d("1T00:00:00");
        assert_eq!(day.to_hours(), 24.0);
        assert_eq!(day.to_minutes(), 1_440.0);
        assert_eq!(day.to_days(), 1.0);
        assert!((d("1M00:00:00").to_sols() - 1.0).abs() < 1e-12);
        let days: Days = day.into();
        assert!((days.value() - 1.0).abs() < 1e-12);
        assert_eq!(Duration::from(Seconds::new(5.0)), Duration::from_seconds(5.0));
    }

    #[test]
    fn timedelta_round_trip() {
        let span = d("-1T02:03:04.567").to_timedelta().expect("fits");
        assert_eq!(span.num_milliseconds(), -(93_784_567));
        assert!(Duration::from_seconds(1e30).to_timedelta().is_err());
    }

    #[test]
    fn components_expose_fields() {
        let parts = d("-2T03:04:05.678").components(3);
        assert!(parts.negative);
        assert_eq!((parts.days, parts.hours, parts.minutes, parts.seconds), (2, 3, 4, 5));
        assert_eq!(parts.fraction, 678);
        assert!((parts.fractional_seconds() - 5.678).abs() < 1e-12);
        assert_eq!(parts.clock(), "03:04:05.678");
    }
}
