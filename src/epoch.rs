// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Instants written relative to a named mission epoch.
//!
//! An [`EpochRelativeTime`] such as `LAUNCH+1T02:00:00` resolves its epoch
//! in an [`EpochRegistry`] once, at construction, and keeps the symbolic
//! form for display.  Adding or subtracting a [`Duration`] only moves the
//! offset; differences with other instants are ordinary [`Time`]
//! differences.
//!
//! ```
//! use mission_time::{Duration, EpochRegistry, EpochRelativeTime, Time};
//!
//! let registry = EpochRegistry::new();
//! registry.add("LAUNCH", Time::from_et(0.0));
//! let t = EpochRelativeTime::parse_in("LAUNCH+01:00:00", &registry).unwrap();
//! let later = t + Duration::from_hours(1.0);
//! assert_eq!(later.to_string(), "LAUNCH+02:00:00.000");
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Sub, SubAssign};
use std::str::FromStr;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::duration::Duration;
use crate::error::{TimeError, TimeResult};
use crate::formats::EPOCH_RELATIVE_REGEX;
use crate::instant::{Time, TimeSource};
use crate::settings;

// ═══════════════════════════════════════════════════════════════════════════
// EpochRegistry
// ═══════════════════════════════════════════════════════════════════════════

static GLOBAL_EPOCHS: Lazy<EpochRegistry> = Lazy::new(EpochRegistry::new);

/// Named epochs, safe to share between threads.
#[derive(Debug, Default)]
pub struct EpochRegistry {
    epochs: RwLock<HashMap<String, Time>>,
}

impl EpochRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by [`EpochRelativeTime::parse`].
    pub fn global() -> &'static EpochRegistry {
        &GLOBAL_EPOCHS
    }

    /// Define or redefine `name`.
    pub fn add(&self, name: impl Into<String>, time: Time) {
        let name = name.into();
        debug!(epoch = %name, et = time.to_et(), "epoch defined");
        self.epochs.write().insert(name, time);
    }

    pub fn remove(&self, name: &str) -> Option<Time> {
        let removed = self.epochs.write().remove(name);
        if removed.is_some() {
            debug!(epoch = name, "epoch removed");
        }
        removed
    }

    /// Replace every epoch.
    pub fn set_all(&self, epochs: impl IntoIterator<Item = (String, Time)>) {
        let epochs: HashMap<String, Time> = epochs.into_iter().collect();
        debug!(count = epochs.len(), "epochs replaced");
        *self.epochs.write() = epochs;
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.epochs.read().contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Time> {
        self.epochs.read().get(name).copied()
    }

    /// Snapshot of every epoch.
    pub fn get_all(&self) -> HashMap<String, Time> {
        self.epochs.read().clone()
    }

    fn resolve(&self, name: &str) -> TimeResult<Time> {
        self.get(name).ok_or_else(|| {
            let mut known: Vec<String> = self.epochs.read().keys().cloned().collect();
            known.sort();
            TimeError::EpochRelativeTime(format!(
                "epoch '{name}' is not defined; known epochs: [{}]",
                known.join(", ")
            ))
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// EpochRelativeTime
// ═══════════════════════════════════════════════════════════════════════════

/// An instant kept as `EPOCH±OFFSET`.
///
/// Dereferences to the resolved [`Time`], so every conversion of `Time`
/// is available.  The epoch is looked up once, when the value is built.
#[derive(Debug, Clone)]
pub struct EpochRelativeTime {
    epoch_name: String,
    offset: Duration,
    time: Time,
}

impl EpochRelativeTime {
    /// Parse `NAME±DURATION` against the global registry.
    pub fn parse(text: &str) -> TimeResult<Self> {
        Self::parse_in(text, EpochRegistry::global())
    }

    pub fn parse_in(text: &str, registry: &EpochRegistry) -> TimeResult<Self> {
        let caps = EPOCH_RELATIVE_REGEX.captures(text.trim()).ok_or_else(|| {
            TimeError::EpochRelativeTimeFormat(format!("'{text}' does not match EPOCH±DURATION"))
        })?;
        let magnitude = Duration::parse(&caps["offset"])
            .map_err(|e| TimeError::EpochRelativeTimeFormat(format!("bad offset in '{text}': {e}")))?;
        let offset = if &caps["relative_sign"] == "-" { -magnitude } else { magnitude };
        Self::new_in(&caps["epoch_name"], offset, registry)
    }

    /// `offset` after the globally registered `epoch_name`.
    pub fn new(epoch_name: &str, offset: Duration) -> TimeResult<Self> {
        Self::new_in(epoch_name, offset, EpochRegistry::global())
    }

    pub fn new_in(epoch_name: &str, offset: Duration, registry: &EpochRegistry) -> TimeResult<Self> {
        let epoch = registry.resolve(epoch_name)?;
        Ok(Self {
            epoch_name: epoch_name.to_owned(),
            offset,
            time: epoch + offset,
        })
    }

    pub fn epoch_name(&self) -> &str {
        &self.epoch_name
    }

    pub fn offset(&self) -> Duration {
        self.offset
    }

    /// Instant of the epoch itself.
    pub fn epoch(&self) -> Time {
        self.time - self.offset
    }

    pub fn time(&self) -> Time {
        self.time
    }

    fn shifted(&self, by: Duration) -> Self {
        Self {
            epoch_name: self.epoch_name.clone(),
            offset: self.offset + by,
            time: self.time + by,
        }
    }
}

impl Deref for EpochRelativeTime {
    type Target = Time;

    fn deref(&self) -> &Time {
        &self.time
    }
}

impl AsRef<Time> for EpochRelativeTime {
    fn as_ref(&self) -> &Time {
        &self.time
    }
}

impl From<EpochRelativeTime> for Time {
    fn from(relative: EpochRelativeTime) -> Self {
        relative.time
    }
}

impl From<&EpochRelativeTime> for TimeSource<'_> {
    fn from(relative: &EpochRelativeTime) -> Self {
        TimeSource::Time(relative.time)
    }
}

/// `NAME+OFFSET` or `NAME-OFFSET` with the offset in the Earth layout;
/// honours `{:.N}`.
impl fmt::Display for EpochRelativeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or_else(settings::duration_precision);
        let sign = if self.offset >= Duration::ZERO { '+' } else { '-' };
        write!(
            f,
            "{}{sign}{}",
            self.epoch_name,
            self.offset.abs().to_string_with_precision(precision)
        )
    }
}

impl FromStr for EpochRelativeTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Comparison ────────────────────────────────────────────────────────────

impl PartialEq for EpochRelativeTime {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl PartialEq<Time> for EpochRelativeTime {
    fn eq(&self, other: &Time) -> bool {
        self.time == *other
    }
}

impl PartialOrd for EpochRelativeTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.time.partial_cmp(&other.time)
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

/// Shifts the offset and keeps the epoch instant resolved at construction;
/// the registry is not consulted again, so a later [`EpochRegistry::add`]
/// or [`EpochRegistry::set_all`] does not move the result.
impl Add<Duration> for EpochRelativeTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        self.shifted(rhs)
    }
}

/// Keeps the epoch instant resolved at construction, as the owned form does.
impl Add<Duration> for &EpochRelativeTime {
    type Output = EpochRelativeTime;

    fn add(self, rhs: Duration) -> EpochRelativeTime {
        self.shifted(rhs)
    }
}

impl AddAssign<Duration> for EpochRelativeTime {
    fn add_assign(&mut self, rhs: Duration) {
        self.offset += rhs;
        self.time += rhs;
    }
}

impl Sub<Duration> for EpochRelativeTime {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self {
        self.shifted(-rhs)
    }
}

impl Sub<Duration> for &EpochRelativeTime {
    type Output = EpochRelativeTime;

    fn sub(self, rhs: Duration) -> EpochRelativeTime {
        self.shifted(-rhs)
    }
}

impl SubAssign<Duration> for EpochRelativeTime {
    fn sub_assign(&mut self, rhs: Duration) {
        self.offset -= rhs;
        self.time -= rhs;
    }
}

impl Sub for &EpochRelativeTime {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.time - rhs.time
    }
}

impl Sub<Time> for &EpochRelativeTime {
    type Output = Duration;

    fn sub(self, rhs: Time) -> Duration {
        self.time - rhs
    }
}

impl Sub<&EpochRelativeTime> for Time {
    type Output = Duration;

    fn sub(self, rhs: &EpochRelativeTime) -> Duration {
        self - rhs.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> EpochRegistry {
        let registry = EpochRegistry::new();
        registry.add("LAUNCH", Time::from_et(1_000.0));
        registry.add("EDL", Time::from_et(5_000_000.0));
        registry
    }

    fn d(text: &str) -> Duration {
        Duration::parse(text).expect("valid duration")
    }

    #[test]
    fn parses_and_displays_symbolically() {
        let registry = registry();
        let t = EpochRelativeTime::parse_in("LAUNCH+01:00:00", &registry).expect("parse");
        assert_eq!(t.epoch_name(), "LAUNCH");
        assert_eq!(t.offset(), d("01:00:00"));
        assert_eq!(t.time(), Time::from_et(4_600.0));
        assert_eq!(t.epoch(), Time::from_et(1_000.0));
        assert_eq!(t.to_string(), "LAUNCH+01:00:00.000");
        assert_eq!(format!("{t:.0}"), "LAUNCH+01:00:00");

        let edl = EpochRelativeTime::parse_in(" EDL - 1T02:00:00 ", &registry).expect("parse");
        assert_eq!(edl.to_string(), "EDL-1T02:00:00.000");
    }

    #[test]
    fn mars_offsets_are_shown_in_earth_units() {
        let t = EpochRelativeTime::parse_in("EDL-M00:30:00", &registry()).expect("parse");
        assert_eq!(t.to_string(), "EDL-00:30:49.484");
    }

    #[test]
    fn duration_arithmetic_keeps_the_epoch() {
        let registry = registry();
        let t = EpochRelativeTime::parse_in("LAUNCH+01:00:00", &registry).expect("parse");
        let later = &t + d("01:00:00");
        assert_eq!(later.to_string(), "LAUNCH+02:00:00.000");
        let earlier = &t - d("02:00:00");
        assert_eq!(earlier.to_string(), "LAUNCH-01:00:00.000");
        assert_eq!(&later - &earlier, d("03:00:00"));

        let mut moving = t.clone();
        moving += d("00:30:00");
        moving -= d("00:10:00");
        assert_eq!(moving.to_string(), "LAUNCH+01:20:00.000");
    }

    #[test]
    fn arithmetic_ignores_later_registry_changes() {
        let registry = registry();
        let t = EpochRelativeTime::parse_in("LAUNCH+00:00:10", &registry).expect("parse");
        registry.add("LAUNCH", Time::from_et(9_000.0));
        let later = &t + d("00:00:10");
        assert_eq!(later.epoch(), Time::from_et(1_000.0));
        assert_eq!(later.time(), Time::from_et(1_020.0));

        registry.set_all([("LAUNCH".to_owned(), Time::from_et(0.0))]);
        let earlier = t - d("00:00:05");
        assert_eq!(*earlier, Time::from_et(1_005.0));
        let reread = EpochRelativeTime::parse_in(&earlier.to_string(), &registry).expect("parse");
        assert_eq!(*reread, Time::from_et(5.0));
    }

    #[test]
    fn mixed_subtraction_is_absolute() {
        let registry = registry();
        let launch = EpochRelativeTime::parse_in("LAUNCH+00:00:10", &registry).expect("parse");
        let edl = EpochRelativeTime::parse_in("EDL+00:00:00", &registry).expect("parse");
        assert_eq!(&edl - &launch, Duration::from_seconds(4_998_990.0));
        assert_eq!(&launch - Time::from_et(1_000.0), d("00:00:10"));
        assert_eq!(Time::from_et(1_020.0) - &launch, d("00:00:10"));
        assert!(launch < edl);
        assert_eq!(launch, Time::from_et(1_010.0));
    }

    #[test]
    fn errors_distinguish_syntax_from_unknown_epoch() {
        let registry = registry();
        let err = EpochRelativeTime::parse_in("LAUNCH plus an hour", &registry).expect_err("syntax");
        assert!(matches!(err, TimeError::EpochRelativeTimeFormat(_)), "{err:?}");
        let err = EpochRelativeTime::parse_in("DOCKING+01:00:00", &registry).expect_err("unknown");
        assert!(matches!(err, TimeError::EpochRelativeTime(ref m) if m.contains("EDL, LAUNCH")), "{err:?}");
        assert!(err.is_time_error());
    }

    #[test]
    fn registry_lifecycle() {
        let registry = registry();
        assert!(registry.is_defined("LAUNCH"));
        assert_eq!(registry.get_all().len(), 2);
        assert_eq!(registry.remove("LAUNCH"), Some(Time::from_et(1_000.0)));
        assert!(!registry.is_defined("LAUNCH"));
        assert_eq!(registry.remove("LAUNCH"), None);
        registry.set_all([("SOL0".to_owned(), Time::from_et(7.0))]);
        assert_eq!(registry.get("SOL0"), Some(Time::from_et(7.0)));
        assert!(!registry.is_defined("EDL"));
    }

    #[test]
    fn global_registry_backs_parse() {
        EpochRegistry::global().add("UNIT_TEST_EPOCH", Time::from_et(50.0));
        let t: EpochRelativeTime = "UNIT_TEST_EPOCH+00:00:10".parse().expect("parse");
        assert_eq!(*t, Time::from_et(60.0));
        let direct = EpochRelativeTime::new("UNIT_TEST_EPOCH", d("00:00:10")).expect("new");
        assert_eq!(direct, t);
        EpochRegistry::global().remove("UNIT_TEST_EPOCH");
    }
}
