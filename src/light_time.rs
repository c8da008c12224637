// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Signal propagation delay between a spacecraft and a ground body.
//!
//! The leg computed depends on which end of the link the given instant
//! belongs to:
//!
//! | Reference | Downleg (spacecraft → ground) | Upleg (ground → spacecraft) |
//! |-----------|-------------------------------|-----------------------------|
//! | SCET | leaves the spacecraft at `t` | reaches the spacecraft at `t` |
//! | ERT / ETT | reaches the ground at `t` | leaves the ground at `t` |
//!
//! Round trip light time chains a downleg with the upleg that starts when
//! the downleg arrives, rather than doubling one leg.

use std::fmt;
use std::str::FromStr;

use crate::analytic::EARTH_ID;
use crate::duration::Duration;
use crate::error::{TimeError, TimeResult};
use crate::instant::{Time, TimeSource};
use crate::provider::{self, Direction};
use crate::settings;

/// Which end of the link an instant is measured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeReference {
    /// Spacecraft event time.
    Scet,
    /// Earth received time.
    Ert,
    /// Earth transmit time.
    Ett,
}

impl FromStr for TimeReference {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCET" => Ok(Self::Scet),
            "ERT" => Ok(Self::Ert),
            "ETT" => Ok(Self::Ett),
            other => Err(TimeError::TimeConversion(format!(
                "unknown time reference '{other}', expected SCET, ERT or ETT"
            ))),
        }
    }
}

impl fmt::Display for TimeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scet => "SCET",
            Self::Ert => "ERT",
            Self::Ett => "ETT",
        })
    }
}

/// Light time for one spacecraft/body pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightTimeCalculator {
    spacecraft_id: i32,
    body_id: i32,
}

impl LightTimeCalculator {
    pub const fn new(spacecraft_id: i32, body_id: i32) -> Self {
        Self { spacecraft_id, body_id }
    }

    /// Link between `spacecraft_id` (configured spacecraft when `None`)
    /// and Earth.
    pub fn to_earth(spacecraft_id: Option<i32>) -> TimeResult<Self> {
        Ok(Self::new(settings::resolve_spacecraft_id(spacecraft_id)?, EARTH_ID))
    }

    pub const fn spacecraft_id(&self) -> i32 {
        self.spacecraft_id
    }

    pub const fn body_id(&self) -> i32 {
        self.body_id
    }

    /// One-way light time between `target_id` and `observer_id` at `time`.
    ///
    /// With [`Direction::Transmit`] the signal leaves the target at `time`;
    /// with [`Direction::Receive`] it reaches the target at `time`.  Every
    /// provider failure surfaces as [`TimeError::TimeConversion`].
    pub fn owlt(time: &Time, target_id: i32, direction: Direction, observer_id: i32) -> TimeResult<Duration> {
        let seconds = provider::current()?
            .light_time(time.to_et(), target_id, direction, observer_id)
            .map_err(|e| {
                TimeError::TimeConversion(format!(
                    "light time {target_id} {direction} {observer_id} at {time}: {}",
                    e.0
                ))
            })?;
        Ok(Duration::from_seconds(seconds))
    }

    /// Spacecraft-to-body leg.
    pub fn downleg(&self, time: &Time, reference: TimeReference) -> TimeResult<Duration> {
        match reference {
            TimeReference::Scet => Self::owlt(time, self.spacecraft_id, Direction::Transmit, self.body_id),
            TimeReference::Ert | TimeReference::Ett => {
                Self::owlt(time, self.body_id, Direction::Receive, self.spacecraft_id)
            }
        }
    }

    /// Body-to-spacecraft leg.
    pub fn upleg(&self, time: &Time, reference: TimeReference) -> TimeResult<Duration> {
        match reference {
            TimeReference::Scet => Self::owlt(time, self.spacecraft_id, Direction::Receive, self.body_id),
            TimeReference::Ert | TimeReference::Ett => {
                Self::owlt(time, self.body_id, Direction::Transmit, self.spacecraft_id)
            }
        }
    }

    /// Downleg at `time` plus the upleg starting when it arrives.
    pub fn rtlt(&self, time: &Time, reference: TimeReference) -> TimeResult<Duration> {
        let down = self.downleg(time, reference)?;
        let up = self.upleg(&(*time + down), reference)?;
        Ok(down + up)
    }

    /// Instant the ground receives a signal sent at spacecraft event `scet`.
    pub fn ert(&self, scet: &Time) -> TimeResult<Time> {
        Ok(*scet + self.downleg(scet, TimeReference::Scet)?)
    }

    /// Instant the ground must transmit to reach the spacecraft at `scet`.
    pub fn ett(&self, scet: &Time) -> TimeResult<Time> {
        Ok(*scet - self.upleg(scet, TimeReference::Scet)?)
    }

    /// [`LightTimeCalculator::ert`] as UTC text.
    pub fn to_ert(&self, scet: &Time) -> TimeResult<String> {
        self.ert(scet)?.to_utc()
    }

    /// [`LightTimeCalculator::ett`] as UTC text.
    pub fn to_ett(&self, scet: &Time) -> TimeResult<String> {
        self.ett(scet)?.to_utc()
    }

    /// Spacecraft event time of a signal received on the ground at `ert`.
    pub fn from_ert(&self, ert: &Time) -> TimeResult<Time> {
        Ok(*ert - self.downleg(ert, TimeReference::Ert)?)
    }

    /// Spacecraft event time of a signal transmitted from the ground at `ett`.
    pub fn from_ett(&self, ett: &Time) -> TimeResult<Time> {
        Ok(*ett + self.upleg(ett, TimeReference::Ett)?)
    }
}

// Conveniences for the configured spacecraft and Earth.
impl Time {
    pub fn to_ert(&self) -> TimeResult<String> {
        LightTimeCalculator::to_earth(None)?.to_ert(self)
    }

    pub fn to_ett(&self) -> TimeResult<String> {
        LightTimeCalculator::to_earth(None)?.to_ett(self)
    }

    /// SCET of a signal received on Earth at `ert`.
    pub fn from_ert<'a>(ert: impl Into<TimeSource<'a>>) -> TimeResult<Self> {
        LightTimeCalculator::to_earth(None)?.from_ert(&Self::new(ert)?)
    }

    /// SCET of a signal transmitted from Earth at `ett`.
    pub fn from_ett<'a>(ett: impl Into<TimeSource<'a>>) -> TimeResult<Self> {
        LightTimeCalculator::to_earth(None)?.from_ett(&Self::new(ett)?)
    }

    pub fn downleg(&self, reference: TimeReference) -> TimeResult<Duration> {
        LightTimeCalculator::to_earth(None)?.downleg(self, reference)
    }

    pub fn upleg(&self, reference: TimeReference) -> TimeResult<Duration> {
        LightTimeCalculator::to_earth(None)?.upleg(self, reference)
    }

    pub fn rtlt(&self, reference: TimeReference) -> TimeResult<Duration> {
        LightTimeCalculator::to_earth(None)?.rtlt(self, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{install_reference_provider, LANDER};

    fn t(text: &str) -> Time {
        install_reference_provider();
        Time::parse(text).expect("valid time")
    }

    fn lander() -> LightTimeCalculator {
        LightTimeCalculator::new(LANDER, EARTH_ID)
    }

    #[test]
    fn reference_parsing() {
        assert_eq!("scet".parse::<TimeReference>().expect("scet"), TimeReference::Scet);
        assert_eq!(" ERT ".parse::<TimeReference>().expect("ert"), TimeReference::Ert);
        assert!(matches!("UTC".parse::<TimeReference>(), Err(TimeError::TimeConversion(_))));
        assert_eq!(TimeReference::Ett.to_string(), "ETT");
    }

    #[test]
    fn mars_earth_legs_are_minutes() {
        let time = t("2022-200T00:00:00");
        let down = lander().downleg(&time, TimeReference::Scet).expect("down");
        let up = lander().upleg(&time, TimeReference::Scet).expect("up");
        for leg in [down, up] {
            assert!((180.0..1_400.0).contains(&leg.to_seconds()), "{leg}");
        }
        // the planets move little in one light time
        assert!((down - up).to_seconds().abs() < 1.0);
    }

    #[test]
    fn round_trip_chains_the_legs() {
        let time = t("2022-200T00:00:00");
        let calc = lander();
        let down = calc.downleg(&time, TimeReference::Scet).expect("down");
        let up = calc.upleg(&(time + down), TimeReference::Scet).expect("up");
        assert_eq!(calc.rtlt(&time, TimeReference::Scet).expect("rtlt"), down + up);
        assert_eq!(time.rtlt(TimeReference::Scet).expect("rtlt"), down + up);
    }

    #[test]
    fn ert_and_ett_invert() {
        let scet = t("2022-250T12:00:00");
        let calc = lander();
        let ert = calc.ert(&scet).expect("ert");
        assert!(ert > scet);
        assert!((calc.from_ert(&ert).expect("from ert") - scet).to_seconds().abs() < 0.01);
        let ett = calc.ett(&scet).expect("ett");
        assert!(ett < scet);
        assert!((calc.from_ett(&ett).expect("from ett") - scet).to_seconds().abs() < 0.01);
        assert_eq!(scet.to_ert().expect("ert"), ert.to_utc().expect("utc"));
        let text = ert.to_utc().expect("utc");
        assert!((Time::from_ert(&text).expect("from ert") - scet).to_seconds().abs() < 0.01);
    }

    #[test]
    fn provider_failures_become_conversion_errors() {
        let time = t("2022-200T00:00:00");
        let err = LightTimeCalculator::owlt(&time, -5, Direction::Transmit, EARTH_ID).expect_err("unknown body");
        assert!(matches!(err, TimeError::TimeConversion(_)), "{err:?}");
        assert_eq!(
            LightTimeCalculator::owlt(&time, LANDER, Direction::Receive, 499).expect("same planet"),
            Duration::ZERO
        );
    }
}
