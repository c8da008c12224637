// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Mars local solar time on [`Time`].
//!
//! Two sol-indexed clocks are supported:
//!
//! | Clock | Layout | Source |
//! |-------|--------|--------|
//! | LMST (local mean solar time) | `Sol-0123M13:45:00.250` | provider LMST pseudo-clock |
//! | LTST (local true solar time) | `Sol-0123T13:02:11` | provider solar longitude |
//!
//! LMST is a linear clock, so both directions are exact up to tick
//! rounding.  LTST adds the equation of time; the instant → LTST direction
//! asks the provider directly, while LTST → instant uses a bracketed
//! approximation accurate to about a second (see [`Time::from_ltst`]).
//!
//! The instant of `Sol-0000M00:00:00` is cached per LMST clock on first use.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::analytic::MARS_ID;
use crate::duration::{Duration, DurationParts};
use crate::error::{TimeError, TimeResult};
use crate::formats::{
    capture_i64, LMST_REGEX, LTST_REGEX, MARS_TIME_SCALE, PROVIDER_LMST_REGEX, SECONDS_PER_DAY,
};
use crate::instant::Time;
use crate::provider;
use crate::settings;

static LMST_EPOCHS: Lazy<RwLock<HashMap<i32, Time>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Refinement rounds of [`Time::from_ltst_iterative`].
const LTST_MAX_ITERATIONS: usize = 16;

/// Half of a Mars solar day on the LMST clock face.
fn half_sol() -> Duration {
    Duration::from_hours(12.0) * MARS_TIME_SCALE
}

// ═══════════════════════════════════════════════════════════════════════════
// SolTime / Meridiem
// ═══════════════════════════════════════════════════════════════════════════

/// A sol number and the clock face within that sol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolTime {
    pub sol: u64,
    /// Clock face; `days` is always zero and `negative` always false.
    pub clock: DurationParts,
}

impl SolTime {
    /// Mars clock-face seconds since local midnight.
    pub fn seconds_of_sol(&self) -> f64 {
        self.clock.time_of_day()
    }

    /// Sol number plus the elapsed fraction of the sol.
    pub fn fractional_sols(&self) -> f64 {
        self.sol as f64 + self.seconds_of_sol() / SECONDS_PER_DAY
    }

    pub fn meridiem(&self) -> Meridiem {
        if self.clock.hours >= 12 {
            Meridiem::Pm
        } else {
            Meridiem::Am
        }
    }
}

/// LMST layout: `Sol-NNNNMHH:MM:SS[.fff]`.
impl fmt::Display for SolTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sol-{:04}M{}", self.sol, self.clock.clock())
    }
}

/// Half of the local sol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meridiem {
    Am,
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        })
    }
}

/// LMST clock for a solar-time call: the explicit id, else the configured
/// LMST clock, else the one paired with the given or configured spacecraft.
fn lmst_clock_for(lmst_sclk_id: Option<i32>, spacecraft_id: Option<i32>) -> TimeResult<i32> {
    settings::resolve_lmst_sclk_id(lmst_sclk_id).or_else(|_| {
        let spacecraft = settings::resolve_spacecraft_id(spacecraft_id).map_err(|_| {
            TimeError::TimeConversion("no spacecraft or LMST clock id given and none configured".into())
        })?;
        settings::lmst_sclk_id_for(spacecraft)
    })
}

/// Fold a provider clock string (`[p/]sol:hh:mm:ss:ticks`) into a
/// [`SolTime`] rounded to `precision`, carrying a rounded-up midnight into
/// the next sol.
fn parse_provider_lmst(text: &str, precision: usize) -> TimeResult<SolTime> {
    let malformed = || TimeError::TimeFormat(format!("provider LMST '{text}' is not sol:hh:mm:ss:ticks"));
    let caps = PROVIDER_LMST_REGEX.captures(text.trim()).ok_or_else(malformed)?;
    let field = |name| capture_i64(&caps, name).ok_or_else(malformed);
    let ticks = field("ticks")? as f64 / f64::from(settings::lmst_fractional_part());
    let seconds = (field("hours")? * 3_600 + field("minutes")? * 60 + field("seconds")?) as f64 + ticks;
    let mut clock = Duration::from_seconds(seconds).components(precision);
    let sol = field("sol")? as u64 + clock.days;
    clock.days = 0;
    Ok(SolTime { sol, clock })
}

impl Time {
    // ── LMST ──────────────────────────────────────────────────────────

    /// Parse `Sol-NNNNMHH:MM:SS[.fff]` with the configured LMST clock.
    pub fn from_lmst(text: &str) -> TimeResult<Self> {
        Self::from_lmst_with(text, None)
    }

    /// Parse LMST text with an explicit LMST clock id.
    ///
    /// The decimal part is read as a fraction of a second and converted to
    /// ticks of the LMST clock (see [`Time::set_lmst_fractional_part`]).
    pub fn from_lmst_with(text: &str, lmst_sclk_id: Option<i32>) -> TimeResult<Self> {
        let caps = LMST_REGEX
            .captures(text.trim())
            .ok_or_else(|| TimeError::TimeFormat(format!("'{text}' does not match Sol-NNNNMHH:MM:SS[.fff]")))?;
        let decimal = match caps.name("decimal") {
            Some(m) => format!("0.{}", m.as_str())
                .parse::<f64>()
                .map_err(|_| TimeError::TimeFormat(format!("bad decimal in '{text}'")))?,
            None => 0.0,
        };
        let ticks = (f64::from(settings::lmst_fractional_part()) * decimal).round() as u64;
        let clock = format!(
            "{}:{}:{}:{}:{}",
            &caps["sol"], &caps["hours"], &caps["minutes"], &caps["seconds"], ticks
        );
        let id = settings::resolve_lmst_sclk_id(lmst_sclk_id)?;
        let et = provider::current()?.sclk_to_continuous(id, &clock)?;
        Ok(Self::from_et(et))
    }

    /// LMST text at the configured precision and clock.
    pub fn to_lmst(&self) -> TimeResult<String> {
        self.to_lmst_with(None, None)
    }

    pub fn to_lmst_with(&self, precision: Option<usize>, lmst_sclk_id: Option<i32>) -> TimeResult<String> {
        Ok(self.lmst_parts(precision, lmst_sclk_id)?.to_string())
    }

    /// Sol and clock face of this instant on the LMST clock.
    pub fn lmst_parts(&self, precision: Option<usize>, lmst_sclk_id: Option<i32>) -> TimeResult<SolTime> {
        let id = settings::resolve_lmst_sclk_id(lmst_sclk_id)?;
        let epoch = Self::lmst_epoch(Some(id))?;
        if *self < epoch {
            return Err(TimeError::TimeConversion(format!(
                "{self} precedes the LMST epoch of clock {id} ({epoch})"
            )));
        }
        let precision = precision.unwrap_or_else(settings::time_precision);
        let clock = provider::current()?.continuous_to_sclk(id, self.to_et())?;
        parse_provider_lmst(&clock, precision)
    }

    /// [`Meridiem::Pm`] from LMST noon on.
    pub fn to_lmst_am_pm(&self, lmst_sclk_id: Option<i32>) -> TimeResult<Meridiem> {
        Ok(self.lmst_parts(None, lmst_sclk_id)?.meridiem())
    }

    /// Current LMST sol number.
    pub fn to_sols(&self) -> TimeResult<u64> {
        Ok(self.lmst_parts(None, None)?.sol)
    }

    /// LMST sol number plus the elapsed fraction of the sol.
    pub fn to_fractional_sols(&self) -> TimeResult<f64> {
        Ok(self.lmst_parts(None, None)?.fractional_sols())
    }

    /// Inverse of [`Time::to_fractional_sols`].
    pub fn from_fractional_sols(fractional_sols: f64) -> TimeResult<Self> {
        if !fractional_sols.is_finite() || fractional_sols < 0.0 {
            return Err(TimeError::TimeFormat(format!(
                "{fractional_sols} is not a non-negative sol count"
            )));
        }
        let sols = fractional_sols.trunc();
        let seconds = (fractional_sols - sols) * SECONDS_PER_DAY;
        let mut clock = Duration::from_seconds(seconds).components(settings::time_precision());
        let sol = sols as u64 + clock.days;
        clock.days = 0;
        Self::from_lmst(&SolTime { sol, clock }.to_string())
    }

    /// Instant of `Sol-0000M00:00:00` on an LMST clock, cached per clock.
    pub fn lmst_epoch(lmst_sclk_id: Option<i32>) -> TimeResult<Self> {
        let id = settings::resolve_lmst_sclk_id(lmst_sclk_id)?;
        if let Some(epoch) = LMST_EPOCHS.read().get(&id) {
            return Ok(*epoch);
        }
        let epoch = Self::from_lmst_with("Sol-0000M00:00:00", Some(id))?;
        debug!(lmst_sclk_id = id, et = epoch.to_et(), "cached LMST epoch");
        LMST_EPOCHS.write().insert(id, epoch);
        Ok(epoch)
    }

    /// Like [`Time::round`], measured from the start of the current sol
    /// when `reference` is `None`.  Use Mars durations (`M01:00:00`) for
    /// resolutions that land on LMST clock marks.
    pub fn round_lmst(&self, resolution: Duration, reference: Option<Time>) -> TimeResult<Self> {
        self.snap(resolution, Some(self.sol_start(reference)?), Duration::round)
    }

    pub fn ceil_lmst(&self, resolution: Duration, reference: Option<Time>) -> TimeResult<Self> {
        self.snap(resolution, Some(self.sol_start(reference)?), Duration::ceil)
    }

    pub fn floor_lmst(&self, resolution: Duration, reference: Option<Time>) -> TimeResult<Self> {
        self.snap(resolution, Some(self.sol_start(reference)?), Duration::floor)
    }

    fn sol_start(&self, reference: Option<Time>) -> TimeResult<Self> {
        match reference {
            Some(reference) => Ok(reference),
            None => Self::from_lmst(&format!("Sol-{:04}M00:00:00", self.to_sols()?)),
        }
    }

    // ── LTST ──────────────────────────────────────────────────────────

    /// LTST text for the configured spacecraft.
    pub fn to_ltst(&self) -> TimeResult<String> {
        self.to_ltst_with(None, None)
    }

    /// LTST text at the surface position of `spacecraft_id`, stamped with
    /// the sol of the LMST reading of `lmst_sclk_id`.
    ///
    /// The two clocks never differ by more than half a sol, so when they
    /// straddle midnight the LMST sol is moved by one.
    pub fn to_ltst_with(&self, spacecraft_id: Option<i32>, lmst_sclk_id: Option<i32>) -> TimeResult<String> {
        let spacecraft = settings::resolve_spacecraft_id(spacecraft_id)?;
        let lmst_id = lmst_clock_for(lmst_sclk_id, Some(spacecraft))?;
        let provider = provider::current()?;
        let longitude = provider.body_longitude(self.to_et(), spacecraft)?;
        let (hours, minutes, seconds) = provider.local_solar_time(self.to_et(), MARS_ID, longitude)?;

        let lmst = self.lmst_parts(None, Some(lmst_id))?;
        let lmst_of_day = Duration::from_seconds(lmst.seconds_of_sol());
        let ltst_of_day = Duration::from_seconds(f64::from(hours * 3_600 + minutes * 60 + seconds));
        let offset = Duration::from_hours(12.0);
        let sol = if lmst_of_day > ltst_of_day + offset {
            lmst.sol + 1
        } else if lmst_of_day + offset < ltst_of_day {
            lmst.sol.checked_sub(1).ok_or_else(|| {
                TimeError::TimeConversion(format!("{self} is on the LTST sol before sol 0"))
            })?
        } else {
            lmst.sol
        };
        Ok(format!("Sol-{sol:04}T{hours:02}:{minutes:02}:{seconds:02}"))
    }

    /// Instant of an LTST string for the configured spacecraft.
    pub fn from_ltst(text: &str) -> TimeResult<Self> {
        Self::from_ltst_with(text, None, None)
    }

    /// Instant of an LTST string, accurate to about one second.
    ///
    /// 1. Read the LTST clock face as LMST to get a first guess `t1`.
    /// 2. Refuse when `t1` lies within twelve Earth hours of the LMST epoch.
    /// 3. Read the LTST at `t1`.
    /// 4. Read the LTST half a sol before and after `t1`.
    /// 5. Scale factor: LMST span of the bracket over its LTST span.
    /// 6. Correct `t1` by the LTST−LMST offset at `t1` times that factor.
    ///
    /// [`Time::from_ltst_iterative`] trades speed for accuracy.
    pub fn from_ltst_with(text: &str, spacecraft_id: Option<i32>, lmst_sclk_id: Option<i32>) -> TimeResult<Self> {
        let lmst_id = lmst_clock_for(lmst_sclk_id, spacecraft_id)?;
        let as_lmst = |ltst: &str| Self::from_lmst_with(&ltst_as_lmst(ltst)?, Some(lmst_id));
        let ltst_at = |time: Time| time.to_ltst_with(spacecraft_id, Some(lmst_id));

        let epoch = Self::lmst_epoch(Some(lmst_id))?;
        let first = as_lmst(text)?;
        if first - epoch < Duration::from_hours(12.0) {
            return Err(TimeError::TimeConversion(format!(
                "'{text}' is within 12 hours of the LMST epoch, where the LTST inverse is unreliable"
            )));
        }
        let second = ltst_at(first)?;

        let pre = first - half_sol();
        let post = first + half_sol();
        let lmst_span = post - pre;
        let ltst_span = as_lmst(&ltst_at(post)?)? - as_lmst(&ltst_at(pre)?)?;
        if ltst_span == Duration::ZERO {
            return Err(TimeError::TimeConversion(format!(
                "LTST does not advance around '{text}'"
            )));
        }
        let mars_second = lmst_span / ltst_span;

        let offset = as_lmst(&second)? - first;
        let result = first - offset * mars_second;
        debug!(ltst = text, et = result.to_et(), mars_second, "resolved LTST");
        Ok(result)
    }

    /// Refine [`Time::from_ltst_with`] until the LTST reading lands on the
    /// requested clock face.  Same near-epoch limitation.
    pub fn from_ltst_iterative(text: &str, spacecraft_id: Option<i32>, lmst_sclk_id: Option<i32>) -> TimeResult<Self> {
        let lmst_id = lmst_clock_for(lmst_sclk_id, spacecraft_id)?;
        let target = Self::from_lmst_with(&ltst_as_lmst(text)?, Some(lmst_id))?;
        let mut time = Self::from_ltst_with(text, spacecraft_id, Some(lmst_id))?;
        let mut gain = 1.0;
        let mut last_sign = 0.0;
        for _ in 0..LTST_MAX_ITERATIONS {
            let reading = time.to_ltst_with(spacecraft_id, Some(lmst_id))?;
            let error = target - Self::from_lmst_with(&ltst_as_lmst(&reading)?, Some(lmst_id))?;
            if error.to_seconds().abs() < 0.5 {
                break;
            }
            // readings are whole seconds; halve the step after an overshoot
            let sign = error.to_seconds().signum();
            if last_sign != 0.0 && sign != last_sign {
                gain *= 0.5;
            }
            last_sign = sign;
            time += error * gain;
        }
        Ok(time)
    }
}

/// `Sol-NNNNTHH:MM:SS` → `Sol-NNNNMHH:MM:SS`.
fn ltst_as_lmst(text: &str) -> TimeResult<String> {
    let caps = LTST_REGEX
        .captures(text.trim())
        .ok_or_else(|| TimeError::TimeFormat(format!("'{text}' does not match Sol-NNNNTHH:MM:SS")))?;
    let mut lmst = format!("Sol-{}M{}:{}:{}", &caps["sol"], &caps["hours"], &caps["minutes"], &caps["seconds"]);
    if let Some(decimal) = caps.name("decimal") {
        lmst.push('.');
        lmst.push_str(decimal.as_str());
    }
    Ok(lmst)
}
