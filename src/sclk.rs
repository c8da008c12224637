// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Spacecraft clock readings on [`Time`].
//!
//! | Form | Example | Meaning |
//! |------|---------|---------|
//! | SCLK | `1/0666952152-25123` | partition, whole clock seconds, ticks |
//! | SCLKD | `666952152.383346` | seconds plus `ticks / modulus` |
//! | GST | `31740` | clock seconds since the last local midnight, modulo one sol |
//!
//! The tick modulus of each spacecraft clock is asked of the provider once
//! and cached.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{TimeError, TimeResult};
use crate::formats::{capture_f64, SCLK_REGEX};
use crate::instant::Time;
use crate::provider;
use crate::settings;

/// Whole clock seconds per sol used by generic sol time.
pub const GST_SECONDS_PER_SOL: f64 = 88_775.0;

static SCLK_FRACTIONAL_PARTS: Lazy<RwLock<HashMap<i32, u64>>> = Lazy::new(|| RwLock::new(HashMap::new()));

impl Time {
    /// Ticks per clock second of a spacecraft clock.
    pub fn sclk_fractional_part(spacecraft_id: Option<i32>) -> TimeResult<u64> {
        let id = settings::resolve_spacecraft_id(spacecraft_id)?;
        if let Some(modulus) = SCLK_FRACTIONAL_PARTS.read().get(&id) {
            return Ok(*modulus);
        }
        let modulus = provider::current()?.sclk_fractional_modulus(id)?;
        if modulus == 0 {
            return Err(TimeError::TimeConversion(format!(
                "clock of spacecraft {id} reports a zero tick modulus"
            )));
        }
        debug!(spacecraft_id = id, modulus, "cached SCLK modulus");
        SCLK_FRACTIONAL_PARTS.write().insert(id, modulus);
        Ok(modulus)
    }

    /// Clock string of `spacecraft_id` (configured spacecraft when `None`).
    pub fn to_sclk(&self, spacecraft_id: Option<i32>) -> TimeResult<String> {
        let id = settings::resolve_spacecraft_id(spacecraft_id)?;
        Ok(provider::current()?.continuous_to_sclk(id, self.to_et())?)
    }

    /// Clock reading as decimal seconds.
    pub fn to_sclkd(&self, spacecraft_id: Option<i32>) -> TimeResult<f64> {
        let sclk = self.to_sclk(spacecraft_id)?;
        let caps = SCLK_REGEX
            .captures(sclk.trim())
            .ok_or_else(|| TimeError::TimeConversion(format!("cannot read '{sclk}' as a clock reading")))?;
        let field = |name| {
            capture_f64(&caps, name)
                .ok_or_else(|| TimeError::TimeConversion(format!("bad {name} in clock reading '{sclk}'")))
        };
        let modulus = Self::sclk_fractional_part(spacecraft_id)?;
        Ok(field("seconds")? + field("fraction")? / modulus as f64)
    }

    pub fn from_sclk(sclk: &str, spacecraft_id: Option<i32>) -> TimeResult<Self> {
        let id = settings::resolve_spacecraft_id(spacecraft_id)?;
        let et = provider::current()?.sclk_to_continuous(id, sclk.trim())?;
        Ok(Self::from_et(et))
    }

    /// Inverse of [`Time::to_sclkd`]; the fraction is rounded to the
    /// nearest tick.
    pub fn from_sclkd(sclkd: f64, spacecraft_id: Option<i32>) -> TimeResult<Self> {
        if !sclkd.is_finite() || sclkd < 0.0 {
            return Err(TimeError::TimeFormat(format!(
                "{sclkd} is not a non-negative clock reading"
            )));
        }
        let modulus = Self::sclk_fractional_part(spacecraft_id)?;
        let mut seconds = sclkd.trunc() as u64;
        let mut ticks = (sclkd.fract() * modulus as f64).round() as u64;
        if ticks >= modulus {
            seconds += 1;
            ticks -= modulus;
        }
        Self::from_sclk(&format!("1/{seconds}-{ticks}"), spacecraft_id)
    }

    /// Generic sol time: whole clock seconds since `last_local_midnight`,
    /// wrapped to one sol.
    pub fn to_gst(&self, last_local_midnight: &Time, spacecraft_id: Option<i32>) -> TimeResult<i64> {
        let elapsed = self.to_sclkd(spacecraft_id)? - last_local_midnight.to_sclkd(spacecraft_id)?;
        Ok(elapsed.rem_euclid(GST_SECONDS_PER_SOL).round() as i64)
    }

    /// Instant `gst_seconds` into `sol`, given the last local midnight and
    /// the sol it belongs to.
    pub fn from_gst(
        gst_seconds: i64,
        sol: i64,
        last_local_midnight: &Time,
        last_local_midnight_sol: i64,
        spacecraft_id: Option<i32>,
    ) -> TimeResult<Self> {
        let midnight = last_local_midnight.to_sclkd(spacecraft_id)?;
        let sols = (sol - last_local_midnight_sol) as f64;
        Self::from_sclkd(
            midnight + sols * GST_SECONDS_PER_SOL + gst_seconds as f64,
            spacecraft_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{install_reference_provider, LANDER};
    use crate::Duration;

    fn et(seconds: f64) -> Time {
        install_reference_provider();
        Time::from_et(seconds)
    }

    #[test]
    fn clock_string_and_decimal() {
        let time = et(100.5);
        assert_eq!(time.to_sclk(None).expect("sclk"), "1/0000000100-32768");
        assert_eq!(time.to_sclk(Some(LANDER)).expect("sclk"), "1/0000000100-32768");
        assert_eq!(time.to_sclkd(None).expect("sclkd"), 100.5);
        assert_eq!(Time::from_sclk("1/0000000100-32768", None).expect("from sclk"), time);
        assert_eq!(Time::from_sclkd(100.5, None).expect("from sclkd"), time);
        assert_eq!(Time::sclk_fractional_part(None).expect("modulus"), 65_536);
    }

    #[test]
    fn decimal_rounding_carries_into_seconds() {
        let time = Time::from_sclkd(99.999_999_99, Some(LANDER)).expect("from sclkd");
        assert_eq!(time, et(100.0));
        assert!(matches!(Time::from_sclkd(-1.0, None), Err(TimeError::TimeFormat(_))));
        assert!(matches!(Time::from_sclkd(f64::NAN, None), Err(TimeError::TimeFormat(_))));
    }

    #[test]
    fn bad_clock_text_and_unknown_clock() {
        install_reference_provider();
        assert!(matches!(Time::from_sclk("1/abc", None), Err(TimeError::TimeFormat(_))));
        assert!(matches!(et(10.0).to_sclk(Some(-999)), Err(TimeError::KernelMissing(_))));
    }

    #[test]
    fn gst_counts_clock_seconds_since_midnight() {
        let midnight = et(1_000.0);
        let time = midnight + Duration::from_seconds(2.0 * GST_SECONDS_PER_SOL + 300.0);
        assert_eq!(time.to_gst(&midnight, None).expect("gst"), 300);
        let back = Time::from_gst(300, 12, &midnight, 10, None).expect("from gst");
        assert_eq!(back, time);
    }
}
