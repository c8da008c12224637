// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! A kernel-free [`EphemerisProvider`].
//!
//! [`AnalyticProvider`] answers every provider query from closed-form
//! models instead of SPICE kernels:
//!
//! | Query | Model |
//! |-------|-------|
//! | UTC ↔ ET | IERS leap-second table + DELTET periodic term |
//! | spacecraft clock | linear clock per spacecraft ([`SpacecraftClock`]) |
//! | LMST clock | Mars24 mean solar time at a surface site ([`MarsSite`]) |
//! | solar longitude / LTST | Mars24 equation of time |
//! | light time | Keplerian Earth and Mars orbits |
//!
//! It is accurate to seconds for light time and to a fraction of a second
//! for solar time, which is enough for tests, demos and planning tools that
//! do not carry mission kernels.

mod clock;
pub mod mars;
pub mod orbits;

pub use clock::{MarsSite, SpacecraftClock};

use std::collections::HashMap;

use qtty::*;

use crate::calendar::{self, CivilTime, UtcFormat};
use crate::error::ProviderError;
use crate::formats::MAX_PRECISION;
use crate::provider::{Direction, EphemerisProvider};
use crate::scales::{self, J2000_JD};
use clock::Clock;
use orbits::Elements;

pub const EARTH_BARYCENTER_ID: i32 = 3;
pub const EARTH_ID: i32 = 399;
pub const MARS_BARYCENTER_ID: i32 = 4;
pub const MARS_ID: i32 = 499;

/// Closed-form provider; see the module documentation.
#[derive(Debug, Clone, Default)]
pub struct AnalyticProvider {
    clocks: HashMap<i32, Clock>,
    sites: HashMap<i32, MarsSite>,
}

impl AnalyticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the clock of `spacecraft_id`.
    pub fn with_spacecraft_clock(mut self, spacecraft_id: i32, clock: SpacecraftClock) -> Self {
        self.clocks.insert(spacecraft_id, Clock::Spacecraft(clock));
        self
    }

    /// Place `spacecraft_id` on the Martian surface and register the LMST
    /// clock of that site under `lmst_clock_id`.
    pub fn with_surface_site(mut self, spacecraft_id: i32, lmst_clock_id: i32, site: MarsSite) -> Self {
        self.sites.insert(spacecraft_id, site);
        self.clocks.insert(lmst_clock_id, Clock::LocalMeanSolar(site));
        self
    }

    /// A lander (NAIF −168) at 77.45° E whose sol 0 began on local MSD
    /// 52304, with a 65536-tick clock counting ET seconds since J2000 and
    /// its LMST clock registered as −168900.
    pub fn reference_lander() -> Self {
        Self::new()
            .with_spacecraft_clock(
                -168,
                SpacecraftClock {
                    partition: 1,
                    epoch_et: 0.0,
                    rate: 1.0,
                    modulus: 65_536,
                },
            )
            .with_surface_site(
                -168,
                -168_900,
                MarsSite {
                    east_longitude_deg: 77.45,
                    sol_zero_msd: 52_304.0,
                },
            )
    }

    fn clock(&self, clock_id: i32) -> Result<&Clock, ProviderError> {
        self.clocks.get(&clock_id).ok_or_else(|| {
            ProviderError::new(format!("missing kernel data: no clock defined for id {clock_id}"))
        })
    }

    fn site(&self, spacecraft_id: i32) -> Result<&MarsSite, ProviderError> {
        self.sites.get(&spacecraft_id).ok_or_else(|| {
            ProviderError::new(format!(
                "missing kernel data: no position for spacecraft {spacecraft_id}"
            ))
        })
    }

    fn planet(&self, naif_id: i32) -> Result<Planet, ProviderError> {
        match naif_id {
            EARTH_ID | EARTH_BARYCENTER_ID => Ok(Planet::Earth),
            MARS_ID | MARS_BARYCENTER_ID => Ok(Planet::Mars),
            id if self.sites.contains_key(&id) => Ok(Planet::Mars),
            id => Err(ProviderError::new(format!(
                "missing kernel data: no ephemeris for body {id}"
            ))),
        }
    }
}

/// Bodies with an orbit model; surface spacecraft ride on Mars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Planet {
    Earth,
    Mars,
}

impl Planet {
    fn elements(self) -> Elements {
        match self {
            Self::Earth => orbits::EARTH_MOON_BARYCENTER,
            Self::Mars => orbits::MARS,
        }
    }
}

/// UTC Julian Date of a naive UTC second.
fn jd_utc(naive_seconds: f64) -> Days {
    J2000_JD + Seconds::new(naive_seconds).to::<Day>()
}

impl EphemerisProvider for AnalyticProvider {
    fn utc_to_continuous(&self, utc: &str) -> Result<f64, ProviderError> {
        let civil = CivilTime::parse(utc).map_err(ProviderError)?;
        if civil.is_leap_second() && !scales::day_ends_with_leap_second(civil.day_start_seconds()) {
            return Err(ProviderError::new(format!(
                "malformed time string '{utc}': no leap second is inserted on {}",
                civil.date
            )));
        }
        let day_start = civil.day_start_seconds() as f64;
        // the inserted 23:59:60 still carries the previous offset
        let lookup = day_start + civil.seconds_of_day.min(86_399.999);
        let tai = day_start + civil.seconds_of_day + scales::tai_minus_utc(jd_utc(lookup));
        Ok(scales::tai_to_et(tai))
    }

    fn continuous_to_utc(&self, et: f64, precision: usize, format: UtcFormat) -> Result<String, ProviderError> {
        if !et.is_finite() {
            return Err(ProviderError::new(format!("cannot format non-finite ET {et}")));
        }
        let precision = precision.min(MAX_PRECISION);
        let scale = 10i128.pow(precision as u32);
        let tai_ticks = (scales::et_to_tai(et) * scale as f64).round() as i128;
        for epoch in scales::leap_epochs().rev() {
            let start = i128::from(epoch.utc_seconds) * scale;
            let after = epoch.after as i128 * scale;
            let before = epoch.before as i128 * scale;
            if tai_ticks >= start + after {
                return Ok(calendar::render_naive_ticks(tai_ticks - after, precision, format));
            }
            if tai_ticks >= start + before {
                let into_leap = (tai_ticks - start - before) as u64;
                let day = CivilTime::from_naive_seconds(epoch.utc_seconds as f64 - 1.0).date;
                let ticks_of_day = 86_400 * scale as u64 + into_leap;
                return Ok(calendar::render(day, ticks_of_day, precision, format));
            }
        }
        let first = scales::leap_epochs().next().map_or(10.0, |e| e.before);
        Ok(calendar::render_naive_ticks(tai_ticks - first as i128 * scale, precision, format))
    }

    fn continuous_to_sclk(&self, clock_id: i32, et: f64) -> Result<String, ProviderError> {
        self.clock(clock_id)?.encode(et).map_err(ProviderError)
    }

    fn sclk_to_continuous(&self, clock_id: i32, sclk: &str) -> Result<f64, ProviderError> {
        self.clock(clock_id)?.decode(sclk).map_err(ProviderError)
    }

    fn sclk_fractional_modulus(&self, clock_id: i32) -> Result<u64, ProviderError> {
        Ok(self.clock(clock_id)?.ticks_per_second())
    }

    fn body_longitude(&self, _et: f64, spacecraft_id: i32) -> Result<f64, ProviderError> {
        let degrees = self.site(spacecraft_id)?.east_longitude_deg;
        // planetocentric longitude in (-180, 180]
        let wrapped = 180.0 - (180.0 - degrees).rem_euclid(360.0);
        Ok(wrapped.to_radians())
    }

    fn local_solar_time(&self, et: f64, body_id: i32, longitude: f64) -> Result<(u32, u32, u32), ProviderError> {
        if body_id != MARS_ID {
            return Err(ProviderError::new(format!(
                "missing kernel data: no rotation model for body {body_id}"
            )));
        }
        let hours = mars::local_true_solar_hours(et, longitude.to_degrees());
        // nearest whole second; 24:00:00 wraps to midnight
        let seconds = ((hours * 3_600.0).round() as u32) % 86_400;
        Ok((seconds / 3_600, seconds % 3_600 / 60, seconds % 60))
    }

    fn light_time(&self, et: f64, target_id: i32, direction: Direction, observer_id: i32) -> Result<f64, ProviderError> {
        let anchor = self.planet(target_id)?;
        let remote = self.planet(observer_id)?;
        if anchor == remote {
            return Ok(0.0);
        }
        Ok(orbits::light_time(
            &anchor.elements(),
            &remote.elements(),
            et,
            direction == Direction::Transmit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AnalyticProvider {
        AnalyticProvider::reference_lander()
    }

    fn utc(et: f64, precision: usize) -> String {
        provider()
            .continuous_to_utc(et, precision, UtcFormat::IsoOrdinal)
            .expect("format")
    }

    #[test]
    fn j2000_is_64_184_seconds_after_utc_noon() {
        let et = provider().utc_to_continuous("2000-001T11:58:55.816").expect("parse");
        assert!(et.abs() < 1e-3, "ET = {et}");
        assert_eq!(utc(0.0, 3), "2000-001T11:58:55.816");
    }

    #[test]
    fn utc_roundtrip_in_every_layout() {
        let p = provider();
        let et = p.utc_to_continuous("2021-02-18T20:55:00.125").expect("parse");
        for format in [UtcFormat::IsoOrdinal, UtcFormat::IsoCalendar, UtcFormat::Calendar] {
            let text = p.continuous_to_utc(et, 3, format).expect("format");
            let back = p.utc_to_continuous(&text).expect("reparse");
            assert!((back - et).abs() < 1e-6, "{text}");
        }
        assert_eq!(p.continuous_to_utc(et, 3, UtcFormat::IsoOrdinal).expect("format"), "2021-049T20:55:00.125");
    }

    #[test]
    fn leap_second_is_rendered_as_second_60() {
        let p = provider();
        let before = p.utc_to_continuous("2016-366T23:59:59.500").expect("parse");
        let leap = p.utc_to_continuous("2016-366T23:59:60.500").expect("parse");
        let after = p.utc_to_continuous("2017-001T00:00:00.500").expect("parse");
        assert!((leap - before - 1.0).abs() < 1e-6);
        assert!((after - leap - 1.0).abs() < 1e-6);
        assert_eq!(utc(leap, 3), "2016-366T23:59:60.500");
        assert_eq!(utc(after, 3), "2017-001T00:00:00.500");
    }

    #[test]
    fn second_60_needs_a_leap_day() {
        let p = provider();
        for text in ["2020-001T23:59:60", "2016-365T23:59:60.5", "2017-12-31T23:59:60"] {
            let err = p.utc_to_continuous(text).expect_err(text);
            assert!(err.0.contains("malformed time string"), "{}", err.0);
        }
        assert!(p.utc_to_continuous("2015-06-30T23:59:60").is_ok());
    }

    #[test]
    fn malformed_utc_carries_marker() {
        let err = provider().utc_to_continuous("not a time").expect_err("bad text");
        assert!(err.0.contains("malformed time string"));
    }

    #[test]
    fn unknown_clock_is_missing_data() {
        let err = provider().continuous_to_sclk(-999, 0.0).expect_err("no clock");
        assert!(err.0.contains("missing kernel data"));
    }

    #[test]
    fn longitude_and_solar_time() {
        let p = provider();
        let lon = p.body_longitude(0.0, -168).expect("site");
        assert!((lon.to_degrees() - 77.45).abs() < 1e-9);
        let (h, m, s) = p.local_solar_time(6.9e8, MARS_ID, lon).expect("lst");
        assert!(h < 24 && m < 60 && s < 60);
        assert!(p.local_solar_time(6.9e8, EARTH_ID, lon).is_err());
        for et in [6.9e8, 6.9e8 + 0.4, 6.9e8 + 0.8, 7.1e8 + 12_345.6] {
            let (h, m, s) = p.local_solar_time(et, MARS_ID, lon).expect("lst");
            let face = f64::from(h * 3_600 + m * 60 + s);
            let exact = mars::local_true_solar_hours(et, lon.to_degrees()) * 3_600.0;
            let diff = (face - exact).rem_euclid(86_400.0);
            assert!(diff <= 0.5 || diff >= 86_399.5, "{et}: {face} vs {exact}");
        }
    }

    #[test]
    fn lander_shares_mars_light_time() {
        let p = provider();
        let lander = p.light_time(7e8, -168, Direction::Transmit, EARTH_ID).expect("lt");
        let planet = p.light_time(7e8, MARS_ID, Direction::Transmit, EARTH_ID).expect("lt");
        assert_eq!(lander, planet);
        assert_eq!(p.light_time(7e8, MARS_ID, Direction::Receive, -168).expect("lt"), 0.0);
        assert!(p.light_time(7e8, -5, Direction::Receive, EARTH_ID).is_err());
    }
}
