// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Mars solar time from the Mars24 algorithm.
//!
//! The Mars Sol Date counts mean solar days at the prime meridian.  Local
//! mean solar time shifts it by the site longitude; local true solar time
//! adds the equation of time, which bundles the orbital eccentricity and
//! the obliquity of Mars (±50 minutes over the Martian year).
//!
//! ET is used in place of TT; the ≈1.7 ms difference is far below the
//! accuracy of the series.
//!
//! ## References
//! * Allison & McEwen (2000), Planet. Space Sci. 48, 215
//! * NASA GISS Mars24 sunclock, algorithm steps A–C

use crate::formats::{MARS_TIME_SCALE, SECONDS_PER_DAY};

/// Days from J2000 to the Mars24 reference epoch (2000-01-06 00:00 TT).
const REFERENCE_OFFSET_DAYS: f64 = 4.5;
/// MSD at the reference epoch.
const REFERENCE_MSD: f64 = 44_796.0 - 0.000_962_6;

/// Perturbers: (amplitude deg, period Julian years, phase deg).
const PERTURBERS: [(f64, f64, f64); 7] = [
    (0.0071, 2.2353, 49.409),
    (0.0057, 2.7543, 168.173),
    (0.0039, 1.1177, 191.837),
    (0.0037, 15.7866, 21.736),
    (0.0021, 2.1354, 15.704),
    (0.0020, 2.4694, 95.528),
    (0.0018, 32.8493, 49.095),
];

/// Mars Sol Date at ET.
#[inline]
pub fn mars_sol_date(et: f64) -> f64 {
    (et / SECONDS_PER_DAY - REFERENCE_OFFSET_DAYS) / MARS_TIME_SCALE + REFERENCE_MSD
}

/// Inverse of [`mars_sol_date`].
#[inline]
pub fn et_from_mars_sol_date(msd: f64) -> f64 {
    ((msd - REFERENCE_MSD) * MARS_TIME_SCALE + REFERENCE_OFFSET_DAYS) * SECONDS_PER_DAY
}

/// Sol date on the local mean solar clock at an east longitude (degrees).
#[inline]
pub fn local_mean_sol_date(et: f64, east_longitude_deg: f64) -> f64 {
    mars_sol_date(et) + east_longitude_deg / 360.0
}

/// Equation of time in hours (true minus mean solar time).
pub fn equation_of_time_hours(et: f64) -> f64 {
    let dt = et / SECONDS_PER_DAY;
    let mean_anomaly = (19.3871 + 0.524_020_73 * dt).to_radians();
    let fictitious_sun = 270.3871 + 0.524_038_496 * dt;
    let perturbation: f64 = PERTURBERS
        .iter()
        .map(|&(amp, tau, phi)| amp * (0.985_626 * dt / tau + phi).to_radians().cos())
        .sum();
    let center = (10.691 + 3.0e-7 * dt) * mean_anomaly.sin()
        + 0.623 * (2.0 * mean_anomaly).sin()
        + 0.050 * (3.0 * mean_anomaly).sin()
        + 0.005 * (4.0 * mean_anomaly).sin()
        + 0.0005 * (5.0 * mean_anomaly).sin()
        + perturbation;
    let ls = (fictitious_sun + center).to_radians();
    let eot_deg = 2.861 * (2.0 * ls).sin() - 0.071 * (4.0 * ls).sin() + 0.002 * (6.0 * ls).sin() - center;
    eot_deg / 15.0
}

/// Local true solar time in hours `[0, 24)`.
pub fn local_true_solar_hours(et: f64, east_longitude_deg: f64) -> f64 {
    let lmst = 24.0 * local_mean_sol_date(et, east_longitude_deg).rem_euclid(1.0);
    (lmst + equation_of_time_hours(et)).rem_euclid(24.0)
}
