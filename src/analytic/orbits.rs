// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Heliocentric positions from mean Keplerian elements and the light-time
//! solution between two bodies.
//!
//! Orbits are projected onto the ecliptic (Mars' 1.85° inclination is
//! dropped), which keeps Earth–Mars light time within a few seconds of a
//! full ephemeris over 1800–2050.
//!
//! ## References
//! * Standish, *Keplerian Elements for Approximate Positions of the Major
//!   Planets*, JPL/SSD, table 1

use crate::formats::SECONDS_PER_DAY;

/// Astronomical unit in km.
pub const AU_KM: f64 = 149_597_870.7;
/// Speed of light in km/s.
pub const LIGHT_SPEED_KM_S: f64 = 299_792.458;

const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Mean elements at J2000 and their rates per Julian century.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elements {
    /// semi-major axis (AU)
    pub a: [f64; 2],
    pub eccentricity: [f64; 2],
    /// mean longitude (deg)
    pub mean_longitude: [f64; 2],
    /// longitude of perihelion (deg)
    pub perihelion: [f64; 2],
}

pub const EARTH_MOON_BARYCENTER: Elements = Elements {
    a: [1.000_002_61, 0.000_005_62],
    eccentricity: [0.016_711_23, -0.000_043_92],
    mean_longitude: [100.464_571_66, 35_999.372_449_81],
    perihelion: [102.937_681_93, 0.323_273_64],
};

pub const MARS: Elements = Elements {
    a: [1.523_710_34, 0.000_018_47],
    eccentricity: [0.093_394_10, 0.000_078_82],
    mean_longitude: [-4.553_432_05, 19_140.302_684_99],
    perihelion: [-23.943_629_59, 0.444_410_88],
};

impl Elements {
    /// Ecliptic `[x, y]` position in km at ET.
    pub fn position(&self, et: f64) -> [f64; 2] {
        let t = et / SECONDS_PER_DAY / DAYS_PER_CENTURY;
        let at = |pair: [f64; 2]| pair[0] + pair[1] * t;
        let a = at(self.a) * AU_KM;
        let e = at(self.eccentricity);
        let perihelion = at(self.perihelion).to_radians();
        let mean_anomaly = (at(self.mean_longitude).to_radians() - perihelion)
            .rem_euclid(std::f64::consts::TAU);
        let ecc_anomaly = solve_kepler(mean_anomaly, e);
        let x = a * (ecc_anomaly.cos() - e);
        let y = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();
        let (sin_w, cos_w) = perihelion.sin_cos();
        [x * cos_w - y * sin_w, x * sin_w + y * cos_w]
    }
}

/// Eccentric anomaly by Newton iteration.
fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..12 {
        let step = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= step;
        if step.abs() < 1e-14 {
            break;
        }
    }
    ecc
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Light time (s) of a signal between `anchor`, fixed at `et`, and `remote`.
///
/// `outbound` means the signal leaves `anchor` at `et` and the remote body
/// is evaluated at reception; otherwise the signal arrives at `anchor` at
/// `et` and the remote body is evaluated at emission.
pub fn light_time(anchor: &Elements, remote: &Elements, et: f64, outbound: bool) -> f64 {
    let fixed = anchor.position(et);
    let sign = if outbound { 1.0 } else { -1.0 };
    let mut lt = 0.0;
    for _ in 0..6 {
        lt = distance(fixed, remote.position(et + sign * lt)) / LIGHT_SPEED_KM_S;
    }
    lt
}
