// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Clock models and their string encodings.
//!
//! A clock string is a partition prefix followed by left-aligned fields;
//! each field counts a fixed number of ticks of the finest field.
//!
//! | Clock | Fields | Example |
//! |-------|--------|---------|
//! | spacecraft | seconds, ticks | `1/0666952152-25123` |
//! | LMST | sol, hour, minute, second, ticks | `1/00312:13:04:59:50000` |

use super::mars;
use crate::settings::DEFAULT_LMST_FRACTIONAL_PART;

/// Linear spacecraft clock: `et = epoch_et + rate × clock_seconds`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacecraftClock {
    pub partition: u32,
    /// ET at clock reading zero.
    pub epoch_et: f64,
    /// ET seconds per clock second.
    pub rate: f64,
    /// Ticks per clock second.
    pub modulus: u64,
}

/// A lander site whose local mean solar time drives an LMST clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarsSite {
    /// Planetocentric east longitude in degrees.
    pub east_longitude_deg: f64,
    /// Local Mars Sol Date at which sol 0 begins.
    pub sol_zero_msd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Clock {
    Spacecraft(SpacecraftClock),
    LocalMeanSolar(MarsSite),
}

const LMST_TICKS: u64 = DEFAULT_LMST_FRACTIONAL_PART as u64;

impl Clock {
    pub fn ticks_per_second(&self) -> u64 {
        match self {
            Self::Spacecraft(c) => c.modulus,
            Self::LocalMeanSolar(_) => LMST_TICKS,
        }
    }

    /// Ticks represented by one unit of each field, most significant first.
    fn field_weights(&self) -> Vec<u64> {
        match self {
            Self::Spacecraft(c) => vec![c.modulus, 1],
            Self::LocalMeanSolar(_) => vec![
                86_400 * LMST_TICKS,
                3_600 * LMST_TICKS,
                60 * LMST_TICKS,
                LMST_TICKS,
                1,
            ],
        }
    }

    fn partition(&self) -> u32 {
        match self {
            Self::Spacecraft(c) => c.partition,
            Self::LocalMeanSolar(_) => 1,
        }
    }

    /// Clock seconds elapsed since the clock's zero at ET.
    fn seconds_at(&self, et: f64) -> f64 {
        match self {
            Self::Spacecraft(c) => (et - c.epoch_et) / c.rate,
            Self::LocalMeanSolar(site) => {
                (mars::local_mean_sol_date(et, site.east_longitude_deg) - site.sol_zero_msd) * 86_400.0
            }
        }
    }

    fn et_at(&self, seconds: f64) -> f64 {
        match self {
            Self::Spacecraft(c) => c.epoch_et + c.rate * seconds,
            Self::LocalMeanSolar(site) => {
                let local_msd = site.sol_zero_msd + seconds / 86_400.0;
                mars::et_from_mars_sol_date(local_msd - site.east_longitude_deg / 360.0)
            }
        }
    }

    pub fn encode(&self, et: f64) -> Result<String, String> {
        let seconds = self.seconds_at(et);
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(format!(
                "clock value precedes the start of partition {}",
                self.partition()
            ));
        }
        let mut remaining = (seconds * self.ticks_per_second() as f64).round() as u64;
        let weights = self.field_weights();
        let fields: Vec<u64> = weights
            .iter()
            .map(|w| {
                let value = remaining / w;
                remaining %= w;
                value
            })
            .collect();
        Ok(match self {
            Self::Spacecraft(c) => {
                let width = (c.modulus.saturating_sub(1)).to_string().len();
                format!("{}/{:010}-{:0width$}", c.partition, fields[0], fields[1])
            }
            Self::LocalMeanSolar(_) => format!(
                "1/{:05}:{:02}:{:02}:{:02}:{:05}",
                fields[0], fields[1], fields[2], fields[3], fields[4]
            ),
        })
    }

    pub fn decode(&self, text: &str) -> Result<f64, String> {
        let malformed = |why: &str| format!("malformed time string '{text}' for clock: {why}");
        let trimmed = text.trim();
        let body = match trimmed.split_once('/') {
            Some((partition, rest)) => {
                let partition: u32 = partition.trim().parse().map_err(|_| malformed("bad partition"))?;
                if partition != self.partition() {
                    return Err(format!("clock partition {partition} is not defined"));
                }
                rest
            }
            None => trimmed,
        };
        let fields = body
            .split(|c: char| matches!(c, '-' | '.' | ':' | ',' | ' '))
            .filter(|f| !f.is_empty())
            .map(|f| f.parse::<u64>().map_err(|_| malformed("non-numeric field")))
            .collect::<Result<Vec<_>, _>>()?;
        let weights = self.field_weights();
        if fields.is_empty() || fields.len() > weights.len() {
            return Err(malformed("wrong number of fields"));
        }
        let ticks: u128 = fields
            .iter()
            .zip(&weights)
            .map(|(&f, &w)| u128::from(f) * u128::from(w))
            .sum();
        Ok(self.et_at(ticks as f64 / self.ticks_per_second() as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spacecraft() -> Clock {
        Clock::Spacecraft(SpacecraftClock {
            partition: 1,
            epoch_et: 0.0,
            rate: 1.0,
            modulus: 65_536,
        })
    }

    #[test]
    fn spacecraft_clock_encoding() {
        let clock = spacecraft();
        assert_eq!(clock.encode(100.5).expect("encode"), "1/0000000100-32768");
        let et = clock.decode("1/0000000100-32768").expect("decode");
        assert!((et - 100.5).abs() < 1e-9);
        // partition prefix and separator are flexible
        assert_eq!(clock.decode("100.32768").expect("decode"), et);
        assert!(clock.encode(-1.0).is_err());
        assert!(clock.decode("2/100-0").is_err());
        assert!(clock.decode("1/abc").is_err());
    }

    #[test]
    fn lmst_clock_encoding() {
        let clock = Clock::LocalMeanSolar(MarsSite {
            east_longitude_deg: 0.0,
            sol_zero_msd: 50_000.0,
        });
        let et = clock.decode("00012:06:30:15:50000").expect("decode");
        assert_eq!(clock.encode(et).expect("encode"), "1/00012:06:30:15:50000");
        // fewer fields are left aligned
        let sol_start = clock.decode("12").expect("decode");
        assert_eq!(clock.encode(sol_start).expect("encode"), "1/00012:00:00:00:00000");
    }
}
