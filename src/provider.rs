// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The ephemeris provider seam.
//!
//! Every conversion that needs reference data (leap seconds, clock
//! correlation, body positions) goes through an [`EphemerisProvider`].
//! One provider is installed per process with [`install`]; it is a
//! read-only oracle afterwards.
//!
//! Clock strings exchanged with a provider follow the NAIF conventions:
//!
//! * spacecraft clocks: `[partition/]seconds-ticks`;
//! * LMST pseudo-clocks: `[partition/]sol:hour:minute:second:ticks`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::calendar::UtcFormat;
use crate::error::{ProviderError, TimeError, TimeResult};

/// Signal direction for a light-time query, relative to the body whose
/// epoch is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `->`: the signal leaves the first body at the epoch.
    Transmit,
    /// `<-`: the signal reaches the first body at the epoch.
    Receive,
}

impl FromStr for Direction {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "->" => Ok(Self::Transmit),
            "<-" => Ok(Self::Receive),
            other => Err(TimeError::TimeConversion(format!(
                "light-time direction must be '->' or '<-', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transmit => "->",
            Self::Receive => "<-",
        })
    }
}

/// Primitive scale conversions and geometry queries backed by reference
/// data.  `et` arguments are ephemeris seconds past J2000.
pub trait EphemerisProvider: Send + Sync {
    /// UTC text to ET.
    fn utc_to_continuous(&self, utc: &str) -> Result<f64, ProviderError>;

    /// ET to UTC text with `precision` decimals.
    fn continuous_to_utc(&self, et: f64, precision: usize, format: UtcFormat) -> Result<String, ProviderError>;

    /// ET to a clock string for `clock_id` (a spacecraft or an LMST clock).
    fn continuous_to_sclk(&self, clock_id: i32, et: f64) -> Result<String, ProviderError>;

    /// Clock string to ET.
    fn sclk_to_continuous(&self, clock_id: i32, sclk: &str) -> Result<f64, ProviderError>;

    /// Ticks per second of the last clock field.
    fn sclk_fractional_modulus(&self, clock_id: i32) -> Result<u64, ProviderError>;

    /// Planetocentric east longitude (radians) of a spacecraft on its
    /// central body.
    fn body_longitude(&self, et: f64, spacecraft_id: i32) -> Result<f64, ProviderError>;

    /// True solar time `(hour, minute, second)` at `longitude` (radians,
    /// planetocentric east) on `body_id`.
    fn local_solar_time(&self, et: f64, body_id: i32, longitude: f64) -> Result<(u32, u32, u32), ProviderError>;

    /// One-way light time in seconds between `target_id`, observed at `et`,
    /// and `observer_id`.  With [`Direction::Transmit`] the signal leaves
    /// `target_id` at `et`; with [`Direction::Receive`] it arrives there.
    fn light_time(&self, et: f64, target_id: i32, direction: Direction, observer_id: i32) -> Result<f64, ProviderError>;
}

static PROVIDER: OnceCell<Arc<dyn EphemerisProvider>> = OnceCell::new();

/// Install the process-wide provider.  Only the first call succeeds.
pub fn install(provider: Arc<dyn EphemerisProvider>) -> TimeResult<()> {
    PROVIDER
        .set(provider)
        .map_err(|_| TimeError::Kernel("an ephemeris provider is already installed".into()))?;
    info!("ephemeris provider installed");
    Ok(())
}

/// `true` once [`install`] has succeeded.
pub fn is_installed() -> bool {
    PROVIDER.get().is_some()
}

pub(crate) fn current() -> TimeResult<&'static dyn EphemerisProvider> {
    PROVIDER
        .get()
        .map(|p| p.as_ref())
        .ok_or_else(|| TimeError::KernelMissing("no ephemeris provider installed".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_arrows() {
        assert_eq!("->".parse::<Direction>().expect("arrow"), Direction::Transmit);
        assert_eq!(" <- ".parse::<Direction>().expect("arrow"), Direction::Receive);
        assert!(matches!("=>".parse::<Direction>(), Err(TimeError::TimeConversion(_))));
        assert_eq!(Direction::Receive.to_string(), "<-");
    }
}
