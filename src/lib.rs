// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Mission time
//!
//! Time arithmetic for spacecraft operations: Earth and Mars durations,
//! absolute instants and their renderings in civil, clock and solar scales.
//!
//! # Core types
//!
//! - [`Duration`]: signed span of SI seconds with Earth (`DDDTHH:MM:SS`)
//!   and Mars (`DDDMHH:MM:SS`) text layouts.
//! - [`Time`]: an instant, stored as ephemeris seconds past J2000 (ET)
//!   together with TAI.
//! - [`EpochRelativeTime`]: an instant written as `NAME+offset` against a
//!   named epoch from an [`EpochRegistry`].
//! - [`LightTimeCalculator`]: one-way and round-trip light times between a
//!   spacecraft and a body.
//! - [`TimezoneConverter`]: wall-clock readings in IANA time zones.
//!
//! # Representations
//!
//! | Scale | Read | Written |
//! |-------|------|---------|
//! | UTC / SCET | [`Time::parse`] | [`Time::to_utc`], [`Time::to_scet`], [`Time::to_isoc`] |
//! | ET | [`Time::from_et`] | [`Time::to_et`] |
//! | GPS | [`Time::from_gps`] | [`Time::to_gps`] |
//! | ERT / ETT | [`Time::from_ert`], [`Time::from_ett`] | [`Time::to_ert`], [`Time::to_ett`] |
//! | SCLK | [`Time::from_sclk`], [`Time::from_sclkd`] | [`Time::to_sclk`], [`Time::to_sclkd`] |
//! | LMST | [`Time::from_lmst`] | [`Time::to_lmst`] |
//! | LTST | [`Time::from_ltst`] | [`Time::to_ltst`] |
//! | time zones | [`Time::from_timezone`] | [`Time::to_timezone`] |
//!
//! Every conversion that needs reference data goes through the process-wide
//! [`EphemerisProvider`] installed with [`install`].  [`AnalyticProvider`]
//! is a self-contained provider built from published analytic models.
//!
//! # Settings
//!
//! Comparison tolerances, output precisions and the default spacecraft are
//! process-wide; see [`settings()`] and [`reset_settings`].  A
//! [`MissionConfig`] applies them in one step from the environment or JSON.

pub mod analytic;
mod calendar;
pub mod config;
pub mod convert;
mod duration;
mod epoch;
mod error;
mod formats;
pub(crate) mod instant;
pub mod kernels;
pub mod light_time;
pub mod provider;
pub(crate) mod scales;
pub mod sclk;
mod settings;
pub mod solar;
pub mod timezone;

#[cfg(test)]
mod test_support;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use analytic::AnalyticProvider;
pub use calendar::UtcFormat;
pub use config::MissionConfig;
pub use duration::{Duration, DurationParts, DurationSource};
pub use epoch::{EpochRegistry, EpochRelativeTime};
pub use error::{ProviderError, TimeError, TimeResult};
pub use formats::{is_lmst, is_ltst, MARS_TIME_SCALE, MAX_PRECISION, SECONDS_PER_DAY, SECONDS_PER_SOL};
pub use instant::{Time, TimeSource};
pub use kernels::{KernelRegistry, KernelStore, KernelType, LoadedKernel};
pub use light_time::{LightTimeCalculator, TimeReference};
pub use provider::{install, Direction, EphemerisProvider};
pub use sclk::GST_SECONDS_PER_SOL;
pub use settings::{lmst_sclk_id_for, reset_settings, settings, Settings};
pub use solar::{Meridiem, SolTime};
pub use timezone::{TimezoneConverter, INDIA_TIME_ZONE, PACIFIC_TIME_ZONE, PDT_TIME_ZONE, PST_TIME_ZONE};
