// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Process-wide defaults for comparison, formatting and mission identity.
//!
//! The values live behind a single [`RwLock`] and are read as a cheap
//! [`Settings`] snapshot.  Mutation goes through the setters on
//! [`Duration`](crate::Duration) and [`Time`](crate::Time); this module
//! only owns the storage and the defaults.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{TimeError, TimeResult};

/// Default comparison tolerance in seconds (just under one millisecond).
pub const DEFAULT_EPSILON: f64 = 0.000_999;

/// Default number of decimals in formatted seconds.
pub const DEFAULT_PRECISION: usize = 3;

/// Ticks per second of the LMST pseudo-clock.
pub const DEFAULT_LMST_FRACTIONAL_PART: u32 = 100_000;

/// Snapshot of the mutable process-wide defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub duration_epsilon: f64,
    pub duration_precision: usize,
    pub time_epsilon: f64,
    pub time_precision: usize,
    pub spacecraft_id: Option<i32>,
    pub lmst_sclk_id: Option<i32>,
    pub lmst_fractional_part: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            duration_epsilon: DEFAULT_EPSILON,
            duration_precision: DEFAULT_PRECISION,
            time_epsilon: DEFAULT_EPSILON,
            time_precision: DEFAULT_PRECISION,
            spacecraft_id: None,
            lmst_sclk_id: None,
            lmst_fractional_part: DEFAULT_LMST_FRACTIONAL_PART,
        }
    }
}

static SETTINGS: Lazy<RwLock<Settings>> = Lazy::new(|| RwLock::new(Settings::default()));

/// Current defaults.
pub fn settings() -> Settings {
    SETTINGS.read().clone()
}

/// Restore every default.
pub fn reset_settings() {
    *SETTINGS.write() = Settings::default();
    debug!("settings reset to defaults");
}

pub(crate) fn update(f: impl FnOnce(&mut Settings)) {
    let mut guard = SETTINGS.write();
    f(&mut guard);
    debug!(settings = ?*guard, "settings updated");
}

#[inline]
pub(crate) fn duration_epsilon() -> f64 {
    SETTINGS.read().duration_epsilon
}

#[inline]
pub(crate) fn duration_precision() -> usize {
    SETTINGS.read().duration_precision
}

#[inline]
pub(crate) fn time_epsilon() -> f64 {
    SETTINGS.read().time_epsilon
}

#[inline]
pub(crate) fn time_precision() -> usize {
    SETTINGS.read().time_precision
}

#[inline]
pub(crate) fn lmst_fractional_part() -> u32 {
    SETTINGS.read().lmst_fractional_part
}

/// Tolerance derived from a requested comparison precision: the precision
/// minus a thousandth of itself (capped at one second), so two values that
/// differ by exactly `seconds` still compare unequal.
pub(crate) fn epsilon_for(seconds: f64) -> f64 {
    seconds - (seconds / 1000.0).min(1.0)
}

/// Explicit id, falling back to the configured spacecraft.
pub(crate) fn resolve_spacecraft_id(explicit: Option<i32>) -> TimeResult<i32> {
    explicit
        .or_else(|| SETTINGS.read().spacecraft_id)
        .ok_or_else(|| TimeError::TimeConversion("no spacecraft id given and none configured".into()))
}

/// Explicit id, falling back to the configured LMST clock.
pub(crate) fn resolve_lmst_sclk_id(explicit: Option<i32>) -> TimeResult<i32> {
    explicit
        .or_else(|| SETTINGS.read().lmst_sclk_id)
        .ok_or_else(|| TimeError::TimeConversion("no LMST clock id given and none configured".into()))
}

/// LMST clock id conventionally paired with a spacecraft: the spacecraft id
/// with `900` appended (`-168` → `-168900`).  Ids whose pairing does not
/// fit an `i32` are rejected.
pub fn lmst_sclk_id_for(spacecraft_id: i32) -> TimeResult<i32> {
    let scaled = spacecraft_id.checked_mul(1000);
    let paired = if spacecraft_id < 0 {
        scaled.and_then(|id| id.checked_sub(900))
    } else {
        scaled.and_then(|id| id.checked_add(900))
    };
    paired.ok_or_else(|| {
        TimeError::TimeConversion(format!(
            "spacecraft id {spacecraft_id} has no LMST clock id in the 32-bit NAIF range"
        ))
    })
}
