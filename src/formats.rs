// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Fixed string layouts recognised and produced by the crate.
//!
//! | Layout | Example |
//! |--------|---------|
//! | Earth duration | `-1T02:03:04.500` |
//! | Mars duration | `3M02:03:04.500`, `M00:10:00` |
//! | LMST | `Sol-0123M13:45:00.250` |
//! | LTST | `Sol-0123T13:02:11` |
//! | SCLK | `1/0666952152-25123` |
//! | Epoch relative | `LAUNCH+01:00:00`, `EDL-3M00:00:00` |
//!
//! Text is always trimmed before matching.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Length of a Mars solar day expressed in Earth days.
pub const MARS_TIME_SCALE: f64 = 1.027_491_251_7;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const SECONDS_PER_HOUR: f64 = 3_600.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Length of a Mars sol in SI seconds.
pub const SECONDS_PER_SOL: f64 = SECONDS_PER_DAY * MARS_TIME_SCALE;

/// Largest number of decimals the formatters emit.
pub const MAX_PRECISION: usize = 9;

pub(crate) static EARTH_DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<sign>[+-])?(?:(?P<days>\d+)T)?(?P<hours>\d+):(?P<minutes>\d{1,2}):(?P<seconds>\d{1,2}(?:\.\d*)?)$",
    )
    .expect("static earth duration regex")
});

pub(crate) static MARS_DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<sign>[+-])?(?P<days>\d+)?M(?P<hours>\d+):(?P<minutes>\d{1,2}):(?P<seconds>\d{1,2}(?:\.\d*)?)$",
    )
    .expect("static mars duration regex")
});

pub(crate) static LMST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?i:sol)-(?P<sol>\d+)M(?P<hours>\d{1,2}):(?P<minutes>\d{2}):(?P<seconds>\d{2})(?:\.(?P<decimal>\d+))?$",
    )
    .expect("static lmst regex")
});

pub(crate) static LTST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?i:sol)-(?P<sol>\d+)T(?P<hours>\d{1,2}):(?P<minutes>\d{2}):(?P<seconds>\d{2})(?:\.(?P<decimal>\d+))?$",
    )
    .expect("static ltst regex")
});

/// Clock string as emitted by a provider for an LMST pseudo-clock:
/// `[partition/]sol:hour:minute:second:tick`.
pub(crate) static PROVIDER_LMST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\d+/)?(?P<sol>\d+):(?P<hours>\d+):(?P<minutes>\d+):(?P<seconds>\d+):(?P<ticks>\d+)$",
    )
    .expect("static provider lmst regex")
});

pub(crate) static SCLK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<partition>\d+)/)?(?P<seconds>\d+)(?:[-.:,](?P<fraction>\d+))?$")
        .expect("static sclk regex")
});

pub(crate) static EPOCH_RELATIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<epoch_name>[A-Za-z_][A-Za-z0-9_]*)\s*(?P<relative_sign>[+-])\s*(?P<offset>(?:\d+T|\d*M)?\d+:\d{1,2}:\d{1,2}(?:\.\d*)?)$",
    )
    .expect("static epoch-relative regex")
});

/// Leading `YYYY` of an ISO ordinal or calendar string.
pub(crate) static UTC_YEAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<year>-?\d{4})-").expect("static utc year regex"));

/// Numeric value of a named capture, `0.0` when the group did not take part.
pub(crate) fn capture_f64(caps: &Captures<'_>, name: &str) -> Option<f64> {
    match caps.name(name) {
        Some(m) => m.as_str().parse::<f64>().ok(),
        None => Some(0.0),
    }
}

/// Integer value of a named capture, `0` when absent.
pub(crate) fn capture_i64(caps: &Captures<'_>, name: &str) -> Option<i64> {
    match caps.name(name) {
        Some(m) => m.as_str().parse::<i64>().ok(),
        None => Some(0),
    }
}

/// `true` when the trimmed text looks like an LMST string.
pub fn is_lmst(text: &str) -> bool {
    LMST_REGEX.is_match(text.trim())
}

/// `true` when the trimmed text looks like an LTST string.
pub fn is_ltst(text: &str) -> bool {
    LTST_REGEX.is_match(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earth_and_mars_layouts_are_disjoint() {
        for s in ["01:00:00", "-2T00:00:00.5", "+100:00:00"] {
            assert!(EARTH_DURATION_REGEX.is_match(s), "{s}");
            assert!(!MARS_DURATION_REGEX.is_match(s), "{s}");
        }
        for s in ["M01:00:00", "3M00:00:00.250", "-M12:00:00"] {
            assert!(MARS_DURATION_REGEX.is_match(s), "{s}");
            assert!(!EARTH_DURATION_REGEX.is_match(s), "{s}");
        }
    }

    #[test]
    fn lmst_and_ltst_differ_by_separator() {
        assert!(is_lmst("Sol-0100M12:00:00.123"));
        assert!(!is_lmst("Sol-0100T12:00:00"));
        assert!(is_ltst("Sol-0100T12:00:00"));
        assert!(is_lmst("  sol-7M00:00:00 "));
    }

    #[test]
    fn epoch_relative_requires_duration_offset() {
        let caps = EPOCH_RELATIVE_REGEX.captures("LAUNCH+1T02:00:00").expect("match");
        assert_eq!(&caps["epoch_name"], "LAUNCH");
        assert_eq!(&caps["relative_sign"], "+");
        assert_eq!(&caps["offset"], "1T02:00:00");
        assert!(EPOCH_RELATIVE_REGEX.is_match("EDL-M00:30:00"));
        assert!(!EPOCH_RELATIVE_REGEX.is_match("LAUNCH+soon"));
        assert!(!EPOCH_RELATIVE_REGEX.is_match("2020-001T00:00:00"));
    }

    #[test]
    fn sclk_fraction_is_optional() {
        let caps = SCLK_REGEX.captures("1/0666952152-25123").expect("match");
        assert_eq!(&caps["seconds"], "0666952152");
        assert_eq!(&caps["fraction"], "25123");
        let caps = SCLK_REGEX.captures("666952152").expect("match");
        assert!(caps.name("fraction").is_none());
    }

    #[test]
    fn sol_length() {
        assert!((SECONDS_PER_SOL - 88_775.244).abs() < 1e-2);
    }
}
