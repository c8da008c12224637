// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Relations between the continuous time scales used internally.
//!
//! | Scale | Definition | Relation |
//! |-------|------------|----------|
//! | ET (TDB) | seconds past J2000 on the barycentric axis | canonical |
//! | TT  | terrestrial time | `TT = TAI + 32.184 s` |
//! | TAI | atomic seconds past J2000 | `ET − TAI = 32.184 + K·sin E` |
//! | UTC | civil, with leap seconds | `TAI = UTC + ΔAT` |
//! | GPS | atomic, epoch 1980-01-06 UTC | `TAI = GPS + 19 s` |
//!
//! The ET − TAI relation is the one-term periodic model used by the NAIF
//! leapseconds kernels (`DELTET/K`, `DELTET/EB`, `DELTET/M`), so instants
//! can be shifted along TAI without consulting an ephemeris provider.
//!
//! ## References
//! * NAIF `naif0012.tls`, `DELTET` assignments
//! * IERS Bulletin C (leap second announcements)

use qtty::*;

/// Julian Date of J2000.0.
pub const J2000_JD: Days = Days::new(2_451_545.0);

/// TT − TAI in seconds.
pub const TT_MINUS_TAI: f64 = 32.184;

/// TAI − GPS in seconds.
pub const TAI_MINUS_GPS: f64 = 19.0;

/// Naive UTC seconds past J2000 at the GPS epoch, 1980-01-06T00:00:00 UTC.
pub const GPS_EPOCH_UTC_SECONDS: f64 = -630_763_200.0;

/// TAI seconds past J2000 at the GPS epoch.
pub const GPS_EPOCH_TAI: f64 = GPS_EPOCH_UTC_SECONDS + TAI_MINUS_GPS;

// DELTET constants
const DELTET_K: f64 = 1.657e-3;
const DELTET_EB: f64 = 1.671e-2;
const DELTET_M0: f64 = 6.239_996;
const DELTET_M1: f64 = 1.990_968_71e-7;

/// ET − TAI in seconds at the given ET.
#[inline]
pub fn et_minus_tai(et: f64) -> f64 {
    let m = DELTET_M0 + DELTET_M1 * et;
    let e = m + DELTET_EB * m.sin();
    TT_MINUS_TAI + DELTET_K * e.sin()
}

#[inline]
pub fn et_to_tai(et: f64) -> f64 {
    et - et_minus_tai(et)
}

/// Inverse of [`et_to_tai`].  The periodic term is below 2 ms, so three
/// fixed-point iterations converge to machine precision.
#[inline]
pub fn tai_to_et(tai: f64) -> f64 {
    let mut et = tai + TT_MINUS_TAI;
    for _ in 0..3 {
        et = tai + et_minus_tai(et);
    }
    et
}

/// Leap-second table: (JD of leap-second insertion, cumulative TAI−UTC after).
/// Entries are the JD of 00:00:00 UTC on the day the new offset takes
/// effect; the extra second is the last second of the previous day.
pub(crate) const LEAP_SECONDS: [(f64, f64); 28] = [
    (2_441_317.5, 10.0), // 1972-01-01
    (2_441_499.5, 11.0), // 1972-07-01
    (2_441_683.5, 12.0), // 1973-01-01
    (2_442_048.5, 13.0), // 1974-01-01
    (2_442_413.5, 14.0), // 1975-01-01
    (2_442_778.5, 15.0), // 1976-01-01
    (2_443_144.5, 16.0), // 1977-01-01
    (2_443_509.5, 17.0), // 1978-01-01
    (2_443_874.5, 18.0), // 1979-01-01
    (2_444_239.5, 19.0), // 1980-01-01
    (2_444_786.5, 20.0), // 1981-07-01
    (2_445_151.5, 21.0), // 1982-07-01
    (2_445_516.5, 22.0), // 1983-07-01
    (2_446_247.5, 23.0), // 1985-07-01
    (2_447_161.5, 24.0), // 1988-01-01
    (2_447_892.5, 25.0), // 1990-01-01
    (2_448_257.5, 26.0), // 1991-01-01
    (2_448_804.5, 27.0), // 1992-07-01
    (2_449_169.5, 28.0), // 1993-07-01
    (2_449_534.5, 29.0), // 1994-07-01
    (2_450_083.5, 30.0), // 1996-01-01
    (2_450_630.5, 31.0), // 1997-07-01
    (2_451_179.5, 32.0), // 1999-01-01
    (2_453_736.5, 33.0), // 2006-01-01
    (2_454_832.5, 34.0), // 2009-01-01
    (2_456_109.5, 35.0), // 2012-07-01
    (2_457_204.5, 36.0), // 2015-07-01
    (2_457_754.5, 37.0), // 2017-01-01
];

/// Offset used before the table starts.
const PRE_1972_TAI_MINUS_UTC: f64 = 10.0;

/// TAI − UTC in seconds for a UTC Julian Date.
pub fn tai_minus_utc(jd_utc: Days) -> f64 {
    let jd = jd_utc.value();
    // binary search for the last entry <= jd
    let idx = LEAP_SECONDS.partition_point(|&(start, _)| start <= jd);
    if idx == 0 {
        PRE_1972_TAI_MINUS_UTC
    } else {
        LEAP_SECONDS[idx - 1].1
    }
}

/// One table entry seen from the UTC axis: the naive UTC second (seconds
/// past 2000-01-01T12:00:00, no leap seconds) at which the new offset
/// starts, together with the offsets before and after.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LeapEpoch {
    pub utc_seconds: i64,
    pub before: f64,
    pub after: f64,
}

/// `true` when a leap second is inserted at the end of the UTC day starting
/// at naive second `day_start`.
pub(crate) fn day_ends_with_leap_second(day_start: i64) -> bool {
    leap_epochs().any(|epoch| epoch.utc_seconds == day_start + 86_400 && epoch.after > epoch.before)
}

pub(crate) fn leap_epochs() -> impl DoubleEndedIterator<Item = LeapEpoch> {
    LEAP_SECONDS.iter().enumerate().map(|(i, &(jd, after))| {
        let before = if i == 0 {
            PRE_1972_TAI_MINUS_UTC
        } else {
            LEAP_SECONDS[i - 1].1
        };
        let utc_seconds = (Days::new(jd) - J2000_JD).to::<Second>().value().round() as i64;
        LeapEpoch {
            utc_seconds,
            before,
            after,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn et_minus_tai_is_near_32_184() {
        for et in [-1e9, 0.0, 3.2e8, 7.5e8] {
            let delta = et_minus_tai(et);
            assert!((delta - TT_MINUS_TAI).abs() < 0.002, "ET−TAI at {et} = {delta}");
        }
    }

    #[test]
    fn tai_et_roundtrip() {
        for et in [-6.3e8, 0.0, 6.6e8] {
            let back = tai_to_et(et_to_tai(et));
            assert!((back - et).abs() < 1e-9, "roundtrip error {} s", back - et);
        }
    }

    #[test]
    fn leap_table_lookup() {
        assert_eq!(tai_minus_utc(Days::new(2_400_000.0)), 10.0);
        assert_eq!(tai_minus_utc(J2000_JD), 32.0);
        assert_eq!(tai_minus_utc(Days::new(2_457_754.5)), 37.0);
        assert_eq!(tai_minus_utc(Days::new(2_457_754.499)), 36.0);
    }

    #[test]
    fn leap_epochs_are_whole_utc_midnights() {
        let last = leap_epochs().next_back().expect("table is not empty");
        // 2017-01-01T00:00:00 is 6209.5 days after J2000
        assert_eq!(last.utc_seconds, 536_500_800);
        assert_eq!((last.before, last.after), (36.0, 37.0));
        for epoch in leap_epochs() {
            assert_eq!((epoch.utc_seconds + 43_200) % 86_400, 0);
        }
    }

    #[test]
    fn only_table_days_end_with_a_leap_second() {
        // 2016-12-31 starts one day before the 2017 epoch
        assert!(day_ends_with_leap_second(536_500_800 - 86_400));
        assert!(!day_ends_with_leap_second(536_500_800));
        assert!(!day_ends_with_leap_second(-43_200));
    }

    #[test]
    fn gps_epoch_in_tai() {
        // 1980-01-06 is 7300.5 days before J2000 and ΔAT was 19 s
        assert_eq!(GPS_EPOCH_TAI, -630_763_181.0);
    }
}
