// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Wall-clock time in named zones of the IANA database.
//!
//! The zone offset at an instant is the difference between the local and
//! the UTC wall-clock readings, both parsed back as UTC text.  Shifting by
//! that offset gives an instant whose UTC rendering is the local reading.

use std::str::FromStr;

use chrono::TimeZone;
use chrono_tz::Tz;

use crate::duration::Duration;
use crate::error::{TimeError, TimeResult};
use crate::instant::{Time, TimeSource};

/// US Pacific time with daylight saving.
pub const PACIFIC_TIME_ZONE: &str = "America/Los_Angeles";
/// Pacific standard time all year.
pub const PST_TIME_ZONE: &str = "Etc/GMT+8";
/// Pacific daylight time all year.
pub const PDT_TIME_ZONE: &str = "Etc/GMT+7";
/// India standard time.
pub const INDIA_TIME_ZONE: &str = "Asia/Kolkata";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneConverter {
    zone: Tz,
}

impl TimezoneConverter {
    /// Converter for an IANA zone name such as `Europe/Madrid`.
    pub fn new(zone_name: &str) -> TimeResult<Self> {
        let zone = Tz::from_str(zone_name.trim())
            .map_err(|_| TimeError::TimeConversion(format!("unknown time zone '{zone_name}'")))?;
        Ok(Self { zone })
    }

    pub fn name(&self) -> &'static str {
        self.zone.name()
    }

    /// Local minus UTC at `time`.
    pub fn offset_at(&self, time: &Time) -> TimeResult<Duration> {
        let utc = time.to_datetime()?;
        let local = self.zone.from_utc_datetime(&utc).naive_local();
        Ok(Time::from_datetime(local)? - Time::from_datetime(utc)?)
    }

    /// Instant whose UTC reading equals the local reading at `time`.
    pub fn localize(&self, time: &Time) -> TimeResult<Time> {
        Ok(*time + self.offset_at(time)?)
    }

    /// Local wall-clock text (ISO ordinal layout) at `time`.
    pub fn to_zone(&self, time: &Time) -> TimeResult<String> {
        self.localize(time)?.to_utc()
    }

    /// Inverse of [`TimezoneConverter::localize`]: `local` holds a local
    /// reading written as UTC.
    pub fn from_zone(&self, local: &Time) -> TimeResult<Time> {
        Ok(*local - self.offset_at(local)?)
    }
}

impl Time {
    pub fn to_timezone(&self, zone_name: &str) -> TimeResult<String> {
        TimezoneConverter::new(zone_name)?.to_zone(self)
    }

    pub fn to_pt(&self) -> TimeResult<String> {
        self.to_timezone(PACIFIC_TIME_ZONE)
    }

    pub fn to_pst(&self) -> TimeResult<String> {
        self.to_timezone(PST_TIME_ZONE)
    }

    pub fn to_pdt(&self) -> TimeResult<String> {
        self.to_timezone(PDT_TIME_ZONE)
    }

    pub fn to_indian_std_time(&self) -> TimeResult<String> {
        self.to_timezone(INDIA_TIME_ZONE)
    }

    /// Instant of a wall-clock reading taken in `zone_name`.
    pub fn from_timezone<'a>(local: impl Into<TimeSource<'a>>, zone_name: &str) -> TimeResult<Self> {
        TimezoneConverter::new(zone_name)?.from_zone(&Self::new(local)?)
    }

    pub fn from_pt<'a>(local: impl Into<TimeSource<'a>>) -> TimeResult<Self> {
        Self::from_timezone(local, PACIFIC_TIME_ZONE)
    }

    pub fn from_pst<'a>(local: impl Into<TimeSource<'a>>) -> TimeResult<Self> {
        Self::from_timezone(local, PST_TIME_ZONE)
    }

    pub fn from_pdt<'a>(local: impl Into<TimeSource<'a>>) -> TimeResult<Self> {
        Self::from_timezone(local, PDT_TIME_ZONE)
    }
}
