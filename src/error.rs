// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error taxonomy shared by every conversion in the crate.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`TimeError::Duration`] | a duration operation is undefined (zero modulus, non-finite seconds) |
//! | [`TimeError::DurationFormat`] | duration text does not match the Earth or Mars layout |
//! | [`TimeError::Time`] | an instant operation is undefined (inverted `is_between` bounds) |
//! | [`TimeError::TimeFormat`] | time text is not recognised |
//! | [`TimeError::TimeConversion`] | a scale conversion fails |
//! | [`TimeError::EpochRelativeTime`] | an epoch name is not registered |
//! | [`TimeError::EpochRelativeTimeFormat`] | epoch-relative text is malformed |
//! | [`TimeError::Kernel`] | kernel bookkeeping fails |
//! | [`TimeError::KernelMissing`] | reference data needed by a conversion is absent |
//!
//! Ephemeris providers report failures as a free-form [`ProviderError`];
//! the `From` conversion below picks the most specific variant from the
//! message text.

use thiserror::Error;
use tracing::debug;

/// Crate-wide result alias.
pub type TimeResult<T> = Result<T, TimeError>;

/// Errors raised by durations, instants and their conversions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("invalid duration: {0}")]
    Duration(String),

    #[error("malformed duration: {0}")]
    DurationFormat(String),

    #[error("invalid time: {0}")]
    Time(String),

    #[error("malformed time: {0}")]
    TimeFormat(String),

    #[error("time conversion failed: {0}")]
    TimeConversion(String),

    #[error("undefined epoch: {0}")]
    EpochRelativeTime(String),

    #[error("malformed epoch-relative time: {0}")]
    EpochRelativeTimeFormat(String),

    #[error("kernel error: {0}")]
    Kernel(String),

    #[error("missing kernel data: {0}")]
    KernelMissing(String),
}

impl TimeError {
    /// `true` for the duration family.
    pub fn is_duration_error(&self) -> bool {
        matches!(self, Self::Duration(_) | Self::DurationFormat(_))
    }

    /// `true` for every error raised while handling an instant, including
    /// the epoch-relative and kernel families.
    pub fn is_time_error(&self) -> bool {
        !self.is_duration_error()
    }

    /// `true` for [`TimeError::Kernel`] and [`TimeError::KernelMissing`].
    pub fn is_kernel_error(&self) -> bool {
        matches!(self, Self::Kernel(_) | Self::KernelMissing(_))
    }
}

/// Failure reported by an [`EphemerisProvider`](crate::EphemerisProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

const KERNEL_MISSING_MARKERS: [&str; 3] = [
    "MISSINGTIMEINFO",
    "missing kernel data",
    "no ephemeris provider",
];

const TIME_FORMAT_MARKERS: [&str; 2] = ["INVALIDTIMESTRING", "malformed time string"];

impl From<ProviderError> for TimeError {
    fn from(err: ProviderError) -> Self {
        let message = err.0;
        let classified = if KERNEL_MISSING_MARKERS.iter().any(|m| message.contains(m)) {
            TimeError::KernelMissing(message)
        } else if TIME_FORMAT_MARKERS.iter().any(|m| message.contains(m)) {
            TimeError::TimeFormat(message)
        } else {
            TimeError::TimeConversion(message)
        };
        debug!(error = %classified, "classified provider failure");
        classified
    }
}
