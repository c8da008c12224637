// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Name-driven conversion between every supported representation.
//!
//! Front ends (command lines, services) that receive a representation name
//! as text use [`InputKind`] and [`OutputKind`] to build and render
//! instants:
//!
//! ```no_run
//! use mission_time::convert::{convert, InputKind, OutputKind};
//!
//! let lmst = convert("2022-182T12:00:00", InputKind::Scet, OutputKind::Lmst).unwrap();
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{TimeError, TimeResult};
use crate::formats::is_lmst;
use crate::instant::Time;
use crate::light_time::TimeReference;
use crate::timezone::{TimezoneConverter, PACIFIC_TIME_ZONE, PDT_TIME_ZONE, PST_TIME_ZONE};

/// Wall-clock layout of the Pacific outputs.
const PACIFIC_LAYOUT: &str = "%m/%d/%Y %H:%M:%S%.3f";

macro_rules! kinds {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = TimeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|kind| kind.name() == wanted)
                    .ok_or_else(|| {
                        let names: Vec<&str> = Self::ALL.iter().map(|k| k.name()).collect();
                        TimeError::TimeConversion(format!(
                            "'{s}' is not one of {}",
                            names.join(", ")
                        ))
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

kinds! {
    /// Representation of an input time.
    InputKind {
        Scet => "scet",
        Utc => "utc",
        Isoc => "isoc",
        Ert => "ert",
        Ett => "ett",
        Gps => "gps",
        Pt => "pt",
        Pst => "pst",
        Pdt => "pdt",
        Et => "et",
        Sclk => "sclk",
        Sclkd => "sclkd",
        Lmst => "lmst",
        Ltst => "ltst",
    }
}

kinds! {
    /// Representation to render; the light-time kinds render a duration.
    OutputKind {
        Scet => "scet",
        Utc => "utc",
        Ert => "ert",
        Ett => "ett",
        Gps => "gps",
        Pt => "pt",
        Pst => "pst",
        Pdt => "pdt",
        Isoc => "isoc",
        Et => "et",
        Sclk => "sclk",
        Sclkd => "sclkd",
        Lmst => "lmst",
        Ltst => "ltst",
        Upleg => "upleg",
        Downleg => "downleg",
        Rtlt => "rtlt",
    }
}

/// LMST when the text has the LMST layout, otherwise SCET.
pub fn detect_input_kind(text: &str) -> InputKind {
    if is_lmst(text) {
        InputKind::Lmst
    } else {
        InputKind::Scet
    }
}

fn parse_number(text: &str, kind: InputKind) -> TimeResult<f64> {
    text.trim()
        .parse()
        .map_err(|_| TimeError::TimeFormat(format!("'{text}' is not a number for {kind} input")))
}

/// Instant described by `text` read as `kind`.
pub fn create_time(text: &str, kind: InputKind) -> TimeResult<Time> {
    match kind {
        InputKind::Scet | InputKind::Utc | InputKind::Isoc | InputKind::Lmst => Time::parse(text),
        InputKind::Ert => Time::from_ert(text),
        InputKind::Ett => Time::from_ett(text),
        InputKind::Gps => Time::from_gps(text),
        InputKind::Pt => Time::from_pt(text),
        InputKind::Pst => Time::from_pst(text),
        InputKind::Pdt => Time::from_pdt(text),
        InputKind::Et => Time::new(parse_number(text, kind)?),
        InputKind::Sclk => Time::from_sclk(text, None),
        InputKind::Sclkd => Time::from_sclkd(parse_number(text, kind)?, None),
        InputKind::Ltst => Time::from_ltst(text),
    }
}

fn pacific(time: &Time, zone: &str) -> TimeResult<String> {
    let local = TimezoneConverter::new(zone)?.localize(time)?;
    Ok(local.to_datetime()?.format(PACIFIC_LAYOUT).to_string())
}

/// `time` rendered as `kind`.
pub fn format_time(time: &Time, kind: OutputKind) -> TimeResult<String> {
    match kind {
        OutputKind::Scet => time.to_scet(),
        OutputKind::Utc => time.to_utc(),
        OutputKind::Ert => time.to_ert(),
        OutputKind::Ett => time.to_ett(),
        OutputKind::Gps => Ok(time.to_gps(None)),
        OutputKind::Pt => pacific(time, PACIFIC_TIME_ZONE),
        OutputKind::Pst => pacific(time, PST_TIME_ZONE),
        OutputKind::Pdt => pacific(time, PDT_TIME_ZONE),
        OutputKind::Isoc => time.to_isoc(),
        OutputKind::Et => Ok(time.to_et().to_string()),
        OutputKind::Sclk => time.to_sclk(None),
        OutputKind::Sclkd => Ok(time.to_sclkd(None)?.to_string()),
        OutputKind::Lmst => time.to_lmst(),
        OutputKind::Ltst => time.to_ltst(),
        OutputKind::Upleg => Ok(time.upleg(TimeReference::Scet)?.to_string()),
        OutputKind::Downleg => Ok(time.downleg(TimeReference::Scet)?.to_string()),
        OutputKind::Rtlt => Ok(time.rtlt(TimeReference::Scet)?.to_string()),
    }
}

pub fn convert(text: &str, input: InputKind, output: OutputKind) -> TimeResult<String> {
    format_time(&create_time(text, input)?, output)
}

/// Every output kind with its rendering or the reason it failed.
pub fn convert_to_all(time: &Time) -> Vec<(OutputKind, TimeResult<String>)> {
    OutputKind::ALL
        .iter()
        .map(|&kind| (kind, format_time(time, kind)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::install_reference_provider;

    #[test]
    fn kind_names() {
        assert_eq!("LMST".parse::<InputKind>().expect("kind"), InputKind::Lmst);
        assert_eq!(" rtlt ".parse::<OutputKind>().expect("kind"), OutputKind::Rtlt);
        assert!(matches!("rtlt".parse::<InputKind>(), Err(TimeError::TimeConversion(_))));
        assert_eq!(InputKind::ALL.len(), 14);
        assert_eq!(OutputKind::ALL.len(), 17);
        assert_eq!(OutputKind::Sclkd.to_string(), "sclkd");
    }

    #[test]
    fn detects_lmst_by_shape() {
        assert_eq!(detect_input_kind("Sol-0100M10:00:00"), InputKind::Lmst);
        assert_eq!(detect_input_kind("2022-001T00:00:00"), InputKind::Scet);
    }

    #[test]
    fn civil_conversions() {
        install_reference_provider();
        assert_eq!(
            convert("2022-182T12:00:00", InputKind::Utc, OutputKind::Isoc).expect("isoc"),
            "2022-07-01T12:00:00.000"
        );
        assert_eq!(convert("0", InputKind::Et, OutputKind::Utc).expect("utc"), "2000-001T11:58:55.816");
        assert_eq!(
            convert("2022-182T12:00:00", InputKind::Scet, OutputKind::Pt).expect("pt"),
            "07/01/2022 05:00:00.000"
        );
        assert_eq!(
            convert("2022-07-01T05:00:00", InputKind::Pt, OutputKind::Utc).expect("utc"),
            "2022-182T12:00:00.000"
        );
    }

    #[test]
    fn clock_conversions() {
        install_reference_provider();
        assert_eq!(convert("1/0000000100-32768", InputKind::Sclk, OutputKind::Sclkd).expect("sclkd"), "100.5");
        assert_eq!(convert("100.5", InputKind::Sclkd, OutputKind::Sclk).expect("sclk"), "1/0000000100-32768");
        assert!(matches!(create_time("soon", InputKind::Et), Err(TimeError::TimeFormat(_))));
    }

    #[test]
    fn all_outputs_after_landing() {
        install_reference_provider();
        let time = create_time("2022-182T12:00:00", InputKind::Scet).expect("time");
        let all = convert_to_all(&time);
        assert_eq!(all.len(), OutputKind::ALL.len());
        for (kind, result) in &all {
            assert!(result.is_ok(), "{kind}: {result:?}");
        }
        let lmst = all
            .iter()
            .find(|(kind, _)| *kind == OutputKind::Lmst)
            .and_then(|(_, r)| r.as_ref().ok())
            .expect("lmst");
        assert_eq!(create_time(lmst, detect_input_kind(lmst)).expect("lmst"), time);
    }
}
