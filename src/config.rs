// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Mission setup: default spacecraft, LMST clock, precisions and kernels.
//!
//! A [`MissionConfig`] is read from the environment or from JSON and then
//! applied once at start-up:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MISSION_TIME_SPACECRAFT_ID` | `spacecraft_id` |
//! | `MISSION_TIME_LMST_SCLK_ID` | `lmst_sclk_id` |
//! | `MISSION_TIME_KERNELS` | `kernels`, an OS path list (`:` or `;` separated) |

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{TimeError, TimeResult};
use crate::kernels::KernelStore;
use crate::settings;
use crate::{Duration, Time};

pub const SPACECRAFT_ID_VAR: &str = "MISSION_TIME_SPACECRAFT_ID";
pub const LMST_SCLK_ID_VAR: &str = "MISSION_TIME_LMST_SCLK_ID";
pub const KERNELS_VAR: &str = "MISSION_TIME_KERNELS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MissionConfig {
    pub spacecraft_id: Option<i32>,
    /// Defaults to the clock paired with `spacecraft_id`.
    pub lmst_sclk_id: Option<i32>,
    pub kernels: Vec<PathBuf>,
    pub duration_precision: Option<usize>,
    pub time_precision: Option<usize>,
}

impl MissionConfig {
    /// Read the `MISSION_TIME_*` variables.
    pub fn from_env() -> TimeResult<Self> {
        Self::from_lookup(|name| env::var_os(name))
    }

    /// Like [`MissionConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> TimeResult<Self> {
        let id = |name: &str| -> TimeResult<Option<i32>> {
            match lookup(name) {
                None => Ok(None),
                Some(value) => {
                    let text = value.to_string_lossy();
                    text.trim()
                        .parse()
                        .map(Some)
                        .map_err(|_| TimeError::Kernel(format!("{name}='{text}' is not a NAIF id")))
                }
            }
        };
        Ok(Self {
            spacecraft_id: id(SPACECRAFT_ID_VAR)?,
            lmst_sclk_id: id(LMST_SCLK_ID_VAR)?,
            kernels: lookup(KERNELS_VAR)
                .map(|paths| env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()).collect())
                .unwrap_or_default(),
            ..Self::default()
        })
    }

    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> TimeResult<Self> {
        serde_json::from_str(json).map_err(|e| TimeError::Kernel(format!("invalid mission configuration: {e}")))
    }

    /// LMST clock this configuration selects, if any.
    pub fn resolved_lmst_sclk_id(&self) -> TimeResult<Option<i32>> {
        match (self.lmst_sclk_id, self.spacecraft_id) {
            (Some(id), _) => Ok(Some(id)),
            (None, Some(spacecraft)) => settings::lmst_sclk_id_for(spacecraft).map(Some),
            (None, None) => Ok(None),
        }
    }

    /// Install the defaults and load every kernel into `store`.
    pub fn apply(&self, store: &mut impl KernelStore) -> TimeResult<()> {
        let lmst_sclk_id = self.resolved_lmst_sclk_id()?;
        if let Some(id) = self.spacecraft_id {
            Time::set_spacecraft_id(id);
        }
        if let Some(id) = lmst_sclk_id {
            Time::set_lmst_sclk_id(id);
        }
        if let Some(precision) = self.duration_precision {
            Duration::set_output_decimal_precision(precision);
        }
        if let Some(precision) = self.time_precision {
            Time::set_output_decimal_precision(precision);
        }
        store.load_all(&self.kernels)?;
        info!(
            spacecraft_id = ?self.spacecraft_id,
            lmst_sclk_id = ?lmst_sclk_id,
            kernels = self.kernels.len(),
            "mission configuration applied"
        );
        Ok(())
    }
}
