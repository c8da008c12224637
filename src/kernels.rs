// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Bookkeeping of loaded reference-data files ("kernels").
//!
//! | Type | Extensions | Content |
//! |------|------------|---------|
//! | SPK | `.bsp` | ephemerides |
//! | CK | `.bc` | attitude |
//! | PCK | `.bpc` (and text `.tpc`) | body constants |
//! | EK | `.bes`, `.bep` | events |
//! | META | `.tm` | kernel lists |
//! | TEXT | anything else (`.tls`, `.tsc`, `.tf`, ...) | text kernels |
//!
//! [`KernelStore`] is the seam a SPICE-backed provider implements;
//! [`KernelRegistry`] is the in-memory store used when the provider keeps
//! no kernel state of its own.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{TimeError, TimeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum KernelType {
    Spk,
    Ck,
    Pck,
    Ek,
    Text,
    Meta,
}

impl KernelType {
    /// Type implied by the file extension.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("bsp") => Self::Spk,
            Some("bc") => Self::Ck,
            Some("bpc") => Self::Pck,
            Some("bes" | "bep") => Self::Ek,
            Some("tm") => Self::Meta,
            _ => Self::Text,
        }
    }
}

impl FromStr for KernelType {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SPK" => Ok(Self::Spk),
            "CK" => Ok(Self::Ck),
            "PCK" => Ok(Self::Pck),
            "EK" => Ok(Self::Ek),
            "TEXT" => Ok(Self::Text),
            "META" => Ok(Self::Meta),
            other => Err(TimeError::Kernel(format!(
                "unknown kernel type '{other}', expected one of SPK, CK, PCK, EK, TEXT, META"
            ))),
        }
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Spk => "SPK",
            Self::Ck => "CK",
            Self::Pck => "PCK",
            Self::Ek => "EK",
            Self::Text => "TEXT",
            Self::Meta => "META",
        })
    }
}

/// A loaded file and its type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoadedKernel {
    pub path: PathBuf,
    pub kind: KernelType,
}

/// Load and unload kernels; listing order is load order.
pub trait KernelStore {
    fn load(&mut self, path: &Path) -> TimeResult<()>;

    /// Unload `kernel`, given as a loaded path or, when `by_basename`, as
    /// the file name of any number of loaded paths.  Returns how many
    /// kernels were unloaded; none is an error only with
    /// `error_if_not_found`.
    fn unload(&mut self, kernel: &str, by_basename: bool, error_if_not_found: bool) -> TimeResult<usize>;

    fn list_loaded_with_types(&self, kind: Option<KernelType>) -> Vec<LoadedKernel>;

    fn load_all(&mut self, paths: &[PathBuf]) -> TimeResult<()> {
        paths.iter().try_for_each(|path| self.load(path))
    }

    fn list_loaded(&self, kind: Option<KernelType>) -> Vec<PathBuf> {
        self.list_loaded_with_types(kind)
            .into_iter()
            .map(|k| k.path)
            .collect()
    }

    /// Unload every kernel of `kind` (all kernels when `None`).
    fn unload_all(&mut self, kind: Option<KernelType>) -> TimeResult<usize> {
        let mut unloaded = 0;
        for path in self.list_loaded(kind) {
            unloaded += self.unload(&path.to_string_lossy(), false, false)?;
        }
        Ok(unloaded)
    }

    /// Replace everything loaded with `paths`.
    fn reload(&mut self, paths: &[PathBuf]) -> TimeResult<()> {
        self.unload_all(None)?;
        self.load_all(paths)
    }
}

/// In-memory [`KernelStore`] that only checks the files exist.
#[derive(Debug, Clone, Default)]
pub struct KernelRegistry {
    loaded: Vec<LoadedKernel>,
}

impl KernelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

impl KernelStore for KernelRegistry {
    fn load(&mut self, path: &Path) -> TimeResult<()> {
        if !path.is_file() {
            return Err(TimeError::Kernel(format!(
                "kernel {} does not exist or is not a file",
                path.display()
            )));
        }
        if self.loaded.iter().any(|k| k.path == path) {
            debug!(kernel = %path.display(), "kernel already loaded");
            return Ok(());
        }
        let kind = KernelType::from_path(path);
        info!(kernel = %path.display(), %kind, "kernel loaded");
        self.loaded.push(LoadedKernel {
            path: path.to_path_buf(),
            kind,
        });
        Ok(())
    }

    fn unload(&mut self, kernel: &str, by_basename: bool, error_if_not_found: bool) -> TimeResult<usize> {
        let before = self.loaded.len();
        let target = Path::new(kernel);
        if self.loaded.iter().any(|k| k.path == target) {
            self.loaded.retain(|k| k.path != target);
        } else if by_basename {
            self.loaded
                .retain(|k| k.path.file_name().and_then(|n| n.to_str()) != Some(kernel));
        }
        let unloaded = before - self.loaded.len();
        if unloaded == 0 {
            if error_if_not_found {
                let loaded: Vec<String> = self.loaded.iter().map(|k| k.path.display().to_string()).collect();
                return Err(TimeError::KernelMissing(format!(
                    "kernel {kernel} is not loaded; loaded kernels: [{}]",
                    loaded.join(", ")
                )));
            }
            warn!(kernel, "nothing to unload");
        } else {
            info!(kernel, count = unloaded, "kernel unloaded");
        }
        Ok(unloaded)
    }

    fn list_loaded_with_types(&self, kind: Option<KernelType>) -> Vec<LoadedKernel> {
        self.loaded
            .iter()
            .filter(|k| kind.map_or(true, |wanted| k.kind == wanted))
            .cloned()
            .collect()
    }
}
