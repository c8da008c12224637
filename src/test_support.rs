// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Shared fixture for unit tests: one reference provider per test binary.

use std::sync::{Arc, Once};

use crate::analytic::AnalyticProvider;
use crate::provider;
use crate::Time;

static INIT: Once = Once::new();

pub(crate) const LANDER: i32 = -168;
pub(crate) const LANDER_LMST: i32 = -168_900;

/// Install [`AnalyticProvider::reference_lander`] and make the lander the
/// default spacecraft.
pub(crate) fn install_reference_provider() {
    INIT.call_once(|| {
        provider::install(Arc::new(AnalyticProvider::reference_lander()))
            .expect("first install in this test binary");
        Time::set_spacecraft_id_and_lmst_id(LANDER).expect("lander ids fit");
    });
}
