//! Process-wide settings are global, so every test here holds `LOCK`.

use std::fs::File;
use std::sync::Arc;

use mission_time::kernels::KernelStore;
use mission_time::provider::is_installed;
use mission_time::{
    install, reset_settings, settings, AnalyticProvider, Duration, KernelRegistry, KernelType, MissionConfig, Settings,
    Time, TimeError,
};
use parking_lot::{const_mutex, Mutex};

static LOCK: Mutex<()> = const_mutex(());

fn ensure_provider() {
    if !is_installed() {
        // a concurrent test may win the race; either provider is the same
        let _ = install(Arc::new(AnalyticProvider::reference_lander()));
    }
}

#[test]
fn precision_setters_change_rendering() {
    let _guard = LOCK.lock();
    ensure_provider();
    reset_settings();
    let span = Duration::from_seconds(61.123_456);
    assert_eq!(span.to_string(), "00:01:01.123");

    Duration::set_output_decimal_precision(6);
    assert_eq!(span.to_string(), "00:01:01.123456");
    Time::set_output_decimal_precision(0);
    let time = Time::parse("2022-182T12:00:00.4").expect("time");
    assert_eq!(time.to_utc().expect("utc"), "2022-182T12:00:00");

    reset_settings();
    assert_eq!(settings(), Settings::default());
    assert_eq!(time.to_utc().expect("utc"), "2022-182T12:00:00.400");
}

#[test]
fn comparison_precision_widens_equality() {
    let _guard = LOCK.lock();
    reset_settings();
    let a = Duration::from_seconds(10.0);
    let b = Duration::from_seconds(10.4);
    assert_ne!(a, b);
    Duration::set_comparison_precision(1.0);
    assert_eq!(a, b);
    assert_ne!(a, Duration::from_seconds(11.0));

    Time::set_comparison_precision(Duration::from_seconds(1.0));
    assert_eq!(Time::from_et(0.0), Time::from_et(0.5));
    reset_settings();
    assert_ne!(Time::from_et(0.0), Time::from_et(0.5));
}

#[test]
fn conversions_need_a_spacecraft() {
    let _guard = LOCK.lock();
    ensure_provider();
    reset_settings();
    let time = Time::from_et(7.0e8);
    assert!(matches!(time.to_sclk(None), Err(TimeError::TimeConversion(_))));
    assert!(time.to_sclk(Some(-168)).is_ok());

    Time::set_spacecraft_id_and_lmst_id(-168).expect("ids");
    assert_eq!(settings().lmst_sclk_id, Some(-168_900));
    assert!(time.to_sclk(None).is_ok());
    assert!(time.to_lmst().is_ok());
    reset_settings();
}

#[test]
fn mission_config_applies_defaults_and_kernels() {
    let _guard = LOCK.lock();
    reset_settings();
    let dir = tempfile::tempdir().expect("temp dir");
    let tls = dir.path().join("naif0012.tls");
    let spk = dir.path().join("de440.bsp");
    File::create(&tls).expect("tls");
    File::create(&spk).expect("spk");

    let config = MissionConfig {
        spacecraft_id: Some(-168),
        kernels: vec![tls.clone(), spk.clone()],
        time_precision: Some(1),
        ..MissionConfig::default()
    };
    let mut store = KernelRegistry::new();
    config.apply(&mut store).expect("apply");

    let current = settings();
    assert_eq!(current.spacecraft_id, Some(-168));
    assert_eq!(current.lmst_sclk_id, Some(-168_900));
    assert_eq!(current.time_precision, 1);
    assert_eq!(current.duration_precision, Settings::default().duration_precision);
    assert_eq!(store.list_loaded(None), vec![tls, spk.clone()]);
    assert_eq!(store.list_loaded(Some(KernelType::Spk)), vec![spk]);

    let missing = MissionConfig {
        kernels: vec![dir.path().join("absent.bsp")],
        ..MissionConfig::default()
    };
    assert!(matches!(missing.apply(&mut store), Err(TimeError::Kernel(_))));
    reset_settings();
}

#[test]
fn oversized_spacecraft_ids_leave_settings_untouched() {
    let _guard = LOCK.lock();
    reset_settings();
    let err = Time::set_spacecraft_id_and_lmst_id(-3_000_000).expect_err("no paired clock");
    assert!(matches!(err, TimeError::TimeConversion(_)), "{err:?}");
    assert_eq!(settings(), Settings::default());

    let config = MissionConfig {
        spacecraft_id: Some(3_000_000),
        ..MissionConfig::default()
    };
    let mut store = KernelRegistry::new();
    assert!(matches!(config.apply(&mut store), Err(TimeError::TimeConversion(_))));
    assert_eq!(settings(), Settings::default());
    assert!(store.is_empty());
}
