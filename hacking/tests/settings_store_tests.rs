use std::fs;
use std::time::Duration;

use hacking::difficulty::Difficulty;
use hacking::settings::{HackSettings, MAX_TICK_INTERVAL_MS, SettingsStore};

#[test]
fn missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("absent.json"));
    let settings = store.load();
    assert_eq!(settings, HackSettings::default());
    assert_eq!(settings.difficulty, Difficulty::Normal);
    assert_eq!(settings.tick_interval(), Duration::from_secs(1));
}

#[test]
fn save_then_load_keeps_choices() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));
    let settings = HackSettings {
        difficulty: Difficulty::Exceptional,
        tick_interval_ms: 250,
        seed: Some(42),
        ..HackSettings::default()
    };

    store.save(&settings).unwrap();
    assert!(store.path().exists());
    assert_eq!(store.load(), settings);
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ difficulty: ").unwrap();
    assert_eq!(SettingsStore::new(&path).load(), HackSettings::default());
}

#[test]
fn partial_file_fills_in_defaults_and_clamps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "difficulty": "hard", "tickIntervalMs": 999999999 }"#).unwrap();

    let settings = SettingsStore::new(&path).load();
    assert_eq!(settings.difficulty, Difficulty::Hard);
    assert_eq!(settings.tick_interval_ms, MAX_TICK_INTERVAL_MS);
    assert_eq!(settings.seed, None);
    assert_eq!(settings.version, 1);
}
