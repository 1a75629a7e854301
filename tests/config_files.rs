//! Engine config persistence and its effect on rendering.

use tempfile::TempDir;

use superscope::engine::{AudioFeatures, BeatTrigger, CanvasSize, EngineConfig, InitPolicy, ScopeEngine};

#[test]
fn save_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("engine.yaml");
    EngineConfig::default().save_to(&path).unwrap();
    assert!(path.exists());
    assert_eq!(EngineConfig::load_from(&path).unwrap(), EngineConfig::default());
}

#[test]
fn hand_written_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("engine.yaml");
    std::fs::write(
        &path,
        "init_policy: on_load\n\
         beat_trigger: !energy_gate\n  threshold: 0.2\n  probability: 1.0\n\
         min_points: 8\n\
         max_points: 64\n\
         seed: 7\n",
    )
    .unwrap();

    let config = EngineConfig::load_from(&path).unwrap();
    assert_eq!(config.init_policy, InitPolicy::OnLoad);
    assert_eq!(
        config.beat_trigger,
        BeatTrigger::EnergyGate {
            threshold: 0.2,
            probability: 1.0
        }
    );
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.sensitivity, 1.0);
    assert_eq!(config.default_points, 256);
}

#[test]
fn loaded_bounds_drive_the_engine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("engine.yaml");
    std::fs::write(&path, "min_points: 8\nmax_points: 64\nseed: 1\n").unwrap();

    let mut engine = ScopeEngine::new(EngineConfig::load_from(&path).unwrap());
    let size = CanvasSize::new(100.0, 100.0);

    // default_points 256 is clamped into the configured range
    assert_eq!(engine.point_count(), 64);

    engine.load_preset("Init: n=2");
    assert_eq!(engine.render_frame(&AudioFeatures::silent(0.0), size).points.len(), 8);
}

#[test]
fn missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = EngineConfig::load_from(&dir.path().join("absent.yaml")).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
