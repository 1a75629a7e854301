//! Engine configuration: loaded from ~/.superscope/engine.yaml.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// When the `init` hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitPolicy {
    /// Once at load, then again every frame after the `frame` hook. The
    /// point count is re-read from `n` each time.
    #[default]
    EveryFrame,
    /// Once at load only; the point count is fixed until the next load.
    OnLoad,
}

/// What makes the `beat` hook run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeatTrigger {
    /// The snapshot's beat flag.
    #[default]
    Detected,
    /// A random strobe while `v` is above `threshold`: each such frame fires
    /// with the given probability.
    EnergyGate { threshold: f64, probability: f64 },
}

impl BeatTrigger {
    pub fn energy_gate() -> Self {
        BeatTrigger::EnergyGate {
            threshold: 0.65,
            probability: 0.04,
        }
    }
}

/// Frame driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub init_policy: InitPolicy,
    pub beat_trigger: BeatTrigger,
    /// Multiplier applied to snapshot energy before clamping into `v`.
    pub sensitivity: f64,
    /// Point count before any `init` code sets `n`.
    pub default_points: usize,
    pub min_points: usize,
    pub max_points: usize,
    /// Seed for `rand()` and the energy gate. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            init_policy: InitPolicy::default(),
            beat_trigger: BeatTrigger::default(),
            sensitivity: 1.0,
            default_points: 256,
            min_points: 16,
            max_points: 4096,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Load config from the standard path (~/.superscope/engine.yaml).
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load() -> Option<Self> {
        Self::load_at(&default_config_path()?)
    }

    /// Like [`load`](Self::load) but from `path`: a missing file or malformed
    /// YAML yields `None`, the latter with a warning.
    pub fn load_at(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_yaml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("ignoring malformed engine config: {e}");
                None
            }
        }
    }

    /// Load config from an explicit YAML file.
    pub fn load_from(path: &Path) -> Result<Self, io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save config as YAML, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(io::Error::other)?;
        std::fs::write(path, yaml)
    }

    /// Clamp a requested point count into `[min_points, max_points]`.
    ///
    /// Non-finite requests fall back to `min_points`.
    pub fn clamp_points(&self, requested: f64) -> usize {
        let lo = self.min_points.max(1);
        let hi = self.max_points.max(lo);
        if !requested.is_finite() {
            return lo;
        }
        requested.clamp(lo as f64, hi as f64) as usize
    }
}

/// Default config location.
pub fn default_config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".superscope").join("engine.yaml"))
}
