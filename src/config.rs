use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config/sandcraft.toml";

/// Headless simulation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the world's random stream.
    pub seed: u64,
    /// Number of ticks to simulate.
    pub ticks: u64,
    /// Simulated seconds per tick.
    pub tick_seconds: f32,
    /// Emit a state summary every this many ticks.
    pub log_every: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 9,
            ticks: 600,
            // The original cadence: one step every 15 ms.
            tick_seconds: 0.015,
            log_every: 60,
        }
    }
}

impl SimConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SimConfig::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                SimConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let cfg = SimConfig::load_from_path(Path::new("does/not/exist.toml"));
        assert_eq!(cfg.seed, SimConfig::default().seed);
    }

    #[test]
    fn partial_configs_fill_in_defaults() {
        let cfg: SimConfig = toml::from_str("seed = 1234").unwrap();
        assert_eq!(cfg.seed, 1234);
        assert_eq!(cfg.ticks, SimConfig::default().ticks);
    }
}
