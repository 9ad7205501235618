//! Settings management
//!
//! Settings live in a single JSON document. Missing sections or fields fall
//! back to their defaults, so an empty object `{}` is a valid file.

use sector_core::{ConfigError, GridConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid grid settings")]
    InvalidGrid(#[from] ConfigError),

    #[error("invalid simulation settings: {0}")]
    InvalidSimulation(&'static str),
}

/// Runtime settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridConfig,
    pub simulation: SimulationSettings,
    pub mesh: MeshSettings,
}

/// Shape of the generated world and how long to run it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub ticks: u32,
    pub static_objects: u32,
    pub moving_objects: u32,
    /// Objects spawn in `[-world_extent, world_extent]` on X and Z.
    pub world_extent: f32,
    pub object_half_extent: f32,
    /// Upper bound for moving object speed, in units per second.
    pub max_speed: f32,
    /// Half size of the query box issued around each moving object.
    pub probe_half_extent: f32,
    pub seed: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            ticks: 120,
            static_objects: 10_000,
            moving_objects: 250,
            world_extent: 5_000.0,
            object_half_extent: 4.0,
            max_speed: 40.0,
            probe_half_extent: 60.0,
            seed: 0x5EC7_0A11,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    pub subdivide_level: u32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self { subdivide_level: 3 }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.grid.validate()?;

        let sim = &self.simulation;
        if !(sim.world_extent.is_finite() && sim.world_extent > 0.0) {
            return Err(SettingsError::InvalidSimulation(
                "world_extent must be finite and positive",
            ));
        }
        if !(sim.object_half_extent.is_finite() && sim.object_half_extent >= 0.0) {
            return Err(SettingsError::InvalidSimulation(
                "object_half_extent must be finite and non-negative",
            ));
        }
        if !(sim.probe_half_extent.is_finite() && sim.probe_half_extent >= 0.0) {
            return Err(SettingsError::InvalidSimulation(
                "probe_half_extent must be finite and non-negative",
            ));
        }
        if !(sim.max_speed.is_finite() && sim.max_speed > 0.0) {
            return Err(SettingsError::InvalidSimulation(
                "max_speed must be finite and positive",
            ));
        }
        Ok(())
    }
}
