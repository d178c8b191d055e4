//! Game configuration (simulation rates, play volume, audio). Loaded from config.ron at startup.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Fixed physics rate in Hz.
    #[serde(default = "default_physics_rate_hz")]
    pub physics_rate_hz: f64,
    /// Most physics sub-steps run in one frame before backlog is dropped.
    #[serde(default = "default_max_substeps")]
    pub max_substeps: u32,
    /// Half extent of the cubic play volume.
    #[serde(default = "default_boundary_half_extent")]
    pub boundary_half_extent: f32,
    /// Hull integrity at launch (0 to 100).
    #[serde(default = "default_starting_health")]
    pub starting_health: f32,
    /// Chase camera lerp factor per frame.
    #[serde(default = "default_camera_smoothing")]
    pub camera_smoothing: f32,
    /// Master volume (0.0 to 1.0).
    #[serde(default = "default_master_volume")]
    pub master_volume: f64,
    /// Directory holding `machinegun.mp3` and `rocket.mp3`.
    #[serde(default = "default_sound_dir")]
    pub sound_dir: PathBuf,
    /// Length of the scripted demo flight in seconds.
    #[serde(default = "default_demo_seconds")]
    pub demo_seconds: f32,
    /// Simulated display rate for the headless demo.
    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: f64,
}

fn default_physics_rate_hz() -> f64 {
    engine_core::DEFAULT_FIXED_RATE_HZ
}
fn default_max_substeps() -> u32 {
    engine_core::DEFAULT_MAX_SUBSTEPS
}
fn default_boundary_half_extent() -> f32 {
    physics::DEFAULT_BOUNDARY_HALF_EXTENT
}
fn default_starting_health() -> f32 {
    crate::state::MAX_HEALTH
}
fn default_camera_smoothing() -> f32 {
    crate::camera::DEFAULT_SMOOTHING
}
fn default_master_volume() -> f64 {
    1.0
}
fn default_sound_dir() -> PathBuf {
    PathBuf::from("sounds")
}
fn default_demo_seconds() -> f32 {
    12.0
}
fn default_frame_rate_hz() -> f64 {
    60.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics_rate_hz: default_physics_rate_hz(),
            max_substeps: default_max_substeps(),
            boundary_half_extent: default_boundary_half_extent(),
            starting_health: default_starting_health(),
            camera_smoothing: default_camera_smoothing(),
            master_volume: default_master_volume(),
            sound_dir: default_sound_dir(),
            demo_seconds: default_demo_seconds(),
            frame_rate_hz: default_frame_rate_hz(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load from an explicit path, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match Self::read(path) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(ConfigError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::debug!("No config at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data)
    }

    /// Parse RON text. Rates that cannot drive a clock fall back to their
    /// defaults with a warning.
    pub fn parse(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        Ok(config.with_valid_rates())
    }

    fn with_valid_rates(mut self) -> Self {
        if !is_valid_rate(self.physics_rate_hz) {
            log::warn!(
                "physics_rate_hz {} is not a positive rate, using {}",
                self.physics_rate_hz,
                default_physics_rate_hz()
            );
            self.physics_rate_hz = default_physics_rate_hz();
        }
        if !is_valid_rate(self.frame_rate_hz) {
            log::warn!(
                "frame_rate_hz {} is not a positive rate, using {}",
                self.frame_rate_hz,
                default_frame_rate_hz()
            );
            self.frame_rate_hz = default_frame_rate_hz();
        }
        self
    }
}

fn is_valid_rate(hz: f64) -> bool {
    hz.is_finite() && hz > 0.0
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
