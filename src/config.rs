use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::export::ExportFormat;
use crate::renderer::ColorMap;
use crate::scene::SceneKind;
use crate::solver::SolverParams;

/// Config file looked up in the working directory by [`load`].
pub const DEFAULT_PATH: &str = "fluidbox.yaml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub physics: PhysicsConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
    pub scene: SceneKind,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub width: usize,
    pub height: usize,
    pub diff: f64,
    pub visc: f64,
    pub dt: f64,
    /// Use measured wall-clock time per frame instead of the fixed `dt`.
    pub realtime: bool,
    /// Cap on the measured step when `realtime` is on.
    pub max_dt: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Screen pixels per grid cell.
    pub scale: usize,
    pub target_fps: usize,
    /// Density palette, also used for PNG export.
    pub colormap: ColorMap,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub enabled: bool,
    pub dir: String,
    pub format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            display: DisplayConfig::default(),
            export: ExportConfig::default(),
            scene: SceneKind::Radial,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            diff: 0.01,
            visc: 0.01,
            dt: 0.01,
            realtime: false,
            max_dt: 0.05,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            scale: 5,
            target_fps: 10,
            colormap: ColorMap::Grayscale,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: "frames".to_string(),
            format: ExportFormat::Pfm,
        }
    }
}

impl Config {
    /// Validated solver parameters for the configured grid.
    pub fn solver_params(&self) -> Result<SolverParams> {
        let p = &self.physics;
        if p.width == 0 || p.height == 0 {
            return Err(Error::InvalidParameter(format!(
                "grid must be at least 1x1, got {}x{}",
                p.width, p.height
            )));
        }
        for (name, value) in [("diff", p.diff), ("visc", p.visc)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        for (name, value) in [("dt", p.dt), ("max_dt", p.max_dt)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(SolverParams {
            width: p.width,
            height: p.height,
            diff: p.diff,
            visc: p.visc,
        })
    }

    /// Step size for a frame that took `elapsed` seconds of wall-clock time.
    pub fn step_dt(&self, elapsed: f64) -> f64 {
        if self.physics.realtime {
            elapsed.clamp(0.0, self.physics.max_dt)
        } else {
            self.physics.dt
        }
    }
}

/// Read and parse a config file. Errors are returned, not defaulted.
pub fn load_from(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `fluidbox.yaml` from the working directory, falling back to
/// defaults when it is missing or broken.
pub fn load() -> Config {
    let path = Path::new(DEFAULT_PATH);
    if !path.exists() {
        return Config::default();
    }
    match load_from(path) {
        Ok(cfg) => {
            log::info!("loaded {}", path.display());
            cfg
        }
        Err(e) => {
            log::warn!("{e}; using defaults");
            Config::default()
        }
    }
}
