use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, FluidError};
use crate::solver::{InjectionMode, SolverParams};

pub const CONFIG_FILE: &str = "inkflow.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub solver: SolverConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub dim: usize,
    pub scale: f64,
    pub channels: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub dt: f64,
    pub visc: f64,
    pub force_decay: f64,
    pub density_decay: f64,
    pub force_cap: f64,
    pub dye_intensity: f64,
    pub density_enabled: bool,
    pub injection_mode: InjectionMode,
    pub splat_radius: f64,
    pub closed_boundary: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
    pub steps_per_frame: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { dim: 64, scale: 0.08, channels: 3 }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        let p = SolverParams::default();
        Self {
            dt: p.dt,
            visc: p.visc,
            force_decay: p.force_decay,
            density_decay: p.density_decay,
            force_cap: p.force_cap,
            dye_intensity: p.dye_intensity,
            density_enabled: p.density_enabled,
            injection_mode: p.injection_mode,
            splat_radius: p.splat_radius,
            closed_boundary: p.closed_boundary,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            target_fps: 60,
            steps_per_frame: 1,
        }
    }
}

impl SolverConfig {
    /// Build validated solver parameters.
    pub fn to_params(&self) -> Result<SolverParams, FluidError> {
        let params = SolverParams {
            dt: self.dt,
            visc: self.visc,
            force_decay: self.force_decay,
            density_decay: self.density_decay,
            force_cap: self.force_cap,
            dye_intensity: self.dye_intensity,
            density_enabled: self.density_enabled,
            injection_mode: self.injection_mode,
            splat_radius: self.splat_radius,
            closed_boundary: self.closed_boundary,
        };
        params.validate()?;
        Ok(params)
    }
}

impl Config {
    /// Check every section that feeds the simulation.
    pub fn validate(&self) -> Result<(), FluidError> {
        if self.grid.dim < 2 || self.grid.dim % 2 != 0 {
            return Err(FluidError::InvalidDimension(self.grid.dim));
        }
        if self.grid.channels > crate::state::MAX_CHANNELS {
            return Err(FluidError::TooManyChannels(self.grid.channels));
        }
        self.solver.to_params().map(|_| ())
    }
}

/// Read and validate a config file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&contents)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `inkflow.yaml` from the working directory, falling back to defaults
/// when it is missing or unusable.
pub fn load() -> Config {
    let path = Path::new(CONFIG_FILE);
    if !path.exists() {
        return Config::default();
    }
    match load_from(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("{CONFIG_FILE}: {e}; using defaults");
            Config::default()
        }
    }
}
