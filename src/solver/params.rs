use serde::Deserialize;

use crate::error::FluidError;

/// How a stroke deposits force into the accumulation buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InjectionMode {
    /// Add the whole impulse to the single nearest cell.
    #[default]
    Nearest,
    /// Spread the impulse over the four surrounding cells with bilinear weights.
    Splat,
}

impl InjectionMode {
    pub fn toggle(self) -> Self {
        match self {
            InjectionMode::Nearest => InjectionMode::Splat,
            InjectionMode::Splat => InjectionMode::Nearest,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InjectionMode::Nearest => "nearest",
            InjectionMode::Splat => "splat",
        }
    }
}

/// Solver parameters for the fluid simulation.
#[derive(Clone, Debug)]
pub struct SolverParams {
    pub dt: f64,
    pub visc: f64,
    /// Per-step multiplier on the force buffers.
    pub force_decay: f64,
    /// Per-step multiplier on every dye channel.
    pub density_decay: f64,
    /// Largest force magnitude any cell may accumulate.
    pub force_cap: f64,
    /// Dye value written per unit of stroke color.
    pub dye_intensity: f64,
    pub density_enabled: bool,
    pub injection_mode: InjectionMode,
    /// Brush radius in cells for splat mode; 0 is a single bilinear splat.
    pub splat_radius: f64,
    /// Zero the outer ring of velocity after every step.
    pub closed_boundary: bool,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            dt: 0.01,
            visc: 0.001,
            force_decay: 0.85,
            density_decay: 0.995,
            force_cap: 0.1,
            dye_intensity: 10.0,
            density_enabled: true,
            injection_mode: InjectionMode::Nearest,
            splat_radius: 0.0,
            closed_boundary: true,
        }
    }
}

impl SolverParams {
    /// Check ranges; a failure names the first offending field.
    pub fn validate(&self) -> Result<(), FluidError> {
        let checks: [(&'static str, f64, bool); 7] = [
            ("dt", self.dt, self.dt > 0.0),
            ("visc", self.visc, self.visc >= 0.0),
            ("force_decay", self.force_decay, (0.0..=1.0).contains(&self.force_decay)),
            ("density_decay", self.density_decay, (0.0..=1.0).contains(&self.density_decay)),
            ("force_cap", self.force_cap, self.force_cap > 0.0),
            ("dye_intensity", self.dye_intensity, self.dye_intensity >= 0.0),
            ("splat_radius", self.splat_radius, self.splat_radius >= 0.0),
        ];
        for (name, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(FluidError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let p = SolverParams::default();
        assert_eq!(p.dt, 0.01);
        assert_eq!(p.visc, 0.001);
        assert_eq!(p.force_decay, 0.85);
        assert_eq!(p.density_decay, 0.995);
        assert_eq!(p.force_cap, 0.1);
        assert_eq!(p.dye_intensity, 10.0);
        assert!(p.density_enabled);
        assert_eq!(p.injection_mode, InjectionMode::Nearest);
        assert!(p.closed_boundary);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_dt() {
        let p = SolverParams { dt: 0.0, ..SolverParams::default() };
        assert_eq!(p.validate(), Err(FluidError::InvalidParameter { name: "dt", value: 0.0 }));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let p = SolverParams { visc: f64::NAN, ..SolverParams::default() };
        assert!(matches!(p.validate(), Err(FluidError::InvalidParameter { name: "visc", .. })));
    }

    #[test]
    fn test_validate_rejects_growing_decay() {
        let p = SolverParams { force_decay: 1.5, ..SolverParams::default() };
        assert!(matches!(p.validate(), Err(FluidError::InvalidParameter { name: "force_decay", .. })));
        let p = SolverParams { density_decay: -0.1, ..SolverParams::default() };
        assert!(matches!(p.validate(), Err(FluidError::InvalidParameter { name: "density_decay", .. })));
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let p = SolverParams { force_cap: 0.0, ..SolverParams::default() };
        assert!(matches!(p.validate(), Err(FluidError::InvalidParameter { name: "force_cap", .. })));
    }

    #[test]
    fn test_injection_mode_toggle() {
        assert_eq!(InjectionMode::Nearest.toggle(), InjectionMode::Splat);
        assert_eq!(InjectionMode::Splat.toggle(), InjectionMode::Nearest);
        assert_eq!(InjectionMode::Splat.label(), "splat");
    }
}
