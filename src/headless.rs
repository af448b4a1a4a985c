use inkflow::config::Config;
use inkflow::solver::diagnostics;
use inkflow::{fluid_step, inject, FluidError, SimState, Stroke};

/// Ticks between random strokes.
const STROKE_INTERVAL: u64 = 100;
/// Ticks between telemetry lines.
const TELEMETRY_INTERVAL: u64 = 100;

const PALETTE: [[f64; 3]; 4] = [[1.0, 0.2, 0.1], [0.1, 0.6, 1.0], [1.0, 0.85, 0.2], [0.6, 0.2, 1.0]];

/// Small deterministic xorshift generator for reproducible stroke sequences.
pub struct Xor128 {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
}

impl Xor128 {
    pub fn new(seed: u32) -> Self {
        Self {
            x: seed,
            y: seed.wrapping_mul(1812433253).wrapping_add(1),
            z: seed.wrapping_mul(1812433253).wrapping_mul(2).wrapping_add(2),
            w: seed.wrapping_mul(1812433253).wrapping_mul(3).wrapping_add(3),
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = self.w ^ (self.w >> 19) ^ (t ^ (t >> 8));
        self.w
    }

    /// Uniform in [0.0, 1.0].
    pub fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / u32::MAX as f64
    }

    /// A short colored stroke starting somewhere in the middle of the grid.
    pub fn stroke(&mut self) -> Stroke {
        let x1 = 0.2 + 0.6 * self.next_unit();
        let y1 = 0.2 + 0.6 * self.next_unit();
        let angle = std::f64::consts::TAU * self.next_unit();
        let len = 0.05 + 0.15 * self.next_unit();
        let color = PALETTE[(self.next_u32() as usize) % PALETTE.len()];
        Stroke::new(x1, y1, x1 + len * angle.cos(), y1 + len * angle.sin())
            .with_strength(1.0, 0.3)
            .with_color(color)
    }
}

/// Final diagnostics of a headless run.
#[derive(Debug)]
pub struct HeadlessReport {
    pub steps: u64,
    pub kinetic_energy: f64,
    pub divergence: f64,
    pub max_speed: f64,
    pub total_dye: Vec<f64>,
}

impl HeadlessReport {
    fn measure(sim: &SimState) -> Self {
        Self {
            steps: sim.steps,
            kinetic_energy: diagnostics::kinetic_energy(&sim.u, &sim.v),
            divergence: diagnostics::divergence_norm(&sim.u, &sim.v, sim.dim()),
            max_speed: diagnostics::max_speed(&sim.u, &sim.v),
            total_dye: diagnostics::total_dye(&sim.dye),
        }
    }
}

/// Run `steps` ticks without a window, injecting a random stroke every
/// `STROKE_INTERVAL` ticks and logging telemetry.
pub fn run_headless(cfg: &Config, steps: u64, seed: u32) -> Result<HeadlessReport, FluidError> {
    let params = cfg.solver.to_params()?;
    let mut sim = SimState::new(cfg.grid.dim, cfg.grid.scale, cfg.grid.channels)?;
    let mut rng = Xor128::new(seed);
    log::info!("headless run: {} steps on {}x{} ({} injection)", steps, sim.dim(), sim.dim(), params.injection_mode.label());

    for step in 0..steps {
        if step % STROKE_INTERVAL == 0 {
            inject(&mut sim, &params, &rng.stroke());
        }
        fluid_step(&mut sim, &params);
        if (step + 1) % TELEMETRY_INTERVAL == 0 {
            let r = HeadlessReport::measure(&sim);
            log::info!(
                "step={} t={:.3} KE={:.6e} div={:.3e} max|u|={:.4} dye={:?}",
                r.steps,
                sim.time,
                r.kinetic_energy,
                r.divergence,
                r.max_speed,
                r.total_dye
            );
        }
    }
    Ok(HeadlessReport::measure(&sim))
}
