mod color;

pub use color::{dye_to_rgba, speed_to_rgba};

use inkflow::export::FrameSnapshot;
use inkflow::state::idx_inner;

/// Dye exposure: an intensity-10 seed renders near full brightness.
const DYE_EXPOSURE: f64 = 0.35;

/// What the window shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VizMode {
    /// Tone-mapped dye channels.
    Dye,
    /// Velocity magnitude, normalized per frame.
    Speed,
}

impl VizMode {
    pub fn next(self) -> Self {
        match self {
            VizMode::Dye => VizMode::Speed,
            VizMode::Speed => VizMode::Dye,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VizMode::Dye => "dye",
            VizMode::Speed => "speed",
        }
    }
}

/// Window layout: the square grid stretched over the whole frame.
pub struct RenderConfig {
    pub frame_width: usize,
    pub frame_height: usize,
    pub grid: usize,
}

impl RenderConfig {
    /// Fit a `grid x grid` simulation into the given pixel size (at least one pixel per cell).
    pub fn fit(pixel_width: usize, pixel_height: usize, grid: usize) -> Self {
        Self {
            frame_width: pixel_width.max(grid),
            frame_height: pixel_height.max(grid),
            grid,
        }
    }

    /// Map a window pixel to normalized [0,1] grid coordinates.
    pub fn to_normalized(&self, px: f32, py: f32) -> (f64, f64) {
        (px as f64 / self.frame_width as f64, py as f64 / self.frame_height as f64)
    }

    fn cell_at(&self, sx: usize, sy: usize) -> (f64, f64) {
        let n = self.grid as f64;
        (
            ((sx as f64 + 0.5) / self.frame_width as f64 * n - 0.5).clamp(0.0, n - 1.0),
            ((sy as f64 + 0.5) / self.frame_height as f64 * n - 0.5).clamp(0.0, n - 1.0),
        )
    }
}

/// Bilinear sample of a strided field, clamped to the grid edge.
fn sample(field: &[f64], stride: usize, offset: usize, x: f64, y: f64, n: usize) -> f64 {
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(n - 1);
    let y1 = (y0 + 1).min(n - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;
    let at = |i: usize, j: usize| field[idx_inner(i, j, n) * stride + offset];
    at(x0, y0) * (1.0 - fx) * (1.0 - fy)
        + at(x1, y0) * fx * (1.0 - fy)
        + at(x0, y1) * (1.0 - fx) * fy
        + at(x1, y1) * fx * fy
}

/// Render a snapshot into an RGBA buffer, resizing it to the frame.
/// Row 0 of the grid is the top of the window, matching mouse coordinates.
pub fn render_into(buf: &mut Vec<u8>, snap: &FrameSnapshot, cfg: &RenderConfig, viz_mode: VizMode) {
    let n = snap.dim;
    buf.resize(cfg.frame_width * cfg.frame_height * 4, 0);

    let speeds: Vec<f64> = snap.u.iter().zip(&snap.v).map(|(a, b)| (a * a + b * b).sqrt()).collect();
    let max_speed = speeds.iter().copied().fold(0.0, f64::max);

    for sy in 0..cfg.frame_height {
        for sx in 0..cfg.frame_width {
            let (x, y) = cfg.cell_at(sx, sy);
            let rgba = match viz_mode {
                VizMode::Dye => {
                    let rgb = [
                        sample(&snap.dye_rgb, 3, 0, x, y, n),
                        sample(&snap.dye_rgb, 3, 1, x, y, n),
                        sample(&snap.dye_rgb, 3, 2, x, y, n),
                    ];
                    dye_to_rgba(rgb, DYE_EXPOSURE)
                }
                VizMode::Speed => {
                    let s = sample(&speeds, 1, 0, x, y, n);
                    let t = if max_speed > 0.0 { s / max_speed } else { 0.0 };
                    speed_to_rgba(t.powf(0.6))
                }
            };
            let offset = (sy * cfg.frame_width + sx) * 4;
            buf[offset..offset + 4].copy_from_slice(&rgba);
        }
    }
}
