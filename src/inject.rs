use crate::solver::{InjectionMode, SolverParams};
use crate::state::{idx_inner, SimState};

/// A drag gesture in normalized [0,1] x [0,1] grid space.
///
/// Strength is eased linearly from `strength_start` at (x1, y1) to
/// `strength_end` at (x2, y2) and clamped to [0, 1] as a fraction of the
/// force cap. A color seeds dye along the path.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub strength_start: f64,
    pub strength_end: f64,
    pub color: Option<[f64; 3]>,
}

impl Stroke {
    /// Full-strength, uncolored stroke.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2, strength_start: 1.0, strength_end: 1.0, color: None }
    }

    pub fn with_strength(mut self, start: f64, end: f64) -> Self {
        self.strength_start = start;
        self.strength_end = end;
        self
    }

    pub fn with_color(mut self, color: [f64; 3]) -> Self {
        self.color = Some(color);
        self
    }

    fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }

    /// Unit direction, or None for degenerate (zero-length or NaN) segments.
    ///
    /// Works on half-differences so endpoints near `f64::MAX` still give a
    /// finite length; only an infinite endpoint yields None.
    fn direction(&self) -> Option<(f64, f64)> {
        let dx = 0.5 * self.x2 - 0.5 * self.x1;
        let dy = 0.5 * self.y2 - 0.5 * self.y1;
        let len = dx.hypot(dy);
        if len > 0.0 && len.is_finite() {
            Some((dx / len, dy / len))
        } else {
            None
        }
    }

    fn strength_at(&self, f: f64) -> f64 {
        let w = self.strength_start + (self.strength_end - self.strength_start) * f;
        if w.is_nan() { 0.0 } else { w.clamp(0.0, 1.0) }
    }
}

/// Non-finite color weights seed nothing.
fn color_weight(w: f64) -> f64 {
    if w.is_finite() { w } else { 0.0 }
}

/// Number of sample intervals along the stroke: two per crossed cell.
fn sub_steps(len: f64, n: usize) -> usize {
    let cells = len * (n + 1) as f64;
    // The longest segment inside the unit square is its diagonal; anything
    // beyond that only revisits clamped edge cells.
    let max_steps = 4 * (n + 1);
    if !cells.is_finite() {
        return max_steps;
    }
    ((2.0 * cells).ceil() as usize).clamp(1, max_steps)
}

/// Clamped nearest cell for a normalized coordinate.
fn nearest_cell(coord: f64, n: usize) -> usize {
    // NaN saturates to 0 in the cast.
    ((n + 1) as f64 * coord).floor().clamp(0.0, (n - 1) as f64) as usize
}

/// The four cells around a continuous grid position, with bilinear weights.
/// At the last row/column the upper neighbor collapses onto the edge cell.
fn bilinear_cells(px: f64, py: f64, n: usize) -> [(usize, f64); 4] {
    let px = if px.is_nan() { 0.0 } else { px };
    let py = if py.is_nan() { 0.0 } else { py };
    let i0 = px.floor() as usize;
    let j0 = py.floor() as usize;
    let i1 = (i0 + 1).min(n - 1);
    let j1 = (j0 + 1).min(n - 1);
    let s = px - i0 as f64;
    let t = py - j0 as f64;
    [
        (idx_inner(i0, j0, n), (1.0 - s) * (1.0 - t)),
        (idx_inner(i1, j0, n), s * (1.0 - t)),
        (idx_inner(i0, j1, n), (1.0 - s) * t),
        (idx_inner(i1, j1, n), s * t),
    ]
}

/// Lattice offsets of a disc brush, each carrying an equal share of one unit.
fn brush_offsets(radius: f64) -> Vec<(f64, f64, f64)> {
    if radius.is_nan() || radius <= 0.0 {
        return vec![(0.0, 0.0, 1.0)];
    }
    let r = radius.ceil() as i64;
    let mut offsets = Vec::new();
    for oy in -r..=r {
        for ox in -r..=r {
            let (fx, fy) = (ox as f64, oy as f64);
            if fx * fx + fy * fy <= radius * radius {
                offsets.push((fx, fy, 0.0));
            }
        }
    }
    let w = 1.0 / offsets.len() as f64;
    for o in &mut offsets {
        o.2 = w;
    }
    offsets
}

/// Add (fx, fy) to cell `i` and rescale the cell's force to at most `cap`.
fn add_capped(fu: &mut [f64], fv: &mut [f64], i: usize, fx: f64, fy: f64, cap: f64) {
    fu[i] += fx;
    fv[i] += fy;
    let mag = (fu[i] * fu[i] + fv[i] * fv[i]).sqrt();
    if mag > cap {
        let s = cap / mag;
        fu[i] *= s;
        fv[i] *= s;
    }
}

/// Deposit a stroke into the force buffers and, when colored, seed dye.
///
/// Never fails: coordinates are clamped onto the grid and degenerate
/// segments contribute no force. Must be called between steps.
pub fn inject(state: &mut SimState, params: &SolverParams, stroke: &Stroke) {
    let n = state.dim();
    let nf = n as f64;
    let cap = params.force_cap;
    let dir = stroke.direction();
    let steps = sub_steps(stroke.length(), n);
    let brush = match params.injection_mode {
        InjectionMode::Nearest => Vec::new(),
        InjectionMode::Splat => brush_offsets(params.splat_radius),
    };
    let seed = match stroke.color {
        Some(color) if params.density_enabled && state.has_dye() => Some(color.map(color_weight)),
        _ => None,
    };

    log::debug!(
        "inject ({:.3},{:.3})->({:.3},{:.3}) {} in {} sub-steps",
        stroke.x1,
        stroke.y1,
        stroke.x2,
        stroke.y2,
        params.injection_mode.label(),
        steps
    );

    for k in 0..=steps {
        let f = k as f64 / steps as f64;
        let x = stroke.x1 + (stroke.x2 - stroke.x1) * f;
        let y = stroke.y1 + (stroke.y2 - stroke.y1) * f;

        if let Some((dx, dy)) = dir {
            let mag = cap * stroke.strength_at(f);
            let (fx, fy) = (mag * dx, mag * dy);
            match params.injection_mode {
                InjectionMode::Nearest => {
                    let i = idx_inner(nearest_cell(x, n), nearest_cell(y, n), n);
                    add_capped(&mut state.fu, &mut state.fv, i, fx, fy, cap);
                }
                InjectionMode::Splat => {
                    let px = (nf + 1.0) * x;
                    let py = (nf + 1.0) * y;
                    for &(ox, oy, share) in &brush {
                        let bx = (px + ox).clamp(0.0, nf - 1.0);
                        let by = (py + oy).clamp(0.0, nf - 1.0);
                        for (i, w) in bilinear_cells(bx, by, n) {
                            if w > 0.0 {
                                add_capped(&mut state.fu, &mut state.fv, i, share * w * fx, share * w * fy, cap);
                            }
                        }
                    }
                }
            }
        }

        if let Some(color) = seed {
            let i = idx_inner(nearest_cell(x, n), nearest_cell(y, n), n);
            for (ch, weight) in state.dye.iter_mut().zip(color) {
                ch.seed(i, params.dye_intensity * weight);
            }
        }
    }
}
