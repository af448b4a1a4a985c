//! Read-only views of a grid for renderers.
//!
//! Nothing here mutates the simulation; callers read between steps.

use crate::state::{idx_inner, SimState, MAX_CHANNELS};

/// Velocity as interleaved `[u, v]` pairs, row-major.
pub fn velocity_flat(state: &SimState) -> Vec<f64> {
    state.u.iter().zip(&state.v).flat_map(|(&u, &v)| [u, v]).collect()
}

/// One `[r, g, b]` triple per cell, row-major; absent channels read as zero.
/// Empty when the grid carries no dye.
pub fn density_triples(state: &SimState) -> Vec<[f64; 3]> {
    if !state.has_dye() {
        return Vec::new();
    }
    let size = state.dim() * state.dim();
    (0..size)
        .map(|i| {
            let mut rgb = [0.0; MAX_CHANNELS];
            for (c, ch) in state.dye.iter().enumerate() {
                rgb[c] = ch.cur[i];
            }
            rgb
        })
        .collect()
}

/// Velocity components multiplied by the grid's display scale.
pub fn scaled_vectors(state: &SimState) -> (Vec<f64>, Vec<f64>) {
    let s = state.scale();
    (
        state.u.iter().map(|&x| x * s).collect(),
        state.v.iter().map(|&x| x * s).collect(),
    )
}

/// Owned copy of one completed step, handed from the physics thread to a renderer.
pub struct FrameSnapshot {
    pub dim: usize,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
    /// Interleaved r, g, b per cell (zero where a channel is absent).
    pub dye_rgb: Vec<f64>,
    pub time: f64,
    pub steps: u64,
}

impl FrameSnapshot {
    /// Pre-allocate a snapshot buffer for an `n x n` grid.
    pub fn new_empty(n: usize) -> Self {
        FrameSnapshot {
            dim: n,
            u: vec![0.0; n * n],
            v: vec![0.0; n * n],
            dye_rgb: vec![0.0; n * n * MAX_CHANNELS],
            time: 0.0,
            steps: 0,
        }
    }

    /// Speed |(u, v)| at cell (x, y).
    pub fn speed(&self, x: usize, y: usize) -> f64 {
        let i = idx_inner(x, y, self.dim);
        (self.u[i] * self.u[i] + self.v[i] * self.v[i]).sqrt()
    }
}

/// Copy the current state into a pre-allocated snapshot, avoiding allocation.
///
/// Panics if `dst` was sized for a different grid.
pub fn snapshot_into(state: &SimState, dst: &mut FrameSnapshot) {
    assert_eq!(dst.dim, state.dim(), "snapshot sized for a different grid");
    dst.u.copy_from_slice(&state.u);
    dst.v.copy_from_slice(&state.v);
    dst.dye_rgb.fill(0.0);
    for (c, ch) in state.dye.iter().enumerate() {
        for (i, &d) in ch.cur.iter().enumerate() {
            dst.dye_rgb[i * MAX_CHANNELS + c] = d;
        }
    }
    dst.time = state.time;
    dst.steps = state.steps;
}
