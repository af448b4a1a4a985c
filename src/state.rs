use crate::error::FluidError;
use crate::spectral::{packed_len, FftPlan};

/// Maximum number of dye channels (r, g, b).
pub const MAX_CHANNELS: usize = 3;

/// Convert 2D coordinates to 1D index with toroidal wrapping on an n x n grid.
pub fn idx(x: i64, y: i64, n: usize) -> usize {
    let x = x.rem_euclid(n as i64) as usize;
    let y = y.rem_euclid(n as i64) as usize;
    y * n + x
}

/// Fast index for cells where x,y are guaranteed in-bounds.
/// Skips wrapping; use only when 0 <= x < n and 0 <= y < n.
#[inline(always)]
pub const fn idx_inner(x: usize, y: usize, n: usize) -> usize {
    y * n + x
}

/// One passive dye channel: the current field and its pre-advection copy.
pub struct DyeChannel {
    pub cur: Vec<f64>,
    pub prev: Vec<f64>,
}

impl DyeChannel {
    fn new(size: usize) -> Self {
        Self {
            cur: vec![0.0; size],
            prev: vec![0.0; size],
        }
    }

    /// Set a cell in both buffers so a pending advection reads the same value.
    pub fn seed(&mut self, i: usize, value: f64) {
        self.cur[i] = value;
        self.prev[i] = value;
    }
}

/// Grid state: velocity, force accumulators, optional dye, and the FFT plan.
///
/// `u`, `v`, `fu`, `fv` and every dye buffer are `n * n`, row-major.
/// `u0`, `v0` are packed FFT buffers (`n * (n + 2)`); their first `n * n`
/// entries double as the row-major advection source during a step.
pub struct SimState {
    dim: usize,
    scale: f64,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
    pub u0: Vec<f64>,
    pub v0: Vec<f64>,
    pub fu: Vec<f64>,
    pub fv: Vec<f64>,
    pub dye: Vec<DyeChannel>,
    pub time: f64,
    pub steps: u64,
    pub(crate) plan: FftPlan,
}

impl SimState {
    /// Allocate a zeroed grid of size `dim` with `channels` dye channels (0 disables dye).
    pub fn new(dim: usize, scale: f64, channels: usize) -> Result<Self, FluidError> {
        if channels > MAX_CHANNELS {
            return Err(FluidError::TooManyChannels(channels));
        }
        let plan = FftPlan::new(dim)?;
        let size = dim * dim;
        log::info!("created {dim}x{dim} grid with {channels} dye channel(s)");

        Ok(Self {
            dim,
            scale,
            u: vec![0.0; size],
            v: vec![0.0; size],
            u0: vec![0.0; packed_len(dim)],
            v0: vec![0.0; packed_len(dim)],
            fu: vec![0.0; size],
            fv: vec![0.0; size],
            dye: (0..channels).map(|_| DyeChannel::new(size)).collect(),
            time: 0.0,
            steps: 0,
            plan,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn has_dye(&self) -> bool {
        !self.dye.is_empty()
    }

    /// Zero every buffer and the clock. The plan and allocations are kept.
    pub fn clear(&mut self) {
        for buf in [&mut self.u, &mut self.v, &mut self.u0, &mut self.v0, &mut self.fu, &mut self.fv] {
            buf.fill(0.0);
        }
        for ch in &mut self.dye {
            ch.cur.fill(0.0);
            ch.prev.fill(0.0);
        }
        self.time = 0.0;
        self.steps = 0;
        log::debug!("grid cleared");
    }

    /// Panic if any buffer no longer matches the grid dimension.
    pub(crate) fn assert_consistent(&self) {
        let size = self.dim * self.dim;
        assert_eq!(self.plan.size(), self.dim, "FFT plan sized for a different grid");
        assert!(
            self.u.len() == size && self.v.len() == size && self.fu.len() == size && self.fv.len() == size,
            "velocity/force buffers must be {}x{}",
            self.dim,
            self.dim
        );
        assert!(
            self.u0.len() == packed_len(self.dim) && self.v0.len() == packed_len(self.dim),
            "scratch buffers must use the packed layout"
        );
        for ch in &self.dye {
            assert!(ch.cur.len() == size && ch.prev.len() == size, "dye buffers must be {}x{}", self.dim, self.dim);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idx_basic() {
        let n = 8;
        assert_eq!(idx(0, 0, n), 0);
        assert_eq!(idx(1, 0, n), 1);
        assert_eq!(idx(0, 1, n), n);
        assert_eq!(idx(7, 7, n), n * n - 1);
    }

    #[test]
    fn test_idx_wrap_negative() {
        let n = 8;
        assert_eq!(idx(-1, 0, n), idx(7, 0, n));
        assert_eq!(idx(0, -1, n), idx(0, 7, n));
        assert_eq!(idx(-17, -9, n), idx(7, 7, n));
    }

    #[test]
    fn test_idx_wrap_positive() {
        let n = 8;
        assert_eq!(idx(8, 0, n), idx(0, 0, n));
        assert_eq!(idx(11, 13, n), idx(3, 5, n));
    }

    #[test]
    fn test_new_allocates_zeroed_buffers() {
        let s = SimState::new(16, 0.08, 3).unwrap();
        assert_eq!(s.dim(), 16);
        assert_eq!(s.u.len(), 256);
        assert_eq!(s.v.len(), 256);
        assert_eq!(s.fu.len(), 256);
        assert_eq!(s.u0.len(), 16 * 18);
        assert_eq!(s.v0.len(), 16 * 18);
        assert_eq!(s.dye.len(), 3);
        assert!(s.u.iter().chain(s.v.iter()).chain(s.u0.iter()).all(|&x| x == 0.0));
        assert!(s.dye.iter().all(|c| c.cur.iter().chain(c.prev.iter()).all(|&x| x == 0.0)));
        assert_eq!(s.time, 0.0);
        assert_eq!(s.steps, 0);
    }

    #[test]
    fn test_new_without_dye() {
        let s = SimState::new(8, 1.0, 0).unwrap();
        assert!(!s.has_dye());
    }

    #[test]
    fn test_new_rejects_bad_dimension() {
        assert!(matches!(SimState::new(0, 1.0, 0), Err(FluidError::InvalidDimension(0))));
        assert!(matches!(SimState::new(9, 1.0, 0), Err(FluidError::InvalidDimension(9))));
    }

    #[test]
    fn test_new_rejects_too_many_channels() {
        assert!(matches!(SimState::new(8, 1.0, 4), Err(FluidError::TooManyChannels(4))));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut s = SimState::new(8, 1.0, 2).unwrap();
        s.u[5] = 1.0;
        s.fv[3] = -2.0;
        s.u0[60] = 4.0;
        s.dye[1].seed(10, 7.0);
        s.time = 3.0;
        s.steps = 12;
        s.clear();
        assert!(s.u.iter().chain(s.fv.iter()).chain(s.u0.iter()).all(|&x| x == 0.0));
        assert_eq!(s.dye[1].cur[10], 0.0);
        assert_eq!(s.dye[1].prev[10], 0.0);
        assert_eq!(s.time, 0.0);
        assert_eq!(s.steps, 0);
    }

    #[test]
    fn test_seed_mirrors_into_prev() {
        let mut s = SimState::new(8, 1.0, 1).unwrap();
        s.dye[0].seed(9, 2.5);
        assert_eq!(s.dye[0].cur[9], 2.5);
        assert_eq!(s.dye[0].prev[9], 2.5);
    }

    #[test]
    #[should_panic(expected = "velocity/force buffers")]
    fn test_assert_consistent_catches_resized_buffer() {
        let mut s = SimState::new(8, 1.0, 0).unwrap();
        s.u.push(0.0);
        s.assert_consistent();
    }
}
