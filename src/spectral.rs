//! In-place 2-D real/complex FFT over an n x n grid in the packed layout.
//!
//! A packed buffer holds `n` rows of `n + 2` reals. Before `forward` each row
//! carries `n` spatial samples followed by two padding slots; afterwards each
//! row `ky` carries `n/2 + 1` interleaved `(re, im)` pairs for `kx = 0..=n/2`.
//! Neither direction normalizes, so a round trip scales values by `n * n`.

use std::sync::Arc;

use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::FluidError;

/// Row stride (in reals) of the packed layout for grid size `n`.
#[inline(always)]
pub const fn packed_stride(n: usize) -> usize {
    n + 2
}

/// Total length of a packed buffer for grid size `n`.
#[inline(always)]
pub const fn packed_len(n: usize) -> usize {
    n * packed_stride(n)
}

/// Index of real sample `(x, y)` in a packed buffer.
#[inline(always)]
pub const fn packed_idx(x: usize, y: usize, n: usize) -> usize {
    y * packed_stride(n) + x
}

/// Forward and inverse plans for one grid size, plus the scratch they need.
///
/// Owned by a single grid; two grids of different sizes never share a plan.
pub struct FftPlan {
    n: usize,
    row_forward: Arc<dyn RealToComplex<f64>>,
    row_inverse: Arc<dyn ComplexToReal<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
    real_row: Vec<f64>,
    spectrum_row: Vec<Complex<f64>>,
    column: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl FftPlan {
    pub fn new(n: usize) -> Result<Self, FluidError> {
        if n < 2 || n % 2 != 0 {
            return Err(FluidError::InvalidDimension(n));
        }
        let mut real_planner = RealFftPlanner::<f64>::new();
        let row_forward = real_planner.plan_fft_forward(n);
        let row_inverse = real_planner.plan_fft_inverse(n);

        let mut planner = FftPlanner::<f64>::new();
        let col_forward = planner.plan_fft_forward(n);
        let col_inverse = planner.plan_fft_inverse(n);

        let scratch_len = row_forward
            .get_scratch_len()
            .max(row_inverse.get_scratch_len())
            .max(col_forward.get_inplace_scratch_len())
            .max(col_inverse.get_inplace_scratch_len());

        Ok(Self {
            n,
            real_row: row_forward.make_input_vec(),
            spectrum_row: row_forward.make_output_vec(),
            column: vec![Complex::new(0.0, 0.0); n],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            row_forward,
            row_inverse,
            col_forward,
            col_inverse,
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// Real-to-complex transform of a packed buffer, in place.
    pub fn forward(&mut self, buf: &mut [f64]) {
        let n = self.n;
        let stride = packed_stride(n);
        assert_eq!(buf.len(), packed_len(n), "packed buffer does not match plan size {}", n);

        for row in buf.chunks_exact_mut(stride) {
            self.real_row.copy_from_slice(&row[..n]);
            self.row_forward
                .process_with_scratch(&mut self.real_row, &mut self.spectrum_row, &mut self.scratch)
                .expect("row buffers are sized by the plan");
            for (k, c) in self.spectrum_row.iter().enumerate() {
                row[2 * k] = c.re;
                row[2 * k + 1] = c.im;
            }
        }
        self.transform_columns(buf, true);
    }

    /// Complex-to-real transform of a packed buffer, in place.
    ///
    /// The imaginary parts of the `kx = 0` and `kx = n/2` bins are discarded,
    /// as a real signal's spectrum cannot carry them.
    pub fn inverse(&mut self, buf: &mut [f64]) {
        let n = self.n;
        let stride = packed_stride(n);
        assert_eq!(buf.len(), packed_len(n), "packed buffer does not match plan size {}", n);

        self.transform_columns(buf, false);
        let last = n / 2;
        for row in buf.chunks_exact_mut(stride) {
            for (k, c) in self.spectrum_row.iter_mut().enumerate() {
                *c = Complex::new(row[2 * k], row[2 * k + 1]);
            }
            self.spectrum_row[0].im = 0.0;
            self.spectrum_row[last].im = 0.0;
            self.row_inverse
                .process_with_scratch(&mut self.spectrum_row, &mut self.real_row, &mut self.scratch)
                .expect("row buffers are sized by the plan");
            row[..n].copy_from_slice(&self.real_row);
            row[n] = 0.0;
            row[n + 1] = 0.0;
        }
    }

    /// Complex FFT down each of the `n/2 + 1` packed columns.
    fn transform_columns(&mut self, buf: &mut [f64], forward: bool) {
        let n = self.n;
        let fft = if forward { &self.col_forward } else { &self.col_inverse };
        for kx in 0..=n / 2 {
            for y in 0..n {
                let i = packed_idx(2 * kx, y, n);
                self.column[y] = Complex::new(buf[i], buf[i + 1]);
            }
            fft.process_with_scratch(&mut self.column, &mut self.scratch);
            for y in 0..n {
                let i = packed_idx(2 * kx, y, n);
                buf[i] = self.column[y].re;
                buf[i + 1] = self.column[y].im;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed_from_fn(n: usize, f: impl Fn(usize, usize) -> f64) -> Vec<f64> {
        let mut buf = vec![0.0; packed_len(n)];
        for y in 0..n {
            for x in 0..n {
                buf[packed_idx(x, y, n)] = f(x, y);
            }
        }
        buf
    }

    #[test]
    fn test_rejects_odd_and_zero_sizes() {
        assert!(matches!(FftPlan::new(0), Err(FluidError::InvalidDimension(0))));
        assert!(matches!(FftPlan::new(7), Err(FluidError::InvalidDimension(7))));
        assert!(FftPlan::new(8).is_ok());
    }

    #[test]
    fn test_constant_field_lands_in_zero_bin() {
        let n = 8;
        let mut plan = FftPlan::new(n).unwrap();
        let mut buf = packed_from_fn(n, |_, _| 1.5);
        plan.forward(&mut buf);
        let dc = buf[packed_idx(0, 0, n)];
        assert!((dc - 1.5 * (n * n) as f64).abs() < 1e-9, "DC bin should hold the sum, got {}", dc);
        for (i, v) in buf.iter().enumerate().skip(1) {
            assert!(v.abs() < 1e-9, "non-DC slot {} should be zero, got {}", i, v);
        }
    }

    #[test]
    fn test_single_mode_lands_in_expected_bin() {
        // cos(2*pi*x/n) puts n*n/2 into bin kx=1, ky=0.
        let n = 8;
        let mut plan = FftPlan::new(n).unwrap();
        let mut buf = packed_from_fn(n, |x, _| (2.0 * std::f64::consts::PI * x as f64 / n as f64).cos());
        plan.forward(&mut buf);
        let re = buf[packed_idx(2, 0, n)];
        assert!((re - (n * n) as f64 / 2.0).abs() < 1e-9, "kx=1 bin re={}", re);
        assert!(buf[packed_idx(0, 0, n)].abs() < 1e-9);
    }

    #[test]
    fn test_round_trip_scales_by_n_squared() {
        let n = 16;
        let mut plan = FftPlan::new(n).unwrap();
        let original = packed_from_fn(n, |x, y| ((x * 7 + y * 3) % 11) as f64 - 5.0);
        let mut buf = original.clone();
        plan.forward(&mut buf);
        plan.inverse(&mut buf);
        let scale = 1.0 / (n * n) as f64;
        for y in 0..n {
            for x in 0..n {
                let i = packed_idx(x, y, n);
                assert!(
                    (buf[i] * scale - original[i]).abs() < 1e-9,
                    "mismatch at ({},{}): {} vs {}", x, y, buf[i] * scale, original[i]
                );
            }
        }
    }

    #[test]
    #[should_panic(expected = "packed buffer")]
    fn test_wrong_buffer_length_panics() {
        let mut plan = FftPlan::new(8).unwrap();
        let mut buf = vec![0.0; 64];
        plan.forward(&mut buf);
    }
}
