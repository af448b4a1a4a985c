use crate::spectral::packed_idx;
use crate::state::idx_inner;

/// Zero the outer ring (row 0, row n-1, column 0, column n-1) of each
/// row-major `n`-wide field. Corners are written twice.
pub fn zero_boundary(fields: &mut [&mut [f64]], n: usize) {
    for field in fields.iter_mut() {
        zero_ring(field, n, idx_inner);
    }
}

/// Same ring for buffers in the packed `(n + 2)`-stride transform layout.
/// The two padding columns are left alone.
pub fn zero_packed_boundary(fields: &mut [&mut [f64]], n: usize) {
    for field in fields.iter_mut() {
        zero_ring(field, n, packed_idx);
    }
}

fn zero_ring(field: &mut [f64], n: usize, at: fn(usize, usize, usize) -> usize) {
    if n == 0 {
        return;
    }
    for i in 0..n {
        field[at(i, 0, n)] = 0.0;
        field[at(i, n - 1, n)] = 0.0;
        field[at(0, i, n)] = 0.0;
        field[at(n - 1, i, n)] = 0.0;
    }
}

/// True when every outer-ring cell of `field` is exactly zero.
pub fn boundary_is_zero(field: &[f64], n: usize) -> bool {
    ring_is_zero(field, n, idx_inner)
}

/// `boundary_is_zero` for packed `(n + 2)`-stride buffers.
pub fn packed_boundary_is_zero(field: &[f64], n: usize) -> bool {
    ring_is_zero(field, n, packed_idx)
}

fn ring_is_zero(field: &[f64], n: usize, at: fn(usize, usize, usize) -> usize) -> bool {
    (0..n).all(|i| {
        field[at(i, 0, n)] == 0.0
            && field[at(i, n - 1, n)] == 0.0
            && field[at(0, i, n)] == 0.0
            && field[at(n - 1, i, n)] == 0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_boundary_clears_ring_only() {
        let n = 6;
        let mut u = vec![1.0; n * n];
        let mut v = vec![2.0; n * n];
        zero_boundary(&mut [&mut u[..], &mut v[..]], n);
        for j in 0..n {
            for i in 0..n {
                let edge = i == 0 || j == 0 || i == n - 1 || j == n - 1;
                let ii = idx_inner(i, j, n);
                if edge {
                    assert_eq!(u[ii], 0.0, "u edge ({},{}) not cleared", i, j);
                    assert_eq!(v[ii], 0.0, "v edge ({},{}) not cleared", i, j);
                } else {
                    assert_eq!(u[ii], 1.0, "u interior ({},{}) touched", i, j);
                    assert_eq!(v[ii], 2.0, "v interior ({},{}) touched", i, j);
                }
            }
        }
        assert!(boundary_is_zero(&u, n));
    }

    #[test]
    fn test_zero_packed_boundary_uses_padded_stride() {
        let n = 4;
        let stride = n + 2;
        let mut packed = vec![5.0; n * stride];
        zero_packed_boundary(&mut [&mut packed[..]], n);
        assert!(packed_boundary_is_zero(&packed, n));
        for y in 0..n {
            for x in 0..stride {
                let ring = x < n && (x == 0 || y == 0 || x == n - 1 || y == n - 1);
                let expected = if ring { 0.0 } else { 5.0 };
                assert_eq!(packed[y * stride + x], expected, "packed cell ({},{})", x, y);
            }
        }
        // Row 1 interior at x = 1 would be cleared by an n-stride pass.
        assert!(!boundary_is_zero(&packed, n));
    }

    #[test]
    fn test_boundary_is_zero_detects_nonzero_edge() {
        let n = 4;
        let mut u = vec![0.0; n * n];
        u[idx_inner(3, 2, n)] = 1e-300;
        assert!(!boundary_is_zero(&u, n));
    }
}
