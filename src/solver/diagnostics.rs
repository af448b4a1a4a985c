use crate::state::{idx_inner, DyeChannel};

/// Total kinetic energy: sum of u² + v² over every cell.
pub fn kinetic_energy(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| a * a + b * b).sum()
}

/// L2 norm of the central-difference divergence over interior cells.
pub fn divergence_norm(u: &[f64], v: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for j in 1..n.saturating_sub(1) {
        for i in 1..(n - 1) {
            let d = 0.5
                * (u[idx_inner(i + 1, j, n)] - u[idx_inner(i - 1, j, n)]
                    + v[idx_inner(i, j + 1, n)] - v[idx_inner(i, j - 1, n)]);
            sum += d * d;
        }
    }
    sum.sqrt()
}

/// Mean of each velocity component.
pub fn mean_velocity(u: &[f64], v: &[f64]) -> (f64, f64) {
    if u.is_empty() {
        return (0.0, 0.0);
    }
    let count = u.len() as f64;
    (u.iter().sum::<f64>() / count, v.iter().sum::<f64>() / count)
}

/// Largest speed |(u, v)| in the field.
pub fn max_speed(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| (a * a + b * b).sqrt()).fold(0.0, f64::max)
}

/// Sum of dye in each channel.
pub fn total_dye(dye: &[DyeChannel]) -> Vec<f64> {
    dye.iter().map(|ch| ch.cur.iter().sum()).collect()
}
