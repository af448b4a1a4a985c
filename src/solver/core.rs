use crate::spectral::{packed_idx, FftPlan};
use crate::state::{idx, idx_inner};

/// Decay the force buffers, add them to the velocity, and copy the
/// force-combined velocity into the advection source `u0/v0`.
pub fn integrate_forces(
    u: &mut [f64],
    v: &mut [f64],
    u0: &mut [f64],
    v0: &mut [f64],
    fu: &mut [f64],
    fv: &mut [f64],
    decay: f64,
    dt: f64,
) {
    for i in 0..u.len() {
        fu[i] *= decay;
        fv[i] *= decay;
        u[i] += dt * fu[i];
        v[i] += dt * fv[i];
        u0[i] = u[i];
        v0[i] = v[i];
    }
}

/// Bilinearly sample `src` at grid position (x, y) on the torus.
///
/// Uses the true floor so negative positions wrap to the opposite edge.
#[inline]
pub fn sample_periodic(src: &[f64], x: f64, y: f64, n: usize) -> f64 {
    let fx = x.floor();
    let fy = y.floor();
    let s = x - fx;
    let t = y - fy;
    // Reduce first so the +1 neighbor cannot overflow for huge traces.
    let i0 = (fx as i64).rem_euclid(n as i64);
    let j0 = (fy as i64).rem_euclid(n as i64);
    (1.0 - s) * ((1.0 - t) * src[idx(i0, j0, n)] + t * src[idx(i0, j0 + 1, n)])
        + s * ((1.0 - t) * src[idx(i0 + 1, j0, n)] + t * src[idx(i0 + 1, j0 + 1, n)])
}

/// Semi-Lagrangian advection: traces each cell center backwards through (u, v).
/// Velocities are in domain units per step, so the trace length is `dt * n * velocity` cells.
pub fn advect(d: &mut [f64], d0: &[f64], u: &[f64], v: &[f64], dt: f64, n: usize) {
    let dt0 = dt * n as f64;
    for j in 0..n {
        for i in 0..n {
            let ii = idx_inner(i, j, n);
            let x = i as f64 - dt0 * u[ii];
            let y = j as f64 - dt0 * v[ii];
            d[ii] = sample_periodic(d0, x, y, n);
        }
    }
}

/// Spectral diffusion and projection.
///
/// Copies `u, v` into the packed buffers, damps every nonzero wavenumber by
/// `exp(-|k|^2 dt visc)`, removes its component along k, transforms back and
/// writes the normalized result into `u, v`. The zero bin is untouched, so the
/// mean flow survives unchanged.
pub fn diffuse_project(
    u: &mut [f64],
    v: &mut [f64],
    u0: &mut [f64],
    v0: &mut [f64],
    plan: &mut FftPlan,
    visc: f64,
    dt: f64,
) {
    let n = plan.size();
    for j in 0..n {
        for i in 0..n {
            u0[packed_idx(i, j, n)] = u[idx_inner(i, j, n)];
            v0[packed_idx(i, j, n)] = v[idx_inner(i, j, n)];
        }
    }

    plan.forward(u0);
    plan.forward(v0);

    let half = (n / 2) as i64;
    for j in 0..n {
        let ky = if (j as i64) < half { j as f64 } else { j as f64 - n as f64 };
        for kx_i in 0..=n / 2 {
            let kx = kx_i as f64;
            let r = kx * kx + ky * ky;
            if r == 0.0 {
                continue;
            }
            let f = (-r * dt * visc).exp();
            let a = 1.0 - kx * kx / r;
            let b = kx * ky / r;
            let c = 1.0 - ky * ky / r;
            let re = packed_idx(2 * kx_i, j, n);
            let im = re + 1;
            let (ur, ui) = (u0[re], u0[im]);
            let (vr, vi) = (v0[re], v0[im]);
            u0[re] = f * (a * ur - b * vr);
            u0[im] = f * (a * ui - b * vi);
            v0[re] = f * (-b * ur + c * vr);
            v0[im] = f * (-b * ui + c * vi);
        }
    }

    plan.inverse(u0);
    plan.inverse(v0);

    let norm = 1.0 / (n * n) as f64;
    for j in 0..n {
        for i in 0..n {
            u[idx_inner(i, j, n)] = norm * u0[packed_idx(i, j, n)];
            v[idx_inner(i, j, n)] = norm * v0[packed_idx(i, j, n)];
        }
    }
}
