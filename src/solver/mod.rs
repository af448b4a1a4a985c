mod boundary;
mod core;
mod density;
pub mod diagnostics;
mod params;

// Re-export public API
pub use boundary::{boundary_is_zero, packed_boundary_is_zero, zero_boundary, zero_packed_boundary};
pub use core::{advect, diffuse_project, sample_periodic};
pub use params::{InjectionMode, SolverParams};

use crate::state::SimState;
use core::integrate_forces;
use density::advect_dye;

/// Advance the simulation by one tick of `params.dt`.
///
/// Phases run in a fixed order: force integration, self-advection, spectral
/// diffusion and projection, write-back, dye advection, boundary clamp.
/// Panics if the state's buffers no longer match its dimension.
pub fn fluid_step(state: &mut SimState, params: &SolverParams) {
    state.assert_consistent();
    let n = state.dim();
    let dt = params.dt;
    let size = n * n;

    // 1. Forces: u += dt * decayed force; u0 = force-combined velocity
    integrate_forces(
        &mut state.u,
        &mut state.v,
        &mut state.u0[..size],
        &mut state.v0[..size],
        &mut state.fu,
        &mut state.fv,
        params.force_decay,
        dt,
    );

    // 2. Self-advection, sourced from the force-combined field
    advect(&mut state.u, &state.u0[..size], &state.u0[..size], &state.v0[..size], dt, n);
    advect(&mut state.v, &state.v0[..size], &state.u0[..size], &state.v0[..size], dt, n);

    // 3+4. Spectral diffusion + projection, written back into u, v
    diffuse_project(&mut state.u, &mut state.v, &mut state.u0, &mut state.v0, &mut state.plan, params.visc, dt);

    // Dye follows the updated velocity
    if params.density_enabled && state.has_dye() {
        advect_dye(&mut state.dye, &state.u, &state.v, params.density_decay, dt, n);
    }

    // Projection can reintroduce edge values, so the clamp comes last
    if params.closed_boundary {
        zero_boundary(&mut [&mut state.u[..], &mut state.v[..]], n);
        zero_packed_boundary(&mut [&mut state.u0[..], &mut state.v0[..]], n);
    }

    state.time += dt;
    state.steps += 1;
    log::trace!(
        "step {} t={:.4} ke={:.6e}",
        state.steps,
        state.time,
        diagnostics::kinetic_energy(&state.u, &state.v)
    );
}
