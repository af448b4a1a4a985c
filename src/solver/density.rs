use super::core::advect;
use crate::state::DyeChannel;

/// Fade every dye channel by `decay`, then carry it along (u, v).
///
/// The faded field is written to `prev` and advected into `cur`, so a channel
/// loses a factor of `decay` per step even in still fluid. Velocity is read
/// only.
pub fn advect_dye(dye: &mut [DyeChannel], u: &[f64], v: &[f64], decay: f64, dt: f64, n: usize) {
    for ch in dye.iter_mut() {
        for (p, c) in ch.prev.iter_mut().zip(&ch.cur) {
            *p = c * decay;
        }
        advect(&mut ch.cur, &ch.prev, u, v, dt, n);
    }
}
