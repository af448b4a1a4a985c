//! Property-based tests for the stable-fluids solver using proptest
//!
//! These tests check invariants across random strokes and parameters:
//! - No per-cell force ever exceeds the cap
//! - No NaN/Inf reaches the grid, even from far endpoints or non-finite colors
//! - The outer ring is zero after every step
//! - Dye in still fluid decays geometrically

use inkflow::solver::boundary_is_zero;
use inkflow::state::idx_inner;
use inkflow::{fluid_step, inject, InjectionMode, SimState, SolverParams, Stroke};
use proptest::prelude::*;

const N: usize = 16;
const SIMULATION_STEPS: usize = 5;

fn mode() -> impl Strategy<Value = InjectionMode> {
    prop_oneof![Just(InjectionMode::Nearest), Just(InjectionMode::Splat)]
}

/// Coordinates mostly near the unit square, occasionally astronomically far.
fn coord() -> impl Strategy<Value = f64> {
    prop_oneof![4 => -0.5f64..1.5, 1 => -1e300f64..1e300]
}

/// Color weights, including non-finite ones.
fn weight() -> impl Strategy<Value = f64> {
    prop_oneof![4 => 0.0f64..1.0, 1 => Just(f64::NAN), 1 => Just(f64::INFINITY)]
}

/// Strokes with endpoints partly outside the unit square, wild strengths and
/// sometimes garbage colors.
fn stroke() -> impl Strategy<Value = Stroke> {
    (
        (coord(), coord(), coord(), coord()),
        (-10.0f64..1e6, -10.0f64..1e6),
        prop::option::of((weight(), weight(), weight())),
    )
        .prop_map(|((x1, y1, x2, y2), (s0, s1), color)| {
            let stroke = Stroke::new(x1, y1, x2, y2).with_strength(s0, s1);
            match color {
                Some((r, g, b)) => stroke.with_color([r, g, b]),
                None => stroke,
            }
        })
}

fn params_for(mode: InjectionMode, radius: f64, cap: f64) -> SolverParams {
    SolverParams {
        injection_mode: mode,
        splat_radius: radius,
        force_cap: cap,
        ..SolverParams::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: no stroke sequence pushes a cell's force past the cap
    #[test]
    fn test_force_never_exceeds_cap(
        strokes in prop::collection::vec(stroke(), 1..6),
        mode in mode(),
        radius in 0.0f64..3.0,
        cap in 0.01f64..1.0,
    ) {
        let mut sim = SimState::new(N, 1.0, 3).unwrap();
        let params = params_for(mode, radius, cap);
        for s in &strokes {
            inject(&mut sim, &params, s);
        }
        for i in 0..N * N {
            let mag = (sim.fu[i] * sim.fu[i] + sim.fv[i] * sim.fv[i]).sqrt();
            prop_assert!(mag.is_finite(), "cell {} force is not finite", i);
            prop_assert!(mag <= cap + 1e-12, "cell {} force {} exceeds cap {}", i, mag, cap);
        }
    }

    /// Property: stepping after random strokes keeps every buffer finite and the ring at zero
    #[test]
    fn test_step_keeps_grid_finite_and_closed(
        strokes in prop::collection::vec(stroke(), 1..4),
        mode in mode(),
        dt in 0.001f64..0.1,
        visc in 0.0f64..0.01,
    ) {
        let mut sim = SimState::new(N, 1.0, 3).unwrap();
        let params = SolverParams { dt, visc, ..params_for(mode, 1.0, 0.1) };
        for s in &strokes {
            inject(&mut sim, &params, s);
        }
        for step in 0..SIMULATION_STEPS {
            fluid_step(&mut sim, &params);
            prop_assert!(boundary_is_zero(&sim.u, N), "u ring nonzero after step {}", step);
            prop_assert!(boundary_is_zero(&sim.v, N), "v ring nonzero after step {}", step);
        }
        prop_assert!(sim.u.iter().chain(&sim.v).all(|x| x.is_finite()), "velocity contains NaN/Inf");
        for ch in &sim.dye {
            prop_assert!(ch.cur.iter().all(|x| x.is_finite() && *x >= 0.0), "dye must stay finite and non-negative");
        }
    }

    /// Property: a zero-length stroke never adds force
    #[test]
    fn test_zero_length_stroke_adds_no_force(x in -1.0f64..2.0, y in -1.0f64..2.0, mode in mode()) {
        let mut sim = SimState::new(N, 1.0, 1).unwrap();
        let params = params_for(mode, 2.0, 0.1);
        inject(&mut sim, &params, &Stroke::new(x, y, x, y).with_color([1.0, 1.0, 1.0]));
        prop_assert!(sim.fu.iter().chain(&sim.fv).all(|&f| f == 0.0));
        prop_assert!(sim.dye[0].cur.iter().any(|&d| d > 0.0), "dye is still seeded");
    }

    /// Property: in still fluid a dye cell decays by exactly the decay factor each step
    #[test]
    fn test_dye_decays_geometrically(
        value in 0.1f64..100.0,
        decay in 0.5f64..1.0,
        cx in 1usize..N - 1,
        cy in 1usize..N - 1,
    ) {
        let mut sim = SimState::new(N, 1.0, 1).unwrap();
        let params = SolverParams { density_decay: decay, ..SolverParams::default() };
        let c = idx_inner(cx, cy, N);
        sim.dye[0].seed(c, value);
        let mut expected = value;
        for _ in 0..SIMULATION_STEPS {
            fluid_step(&mut sim, &params);
            expected *= decay;
            let got = sim.dye[0].cur[c];
            prop_assert!((got - expected).abs() <= 1e-9 * value, "{} vs {}", got, expected);
            prop_assert!(got > 0.0);
        }
    }
}
