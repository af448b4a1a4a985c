//! Real-time 2-D stable-fluids solver.
//!
//! A [`SimState`] owns the velocity, force and dye buffers for one square
//! grid together with its FFT plan. Each tick a host calls [`inject`] for
//! any strokes, then [`fluid_step`], then reads the result through
//! [`export`].

pub mod config;
pub mod error;
pub mod export;
pub mod inject;
pub mod solver;
pub mod spectral;
pub mod state;

pub use error::{ConfigError, FluidError};
pub use export::FrameSnapshot;
pub use inject::{inject, Stroke};
pub use solver::{fluid_step, InjectionMode, SolverParams};
pub use state::SimState;
