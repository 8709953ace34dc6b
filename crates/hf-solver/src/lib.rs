//! Steady-state relaxation solver for hose networks.
//!
//! The unknowns are element flows and heads. Each iteration propagates heads
//! from the inlets and flows from the outlets; the loop stops after a fixed
//! number of iterations or once the total outlet flow settles.

pub mod config;
pub mod error;
pub mod solve;

pub use config::{SolveConfig, Termination};
pub use error::{SolverError, SolverResult};
pub use solve::{IterationEvent, SolveReport, relax, solve, solve_with_progress};
