//! Solver configuration.

use hf_core::Real;

use crate::error::{SolverError, SolverResult};

/// When the relaxation loop stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    /// Run exactly this many iterations without checking convergence.
    FixedIterations(usize),
    /// Run until successive total flows differ by at most this much (l/s).
    TargetAccuracy(Real),
}

/// Relaxation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveConfig {
    pub termination: Termination,
    /// Hard cap on iterations in accuracy mode.
    pub max_iterations: usize,
    /// Snapshot observed elements after every iteration.
    pub record_history: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            termination: Termination::FixedIterations(1),
            max_iterations: 1000,
            record_history: true,
        }
    }
}

impl SolveConfig {
    pub fn fixed(iterations: usize) -> Self {
        Self {
            termination: Termination::FixedIterations(iterations),
            ..Self::default()
        }
    }

    pub fn accuracy(accuracy: Real) -> SolverResult<Self> {
        let config = Self {
            termination: Termination::TargetAccuracy(accuracy),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Pick the mode from an iteration count and an accuracy.
    ///
    /// A positive accuracy selects accuracy mode and ignores `iterations`;
    /// zero selects fixed mode.
    pub fn from_parts(iterations: usize, accuracy: Real) -> SolverResult<Self> {
        if !accuracy.is_finite() || accuracy < 0.0 {
            return Err(SolverError::InvalidConfig {
                what: format!("accuracy must be finite and non-negative, got {accuracy}"),
            });
        }
        if accuracy > 0.0 {
            Self::accuracy(accuracy)
        } else {
            Ok(Self::fixed(iterations))
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_history(mut self, record_history: bool) -> Self {
        self.record_history = record_history;
        self
    }

    pub fn validate(&self) -> SolverResult<()> {
        if let Termination::TargetAccuracy(accuracy) = self.termination {
            if !accuracy.is_finite() || accuracy <= 0.0 {
                return Err(SolverError::InvalidConfig {
                    what: format!("accuracy must be positive and finite, got {accuracy}"),
                });
            }
            if self.max_iterations == 0 {
                return Err(SolverError::InvalidConfig {
                    what: "max_iterations must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}
