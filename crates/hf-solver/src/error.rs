//! Error types for solver operations.

use hf_core::error::HfError;
use hf_core::Real;
use hf_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while relaxing a network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error(
        "network not solvable with given parameters: residual {residual} did not shrink from {previous} at iteration {iteration}"
    )]
    NotSolvable {
        iteration: usize,
        residual: Real,
        previous: Real,
    },

    #[error("no convergence within {max_iterations} iterations (residual {residual})")]
    IterationLimit { max_iterations: usize, residual: Real },

    #[error("Invalid solver configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for HfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::NotSolvable { .. } => HfError::InvalidArg {
                what: "network not solvable",
            },
            SolverError::IterationLimit { .. } => HfError::InvalidArg {
                what: "iteration limit",
            },
            SolverError::InvalidConfig { .. } => HfError::InvalidArg {
                what: "solver configuration",
            },
            SolverError::Numeric { .. } => HfError::InvalidArg { what: "numeric" },
            SolverError::Graph(_) => HfError::InvalidArg { what: "graph" },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_solvable_message() {
        let err = SolverError::NotSolvable {
            iteration: 3,
            residual: 2.0,
            previous: 1.0,
        };
        assert!(
            err.to_string()
                .starts_with("network not solvable with given parameters")
        );
    }

    #[test]
    fn graph_errors_convert() {
        let err: SolverError = GraphError::NegativeHead {
            element: "nozzle".into(),
            head: -1.0,
        }
        .into();
        assert!(matches!(err, SolverError::Graph(GraphError::NegativeHead { .. })));
    }
}
