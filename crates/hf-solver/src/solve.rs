//! Fixed-point relaxation of a hose network.
//!
//! Each iteration pushes inlet heads downstream, then rebuilds flows from the
//! outlets upstream using the heads just computed. The total outlet flow of the
//! last three iterations decides when to stop.

use hf_core::Real;
use hf_graph::Model;
use tracing::{debug, info, warn};

use crate::config::{SolveConfig, Termination};
use crate::error::{SolverError, SolverResult};

/// Progress of one completed iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationEvent {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Total outlet flow after this iteration (l/s).
    pub total_flow: Real,
    /// Change of total flow in this iteration.
    pub residual: Real,
    /// Change of total flow in the iteration before.
    pub previous_residual: Real,
}

/// Outcome of a successful solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    pub iterations: usize,
    pub residual: Real,
    pub converged: bool,
    pub total_flow: Real,
}

/// Last three total flows, oldest first.
#[derive(Debug, Clone, Copy)]
struct FlowWindow([Real; 3]);

impl FlowWindow {
    fn seeded(current: Real) -> Self {
        Self([0.0, 0.0, current])
    }

    fn push(&mut self, total: Real) {
        self.0 = [self.0[1], self.0[2], total];
    }

    fn latest(&self) -> Real {
        (self.0[2] - self.0[1]).abs()
    }

    fn previous(&self) -> Real {
        (self.0[1] - self.0[0]).abs()
    }
}

/// Solve without progress reporting.
pub fn solve(model: &mut Model, config: &SolveConfig) -> SolverResult<SolveReport> {
    solve_with_progress(model, config, |_, _| {})
}

/// Solve, calling `on_iteration` after every completed iteration.
///
/// On failure the model keeps the state of the last completed iteration.
pub fn solve_with_progress<F>(
    model: &mut Model,
    config: &SolveConfig,
    mut on_iteration: F,
) -> SolverResult<SolveReport>
where
    F: FnMut(&Model, &IterationEvent),
{
    config.validate()?;
    model.validate()?;
    if model.outlets().is_empty() {
        warn!(model = model.name(), "model has no outlets, total flow stays zero");
    }

    // cached heads may be left over from a failed solve; they only seed the
    // window, the first iteration recomputes every head
    let seed = match model.summary_flow() {
        Ok(total) => total,
        Err(err) => {
            debug!(error = %err, "stale state, seeding flow window with zero");
            0.0
        }
    };
    let mut window = FlowWindow::seeded(seed);
    let mut iteration = 0;

    loop {
        if let Termination::FixedIterations(k) = config.termination {
            if iteration >= k {
                break;
            }
        }

        let total = relax(model, config.record_history)?;
        iteration += 1;
        window.push(total);

        let event = IterationEvent {
            iteration,
            total_flow: total,
            residual: window.latest(),
            previous_residual: window.previous(),
        };
        debug!(
            iteration,
            total_flow = total,
            residual = event.residual,
            "iteration complete"
        );
        on_iteration(model, &event);

        if let Termination::TargetAccuracy(accuracy) = config.termination {
            if event.residual <= accuracy {
                break;
            }
            if iteration >= 2 && event.residual >= event.previous_residual {
                warn!(
                    iteration,
                    residual = event.residual,
                    previous = event.previous_residual,
                    "residual not shrinking"
                );
                return Err(SolverError::NotSolvable {
                    iteration,
                    residual: event.residual,
                    previous: event.previous_residual,
                });
            }
            if iteration >= config.max_iterations {
                return Err(SolverError::IterationLimit {
                    max_iterations: config.max_iterations,
                    residual: event.residual,
                });
            }
        }
    }

    let report = SolveReport {
        iterations: iteration,
        residual: window.latest(),
        converged: true,
        total_flow: window.0[2],
    };
    info!(
        model = model.name(),
        iterations = report.iterations,
        total_flow = report.total_flow,
        residual = report.residual,
        "solve finished"
    );
    Ok(report)
}

/// One relaxation iteration. Returns the total outlet flow afterwards.
pub fn relax(model: &mut Model, record_history: bool) -> SolverResult<Real> {
    let inlets = model.inlets().to_vec();
    let outlets = model.outlets().to_vec();

    for &inlet in &inlets {
        let head = model.element(inlet)?.h_in;
        model.network_mut().propagate_head_forward(inlet, head)?;
    }

    // every outlet is cleared before any is injected, so shared upstream
    // elements end up carrying the sum of all outlet flows
    for &outlet in &outlets {
        model.network_mut().propagate_flow_reset(outlet)?;
    }
    for &outlet in &outlets {
        let q = model.element(outlet)?.compute_outlet_flow()?;
        model.network_mut().propagate_flow_add(outlet, q)?;
    }

    if record_history {
        model.fix_states()?;
    }

    let total = model.summary_flow()?;
    if !total.is_finite() {
        return Err(SolverError::Numeric {
            what: format!("total flow is {total}"),
        });
    }
    Ok(total)
}
