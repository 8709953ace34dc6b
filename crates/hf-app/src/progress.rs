//! Progress events streamed while a run executes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingProject,
    CheckingCache,
    LoadingCachedResult,
    CompilingNetwork,
    Solving,
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::LoadingProject => "loading project",
            RunStage::CheckingCache => "checking cache",
            RunStage::LoadingCachedResult => "loading cached result",
            RunStage::CompilingNetwork => "compiling network",
            RunStage::Solving => "solving",
            RunStage::SavingResults => "saving results",
            RunStage::Completed => "completed",
        }
    }
}

/// Solver state after one relaxation iteration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolveProgress {
    pub iteration: usize,
    pub total_flow_lps: f64,
    pub residual: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub solve: Option<SolveProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            solve: None,
        }
    }
}
