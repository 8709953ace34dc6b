//! Shared application service layer for hoseflow.
//!
//! Loads projects, compiles networks into models, runs and caches solves,
//! and queries stored results. The CLI is a thin layer over this crate.

pub mod error;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod runtime_compile;

pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage, SolveProgress};
pub use project_service::{
    NetworkSummary, get_network, list_networks, load_project, validate_project,
};
pub use query::{
    extract_series, find_element, list_attributes, list_observed_elements, series_to_csv,
};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, StoredRun, ensure_run, ensure_run_with_progress,
    list_runs, load_run,
};
pub use runtime_compile::{NetworkRuntime, SolveOverrides, compile_network, solve_config};
