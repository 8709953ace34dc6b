//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub network_id: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub solver_version: String,
    pub solve: SolveSettings,
    pub report: SolveSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolveSettings {
    pub mode: SolveMode,
    pub record_history: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SolveMode {
    Fixed { iterations: usize },
    Accuracy { accuracy: f64, max_iterations: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolveSummary {
    pub iterations: usize,
    pub residual: f64,
    pub converged: bool,
    pub total_flow_lps: f64,
}

/// Final state of one element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementRecord {
    pub element_id: String,
    pub name: String,
    pub role: String,
    pub q_lps: f64,
    pub h_in_m: f64,
    pub h_out_m: f64,
    pub head_loss_m: f64,
}

/// Values of one observed attribute, one per iteration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub element_id: String,
    pub attribute: String,
    pub values: Vec<f64>,
}
