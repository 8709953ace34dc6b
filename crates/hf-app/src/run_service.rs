//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use hf_graph::Model;
use hf_project::schema::NetworkDef;
use hf_results::{
    ElementRecord, HistoryRecord, RunManifest, RunStore, SolveSettings, SolveSummary,
};
use tracing::{debug, info};

use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage, SolveProgress};
use crate::project_service;
use crate::runtime_compile::{self, NetworkRuntime, SolveOverrides};

/// Options for running a network.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub save: bool,
    pub solver_version: String,
    pub overrides: SolveOverrides,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            save: true,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
            overrides: SolveOverrides::default(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub network_id: &'a str,
    pub options: RunOptions,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub elements: Vec<ElementRecord>,
    pub history: Vec<HistoryRecord>,
    pub loaded_from_cache: bool,
    pub saved: bool,
}

type ProgressCallback<'a> = Option<&'a mut dyn FnMut(RunProgressEvent)>;

fn emit_progress(
    progress_cb: &mut ProgressCallback<'_>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    solve: Option<SolveProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            solve,
        });
    }
}

/// Execute or load a run.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: ProgressCallback<'_>,
) -> AppResult<RunResponse> {
    let started = Instant::now();

    emit_progress(
        &mut progress_cb,
        RunStage::LoadingProject,
        started,
        Some("Loading project".to_string()),
        None,
    );
    let project = project_service::load_project(request.project_path)?;
    let network = project_service::get_network(&project, request.network_id)?;

    emit_progress(
        &mut progress_cb,
        RunStage::CheckingCache,
        started,
        Some("Checking run cache".to_string()),
        None,
    );
    let (config, settings) =
        runtime_compile::solve_config(&network.solve, &request.options.overrides)?;
    let run_id = hf_results::compute_run_id(network, &settings, &request.options.solver_version);
    let store = RunStore::for_project(request.project_path)?;
    debug!(store = %store.root_dir().display(), run_id = %run_id, "run store opened");

    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            Some("Loading cached run".to_string()),
            None,
        );
        let manifest = store.load_manifest(&run_id)?;
        let elements = store.load_elements(&run_id)?;
        let history = store.load_history(&run_id)?;
        debug!(run_id = %run_id, "loaded cached run");

        emit_progress(
            &mut progress_cb,
            RunStage::Completed,
            started,
            Some("Loaded cached run".to_string()),
            None,
        );
        return Ok(RunResponse {
            run_id,
            manifest,
            elements,
            history,
            loaded_from_cache: true,
            saved: true,
        });
    }

    emit_progress(
        &mut progress_cb,
        RunStage::CompilingNetwork,
        started,
        Some("Compiling network".to_string()),
        None,
    );
    let mut runtime = runtime_compile::compile_network(network)?;

    let report = hf_solver::solve_with_progress(&mut runtime.model, &config, |_, event| {
        emit_progress(
            &mut progress_cb,
            RunStage::Solving,
            started,
            None,
            Some(SolveProgress {
                iteration: event.iteration,
                total_flow_lps: event.total_flow,
                residual: event.residual,
            }),
        );
    })?;

    let manifest = RunManifest {
        run_id: run_id.clone(),
        network_id: network.id.clone(),
        timestamp: hf_results::timestamp_now(),
        solver_version: request.options.solver_version.clone(),
        solve: settings,
        report: SolveSummary {
            iterations: report.iterations,
            residual: report.residual,
            converged: report.converged,
            total_flow_lps: report.total_flow,
        },
    };
    let elements = element_records(&runtime)?;
    let history = history_records(network, &runtime)?;

    if request.options.save {
        emit_progress(
            &mut progress_cb,
            RunStage::SavingResults,
            started,
            Some("Saving run output".to_string()),
            None,
        );
        store.save_run(&manifest, &elements, &history)?;
    }

    info!(
        run_id = %run_id,
        network = %network.id,
        iterations = report.iterations,
        total_flow = report.total_flow,
        "run completed"
    );
    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some("Run completed".to_string()),
        None,
    );

    Ok(RunResponse {
        run_id,
        manifest,
        elements,
        history,
        loaded_from_cache: false,
        saved: request.options.save,
    })
}

/// Final state of every element, in definition order.
pub fn element_records(runtime: &NetworkRuntime) -> AppResult<Vec<ElementRecord>> {
    runtime
        .elements
        .iter()
        .map(|(element_id, id)| {
            let element = runtime.model.element(*id)?;
            Ok(ElementRecord {
                element_id: element_id.clone(),
                name: element.name().to_string(),
                role: element.role().as_str().to_string(),
                q_lps: element.q,
                h_in_m: element.h_in,
                h_out_m: element.outlet_head(),
                head_loss_m: element.head_loss(),
            })
        })
        .collect()
}

/// Recorded series, in observer then attribute order.
pub fn history_records(
    network: &NetworkDef,
    runtime: &NetworkRuntime,
) -> AppResult<Vec<HistoryRecord>> {
    let mut records = Vec::new();
    for observer in &network.observers {
        let id = runtime.handle(&observer.element)?;
        records.extend(recorded(&runtime.model, id, &observer.element));
    }
    Ok(records)
}

fn recorded(model: &Model, id: hf_core::NodeId, element_id: &str) -> Vec<HistoryRecord> {
    let Some(recorder) = model.recorder(id) else {
        return Vec::new();
    };
    recorder
        .attributes()
        .iter()
        .filter_map(|attribute| {
            recorder.series(attribute).map(|values| HistoryRecord {
                element_id: element_id.to_string(),
                attribute: attribute.clone(),
                values: values.to_vec(),
            })
        })
        .collect()
}

/// List runs for a network, most recent first.
pub fn list_runs(project_path: &Path, network_id: &str) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::for_project(project_path)?;

    let mut runs = store.list_runs(network_id)?;
    runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(runs)
}

/// A stored run with its element states and history.
#[derive(Debug, Clone)]
pub struct StoredRun {
    pub manifest: RunManifest,
    pub elements: Vec<ElementRecord>,
    pub history: Vec<HistoryRecord>,
}

/// Load a specific run.
pub fn load_run(project_path: &Path, run_id: &str) -> AppResult<StoredRun> {
    let store = RunStore::for_project(project_path)?;

    Ok(StoredRun {
        manifest: store.load_manifest(run_id)?,
        elements: store.load_elements(run_id)?,
        history: store.load_history(run_id)?,
    })
}

/// Settings string for display, e.g. `accuracy 0.1 (max 1000)`.
pub fn describe_settings(settings: &SolveSettings) -> String {
    match settings.mode {
        hf_results::SolveMode::Fixed { iterations } => format!("fixed {} iterations", iterations),
        hf_results::SolveMode::Accuracy {
            accuracy,
            max_iterations,
        } => format!("accuracy {} (max {})", accuracy, max_iterations),
    }
}
