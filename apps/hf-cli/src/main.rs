use clap::{Parser, Subcommand};
use hf_app::{
    AppError, AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, SolveOverrides,
    project_service, query, run_service, runtime_compile,
};
use hf_graph::{ModelListing, inspect};
use hf_results::ElementRecord;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hf-cli")]
#[command(about = "HoseFlow CLI - fire hose network calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// List networks in a project
    Networks {
        /// Path to the project file
        project_path: PathBuf,
    },
    /// Compile a network and print its elements and wiring
    Inspect {
        /// Path to the project file
        project_path: PathBuf,
        /// Network ID to inspect
        network_id: String,
    },
    /// Solve a network
    Solve {
        /// Path to the project file
        project_path: PathBuf,
        /// Network ID to solve
        network_id: String,
        /// Run exactly this many iterations
        #[arg(long)]
        iterations: Option<usize>,
        /// Iterate until the total flow changes by at most this much (l/s)
        #[arg(long)]
        accuracy: Option<f64>,
        /// Iteration cap in accuracy mode
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Do not store the run
        #[arg(long)]
        no_save: bool,
    },
    /// List stored runs of a network
    Runs {
        /// Path to the project file
        project_path: PathBuf,
        /// Network ID to list runs for
        network_id: String,
    },
    /// Show details of a stored run
    ShowRun {
        /// Path to the project file
        project_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export the recorded history of one attribute
    ExportHistory {
        /// Path to the project file
        project_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Observed element ID
        element_id: String,
        /// Attribute name (e.g. q, H_in, H_out)
        attribute: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the hose catalog
    Catalog,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Networks { project_path } => cmd_networks(&project_path),
        Commands::Inspect {
            project_path,
            network_id,
        } => cmd_inspect(&project_path, &network_id),
        Commands::Solve {
            project_path,
            network_id,
            iterations,
            accuracy,
            max_iterations,
            no_cache,
            no_save,
        } => {
            let options = RunOptions {
                use_cache: !no_cache,
                save: !no_save,
                overrides: SolveOverrides {
                    iterations,
                    accuracy,
                    max_iterations,
                    record_history: None,
                },
                ..RunOptions::default()
            };
            cmd_solve(&project_path, &network_id, options)
        }
        Commands::Runs {
            project_path,
            network_id,
        } => cmd_runs(&project_path, &network_id),
        Commands::ShowRun {
            project_path,
            run_id,
        } => cmd_show_run(&project_path, &run_id),
        Commands::ExportHistory {
            project_path,
            run_id,
            element_id,
            attribute,
            output,
        } => cmd_export_history(
            &project_path,
            &run_id,
            &element_id,
            &attribute,
            output.as_deref(),
        ),
        Commands::Catalog => {
            cmd_catalog();
            Ok(())
        }
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_networks(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let networks = project_service::list_networks(&project);

    if networks.is_empty() {
        println!("No networks found in project");
    } else {
        println!("Networks in project:");
        for net in networks {
            println!(
                "  {} - {} ({} elements, {} connections, {} observers)",
                net.id, net.name, net.element_count, net.connection_count, net.observer_count
            );
        }
    }
    Ok(())
}

fn cmd_inspect(project_path: &Path, network_id: &str) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let network = project_service::get_network(&project, network_id)?;
    let runtime = runtime_compile::compile_network(network)?;
    let model = &runtime.model;

    print!("{}", ModelListing::of(model)?);
    println!();
    for (element_id, id) in &runtime.elements {
        let element = model.element(*id)?;
        println!(
            "{} ({}, {} in / {} out)",
            element_id,
            element.role().as_str(),
            element.input_capacity(),
            element.output_capacity()
        );
        println!(
            "  from: {}",
            inspect::previous_names(model.network(), *id)?.join(", ")
        );
        println!(
            "  to:   {}",
            inspect::next_names(model.network(), *id)?.join(", ")
        );
        let state: Vec<String> = inspect::element_state(element)
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        println!("  {}", state.join(" "));
    }
    Ok(())
}

fn cmd_solve(project_path: &Path, network_id: &str, options: RunOptions) -> AppResult<()> {
    println!("Solving network: {}", network_id);

    let request = RunRequest {
        project_path,
        network_id,
        options,
    };
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| render_cli_progress(&event)),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else if response.saved {
        println!("✓ Solve completed: {}", response.run_id);
    } else {
        println!("✓ Solve completed (not saved)");
    }

    let manifest = &response.manifest;
    println!(
        "  Settings:   {}",
        run_service::describe_settings(&manifest.solve)
    );
    println!("  Iterations: {}", manifest.report.iterations);
    println!("  Residual:   {:.3e}", manifest.report.residual);
    println!("  Total flow: {:.3} l/s", manifest.report.total_flow_lps);
    print_elements(&response.elements);
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    let mut line = format!(
        "\r{}  elapsed={:.2}s",
        event.stage.label(),
        event.elapsed_wall_s
    );
    if event.stage == RunStage::Solving
        && let Some(solve) = &event.solve
    {
        line.push_str(&format!(
            "  iter={}  flow={:.3}  residual={:.3e}",
            solve.iteration, solve.total_flow_lps, solve.residual
        ));
    }
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}

fn print_elements(elements: &[ElementRecord]) {
    if elements.is_empty() {
        return;
    }
    println!(
        "\n  {:<16} {:<6} {:>9} {:>9} {:>9} {:>9}",
        "element", "role", "q l/s", "H_in m", "H_out m", "h m"
    );
    for e in elements {
        println!(
            "  {:<16} {:<6} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
            e.element_id, e.role, e.q_lps, e.h_in_m, e.h_out_m, e.head_loss_m
        );
    }
}

fn cmd_runs(project_path: &Path, network_id: &str) -> AppResult<()> {
    let runs = run_service::list_runs(project_path, network_id)?;

    if runs.is_empty() {
        println!("No stored runs found for network: {}", network_id);
    } else {
        println!("Stored runs for network '{}':", network_id);
        for manifest in runs {
            println!(
                "  {} - {} - {} iterations, {:.3} l/s",
                manifest.run_id,
                manifest.timestamp,
                manifest.report.iterations,
                manifest.report.total_flow_lps
            );
        }
    }
    Ok(())
}

fn cmd_show_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    let run = run_service::load_run(project_path, run_id)?;
    let manifest = &run.manifest;

    println!("Run ID:     {}", manifest.run_id);
    println!("Network:    {}", manifest.network_id);
    println!("Timestamp:  {}", manifest.timestamp);
    println!("Solver:     {}", manifest.solver_version);
    println!(
        "Settings:   {}",
        run_service::describe_settings(&manifest.solve)
    );
    println!("Iterations: {}", manifest.report.iterations);
    println!("Total flow: {:.3} l/s", manifest.report.total_flow_lps);
    print_elements(&run.elements);

    let observed = query::list_observed_elements(&run.history);
    if !observed.is_empty() {
        println!("\nRecorded history:");
        for element_id in observed {
            println!(
                "  {}: {}",
                element_id,
                query::list_attributes(&run.history, &element_id).join(", ")
            );
        }
    }
    Ok(())
}

fn cmd_export_history(
    project_path: &Path,
    run_id: &str,
    element_id: &str,
    attribute: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let run = run_service::load_run(project_path, run_id)?;
    let series = query::extract_series(&run.history, element_id, attribute)?;
    let csv = query::series_to_csv(&series);

    if let Some(path) = output {
        std::fs::write(path, csv).map_err(AppError::Io)?;
        println!("Wrote {} rows to {}", series.len(), path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn cmd_catalog() {
    println!(
        "{:<6} {:>8} {:>10} {:>12}  description",
        "kind", "d mm", "section m", "resistance"
    );
    for hose in hf_components::HOSES.iter() {
        println!(
            "{:<6} {:>8.0} {:>10.0} {:>12}  {}",
            hose.kind,
            hf_core::to_mm(hose.diameter()),
            hf_core::to_m(hose.section_length()),
            hose.resistance,
            hose.description
        );
    }
}
