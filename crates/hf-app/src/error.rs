//! Error types for the hf-app service layer.

/// Application error wrapping the backend crates, for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Network not found: {0}")]
    NetworkNotFound(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Network compilation failed: {0}")]
    Compile(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<hf_project::ProjectError> for AppError {
    fn from(err: hf_project::ProjectError) -> Self {
        match err {
            hf_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            hf_project::ProjectError::UnknownNetwork { id } => AppError::NetworkNotFound(id),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<hf_project::ValidationError> for AppError {
    fn from(err: hf_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<hf_graph::GraphError> for AppError {
    fn from(err: hf_graph::GraphError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<hf_components::ComponentError> for AppError {
    fn from(err: hf_components::ComponentError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<hf_solver::SolverError> for AppError {
    fn from(err: hf_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<hf_results::ResultsError> for AppError {
    fn from(err: hf_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
