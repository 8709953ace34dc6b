//! Project loading, validation, and introspection.

use std::path::Path;

use hf_project::schema::{NetworkDef, Project};

use crate::error::{AppError, AppResult};

/// Summary of a network for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSummary {
    pub id: String,
    pub name: String,
    pub element_count: usize,
    pub connection_count: usize,
    pub observer_count: usize,
}

/// Load and validate a project (YAML, or JSON by extension).
pub fn load_project(path: &Path) -> AppResult<Project> {
    Ok(hf_project::load(path)?)
}

pub fn validate_project(project: &Project) -> AppResult<()> {
    Ok(hf_project::validate_project(project)?)
}

pub fn list_networks(project: &Project) -> Vec<NetworkSummary> {
    project
        .networks
        .iter()
        .map(|network| NetworkSummary {
            id: network.id.clone(),
            name: network.name.clone(),
            element_count: network.elements.len(),
            connection_count: network.connections.len(),
            observer_count: network.observers.len(),
        })
        .collect()
}

pub fn get_network<'a>(project: &'a Project, network_id: &str) -> AppResult<&'a NetworkDef> {
    project
        .networks
        .iter()
        .find(|n| n.id == network_id)
        .ok_or_else(|| AppError::NetworkNotFound(network_id.to_string()))
}
