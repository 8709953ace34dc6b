//! Project validation logic.

use std::collections::{HashMap, HashSet};

use hf_components::catalog;
use hf_graph::Role;

use crate::schema::{ElementDef, LawDef, NetworkDef, Project, RoleDef, SolveDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > crate::schema::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut network_ids = HashSet::new();
    for network in &project.networks {
        if !network_ids.insert(&network.id) {
            return Err(ValidationError::DuplicateId {
                id: network.id.clone(),
                context: "networks".to_string(),
            });
        }
        validate_network(network)?;
    }
    Ok(())
}

pub fn validate_network(network: &NetworkDef) -> Result<(), ValidationError> {
    let mut elements: HashMap<&str, &ElementDef> = HashMap::new();
    for element in &network.elements {
        if elements.insert(element.id.as_str(), element).is_some() {
            return Err(ValidationError::DuplicateId {
                id: element.id.clone(),
                context: format!("network '{}' elements", network.id),
            });
        }
        validate_element(element)?;
    }

    let mut outgoing: HashMap<&str, usize> = HashMap::new();
    let mut incoming: HashMap<&str, usize> = HashMap::new();
    for connection in &network.connections {
        for end in [&connection.from, &connection.to] {
            if !elements.contains_key(end.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: end.clone(),
                    context: format!("network '{}' connections", network.id),
                });
            }
        }
        if connection.from == connection.to {
            return Err(ValidationError::InvalidValue {
                field: "connection".to_string(),
                value: connection.from.clone(),
                reason: "an element cannot feed itself".to_string(),
            });
        }
        *outgoing.entry(connection.from.as_str()).or_default() += 1;
        *incoming.entry(connection.to.as_str()).or_default() += 1;
    }

    for element in &network.elements {
        let id = element.id.as_str();
        let (inputs, outputs) = ports(element);
        let used_out = outgoing.get(id).copied().unwrap_or(0);
        if used_out > outputs {
            return Err(capacity_error(id, "outputs", used_out, outputs));
        }
        let used_in = incoming.get(id).copied().unwrap_or(0);
        if used_in > inputs {
            return Err(capacity_error(id, "inputs", used_in, inputs));
        }
    }

    for observer in &network.observers {
        if !elements.contains_key(observer.element.as_str()) {
            return Err(ValidationError::MissingReference {
                id: observer.element.clone(),
                context: format!("network '{}' observers", network.id),
            });
        }
    }

    validate_solve(&network.solve, &network.id)
}

/// Port capacities an element definition ends up with.
pub fn ports(element: &ElementDef) -> (usize, usize) {
    let (inputs, outputs) = role(element.role).default_ports();
    (
        element.inputs.unwrap_or(inputs),
        element.outputs.unwrap_or(outputs),
    )
}

pub fn role(role: RoleDef) -> Role {
    match role {
        RoleDef::Source => Role::Source,
        RoleDef::Link => Role::Link,
        RoleDef::Sink => Role::Sink,
    }
}

fn capacity_error(id: &str, side: &str, used: usize, capacity: usize) -> ValidationError {
    ValidationError::InvalidValue {
        field: format!("element '{}' {}", id, side),
        value: used.to_string(),
        reason: format!("only {} allowed", capacity),
    }
}

fn validate_element(element: &ElementDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("element '{}' {}", element.id, name);

    if element.law == Some(LawDef::Nozzle) && element.role != RoleDef::Sink {
        return Err(ValidationError::InvalidValue {
            field: field("law"),
            value: "nozzle".to_string(),
            reason: "only sinks can discharge through a nozzle".to_string(),
        });
    }

    if let Some(hose) = &element.hose {
        if catalog::lookup(&hose.kind).is_err() {
            return Err(ValidationError::InvalidValue {
                field: field("hose.kind"),
                value: hose.kind.clone(),
                reason: "unknown hose kind".to_string(),
            });
        }
        if hose.count == 0 {
            return Err(ValidationError::InvalidValue {
                field: field("hose.count"),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if element.resistance.is_some() || element.count.is_some() {
            return Err(ValidationError::InvalidValue {
                field: field("hose"),
                value: hose.kind.clone(),
                reason: "give either a catalog hose or resistance/count, not both".to_string(),
            });
        }
    }

    for (name, value) in [
        ("resistance", element.resistance),
        ("conductance", element.conductance),
        ("unit_length_m", element.unit_length_m),
        ("flow", element.flow),
    ] {
        if let Some(v) = value {
            non_negative(&field(name), v)?;
        }
    }
    for (name, value) in [
        ("added_head_m", element.added_head_m),
        ("inlet_head_m", element.inlet_head_m),
        ("elevation_m", element.elevation_m),
    ] {
        if let Some(v) = value {
            finite(&field(name), v)?;
        }
    }
    Ok(())
}

fn validate_solve(solve: &SolveDef, network_id: &str) -> Result<(), ValidationError> {
    if let Some(accuracy) = solve.accuracy {
        non_negative(&format!("network '{}' solve.accuracy", network_id), accuracy)?;
    }
    if solve.max_iterations == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: format!("network '{}' solve.max_iterations", network_id),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        })
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be non-negative".to_string(),
        });
    }
    Ok(())
}
