//! Project schema definitions.

use serde::{Deserialize, Serialize};

/// Newest project file format this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub networks: Vec<NetworkDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
    #[serde(default)]
    pub observers: Vec<ObserverDef>,
    #[serde(default)]
    pub solve: SolveDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoleDef {
    Source,
    Link,
    Sink,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LawDef {
    #[default]
    PassThrough,
    Nozzle,
}

/// A hose line taken from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HoseDef {
    pub kind: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

/// One element. Unset parameters keep the element defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDef {
    pub id: String,
    /// Display name; the id is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: RoleDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law: Option<LawDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hose: Option<HoseDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_head_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlet_head_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conductance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_length_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<usize>,
    /// Starting flow estimate (l/s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<f64>,
}

impl ElementDef {
    /// An element with only an id and a role.
    pub fn new(id: impl Into<String>, role: RoleDef) -> Self {
        Self {
            id: id.into(),
            name: None,
            role,
            law: None,
            hose: None,
            resistance: None,
            count: None,
            added_head_m: None,
            inlet_head_m: None,
            elevation_m: None,
            conductance: None,
            unit_length_m: None,
            inputs: None,
            outputs: None,
            flow: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionDef {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObserverDef {
    pub element: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Solver settings stored with a network.
///
/// A positive `accuracy` selects accuracy mode; otherwise `iterations`
/// fixed iterations are run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolveDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default = "default_true")]
    pub record_history: bool,
}

impl Default for SolveDef {
    fn default() -> Self {
        Self {
            accuracy: None,
            iterations: None,
            max_iterations: None,
            record_history: true,
        }
    }
}

fn default_count() -> u32 {
    1
}

fn default_true() -> bool {
    true
}
