//! Compilation of a `NetworkDef` into a solvable model.

use std::collections::HashMap;

use hf_components::presets;
use hf_core::NodeId;
use hf_graph::{Element, FlowLaw, Model};
use hf_project::schema::{ElementDef, LawDef, NetworkDef, RoleDef, SolveDef};
use hf_project::validate::{ports, role, validate_network};
use hf_results::{SolveMode, SolveSettings};
use hf_solver::SolveConfig;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Runtime representation of a compiled network.
#[derive(Debug, Clone)]
pub struct NetworkRuntime {
    pub model: Model,
    /// Element ids in definition order with their handles.
    pub elements: Vec<(String, NodeId)>,
    pub element_id_map: HashMap<String, NodeId>,
}

impl NetworkRuntime {
    pub fn handle(&self, element_id: &str) -> AppResult<NodeId> {
        self.element_id_map
            .get(element_id)
            .copied()
            .ok_or_else(|| AppError::ElementNotFound(element_id.to_string()))
    }
}

/// Compile a network definition: build, wire and register every element and
/// attach the observers.
pub fn compile_network(network: &NetworkDef) -> AppResult<NetworkRuntime> {
    validate_network(network)?;

    let mut model = Model::new(network.name.clone());
    let mut elements = Vec::with_capacity(network.elements.len());
    let mut element_id_map = HashMap::new();

    for def in &network.elements {
        let id = model.insert(build_element(def)?);
        elements.push((def.id.clone(), id));
        element_id_map.insert(def.id.clone(), id);
    }

    for connection in &network.connections {
        let from = lookup(&element_id_map, &connection.from)?;
        let to = lookup(&element_id_map, &connection.to)?;
        model.network_mut().try_connect(from, to)?;
    }

    let handles: Vec<NodeId> = elements.iter().map(|(_, id)| *id).collect();
    model.add_nodes(&handles, true)?;

    for observer in &network.observers {
        let id = lookup(&element_id_map, &observer.element)?;
        model.observe(id, observer.attributes.iter().cloned())?;
    }

    debug!(
        network = %network.id,
        elements = elements.len(),
        connections = network.connections.len(),
        "network compiled"
    );

    Ok(NetworkRuntime {
        model,
        elements,
        element_id_map,
    })
}

fn lookup(map: &HashMap<String, NodeId>, id: &str) -> AppResult<NodeId> {
    map.get(id)
        .copied()
        .ok_or_else(|| AppError::Compile(format!("Element not found: {}", id)))
}

/// Build one element from its definition.
pub fn build_element(def: &ElementDef) -> AppResult<Element> {
    let name = def.display_name().to_string();
    let mut element = match &def.hose {
        Some(hose) if def.role == RoleDef::Link => {
            presets::hose_line(name, &hose.kind, hose.count)?
        }
        Some(_) => {
            return Err(AppError::Compile(format!(
                "Element '{}': only links can be hose lines",
                def.id
            )));
        }
        None => Element::new(name, role(def.role)),
    };

    if def.law == Some(LawDef::Nozzle) {
        element = element.with_law(FlowLaw::Nozzle);
    }
    if let Some(s) = def.resistance {
        element = element.with_resistance(s);
    }
    if let Some(n) = def.count {
        element = element.with_count(n);
    }
    if let Some(h) = def.added_head_m {
        element = element.with_added_head(h);
    }
    if let Some(h) = def.inlet_head_m {
        element = element.with_inlet_head(h);
    }
    if let Some(z) = def.elevation_m {
        element = element.with_elevation(z);
    }
    if let Some(p) = def.conductance {
        element = element.with_conductance(p);
    }
    if let Some(l) = def.unit_length_m {
        element = element.with_unit_length(l);
    }
    if let Some(q) = def.flow {
        element = element.with_flow(q);
    }
    let (inputs, outputs) = ports(def);
    Ok(element.with_ports(inputs, outputs))
}

/// Overrides given on the command line or by a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolveOverrides {
    pub iterations: Option<usize>,
    pub accuracy: Option<f64>,
    pub max_iterations: Option<usize>,
    pub record_history: Option<bool>,
}

/// Solver configuration from the stored settings and any overrides.
///
/// Overriding only the iteration count forces fixed mode even when the
/// network stores an accuracy.
pub fn solve_config(
    solve: &SolveDef,
    overrides: &SolveOverrides,
) -> AppResult<(SolveConfig, SolveSettings)> {
    let accuracy = match (overrides.accuracy, overrides.iterations) {
        (Some(a), _) => a,
        (None, Some(_)) => 0.0,
        (None, None) => solve.accuracy.unwrap_or(0.0),
    };
    let iterations = overrides.iterations.or(solve.iterations).unwrap_or(1);
    let record_history = overrides.record_history.unwrap_or(solve.record_history);

    let mut config = SolveConfig::from_parts(iterations, accuracy)?.with_history(record_history);
    if let Some(max) = overrides.max_iterations.or(solve.max_iterations) {
        config = config.with_max_iterations(max);
    }
    config.validate()?;

    let mode = match config.termination {
        hf_solver::Termination::FixedIterations(iterations) => SolveMode::Fixed { iterations },
        hf_solver::Termination::TargetAccuracy(accuracy) => SolveMode::Accuracy {
            accuracy,
            max_iterations: config.max_iterations,
        },
    };
    Ok((
        config,
        SolveSettings {
            mode,
            record_history,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hf_project::schema::{ConnectionDef, HoseDef, ObserverDef};
    use hf_solver::Termination;

    fn elem(id: &str, role: RoleDef) -> ElementDef {
        ElementDef::new(id, role)
    }

    fn line() -> NetworkDef {
        let mut pump = elem("pump", RoleDef::Source);
        pump.added_head_m = Some(80.0);
        let mut hose = elem("hose", RoleDef::Link);
        hose.hose = Some(HoseDef {
            kind: "51".into(),
            count: 3,
        });
        let mut nozzle = elem("nozzle", RoleDef::Sink);
        nozzle.law = Some(LawDef::Nozzle);
        nozzle.conductance = Some(1.17);
        NetworkDef {
            id: "line".into(),
            name: "Line".into(),
            elements: vec![pump, hose, nozzle],
            connections: vec![
                ConnectionDef {
                    from: "pump".into(),
                    to: "hose".into(),
                },
                ConnectionDef {
                    from: "hose".into(),
                    to: "nozzle".into(),
                },
            ],
            observers: vec![ObserverDef {
                element: "nozzle".into(),
                attributes: vec!["q".into()],
            }],
            solve: SolveDef::default(),
        }
    }

    #[test]
    fn compile_wires_and_registers() {
        let runtime = compile_network(&line()).unwrap();
        let model = &runtime.model;

        assert_eq!(model.elements().len(), 3);
        let pump = runtime.handle("pump").unwrap();
        let hose = runtime.handle("hose").unwrap();
        let nozzle = runtime.handle("nozzle").unwrap();
        assert_eq!(model.inlets(), &[pump]);
        assert_eq!(model.outlets(), &[nozzle]);
        assert_eq!(model.element(hose).unwrap().s, 0.13);
        assert_eq!(model.element(hose).unwrap().n, 3);
        assert_eq!(model.element(pump).unwrap().h_add, 80.0);
        assert!(model.recorder(nozzle).is_some());
        assert!(runtime.handle("ghost").is_err());
    }

    #[test]
    fn explicit_ports_are_applied() {
        let mut split = elem("split", RoleDef::Link);
        split.outputs = Some(3);
        let element = build_element(&split).unwrap();
        assert_eq!(element.output_capacity(), 3);
        assert_eq!(element.input_capacity(), 1);
    }

    #[test]
    fn name_falls_back_to_id() {
        let mut named = elem("n1", RoleDef::Sink);
        assert_eq!(build_element(&named).unwrap().name(), "n1");
        named.name = Some("Nozzle 1".into());
        assert_eq!(build_element(&named).unwrap().name(), "Nozzle 1");
    }

    #[test]
    fn stored_accuracy_selects_accuracy_mode() {
        let solve = SolveDef {
            accuracy: Some(0.1),
            ..SolveDef::default()
        };
        let (config, settings) = solve_config(&solve, &SolveOverrides::default()).unwrap();
        assert_eq!(config.termination, Termination::TargetAccuracy(0.1));
        assert_eq!(
            settings.mode,
            SolveMode::Accuracy {
                accuracy: 0.1,
                max_iterations: 1000
            }
        );
    }

    #[test]
    fn iteration_override_forces_fixed_mode() {
        let solve = SolveDef {
            accuracy: Some(0.1),
            ..SolveDef::default()
        };
        let overrides = SolveOverrides {
            iterations: Some(10),
            ..SolveOverrides::default()
        };
        let (config, _) = solve_config(&solve, &overrides).unwrap();
        assert_eq!(config.termination, Termination::FixedIterations(10));
    }

    #[test]
    fn negative_accuracy_override_is_rejected() {
        let overrides = SolveOverrides {
            accuracy: Some(-1.0),
            ..SolveOverrides::default()
        };
        assert!(matches!(
            solve_config(&SolveDef::default(), &overrides),
            Err(AppError::Solver(_))
        ));
    }
}
