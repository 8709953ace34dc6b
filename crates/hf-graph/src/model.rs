//! Hose network model: registered elements, inlets, outlets and observers.

use std::collections::{BTreeMap, HashSet};

use hf_core::{NodeId, Real};
use tracing::{debug, info};

use crate::element::{Element, Role};
use crate::error::{GraphError, GraphResult};
use crate::history::HistoryRecorder;
use crate::network::Network;
use crate::validate;

/// A named hose network ready to be solved.
///
/// The model owns its [`Network`] and keeps the ordered list of registered
/// elements, the inlets (sources) and outlets (sinks) the solver iterates
/// over, and the history recorders attached to individual elements.
#[derive(Debug, Clone, Default)]
pub struct Model {
    name: String,
    network: Network,
    elements: Vec<NodeId>,
    inlets: Vec<NodeId>,
    outlets: Vec<NodeId>,
    counter: usize,
    observers: BTreeMap<NodeId, HistoryRecorder>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_network(name, Network::new())
    }

    /// Wrap an existing network. Nothing is registered yet.
    pub fn with_network(name: impl Into<String>, network: Network) -> Self {
        let name = name.into();
        debug!(model = %name, "new model");
        Self {
            name,
            network,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Store an element in the network without registering it.
    pub fn insert(&mut self, element: Element) -> NodeId {
        self.network.insert(element)
    }

    /// Shorthand for [`Network::connect`].
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> NodeId {
        self.network.connect(from, to)
    }

    pub fn element(&self, id: NodeId) -> GraphResult<&Element> {
        self.network.element(id)
    }

    pub fn element_mut(&mut self, id: NodeId) -> GraphResult<&mut Element> {
        self.network.element_mut(id)
    }

    /// Registered elements, in registration order.
    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }

    pub fn inlets(&self) -> &[NodeId] {
        &self.inlets
    }

    pub fn outlets(&self) -> &[NodeId] {
        &self.outlets
    }

    /// Number of registrations so far; drives auto-naming.
    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn is_registered(&self, id: NodeId) -> bool {
        self.elements.contains(&id)
    }

    /// Registered element with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .copied()
            .find(|&id| self.network.get(id).is_some_and(|e| e.name() == name))
    }

    /// Register an element.
    ///
    /// An element without a name is named `element-<counter>`. Returns false
    /// when the element was already registered.
    pub fn add_node(&mut self, id: NodeId) -> GraphResult<bool> {
        if self.is_registered(id) {
            self.network.element(id)?;
            return Ok(false);
        }
        let element = self.network.element_mut(id)?;
        self.counter += 1;
        if element.name.is_empty() {
            element.name = format!("element-{}", self.counter);
        }
        debug!(node = %id, name = element.name(), "registered");
        self.elements.push(id);
        Ok(true)
    }

    /// Register several elements, then optionally classify every member.
    pub fn add_nodes(&mut self, ids: &[NodeId], interpret: bool) -> GraphResult<()> {
        for &id in ids {
            self.add_node(id)?;
        }
        if interpret {
            self.interpret();
        }
        Ok(())
    }

    /// Rebuild inlets and outlets from the roles of the registered elements.
    pub fn interpret(&mut self) {
        self.inlets.clear();
        self.outlets.clear();
        for &id in &self.elements {
            match self.network.get(id).map(Element::role) {
                Some(Role::Source) => self.inlets.push(id),
                Some(Role::Sink) => self.outlets.push(id),
                _ => {}
            }
        }
    }

    /// Replace the inlets with an explicit list.
    pub fn set_inlets(&mut self, ids: &[NodeId]) -> GraphResult<()> {
        self.inlets = self.checked_unique(ids)?;
        Ok(())
    }

    /// Replace the outlets with an explicit list.
    pub fn set_outlets(&mut self, ids: &[NodeId]) -> GraphResult<()> {
        self.outlets = self.checked_unique(ids)?;
        Ok(())
    }

    fn checked_unique(&self, ids: &[NodeId]) -> GraphResult<Vec<NodeId>> {
        let mut out = Vec::with_capacity(ids.len());
        for &id in ids {
            self.network.element(id)?;
            if !out.contains(&id) {
                out.push(id);
            }
        }
        Ok(out)
    }

    /// Register `seed` and everything connected to it, upstream or downstream.
    pub fn build_from(&mut self, seed: NodeId, interpret: bool) -> GraphResult<()> {
        let mut visited = HashSet::new();
        let mut stack = vec![seed];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            self.add_node(id)?;
            let element = self.network.element(id)?;
            let neighbours: Vec<NodeId> = element
                .next()
                .iter()
                .chain(element.previous())
                .copied()
                .collect();
            stack.extend(neighbours.into_iter().rev());
        }
        if interpret {
            self.interpret();
        }
        Ok(())
    }

    /// Delete an element and every neighbour left unable to serve its role.
    ///
    /// A source without downstream, a link missing either side, or a sink
    /// without upstream is removed too, cascading. Returns the removed handles
    /// in removal order.
    pub fn remove_node(&mut self, id: NodeId) -> GraphResult<Vec<NodeId>> {
        let (_, neighbours) = self.network.remove(id)?;
        self.forget(id);
        let mut removed = vec![id];

        let mut work: Vec<NodeId> = neighbours.into_iter().rev().collect();
        while let Some(candidate) = work.pop() {
            if !self.network.get(candidate).is_some_and(Element::is_dead) {
                continue;
            }
            let (_, more) = self.network.remove(candidate)?;
            self.forget(candidate);
            removed.push(candidate);
            work.extend(more.into_iter().rev());
        }

        info!(node = %id, removed = removed.len(), "element removed");
        Ok(removed)
    }

    fn forget(&mut self, id: NodeId) {
        self.elements.retain(|&e| e != id);
        self.inlets.retain(|&e| e != id);
        self.outlets.retain(|&e| e != id);
        self.detach_observer(id);
    }

    /// Drop every element, registration and observer.
    pub fn reset(&mut self) {
        self.network.clear();
        self.elements.clear();
        self.inlets.clear();
        self.outlets.clear();
        self.observers.clear();
        self.counter = 0;
    }

    /// Total flow leaving the network through its outlets.
    pub fn summary_flow(&self) -> GraphResult<Real> {
        let mut total = 0.0;
        for &id in &self.outlets {
            total += self.network.element(id)?.compute_outlet_flow()?;
        }
        Ok(total)
    }

    /// Attach a history recorder to an element, replacing any existing one.
    pub fn observe<I, S>(&mut self, id: NodeId, attributes: I) -> GraphResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.network.element(id)?;
        self.observers.insert(id, HistoryRecorder::new(attributes));
        Ok(())
    }

    pub fn detach_observer(&mut self, id: NodeId) -> Option<HistoryRecorder> {
        self.observers.remove(&id)
    }

    pub fn recorder(&self, id: NodeId) -> Option<&HistoryRecorder> {
        self.observers.get(&id)
    }

    /// Observed elements and their recorders.
    pub fn recorders(&self) -> impl Iterator<Item = (NodeId, &HistoryRecorder)> + '_ {
        self.observers.iter().map(|(&id, r)| (id, r))
    }

    /// Clear the history of every recorder.
    pub fn observers_init(&mut self) {
        for recorder in self.observers.values_mut() {
            recorder.reset();
        }
    }

    /// Snapshot one element into its recorder, if it has one.
    pub fn fix_state(&mut self, id: NodeId) -> GraphResult<()> {
        let element = self.network.element(id)?;
        if let Some(recorder) = self.observers.get_mut(&id) {
            recorder.fix(element);
        }
        Ok(())
    }

    /// Snapshot every registered element.
    pub fn fix_states(&mut self) -> GraphResult<()> {
        for &id in &self.elements {
            let element = self.network.element(id)?;
            if let Some(recorder) = self.observers.get_mut(&id) {
                recorder.fix(element);
            }
        }
        Ok(())
    }

    pub fn history(&self, id: NodeId) -> Option<&BTreeMap<String, Vec<Real>>> {
        self.observers.get(&id).map(HistoryRecorder::history)
    }

    /// Structural checks: edge symmetry, capacity bounds, no cycles, and
    /// every registered handle still live.
    pub fn validate(&self) -> GraphResult<()> {
        for &id in self.elements.iter().chain(&self.inlets).chain(&self.outlets) {
            if !self.network.contains(id) {
                return Err(GraphError::UnknownNode { node: id });
            }
        }
        validate::check_symmetry(&self.network)?;
        validate::check_acyclic(&self.network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::FlowLaw;

    fn chain(model: &mut Model) -> [NodeId; 4] {
        let pump = model.insert(Element::source("pump").with_added_head(80.0));
        let h1 = model.insert(Element::link("h1").with_resistance(0.13));
        let h2 = model.insert(Element::link("h2").with_resistance(0.13));
        let nozzle = model.insert(
            Element::sink("nozzle")
                .with_law(FlowLaw::Nozzle)
                .with_conductance(1.17),
        );
        model.connect(pump, h1);
        model.connect(h1, h2);
        model.connect(h2, nozzle);
        [pump, h1, h2, nozzle]
    }

    #[test]
    fn unnamed_elements_get_counter_names() {
        let mut model = Model::new("m");
        let a = model.insert(Element::link(""));
        let b = model.insert(Element::link("named"));
        let c = model.insert(Element::link(""));
        model.add_nodes(&[a, b, c], false).unwrap();

        assert_eq!(model.element(a).unwrap().name(), "element-1");
        assert_eq!(model.element(b).unwrap().name(), "named");
        assert_eq!(model.element(c).unwrap().name(), "element-3");
        assert_eq!(model.counter(), 3);
    }

    #[test]
    fn registration_is_deduplicated() {
        let mut model = Model::new("m");
        let a = model.insert(Element::source("a"));
        assert!(model.add_node(a).unwrap());
        assert!(!model.add_node(a).unwrap());
        assert_eq!(model.elements(), &[a]);
        assert_eq!(model.counter(), 1);
    }

    #[test]
    fn unknown_handle_is_an_error() {
        let mut model = Model::new("m");
        let err = model.add_node(NodeId::from_index(3)).unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode { .. }));
    }

    #[test]
    fn build_from_any_seed_finds_everything_once() {
        let mut model = Model::new("m");
        let [pump, h1, h2, nozzle] = chain(&mut model);
        model.build_from(h2, true).unwrap();

        let mut members = model.elements().to_vec();
        members.sort();
        assert_eq!(members, vec![pump, h1, h2, nozzle]);
        assert_eq!(model.inlets(), &[pump]);
        assert_eq!(model.outlets(), &[nozzle]);
    }

    #[test]
    fn interpret_does_not_duplicate() {
        let mut model = Model::new("m");
        let [pump, .., nozzle] = chain(&mut model);
        model.build_from(pump, true).unwrap();
        model.interpret();
        assert_eq!(model.inlets(), &[pump]);
        assert_eq!(model.outlets(), &[nozzle]);
    }

    #[test]
    fn explicit_inlets_and_outlets() {
        let mut model = Model::new("m");
        let [pump, h1, ..] = chain(&mut model);
        model.set_inlets(&[pump, pump]).unwrap();
        model.set_outlets(&[h1]).unwrap();
        assert_eq!(model.inlets(), &[pump]);
        assert_eq!(model.outlets(), &[h1]);
        assert!(model.set_outlets(&[NodeId::from_index(50)]).is_err());
    }

    #[test]
    fn removing_the_nozzle_cascades_through_the_chain() {
        let mut model = Model::new("m");
        let [pump, h1, h2, nozzle] = chain(&mut model);
        model.build_from(pump, true).unwrap();

        let removed = model.remove_node(nozzle).unwrap();

        assert_eq!(removed, vec![nozzle, h2, h1, pump]);
        assert!(model.elements().is_empty());
        assert!(model.inlets().is_empty());
        assert!(model.outlets().is_empty());
        assert!(model.network().is_empty());
    }

    #[test]
    fn removing_one_branch_keeps_the_splitter() {
        let mut model = Model::new("m");
        let pump = model.insert(Element::source("pump"));
        let split = model.insert(Element::link("split").with_ports(1, 2));
        let w1 = model.insert(Element::link("w1"));
        let w2 = model.insert(Element::link("w2"));
        let n1 = model.insert(Element::sink("n1"));
        let n2 = model.insert(Element::sink("n2"));
        model.connect(pump, split);
        model.connect(split, w1);
        model.connect(w1, n1);
        model.connect(split, w2);
        model.connect(w2, n2);
        model.build_from(pump, true).unwrap();

        let removed = model.remove_node(n1).unwrap();

        assert_eq!(removed, vec![n1, w1]);
        assert!(model.network().contains(split));
        assert_eq!(model.element(split).unwrap().next(), &[w2]);
        assert_eq!(model.outlets(), &[n2]);
    }

    #[test]
    fn removal_drops_observer() {
        let mut model = Model::new("m");
        let [pump, .., nozzle] = chain(&mut model);
        model.build_from(pump, true).unwrap();
        model.observe(nozzle, ["q"]).unwrap();
        model.remove_node(nozzle).unwrap();
        assert!(model.recorder(nozzle).is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let mut model = Model::new("m");
        let [pump, ..] = chain(&mut model);
        model.build_from(pump, true).unwrap();
        model.observe(pump, ["q"]).unwrap();

        model.reset();

        assert!(model.network().is_empty());
        assert!(model.elements().is_empty());
        assert!(model.recorder(pump).is_none());
        assert_eq!(model.counter(), 0);
    }

    #[test]
    fn summary_flow_sums_outlets() {
        let mut model = Model::new("m");
        let n1 = model.insert(Element::sink("n1").with_flow(2.0));
        let n2 = model.insert(
            Element::sink("n2")
                .with_law(FlowLaw::Nozzle)
                .with_conductance(1.0)
                .with_inlet_head(16.0),
        );
        model.add_nodes(&[n1, n2], true).unwrap();
        assert!((model.summary_flow().unwrap() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn fix_states_records_only_observed_elements() {
        let mut model = Model::new("m");
        let [pump, h1, ..] = chain(&mut model);
        model.build_from(pump, true).unwrap();
        model.observe(h1, ["q", "n"]).unwrap();

        model.fix_states().unwrap();
        model.element_mut(h1).unwrap().q = 5.0;
        model.fix_state(h1).unwrap();
        model.fix_state(pump).unwrap();

        let history = model.history(h1).unwrap();
        assert_eq!(history["q"], vec![3.7, 5.0]);
        assert_eq!(history["n"], vec![1.0, 1.0]);
        assert!(model.history(pump).is_none());

        model.observers_init();
        assert!(model.history(h1).unwrap()["q"].is_empty());
    }

    #[test]
    fn validate_rejects_cycles() {
        let mut model = Model::new("m");
        let a = model.insert(Element::link("a"));
        let b = model.insert(Element::link("b"));
        model.connect(a, b);
        model.connect(b, a);
        model.build_from(a, true).unwrap();
        assert!(matches!(model.validate(), Err(GraphError::Cycle { .. })));
    }
}
