//! Read-only views for diagnostics and reports.

use std::fmt;

use hf_core::{NodeId, Real};

use crate::element::{ATTRIBUTES, Element};
use crate::error::GraphResult;
use crate::model::Model;
use crate::network::Network;

/// Names of the upstream neighbours of `id`.
pub fn previous_names(network: &Network, id: NodeId) -> GraphResult<Vec<String>> {
    names(network, network.element(id)?.previous())
}

/// Names of the downstream neighbours of `id`.
pub fn next_names(network: &Network, id: NodeId) -> GraphResult<Vec<String>> {
    names(network, network.element(id)?.next())
}

fn names(network: &Network, ids: &[NodeId]) -> GraphResult<Vec<String>> {
    ids.iter()
        .map(|&n| network.element(n).map(|e| e.name().to_string()))
        .collect()
}

/// Every observable attribute of the element with its current value.
pub fn element_state(element: &Element) -> Vec<(&'static str, Real)> {
    ATTRIBUTES
        .iter()
        .filter_map(|&name| element.attribute(name).map(|v| (name, v)))
        .collect()
}

/// Names of all, inlet and outlet elements of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelListing {
    pub all: Vec<String>,
    pub inlets: Vec<String>,
    pub outlets: Vec<String>,
}

impl ModelListing {
    pub fn of(model: &Model) -> GraphResult<Self> {
        let network = model.network();
        Ok(Self {
            all: names(network, model.elements())?,
            inlets: names(network, model.inlets())?,
            outlets: names(network, model.outlets())?,
        })
    }
}

impl fmt::Display for ModelListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (title, names) in [("all", &self.all), ("in", &self.inlets), ("out", &self.outlets)] {
            writeln!(f, "{title}:")?;
            for name in names {
                writeln!(f, "  {name}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbour_names_and_listing() {
        let mut model = Model::new("m");
        let pump = model.insert(Element::source("pump"));
        let split = model.insert(Element::link("split").with_ports(1, 2));
        let a = model.insert(Element::sink("a"));
        let b = model.insert(Element::sink("b"));
        model.connect(pump, split);
        model.connect(split, a);
        model.connect(split, b);
        model.build_from(pump, true).unwrap();

        assert_eq!(previous_names(model.network(), split).unwrap(), vec!["pump"]);
        assert_eq!(next_names(model.network(), split).unwrap(), vec!["a", "b"]);

        let listing = ModelListing::of(&model).unwrap();
        assert_eq!(listing.inlets, vec!["pump"]);
        assert_eq!(listing.outlets, vec!["a", "b"]);
        let text = listing.to_string();
        assert!(text.starts_with("all:\n  pump\n"));
        assert!(text.contains("in:\n  pump\nout:\n  a\n  b\n"));
    }

    #[test]
    fn element_state_lists_every_attribute() {
        let state = element_state(&Element::link("hose").with_count(2));
        assert_eq!(state.len(), ATTRIBUTES.len());
        assert!(state.contains(&("n", 2.0)));
    }
}
