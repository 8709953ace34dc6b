//! hf-graph: hose network layer for hoseflow.
//!
//! Provides:
//! - Elements (sources, links, sinks) with their hydraulic parameters
//! - An arena [`Network`] with handle-based edges and port capacities
//! - Head and flow propagation passes
//! - The [`Model`]: registration, inlets/outlets, dead-element sweep, observers
//! - Structural validation and inspection helpers
//!
//! # Example
//!
//! ```
//! use hf_graph::{Element, FlowLaw, Model};
//!
//! let mut model = Model::new("attack line");
//! let pump = model.insert(Element::source("pump").with_added_head(80.0));
//! let hose = model.insert(Element::link("hose").with_resistance(0.13).with_count(3));
//! let nozzle = model.insert(
//!     Element::sink("nozzle").with_law(FlowLaw::Nozzle).with_conductance(1.17),
//! );
//! model.connect(pump, hose);
//! model.connect(hose, nozzle);
//! model.build_from(pump, true).unwrap();
//!
//! assert_eq!(model.elements().len(), 3);
//! assert_eq!(model.inlets(), &[pump]);
//! assert_eq!(model.outlets(), &[nozzle]);
//! ```

pub mod element;
pub mod error;
pub mod history;
pub mod inspect;
pub mod model;
pub mod network;
mod propagate;
pub mod validate;

// Re-exports for ergonomics
pub use element::{ATTRIBUTES, DEFAULT_FLOW, Element, FlowLaw, Role};
pub use error::{GraphError, GraphResult, PortSide};
pub use history::HistoryRecorder;
pub use inspect::ModelListing;
pub use model::Model;
pub use network::Network;
