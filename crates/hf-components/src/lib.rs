//! hf-components: equipment library for hose networks.
//!
//! Provides:
//! - The fire hose resistance catalog
//! - Presets for pumps, hose lines, breechings and nozzles
//! - Helper formulas for nozzle conductance and head loss
//!
//! # Example
//!
//! ```
//! use hf_components::{calc_p, presets};
//! use hf_graph::Model;
//!
//! let mut model = Model::new("attack");
//! let pump = model.insert(presets::pump("pump", 80.0).unwrap());
//! let line = model.insert(presets::hose_line("line", "51", 3).unwrap());
//! let p = calc_p(3.7, 40.0).unwrap();
//! let nozzle = model.insert(presets::nozzle("nozzle", p).unwrap());
//! model.connect(pump, line);
//! model.connect(line, nozzle);
//! model.build_from(pump, true).unwrap();
//! assert_eq!(model.outlets(), &[nozzle]);
//! ```

pub mod catalog;
pub mod error;
pub mod formulas;
pub mod presets;

// Re-exports
pub use catalog::{HOSES, HoseSpec};
pub use error::{ComponentError, ComponentResult};
pub use formulas::{calc_h, calc_p};
