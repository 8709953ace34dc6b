//! Ready-made elements for common fireground equipment.

use hf_core::{Real, ensure_finite, to_m};
use hf_graph::{Element, FlowLaw};

use crate::catalog;
use crate::error::{ComponentError, ComponentResult};

/// Pump (or hydrant) adding `head` meters.
pub fn pump(name: impl Into<String>, head: Real) -> ComponentResult<Element> {
    ensure_finite(head, "pump head")?;
    Ok(Element::source(name).with_added_head(head))
}

/// Hose line of `count` catalog sections of the given kind.
pub fn hose_line(name: impl Into<String>, kind: &str, count: u32) -> ComponentResult<Element> {
    let spec = catalog::lookup(kind)?;
    if count == 0 {
        return Err(ComponentError::InvalidArg {
            what: "hose line needs at least one section",
        });
    }
    Ok(Element::link(name)
        .with_resistance(spec.resistance)
        .with_count(count)
        .with_unit_length(to_m(spec.section_length())))
}

/// Dividing breeching with one inlet.
pub fn splitter(name: impl Into<String>, outputs: usize) -> ComponentResult<Element> {
    if outputs == 0 {
        return Err(ComponentError::InvalidArg {
            what: "splitter needs at least one output",
        });
    }
    Ok(Element::link(name).with_ports(1, outputs))
}

/// Collecting breeching with one outlet.
pub fn collector(name: impl Into<String>, inputs: usize) -> ComponentResult<Element> {
    if inputs == 0 {
        return Err(ComponentError::InvalidArg {
            what: "collector needs at least one input",
        });
    }
    Ok(Element::link(name).with_ports(inputs, 1))
}

/// Nozzle discharging `conductance * sqrt(H_in)`.
pub fn nozzle(name: impl Into<String>, conductance: Real) -> ComponentResult<Element> {
    ensure_finite(conductance, "nozzle conductance")?;
    if conductance < 0.0 {
        return Err(ComponentError::NonPhysical {
            what: "nozzle conductance",
        });
    }
    Ok(Element::sink(name)
        .with_law(FlowLaw::Nozzle)
        .with_conductance(conductance))
}
