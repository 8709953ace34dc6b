//! Hydraulic elements: the node data of a hose network.

use hf_core::{Length, NodeId, Real, m};

use crate::error::{GraphError, GraphResult};

/// Starting flow estimate for a fresh element (l/s), one standard hand line.
pub const DEFAULT_FLOW: Real = 3.7;

/// Attribute names exposed by [`Element::attribute`].
pub const ATTRIBUTES: [&str; 13] = [
    "q", "s", "n", "H_in", "h", "H_add", "z", "p", "l", "H_out", "L", "ri", "ro",
];

/// Role of an element in the network, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Supplies water (pump, hydrant).
    Source,
    /// Carries water (hose lines, splitters, collectors).
    Link,
    /// Discharges water (nozzles).
    Sink,
}

impl Role {
    /// Default `(input, output)` port capacities.
    pub fn default_ports(self) -> (usize, usize) {
        match self {
            Role::Source => (0, 1),
            Role::Link => (1, 1),
            Role::Sink => (1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Source => "source",
            Role::Link => "link",
            Role::Sink => "sink",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Law computing the flow leaving an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowLaw {
    /// Outlet flow equals the flow through the element.
    #[default]
    PassThrough,
    /// Outlet flow is `p * sqrt(H_in)`.
    Nozzle,
}

impl FlowLaw {
    pub fn outlet_flow(self, element: &Element) -> GraphResult<Real> {
        match self {
            FlowLaw::PassThrough => Ok(element.q),
            FlowLaw::Nozzle => {
                if !element.h_in.is_finite() || element.h_in < 0.0 {
                    return Err(GraphError::NegativeHead {
                        element: element.name.clone(),
                        head: element.h_in,
                    });
                }
                Ok(element.p * element.h_in.sqrt())
            }
        }
    }
}

/// One hydraulic element of the network.
///
/// Physical parameters are public and may be edited between solves.
/// Connections are owned by the [`crate::Network`] that stores the element,
/// so the edge lists are read-only here.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) name: String,
    role: Role,
    law: FlowLaw,

    /// Flow through the element (l/s).
    pub q: Real,
    /// Resistance of one unit.
    pub s: Real,
    /// Number of units (e.g. hose sections in a line).
    pub n: u32,
    /// Head at the inlet (m).
    pub h_in: Real,
    /// Head added by the element, e.g. pump boost (m).
    pub h_add: Real,
    /// Elevation gain across the element (m).
    pub z: Real,
    /// Nozzle conductance.
    pub p: Real,
    /// Length of one unit (m).
    pub l: Real,

    h: Real,
    h_out: Real,

    pub(crate) ri: usize,
    pub(crate) ro: usize,
    pub(crate) previous: Vec<NodeId>,
    pub(crate) next: Vec<NodeId>,
}

impl Element {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        let (ri, ro) = role.default_ports();
        Self {
            name: name.into(),
            role,
            law: FlowLaw::PassThrough,
            q: DEFAULT_FLOW,
            s: 0.0,
            n: 1,
            h_in: 0.0,
            h_add: 0.0,
            z: 0.0,
            p: 1.0,
            l: 0.0,
            h: 0.0,
            h_out: 0.0,
            ri,
            ro,
            previous: Vec::new(),
            next: Vec::new(),
        }
    }

    pub fn source(name: impl Into<String>) -> Self {
        Self::new(name, Role::Source)
    }

    pub fn link(name: impl Into<String>) -> Self {
        Self::new(name, Role::Link)
    }

    pub fn sink(name: impl Into<String>) -> Self {
        Self::new(name, Role::Sink)
    }

    pub fn with_law(mut self, law: FlowLaw) -> Self {
        self.law = law;
        self
    }

    pub fn with_flow(mut self, q: Real) -> Self {
        self.q = q;
        self
    }

    pub fn with_resistance(mut self, s: Real) -> Self {
        self.s = s;
        self
    }

    pub fn with_count(mut self, n: u32) -> Self {
        self.n = n;
        self
    }

    pub fn with_inlet_head(mut self, h_in: Real) -> Self {
        self.h_in = h_in;
        self
    }

    pub fn with_added_head(mut self, h_add: Real) -> Self {
        self.h_add = h_add;
        self
    }

    pub fn with_elevation(mut self, z: Real) -> Self {
        self.z = z;
        self
    }

    pub fn with_conductance(mut self, p: Real) -> Self {
        self.p = p;
        self
    }

    pub fn with_unit_length(mut self, l: Real) -> Self {
        self.l = l;
        self
    }

    /// Port capacities for an element that is not yet connected.
    pub fn with_ports(mut self, inputs: usize, outputs: usize) -> Self {
        self.ri = inputs;
        self.ro = outputs;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn law(&self) -> FlowLaw {
        self.law
    }

    pub fn input_capacity(&self) -> usize {
        self.ri
    }

    pub fn output_capacity(&self) -> usize {
        self.ro
    }

    /// Upstream neighbours, oldest connection first.
    pub fn previous(&self) -> &[NodeId] {
        &self.previous
    }

    /// Downstream neighbours, oldest connection first.
    pub fn next(&self) -> &[NodeId] {
        &self.next
    }

    pub fn has_spare_input(&self) -> bool {
        self.ri > self.previous.len()
    }

    pub fn has_spare_output(&self) -> bool {
        self.ro > self.next.len()
    }

    /// Head loss cached by the last [`Element::compute_head_loss`].
    pub fn head_loss(&self) -> Real {
        self.h
    }

    /// Outlet head cached by the last [`Element::compute_outlet_head`].
    pub fn outlet_head(&self) -> Real {
        self.h_out
    }

    pub fn total_length(&self) -> Length {
        m(self.n as Real * self.l)
    }

    /// `h = s * n * q^2`
    pub fn compute_head_loss(&mut self) -> Real {
        self.h = self.s * self.n as Real * self.q * self.q;
        self.h
    }

    /// `H_out = H_in + H_add - h - z`
    pub fn compute_outlet_head(&mut self) -> Real {
        self.h_out = self.h_in + self.h_add - self.compute_head_loss() - self.z;
        self.h_out
    }

    pub fn compute_outlet_flow(&self) -> GraphResult<Real> {
        self.law.outlet_flow(self)
    }

    /// Current value of an observable attribute, by its canonical name.
    pub fn attribute(&self, name: &str) -> Option<Real> {
        let value = match name {
            "q" => self.q,
            "s" => self.s,
            "n" => self.n as Real,
            "H_in" => self.h_in,
            "h" => self.h,
            "H_add" => self.h_add,
            "z" => self.z,
            "p" => self.p,
            "l" => self.l,
            "H_out" => self.h_out,
            "L" => self.n as Real * self.l,
            "ri" => self.ri as Real,
            "ro" => self.ro as Real,
            _ => return None,
        };
        Some(value)
    }

    /// True when the element can no longer serve its role.
    pub(crate) fn is_dead(&self) -> bool {
        match self.role {
            Role::Source => self.next.is_empty(),
            Role::Link => self.previous.is_empty() || self.next.is_empty(),
            Role::Sink => self.previous.is_empty(),
        }
    }
}
