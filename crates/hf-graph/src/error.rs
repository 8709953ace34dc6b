//! Graph-specific error types.

use hf_core::{NodeId, Real};

/// Which side of an element a connection attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortSide {
    /// Upstream connections (`previous`).
    Input,
    /// Downstream connections (`next`).
    Output,
}

impl std::fmt::Display for PortSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortSide::Input => write!(f, "input"),
            PortSide::Output => write!(f, "output"),
        }
    }
}

/// Network construction, topology and element evaluation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Handle does not refer to a live element.
    UnknownNode { node: NodeId },

    /// No spare port on the given side.
    CapacityExhausted {
        node: NodeId,
        side: PortSide,
        capacity: usize,
    },

    /// An element cannot feed itself.
    SelfLoop { node: NodeId },

    /// A square-root flow law was evaluated at negative (or non-finite) inlet head.
    NegativeHead { element: String, head: Real },

    /// Downstream edges form a cycle through this element.
    Cycle { node: NodeId },

    /// Edge recorded on one side only.
    Asymmetric { from: NodeId, to: NodeId },

    /// More neighbours than the port capacity allows.
    OverCapacity {
        node: NodeId,
        side: PortSide,
        count: usize,
        capacity: usize,
    },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::UnknownNode { node } => {
                write!(f, "Element {} does not exist", node)
            }
            GraphError::CapacityExhausted {
                node,
                side,
                capacity,
            } => {
                write!(
                    f,
                    "Element {} has no spare {} port (capacity {})",
                    node, side, capacity
                )
            }
            GraphError::SelfLoop { node } => {
                write!(f, "Element {} cannot be connected to itself", node)
            }
            GraphError::NegativeHead { element, head } => {
                write!(
                    f,
                    "Element '{}' has inlet head {} m, nozzle flow is undefined",
                    element, head
                )
            }
            GraphError::Cycle { node } => {
                write!(f, "Downstream edges form a cycle through element {}", node)
            }
            GraphError::Asymmetric { from, to } => {
                write!(f, "Edge {} -> {} is recorded on one side only", from, to)
            }
            GraphError::OverCapacity {
                node,
                side,
                count,
                capacity,
            } => {
                write!(
                    f,
                    "Element {} has {} {} connections but capacity {}",
                    node, count, side, capacity
                )
            }
        }
    }
}

impl std::error::Error for GraphError {}

pub type GraphResult<T> = Result<T, GraphError>;
