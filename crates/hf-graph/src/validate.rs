//! Structural checks run before solving.

use std::collections::HashMap;

use hf_core::NodeId;

use crate::error::{GraphError, GraphResult, PortSide};
use crate::network::Network;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Fail with [`GraphError::Cycle`] if the downstream edges contain a cycle.
///
/// Iterative DFS colouring over `next` edges, starting from every element.
pub fn check_acyclic(network: &Network) -> GraphResult<()> {
    let mut marks: HashMap<NodeId, Mark> = HashMap::with_capacity(network.len());

    for root in network.ids() {
        if marks.contains_key(&root) {
            continue;
        }
        // (element, index of the next child to visit)
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
        marks.insert(root, Mark::InProgress);

        while let Some((id, child)) = stack.pop() {
            let next = network.element(id)?.next();
            match next.get(child) {
                Some(&n) => {
                    stack.push((id, child + 1));
                    match marks.get(&n) {
                        Some(Mark::InProgress) => return Err(GraphError::Cycle { node: n }),
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(n, Mark::InProgress);
                            stack.push((n, 0));
                        }
                    }
                }
                None => {
                    marks.insert(id, Mark::Done);
                }
            }
        }
    }
    Ok(())
}

/// Check that every edge is recorded on both sides, points at a live element,
/// and that no element holds more neighbours than its capacity.
pub fn check_symmetry(network: &Network) -> GraphResult<()> {
    for (id, element) in network.iter() {
        if element.previous().len() > element.input_capacity() {
            return Err(GraphError::OverCapacity {
                node: id,
                side: PortSide::Input,
                count: element.previous().len(),
                capacity: element.input_capacity(),
            });
        }
        if element.next().len() > element.output_capacity() {
            return Err(GraphError::OverCapacity {
                node: id,
                side: PortSide::Output,
                count: element.next().len(),
                capacity: element.output_capacity(),
            });
        }

        for &n in element.next() {
            let downstream = network.element(n)?;
            if count(downstream.previous(), id) != count(element.next(), n) {
                return Err(GraphError::Asymmetric { from: id, to: n });
            }
        }
        for &p in element.previous() {
            let upstream = network.element(p)?;
            if count(upstream.next(), id) != count(element.previous(), p) {
                return Err(GraphError::Asymmetric { from: p, to: id });
            }
        }
    }
    Ok(())
}

fn count(list: &[NodeId], id: NodeId) -> usize {
    list.iter().filter(|&&n| n == id).count()
}
