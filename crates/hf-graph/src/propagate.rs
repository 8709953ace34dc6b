//! Head (downstream) and flow (upstream) propagation passes.
//!
//! Each pass walks the network from a start element with an explicit work
//! stack. Children are pushed in reverse so elements are visited in the same
//! depth-first pre-order a recursive walk would use. The downstream walk
//! assumes the `next` edges are acyclic; see [`crate::validate::check_acyclic`].

use std::collections::HashSet;

use hf_core::{NodeId, Real};

use crate::error::GraphResult;
use crate::network::Network;

impl Network {
    /// Set the inlet head of `start`, then carry each element's outlet head
    /// to everything downstream of it.
    ///
    /// Refreshes the cached head loss and outlet head of every visited element.
    pub fn propagate_head_forward(&mut self, start: NodeId, h_in: Real) -> GraphResult<()> {
        let mut stack = vec![(start, h_in)];
        while let Some((id, head)) = stack.pop() {
            let element = self.element_mut(id)?;
            element.h_in = head;
            let h_out = element.compute_outlet_head();
            stack.extend(element.next.iter().rev().map(|&n| (n, h_out)));
        }
        Ok(())
    }

    /// Zero the flow of `start` and of everything upstream of it.
    pub fn propagate_flow_reset(&mut self, start: NodeId) -> GraphResult<()> {
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let element = self.element_mut(id)?;
            element.q = 0.0;
            stack.extend(element.previous.iter().rev().copied());
        }
        Ok(())
    }

    /// Add `q` to the flow of `start`, then feed it upstream.
    ///
    /// At an element with several predecessors the flow is split equally
    /// between them, whatever their resistance.
    pub fn propagate_flow_add(&mut self, start: NodeId, q: Real) -> GraphResult<()> {
        let mut stack = vec![(start, q)];
        while let Some((id, share)) = stack.pop() {
            let element = self.element_mut(id)?;
            element.q += share;
            let feeders = element.previous.len();
            if feeders == 0 {
                continue;
            }
            let split = share / feeders as Real;
            stack.extend(element.previous.iter().rev().map(|&p| (p, split)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::element::{DEFAULT_FLOW, Element, FlowLaw};
    use crate::network::Network;
    use hf_core::NodeId;

    /// pump -> main -> split -> {w1 -> n1, w2 -> n2}
    fn two_branch() -> (Network, [NodeId; 7]) {
        let mut net = Network::new();
        let pump = net.insert(Element::source("pump").with_added_head(40.0));
        let main = net.insert(Element::link("main").with_resistance(0.015).with_count(3));
        let split = net.insert(Element::link("split").with_ports(1, 2));
        let w1 = net.insert(Element::link("w1").with_resistance(0.13).with_count(1));
        let w2 = net.insert(Element::link("w2").with_resistance(0.13).with_count(3));
        let n1 = net.insert(Element::sink("n1").with_law(FlowLaw::Nozzle).with_conductance(1.17));
        let n2 = net.insert(Element::sink("n2").with_law(FlowLaw::Nozzle).with_conductance(1.17));
        net.connect(pump, main);
        net.connect(main, split);
        net.connect(split, w1);
        net.connect(w1, n1);
        net.connect(split, w2);
        net.connect(w2, n2);
        (net, [pump, main, split, w1, w2, n1, n2])
    }

    #[test]
    fn forward_pass_follows_each_path() {
        let (mut net, [pump, main, split, w1, w2, n1, n2]) = two_branch();
        net.propagate_head_forward(pump, 0.0).unwrap();

        let q = DEFAULT_FLOW;
        let main_loss = 0.015 * 3.0 * q * q;
        assert!((net.element(main).unwrap().h_in - 40.0).abs() < 1e-12);
        assert!((net.element(split).unwrap().h_in - (40.0 - main_loss)).abs() < 1e-12);
        assert!((net.element(w1).unwrap().h_in - (40.0 - main_loss)).abs() < 1e-12);
        let n1_head = 40.0 - main_loss - 0.13 * q * q;
        let n2_head = 40.0 - main_loss - 0.13 * 3.0 * q * q;
        assert!((net.element(n1).unwrap().h_in - n1_head).abs() < 1e-12);
        assert!((net.element(n2).unwrap().h_in - n2_head).abs() < 1e-12);
        assert!(net.element(w2).unwrap().head_loss() > 0.0);
    }

    #[test]
    fn flow_reset_clears_upstream_only() {
        let (mut net, [pump, main, split, w1, w2, n1, _n2]) = two_branch();
        net.propagate_flow_reset(n1).unwrap();

        for id in [pump, main, split, w1, n1] {
            assert_eq!(net.element(id).unwrap().q, 0.0);
        }
        assert_eq!(net.element(w2).unwrap().q, DEFAULT_FLOW);
    }

    #[test]
    fn flow_add_accumulates_at_shared_elements() {
        let (mut net, [pump, main, split, w1, w2, n1, n2]) = two_branch();
        net.propagate_flow_reset(n1).unwrap();
        net.propagate_flow_reset(n2).unwrap();
        net.propagate_flow_add(n1, 4.0).unwrap();
        net.propagate_flow_add(n2, 3.0).unwrap();

        assert_eq!(net.element(w1).unwrap().q, 4.0);
        assert_eq!(net.element(w2).unwrap().q, 3.0);
        assert_eq!(net.element(split).unwrap().q, 7.0);
        assert_eq!(net.element(main).unwrap().q, 7.0);
        assert_eq!(net.element(pump).unwrap().q, 7.0);
    }

    #[test]
    fn flow_add_splits_equally_at_merges() {
        // p1, p2 -> collector -> nozzle
        let mut net = Network::new();
        let p1 = net.insert(Element::source("p1"));
        let p2 = net.insert(Element::source("p2"));
        let collector = net.insert(Element::link("collector").with_ports(2, 1));
        let nozzle = net.insert(Element::sink("nozzle"));
        net.connect(p1, collector);
        net.connect(p2, collector);
        net.connect(collector, nozzle);

        net.propagate_flow_reset(nozzle).unwrap();
        net.propagate_flow_add(nozzle, 10.0).unwrap();

        assert_eq!(net.element(collector).unwrap().q, 10.0);
        assert_eq!(net.element(p1).unwrap().q, 5.0);
        assert_eq!(net.element(p2).unwrap().q, 5.0);
    }

    #[test]
    fn propagation_from_stale_handle_fails() {
        let (mut net, [_, _, _, _, _, n1, _]) = two_branch();
        let bogus = NodeId::from_index(999);
        assert!(net.propagate_head_forward(bogus, 10.0).is_err());
        assert!(net.propagate_flow_add(bogus, 1.0).is_err());
        assert!(net.propagate_flow_reset(n1).is_ok());
    }
}
