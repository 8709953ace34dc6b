//! Element arena with handle-based edges.

use hf_core::NodeId;
use tracing::{debug, warn};

use crate::element::Element;
use crate::error::{GraphError, GraphResult, PortSide};

/// Arena owning every element of a hose network.
///
/// Elements are addressed by [`NodeId`] handles. Removing an element leaves
/// its slot empty, so handles are never reused and stale handles simply stop
/// resolving.
#[derive(Debug, Clone, Default)]
pub struct Network {
    slots: Vec<Option<Element>>,
    live: usize,
}

impl Network {
    /// Create a new empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an element and return its handle.
    pub fn insert(&mut self, element: Element) -> NodeId {
        let id = NodeId::from_index(self.slots.len() as u32);
        self.slots.push(Some(element));
        self.live += 1;
        id
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.slots.get(id.slot()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.slots.get_mut(id.slot()).and_then(Option::as_mut)
    }

    /// Like [`Network::get`], but a stale handle is an error.
    pub fn element(&self, id: NodeId) -> GraphResult<&Element> {
        self.get(id).ok_or(GraphError::UnknownNode { node: id })
    }

    pub fn element_mut(&mut self, id: NodeId) -> GraphResult<&mut Element> {
        self.get_mut(id).ok_or(GraphError::UnknownNode { node: id })
    }

    /// Iterate over live elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Element)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (NodeId::from_index(i as u32), e)))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    /// First live element with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, e)| e.name == name).map(|(id, _)| id)
    }

    /// Connect `to` downstream of `from`, failing if either side has no spare port.
    ///
    /// Returns `to` so connections can be chained.
    pub fn try_connect(&mut self, from: NodeId, to: NodeId) -> GraphResult<NodeId> {
        if from == to {
            return Err(GraphError::SelfLoop { node: from });
        }

        let upstream = self.element(from)?;
        if !upstream.has_spare_output() {
            return Err(GraphError::CapacityExhausted {
                node: from,
                side: PortSide::Output,
                capacity: upstream.ro,
            });
        }
        let downstream = self.element(to)?;
        if !downstream.has_spare_input() {
            return Err(GraphError::CapacityExhausted {
                node: to,
                side: PortSide::Input,
                capacity: downstream.ri,
            });
        }

        self.element_mut(from)?.next.push(to);
        self.element_mut(to)?.previous.push(from);
        debug!(%from, %to, "connected");
        Ok(to)
    }

    /// Connect `to` downstream of `from`.
    ///
    /// A connection that cannot be made is skipped with a warning; `to` is
    /// returned either way so chained construction keeps going.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> NodeId {
        if let Err(err) = self.try_connect(from, to) {
            warn!(%from, %to, error = %err, "connection skipped");
        }
        to
    }

    /// Remove every `from -> to` edge on both sides. Returns true if anything changed.
    pub fn unlink(&mut self, from: NodeId, to: NodeId) -> bool {
        let mut changed = false;
        if let Some(upstream) = self.get_mut(from) {
            changed |= remove_all(&mut upstream.next, to);
        }
        if let Some(downstream) = self.get_mut(to) {
            changed |= remove_all(&mut downstream.previous, from);
        }
        changed
    }

    /// Strip edges around `id`.
    ///
    /// `unlink_neighbors` removes `id` from every neighbour's opposite list,
    /// `unlink_self` clears the element's own lists. Passing only one of them
    /// leaves the edges one-sided, which is how removal is staged.
    pub fn disconnect(
        &mut self,
        id: NodeId,
        unlink_neighbors: bool,
        unlink_self: bool,
    ) -> GraphResult<()> {
        let element = self.element(id)?;
        if unlink_neighbors {
            let next = element.next.clone();
            let previous = element.previous.clone();
            for n in next {
                if let Some(downstream) = self.get_mut(n) {
                    remove_all(&mut downstream.previous, id);
                }
            }
            for p in previous {
                if let Some(upstream) = self.get_mut(p) {
                    remove_all(&mut upstream.next, id);
                }
            }
        }
        if unlink_self {
            let element = self.element_mut(id)?;
            element.next.clear();
            element.previous.clear();
        }
        Ok(())
    }

    /// Set the input capacity, evicting the oldest upstream connections that no longer fit.
    ///
    /// Returns the evicted neighbours, oldest first.
    pub fn set_input_capacity(&mut self, id: NodeId, capacity: usize) -> GraphResult<Vec<NodeId>> {
        let element = self.element_mut(id)?;
        element.ri = capacity;
        let excess = element.previous.len().saturating_sub(capacity);
        let evicted: Vec<NodeId> = element.previous.drain(..excess).collect();
        for &upstream in &evicted {
            if let Some(u) = self.get_mut(upstream) {
                remove_first(&mut u.next, id);
            }
        }
        if !evicted.is_empty() {
            debug!(node = %id, evicted = evicted.len(), "input capacity reduced");
        }
        Ok(evicted)
    }

    /// Set the output capacity, evicting the oldest downstream connections that no longer fit.
    ///
    /// Returns the evicted neighbours, oldest first.
    pub fn set_output_capacity(&mut self, id: NodeId, capacity: usize) -> GraphResult<Vec<NodeId>> {
        let element = self.element_mut(id)?;
        element.ro = capacity;
        let excess = element.next.len().saturating_sub(capacity);
        let evicted: Vec<NodeId> = element.next.drain(..excess).collect();
        for &downstream in &evicted {
            if let Some(d) = self.get_mut(downstream) {
                remove_first(&mut d.previous, id);
            }
        }
        if !evicted.is_empty() {
            debug!(node = %id, evicted = evicted.len(), "output capacity reduced");
        }
        Ok(evicted)
    }

    /// Detach and delete an element.
    ///
    /// Returns the element and its former neighbours (upstream first, no duplicates).
    pub(crate) fn remove(&mut self, id: NodeId) -> GraphResult<(Element, Vec<NodeId>)> {
        let element = self.element(id)?;
        let mut neighbours: Vec<NodeId> = Vec::new();
        for &n in element.previous.iter().chain(element.next.iter()) {
            if !neighbours.contains(&n) {
                neighbours.push(n);
            }
        }

        self.disconnect(id, true, true)?;
        let element = self.slots[id.slot()]
            .take()
            .ok_or(GraphError::UnknownNode { node: id })?;
        self.live -= 1;
        Ok((element, neighbours))
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.live = 0;
    }
}

fn remove_all(list: &mut Vec<NodeId>, id: NodeId) -> bool {
    let before = list.len();
    list.retain(|&n| n != id);
    list.len() != before
}

fn remove_first(list: &mut Vec<NodeId>, id: NodeId) {
    if let Some(pos) = list.iter().position(|&n| n == id) {
        list.remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter_with_three_branches() -> (Network, NodeId, [NodeId; 3]) {
        let mut net = Network::new();
        let split = net.insert(Element::link("split").with_ports(1, 3));
        let a = net.insert(Element::link("a"));
        let b = net.insert(Element::link("b"));
        let c = net.insert(Element::link("c"));
        net.try_connect(split, a).unwrap();
        net.try_connect(split, b).unwrap();
        net.try_connect(split, c).unwrap();
        (net, split, [a, b, c])
    }

    #[test]
    fn connect_records_edge_on_both_sides() {
        let mut net = Network::new();
        let pump = net.insert(Element::source("pump"));
        let hose = net.insert(Element::link("hose"));

        let returned = net.connect(pump, hose);

        assert_eq!(returned, hose);
        assert_eq!(net.element(pump).unwrap().next(), &[hose]);
        assert_eq!(net.element(hose).unwrap().previous(), &[pump]);
    }

    #[test]
    fn connect_chains() {
        let mut net = Network::new();
        let pump = net.insert(Element::source("pump"));
        let hose = net.insert(Element::link("hose"));
        let nozzle = net.insert(Element::sink("nozzle"));

        let end = net.connect(pump, hose);
        let end = net.connect(end, nozzle);

        assert_eq!(end, nozzle);
        assert_eq!(net.element(hose).unwrap().next(), &[nozzle]);
    }

    #[test]
    fn connect_without_spare_port_is_a_no_op() {
        let mut net = Network::new();
        let pump = net.insert(Element::source("pump"));
        let h1 = net.insert(Element::link("h1"));
        let h2 = net.insert(Element::link("h2"));
        net.connect(pump, h1);

        // pump has a single output
        let returned = net.connect(pump, h2);
        assert_eq!(returned, h2);
        assert_eq!(net.element(pump).unwrap().next(), &[h1]);
        assert!(net.element(h2).unwrap().previous().is_empty());

        let err = net.try_connect(pump, h2).unwrap_err();
        assert_eq!(
            err,
            GraphError::CapacityExhausted {
                node: pump,
                side: PortSide::Output,
                capacity: 1
            }
        );
    }

    #[test]
    fn connect_respects_downstream_input_capacity() {
        let mut net = Network::new();
        let p1 = net.insert(Element::source("p1"));
        let p2 = net.insert(Element::source("p2"));
        let hose = net.insert(Element::link("hose"));
        net.try_connect(p1, hose).unwrap();

        let err = net.try_connect(p2, hose).unwrap_err();
        assert!(matches!(
            err,
            GraphError::CapacityExhausted {
                side: PortSide::Input,
                ..
            }
        ));
        assert!(net.element(p2).unwrap().next().is_empty());
    }

    #[test]
    fn self_loop_rejected() {
        let mut net = Network::new();
        let hose = net.insert(Element::link("hose"));
        assert_eq!(
            net.try_connect(hose, hose).unwrap_err(),
            GraphError::SelfLoop { node: hose }
        );
    }

    #[test]
    fn connect_then_disconnect_restores_lists() {
        let mut net = Network::new();
        let a = net.insert(Element::link("a").with_ports(1, 2));
        let b = net.insert(Element::link("b"));
        let other = net.insert(Element::link("other"));
        net.try_connect(a, other).unwrap();
        let a_next_before = net.element(a).unwrap().next().to_vec();
        let b_prev_before = net.element(b).unwrap().previous().to_vec();

        net.try_connect(a, b).unwrap();
        net.unlink(a, b);

        assert_eq!(net.element(a).unwrap().next(), a_next_before.as_slice());
        assert_eq!(net.element(b).unwrap().previous(), b_prev_before.as_slice());
    }

    #[test]
    fn disconnect_with_neighbours_restores_upstream_list() {
        let mut net = Network::new();
        let a = net.insert(Element::link("a").with_ports(2, 2));
        let up = net.insert(Element::source("up"));
        let other = net.insert(Element::sink("other"));
        let b = net.insert(Element::link("b"));
        net.try_connect(up, a).unwrap();
        net.try_connect(a, other).unwrap();
        let a_next_before = net.element(a).unwrap().next().to_vec();
        let a_prev_before = net.element(a).unwrap().previous().to_vec();

        net.try_connect(a, b).unwrap();
        assert_eq!(net.element(a).unwrap().next(), &[other, b]);
        net.disconnect(b, true, true).unwrap();

        assert_eq!(net.element(a).unwrap().next(), a_next_before.as_slice());
        assert_eq!(net.element(a).unwrap().previous(), a_prev_before.as_slice());
        assert!(net.element(b).unwrap().previous().is_empty());
        assert_eq!(net.element(other).unwrap().previous(), &[a]);
    }

    #[test]
    fn disconnect_both_flags_detaches_fully() {
        let mut net = Network::new();
        let a = net.insert(Element::source("a"));
        let b = net.insert(Element::link("b"));
        let c = net.insert(Element::sink("c"));
        net.connect(a, b);
        net.connect(b, c);

        net.disconnect(b, true, true).unwrap();

        assert!(net.element(a).unwrap().next().is_empty());
        assert!(net.element(c).unwrap().previous().is_empty());
        assert!(net.element(b).unwrap().next().is_empty());
        assert!(net.element(b).unwrap().previous().is_empty());
    }

    #[test]
    fn disconnect_neighbours_only_keeps_own_lists() {
        let mut net = Network::new();
        let a = net.insert(Element::source("a"));
        let b = net.insert(Element::link("b"));
        net.connect(a, b);

        net.disconnect(b, true, false).unwrap();

        assert!(net.element(a).unwrap().next().is_empty());
        assert_eq!(net.element(b).unwrap().previous(), &[a]);
    }

    #[test]
    fn shrinking_output_capacity_keeps_newest() {
        let (mut net, split, [a, b, c]) = splitter_with_three_branches();

        let evicted = net.set_output_capacity(split, 1).unwrap();

        assert_eq!(evicted, vec![a, b]);
        assert_eq!(net.element(split).unwrap().next(), &[c]);
        assert!(net.element(a).unwrap().previous().is_empty());
        assert!(net.element(b).unwrap().previous().is_empty());
        assert_eq!(net.element(c).unwrap().previous(), &[split]);
        assert_eq!(net.element(split).unwrap().output_capacity(), 1);
    }

    #[test]
    fn growing_capacity_never_evicts() {
        let (mut net, split, branches) = splitter_with_three_branches();
        let evicted = net.set_output_capacity(split, 5).unwrap();
        assert!(evicted.is_empty());
        assert_eq!(net.element(split).unwrap().next(), &branches);
    }

    #[test]
    fn shrinking_input_capacity_evicts_oldest() {
        let mut net = Network::new();
        let collector = net.insert(Element::link("collector").with_ports(3, 1));
        let p1 = net.insert(Element::source("p1"));
        let p2 = net.insert(Element::source("p2"));
        net.connect(p1, collector);
        net.connect(p2, collector);

        let evicted = net.set_input_capacity(collector, 1).unwrap();

        assert_eq!(evicted, vec![p1]);
        assert_eq!(net.element(collector).unwrap().previous(), &[p2]);
        assert!(net.element(p1).unwrap().next().is_empty());
    }

    #[test]
    fn remove_frees_slot_and_reports_neighbours() {
        let mut net = Network::new();
        let a = net.insert(Element::source("a"));
        let b = net.insert(Element::link("b"));
        let c = net.insert(Element::sink("c"));
        net.connect(a, b);
        net.connect(b, c);

        let (element, neighbours) = net.remove(b).unwrap();

        assert_eq!(element.name(), "b");
        assert_eq!(neighbours, vec![a, c]);
        assert!(!net.contains(b));
        assert_eq!(net.len(), 2);
        assert!(net.element(b).is_err());
        // handles are not reused
        let d = net.insert(Element::link("d"));
        assert_ne!(d, b);
    }

    #[test]
    fn find_by_name() {
        let mut net = Network::new();
        let a = net.insert(Element::source("pump"));
        assert_eq!(net.find("pump"), Some(a));
        assert_eq!(net.find("engine"), None);
    }
}
