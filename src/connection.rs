use std::collections::BTreeMap;

use tracing::debug;

use crate::error::ConnectError;
use crate::node::{NodeArena, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireId(usize);

/// A wire leaving an output node. A wire without a target is the output's
/// free end, the handle the user drags to make the next connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wire {
    pub source: NodeId,
    pub target: Option<NodeId>,
}

impl Wire {
    pub fn is_free(&self) -> bool {
        self.target.is_none()
    }
}

/// Result of letting go of a dragged wire end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireDrop {
    Connected,
    /// A previously connected wire was dropped away from any node.
    Removed,
    /// A free end was dropped on nothing valid and returns to its output.
    SnappedBack,
}

/// Manages the wires between output and input nodes
#[derive(Debug, Clone, Default)]
pub struct WireSet {
    wires: BTreeMap<WireId, Wire>,
    next_id: usize,
}

impl WireSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a free wire end to an output node.
    pub fn attach_output(&mut self, source: NodeId) -> WireId {
        let id = WireId(self.next_id);
        self.next_id += 1;
        self.wires.insert(id, Wire { source, target: None });
        id
    }

    pub fn get(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(&id)
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WireId, &Wire)> {
        self.wires.iter().map(|(id, wire)| (*id, wire))
    }

    pub fn wires_from(&self, source: NodeId) -> impl Iterator<Item = (WireId, &Wire)> {
        self.iter().filter(move |(_, wire)| wire.source == source)
    }

    pub fn free_end(&self, source: NodeId) -> Option<WireId> {
        self.wires_from(source)
            .find(|(_, wire)| wire.is_free())
            .map(|(id, _)| id)
    }

    /// Wire currently attached to `input`, if any.
    pub fn wire_to(&self, input: NodeId) -> Option<WireId> {
        self.iter()
            .find(|(_, wire)| wire.target == Some(input))
            .map(|(id, _)| id)
    }

    /// Input nodes driven by `source`.
    pub fn fan_out(&self, source: NodeId) -> Vec<NodeId> {
        self.wires_from(source)
            .filter_map(|(_, wire)| wire.target)
            .collect()
    }

    /// Every `(input, source)` pair, in wire creation order.
    pub fn links(&self) -> Vec<(NodeId, NodeId)> {
        self.wires
            .values()
            .filter_map(|wire| wire.target.map(|target| (target, wire.source)))
            .collect()
    }

    /// Checks that `source` may drive `input`.
    pub fn validate(
        nodes: &NodeArena,
        source: NodeId,
        input: NodeId,
    ) -> Result<(), ConnectError> {
        let source_node = nodes.get(source).ok_or(ConnectError::UnknownNode(source))?;
        let input_node = nodes.get(input).ok_or(ConnectError::UnknownNode(input))?;

        if source_node.is_input() {
            return Err(ConnectError::NotAnOutput(source));
        }
        if !input_node.is_input() {
            return Err(ConnectError::NotAnInput(input));
        }
        if input_node.child().is_some() {
            return Err(ConnectError::Occupied(input));
        }
        if source_node.is_hv() != input_node.is_hv() {
            return Err(ConnectError::VoltageMismatch);
        }
        Ok(())
    }

    /// Attaches a free wire end to `input` and grows a new free end on the
    /// wire's output so it can fan out further.
    pub fn connect(
        &mut self,
        nodes: &mut NodeArena,
        wire: WireId,
        input: NodeId,
    ) -> Result<(), ConnectError> {
        let current = *self.wires.get(&wire).ok_or(ConnectError::UnknownWire)?;
        if let Some(target) = current.target {
            return Err(ConnectError::WireInUse(target));
        }
        Self::validate(nodes, current.source, input)?;

        nodes.set_child(input, Some(current.source));
        if let Some(entry) = self.wires.get_mut(&wire) {
            entry.target = Some(input);
        }
        self.attach_output(current.source);

        debug!("Connected {:?} -> {:?}", current.source, input);
        Ok(())
    }

    /// Releases a dragged wire end over `target` (or over nothing).
    ///
    /// A connected wire first lets go of its old input. If the new target is
    /// accepted the wire attaches there; otherwise a formerly connected wire is
    /// deleted and a free end snaps back to its output.
    pub fn drop_wire(
        &mut self,
        nodes: &mut NodeArena,
        wire: WireId,
        target: Option<NodeId>,
    ) -> WireDrop {
        let current = match self.wires.get(&wire) {
            Some(current) => *current,
            None => return WireDrop::SnappedBack,
        };

        if let Some(previous) = current.target {
            nodes.set_child(previous, None);
            if let Some(entry) = self.wires.get_mut(&wire) {
                entry.target = None;
            }
        }

        if let Some(input) = target {
            match Self::validate(nodes, current.source, input) {
                Ok(()) => {
                    nodes.set_child(input, Some(current.source));
                    if let Some(entry) = self.wires.get_mut(&wire) {
                        entry.target = Some(input);
                    }
                    if current.is_free() {
                        self.attach_output(current.source);
                    }
                    debug!("Wire dropped on {:?}", input);
                    return WireDrop::Connected;
                }
                Err(e) => debug!("Wire drop on {:?} refused: {}", input, e),
            }
        }

        if current.is_free() {
            WireDrop::SnappedBack
        } else {
            self.wires.remove(&wire);
            WireDrop::Removed
        }
    }

    /// Severs every link involving `node`, as input or as output, and drops
    /// the wires rooted at it.
    pub fn disconnect_node(&mut self, nodes: &mut NodeArena, node: NodeId) {
        if nodes.is_input(node) {
            if let Some(wire) = self.wire_to(node) {
                self.wires.remove(&wire);
            }
            nodes.set_child(node, None);
            return;
        }

        let rooted: Vec<WireId> = self.wires_from(node).map(|(id, _)| id).collect();
        for id in rooted {
            if let Some(wire) = self.wires.remove(&id) {
                if let Some(target) = wire.target {
                    nodes.set_child(target, None);
                }
            }
        }
    }
}
