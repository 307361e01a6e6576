//! # Node arena
//!
//! Every terminal on the board lives in one [`NodeArena`] and is addressed by a
//! stable [`NodeId`]. An input node refers to the output node feeding it by id,
//! so feedback wiring is just a cycle of integers.
//!
//! ## Evaluation
//!
//! [`NodeArena::eval`] resolves a node lazily for the current tick. An output
//! node is recomputed at most once per tick: the memo stamp is written before
//! the node's inputs are visited, so re-entering a node that is still being
//! computed (a feedback loop) returns the value it held at the start of this
//! tick instead of recursing. This approximates simultaneous evaluation; it is
//! not a fixed-point solver.

use crate::signal::Signal;
use crate::types::{analog_to_nibble, nibble_to_analog, Nibble, Position};

/// Stable handle to a node. Ids are never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Two-input boolean functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOp {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl GateOp {
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            GateOp::And => a && b,
            GateOp::Or => a || b,
            GateOp::Nand => !(a && b),
            GateOp::Nor => !(a || b),
            GateOp::Xor => a != b,
            GateOp::Xnor => a == b,
        }
    }
}

/// Per-kind behaviour of a node. Children are the input nodes of the same
/// element, never output nodes directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Follows `child`, or reads Low when unconnected. `held` is a separately
    /// writable level used by push buttons mounted on an input.
    Input { child: Option<NodeId>, held: Signal },
    /// Output whose state is written by its element or an external source.
    Source,
    Not { input: NodeId },
    Gate { op: GateOp, a: NodeId, b: NodeId },
    /// High when the input is at or above `compare` volts.
    Comparator { input: NodeId, compare: f64 },
    /// One bit of the 4-bit conversion of an analog input.
    Binary { input: NodeId, bit: u8 },
    /// One bit of a value maintained by the owning element.
    Counted { bit: u8, value: Nibble },
    /// Inputs weighted 1, 2, 4, 8 in order.
    Dac { inputs: [NodeId; 4] },
    /// Switched side of a relay; passes the coil level through.
    Relay { coil: NodeId },
}

#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    position: Position,
    is_hv: bool,
    state: Signal,
    last_tick: u64,
    kind: NodeKind,
}

impl Node {
    pub fn input(name: &str, position: Position) -> Self {
        Node::new(
            name,
            position,
            NodeKind::Input {
                child: None,
                held: Signal::LOW,
            },
        )
    }

    pub fn output(name: &str, position: Position, kind: NodeKind) -> Self {
        Node::new(name, position, kind)
    }

    fn new(name: &str, position: Position, kind: NodeKind) -> Self {
        Node {
            name: name.to_string(),
            position,
            is_hv: false,
            state: Signal::LOW,
            last_tick: 0,
            kind,
        }
    }

    /// Marks the node as part of the mains side of the board.
    pub fn high_voltage(mut self) -> Self {
        self.is_hv = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_hv(&self) -> bool {
        self.is_hv
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, NodeKind::Input { .. })
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Last stored state, without evaluating.
    pub fn state(&self) -> Signal {
        self.state
    }

    pub fn child(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Input { child, .. } => child,
            _ => None,
        }
    }

    pub fn held(&self) -> Signal {
        match self.kind {
            NodeKind::Input { held, .. } => held,
            _ => Signal::LOW,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    slots: Vec<Option<Node>>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        self.slots.push(Some(node));
        NodeId(self.slots.len() - 1)
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|node| (NodeId(index), node)))
    }

    /// Raw stored state of a node; Low for unknown ids.
    pub fn state(&self, id: NodeId) -> Signal {
        self.get(id).map(|node| node.state).unwrap_or(Signal::LOW)
    }

    /// Overwrites the stored state. Sources and stateful elements drive their
    /// outputs this way; computed kinds overwrite it again on the next tick.
    pub fn set_state(&mut self, id: NodeId, value: Signal) {
        if let Some(node) = self.get_mut(id) {
            node.state = value;
        }
    }

    pub fn held(&self, id: NodeId) -> Signal {
        self.get(id).map(Node::held).unwrap_or(Signal::LOW)
    }

    pub fn set_held(&mut self, id: NodeId, value: Signal) {
        if let Some(node) = self.get_mut(id) {
            if let NodeKind::Input { held, .. } = &mut node.kind {
                *held = value;
            }
        }
    }

    pub fn child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::child)
    }

    pub(crate) fn set_child(&mut self, id: NodeId, source: Option<NodeId>) {
        if let Some(node) = self.get_mut(id) {
            if let NodeKind::Input { child, .. } = &mut node.kind {
                *child = source;
            }
        }
    }

    pub fn is_input(&self, id: NodeId) -> bool {
        self.get(id).map(Node::is_input).unwrap_or(false)
    }

    pub fn is_hv(&self, id: NodeId) -> bool {
        self.get(id).map(Node::is_hv).unwrap_or(false)
    }

    pub fn set_compare(&mut self, id: NodeId, volts: f64) {
        if let Some(node) = self.get_mut(id) {
            if let NodeKind::Comparator { compare, .. } = &mut node.kind {
                *compare = volts;
            }
        }
    }

    pub fn set_counted(&mut self, id: NodeId, counter: Nibble) {
        if let Some(node) = self.get_mut(id) {
            if let NodeKind::Counted { value, .. } = &mut node.kind {
                *value = counter;
            }
        }
    }

    pub(crate) fn translate(&mut self, id: NodeId, dx: f64, dy: f64) {
        if let Some(node) = self.get_mut(id) {
            node.position = node.position.offset(dx, dy);
        }
    }

    /// Evaluates `id` for `tick`, memoizing output nodes.
    pub fn eval(&mut self, id: NodeId, tick: u64) -> Signal {
        let (kind, state, last_tick) = match self.get(id) {
            Some(node) => (node.kind, node.state, node.last_tick),
            None => return Signal::LOW,
        };

        if let NodeKind::Input { child, .. } = kind {
            return match child {
                Some(source) => self.eval(source, tick),
                None => Signal::LOW,
            };
        }

        if last_tick == tick {
            return state;
        }

        // Stamp before descending so feedback paths stop here.
        if let Some(node) = self.get_mut(id) {
            node.last_tick = tick;
        }

        let next = self.eval_state(kind, state, tick);
        if let Some(node) = self.get_mut(id) {
            node.state = next;
        }
        next
    }

    fn eval_state(&mut self, kind: NodeKind, current: Signal, tick: u64) -> Signal {
        match kind {
            NodeKind::Input { .. } | NodeKind::Source => current,
            NodeKind::Not { input } => Signal::from_bool(!self.eval(input, tick).is_high()),
            NodeKind::Gate { op, a, b } => {
                let a = self.eval(a, tick).is_high();
                let b = self.eval(b, tick).is_high();
                Signal::from_bool(op.apply(a, b))
            }
            NodeKind::Comparator { input, compare } => {
                Signal::from_bool(self.eval(input, tick).volts() >= compare)
            }
            NodeKind::Binary { input, bit } => {
                Signal::from_bool(analog_to_nibble(self.eval(input, tick)).bit(bit))
            }
            NodeKind::Counted { bit, value } => Signal::from_bool(value.bit(bit)),
            NodeKind::Dac { inputs } => {
                let mut sum = 0u8;
                for (weight, input) in inputs.iter().enumerate() {
                    if self.eval(*input, tick).is_high() {
                        sum |= 1 << weight;
                    }
                }
                nibble_to_analog(Nibble::new(sum))
            }
            NodeKind::Relay { coil } => self.eval(coil, tick),
        }
    }
}
