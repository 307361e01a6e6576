use crate::component::{Behavior, BOX_HEIGHT, BOX_WIDTH};
use crate::components::{input, output};
use crate::node::{GateOp, NodeArena, NodeId, NodeKind};
use crate::types::Position;

/// One of the seven gate elements. The boolean function lives in the output
/// node, so the element itself has nothing to do per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicGate {
    /// `None` for the inverter.
    op: Option<GateOp>,
}

impl LogicGate {
    /// Two-input gate with nodes `[input1, input2, output]`.
    pub fn binary(nodes: &mut NodeArena, origin: Position, op: GateOp) -> (Self, Vec<NodeId>) {
        let a = input(nodes, origin, "input1", 25.0, 25.0);
        let b = input(nodes, origin, "input2", 25.0, BOX_HEIGHT - 25.0);
        let out = output(
            nodes,
            origin,
            "output",
            BOX_WIDTH - 25.0,
            0.5 * BOX_HEIGHT,
            NodeKind::Gate { op, a, b },
        );
        (LogicGate { op: Some(op) }, vec![a, b, out])
    }

    /// Inverter with nodes `[input, output]`.
    pub fn inverter(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let a = input(nodes, origin, "input", 25.0, 0.5 * BOX_HEIGHT);
        let out = output(
            nodes,
            origin,
            "output",
            BOX_WIDTH - 25.0,
            0.5 * BOX_HEIGHT,
            NodeKind::Not { input: a },
        );
        (LogicGate { op: None }, vec![a, out])
    }

    pub fn op(&self) -> Option<GateOp> {
        self.op
    }
}

impl Behavior for LogicGate {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::signal::Signal;

    fn drive(nodes: &mut NodeArena, target: NodeId, volts: f64) {
        let src = nodes.insert(Node::output("output", Position::default(), NodeKind::Source));
        nodes.set_state(src, Signal::new(volts));
        nodes.set_child(target, Some(src));
    }

    #[test]
    fn test_xor_gate_element() {
        let mut nodes = NodeArena::new();
        let (gate, ids) = LogicGate::binary(&mut nodes, Position::default(), GateOp::Xor);
        assert_eq!(gate.op(), Some(GateOp::Xor));
        drive(&mut nodes, ids[0], 5.0);
        assert_eq!(nodes.eval(ids[2], 1), Signal::HIGH);
        drive(&mut nodes, ids[1], 5.0);
        assert_eq!(nodes.eval(ids[2], 2), Signal::LOW);
    }

    #[test]
    fn test_inverter_with_floating_input() {
        let mut nodes = NodeArena::new();
        let (_, ids) = LogicGate::inverter(&mut nodes, Position::default());
        assert_eq!(ids.len(), 2);
        assert_eq!(nodes.eval(ids[1], 1), Signal::HIGH);
    }
}
