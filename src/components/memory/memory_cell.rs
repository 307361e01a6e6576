use crate::component::{Behavior, TickContext, BOX_HEIGHT, BOX_WIDTH};
use crate::components::{input, output};
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::signal::Signal;
use crate::types::Position;

/// Set/reset latch. Set wins when both inputs are High.
#[derive(Debug, Clone)]
pub struct MemoryCell {
    set: NodeId,
    reset: NodeId,
    output: NodeId,
}

impl MemoryCell {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let set = input(nodes, origin, "set", 25.0, 25.0);
        let reset = input(nodes, origin, "reset", 25.0, BOX_HEIGHT - 25.0);
        let out = output(nodes, origin, "output", BOX_WIDTH - 25.0, 0.5 * BOX_HEIGHT, NodeKind::Source);
        (
            MemoryCell {
                set,
                reset,
                output: out,
            },
            vec![set, reset, out],
        )
    }
}

impl Behavior for MemoryCell {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        if ctx.is_high(self.reset) {
            ctx.drive(self.output, Signal::LOW);
        }
        if ctx.is_high(self.set) {
            ctx.drive(self.output, Signal::HIGH);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::state::SimulationState;

    fn step(cell: &mut MemoryCell, nodes: &mut NodeArena, sim: &mut SimulationState) -> Signal {
        sim.advance();
        cell.output(&mut TickContext::new(nodes, sim));
        nodes.state(cell.output)
    }

    #[test]
    fn test_latch_table() {
        let mut nodes = NodeArena::new();
        let mut sim = SimulationState::default();
        let (mut cell, ids) = MemoryCell::build(&mut nodes, Position::default());
        let set = nodes.insert(Node::output("output", Position::default(), NodeKind::Source));
        let reset = nodes.insert(Node::output("output", Position::default(), NodeKind::Source));
        nodes.set_child(ids[0], Some(set));
        nodes.set_child(ids[1], Some(reset));

        let mut apply = |s: bool, r: bool, nodes: &mut NodeArena, sim: &mut SimulationState| {
            nodes.set_state(set, Signal::from_bool(s));
            nodes.set_state(reset, Signal::from_bool(r));
            step(&mut cell, nodes, sim)
        };

        assert_eq!(apply(true, false, &mut nodes, &mut sim), Signal::HIGH);
        assert_eq!(apply(false, false, &mut nodes, &mut sim), Signal::HIGH);
        assert_eq!(apply(false, true, &mut nodes, &mut sim), Signal::LOW);
        assert_eq!(apply(false, false, &mut nodes, &mut sim), Signal::LOW);
        assert_eq!(apply(true, true, &mut nodes, &mut sim), Signal::HIGH);
    }
}
