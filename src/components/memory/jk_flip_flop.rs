use crate::component::{Behavior, TickContext, BOX_HEIGHT, BOX_WIDTH};
use crate::components::{input, output, EdgeDetector};
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::signal::Signal;
use crate::types::Position;

/// JK flip-flop. Acts only on ticks where `set` or `reset` changed level.
#[derive(Debug, Clone)]
pub struct JkFlipFlop {
    set: NodeId,
    reset: NodeId,
    output: NodeId,
    set_level: EdgeDetector,
    reset_level: EdgeDetector,
}

impl JkFlipFlop {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let set = input(nodes, origin, "set", 25.0, 25.0);
        let reset = input(nodes, origin, "reset", 25.0, BOX_HEIGHT - 25.0);
        let out = output(nodes, origin, "output", BOX_WIDTH - 25.0, 0.5 * BOX_HEIGHT, NodeKind::Source);
        let jk = JkFlipFlop {
            set,
            reset,
            output: out,
            set_level: EdgeDetector::new(),
            reset_level: EdgeDetector::new(),
        };
        (jk, vec![set, reset, out])
    }
}

impl Behavior for JkFlipFlop {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        let set_value = ctx.eval(self.set);
        let reset_value = ctx.eval(self.reset);
        let (set_before, set) = self.set_level.sample(set_value);
        let (reset_before, reset) = self.reset_level.sample(reset_value);
        if set_before == set && reset_before == reset {
            return;
        }

        let next = match (set, reset) {
            (true, true) => ctx.state(self.output).invert(),
            (true, false) => Signal::HIGH,
            (false, true) => Signal::LOW,
            (false, false) => return,
        };
        ctx.drive(self.output, next);
    }
}
