use crate::component::{Behavior, TickContext, BOX_HEIGHT, BOX_WIDTH};
use crate::components::{input, output, EdgeDetector};
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::types::Position;

/// Toggle flip-flop clocked on the rising edge of its input.
#[derive(Debug, Clone)]
pub struct FlipFlop {
    input: NodeId,
    output: NodeId,
    clock: EdgeDetector,
}

impl FlipFlop {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let clk = input(nodes, origin, "input", 25.0, 0.5 * BOX_HEIGHT);
        let out = output(nodes, origin, "output", BOX_WIDTH - 25.0, 0.5 * BOX_HEIGHT, NodeKind::Source);
        (
            FlipFlop {
                input: clk,
                output: out,
                clock: EdgeDetector::new(),
            },
            vec![clk, out],
        )
    }
}

impl Behavior for FlipFlop {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        let clk = ctx.eval(self.input);
        if self.clock.rising(clk) {
            let next = ctx.state(self.output).invert();
            ctx.drive(self.output, next);
        }
    }
}
