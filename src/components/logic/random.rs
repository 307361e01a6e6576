use crate::component::{Behavior, TickContext, BOX_HEIGHT, BOX_WIDTH};
use crate::components::{input, output, EdgeDetector};
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::signal::Signal;
use crate::types::Position;

/// Picks a new random level on every rising edge of its input.
#[derive(Debug, Clone)]
pub struct RandomElement {
    input: NodeId,
    output: NodeId,
    edge: EdgeDetector,
}

impl RandomElement {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let a = input(nodes, origin, "input", 25.0, 0.5 * BOX_HEIGHT);
        let out = output(nodes, origin, "output", BOX_WIDTH - 25.0, 0.5 * BOX_HEIGHT, NodeKind::Source);
        let random = RandomElement {
            input: a,
            output: out,
            edge: EdgeDetector::new(),
        };
        (random, vec![a, out])
    }
}

impl Behavior for RandomElement {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        let value = ctx.eval(self.input);
        if self.edge.rising(value) {
            let level = Signal::from_bool(ctx.sim.coin_flip());
            ctx.drive(self.output, level);
        }
    }
}
