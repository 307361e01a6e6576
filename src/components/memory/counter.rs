use crate::component::{Behavior, TickContext, BOX_WIDTH};
use crate::components::{input, output, EdgeDetector};
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::types::{Nibble, Position};

/// 4-bit pulse counter with inhibit and reset.
///
/// Nodes are `[reset, inhibit, count, output8, output4, output2, output1]`.
/// The reset input doubles as a push button: holding it clears the counter
/// even when nothing is wired to it.
#[derive(Debug, Clone)]
pub struct Counter {
    reset: NodeId,
    inhibit: NodeId,
    count: NodeId,
    outputs: [NodeId; 4],
    value: Nibble,
    edge: EdgeDetector,
}

impl Counter {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let reset = input(nodes, origin, "reset", 25.0, 80.0);
        let inhibit = input(nodes, origin, "inhibit", 25.0, 50.0);
        let count = input(nodes, origin, "count", 25.0, 20.0);

        let mut outputs = [reset; 4];
        for (slot, (name, bit)) in [("output8", 3u8), ("output4", 2), ("output2", 1), ("output1", 0)]
            .into_iter()
            .enumerate()
        {
            let dx = 2.0 * BOX_WIDTH - 100.0 + 25.0 * slot as f64;
            outputs[slot] = output(
                nodes,
                origin,
                name,
                dx,
                20.0,
                NodeKind::Counted {
                    bit,
                    value: Nibble::default(),
                },
            );
        }

        let mut ids = vec![reset, inhibit, count];
        ids.extend_from_slice(&outputs);
        let counter = Counter {
            reset,
            inhibit,
            count,
            outputs,
            value: Nibble::default(),
            edge: EdgeDetector::new(),
        };
        (counter, ids)
    }

    pub fn value(&self) -> Nibble {
        self.value
    }
}

impl Behavior for Counter {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        let count = ctx.eval(self.count);
        let rising = self.edge.rising(count);
        let reset = ctx.is_high(self.reset) || ctx.nodes.held(self.reset).is_high();

        if reset {
            self.value.set(0);
        } else if rising && !ctx.is_high(self.inhibit) {
            self.value.inc();
        }

        for id in self.outputs {
            ctx.nodes.set_counted(id, self.value);
        }
    }
}
