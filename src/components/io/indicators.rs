use tracing::trace;

use crate::component::{Behavior, TickContext, BOX_HEIGHT_SMALL};
use crate::components::{input, EdgeDetector};
use crate::node::{NodeArena, NodeId};
use crate::types::Position;

/// LED or buzzer: on while its input reads High.
#[derive(Debug, Clone)]
pub struct Indicator {
    input: NodeId,
    level: EdgeDetector,
}

impl Indicator {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let a = input(nodes, origin, "input", 25.0, 0.5 * BOX_HEIGHT_SMALL);
        (
            Indicator {
                input: a,
                level: EdgeDetector::new(),
            },
            vec![a],
        )
    }

    pub fn is_on(&self) -> bool {
        self.level.is_high()
    }
}

impl Behavior for Indicator {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        let value = ctx.eval(self.input);
        let (was_on, on) = self.level.sample(value);
        if was_on != on {
            trace!("Indicator on {:?} switched {}", self.input, if on { "on" } else { "off" });
        }
    }
}
