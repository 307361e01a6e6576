use crate::component::{Behavior, BOX_HEIGHT_SMALL, BOX_WIDTH};
use crate::components::output;
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::types::Position;

/// Sound or webcam sensor. An attached feed writes its output directly,
/// outside the tick; the element itself does nothing per tick.
#[derive(Debug, Clone)]
pub struct ExternalSensor {
    output: NodeId,
}

impl ExternalSensor {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let out = output(
            nodes,
            origin,
            "output",
            BOX_WIDTH - 25.0,
            0.5 * BOX_HEIGHT_SMALL,
            NodeKind::Source,
        );
        (ExternalSensor { output: out }, vec![out])
    }

    pub fn output_node(&self) -> NodeId {
        self.output
    }
}

impl Behavior for ExternalSensor {}
