use crate::component::{Behavior, TickContext, BOX_HEIGHT_SMALL, BOX_WIDTH};
use crate::components::output;
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::signal::Signal;
use crate::types::Position;

/// Temperature read as 0 V.
pub const ZERO_POINT: f64 = 15.0;
/// Volts per °C.
pub const SENSITIVITY: f64 = 0.2;

/// Reads the lagged room temperature as a voltage.
#[derive(Debug, Clone)]
pub struct TemperatureSensor {
    output: NodeId,
}

impl TemperatureSensor {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let out = output(
            nodes,
            origin,
            "output",
            BOX_WIDTH - 25.0,
            0.5 * BOX_HEIGHT_SMALL,
            NodeKind::Source,
        );
        (TemperatureSensor { output: out }, vec![out])
    }

    pub fn voltage(celsius: f64) -> Signal {
        Signal::clamped((celsius - ZERO_POINT) * SENSITIVITY)
    }
}

impl Behavior for TemperatureSensor {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        let reading = Self::voltage(ctx.sim.thermal.lagged());
        ctx.drive(self.output, reading);
    }
}
