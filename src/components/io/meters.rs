use crate::component::{Behavior, TickContext};
use crate::components::input;
use crate::node::{NodeArena, NodeId};
use crate::types::Position;

/// Smallest change that moves the needle of the analog meter.
pub const ANALOG_DEAD_BAND: f64 = 0.1;
/// Smallest change that updates the digital display.
pub const DIGITAL_DEAD_BAND: f64 = 0.05;

/// Voltmeter reading its single input.
#[derive(Debug, Clone)]
pub struct Meter {
    input: NodeId,
    reading: f64,
    dead_band: f64,
}

impl Meter {
    pub fn analog(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        Self::build(nodes, origin, ANALOG_DEAD_BAND)
    }

    pub fn digital(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        Self::build(nodes, origin, DIGITAL_DEAD_BAND)
    }

    fn build(nodes: &mut NodeArena, origin: Position, dead_band: f64) -> (Self, Vec<NodeId>) {
        let probe = input(nodes, origin, "input", 35.0, 35.0);
        let meter = Meter {
            input: probe,
            reading: 0.0,
            dead_band,
        };
        (meter, vec![probe])
    }

    /// Displayed value in volts.
    pub fn reading(&self) -> f64 {
        self.reading
    }
}

impl Behavior for Meter {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        let volts = ctx.eval(self.input).volts();
        if (volts - self.reading).abs() >= self.dead_band {
            self.reading = volts;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeKind};
    use crate::signal::Signal;
    use crate::state::SimulationState;

    #[test]
    fn test_dead_band() {
        let mut nodes = NodeArena::new();
        let mut sim = SimulationState::default();
        let (mut meter, ids) = Meter::analog(&mut nodes, Position::default());
        let src = nodes.insert(Node::output("output", Position::default(), NodeKind::Source));
        nodes.set_child(ids[0], Some(src));

        let mut read = |volts: f64, nodes: &mut NodeArena| {
            nodes.set_state(src, Signal::new(volts));
            sim.advance();
            meter.output(&mut TickContext::new(nodes, &mut sim));
            meter.reading()
        };

        assert_eq!(read(2.0, &mut nodes), 2.0);
        assert_eq!(read(2.05, &mut nodes), 2.0);
        assert_eq!(read(2.5, &mut nodes), 2.5);
    }
}
