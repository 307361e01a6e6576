use std::time::Duration;

use crate::component::{param_f64, parse_f64, unknown_param, Behavior, Params, BOX_HEIGHT_SMALL, BOX_WIDTH};
use crate::components::output;
use crate::error::CircuitError;
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::types::Position;

pub const MIN_FREQUENCY: f64 = 0.1;
pub const MAX_FREQUENCY: f64 = 10.0;
pub const DEFAULT_FREQUENCY: f64 = 1.0;

/// Square-wave source with a user-set frequency.
///
/// The generator runs on its own timer rather than on board ticks: the runtime
/// calls [`PulseGenerator::toggle`] every half period, and the new level is
/// seen by the next tick.
#[derive(Debug, Clone)]
pub struct PulseGenerator {
    output: NodeId,
    frequency: f64, // Hz
}

impl PulseGenerator {
    pub fn build(
        nodes: &mut NodeArena,
        origin: Position,
        params: &Params,
    ) -> Result<(Self, Vec<NodeId>), CircuitError> {
        let frequency = param_f64(params, "inputValue", DEFAULT_FREQUENCY, MIN_FREQUENCY, MAX_FREQUENCY)?;
        let out = output(
            nodes,
            origin,
            "output",
            BOX_WIDTH - 25.0,
            0.5 * BOX_HEIGHT_SMALL,
            NodeKind::Source,
        );
        Ok((PulseGenerator { output: out, frequency }, vec![out]))
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Time between two edges.
    pub fn half_period(&self) -> Duration {
        Duration::from_secs_f64(0.5 / self.frequency)
    }

    /// Flips the output level.
    pub fn toggle(&self, nodes: &mut NodeArena) {
        let next = nodes.state(self.output).invert();
        nodes.set_state(self.output, next);
    }
}

impl Behavior for PulseGenerator {
    fn params(&self) -> Params {
        let mut params = Params::new();
        params.insert("inputValue".to_string(), self.frequency.to_string());
        params
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<(), CircuitError> {
        if key != "inputValue" {
            return Err(unknown_param(key));
        }
        self.frequency = parse_f64(key, value, MIN_FREQUENCY, MAX_FREQUENCY)?;
        Ok(())
    }
}
