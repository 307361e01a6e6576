use crate::component::{param_f64, parse_f64, unknown_param, Behavior, Params, TickContext};
use crate::component::{BOX_HEIGHT_SMALL, BOX_WIDTH};
use crate::components::output;
use crate::error::CircuitError;
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::signal::Signal;
use crate::types::Position;

/// Adjustable 0-5 V supply.
#[derive(Debug, Clone)]
pub struct VariableVoltage {
    output: NodeId,
    volts: f64,
}

impl VariableVoltage {
    pub fn build(
        nodes: &mut NodeArena,
        origin: Position,
        params: &Params,
    ) -> Result<(Self, Vec<NodeId>), CircuitError> {
        let volts = param_f64(params, "inputValue", 0.0, 0.0, 5.0)?;
        let out = output(
            nodes,
            origin,
            "output",
            BOX_WIDTH - 25.0,
            0.5 * BOX_HEIGHT_SMALL,
            NodeKind::Source,
        );
        nodes.set_state(out, Signal::clamped(volts));
        Ok((VariableVoltage { output: out, volts }, vec![out]))
    }

    pub fn volts(&self) -> f64 {
        self.volts
    }
}

impl Behavior for VariableVoltage {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        ctx.drive(self.output, Signal::clamped(self.volts));
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.insert("inputValue".to_string(), self.volts.to_string());
        params
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<(), CircuitError> {
        if key != "inputValue" {
            return Err(unknown_param(key));
        }
        self.volts = parse_f64(key, value, 0.0, 5.0)?;
        Ok(())
    }
}
