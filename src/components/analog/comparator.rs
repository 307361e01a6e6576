use crate::component::{param_f64, parse_f64, unknown_param, Behavior, Params, TickContext};
use crate::component::{BOX_HEIGHT, BOX_WIDTH};
use crate::components::{input, output};
use crate::error::CircuitError;
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::types::Position;

pub const DEFAULT_REFERENCE: f64 = 2.5;

/// Compares an analog input with a user-set reference voltage.
#[derive(Debug, Clone)]
pub struct Comparator {
    output: NodeId,
    reference: f64,
}

impl Comparator {
    pub fn build(
        nodes: &mut NodeArena,
        origin: Position,
        params: &Params,
    ) -> Result<(Self, Vec<NodeId>), CircuitError> {
        let reference = param_f64(params, "inputValue", DEFAULT_REFERENCE, 0.0, 5.0)?;
        let analog = input(nodes, origin, "input", 25.0, 0.5 * BOX_HEIGHT);
        let out = output(
            nodes,
            origin,
            "output",
            BOX_WIDTH - 25.0,
            0.5 * BOX_HEIGHT,
            NodeKind::Comparator {
                input: analog,
                compare: reference,
            },
        );
        Ok((Comparator { output: out, reference }, vec![analog, out]))
    }

    pub fn reference(&self) -> f64 {
        self.reference
    }
}

impl Behavior for Comparator {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        ctx.nodes.set_compare(self.output, self.reference);
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.insert("inputValue".to_string(), self.reference.to_string());
        params
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<(), CircuitError> {
        if key != "inputValue" {
            return Err(unknown_param(key));
        }
        self.reference = parse_f64(key, value, 0.0, 5.0)?;
        Ok(())
    }
}
