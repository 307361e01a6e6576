//! Light sources and the light-dependent resistor that sees them.

use crate::component::{param_f64, parse_f64, unknown_param, Behavior, Params};
use crate::component::{BOX_HEIGHT_SMALL, BOX_WIDTH};
use crate::components::output;
use crate::error::CircuitError;
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::signal::{Signal, HIGH_VOLTS};
use crate::types::Position;

/// Squared distance at which a single light gives half scale.
pub const HALF_SCALE_DISTANCE_SQUARED: f64 = 20_000.0;

/// Hand-held lamp switched by clicking on it.
#[derive(Debug, Clone, Default)]
pub struct Flashlight {
    lit: bool,
}

impl Flashlight {
    pub fn build() -> (Self, Vec<NodeId>) {
        (Flashlight::default(), Vec::new())
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn toggle(&mut self) {
        self.lit = !self.lit;
    }
}

impl Behavior for Flashlight {}

/// Sensor whose output voltage rises as lit lamps come closer to its LDR.
///
/// The LDR sits on the board independently of the sensor box; its position
/// is stored in absolute coordinates as `xLDR`/`yLDR`.
#[derive(Debug, Clone)]
pub struct LightSensor {
    output: NodeId,
    ldr: Position,
}

impl LightSensor {
    pub fn build(
        nodes: &mut NodeArena,
        origin: Position,
        params: &Params,
    ) -> Result<(Self, Vec<NodeId>), CircuitError> {
        let ldr = Position::new(
            param_f64(params, "xLDR", origin.x + 25.0, f64::MIN, f64::MAX)?,
            param_f64(params, "yLDR", origin.y + 25.0, f64::MIN, f64::MAX)?,
        );
        let out = output(
            nodes,
            origin,
            "output",
            BOX_WIDTH - 25.0,
            0.5 * BOX_HEIGHT_SMALL,
            NodeKind::Source,
        );
        Ok((LightSensor { output: out, ldr }, vec![out]))
    }

    pub fn ldr(&self) -> Position {
        self.ldr
    }

    /// Voltage seen with lamps lit at `lights`.
    pub fn exposure(&self, lights: &[Position]) -> Signal {
        let volts: f64 = lights
            .iter()
            .map(|light| HIGH_VOLTS / (1.0 + self.ldr.distance_squared(light) / HALF_SCALE_DISTANCE_SQUARED))
            .sum();
        Signal::clamped(volts)
    }

    pub fn refresh(&self, nodes: &mut NodeArena, lights: &[Position]) {
        nodes.set_state(self.output, self.exposure(lights));
    }
}

impl Behavior for LightSensor {
    fn params(&self) -> Params {
        let mut params = Params::new();
        params.insert("xLDR".to_string(), self.ldr.x.to_string());
        params.insert("yLDR".to_string(), self.ldr.y.to_string());
        params
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<(), CircuitError> {
        match key {
            "xLDR" => self.ldr.x = parse_f64(key, value, f64::MIN, f64::MAX)?,
            "yLDR" => self.ldr.y = parse_f64(key, value, f64::MIN, f64::MAX)?,
            _ => return Err(unknown_param(key)),
        }
        Ok(())
    }
}
