//! 4-bit analog/digital converters.
//!
//! Both directions use the same scale, `n * 5/16` volts per code, so an ADC
//! fed by a DAC reads back the DAC's input pattern.

use crate::component::{Behavior, BOX_HEIGHT, BOX_WIDTH};
use crate::components::{input, output};
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::types::Position;

/// Bit weights in node order.
pub const ADC_BITS: [(&str, u8); 4] = [("output8", 3), ("output4", 2), ("output2", 1), ("output1", 0)];
pub const DAC_INPUTS: [&str; 4] = ["input1", "input2", "input4", "input8"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    AnalogToDigital,
    DigitalToAnalog,
}

/// ADC or DAC element. Conversion happens in the output nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Converter {
    direction: Direction,
}

impl Converter {
    /// Nodes `[input, output8, output4, output2, output1]`.
    pub fn adc(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let analog = input(nodes, origin, "input", 25.0, 0.5 * BOX_HEIGHT);
        let mut ids = vec![analog];
        for (slot, (name, bit)) in ADC_BITS.into_iter().enumerate() {
            let dy = 12.5 + 25.0 * slot as f64;
            ids.push(output(
                nodes,
                origin,
                name,
                BOX_WIDTH - 25.0,
                dy,
                NodeKind::Binary { input: analog, bit },
            ));
        }
        (
            Converter {
                direction: Direction::AnalogToDigital,
            },
            ids,
        )
    }

    /// Nodes `[input1, input2, input4, input8, output]`.
    pub fn dac(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let mut inputs = Vec::with_capacity(4);
        for (slot, name) in DAC_INPUTS.into_iter().enumerate() {
            // Weight 8 at the top, as printed on the board
            let dy = BOX_HEIGHT - 12.5 - 25.0 * slot as f64;
            inputs.push(input(nodes, origin, name, 25.0, dy));
        }
        let weighted = [inputs[0], inputs[1], inputs[2], inputs[3]];
        let out = output(
            nodes,
            origin,
            "output",
            BOX_WIDTH - 25.0,
            0.5 * BOX_HEIGHT,
            NodeKind::Dac { inputs: weighted },
        );
        inputs.push(out);
        (
            Converter {
                direction: Direction::DigitalToAnalog,
            },
            inputs,
        )
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Behavior for Converter {}
