use tracing::debug;

use crate::component::{Behavior, TickContext, BOX_HEIGHT};
use crate::components::hv_input;
use crate::components::power::relay::relay_coil;
use crate::node::{NodeArena, NodeId};
use crate::types::Position;

/// The two mains terminals of a load.
#[derive(Debug, Clone, Copy)]
struct MainsInputs {
    input1: NodeId,
    input2: NodeId,
}

impl MainsInputs {
    fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let input1 = hv_input(nodes, origin, "input1", 25.0, 25.0);
        let input2 = hv_input(nodes, origin, "input2", 25.0, BOX_HEIGHT - 25.0);
        (MainsInputs { input1, input2 }, vec![input1, input2])
    }

    /// Powered when both terminals hang on the contacts of one relay and
    /// that relay is switched on.
    fn powered(&self, ctx: &mut TickContext<'_>) -> bool {
        let first = relay_coil(ctx.nodes, self.input1);
        let second = relay_coil(ctx.nodes, self.input2);
        first.is_some() && first == second && ctx.is_high(self.input2)
    }
}

#[derive(Debug, Clone)]
pub struct Lightbulb {
    mains: MainsInputs,
    lit: bool,
}

impl Lightbulb {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let (mains, ids) = MainsInputs::build(nodes, origin);
        (Lightbulb { mains, lit: false }, ids)
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl Behavior for Lightbulb {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        let lit = self.mains.powered(ctx);
        if lit != self.lit {
            debug!("Lightbulb {}", if lit { "on" } else { "off" });
        }
        self.lit = lit;
    }
}

/// Heats the shared room model while powered.
#[derive(Debug, Clone)]
pub struct Heater {
    mains: MainsInputs,
    on: bool,
}

impl Heater {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let (mains, ids) = MainsInputs::build(nodes, origin);
        (Heater { mains, on: false }, ids)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl Behavior for Heater {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        self.on = self.mains.powered(ctx);
        if self.on {
            let dt = ctx.sim.tick_period();
            ctx.sim.thermal.heat(dt);
        }
    }
}
