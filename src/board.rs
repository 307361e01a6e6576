//! # Board
//!
//! The board owns every node, wire and element and advances them one tick at
//! a time. A tick:
//!
//! 1. advances the tick counter,
//! 2. calls `output()` on each element in insertion order,
//! 3. lets the room cool and refreshes light sensors,
//! 4. reads every output node once, as the display would,
//! 5. lets go of buttons that were clicked since the previous tick.
//!
//! Everything outside the tick (button presses, pulse timers, external
//! sensor feeds) only writes raw node state; the change is picked up by the
//! next tick.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::component::{
    Element, ElementId, ElementKind, ElementType, Params, TickContext, BOX_HEIGHT, BOX_WIDTH,
};
use crate::config::SimConfig;
use crate::connection::{WireDrop, WireId, WireSet};
use crate::error::{CircuitError, ConnectError};
use crate::node::{NodeArena, NodeId};
use crate::signal::Signal;
use crate::state::SimulationState;
use crate::types::Position;

#[derive(Debug, Clone)]
pub struct Board {
    nodes: NodeArena,
    wires: WireSet,
    elements: Vec<Element>,
    sim: SimulationState,
    next_element: u64,
    pending_release: Vec<ElementId>,
}

impl Default for Board {
    fn default() -> Self {
        Board::new(&SimConfig::default())
    }
}

impl Board {
    pub fn new(config: &SimConfig) -> Self {
        Board {
            nodes: NodeArena::new(),
            wires: WireSet::new(),
            elements: Vec::new(),
            sim: SimulationState::new(config),
            next_element: 0,
            pending_release: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    pub fn wires(&self) -> &WireSet {
        &self.wires
    }

    pub fn sim(&self) -> &SimulationState {
        &self.sim
    }

    /// Elements in board order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|element| element.id() == id)
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element, CircuitError> {
        self.elements
            .iter_mut()
            .find(|element| element.id() == id)
            .ok_or(CircuitError::NoSuchElement(id))
    }

    pub fn element_by_name(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.name() == name)
    }

    /// Node `node_name` of the element called `element_name`.
    pub fn find_node(&self, element_name: &str, node_name: &str) -> Option<NodeId> {
        let element = self.element_by_name(element_name)?;
        element
            .nodes()
            .iter()
            .copied()
            .find(|id| self.nodes.get(*id).map(|node| node.name()) == Some(node_name))
    }

    /// Element owning `node` and the node's index within it.
    pub fn owner_of(&self, node: NodeId) -> Option<(&Element, usize)> {
        self.elements.iter().find_map(|element| {
            element
                .nodes()
                .iter()
                .position(|id| *id == node)
                .map(|index| (element, index))
        })
    }

    pub fn current_tick(&self) -> u64 {
        self.sim.tick()
    }

    /// First free name of the form `<Type><n>`.
    fn unique_name(&self, element_type: ElementType) -> String {
        let prefix = element_type.as_str();
        (0..)
            .map(|n| format!("{}{}", prefix, n))
            .find(|candidate| self.element_by_name(candidate).is_none())
            .unwrap_or_else(|| prefix.to_string())
    }

    pub fn add_element(
        &mut self,
        element_type: ElementType,
        position: Position,
        params: &Params,
    ) -> Result<ElementId, CircuitError> {
        self.add_named(element_type, position, params, None)
    }

    /// Adds an element, keeping `name` when it is still free on this board.
    pub(crate) fn add_named(
        &mut self,
        element_type: ElementType,
        position: Position,
        params: &Params,
        name: Option<&str>,
    ) -> Result<ElementId, CircuitError> {
        let (kind, node_ids) = element_type.build(&mut self.nodes, position, params)?;
        for id in &node_ids {
            if !self.nodes.is_input(*id) {
                self.wires.attach_output(*id);
            }
        }

        let name = match name {
            Some(name) if self.element_by_name(name).is_none() => name.to_string(),
            _ => self.unique_name(element_type),
        };
        let id = ElementId(self.next_element);
        self.next_element += 1;

        debug!("Added {} at ({}, {})", name, position.x, position.y);
        self.elements
            .push(Element::new(id, name, element_type, position, node_ids, kind));
        if element_type == ElementType::LightSensor {
            self.refresh_light_sensors();
        }
        Ok(id)
    }

    /// Removes an element, severing every link to or from its nodes.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|element| element.id() == id)?;
        let element = self.elements.remove(index);
        for node in element.nodes() {
            self.wires.disconnect_node(&mut self.nodes, *node);
            self.nodes.remove(*node);
        }
        self.pending_release.retain(|pending| *pending != id);
        debug!("Removed {}", element.name());
        if element.kind().light().is_some() {
            self.refresh_light_sensors();
        }
        Some(element)
    }

    /// Runs one simulation step and returns the new tick number.
    pub fn tick(&mut self) -> u64 {
        let tick = self.sim.advance();

        {
            let mut ctx = TickContext::new(&mut self.nodes, &mut self.sim);
            for element in self.elements.iter_mut() {
                element.output(&mut ctx);
            }
        }

        let dt = self.sim.tick_period();
        self.sim.thermal.cool(dt);
        self.refresh_light_sensors();

        let outputs: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| !node.is_input())
            .map(|(id, _)| id)
            .collect();
        for id in outputs {
            self.nodes.eval(id, tick);
        }

        for id in std::mem::take(&mut self.pending_release) {
            if let Err(e) = self.release(id) {
                debug!("Release after click failed: {}", e);
            }
        }

        trace!("Tick {} done", tick);
        tick
    }

    /// Evaluates `node` for the current tick.
    pub fn eval(&mut self, node: NodeId) -> Signal {
        let tick = self.sim.tick();
        self.nodes.eval(node, tick)
    }

    /// Stored state of `node`, without evaluating.
    pub fn node_state(&self, node: NodeId) -> Signal {
        self.nodes.state(node)
    }

    fn refresh_light_sensors(&mut self) {
        let lights: Vec<Position> = self
            .elements
            .iter()
            .filter(|element| element.kind().light() == Some(true))
            .map(|element| element.position().offset(0.5 * BOX_WIDTH, 0.5 * BOX_HEIGHT))
            .collect();
        for element in &self.elements {
            if let ElementKind::LightSensor(sensor) = element.kind() {
                sensor.refresh(&mut self.nodes, &lights);
            }
        }
    }

    /// Presses the element's button and holds it.
    pub fn press(&mut self, id: ElementId) -> Result<(), CircuitError> {
        let element = self
            .elements
            .iter_mut()
            .find(|element| element.id() == id)
            .ok_or(CircuitError::NoSuchElement(id))?;
        let first_node = element.nodes().first().copied();
        let mut lights_changed = false;
        match &mut element.kind {
            ElementKind::Switch(button) => button.press(&mut self.nodes),
            ElementKind::ToggleSwitch(button) => button.press(&mut self.nodes),
            ElementKind::Counter(_) => {
                if let Some(reset) = first_node {
                    self.nodes.set_held(reset, Signal::HIGH);
                }
            }
            ElementKind::Flashlight(lamp) => {
                lamp.toggle();
                lights_changed = true;
            }
            _ => return Err(CircuitError::NotInteractive(element.name().to_string())),
        }
        if lights_changed {
            self.refresh_light_sensors();
        }
        trace!("Pressed {}", id);
        Ok(())
    }

    /// Lets go of a held button. Latching controls ignore it.
    pub fn release(&mut self, id: ElementId) -> Result<(), CircuitError> {
        let element = self
            .elements
            .iter()
            .find(|element| element.id() == id)
            .ok_or(CircuitError::NoSuchElement(id))?;
        match element.kind() {
            ElementKind::Switch(button) => button.release(&mut self.nodes),
            ElementKind::Counter(_) => {
                if let Some(reset) = element.nodes().first() {
                    self.nodes.set_held(*reset, Signal::LOW);
                }
            }
            ElementKind::ToggleSwitch(_) | ElementKind::Flashlight(_) => {}
            _ => return Err(CircuitError::NotInteractive(element.name().to_string())),
        }
        Ok(())
    }

    /// Presses a button for exactly one tick.
    pub fn click(&mut self, id: ElementId) -> Result<(), CircuitError> {
        self.press(id)?;
        if !self.pending_release.contains(&id) {
            self.pending_release.push(id);
        }
        Ok(())
    }

    /// Flips a latching element: toggle switch, flashlight or pulse output.
    pub fn toggle(&mut self, id: ElementId) -> Result<(), CircuitError> {
        let element = self
            .elements
            .iter_mut()
            .find(|element| element.id() == id)
            .ok_or(CircuitError::NoSuchElement(id))?;
        let mut lights_changed = false;
        match &mut element.kind {
            ElementKind::ToggleSwitch(button) => button.press(&mut self.nodes),
            ElementKind::Pulse(pulse) => pulse.toggle(&mut self.nodes),
            ElementKind::Flashlight(lamp) => {
                lamp.toggle();
                lights_changed = true;
            }
            _ => return Err(CircuitError::NotInteractive(element.name().to_string())),
        }
        if lights_changed {
            self.refresh_light_sensors();
        }
        Ok(())
    }

    /// Writes an externally measured voltage into an output node.
    pub fn write_source(&mut self, node: NodeId, volts: f64) {
        self.nodes.set_state(node, Signal::clamped(volts));
    }

    pub fn mark_degraded(&mut self, id: ElementId, degraded: bool) -> Result<(), CircuitError> {
        let element = self.element_mut(id)?;
        if degraded && !element.is_degraded() {
            warn!("{} lost its input source; reporting a constant signal", element.name());
        }
        element.set_degraded(degraded);
        Ok(())
    }

    pub fn set_parameter(&mut self, id: ElementId, key: &str, value: &str) -> Result<(), CircuitError> {
        let element = self.element_mut(id)?;
        element.kind.set_param(key, value)?;
        debug!("{}.{} = {}", element.name(), key, value);
        if element.element_type() == ElementType::LightSensor {
            self.refresh_light_sensors();
        }
        Ok(())
    }

    /// Shifts an element and its nodes. Wires follow their nodes.
    pub fn move_element(&mut self, id: ElementId, dx: f64, dy: f64) -> Result<(), CircuitError> {
        let element = self
            .elements
            .iter_mut()
            .find(|element| element.id() == id)
            .ok_or(CircuitError::NoSuchElement(id))?;
        element.set_position(element.position().offset(dx, dy));
        for node in element.nodes() {
            self.nodes.translate(*node, dx, dy);
        }
        self.refresh_light_sensors();
        Ok(())
    }

    /// Wires `output` to `input` using the output's free wire end.
    pub fn connect(&mut self, output: NodeId, input: NodeId) -> Result<(), ConnectError> {
        let wire = self
            .wires
            .free_end(output)
            .ok_or(ConnectError::NotAnOutput(output))?;
        self.wires.connect(&mut self.nodes, wire, input).map_err(|e| {
            warn!("Connection {:?} -> {:?} refused: {}", output, input, e);
            e
        })
    }

    /// Lets go of a dragged wire end over `target`, or over empty board.
    pub fn drop_wire(&mut self, wire: WireId, target: Option<NodeId>) -> WireDrop {
        self.wires.drop_wire(&mut self.nodes, wire, target)
    }

    /// Pulse generators and their half periods.
    pub fn pulse_generators(&self) -> Vec<(ElementId, Duration)> {
        self.elements
            .iter()
            .filter_map(|element| match element.kind() {
                ElementKind::Pulse(pulse) => Some((element.id(), pulse.half_period())),
                _ => None,
            })
            .collect()
    }

    /// Output node written by an external feed, for sound and webcam sensors.
    pub fn source_node(&self, id: ElementId) -> Option<NodeId> {
        match self.element(id)?.kind() {
            ElementKind::SoundSensor(sensor) | ElementKind::WebcamSensor(sensor) => {
                Some(sensor.output_node())
            }
            _ => None,
        }
    }
}
