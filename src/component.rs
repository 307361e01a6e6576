//! # Elements
//!
//! An element is one component placed on the board. It owns a fixed list of
//! nodes and, for stateful kinds, private state updated once per tick through
//! [`Behavior::output`]. Dispatch over kinds is a single match on
//! [`ElementKind`]; the kind table is [`ElementType`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::components::analog::{Comparator, Converter, VariableVoltage};
use crate::components::clock::PulseGenerator;
use crate::components::io::{Indicator, Meter, PushButton, TextLabel, ToggleButton};
use crate::components::logic::{LogicGate, RandomElement};
use crate::components::memory::{Counter, FlipFlop, JkFlipFlop, MemoryCell};
use crate::components::power::{Heater, Lightbulb, Relay};
use crate::components::sensor::{ExternalSensor, Flashlight, LightSensor, TemperatureSensor};
use crate::error::CircuitError;
use crate::node::{GateOp, NodeArena, NodeId};
use crate::signal::Signal;
use crate::state::SimulationState;
use crate::types::Position;

// Element footprints on the board, in canvas units.
pub const BOX_WIDTH: f64 = 150.0;
pub const BOX_HEIGHT: f64 = 100.0;
pub const BOX_HEIGHT_SMALL: f64 = 50.0;

/// Kind-specific settings, stored as strings in the circuit file.
pub type Params = BTreeMap<String, String>;

/// Reads a numeric parameter, falling back to `default` when absent and
/// clamping to the range of the board's input widget.
pub fn param_f64(
    params: &Params,
    key: &str,
    default: f64,
    min: f64,
    max: f64,
) -> Result<f64, CircuitError> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => parse_f64(key, raw, min, max),
    }
}

pub fn parse_f64(key: &str, raw: &str, min: f64, max: f64) -> Result<f64, CircuitError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CircuitError::InvalidParameter {
            key: key.to_string(),
            reason: format!("'{}' is not a number", raw),
        })?;
    if !value.is_finite() {
        return Err(CircuitError::InvalidParameter {
            key: key.to_string(),
            reason: format!("'{}' is not finite", raw),
        });
    }
    Ok(value.clamp(min, max))
}

pub(crate) fn unknown_param(key: &str) -> CircuitError {
    CircuitError::InvalidParameter {
        key: key.to_string(),
        reason: "not a parameter of this element".to_string(),
    }
}

/// Everything an element may touch during its tick hook.
pub struct TickContext<'a> {
    pub nodes: &'a mut NodeArena,
    pub sim: &'a mut SimulationState,
}

impl<'a> TickContext<'a> {
    pub fn new(nodes: &'a mut NodeArena, sim: &'a mut SimulationState) -> Self {
        TickContext { nodes, sim }
    }

    pub fn eval(&mut self, id: NodeId) -> Signal {
        let tick = self.sim.tick();
        self.nodes.eval(id, tick)
    }

    pub fn is_high(&mut self, id: NodeId) -> bool {
        self.eval(id).is_high()
    }

    /// Writes an output node's stored state.
    pub fn drive(&mut self, id: NodeId, value: Signal) {
        self.nodes.set_state(id, value);
    }

    pub fn state(&self, id: NodeId) -> Signal {
        self.nodes.state(id)
    }
}

/// Per-kind element behaviour.
pub trait Behavior {
    /// Called once per tick, in board order.
    fn output(&mut self, _ctx: &mut TickContext<'_>) {}

    /// Settings persisted with the element.
    fn params(&self) -> Params {
        Params::new()
    }

    /// Changes a setting at runtime (the board's input widgets).
    fn set_param(&mut self, key: &str, _value: &str) -> Result<(), CircuitError> {
        Err(unknown_param(key))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub(crate) u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind table. The names are the tags used in circuit files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Xnor,
    Memory,
    FlipFlop,
    JkFlipFlop,
    Random,
    Led,
    Buzzer,
    Switch,
    ToggleSwitch,
    Pulse,
    VarVoltage,
    Comparator,
    Adc,
    Dac,
    Counter,
    Relay,
    Lightbulb,
    Flashlight,
    LightSensor,
    Heater,
    TemperatureSensor,
    SoundSensor,
    WebcamSensor,
    Voltmeter,
    DigitalVoltmeter,
    Text,
}

impl ElementType {
    pub const ALL: [ElementType; 32] = [
        ElementType::And,
        ElementType::Or,
        ElementType::Not,
        ElementType::Nand,
        ElementType::Nor,
        ElementType::Xor,
        ElementType::Xnor,
        ElementType::Memory,
        ElementType::FlipFlop,
        ElementType::JkFlipFlop,
        ElementType::Random,
        ElementType::Led,
        ElementType::Buzzer,
        ElementType::Switch,
        ElementType::ToggleSwitch,
        ElementType::Pulse,
        ElementType::VarVoltage,
        ElementType::Comparator,
        ElementType::Adc,
        ElementType::Dac,
        ElementType::Counter,
        ElementType::Relay,
        ElementType::Lightbulb,
        ElementType::Flashlight,
        ElementType::LightSensor,
        ElementType::Heater,
        ElementType::TemperatureSensor,
        ElementType::SoundSensor,
        ElementType::WebcamSensor,
        ElementType::Voltmeter,
        ElementType::DigitalVoltmeter,
        ElementType::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::And => "ANDPort",
            ElementType::Or => "ORPort",
            ElementType::Not => "NOTPort",
            ElementType::Nand => "NANDPort",
            ElementType::Nor => "NORPort",
            ElementType::Xor => "XORPort",
            ElementType::Xnor => "XNORPort",
            ElementType::Memory => "Memory",
            ElementType::FlipFlop => "FlipFlop",
            ElementType::JkFlipFlop => "JKFlipFlop",
            ElementType::Random => "Random",
            ElementType::Led => "LED",
            ElementType::Buzzer => "Buzzer",
            ElementType::Switch => "Switch",
            ElementType::ToggleSwitch => "ToggleSwitch",
            ElementType::Pulse => "Pulse",
            ElementType::VarVoltage => "VarVoltage",
            ElementType::Comparator => "Comparator",
            ElementType::Adc => "ADC",
            ElementType::Dac => "DAC",
            ElementType::Counter => "Counter",
            ElementType::Relay => "Relais",
            ElementType::Lightbulb => "Lightbulb",
            ElementType::Flashlight => "Flashlight",
            ElementType::LightSensor => "LightSensor",
            ElementType::Heater => "Heater",
            ElementType::TemperatureSensor => "TemperatureSensor",
            ElementType::SoundSensor => "SoundSensor",
            ElementType::WebcamSensor => "WebcamSensor",
            ElementType::Voltmeter => "Voltmeter",
            ElementType::DigitalVoltmeter => "DigitalVoltmeter",
            ElementType::Text => "TextElement",
        }
    }

    /// Instantiates the element's nodes in `nodes` and its initial state.
    /// Node order is part of the file format (legacy links use indices).
    pub fn build(
        self,
        nodes: &mut NodeArena,
        origin: Position,
        params: &Params,
    ) -> Result<(ElementKind, Vec<NodeId>), CircuitError> {
        let built = match self {
            ElementType::And => wrap(LogicGate::binary(nodes, origin, GateOp::And), ElementKind::Gate),
            ElementType::Or => wrap(LogicGate::binary(nodes, origin, GateOp::Or), ElementKind::Gate),
            ElementType::Nand => wrap(LogicGate::binary(nodes, origin, GateOp::Nand), ElementKind::Gate),
            ElementType::Nor => wrap(LogicGate::binary(nodes, origin, GateOp::Nor), ElementKind::Gate),
            ElementType::Xor => wrap(LogicGate::binary(nodes, origin, GateOp::Xor), ElementKind::Gate),
            ElementType::Xnor => wrap(LogicGate::binary(nodes, origin, GateOp::Xnor), ElementKind::Gate),
            ElementType::Not => wrap(LogicGate::inverter(nodes, origin), ElementKind::Gate),
            ElementType::Memory => wrap(MemoryCell::build(nodes, origin), ElementKind::Memory),
            ElementType::FlipFlop => wrap(FlipFlop::build(nodes, origin), ElementKind::FlipFlop),
            ElementType::JkFlipFlop => wrap(JkFlipFlop::build(nodes, origin), ElementKind::JkFlipFlop),
            ElementType::Random => wrap(RandomElement::build(nodes, origin), ElementKind::Random),
            ElementType::Counter => wrap(Counter::build(nodes, origin), ElementKind::Counter),
            ElementType::Led => wrap(Indicator::build(nodes, origin), ElementKind::Led),
            ElementType::Buzzer => wrap(Indicator::build(nodes, origin), ElementKind::Buzzer),
            ElementType::Switch => wrap(PushButton::build(nodes, origin), ElementKind::Switch),
            ElementType::ToggleSwitch => {
                wrap(ToggleButton::build(nodes, origin), ElementKind::ToggleSwitch)
            }
            ElementType::Pulse => wrap(PulseGenerator::build(nodes, origin, params)?, ElementKind::Pulse),
            ElementType::VarVoltage => wrap(
                VariableVoltage::build(nodes, origin, params)?,
                ElementKind::VarVoltage,
            ),
            ElementType::Comparator => {
                wrap(Comparator::build(nodes, origin, params)?, ElementKind::Comparator)
            }
            ElementType::Adc => wrap(Converter::adc(nodes, origin), ElementKind::Adc),
            ElementType::Dac => wrap(Converter::dac(nodes, origin), ElementKind::Dac),
            ElementType::Relay => wrap(Relay::build(nodes, origin), ElementKind::Relay),
            ElementType::Lightbulb => wrap(Lightbulb::build(nodes, origin), ElementKind::Lightbulb),
            ElementType::Heater => wrap(Heater::build(nodes, origin), ElementKind::Heater),
            ElementType::Flashlight => wrap(Flashlight::build(), ElementKind::Flashlight),
            ElementType::LightSensor => {
                wrap(LightSensor::build(nodes, origin, params)?, ElementKind::LightSensor)
            }
            ElementType::TemperatureSensor => wrap(
                TemperatureSensor::build(nodes, origin),
                ElementKind::TemperatureSensor,
            ),
            ElementType::SoundSensor => {
                wrap(ExternalSensor::build(nodes, origin), ElementKind::SoundSensor)
            }
            ElementType::WebcamSensor => {
                wrap(ExternalSensor::build(nodes, origin), ElementKind::WebcamSensor)
            }
            ElementType::Voltmeter => wrap(Meter::analog(nodes, origin), ElementKind::Voltmeter),
            ElementType::DigitalVoltmeter => {
                wrap(Meter::digital(nodes, origin), ElementKind::DigitalVoltmeter)
            }
            ElementType::Text => wrap(TextLabel::build(params)?, ElementKind::Text),
        };
        Ok(built)
    }
}

fn wrap<T>(built: (T, Vec<NodeId>), variant: fn(T) -> ElementKind) -> (ElementKind, Vec<NodeId>) {
    (variant(built.0), built.1)
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CircuitError::UnknownElementType(s.to_string()))
    }
}

/// Element state, one variant per kind.
#[derive(Debug, Clone)]
pub enum ElementKind {
    Gate(LogicGate),
    Memory(MemoryCell),
    FlipFlop(FlipFlop),
    JkFlipFlop(JkFlipFlop),
    Random(RandomElement),
    Counter(Counter),
    Led(Indicator),
    Buzzer(Indicator),
    Switch(PushButton),
    ToggleSwitch(ToggleButton),
    Pulse(PulseGenerator),
    VarVoltage(VariableVoltage),
    Comparator(Comparator),
    Adc(Converter),
    Dac(Converter),
    Relay(Relay),
    Lightbulb(Lightbulb),
    Heater(Heater),
    Flashlight(Flashlight),
    LightSensor(LightSensor),
    TemperatureSensor(TemperatureSensor),
    SoundSensor(ExternalSensor),
    WebcamSensor(ExternalSensor),
    Voltmeter(Meter),
    DigitalVoltmeter(Meter),
    Text(TextLabel),
}

macro_rules! with_behavior {
    ($kind:expr, $b:ident => $body:expr) => {
        match $kind {
            ElementKind::Gate($b) => $body,
            ElementKind::Memory($b) => $body,
            ElementKind::FlipFlop($b) => $body,
            ElementKind::JkFlipFlop($b) => $body,
            ElementKind::Random($b) => $body,
            ElementKind::Counter($b) => $body,
            ElementKind::Led($b) | ElementKind::Buzzer($b) => $body,
            ElementKind::Switch($b) => $body,
            ElementKind::ToggleSwitch($b) => $body,
            ElementKind::Pulse($b) => $body,
            ElementKind::VarVoltage($b) => $body,
            ElementKind::Comparator($b) => $body,
            ElementKind::Adc($b) | ElementKind::Dac($b) => $body,
            ElementKind::Relay($b) => $body,
            ElementKind::Lightbulb($b) => $body,
            ElementKind::Heater($b) => $body,
            ElementKind::Flashlight($b) => $body,
            ElementKind::LightSensor($b) => $body,
            ElementKind::TemperatureSensor($b) => $body,
            ElementKind::SoundSensor($b) | ElementKind::WebcamSensor($b) => $body,
            ElementKind::Voltmeter($b) | ElementKind::DigitalVoltmeter($b) => $body,
            ElementKind::Text($b) => $body,
        }
    };
}

impl ElementKind {
    pub fn output(&mut self, ctx: &mut TickContext<'_>) {
        with_behavior!(self, b => b.output(ctx))
    }

    pub fn params(&self) -> Params {
        with_behavior!(self, b => b.params())
    }

    pub fn set_param(&mut self, key: &str, value: &str) -> Result<(), CircuitError> {
        with_behavior!(self, b => b.set_param(key, value))
    }

    /// Position and state of a light this element emits, if it is lit.
    pub fn light(&self) -> Option<bool> {
        match self {
            ElementKind::Lightbulb(bulb) => Some(bulb.is_lit()),
            ElementKind::Flashlight(lamp) => Some(lamp.is_lit()),
            _ => None,
        }
    }
}

/// A component instance on the board.
#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    name: String,
    element_type: ElementType,
    position: Position,
    nodes: Vec<NodeId>,
    pub(crate) kind: ElementKind,
    degraded: bool,
}

impl Element {
    pub(crate) fn new(
        id: ElementId,
        name: String,
        element_type: ElementType,
        position: Position,
        nodes: Vec<NodeId>,
        kind: ElementKind,
    ) -> Self {
        Element {
            id,
            name,
            element_type,
            position,
            nodes,
            kind,
            degraded: false,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Unique name on the board, e.g. `Counter0`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Set when an external source could not be opened; the element keeps
    /// reporting a constant signal and should be drawn de-emphasised.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub(crate) fn set_degraded(&mut self, degraded: bool) {
        self.degraded = degraded;
    }

    pub fn output(&mut self, ctx: &mut TickContext<'_>) {
        self.kind.output(ctx);
    }

    pub fn params(&self) -> Params {
        self.kind.params()
    }
}
