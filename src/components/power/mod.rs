//! Mains side of the board. Every node here except the relay coil is HV.

pub mod loads;
pub mod relay;

pub use loads::{Heater, Lightbulb};
pub use relay::Relay;
