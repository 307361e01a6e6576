//! # Systemboard
//!
//! Signal-propagation engine for a teaching electronics board: gates,
//! latches, counters, converters, relays, sensors and actuators wired
//! together and re-evaluated on a fixed tick.
//!
//! This library provides:
//! - A node arena with memoized, cycle-tolerant evaluation ([`node`])
//! - Stateful element kinds with edge detection ([`components`])
//! - The board and its tick cycle ([`board`])
//! - JSON circuit files with two-pass loading ([`circuit`])
//! - A tokio scheduler for real-time runs, pulse timers and sensor feeds ([`runtime`])
//! - A terminal monitor ([`console`])

pub mod board;
pub mod circuit;
pub mod component;
pub mod components;
pub mod config;
pub mod connection;
pub mod console;
pub mod error;
pub mod node;
pub mod runtime;
pub mod signal;
pub mod source;
pub mod state;
pub mod types;

// Re-export commonly used items for easier importing
pub use board::Board;
pub use circuit::{CircuitFile, ElementRecord, LinkRecord};
pub use component::{Element, ElementId, ElementKind, ElementType, Params};
pub use config::SimConfig;
pub use connection::{WireDrop, WireId};
pub use error::{CircuitError, ConfigError, ConnectError, SourceError};
pub use node::NodeId;
pub use runtime::{SimControl, Simulator};
pub use signal::{Level, Signal};
pub use source::{FnFeed, SensorFeed};
