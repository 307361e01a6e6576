//! # Simulation configuration
//!
//! Runtime settings for the board engine, stored as JSON:
//!
//! ```json
//! {
//!   "tick_period_ms": 50,
//!   "seed": 42,
//!   "thermal": { "heater_power": 2500.0 },
//!   "console": { "enabled": true, "refresh_rate_ms": 100 }
//! }
//! ```
//!
//! Every field is optional; missing fields take the defaults of the physical
//! teaching board.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_TICK_PERIOD_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Time between two evaluations of the board.
    pub tick_period_ms: u64,
    /// Seed for the random element; entropy when absent.
    pub seed: Option<u64>,
    pub thermal: ThermalConfig,
    pub console: ConsoleConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            seed: None,
            thermal: ThermalConfig::default(),
            console: ConsoleConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: SimConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms.max(1))
    }
}

/// Constants of the heated room behind the heater and temperature sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalConfig {
    /// W/K lost to the outside.
    pub heat_transfer: f64,
    /// J/K of the room.
    pub heat_capacity: f64,
    /// °C
    pub outside: f64,
    /// °C
    pub initial_inside: f64,
    /// W
    pub heater_power: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            heat_transfer: 100.0,
            heat_capacity: 5000.0,
            outside: 15.0,
            initial_inside: 15.0,
            heater_power: 2500.0,
        }
    }
}

/// Console configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub refresh_rate_ms: u64,
    pub show_inputs: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            refresh_rate_ms: 100,
            show_inputs: true,
        }
    }
}
