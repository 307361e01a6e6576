use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::config::{SimConfig, ThermalConfig};

/// Number of samples kept of the inside temperature. The temperature sensor
/// reads the oldest one, which gives it a small lag behind the heater.
pub const TEMPERATURE_HISTORY: usize = 5;

/// Room model shared by heaters and temperature sensors.
#[derive(Debug, Clone)]
pub struct Thermal {
    config: ThermalConfig,
    inside: [f64; TEMPERATURE_HISTORY],
}

impl Thermal {
    pub fn new(config: ThermalConfig) -> Self {
        Thermal {
            inside: [config.initial_inside; TEMPERATURE_HISTORY],
            config,
        }
    }

    /// Current inside temperature in °C.
    pub fn inside(&self) -> f64 {
        self.inside[0]
    }

    /// Oldest sample in the history.
    pub fn lagged(&self) -> f64 {
        self.inside[TEMPERATURE_HISTORY - 1]
    }

    /// Heats the room with the configured heater power for `dt`.
    pub fn heat(&mut self, dt: Duration) {
        self.inside[0] += self.config.heater_power * dt.as_secs_f64() / self.config.heat_capacity;
    }

    /// Loses heat to the outside for `dt` and pushes a new sample.
    pub fn cool(&mut self, dt: Duration) {
        let loss = self.config.heat_transfer * (self.inside[0] - self.config.outside);
        let next = self.inside[0] - loss * dt.as_secs_f64() / self.config.heat_capacity;
        self.inside.rotate_right(1);
        self.inside[0] = next;
    }
}

/// Mutable state shared by every element during a tick.
#[derive(Debug, Clone)]
pub struct SimulationState {
    tick: u64,
    tick_period: Duration,
    rng: StdRng,
    pub thermal: Thermal,
}

impl SimulationState {
    pub fn new(config: &SimConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        SimulationState {
            tick: 0,
            tick_period: config.tick_period(),
            rng,
            thermal: Thermal::new(config.thermal.clone()),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub(crate) fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Fair coin used by the random element.
    pub fn coin_flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        SimulationState::new(&SimConfig::default())
    }
}
