use serde::{Deserialize, Serialize};
use std::fmt;

use crate::signal::{Signal, HIGH_VOLTS};

/// Number of steps in the 4-bit converters.
pub const NIBBLE_STEPS: f64 = 16.0;

/// 4-bit unsigned integer used by the counter and the converters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Nibble(u8);

impl Nibble {
    pub const MAX: Nibble = Nibble(0xF);

    pub fn new(value: u8) -> Self {
        Nibble(value & 0xF)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn inc(&mut self) {
        self.0 = (self.0 + 1) & 0xF;
    }

    pub fn set(&mut self, value: u8) {
        self.0 = value & 0xF;
    }

    /// Bit `index` (0 = weight 1, 3 = weight 8).
    pub fn bit(&self, index: u8) -> bool {
        index < 4 && (self.0 >> index) & 1 == 1
    }
}

impl fmt::Display for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Nibble {
    fn from(value: u8) -> Self {
        Nibble::new(value)
    }
}

impl From<Nibble> for u8 {
    fn from(value: Nibble) -> Self {
        value.value()
    }
}

/// ADC transfer: 5/16 V per step, truncated, saturating at 15.
pub fn analog_to_nibble(signal: Signal) -> Nibble {
    let steps = (signal.volts() * NIBBLE_STEPS / HIGH_VOLTS).floor();
    if steps <= 0.0 || steps.is_nan() {
        Nibble::new(0)
    } else if steps >= 15.0 {
        Nibble::MAX
    } else {
        Nibble::new(steps as u8)
    }
}

/// DAC transfer: the inverse of [`analog_to_nibble`] on step boundaries.
pub fn nibble_to_analog(value: Nibble) -> Signal {
    Signal::new(f64::from(value.value()) * HIGH_VOLTS / NIBBLE_STEPS)
}

/// Canvas coordinates of an element or node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn distance_squared(&self, other: &Position) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble_wraps() {
        let mut n = Nibble::new(15);
        n.inc();
        assert_eq!(n.value(), 0);
        assert_eq!(Nibble::new(0x1F).value(), 0xF);
    }

    #[test]
    fn test_nibble_bits() {
        let n = Nibble::new(0b1010);
        assert!(!n.bit(0));
        assert!(n.bit(1));
        assert!(!n.bit(2));
        assert!(n.bit(3));
        assert!(!n.bit(7));
    }

    #[test]
    fn test_converter_extremes() {
        assert_eq!(analog_to_nibble(Signal::HIGH), Nibble::MAX);
        assert_eq!(analog_to_nibble(Signal::LOW).value(), 0);
        assert_eq!(analog_to_nibble(Signal::new(0.31)).value(), 0);
        assert_eq!(analog_to_nibble(Signal::new(0.3125)).value(), 1);
        assert_eq!(nibble_to_analog(Nibble::MAX).volts(), 4.6875);
    }

    #[test]
    fn test_converters_invert_each_other() {
        for value in 0..16u8 {
            let n = Nibble::new(value);
            assert_eq!(analog_to_nibble(nibble_to_analog(n)), n);
        }
    }
}
