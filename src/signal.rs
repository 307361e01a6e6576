use serde::{Deserialize, Serialize};
use std::fmt;

/// Input voltage at or above which a signal reads as High.
pub const HI_THRESHOLD: f64 = 1.4;
/// Input voltage below which a signal reads as Low.
pub const LO_THRESHOLD: f64 = 0.8;

pub const LOW_VOLTS: f64 = 0.0;
pub const HIGH_VOLTS: f64 = 5.0;

/// A node voltage on the board.
///
/// Digital consumers classify a signal with [`Signal::is_high`] and
/// [`Signal::is_low`]; the range between the two thresholds is a hysteresis
/// band that is neither. Analog consumers (comparator, ADC, meters) read the
/// raw volts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(f64);

/// Digital reading of a [`Signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    Indeterminate,
    High,
}

impl Signal {
    pub const LOW: Signal = Signal(LOW_VOLTS);
    pub const HIGH: Signal = Signal(HIGH_VOLTS);

    pub fn new(volts: f64) -> Self {
        Signal(volts)
    }

    /// Builds a signal restricted to the board's 0–5 V supply range.
    pub fn clamped(volts: f64) -> Self {
        if volts.is_nan() {
            return Signal::LOW;
        }
        Signal(volts.clamp(LOW_VOLTS, HIGH_VOLTS))
    }

    pub fn volts(&self) -> f64 {
        self.0
    }

    pub fn from_bool(value: bool) -> Self {
        if value {
            Signal::HIGH
        } else {
            Signal::LOW
        }
    }

    pub fn is_high(&self) -> bool {
        self.0 >= HI_THRESHOLD
    }

    pub fn is_low(&self) -> bool {
        self.0 < LO_THRESHOLD
    }

    /// High becomes Low; anything else (Low or the hysteresis band) becomes High.
    pub fn invert(&self) -> Self {
        if self.is_high() {
            Signal::LOW
        } else {
            Signal::HIGH
        }
    }

    pub fn level(&self) -> Level {
        if self.is_high() {
            Level::High
        } else if self.is_low() {
            Level::Low
        } else {
            Level::Indeterminate
        }
    }
}

impl From<f64> for Signal {
    fn from(volts: f64) -> Self {
        Signal(volts)
    }
}

impl From<Signal> for f64 {
    fn from(signal: Signal) -> Self {
        signal.0
    }
}

impl Level {
    pub fn to_char(&self) -> char {
        match self {
            Level::Low => '0',
            Level::Indeterminate => '~',
            Level::High => '1',
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} V", self.0)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Level::Low => "Low",
            Level::Indeterminate => "Indeterminate",
            Level::High => "High",
        };
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert!(Signal::new(1.4).is_high());
        assert!(!Signal::new(1.39).is_high());
        assert!(!Signal::new(0.8).is_low());
        assert!(Signal::new(0.79).is_low());
    }

    #[test]
    fn test_hysteresis_band() {
        let mid = Signal::new(1.0);
        assert!(!mid.is_high());
        assert!(!mid.is_low());
        assert_eq!(mid.level(), Level::Indeterminate);
    }

    #[test]
    fn test_invert() {
        assert_eq!(Signal::HIGH.invert(), Signal::LOW);
        assert_eq!(Signal::LOW.invert(), Signal::HIGH);
        // The band counts as not-High
        assert_eq!(Signal::new(1.0).invert(), Signal::HIGH);
    }

    #[test]
    fn test_clamped() {
        assert_eq!(Signal::clamped(7.5), Signal::HIGH);
        assert_eq!(Signal::clamped(-1.0), Signal::LOW);
        assert_eq!(Signal::clamped(f64::NAN), Signal::LOW);
        assert_eq!(Signal::clamped(2.5).volts(), 2.5);
    }
}
