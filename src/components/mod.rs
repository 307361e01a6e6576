//! Element kinds, grouped the way they are on the physical board.

pub mod analog;
pub mod clock;
pub mod io;
pub mod logic;
pub mod memory;
pub mod power;
pub mod sensor;

use crate::node::{Node, NodeArena, NodeId, NodeKind};
use crate::signal::Signal;
use crate::types::Position;

pub(crate) fn input(nodes: &mut NodeArena, origin: Position, name: &str, dx: f64, dy: f64) -> NodeId {
    nodes.insert(Node::input(name, origin.offset(dx, dy)))
}

pub(crate) fn hv_input(nodes: &mut NodeArena, origin: Position, name: &str, dx: f64, dy: f64) -> NodeId {
    nodes.insert(Node::input(name, origin.offset(dx, dy)).high_voltage())
}

pub(crate) fn output(
    nodes: &mut NodeArena,
    origin: Position,
    name: &str,
    dx: f64,
    dy: f64,
    kind: NodeKind,
) -> NodeId {
    nodes.insert(Node::output(name, origin.offset(dx, dy), kind))
}

/// Digital view of an input sampled once per tick.
///
/// Values inside the hysteresis band keep the previous level, so a slowly
/// rising analog signal produces a single rising edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    high: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level after the last sample.
    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Records `value` and returns the `(previous, current)` levels.
    pub fn sample(&mut self, value: Signal) -> (bool, bool) {
        let previous = self.high;
        if value.is_high() {
            self.high = true;
        } else if value.is_low() {
            self.high = false;
        }
        (previous, self.high)
    }

    /// Records `value` and reports a Low to High transition.
    pub fn rising(&mut self, value: Signal) -> bool {
        let (previous, current) = self.sample(value);
        !previous && current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rising_edge_only_once() {
        let mut edge = EdgeDetector::new();
        let seen: Vec<bool> = [0.0, 5.0, 5.0, 0.0, 5.0]
            .iter()
            .map(|v| edge.rising(Signal::new(*v)))
            .collect();
        assert_eq!(seen, vec![false, true, false, false, true]);
    }

    #[test]
    fn test_hysteresis_band_holds_level() {
        let mut edge = EdgeDetector::new();
        // Creeping up through the band gives exactly one edge
        let seen: Vec<bool> = [0.5, 1.0, 1.3, 1.4, 1.0, 1.5, 2.0]
            .iter()
            .map(|v| edge.rising(Signal::new(*v)))
            .collect();
        assert_eq!(seen.iter().filter(|e| **e).count(), 1);
        assert!(seen[3]);
        assert!(edge.is_high());
    }
}
