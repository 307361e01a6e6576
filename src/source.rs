//! External analog inputs for the sound and webcam sensors.
//!
//! A feed is polled by the runtime at its own rate and the sample is written
//! straight into the sensor's output node. A feed that fails marks its
//! element degraded; the node keeps its last value.

use crate::error::SourceError;

/// Something that can be sampled for a voltage (microphone level, camera
/// brightness, ...).
pub trait SensorFeed: Send {
    /// Current reading in volts. Values outside 0-5 V are clamped by the board.
    fn sample(&mut self) -> Result<f64, SourceError>;
}

/// Feed backed by a closure.
pub struct FnFeed<F> {
    sampler: F,
}

impl<F> FnFeed<F>
where
    F: FnMut() -> Result<f64, SourceError> + Send,
{
    pub fn new(sampler: F) -> Self {
        FnFeed { sampler }
    }
}

impl<F> SensorFeed for FnFeed<F>
where
    F: FnMut() -> Result<f64, SourceError> + Send,
{
    fn sample(&mut self) -> Result<f64, SourceError> {
        (self.sampler)()
    }
}

/// Feed for a device that could not be opened.
#[derive(Debug, Clone)]
pub struct UnavailableFeed {
    error: SourceError,
}

impl UnavailableFeed {
    pub fn new(error: SourceError) -> Self {
        UnavailableFeed { error }
    }
}

impl SensorFeed for UnavailableFeed {
    fn sample(&mut self) -> Result<f64, SourceError> {
        Err(self.error.clone())
    }
}
