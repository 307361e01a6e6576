pub mod pulse_generator;

pub use pulse_generator::PulseGenerator;
