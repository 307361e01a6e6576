pub mod gates;
pub mod random;

pub use gates::LogicGate;
pub use random::RandomElement;
