pub mod indicators;
pub mod label;
pub mod meters;
pub mod switches;

pub use indicators::Indicator;
pub use label::TextLabel;
pub use meters::Meter;
pub use switches::{PushButton, ToggleButton};
