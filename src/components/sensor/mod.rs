pub mod external;
pub mod light;
pub mod temperature;

pub use external::ExternalSensor;
pub use light::{Flashlight, LightSensor};
pub use temperature::TemperatureSensor;
