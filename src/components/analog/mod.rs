pub mod comparator;
pub mod converters;
pub mod variable_voltage;

pub use comparator::Comparator;
pub use converters::Converter;
pub use variable_voltage::VariableVoltage;
