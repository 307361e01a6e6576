pub mod counter;
pub mod flip_flop;
pub mod jk_flip_flop;
pub mod memory_cell;

pub use counter::Counter;
pub use flip_flop::FlipFlop;
pub use jk_flip_flop::JkFlipFlop;
pub use memory_cell::MemoryCell;
