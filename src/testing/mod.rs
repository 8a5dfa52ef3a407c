//! Host-side test support

pub mod sim;

pub use sim::{BusEvent, Completion, SimulatedTwi};
