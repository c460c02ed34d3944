//! Host-side adapters for running the badge loop without hardware.

mod input;
mod outputs;
mod sim_scanner;

pub use input::ScriptedInput;
pub use outputs::{TracingLedStrip, TracingPanel};
pub use sim_scanner::{SimulatedScanner, SimulationSettings};
