//! Ship of Fools simulation library
//!
//! Re-exports modules for use by the driver binary and tools.

pub mod simulation;

pub use simulation::{Simulation, SimulationParams, TickOutcome};
