//! Simulation engine: evolves a cash/shares portfolio bar-by-bar from a
//! signal sequence.
//!
//! Single forward pass over bars in chronological order. Buys spend all
//! available cash on whole shares at the bar's close; sells liquidate the
//! whole position at the bar's close. No fees, no slippage, no partial sizing.

pub mod simulation;

pub use simulation::{run_simulation, SimulationEntry, SimulationResult};
