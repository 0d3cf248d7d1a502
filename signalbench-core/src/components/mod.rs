//! Component traits and their implementations.
//!
//! - Indicator: a numeric series derived from bar history
//! - Signal generator: turns bar history into one discrete signal per bar
//!
//! `factory::create_signal` maps a strategy key and its parameters onto a
//! concrete signal generator.

pub mod factory;
pub mod indicator;
pub mod signal;

pub use factory::{create_signal, ComponentConfig, FactoryError};
pub use indicator::Indicator;
pub use signal::{SignalError, SignalGenerator};
