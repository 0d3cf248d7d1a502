//! Domain types shared by every stage of a backtest.

pub mod bar;
pub mod portfolio;
pub mod signal;

pub use bar::{closes, Bar};
pub use portfolio::PortfolioState;
pub use signal::Signal;
