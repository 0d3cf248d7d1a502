//! SignalBench Core: domain types, indicators, regression models, signal
//! generators and the simulation engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, signals, portfolio state)
//! - Rolling and exponential indicators (SMA, EMA, RSI)
//! - Regression models (OLS, polynomial OLS, random forest) and k-fold CV
//! - Signal generators behind the `SignalGenerator` trait, built by name
//! - Single-series, all-in/all-out simulation engine

pub mod components;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod models;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared across strategy worker threads are
    /// Send + Sync. If any type fails this check, the build breaks immediately.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();
        require_send::<domain::PortfolioState>();
        require_sync::<domain::PortfolioState>();

        // Engine types
        require_send::<engine::SimulationResult>();
        require_sync::<engine::SimulationResult>();
        require_send::<engine::SimulationEntry>();
        require_sync::<engine::SimulationEntry>();

        // Component types
        require_send::<components::ComponentConfig>();
        require_sync::<components::ComponentConfig>();
        require_send::<Box<dyn components::SignalGenerator>>();
        require_sync::<Box<dyn components::SignalGenerator>>();

        // Signal concrete types
        require_send::<components::signal::MaCrossover>();
        require_sync::<components::signal::MaCrossover>();
        require_send::<components::signal::RsiOscillator>();
        require_sync::<components::signal::RsiOscillator>();
        require_send::<components::signal::MacdCrossover>();
        require_sync::<components::signal::MacdCrossover>();
        require_send::<components::signal::RegressionPredictor>();
        require_sync::<components::signal::RegressionPredictor>();
        require_send::<components::signal::NullSignal>();
        require_sync::<components::signal::NullSignal>();

        // Models
        require_send::<models::RandomForest>();
        require_sync::<models::RandomForest>();
        require_send::<models::PolynomialRegression>();
        require_sync::<models::PolynomialRegression>();
    }

    /// Architecture contract: SignalGenerator trait does NOT accept portfolio state.
    #[test]
    fn signal_generator_trait_has_no_portfolio_parameter() {
        // generate() takes bar history only. If a portfolio parameter is ever
        // added, this stops compiling.
        fn _check_trait_object_builds(
            sig: &dyn components::SignalGenerator,
            bars: &[domain::Bar],
        ) -> Result<Vec<domain::Signal>, components::SignalError> {
            sig.generate(bars)
        }
    }
}
