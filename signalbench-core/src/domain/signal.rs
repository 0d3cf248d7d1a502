//! Signal: the discrete per-bar trading decision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete Buy/Hold/Sell decision for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Buy,
    #[default]
    Hold,
    Sell,
}

impl Signal {
    /// Numeric encoding: Buy = +1, Hold = 0, Sell = -1.
    pub fn value(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Hold => 0,
            Signal::Sell => -1,
        }
    }

    /// Map a raw state to a signal by its sign.
    pub fn from_sign(value: f64) -> Self {
        if value > 0.0 {
            Signal::Buy
        } else if value < 0.0 {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    pub fn is_trade(self) -> bool {
        self != Signal::Hold
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Signal::Buy => "buy",
            Signal::Hold => "hold",
            Signal::Sell => "sell",
        };
        f.write_str(label)
    }
}
