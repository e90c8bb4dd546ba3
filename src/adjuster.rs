//! Peg adjustment decision
//!
//! Pure arithmetic: compare the pool's implied price to the oracle target and
//! size a one-sided XRP adjustment. Withdrawing XRP lowers the implied price,
//! depositing raises it.

use crate::config::Config;

/// What the cycle should do to the pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Deviation within threshold, leave the pool alone
    Hold,
    /// Add this many XRP to raise the price
    Deposit(f64),
    /// Remove this many XRP to lower the price
    Withdraw(f64),
}

/// A cycle's decision together with the deviation that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Relative deviation of implied from target, signed
    pub deviation: f64,
    /// The action to take
    pub action: Action,
}

/// Decide the adjustment for one cycle
///
/// deviation = (implied - target) / target. Within the threshold the pool is
/// left alone; otherwise the adjustment is proportional to the deviation and
/// capped at [`Config::max_adjust_xrp`].
pub fn decide(implied: f64, target: f64, config: &Config) -> Decision {
    let deviation = (implied - target) / target;

    if deviation.abs() < config.adjust_threshold {
        return Decision {
            deviation,
            action: Action::Hold,
        };
    }

    let amount = (deviation.abs() * config.adjust_scale_xrp).min(config.max_adjust_xrp);
    let action = if deviation > 0.0 {
        // Pool overpriced: pull XRP out
        Action::Withdraw(amount)
    } else {
        // Pool underpriced: push XRP in
        Action::Deposit(amount)
    };

    Decision { deviation, action }
}
