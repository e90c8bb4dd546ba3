//! The adjustment cycle
//!
//! One strictly linear pass: fetch-oracle, resolve-pool, read-pool-state,
//! decide, act. No state survives between cycles; the first error ends the
//! cycle and is returned to the scheduler.

use crate::adjuster::{self, Action};
use crate::config::Config;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::oracle;

/// How a completed cycle left the pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// Deviation within threshold, nothing submitted
    Held {
        /// Implied pool price, XRP per ounce
        implied: f64,
        /// Oracle target price, XRP per ounce
        target: f64,
        /// Signed relative deviation
        deviation: f64,
    },
    /// XRP deposited to raise the pool price
    Deposited {
        /// Amount deposited, in XRP
        xrp: f64,
        /// Deviation that triggered the deposit
        deviation: f64,
    },
    /// XRP withdrawn to lower the pool price
    Withdrew {
        /// Amount withdrawn, in XRP
        xrp: f64,
        /// Deviation that triggered the withdrawal
        deviation: f64,
    },
    /// No pool existed; one was created with seed liquidity. The pool has no
    /// implied price until its XAG side is funded, so the cycle ends here.
    SeededPool,
}

/// Run one adjustment cycle against `ledger`
pub async fn run_cycle<L: Ledger + ?Sized>(ledger: &L, config: &Config) -> Result<CycleOutcome> {
    let record = ledger
        .oracle_record(&config.oracle_account, config.oracle_document_id)
        .await?;
    let target = oracle::target_price(&record, config)?;

    let pool = match ledger.amm_pool().await? {
        Some(pool) => pool,
        None => {
            tracing::info!(
                seed_xrp = config.seed_liquidity_xrp,
                trading_fee = config.trading_fee,
                "no pool found, creating one"
            );
            ledger.create_pool().await?;
            return Ok(CycleOutcome::SeededPool);
        }
    };

    let implied = pool.implied_price(config.units_per_ounce, &config.currency)?;
    let decision = adjuster::decide(implied, target, config);
    tracing::info!(
        "Current: {:.4} XRP/oz | Target: {:.4} XRP/oz | Deviation: {:.2}%",
        implied,
        target,
        decision.deviation * 100.0
    );

    match decision.action {
        Action::Hold => Ok(CycleOutcome::Held {
            implied,
            target,
            deviation: decision.deviation,
        }),
        Action::Deposit(xrp) => {
            ledger.deposit(xrp).await?;
            tracing::info!(xrp, "deposited XRP to raise price");
            Ok(CycleOutcome::Deposited {
                xrp,
                deviation: decision.deviation,
            })
        }
        Action::Withdraw(xrp) => {
            ledger.withdraw(xrp).await?;
            tracing::info!(xrp, "withdrew XRP to lower price");
            Ok(CycleOutcome::Withdrew {
                xrp,
                deviation: decision.deviation,
            })
        }
    }
}
