//! # xagpeg - XRPL AMM peg maintenance bot
//!
//! Steers an XRP/XAG liquidity pool toward the physical silver price
//! published by an on-ledger oracle. Every cycle the bot reads the oracle's
//! XAG/USD and XRP/USD quotes, derives a target pool price (with a temporary
//! bootstrap premium), compares it to the price implied by the pool's
//! reserves, and deposits or withdraws XRP to close the gap.
//!
//! ## Structure
//!
//! - [`oracle`] decodes the on-ledger price record and derives the target
//! - [`pool`] normalizes `amm_info` reserves and computes the implied price
//! - [`adjuster`] turns a deviation into a capped, one-sided XRP adjustment
//! - [`ledger`] is the network seam: JSON-RPC queries plus signed submissions
//! - [`cycle`] wires those into one linear pass per scheduler tick
//! - [`config`] holds the validated runtime configuration
//!
//! The binary (`src/main.rs`) loads configuration, derives the operator
//! wallet, and runs [`cycle::run_cycle`] on a fixed interval, starting with
//! one immediate run. Cycles are serialized: a slow cycle delays the next
//! tick rather than overlapping it.

pub mod adjuster;
pub mod config;
pub mod cycle;
pub mod error;
pub mod ledger;
pub mod oracle;
pub mod pool;

pub use adjuster::{decide, Action, Decision};
pub use config::Config;
pub use cycle::{run_cycle, CycleOutcome};
pub use error::{Error, ErrorClass, Result, TxKind};
pub use ledger::{Ledger, XrplLedger};
pub use oracle::{target_price, OracleRecord, PriceData, PriceEntry};
pub use pool::PoolState;
