//! Runtime configuration
//!
//! Every knob the bot uses lives in [`Config`], built from defaults that
//! mirror the mainnet deployment and overridable through `XAGPEG_*`
//! environment variables. The signing seed is deliberately kept out of this
//! struct so it can never end up in a debug dump or log line.

use std::str::FromStr;

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// Default JSON-RPC endpoint (mainnet cluster)
pub const DEFAULT_RPC_URL: &str = "https://xrplcluster.com/";

/// DIA price oracle account on mainnet
pub const DEFAULT_ORACLE_ACCOUNT: &str = "rP24Lp7bcUHvEW7T7c8xkxtQKKd9fZyra7";

/// Environment variable holding the operator's signing seed
pub const SEED_VAR: &str = "XAGPEG_SEED";

/// Peg bot configuration
///
/// All prices are XRP per ounce of silver; all adjustment amounts are XRP.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON-RPC endpoint of the rippled server to talk to
    pub rpc_url: String,
    /// Account of the on-ledger price oracle provider
    pub oracle_account: String,
    /// Oracle document id carrying the XAG and XRP quotes
    pub oracle_document_id: u32,
    /// Currency code of the pegged asset
    pub currency: String,
    /// Issuer of the pegged asset; defaults to the operator's own address
    pub issuer: Option<String>,
    /// Markup applied to the oracle price while bootstrapping the pool.
    /// TEMPORARY: set back to 1.0 once the bootstrap phase is over.
    pub premium: f64,
    /// Deviation below which the cycle takes no action
    pub adjust_threshold: f64,
    /// XRP of adjustment per unit of deviation
    pub adjust_scale_xrp: f64,
    /// Hard cap on a single cycle's adjustment, in XRP
    pub max_adjust_xrp: f64,
    /// XRP side of the seed liquidity when creating the pool
    pub seed_liquidity_xrp: f64,
    /// Pool trading fee in units of 1/100,000 (75 = 0.75%)
    pub trading_fee: u16,
    /// Pegged-token units per priced ounce (the token is denominated in
    /// milli-ounces)
    pub units_per_ounce: f64,
    /// Seconds between adjustment cycles
    pub cycle_interval_secs: u64,
    /// Timeout applied to every RPC request
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            oracle_account: DEFAULT_ORACLE_ACCOUNT.to_string(),
            oracle_document_id: 42,
            currency: "XAG".to_string(),
            issuer: None,
            premium: 1.08,
            adjust_threshold: 0.01,
            adjust_scale_xrp: 20_000.0,
            max_adjust_xrp: 1_000.0,
            seed_liquidity_xrp: 20_000.0,
            trading_fee: 75,
            units_per_ounce: 1_000.0,
            cycle_interval_secs: 120,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Build a configuration from defaults plus `XAGPEG_*` environment
    /// overrides, validating the result
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        override_string("XAGPEG_RPC_URL", &mut config.rpc_url);
        override_string("XAGPEG_ORACLE_ACCOUNT", &mut config.oracle_account);
        override_parsed("XAGPEG_ORACLE_DOCUMENT_ID", &mut config.oracle_document_id)?;
        override_string("XAGPEG_CURRENCY", &mut config.currency);
        if let Ok(issuer) = std::env::var("XAGPEG_ISSUER") {
            config.issuer = Some(issuer);
        }
        override_parsed("XAGPEG_PREMIUM", &mut config.premium)?;
        override_parsed("XAGPEG_ADJUST_THRESHOLD", &mut config.adjust_threshold)?;
        override_parsed("XAGPEG_ADJUST_SCALE_XRP", &mut config.adjust_scale_xrp)?;
        override_parsed("XAGPEG_MAX_ADJUST_XRP", &mut config.max_adjust_xrp)?;
        override_parsed("XAGPEG_SEED_LIQUIDITY_XRP", &mut config.seed_liquidity_xrp)?;
        override_parsed("XAGPEG_TRADING_FEE", &mut config.trading_fee)?;
        override_parsed("XAGPEG_UNITS_PER_OUNCE", &mut config.units_per_ounce)?;
        override_parsed("XAGPEG_CYCLE_INTERVAL_SECS", &mut config.cycle_interval_secs)?;
        override_parsed("XAGPEG_REQUEST_TIMEOUT_SECS", &mut config.request_timeout_secs)?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the adjustment math cannot work with
    pub fn validate(&self) -> Result<()> {
        if Url::parse(&self.rpc_url).is_err() {
            return Err(Error::InvalidConfig {
                field: "rpc_url",
                reason: format!("not a valid URL: {}", self.rpc_url),
            });
        }
        if self.oracle_account.is_empty() {
            return Err(Error::InvalidConfig {
                field: "oracle_account",
                reason: "must not be empty".to_string(),
            });
        }
        if self.currency.is_empty() {
            return Err(Error::InvalidConfig {
                field: "currency",
                reason: "must not be empty".to_string(),
            });
        }
        if !(self.premium > 0.0) {
            return Err(Error::InvalidConfig {
                field: "premium",
                reason: format!("must be positive, got {}", self.premium),
            });
        }
        if !(self.adjust_threshold > 0.0 && self.adjust_threshold < 1.0) {
            return Err(Error::InvalidConfig {
                field: "adjust_threshold",
                reason: format!("must be in (0, 1), got {}", self.adjust_threshold),
            });
        }
        if !(self.adjust_scale_xrp > 0.0) {
            return Err(Error::InvalidConfig {
                field: "adjust_scale_xrp",
                reason: format!("must be positive, got {}", self.adjust_scale_xrp),
            });
        }
        if !(self.max_adjust_xrp > 0.0) {
            return Err(Error::InvalidConfig {
                field: "max_adjust_xrp",
                reason: format!("must be positive, got {}", self.max_adjust_xrp),
            });
        }
        if !(self.seed_liquidity_xrp > 0.0) {
            return Err(Error::InvalidConfig {
                field: "seed_liquidity_xrp",
                reason: format!("must be positive, got {}", self.seed_liquidity_xrp),
            });
        }
        // AMMCreate rejects fees above 1% (1000 units)
        if self.trading_fee > 1_000 {
            return Err(Error::InvalidConfig {
                field: "trading_fee",
                reason: format!("must be at most 1000, got {}", self.trading_fee),
            });
        }
        if !(self.units_per_ounce > 0.0) {
            return Err(Error::InvalidConfig {
                field: "units_per_ounce",
                reason: format!("must be positive, got {}", self.units_per_ounce),
            });
        }
        if self.cycle_interval_secs == 0 {
            return Err(Error::InvalidConfig {
                field: "cycle_interval_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig {
                field: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Read the operator's signing seed from the environment
pub fn seed_from_env() -> Result<String> {
    std::env::var(SEED_VAR).map_err(|_| Error::MissingConfig { name: SEED_VAR })
}

fn override_string(name: &'static str, field: &mut String) {
    if let Ok(value) = std::env::var(name) {
        *field = value;
    }
}

fn override_parsed<T>(name: &'static str, field: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(value) = std::env::var(name) {
        *field = value.parse().map_err(|e| Error::InvalidConfig {
            field: name,
            reason: format!("{}", e),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_premium() {
        let config = Config {
            premium: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { field: "premium", .. })
        ));
    }

    #[test]
    fn test_rejects_threshold_of_one() {
        let config = Config {
            adjust_threshold: 1.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_url() {
        let config = Config {
            rpc_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { field: "rpc_url", .. })
        ));
    }

    #[test]
    fn test_rejects_excessive_trading_fee() {
        let config = Config {
            trading_fee: 1_001,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
