//! On-ledger price oracle reader
//!
//! The oracle is a `PriceOracle` ledger entry maintained by an external data
//! provider. Its `PriceDataSeries` carries one quote tuple per asset pair;
//! prices arrive as hex mantissas scaled by a decimal exponent. This module
//! owns the wire types, the quote lookup, and the target-price derivation.

use serde::Deserialize;

use crate::config::Config;
use crate::error::{Error, Result};

/// Scale assumed when a quote tuple does not carry one
pub const DEFAULT_SCALE: u8 = 8;

/// One quote tuple from the oracle's price-data series
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceData {
    /// Base asset symbol (e.g. "XAG")
    pub base_asset: String,
    /// Quote asset symbol (e.g. "USD")
    pub quote_asset: String,
    /// Price mantissa as a base-16 integer string; absent when the provider
    /// stopped updating the pair
    #[serde(default)]
    pub asset_price: Option<String>,
    /// Decimal scale: price = mantissa / 10^scale
    #[serde(default)]
    pub scale: Option<u8>,
}

impl PriceData {
    /// Decode the quoted price, or `None` when the tuple carries no mantissa
    pub fn price(&self) -> Result<Option<f64>> {
        let Some(mantissa) = self.asset_price.as_deref() else {
            return Ok(None);
        };
        let raw = u64::from_str_radix(mantissa, 16).map_err(|e| {
            Error::malformed(format!(
                "bad price mantissa {:?} for {}/{}: {}",
                mantissa, self.base_asset, self.quote_asset, e
            ))
        })?;
        let scale = self.scale.unwrap_or(DEFAULT_SCALE);
        Ok(Some(raw as f64 / 10f64.powi(scale as i32)))
    }
}

/// STObject wrapper around each series entry in the `ledger_entry` response
#[derive(Debug, Clone, Deserialize)]
pub struct PriceEntry {
    /// The wrapped quote tuple
    #[serde(rename = "PriceData")]
    pub price_data: PriceData,
}

/// The oracle's current validated-ledger record
#[derive(Debug, Clone, Deserialize)]
pub struct OracleRecord {
    /// All quote tuples published by the provider
    #[serde(rename = "PriceDataSeries")]
    pub series: Vec<PriceEntry>,
}

impl OracleRecord {
    /// Look up the quoted price for a (base, quote) pair
    ///
    /// Tuples without a mantissa are skipped; a pair that is absent or only
    /// present without a price is a [`Error::QuoteMissing`].
    pub fn quote(&self, base: &str, quote: &str) -> Result<f64> {
        for entry in &self.series {
            let data = &entry.price_data;
            if data.base_asset == base && data.quote_asset == quote {
                if let Some(price) = data.price()? {
                    return Ok(price);
                }
            }
        }
        Err(Error::QuoteMissing {
            base: base.to_string(),
            quote: quote.to_string(),
        })
    }
}

/// Derive the target pool price in XRP per ounce
///
/// target = (XAG/USD ÷ XRP/USD) × premium. The premium is a bootstrap-phase
/// markup configured in [`Config::premium`].
pub fn target_price(record: &OracleRecord, config: &Config) -> Result<f64> {
    let silver_usd = record.quote(&config.currency, "USD")?;
    let xrp_usd = record.quote("XRP", "USD")?;
    if !(xrp_usd > 0.0) {
        return Err(Error::malformed(format!(
            "non-positive XRP/USD quote: {}",
            xrp_usd
        )));
    }
    Ok((silver_usd / xrp_usd) * config.premium)
}
